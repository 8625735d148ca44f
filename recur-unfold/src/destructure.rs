//! Taking apart the terms of a recurrence.

use crate::error::DestructuringError;
use recur_compute::symbolic::{Family, SymExpr};

/// Matches the term against the pattern `coeff * family[subscripts]`, returning `coeff` and the
/// subscripts.
///
/// The coefficient is everything that multiplies the single member of the family, and must
/// contain neither the family nor any of the `forbidden` expressions. A bare member of the family
/// has coefficient `1`. Sums, products with more than one member of the family, and occurrences
/// of the family nested inside other structure do not match.
pub fn destructure(
    term: &SymExpr,
    family: &Family,
    forbidden: &[SymExpr],
) -> Result<(SymExpr, Vec<SymExpr>), DestructuringError> {
    let fail = || DestructuringError {
        term: term.to_string(),
        family: family.name().to_string(),
    };

    if let Some(subscripts) = family.indices_of(term) {
        return Ok((SymExpr::one(), subscripts.to_vec()));
    }

    let SymExpr::Mul(factors) = term else {
        return Err(fail());
    };

    let mut members = factors
        .iter()
        .enumerate()
        .filter_map(|(i, factor)| family.indices_of(factor).map(|subscripts| (i, subscripts)));
    let (position, subscripts) = members.next().ok_or_else(fail)?;
    if members.next().is_some() {
        return Err(fail());
    }

    let coeff = factors
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != position)
        .map(|(_, factor)| factor.clone())
        .collect::<Vec<_>>();
    let coeff = SymExpr::Mul(coeff).downgrade();
    if family.occurs_in(&coeff) || forbidden.iter().any(|expr| coeff.contains(expr)) {
        return Err(fail());
    }

    Ok((coeff, subscripts.to_vec()))
}

/// The associative operators a term can be exploded with respect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Mul,
}

/// Returns the operands of the term if it is built from the given operator, or the term itself
/// otherwise.
///
/// With `deep`, a term built from the operator is expanded first, so nested products are
/// distributed over sums; this is how the summands of a recurrence are exposed before each of
/// them is destructured.
pub fn explode(term: &SymExpr, op: Operator, deep: bool) -> Vec<SymExpr> {
    let operands = |expr: &SymExpr| match (op, expr) {
        (Operator::Add, SymExpr::Add(terms)) => Some(terms.clone()),
        (Operator::Mul, SymExpr::Mul(factors)) => Some(factors.clone()),
        _ => None,
    };

    match operands(term) {
        Some(_) if deep => {
            let expanded = term.expand();
            operands(&expanded).unwrap_or_else(|| vec![expanded])
        },
        Some(operands) => operands,
        None => vec![term.clone()],
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use super::*;

    fn parse_expr(input: &str) -> SymExpr {
        let expr = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        SymExpr::from(expr)
    }

    fn f() -> Family {
        Family::Indexed("f".to_string())
    }

    #[test]
    fn round_trip() {
        let (coeff, subscripts) = destructure(&parse_expr("3 f[n, k, j]"), &f(), &[]).unwrap();
        assert_eq!(coeff, SymExpr::int(3));
        assert_eq!(subscripts, vec![SymExpr::symbol("n"), SymExpr::symbol("k"), SymExpr::symbol("j")]);

        let (coeff, subscripts) = destructure(&parse_expr("a b f[n + 1] / 2"), &f(), &[]).unwrap();
        assert_eq!(coeff.expand(), parse_expr("a b / 2").expand());
        assert_eq!(subscripts, vec![parse_expr("n + 1")]);
    }

    #[test]
    fn bare_member() {
        let (coeff, subscripts) = destructure(&parse_expr("f[0, 0]"), &f(), &[]).unwrap();
        assert_eq!(coeff, SymExpr::one());
        assert_eq!(subscripts, vec![SymExpr::zero(), SymExpr::zero()]);
    }

    #[test]
    fn sum_does_not_match() {
        assert!(destructure(&parse_expr("3 f[n] + 1"), &f(), &[]).is_err());
    }

    #[test]
    fn unindexed_does_not_match() {
        assert!(destructure(&parse_expr("3 f"), &f(), &[]).is_err());
    }

    #[test]
    fn two_members_do_not_match() {
        assert!(destructure(&parse_expr("f[n] f[n + 1]"), &f(), &[]).is_err());
        assert!(destructure(&parse_expr("f[n] g(f[n])"), &f(), &[]).is_err());
    }

    #[test]
    fn forbidden_coefficient() {
        let x = SymExpr::symbol("x");
        assert!(destructure(&parse_expr("x f[n]"), &f(), &[x.clone()]).is_err());
        assert!(destructure(&parse_expr("y f[n]"), &f(), &[x]).is_ok());
    }

    #[test]
    fn explode_shallow_and_deep() {
        let term = parse_expr("f[n] + 2 (f[n - 1] + f[n - 2])");
        assert_eq!(explode(&term, Operator::Add, false).len(), 2);
        assert_eq!(explode(&term, Operator::Add, true).len(), 3);

        let single = parse_expr("2 f[n]");
        assert_eq!(explode(&single, Operator::Add, true), vec![single.clone()]);
        assert_eq!(explode(&single, Operator::Mul, false).len(), 2);
    }
}
