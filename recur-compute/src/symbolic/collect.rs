//! Collecting the terms of an expression with respect to chosen generators.

use crate::primitive::int;
use crate::symbolic::{
    expr::SymExpr,
    poly::{Monomial, Polynomial},
};
use std::collections::BTreeMap;

/// An expression viewed as a polynomial in a set of generators, whose coefficients are
/// polynomials in everything else.
///
/// For example, collecting `2 a T[n, k] + b T[n, k] + 3` with respect to `T[n, k]` gives the
/// coefficient `2 a + b` for the monomial `T[n, k]`, and `3` for the empty monomial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    terms: BTreeMap<Monomial, Polynomial>,
}

impl Collected {
    /// Collects the expression with respect to the given generators.
    pub fn new(expr: &SymExpr, gens: &[SymExpr]) -> Self {
        let mut terms = BTreeMap::<Monomial, Polynomial>::new();
        for (monomial, coeff) in Polynomial::from_expr(expr).terms() {
            let (generated, rest): (Monomial, Monomial) = monomial
                .iter()
                .map(|(atom, &exp)| (atom.clone(), exp))
                .partition(|(atom, _)| gens.contains(atom));
            let coeff = Polynomial::monomial(rest, coeff.clone());
            let entry = terms.entry(generated).or_default();
            *entry = std::mem::take(entry) + coeff;
        }
        terms.retain(|_, coeff| !coeff.is_zero());
        Self { terms }
    }

    /// Returns the coefficient of the given monomial of generators.
    pub fn coefficient(&self, monomial: &Monomial) -> Polynomial {
        self.terms.get(monomial).cloned().unwrap_or_default()
    }

    /// Returns the coefficient of a single generator, raised to the first power.
    pub fn linear_coefficient(&self, gen: &SymExpr) -> Polynomial {
        self.coefficient(&Monomial::from([(gen.clone(), 1)]))
    }

    /// Returns an iterator over the monomials of generators and their coefficients.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Polynomial)> {
        self.terms.iter()
    }

    /// Returns true if there are no terms.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Converts back into an expression of the form `coeff_1 * gens_1 + coeff_2 * gens_2 + ...`,
    /// where each coefficient is kept together as a single factor.
    pub fn to_expr(&self) -> SymExpr {
        let mut terms = Vec::with_capacity(self.terms.len());
        let mut constant = None;
        for (monomial, coeff) in &self.terms {
            if monomial.is_empty() {
                constant = Some(coeff.to_expr());
                continue;
            }

            let gens = Polynomial::monomial(monomial.clone(), int(1)).to_expr();
            let term = match coeff.as_constant() {
                Some(c) if c == 1 => gens,
                Some(c) => SymExpr::number(c) * gens,
                None => SymExpr::Mul(vec![coeff.to_expr(), gens]),
            };
            terms.push(term);
        }
        terms.extend(constant);
        SymExpr::Add(terms).downgrade()
    }
}

/// Collects the expression with respect to the given generators.
pub fn collect(expr: &SymExpr, gens: &[SymExpr]) -> Collected {
    Collected::new(expr, gens)
}

/// If the expression is exactly `coeff * var`, where `coeff` does not contain `var`, returns
/// `coeff`. An expression with any other term returns [`None`].
pub fn linear_coefficient(expr: &SymExpr, var: &SymExpr) -> Option<SymExpr> {
    let (linear, rest) = Polynomial::from_expr(expr).split_linear(var)?;
    if rest.is_zero() && !linear.is_zero() {
        Some(linear.to_expr())
    } else {
        None
    }
}

/// Factors the content and the common monomial out of the terms of the expression.
///
/// `6 x^2 y + 4 x y` becomes `2 * x * y * (3 x + 2)`.
pub fn factor_terms(expr: &SymExpr) -> SymExpr {
    let poly = Polynomial::from_expr(expr);
    if poly.len() < 2 {
        return poly.to_expr();
    }

    let (content, primitive) = poly.content();

    // atoms present in every term, with the smallest exponent they appear with
    let mut common: Option<Monomial> = None;
    for (monomial, _) in primitive.terms() {
        common = Some(match common {
            None => monomial.clone(),
            Some(common) => common
                .into_iter()
                .filter_map(|(atom, exp)| {
                    let other = monomial.get(&atom).copied().unwrap_or(0);
                    let exp = if exp.signum() == other.signum() {
                        exp.signum() * exp.abs().min(other.abs())
                    } else {
                        0
                    };
                    (exp != 0).then_some((atom, exp))
                })
                .collect(),
        });
    }
    let common = common.unwrap_or_default();
    let common_poly = Polynomial::monomial(common.clone(), int(1));
    let rest = &primitive * &common_poly.recip();

    let mut factors = Vec::new();
    if content != 1 {
        factors.push(SymExpr::number(content));
    }
    for (atom, exp) in common {
        factors.push(Polynomial::monomial(Monomial::from([(atom, exp)]), int(1)).to_expr());
    }
    factors.push(rest.to_expr());
    SymExpr::Mul(factors).downgrade()
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

    #[test]
    fn collect_indexed_terms() {
        let expr = parse_expr("2 a T[n, k] + b T[n, k] + T[n, k + 1] + 3");
        let gens = [parse_expr("T[n, k]"), parse_expr("T[n, k + 1]")];
        let collected = collect(&expr, &gens);
        assert_eq!(collected.linear_coefficient(&gens[0]).to_expr(), parse_expr("2 a + b").expand());
        assert_eq!(collected.linear_coefficient(&gens[1]).to_expr(), SymExpr::one());
        assert_eq!(collected.coefficient(&Monomial::new()).to_expr(), SymExpr::int(3));
        assert_eq!(collected.to_expr().expand(), expr.expand());
    }

    #[test]
    fn linear_coefficient_match() {
        let x = parse_expr("T[2, 1]");
        assert_eq!(linear_coefficient(&parse_expr("3 a T[2, 1]"), &x), Some(parse_expr("3 a").expand()));
        assert_eq!(linear_coefficient(&parse_expr("3 T[2, 1] + 1"), &x), None);
        assert_eq!(linear_coefficient(&SymExpr::zero(), &x), None);
    }

    #[test]
    fn factor_common_terms() {
        let factored = factor_terms(&parse_expr("6 x^2 y + 4 x y"));
        assert_eq!(factored.to_string(), "2 * x * y * (3 * x + 2)");
        assert_eq!(factored.expand(), parse_expr("6 x^2 y + 4 x y").expand());
    }
}
