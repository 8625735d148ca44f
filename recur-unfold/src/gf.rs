//! Recurrences built from generating functions.
//!
//! A Riordan array is characterized by its A-sequence and Z-sequence: every entry outside column
//! zero is a combination of the entries of the previous row weighted by the coefficients of
//! `A(t)`, and every entry in column zero is a combination weighted by the coefficients of `Z(t)`.

use crate::sequence::SequenceKind;
use recur_compute::symbolic::{series_coefficients, Equation, Family, SymExpr};
use recur_error::Error;

/// Builds the recurrence whose weights are the first `order` coefficients of the series of `gf`
/// in `var`.
///
/// For an A-sequence, the recurrence is `d[n + 1, k + 1] = sum a_i d[n, k + i - left_offset]`.
/// For a Z-sequence, it is `d[n + 1, 0] = sum z_i d[n, i]`, and `left_offset` is unused. Terms
/// with a zero coefficient are left out.
#[allow(clippy::too_many_arguments)]
pub fn build_rec_from_gf(
    gf: &SymExpr,
    var: &SymExpr,
    order: usize,
    family: &Family,
    kind: SequenceKind,
    row_symbol: &SymExpr,
    col_symbol: &SymExpr,
    left_offset: i64,
) -> Result<Equation, Error> {
    let coefficients = series_coefficients(gf, var, order)?;

    let mut rhs = SymExpr::Add(Vec::new());
    for (i, coeff) in coefficients.into_iter().enumerate() {
        if coeff.is_zero_expanded() {
            continue;
        }

        let col = match kind {
            SequenceKind::A => col_symbol.clone() + SymExpr::int(i as i64 - left_offset),
            SequenceKind::Z => SymExpr::int(i as i64),
        };
        let member = family.apply(vec![row_symbol.clone(), col]);
        rhs += if coeff == SymExpr::one() { member } else { coeff * member };
    }

    let next_row = row_symbol.clone() + SymExpr::one();
    let lhs = match kind {
        SequenceKind::A => family.apply(vec![next_row, col_symbol.clone() + SymExpr::one()]),
        SequenceKind::Z => family.apply(vec![next_row, SymExpr::zero()]),
    };
    Ok(Equation::new(lhs, rhs.downgrade()))
}

/// Builds the truncated series `family[0] + family[1] t + ... + family[order - 1] t^(order - 1)`
/// of an unknown sequence, then replaces the members with known initial values.
pub fn make_abstract_a_sequence(
    family: &Family,
    var: &SymExpr,
    order: usize,
    inits: &[(SymExpr, SymExpr)],
) -> SymExpr {
    let mut series = SymExpr::Add(Vec::new());
    for i in 0..order {
        let member = family.apply(vec![SymExpr::int(i as i64)]);
        series += match i {
            0 => member,
            1 => member * var.clone(),
            _ => member * var.clone().pow(i as i64),
        };
    }
    series.downgrade().subs(inits)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_parser::parser::{ast::{equation::Equation as AstEquation, expr::Expr as AstExpr}, Parser};
    use super::*;

    fn parse_expr(input: &str) -> SymExpr {
        let expr = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        SymExpr::from(expr)
    }

    fn parse_eq(input: &str) -> Equation {
        let eq = Parser::new(input).try_parse_full::<AstEquation>().unwrap();
        Equation::from(eq)
    }

    fn build(gf: &str, order: usize, kind: SequenceKind, left_offset: i64) -> Equation {
        build_rec_from_gf(
            &parse_expr(gf),
            &SymExpr::symbol("t"),
            order,
            &Family::Indexed("d".to_string()),
            kind,
            &SymExpr::symbol("n"),
            &SymExpr::symbol("k"),
            left_offset,
        ).unwrap()
    }

    #[test]
    fn pascal_sequences() {
        assert_eq!(build("1 + t", 3, SequenceKind::A, 0), parse_eq("d[n + 1, k + 1] = d[n, k] + d[n, k + 1]"));
        assert_eq!(build("1", 3, SequenceKind::Z, 0), parse_eq("d[n + 1, 0] = d[n, 0]"));
    }

    #[test]
    fn geometric_with_offset() {
        assert_eq!(
            build("1 / (1 - 2 t)", 3, SequenceKind::A, 1),
            parse_eq("d[n + 1, k + 1] = d[n, k - 1] + 2 d[n, k] + 4 d[n, k + 1]"),
        );
    }

    #[test]
    fn abstract_sequence() {
        let a = Family::Indexed("a".to_string());
        let t = SymExpr::symbol("t");
        let series = make_abstract_a_sequence(&a, &t, 3, &[]);
        assert_eq!(series.expand(), parse_expr("a[0] + a[1] t + a[2] t^2").expand());

        let inits = [(parse_expr("a[0]"), SymExpr::one())];
        let series = make_abstract_a_sequence(&a, &t, 3, &inits);
        assert_eq!(series.expand(), parse_expr("1 + a[1] t + a[2] t^2").expand());
    }
}
