//! Writing a system of instantiated recurrences as a matrix equation.

use crate::destructure::{destructure, explode, Operator};
use recur_compute::symbolic::{Equation, Family, SymExpr, SymMatrix};
use std::collections::BTreeMap;

/// The matrix form `coefficients * terms = lhs` of a system of equations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixNotation {
    /// The coefficient of the member `terms[c]` in the right-hand side of equation `r`.
    pub coefficients: SymMatrix,

    /// The members of the family the columns stand for, as a column vector.
    pub terms: SymMatrix,

    /// The left-hand sides of the equations, as a column vector.
    pub lhs: SymMatrix,
}

/// Writes the equations as a matrix equation over the members of the family with the given
/// subscripts, in that order.
///
/// Summands of a right-hand side that are not a multiple of a single member are left out, as are
/// members whose subscripts are not listed in `order`.
pub fn to_matrix_notation(eqs: &[Equation], family: &Family, order: &[Vec<SymExpr>]) -> MatrixNotation {
    let combinations = eqs
        .iter()
        .map(|eq| {
            explode(&eq.rhs, Operator::Add, false)
                .iter()
                .filter_map(|summand| destructure(summand, family, &[]).ok())
                .map(|(coeff, subscripts)| (subscripts, coeff))
                .collect::<BTreeMap<_, _>>()
        })
        .collect::<Vec<_>>();

    let coefficients = SymMatrix::from_fn(eqs.len(), order.len(), |r, c| {
        combinations[r].get(&order[c]).cloned().unwrap_or_default()
    });
    let terms = SymMatrix::from_fn(order.len(), 1, |r, _| family.apply(order[r].clone()));
    let lhs = SymMatrix::from_fn(eqs.len(), 1, |r, _| eqs[r].lhs.clone());
    MatrixNotation { coefficients, terms, lhs }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_parser::parser::{ast::equation::Equation as AstEquation, Parser};
    use super::*;

    fn parse_eq(input: &str) -> Equation {
        let eq = Parser::new(input).try_parse_full::<AstEquation>().unwrap();
        Equation::from(eq)
    }

    #[test]
    fn pascal_row() {
        let eqs = [
            parse_eq("T[2, 0] = T[1, 0]"),
            parse_eq("T[2, 1] = T[1, 0] + T[1, 1]"),
            parse_eq("T[2, 2] = 3 T[1, 1] + x"),
        ];
        let order = vec![
            vec![SymExpr::int(1), SymExpr::int(0)],
            vec![SymExpr::int(1), SymExpr::int(1)],
        ];
        let notation = to_matrix_notation(&eqs, &Family::Indexed("T".to_string()), &order);
        assert_eq!(notation.coefficients.to_string(), "[1, 0; 1, 1; 0, 3]");
        assert_eq!(notation.terms.to_string(), "[T[1, 0]; T[1, 1]]");
        assert_eq!(notation.lhs.to_string(), "[T[2, 0]; T[2, 1]; T[2, 2]]");
    }
}
