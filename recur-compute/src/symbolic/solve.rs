//! Solving linear equations and systems of linear equations.
//!
//! Recurrences only ever need linear solving: aligning a subscript such as `n + 1` with a row
//! number, and expressing the terms of one row of a triangle through the terms of the next.
//! Coefficients may be any polynomial that does not contain the unknowns; pivots are chosen among
//! constant coefficients first, so that divisions by symbolic quantities are avoided whenever
//! possible.

use crate::symbolic::{
    equation::Equation,
    error::{InconsistentSystem, NoSolution, NonLinear},
    expr::SymExpr,
    poly::Polynomial,
};
use log::trace;
use recur_error::Error;

/// Solves `lhs = rhs` for `var`, which must appear linearly.
pub fn solve_linear(lhs: &SymExpr, rhs: &SymExpr, var: &SymExpr) -> Result<SymExpr, Error> {
    let residual = Polynomial::from_expr(&(lhs.clone() - rhs.clone()));
    let printed = || format!("{} = {}", lhs, rhs);
    let (linear, rest) = residual.split_linear(var).ok_or_else(|| NonLinear {
        var: var.to_string(),
        equation: printed(),
    })?;

    if linear.is_zero() {
        return Err(NoSolution {
            var: var.to_string(),
            equation: printed(),
        }.into());
    }

    Ok((-rest * linear.recip()).to_expr())
}

/// One row of the augmented matrix of a linear system.
#[derive(Debug, Clone)]
struct Row {
    /// Coefficients of the unknowns.
    coeffs: Vec<Polynomial>,

    /// Right-hand side, which may contain the parameters of the system.
    rhs: Polynomial,
}

/// Solves a system of linear equations for the given unknowns by Gauss-Jordan elimination.
///
/// Returns a pair `(unknown, value)` for every unknown that could be solved for, in the order the
/// unknowns were given. Unknowns without a pivot are left free: they act as parameters and may
/// appear in the values of the others. Every other symbol in the equations is a parameter too.
pub fn solve_linear_system(
    equations: &[Equation],
    unknowns: &[SymExpr],
) -> Result<Vec<(SymExpr, SymExpr)>, Error> {
    let mut rows = equations
        .iter()
        .map(|eq| to_row(eq, unknowns))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pivots = Vec::new();
    let mut next_row = 0;
    for col in 0..unknowns.len() {
        if next_row == rows.len() {
            break;
        }

        // prefer a constant pivot, then any non-zero one
        let candidates = next_row..rows.len();
        let pivot = candidates
            .clone()
            .find(|&r| rows[r].coeffs[col].as_constant().map_or(false, |c| c != 0))
            .or_else(|| candidates.clone().find(|&r| !rows[r].coeffs[col].is_zero()));
        let Some(pivot) = pivot else {
            continue;
        };

        rows.swap(next_row, pivot);
        let inverse = rows[next_row].coeffs[col].recip();
        let normalized = scale_row(&rows[next_row], &inverse);
        rows[next_row] = normalized;
        rows[next_row].coeffs[col] = Polynomial::constant(crate::primitive::int(1));

        for r in 0..rows.len() {
            if r == next_row || rows[r].coeffs[col].is_zero() {
                continue;
            }
            let factor = rows[r].coeffs[col].clone();
            let eliminated = subtract_scaled(&rows[r], &rows[next_row], &factor);
            rows[r] = eliminated;
            rows[r].coeffs[col] = Polynomial::zero();
        }

        trace!("pivot on {} in row {}", unknowns[col], next_row);
        pivots.push((col, next_row));
        next_row += 1;
    }

    if let Some(row) = rows[next_row..].iter().find(|row| !row.rhs.is_zero()) {
        return Err(InconsistentSystem { residual: row.rhs.to_expr().to_string() }.into());
    }

    let mut solutions = pivots
        .into_iter()
        .map(|(col, r)| {
            // the value of the pivot unknown is the rhs minus the free unknowns' contributions
            let row = &rows[r];
            let value = row.coeffs
                .iter()
                .zip(unknowns)
                .enumerate()
                .filter(|(c, (coeff, _))| *c != col && !coeff.is_zero())
                .fold(row.rhs.clone(), |acc, (_, (coeff, unknown))| {
                    acc - coeff * &Polynomial::atom(unknown.clone())
                });
            (col, value)
        })
        .collect::<Vec<_>>();
    solutions.sort_by_key(|(col, _)| *col);

    Ok(solutions
        .into_iter()
        .map(|(col, value)| (unknowns[col].clone(), value.to_expr()))
        .collect())
}

/// Converts an equation into a row of the augmented matrix.
fn to_row(eq: &Equation, unknowns: &[SymExpr]) -> Result<Row, Error> {
    let mut rest = Polynomial::from_expr(&(eq.lhs.clone() - eq.rhs.clone()));
    let mut coeffs = Vec::with_capacity(unknowns.len());
    for unknown in unknowns {
        let (linear, remaining) = rest.split_linear(unknown).ok_or_else(|| NonLinear {
            var: unknown.to_string(),
            equation: eq.to_string(),
        })?;
        coeffs.push(linear);
        rest = remaining;
    }

    // `lhs - rhs = 0` means the unknowns' side equals `-rest`
    Ok(Row { coeffs, rhs: -rest })
}

fn scale_row(row: &Row, factor: &Polynomial) -> Row {
    Row {
        coeffs: row.coeffs.iter().map(|c| c * factor).collect(),
        rhs: &row.rhs * factor,
    }
}

/// Returns `row - factor * pivot`.
fn subtract_scaled(row: &Row, pivot: &Row, factor: &Polynomial) -> Row {
    Row {
        coeffs: row.coeffs
            .iter()
            .zip(&pivot.coeffs)
            .map(|(a, b)| a.clone() - factor * b)
            .collect(),
        rhs: row.rhs.clone() - factor * &pivot.rhs,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_parser::parser::{ast::{equation::Equation as AstEquation, expr::Expr as AstExpr}, Parser};
    use crate::symbolic::error::{InconsistentSystem, NoSolution, NonLinear};
    use super::*;

    fn parse_expr(input: &str) -> SymExpr {
        let expr = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        SymExpr::from(expr)
    }

    fn parse_eq(input: &str) -> Equation {
        let eq = Parser::new(input).try_parse_full::<AstEquation>().unwrap();
        Equation::from(eq)
    }

    #[test]
    fn solve_offset() {
        let n = SymExpr::symbol("n");
        let solution = solve_linear(&parse_expr("n + 1"), &SymExpr::int(5), &n).unwrap();
        assert_eq!(solution, SymExpr::int(4));

        let solution = solve_linear(&parse_expr("2 n - k"), &SymExpr::int(3), &n).unwrap();
        assert_eq!(solution, parse_expr("(1/2) k + 3/2").expand());
    }

    #[test]
    fn solve_failures() {
        let n = SymExpr::symbol("n");
        let err = solve_linear(&parse_expr("n^2"), &SymExpr::int(4), &n).unwrap_err();
        assert!(err.is::<NonLinear>());

        let err = solve_linear(&parse_expr("n + 1"), &n, &n).unwrap_err();
        assert!(err.is::<NoSolution>());
    }

    #[test]
    fn system_with_unique_solution() {
        let eqs = [parse_eq("x + y = 3"), parse_eq("x - y = 1")];
        let unknowns = [SymExpr::symbol("x"), SymExpr::symbol("y")];
        let solutions = solve_linear_system(&eqs, &unknowns).unwrap();
        assert_eq!(solutions, vec![
            (SymExpr::symbol("x"), SymExpr::int(2)),
            (SymExpr::symbol("y"), SymExpr::int(1)),
        ]);
    }

    #[test]
    fn system_of_indexed_terms() {
        // one row of Pascal's triangle expressed through the next one
        let eqs = [
            parse_eq("T[2, 0] = T[1, 0]"),
            parse_eq("T[2, 1] = T[1, 0] + T[1, 1]"),
        ];
        let unknowns = [parse_expr("T[1, 0]"), parse_expr("T[1, 1]")];
        let solutions = solve_linear_system(&eqs, &unknowns).unwrap();
        assert_eq!(solutions, vec![
            (parse_expr("T[1, 0]"), parse_expr("T[2, 0]")),
            (parse_expr("T[1, 1]"), parse_expr("T[2, 1] - T[2, 0]").expand()),
        ]);
    }

    #[test]
    fn underdetermined_system() {
        let eqs = [parse_eq("x + y = 1")];
        let unknowns = [SymExpr::symbol("x"), SymExpr::symbol("y")];
        let solutions = solve_linear_system(&eqs, &unknowns).unwrap();
        assert_eq!(solutions, vec![
            (SymExpr::symbol("x"), parse_expr("1 - y").expand()),
        ]);
    }

    #[test]
    fn inconsistent_system() {
        let eqs = [parse_eq("x + y = 1"), parse_eq("2 x + 2 y = 3")];
        let unknowns = [SymExpr::symbol("x"), SymExpr::symbol("y")];
        let err = solve_linear_system(&eqs, &unknowns).unwrap_err();
        assert!(err.is::<InconsistentSystem>());
    }
}
