//! Truncated power series.

use crate::primitive::int;
use crate::symbolic::{
    error::{SeriesNotInvertible, UnsupportedSeries},
    expr::{Primary, SymExpr},
    poly::Polynomial,
};
use recur_error::Error;

/// A power series truncated to a fixed number of coefficients.
type Series = Vec<Polynomial>;

/// Returns the first `count` coefficients of the power series of `expr` around `var = 0`.
///
/// Coefficients may contain other symbols. Supported expressions are sums, products and integer
/// powers of expressions that are polynomial in `var`; negative powers require the constant term
/// of their base to be non-zero.
pub fn series_coefficients(expr: &SymExpr, var: &SymExpr, count: usize) -> Result<Vec<SymExpr>, Error> {
    Ok(series(expr, var, count)?
        .iter()
        .map(Polynomial::to_expr)
        .collect())
}

fn series(expr: &SymExpr, var: &SymExpr, count: usize) -> Result<Series, Error> {
    if expr == var {
        let mut result = constant(Polynomial::zero(), count);
        if count > 1 {
            result[1] = Polynomial::constant(int(1));
        }
        return Ok(result);
    }

    if !expr.contains(var) {
        return Ok(constant(Polynomial::from_expr(expr), count));
    }

    match expr {
        SymExpr::Add(terms) => terms.iter().try_fold(constant(Polynomial::zero(), count), |acc, term| {
            let term = series(term, var, count)?;
            Ok(acc.into_iter().zip(term).map(|(a, b)| a + b).collect())
        }),
        SymExpr::Mul(factors) => factors.iter().try_fold(one(count), |acc, factor| {
            Ok(mul(&acc, &series(factor, var, count)?))
        }),
        SymExpr::Exp(base, exp) => {
            let Some(n) = exp.expand().as_integer() else {
                return Err(unsupported(expr, var));
            };

            let base_series = series(base, var, count)?;
            let base_series = if n < 0 { recip(&base_series, base)? } else { base_series };
            Ok((0..n.unsigned_abs()).fold(one(count), |acc, _| mul(&acc, &base_series)))
        },
        SymExpr::Primary(Primary::Number(_) | Primary::Symbol(_) | Primary::Indexed(..) | Primary::Call(..)) => {
            Err(unsupported(expr, var))
        },
    }
}

fn unsupported(expr: &SymExpr, var: &SymExpr) -> Error {
    UnsupportedSeries {
        expr: expr.to_string(),
        var: var.to_string(),
    }.into()
}

fn constant(value: Polynomial, count: usize) -> Series {
    let mut result = vec![Polynomial::zero(); count];
    if let Some(first) = result.first_mut() {
        *first = value;
    }
    result
}

fn one(count: usize) -> Series {
    constant(Polynomial::constant(int(1)), count)
}

/// Cauchy product of two series, truncated.
fn mul(a: &Series, b: &Series) -> Series {
    let count = a.len();
    (0..count)
        .map(|k| {
            (0..=k).fold(Polynomial::zero(), |acc, j| acc + &a[j] * &b[k - j])
        })
        .collect()
}

/// Reciprocal of a series, computed coefficient by coefficient from `b * c = 1`.
fn recip(b: &Series, expr: &SymExpr) -> Result<Series, Error> {
    let Some(b0) = b.first() else {
        return Ok(Vec::new());
    };
    if b0.is_zero() {
        return Err(SeriesNotInvertible { expr: expr.to_string() }.into());
    }

    let inverse = b0.recip();
    let mut c: Series = Vec::with_capacity(b.len());
    c.push(inverse.clone());
    for k in 1..b.len() {
        let sum = (1..=k).fold(Polynomial::zero(), |acc, j| acc + &b[j] * &c[k - j]);
        c.push(-(&sum * &inverse));
    }
    Ok(c)
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
    fn geometric_series() {
        let t = SymExpr::symbol("t");
        let coeffs = series_coefficients(&parse_expr("1 / (1 - t)"), &t, 4).unwrap();
        assert_eq!(coeffs, vec![SymExpr::one(); 4]);
    }

    #[test]
    fn squared_reciprocal() {
        let t = SymExpr::symbol("t");
        let coeffs = series_coefficients(&parse_expr("(1 - t)^-2"), &t, 4).unwrap();
        assert_eq!(coeffs, vec![SymExpr::int(1), SymExpr::int(2), SymExpr::int(3), SymExpr::int(4)]);
    }

    #[test]
    fn symbolic_coefficients() {
        let t = SymExpr::symbol("t");
        let coeffs = series_coefficients(&parse_expr("a + b t + t^2"), &t, 4).unwrap();
        assert_eq!(coeffs, vec![
            SymExpr::symbol("a"),
            SymExpr::symbol("b"),
            SymExpr::one(),
            SymExpr::zero(),
        ]);
    }

    #[test]
    fn not_invertible() {
        let t = SymExpr::symbol("t");
        let err = series_coefficients(&parse_expr("1 / t"), &t, 3).unwrap_err();
        assert!(err.is::<SeriesNotInvertible>());

        let err = series_coefficients(&parse_expr("f(t)"), &t, 3).unwrap_err();
        assert!(err.is::<UnsupportedSeries>());
    }
}
