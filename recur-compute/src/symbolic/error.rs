//! Errors raised by the symbolic engine. None of them originate from source code, so their
//! reports carry no labels.

use ariadne::Fmt;
use recur_attrs::ErrorKind;
use recur_error::{ErrorKind, EXPR};

/// The equation is not linear in the variable to solve for.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the equation is not linear in `{}`", (&self.var).fg(EXPR)),
    help = format!("the equation was: {}", self.equation),
)]
pub struct NonLinear {
    /// The variable to solve for.
    pub var: String,

    /// The equation, printed.
    pub equation: String,
}

/// The equation has no solution for the variable, such as `n + 1 = n`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("no solution for `{}`", (&self.var).fg(EXPR)),
    help = format!("the equation was: {}", self.equation),
)]
pub struct NoSolution {
    /// The variable to solve for.
    pub var: String,

    /// The equation, printed.
    pub equation: String,
}

/// A system of linear equations has no solution.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the system of equations is inconsistent",
    help = format!("after elimination, this equation remained: 0 = {}", self.residual),
)]
pub struct InconsistentSystem {
    /// The non-zero right-hand side left over after elimination.
    pub residual: String,
}

/// The constant term of a series is zero, so the series has no reciprocal.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot invert a series whose constant term is zero: {}", self.expr),
    help = "a power series is invertible only if its constant term is not zero",
)]
pub struct SeriesNotInvertible {
    /// The series that was inverted.
    pub expr: String,
}

/// The expression cannot be expanded as a power series in the variable.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot expand `{}` as a power series in `{}`", self.expr, (&self.var).fg(EXPR)),
    help = "only sums, products, and integer powers of polynomials in the variable are supported",
)]
pub struct UnsupportedSeries {
    /// The offending sub-expression.
    pub expr: String,

    /// The variable of the series.
    pub var: String,
}

/// The expression is neither an indexed base nor an undefined function.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a family of terms", self.expr),
    help = format!("use an indexed term such as {} or a function such as {}", "T[n, k]".fg(EXPR), "f(n)".fg(EXPR)),
)]
pub struct UnsupportedFamily {
    /// The offending expression.
    pub expr: String,
}

/// Two matrices with different dimensions were combined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "matrix dimensions do not match",
    help = format!("the matrices are {}x{} and {}x{}", self.lhs.0, self.lhs.1, self.rhs.0, self.rhs.1),
)]
pub struct DimensionMismatch {
    /// The dimensions of the left operand.
    pub lhs: (usize, usize),

    /// The dimensions of the right operand.
    pub rhs: (usize, usize),
}
