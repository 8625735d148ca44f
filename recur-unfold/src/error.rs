//! Errors raised while unfolding and factoring recurrences.
//!
//! [`DestructuringError`] is the only recoverable one: it means a term does not have the shape
//! `coeff * family[subscripts]`, and call sites that expect such terms to show up skip them. Every
//! other error aborts the whole derivation.

use ariadne::Fmt;
use recur_attrs::ErrorKind;
use recur_error::{ErrorKind, EXPR};

/// The term is not of the form `coeff * family[subscripts]`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a multiple of a single term of `{}`", self.term, (&self.family).fg(EXPR)),
    help = "expected a term of the form `coeff * family[subscripts]`, where `coeff` does not contain the family",
)]
pub struct DestructuringError {
    /// The term, printed.
    pub term: String,

    /// The name of the family.
    pub family: String,
}

/// The recurrence equation does not have the expected shape.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("malformed recurrence: {}", self.reason),
    help = format!("the recurrence was: {}", self.equation),
)]
pub struct MalformedRecurrence {
    /// The equation, printed.
    pub equation: String,

    /// What is wrong with it.
    pub reason: String,
}

/// A Z-sequence was instantiated away from column zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the boundary recurrence can only be instantiated at column 0, not column {}", self.col),
    help = format!("the column subscript of its left-hand side is `{}`, which must be 0", self.lhs_col),
)]
pub struct BoundaryColumn {
    /// The requested column.
    pub col: i64,

    /// The column subscript of the left-hand side of the recurrence.
    pub lhs_col: String,
}

/// The system of equations of a row has no solution for the previous row.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("row {} provides no solution for `{}`", self.row, (&self.term).fg(EXPR)),
    help = "the recurrence cannot be inverted on this matrix; try another free variables location",
)]
pub struct InversionFailed {
    /// The row whose equations were solved.
    pub row: usize,

    /// The term of the previous row that could not be solved for.
    pub term: String,
}

/// The factorization does not reconstruct the matrix.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("row {} column {}: {} != {}", self.row, self.col, self.expected, self.found),
    help = "the weighted sum of the expansion matrices differs from the unfolded matrix at this entry",
)]
pub struct ExpansionMismatch {
    /// The row of the mismatched entry.
    pub row: usize,

    /// The column of the mismatched entry.
    pub col: usize,

    /// The entry of the unfolded matrix.
    pub expected: String,

    /// The entry of the reconstructed matrix.
    pub found: String,
}

/// Substituting the terms cache into itself did not reach a fixpoint.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the terms cache did not stabilize after {} iterations", self.max_iterations),
    help = "the cache may contain a cycle; increase the iteration cap if the cache is just large",
)]
pub struct FixpointNotReached {
    /// The iteration cap.
    pub max_iterations: usize,
}

/// More expansion terms were requested than the matrix has rows.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("an expansion with {} matrices was requested, but the matrix has {} rows", self.length, self.rows),
)]
pub struct LengthExceedsRows {
    /// The requested number of expansion terms.
    pub length: usize,

    /// The number of rows of the matrix.
    pub rows: usize,
}

/// A value that must be compared with others is not a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected a number, found `{}`", self.value),
    help = "base instantiation can only take the maximum of numeric subscripts",
)]
pub struct NonNumericValue {
    /// The value, printed.
    pub value: String,
}

/// The expansion has no matrix for a free variable it should have.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the expansion has no matrix for `{}`", (&self.var).fg(EXPR)),
)]
pub struct MissingFreeVariable {
    /// The free variable, printed.
    pub var: String,
}

/// The name of a free variables location is not recognized.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown free variables location `{}`", self.name),
    help = format!("expected one of {}, {} or {}", "column-zero".fg(EXPR), "diagonal".fg(EXPR), "last-row".fg(EXPR)),
)]
pub struct UnknownLocation {
    /// The name that was given.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use recur_error::Error;
    use super::*;

    fn rendered(err: impl ErrorKind + 'static) -> String {
        strip_ansi_escapes::strip_str(Error::from(err).render(""))
    }

    #[test]
    fn messages_name_the_terms() {
        let destructuring = rendered(DestructuringError { term: "g[n]".to_string(), family: "f".to_string() });
        assert!(destructuring.contains("`g[n]` is not a multiple of a single term of `f`"));

        let inversion = rendered(InversionFailed { row: 2, term: "T[1, 0]".to_string() });
        assert!(inversion.contains("row 2 provides no solution for `T[1, 0]`"));

        let missing = rendered(MissingFreeVariable { var: "T[0, 0]".to_string() });
        assert!(missing.contains("the expansion has no matrix for `T[0, 0]`"));
    }
}
