use ariadne::Fmt;
use recur_attrs::ErrorKind;
use recur_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// Expected to see a certain kind of expression here.
///
/// The `expected` field should also contain the word "a" or "an" at the beginning to make the
/// error grammatically correct.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected {}", self.expected),
    labels = [format!("I expected to see {} here", self.expected)],
)]
pub struct ExpectedExpr {
    /// The kind of expression that was expected.
    pub expected: &'static str,
}

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of file",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of file",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", self.expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", self.found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A bracket (parenthesis or square bracket) was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed bracket",
    labels = ["this bracket is not closed"],
    help = if self.opening {
        "add a closing bracket after the last argument"
    } else {
        "remove this bracket, or add an opening bracket before it"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the unclosed bracket is the opening one.
    pub opening: bool,
}

/// A subscript or argument list was empty, as in `T[]` or `f()`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty argument list",
    labels = ["add at least one expression here"],
    help = format!("indexed terms and function applications, such as {}, need arguments", "T[n, k]".fg(EXPR)),
)]
pub struct EmptyArguments;
