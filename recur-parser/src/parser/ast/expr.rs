use crate::parser::{
    ast::{
        binary::Binary,
        call::Call,
        index::Index,
        literal::Literal,
        paren::Paren,
        unary::Unary,
    },
    Parse,
    Parser,
    Precedence,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression that can appear on either side of a recurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(n + 1)`.
    Paren(Paren),

    /// A function application, such as `f(n + 1)`.
    Call(Call),

    /// A term of an indexed family, such as `T[n, k]`.
    Index(Index),

    /// A unary operation, such as `-n`.
    Unary(Unary),

    /// A binary operation, such as `n + 1`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Index(index) => index.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Index(index) => index.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}
