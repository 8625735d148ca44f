use crate::{
    parser::{error::UnexpectedToken, Parse, Parser},
    tokenizer::TokenKind,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, represented as a [`String`] so that arbitrarily large values survive
/// parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitInt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.expect(TokenKind::Int, &[TokenKind::Int])?;
        Ok(Self {
            value: token.lexeme.to_owned(),
            span: token.span,
        })
    }
}

impl fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol literal, such as `n` or `k`. Symbols are also the names of indexed families (`T` in
/// `T[n, k]`) and of applied functions (`f` in `f(n)`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.expect(TokenKind::Name, &[TokenKind::Name])?;
        Ok(Self {
            name: token.lexeme.to_owned(),
            span: token.span,
        })
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents a literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer literal.
    Integer(LitInt),

    /// A symbol / identifier literal.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_token().map(|token| token.kind) {
            Some(TokenKind::Int) => input.try_parse().map(Literal::Integer),
            Some(TokenKind::Name) => input.try_parse().map(Literal::Symbol),
            _ => {
                let token = input.next_token()?;
                Err(Error::new(vec![token.span], UnexpectedToken {
                    expected: &[TokenKind::Int, TokenKind::Name],
                    found: token.kind,
                }))
            },
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => int.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}
