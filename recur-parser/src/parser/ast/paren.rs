use crate::{
    parser::{ast::expr::Expr, Parse, Parser},
    tokenizer::TokenKind,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parenthesized expression, such as `(n + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this expression was parsed from, including the
    /// parentheses.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.expect(TokenKind::OpenParen, &[TokenKind::OpenParen])?;
        let expr = Expr::parse(input)?;
        let close = input.expect_closing(TokenKind::CloseParen, open.span.clone())?;

        Ok(Self {
            expr: Box::new(expr),
            span: open.span.start..close.span.end,
        })
    }
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.expr)
    }
}
