use crate::{
    parser::{ast::expr::Expr, Parse, Parser},
    tokenizer::TokenKind,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An equation `lhs = rhs`, the written form of a recurrence relation or of a boundary condition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side of the equation.
    pub lhs: Expr,

    /// The right-hand side of the equation.
    pub rhs: Expr,

    /// The region of the source code that this equation was parsed from.
    pub span: Range<usize>,
}

impl Parse for Equation {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = Expr::parse(input)?;
        input.expect(TokenKind::Assign, &[TokenKind::Assign])?;
        let rhs = Expr::parse(input)?;
        let span = lhs.span().start..rhs.span().end;

        Ok(Self { lhs, rhs, span })
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
