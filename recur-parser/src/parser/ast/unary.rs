use crate::{
    parser::{
        ast::{binary::Binary, call::Call, expr::Expr, index::Index, literal::Literal, paren::Paren},
        error::{ExpectedExpr, UnclosedParenthesis},
        token::op::UnaryOp,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-n`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression.
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary expression, or lower precedence expressions (a single operand).
    ///
    /// The operand of a negation extends over any exponentiation that follows it, so `-n^2`
    /// negates `n^2`.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        if input.peek_token().map_or(false, |token| token.kind == TokenKind::Sub) {
            let op = UnaryOp::parse(input)?;
            let operand = Self::parse_or_lower(input)?;
            let operand = Binary::parse_expr(input, operand, op.kind.precedence())?;
            let span = op.span.start..operand.span().end;
            return Ok(Expr::Unary(Unary {
                operand: Box::new(operand),
                op,
                span,
            }));
        }

        Self::parse_operand(input)
    }

    /// Parses a single operand: a literal, a parenthesized expression, an indexed term, or a
    /// function application.
    fn parse_operand(input: &mut Parser) -> Result<Expr, Error> {
        let Some(token) = input.peek_token().cloned() else {
            return Err(input.error(ExpectedExpr { expected: "an expression" }));
        };

        match token.kind {
            TokenKind::Int => Literal::parse(input).map(Expr::Literal),
            TokenKind::OpenParen => Paren::parse(input).map(Expr::Paren),
            TokenKind::CloseParen | TokenKind::CloseSquare => {
                Err(Error::new(vec![token.span], UnclosedParenthesis { opening: false }))
            },
            TokenKind::Name => {
                // the token after the name decides what kind of operand this is
                let mut ahead = input.clone();
                ahead.next_token()?;
                let adjacent = ahead.current_token().map(|token| token.kind);
                let following = ahead.peek_token().map(|token| token.kind);

                if adjacent == Some(TokenKind::OpenParen) {
                    Call::parse(input).map(Expr::Call)
                } else if following == Some(TokenKind::OpenSquare) {
                    Index::parse(input).map(Expr::Index)
                } else {
                    Literal::parse(input).map(Expr::Literal)
                }
            },
            _ => Err(Error::new(vec![token.span], ExpectedExpr { expected: "an expression" })),
        }
    }
}

impl Parse for Unary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match Self::parse_or_lower(input)? {
            Expr::Unary(unary) => Ok(unary),
            expr => Err(Error::new(vec![expr.span()], ExpectedExpr { expected: "a negation" })),
        }
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.op, self.operand)
    }
}
