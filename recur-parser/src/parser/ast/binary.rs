use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::ExpectedExpr,
    token::op::{BinOp, BinOpKind},
    Associativity,
    Parse,
    Parser,
    Precedence,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `n + 1`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the operator that follows, without consuming it.
    ///
    /// If there is no explicit operator, but the next token can start an operand (as in `2n` or
    /// `k(n + 1)`), an implicit multiplication operator is returned. Its span is filled in once
    /// the right-hand side is known.
    fn peek_op(input: &Parser) -> Option<BinOp> {
        let token = input.peek_token()?;
        if let Some(kind) = BinOpKind::from_token(token.kind) {
            Some(BinOp { kind, implicit: false, span: token.span.clone() })
        } else if token.kind.starts_implicit_operand() {
            Some(BinOp { kind: BinOpKind::Mul, implicit: true, span: token.span.start..token.span.start })
        } else {
            None
        }
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there are binary operators and right-hand-sides with at least the given precedence.
    ///
    /// If we are parsing the expression `1 + 2 * 3`, we will first parse the left-hand-side `1`,
    /// then the operator `+`, then the right-hand-side `2`. Before building the `1 + 2` node, we
    /// check if the operator after `2` binds tighter than `+`. It does, so the right-hand-side is
    /// extended to `2 * 3` by calling into this function again, with `2` as the left-hand-side.
    ///
    /// Implicit multiplication takes part as an operator with the precedence of `*`.
    pub fn parse_expr(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        while let Some(mut op) = Self::peek_op(input).filter(|op| op.precedence() >= precedence) {
            if !op.implicit {
                input.next_token()?;
            }

            let mut rhs = Unary::parse_or_lower(input)?;
            while let Some(next) = Self::peek_op(input) {
                if next.precedence() > op.precedence()
                    || (next.precedence() == op.precedence() && next.associativity() == Associativity::Right)
                {
                    rhs = Self::parse_expr(input, rhs, next.precedence())?;
                } else {
                    break;
                }
            }

            if op.implicit {
                op.span = lhs.span().end..rhs.span().start;
            }
            let span = lhs.span().start..rhs.span().end;
            lhs = Expr::Binary(Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
                span,
            });
        }

        Ok(lhs)
    }
}

impl Parse for Binary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match Expr::parse(input)? {
            Expr::Binary(binary) => Ok(binary),
            expr => Err(Error::new(vec![expr.span()], ExpectedExpr { expected: "a binary expression" })),
        }
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.lhs, self.op, self.rhs)
    }
}
