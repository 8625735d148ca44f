use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym, parse_arguments},
        error::{UnexpectedEof, UnexpectedToken},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function application, such as `f(n)` or `a(n + 1, k)`.
///
/// The opening parenthesis must immediately follow the function name; `k (n + 1)` is parsed as an
/// implicit multiplication instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the applied function.
    pub name: LitSym,

    /// The arguments of the application.
    pub args: Vec<Expr>,

    /// The region of the source code that this application was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Returns the span of the function application.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = LitSym::parse(input)?;
        match input.current_token().map(|token| token.kind) {
            Some(TokenKind::OpenParen) => (),
            Some(found) => return Err(input.error(UnexpectedToken {
                expected: &[TokenKind::OpenParen],
                found,
            })),
            None => return Err(input.error(UnexpectedEof)),
        }
        let open = input.next_token()?;
        let (args, close) = parse_arguments(input, TokenKind::CloseParen, open.span)?;
        let span = name.span.start..close.end;

        Ok(Self { name, args, span })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
