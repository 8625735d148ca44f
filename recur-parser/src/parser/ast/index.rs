use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym, parse_arguments},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use recur_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A term of an indexed family, such as `T[n, k]` or `d[n + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Index {
    /// The name of the family.
    pub name: LitSym,

    /// The subscripts of the term.
    pub indices: Vec<Expr>,

    /// The region of the source code that this term was parsed from.
    pub span: Range<usize>,
}

impl Index {
    /// Returns the span of the indexed term.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Index {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = LitSym::parse(input)?;
        let open = input.expect(TokenKind::OpenSquare, &[TokenKind::OpenSquare])?;
        let (indices, close) = parse_arguments(input, TokenKind::CloseSquare, open.span)?;
        let span = name.span.start..close.end;

        Ok(Self { name, indices, span })
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}
