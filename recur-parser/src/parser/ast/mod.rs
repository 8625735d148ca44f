pub mod binary;
pub mod call;
pub mod equation;
pub mod expr;
pub mod index;
pub mod literal;
pub mod paren;
pub mod unary;

use crate::{
    parser::{error::EmptyArguments, Parser, Parse},
    tokenizer::TokenKind,
};
use expr::Expr;
use recur_error::Error;
use std::ops::Range;

/// Parses a comma-separated, non-empty list of expressions closed by the given bracket, assuming
/// the opening bracket (at `opening`) has already been consumed.
///
/// Returns the expressions and the span of the closing bracket.
pub(crate) fn parse_arguments(
    input: &mut Parser,
    close: TokenKind,
    opening: Range<usize>,
) -> Result<(Vec<Expr>, Range<usize>), Error> {
    if input.peek_token().map_or(false, |token| token.kind == close) {
        let token = input.next_token()?;
        return Err(Error::new(vec![opening.start..token.span.end], EmptyArguments));
    }

    let mut args = vec![Expr::parse(input)?];
    while input.peek_token().map_or(false, |token| token.kind == TokenKind::Comma) {
        input.next_token()?;
        args.push(Expr::parse(input)?);
    }

    let closing = input.expect_closing(close, opening)?;
    Ok((args, closing.span))
}
