pub mod ast;
pub mod error;
pub mod fmt;
pub mod token;

use error::{ExpectedEof, UnexpectedEof, UnexpectedToken, UnclosedParenthesis};
use recur_error::{Error, ErrorKind};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A high-level parser for recurrence relations. This is the type to use to parse an arbitrary
/// piece of input into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token, without skipping whitespace. The cursor is not moved. Returns
    /// [`None`] if the cursor is at the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the next non-whitespace token, without moving the cursor.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(UnexpectedEof))
    }

    /// Consumes the next token, which must be of the given kind.
    pub fn expect(&mut self, kind: TokenKind, expected: &'static [TokenKind]) -> Result<Token<'source>, Error> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Error::new(vec![token.span], UnexpectedToken { expected, found: token.kind }))
        }
    }

    /// Consumes the closing bracket of the given kind. If the stream ends before it, the error
    /// points at the opening bracket instead.
    pub fn expect_closing(&mut self, kind: TokenKind, opening: Range<usize>) -> Result<Token<'source>, Error> {
        if self.peek_token().is_none() {
            return Err(Error::new(vec![opening], UnclosedParenthesis { opening: true }));
        }

        match kind {
            TokenKind::CloseSquare => self.expect(kind, &[TokenKind::Comma, TokenKind::CloseSquare]),
            _ => self.expect(kind, &[TokenKind::Comma, TokenKind::CloseParen]),
        }
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser (trailing whitespace excepted); if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        while self.current_token().map_or(false, Token::is_whitespace) {
            self.cursor += 1;
        }

        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            Err(self.error(ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// `a op b op c` is parsed as `(a op b) op c`.
    Left,

    /// `a op b op c` is parsed as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors. Implicit
    /// multiplication shares this precedence.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}
