pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(Ok(kind)) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn indexed_term() {
        compare_tokens(
            "T[n+1, k]",
            [
                (TokenKind::Name, "T"),
                (TokenKind::OpenSquare, "["),
                (TokenKind::Name, "n"),
                (TokenKind::Add, "+"),
                (TokenKind::Int, "1"),
                (TokenKind::Comma, ","),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "k"),
                (TokenKind::CloseSquare, "]"),
            ],
        );
    }

    #[test]
    fn recurrence() {
        compare_tokens(
            "f(n+2) = f(n) + 2n $",
            [
                (TokenKind::Name, "f"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "n"),
                (TokenKind::Add, "+"),
                (TokenKind::Int, "2"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Assign, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "f"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "n"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Name, "n"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
            ],
        );
    }

    #[test]
    fn complete_spans() {
        let tokens = tokenize_complete("a^2");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Exp);
        assert_eq!(tokens[1].span, 1..2);
        assert_eq!(tokens[2].lexeme, "2");
    }
}
