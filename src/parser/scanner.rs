//! Token scanner for placeholder templates using logos
//!
//! The scanner only classifies characters; whether a token is meaningful
//! depends on the parser state (a `(` is plain text outside a placeholder).

use logos::Logos;

pub use crate::error::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[token("%")]
    Percent,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(",")]
    Comma,

    #[token("'")]
    SingleQuote,
    #[token("\"")]
    DoubleQuote,
    #[token("`")]
    BackQuote,

    /// Backslash followed by any character, newline included
    #[regex(r"\\[\s\S]", |lex| lex.slice().chars().nth(1))]
    Escape(char),
    /// Backslash at the very end of the input
    #[token("\\")]
    Backslash,

    #[regex(r"\s+")]
    Whitespace,
    #[regex(r#"[^%(),'"`\\\s]+"#)]
    Text,
}

/// Quote kinds recognized inside placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
    Back,
}

impl Token {
    /// The quote kind this token opens or closes, if any
    pub fn quote(self) -> Option<Quote> {
        match self {
            Token::SingleQuote => Some(Quote::Single),
            Token::DoubleQuote => Some(Quote::Double),
            Token::BackQuote => Some(Quote::Back),
            _ => None,
        }
    }
}

/// Tokenize input into (token, span) pairs
///
/// Lexing never fails: every character belongs to some token class, and a
/// slice the lexer cannot classify is reported as `Text`.
pub fn scan(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(result, span)| (result.unwrap_or(Token::Text), span))
}
