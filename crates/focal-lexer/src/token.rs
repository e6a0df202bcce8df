//! Token types for the FOCAL lexer.
//!
//! Defines [`TokenKind`], the closed set of lexeme kinds a statement is made
//! of, [`Token`], which pairs a kind with a source [`Span`], and the
//! [`TokenSource`] trait the statement compilers pull tokens through.

use focal_types::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by a FOCAL lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Integer payload: the value of an integer literal, or the character
    /// code of a letter.
    pub fn int_value(&self) -> Option<i16> {
        match &self.kind {
            TokenKind::Integer(value) => Some(*value),
            TokenKind::Letter(ch) => Some(*ch as i16),
            _ => None,
        }
    }

    /// Raw lexeme of identifiers, number literals and text literals.
    ///
    /// For text literals this is the content between the quotes, escape
    /// sequences untouched.
    pub fn lexeme(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(s) | TokenKind::Number(s) | TokenKind::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for the token that ends a statement.
    pub fn is_end_of_line(&self) -> bool {
        self.kind == TokenKind::EndOfLine
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in a FOCAL statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Mnemonic or label name: `STO`, `X<>Y`, `1/X`
    Identifier(String),
    /// Register or flag number: `05`
    Integer(i16),
    /// Single-letter operand: stack register `X`, local label `A`
    Letter(char),
    /// `IND`
    Indirect,
    /// `,`
    Comma,
    /// `>` in front of a text literal that appends to the alpha register
    Append,
    /// Numeric literal at the start of a statement: `-12.3E4`
    Number(String),
    /// Text literal: `"HELLO"`
    Text(String),
    /// `// ...`
    Comment,
    /// End of the statement line (or of the source)
    EndOfLine,
}

impl TokenKind {
    /// Short human-readable name of the kind, for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Identifier(_) => "identifier",
            Self::Integer(_) => "integer",
            Self::Letter(_) => "letter",
            Self::Indirect => "IND",
            Self::Comma => "comma",
            Self::Append => "append marker",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Comment => "comment",
            Self::EndOfLine => "end of line",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s) | Self::Number(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Letter(c) => write!(f, "{c}"),
            Self::Indirect => write!(f, "IND"),
            Self::Comma => write!(f, ","),
            Self::Append => write!(f, ">"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Comment => write!(f, "//"),
            Self::EndOfLine => write!(f, "end of line"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenSource
// ─────────────────────────────────────────────────────────────────────

/// Anything that hands out tokens one at a time.
///
/// Once a statement's tokens are exhausted, implementations keep returning
/// [`TokenKind::EndOfLine`].
pub trait TokenSource {
    fn next_token(&mut self) -> Token;

    /// The program text of a 1-based line, for attaching to errors.
    ///
    /// Sources without program text (hand-built tokens) return `None`.
    fn source_line(&self, _line: u32) -> Option<&str> {
        None
    }
}

/// A [`TokenSource`] over tokens that were produced up front.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    last_span: Span,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            last_span: Span::point(1, 1),
        }
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.last_span = token.span;
                token
            }
            None => Token::new(TokenKind::EndOfLine, self.last_span),
        }
    }
}
