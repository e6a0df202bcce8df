//! FOCAL statement lexer.
//!
//! Features:
//! - One statement per line; every line ends in an [`TokenKind::EndOfLine`]
//! - Numeric literals are only recognised as the first token of a line;
//!   further digit runs are register/flag numbers
//! - Text literals are kept raw, escape sequences are left to the codec
//! - `//` comments
//! - Error recovery: errors are collected, lexing continues
//!
//! Columns are counted in characters.

use focal_types::{ErrorCode, FocalError, SourceFile, Span};

use crate::token::{Token, TokenKind, TokenSource};

/// The FOCAL lexer.
///
/// Hands out tokens on demand through [`TokenSource`], or lexes the whole
/// file at once with [`Lexer::lex`].
pub struct Lexer<'src> {
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// The full source text.
    chars: Vec<char>,
    /// Current character offset into `chars`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// No token has been produced on the current line yet.
    at_statement_start: bool,
    /// Collected errors.
    errors: Vec<FocalError>,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::EndOfLine`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: Vec<FocalError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source_file,
            chars: source_file.source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            at_statement_start: true,
            errors: Vec::new(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan();
            let done = token.is_end_of_line() && self.at_end();
            tokens.push(token);
            if done {
                break;
            }
        }
        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    /// Lex up to and including the next end of line.
    pub fn lex_line(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan();
            let done = token.is_end_of_line();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Errors collected so far.
    pub fn errors(&self) -> &[FocalError] {
        &self.errors
    }

    /// Returns `true` once the whole source has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = FocalError::new(code, message, span).with_source_line(source_line);
        self.errors.push(err);
    }

    /// Whitespace, line ends, separators and quotes end a word.
    fn is_delimiter(ch: Option<char>) -> bool {
        match ch {
            None => true,
            Some(c) => c.is_whitespace() || c == ',' || c == '"',
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token.
    fn scan(&mut self) -> Token {
        self.skip_whitespace();

        let start_line = self.line;
        let start_col = self.col;

        let Some(ch) = self.peek() else {
            self.at_statement_start = true;
            return Token::new(TokenKind::EndOfLine, self.current_span());
        };

        let kind = match ch {
            '\n' => {
                self.advance();
                self.at_statement_start = true;
                return Token::new(TokenKind::EndOfLine, Span::point(start_line, start_col));
            }
            '/' if self.peek_at(1) == Some('/') => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                TokenKind::Comment
            }
            '"' => self.scan_text(start_line, start_col),
            '>' => {
                self.advance();
                TokenKind::Append
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            _ if self.at_statement_start && self.starts_number() => {
                self.scan_number().unwrap_or_else(|| self.scan_word())
            }
            '0'..='9' => self.scan_integer(start_line, start_col),
            _ => self.scan_word(),
        };

        self.at_statement_start = false;
        Token::new(kind, self.span_from(start_line, start_col))
    }

    fn starts_number(&self) -> bool {
        let digit_at = |offset| self.peek_at(offset).is_some_and(|c: char| c.is_ascii_digit());
        match self.peek() {
            Some('0'..='9') => true,
            Some('.') => digit_at(1),
            Some('-') => digit_at(1) || (self.peek_at(1) == Some('.') && digit_at(2)),
            _ => false,
        }
    }

    fn consume_digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            count += 1;
        }
        count
    }

    /// `[-]digits[.digits][(E|e)[-]digits]`
    ///
    /// Returns `None` (with the cursor restored) if the lexeme runs on into
    /// a word, as in `1/X` or `10^X`.
    fn scan_number(&mut self) -> Option<TokenKind> {
        let (pos, line, col) = (self.pos, self.line, self.col);

        if self.peek() == Some('-') {
            self.advance();
        }
        self.consume_digits();
        if self.peek() == Some('.') {
            self.advance();
            self.consume_digits();
        }
        if matches!(self.peek(), Some('E' | 'e')) {
            let exponent_digit = match self.peek_at(1) {
                Some('-') => self.peek_at(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                if self.peek() == Some('-') {
                    self.advance();
                }
                self.consume_digits();
            }
        }

        if !Self::is_delimiter(self.peek()) {
            self.pos = pos;
            self.line = line;
            self.col = col;
            return None;
        }
        Some(TokenKind::Number(self.chars[pos..self.pos].iter().collect()))
    }

    fn scan_integer(&mut self, start_line: u32, start_col: u32) -> TokenKind {
        let start = self.pos;
        self.consume_digits();
        if !Self::is_delimiter(self.peek()) {
            self.pos = start;
            self.col = start_col;
            return self.scan_word();
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        match text.parse::<i16>() {
            Ok(value) => TokenKind::Integer(value),
            Err(_) => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INVALID_INTEGER,
                    format!("Integer {text} out of range at {span}"),
                    span,
                );
                TokenKind::Integer(0)
            }
        }
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;
        while !Self::is_delimiter(self.peek()) {
            self.advance();
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => TokenKind::Letter(c),
            _ if word == "IND" => TokenKind::Indirect,
            _ => TokenKind::Identifier(word),
        }
    }

    /// Scan a text literal starting at the opening `"`.
    fn scan_text(&mut self, start_line: u32, start_col: u32) -> TokenKind {
        self.advance(); // opening quote
        let mut buf = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_TEXT,
                        format!("Unterminated text literal starting at {span}"),
                        span,
                    );
                    return TokenKind::Text(buf);
                }
                Some('"') => {
                    self.advance();
                    return TokenKind::Text(buf);
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        self.scan()
    }

    fn source_line(&self, line: u32) -> Option<&str> {
        self.source_file.line(line)
    }
}
