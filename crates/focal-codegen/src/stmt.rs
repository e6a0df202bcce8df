//! Statement dispatch.
//!
//! A statement is classified from its first token into one [`Statement`]
//! variant; [`compile_statement`] then runs the matching code generator.

use focal_lexer::{Token, TokenKind, TokenSource};
use focal_types::{ErrorCode, FocalError};

use crate::number::compile_number;
use crate::text::{compile_text, compile_text_append};
use crate::CompileResult;

/// Every statement kind the compiler can generate code for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `-12.3E4`
    Number(Token),
    /// `"HELLO"`
    Text(Token),
    /// `>"HELLO"`; the text literal is pulled from the token source.
    AppendText,
}

impl Statement {
    /// Classify a statement by its first token.
    pub fn classify(token: Token) -> Result<Self, FocalError> {
        match token.kind {
            TokenKind::Number(_) => Ok(Self::Number(token)),
            TokenKind::Text(_) => Ok(Self::Text(token)),
            TokenKind::Append => Ok(Self::AppendText),
            _ => Err(FocalError::new(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("Unsupported statement \"{}\" at {}", token.kind, token.span),
                token.span,
            )),
        }
    }
}

/// Generate the byte code of one statement.
pub fn compile_statement<S>(statement: &Statement, tokens: &mut S) -> CompileResult
where
    S: TokenSource + ?Sized,
{
    match statement {
        Statement::Number(token) => compile_number(token),
        Statement::Text(token) => compile_text(token),
        Statement::AppendText => compile_text_append(tokens),
    }
}

/// Compile the next statement line from `tokens`.
///
/// Returns `None` for a line without a statement (blank or comment only).
/// Tokens are never read past the end of the line, and after an error the
/// rest of the line is skipped, so the next call starts on the following
/// line. Errors carry the offending program line when `tokens` can provide
/// it.
pub fn compile_line<S>(tokens: &mut S) -> Option<CompileResult>
where
    S: TokenSource + ?Sized,
{
    let mut line = LineTokens::new(tokens);
    let first = line.next_token();
    let result = match first.kind {
        TokenKind::EndOfLine | TokenKind::Comment => None,
        _ => Some(
            Statement::classify(first)
                .and_then(|statement| compile_statement(&statement, &mut line))
                .and_then(|code| expect_end_of_statement(&mut line).map(|()| code)),
        ),
    };
    line.skip_rest();
    result.map(|result| result.map_err(|err| attach_source_line(err, &*tokens)))
}

fn attach_source_line<S>(err: FocalError, tokens: &S) -> FocalError
where
    S: TokenSource + ?Sized,
{
    if !err.source_line.is_empty() {
        return err;
    }
    match tokens.source_line(err.span.start_line) {
        Some(text) => err.with_source_line(text),
        None => err,
    }
}

fn expect_end_of_statement<S>(line: &mut LineTokens<'_, S>) -> Result<(), FocalError>
where
    S: TokenSource + ?Sized,
{
    let token = line.next_token();
    match token.kind {
        TokenKind::EndOfLine | TokenKind::Comment => Ok(()),
        _ => Err(FocalError::new(
            ErrorCode::UNEXPECTED_TOKEN,
            format!("Unexpected \"{}\" at {}", token.kind, token.span),
            token.span,
        )),
    }
}

/// A [`TokenSource`] that stops at the end of the current line.
struct LineTokens<'a, S: ?Sized> {
    inner: &'a mut S,
    end: Option<Token>,
}

impl<'a, S> LineTokens<'a, S>
where
    S: TokenSource + ?Sized,
{
    fn new(inner: &'a mut S) -> Self {
        Self { inner, end: None }
    }

    fn skip_rest(&mut self) {
        while self.end.is_none() {
            self.next_token();
        }
    }
}

impl<S> TokenSource for LineTokens<'_, S>
where
    S: TokenSource + ?Sized,
{
    fn next_token(&mut self) -> Token {
        if let Some(end) = &self.end {
            return end.clone();
        }
        let token = self.inner.next_token();
        if token.is_end_of_line() {
            self.end = Some(token.clone());
        }
        token
    }

    fn source_line(&self, line: u32) -> Option<&str> {
        self.inner.source_line(line)
    }
}

/// Error for a token of the wrong kind, quoting its lexeme.
pub(crate) fn unexpected_token(expected: &str, token: &Token) -> FocalError {
    FocalError::new(
        ErrorCode::UNEXPECTED_TOKEN,
        format!("{expected} expected \"{}\" at {}", token.kind, token.span),
        token.span,
    )
}
