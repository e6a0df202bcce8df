//! Text literal code generation.
//!
//! ```text
//! "ABC"   →  F3 41 42 43
//! >"ABC"  →  F4 7F 41 42 43
//! ```
//!
//! The low nibble of the header counts the bytes that follow it, so a text
//! literal carries at most 15 of them.

use focal_charset::{CharsetError, Encoder};
use focal_lexer::{Token, TokenKind, TokenSource};
use focal_types::{ErrorCode, FocalError};
use tracing::debug;

use crate::stmt::unexpected_token;
use crate::CompileResult;

/// Maximum number of bytes after the header byte.
pub const MAX_TEXT_PAYLOAD: usize = 15;
/// Size of the scratch buffer, header byte included.
pub const TEXT_SCRATCH_CAPACITY: usize = MAX_TEXT_PAYLOAD + 1;

pub const TEXT_HEADER: u8 = 0xF0;
pub const APPEND_MARKER: u8 = 0x7F;

/// Compile a text literal token.
pub fn compile_text(token: &Token) -> CompileResult {
    encode_literal(token, false)
}

/// Compile an append statement: pulls the text literal that follows the
/// append marker from `tokens`.
pub fn compile_text_append<S>(tokens: &mut S) -> CompileResult
where
    S: TokenSource + ?Sized,
{
    let token = tokens.next_token();
    encode_literal(&token, true)
}

fn encode_literal(token: &Token, append: bool) -> CompileResult {
    let TokenKind::Text(text) = &token.kind else {
        return Err(unexpected_token("Text", token));
    };

    let chars: Vec<char> = text.chars().collect();
    let mut code = Vec::with_capacity(TEXT_SCRATCH_CAPACITY);
    code.push(TEXT_HEADER);
    if append {
        code.push(APPEND_MARKER);
    }
    let mut encoder = Encoder::new(&chars);
    while let Some(byte) = encoder.next() {
        if code.len() == TEXT_SCRATCH_CAPACITY {
            return Err(capacity_exceeded(token, append, encoder));
        }
        code.push(byte.map_err(|e| charset_error(e, token))?);
    }

    let payload = code.len() - 1;
    // payload ≤ 15, so the count fits in the low nibble
    code[0] |= payload as u8;
    debug!(append, payload, "compiled text");
    Ok(code)
}

/// The buffer is full and `rest` still has bytes, one of them already
/// taken. The overflow is measured up to the first codec error, if any;
/// that error is not reported.
fn capacity_exceeded(token: &Token, append: bool, rest: Encoder<'_>) -> FocalError {
    let max_chars = MAX_TEXT_PAYLOAD - usize::from(append);
    let overflow = 1 + rest.take_while(Result::is_ok).count();
    FocalError::new(
        ErrorCode::CAPACITY_EXCEEDED,
        format!(
            "Text could not be more than {max_chars} characters, {overflow} too many at {}",
            token.span
        ),
        token.span,
    )
}

/// Lift a codec error into a compile error pointing at the offending
/// character inside the literal.
fn charset_error(err: CharsetError, token: &Token) -> FocalError {
    let code = match err {
        CharsetError::MalformedEscape { .. } => ErrorCode::MALFORMED_ESCAPE,
        CharsetError::UnsupportedCharacter { .. } => ErrorCode::UNSUPPORTED_CHARACTER,
    };
    // skip the opening quote
    let span = token.span.column_at(1 + err.offending_position());
    FocalError::new(code, format!("{err} of text {} at {span}", token.kind), span)
}
