//! Numeric literal code generation.
//!
//! Every character of the literal becomes exactly one byte:
//!
//! | char    | byte          |
//! |---------|---------------|
//! | `0`–`9` | `0x10`–`0x19` |
//! | `.`     | `0x1A`        |
//! | `E` `e` | `0x1B`        |
//! | `-`     | `0x1C`        |

use focal_lexer::{Token, TokenKind};
use focal_types::{ErrorCode, FocalError};
use tracing::debug;

use crate::stmt::unexpected_token;
use crate::CompileResult;

pub const DIGIT_BASE: u8 = 0x10;
pub const DECIMAL_POINT: u8 = 0x1A;
pub const EXPONENT: u8 = 0x1B;
pub const NEGATE: u8 = 0x1C;

fn number_byte(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(DIGIT_BASE + (c as u8 - b'0')),
        '.' => Some(DECIMAL_POINT),
        'E' | 'e' => Some(EXPONENT),
        '-' => Some(NEGATE),
        _ => None,
    }
}

/// Compile a numeric literal token.
pub fn compile_number(token: &Token) -> CompileResult {
    let TokenKind::Number(lexeme) = &token.kind else {
        return Err(unexpected_token("Number", token));
    };

    let code = lexeme
        .chars()
        .enumerate()
        .map(|(i, c)| {
            number_byte(c).ok_or_else(|| {
                let span = token.span.column_at(i);
                FocalError::new(
                    ErrorCode::INVALID_NUMBER,
                    format!("Invalid character {c} in number {lexeme} at {span}"),
                    span,
                )
            })
        })
        .collect::<CompileResult>()?;

    debug!(lexeme = %lexeme, bytes = code.len(), "compiled number");
    Ok(code)
}
