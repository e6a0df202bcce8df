//! Program text → native codes.
//!
//! Escape grammar (introduced by [`ESCAPE_CHAR`]):
//!
//! ```text
//! `xH  `xHH        1–2 hexadecimal digits
//! `bB … `bBBBBBBBB 1–8 binary digits
//! `D  `DD  `DDD    1–3 decimal digits, a third digit only if the value stays ≤ 255
//! `@               a native character hidden behind a substitute
//! ```

use tracing::trace;

use crate::error::{CharsetError, CharsetResult};
use crate::table::{table, Encoded, ESCAPE_CHAR};

/// Maximum number of digits in a binary escape.
const MAX_BINARY_DIGITS: usize = 8;

/// Encode the character (or escape sequence, or composite) at `pos`.
///
/// Returns `None` when `pos` is past the end of `text`.
pub fn encode_at(text: &[char], pos: usize) -> Option<CharsetResult<Encoded>> {
    let ch = *text.get(pos)?;
    if ch == ESCAPE_CHAR {
        return Some(parse_escape(text, pos));
    }
    if let Some(found) = table().select(text, pos) {
        return Some(Ok(found));
    }
    Some(match u8::try_from(u32::from(ch)) {
        Ok(code) => Ok(Encoded { code, consumed: 1 }),
        Err(_) => Err(CharsetError::UnsupportedCharacter {
            character: ch,
            position: pos,
        }),
    })
}

/// Encode a whole string into native codes.
pub fn encode_text(text: &str) -> CharsetResult<Vec<u8>> {
    let chars: Vec<char> = text.chars().collect();
    Encoder::new(&chars).collect()
}

/// Map a single character without escape or composite handling.
///
/// Substitutes and single-character canonical forms map to their code;
/// anything else up to U+00FF maps to itself.
pub fn encode_char(ch: char) -> CharsetResult<u8> {
    if let Some(found) = table().select(&[ch], 0) {
        return Ok(found.code);
    }
    u8::try_from(u32::from(ch)).map_err(|_| CharsetError::UnsupportedCharacter {
        character: ch,
        position: 0,
    })
}

/// Iterator over the native codes of a text, one step of [`encode_at`] at a time.
///
/// Stops after the first error.
pub struct Encoder<'a> {
    text: &'a [char],
    pos: usize,
    failed: bool,
}

impl<'a> Encoder<'a> {
    pub fn new(text: &'a [char]) -> Self {
        Self {
            text,
            pos: 0,
            failed: false,
        }
    }

    /// Character index of the next character to encode.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for Encoder<'_> {
    type Item = CharsetResult<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match encode_at(self.text, self.pos)? {
            Ok(Encoded { code, consumed }) => {
                self.pos += consumed;
                Some(Ok(code))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Escape sequences
// ─────────────────────────────────────────────────────────────

fn malformed(position: usize, offending: usize, detail: impl Into<String>) -> CharsetError {
    CharsetError::MalformedEscape {
        position,
        offending,
        detail: detail.into(),
    }
}

/// Parse the escape sequence whose introducer sits at `start`.
fn parse_escape(text: &[char], start: usize) -> CharsetResult<Encoded> {
    let Some(&kind) = text.get(start + 1) else {
        return Err(malformed(start, start, "Invalid escape sequence"));
    };
    let encoded = match kind {
        'x' | 'X' => parse_hex(text, start)?,
        'b' | 'B' => parse_binary(text, start)?,
        '0'..='9' => parse_decimal(text, start),
        c if table().is_hidden_native(c) => Encoded {
            code: c as u8,
            consumed: 2,
        },
        _ => return Err(malformed(start, start + 1, "Invalid escape sequence")),
    };
    trace!(
        position = start,
        code = encoded.code,
        consumed = encoded.consumed,
        "escape sequence"
    );
    Ok(encoded)
}

/// `` `x `` followed by one or two hex digits.
fn parse_hex(text: &[char], start: usize) -> CharsetResult<Encoded> {
    let first = start + 2;
    let Some(&c) = text.get(first) else {
        return Err(malformed(
            start,
            start + 1,
            "Invalid hexadecimal escape sequence",
        ));
    };
    let Some(high) = c.to_digit(16) else {
        return Err(malformed(
            start,
            first,
            format!("Invalid character {c} in hexadecimal escape sequence"),
        ));
    };

    match text.get(first + 1).and_then(|c| c.to_digit(16)) {
        Some(low) => Ok(Encoded {
            code: (high * 16 + low) as u8,
            consumed: 4,
        }),
        None => Ok(Encoded {
            code: high as u8,
            consumed: 3,
        }),
    }
}

/// `` `b `` followed by one to eight binary digits.
fn parse_binary(text: &[char], start: usize) -> CharsetResult<Encoded> {
    let first = start + 2;
    let bits: Vec<u32> = text
        .iter()
        .skip(first)
        .take(MAX_BINARY_DIGITS)
        .map_while(|c| c.to_digit(2))
        .collect();

    if bits.is_empty() {
        return Err(match text.get(first) {
            None => malformed(start, start + 1, "Invalid binary escape sequence"),
            Some(c) => malformed(
                start,
                first,
                format!("Invalid character {c} in binary escape sequence"),
            ),
        });
    }

    let value = bits.iter().fold(0u32, |acc, bit| (acc << 1) | bit);
    Ok(Encoded {
        code: value as u8,
        consumed: 2 + bits.len(),
    })
}

/// `` ` `` followed by one to three decimal digits.
///
/// A third digit is only taken if the value stays within a byte; otherwise
/// it is left in place for the next encoding step.
fn parse_decimal(text: &[char], start: usize) -> Encoded {
    let digit = |offset: usize| text.get(start + offset).and_then(|c| c.to_digit(10));

    // the caller has checked the first digit
    let mut value = digit(1).unwrap_or(0);
    let mut consumed = 2;

    if let Some(d) = digit(2) {
        value = value * 10 + d;
        consumed += 1;
        if let Some(d) = digit(3) {
            let extended = value * 10 + d;
            if extended <= 255 {
                value = extended;
                consumed += 1;
            }
        }
    }

    Encoded {
        code: value as u8,
        consumed,
    }
}
