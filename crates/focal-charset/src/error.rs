//! Character codec error types.

use thiserror::Error;

/// Errors raised while encoding program text into native codes.
///
/// Positions are 0-based character indices into the text being encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    /// The escape introducer is followed by an invalid or truncated form.
    #[error("{detail} starting at position {position}")]
    MalformedEscape {
        /// Position of the escape introducer.
        position: usize,
        /// Position of the character that broke the escape.
        offending: usize,
        /// What went wrong, e.g. `Invalid character G in hexadecimal escape sequence`.
        detail: String,
    },

    /// The character has no native code.
    #[error("Unsupported character: {character} at position {position}")]
    UnsupportedCharacter { character: char, position: usize },
}

impl CharsetError {
    /// Position of the character the user has to fix.
    pub fn offending_position(&self) -> usize {
        match self {
            Self::MalformedEscape { offending, .. } => *offending,
            Self::UnsupportedCharacter { position, .. } => *position,
        }
    }
}

/// Codec result type alias.
pub type CharsetResult<T> = Result<T, CharsetError>;
