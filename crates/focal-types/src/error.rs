use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Encoding,
    Capacity,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Encoding => write!(f, "encoding"),
            Self::Capacity => write!(f, "capacity"),
        }
    }
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNTERMINATED_TEXT: Self = Self(101);
    pub const INVALID_INTEGER: Self = Self(102);
    pub const INVALID_NUMBER: Self = Self(103);

    // ── Encoding errors (E200–E299) ──
    pub const MALFORMED_ESCAPE: Self = Self(200);
    pub const UNSUPPORTED_CHARACTER: Self = Self(201);

    // ── Capacity errors (E300–E399) ──
    pub const CAPACITY_EXCEEDED: Self = Self(300);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            200..=299 => ErrorCategory::Encoding,
            300..=399 => ErrorCategory::Capacity,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured FOCAL compiler error.
///
/// Every failure of the lexer or a statement compiler is reported as one
/// of these. Callers render them; they must not parse the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{span}: {code} [{category}] {message}")]
pub struct FocalError {
    /// Error code (e.g., E300).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The source line for context, empty when the caller built tokens by hand.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_line: String,
}

impl FocalError {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: String::new(),
        }
    }

    /// Attach the source line the error points into.
    pub fn with_source_line(mut self, source_line: impl Into<String>) -> Self {
        self.source_line = source_line.into();
        self
    }

    /// Serialize to the JSON shape tools consume.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse an error back from [`FocalError::to_json`] output.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
