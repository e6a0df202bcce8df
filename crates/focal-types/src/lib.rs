//! Shared types for the FOCAL compiler.
//!
//! This crate defines source spans, source files and the structured error
//! type used across the lexer and the statement compilers.

mod error;
mod span;

pub use error::{ErrorCategory, ErrorCode, FocalError};
pub use span::{SourceFile, Span};

/// Result type used throughout the FOCAL compiler.
pub type Result<T> = std::result::Result<T, FocalError>;
