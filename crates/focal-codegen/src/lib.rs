//! FOCAL statement compiler: turns the tokens of one statement into HP-41
//! byte code.
//!
//! # Architecture
//!
//! Each statement is compiled on its own. The caller (or [`compile_line`])
//! classifies the first token into a [`Statement`] and
//! [`compile_statement`] dispatches to the generator for that kind:
//!
//! - [`number::compile_number`]: one byte per character of the literal
//! - [`text::compile_text`] / [`text::compile_text_append`]: a header byte
//!   `0xF0 + n` followed by `n` native character codes
//!
//! Placing the resulting bytes in a program image is up to the caller.

pub mod number;
pub mod stmt;
pub mod text;

pub use number::compile_number;
pub use stmt::{compile_line, compile_statement, Statement};
pub use text::{compile_text, compile_text_append, MAX_TEXT_PAYLOAD};

use focal_types::FocalError;

/// Outcome of compiling one statement: its exact byte code, or the error
/// that stopped it.
pub type CompileResult = Result<Vec<u8>, FocalError>;
