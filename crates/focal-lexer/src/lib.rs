//! FOCAL lexer: converts statement lines into tokens.
//!
//! The statement compilers only depend on [`Token`], [`TokenKind`] and the
//! [`TokenSource`] trait; [`Lexer`] is one implementation of that contract.

pub mod lexer;
pub mod token;

pub use lexer::{LexResult, Lexer};
pub use token::{Token, TokenKind, TokenSource, TokenStream};
