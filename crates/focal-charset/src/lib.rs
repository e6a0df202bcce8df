//! HP-41 native character set.
//!
//! The calculator knows 256 character codes. Most of them coincide with
//! ASCII / Latin-1, the rest are Greek letters, arrows, accented letters and
//! a few symbols. This crate converts between those codes and the text a
//! person types or reads:
//!
//! - [`decode`] / [`display_char`] render a code as text
//! - [`encode_at`] / [`encode_text`] turn program text into codes, including
//!   composite characters, substitutes and the escape grammar
//!
//! The lookup table is built once on first use and shared read-only.

mod decode;
mod encode;
mod error;
mod table;

pub use decode::{decode, decode_text, display_char};
pub use encode::{encode_at, encode_char, encode_text, Encoder};
pub use error::{CharsetError, CharsetResult};
pub use table::{table, CharTable, Encoded, NativeChar, ESCAPE_CHAR};
