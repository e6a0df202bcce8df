//! Native codes → program text.

use crate::table::{table, ESCAPE_CHAR};

/// Render `code` for reading.
///
/// Declared codes use their substitute (when `want_substitute` and one
/// exists) or their canonical form; every other code is the character with
/// the same value. The result is not always valid input: `@` typed back in
/// is code 13, not 64. Use [`decode`] for text meant to be re-entered.
pub fn display_char(code: u8, want_substitute: bool) -> String {
    match table().get(code) {
        Some(entry) => match entry.substitute {
            Some(sub) if want_substitute => sub.to_string(),
            _ => entry.canonical.to_string(),
        },
        None => char::from(code).to_string(),
    }
}

/// Render `code` as program text that encodes back to `code`.
///
/// Same as [`display_char`], except that codes whose plain character would
/// be read as a different code are escaped: hidden natives as `` `@ ``,
/// other shadowed codes as `` `xHH ``.
pub fn decode(code: u8, want_substitute: bool) -> String {
    let table = table();
    if table.get(code).is_some() {
        return display_char(code, want_substitute);
    }
    let ch = char::from(code);
    if table.is_hidden_native(ch) {
        format!("{ESCAPE_CHAR}{ch}")
    } else if table.is_shadowed(code) {
        format!("{ESCAPE_CHAR}x{code:02X}")
    } else {
        ch.to_string()
    }
}

/// Decode a sequence of native codes, e.g. a text literal payload.
pub fn decode_text(codes: &[u8], want_substitute: bool) -> String {
    codes
        .iter()
        .map(|&code| decode(code, want_substitute))
        .collect()
}
