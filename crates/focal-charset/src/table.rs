//! The native character table.
//!
//! Only codes with a special rendering are declared here; every other code
//! maps to the character with the same scalar value. The table is built on
//! first use and never changes afterwards.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// The character that introduces an escape sequence in program text.
pub const ESCAPE_CHAR: char = '`';

/// `(code, canonical form, substitute)` in declaration order.
///
/// Declaration order matters: when several entries compete for the same
/// input character at the same priority, the earlier one wins.
const DECLARATIONS: &[(u8, &str, Option<char>)] = &[
    (0, "‾", None),
    (1, "ˣ", None),
    (2, "x\u{0304}", Some('ẍ')),
    (3, "←", None),
    (4, "α", None),
    (5, "β", None),
    (6, "Γ", None),
    (7, "↓", None),
    (8, "Δ", None),
    (9, "σ", None),
    (10, "♦", None),
    (11, "λ", None),
    (12, "μ", None),
    // "Creating Your Own HP-41 Bar Code", p. 17: `@` shadows the native `@`.
    (13, "∡", Some('@')),
    (14, "τ", None),
    (15, "Φ", None),
    (16, "Θ", None),
    (17, "Ω", None),
    (18, "δ", None),
    (19, "Ȧ", None),
    (20, "ȧ", None),
    (21, "Ä", None),
    (22, "ä", None),
    (23, "Ö", None),
    (24, "ö", None),
    (25, "Ü", None),
    (26, "ü", None),
    (27, "Æ", None),
    (28, "œ", None),
    (29, "≠", Some('#')),
    (30, "£", None),
    (31, "▒", None),
    (96, "┬", None),
    (123, "π", None),
    (124, "|", None),
    (125, "→", None),
    (126, "Σ", Some('&')),
    (127, "Ⱶ", None),
];

/// A native code with a non-identity rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeChar {
    /// The native code.
    pub code: u8,
    /// Unicode rendering; more than one scalar marks a composite.
    pub canonical: &'static str,
    /// Keyboard-friendly stand-in accepted when encoding.
    pub substitute: Option<char>,
    hides_native: bool,
}

impl NativeChar {
    /// Returns `true` if the canonical form is a base character plus
    /// combining mark(s).
    pub fn is_composite(&self) -> bool {
        self.canonical.chars().nth(1).is_some()
    }

    /// Returns `true` if the substitute shadows the identity code of the
    /// same character, which then needs an escape to be entered.
    pub fn hides_native(&self) -> bool {
        self.hides_native
    }

    fn is_single(&self, ch: char) -> bool {
        let mut chars = self.canonical.chars();
        chars.next() == Some(ch) && chars.next().is_none()
    }

    fn matches_at(&self, text: &[char], pos: usize) -> bool {
        let len = self.canonical.chars().count();
        text.get(pos..pos + len)
            .is_some_and(|window| self.canonical.chars().eq(window.iter().copied()))
    }
}

/// Outcome of encoding at a cursor: the code and how many characters it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    pub code: u8,
    pub consumed: usize,
}

/// The frozen lookup structure for the native character set.
#[derive(Debug)]
pub struct CharTable {
    entries: Vec<NativeChar>,
    /// Index into `entries` per code.
    by_code: [Option<usize>; 256],
    /// Candidate entries per key character, in declaration order.
    candidates: HashMap<char, Vec<usize>>,
    /// Codes whose identity character is shadowed by a substitute.
    hidden: [bool; 256],
    /// Untabled codes whose identity character encodes to another code.
    shadowed: [bool; 256],
}

lazy_static! {
    static ref TABLE: CharTable = CharTable::build();
}

/// The process-wide character table.
pub fn table() -> &'static CharTable {
    &TABLE
}

impl CharTable {
    fn build() -> Self {
        let mut entries: Vec<NativeChar> = DECLARATIONS
            .iter()
            .map(|&(code, canonical, substitute)| NativeChar {
                code,
                canonical,
                substitute,
                hides_native: false,
            })
            .collect();

        let mut by_code = [None; 256];
        let mut candidates: HashMap<char, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_code[entry.code as usize] = Some(idx);
            if let Some(lead) = entry.canonical.chars().next() {
                candidates.entry(lead).or_default().push(idx);
            }
            if let Some(sub) = entry.substitute {
                let keyed = candidates.entry(sub).or_default();
                if !keyed.contains(&idx) {
                    keyed.push(idx);
                }
            }
        }
        let mut hidden = [false; 256];
        for entry in entries.iter_mut() {
            let Some(sub) = entry.substitute else { continue };
            let Ok(native) = u8::try_from(u32::from(sub)) else { continue };
            let native_rendering_is_sub = match by_code[native as usize] {
                Some(idx) => DECLARATIONS[idx].1.chars().eq(std::iter::once(sub)),
                None => true,
            };
            if native_rendering_is_sub {
                entry.hides_native = true;
                hidden[native as usize] = true;
            }
        }

        let mut table = Self {
            entries,
            by_code,
            candidates,
            hidden,
            shadowed: [false; 256],
        };

        for code in 0..=255u8 {
            if table.by_code[code as usize].is_some() {
                continue;
            }
            let ch = char::from(code);
            if let Some(found) = table.select(&[ch], 0) {
                if found.code != code {
                    table.shadowed[code as usize] = true;
                }
            }
        }
        table
    }

    /// All declared entries, in declaration order.
    pub fn entries(&self) -> &[NativeChar] {
        &self.entries
    }

    /// The declared entry for `code`, if it has a non-identity rendering.
    pub fn get(&self, code: u8) -> Option<&NativeChar> {
        self.by_code[code as usize].map(|idx| &self.entries[idx])
    }

    /// Returns `true` if `ch` can only be entered as `` `ch ``.
    pub fn is_hidden_native(&self, ch: char) -> bool {
        u8::try_from(u32::from(ch)).is_ok_and(|code| self.hidden[code as usize])
    }

    /// Returns `true` if typing the identity character of `code` yields a
    /// different code.
    pub fn is_shadowed(&self, code: u8) -> bool {
        self.shadowed[code as usize]
    }

    /// Pick the table entry for the character at `pos`, if any.
    ///
    /// Priority: substitute match, then exact single-character canonical
    /// form, then a composite matching the text at `pos` in full. Within a
    /// priority the first declared entry wins.
    pub(crate) fn select(&self, text: &[char], pos: usize) -> Option<Encoded> {
        let ch = *text.get(pos)?;
        let keyed = self.candidates.get(&ch)?;
        let entries = || keyed.iter().map(|&idx| &self.entries[idx]);

        if let Some(entry) = entries().find(|e| e.substitute == Some(ch)) {
            return Some(Encoded {
                code: entry.code,
                consumed: 1,
            });
        }
        if let Some(entry) = entries().find(|e| e.is_single(ch)) {
            return Some(Encoded {
                code: entry.code,
                consumed: 1,
            });
        }
        entries()
            .find(|e| e.is_composite() && e.matches_at(text, pos))
            .map(|entry| Encoded {
                code: entry.code,
                consumed: entry.canonical.chars().count(),
            })
    }
}
