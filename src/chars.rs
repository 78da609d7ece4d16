//! Special code points and escape handling for the LineStruct format.
//!
//! LineStruct reserves six structural code points plus one escape code
//! point. Everything else is data:
//!
//! | Role | Code point | Glyph |
//! |------|-----------|-------|
//! | Field delimiter | U+00A6 | `¦` |
//! | Object start | U+2039 | `‹` |
//! | Object end | U+203A | `›` |
//! | Array start | U+00AB | `«` |
//! | Array end | U+00BB | `»` |
//! | Enum alternative | U+007C | `|` |
//! | Escape | U+204A | `⁊` |
//!
//! A literal special inside a scalar is written with the escape in front of
//! it. The escape affects exactly one following code point; any other code
//! point after an escape is copied verbatim (the escape is consumed).
//!
//! The parsers in this crate never unescape up front. They scan the raw
//! text with an "am I escaped?" flag so that escaped specials do not
//! interact with structure, and [`unescape`] runs only when a scalar leaf
//! is emitted.

/// Field delimiter `¦` (U+00A6).
pub const FIELD_DELIMITER: char = '\u{00A6}';
/// Object start `‹` (U+2039).
pub const OBJECT_START: char = '\u{2039}';
/// Object end `›` (U+203A).
pub const OBJECT_END: char = '\u{203A}';
/// Array start `«` (U+00AB).
pub const ARRAY_START: char = '\u{00AB}';
/// Array end `»` (U+00BB).
pub const ARRAY_END: char = '\u{00BB}';
/// Enum alternative separator `|` (U+007C).
pub const ENUM_SEPARATOR: char = '|';
/// Escape `⁊` (U+204A).
pub const ESCAPE: char = '\u{204A}';

/// Returns `true` for the six structural code points (the escape itself is
/// not one of them).
#[inline]
#[must_use]
pub const fn is_special(c: char) -> bool {
    matches!(
        c,
        FIELD_DELIMITER | OBJECT_START | OBJECT_END | ARRAY_START | ARRAY_END | ENUM_SEPARATOR
    )
}

/// Escapes every structural code point in `s` by prefixing it with [`ESCAPE`].
///
/// # Examples
///
/// ```rust
/// assert_eq!(linestruct::escape("a¦b"), "a⁊¦b");
/// assert_eq!(linestruct::escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(s: &str) -> String {
    if !s.chars().any(is_special) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if is_special(c) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Removes escapes from `s`, copying the code point after each escape
/// verbatim. An escape at end-of-input has nothing to protect and is kept
/// as a literal.
///
/// # Examples
///
/// ```rust
/// assert_eq!(linestruct::unescape("a⁊¦b"), "a¦b");
/// assert_eq!(linestruct::unescape("tail⁊"), "tail⁊");
/// ```
#[must_use]
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ESCAPE),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_specials() {
        assert_eq!(escape("¦‹›«»|"), "⁊¦⁊‹⁊›⁊«⁊»⁊|");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        for s in ["", "plain", "a¦b", "‹x›", "mix«ed»|stuff¦here"] {
            assert_eq!(unescape(&escape(s)), s);
        }
    }

    #[test]
    fn test_unescape_unknown_target_is_literal() {
        // The escape consumes itself and yields the next char unchanged.
        assert_eq!(unescape("⁊a"), "a");
    }

    #[test]
    fn test_trailing_escape_kept() {
        assert_eq!(unescape("abc⁊"), "abc⁊");
    }

    #[test]
    fn test_escape_leaves_escape_char_alone() {
        // The escape code point itself is not a structural special.
        assert_eq!(escape("a⁊b"), "a⁊b");
    }
}
