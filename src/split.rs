//! Escape-aware field splitting.
//!
//! All structural decomposition of a LineStruct line goes through
//! [`split`]: one left-to-right pass with a depth counter, honoring the
//! escape code point so that escaped specials never act as structure. The
//! splitter never unescapes; consumers do that when emitting scalar leaves.

use crate::chars::{
    ARRAY_END, ARRAY_START, ESCAPE, FIELD_DELIMITER, OBJECT_END, OBJECT_START,
};

/// What kind of region is being split.
///
/// The mode decides which code points open and close a nesting level and
/// where segment boundaries fall:
///
/// - [`RowFields`](SplitMode::RowFields) and
///   [`ArrayOfPrimitives`](SplitMode::ArrayOfPrimitives) split on `¦` at
///   depth 0, with `‹›` and `«»` tracking depth. Enum braces cannot appear
///   in row data, so `{` stays literal.
/// - [`ObjectFields`](SplitMode::ObjectFields) additionally nests on
///   `{`/`}`; it is the mode used on schema text, where an enum body may
///   contain the field delimiter.
/// - [`ArrayOfObjects`](SplitMode::ArrayOfObjects) yields one segment per
///   top-level `‹…›` group, swallowing the `¦` separator that follows a
///   closed group.
/// - [`ArrayOfArrays`](SplitMode::ArrayOfArrays) does the same for `«…»`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SplitMode {
    RowFields,
    ObjectFields,
    ArrayOfPrimitives,
    ArrayOfObjects,
    ArrayOfArrays,
}

/// Splits `input` into its top-level segments.
///
/// Empty input yields no segments. Otherwise a final segment is always
/// emitted, even when empty, so that trailing empty optional fields keep
/// their slot.
pub(crate) fn split(input: &str, mode: SplitMode) -> Vec<&str> {
    if input.is_empty() {
        return Vec::new();
    }
    match mode {
        SplitMode::RowFields | SplitMode::ArrayOfPrimitives => split_delimited(input, false),
        SplitMode::ObjectFields => split_delimited(input, true),
        SplitMode::ArrayOfObjects => split_groups(input, OBJECT_START, OBJECT_END),
        SplitMode::ArrayOfArrays => split_groups(input, ARRAY_START, ARRAY_END),
    }
}

/// Splits on `¦` at depth 0. `braces_nest` is set when splitting schema
/// text, where `{…}` encloses an enum body that must stay intact.
fn split_delimited(input: &str, braces_nest: bool) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth: i32 = 0;
    let mut escaped = false;
    let mut seg_start = 0;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            ESCAPE => escaped = true,
            OBJECT_START | ARRAY_START => depth += 1,
            OBJECT_END | ARRAY_END => depth -= 1,
            '{' if braces_nest => depth += 1,
            '}' if braces_nest => depth -= 1,
            FIELD_DELIMITER if depth == 0 => {
                segments.push(&input[seg_start..i]);
                seg_start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    segments.push(&input[seg_start..]);
    segments
}

/// Splits into top-level `open…close` groups, skipping the field delimiter
/// between two groups. Only `open`/`close` track depth here: an object
/// element may freely contain arrays (and vice versa) without affecting
/// the grouping.
fn split_groups(input: &str, open: char, close: char) -> Vec<&'_ str> {
    let mut segments = Vec::new();
    let mut depth: i32 = 0;
    let mut escaped = false;
    let mut seg_start = 0;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == ESCAPE {
            escaped = true;
        } else if c == open {
            if depth == 0 {
                seg_start = i;
            }
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                segments.push(&input[seg_start..i + c.len_utf8()]);
                // A group may not reopen until past the separator.
                seg_start = input.len();
            }
        }
    }

    // Unterminated trailing group: hand it back and let the value decoder
    // report the delimiter mismatch.
    if depth > 0 && seg_start < input.len() {
        segments.push(&input[seg_start..]);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(input: &str) -> Vec<&str> {
        split(input, SplitMode::RowFields)
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(row("1¦John¦30"), vec!["1", "John", "30"]);
    }

    #[test]
    fn test_trailing_empty_field_kept() {
        assert_eq!(row("1¦"), vec!["1", ""]);
        assert_eq!(row("1¦¦"), vec!["1", "", ""]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(row("").is_empty());
    }

    #[test]
    fn test_nested_object_not_split() {
        assert_eq!(
            row("1¦‹John¦john@example.com›¦x"),
            vec!["1", "‹John¦john@example.com›", "x"]
        );
    }

    #[test]
    fn test_nested_array_not_split() {
        assert_eq!(row("«a¦b»¦c"), vec!["«a¦b»", "c"]);
    }

    #[test]
    fn test_escaped_delimiter_is_literal() {
        assert_eq!(row("a⁊¦b¦c"), vec!["a⁊¦b", "c"]);
    }

    #[test]
    fn test_escaped_bracket_does_not_nest() {
        assert_eq!(row("a⁊‹b¦c"), vec!["a⁊‹b", "c"]);
    }

    #[test]
    fn test_braces_literal_in_row_data() {
        assert_eq!(row("a{b¦c}d"), vec!["a{b", "c}d"]);
    }

    #[test]
    fn test_braces_nest_in_schema_text() {
        assert_eq!(
            split("options:{a|b¦c}¦id:int", SplitMode::ObjectFields),
            vec!["options:{a|b¦c}", "id:int"]
        );
    }

    #[test]
    fn test_array_of_objects() {
        assert_eq!(
            split("‹Laptop¦1›¦‹Mouse¦2›", SplitMode::ArrayOfObjects),
            vec!["‹Laptop¦1›", "‹Mouse¦2›"]
        );
    }

    #[test]
    fn test_array_of_objects_with_inner_array() {
        assert_eq!(
            split("‹a¦«1¦2»›¦‹b¦«3»›", SplitMode::ArrayOfObjects),
            vec!["‹a¦«1¦2»›", "‹b¦«3»›"]
        );
    }

    #[test]
    fn test_array_of_arrays() {
        assert_eq!(
            split("«1¦2»¦«3¦4»", SplitMode::ArrayOfArrays),
            vec!["«1¦2»", "«3¦4»"]
        );
    }

    #[test]
    fn test_nested_array_of_arrays() {
        assert_eq!(
            split("««1»¦«2»»¦««3»»", SplitMode::ArrayOfArrays),
            vec!["««1»¦«2»»", "««3»»"]
        );
    }

    #[test]
    fn test_segments_rejoin_to_input() {
        let input = "a¦‹b¦c›¦«d¦e»¦⁊¦f¦";
        assert_eq!(row(input).join("¦"), input);
    }
}
