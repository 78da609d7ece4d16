//! Input classification: JSON, LineStruct, or something else.

use crate::de::ENTITY_PREFIX;
use crate::validate::is_valid_document;

/// The outcome of [`detect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    LineStruct,
    Other,
}

/// Classifies `input`.
///
/// A string bracketed by `{…}` or `[…]` that parses as JSON is
/// [`Format::Json`]; a string starting with `EntityName:` that validates
/// as a document is [`Format::LineStruct`]; anything else is
/// [`Format::Other`].
///
/// # Examples
///
/// ```rust
/// use linestruct::{detect, Format};
///
/// assert_eq!(detect(r#"{"a": 1}"#), Format::Json);
/// assert_eq!(detect("EntityName:P\nschema:id:int\n1\n"), Format::LineStruct);
/// assert_eq!(detect("just some text"), Format::Other);
/// ```
#[must_use]
pub fn detect(input: &str) -> Format {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Format::Other;
    }

    let json_shaped = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if json_shaped && is_valid_json(trimmed) {
        return Format::Json;
    }

    if trimmed.starts_with(ENTITY_PREFIX) && is_valid_document(trimmed) {
        return Format::LineStruct;
    }

    Format::Other
}

/// Returns `true` when `input` parses as JSON. No tree is built.
#[must_use]
pub fn is_valid_json(input: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array_and_object() {
        assert_eq!(detect("[1, 2, 3]"), Format::Json);
        assert_eq!(detect("  {\"k\": null} "), Format::Json);
    }

    #[test]
    fn test_malformed_json_is_other() {
        assert_eq!(detect("{not json}"), Format::Other);
    }

    #[test]
    fn test_linestruct_requires_valid_rows() {
        assert_eq!(
            detect("EntityName:P\nschema:id:int\n1\n"),
            Format::LineStruct
        );
        assert_eq!(detect("EntityName:P\nschema:id:int\nx\n"), Format::Other);
    }

    #[test]
    fn test_blank_is_other() {
        assert_eq!(detect("   "), Format::Other);
    }
}
