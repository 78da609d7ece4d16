//! Error types for LineStruct decoding, encoding, and validation.
//!
//! Every failure surfaces as a returned [`Error`]; no panic crosses the
//! public API. Row-level errors carry a 1-based line number and render as
//! `Line <n>: …`, which is also the diagnostic string
//! [`validate_against`](crate::validate_against) hands back.
//!
//! ## Examples
//!
//! ```rust
//! use linestruct::{decode, Error};
//!
//! let err = decode("EntityName:Test\nnot-a-schema\n").unwrap_err();
//! assert!(matches!(err, Error::HeaderMissing(_)));
//! ```

use std::fmt;
use thiserror::Error;

/// All errors the crate can report.
///
/// The variants follow the failure modes of the format: header problems
/// are fatal, schema problems carry a code-point offset into the
/// `schema:` line, row problems carry a line number and (when known) the
/// offending field name.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input was null, empty, or all whitespace.
    #[error("input is null or empty")]
    EmptyInput,

    /// The `EntityName:` or `schema:` line is missing or malformed.
    #[error("header: {0}")]
    HeaderMissing(String),

    /// The schema line does not follow the schema grammar. `position` is
    /// the code-point index from the start of the `schema:` line.
    #[error("schema: {msg} (at character {position})")]
    SchemaSyntax { position: usize, msg: String },

    /// A required field slot had no value.
    #[error("Line {line}: required field '{field}' has no value")]
    RowUnderflow { line: usize, field: String },

    /// A row carried more values than the schema admits.
    #[error("Line {line}: too many values ({values}) for schema fields ({fields})")]
    RowOverflow {
        line: usize,
        values: usize,
        fields: usize,
    },

    /// A primitive or enum value failed its lexical check.
    #[error("Line {line}: field '{field}' {msg}")]
    ValueSyntax {
        line: usize,
        field: String,
        msg: String,
    },

    /// An object or array value was missing its opening or closing
    /// delimiter.
    #[error("Line {line}: field '{field}' {msg}")]
    DelimiterMismatch {
        line: usize,
        field: String,
        msg: String,
    },

    /// The document schema and an external schema disagree on a field.
    #[error("field '{field}' {msg}")]
    ExternalSchemaMismatch { field: String, msg: String },

    /// Invalid JSON on the JSON side of the bridge.
    #[error("invalid JSON: {0}")]
    JsonSyntax(String),

    /// Invalid YAML handed to the schema reader.
    #[error("invalid YAML: {0}")]
    YamlSyntax(String),

    /// Catch-all with a display message.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a header error.
    pub fn header(msg: impl Into<String>) -> Self {
        Error::HeaderMissing(msg.into())
    }

    /// Creates a schema syntax error located at a code-point offset from
    /// the start of the `schema:` line.
    pub fn schema(position: usize, msg: impl Into<String>) -> Self {
        Error::SchemaSyntax {
            position,
            msg: msg.into(),
        }
    }

    /// Creates a missing-required-field error for a 1-based line number.
    pub fn underflow(line: usize, field: impl Into<String>) -> Self {
        Error::RowUnderflow {
            line,
            field: field.into(),
        }
    }

    /// Creates a too-many-values error.
    pub fn overflow(line: usize, values: usize, fields: usize) -> Self {
        Error::RowOverflow {
            line,
            values,
            fields,
        }
    }

    /// Creates a value syntax error for a named field.
    pub fn value(line: usize, field: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::ValueSyntax {
            line,
            field: field.into(),
            msg: msg.into(),
        }
    }

    /// Creates a delimiter mismatch error for a named field.
    pub fn delimiter(line: usize, field: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::DelimiterMismatch {
            line,
            field: field.into(),
            msg: msg.into(),
        }
    }

    /// Creates an external-schema compatibility error.
    pub fn external(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::ExternalSchemaMismatch {
            field: field.into(),
            msg: msg.into(),
        }
    }

    /// Creates a JSON-side error.
    pub fn json(msg: impl Into<String>) -> Self {
        Error::JsonSyntax(msg.into())
    }

    /// Creates a YAML-side error.
    pub fn yaml(msg: impl Into<String>) -> Self {
        Error::YamlSyntax(msg.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_errors_lead_with_line_number() {
        assert!(Error::underflow(4, "age").to_string().starts_with("Line 4:"));
        assert!(Error::overflow(2, 5, 3).to_string().starts_with("Line 2:"));
        assert!(Error::value(7, "id", "must be an integer, got 'x'")
            .to_string()
            .starts_with("Line 7:"));
    }

    #[test]
    fn test_schema_error_carries_position() {
        let err = Error::schema(12, "unterminated '«'");
        assert!(err.to_string().contains("character 12"));
    }
}
