//! # linestruct
//!
//! A compact, UTF-8, line-oriented serialization format for tabular data
//! with nested structure.
//!
//! ## What is LineStruct?
//!
//! A LineStruct document describes one *entity*: a schema shared across
//! rows, plus one line per row. Field names are written once, in the
//! schema, never in the rows, which makes the format markedly cheaper
//! than JSON for record-shaped data, especially in Large Language Model
//! prompts and outputs.
//!
//! ```text
//! EntityName:Person
//! schema:id:int¦name:string¦age:int¦active:bool
//! 1¦John Doe¦30¦true
//! 2¦Jane Smith¦25¦false
//! ```
//!
//! ## Key Features
//!
//! - **Typed schemas**: primitives, enums, arrays, nested objects, and
//!   optional fields, parsed into an immutable [`Schema`] AST
//! - **Bidirectional JSON bridge**: [`to_json`] and [`from_json`] with
//!   schema inference and preserved key order
//! - **Strict validation**: [`is_valid_document`] and
//!   [`validate_against`] with line-numbered diagnostics
//! - **Tolerant decoding**: the historical skip-bad-rows mode for messy
//!   inputs, plus trimming of truncated payloads and row sampling
//! - **No unsafe code, no I/O, no global state**: a pure library of
//!   value-transforming functions
//!
//! ## Quick Start
//!
//! Decoding to the tree model:
//!
//! ```rust
//! use linestruct::decode;
//!
//! let doc = decode(
//!     "EntityName:Person\nschema:id:int¦name:string¦age:int\n1¦John Doe¦30\n2¦Jane Smith¦25\n",
//! )
//! .unwrap();
//!
//! assert_eq!(doc.entity_name, "Person");
//! assert_eq!(doc.rows.len(), 2);
//! assert_eq!(doc.rows[0].get("name").and_then(|v| v.as_str()), Some("John Doe"));
//! ```
//!
//! Converting to and from JSON:
//!
//! ```rust
//! use linestruct::{from_json, to_json};
//!
//! let json = r#"{"entityName":"Person","data":[{"id":1,"name":"John"}]}"#;
//! let text = from_json(json).unwrap();
//! assert_eq!(text, "EntityName:Person\nschema:id:int¦name:string\n1¦John\n");
//!
//! let back = to_json(&text).unwrap();
//! assert!(back.contains("\"entityName\": \"Person\""));
//! ```
//!
//! Building rows dynamically with the [`tree!`] macro:
//!
//! ```rust
//! use linestruct::{encode, tree, Value};
//!
//! let row = match tree!({"id": 1, "tags": ["a", "b"]}) {
//!     Value::Object(map) => map,
//!     _ => unreachable!(),
//! };
//! let text = encode("Tagged", &[row]);
//! assert_eq!(text, "EntityName:Tagged\nschema:id:int¦tags:«string»\n1¦«a¦b»\n");
//! ```
//!
//! ## Strict vs Tolerant
//!
//! The JSON export is tolerant by default: a row that fails to decode is
//! skipped and the rest of the document survives. Validation is strict:
//! the first bad row fails with a `Line <n>:` diagnostic. Pick explicitly
//! with [`DecodeOptions`]:
//!
//! ```rust
//! use linestruct::{decode_with_options, DecodeOptions};
//!
//! let input = "EntityName:P\nschema:id:int\n1\noops\n2\n";
//!
//! let tolerant = decode_with_options(input, &DecodeOptions::new()).unwrap();
//! assert_eq!(tolerant.rows.len(), 2);
//!
//! assert!(decode_with_options(input, &DecodeOptions::strict()).is_err());
//! ```
//!
//! ## Format Reference
//!
//! See the [`spec`] module for the complete wire-format reference, or
//! [`format_prompt`] for a bundled plain-text description suitable for
//! handing to an LLM.

pub mod chars;
pub mod de;
pub mod detect;
pub mod error;
pub mod fmt;
pub mod macros;
pub mod map;
pub mod options;
pub mod schema;
pub mod ser;
pub mod spec;
mod split;
pub mod validate;
pub mod value;
pub mod yaml;

pub use chars::{escape, unescape};
pub use de::{decode, decode_with_options, Document, Rows};
pub use detect::{detect, is_valid_json, Format};
pub use error::{Error, Result};
pub use fmt::{compact_schema, pretty_print_schema, pretty_print_schema_indent};
pub use map::Map;
pub use options::{DecodeOptions, SAMPLE_SIZE};
pub use schema::{Field, Primitive, Schema, Type};
pub use ser::{encode, encode_document, from_json, infer_schema};
pub use validate::{is_valid_document, validate_against, validate_against_yaml};
pub use value::Value;
pub use yaml::{schema_from_yaml, schema_to_yaml};

/// Converts a document to pretty-printed JSON of the shape
/// `{ "entityName": …, "data": [ … ] }`.
///
/// Decoding is tolerant: rows that fail to decode are skipped. Use
/// [`to_json_with_options`] with [`DecodeOptions::strict`] to fail on the
/// first bad row instead.
///
/// # Errors
///
/// Header or schema problems are always fatal; see [`decode_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json(input: &str) -> Result<String> {
    to_json_with_options(input, &DecodeOptions::new())
}

/// Converts a document to pretty-printed JSON under explicit
/// [`DecodeOptions`].
///
/// # Errors
///
/// Whatever [`decode_with_options`] reports for these options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_with_options(input: &str, options: &DecodeOptions) -> Result<String> {
    let doc = decode_with_options(input, options)?;
    ser::document_to_json(&doc)
}

/// Converts a sample of the document to JSON: the first
/// [`SAMPLE_SIZE`] rows, with every nested array truncated to the same
/// budget. Useful for showing an LLM the shape of a large payload.
///
/// # Errors
///
/// Header or schema problems are always fatal; see [`decode_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_sample(input: &str) -> Result<String> {
    to_json_with_options(input, &DecodeOptions::sample())
}

/// Returns the bundled plain-text description of the LineStruct format,
/// written to be pasted into an LLM prompt.
#[must_use]
pub fn format_prompt() -> &'static str {
    include_str!("../assets/format_description.txt")
}
