//! LineStruct Format Reference
//!
//! This module documents the LineStruct wire format as implemented by
//! this crate.
//!
//! # Overview
//!
//! LineStruct is a compact, UTF-8, line-oriented serialization format for
//! tabular data with nested structure. One document describes one
//! *entity*: a schema shared across rows, followed by one line per row.
//! It targets contexts where JSON is verbose or ambiguous, in particular
//! transport to and from Large Language Models, and anywhere a
//! one-line-per-record representation pays off.
//!
//! # Document Layout
//!
//! ```text
//! EntityName:<identifier>
//! schema:<field definitions>
//! <row>
//! <row>
//! ...
//! ```
//!
//! - Encoding is UTF-8, newline is LF (`\n`); a CR before the LF is
//!   tolerated on input and never emitted.
//! - The header and schema lines are required; zero data rows is valid.
//!
//! # Special Code Points
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
//! These six structural code points carry meaning; every other code point
//! is data. A literal special inside a value is preceded by the escape,
//! which protects exactly one following code point.
//!
//! # Schema Line
//!
//! Fields are `name:type`, delimiter-separated:
//!
//! ```text
//! schema:id:int¦name:string¦age:int¦active:bool
//! ```
//!
//! Types:
//!
//! | Type | Spelling | Example value |
//! |------|----------|---------------|
//! | String | `string` | `John Doe` |
//! | Integer | `int` | `42` |
//! | Float | `float` | `5.9` |
//! | Boolean | `bool` | `true` |
//! | Date | `date` | `1993-05-15` |
//! | Datetime | `datetime` | `2024-01-15T10:30:00Z` |
//! | Enum | `{a|b|c}` | `a` |
//! | Array | `«T»` | `«1¦2¦3»` |
//! | Object | `‹f:T¦g:U›` | `‹x¦y›` |
//!
//! An optional field is written `name:T?` or `name:<T>?`; both spellings
//! are equivalent. A field may carry a description: `id:int@desc="primary
//! key"`.
//!
//! `date` and `datetime` are lexical types: values must match
//! `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS[.fff](Z|±HH:MM)` but are stored
//! as strings without calendar validation or timezone normalization.
//!
//! # Rows
//!
//! One row per line, field values in schema order, separated by `¦`:
//!
//! ```text
//! EntityName:Order
//! schema:id:int¦customer:‹name:string¦email:string›¦items:«‹product:string¦price:float›»
//! 1¦‹John¦john@example.com›¦«‹Laptop¦999.99›¦‹Mouse¦25.50›»
//! ```
//!
//! - An empty value in an optional slot is null; trailing empty optional
//!   fields may be omitted entirely (`1¦John¦¦` and `1¦John` decode the
//!   same way).
//! - An empty array is `«»`; array elements are separated by `¦`.
//! - Nested objects repeat the pattern positionally; field names are
//!   never written in rows.
//!
//! # Escaping
//!
//! ```text
//! EntityName:Document
//! schema:id:int¦title:string
//! 1¦Special⁊¦Characters
//! ```
//!
//! decodes `title` as `Special¦Characters`. Inside an enum declaration a
//! literal `|` is written `⁊|`.
//!
//! # JSON Surface
//!
//! A document converts to and from JSON of the shape:
//!
//! ```json
//! {
//!   "entityName": "Person",
//!   "data": [
//!     { "id": 1, "name": "John Doe" }
//!   ]
//! }
//! ```
//!
//! Row keys keep field-declaration order. Converting JSON to LineStruct
//! infers the schema from the rows: field order from the first row,
//! optionality from observed nulls and omissions, types from the first
//! non-null value per field.
//!
//! # Limitations
//!
//! - Rows of one document share a single schema; heterogeneous rows
//!   cannot be represented.
//! - Enum types are never inferred from data; they only arise in
//!   hand-written or imported schemas.
//! - Integers are 64-bit signed; floats are IEEE 754 doubles.

// This module contains only documentation; no implementation code
