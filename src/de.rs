//! Document and row decoding.
//!
//! The decode path is: raw text → header + [`Schema`] parse → per-line row
//! decode against the schema → [`Document`]. Row decoding is a pair
//! recursion on `(schema node, text region)`: every region is split with
//! the mode its schema node dictates, and scalars are unescaped only at
//! the leaves.
//!
//! ## Strict vs tolerant
//!
//! In strict mode ([`DecodeOptions::strict`]) the first bad row fails the
//! whole call with a `Line <n>:` error. In tolerant mode (the default) a
//! bad row is skipped and decoding continues; additionally, a *required*
//! scalar slot holding an empty value is coerced to its zero value
//! (`int`→0, `float`→0.0, `bool`→false, `string`→"") instead of erroring.
//!
//! ## Usage
//!
//! ```rust
//! use linestruct::decode;
//!
//! let doc = decode("EntityName:Person\nschema:id:int¦name:string\n1¦Alice\n").unwrap();
//! assert_eq!(doc.entity_name, "Person");
//! assert_eq!(doc.rows.len(), 1);
//! assert_eq!(doc.rows[0].get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::chars::{self, ARRAY_END, ARRAY_START, ESCAPE, OBJECT_END, OBJECT_START};
use crate::options::DecodeOptions;
use crate::schema::{Field, Primitive, Schema, Type};
use crate::split::{split, SplitMode};
use crate::{Error, Map, Result, Value};

/// Prefix of the header line.
pub(crate) const ENTITY_PREFIX: &str = "EntityName:";

/// A decoded document: entity name, the schema it declared, and its rows.
///
/// Rows own their values; the struct has no interior sharing and can be
/// sent across threads freely.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub entity_name: String,
    pub schema: Schema,
    pub rows: Vec<Map>,
}

/// Decodes a document with default (tolerant) options.
///
/// # Errors
///
/// Header and schema problems are always fatal; row errors are skipped
/// under the default options. See [`decode_with_options`].
pub fn decode(input: &str) -> Result<Document> {
    decode_with_options(input, &DecodeOptions::new())
}

/// Decodes a document under explicit [`DecodeOptions`].
///
/// # Errors
///
/// - [`Error::EmptyInput`] for blank input
/// - [`Error::HeaderMissing`] when the `EntityName:` or `schema:` line is
///   absent
/// - [`Error::SchemaSyntax`] for a malformed schema line
/// - any row-level error, in strict mode only
pub fn decode_with_options(input: &str, options: &DecodeOptions) -> Result<Document> {
    let trimmed;
    let input = if options.trim {
        trimmed = trim_document(input);
        trimmed.as_str()
    } else {
        input
    };

    let text = input.trim();
    if text.is_empty() {
        return Err(Error::EmptyInput);
    }

    let lines: Vec<&str> = text.split('\n').map(strip_cr).collect();
    if lines.len() < 2 {
        return Err(Error::header(
            "minimum 2 lines required (EntityName and schema)",
        ));
    }
    let Some(entity_name) = lines[0].strip_prefix(ENTITY_PREFIX) else {
        return Err(Error::header("first line must start with 'EntityName:'"));
    };
    let schema = Schema::parse(lines[1])?;

    let mut rows = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(2) {
        if let Some(max) = options.max_rows {
            if rows.len() >= max {
                break;
            }
        }
        if line.trim().is_empty() {
            continue;
        }
        match decode_row(line, &schema, idx + 1, options.strict) {
            Ok(row) => rows.push(row),
            Err(err) => {
                if options.strict {
                    return Err(err);
                }
            }
        }
    }

    if options.truncate_arrays {
        if let Some(max) = options.max_rows {
            for row in &mut rows {
                for value in row.values_mut() {
                    truncate_arrays(value, max);
                }
            }
        }
    }

    Ok(Document {
        entity_name: entity_name.to_string(),
        schema,
        rows,
    })
}

/// A streaming row iterator over a document.
///
/// Parses the header and schema eagerly, then yields one decoded row per
/// `next()` call (strict semantics, blank lines skipped). Each yielded
/// [`Map`] is owned; nothing borrows into previous rows.
///
/// ```rust
/// use linestruct::Rows;
///
/// let input = "EntityName:P\nschema:id:int\n1\n2\n";
/// let rows = Rows::new(input).unwrap();
/// assert_eq!(rows.entity_name(), "P");
/// assert_eq!(rows.count(), 2);
/// ```
pub struct Rows<'a> {
    entity_name: &'a str,
    schema: Schema,
    lines: std::str::Split<'a, char>,
    line_no: usize,
}

impl<'a> Rows<'a> {
    /// Parses the header and schema lines and positions the iterator at
    /// the first data row.
    pub fn new(input: &'a str) -> Result<Rows<'a>> {
        let text = input.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut lines = text.split('\n');
        let header = strip_cr(lines.next().unwrap_or_default());
        let Some(entity_name) = header.strip_prefix(ENTITY_PREFIX) else {
            return Err(Error::header("first line must start with 'EntityName:'"));
        };
        let Some(schema_line) = lines.next().map(strip_cr) else {
            return Err(Error::header(
                "minimum 2 lines required (EntityName and schema)",
            ));
        };
        let schema = Schema::parse(schema_line)?;
        Ok(Rows {
            entity_name,
            schema,
            lines,
            line_no: 2,
        })
    }

    /// The document's entity name.
    #[must_use]
    pub fn entity_name(&self) -> &str {
        self.entity_name
    }

    /// The parsed schema the rows are decoded against.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Map>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = strip_cr(self.lines.next()?);
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(decode_row(line, &self.schema, self.line_no, true));
        }
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Decode context threaded through the value recursion.
#[derive(Clone, Copy)]
struct Cx {
    line: usize,
    strict: bool,
}

/// Decodes one data line against the schema. `line_no` is 1-based and
/// appears in every error.
pub(crate) fn decode_row(line: &str, schema: &Schema, line_no: usize, strict: bool) -> Result<Map> {
    let values = split(line, SplitMode::RowFields);
    let cx = Cx {
        line: line_no,
        strict,
    };

    let mut row = Map::with_capacity(schema.fields.len());
    for (i, field) in schema.fields.iter().enumerate() {
        match values.get(i) {
            None => {
                if field.optional {
                    row.insert(field.name.clone(), Value::Null);
                } else {
                    return Err(Error::underflow(line_no, &field.name));
                }
            }
            Some(raw) => {
                let value = decode_value(raw, &field.ty, field.optional, &field.name, cx)?;
                row.insert(field.name.clone(), value);
            }
        }
    }

    if values.len() > schema.fields.len() {
        return Err(Error::overflow(line_no, values.len(), schema.fields.len()));
    }

    Ok(row)
}

fn decode_value(raw: &str, ty: &Type, optional: bool, name: &str, cx: Cx) -> Result<Value> {
    if raw.is_empty() {
        if optional {
            return Ok(Value::Null);
        }
        return decode_empty_required(ty, name, cx);
    }

    match ty {
        Type::Object(fields) => {
            let Some(inner) = strip_wrapped(raw, OBJECT_START, OBJECT_END) else {
                return Err(Error::delimiter(
                    cx.line,
                    name,
                    "must be an object (surrounded by ‹ ›)",
                ));
            };
            decode_object(inner, fields, cx)
        }
        Type::Array(element) => {
            let Some(inner) = strip_wrapped(raw, ARRAY_START, ARRAY_END) else {
                return Err(Error::delimiter(
                    cx.line,
                    name,
                    "must be an array (surrounded by « »)",
                ));
            };
            decode_array(inner, element, name, cx)
        }
        Type::Enum(values) => {
            let value = chars::unescape(raw);
            if values.iter().any(|v| *v == value) {
                Ok(Value::String(value))
            } else {
                Err(Error::value(
                    cx.line,
                    name,
                    format!(
                        "has invalid enum value '{}'; valid values are [{}]",
                        value,
                        values.join(", ")
                    ),
                ))
            }
        }
        Type::Primitive(p) => decode_primitive(raw, *p, optional, name, cx),
    }
}

/// A required slot with an empty value: strict mode rejects, tolerant mode
/// falls back to the zero value for coercible scalars.
fn decode_empty_required(ty: &Type, name: &str, cx: Cx) -> Result<Value> {
    if cx.strict {
        return Err(Error::underflow(cx.line, name));
    }
    match ty {
        Type::Primitive(Primitive::String) => Ok(Value::String(String::new())),
        Type::Primitive(Primitive::Int) => Ok(Value::Int(0)),
        Type::Primitive(Primitive::Float) => Ok(Value::Float(0.0)),
        Type::Primitive(Primitive::Bool) => Ok(Value::Bool(false)),
        _ => Err(Error::underflow(cx.line, name)),
    }
}

fn decode_object(content: &str, fields: &[Field], cx: Cx) -> Result<Value> {
    let segments = split(content, SplitMode::ObjectFields);
    if cx.strict && segments.len() > fields.len() {
        return Err(Error::overflow(cx.line, segments.len(), fields.len()));
    }
    let mut object = Map::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        // Missing trailing slots are padded as empty values.
        let raw = segments.get(i).copied().unwrap_or("");
        let value = decode_value(raw, &field.ty, field.optional, &field.name, cx)?;
        object.insert(field.name.clone(), value);
    }
    Ok(Value::Object(object))
}

fn decode_array(content: &str, element: &Type, name: &str, cx: Cx) -> Result<Value> {
    if content.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    let mut array = Vec::new();
    match element {
        Type::Object(fields) => {
            for segment in split(content, SplitMode::ArrayOfObjects) {
                let Some(inner) = strip_wrapped(segment, OBJECT_START, OBJECT_END) else {
                    return Err(Error::delimiter(
                        cx.line,
                        name,
                        "array element must be an object (surrounded by ‹ ›)",
                    ));
                };
                array.push(decode_object(inner, fields, cx)?);
            }
        }
        Type::Array(nested) => {
            for segment in split(content, SplitMode::ArrayOfArrays) {
                let Some(inner) = strip_wrapped(segment, ARRAY_START, ARRAY_END) else {
                    return Err(Error::delimiter(
                        cx.line,
                        name,
                        "array element must be an array (surrounded by « »)",
                    ));
                };
                array.push(decode_array(inner, nested, name, cx)?);
            }
        }
        _ => {
            for segment in split(content, SplitMode::ArrayOfPrimitives) {
                array.push(decode_value(segment, element, false, name, cx)?);
            }
        }
    }
    Ok(Value::Array(array))
}

fn decode_primitive(raw: &str, primitive: Primitive, optional: bool, name: &str, cx: Cx) -> Result<Value> {
    let value = chars::unescape(raw);
    match primitive {
        Primitive::String => Ok(Value::String(value)),
        Primitive::Int => match value.parse::<i64>() {
            Ok(i) => Ok(Value::Int(i)),
            Err(_) if optional && !cx.strict => Ok(Value::Null),
            Err(_) => Err(Error::value(
                cx.line,
                name,
                format!("must be an integer, got '{}'", value),
            )),
        },
        Primitive::Float => match parse_float(&value) {
            Some(f) => Ok(Value::Float(f)),
            None if optional && !cx.strict => Ok(Value::Null),
            None => Err(Error::value(
                cx.line,
                name,
                format!("must be a float, got '{}'", value),
            )),
        },
        Primitive::Bool => match value.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(Error::value(
                cx.line,
                name,
                format!("must be 'true' or 'false', got '{}'", value),
            )),
        },
        Primitive::Date => {
            if is_date(value.as_bytes()) {
                Ok(Value::String(value))
            } else {
                Err(Error::value(
                    cx.line,
                    name,
                    format!("must be an ISO 8601 date (YYYY-MM-DD), got '{}'", value),
                ))
            }
        }
        Primitive::DateTime => {
            if is_datetime(value.as_bytes()) {
                Ok(Value::String(value))
            } else {
                Err(Error::value(
                    cx.line,
                    name,
                    format!(
                        "must be an ISO 8601 datetime (YYYY-MM-DDTHH:MM:SSZ), got '{}'",
                        value
                    ),
                ))
            }
        }
    }
}

fn strip_wrapped(s: &str, open: char, close: char) -> Option<&str> {
    s.strip_prefix(open)?.strip_suffix(close)
}

/// Signed decimal with optional fraction and exponent. `inf`/`NaN`
/// spellings are not part of the format.
fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn is_date(b: &[u8]) -> bool {
    b.len() == 10
        && b[0..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

fn is_datetime(b: &[u8]) -> bool {
    if b.len() < 20 || !is_date(&b[0..10]) || b[10] != b'T' {
        return false;
    }
    let time_ok = b[11..13].iter().all(u8::is_ascii_digit)
        && b[13] == b':'
        && b[14..16].iter().all(u8::is_ascii_digit)
        && b[16] == b':'
        && b[17..19].iter().all(u8::is_ascii_digit);
    if !time_ok {
        return false;
    }
    let mut i = 19;
    if b.get(19) == Some(&b'.') {
        if b.len() < 23 || !b[20..23].iter().all(u8::is_ascii_digit) {
            return false;
        }
        i = 23;
    }
    match b.get(i) {
        Some(b'Z') => b.len() == i + 1,
        Some(b'+') | Some(b'-') => {
            b.len() == i + 6
                && b[i + 1..i + 3].iter().all(u8::is_ascii_digit)
                && b[i + 3] == b':'
                && b[i + 4..i + 6].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

/// Clamps every array reachable from `value` to `limit` elements.
pub(crate) fn truncate_arrays(value: &mut Value, limit: usize) {
    match value {
        Value::Array(arr) => {
            arr.truncate(limit);
            for element in arr.iter_mut() {
                truncate_arrays(element, limit);
            }
        }
        Value::Object(obj) => {
            for nested in obj.values_mut() {
                truncate_arrays(nested, limit);
            }
        }
        _ => {}
    }
}

/// The trim pre-pass: drop everything before the `EntityName:` line, keep
/// the header and schema lines, then keep data lines up to (but not
/// including) the first one with unbalanced delimiters or a dangling
/// escape. Returns an empty string when no header line exists.
pub(crate) fn trim_document(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let Some(start) = lines.iter().position(|l| l.starts_with(ENTITY_PREFIX)) else {
        return String::new();
    };

    let mut end = start;
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        if i == start + 1 || is_complete_row(line) {
            end = i;
        } else {
            break;
        }
    }

    let mut out = lines[start..=end].join("\n");
    out.push('\n');
    out
}

fn is_complete_row(line: &str) -> bool {
    let line = strip_cr(line);
    // A blank row could be all optional fields.
    if line.trim().is_empty() {
        return true;
    }
    let mut array_depth: i32 = 0;
    let mut object_depth: i32 = 0;
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            ESCAPE => escaped = true,
            ARRAY_START => array_depth += 1,
            ARRAY_END => {
                array_depth -= 1;
                if array_depth < 0 {
                    return false;
                }
            }
            OBJECT_START => object_depth += 1,
            OBJECT_END => {
                object_depth -= 1;
                if object_depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    array_depth == 0 && object_depth == 0 && !escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeOptions;

    fn strict(input: &str) -> Result<Document> {
        decode_with_options(input, &DecodeOptions::strict())
    }

    #[test]
    fn test_missing_header_lines() {
        assert!(matches!(decode(""), Err(Error::EmptyInput)));
        assert!(matches!(decode("EntityName:X"), Err(Error::HeaderMissing(_))));
        assert!(matches!(
            decode("Nope\nschema:id:int\n"),
            Err(Error::HeaderMissing(_))
        ));
    }

    #[test]
    fn test_zero_data_rows_is_valid() {
        let doc = decode("EntityName:X\nschema:id:int\n").unwrap();
        assert!(doc.rows.is_empty());
    }

    #[test]
    fn test_crlf_tolerated() {
        let doc = decode("EntityName:X\r\nschema:id:int\r\n7\r\n").unwrap();
        assert_eq!(doc.rows[0].get("id"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_missing_required_field_strict() {
        let err = strict("EntityName:X\nschema:id:int¦name:string\n1\n").unwrap_err();
        assert_eq!(err, Error::underflow(3, "name"));
    }

    #[test]
    fn test_extra_values_rejected() {
        let err = strict("EntityName:X\nschema:id:int\n1¦2\n").unwrap_err();
        assert!(matches!(err, Error::RowOverflow { line: 3, .. }));
    }

    #[test]
    fn test_tolerant_skips_bad_rows() {
        let doc = decode("EntityName:X\nschema:id:int\nnope\n2\n").unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].get("id"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_tolerant_coerces_empty_required_scalars() {
        let doc =
            decode("EntityName:X\nschema:i:int¦f:float¦b:bool¦s:string¦z:int\n¦¦¦¦5\n").unwrap();
        let row = &doc.rows[0];
        assert_eq!(row.get("i"), Some(&Value::Int(0)));
        assert_eq!(row.get("f"), Some(&Value::Float(0.0)));
        assert_eq!(row.get("b"), Some(&Value::Bool(false)));
        assert_eq!(row.get("s"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_strict_rejects_empty_required_scalar() {
        let err = strict("EntityName:X\nschema:i:int¦z:int\n¦5\n").unwrap_err();
        assert_eq!(err, Error::underflow(3, "i"));
    }

    #[test]
    fn test_optional_int_with_garbage_is_null_when_tolerant() {
        let doc = decode("EntityName:X\nschema:i:int?\nabc\n").unwrap();
        assert_eq!(doc.rows[0].get("i"), Some(&Value::Null));
    }

    #[test]
    fn test_date_and_datetime_are_lexical() {
        let doc = strict(
            "EntityName:X\nschema:d:date¦t:datetime\n2024-02-31¦2024-01-15T10:30:00Z\n",
        )
        .unwrap();
        assert_eq!(
            doc.rows[0].get("d"),
            Some(&Value::String("2024-02-31".to_string()))
        );

        assert!(strict("EntityName:X\nschema:d:date\n2024-1-05\n").is_err());
        assert!(strict("EntityName:X\nschema:t:datetime\n2024-01-15 10:30:00\n").is_err());
    }

    #[test]
    fn test_datetime_millis_and_offset() {
        let ok = [
            "2024-01-15T10:30:00Z",
            "2024-01-15T10:30:00.123Z",
            "2024-01-15T10:30:00+02:00",
            "2024-01-15T10:30:00.500-05:30",
        ];
        for value in ok {
            let input = format!("EntityName:X\nschema:t:datetime\n{}\n", value);
            assert!(strict(&input).is_ok(), "rejected {}", value);
        }
        let bad = ["2024-01-15T10:30:00", "2024-01-15T10:30:00.12Z"];
        for value in bad {
            let input = format!("EntityName:X\nschema:t:datetime\n{}\n", value);
            assert!(strict(&input).is_err(), "accepted {}", value);
        }
    }

    #[test]
    fn test_object_delimiter_mismatch() {
        let err = strict("EntityName:X\nschema:o:‹a:int›\n5\n").unwrap_err();
        assert!(matches!(err, Error::DelimiterMismatch { .. }));
    }

    #[test]
    fn test_empty_array_and_empty_optional_array() {
        let doc = strict("EntityName:X\nschema:xs:«int»¦ys:<«int»>?\n«»¦\n").unwrap();
        assert_eq!(doc.rows[0].get("xs"), Some(&Value::Array(vec![])));
        assert_eq!(doc.rows[0].get("ys"), Some(&Value::Null));
    }

    #[test]
    fn test_array_of_arrays() {
        let doc = strict("EntityName:X\nschema:m:««int»»\n««1¦2»¦«3»»\n").unwrap();
        assert_eq!(
            doc.rows[0].get("m"),
            Some(&Value::Array(vec![
                Value::Array(vec![Value::Int(1), Value::Int(2)]),
                Value::Array(vec![Value::Int(3)]),
            ]))
        );
    }

    #[test]
    fn test_max_rows_stops_early() {
        let input = "EntityName:X\nschema:id:int\n1\n2\n3\n4\n";
        let doc = decode_with_options(input, &DecodeOptions::new().with_max_rows(2)).unwrap();
        assert_eq!(doc.rows.len(), 2);
    }

    #[test]
    fn test_sampling_truncates_nested_arrays() {
        let input = "EntityName:X\nschema:xs:«int»\n«1¦2¦3¦4¦5»\n";
        let doc = decode_with_options(input, &DecodeOptions::sample()).unwrap();
        assert_eq!(
            doc.rows[0].get("xs"),
            Some(&Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );
    }

    #[test]
    fn test_trim_drops_leading_garbage_and_incomplete_tail() {
        let input = "noise\nmore noise\nEntityName:X\nschema:id:int¦o:<‹a:int›>?\n1¦‹5›\n2¦‹6\n";
        let trimmed = trim_document(input);
        assert_eq!(trimmed, "EntityName:X\nschema:id:int¦o:<‹a:int›>?\n1¦‹5›\n");

        let doc = decode_with_options(input, &DecodeOptions::new().with_trim(true)).unwrap();
        assert_eq!(doc.rows.len(), 1);
    }

    #[test]
    fn test_trim_without_header_yields_empty() {
        assert_eq!(trim_document("no header here\n1¦2\n"), "");
    }

    #[test]
    fn test_row_ending_in_escape_is_incomplete() {
        assert!(!is_complete_row("1¦abc⁊"));
        assert!(is_complete_row("1¦abc⁊¦"));
    }

    #[test]
    fn test_rows_iterator() {
        let input = "EntityName:P\nschema:id:int¦name:string?\n1¦a\n\n2\nbad\n";
        let mut rows = Rows::new(input).unwrap();
        assert_eq!(rows.schema().fields.len(), 2);

        let first = rows.next().unwrap().unwrap();
        assert_eq!(first.get("id"), Some(&Value::Int(1)));

        let second = rows.next().unwrap().unwrap();
        assert_eq!(second.get("name"), Some(&Value::Null));

        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }
}
