//! Schema inference and document encoding.
//!
//! The encode path is: rows (ordered [`Map`]s) → [`infer_schema`] →
//! rendered document text. Inference is what makes the JSON → LineStruct
//! direction work without a user-supplied schema:
//!
//! - field order is the first row's key order, with keys first seen in
//!   later rows appended in order of first appearance;
//! - a field is optional when any row omits it or carries null;
//! - the type comes from the first non-null value (a field that is null
//!   everywhere falls back to `string`);
//! - an array's element type comes from the first element of the first
//!   non-empty array across rows.
//!
//! Rendering writes one line per row in schema order and trims trailing
//! empty optional fields, so `1¦Alice¦¦` comes out as `1¦Alice`.
//!
//! ## Usage
//!
//! ```rust
//! use linestruct::{encode, tree, Value};
//!
//! let rows = vec![
//!     tree!({"id": 1, "name": "Alice"}),
//!     tree!({"id": 2, "name": "Bob"}),
//! ];
//! let rows: Vec<_> = rows
//!     .into_iter()
//!     .map(|v| match v {
//!         Value::Object(m) => m,
//!         _ => unreachable!(),
//!     })
//!     .collect();
//!
//! let text = encode("Person", &rows);
//! assert_eq!(text, "EntityName:Person\nschema:id:int¦name:string\n1¦Alice\n2¦Bob\n");
//! ```

use crate::chars::{self, ARRAY_END, ARRAY_START, FIELD_DELIMITER, OBJECT_END, OBJECT_START};
use crate::de::{Document, ENTITY_PREFIX};
use crate::schema::{Field, Primitive, Schema, Type};
use crate::{Error, Map, Result, Value};

/// Derives a schema from a homogeneous sequence of rows.
#[must_use]
pub fn infer_schema(rows: &[Map]) -> Schema {
    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !names.iter().any(|&n| n == key.as_str()) {
                names.push(key);
            }
        }
    }

    let mut fields = Vec::with_capacity(names.len());
    for name in names {
        let mut optional = false;
        let mut first_non_null: Option<&Value> = None;
        for row in rows {
            match row.get(name) {
                None | Some(Value::Null) => optional = true,
                Some(value) => {
                    if first_non_null.is_none() {
                        first_non_null = Some(value);
                    }
                }
            }
        }

        let ty = match first_non_null {
            None => Type::Primitive(Primitive::String),
            Some(Value::Array(_)) => {
                // Element type from the first non-empty array across rows.
                let element = rows
                    .iter()
                    .filter_map(|row| row.get(name))
                    .filter_map(Value::as_array)
                    .find(|arr| !arr.is_empty())
                    .map(|arr| infer_type(&arr[0]))
                    .unwrap_or(Type::Primitive(Primitive::String));
                Type::Array(Box::new(element))
            }
            Some(value) => infer_type(value),
        };

        fields.push(Field {
            name: name.to_string(),
            ty,
            optional,
            description: None,
        });
    }

    Schema { fields }
}

fn infer_type(value: &Value) -> Type {
    match value {
        Value::Int(_) => Type::Primitive(Primitive::Int),
        Value::Float(_) => Type::Primitive(Primitive::Float),
        Value::Bool(_) => Type::Primitive(Primitive::Bool),
        Value::Null | Value::String(_) => Type::Primitive(Primitive::String),
        Value::Array(arr) => {
            let element = arr
                .first()
                .map(infer_type)
                .unwrap_or(Type::Primitive(Primitive::String));
            Type::Array(Box::new(element))
        }
        Value::Object(obj) => {
            let fields = obj
                .iter()
                .map(|(name, v)| Field {
                    name: name.clone(),
                    ty: infer_type(v),
                    optional: v.is_null(),
                    description: None,
                })
                .collect();
            Type::Object(fields)
        }
    }
}

/// Encodes `rows` as a full document, inferring the schema first. An empty
/// row set produces a header and a bare `schema:` line.
#[must_use]
pub fn encode(entity_name: &str, rows: &[Map]) -> String {
    let mut out = String::new();
    out.push_str(ENTITY_PREFIX);
    out.push_str(entity_name);
    out.push('\n');

    if rows.is_empty() {
        out.push_str("schema:\n");
        return out;
    }

    let schema = infer_schema(rows);
    out.push_str("schema:");
    out.push_str(&schema.to_string());
    out.push('\n');

    for row in rows {
        out.push_str(&render_row(row, &schema));
        out.push('\n');
    }
    out
}

/// Re-encodes a decoded document, inferring a fresh schema from its rows.
#[must_use]
pub fn encode_document(doc: &Document) -> String {
    encode(&doc.entity_name, &doc.rows)
}

/// Renders one row in schema order, then trims everything after the last
/// slot that is required or non-empty. Required fields never disappear.
fn render_row(row: &Map, schema: &Schema) -> String {
    let values: Vec<String> = schema
        .fields
        .iter()
        .map(|field| render_value(row.get(&field.name), &field.ty))
        .collect();

    let mut last = None;
    for i in (0..values.len()).rev() {
        if !schema.fields[i].optional || !values[i].is_empty() {
            last = Some(i);
            break;
        }
    }

    match last {
        None => String::new(),
        Some(last) => values[..=last].join(&FIELD_DELIMITER.to_string()),
    }
}

fn render_value(value: Option<&Value>, ty: &Type) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if value.is_null() {
        return String::new();
    }

    let delim = FIELD_DELIMITER.to_string();
    match ty {
        Type::Array(element) => match value {
            Value::Array(arr) => {
                let parts: Vec<String> = arr
                    .iter()
                    .map(|v| render_value(Some(v), element))
                    .collect();
                format!("{}{}{}", ARRAY_START, parts.join(&delim), ARRAY_END)
            }
            other => render_untyped(other),
        },
        Type::Object(fields) => match value {
            Value::Object(obj) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|field| render_value(obj.get(&field.name), &field.ty))
                    .collect();
                format!("{}{}{}", OBJECT_START, parts.join(&delim), OBJECT_END)
            }
            other => render_untyped(other),
        },
        Type::Enum(_) | Type::Primitive(_) => render_untyped(value),
    }
}

/// Schema-free rendering, used for scalar leaves and for values whose
/// shape disagrees with the schema node.
fn render_untyped(value: &Value) -> String {
    let delim = FIELD_DELIMITER.to_string();
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => chars::escape(s),
        Value::Array(arr) => {
            let parts: Vec<String> = arr.iter().map(render_untyped).collect();
            format!("{}{}{}", ARRAY_START, parts.join(&delim), ARRAY_END)
        }
        Value::Object(obj) => {
            let parts: Vec<String> = obj.values().map(render_untyped).collect();
            format!("{}{}{}", OBJECT_START, parts.join(&delim), OBJECT_END)
        }
    }
}

/// Converts a decoded document to the JSON surface
/// `{ "entityName": …, "data": [ … ] }`, pretty-printed, with row keys in
/// field-declaration order.
pub(crate) fn document_to_json(doc: &Document) -> Result<String> {
    let mut root = Map::new();
    root.insert(
        "entityName".to_string(),
        Value::String(doc.entity_name.clone()),
    );
    root.insert(
        "data".to_string(),
        Value::Array(doc.rows.iter().cloned().map(Value::Object).collect()),
    );
    serde_json::to_string_pretty(&Value::Object(root)).map_err(|e| Error::json(e.to_string()))
}

/// Converts JSON of the shape `{ "entityName": …, "data": [ … ] }` into a
/// LineStruct document, inferring the schema from the rows.
///
/// # Errors
///
/// [`Error::JsonSyntax`] for unparsable JSON or a payload that is missing
/// `entityName`/`data`, or whose `data` elements are not objects.
pub fn from_json(json: &str) -> Result<String> {
    let root: Value = serde_json::from_str(json).map_err(|e| Error::json(e.to_string()))?;
    let Value::Object(obj) = root else {
        return Err(Error::json("top-level value must be an object"));
    };
    let entity = obj
        .get("entityName")
        .ok_or_else(|| Error::json("missing required field: entityName"))?;
    let Some(entity_name) = entity.as_str() else {
        return Err(Error::json("field 'entityName' must be a string"));
    };
    let data = obj
        .get("data")
        .ok_or_else(|| Error::json("missing required field: data"))?;
    let Some(elements) = data.as_array() else {
        return Err(Error::json("field 'data' must be an array"));
    };

    let mut rows = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            Value::Object(row) => rows.push(row.clone()),
            _ => return Err(Error::json("elements of 'data' must be objects")),
        }
    }

    Ok(encode(entity_name, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    fn row(value: Value) -> Map {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_infer_field_order_first_row_wins() {
        let rows = vec![
            row(tree!({"b": 1, "a": 2})),
            row(tree!({"a": 3, "b": 4, "c": 5})),
        ];
        let schema = infer_schema(&rows);
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        // "c" is absent from the first row, so it is optional.
        assert!(schema.fields[2].optional);
    }

    #[test]
    fn test_infer_optional_on_null() {
        let rows = vec![row(tree!({"x": 1})), row(tree!({"x": null}))];
        let schema = infer_schema(&rows);
        assert!(schema.fields[0].optional);
        assert_eq!(schema.fields[0].ty, Type::Primitive(Primitive::Int));
    }

    #[test]
    fn test_infer_all_null_defaults_to_string() {
        let rows = vec![row(tree!({"x": null}))];
        let schema = infer_schema(&rows);
        assert_eq!(schema.fields[0].ty, Type::Primitive(Primitive::String));
        assert!(schema.fields[0].optional);
    }

    #[test]
    fn test_infer_array_element_from_first_non_empty() {
        let rows = vec![row(tree!({"xs": []})), row(tree!({"xs": [1, 2]}))];
        let schema = infer_schema(&rows);
        assert_eq!(
            schema.fields[0].ty,
            Type::Array(Box::new(Type::Primitive(Primitive::Int)))
        );
    }

    #[test]
    fn test_infer_nested_object() {
        let rows = vec![row(tree!({"p": {"bio": "dev", "age": 30}}))];
        let schema = infer_schema(&rows);
        match &schema.fields[0].ty {
            Type::Object(fields) => {
                assert_eq!(fields[0].name, "bio");
                assert!(!fields[0].optional);
                assert_eq!(fields[1].ty, Type::Primitive(Primitive::Int));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_trims_trailing_optionals() {
        let rows = vec![
            row(tree!({"id": 1, "email": "a@x.com"})),
            row(tree!({"id": 2, "email": null})),
        ];
        let text = encode("User", &rows);
        assert_eq!(
            text,
            "EntityName:User\nschema:id:int¦email:string?\n1¦a@x.com\n2\n"
        );
    }

    #[test]
    fn test_encode_required_empty_string_keeps_slot() {
        let rows = vec![row(tree!({"name": "", "id": 1}))];
        let text = encode("X", &rows);
        assert_eq!(text, "EntityName:X\nschema:name:string¦id:int\n¦1\n");
    }

    #[test]
    fn test_encode_escapes_scalars() {
        let rows = vec![row(tree!({"t": "a¦b"}))];
        let text = encode("X", &rows);
        assert_eq!(text, "EntityName:X\nschema:t:string\na⁊¦b\n");
    }

    #[test]
    fn test_encode_nested() {
        let rows = vec![row(tree!({
            "id": 1,
            "customer": {"name": "John", "email": "j@x.com"},
            "items": [{"p": "Laptop", "q": 1}, {"p": "Mouse", "q": 2}]
        }))];
        let text = encode("Order", &rows);
        assert_eq!(
            text,
            "EntityName:Order\n\
             schema:id:int¦customer:‹name:string¦email:string›¦items:«‹p:string¦q:int›»\n\
             1¦‹John¦j@x.com›¦«‹Laptop¦1›¦‹Mouse¦2›»\n"
        );
    }

    #[test]
    fn test_encode_empty_rows() {
        assert_eq!(encode("Empty", &[]), "EntityName:Empty\nschema:\n");
    }

    #[test]
    fn test_from_json_requires_shape() {
        assert!(from_json("not json").is_err());
        assert!(from_json(r#"{"data": []}"#).is_err());
        assert!(from_json(r#"{"entityName": "X"}"#).is_err());
        assert!(from_json(r#"{"entityName": "X", "data": [1]}"#).is_err());
    }

    #[test]
    fn test_from_json_round() {
        let json = r#"{"entityName":"Person","data":[{"id":1,"name":"John"},{"id":2,"name":"Jane"}]}"#;
        let text = from_json(json).unwrap();
        assert_eq!(
            text,
            "EntityName:Person\nschema:id:int¦name:string\n1¦John\n2¦Jane\n"
        );
    }
}
