//! Document validation, standalone and against an external schema.
//!
//! Two public surfaces:
//!
//! - [`is_valid_document`]: does the text parse strictly, every data line
//!   decoding without error?
//! - [`validate_against`] / [`validate_against_yaml`]: is the document
//!   compatible with an externally supplied schema, and does every row
//!   satisfy its own declared schema? Returns `None` on success or a
//!   single diagnostic string; row diagnostics carry a 1-based line
//!   number.
//!
//! Compatibility between an external schema and the document's declared
//! schema is structural:
//!
//! - primitives must match exactly (no widening);
//! - arrays are compatible when their element types are;
//! - objects recurse field-by-field under the same rules;
//! - an external enum must accept a superset of the document enum's
//!   values;
//! - a required document field must exist in the external schema and a
//!   required external field must exist in the document schema.

use crate::de::{decode_row, decode_with_options};
use crate::options::DecodeOptions;
use crate::schema::{Field, Schema, Type};
use crate::yaml::schema_from_yaml;
use crate::{Error, Result};

/// Returns `true` when `input` is a well-formed document whose every data
/// line decodes strictly against its declared schema.
///
/// # Examples
///
/// ```rust
/// use linestruct::is_valid_document;
///
/// assert!(is_valid_document("EntityName:P\nschema:id:int\n1\n"));
/// assert!(!is_valid_document("EntityName:P\nschema:id:int\noops\n"));
/// ```
#[must_use]
pub fn is_valid_document(input: &str) -> bool {
    decode_with_options(input, &DecodeOptions::strict()).is_ok()
}

/// Validates `input` against an external [`Schema`].
///
/// Returns `None` when the document schema is compatible with `external`
/// and every data row decodes strictly; otherwise a diagnostic naming the
/// line and field where validation stopped.
#[must_use]
pub fn validate_against(external: &Schema, input: &str) -> Option<String> {
    let text = input.trim();
    if text.is_empty() {
        return Some(Error::EmptyInput.to_string());
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if lines.len() < 2 {
        return Some(
            Error::header("minimum 2 lines required (EntityName and schema)").to_string(),
        );
    }

    let doc_schema = match Schema::parse(lines[1]) {
        Ok(schema) => schema,
        Err(err) => return Some(err.to_string()),
    };

    if let Err(err) = check_fields_compat(&doc_schema.fields, &external.fields) {
        return Some(err.to_string());
    }

    for (idx, line) in lines.iter().enumerate().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = decode_row(line, &doc_schema, idx + 1, true) {
            return Some(err.to_string());
        }
    }

    None
}

/// Validates `input` against an external schema written in YAML.
///
/// See [`schema_from_yaml`](crate::schema_from_yaml) for the accepted
/// YAML shapes. A YAML problem is reported the same way as a schema
/// mismatch: as the returned diagnostic.
#[must_use]
pub fn validate_against_yaml(yaml: &str, input: &str) -> Option<String> {
    match schema_from_yaml(yaml) {
        Ok(external) => validate_against(&external, input),
        Err(err) => Some(err.to_string()),
    }
}

fn check_fields_compat(doc_fields: &[Field], ext_fields: &[Field]) -> Result<()> {
    for field in doc_fields {
        match ext_fields.iter().find(|f| f.name == field.name) {
            Some(ext) => check_type_compat(&field.name, &field.ty, &ext.ty)?,
            None if !field.optional => {
                return Err(Error::external(
                    &field.name,
                    "is required by the document schema but not defined in the external schema",
                ));
            }
            None => {}
        }
    }

    for ext in ext_fields {
        if !ext.optional && !doc_fields.iter().any(|f| f.name == ext.name) {
            return Err(Error::external(
                &ext.name,
                "is required by the external schema but missing from the document schema",
            ));
        }
    }

    Ok(())
}

fn check_type_compat(name: &str, doc_ty: &Type, ext_ty: &Type) -> Result<()> {
    match (doc_ty, ext_ty) {
        (Type::Primitive(doc), Type::Primitive(ext)) if doc == ext => Ok(()),
        (Type::Array(doc), Type::Array(ext)) => check_type_compat(name, doc, ext),
        (Type::Object(doc), Type::Object(ext)) => check_fields_compat(doc, ext),
        (Type::Enum(doc), Type::Enum(ext)) => {
            match doc.iter().find(|v| !ext.contains(v)) {
                None => Ok(()),
                Some(value) => Err(Error::external(
                    name,
                    format!(
                        "declares enum value '{}' the external schema does not accept",
                        value
                    ),
                )),
            }
        }
        _ => Err(Error::external(
            name,
            format!(
                "type mismatch: document declares '{}', external schema expects '{}'",
                doc_ty, ext_ty
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Primitive;

    fn schema(line: &str) -> Schema {
        Schema::parse(line).unwrap()
    }

    #[test]
    fn test_identical_schemas_validate() {
        let external = schema("schema:id:int¦name:string");
        let doc = "EntityName:P\nschema:id:int¦name:string\n1¦John\n";
        assert_eq!(validate_against(&external, doc), None);
    }

    #[test]
    fn test_primitive_mismatch_is_reported() {
        let external = schema("schema:id:string¦name:string");
        let doc = "EntityName:P\nschema:id:int¦name:string\n1¦John\n";
        let diag = validate_against(&external, doc).unwrap();
        assert!(diag.contains("id"), "diagnostic was: {}", diag);
    }

    #[test]
    fn test_no_primitive_widening() {
        let external = schema("schema:x:float");
        let doc = "EntityName:P\nschema:x:int\n1\n";
        assert!(validate_against(&external, doc).is_some());
    }

    #[test]
    fn test_required_external_field_must_exist() {
        let external = schema("schema:id:int¦age:int");
        let doc = "EntityName:P\nschema:id:int\n1\n";
        let diag = validate_against(&external, doc).unwrap();
        assert!(diag.contains("age"));
    }

    #[test]
    fn test_optional_external_field_may_be_absent() {
        let external = schema("schema:id:int¦age:<int>?");
        let doc = "EntityName:P\nschema:id:int\n1\n";
        assert_eq!(validate_against(&external, doc), None);
    }

    #[test]
    fn test_required_doc_field_unknown_to_external() {
        let external = schema("schema:id:int");
        let doc = "EntityName:P\nschema:id:int¦extra:string\n1¦x\n";
        let diag = validate_against(&external, doc).unwrap();
        assert!(diag.contains("extra"));
    }

    #[test]
    fn test_enum_superset_accepted_subset_not() {
        let external = schema("schema:s:{a|b|c}");
        let doc = "EntityName:P\nschema:s:{a|b}\na\n";
        assert_eq!(validate_against(&external, doc), None);

        let narrow = schema("schema:s:{a}");
        let diag = validate_against(&narrow, doc).unwrap();
        assert!(diag.contains("'b'"));
    }

    #[test]
    fn test_array_and_object_recurse() {
        let external = schema("schema:xs:«int»¦o:‹a:int¦b:string›");
        let doc = "EntityName:P\nschema:xs:«int»¦o:‹a:int¦b:string›\n«1»¦‹2¦x›\n";
        assert_eq!(validate_against(&external, doc), None);

        let external_bad = schema("schema:xs:«string»¦o:‹a:int¦b:string›");
        assert!(validate_against(&external_bad, doc).is_some());
    }

    #[test]
    fn test_row_error_carries_line_number() {
        let external = schema("schema:id:int");
        let doc = "EntityName:P\nschema:id:int\n1\nnope\n";
        let diag = validate_against(&external, doc).unwrap();
        assert!(diag.starts_with("Line 4:"), "diagnostic was: {}", diag);
    }

    #[test]
    fn test_empty_input() {
        let external = Schema {
            fields: vec![Field::required("id", Type::Primitive(Primitive::Int))],
        };
        assert!(validate_against(&external, "  \n ").is_some());
    }
}
