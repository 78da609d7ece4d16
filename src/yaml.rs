//! Schema ↔ YAML bridge.
//!
//! External consumers often keep their row contract in YAML. This module
//! converts a [`Schema`] to that YAML shape and back:
//!
//! ```yaml
//! entityName: Person
//! fields:
//!   id:
//!     type: int
//!     required: true
//!   tags:
//!     type: array
//!     required: false
//!     elementType:
//!       type: string
//! ```
//!
//! The reader is deliberately forgiving: the field map may sit under
//! `fields:` or `properties:` (or be the whole document), a field may be a
//! shorthand string (`int`, `string?`), `required`/`optional` flags are
//! both understood, and the primitive aliases `integer`, `str`, `text`,
//! `double`, `decimal`, and `boolean` are normalized.

use crate::schema::{Field, Primitive, Schema, Type};
use crate::{Error, Result};
use serde_yaml::{Mapping, Value as Yaml};

/// Renders `schema` as YAML with an `entityName` header and a `fields:`
/// mapping, preserving field order.
///
/// # Errors
///
/// [`Error::YamlSyntax`] if serialization fails (it does not for any
/// schema this crate can parse).
pub fn schema_to_yaml(entity_name: &str, schema: &Schema) -> Result<String> {
    let mut root = Mapping::new();
    root.insert(yaml_str("entityName"), yaml_str(entity_name));

    let mut fields = Mapping::new();
    for field in &schema.fields {
        fields.insert(yaml_str(&field.name), field_to_yaml(field));
    }
    root.insert(yaml_str("fields"), Yaml::Mapping(fields));

    serde_yaml::to_string(&Yaml::Mapping(root)).map_err(|e| Error::yaml(e.to_string()))
}

/// Reads a [`Schema`] from a YAML schema definition.
///
/// # Errors
///
/// [`Error::YamlSyntax`] for unparsable YAML, an empty field set, or a
/// field whose type cannot be understood.
pub fn schema_from_yaml(yaml: &str) -> Result<Schema> {
    let root: Yaml = serde_yaml::from_str(yaml).map_err(|e| Error::yaml(e.to_string()))?;

    let entries = field_entries(&root)?;
    let mut fields = Vec::with_capacity(entries.len());
    for (name, def) in entries {
        fields.push(field_from_yaml(&name, def)?);
    }
    if fields.is_empty() {
        return Err(Error::yaml("schema defines no fields"));
    }
    Ok(Schema { fields })
}

fn yaml_str(s: &str) -> Yaml {
    Yaml::String(s.to_string())
}

fn field_to_yaml(field: &Field) -> Yaml {
    let mut map = type_to_yaml(&field.ty);
    map.insert(yaml_str("required"), Yaml::Bool(!field.optional));
    if let Some(desc) = &field.description {
        map.insert(yaml_str("description"), yaml_str(desc));
    }
    Yaml::Mapping(map)
}

fn type_to_yaml(ty: &Type) -> Mapping {
    let mut map = Mapping::new();
    match ty {
        Type::Primitive(p) => {
            map.insert(yaml_str("type"), yaml_str(p.keyword()));
        }
        Type::Enum(values) => {
            map.insert(yaml_str("type"), yaml_str("enum"));
            let values = values.iter().map(|v| yaml_str(v)).collect();
            map.insert(yaml_str("values"), Yaml::Sequence(values));
        }
        Type::Array(element) => {
            map.insert(yaml_str("type"), yaml_str("array"));
            map.insert(
                yaml_str("elementType"),
                Yaml::Mapping(type_to_yaml(element)),
            );
        }
        Type::Object(fields) => {
            map.insert(yaml_str("type"), yaml_str("object"));
            let mut properties = Mapping::new();
            for field in fields {
                properties.insert(yaml_str(&field.name), field_to_yaml(field));
            }
            map.insert(yaml_str("properties"), Yaml::Mapping(properties));
        }
    }
    map
}

/// Locates the field definitions: under `fields:`/`properties:`, a flat
/// mapping, or a sequence of `{name: …, …}` entries.
fn field_entries(root: &Yaml) -> Result<Vec<(String, &Yaml)>> {
    match root {
        Yaml::Mapping(map) => {
            for wrapper in ["fields", "properties"] {
                if let Some(Yaml::Mapping(inner)) = map.get(wrapper) {
                    return mapping_entries(inner);
                }
            }
            mapping_entries(map)
        }
        Yaml::Sequence(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                let Yaml::Mapping(map) = item else {
                    return Err(Error::yaml("schema list entries must be mappings"));
                };
                let Some(Yaml::String(name)) = map.get("name") else {
                    return Err(Error::yaml("schema list entries must carry a 'name'"));
                };
                entries.push((name.clone(), item));
            }
            Ok(entries)
        }
        _ => Err(Error::yaml("schema must be a mapping or a list of fields")),
    }
}

fn mapping_entries(map: &Mapping) -> Result<Vec<(String, &Yaml)>> {
    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let Yaml::String(name) = key else {
            return Err(Error::yaml("field names must be strings"));
        };
        if name == "entityName" {
            continue;
        }
        entries.push((name.clone(), value));
    }
    Ok(entries)
}

fn field_from_yaml(name: &str, def: &Yaml) -> Result<Field> {
    match def {
        // Shorthand: `age: int` or `email: string?`
        Yaml::String(type_str) => {
            let (type_str, optional) = match type_str.strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (type_str.as_str(), false),
            };
            Ok(Field {
                name: name.to_string(),
                ty: type_from_str(name, type_str, def)?,
                optional,
                description: None,
            })
        }
        Yaml::Mapping(map) => {
            let mut optional = !required_flag(map);
            let description = match map.get("description") {
                Some(Yaml::String(desc)) => Some(desc.clone()),
                _ => None,
            };
            let type_str = type_string(name, map)?;
            let type_str = match type_str.strip_suffix('?') {
                Some(stripped) => {
                    optional = true;
                    stripped.to_string()
                }
                None => type_str,
            };
            Ok(Field {
                name: name.to_string(),
                ty: type_from_str(name, &type_str, def)?,
                optional,
                description,
            })
        }
        _ => Err(Error::yaml(format!(
            "field '{}' must be a type string or a mapping",
            name
        ))),
    }
}

fn type_string(name: &str, map: &Mapping) -> Result<String> {
    for key in ["type", "dataType"] {
        if let Some(Yaml::String(ty)) = map.get(key) {
            return Ok(ty.trim().to_lowercase());
        }
    }
    Err(Error::yaml(format!("field '{}' has no type defined", name)))
}

fn type_from_str(name: &str, type_str: &str, def: &Yaml) -> Result<Type> {
    let normalized = type_str.trim().to_lowercase();
    let primitive = match normalized.as_str() {
        "string" | "str" | "text" => Some(Primitive::String),
        "int" | "integer" => Some(Primitive::Int),
        "float" | "double" | "decimal" => Some(Primitive::Float),
        "bool" | "boolean" => Some(Primitive::Bool),
        "date" => Some(Primitive::Date),
        "datetime" => Some(Primitive::DateTime),
        _ => None,
    };
    if let Some(p) = primitive {
        return Ok(Type::Primitive(p));
    }

    let map = def.as_mapping();
    match normalized.as_str() {
        "array" | "list" => {
            let element = match map.and_then(|m| m.get("elementType")) {
                Some(element_def) => element_type_from_yaml(name, element_def)?,
                None => Type::Primitive(Primitive::String),
            };
            Ok(Type::Array(Box::new(element)))
        }
        "object" | "map" | "dict" => {
            let Some(Yaml::Mapping(properties)) = map.and_then(|m| m.get("properties"))
            else {
                return Err(Error::yaml(format!(
                    "object field '{}' must declare properties",
                    name
                )));
            };
            let mut fields = Vec::with_capacity(properties.len());
            for (key, value) in properties {
                let Yaml::String(child) = key else {
                    return Err(Error::yaml("field names must be strings"));
                };
                fields.push(field_from_yaml(child, value)?);
            }
            if fields.is_empty() {
                return Err(Error::yaml(format!(
                    "object field '{}' has no properties",
                    name
                )));
            }
            Ok(Type::Object(fields))
        }
        "enum" => {
            let Some(Yaml::Sequence(raw)) = map.and_then(|m| m.get("values")) else {
                return Err(Error::yaml(format!(
                    "enum field '{}' must declare values",
                    name
                )));
            };
            let mut values = Vec::with_capacity(raw.len());
            for item in raw {
                match item {
                    Yaml::String(s) => values.push(s.clone()),
                    other => {
                        return Err(Error::yaml(format!(
                            "enum field '{}' has a non-string value: {:?}",
                            name, other
                        )))
                    }
                }
            }
            if values.is_empty() {
                return Err(Error::yaml(format!("enum field '{}' has no values", name)));
            }
            Ok(Type::Enum(values))
        }
        other => Err(Error::yaml(format!(
            "field '{}' has unsupported type '{}'",
            name, other
        ))),
    }
}

fn element_type_from_yaml(name: &str, def: &Yaml) -> Result<Type> {
    match def {
        Yaml::String(type_str) => type_from_str(name, type_str, def),
        Yaml::Mapping(map) => {
            let type_str = type_string(name, map)?;
            type_from_str(name, &type_str, def)
        }
        _ => Err(Error::yaml(format!(
            "elementType of '{}' must be a type string or a mapping",
            name
        ))),
    }
}

fn required_flag(map: &Mapping) -> bool {
    match map.get("required") {
        Some(Yaml::Bool(required)) => return *required,
        Some(Yaml::String(required)) => return required == "true",
        _ => {}
    }
    match map.get("optional") {
        Some(Yaml::Bool(optional)) => !*optional,
        _ => true,
    }
}
