//! Schema AST and the `schema:` line parser.
//!
//! A schema describes one row: an ordered list of named, typed, possibly
//! optional field slots. The textual grammar (over the structural code
//! points) is:
//!
//! ```text
//! Schema      := "schema:" FieldList
//! FieldList   := Field ("¦" Field)*
//! Field       := Ident ":" Type ("@desc=\"" DescChars "\"")?
//! Type        := Optional | Array | Object | Enum | Primitive
//! Optional    := "<" InnerType ">?" | InnerType "?"
//! Array       := "«" Type "»"
//! Object      := "‹" FieldList "›"
//! Enum        := "{" EnumVal ("|" EnumVal)* "}"
//! Primitive   := "string"|"int"|"float"|"bool"|"date"|"datetime"
//! Ident       := [A-Za-z_][A-Za-z_0-9]*
//! ```
//!
//! Both optional spellings produce the same AST. Rendering emits the short
//! form (`name:int?`) for primitives and enums and the long form
//! (`name:<«int»>?`) for arrays and objects.
//!
//! A parsed [`Schema`] is immutable; the row parser, validator, and
//! encoder all borrow it read-only.

use crate::chars::{self, ARRAY_END, ARRAY_START, ENUM_SEPARATOR, ESCAPE, FIELD_DELIMITER, OBJECT_END, OBJECT_START};
use crate::split::{split, SplitMode};
use crate::{Error, Result};
use std::fmt;

/// The built-in scalar column types.
///
/// `Date` and `DateTime` are lexical types: values must match the strict
/// ISO shapes (`YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff](Z|±HH:MM)`) but are
/// kept as strings, with no calendar check and no timezone normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    String,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
}

impl Primitive {
    /// The keyword used in schema text.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Date => "date",
            Primitive::DateTime => "datetime",
        }
    }

    fn from_keyword(s: &str) -> Option<Primitive> {
        match s {
            "string" => Some(Primitive::String),
            "int" => Some(Primitive::Int),
            "float" => Some(Primitive::Float),
            "bool" => Some(Primitive::Bool),
            "date" => Some(Primitive::Date),
            "datetime" => Some(Primitive::DateTime),
            _ => None,
        }
    }
}

/// A column type: a scalar, an enum over string literals, an array of a
/// single element type, or a nested object with its own field list.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    /// Non-empty, ordered, duplicate-free set of string values, compared
    /// by exact post-unescape equality.
    Enum(Vec<String>),
    Array(Box<Type>),
    Object(Vec<Field>),
}

impl Type {
    /// Arrays and objects take the long optional spelling (`<T>?`).
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Object(_))
    }
}

/// One field slot: position in the parent object, name, type, optionality,
/// and an optional human-readable description.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    pub description: Option<String>,
}

impl Field {
    /// Creates a required field with no description.
    #[must_use]
    pub fn required(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            optional: false,
            description: None,
        }
    }

    /// Creates an optional field with no description.
    #[must_use]
    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            optional: true,
            description: None,
        }
    }
}

/// A parsed schema: the root object whose fields are the row's columns.
///
/// # Examples
///
/// ```rust
/// use linestruct::{Schema, Type, Primitive};
///
/// let schema = Schema::parse("schema:id:int¦name:string¦email:<string>?").unwrap();
/// assert_eq!(schema.fields.len(), 3);
/// assert_eq!(schema.fields[0].ty, Type::Primitive(Primitive::Int));
/// assert!(schema.fields[2].optional);
/// assert_eq!(schema.to_string(), "id:int¦name:string¦email:string?");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    pub fields: Vec<Field>,
}

/// Prefix of the schema line.
pub(crate) const SCHEMA_PREFIX: &str = "schema:";

impl Schema {
    /// Parses a full `schema:` line.
    ///
    /// # Errors
    ///
    /// [`Error::HeaderMissing`] when the `schema:` prefix is absent,
    /// [`Error::SchemaSyntax`] for any grammar violation, located by
    /// code-point index from the start of the line.
    pub fn parse(line: &str) -> Result<Schema> {
        let Some(content) = line.strip_prefix(SCHEMA_PREFIX) else {
            return Err(Error::header("second line must start with 'schema:'"));
        };
        let base = SCHEMA_PREFIX.chars().count();
        check_balanced(content, base)?;
        let fields = parse_field_list(content, base)?;
        if fields.is_empty() {
            return Err(Error::schema(base, "schema must declare at least one field"));
        }
        Ok(Schema { fields })
    }

    /// Looks a field up by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_field_list(f, &self.fields)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => f.write_str(p.keyword()),
            Type::Enum(values) => {
                f.write_str("{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", ENUM_SEPARATOR)?;
                    }
                    f.write_str(&chars::escape(v))?;
                }
                f.write_str("}")
            }
            Type::Array(element) => write!(f, "{}{}{}", ARRAY_START, element, ARRAY_END),
            Type::Object(fields) => {
                write!(f, "{}", OBJECT_START)?;
                write_field_list(f, fields)?;
                write!(f, "{}", OBJECT_END)
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if self.optional {
            if self.ty.is_composite() {
                write!(f, "<{}>?", self.ty)?;
            } else {
                write!(f, "{}?", self.ty)?;
            }
        } else {
            write!(f, "{}", self.ty)?;
        }
        if let Some(desc) = &self.description {
            write!(f, "@desc=\"{}\"", desc)?;
        }
        Ok(())
    }
}

fn write_field_list(f: &mut fmt::Formatter<'_>, fields: &[Field]) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", FIELD_DELIMITER)?;
        }
        write!(f, "{}", field)?;
    }
    Ok(())
}

/// Verifies that `‹›`, `«»`, and `{}` pair up, reporting the code-point
/// offset of the first mismatch. Runs before recursive descent so the
/// descent can assume balance.
fn check_balanced(content: &str, base: usize) -> Result<()> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut escaped = false;
    for (idx, c) in content.chars().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            ESCAPE => escaped = true,
            OBJECT_START | ARRAY_START | '{' => stack.push((c, base + idx)),
            OBJECT_END | ARRAY_END | '}' => {
                let expected = match c {
                    OBJECT_END => OBJECT_START,
                    ARRAY_END => ARRAY_START,
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    _ => return Err(Error::schema(base + idx, format!("unmatched '{}'", c))),
                }
            }
            _ => {}
        }
    }
    if let Some((open, idx)) = stack.pop() {
        return Err(Error::schema(idx, format!("unterminated '{}'", open)));
    }
    Ok(())
}

/// Parses a `¦`-separated field list. `base` is the code-point offset of
/// `content` within the schema line, carried down for error locations.
fn parse_field_list(content: &str, base: usize) -> Result<Vec<Field>> {
    let mut fields: Vec<Field> = Vec::new();
    let mut offset = base;
    for segment in split(content, SplitMode::ObjectFields) {
        let field = parse_field(segment, offset)?;
        if fields.iter().any(|f| f.name == field.name) {
            return Err(Error::schema(
                offset,
                format!("duplicate field name '{}'", field.name),
            ));
        }
        fields.push(field);
        offset += segment.chars().count() + 1;
    }
    Ok(fields)
}

/// Parses one `name:type` definition, peeling the `@desc="…"` suffix and
/// either optional spelling before descending into the type.
fn parse_field(def: &str, base: usize) -> Result<Field> {
    let Some(colon) = def.find(':') else {
        return Err(Error::schema(
            base,
            format!("missing ':' in field definition '{}'", def),
        ));
    };
    let name = &def[..colon];
    if !is_identifier(name) {
        return Err(Error::schema(base, format!("invalid field name '{}'", name)));
    }

    let mut ty_str = &def[colon + 1..];
    let mut ty_base = base + name.chars().count() + 1;

    let mut description = None;
    if ty_str.ends_with('"') {
        if let Some(idx) = ty_str.rfind("@desc=\"") {
            let desc = &ty_str[idx + 7..ty_str.len() - 1];
            if !desc.contains('"') {
                description = Some(desc.to_string());
                ty_str = &ty_str[..idx];
            }
        }
    }

    let mut optional = false;
    if ty_str.starts_with('<') && ty_str.ends_with(">?") {
        optional = true;
        ty_str = &ty_str[1..ty_str.len() - 2];
        ty_base += 1;
    } else if ty_str.ends_with('?') {
        optional = true;
        ty_str = &ty_str[..ty_str.len() - 1];
    }

    let ty = parse_type(ty_str, ty_base)?;
    Ok(Field {
        name: name.to_string(),
        ty,
        optional,
        description,
    })
}

fn parse_type(ty_str: &str, base: usize) -> Result<Type> {
    let leading = ty_str.chars().take_while(|c| c.is_whitespace()).count();
    let s = ty_str.trim();
    let base = base + leading;

    if s.is_empty() {
        return Err(Error::schema(base, "missing type"));
    }
    if s.ends_with('?') {
        // Optionality attaches to a field slot, never to a bare type.
        return Err(Error::schema(
            base,
            "optional marker '?' is only valid on a field",
        ));
    }

    if let Some(rest) = s.strip_prefix(ARRAY_START) {
        let Some(inner) = rest.strip_suffix(ARRAY_END) else {
            return Err(Error::schema(base, format!("unterminated '{}'", ARRAY_START)));
        };
        let element = parse_type(inner, base + 1)?;
        return Ok(Type::Array(Box::new(element)));
    }

    if let Some(rest) = s.strip_prefix(OBJECT_START) {
        let Some(inner) = rest.strip_suffix(OBJECT_END) else {
            return Err(Error::schema(base, format!("unterminated '{}'", OBJECT_START)));
        };
        let fields = parse_field_list(inner, base + 1)?;
        if fields.is_empty() {
            return Err(Error::schema(base, "object type must declare at least one field"));
        }
        return Ok(Type::Object(fields));
    }

    if let Some(rest) = s.strip_prefix('{') {
        let Some(inner) = rest.strip_suffix('}') else {
            return Err(Error::schema(base, "unterminated '{'"));
        };
        return parse_enum(inner, base);
    }

    match Primitive::from_keyword(s) {
        Some(p) => Ok(Type::Primitive(p)),
        None => Err(Error::schema(base, format!("unknown type '{}'", s))),
    }
}

fn parse_enum(content: &str, base: usize) -> Result<Type> {
    if content.trim().is_empty() {
        return Err(Error::schema(base, "enum must declare at least one value"));
    }
    let mut values: Vec<String> = Vec::new();
    for raw in split_enum_values(content) {
        let value = chars::unescape(raw.trim());
        if value.is_empty() {
            return Err(Error::schema(base, "empty enum value"));
        }
        if values.contains(&value) {
            return Err(Error::schema(base, format!("duplicate enum value '{}'", value)));
        }
        values.push(value);
    }
    Ok(Type::Enum(values))
}

/// Splits an enum body on unescaped `|`.
fn split_enum_values(content: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in content.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == ESCAPE {
            escaped = true;
        } else if c == ENUM_SEPARATOR {
            parts.push(&content[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&content[start..]);
    parts
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
