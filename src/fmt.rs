//! Schema formatting: pretty-printed multi-line view and back.
//!
//! A schema line is a single compact line, which makes deeply nested ones
//! hard to read. [`pretty_print_schema`] expands one into an indented
//! multi-line view: a `¦` at depth 0 becomes a line break, `‹›` and `«»`
//! sit on their own lines, and enum bodies (`{…}`) stay intact.
//! [`compact_schema`] is the inverse.
//!
//! Both transformations are purely textual; they do not parse the schema
//! and work on any well-bracketed schema line.

use crate::chars::{ARRAY_END, ARRAY_START, ESCAPE, FIELD_DELIMITER, OBJECT_END, OBJECT_START};
use crate::schema::SCHEMA_PREFIX;

/// Pretty-prints a schema line with the default 2-space indent.
///
/// # Examples
///
/// ```rust
/// let pretty = linestruct::pretty_print_schema("schema:id:int¦addr:‹city:string›");
/// assert_eq!(pretty, "schema:\n  id:int\n  addr:\n  ‹\n    city:string\n  ›");
/// ```
#[must_use]
pub fn pretty_print_schema(schema: &str) -> String {
    pretty_print_schema_indent(schema, 2)
}

/// Pretty-prints a schema line with `indent_size` spaces per level. The
/// `schema:` prefix is accepted on input and always present on output.
#[must_use]
pub fn pretty_print_schema_indent(schema: &str, indent_size: usize) -> String {
    let content = schema.strip_prefix(SCHEMA_PREFIX).unwrap_or(schema);

    let mut result = String::from("schema:\n");
    let mut level = 1usize;
    let mut current = String::new();
    let mut in_enum = false;
    let mut escaped = false;

    let flush = |result: &mut String, current: &mut String, level: usize| {
        if !current.trim().is_empty() {
            push_line(result, current.trim(), level, indent_size);
        }
        current.clear();
    };

    for c in content.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        if c == ESCAPE {
            current.push(c);
            escaped = true;
            continue;
        }
        if c == '{' {
            in_enum = true;
            current.push(c);
            continue;
        }
        if c == '}' {
            in_enum = false;
            current.push(c);
            continue;
        }
        if in_enum {
            current.push(c);
            continue;
        }

        match c {
            FIELD_DELIMITER => flush(&mut result, &mut current, level),
            OBJECT_START | ARRAY_START => {
                flush(&mut result, &mut current, level);
                push_line(&mut result, &c.to_string(), level, indent_size);
                level += 1;
            }
            OBJECT_END | ARRAY_END => {
                flush(&mut result, &mut current, level);
                level = level.saturating_sub(1);
                push_line(&mut result, &c.to_string(), level, indent_size);
            }
            _ => current.push(c),
        }
    }
    flush(&mut result, &mut current, level);

    if result.ends_with('\n') {
        result.pop();
    }
    result
}

/// Compacts a pretty-printed schema back to a single `schema:` line,
/// restoring the `¦` delimiters that the line breaks stood for.
#[must_use]
pub fn compact_schema(pretty: &str) -> String {
    let mut lines = pretty.split('\n');
    let mut result = String::from(SCHEMA_PREFIX);
    let mut pending = lines.next();
    if pending.map(str::trim) == Some("schema:") {
        pending = None;
    }

    let mut needs_delimiter = false;
    for line in pending.into_iter().chain(lines) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let is_opening = trimmed == OBJECT_START.to_string() || trimmed == ARRAY_START.to_string();
        let is_closing = trimmed == OBJECT_END.to_string() || trimmed == ARRAY_END.to_string();

        if is_opening {
            // A marker right after `name:` attaches to that field.
            if needs_delimiter && !result.ends_with(':') {
                result.push(FIELD_DELIMITER);
            }
            result.push_str(trimmed);
            needs_delimiter = false;
        } else if is_closing {
            result.push_str(trimmed);
            needs_delimiter = true;
        } else {
            if needs_delimiter {
                result.push(FIELD_DELIMITER);
            }
            result.push_str(trimmed);
            needs_delimiter = true;
        }
    }

    result
}

fn push_line(result: &mut String, text: &str, level: usize, indent_size: usize) {
    for _ in 0..level * indent_size {
        result.push(' ');
    }
    result.push_str(text);
    result.push('\n');
}
