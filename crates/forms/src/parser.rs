//! Mapping table parsing and data binding

use crate::schema::{FormSchema, Predicate, TextEntry, PAGE_TOKEN};
use crate::{FormError, Result};
use std::collections::HashSet;

/// Parse and validate a mapping table from a JSON string
pub fn parse_schema(json: &str) -> Result<FormSchema> {
    let schema: FormSchema =
        serde_json::from_str(json).map_err(|e| FormError::SchemaError(e.to_string()))?;
    validate(&schema)?;
    Ok(schema)
}

fn validate(schema: &FormSchema) -> Result<()> {
    let fail = |msg: String| -> Result<()> {
        Err(FormError::SchemaError(format!("{}: {}", schema.form, msg)))
    };

    for entry in schema.text_entries() {
        let sources = [
            entry.bind.is_some(),
            entry.format.is_some(),
            entry.first.is_some(),
            entry.text.is_some(),
            entry.placeholder,
        ]
        .iter()
        .filter(|s| **s)
        .count();
        if sources != 1 {
            return fail(format!(
                "{} must have exactly one source, found {}",
                entry.field, sources
            ));
        }

        for path in text_paths(entry) {
            check_path(&schema.form, &entry.field, path)?;
        }
        if let Some(when) = &entry.when {
            check_predicate(&schema.form, &entry.field, when)?;
        }
        check_pages(&schema.form, &entry.field, entry.pages.as_deref())?;
    }

    for entry in schema.checkbox_entries() {
        check_predicate(&schema.form, &entry.field, &entry.when)?;
        check_pages(&schema.form, &entry.field, entry.pages.as_deref())?;
    }

    let mut seen = HashSet::new();
    for field in schema.destinations() {
        if !seen.insert(field.clone()) {
            return fail(format!("{field} is written more than once"));
        }
    }

    Ok(())
}

fn text_paths(entry: &TextEntry) -> Vec<&str> {
    let mut paths = Vec::new();
    if let Some(bind) = &entry.bind {
        paths.push(bind.as_str());
    }
    if let Some(first) = &entry.first {
        paths.extend(first.iter().map(String::as_str));
    }
    if let Some(format) = &entry.format {
        paths.extend(format_placeholders(format));
    }
    paths
}

fn check_path(form: &str, field: &str, path: &str) -> Result<()> {
    if path.starts_with("$.") && path.len() > 2 {
        Ok(())
    } else {
        Err(FormError::SchemaError(format!(
            "{form}: {field} has invalid binding {path:?}"
        )))
    }
}

fn check_predicate(form: &str, field: &str, predicate: &Predicate) -> Result<()> {
    predicate
        .paths()
        .into_iter()
        .try_for_each(|path| check_path(form, field, path))
}

fn check_pages(form: &str, field: &str, pages: Option<&[u32]>) -> Result<()> {
    let has_token = field.contains(PAGE_TOKEN);
    match pages {
        Some(pages) if !has_token || pages.is_empty() => Err(FormError::SchemaError(format!(
            "{form}: {field} needs both a {PAGE_TOKEN} token and a non-empty page list"
        ))),
        None if has_token => Err(FormError::SchemaError(format!(
            "{form}: {field} has a {PAGE_TOKEN} token but no pages"
        ))),
        _ => Ok(()),
    }
}

/// Resolve a JSONPath-like binding expression against data
///
/// Supports simple paths like:
/// - `$.field` - Root field
/// - `$.object.field` - Nested field
/// - `$.array[0]` - Array index
/// - `$.array[0].field` - Array element field
pub fn resolve_binding<'a>(
    path: &str,
    data: &'a serde_json::Value,
) -> Option<&'a serde_json::Value> {
    let path = path.strip_prefix("$.")?;
    let mut current = data;

    for segment in path.split('.') {
        if let Some(bracket_pos) = segment.find('[') {
            let field = &segment[..bracket_pos];
            let index: usize = segment[bracket_pos + 1..]
                .strip_suffix(']')?
                .parse()
                .ok()?;

            if !field.is_empty() {
                current = current.get(field)?;
            }
            current = current.get(index)?;
        } else {
            current = current.get(segment)?;
        }
    }

    Some(current)
}

/// Convert a JSON value to string for a text field
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => value.to_string(),
    }
}

/// Resolve a binding to text; missing paths are empty
pub fn resolve_text(path: &str, data: &serde_json::Value) -> String {
    resolve_binding(path, data)
        .map(value_to_string)
        .unwrap_or_default()
}

/// Check if a JSON value is truthy
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// Binding paths inside `{...}` placeholders of a format string
pub fn format_placeholders(format: &str) -> Vec<&str> {
    let mut paths = Vec::new();
    let mut rest = format;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        paths.push(&rest[start + 1..start + len]);
        rest = &rest[start + len + 1..];
    }
    paths
}

/// Substitute `{$.path}` placeholders with bound values
///
/// ```
/// use forms::parser::render_format;
/// use serde_json::json;
///
/// let data = json!({ "court": { "city": "LOS ANGELES", "zip": "90012" } });
/// assert_eq!(
///     render_format("{$.court.city}, CA {$.court.zip}", &data),
///     "LOS ANGELES, CA 90012"
/// );
/// ```
pub fn render_format(format: &str, data: &serde_json::Value) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&resolve_text(&rest[start + 1..start + len], data));
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}
