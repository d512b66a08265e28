//! Mapping table schema types

use serde::{Deserialize, Serialize};

/// Token in a field name replaced by each listed page number
pub const PAGE_TOKEN: &str = "{page}";

/// Field mapping table for one court form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    /// Form code, e.g. `GC-310`
    pub form: String,

    /// Form title as printed on the template
    pub title: String,

    /// Template file name on the template host
    pub template: String,

    /// Field groups, applied in order
    #[serde(default)]
    pub groups: Vec<FieldGroup>,
}

impl FormSchema {
    /// Text entries across all groups
    pub fn text_entries(&self) -> impl Iterator<Item = &TextEntry> {
        self.groups.iter().flat_map(|g| g.text.iter())
    }

    /// Checkbox entries across all groups
    pub fn checkbox_entries(&self) -> impl Iterator<Item = &CheckboxEntry> {
        self.groups.iter().flat_map(|g| g.checkboxes.iter())
    }

    /// Destination fields intentionally left blank, with their notes
    ///
    /// These are kept visible for product review rather than guessed at.
    pub fn placeholders(&self) -> Vec<(String, Option<&str>)> {
        self.text_entries()
            .filter(|e| e.placeholder)
            .flat_map(|e| {
                e.destinations()
                    .into_iter()
                    .map(move |field| (field, e.note.as_deref()))
            })
            .collect()
    }

    /// Every destination field name, pages expanded
    pub fn destinations(&self) -> Vec<String> {
        self.text_entries()
            .flat_map(TextEntry::destinations)
            .chain(self.checkbox_entries().flat_map(CheckboxEntry::destinations))
            .collect()
    }
}

/// Named group of related entries (e.g. "attorney", "page 3 estate")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldGroup {
    pub name: String,

    #[serde(default)]
    pub text: Vec<TextEntry>,

    #[serde(default)]
    pub checkboxes: Vec<CheckboxEntry>,
}

/// Text field entry
///
/// Exactly one source (`bind`, `format`, `first`, `text` or `placeholder`)
/// must be given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextEntry {
    /// Fully qualified destination field name
    pub field: String,

    /// Data binding path (JSONPath-like)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// Template with `{$.path}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Paths tried in order; the first non-empty value wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Vec<String>>,

    /// Static text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Intentionally blank field
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,

    /// Used when the source resolves to an empty string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Only write the source when this holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Predicate>,

    /// Written instead when `when` does not hold (empty if absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uppercase: bool,

    /// Pages to expand `{page}` with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TextEntry {
    pub fn destinations(&self) -> Vec<String> {
        expand_pages(&self.field, self.pages.as_deref())
    }
}

/// Checkbox entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckboxEntry {
    /// Fully qualified destination field name
    pub field: String,

    /// Checked when this holds
    pub when: Predicate,

    /// Pages to expand `{page}` with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CheckboxEntry {
    pub fn destinations(&self) -> Vec<String> {
        expand_pages(&self.field, self.pages.as_deref())
    }
}

/// Boolean expression over the bound data
///
/// In JSON: `true`/`false`, a `"$.path"` (truthiness of the value), or one
/// operator object such as `{"eq": ["$.type", "estate"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Predicate {
    Literal(bool),
    Path(String),
    Op(PredicateOp),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateOp {
    /// Bound value equals the literal
    Eq(String, serde_json::Value),
    /// Bound value differs from the literal
    Ne(String, serde_json::Value),
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    /// Bound value reads as a non-zero amount
    Nonzero(String),
}

impl Predicate {
    /// Binding paths referenced by this predicate
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Predicate::Literal(_) => Vec::new(),
            Predicate::Path(path) => vec![path.as_str()],
            Predicate::Op(op) => match op {
                PredicateOp::Eq(path, _) | PredicateOp::Ne(path, _) | PredicateOp::Nonzero(path) => {
                    vec![path.as_str()]
                }
                PredicateOp::Not(inner) => inner.paths(),
                PredicateOp::All(items) | PredicateOp::Any(items) => {
                    items.iter().flat_map(Predicate::paths).collect()
                }
            },
        }
    }
}

fn expand_pages(field: &str, pages: Option<&[u32]>) -> Vec<String> {
    match pages {
        Some(pages) => pages
            .iter()
            .map(|page| field.replace(PAGE_TOKEN, &page.to_string()))
            .collect(),
        None => vec![field.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_predicate_forms() {
        let literal: Predicate = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(literal, Predicate::Literal(true));

        let path: Predicate = serde_json::from_value(json!("$.bond.required")).unwrap();
        assert_eq!(path, Predicate::Path("$.bond.required".into()));

        let eq: Predicate =
            serde_json::from_value(json!({ "eq": ["$.type", "estate"] })).unwrap();
        assert_eq!(
            eq,
            Predicate::Op(PredicateOp::Eq("$.type".into(), json!("estate")))
        );

        let nested: Predicate = serde_json::from_value(json!({
            "all": ["$.is_limited", { "not": { "eq": ["$.type", "person"] } }]
        }))
        .unwrap();
        assert_eq!(nested.paths(), vec!["$.is_limited", "$.type"]);
    }

    #[test]
    fn test_page_expansion() {
        let entry = CheckboxEntry {
            field: "Form[0].Page{page}[0].Estate_cb[0]".into(),
            when: Predicate::Literal(true),
            pages: Some(vec![1, 2, 3]),
            note: None,
        };
        assert_eq!(
            entry.destinations(),
            vec![
                "Form[0].Page1[0].Estate_cb[0]",
                "Form[0].Page2[0].Estate_cb[0]",
                "Form[0].Page3[0].Estate_cb[0]",
            ]
        );
    }

    #[test]
    fn test_placeholders_listed() {
        let schema: FormSchema = serde_json::from_value(json!({
            "form": "GC-000",
            "title": "Test",
            "template": "GC-000.pdf",
            "groups": [{
                "name": "signatures",
                "text": [
                    { "field": "A[0]", "bind": "$.name" },
                    { "field": "B[0]", "placeholder": true, "note": "Additional signatures" }
                ]
            }]
        }))
        .unwrap();
        assert_eq!(
            schema.placeholders(),
            vec![("B[0]".to_string(), Some("Additional signatures"))]
        );
    }
}
