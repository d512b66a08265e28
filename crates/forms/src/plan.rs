//! Resolving a mapping table against data into concrete field writes

use crate::parser::{is_truthy, render_format, resolve_binding, resolve_text, value_to_string};
use crate::schema::{FormSchema, Predicate, PredicateOp, TextEntry};
use serde::Serialize;

/// Value destined for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Checkbox(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWrite {
    pub field: String,
    pub value: FieldValue,
}

/// Every write for one form, in table order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillPlan {
    pub form: String,
    pub writes: Vec<FieldWrite>,
}

impl FillPlan {
    /// The value planned for a field
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.writes.iter().find(|w| w.field == field).map(|w| &w.value)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.value(field)? {
            FieldValue::Text(text) => Some(text),
            FieldValue::Checkbox(_) => None,
        }
    }

    pub fn checked(&self, field: &str) -> Option<bool> {
        match self.value(field)? {
            FieldValue::Checkbox(checked) => Some(*checked),
            FieldValue::Text(_) => None,
        }
    }
}

/// Resolve every entry of `schema` against `data`
///
/// Text entries are written before checkboxes within each group.
pub fn plan(schema: &FormSchema, data: &serde_json::Value) -> FillPlan {
    let mut writes = Vec::new();
    for group in &schema.groups {
        for entry in &group.text {
            let value = text_value(entry, data);
            for field in entry.destinations() {
                writes.push(FieldWrite {
                    field,
                    value: FieldValue::Text(value.clone()),
                });
            }
        }
        for entry in &group.checkboxes {
            let checked = evaluate(&entry.when, data);
            for field in entry.destinations() {
                writes.push(FieldWrite {
                    field,
                    value: FieldValue::Checkbox(checked),
                });
            }
        }
    }

    FillPlan {
        form: schema.form.clone(),
        writes,
    }
}

fn text_value(entry: &TextEntry, data: &serde_json::Value) -> String {
    if let Some(when) = &entry.when {
        if !evaluate(when, data) {
            return entry.otherwise.clone().unwrap_or_default();
        }
    }

    let mut value = if let Some(bind) = &entry.bind {
        resolve_text(bind, data)
    } else if let Some(format) = &entry.format {
        render_format(format, data)
    } else if let Some(first) = &entry.first {
        first
            .iter()
            .map(|path| resolve_text(path, data))
            .find(|v| !v.trim().is_empty())
            .unwrap_or_default()
    } else {
        entry.text.clone().unwrap_or_default()
    };

    if value.is_empty() {
        if let Some(default) = &entry.default {
            value = default.clone();
        }
    }
    if entry.uppercase {
        value = value.to_uppercase();
    }
    value
}

/// Evaluate a checkbox predicate; unresolved paths are false
pub fn evaluate(predicate: &Predicate, data: &serde_json::Value) -> bool {
    match predicate {
        Predicate::Literal(b) => *b,
        Predicate::Path(path) => resolve_binding(path, data).is_some_and(is_truthy),
        Predicate::Op(op) => match op {
            PredicateOp::Eq(path, expected) => resolve_binding(path, data) == Some(expected),
            PredicateOp::Ne(path, expected) => resolve_binding(path, data) != Some(expected),
            PredicateOp::Not(inner) => !evaluate(inner, data),
            PredicateOp::All(items) => items.iter().all(|p| evaluate(p, data)),
            PredicateOp::Any(items) => items.iter().any(|p| evaluate(p, data)),
            PredicateOp::Nonzero(path) => resolve_binding(path, data)
                .map(value_to_string)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .is_some_and(|n| n != 0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_schema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> FormSchema {
        parse_schema(
            r#"{
                "form": "GC-999",
                "title": "Test petition",
                "template": "GC-999.pdf",
                "groups": [
                    {
                        "name": "caption",
                        "text": [
                            { "field": "Page{page}[0].Case[0]", "bind": "$.case_number", "pages": [1, 2] },
                            { "field": "Page1[0].For[0]", "format": "Petitioner {$.petitioner.name}" },
                            { "field": "Page1[0].Who[0]", "first": ["$.conservator.name", "$.petitioner.name"], "uppercase": true },
                            { "field": "Page1[0].Reason[0]", "bind": "$.reason", "default": "See attached declaration" },
                            { "field": "Page1[0].Food[0]", "text": "Meals provided",
                              "when": { "eq": ["$.type", "person"] } },
                            { "field": "Page1[0].Blank[0]", "placeholder": true }
                        ],
                        "checkboxes": [
                            { "field": "Page{page}[0].Estate_cb[0]", "when": { "eq": ["$.type", "estate"] }, "pages": [1, 2] },
                            { "field": "Page{page}[0].Person_cb[0]", "when": { "eq": ["$.type", "person"] }, "pages": [1, 2] },
                            { "field": "Page1[0].Bond_cb[0]", "when": { "not": "$.bond.required" } },
                            { "field": "Page1[0].Blocked_cb[0]", "when": { "nonzero": "$.bond.blocked" } },
                            { "field": "Page1[0].Always_cb[0]", "when": true }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_plan_text_sources() {
        let data = json!({
            "case_number": "25PR001",
            "petitioner": { "name": "Ann Lee" },
            "conservator": { "name": "" },
            "reason": "",
            "type": "estate",
        });
        let plan = plan(&schema(), &data);

        assert_eq!(plan.text("Page1[0].Case[0]"), Some("25PR001"));
        assert_eq!(plan.text("Page2[0].Case[0]"), Some("25PR001"));
        assert_eq!(plan.text("Page1[0].For[0]"), Some("Petitioner Ann Lee"));
        assert_eq!(plan.text("Page1[0].Who[0]"), Some("ANN LEE"));
        assert_eq!(plan.text("Page1[0].Reason[0]"), Some("See attached declaration"));
        assert_eq!(plan.text("Page1[0].Food[0]"), Some(""));
        assert_eq!(plan.text("Page1[0].Blank[0]"), Some(""));
    }

    #[test]
    fn test_plan_checkboxes() {
        let data = json!({
            "type": "estate",
            "bond": { "required": false, "blocked": "0.00" },
        });
        let plan = plan(&schema(), &data);

        for page in [1, 2] {
            assert_eq!(plan.checked(&format!("Page{page}[0].Estate_cb[0]")), Some(true));
            assert_eq!(plan.checked(&format!("Page{page}[0].Person_cb[0]")), Some(false));
        }
        assert_eq!(plan.checked("Page1[0].Bond_cb[0]"), Some(true));
        assert_eq!(plan.checked("Page1[0].Blocked_cb[0]"), Some(false));
        assert_eq!(plan.checked("Page1[0].Always_cb[0]"), Some(true));
    }

    #[test]
    fn test_nonzero_reads_amounts() {
        let p = Predicate::Op(PredicateOp::Nonzero("$.amount".into()));
        assert!(evaluate(&p, &json!({ "amount": "1500.00" })));
        assert!(!evaluate(&p, &json!({ "amount": "0.00" })));
        assert!(!evaluate(&p, &json!({ "amount": "" })));
        assert!(!evaluate(&p, &json!({})));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let data = json!({ "type": "person", "petitioner": { "name": "Ann" } });
        assert_eq!(plan(&schema(), &data), plan(&schema(), &data));
    }
}
