//! Raw webhook submissions

use crate::{IntakeError, Result};
use serde_json::{Map, Value};

/// A webhook submission: a flat JSON object with loosely typed values
///
/// Form builders send the same answer as a string, a number or a boolean
/// depending on the question type, so every accessor is lenient. Empty
/// strings, `null`, `false` and zero all count as "not answered".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubmission {
    fields: Map<String, Value>,
}

impl RawSubmission {
    /// Parse a request body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(IntakeError::NotAnObject("null")),
            Value::Bool(_) => Err(IntakeError::NotAnObject("boolean")),
            Value::Number(_) => Err(IntakeError::NotAnObject("number")),
            Value::String(_) => Err(IntakeError::NotAnObject("string")),
            Value::Array(_) => Err(IntakeError::NotAnObject("array")),
        }
    }

    /// Raw value of a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Answered text of a field
    ///
    /// Numbers are rendered as written and `true` as `"true"`. Unanswered
    /// values (see type docs), arrays and objects yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }

    /// Answered text of a field, or `default`
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    /// Answered text of the first answered field among `keys`
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Whether the field is exactly the string `answer`
    pub fn answer_is(&self, key: &str, answer: &str) -> bool {
        matches!(self.fields.get(key), Some(Value::String(s)) if s == answer)
    }

    /// Yes/no question: only the literal string `"yes"` is true
    pub fn flag(&self, key: &str) -> bool {
        self.answer_is(key, "yes")
    }

    /// Yes/no question that defaults to true unless answered `"no"`
    pub fn flag_unless_no(&self, key: &str) -> bool {
        !self.answer_is(key, "no")
    }

    /// A JSON boolean, if the field holds one
    pub fn literal_bool(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for RawSubmission {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
