//! Dynamic record view over extracted form data.
//!
//! The validator and the ground-truth comparator work on this shape rather than
//! on [`ClaimForm`] so they can report on keys that are missing altogether.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::models::form::ClaimForm;

/// A nested string-leaf mapping representing one extracted form.
///
/// Key order is preserved as inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a parsed JSON value.
    ///
    /// Fails if the value is not an object or if any leaf is not a string.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => {
                for (key, child) in &map {
                    check_leaves(child, key)?;
                }
                Ok(Self(map))
            }
            other => Err(RecordError::NotAnObject(type_name(&other))),
        }
    }

    /// Parse the raw text answer of the language model.
    ///
    /// Markdown code fences around the JSON are removed first.
    pub fn from_model_output(text: &str) -> Result<Self, RecordError> {
        let body = strip_code_fences(text);
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Build a record from a typed claim form.
    pub fn from_form(form: &ClaimForm) -> Result<Self, RecordError> {
        Self::from_value(serde_json::to_value(form)?)
    }

    /// Convert to a typed claim form. Unknown keys are dropped.
    pub fn to_form(&self) -> Result<ClaimForm, RecordError> {
        Ok(serde_json::from_value(Value::Object(self.0.clone()))?)
    }

    /// Get a raw value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string leaf by key, or "" when missing or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Get a nested mapping by key.
    pub fn get_mapping(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Remove a leading ```json / ``` fence and a trailing ``` fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    }
    if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn check_leaves(value: &Value, path: &str) -> Result<(), RecordError> {
    match value {
        Value::String(_) => Ok(()),
        Value::Object(map) => {
            for (key, child) in map {
                check_leaves(child, &format!("{}.{}", path, key))?;
            }
            Ok(())
        }
        other => Err(RecordError::NonStringLeaf {
            path: path.to_string(),
            found: type_name(other),
        }),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_model_output_with_fences() {
        let text = "```json\n{\"firstName\": \"Dana\", \"address\": {\"city\": \"חיפה\"}}\n```";
        let record = Record::from_model_output(text).unwrap();

        assert_eq!(record.get_str("firstName"), "Dana");
        assert_eq!(record.get_mapping("address").unwrap()["city"], "חיפה");
    }

    #[test]
    fn test_from_model_output_bare_fence() {
        let record = Record::from_model_output("```\n{\"gender\": \"נקבה\"}\n```").unwrap();
        assert_eq!(record.get_str("gender"), "נקבה");
    }

    #[test]
    fn test_from_model_output_plain_json() {
        let record = Record::from_model_output("  {\"idNumber\": \"123456789\"}  ").unwrap();
        assert_eq!(record.get_str("idNumber"), "123456789");
    }

    #[test]
    fn test_from_model_output_rejects_garbage() {
        let err = Record::from_model_output("I could not read the form.").unwrap_err();
        assert!(matches!(err, RecordError::Json(_)));
    }

    #[test]
    fn test_rejects_non_object() {
        let err = Record::from_model_output("[1, 2]").unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject("array")));
    }

    #[test]
    fn test_rejects_non_string_leaf() {
        let err = Record::from_value(json!({
            "dateOfBirth": {"day": 3, "month": "11", "year": "1988"}
        }))
        .unwrap_err();

        match err {
            RecordError::NonStringLeaf { path, found } => {
                assert_eq!(path, "dateOfBirth.day");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_null_leaf() {
        let err = Record::from_value(json!({"mobilePhone": null})).unwrap_err();
        assert!(matches!(err, RecordError::NonStringLeaf { found: "null", .. }));
    }

    #[test]
    fn test_preserves_key_order() {
        let record = Record::from_model_output(r#"{"z": "1", "a": "2", "m": "3"}"#).unwrap();
        let value = record.into_value();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_form_round_trip() {
        let mut form = ClaimForm::default();
        form.last_name = "Cohen".to_string();
        form.medical_institution_fields.health_fund_member = "מכבי".to_string();

        let record = Record::from_form(&form).unwrap();
        assert_eq!(record.get_str("lastName"), "Cohen");
        assert_eq!(record.to_form().unwrap(), form);
    }

    #[test]
    fn test_get_str_defaults() {
        let record = Record::from_value(json!({"address": {"city": "x"}})).unwrap();
        assert_eq!(record.get_str("missing"), "");
        assert_eq!(record.get_str("address"), "");
    }
}
