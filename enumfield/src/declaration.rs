//! Decodes raw enum configuration into [`EnumDeclaration`].
//!
//! Raw declarations come from config files or host code as JSON-shaped
//! values. Two shapes are accepted:
//!
//! ```text
//! status = { 1 = "active", 2 = "inactive" }                      # bare
//! status = { values = { 1 = "active" }, validate = false }       # wrapped
//! ```
//!
//! The shape is decided here, once, so nothing downstream has to sniff it.

use serde_json::{Map, Value};

use crate::errors::ConfigurationIssue;
use crate::types::{EnumDeclaration, EnumKey, EnumLabel, EnumValues};

const VALUES_KEY: &str = "values";
const VALIDATE_KEY: &str = "validate";

/// Anything that can be turned into a declaration for a named field.
pub trait IntoDeclaration {
    fn into_declaration(self, field: &str) -> Result<EnumDeclaration, ConfigurationIssue>;
}

impl IntoDeclaration for EnumDeclaration {
    fn into_declaration(self, _field: &str) -> Result<EnumDeclaration, ConfigurationIssue> {
        Ok(self)
    }
}

impl IntoDeclaration for EnumValues {
    fn into_declaration(self, _field: &str) -> Result<EnumDeclaration, ConfigurationIssue> {
        Ok(EnumDeclaration::bare(self))
    }
}

impl IntoDeclaration for Value {
    fn into_declaration(self, field: &str) -> Result<EnumDeclaration, ConfigurationIssue> {
        parse_declaration(field, &self)
    }
}

impl IntoDeclaration for &Value {
    fn into_declaration(self, field: &str) -> Result<EnumDeclaration, ConfigurationIssue> {
        parse_declaration(field, self)
    }
}

/// Parses one field's raw declaration.
pub fn parse_declaration(field: &str, raw: &Value) -> Result<EnumDeclaration, ConfigurationIssue> {
    match raw {
        Value::Object(map) => parse_object(field, map),
        Value::Array(items) => {
            let mut values = EnumValues::default();
            for (index, item) in items.iter().enumerate() {
                let key = EnumKey::Int(index as i64);
                let label = parse_label(field, &key, item)?;
                values
                    .push(key, label)
                    .map_err(|err| ConfigurationIssue::new(field, err.to_string()))?;
            }
            Ok(EnumDeclaration::bare(values))
        }
        other => Err(ConfigurationIssue::new(
            field,
            format!("expected a key/label table, found {}", json_kind(other)),
        )),
    }
}

fn parse_object(field: &str, map: &Map<String, Value>) -> Result<EnumDeclaration, ConfigurationIssue> {
    let values = map.get(VALUES_KEY);
    let validate = map.get(VALIDATE_KEY);

    match (values, validate, map.len()) {
        (Some(values), Some(validate), 2) => parse_wrapped(field, values, validate),
        (Some(Value::Object(values)), None, 1) => Ok(EnumDeclaration::wrapped(parse_values(field, values)?, None)),
        (None, Some(Value::Bool(_)), 1) => Err(ConfigurationIssue::new(
            field,
            "wrapped declaration is missing `values`",
        )),
        _ => Ok(EnumDeclaration::bare(parse_values(field, map)?)),
    }
}

fn parse_wrapped(field: &str, values: &Value, validate: &Value) -> Result<EnumDeclaration, ConfigurationIssue> {
    match (values, validate) {
        (Value::Object(values), Value::Bool(validate)) => {
            Ok(EnumDeclaration::wrapped(parse_values(field, values)?, Some(*validate)))
        }
        (Value::Object(values), Value::Null) => Ok(EnumDeclaration::wrapped(parse_values(field, values)?, None)),
        (Value::String(_) | Value::Null, Value::String(_) | Value::Null) => Err(ConfigurationIssue::new(
            field,
            "ambiguous declaration: keys `values` and `validate` read as both an enum and a wrapped declaration",
        )),
        (Value::Object(_), other) => Err(ConfigurationIssue::new(
            field,
            format!("`validate` must be a boolean, found {}", json_kind(other)),
        )),
        (other, _) => Err(ConfigurationIssue::new(
            field,
            format!("`values` must be a key/label table, found {}", json_kind(other)),
        )),
    }
}

fn parse_values(field: &str, map: &Map<String, Value>) -> Result<EnumValues, ConfigurationIssue> {
    let mut values = EnumValues::default();
    for (raw_key, raw_label) in map {
        let key = EnumKey::from(raw_key.as_str());
        let label = parse_label(field, &key, raw_label)?;
        values
            .push(key, label)
            .map_err(|err| ConfigurationIssue::new(field, err.to_string()))?;
    }
    Ok(values)
}

fn parse_label(field: &str, key: &EnumKey, raw: &Value) -> Result<EnumLabel, ConfigurationIssue> {
    match raw {
        Value::String(label) => Ok(EnumLabel::from(label.as_str())),
        Value::Null => Ok(EnumLabel::null()),
        other => Err(ConfigurationIssue::new(
            field,
            format!("label for key '{key}' must be a string or null, found {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}
