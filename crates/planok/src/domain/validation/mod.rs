//! Input Validation
//!
//! Field-level checks run on raw request input before any service call.
//! Validation is a pure function from an input map to a list of
//! field/message pairs; it never fails and never touches an entity.

mod project;
mod unit;
mod user;

pub use project::*;
pub use unit::*;
pub use user::*;

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Raw input mapping (field name → JSON value)
pub type Input = serde_json::Map<String, Value>;

/// A single failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulated validation failures, in the order the checks ran
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Errors grouped by field name
    pub fn error_dict(&self) -> BTreeMap<String, Vec<String>> {
        let mut dict: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            dict.entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        dict
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.error_dict().serialize(serializer)
    }
}

/// Per-entity validator
pub trait Validator {
    /// Run every check against `input`
    fn validate(&self, input: &Input) -> ValidationErrors;

    fn is_valid(&self, input: &Input) -> bool {
        self.validate(input).is_valid()
    }
}

/// Value of a field, treating absent, null and empty strings alike
pub(crate) fn present<'a>(input: &'a Input, key: &str) -> Option<&'a Value> {
    match input.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value),
    }
}

pub(crate) enum TextField<'a> {
    Missing,
    Text(&'a str),
    NotText,
}

pub(crate) fn text_field<'a>(input: &'a Input, key: &str) -> TextField<'a> {
    match present(input, key) {
        None => TextField::Missing,
        Some(Value::String(s)) => TextField::Text(s),
        Some(_) => TextField::NotText,
    }
}

pub(crate) enum NumberField {
    Missing,
    Number(f64),
    NotNumber,
}

/// Numeric field; numeric strings such as `"1500.50"` are accepted
pub(crate) fn number_field(input: &Input, key: &str) -> NumberField {
    match present(input, key) {
        None => NumberField::Missing,
        Some(Value::Number(n)) => n
            .as_f64()
            .map(NumberField::Number)
            .unwrap_or(NumberField::NotNumber),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(NumberField::Number)
            .unwrap_or(NumberField::NotNumber),
        Some(_) => NumberField::NotNumber,
    }
}

pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
