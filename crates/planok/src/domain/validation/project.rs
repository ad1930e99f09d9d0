//! Project input validation

use chrono::NaiveDate;

use super::{char_len, text_field, Input, TextField, ValidationErrors, Validator};
use crate::domain::value_objects::ProjectStatus;

/// Validator for project input (`nombre`, `ubicacion`, `fecha_inicio`, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectValidator;

impl ProjectValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for ProjectValidator {
    fn validate(&self, input: &Input) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validate_length(input, "nombre", "Name", 3, 100, &mut errors);
        validate_length(input, "ubicacion", "Location", 5, 200, &mut errors);
        validate_dates(input, &mut errors);
        validate_status(input, &mut errors);
        validate_code(input, &mut errors);
        errors
    }
}

/// ISO `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn validate_length(
    input: &Input,
    field: &str,
    label: &str,
    min: usize,
    max: usize,
    errors: &mut ValidationErrors,
) {
    match text_field(input, field) {
        TextField::Missing => errors.add(field, format!("{} is required", label)),
        TextField::NotText => errors.add(field, format!("{} must be a string", label)),
        TextField::Text(value) => {
            let len = char_len(value);
            if len < min {
                errors.add(
                    field,
                    format!("{} must be at least {} characters long", label, min),
                );
            } else if len > max {
                errors.add(field, format!("{} cannot exceed {} characters", label, max));
            }
        }
    }
}

fn validate_dates(input: &Input, errors: &mut ValidationErrors) {
    let start = text_field(input, "fecha_inicio");
    let end = text_field(input, "fecha_finalizacion");

    let (start, end) = match (start, end) {
        (TextField::Missing, _) => {
            errors.add("fecha_inicio", "Start date is required");
            return;
        }
        (_, TextField::Missing) => return,
        (start, end) => (start, end),
    };

    let start = date_value(start);
    let end = date_value(end);
    if start.is_none() {
        errors.add("fecha_inicio", "Invalid start date (expected YYYY-MM-DD)");
    }
    if end.is_none() {
        errors.add("fecha_finalizacion", "Invalid end date (expected YYYY-MM-DD)");
    }

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.add(
                "fecha_finalizacion",
                "End date must be on or after the start date",
            );
        }
    }
}

fn date_value(field: TextField<'_>) -> Option<NaiveDate> {
    match field {
        TextField::Text(value) => parse_date(value),
        _ => None,
    }
}

fn validate_status(input: &Input, errors: &mut ValidationErrors) {
    match text_field(input, "estado") {
        TextField::Missing => {}
        TextField::Text(value) if value.parse::<ProjectStatus>().is_ok() => {}
        _ => {
            let valid: Vec<&str> = ProjectStatus::ALL.iter().map(|s| s.as_str()).collect();
            errors.add("estado", format!("Status must be one of: {}", valid.join(", ")));
        }
    }
}

fn validate_code(input: &Input, errors: &mut ValidationErrors) {
    match text_field(input, "codigo") {
        TextField::Missing => {}
        TextField::NotText => errors.add("codigo", "Code must be a string"),
        TextField::Text(code) => {
            let len = char_len(code);
            if !(5..=20).contains(&len) {
                errors.add("codigo", "Code must be between 5 and 20 characters long");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn input(value: Value) -> Input {
        value.as_object().cloned().unwrap()
    }

    fn valid_project() -> Input {
        input(json!({
            "nombre": "Proyecto Test",
            "descripcion": "Descripción del proyecto",
            "ubicacion": "Santiago, Chile",
            "fecha_inicio": "2023-01-01",
            "fecha_finalizacion": "2024-12-31"
        }))
    }

    #[test]
    fn test_valid_data() {
        assert!(ProjectValidator::new().is_valid(&valid_project()));
    }

    #[test]
    fn test_end_before_start() {
        let data = input(json!({
            "nombre": "Proyecto Test",
            "ubicacion": "Santiago, Chile",
            "fecha_inicio": "2024-01-01",
            "fecha_finalizacion": "2023-12-31"
        }));

        let errors = ProjectValidator::new().validate(&data);
        assert!(errors.has_field("fecha_finalizacion"));
        assert_eq!(errors.errors().len(), 1);

        let swapped = input(json!({
            "nombre": "Proyecto Test",
            "ubicacion": "Santiago, Chile",
            "fecha_inicio": "2023-12-31",
            "fecha_finalizacion": "2024-01-01"
        }));
        assert!(ProjectValidator::new().is_valid(&swapped));
    }

    #[test]
    fn test_same_day_is_allowed() {
        let mut data = valid_project();
        data.insert("fecha_finalizacion".into(), json!("2023-01-01"));
        assert!(ProjectValidator::new().is_valid(&data));
    }

    #[test]
    fn test_end_date_optional() {
        let mut data = valid_project();
        data.remove("fecha_finalizacion");
        assert!(ProjectValidator::new().is_valid(&data));
    }

    #[test]
    fn test_invalid_dates_reported_per_field() {
        let mut data = valid_project();
        data.insert("fecha_inicio".into(), json!("01/01/2023"));
        data.insert("fecha_finalizacion".into(), json!("garbage"));

        let errors = ProjectValidator::new().validate(&data);
        assert!(errors.has_field("fecha_inicio"));
        assert!(errors.has_field("fecha_finalizacion"));
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn test_date_format_checked_only_with_both_dates() {
        let mut data = valid_project();
        data.remove("fecha_finalizacion");
        data.insert("fecha_inicio".into(), json!("garbage"));
        assert!(ProjectValidator::new().is_valid(&data));

        let mut data = valid_project();
        data.remove("fecha_inicio");
        data.insert("fecha_finalizacion".into(), json!("garbage"));
        let dict = ProjectValidator::new().validate(&data).error_dict();
        assert_eq!(dict["fecha_inicio"], vec!["Start date is required"]);
        assert!(!dict.contains_key("fecha_finalizacion"));
    }

    #[test]
    fn test_length_counts_raw_characters() {
        let mut data = valid_project();
        data.insert("nombre".into(), json!("AB "));
        assert!(ProjectValidator::new().is_valid(&data));

        data.insert("nombre".into(), json!("AB"));
        assert!(ProjectValidator::new().validate(&data).has_field("nombre"));
    }

    #[test]
    fn test_missing_required_fields() {
        let dict = ProjectValidator::new().validate(&Input::new()).error_dict();
        for field in ["nombre", "ubicacion", "fecha_inicio"] {
            assert!(dict.contains_key(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_length_bounds() {
        let mut data = valid_project();
        data.insert("nombre".into(), json!("AB"));
        data.insert("ubicacion".into(), json!("x".repeat(201)));

        let errors = ProjectValidator::new().validate(&data);
        assert!(errors.has_field("nombre"));
        assert!(errors.has_field("ubicacion"));
    }

    #[test]
    fn test_status_and_code() {
        let mut data = valid_project();
        data.insert("estado".into(), json!("En Construcción"));
        data.insert("codigo".into(), json!("PRO-12345"));
        assert!(ProjectValidator::new().is_valid(&data));

        data.insert("estado".into(), json!("Demolido"));
        data.insert("codigo".into(), json!("ABC"));
        let errors = ProjectValidator::new().validate(&data);
        assert!(errors.has_field("estado"));
        assert!(errors.has_field("codigo"));
    }
}
