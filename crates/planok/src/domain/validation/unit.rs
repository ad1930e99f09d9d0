//! Unit input validation

use super::{
    char_len, number_field, present, text_field, Input, NumberField, TextField,
    ValidationErrors, Validator,
};
use crate::domain::value_objects::{UnitStatus, UnitType};

pub const MAX_UNIT_NUMBER_LENGTH: usize = 20;

/// Validator for unit input (`proyecto_id`, `numero_unidad`, `tipo_unidad`, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitValidator;

impl UnitValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for UnitValidator {
    fn validate(&self, input: &Input) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if present(input, "proyecto_id").is_none() {
            errors.add("proyecto_id", "Project is required");
        }

        match text_field(input, "numero_unidad") {
            TextField::Missing => errors.add("numero_unidad", "Unit number is required"),
            TextField::NotText => errors.add("numero_unidad", "Unit number must be a string"),
            TextField::Text(number) if char_len(number) > MAX_UNIT_NUMBER_LENGTH => errors.add(
                "numero_unidad",
                "Unit number cannot exceed 20 characters",
            ),
            TextField::Text(_) => {}
        }

        match text_field(input, "tipo_unidad") {
            TextField::Missing => errors.add("tipo_unidad", "Unit type is required"),
            TextField::Text(value) if value.parse::<UnitType>().is_ok() => {}
            _ => {
                let valid: Vec<&str> = UnitType::ALL.iter().map(|t| t.as_str()).collect();
                errors.add(
                    "tipo_unidad",
                    format!("Unit type must be one of: {}", valid.join(", ")),
                );
            }
        }

        validate_positive(input, "metraje_cuadrado", "Area", &mut errors);
        validate_positive(input, "precio_venta", "Price", &mut errors);

        match text_field(input, "estado") {
            TextField::Missing => errors.add("estado", "Status is required"),
            TextField::Text(value) if value.parse::<UnitStatus>().is_ok() => {}
            _ => {
                let valid: Vec<&str> = UnitStatus::ALL.iter().map(|s| s.as_str()).collect();
                errors.add(
                    "estado",
                    format!("Status must be one of: {}", valid.join(", ")),
                );
            }
        }

        errors
    }
}

fn validate_positive(input: &Input, field: &str, label: &str, errors: &mut ValidationErrors) {
    match number_field(input, field) {
        NumberField::Missing => errors.add(field, format!("{} is required", label)),
        NumberField::NotNumber => errors.add(field, format!("{} must be a number", label)),
        NumberField::Number(n) if n <= 0.0 => {
            errors.add(field, format!("{} must be greater than 0", label))
        }
        NumberField::Number(_) => {}
    }
}
