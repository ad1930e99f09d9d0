//! User input validation

use std::sync::LazyLock;

use regex::Regex;

use super::{char_len, text_field, Input, TextField, ValidationErrors, Validator};
use crate::domain::value_objects::Role;

/// Chilean RUT shape: up to 8 digits, a dash and one check character
static RUT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,8}-[\dkK]$").expect("valid RUT pattern"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Optional country code followed by 8 to 12 digits (+56912345678 or 912345678)
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+\d{1,3})?[0-9]{8,12}$").expect("valid phone pattern"));

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validator for user input
#[derive(Debug, Clone, Copy, Default)]
pub struct UserValidator {
    require_password: bool,
}

impl UserValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variant for sign-up flows where a password must be supplied
    pub fn with_required_password() -> Self {
        Self {
            require_password: true,
        }
    }
}

impl Validator for UserValidator {
    fn validate(&self, input: &Input) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validate_rut(input, &mut errors);
        validate_email(input, &mut errors);
        validate_name(input, "first_name", "First name", &mut errors);
        validate_name(input, "last_name", "Last name", &mut errors);
        self.validate_password(input, &mut errors);
        validate_role(input, &mut errors);
        validate_phone(input, &mut errors);
        errors
    }
}

impl UserValidator {
    fn validate_password(&self, input: &Input, errors: &mut ValidationErrors) {
        match text_field(input, "password") {
            TextField::Missing if self.require_password => {
                errors.add("password", "Password is required");
            }
            TextField::Missing => {}
            TextField::NotText => errors.add("password", "Password must be a string"),
            TextField::Text(password) => {
                if let Err(message) = check_password_strength(password) {
                    errors.add("password", message);
                }
            }
        }
    }
}

/// Password rule shared with password changes
pub fn check_password_strength(password: &str) -> Result<(), &'static str> {
    if char_len(password) < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters long");
    }
    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err("Password must contain at least one uppercase letter, one lowercase letter and one digit")
    }
}

pub fn is_valid_rut(rut: &str) -> bool {
    RUT_PATTERN.is_match(rut)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn validate_rut(input: &Input, errors: &mut ValidationErrors) {
    match text_field(input, "rut") {
        TextField::Missing => errors.add("rut", "RUT is required"),
        TextField::Text(rut) if is_valid_rut(rut) => {}
        _ => errors.add("rut", "Invalid RUT format (expected 12345678-9)"),
    }
}

fn validate_email(input: &Input, errors: &mut ValidationErrors) {
    match text_field(input, "email") {
        TextField::Missing => errors.add("email", "Email is required"),
        TextField::Text(email) if is_valid_email(email) => {}
        _ => errors.add("email", "Invalid email format"),
    }
}

fn validate_name(input: &Input, field: &str, label: &str, errors: &mut ValidationErrors) {
    match text_field(input, field) {
        TextField::Missing => errors.add(field, format!("{} is required", label)),
        TextField::NotText => errors.add(field, format!("{} must be a string", label)),
        TextField::Text(name) if char_len(name) < 2 => {
            errors.add(field, format!("{} must be at least 2 characters long", label))
        }
        TextField::Text(_) => {}
    }
}

fn validate_role(input: &Input, errors: &mut ValidationErrors) {
    match text_field(input, "role") {
        TextField::Missing => {}
        TextField::Text(role) if role.parse::<Role>().is_ok() => {}
        _ => {
            let valid: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
            errors.add("role", format!("Role must be one of: {}", valid.join(", ")));
        }
    }
}

fn validate_phone(input: &Input, errors: &mut ValidationErrors) {
    match text_field(input, "phone") {
        TextField::Missing => {}
        TextField::Text(phone) if PHONE_PATTERN.is_match(phone) => {}
        _ => errors.add("phone", "Invalid phone format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn input(value: Value) -> Input {
        value.as_object().cloned().unwrap()
    }

    fn valid_user() -> Input {
        input(json!({
            "rut": "12345678-9",
            "email": "test@example.com",
            "first_name": "Test",
            "last_name": "User",
            "password": "Password123",
            "role": "Cliente",
            "phone": "+56912345678"
        }))
    }

    #[test]
    fn test_valid_data() {
        let errors = UserValidator::new().validate(&valid_user());
        assert!(errors.is_valid());
        assert!(errors.error_dict().is_empty());
    }

    #[test]
    fn test_rut_shapes() {
        assert!(is_valid_rut("12345678-9"));
        assert!(is_valid_rut("1234567-K"));
        assert!(is_valid_rut("1-k"));
        assert!(!is_valid_rut("123456789"));
        assert!(!is_valid_rut("123456789-0"));
        assert!(!is_valid_rut("12345678-99"));
    }

    #[test]
    fn test_invalid_rut() {
        let mut data = valid_user();
        data.insert("rut".into(), json!("123456789"));

        let errors = UserValidator::new().validate(&data);
        assert!(!errors.is_valid());
        assert!(errors.error_dict().contains_key("rut"));
    }

    #[test]
    fn test_invalid_email() {
        let mut data = valid_user();
        data.insert("email".into(), json!("invalid-email"));

        let errors = UserValidator::new().validate(&data);
        assert!(errors.has_field("email"));
    }

    #[test]
    fn test_invalid_role() {
        let mut data = valid_user();
        data.insert("role".into(), json!("SuperUsuario"));

        let errors = UserValidator::new().validate(&data);
        assert!(errors.has_field("role"));
    }

    #[test]
    fn test_missing_required_fields() {
        let data = input(json!({"password": "Password123"}));

        let dict = UserValidator::new().validate(&data).error_dict();
        for field in ["rut", "email", "first_name", "last_name"] {
            assert!(dict.contains_key(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let mut data = valid_user();
        data.insert("first_name".into(), json!(""));

        let dict = UserValidator::new().validate(&data).error_dict();
        assert_eq!(dict["first_name"], vec!["First name is required"]);
    }

    #[test]
    fn test_short_names() {
        let mut data = valid_user();
        data.insert("last_name".into(), json!("U"));

        let errors = UserValidator::new().validate(&data);
        assert!(errors.has_field("last_name"));
        assert!(!errors.has_field("first_name"));

        // Length is measured on the raw value, as for project fields
        data.insert("last_name".into(), json!("U "));
        assert!(UserValidator::new().is_valid(&data));
    }

    #[test]
    fn test_weak_passwords() {
        for weak in ["Short1", "alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
            let mut data = valid_user();
            data.insert("password".into(), json!(weak));
            let errors = UserValidator::new().validate(&data);
            assert!(errors.has_field("password"), "{} should be rejected", weak);
        }
    }

    #[test]
    fn test_password_optional_unless_required() {
        let mut data = valid_user();
        data.remove("password");

        assert!(UserValidator::new().is_valid(&data));
        assert!(UserValidator::with_required_password()
            .validate(&data)
            .has_field("password"));
    }

    #[test]
    fn test_phone_formats() {
        for (phone, ok) in [
            ("912345678", true),
            ("+56912345678", true),
            ("1234567", false),
            ("+56-9-1234-5678", false),
        ] {
            let mut data = valid_user();
            data.insert("phone".into(), json!(phone));
            assert_eq!(UserValidator::new().is_valid(&data), ok, "phone {}", phone);
        }
    }

    #[test]
    fn test_validation_is_repeatable() {
        let mut data = valid_user();
        data.insert("email".into(), json!("nope"));
        let validator = UserValidator::new();

        let first = validator.validate(&data);
        let second = validator.validate(&data);
        assert_eq!(first, second);
        assert_eq!(first.errors().len(), 1);
    }
}
