/// Validation utilities for the sign-in and sign-up forms
use std::collections::BTreeMap;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Per-field messages collected from one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    fn check(&mut self, field: Field, result: ValidationResult) {
        if let Some(error) = result.error {
            self.0.insert(field, error);
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, error)| (*field, error.as_str()))
    }
}

/// Something non-blank, an `@`, something non-blank, a `.`, something non-blank
pub fn validate_email(email: &str) -> ValidationResult {
    if email.trim().is_empty() {
        return ValidationResult::err("Email is required");
    }

    let well_formed = email
        .split_once('@')
        .filter(|(local, _)| !local.is_empty() && !local.contains(char::is_whitespace))
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| {
            !host.is_empty()
                && !tld.is_empty()
                && !host.contains(char::is_whitespace)
                && !tld.contains(char::is_whitespace)
        });
    if !well_formed {
        return ValidationResult::err("Email is invalid");
    }

    ValidationResult::ok()
}

pub fn validate_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return ValidationResult::err("Name is required");
    }
    ValidationResult::ok()
}

/// Sign-in only checks presence
pub fn validate_login_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }
    ValidationResult::ok()
}

pub fn validate_new_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return ValidationResult::err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    ValidationResult::ok()
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if password != confirmation {
        return ValidationResult::err("Passwords do not match");
    }
    ValidationResult::ok()
}

pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.check(Field::Email, validate_email(email));
    errors.check(Field::Password, validate_login_password(password));
    errors
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirmation: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.check(Field::Name, validate_name(name));
    errors.check(Field::Email, validate_email(email));
    errors.check(Field::Password, validate_new_password(password));
    errors.check(
        Field::ConfirmPassword,
        validate_password_confirmation(password, confirmation),
    );
    errors
}
