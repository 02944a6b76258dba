//! Request payload validation.
//!
//! Handlers compose these checks and return the accumulated field errors as
//! a 400 envelope. Checks that need the data store (e.g. foreign-key
//! existence) stay in the handlers.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// One field-level validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

/// Checks that `value` looks like an email address.
pub fn check_email(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if !email_regex().is_match(value) {
        errors.push(FieldError::new(field, "invalid email format"));
    }
}

/// Checks that `value` is at least `min` characters long.
pub fn check_min_length(field: &str, value: &str, min: usize, errors: &mut Vec<FieldError>) {
    if value.chars().count() < min {
        errors.push(FieldError::new(
            field,
            format!("must be at least {min} characters"),
        ));
    }
}

/// Checks that `value` is not empty or whitespace.
pub fn check_non_empty(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    }
}

/// Checks that `value >= min`.
pub fn check_min_i64(field: &str, value: i64, min: i64, errors: &mut Vec<FieldError>) {
    if value < min {
        errors.push(FieldError::new(field, format!("must be at least {min}")));
    }
}

/// Checks that `value` is a finite, non-negative number.
pub fn check_non_negative_f64(field: &str, value: f64, errors: &mut Vec<FieldError>) {
    if !value.is_finite() || value < 0.0 {
        errors.push(FieldError::new(field, "must be a non-negative number"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_email() {
        let mut errors = Vec::new();
        check_email("email", "a@b.com", &mut errors);
        assert!(errors.is_empty());

        check_email("email", "not-an-email", &mut errors);
        check_email("email", "a@b", &mut errors);
        check_email("email", "a b@c.com", &mut errors);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_check_min_length() {
        let mut errors = Vec::new();
        check_min_length("password", "secret1", 6, &mut errors);
        assert!(errors.is_empty());

        check_min_length("password", "short", 6, &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("6"));
    }

    #[test]
    fn test_check_non_empty() {
        let mut errors = Vec::new();
        check_non_empty("name", "Widget", &mut errors);
        assert!(errors.is_empty());

        check_non_empty("name", "   ", &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_check_min_i64() {
        let mut errors = Vec::new();
        check_min_i64("age", 18, 18, &mut errors);
        assert!(errors.is_empty());

        check_min_i64("age", 17, 18, &mut errors);
        check_min_i64("stock", -1, 0, &mut errors);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_check_non_negative_f64() {
        let mut errors = Vec::new();
        check_non_negative_f64("price", 0.0, &mut errors);
        check_non_negative_f64("price", 9.99, &mut errors);
        assert!(errors.is_empty());

        check_non_negative_f64("price", -0.01, &mut errors);
        check_non_negative_f64("price", f64::NAN, &mut errors);
        assert_eq!(errors.len(), 2);
    }
}
