use crate::errors::{DomainError, DomainResult, ValidationError};
use regex::Regex;
use std::sync::OnceLock;

/// A trait that entities should implement for validation.
pub trait Validate {
    /// Validates the entity and returns an error if validation fails.
    fn validate(&self) -> DomainResult<()>;
}

// Common regex patterns
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[0-9]{8,15}$").unwrap())
}

/// Struct for configuring validations in a fluent style
#[derive(Default)]
pub struct ValidationBuilder<T> {
    field_name: String,
    value: Option<T>,
    errors: Vec<ValidationError>,
}

impl<T> ValidationBuilder<T> {
    pub fn new(field_name: &str, value: Option<T>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value,
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self
    where
        T: Default + PartialEq,
    {
        if self.value.is_none() || self.value == Some(T::default()) {
            self.errors.push(ValidationError::required(&self.field_name));
        }
        self
    }

    /// Complete validation and return the first error, if any.
    pub fn validate(self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.errors[0].clone()))
        }
    }
}

/// String-specific validations
impl ValidationBuilder<String> {
    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(value) = &self.value {
            if value.len() < min {
                self.errors
                    .push(ValidationError::min_length(&self.field_name, min));
            }
        }
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(value) = &self.value {
            if value.len() > max {
                self.errors
                    .push(ValidationError::max_length(&self.field_name, max));
            }
        }
        self
    }

    pub fn matches_pattern(mut self, pattern: &Regex, message: &str) -> Self {
        if let Some(value) = &self.value {
            if !pattern.is_match(value) {
                self.errors
                    .push(ValidationError::format(&self.field_name, message));
            }
        }
        self
    }

    pub fn email(self) -> Self {
        self.matches_pattern(email_regex(), "must be a valid email address")
    }

    pub fn phone(self) -> Self {
        self.matches_pattern(phone_regex(), "must be a valid phone number")
    }
}

/// Numeric validations
impl<T> ValidationBuilder<T>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    pub fn min(mut self, min: T) -> Self {
        if let Some(value) = self.value {
            if value < min {
                self.errors.push(ValidationError::invalid_value(
                    &self.field_name,
                    &format!("must be at least {}", min),
                ));
            }
        }
        self
    }

    pub fn range(mut self, min: T, max: T) -> Self {
        if let Some(value) = self.value {
            if value < min || value > max {
                self.errors
                    .push(ValidationError::range(&self.field_name, min, max));
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(email_regex().is_match("user@example.com"));
        assert!(email_regex().is_match("user.name+tag@example.co.uk"));
        assert!(!email_regex().is_match("user@"));
        assert!(!email_regex().is_match("@example.com"));
        assert!(!email_regex().is_match("user@example"));
    }

    #[test]
    fn test_phone_validation() {
        assert!(phone_regex().is_match("1134567890"));
        assert!(phone_regex().is_match("+5511999990000"));
        assert!(!phone_regex().is_match("123"));
        assert!(!phone_regex().is_match("abcdefghij"));
    }

    #[test]
    fn test_validation_builder() {
        let result = ValidationBuilder::new("name", Some("".to_string()))
            .required()
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("name", Some("test".to_string()))
            .required()
            .min_length(5)
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("email", Some("invalid".to_string()))
            .email()
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("email", Some("valid@example.com".to_string()))
            .email()
            .validate();
        assert!(result.is_ok());

        let result = ValidationBuilder::new("rating", Some(7)).range(1, 5).validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("rating", Some(4)).range(1, 5).validate();
        assert!(result.is_ok());

        let value: Option<String> = None;
        let result = ValidationBuilder::new("name", value).required().validate();
        assert!(result.is_err());
    }
}
