use std::collections::BTreeMap;
use std::fmt;

use validator::ValidateEmail;

use crate::messages;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Field name -> message. The first error recorded for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Accumulates form errors in declaration order.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, field: &str, value: &str, message: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.insert(field, message);
        }
        self
    }

    pub fn email(mut self, field: &str, value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            self.errors.insert(field, messages::REQUIRED_EMAIL);
        } else if !value.validate_email() {
            self.errors.insert(field, messages::EMAIL_FORMAT);
        }
        self
    }

    /// Required, then at least `MIN_PASSWORD_LENGTH` characters.
    pub fn password(mut self, field: &str, value: &str, required_message: &str) -> Self {
        if value.is_empty() {
            self.errors.insert(field, required_message);
        } else if value.chars().count() < MIN_PASSWORD_LENGTH {
            self.errors.insert(field, messages::PASSWORD_TOO_SHORT);
        }
        self
    }

    pub fn confirmation(mut self, field: &str, password: &str, confirmation: &str) -> Self {
        if password != confirmation {
            self.errors.insert(field, messages::PASSWORD_MISMATCH);
        }
        self
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
