//! Validation error types.

use std::fmt;

use thiserror::Error;

use crate::schema::SchemaName;

/// A message attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as the form knows it (e.g. `photoURL`).
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Input rejected by a schema.
///
/// Holds at most one message per field, in the schema's field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{schema} form is invalid: {}", summary(.errors))]
pub struct ValidationError {
    /// Schema that rejected the input.
    pub schema: SchemaName,
    /// Field-level messages.
    pub errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Returns the first message, the one a single-line form shows.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// Returns the message for a field, if that field was rejected.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Returns whether the given field was rejected.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
