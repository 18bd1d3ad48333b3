//! Schema definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, ValidationError, ValidationResult};
use crate::rules::{self, Rule};

/// Names of the form schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaName {
    /// Newsletter signup.
    Newsletter,
    /// Password sign-in.
    Login,
    /// Account registration.
    Register,
    /// Display name / photo change.
    UpdateProfile,
    /// Password reset request.
    ForgotPassword,
}

impl SchemaName {
    /// Returns the schema name as used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newsletter => "newsletter",
            Self::Login => "login",
            Self::Register => "register",
            Self::UpdateProfile => "updateProfile",
            Self::ForgotPassword => "forgotPassword",
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A form bound to a schema.
pub trait Form {
    /// Normalized values produced when the form is accepted.
    type Accepted;

    /// Schema this form validates against.
    const SCHEMA: SchemaName;

    /// Validates the form.
    ///
    /// ## Errors
    ///
    /// Returns a [`ValidationError`] with one message per invalid field.
    fn validate(&self) -> ValidationResult<Self::Accepted>;
}

/// One field of a schema: its name, the value to check, and its rules.
pub(crate) struct FieldCheck<'a> {
    pub field: &'static str,
    pub value: &'a str,
    pub rules: &'a [Rule],
}

/// Checks every field, collecting the first violation of each.
pub(crate) fn check_fields(schema: SchemaName, fields: &[FieldCheck<'_>]) -> ValidationResult<()> {
    let errors: Vec<FieldError> = fields
        .iter()
        .filter_map(|f| rules::first_violation(f.value, f.rules).map(|msg| FieldError::new(f.field, msg)))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { schema, errors })
    }
}
