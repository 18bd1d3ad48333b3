//! The GameHub forms and their schemas.
//!
//! Forms hold raw user input exactly as typed. Validation produces the
//! values the session layer consumes: an empty photo URL becomes `None`.
//! Names are passed on as typed; "non-empty" means at least one character.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::rules::{
    Rule, EMAIL_MESSAGE, MIN_PASSWORD_LENGTH, NAME_REQUIRED_MESSAGE, PASSWORD_LENGTH_MESSAGE,
    PASSWORD_LOWERCASE_MESSAGE, PASSWORD_REQUIRED_MESSAGE, PASSWORD_UPPERCASE_MESSAGE,
    PHOTO_URL_MESSAGE,
};
use crate::schema::{check_fields, FieldCheck, Form, SchemaName};

const EMAIL_RULES: &[Rule] = &[Rule::Email(EMAIL_MESSAGE)];
const NAME_RULES: &[Rule] = &[Rule::Required(NAME_REQUIRED_MESSAGE)];
const PHOTO_URL_RULES: &[Rule] = &[Rule::UrlOrEmpty(PHOTO_URL_MESSAGE)];
const LOGIN_PASSWORD_RULES: &[Rule] = &[Rule::Required(PASSWORD_REQUIRED_MESSAGE)];
const NEW_PASSWORD_RULES: &[Rule] = &[
    Rule::MinLength(MIN_PASSWORD_LENGTH, PASSWORD_LENGTH_MESSAGE),
    Rule::HasUppercase(PASSWORD_UPPERCASE_MESSAGE),
    Rule::HasLowercase(PASSWORD_LOWERCASE_MESSAGE),
];

fn optional_url(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ============================================================================
// Newsletter
// ============================================================================

/// Newsletter signup form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterForm {
    /// Email address to subscribe.
    pub email: String,
}

/// Accepted newsletter signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSignup {
    /// Subscribed email address.
    pub email: String,
}

impl NewsletterForm {
    /// Creates a form.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

impl Form for NewsletterForm {
    type Accepted = NewsletterSignup;
    const SCHEMA: SchemaName = SchemaName::Newsletter;

    fn validate(&self) -> ValidationResult<NewsletterSignup> {
        check_fields(
            Self::SCHEMA,
            &[FieldCheck {
                field: "email",
                value: &self.email,
                rules: EMAIL_RULES,
            }],
        )?;

        Ok(NewsletterSignup {
            email: self.email.clone(),
        })
    }
}

// ============================================================================
// Login
// ============================================================================

/// Password sign-in form.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Accepted sign-in credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl LoginForm {
    /// Creates a form.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Form for LoginForm {
    type Accepted = Credentials;
    const SCHEMA: SchemaName = SchemaName::Login;

    fn validate(&self) -> ValidationResult<Credentials> {
        check_fields(
            Self::SCHEMA,
            &[
                FieldCheck {
                    field: "email",
                    value: &self.email,
                    rules: EMAIL_RULES,
                },
                FieldCheck {
                    field: "password",
                    value: &self.password,
                    rules: LOGIN_PASSWORD_RULES,
                },
            ],
        )?;

        Ok(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Register
// ============================================================================

/// Account registration form.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional profile photo URL; empty means none.
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    /// Password.
    pub password: String,
}

/// Accepted registration.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    /// Display name as entered.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Photo URL, if one was given.
    pub photo_url: Option<String>,
}

impl RegisterForm {
    /// Creates a form.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        photo_url: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            photo_url: photo_url.into(),
            password: password.into(),
        }
    }
}

impl Form for RegisterForm {
    type Accepted = Registration;
    const SCHEMA: SchemaName = SchemaName::Register;

    fn validate(&self) -> ValidationResult<Registration> {
        check_fields(
            Self::SCHEMA,
            &[
                FieldCheck {
                    field: "name",
                    value: &self.name,
                    rules: NAME_RULES,
                },
                FieldCheck {
                    field: "email",
                    value: &self.email,
                    rules: EMAIL_RULES,
                },
                FieldCheck {
                    field: "photoURL",
                    value: &self.photo_url,
                    rules: PHOTO_URL_RULES,
                },
                FieldCheck {
                    field: "password",
                    value: &self.password,
                    rules: NEW_PASSWORD_RULES,
                },
            ],
        )?;

        Ok(Registration {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            photo_url: optional_url(&self.photo_url),
        })
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("photo_url", &self.photo_url)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("photo_url", &self.photo_url)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Update profile
// ============================================================================

/// Profile edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileForm {
    /// Display name.
    pub name: String,
    /// Optional profile photo URL; empty means none.
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
}

/// Accepted profile changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChanges {
    /// Display name as entered.
    pub name: String,
    /// Photo URL, if one was given.
    pub photo_url: Option<String>,
}

impl UpdateProfileForm {
    /// Creates a form.
    #[must_use]
    pub fn new(name: impl Into<String>, photo_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            photo_url: photo_url.into(),
        }
    }
}

impl Form for UpdateProfileForm {
    type Accepted = ProfileChanges;
    const SCHEMA: SchemaName = SchemaName::UpdateProfile;

    fn validate(&self) -> ValidationResult<ProfileChanges> {
        check_fields(
            Self::SCHEMA,
            &[
                FieldCheck {
                    field: "name",
                    value: &self.name,
                    rules: NAME_RULES,
                },
                FieldCheck {
                    field: "photoURL",
                    value: &self.photo_url,
                    rules: PHOTO_URL_RULES,
                },
            ],
        )?;

        Ok(ProfileChanges {
            name: self.name.clone(),
            photo_url: optional_url(&self.photo_url),
        })
    }
}

// ============================================================================
// Forgot password
// ============================================================================

/// Password reset request form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordForm {
    /// Email address of the account.
    pub email: String,
}

/// Accepted password reset request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    /// Email address of the account.
    pub email: String,
}

impl ForgotPasswordForm {
    /// Creates a form.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

impl Form for ForgotPasswordForm {
    type Accepted = PasswordResetRequest;
    const SCHEMA: SchemaName = SchemaName::ForgotPassword;

    fn validate(&self) -> ValidationResult<PasswordResetRequest> {
        check_fields(
            Self::SCHEMA,
            &[FieldCheck {
                field: "email",
                value: &self.email,
                rules: EMAIL_RULES,
            }],
        )?;

        Ok(PasswordResetRequest {
            email: self.email.clone(),
        })
    }
}
