//! # gh-validation
//!
//! Form validation layer for GameHub.
//!
//! Every form is checked against a declarative schema before anything is sent
//! to the identity provider. A schema is a pure function from raw input to
//! either normalized, accepted values or a list of field-level messages.
//!
//! ## Schemas
//!
//! | Schema | Form |
//! |---|---|
//! | [`SchemaName::Newsletter`] | [`NewsletterForm`] |
//! | [`SchemaName::Login`] | [`LoginForm`] |
//! | [`SchemaName::Register`] | [`RegisterForm`] |
//! | [`SchemaName::UpdateProfile`] | [`UpdateProfileForm`] |
//! | [`SchemaName::ForgotPassword`] | [`ForgotPasswordForm`] |
//!
//! ## Example
//!
//! ```
//! use gh_validation::{Form, LoginForm};
//!
//! let form = LoginForm::new("player@example.com", "hunter2");
//! let credentials = form.validate().expect("valid login");
//! assert_eq!(credentials.email, "player@example.com");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod forms;
pub mod rules;
pub mod schema;

pub use error::{FieldError, ValidationError, ValidationResult};
pub use forms::{
    Credentials, ForgotPasswordForm, LoginForm, NewsletterForm, NewsletterSignup,
    PasswordResetRequest, ProfileChanges, RegisterForm, Registration, UpdateProfileForm,
};
pub use rules::{is_valid_email, is_valid_url, PasswordRequirements, Rule};
pub use schema::{Form, SchemaName};
