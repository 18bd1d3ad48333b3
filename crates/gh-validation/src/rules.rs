//! Field rules.
//!
//! A field is described by an ordered list of [`Rule`]s. Checking stops at the
//! first rule the value breaks, so a field reports one message at a time.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Message for malformed email addresses.
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
/// Message for malformed photo URLs.
pub const PHOTO_URL_MESSAGE: &str = "Please enter a valid photo URL";
/// Message for a missing name.
pub const NAME_REQUIRED_MESSAGE: &str = "Name is required";
/// Message for a missing password.
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required";
/// Message for a short password.
pub const PASSWORD_LENGTH_MESSAGE: &str = "Password must be at least 6 characters";
/// Message for a password without uppercase letters.
pub const PASSWORD_UPPERCASE_MESSAGE: &str = "Password must contain at least one uppercase letter";
/// Message for a password without lowercase letters.
pub const PASSWORD_LOWERCASE_MESSAGE: &str = "Password must contain at least one lowercase letter";

// Lookaheads are not supported by `regex`; the leading-dot and double-dot
// checks live in `is_valid_email`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must not be empty.
    Required(&'static str),
    /// Value must be a syntactically valid email address.
    Email(&'static str),
    /// Value must be an absolute URL, or empty.
    UrlOrEmpty(&'static str),
    /// Value must have at least this many characters.
    MinLength(usize, &'static str),
    /// Value must contain an ASCII uppercase letter.
    HasUppercase(&'static str),
    /// Value must contain an ASCII lowercase letter.
    HasLowercase(&'static str),
}

impl Rule {
    /// Checks a value, returning the rule's message when it is broken.
    #[must_use]
    pub fn check(self, value: &str) -> Option<&'static str> {
        let ok = match self {
            Self::Required(_) => !value.is_empty(),
            Self::Email(_) => is_valid_email(value),
            Self::UrlOrEmpty(_) => value.is_empty() || is_valid_url(value),
            Self::MinLength(min, _) => value.chars().count() >= min,
            Self::HasUppercase(_) => value.chars().any(|c| c.is_ascii_uppercase()),
            Self::HasLowercase(_) => value.chars().any(|c| c.is_ascii_lowercase()),
        };

        if ok {
            None
        } else {
            Some(self.message())
        }
    }

    /// Returns the message shown when this rule is broken.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Required(msg)
            | Self::Email(msg)
            | Self::UrlOrEmpty(msg)
            | Self::MinLength(_, msg)
            | Self::HasUppercase(msg)
            | Self::HasLowercase(msg) => msg,
        }
    }
}

/// Checks a value against rules in order, returning the first broken rule's message.
#[must_use]
pub fn first_violation(value: &str, rules: &[Rule]) -> Option<&'static str> {
    rules.iter().find_map(|rule| rule.check(value))
}

/// Returns whether `value` is a syntactically valid email address.
///
/// The local part may use letters, digits and `_ ' + - .`, must not start
/// with a dot, must not end with a dot and must not contain `..`. The domain
/// is a dot-separated list of labels ending in an alphabetic TLD of at least
/// two letters.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_PATTERN.is_match(value)
}

/// Returns whether `value` parses as an absolute URL.
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Live password checklist shown next to the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRequirements {
    /// At least [`MIN_PASSWORD_LENGTH`] characters.
    pub min_length: bool,
    /// At least one uppercase letter.
    pub uppercase: bool,
    /// At least one lowercase letter.
    pub lowercase: bool,
}

impl PasswordRequirements {
    /// Evaluates a password.
    #[must_use]
    pub fn check(password: &str) -> Self {
        Self {
            min_length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        }
    }

    /// Returns whether every requirement is met.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.min_length && self.uppercase && self.lowercase
    }

    /// Returns each requirement with its label, in display order.
    #[must_use]
    pub const fn items(&self) -> [(&'static str, bool); 3] {
        [
            ("At least 6 characters", self.min_length),
            ("One uppercase letter", self.uppercase),
            ("One lowercase letter", self.lowercase),
        ]
    }
}
