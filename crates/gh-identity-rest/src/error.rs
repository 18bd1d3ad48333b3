//! REST adapter error types.

use gh_session::{codes, ProviderError};
use thiserror::Error;

/// Errors raised while talking to the identity REST service.
#[derive(Debug, Error)]
pub enum RestError {
    /// The adapter was constructed without usable credentials.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error payload.
    #[error("identity service error: {status} - {code}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Service error code (e.g. `EMAIL_EXISTS`).
        code: String,
    },

    /// The request URL could not be built.
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    /// The session state could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RestError {
    /// Checks if this is a transport failure.
    #[must_use]
    pub const fn is_http(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Returns the service error code, if the service rejected the call.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type for REST adapter operations.
pub type RestResult<T> = Result<T, RestError>;

impl From<RestError> for ProviderError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Api { code, .. } => provider_error(&code),
            RestError::Http(e) => Self::network(format!("Network error: {e}")),
            other => Self::internal(other.to_string()),
        }
    }
}

/// Translates a service error code into a provider error with a readable message.
///
/// The service sometimes appends detail after ` : ` (for example
/// `WEAK_PASSWORD : Password should be at least 6 characters`); only the
/// leading code is matched.
#[must_use]
pub fn provider_error(service_code: &str) -> ProviderError {
    let code = service_code.split(" : ").next().unwrap_or(service_code).trim();

    let (provider_code, message) = match code {
        "EMAIL_EXISTS" => (
            codes::EMAIL_ALREADY_IN_USE,
            "The email address is already in use by another account.",
        ),
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" => {
            (codes::INVALID_CREDENTIAL, "Invalid email or password.")
        }
        "INVALID_EMAIL" | "MISSING_EMAIL" => (codes::INVALID_EMAIL, "The email address is badly formatted."),
        "WEAK_PASSWORD" | "MISSING_PASSWORD" => {
            (codes::WEAK_PASSWORD, "Password should be at least 6 characters.")
        }
        "USER_DISABLED" => (
            codes::USER_DISABLED,
            "The user account has been disabled by an administrator.",
        ),
        "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
            (codes::OPERATION_NOT_ALLOWED, "This sign-in method is not enabled.")
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => (
            codes::TOO_MANY_REQUESTS,
            "Too many attempts. Please try again later.",
        ),
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => (
            codes::REQUIRES_RECENT_LOGIN,
            "Your session has expired. Please sign in again.",
        ),
        _ => return ProviderError::internal(format!("Identity service error: {code}")),
    };

    ProviderError::new(provider_code, message)
}
