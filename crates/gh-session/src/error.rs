//! Session error types.

use thiserror::Error;

use crate::provider::ProviderError;

/// Message reported when no identity provider was configured at startup.
pub const NOT_CONFIGURED_MESSAGE: &str = "Authentication is not configured. Please contact support.";

/// Errors returned by session operations.
///
/// The display string of every variant is the message stored in the
/// session's error field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The identity provider was never initialized.
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,

    /// The identity provider refused the operation.
    #[error("{message}")]
    ProviderRejected {
        /// Provider error code (e.g. `auth/invalid-credential`).
        code: String,
        /// Human-readable message from the provider.
        message: String,
    },
}

impl SessionError {
    /// Checks if this error means authentication is unavailable.
    #[must_use]
    pub const fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Returns the provider error code, if the provider rejected the call.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::NotConfigured => None,
            Self::ProviderRejected { code, .. } => Some(code),
        }
    }
}

impl From<ProviderError> for SessionError {
    fn from(err: ProviderError) -> Self {
        Self::ProviderRejected {
            code: err.code,
            message: err.message,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
