//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Form input was rejected.
    #[error(transparent)]
    Validation(#[from] gh_validation::ValidationError),

    /// An account operation failed.
    #[error(transparent)]
    Session(#[from] gh_session::SessionError),

    /// The identity provider adapter could not be set up.
    #[error(transparent)]
    Rest(#[from] gh_identity_rest::RestError),

    /// The catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] gh_catalog::CatalogError),

    /// Resource not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The page needs a signed-in user.
    #[error("please sign in first (see `gamehub open {0}`)")]
    SignInRequired(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Checks if the error comes from rejected form input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Checks if authentication is unavailable.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::Session(e) if e.is_not_configured())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
