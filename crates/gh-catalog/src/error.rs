//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the game catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The data file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path of the data file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The data is not a JSON array of games.
    #[error("invalid catalog data: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Checks if the data file is missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
