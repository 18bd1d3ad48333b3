//! Persisted sign-in session.
//!
//! The identity service adapter keeps its tokens in memory; between CLI
//! invocations they live in a JSON file next to the configuration.

use std::path::{Path, PathBuf};

use gh_identity_rest::StoredSession;

use crate::CliResult;

/// JSON file holding a [`StoredSession`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the session; a missing file means signed out.
    pub fn load(&self) -> CliResult<StoredSession> {
        if !self.path.exists() {
            return Ok(StoredSession::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Saves the session; an empty session removes the file.
    pub fn save(&self, session: &StoredSession) -> CliResult<()> {
        if *session == StoredSession::default() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}
