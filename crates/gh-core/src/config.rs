//! Configuration management for GameHub.
//!
//! Configuration is loaded from environment variables (and an optional `.env`
//! file) with sensible defaults. Authentication is optional: when the
//! identity provider credentials are missing the application still runs, but
//! every account operation reports that authentication is not configured.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default REST endpoint of the identity provider.
pub const DEFAULT_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";

/// Project id used when none is configured.
pub const DEMO_PROJECT_ID: &str = "demo-project";

/// Default location of the game catalog.
pub const DEFAULT_CATALOG_PATH: &str = "data/games.json";

/// Identity provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Public API key of the provider project.
    pub api_key: String,

    /// Provider project identifier.
    pub project_id: String,

    /// Application identifier within the project.
    pub app_id: String,

    /// Base URL of the provider REST API.
    pub endpoint: String,

    /// URL the provider sends the browser back to after a federated login.
    pub continue_url: String,
}

impl AuthConfig {
    /// Loads configuration from environment variables.
    ///
    /// Reads `GAMEHUB_AUTH_API_KEY`, `GAMEHUB_AUTH_PROJECT_ID`,
    /// `GAMEHUB_AUTH_APP_ID`, `GAMEHUB_AUTH_ENDPOINT` and
    /// `GAMEHUB_AUTH_CONTINUE_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let project_id = get("GAMEHUB_AUTH_PROJECT_ID");
        let endpoint = lookup("GAMEHUB_AUTH_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_ENDPOINT.to_string());
        let continue_url = lookup("GAMEHUB_AUTH_CONTINUE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:5000/".to_string());

        Self {
            api_key: get("GAMEHUB_AUTH_API_KEY"),
            project_id,
            app_id: get("GAMEHUB_AUTH_APP_ID"),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            continue_url,
        }
    }

    /// Returns whether enough credentials are present to talk to the provider.
    ///
    /// API key, project id and app id must all be non-empty.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.project_id.is_empty() && !self.app_id.is_empty()
    }

    /// Returns the configured project id, or the demo project id.
    #[must_use]
    pub fn effective_project_id(&self) -> &str {
        if self.project_id.is_empty() {
            DEMO_PROJECT_ID
        } else {
            &self.project_id
        }
    }

    /// Returns the provider auth domain derived from the project id.
    #[must_use]
    pub fn auth_domain(&self) -> String {
        format!("{}.firebaseapp.com", self.effective_project_id())
    }

    /// Returns this configuration if it is usable, logging a warning otherwise.
    #[must_use]
    pub fn into_configured(self) -> Option<Self> {
        if self.is_configured() {
            Some(self)
        } else {
            tracing::warn!(
                "identity provider environment variables are not set; authentication features will be disabled"
            );
            None
        }
    }

    /// Creates a configuration for testing against a local endpoint.
    #[must_use]
    pub fn for_testing(endpoint: &str) -> Self {
        Self {
            api_key: "test-api-key".to_string(),
            project_id: "test-project".to_string(),
            app_id: "1:test:web:app".to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            continue_url: "http://localhost:5000/".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Catalog data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the JSON file holding the games.
    pub path: PathBuf,
}

impl CatalogConfig {
    /// Loads configuration from `GAMEHUB_CATALOG_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let path = std::env::var("GAMEHUB_CATALOG_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from);

        Self { path }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}
