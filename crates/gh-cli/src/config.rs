//! CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CliError, CliResult};

/// CLI configuration, stored as TOML in the user's home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Game catalog file; the bundled catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Number of games on the home page.
    #[serde(default = "default_popular_count")]
    pub popular_count: usize,

    /// Whether game details require a signed-in user.
    #[serde(default)]
    pub protect_game_details: bool,
}

/// Default number of games on the home page.
const fn default_popular_count() -> usize {
    gh_catalog::POPULAR_COUNT
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            catalog_path: None,
            popular_count: default_popular_count(),
            protect_game_details: false,
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default location.
    ///
    /// ## Errors
    ///
    /// Returns an error if the home directory is unknown or the file is invalid.
    pub fn load() -> CliResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if it does not exist.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Saves configuration to `path`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the CLI's files.
    ///
    /// ## Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn home() -> CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".gamehub"))
    }

    /// Gets the configuration file path.
    ///
    /// ## Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn config_path() -> CliResult<PathBuf> {
        Ok(Self::home()?.join("gamehub.toml"))
    }

    /// Gets the path of the persisted sign-in session.
    ///
    /// ## Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn session_path() -> CliResult<PathBuf> {
        Ok(Self::home()?.join("session.json"))
    }

    /// Gets the effective output format (from args or config).
    #[must_use]
    pub fn effective_output(&self, arg: Option<OutputFormat>) -> OutputFormat {
        arg.unwrap_or(self.output_format)
    }

    /// Gets the effective catalog path (from args, config, then environment).
    #[must_use]
    pub fn effective_catalog_path(&self, arg: Option<&Path>) -> Option<PathBuf> {
        arg.map(Path::to_path_buf)
            .or_else(|| self.catalog_path.clone())
            .or_else(|| std::env::var_os("GAMEHUB_CATALOG_PATH").map(PathBuf::from))
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}
