//! Application context shared by the commands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gh_catalog::Catalog;
use gh_core::AuthConfig;
use gh_identity_rest::RestIdentityProvider;
use gh_session::{IdentityProvider, InMemoryIdentityProvider, SessionHolder};

use crate::config::{CliConfig, OutputFormat};
use crate::routes::{resolve, Resolution, RouteOptions};
use crate::session_store::SessionStore;
use crate::CliResult;

const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Where identities come from.
#[derive(Debug, Clone)]
pub enum IdentityBackend {
    /// The hosted identity service, with its session persisted in a file.
    Rest {
        /// Service adapter.
        provider: Arc<RestIdentityProvider>,
        /// Session file.
        store: SessionStore,
    },
    /// Accounts kept in memory for this run.
    Memory(Arc<InMemoryIdentityProvider>),
    /// No provider credentials; account features are disabled.
    Disabled,
}

impl IdentityBackend {
    /// Picks the backend from flags and environment.
    ///
    /// ## Errors
    ///
    /// Returns an error if the persisted session cannot be read or the HTTP
    /// client cannot be built.
    pub fn select(offline: bool, auth: AuthConfig, store: SessionStore) -> CliResult<Self> {
        if offline {
            tracing::debug!("offline mode; using in-memory identity provider");
            return Ok(Self::Memory(Arc::new(InMemoryIdentityProvider::new())));
        }

        let Some(auth) = auth.into_configured() else {
            return Ok(Self::Disabled);
        };
        let provider = RestIdentityProvider::new(auth)?.with_session(store.load()?);
        Ok(Self::Rest {
            provider: Arc::new(provider),
            store,
        })
    }

    /// Returns the provider handed to the session holder.
    #[must_use]
    pub fn provider(&self) -> Option<Arc<dyn IdentityProvider>> {
        match self {
            Self::Rest { provider, .. } => Some(Arc::clone(provider) as Arc<dyn IdentityProvider>),
            Self::Memory(provider) => Some(Arc::clone(provider) as Arc<dyn IdentityProvider>),
            Self::Disabled => None,
        }
    }
}

/// Everything a command needs.
#[derive(Debug)]
pub struct App {
    /// Loaded configuration.
    pub config: CliConfig,
    /// Effective output format.
    pub output: OutputFormat,
    /// Game catalog.
    pub catalog: Catalog,
    /// Session state holder.
    pub session: SessionHolder,
    backend: IdentityBackend,
}

impl App {
    /// Builds the context from configuration and command-line overrides.
    ///
    /// ## Errors
    ///
    /// Returns an error if the catalog or the persisted session cannot be loaded.
    pub async fn build(
        config: CliConfig,
        output: Option<OutputFormat>,
        catalog: Option<&Path>,
        offline: bool,
    ) -> CliResult<Self> {
        let output = config.effective_output(output);
        let catalog = load_catalog(config.effective_catalog_path(catalog).as_deref())?;
        let backend = IdentityBackend::select(
            offline,
            AuthConfig::from_env(),
            SessionStore::new(CliConfig::session_path()?),
        )?;

        Ok(Self::new(config, output, catalog, backend).await)
    }

    /// Assembles a context and starts its session holder.
    pub async fn new(config: CliConfig, output: OutputFormat, catalog: Catalog, backend: IdentityBackend) -> Self {
        let session = start_session(&backend).await;
        Self {
            config,
            output,
            catalog,
            session,
            backend,
        }
    }

    /// Returns the identity backend.
    #[must_use]
    pub const fn backend(&self) -> &IdentityBackend {
        &self.backend
    }

    /// Returns the routing switches from configuration.
    #[must_use]
    pub const fn route_options(&self) -> RouteOptions {
        RouteOptions {
            protect_game_details: self.config.protect_game_details,
            popular_count: self.config.popular_count,
        }
    }

    /// Resolves a path against the current session.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Resolution {
        resolve(path, &self.session.state(), &self.catalog, &self.route_options())
    }

    /// Stops the session holder and starts a fresh one.
    ///
    /// The new holder checks for a pending federated redirect result.
    pub async fn restart_session(&mut self) {
        self.session.shutdown();
        self.session = start_session(&self.backend).await;
    }

    /// Writes the identity service session back to disk.
    ///
    /// ## Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub fn persist(&self) -> CliResult<()> {
        if let IdentityBackend::Rest { provider, store } = &self.backend {
            store.save(&provider.session())?;
        }
        Ok(())
    }
}

async fn start_session(backend: &IdentityBackend) -> SessionHolder {
    let session = SessionHolder::start_optional(backend.provider()).await;
    if tokio::time::timeout(LOAD_TIMEOUT, session.wait_until_loaded())
        .await
        .is_err()
    {
        tracing::warn!("identity provider did not report the signed-in user in time");
    }
    session
}

fn load_catalog(path: Option<&Path>) -> CliResult<Catalog> {
    match path {
        Some(path) => Ok(Catalog::load(path)?),
        None => Ok(Catalog::bundled()?),
    }
}
