//! Common test utilities and fixtures.

use std::sync::Arc;
use std::time::Duration;

use gamehub_integration_tests::FakeIdentityService;
use gh_identity_rest::RestIdentityProvider;
use gh_session::{IdentityProvider, InMemoryIdentityProvider, SessionHolder};

/// Upper bound for anything that waits on the session holder.
pub const WAIT: Duration = Duration::from_secs(5);

/// Initializes tracing once for the whole test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gh_session=debug,gh_identity_rest=debug")
        .with_test_writer()
        .try_init();
}

/// Test environment running the REST adapter against the fake service.
pub struct TestEnv {
    /// Fake identity service.
    pub service: FakeIdentityService,
    /// Adapter under test.
    pub provider: Arc<RestIdentityProvider>,
    /// Holder backed by the adapter.
    pub session: SessionHolder,
}

impl TestEnv {
    /// Starts the fake service and a loaded session holder.
    pub async fn new() -> anyhow::Result<Self> {
        init_tracing();

        let service = FakeIdentityService::start().await?;
        let provider = Arc::new(RestIdentityProvider::new(service.config())?);
        let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;

        Ok(Self {
            service,
            provider,
            session,
        })
    }

    /// Replaces the holder with a fresh one over the same adapter.
    pub async fn restart(&mut self) {
        self.session.shutdown();
        self.session = start_holder(Arc::clone(&self.provider) as Arc<dyn IdentityProvider>).await;
    }
}

/// Starts a holder and waits until it has loaded.
pub async fn start_holder(provider: Arc<dyn IdentityProvider>) -> SessionHolder {
    let session = SessionHolder::start(provider).await;
    tokio::time::timeout(WAIT, session.wait_until_loaded())
        .await
        .expect("session did not finish loading");
    session
}

/// Starts a holder over a fresh in-memory provider.
pub async fn memory_session() -> (Arc<InMemoryIdentityProvider>, SessionHolder) {
    init_tracing();
    let provider = Arc::new(InMemoryIdentityProvider::new());
    let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;
    (provider, session)
}
