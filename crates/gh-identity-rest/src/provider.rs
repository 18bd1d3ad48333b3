//! Identity Toolkit REST provider.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use gh_core::AuthConfig;
use gh_model::{Identity, ProfileUpdate};
use gh_session::{
    codes, FederatedProvider, IdentityListener, IdentityProvider, ListenerSet, ProviderError,
    ProviderResult, RedirectTarget, Subscription,
};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RestError, RestResult};
use crate::wire::{
    AccountResponse, AuthUriRequest, AuthUriResponse, ErrorEnvelope, IdpRequest, LookupRequest,
    LookupResponse, OobCodeRequest, PasswordRequest, UpdateRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Persisted session
// ============================================================================

/// A federated sign-in waiting for its redirect to come back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRedirect {
    /// Federated provider id (e.g. `google.com`).
    pub provider_id: String,
    /// Session id issued by `accounts:createAuthUri`.
    pub session_id: String,
    /// URL the browser landed on after the provider's consent page.
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Client-side session state that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Signed-in principal.
    #[serde(default)]
    pub identity: Option<Identity>,
    /// ID token of the signed-in principal.
    #[serde(default)]
    pub id_token: Option<String>,
    /// Refresh token of the signed-in principal.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Federated sign-in in progress.
    #[serde(default)]
    pub pending_redirect: Option<PendingRedirect>,
}

impl StoredSession {
    fn sign_in(&mut self, account: &AccountResponse) -> Identity {
        let identity = account.identity();
        self.identity = Some(identity.clone());
        self.id_token.clone_from(&account.id_token);
        self.refresh_token.clone_from(&account.refresh_token);
        identity
    }

    fn sign_out(&mut self) {
        self.identity = None;
        self.id_token = None;
        self.refresh_token = None;
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Identity provider backed by the Identity Toolkit REST API.
///
/// Sessions are local: signing out only forgets the tokens.
pub struct RestIdentityProvider {
    client: reqwest::Client,
    config: AuthConfig,
    session: Mutex<StoredSession>,
    listeners: ListenerSet,
}

impl RestIdentityProvider {
    /// Creates a provider from configuration.
    ///
    /// ## Errors
    ///
    /// Returns [`RestError::Config`] if API key, project id or app id is
    /// missing, and [`RestError::Http`] if the HTTP client cannot be built.
    pub fn new(config: AuthConfig) -> RestResult<Self> {
        if !config.is_configured() {
            return Err(RestError::Config(
                "API key, project id and app id are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        tracing::debug!(
            endpoint = %config.endpoint,
            auth_domain = %config.auth_domain(),
            "identity REST provider created"
        );

        Ok(Self {
            client,
            config,
            session: Mutex::new(StoredSession::default()),
            listeners: ListenerSet::new(),
        })
    }

    /// Restores a previously saved session.
    #[must_use]
    pub fn with_session(self, session: StoredSession) -> Self {
        *self.session.lock() = session;
        self
    }

    /// Returns the session state to persist.
    #[must_use]
    pub fn session(&self) -> StoredSession {
        self.session.lock().clone()
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Hands the URL the browser was redirected to back to the provider.
    ///
    /// The next [`redirect_result`](IdentityProvider::redirect_result) call
    /// completes the federated sign-in with it.
    ///
    /// ## Errors
    ///
    /// Fails with [`codes::OPERATION_NOT_ALLOWED`] when no federated sign-in
    /// was started.
    pub fn complete_redirect(&self, callback_url: &str) -> ProviderResult<()> {
        let mut session = self.session.lock();
        let Some(pending) = session.pending_redirect.as_mut() else {
            return Err(ProviderError::new(
                codes::OPERATION_NOT_ALLOWED,
                "No federated sign-in is in progress.",
            ));
        };
        pending.callback_url = Some(callback_url.to_string());
        Ok(())
    }

    fn id_token(&self) -> ProviderResult<String> {
        self.session
            .lock()
            .id_token
            .clone()
            .ok_or_else(|| ProviderError::new(codes::NO_CURRENT_USER, "No user is signed in."))
    }

    fn method_url(&self, method: &str) -> RestResult<Url> {
        let url = Url::parse_with_params(
            &format!("{}/accounts:{method}", self.config.endpoint),
            &[("key", self.config.api_key.as_str())],
        )?;
        Ok(url)
    }

    /// Calls an `accounts:*` method.
    async fn call<B, T>(&self, method: &str, body: &B) -> RestResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.method_url(method)?;
        tracing::debug!(method, "identity service request");

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let code = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => status.canonical_reason().unwrap_or("UNKNOWN").to_string(),
        };
        tracing::debug!(method, status = status.as_u16(), code = %code, "identity service rejected request");

        Err(RestError::Api {
            status: status.as_u16(),
            code,
        })
    }

    /// Signs `account` in locally and notifies listeners.
    fn hold(&self, account: &AccountResponse) -> Identity {
        let identity = self.session.lock().sign_in(account);
        self.listeners.notify(Some(&identity));
        identity
    }

    async fn password_call(&self, method: &str, email: &str, password: &str) -> ProviderResult<Identity> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let mut account: AccountResponse = self.call(method, &request).await?;

        // Sign-in responses carry no photo; fetch the full record.
        if let Some(token) = account.id_token.clone() {
            let lookup: LookupResponse = self.call("lookup", &LookupRequest { id_token: &token }).await?;
            if let Some(user) = lookup.users.into_iter().next() {
                account.display_name = user.display_name;
                account.photo_url = user.photo_url;
            }
        }

        Ok(self.hold(&account))
    }
}

impl fmt::Debug for RestIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestIdentityProvider")
            .field("endpoint", &self.config.endpoint)
            .field("project_id", &self.config.project_id)
            .field("signed_in", &self.session.lock().identity.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    fn provider_type(&self) -> &'static str {
        "rest"
    }

    async fn create_account(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        self.password_call("signUp", email, password).await
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        self.password_call("signInWithPassword", email, password).await
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        self.session.lock().sign_out();
        self.listeners.notify(None);
        Ok(())
    }

    async fn begin_federated_sign_in(&self, provider: FederatedProvider) -> ProviderResult<RedirectTarget> {
        let request = AuthUriRequest {
            provider_id: provider.provider_id(),
            continue_uri: &self.config.continue_url,
        };
        let response: AuthUriResponse = self.call("createAuthUri", &request).await?;

        let Some(session_id) = response.session_id else {
            return Err(ProviderError::internal("Identity service returned no session id."));
        };
        self.session.lock().pending_redirect = Some(PendingRedirect {
            provider_id: provider.provider_id().to_string(),
            session_id: session_id.clone(),
            callback_url: None,
        });

        Ok(RedirectTarget {
            url: response.auth_uri,
            session_id: Some(session_id),
        })
    }

    async fn redirect_result(&self) -> ProviderResult<Option<Identity>> {
        let pending = {
            let mut session = self.session.lock();
            let ready = session
                .pending_redirect
                .as_ref()
                .is_some_and(|p| p.callback_url.is_some());
            if ready {
                session.pending_redirect.take()
            } else {
                None
            }
        };
        let Some(PendingRedirect {
            session_id,
            callback_url: Some(callback_url),
            ..
        }) = pending
        else {
            return Ok(None);
        };

        let request = IdpRequest {
            request_uri: &callback_url,
            session_id: &session_id,
            return_secure_token: true,
            return_idp_credential: true,
        };
        let account: AccountResponse = self.call("signInWithIdp", &request).await?;
        Ok(Some(self.hold(&account)))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ProviderResult<Identity> {
        let id_token = self.id_token()?;
        let request = UpdateRequest {
            id_token: &id_token,
            display_name: &update.display_name,
            photo_url: update.photo_url.as_deref(),
            delete_attribute: if update.photo_url.is_none() {
                vec!["PHOTO_URL"]
            } else {
                Vec::new()
            },
            return_secure_token: false,
        };
        let account: AccountResponse = self.call("update", &request).await?;

        let mut session = self.session.lock();
        let base = session
            .identity
            .clone()
            .unwrap_or_else(|| account.identity());
        let identity = base.with_profile(update);
        session.identity = Some(identity.clone());
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> ProviderResult<()> {
        let request = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email,
        };
        let _: serde_json::Value = self.call("sendOobCode", &request).await?;
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.session.lock().identity.clone()
    }

    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let subscription = self.listeners.add(std::sync::Arc::clone(&listener));
        let current = self.current_identity();
        listener(current.as_ref());
        subscription
    }
}
