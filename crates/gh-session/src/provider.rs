//! Identity provider capability.
//!
//! The identity provider owns accounts, credentials and sessions. GameHub
//! only needs a small set of capabilities from it: create, sign in, sign out,
//! federated redirect sign-in, profile update, password reset, and a
//! subscription to identity changes. Concrete vendors implement
//! [`IdentityProvider`] as adapters.

use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use gh_model::{Identity, ProfileUpdate};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider error code (see [`codes`]).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a network failure error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(codes::NETWORK_REQUEST_FAILED, message)
    }

    /// Creates an internal provider error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Well-known provider error codes.
pub mod codes {
    /// An account already exists for the email address.
    pub const EMAIL_ALREADY_IN_USE: &str = "auth/email-already-in-use";
    /// Email/password combination was rejected.
    pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
    /// Email address was malformed.
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    /// Password does not meet the provider's policy.
    pub const WEAK_PASSWORD: &str = "auth/weak-password";
    /// The account has been disabled.
    pub const USER_DISABLED: &str = "auth/user-disabled";
    /// The operation needs a signed-in principal.
    pub const NO_CURRENT_USER: &str = "auth/no-current-user";
    /// The sign-in method is not enabled.
    pub const OPERATION_NOT_ALLOWED: &str = "auth/operation-not-allowed";
    /// Too many attempts; the provider throttled the caller.
    pub const TOO_MANY_REQUESTS: &str = "auth/too-many-requests";
    /// The session token is no longer valid.
    pub const REQUIRES_RECENT_LOGIN: &str = "auth/requires-recent-login";
    /// The provider could not be reached.
    pub const NETWORK_REQUEST_FAILED: &str = "auth/network-request-failed";
    /// Any other failure.
    pub const INTERNAL_ERROR: &str = "auth/internal-error";
}

/// Third-party account providers usable for federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FederatedProvider {
    /// Google accounts.
    Google,
}

impl FederatedProvider {
    /// Returns the provider id used on the wire.
    #[must_use]
    pub const fn provider_id(self) -> &'static str {
        match self {
            Self::Google => "google.com",
        }
    }
}

impl fmt::Display for FederatedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_id())
    }
}

/// Where the user must go to continue a federated sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTarget {
    /// URL to open.
    pub url: String,
    /// Provider session id that must accompany the redirect result, if any.
    pub session_id: Option<String>,
}

/// Provider operations, used for logging and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    /// `create_account`.
    CreateAccount,
    /// `sign_in_with_password`.
    SignIn,
    /// `sign_out`.
    SignOut,
    /// `begin_federated_sign_in`.
    BeginFederatedSignIn,
    /// `redirect_result`.
    RedirectResult,
    /// `update_profile`.
    UpdateProfile,
    /// `send_password_reset`.
    SendPasswordReset,
}

/// Capability interface of an identity provider.
///
/// ## Notifications
///
/// [`subscribe`](Self::subscribe) registers a listener that receives the
/// current identity (or `None`) on every provider-side change. Adapters
/// deliver one notification with the current state right after subscribing,
/// unless documented otherwise.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns a short identifier of the adapter (e.g. `memory`, `rest`).
    fn provider_type(&self) -> &'static str;

    /// Creates an account and signs it in.
    async fn create_account(&self, email: &str, password: &str) -> ProviderResult<Identity>;

    /// Verifies credentials and signs the account in.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> ProviderResult<Identity>;

    /// Ends the current session.
    async fn sign_out(&self) -> ProviderResult<()>;

    /// Starts a redirect-based federated sign-in.
    ///
    /// The identity is not known until [`redirect_result`](Self::redirect_result)
    /// is checked after the redirect comes back.
    async fn begin_federated_sign_in(&self, provider: FederatedProvider) -> ProviderResult<RedirectTarget>;

    /// Returns the identity from a completed federated redirect, if one is pending.
    async fn redirect_result(&self) -> ProviderResult<Option<Identity>>;

    /// Updates display name and photo of the currently signed-in principal.
    ///
    /// Fails with [`codes::NO_CURRENT_USER`] if nobody is signed in.
    async fn update_profile(&self, update: &ProfileUpdate) -> ProviderResult<Identity>;

    /// Sends an out-of-band password reset message.
    async fn send_password_reset(&self, email: &str) -> ProviderResult<()>;

    /// Returns the principal the provider currently considers signed in.
    fn current_identity(&self) -> Option<Identity>;

    /// Registers an identity-change listener.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;
}

/// Callback receiving identity changes.
pub type IdentityListener = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, IdentityListener)>,
}

/// A set of identity listeners that adapters fan notifications out to.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Arc<Mutex<Listeners>>,
}

impl ListenerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener; it stays registered while the returned handle lives.
    #[must_use]
    pub fn add(&self, listener: IdentityListener) -> Subscription {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, listener));

        Subscription {
            id,
            set: Arc::downgrade(&self.inner),
        }
    }

    /// Notifies every listener.
    ///
    /// Listeners are called outside the internal lock, so a listener may
    /// subscribe or unsubscribe without deadlocking.
    pub fn notify(&self, identity: Option<&Identity>) {
        let listeners: Vec<IdentityListener> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(identity);
        }
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet").field("len", &self.len()).finish()
    }
}

/// Handle of a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    set: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Returns a handle that is not attached to any listener set.
    pub fn detached() -> Self {
        Self {
            id: 0,
            set: Weak::new(),
        }
    }

    /// Unsubscribes explicitly.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(set) = self.set.upgrade() {
            set.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &(self.set.strong_count() > 0))
            .finish()
    }
}
