//! In-memory identity provider.
//!
//! Keeps accounts in process memory. Used by the test suites and by the
//! CLI's offline mode. Emails are matched case-insensitively.

use std::collections::HashMap;

use async_trait::async_trait;
use gh_model::{Identity, ProfileUpdate};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::provider::{
    codes, FederatedProvider, IdentityListener, IdentityProvider, ListenerSet, ProviderError,
    ProviderOperation, ProviderResult, RedirectTarget, Subscription,
};

const MIN_PASSWORD_LENGTH: usize = 6;
const REDIRECT_URL_BASE: &str = "memory://federated";

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    current: Option<Identity>,
    federated: HashMap<FederatedProvider, Identity>,
    pending_redirect: Option<Identity>,
    failures: HashMap<ProviderOperation, ProviderError>,
    password_resets: Vec<String>,
    calls: HashMap<ProviderOperation, usize>,
}

impl MemoryState {
    /// Counts the call and returns an injected failure, if any.
    fn enter(&mut self, op: ProviderOperation) -> ProviderResult<()> {
        *self.calls.entry(op).or_default() += 1;
        match self.failures.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Identity provider keeping accounts in memory.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    state: Mutex<MemoryState>,
    listeners: ListenerSet,
    notify_on_subscribe: bool,
}

impl InMemoryIdentityProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            listeners: ListenerSet::new(),
            notify_on_subscribe: true,
        }
    }

    /// Controls whether new subscribers receive the current identity right away.
    ///
    /// With `false`, subscribers wait for [`emit_current`](Self::emit_current)
    /// or the next sign-in/sign-out, which lets tests observe the loading phase.
    #[must_use]
    pub const fn with_initial_notification(mut self, enabled: bool) -> Self {
        self.notify_on_subscribe = enabled;
        self
    }

    /// Registers the account returned by a federated sign-in with `provider`.
    #[must_use]
    pub fn with_federated_account(self, provider: FederatedProvider, identity: Identity) -> Self {
        self.state.lock().federated.insert(provider, identity);
        self
    }

    /// Adds an account without signing it in.
    pub fn add_account(&self, email: &str, password: &str, display_name: Option<&str>) -> Identity {
        let mut identity = Identity::new(new_uid(), email);
        if let Some(name) = display_name {
            identity = identity.with_display_name(name);
        }

        self.state.lock().accounts.insert(
            account_key(email),
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        identity
    }

    /// Makes the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: ProviderOperation, err: ProviderError) {
        self.state.lock().failures.insert(op, err);
    }

    /// Notifies subscribers of the current identity.
    pub fn emit_current(&self) {
        let current = self.state.lock().current.clone();
        self.listeners.notify(current.as_ref());
    }

    /// Returns the addresses password resets were sent to, oldest first.
    #[must_use]
    pub fn sent_password_resets(&self) -> Vec<String> {
        self.state.lock().password_resets.clone()
    }

    /// Returns how often `op` was called.
    #[must_use]
    pub fn call_count(&self, op: ProviderOperation) -> usize {
        self.state.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Returns the number of registered identity listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn set_current(&self, identity: Option<Identity>) {
        self.state.lock().current.clone_from(&identity);
        self.listeners.notify(identity.as_ref());
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn provider_type(&self) -> &'static str {
        "memory"
    }

    async fn create_account(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        let identity = {
            let mut state = self.state.lock();
            state.enter(ProviderOperation::CreateAccount)?;

            if !email.contains('@') {
                return Err(ProviderError::new(codes::INVALID_EMAIL, "The email address is badly formatted."));
            }
            if password.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(ProviderError::new(
                    codes::WEAK_PASSWORD,
                    "Password should be at least 6 characters.",
                ));
            }
            let key = account_key(email);
            if state.accounts.contains_key(&key) {
                return Err(ProviderError::new(
                    codes::EMAIL_ALREADY_IN_USE,
                    "The email address is already in use by another account.",
                ));
            }

            let identity = Identity::new(new_uid(), email);
            state.accounts.insert(
                key,
                Account {
                    identity: identity.clone(),
                    password: password.to_string(),
                },
            );
            identity
        };

        tracing::debug!(uid = %identity.uid, "memory account created");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        let identity = {
            let mut state = self.state.lock();
            state.enter(ProviderOperation::SignIn)?;

            match state.accounts.get(&account_key(email)) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => {
                    return Err(ProviderError::new(
                        codes::INVALID_CREDENTIAL,
                        "Invalid email or password.",
                    ))
                }
            }
        };

        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        self.state.lock().enter(ProviderOperation::SignOut)?;
        self.set_current(None);
        Ok(())
    }

    async fn begin_federated_sign_in(&self, provider: FederatedProvider) -> ProviderResult<RedirectTarget> {
        let mut state = self.state.lock();
        state.enter(ProviderOperation::BeginFederatedSignIn)?;

        let Some(identity) = state.federated.get(&provider).cloned() else {
            return Err(ProviderError::new(
                codes::OPERATION_NOT_ALLOWED,
                format!("Sign-in with {provider} is not enabled."),
            ));
        };
        state.pending_redirect = Some(identity);

        let session_id = Uuid::now_v7().simple().to_string();
        Ok(RedirectTarget {
            url: format!("{REDIRECT_URL_BASE}/{}?session={session_id}", provider.provider_id()),
            session_id: Some(session_id),
        })
    }

    async fn redirect_result(&self) -> ProviderResult<Option<Identity>> {
        let pending = {
            let mut state = self.state.lock();
            state.enter(ProviderOperation::RedirectResult)?;
            state.pending_redirect.take()
        };

        if let Some(identity) = &pending {
            self.set_current(Some(identity.clone()));
        }
        Ok(pending)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ProviderResult<Identity> {
        let identity = {
            let mut state = self.state.lock();
            state.enter(ProviderOperation::UpdateProfile)?;

            let Some(current) = state.current.take() else {
                return Err(ProviderError::new(codes::NO_CURRENT_USER, "No user is signed in."));
            };
            let identity = current.with_profile(update);
            if let Some(account) = state.accounts.get_mut(&account_key(&identity.email)) {
                account.identity = identity.clone();
            }
            state.current = Some(identity.clone());
            identity
        };

        // Profile edits do not count as an identity change for subscribers.
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> ProviderResult<()> {
        let mut state = self.state.lock();
        state.enter(ProviderOperation::SendPasswordReset)?;
        state.password_resets.push(email.to_string());
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.state.lock().current.clone()
    }

    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let subscription = self.listeners.add(std::sync::Arc::clone(&listener));
        if self.notify_on_subscribe {
            let current = self.current_identity();
            listener(current.as_ref());
        }
        subscription
    }
}

fn account_key(email: &str) -> String {
    email.to_lowercase()
}

fn new_uid() -> String {
    Uuid::now_v7().simple().to_string()
}
