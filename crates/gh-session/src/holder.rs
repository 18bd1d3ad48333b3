//! Session state holder.
//!
//! The holder owns the application's [`SessionState`], runs account
//! operations against the identity provider, and republishes provider-side
//! identity changes to readers.
//!
//! ## Operations
//!
//! Every operation follows `Idle → InFlight → Success | Failure`:
//!
//! - on start the last error is cleared and `in_flight` is set
//! - on success the held identity is replaced with the provider's snapshot
//! - on failure the provider's message is stored and returned; the identity
//!   is left untouched
//!
//! Operations issued through one holder run one at a time. Provider
//! notifications are applied as they arrive.
//!
//! ## Cancellation
//!
//! Dropping an operation future abandons it. Its provider result is never
//! applied and `in_flight` is reset.

use std::fmt;
use std::sync::Arc;

use gh_core::event::{Event, EventSink, EventType, TracingEventSink};
use gh_model::{Identity, ProfileUpdate};
use parking_lot::Mutex;
use tokio::sync::{watch, Mutex as AsyncMutex};

use crate::error::{SessionError, SessionResult};
use crate::provider::{FederatedProvider, IdentityProvider, ProviderError, RedirectTarget, Subscription};
use crate::state::{Operation, SessionState};

/// Builder for [`SessionHolder`].
pub struct SessionHolderBuilder {
    provider: Option<Arc<dyn IdentityProvider>>,
    events: Arc<dyn EventSink>,
}

impl SessionHolderBuilder {
    /// Creates a builder without provider, logging events to tracing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            events: Arc::new(TracingEventSink::new()),
        }
    }

    /// Sets the identity provider.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the identity provider, or leaves authentication unconfigured.
    #[must_use]
    pub fn maybe_provider(mut self, provider: Option<Arc<dyn IdentityProvider>>) -> Self {
        self.provider = provider;
        self
    }

    /// Sets the destination of account events.
    #[must_use]
    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Starts the holder.
    ///
    /// Subscribes to identity changes, then checks for a pending federated
    /// redirect result. A failing redirect check is logged and stored in the
    /// error field; it does not fail startup.
    pub async fn start(self) -> SessionHolder {
        let (state, _) = watch::channel(SessionState::initial(self.provider.is_some()));
        let holder = SessionHolder {
            provider: self.provider,
            state: Arc::new(state),
            serial: AsyncMutex::new(()),
            events: self.events,
            subscription: Mutex::new(None),
        };

        let Some(provider) = holder.provider.clone() else {
            tracing::info!("session started without identity provider; authentication disabled");
            return holder;
        };

        // The listener only holds a weak handle: notifications arriving after
        // the holder is gone are ignored.
        let weak_state = Arc::downgrade(&holder.state);
        let events = Arc::clone(&holder.events);
        let subscription = provider.subscribe(Arc::new(move |identity: Option<&Identity>| {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            state.send_modify(|s| {
                s.identity = identity.cloned();
                s.loading = false;
            });
            events.record(
                &Event::builder(EventType::IdentityChanged)
                    .success()
                    .maybe_user(identity.map(|i| i.uid.as_str()))
                    .detail("signed_in", identity.is_some().to_string())
                    .build(),
            );
        }));
        *holder.subscription.lock() = Some(subscription);

        holder.check_redirect_result(provider.as_ref()).await;

        tracing::info!(provider = provider.provider_type(), "session started");
        holder
    }
}

impl Default for SessionHolderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Single source of truth for the signed-in identity.
pub struct SessionHolder {
    provider: Option<Arc<dyn IdentityProvider>>,
    state: Arc<watch::Sender<SessionState>>,
    serial: AsyncMutex<()>,
    events: Arc<dyn EventSink>,
    subscription: Mutex<Option<Subscription>>,
}

impl SessionHolder {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> SessionHolderBuilder {
        SessionHolderBuilder::new()
    }

    /// Starts a holder backed by `provider`.
    pub async fn start(provider: Arc<dyn IdentityProvider>) -> Self {
        Self::builder().provider(provider).start().await
    }

    /// Starts a holder backed by `provider`, or without authentication.
    pub async fn start_optional(provider: Option<Arc<dyn IdentityProvider>>) -> Self {
        Self::builder().maybe_provider(provider).start().await
    }

    /// Creates a holder without identity provider.
    ///
    /// Every operation except [`logout`](Self::logout) fails with
    /// [`SessionError::NotConfigured`].
    #[must_use]
    pub fn unconfigured() -> Self {
        let (state, _) = watch::channel(SessionState::initial(false));
        Self {
            provider: None,
            state: Arc::new(state),
            serial: AsyncMutex::new(()),
            events: Arc::new(TracingEventSink::new()),
            subscription: Mutex::new(None),
        }
    }

    // === Readers ===

    /// Returns a snapshot of the session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Returns the signed-in principal, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    /// Returns whether the initial identity is still unknown.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Returns the message of the last failed operation.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Returns whether an identity provider is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Waits until the provider has reported the initial identity.
    ///
    /// Returns immediately when no provider is configured.
    pub async fn wait_until_loaded(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let loaded = rx.wait_for(|s| !s.loading).await.map(|s| (*s).clone()).ok();
        loaded.unwrap_or_else(|| self.state())
    }

    /// Stops listening to provider notifications.
    pub fn shutdown(&self) {
        let subscription = self.subscription.lock().take();
        if subscription.is_some() {
            tracing::debug!("unsubscribed from identity changes");
        }
        drop(subscription);
    }

    // === Operations ===

    /// Creates an account and sets its display name and photo.
    ///
    /// ## Errors
    ///
    /// - [`SessionError::NotConfigured`] without provider; nothing is sent
    /// - [`SessionError::ProviderRejected`] if account creation or the
    ///   profile update fails
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        photo_url: Option<&str>,
    ) -> SessionResult<Identity> {
        let provider = self.provider_for(Operation::Register)?;
        let _serial = self.serial.lock().await;
        let _in_flight = self.begin(Operation::Register);

        let created = provider
            .create_account(email, password)
            .await
            .map_err(|e| self.fail(Operation::Register, e))?;
        tracing::debug!(uid = %created.uid, "account created; applying profile");

        let identity = provider
            .update_profile(&ProfileUpdate::new(name, photo_url))
            .await
            .map_err(|e| self.fail(Operation::Register, e))?;

        self.hold(Some(identity.clone()));
        self.record(Event::builder(EventType::Register).success().user(&identity.uid).build());
        Ok(identity)
    }

    /// Signs in with email and password.
    ///
    /// ## Errors
    ///
    /// - [`SessionError::NotConfigured`] without provider
    /// - [`SessionError::ProviderRejected`] on bad credentials or provider failure
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<Identity> {
        let provider = self.provider_for(Operation::Login)?;
        let _serial = self.serial.lock().await;
        let _in_flight = self.begin(Operation::Login);

        let identity = provider
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| self.fail(Operation::Login, e))?;

        self.hold(Some(identity.clone()));
        self.record(
            Event::builder(EventType::Login)
                .success()
                .user(&identity.uid)
                .detail("method", "password")
                .build(),
        );
        Ok(identity)
    }

    /// Signs out.
    ///
    /// Without provider there is nothing to sign out of, so this succeeds
    /// without doing anything.
    ///
    /// ## Errors
    ///
    /// [`SessionError::ProviderRejected`] if the provider fails to end the session.
    pub async fn logout(&self) -> SessionResult<()> {
        let Some(provider) = self.provider.clone() else {
            return Ok(());
        };
        let _serial = self.serial.lock().await;
        let _in_flight = self.begin(Operation::Logout);
        let uid = self.identity().map(|i| i.uid);

        provider
            .sign_out()
            .await
            .map_err(|e| self.fail(Operation::Logout, e))?;

        self.hold(None);
        self.record(Event::builder(EventType::Logout).success().maybe_user(uid.as_deref()).build());
        Ok(())
    }

    /// Starts a Google sign-in redirect.
    ///
    /// The identity is picked up by the redirect-result check the next time
    /// a holder starts.
    ///
    /// ## Errors
    ///
    /// - [`SessionError::NotConfigured`] without provider
    /// - [`SessionError::ProviderRejected`] if the redirect cannot be started
    pub async fn google_login(&self) -> SessionResult<RedirectTarget> {
        let provider = self.provider_for(Operation::GoogleLogin)?;
        let _serial = self.serial.lock().await;
        let _in_flight = self.begin(Operation::GoogleLogin);

        let target = provider
            .begin_federated_sign_in(FederatedProvider::Google)
            .await
            .map_err(|e| self.fail(Operation::GoogleLogin, e))?;

        self.record(
            Event::builder(EventType::FederatedLoginStart)
                .success()
                .detail("provider", FederatedProvider::Google.provider_id())
                .build(),
        );
        Ok(target)
    }

    /// Updates display name and photo of the signed-in principal.
    ///
    /// Returns `Ok(None)` without contacting the provider for an update when
    /// nobody is signed in.
    ///
    /// ## Errors
    ///
    /// - [`SessionError::NotConfigured`] without provider
    /// - [`SessionError::ProviderRejected`] if the provider refuses the update
    pub async fn update_user_profile(
        &self,
        name: &str,
        photo_url: Option<&str>,
    ) -> SessionResult<Option<Identity>> {
        let provider = self.provider_for(Operation::UpdateProfile)?;
        let _serial = self.serial.lock().await;
        let _in_flight = self.begin(Operation::UpdateProfile);

        if provider.current_identity().is_none() {
            tracing::debug!("no signed-in principal; profile update skipped");
            return Ok(None);
        }

        let identity = provider
            .update_profile(&ProfileUpdate::new(name, photo_url))
            .await
            .map_err(|e| self.fail(Operation::UpdateProfile, e))?;

        self.hold(Some(identity.clone()));
        self.record(Event::builder(EventType::UpdateProfile).success().user(&identity.uid).build());
        Ok(Some(identity))
    }

    /// Asks the provider to send a password reset message.
    ///
    /// ## Errors
    ///
    /// - [`SessionError::NotConfigured`] without provider
    /// - [`SessionError::ProviderRejected`] if the provider refuses the request
    pub async fn reset_password(&self, email: &str) -> SessionResult<()> {
        let provider = self.provider_for(Operation::ResetPassword)?;
        let _serial = self.serial.lock().await;
        let _in_flight = self.begin(Operation::ResetPassword);

        provider
            .send_password_reset(email)
            .await
            .map_err(|e| self.fail(Operation::ResetPassword, e))?;

        self.record(Event::builder(EventType::ResetPassword).success().build());
        Ok(())
    }

    // === Internals ===

    async fn check_redirect_result(&self, provider: &dyn IdentityProvider) {
        match provider.redirect_result().await {
            Ok(Some(identity)) => {
                self.record(
                    Event::builder(EventType::FederatedLogin)
                        .success()
                        .user(&identity.uid)
                        .build(),
                );
                self.hold(Some(identity));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(code = %err.code, error = %err.message, "redirect result check failed");
                self.record(
                    Event::builder(EventType::FederatedLoginError)
                        .failure(&err.message)
                        .error_code(&err.code)
                        .build(),
                );
                self.state.send_modify(|s| s.error = Some(err.message));
            }
        }
    }

    fn provider_for(&self, op: Operation) -> SessionResult<Arc<dyn IdentityProvider>> {
        if let Some(provider) = &self.provider {
            return Ok(Arc::clone(provider));
        }

        let err = SessionError::NotConfigured;
        let message = err.to_string();
        self.record(Event::builder(failure_event(op)).failure(&message).build());
        self.state.send_modify(|s| s.error = Some(message));
        Err(err)
    }

    fn begin(&self, op: Operation) -> InFlight<'_> {
        self.state.send_modify(|s| {
            s.error = None;
            s.in_flight = Some(op);
        });
        InFlight { state: &self.state }
    }

    fn fail(&self, op: Operation, err: ProviderError) -> SessionError {
        self.record(
            Event::builder(failure_event(op))
                .failure(&err.message)
                .error_code(&err.code)
                .maybe_user(self.identity().as_ref().map(|i| i.uid.as_str()))
                .build(),
        );
        let message = err.message.clone();
        self.state.send_modify(|s| s.error = Some(message));
        err.into()
    }

    fn hold(&self, identity: Option<Identity>) {
        self.state.send_modify(|s| s.identity = identity);
    }

    fn record(&self, event: Event) {
        self.events.record(&event);
    }
}

impl Drop for SessionHolder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHolder")
            .field("provider", &self.provider.as_ref().map(|p| p.provider_type()))
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Clears `in_flight` when an operation ends, including by cancellation.
struct InFlight<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| s.in_flight.take().is_some());
    }
}

const fn failure_event(op: Operation) -> EventType {
    match op {
        Operation::Register => EventType::RegisterError,
        Operation::Login => EventType::LoginError,
        Operation::Logout => EventType::LogoutError,
        Operation::GoogleLogin => EventType::FederatedLoginError,
        Operation::UpdateProfile => EventType::UpdateProfileError,
        Operation::ResetPassword => EventType::ResetPasswordError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryIdentityProvider;
    use crate::provider::{codes, ProviderOperation};

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingSink {
        fn types(&self) -> Vec<EventType> {
            self.events.lock().iter().map(|e| e.event_type).collect()
        }
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: &Event) {
            self.events.lock().push(event.clone());
        }
    }

    async fn started() -> (Arc<InMemoryIdentityProvider>, SessionHolder) {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let holder = SessionHolder::start(provider.clone()).await;
        (provider, holder)
    }

    #[tokio::test]
    async fn start_clears_loading_on_initial_notification() {
        let (_provider, holder) = started().await;

        let state = holder.state();
        assert!(!state.loading);
        assert!(state.identity.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn register_holds_named_identity() {
        let (_provider, holder) = started().await;

        let identity = holder
            .register("Ada", "ada@example.com", "Secret1", Some("https://x.com/a.png"))
            .await
            .unwrap();

        assert_eq!(identity.display_name.as_deref(), Some("Ada"));
        assert_eq!(identity.photo_url.as_deref(), Some("https://x.com/a.png"));
        assert_eq!(holder.identity(), Some(identity));
        assert!(holder.error().is_none());
        assert!(!holder.state().is_busy());
    }

    #[tokio::test]
    async fn register_without_photo_stores_none() {
        let (_provider, holder) = started().await;

        let identity = holder
            .register("Ada", "ada@example.com", "Secret1", Some(""))
            .await
            .unwrap();
        assert_eq!(identity.photo_url, None);
    }

    #[tokio::test]
    async fn failed_login_sets_error_and_keeps_identity() {
        let (provider, holder) = started().await;
        provider.add_account("ada@example.com", "Secret1", Some("Ada"));

        let err = holder.login("ada@example.com", "wrong").await.unwrap_err();

        assert_eq!(err.code(), Some(codes::INVALID_CREDENTIAL));
        assert_eq!(holder.error().as_deref(), Some(err.to_string().as_str()));
        assert!(holder.identity().is_none());
    }

    #[tokio::test]
    async fn next_operation_clears_previous_error() {
        let (provider, holder) = started().await;
        provider.add_account("ada@example.com", "Secret1", Some("Ada"));

        let _ = holder.login("ada@example.com", "wrong").await;
        assert!(holder.error().is_some());

        holder.login("ada@example.com", "Secret1").await.unwrap();
        assert!(holder.error().is_none());
    }

    #[tokio::test]
    async fn logout_clears_identity() {
        let (provider, holder) = started().await;
        provider.add_account("ada@example.com", "Secret1", None);
        holder.login("ada@example.com", "Secret1").await.unwrap();

        holder.logout().await.unwrap();

        assert!(holder.identity().is_none());
        assert!(provider.current_identity().is_none());
    }

    #[tokio::test]
    async fn failed_logout_keeps_identity() {
        let (provider, holder) = started().await;
        provider.add_account("ada@example.com", "Secret1", None);
        let identity = holder.login("ada@example.com", "Secret1").await.unwrap();

        provider.fail_next(ProviderOperation::SignOut, ProviderError::network("offline"));
        let err = holder.logout().await.unwrap_err();

        assert_eq!(err.to_string(), "offline");
        assert_eq!(holder.identity(), Some(identity));
    }

    #[tokio::test]
    async fn update_profile_without_principal_is_noop() {
        let (provider, holder) = started().await;

        let updated = holder.update_user_profile("Ada", None).await.unwrap();

        assert!(updated.is_none());
        assert_eq!(provider.call_count(ProviderOperation::UpdateProfile), 0);
    }

    #[tokio::test]
    async fn update_profile_refreshes_snapshot() {
        let (provider, holder) = started().await;
        provider.add_account("ada@example.com", "Secret1", Some("Ada"));
        holder.login("ada@example.com", "Secret1").await.unwrap();

        let updated = holder
            .update_user_profile("Ada Lovelace", Some("https://x.com/ada.png"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(holder.identity(), Some(updated));
    }

    #[tokio::test]
    async fn reset_password_leaves_identity_alone() {
        let (provider, holder) = started().await;

        holder.reset_password("ada@example.com").await.unwrap();

        assert_eq!(provider.sent_password_resets(), vec!["ada@example.com".to_string()]);
        assert!(holder.identity().is_none());
    }

    #[tokio::test]
    async fn unconfigured_operations_fail_except_logout() {
        let holder = SessionHolder::unconfigured();
        assert!(!holder.is_loading());

        assert_eq!(
            holder.register("Ada", "ada@example.com", "Secret1", None).await,
            Err(SessionError::NotConfigured)
        );
        assert_eq!(holder.login("ada@example.com", "Secret1").await, Err(SessionError::NotConfigured));
        assert_eq!(holder.google_login().await, Err(SessionError::NotConfigured));
        assert_eq!(holder.update_user_profile("Ada", None).await, Err(SessionError::NotConfigured));
        assert_eq!(holder.reset_password("ada@example.com").await, Err(SessionError::NotConfigured));
        assert_eq!(holder.error().as_deref(), Some(crate::error::NOT_CONFIGURED_MESSAGE));
        assert!(holder.identity().is_none());

        assert_eq!(holder.logout().await, Ok(()));
    }

    #[tokio::test]
    async fn redirect_failure_is_recorded_not_raised() {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        provider.fail_next(
            ProviderOperation::RedirectResult,
            ProviderError::new(codes::INTERNAL_ERROR, "redirect went wrong"),
        );

        let holder = SessionHolder::start(provider).await;

        assert_eq!(holder.error().as_deref(), Some("redirect went wrong"));
        assert!(holder.identity().is_none());
    }

    #[tokio::test]
    async fn provider_notifications_are_recorded() {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let sink = Arc::new(RecordingSink::default());
        let holder = SessionHolder::builder()
            .provider(provider.clone())
            .event_sink(sink.clone())
            .start()
            .await;
        assert_eq!(sink.types(), vec![EventType::IdentityChanged]);

        let identity = holder.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();
        holder.logout().await.unwrap();

        assert_eq!(
            sink.types(),
            vec![
                EventType::IdentityChanged,
                EventType::IdentityChanged,
                EventType::Register,
                EventType::IdentityChanged,
                EventType::Logout,
            ]
        );
        let events = sink.events.lock();
        assert_eq!(events[1].user_id.as_deref(), Some(identity.uid.as_str()));
        assert_eq!(events[3].user_id, None);
    }

    #[tokio::test]
    async fn dropped_operation_resets_in_flight() {
        let (_provider, holder) = started().await;

        {
            let _in_flight = holder.begin(Operation::Login);
            assert_eq!(holder.state().in_flight, Some(Operation::Login));
        }

        assert_eq!(holder.state().in_flight, None);
    }

    #[tokio::test]
    async fn notifications_after_drop_are_ignored() {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let holder = SessionHolder::start(provider.clone()).await;
        assert_eq!(provider.listener_count(), 1);

        drop(holder);

        assert_eq!(provider.listener_count(), 0);
        provider.add_account("ada@example.com", "Secret1", None);
        provider.sign_in_with_password("ada@example.com", "Secret1").await.unwrap();
    }
}
