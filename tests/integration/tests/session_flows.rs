//! Session holder flows against the in-memory provider.

use std::sync::Arc;

use gh_model::Identity;
use gh_session::error::NOT_CONFIGURED_MESSAGE;
use gh_session::{
    codes, FederatedProvider, IdentityProvider, InMemoryIdentityProvider, ProviderError, ProviderOperation,
    SessionError, SessionHolder,
};

use crate::common::{init_tracing, memory_session, start_holder, WAIT};

#[tokio::test]
async fn test_loading_flips_once() {
    init_tracing();
    let provider = Arc::new(InMemoryIdentityProvider::new().with_initial_notification(false));
    provider.add_account("ada@example.com", "Secret1", Some("Ada"));

    let session = SessionHolder::start(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;
    assert!(session.is_loading());

    provider.emit_current();
    let state = tokio::time::timeout(WAIT, session.wait_until_loaded()).await.unwrap();
    assert!(!state.loading);
    assert!(state.identity.is_none());

    session.login("ada@example.com", "Secret1").await.unwrap();
    session.logout().await.unwrap();
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_unconfigured_session() {
    init_tracing();
    let session = SessionHolder::start_optional(None).await;

    assert!(!session.is_loading());
    assert!(!session.is_configured());

    let err = session.login("ada@example.com", "Secret1").await.unwrap_err();
    assert_eq!(err, SessionError::NotConfigured);
    assert_eq!(session.error().as_deref(), Some(NOT_CONFIGURED_MESSAGE));

    let err = session.google_login().await.unwrap_err();
    assert!(err.is_not_configured());

    // Nothing to sign out of.
    session.logout().await.unwrap();
    assert!(session.identity().is_none());
}

#[tokio::test]
async fn test_register_logout_login() {
    let (provider, session) = memory_session().await;

    let identity = session
        .register("Ada", "ada@example.com", "Secret1", Some("https://img.example/ada.png"))
        .await
        .unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("Ada"));
    assert_eq!(identity.photo_url.as_deref(), Some("https://img.example/ada.png"));
    assert_eq!(session.identity(), Some(identity.clone()));

    session.logout().await.unwrap();
    assert!(session.identity().is_none());

    let err = session.login("ada@example.com", "wrong-pass").await.unwrap_err();
    assert_eq!(err.code(), Some(codes::INVALID_CREDENTIAL));
    assert_eq!(session.error().as_deref(), Some("Invalid email or password."));
    assert!(session.identity().is_none());

    let signed_in = session.login("ADA@example.com", "Secret1").await.unwrap();
    assert_eq!(signed_in.uid, identity.uid);
    assert_eq!(signed_in.display_name.as_deref(), Some("Ada"));
    assert!(session.error().is_none());
    assert_eq!(provider.call_count(ProviderOperation::SignIn), 2);
}

#[tokio::test]
async fn test_duplicate_registration_keeps_first_account() {
    let (_provider, session) = memory_session().await;

    session.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();
    session.logout().await.unwrap();

    let err = session
        .register("Impostor", "ada@example.com", "Secret2", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(codes::EMAIL_ALREADY_IN_USE));
    assert!(session.identity().is_none());

    let identity = session.login("ada@example.com", "Secret1").await.unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_failed_update_keeps_identity() {
    let (provider, session) = memory_session().await;
    let before = session.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();

    provider.fail_next(
        ProviderOperation::UpdateProfile,
        ProviderError::network("The network is unreachable."),
    );
    let err = session.update_user_profile("Countess", None).await.unwrap_err();

    assert_eq!(err.code(), Some(codes::NETWORK_REQUEST_FAILED));
    assert_eq!(session.identity(), Some(before));
    assert_eq!(session.error().as_deref(), Some("The network is unreachable."));

    let after = session
        .update_user_profile("Countess", Some("https://img.example/c.png"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.greeting_name(), "Countess");
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_update_without_principal_is_skipped() {
    let (provider, session) = memory_session().await;

    let updated = session.update_user_profile("Nobody", None).await.unwrap();
    assert!(updated.is_none());
    assert_eq!(provider.call_count(ProviderOperation::UpdateProfile), 0);
}

#[tokio::test]
async fn test_google_redirect_completes_on_next_start() {
    init_tracing();
    let google = Identity::new("google-1", "player@gmail.com").with_display_name("Player One");
    let provider = Arc::new(
        InMemoryIdentityProvider::new().with_federated_account(FederatedProvider::Google, google.clone()),
    );

    let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;
    let target = session.google_login().await.unwrap();
    assert!(target.url.contains("google.com"));
    assert!(session.identity().is_none());
    drop(session);

    let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;
    assert_eq!(session.identity(), Some(google));

    // The redirect result is consumed once.
    drop(session);
    provider.sign_out().await.unwrap();
    let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;
    assert!(session.identity().is_none());
}

#[tokio::test]
async fn test_failed_redirect_check_is_reported() {
    init_tracing();
    let provider = Arc::new(InMemoryIdentityProvider::new());
    provider.fail_next(
        ProviderOperation::RedirectResult,
        ProviderError::new(codes::OPERATION_NOT_ALLOWED, "Sign-in with google.com is not enabled."),
    );

    let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;
    assert!(!session.is_loading());
    assert_eq!(
        session.error().as_deref(),
        Some("Sign-in with google.com is not enabled.")
    );
}

#[tokio::test]
async fn test_provider_side_sign_out_reaches_readers() {
    let (provider, session) = memory_session().await;
    session.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();

    let mut rx = session.watch();
    provider.sign_out().await.unwrap();

    let state = tokio::time::timeout(WAIT, rx.wait_for(|s| s.identity.is_none()))
        .await
        .unwrap()
        .unwrap()
        .clone();
    assert!(!state.is_signed_in());
    assert!(session.identity().is_none());
}

#[tokio::test]
async fn test_concurrent_operations_run_in_turn() {
    let (provider, session) = memory_session().await;
    provider.add_account("ada@example.com", "Secret1", Some("Ada"));
    provider.add_account("bob@example.com", "Secret2", Some("Bob"));

    let (first, second) = tokio::join!(
        session.login("ada@example.com", "Secret1"),
        session.login("bob@example.com", "Secret2"),
    );
    first.unwrap();
    second.unwrap();

    let state = session.state();
    assert!(!state.is_busy());
    assert_eq!(provider.call_count(ProviderOperation::SignIn), 2);
    assert_eq!(state.identity, provider.current_identity());
}

#[tokio::test]
async fn test_password_reset_is_sent() {
    let (provider, session) = memory_session().await;

    session.reset_password("ada@example.com").await.unwrap();
    assert_eq!(provider.sent_password_resets(), vec!["ada@example.com".to_string()]);
}

#[tokio::test]
async fn test_dropping_holder_unsubscribes() {
    let (provider, session) = memory_session().await;
    assert_eq!(provider.listener_count(), 1);

    drop(session);
    assert_eq!(provider.listener_count(), 0);
}
