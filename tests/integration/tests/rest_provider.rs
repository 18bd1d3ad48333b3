//! REST adapter flows against the fake identity service.

use std::sync::Arc;

use gamehub_integration_tests::GOOGLE_EMAIL;
use gh_core::AuthConfig;
use gh_identity_rest::{RestIdentityProvider, StoredSession};
use gh_session::{codes, IdentityProvider};

use crate::common::{start_holder, TestEnv};

#[tokio::test]
async fn test_register_sets_profile() {
    let env = TestEnv::new().await.unwrap();

    let identity = env
        .session
        .register("Ada", "ada@example.com", "Secret1", Some("https://img.example/ada.png"))
        .await
        .unwrap();

    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.display_name.as_deref(), Some("Ada"));
    assert_eq!(identity.photo_url.as_deref(), Some("https://img.example/ada.png"));
    assert_eq!(env.service.calls(), vec!["accounts:signUp", "accounts:lookup", "accounts:update"]);

    let stored = env.provider.session();
    assert_eq!(stored.identity, Some(identity));
    assert!(stored.id_token.is_some());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let env = TestEnv::new().await.unwrap();
    env.session.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();
    env.session.logout().await.unwrap();

    let err = env
        .session
        .register("Ada", "ada@example.com", "Secret1", None)
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(codes::EMAIL_ALREADY_IN_USE));
    assert_eq!(
        env.session.error().as_deref(),
        Some("The email address is already in use by another account.")
    );
    assert_eq!(env.service.account_count(), 1);
}

#[tokio::test]
async fn test_login_fetches_photo() {
    let env = TestEnv::new().await.unwrap();
    env.session
        .register("Ada", "ada@example.com", "Secret1", Some("https://img.example/ada.png"))
        .await
        .unwrap();
    env.session.logout().await.unwrap();
    assert_eq!(env.provider.session(), StoredSession::default());

    let identity = env.session.login("ada@example.com", "Secret1").await.unwrap();
    assert_eq!(identity.photo_url.as_deref(), Some("https://img.example/ada.png"));
    assert_eq!(identity.display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let env = TestEnv::new().await.unwrap();
    env.session.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();
    env.session.logout().await.unwrap();

    let err = env.session.login("ada@example.com", "Secret2").await.unwrap_err();
    assert_eq!(err.code(), Some(codes::INVALID_CREDENTIAL));
    assert_eq!(err.to_string(), "Invalid email or password.");
    assert!(env.session.identity().is_none());
}

#[tokio::test]
async fn test_update_profile_removes_photo() {
    let env = TestEnv::new().await.unwrap();
    env.session
        .register("Ada", "ada@example.com", "Secret1", Some("https://img.example/ada.png"))
        .await
        .unwrap();

    let identity = env
        .session
        .update_user_profile("Countess Ada", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("Countess Ada"));
    assert_eq!(identity.photo_url, None);

    // The service agrees after a fresh sign-in.
    env.session.logout().await.unwrap();
    let identity = env.session.login("ada@example.com", "Secret1").await.unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("Countess Ada"));
    assert_eq!(identity.photo_url, None);
}

#[tokio::test]
async fn test_password_reset_for_known_and_unknown_email() {
    let env = TestEnv::new().await.unwrap();
    env.session.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();

    env.session.reset_password("ada@example.com").await.unwrap();
    assert_eq!(env.service.oob_requests(), vec!["ada@example.com".to_string()]);

    let err = env.session.reset_password("nobody@example.com").await.unwrap_err();
    assert_eq!(err.code(), Some(codes::INVALID_CREDENTIAL));
}

#[tokio::test]
async fn test_google_sign_in_round_trip() {
    let mut env = TestEnv::new().await.unwrap();

    let target = env.session.google_login().await.unwrap();
    assert!(target.url.starts_with("https://accounts.google.example/"));
    assert!(env.provider.session().pending_redirect.is_some());
    assert!(env.session.identity().is_none());

    env.provider.complete_redirect(&env.service.callback_url()).unwrap();
    env.restart().await;

    let identity = env.session.identity().unwrap();
    assert_eq!(identity.email, GOOGLE_EMAIL);
    assert_eq!(identity.display_name.as_deref(), Some("Player One"));
    assert!(env.session.error().is_none());
    assert!(env.provider.session().pending_redirect.is_none());
}

#[tokio::test]
async fn test_tampered_redirect_is_reported_on_start() {
    let mut env = TestEnv::new().await.unwrap();
    env.session.google_login().await.unwrap();

    env.provider
        .complete_redirect("https://attacker.example/?code=stolen")
        .unwrap();
    env.restart().await;

    assert!(env.session.identity().is_none());
    assert!(env.session.error().is_some());
    assert!(!env.session.is_loading());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let env = TestEnv::new().await.unwrap();
    let identity = env.session.register("Ada", "ada@example.com", "Secret1", None).await.unwrap();

    let saved = serde_json::to_string(&env.provider.session()).unwrap();
    let restored: StoredSession = serde_json::from_str(&saved).unwrap();

    let provider = Arc::new(RestIdentityProvider::new(env.service.config()).unwrap().with_session(restored));
    let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;
    assert_eq!(session.identity(), Some(identity));

    // The restored token still works for profile edits.
    let updated = session.update_user_profile("Countess Ada", None).await.unwrap().unwrap();
    assert_eq!(updated.greeting_name(), "Countess Ada");
}

#[tokio::test]
async fn test_wrong_api_key_is_an_internal_error() {
    let env = TestEnv::new().await.unwrap();
    let config = AuthConfig {
        api_key: "not-the-key".to_string(),
        ..env.service.config()
    };
    let provider = Arc::new(RestIdentityProvider::new(config).unwrap());
    let session = start_holder(Arc::clone(&provider) as Arc<dyn IdentityProvider>).await;

    let err = session.login("ada@example.com", "Secret1").await.unwrap_err();
    assert_eq!(err.code(), Some(codes::INTERNAL_ERROR));
}
