//! From command arguments through validation and the session to routing.

use std::sync::Arc;

use gh_catalog::Catalog;
use gh_cli::cli::{LoginArgs, RegisterArgs, UpdateProfileArgs};
use gh_cli::commands::{run_login, run_logout, run_open, run_register, run_update_profile};
use gh_cli::config::OutputFormat;
use gh_cli::routes::{Resolution, Route, View};
use gh_cli::{App, CliConfig, CliError, IdentityBackend};
use gh_session::{InMemoryIdentityProvider, ProviderOperation};

use crate::common::init_tracing;

async fn offline_app(config: CliConfig) -> (Arc<InMemoryIdentityProvider>, App) {
    init_tracing();
    let provider = Arc::new(InMemoryIdentityProvider::new());
    let app = App::new(
        config,
        OutputFormat::Json,
        Catalog::bundled().unwrap(),
        IdentityBackend::Memory(Arc::clone(&provider)),
    )
    .await;
    (provider, app)
}

fn register_args(password: &str) -> RegisterArgs {
    RegisterArgs {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        photo_url: None,
        password: Some(password.to_string()),
    }
}

fn login_args(password: &str) -> LoginArgs {
    LoginArgs {
        email: "ada@example.com".to_string(),
        password: Some(password.to_string()),
    }
}

#[tokio::test]
async fn test_rejected_form_never_reaches_provider() {
    let (provider, app) = offline_app(CliConfig::default()).await;

    let err = run_register(register_args("lowercase1"), &app).await.unwrap_err();
    assert!(err.is_validation());
    let CliError::Validation(validation) = err else {
        unreachable!();
    };
    assert!(validation.has_field("password"));

    let err = run_login(
        LoginArgs {
            email: "not-an-email".to_string(),
            password: Some("Secret1".to_string()),
        },
        &app,
    )
    .await
    .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(provider.call_count(ProviderOperation::CreateAccount), 0);
    assert_eq!(provider.call_count(ProviderOperation::SignIn), 0);
    assert!(app.session.error().is_none());
}

#[tokio::test]
async fn test_profile_route_follows_sign_in() {
    let (_provider, app) = offline_app(CliConfig::default()).await;

    assert_eq!(app.resolve("/profile"), Resolution::Redirect(Route::Login));

    run_register(register_args("Secret1"), &app).await.unwrap();
    let Resolution::Render(View::Profile(identity)) = app.resolve("/profile") else {
        panic!("profile should render once signed in");
    };
    assert_eq!(identity.greeting_name(), "Ada");
    run_open("/profile", &app).unwrap();

    run_logout(&app).await.unwrap();
    assert_eq!(app.resolve("/update-profile"), Resolution::Redirect(Route::Login));

    run_login(login_args("Secret1"), &app).await.unwrap();
    assert!(matches!(
        app.resolve("/update-profile"),
        Resolution::Render(View::UpdateProfile(_))
    ));
}

#[tokio::test]
async fn test_update_profile_requires_sign_in() {
    let (provider, app) = offline_app(CliConfig::default()).await;

    let args = UpdateProfileArgs {
        name: "Countess".to_string(),
        photo_url: None,
    };
    let err = run_update_profile(args, &app).await.unwrap_err();
    assert!(matches!(err, CliError::SignInRequired(ref path) if path == "/login"));
    assert_eq!(provider.call_count(ProviderOperation::UpdateProfile), 0);

    run_register(register_args("Secret1"), &app).await.unwrap();
    let args = UpdateProfileArgs {
        name: "Countess".to_string(),
        photo_url: Some("https://img.example/c.png".to_string()),
    };
    run_update_profile(args, &app).await.unwrap();

    let identity = app.session.identity().unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("Countess"));
    assert_eq!(identity.photo_url.as_deref(), Some("https://img.example/c.png"));
}

#[tokio::test]
async fn test_failed_login_surfaces_provider_message() {
    let (_provider, app) = offline_app(CliConfig::default()).await;
    run_register(register_args("Secret1"), &app).await.unwrap();
    run_logout(&app).await.unwrap();

    let err = run_login(login_args("Secret2"), &app).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password.");
    assert_eq!(app.session.error().as_deref(), Some("Invalid email or password."));
}

#[tokio::test]
async fn test_protected_game_details() {
    let config = CliConfig {
        protect_game_details: true,
        ..CliConfig::default()
    };
    let (_provider, app) = offline_app(config).await;

    assert_eq!(app.resolve("/game/1"), Resolution::Redirect(Route::Login));
    assert!(matches!(app.resolve("/games"), Resolution::Render(View::Games { .. })));

    run_register(register_args("Secret1"), &app).await.unwrap();
    let Resolution::Render(View::GameDetails(game)) = app.resolve("/game/1") else {
        panic!("game details should render once signed in");
    };
    assert_eq!(game.title, "Lanternfall");

    let err = run_open("/game/does-not-exist", &app).unwrap_err();
    assert!(matches!(err, CliError::NotFound { .. }));
}

#[tokio::test]
async fn test_home_lists_best_rated_games() {
    let (_provider, app) = offline_app(CliConfig::default()).await;

    let Resolution::Render(View::Home { popular }) = app.resolve("/") else {
        panic!("home should always render");
    };
    assert_eq!(popular.len(), 6);
    let ratings: Vec<f64> = popular.iter().filter_map(|g| g.rating()).collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(ratings.first().copied(), Some(4.8));
}
