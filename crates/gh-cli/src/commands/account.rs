//! Account commands.
//!
//! Every command validates its form first; rejected input never reaches the
//! session holder.

use gh_identity_rest::RestIdentityProvider;
use gh_session::SessionError;
use gh_validation::{
    ForgotPasswordForm, Form, LoginForm, PasswordRequirements, RegisterForm, UpdateProfileForm,
    ValidationError,
};

use crate::app::{App, IdentityBackend};
use crate::cli::{LoginArgs, RegisterArgs, UpdateProfileArgs};
use crate::output::{error, field_errors, info, prompt_password, success, warning};
use crate::routes::{Resolution, Route};
use crate::{CliError, CliResult};

/// Runs `register`.
pub async fn run_register(args: RegisterArgs, app: &App) -> CliResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };
    let form = RegisterForm::new(args.name, args.email, args.photo_url.unwrap_or_default(), password);

    let registration = form.validate().map_err(|err| {
        if err.has_field("password") {
            print_password_checklist(&form.password);
        }
        rejected(err)
    })?;

    let identity = app
        .session
        .register(
            &registration.name,
            &registration.email,
            &registration.password,
            registration.photo_url.as_deref(),
        )
        .await?;

    success(&format!("Account created. Welcome, {}!", identity.greeting_name()));
    Ok(())
}

/// Runs `login`.
pub async fn run_login(args: LoginArgs, app: &App) -> CliResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };
    let credentials = LoginForm::new(args.email, password).validate().map_err(rejected)?;

    match app.session.login(&credentials.email, &credentials.password).await {
        Ok(identity) => {
            success(&format!("Welcome back, {}!", identity.greeting_name()));
            Ok(())
        }
        Err(err) => {
            if !err.is_not_configured() {
                let forgot = Route::ForgotPassword {
                    email: Some(credentials.email.clone()),
                };
                info(&format!("Forgot your password? See `gamehub open {}`", forgot.path()));
            }
            Err(err.into())
        }
    }
}

/// Runs `logout`.
pub async fn run_logout(app: &App) -> CliResult<()> {
    if app.session.identity().is_none() {
        info("Not signed in.");
        return Ok(());
    }
    app.session.logout().await?;
    success("Signed out.");
    Ok(())
}

/// Runs `google-login`.
pub async fn run_google_login(app: &App) -> CliResult<()> {
    let target = app.session.google_login().await?;

    info("Open this URL in your browser to continue signing in with Google:");
    println!("{}", target.url);
    info("Then run `gamehub google-complete <url>` with the address the browser lands on.");
    Ok(())
}

/// Runs `google-complete`.
pub async fn run_google_complete(callback_url: &str, app: &mut App) -> CliResult<()> {
    let provider = rest_provider(app)?;
    provider.complete_redirect(callback_url).map_err(SessionError::from)?;

    app.restart_session().await;

    match (app.session.identity(), app.session.error()) {
        (Some(identity), _) => {
            success(&format!("Signed in as {}", identity.greeting_name()));
            Ok(())
        }
        (None, Some(message)) => Err(CliError::Auth(message)),
        (None, None) => {
            warning("The identity service did not return a signed-in user.");
            Ok(())
        }
    }
}

/// Runs `reset-password`.
pub async fn run_reset_password(email: String, app: &App) -> CliResult<()> {
    let request = ForgotPasswordForm::new(email).validate().map_err(rejected)?;

    app.session.reset_password(&request.email).await?;

    success("Password reset email sent!");
    info("Check your inbox for instructions to reset your password.");
    Ok(())
}

/// Runs `update-profile`.
pub async fn run_update_profile(args: UpdateProfileArgs, app: &App) -> CliResult<()> {
    if app.session.is_configured() {
        if let Resolution::Redirect(route) = app.resolve(&Route::UpdateProfile.path()) {
            return Err(CliError::SignInRequired(route.path()));
        }
    }

    let changes = UpdateProfileForm::new(args.name, args.photo_url.unwrap_or_default())
        .validate()
        .map_err(rejected)?;

    match app
        .session
        .update_user_profile(&changes.name, changes.photo_url.as_deref())
        .await?
    {
        Some(identity) => {
            success("Profile updated!");
            info(&format!("Your profile name is now {}", identity.greeting_name()));
        }
        None => warning("Nobody is signed in; nothing was updated."),
    }
    Ok(())
}

fn rest_provider(app: &App) -> CliResult<&RestIdentityProvider> {
    match app.backend() {
        IdentityBackend::Rest { provider, .. } => Ok(provider.as_ref()),
        IdentityBackend::Memory(_) => Err(CliError::InvalidArgument(
            "google-complete is not available in offline mode".to_string(),
        )),
        IdentityBackend::Disabled => Err(SessionError::NotConfigured.into()),
    }
}

fn rejected(err: ValidationError) -> CliError {
    field_errors(&err);
    CliError::Validation(err)
}

fn print_password_checklist(password: &str) {
    for (label, met) in PasswordRequirements::check(password).items() {
        if met {
            success(label);
        } else {
            error(label);
        }
    }
}
