//! Page rendering.

use colored::Colorize;
use gh_model::{Game, Identity};
use gh_validation::PasswordRequirements;
use serde::Serialize;

use crate::app::App;
use crate::output::{heading, info, output, output_single, warning};
use crate::routes::{Resolution, View};
use crate::{CliError, CliResult};

use super::games::GameRow;

/// Runs `open <path>`.
pub fn run_open(path: &str, app: &App) -> CliResult<()> {
    match app.resolve(path) {
        Resolution::Render(view) => render(view, app),
        Resolution::Pending => {
            info("Loading your session...");
            Ok(())
        }
        Resolution::Redirect(route) => {
            warning(&format!("{path} requires sign-in; redirecting to {}", route.path()));
            match app.resolve(&route.path()) {
                Resolution::Render(view) => render(view, app),
                _ => Ok(()),
            }
        }
    }
}

/// Prints a view.
pub fn render(view: View, app: &App) -> CliResult<()> {
    match view {
        View::Home { popular } => {
            if let Some(identity) = app.session.identity() {
                info(&format!("Signed in as {}", identity.greeting_name()));
            }
            heading("Popular Games");
            println!("{}", "Top-rated games loved by the community".dimmed());
            output(&rows(&popular), app.output)
        }
        View::Games { games } => {
            heading("All Games");
            println!(
                "{}",
                format!("Browse our complete collection of {} indie games", games.len()).dimmed()
            );
            output(&rows(&games), app.output)
        }
        View::GameDetails(game) => output_single(&game, app.output),
        View::GameNotFound(id) => Err(CliError::NotFound {
            resource_type: "Game".to_string(),
            id,
        }),
        View::Login => {
            heading("Login");
            println!("  gamehub login --email <email>");
            println!("  gamehub google-login");
            println!("  gamehub open /forgot-password");
            Ok(())
        }
        View::Register => {
            heading("Register");
            println!("  gamehub register --name <name> --email <email> [--photo-url <url>]");
            println!("Password requirements:");
            for (label, _) in PasswordRequirements::check("").items() {
                println!("  - {label}");
            }
            Ok(())
        }
        View::ForgotPassword { email } => {
            heading("Forgot Password");
            println!("  gamehub reset-password {}", email.as_deref().unwrap_or("<email>"));
            Ok(())
        }
        View::Profile(identity) => {
            heading("Profile");
            output_single(&ProfileDisplay::from(&identity), app.output)
        }
        View::UpdateProfile(identity) => {
            heading("Update Profile");
            output_single(&ProfileDisplay::from(&identity), app.output)?;
            println!("  gamehub update-profile --name <name> [--photo-url <url>]");
            Ok(())
        }
        View::NotFound(path) => Err(CliError::NotFound {
            resource_type: "Page".to_string(),
            id: path,
        }),
    }
}

fn rows(games: &[Game]) -> Vec<GameRow> {
    games
        .iter()
        .enumerate()
        .map(|(i, game)| GameRow::new(i + 1, game))
        .collect()
}

/// Profile fields shown on the profile page.
#[derive(Debug, Serialize)]
struct ProfileDisplay {
    name: String,
    email: String,
    photo: Option<String>,
    uid: String,
}

impl From<&Identity> for ProfileDisplay {
    fn from(identity: &Identity) -> Self {
        Self {
            name: identity.greeting_name().to_string(),
            email: identity.email.clone(),
            photo: identity.photo_url.clone(),
            uid: identity.uid.clone(),
        }
    }
}
