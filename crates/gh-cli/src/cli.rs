//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// GameHub - discover indie games from the terminal.
#[derive(Debug, Parser)]
#[command(name = "gamehub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (overrides config).
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Game catalog JSON file (overrides config).
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Use an in-memory identity provider instead of the identity service.
    #[arg(long, global = true, env = "GAMEHUB_OFFLINE")]
    pub offline: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the game catalog.
    #[command(subcommand)]
    Games(GamesCommand),

    /// Show the page at a path (e.g. `/`, `/games`, `/game/3`, `/profile`).
    Open {
        /// Path to open.
        #[arg(default_value = "/")]
        path: String,
    },

    /// Create an account.
    Register(RegisterArgs),

    /// Sign in with email and password.
    Login(LoginArgs),

    /// Sign out.
    Logout,

    /// Start a Google sign-in.
    GoogleLogin,

    /// Finish a Google sign-in with the URL the browser was sent back to.
    GoogleComplete {
        /// Callback URL from the browser's address bar.
        callback_url: String,
    },

    /// Send a password reset email.
    ResetPassword {
        /// Account email address.
        email: String,
    },

    /// Change display name and photo.
    UpdateProfile(UpdateProfileArgs),

    /// Subscribe to the newsletter.
    Newsletter {
        /// Email address to subscribe.
        email: String,
    },

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Catalog commands.
#[derive(Debug, Subcommand)]
pub enum GamesCommand {
    /// List games, best rated first.
    List {
        /// Only show the N best rated games.
        #[arg(long)]
        top: Option<usize>,
    },

    /// Show game details.
    Show {
        /// Game id.
        id: String,
    },
}

/// Arguments of `register`.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name.
    #[arg(long)]
    pub name: String,

    /// Email address.
    #[arg(long)]
    pub email: String,

    /// Profile photo URL.
    #[arg(long)]
    pub photo_url: Option<String>,

    /// Password (prompted if not provided).
    #[arg(long, env = "GAMEHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments of `login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address.
    #[arg(long)]
    pub email: String,

    /// Password (prompted if not provided).
    #[arg(long, env = "GAMEHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments of `update-profile`.
#[derive(Debug, Args)]
pub struct UpdateProfileArgs {
    /// New display name.
    #[arg(long)]
    pub name: String,

    /// New photo URL; omit to remove the photo.
    #[arg(long)]
    pub photo_url: Option<String>,
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Print the configuration file path.
    Path,
}
