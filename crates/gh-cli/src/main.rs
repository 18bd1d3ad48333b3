//! # GameHub CLI
//!
//! Command-line front end for the GameHub catalog and accounts.

#![forbid(unsafe_code)]

use clap::Parser;
use gh_cli::{
    cli::{Cli, Command},
    commands::{
        run_config, run_games, run_google_complete, run_google_login, run_login, run_logout,
        run_newsletter, run_open, run_register, run_reset_password, run_update_profile,
    },
    output::error,
    App, CliConfig, CliResult,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, config).await {
        // Field messages were already printed.
        if !e.is_validation() {
            error(&e.to_string());
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli, config: CliConfig) -> CliResult<()> {
    let Cli {
        output,
        catalog,
        offline,
        command,
        ..
    } = cli;

    let command = match command {
        Command::Config(cmd) => return run_config(cmd, &config, config.effective_output(output)),
        Command::Newsletter { email } => return run_newsletter(email),
        other => other,
    };

    let mut app = App::build(config, output, catalog.as_deref(), offline).await?;

    let result = match command {
        Command::Games(cmd) => run_games(cmd, &app),
        Command::Open { path } => run_open(&path, &app),
        Command::Register(args) => run_register(args, &app).await,
        Command::Login(args) => run_login(args, &app).await,
        Command::Logout => run_logout(&app).await,
        Command::GoogleLogin => run_google_login(&app).await,
        Command::GoogleComplete { callback_url } => run_google_complete(&callback_url, &mut app).await,
        Command::ResetPassword { email } => run_reset_password(email, &app).await,
        Command::UpdateProfile(args) => run_update_profile(args, &app).await,
        Command::Config(_) | Command::Newsletter { .. } => Ok(()),
    };

    app.persist()?;
    result
}
