//! Configuration commands.

use gh_core::AuthConfig;
use serde::Serialize;

use crate::cli::ConfigCommand;
use crate::config::OutputFormat;
use crate::output::{info, output_single};
use crate::{CliConfig, CliResult};

/// Effective settings as shown by `config show`.
#[derive(Debug, Serialize)]
struct ConfigDisplay<'a> {
    output_format: OutputFormat,
    catalog_path: Option<String>,
    popular_count: usize,
    protect_game_details: bool,
    authentication: &'a str,
    auth_domain: Option<String>,
}

/// Runs a config command.
pub fn run_config(cmd: ConfigCommand, config: &CliConfig, output: OutputFormat) -> CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config, output),
        ConfigCommand::Path => {
            println!("{}", CliConfig::config_path()?.display());
            Ok(())
        }
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig, output: OutputFormat) -> CliResult<()> {
    if output == OutputFormat::Table {
        info(&format!("Configuration file: {}", CliConfig::config_path()?.display()));
        println!();
    }

    let auth = AuthConfig::from_env();
    let display = ConfigDisplay {
        output_format: config.output_format,
        catalog_path: config
            .effective_catalog_path(None)
            .map(|p| p.display().to_string()),
        popular_count: config.popular_count,
        protect_game_details: config.protect_game_details,
        authentication: if auth.is_configured() { "configured" } else { "disabled" },
        auth_domain: auth.is_configured().then(|| auth.auth_domain()),
    };

    output_single(&display, output)
}
