//! Output formatting utilities.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Prints a heading.
pub fn heading(title: &str) {
    println!("{}", title.bold().underline());
}

/// Outputs rows in the specified format.
pub fn output<T: Tabled + serde::Serialize>(data: &[T], format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let table = Table::new(data).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Outputs a single item as `key: value` lines or JSON.
pub fn output_single<T: serde::Serialize>(item: &T, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if let serde_json::Value::Object(map) = serde_json::to_value(item)? {
                for (key, value) in map {
                    let value = match value {
                        serde_json::Value::Null => "-".dimmed().to_string(),
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    println!("{}: {}", key.bold(), value);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Prompts for password input (hidden).
pub fn prompt_password(prompt: &str) -> crate::CliResult<String> {
    rpassword::prompt_password(prompt).map_err(crate::CliError::Io)
}

/// Prints every field message of a rejected form.
pub fn field_errors(err: &gh_validation::ValidationError) {
    for field in &err.errors {
        error(&format!("{}: {}", field.field, field.message));
    }
}
