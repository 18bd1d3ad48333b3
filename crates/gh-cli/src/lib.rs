//! # gh-cli
//!
//! Terminal front end for GameHub.
//!
//! This crate provides:
//! - Catalog browsing (popular games, full listing, game details)
//! - Path-based page rendering with the sign-in guard
//! - Account commands (register, login, logout, Google sign-in, password
//!   reset, profile update) driven through the session holder
//! - Newsletter signup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod routes;
pub mod session_store;

pub use app::{App, IdentityBackend};
pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
