//! Command implementations.

pub mod account;
pub mod config;
pub mod games;
pub mod newsletter;
pub mod open;

pub use account::{
    run_google_complete, run_google_login, run_login, run_logout, run_register, run_reset_password,
    run_update_profile,
};
pub use config::run_config;
pub use games::run_games;
pub use newsletter::run_newsletter;
pub use open::run_open;
