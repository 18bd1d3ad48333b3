//! # gh-model
//!
//! Domain records for GameHub.
//!
//! - [`Identity`] - snapshot of the signed-in principal
//! - [`ProfileUpdate`] - requested display name / photo change
//! - [`Game`] - a read-only catalog entry

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod game;
pub mod identity;

pub use game::Game;
pub use identity::{Identity, ProfileUpdate};
