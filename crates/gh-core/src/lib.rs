//! # gh-core
//!
//! Core configuration, error handling, and account events for GameHub.
//!
//! This crate provides the foundational types shared by the other GameHub
//! crates:
//!
//! - [`AuthConfig`] / [`CatalogConfig`] - environment-driven configuration
//! - [`CoreError`] - configuration and I/O failures
//! - [`Event`] - structured records of account operations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{AuthConfig, CatalogConfig};
pub use error::{CoreError, CoreResult};
pub use event::{Event, EventBuilder, EventOutcome, EventSink, EventType, TracingEventSink};
