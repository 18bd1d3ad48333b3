//! # gh-identity-rest
//!
//! [`IdentityProvider`](gh_session::IdentityProvider) adapter for the hosted
//! identity service, speaking the Identity Toolkit `accounts:*` REST methods
//! keyed by the project's API key.
//!
//! | Operation | Method |
//! |---|---|
//! | create account | `accounts:signUp` |
//! | password sign-in | `accounts:signInWithPassword` + `accounts:lookup` |
//! | profile update | `accounts:update` |
//! | password reset | `accounts:sendOobCode` |
//! | federated redirect | `accounts:createAuthUri` / `accounts:signInWithIdp` |
//!
//! Sign-out is local. The adapter's tokens and any federated sign-in in
//! progress are exposed as a [`StoredSession`] so a front end can persist
//! them between runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod provider;
mod wire;

pub use error::{provider_error, RestError, RestResult};
pub use provider::{PendingRedirect, RestIdentityProvider, StoredSession};
