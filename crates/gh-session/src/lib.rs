//! # gh-session
//!
//! Session state for GameHub.
//!
//! The [`SessionHolder`] is the single source of truth for "who is signed
//! in" and the only component that talks to the identity provider. The
//! provider itself sits behind the [`IdentityProvider`] capability trait so
//! concrete vendors are pluggable adapters:
//!
//! - [`InMemoryIdentityProvider`] - accounts kept in memory (tests, offline mode)
//! - `gh-identity-rest` - the hosted identity service over HTTPS
//!
//! ## Lifecycle
//!
//! 1. [`SessionHolder::start`] subscribes to identity changes and checks for a
//!    pending federated-login redirect result
//! 2. Account operations run one at a time and update the held snapshot
//! 3. Readers take snapshots or watch for changes
//! 4. Dropping the holder (or [`SessionHolder::shutdown`]) unsubscribes
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gh_session::{InMemoryIdentityProvider, SessionHolder};
//!
//! let provider = Arc::new(InMemoryIdentityProvider::new());
//! let session = SessionHolder::start(provider).await;
//! session.register("Ada", "ada@example.com", "Secret1", None).await?;
//! assert!(session.identity().is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod holder;
pub mod memory;
pub mod provider;
pub mod state;

pub use error::{SessionError, SessionResult};
pub use holder::{SessionHolder, SessionHolderBuilder};
pub use memory::InMemoryIdentityProvider;
pub use provider::{
    codes, FederatedProvider, IdentityListener, IdentityProvider, ListenerSet, ProviderError,
    ProviderOperation, ProviderResult, RedirectTarget, Subscription,
};
pub use state::{Operation, SessionState};
