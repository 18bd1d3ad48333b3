//! Session state snapshot.

use gh_model::Identity;
use serde::{Deserialize, Serialize};

/// Account operations offered by the session holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Account registration.
    Register,
    /// Password sign-in.
    Login,
    /// Sign-out.
    Logout,
    /// Federated sign-in redirect.
    GoogleLogin,
    /// Display name / photo change.
    UpdateProfile,
    /// Password reset request.
    ResetPassword,
}

/// What the rest of the application sees of the session.
///
/// ## Invariants
///
/// - `loading` starts `true` when a provider is configured and becomes
///   `false` on the provider's first identity notification; it never turns
///   `true` again
/// - `error` is cleared when an operation starts and set only when that
///   operation fails
/// - `in_flight` names the operation currently talking to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Signed-in principal, if any.
    pub identity: Option<Identity>,
    /// Whether the provider has yet to report the initial identity.
    pub loading: bool,
    /// Message of the last failed operation.
    pub error: Option<String>,
    /// Operation awaiting the provider.
    pub in_flight: Option<Operation>,
}

impl SessionState {
    /// Returns the state a holder starts in.
    ///
    /// Without a provider there is nothing to wait for, so loading is off.
    #[must_use]
    pub const fn initial(provider_configured: bool) -> Self {
        Self {
            identity: None,
            loading: provider_configured,
            error: None,
            in_flight: None,
        }
    }

    /// Checks if a principal is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Checks if an operation is awaiting the provider.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial(true)
    }
}
