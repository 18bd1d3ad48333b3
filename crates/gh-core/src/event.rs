//! Account event records.
//!
//! Every account operation (registration, sign-in, sign-out, profile update,
//! password reset) produces an [`Event`] describing what happened and whether
//! it succeeded. Events are handed to an [`EventSink`]; the default sink
//! writes them to the tracing framework.
//!
//! Events never carry passwords.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Account lifecycle
    /// Account registered.
    Register,
    /// Account registration failed.
    RegisterError,
    /// Profile updated.
    UpdateProfile,
    /// Profile update failed.
    UpdateProfileError,
    /// Password reset requested.
    ResetPassword,
    /// Password reset request failed.
    ResetPasswordError,

    // Authentication
    /// User signed in with a password.
    Login,
    /// Password sign-in failed.
    LoginError,
    /// User signed out.
    Logout,
    /// Sign-out failed.
    LogoutError,
    /// Federated sign-in redirect started.
    FederatedLoginStart,
    /// Federated sign-in completed from a redirect result.
    FederatedLogin,
    /// Federated sign-in failed.
    FederatedLoginError,

    // Provider notifications
    /// Provider reported a change of the signed-in identity.
    IdentityChanged,
}

impl EventType {
    /// Returns whether this event type records a failure.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::RegisterError
                | Self::UpdateProfileError
                | Self::ResetPasswordError
                | Self::LoginError
                | Self::LogoutError
                | Self::FederatedLoginError
        )
    }
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A record of an account operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Identifier of the principal involved, when known.
    pub user_id: Option<String>,

    /// Provider error code (for failure events).
    pub error_code: Option<String>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    user_id: Option<String>,
    error_code: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    ///
    /// The outcome starts as failure for `*Error` types and success otherwise.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: if event_type.is_error() {
                EventOutcome::Failure
            } else {
                EventOutcome::Success
            },
            user_id: None,
            error_code: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the provider error code.
    #[must_use]
    pub fn error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Sets the principal identifier.
    #[must_use]
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the principal identifier if one is known.
    #[must_use]
    pub fn maybe_user(mut self, user_id: Option<&str>) -> Self {
        self.user_id = user_id.map(str::to_string);
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            user_id: self.user_id,
            error_code: self.error_code,
            error: self.error,
            details: self.details,
        }
    }
}

/// Destination for account events.
pub trait EventSink: Send + Sync + Debug {
    /// Records an event.
    fn record(&self, event: &Event);
}

/// Event sink that writes to the tracing framework.
///
/// Successful events are logged at INFO, failures at WARN. Identity
/// change notifications are frequent and logged at DEBUG.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Creates a new tracing sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn record(&self, event: &Event) {
        if event.event_type == EventType::IdentityChanged {
            tracing::debug!(user_id = ?event.user_id, details = ?event.details, "identity_changed");
            return;
        }

        match event.outcome {
            EventOutcome::Success => tracing::info!(
                event_id = %event.id,
                event_type = ?event.event_type,
                user_id = ?event.user_id,
                details = ?event.details,
                "account_event"
            ),
            EventOutcome::Failure => tracing::warn!(
                event_id = %event.id,
                event_type = ?event.event_type,
                user_id = ?event.user_id,
                error_code = ?event.error_code,
                error = ?event.error,
                "account_event"
            ),
        }
    }
}
