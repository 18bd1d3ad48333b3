//! Identity domain model.
//!
//! An identity is owned by the external identity provider. GameHub only ever
//! holds read-only snapshots of it, replaced wholesale after each provider
//! round-trip.

use serde::{Deserialize, Serialize};

/// The signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque identifier issued by the provider.
    pub uid: String,
    /// Display name, if one was set.
    pub display_name: Option<String>,
    /// Email address.
    pub email: String,
    /// Profile photo URL, if one was set.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl Identity {
    /// Creates an identity without display name or photo.
    #[must_use]
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: email.into(),
            photo_url: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the photo URL.
    #[must_use]
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Returns a copy with the given profile update applied.
    #[must_use]
    pub fn with_profile(mut self, update: &ProfileUpdate) -> Self {
        self.display_name = Some(update.display_name.clone());
        self.photo_url.clone_from(&update.photo_url);
        self
    }

    /// Returns the name to greet the user with.
    ///
    /// Falls back to the email address when no display name is set.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// A requested change of display name and photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    pub display_name: String,
    /// New photo URL; `None` removes the photo.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    /// Creates a profile update.
    ///
    /// An empty or blank photo URL is treated as "no photo".
    #[must_use]
    pub fn new(display_name: impl Into<String>, photo_url: Option<&str>) -> Self {
        Self {
            display_name: display_name.into(),
            photo_url: photo_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }
}
