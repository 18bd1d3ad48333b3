//! Request and response bodies of the Identity Toolkit `accounts:*` methods.

use gh_model::Identity;
use serde::{Deserialize, Serialize};

/// Body of `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Body of `accounts:update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRequest<'a> {
    pub id_token: &'a str,
    pub display_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delete_attribute: Vec<&'static str>,
    pub return_secure_token: bool,
}

/// Body of `accounts:lookup`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupRequest<'a> {
    pub id_token: &'a str,
}

/// Body of `accounts:sendOobCode`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OobCodeRequest<'a> {
    pub request_type: &'static str,
    pub email: &'a str,
}

/// Body of `accounts:createAuthUri`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthUriRequest<'a> {
    pub provider_id: &'a str,
    pub continue_uri: &'a str,
}

/// Body of `accounts:signInWithIdp`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdpRequest<'a> {
    pub request_uri: &'a str,
    pub session_id: &'a str,
    pub return_secure_token: bool,
    pub return_idp_credential: bool,
}

/// Account fields shared by the sign-in, sign-up, update and IdP responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, alias = "profilePicture")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl AccountResponse {
    pub(crate) fn identity(&self) -> Identity {
        Identity {
            uid: self.local_id.clone(),
            display_name: self.display_name.clone().filter(|n| !n.is_empty()),
            email: self.email.clone(),
            photo_url: self.photo_url.clone().filter(|u| !u.is_empty()),
        }
    }
}

/// Response of `accounts:lookup`.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse {
    #[serde(default)]
    pub users: Vec<AccountResponse>,
}

/// Response of `accounts:createAuthUri`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthUriResponse {
    pub auth_uri: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
