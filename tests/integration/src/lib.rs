//! Test doubles shared by the GameHub end-to-end tests.
//!
//! [`FakeIdentityService`] serves the subset of the Identity Toolkit
//! `accounts:*` REST methods the identity adapter uses, on an ephemeral
//! local port.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use gh_core::AuthConfig;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// API key accepted by the fake service (the one `AuthConfig::for_testing` uses).
pub const API_KEY: &str = "test-api-key";

/// Email of the account returned by federated sign-in.
pub const GOOGLE_EMAIL: &str = "player@gmail.com";

/// Page the fake consent screen sends the browser back to.
pub const CALLBACK_SUFFIX: &str = "?state=ok&code=fake-google-code";

#[derive(Debug, Clone)]
struct Account {
    local_id: String,
    email: String,
    password: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
}

impl Account {
    fn to_json(&self, id_token: Option<&str>) -> Value {
        json!({
            "localId": self.local_id,
            "email": self.email,
            "displayName": self.display_name,
            "photoUrl": self.photo_url,
            "idToken": id_token,
            "refreshToken": id_token.map(|t| format!("refresh-{t}")),
        })
    }
}

#[derive(Debug, Default)]
struct ServiceState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    auth_sessions: HashMap<String, String>,
    oob_requests: Vec<String>,
    calls: Vec<String>,
    next_id: u64,
}

type Shared = Arc<Mutex<ServiceState>>;
type Reply = (StatusCode, Json<Value>);

impl ServiceState {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn issue_token(&mut self, email: &str) -> String {
        let token = self.next("token");
        self.tokens.insert(token.clone(), email.to_lowercase());
        token
    }

    fn account_for_token(&mut self, body: &Value) -> Result<&mut Account, &'static str> {
        let email = self
            .tokens
            .get(text(body, "idToken"))
            .cloned()
            .ok_or("INVALID_ID_TOKEN")?;
        self.accounts.get_mut(&email).ok_or("USER_NOT_FOUND")
    }

    fn handle(&mut self, method: &str, body: &Value) -> Result<Value, &'static str> {
        match method {
            "accounts:signUp" => {
                let email = text(body, "email");
                let password = text(body, "password");
                if !email.contains('@') {
                    return Err("INVALID_EMAIL");
                }
                if password.chars().count() < 6 {
                    return Err("WEAK_PASSWORD : Password should be at least 6 characters");
                }
                if self.accounts.contains_key(&email.to_lowercase()) {
                    return Err("EMAIL_EXISTS");
                }

                let account = Account {
                    local_id: self.next("uid"),
                    email: email.to_string(),
                    password: Some(password.to_string()),
                    display_name: None,
                    photo_url: None,
                };
                self.accounts.insert(email.to_lowercase(), account.clone());
                let token = self.issue_token(email);
                Ok(account.to_json(Some(&token)))
            }
            "accounts:signInWithPassword" => {
                let email = text(body, "email");
                let account = match self.accounts.get(&email.to_lowercase()) {
                    Some(a) if a.password.as_deref() == Some(text(body, "password")) => a.clone(),
                    _ => return Err("INVALID_LOGIN_CREDENTIALS"),
                };
                let token = self.issue_token(email);
                // The real service omits the photo here.
                let mut reply = account.to_json(Some(&token));
                reply["photoUrl"] = Value::Null;
                Ok(reply)
            }
            "accounts:lookup" => {
                let account = self.account_for_token(body)?;
                Ok(json!({ "users": [account.to_json(None)] }))
            }
            "accounts:update" => {
                let account = self.account_for_token(body)?;
                if let Some(name) = body.get("displayName").and_then(Value::as_str) {
                    account.display_name = Some(name.to_string());
                }
                if let Some(photo) = body.get("photoUrl").and_then(Value::as_str) {
                    account.photo_url = Some(photo.to_string());
                }
                let deletes = body.get("deleteAttribute").and_then(Value::as_array);
                if deletes.is_some_and(|d| d.iter().any(|a| a == "PHOTO_URL")) {
                    account.photo_url = None;
                }
                Ok(account.to_json(None))
            }
            "accounts:sendOobCode" => {
                if text(body, "requestType") != "PASSWORD_RESET" {
                    return Err("INVALID_REQ_TYPE");
                }
                let email = text(body, "email");
                if !self.accounts.contains_key(&email.to_lowercase()) {
                    return Err("EMAIL_NOT_FOUND");
                }
                self.oob_requests.push(email.to_string());
                Ok(json!({ "email": email }))
            }
            "accounts:createAuthUri" => {
                if text(body, "providerId") != "google.com" {
                    return Err("INVALID_PROVIDER_ID");
                }
                let session_id = self.next("session");
                self.auth_sessions
                    .insert(session_id.clone(), text(body, "continueUri").to_string());
                Ok(json!({
                    "authUri": format!("https://accounts.google.example/o/oauth2/auth?state={session_id}"),
                    "providerId": "google.com",
                    "sessionId": session_id,
                }))
            }
            "accounts:signInWithIdp" => {
                let continue_uri = self
                    .auth_sessions
                    .remove(text(body, "sessionId"))
                    .ok_or("INVALID_IDP_RESPONSE")?;
                if !text(body, "requestUri").starts_with(&continue_uri) {
                    return Err("INVALID_IDP_RESPONSE");
                }

                let local_id = self.next("google");
                let account = self
                    .accounts
                    .entry(GOOGLE_EMAIL.to_string())
                    .or_insert_with(|| Account {
                        local_id,
                        email: GOOGLE_EMAIL.to_string(),
                        password: None,
                        display_name: Some("Player One".to_string()),
                        photo_url: Some("https://lh3.google.example/player.png".to_string()),
                    })
                    .clone();
                let token = self.issue_token(GOOGLE_EMAIL);
                Ok(account.to_json(Some(&token)))
            }
            _ => Err("UNSUPPORTED_METHOD"),
        }
    }
}

fn text<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn rejection(message: &str) -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message, "errors": [] } })),
    )
}

async fn dispatch(
    State(state): State<Shared>,
    Path(method): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Reply {
    if params.get("key").map(String::as_str) != Some(API_KEY) {
        return rejection("API key not valid. Please pass a valid API key.");
    }

    let mut state = state.lock();
    state.calls.push(method.clone());
    match state.handle(&method, &body) {
        Ok(reply) => (StatusCode::OK, Json(reply)),
        Err(code) => rejection(code),
    }
}

/// In-process stand-in for the hosted identity service.
pub struct FakeIdentityService {
    base_url: String,
    state: Shared,
    _shutdown: oneshot::Sender<()>,
}

impl FakeIdentityService {
    /// Starts the service on an ephemeral port.
    pub async fn start() -> anyhow::Result<Self> {
        let state = Shared::default();
        let app = Router::new()
            .route("/v1/:method", post(dispatch))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                tracing::error!("fake identity service error: {}", e);
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}/v1"),
            state,
            _shutdown: shutdown_tx,
        })
    }

    /// Returns the REST endpoint base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a configuration pointing at this service.
    pub fn config(&self) -> AuthConfig {
        AuthConfig::for_testing(&self.base_url)
    }

    /// Returns the URL the browser lands on after the consent screen.
    pub fn callback_url(&self) -> String {
        format!("{}{CALLBACK_SUFFIX}", self.config().continue_url)
    }

    /// Returns the addresses password resets were requested for.
    pub fn oob_requests(&self) -> Vec<String> {
        self.state.lock().oob_requests.clone()
    }

    /// Returns the methods called so far, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Returns the number of accounts.
    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }
}
