//! The single owner of the signed-in user's credentials.
//!
//! Every read or write of persisted credentials goes through [`SessionManager`]. Login
//! writes the whole session in one storage batch and logout clears it in one batch, so
//! no reader ever observes a half-written session.

use std::fmt;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::preferences::Preferences;
use crate::storage::{keys, KeyValueStore, StorageError, StoreOp};
use crate::views::Route;

pub mod errors;

pub use errors::{AuthErrorKind, LoginError};

/// Role attached to an account by the screening service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Candidate,
    Admin,
    Recruiter,
    Interviewer,
    /// Any other administrative role name.
    Other(String),
}

impl Role {
    pub fn is_candidate(&self) -> bool {
        matches!(self, Role::Candidate)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Candidate => "Candidate",
            Role::Admin => "Admin",
            Role::Recruiter => "Recruiter",
            Role::Interviewer => "Interviewer",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Candidate" => Role::Candidate,
            "Admin" => Role::Admin,
            "Recruiter" => Role::Recruiter,
            "Interviewer" => Role::Interviewer,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in administrative user. Tokens are redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    /// Stored but never used to renew the access token.
    pub refresh_token: SecretString,
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub location: String,
}

/// Body of `POST /login`. Only `access_token`, `role` and `user_id` are required for a
/// session; the remaining profile fields default to empty.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    role: Option<Role>,
    #[serde(default, deserialize_with = "optional_id")]
    user_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    user_location: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoredUser {
    role: Role,
}

/// Keys that together make up a persisted session, in `get_many` order.
const SESSION_KEYS: [&str; 6] = [
    keys::USER,
    keys::ACCESS_TOKEN,
    keys::REFRESH_TOKEN,
    keys::USER_ID,
    keys::USER_NAME,
    keys::USER_LOCATION,
];

#[derive(Clone)]
pub struct SessionManager {
    http: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(http: Client, base_url: String, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Absolute URL for an API path such as `"lov"` or `"assets/jd"`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Signs in with email and password.
    ///
    /// On success the full session is persisted in one batch. On any failure nothing
    /// is written. No retry is attempted.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, LoginError> {
        validate_credentials(email, password)?;

        let response = self
            .http
            .post(self.endpoint("login"))
            .form(&[("username", email), ("password", password.expose_secret().as_str())])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("Login request failed without a response: {e}");
                return Err(LoginError::unknown(None));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorDetail>(&body)
                .ok()
                .and_then(|d| d.detail);
            let kind = AuthErrorKind::from_status(status.as_u16());
            warn!("Login rejected with status {status} ({kind:?})");
            return Err(LoginError::Auth { kind, detail });
        }

        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            warn!("Login response is not JSON: {e}");
            LoginError::unknown(None)
        })?;
        let parsed: LoginResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            warn!("Login response has an unexpected shape: {e}");
            LoginError::unknown(None)
        })?;

        let access_token = match parsed.access_token.filter(|t| !t.is_empty()) {
            Some(token) if status == StatusCode::OK => token,
            _ => {
                let detail = parsed
                    .detail
                    .or_else(|| Some("Login failed. Please try again.".to_string()));
                return Err(LoginError::unknown(detail));
            }
        };

        let (Some(role), Some(user_id)) = (parsed.role, parsed.user_id) else {
            warn!("Login response is missing role or user_id");
            return Err(LoginError::unknown(Some(
                "Login failed. Please try again.".to_string(),
            )));
        };

        if role.is_candidate() {
            info!("Rejected console login for a candidate account");
            return Err(LoginError::UnauthorizedRole);
        }

        let session = Session {
            access_token: SecretString::new(access_token),
            refresh_token: SecretString::new(parsed.refresh_token.unwrap_or_default()),
            user_id,
            name: parsed.name.unwrap_or_default(),
            role,
            location: parsed.user_location.unwrap_or_default(),
        };

        self.store.apply(&session_ops(&session, &raw))?;
        info!(user_id = %session.user_id, role = %session.role, "Signed in");

        Ok(session)
    }

    /// Returns the persisted session, or `None` if it is absent or incomplete.
    pub fn current_session(&self) -> Option<Session> {
        let mut values = self.store.get_many(&SESSION_KEYS).into_iter();
        let mut next = || values.next().flatten();

        let user = next()?;
        let access_token = next()?;
        let refresh_token = next()?;
        let user_id = next()?;
        let name = next()?;
        let location = next()?;

        let role = serde_json::from_str::<StoredUser>(&user).ok()?.role;
        if role.is_candidate() || access_token.is_empty() {
            return None;
        }

        Some(Session {
            access_token: SecretString::new(access_token),
            refresh_token: SecretString::new(refresh_token),
            user_id,
            name,
            role,
            location,
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_session().is_some()
    }

    /// Clears every persisted key and restores default preferences in one batch,
    /// then tells the caller where to navigate.
    pub fn logout(&self) -> Result<Route, StorageError> {
        let mut ops = vec![StoreOp::Clear];
        ops.extend(Preferences::default().to_ops());
        self.store.apply(&ops)?;
        info!("Signed out, local state cleared");
        Ok(Route::Login)
    }

    /// Attaches `Authorization: Bearer <token>` to a request.
    ///
    /// Without a session this fails, and the request must not be sent.
    pub fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, AppError> {
        let session = self.current_session().ok_or(AppError::Unauthenticated)?;
        Ok(request.bearer_auth(session.access_token.expose_secret()))
    }
}

fn session_ops(session: &Session, raw_user: &Value) -> Vec<StoreOp> {
    vec![
        StoreOp::set(keys::USER, raw_user.to_string()),
        StoreOp::set(keys::USER_ID, session.user_id.as_str()),
        StoreOp::set(keys::ACCESS_TOKEN, session.access_token.expose_secret().as_str()),
        StoreOp::set(keys::REFRESH_TOKEN, session.refresh_token.expose_secret().as_str()),
        StoreOp::set(keys::USER_NAME, session.name.as_str()),
        StoreOp::set(keys::USER_LOCATION, session.location.as_str()),
    ]
}

fn validate_credentials(email: &str, password: &SecretString) -> Result<(), LoginError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(LoginError::Validation("Email is required".to_string()));
    }
    if !email_address::EmailAddress::is_valid(email) {
        return Err(LoginError::Validation("Invalid email".to_string()));
    }
    if password.expose_secret().is_empty() {
        return Err(LoginError::Validation("Password is required".to_string()));
    }
    Ok(())
}

/// Accepts a user id sent either as a JSON string or a number.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
