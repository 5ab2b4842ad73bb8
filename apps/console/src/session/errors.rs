use thiserror::Error;

use crate::storage::StorageError;

/// Why the login endpoint refused a sign-in, keyed by HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    BadRequest,
    InvalidCredentials,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
    /// Any other status, or no response at all.
    Unknown,
}

impl AuthErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => AuthErrorKind::BadRequest,
            401 => AuthErrorKind::InvalidCredentials,
            403 => AuthErrorKind::Forbidden,
            404 => AuthErrorKind::NotFound,
            429 => AuthErrorKind::RateLimited,
            500 => AuthErrorKind::ServerError,
            _ => AuthErrorKind::Unknown,
        }
    }

    /// Fixed message for the kind; `None` for `Unknown`, which defers to the server.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AuthErrorKind::BadRequest => Some("Bad request. Check your input."),
            AuthErrorKind::InvalidCredentials => Some("Invalid credentials. Try again."),
            AuthErrorKind::Forbidden => Some("Access denied."),
            AuthErrorKind::NotFound => Some("User not found."),
            AuthErrorKind::RateLimited => Some("Too many attempts. Please wait."),
            AuthErrorKind::ServerError => Some("Server error. Try again later."),
            AuthErrorKind::Unknown => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    /// Required-field or format check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Login failed: {kind:?}")]
    Auth {
        kind: AuthErrorKind,
        detail: Option<String>,
    },

    /// The credentials belong to a candidate, who may not use the console.
    #[error("Unauthorized user")]
    UnauthorizedRole,

    #[error("Could not persist session: {0}")]
    Storage(#[from] StorageError),
}

impl LoginError {
    pub fn unknown(detail: Option<String>) -> Self {
        LoginError::Auth {
            kind: AuthErrorKind::Unknown,
            detail,
        }
    }

    /// Form-level message shown above the login form.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Validation(msg) => msg.clone(),
            LoginError::Auth { kind, detail } => match kind.message() {
                Some(msg) => msg.to_string(),
                None => detail
                    .clone()
                    .unwrap_or_else(|| "An error occurred.".to_string()),
            },
            LoginError::UnauthorizedRole => "Unauthorized user.".to_string(),
            LoginError::Storage(e) => {
                tracing::error!("Session storage error: {e}");
                "Could not save your session. Try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_matches_documented_messages() {
        let cases = [
            (400, "Bad request. Check your input."),
            (401, "Invalid credentials. Try again."),
            (403, "Access denied."),
            (404, "User not found."),
            (429, "Too many attempts. Please wait."),
            (500, "Server error. Try again later."),
        ];
        for (status, expected) in cases {
            let err = LoginError::Auth {
                kind: AuthErrorKind::from_status(status),
                detail: Some("ignored for mapped statuses".to_string()),
            };
            assert_eq!(err.user_message(), expected, "status {status}");
        }
    }

    #[test]
    fn test_unmapped_status_is_unknown() {
        for status in [302, 418, 502, 503] {
            assert_eq!(AuthErrorKind::from_status(status), AuthErrorKind::Unknown);
        }
    }

    #[test]
    fn test_unknown_prefers_server_detail() {
        let err = LoginError::unknown(Some("Account locked".to_string()));
        assert_eq!(err.user_message(), "Account locked");
    }

    #[test]
    fn test_unknown_without_detail_is_generic() {
        assert_eq!(LoginError::unknown(None).user_message(), "An error occurred.");
    }

    #[test]
    fn test_unauthorized_role_message() {
        assert_eq!(
            LoginError::UnauthorizedRole.user_message(),
            "Unauthorized user."
        );
    }
}
