//! Request and response bodies for the pharmacy backend.

use serde::{Deserialize, Serialize};

use pharmacy_core::UserId;

/// Body of `POST /api/auth/login` and `POST /api/users`.
#[derive(Serialize)]
pub(crate) struct CredentialsBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login.
#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

/// Successful signup.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SignupResponse {
    pub id: UserId,
}

/// `GET /api/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract `message` from a raw body, if it is JSON and has one.
    pub(crate) fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
    }
}
