//! Pharmacy backend REST API.
//!
//! # Endpoints
//!
//! | Method | Path              | Auth   | Response            |
//! |--------|-------------------|--------|---------------------|
//! | POST   | `/api/auth/login` | none   | `{token}`           |
//! | POST   | `/api/users`      | none   | `{id}`              |
//! | GET    | `/api/users/me`   | bearer | `{username}`        |
//! | GET    | `/api/drugs`      | bearer | `[Drug]`            |
//! | GET    | `/api/drugs/:id`  | bearer | `Drug`              |
//!
//! Errors come back as a non-success status with an optional
//! `{"message": "..."}` body. Requests are sent once: no retries, no
//! timeouts, no caching.
//!
//! # Example
//!
//! ```rust,ignore
//! use pharmacy_storefront::api::{Backend, PharmacyClient};
//!
//! let client = PharmacyClient::new(&config);
//! let token = client.login(&username, &password).await?;
//! let drugs = client.drugs(&token).await?;
//! ```

mod client;
pub mod types;

pub use client::PharmacyClient;
pub use types::Profile;

use std::future::Future;

use pharmacy_core::{Drug, DrugId, UserId, Username};
use reqwest::StatusCode;
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur when talking to the pharmacy backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, DNS, broken body...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{}", format_status(.status, .message.as_deref()))]
    Status {
        status: StatusCode,
        /// `message` field of the JSON error body, when present.
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The backend's own error message, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status, for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend answered at all (as opposed to a transport or
    /// client-side failure).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

fn format_status(status: &StatusCode, message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!("HTTP {status}: {message}"),
        _ => format!("HTTP {status}"),
    }
}

/// Operations the storefront needs from the backend.
///
/// [`PharmacyClient`] is the HTTP implementation; stores and page loaders
/// take any `Backend` so they can be driven by test doubles.
pub trait Backend: Send + Sync {
    /// `POST /api/auth/login`, returning the bearer token.
    fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> impl Future<Output = Result<SecretString, ApiError>> + Send;

    /// `POST /api/users`, returning the new user's id.
    fn signup(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> impl Future<Output = Result<UserId, ApiError>> + Send;

    /// `GET /api/users/me`.
    fn me(&self, token: &SecretString) -> impl Future<Output = Result<Profile, ApiError>> + Send;

    /// `GET /api/drugs`.
    fn drugs(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<Vec<Drug>, ApiError>> + Send;

    /// `GET /api/drugs/:id`.
    fn drug(
        &self,
        token: &SecretString,
        id: DrugId,
    ) -> impl Future<Output = Result<Drug, ApiError>> + Send;
}
