//! Authentication error types.

use std::fmt;

use pharmacy_core::UsernameError;
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// The session operation that talked to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Signup,
    Profile,
}

impl AuthAction {
    /// Shown when the backend rejects the request without a message.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Signup => "Signup failed",
            Self::Profile => "Failed to load profile",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Profile => "profile",
        })
    }
}

/// Errors that can occur during login, signup and profile refresh.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Username is blank or too long.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// The backend refused the request; carries its message verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The backend could not be reached or answered nonsense.
    #[error("{action} request failed: {source}")]
    Unavailable {
        action: AuthAction,
        #[source]
        source: ApiError,
    },

    /// The operation needs a stored token.
    #[error("not logged in")]
    NotLoggedIn,

    /// Session data could not be written.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Classify a backend failure for `action`.
    ///
    /// Non-success statuses become [`AuthError::Rejected`] with the server's
    /// message (or the action's fallback); everything else is
    /// [`AuthError::Unavailable`].
    #[must_use]
    pub fn from_api(action: AuthAction, err: ApiError) -> Self {
        if err.is_rejection() {
            let message = err
                .server_message()
                .unwrap_or_else(|| action.fallback_message())
                .to_string();
            Self::Rejected(message)
        } else {
            Self::Unavailable {
                action,
                source: err,
            }
        }
    }

    /// Whether the backend was unreachable (as opposed to refusing).
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PasswordMismatch | Self::Rejected(_) => self.to_string(),
            Self::InvalidUsername(e) => match e {
                UsernameError::Empty => "Username is required".to_string(),
                UsernameError::TooLong { max } => {
                    format!("Username must be at most {max} characters")
                }
            },
            Self::Unavailable { action, .. } => {
                format!("An unexpected error occurred during {action}.")
            }
            Self::NotLoggedIn => "Please log in to continue".to_string(),
            Self::Storage(_) => "Could not save session data".to_string(),
        }
    }
}
