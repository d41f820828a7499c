//! Command implementations.
//!
//! Every command writes its output to the given writer and returns a
//! [`CommandError`] on failure; `main` decides how failures are shown.

pub mod auth;
pub mod cart;
pub mod catalog;

use pharmacy_storefront::error::StorefrontError;
use pharmacy_storefront::session::AuthError;
use pharmacy_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Writing to stdout failed (e.g. closed pipe).
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl From<AuthError> for CommandError {
    fn from(err: AuthError) -> Self {
        Self::Storefront(err.into())
    }
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        Self::Storefront(err.into())
    }
}

impl CommandError {
    /// Log the failure (and capture it to Sentry where appropriate).
    pub fn report(&self) {
        match self {
            Self::Storefront(err) => err.report(),
            Self::Output(err) => tracing::debug!(error = %err, "Output closed"),
        }
    }

    /// Message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storefront(StorefrontError::NotFound(what)) => {
                format!("{what} not found. Browse the catalog with `pharmacy products`.")
            }
            Self::Storefront(StorefrontError::LoginRequired) => {
                "Please log in first: `pharmacy login -u <username> -p <password>`".to_string()
            }
            Self::Storefront(err) => err.user_message(),
            Self::Output(err) => err.to_string(),
        }
    }
}

/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, CommandError>;
