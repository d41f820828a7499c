//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StorefrontError` for the storefront's front ends.
//! Errors that point at a broken backend or local store are captured to
//! Sentry; user-level failures (bad credentials, missing products) are not.

use thiserror::Error;

use crate::api::ApiError;
use crate::session::AuthError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Login, signup or profile refresh failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Local store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The action needs a logged-in session.
    #[error("Please log in to continue")]
    LoginRequired,
}

impl StorefrontError {
    /// Log the error and capture infrastructure failures to Sentry.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront request failed");
        }
    }

    /// Message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => err.user_message(),
            Self::Api(ApiError::Status { message: Some(m), .. }) => m.clone(),
            Self::Api(_) => "The pharmacy service is unavailable, please try again".to_string(),
            Self::Storage(_) => "Could not access local storage".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::LoginRequired => self.to_string(),
        }
    }

    const fn is_reportable(&self) -> bool {
        match self {
            Self::Api(err) => !err.is_rejection(),
            Self::Auth(err) => err.is_unavailable(),
            Self::Storage(_) => true,
            Self::NotFound(_) | Self::LoginRequired => false,
        }
    }
}

/// Set the Sentry user context.
///
/// Call this after a successful login to associate errors with the user.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("navigation", "Viewed product page", Some(&[("drug_id", "7")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::NotFound("Product 7".to_string());
        assert_eq!(err.to_string(), "Not found: Product 7");
        assert_eq!(err.user_message(), "Product 7 not found");

        assert_eq!(
            StorefrontError::LoginRequired.user_message(),
            "Please log in to continue"
        );
    }

    #[test]
    fn test_rejections_are_not_reported() {
        let err = StorefrontError::from(ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: Some("Invalid token".to_string()),
        });
        assert!(!err.is_reportable());
        assert_eq!(err.user_message(), "Invalid token");

        assert!(!StorefrontError::LoginRequired.is_reportable());
        assert!(!StorefrontError::from(AuthError::PasswordMismatch).is_reportable());
    }

    #[test]
    fn test_storage_errors_are_reported() {
        let err = StorefrontError::from(StorageError::Io(std::io::Error::other("disk full")));
        assert!(err.is_reportable());
        assert_eq!(err.user_message(), "Could not access local storage");
    }
}
