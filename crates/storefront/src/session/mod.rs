//! Client-side session: bearer token and display username.
//!
//! Both values live in the local store under the `token` and `username`
//! keys. A session is "authenticated" exactly when a token is stored; the
//! client never inspects or validates the token itself, the backend does.
//!
//! # Flows
//!
//! - [`SessionStore::login`] stores the token and username on success
//! - [`SessionStore::signup`] creates the account but does not log in
//! - [`SessionStore::logout`] clears token, username and the cart
//! - [`SessionStore::refresh_username`] re-reads the name from the backend

mod error;

pub use error::{AuthAction, AuthError};

use std::sync::Arc;

use pharmacy_core::{UserId, Username};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::api::Backend;
use crate::cart::CartStore;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::storage::{KeyValueStore, StorageError, keys};

/// Snapshot of a logged-in session.
///
/// `Debug` output never contains the token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub username: Option<String>,
}

/// Session state backed by a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored bearer token, if any. Empty values count as absent.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.read(keys::TOKEN).map(SecretString::from)
    }

    /// The stored display username, if any.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.read(keys::USERNAME)
    }

    /// True iff a token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The current session, if logged in.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.token().map(|token| Session {
            token,
            username: self.username(),
        })
    }

    /// Log in and persist the returned token and the username.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidUsername` for blank input (no request is sent)
    /// - `AuthError::Rejected` with the server's message, or "Login failed"
    /// - `AuthError::Unavailable` if the backend could not be reached
    /// - `AuthError::Storage` if the session cannot be saved
    #[instrument(skip(self, api, password))]
    pub async fn login<B: Backend>(
        &self,
        api: &B,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, AuthError> {
        let username = Username::parse(username)?;

        let token = api
            .login(&username, password)
            .await
            .map_err(|e| AuthError::from_api(AuthAction::Login, e))?;

        self.store.set(keys::TOKEN, token.expose_secret())?;
        self.store.set(keys::USERNAME, username.as_str())?;

        set_sentry_user(username.as_str());
        add_breadcrumb("auth", "Logged in", None);
        info!(username = %username, "User logged in");

        Ok(token)
    }

    /// Create an account. Does not log in.
    ///
    /// The password confirmation is checked before anything is sent.
    ///
    /// # Errors
    ///
    /// - `AuthError::PasswordMismatch` if `password != confirm_password`
    /// - `AuthError::InvalidUsername` for blank input
    /// - `AuthError::Rejected` with the server's message, or "Signup failed"
    /// - `AuthError::Unavailable` if the backend could not be reached
    #[instrument(skip(self, api, password, confirm_password))]
    pub async fn signup<B: Backend>(
        &self,
        api: &B,
        username: &str,
        password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<UserId, AuthError> {
        if password.expose_secret() != confirm_password.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }
        let username = Username::parse(username)?;

        let user_id = api
            .signup(&username, password)
            .await
            .map_err(|e| AuthError::from_api(AuthAction::Signup, e))?;

        add_breadcrumb("auth", "Signed up", None);
        info!(username = %username, user_id = %user_id, "Account created");

        Ok(user_id)
    }

    /// Empty the cart and forget the username and token.
    ///
    /// The token goes last, so a failed write leaves the user logged in
    /// rather than half logged out.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn logout(&self, cart: &CartStore) -> Result<(), StorageError> {
        cart.clear()?;
        self.store.remove_many(&[keys::USERNAME, keys::TOKEN])?;

        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        info!("User logged out");

        Ok(())
    }

    /// Re-read the display username from `GET /api/users/me`.
    ///
    /// On success the stored username is replaced; on any backend failure it
    /// is removed.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotLoggedIn` if no token is stored (nothing is sent)
    /// - `AuthError::Rejected` / `AuthError::Unavailable` on backend failure
    /// - `AuthError::Storage` if the store cannot be written
    #[instrument(skip(self, api))]
    pub async fn refresh_username<B: Backend>(&self, api: &B) -> Result<String, AuthError> {
        let token = self.token().ok_or(AuthError::NotLoggedIn)?;

        match api.me(&token).await {
            Ok(profile) => {
                self.store.set(keys::USERNAME, &profile.username)?;
                Ok(profile.username)
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh username");
                self.store.remove(keys::USERNAME)?;
                Err(AuthError::from_api(AuthAction::Profile, e))
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read session from local storage");
                None
            }
        }
    }
}
