//! HTTP implementation of [`Backend`] using `reqwest`.

use std::sync::Arc;

use pharmacy_core::{Drug, DrugId, UserId, Username};
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::types::{CredentialsBody, ErrorBody, LoginResponse, Profile, SignupResponse};
use super::{ApiError, Backend};
use crate::config::StorefrontConfig;

/// How much of an unexpected response body to include in logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// PharmacyClient
// =============================================================================

/// Client for the pharmacy backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct PharmacyClient {
    inner: Arc<PharmacyClientInner>,
}

struct PharmacyClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for PharmacyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PharmacyClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PharmacyClient {
    /// Create a client for the configured backend.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self::with_base_url(config.api_url.clone())
    }

    /// Create a client for an explicit base URL (should end with `/`).
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            inner: Arc::new(PharmacyClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = ErrorBody::message_from(&body);
            tracing::warn!(
                status = %status,
                message = message.as_deref().unwrap_or(""),
                "Pharmacy API returned non-success status"
            );
            return Err(ApiError::Status { status, message });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse pharmacy API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &SecretString) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let request = self
            .inner
            .client
            .get(url)
            .bearer_auth(token.expose_secret());
        self.send(request).await
    }

    async fn post_credentials<T: DeserializeOwned>(
        &self,
        path: &str,
        username: &Username,
        password: &SecretString,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let body = CredentialsBody {
            username: username.as_str(),
            password: password.expose_secret(),
        };
        let request = self.inner.client.post(url).json(&body);
        self.send(request).await
    }
}

impl Backend for PharmacyClient {
    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<SecretString, ApiError> {
        let response: LoginResponse = self
            .post_credentials("api/auth/login", username, password)
            .await?;
        debug!("Login accepted");
        Ok(SecretString::from(response.token))
    }

    #[instrument(skip(self, password), fields(username = %username))]
    async fn signup(&self, username: &Username, password: &SecretString) -> Result<UserId, ApiError> {
        let response: SignupResponse = self
            .post_credentials("api/users", username, password)
            .await?;
        debug!(user_id = %response.id, "Account created");
        Ok(response.id)
    }

    #[instrument(skip(self, token))]
    async fn me(&self, token: &SecretString) -> Result<Profile, ApiError> {
        self.get("api/users/me", token).await
    }

    #[instrument(skip(self, token))]
    async fn drugs(&self, token: &SecretString) -> Result<Vec<Drug>, ApiError> {
        let drugs: Vec<Drug> = self.get("api/drugs", token).await?;
        debug!(count = drugs.len(), "Fetched drugs");
        Ok(drugs)
    }

    #[instrument(skip(self, token), fields(drug_id = %id))]
    async fn drug(&self, token: &SecretString, id: DrugId) -> Result<Drug, ApiError> {
        self.get(&format!("api/drugs/{id}"), token).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let client = PharmacyClient::with_base_url(Url::parse("http://localhost:8080/").unwrap());
        assert_eq!(
            client.endpoint("api/drugs/7").unwrap().as_str(),
            "http://localhost:8080/api/drugs/7"
        );

        let client =
            PharmacyClient::with_base_url(Url::parse("https://example.com/pharmacy/").unwrap());
        assert_eq!(
            client.endpoint("api/auth/login").unwrap().as_str(),
            "https://example.com/pharmacy/api/auth/login"
        );
    }

    #[test]
    fn test_debug_shows_base_url_only() {
        let client = PharmacyClient::with_base_url(Url::parse("http://localhost:8080/").unwrap());
        let debug = format!("{client:?}");
        assert!(debug.contains("http://localhost:8080/"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then release an ephemeral port so nothing is listening on it
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PharmacyClient::with_base_url(Url::parse(&format!("http://{addr}/")).unwrap());
        let token = SecretString::from("t");
        let err = client.drugs(&token).await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
