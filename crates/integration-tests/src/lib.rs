//! Integration tests for the pharmacy storefront.
//!
//! The tests drive the real [`PharmacyClient`] over HTTP against
//! [`MockPharmacy`], an in-process `axum` server bound to an ephemeral port
//! that implements the five backend endpoints with in-memory users and a
//! fixed drug list.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pharmacy-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pharmacy_core::{Drug, DrugId, Price};
use pharmacy_storefront::api::PharmacyClient;
use pharmacy_storefront::config::{ConfigError, StorefrontConfig};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Message the mock sends for bad credentials.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Message the mock sends when signing up an existing username.
pub const USERNAME_TAKEN: &str = "Username already exists";

// =============================================================================
// MockPharmacy
// =============================================================================

/// Running mock backend. The server stops when this is dropped.
pub struct MockPharmacy {
    base_url: Url,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

#[derive(Default)]
struct MockState {
    /// username -> password
    users: Mutex<HashMap<String, String>>,
    /// token -> username
    tokens: Mutex<HashMap<String, String>>,
    drugs: Vec<Drug>,
    next_id: AtomicI64,
    requests: AtomicUsize,
}

impl MockPharmacy {
    /// Start a mock backend serving `drugs`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if no local port can be bound.
    pub async fn start(drugs: Vec<Drug>) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            drugs,
            next_id: AtomicI64::new(1),
            ..MockState::default()
        });

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/users", post(signup))
            .route("/api/users/me", get(me))
            .route("/api/drugs", get(drugs_index))
            .route("/api/drugs/{id}", get(drug_show))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = base_url_for(listener.local_addr()?)?;

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    /// Base URL of the running server (ends with `/`).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Storefront configuration pointing at this server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the server URL is rejected.
    pub fn config(&self) -> Result<StorefrontConfig, ConfigError> {
        let url = self.base_url.to_string();
        StorefrontConfig::from_vars(|key| (key == "PHARMACY_API_URL").then(|| url.clone()))
    }

    /// A client for this server.
    #[must_use]
    pub fn client(&self) -> PharmacyClient {
        PharmacyClient::with_base_url(self.base_url.clone())
    }

    /// Register an account directly, bypassing `POST /api/users`.
    pub fn add_user(&self, username: &str, password: &str) {
        self.state
            .users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(username.to_string(), password.to_string());
    }

    /// Whether `username` has an account.
    #[must_use]
    pub fn has_user(&self, username: &str) -> bool {
        self.state
            .users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(username)
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockPharmacy {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A base URL on which nothing is listening.
///
/// # Errors
///
/// Returns an I/O error if no local port can be bound.
pub async fn unreachable_base_url() -> std::io::Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    base_url_for(addr)
}

fn base_url_for(addr: SocketAddr) -> std::io::Result<Url> {
    Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)
}

// =============================================================================
// Fixtures
// =============================================================================

/// A small catalog covering every form icon and overlapping symptoms.
#[must_use]
pub fn sample_drugs() -> Vec<Drug> {
    vec![
        sample_drug(1, "Paracetamol", "Tablet", "500mg", "Fever, Headache", 999),
        sample_drug(2, "Cough Syrup", "Syrup", "10ml", "Cough", 550),
        sample_drug(3, "Ibuprofen", "Tablet", "200mg", "Headache, Pain", 750),
        sample_drug(4, "Insulin", "Injection", "100IU", "Diabetes", 2500),
    ]
}

fn sample_drug(id: i64, name: &str, form: &str, dose: &str, symptom: &str, cents: i64) -> Drug {
    Drug {
        id: DrugId::new(id),
        code: format!("{}{id:03}", name.chars().take(3).collect::<String>().to_uppercase()),
        name: name.to_string(),
        manufacturer: "Acme Pharma".to_string(),
        available_units: 50,
        dose: dose.to_string(),
        form: form.to_string(),
        price: Price::from_cents(cents).unwrap_or(Price::ZERO),
        symptom: symptom.to_string(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// The username owning the request's bearer token.
fn authenticate(state: &MockState, headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;

    state
        .tokens
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(token)
        .cloned()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Credentials>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let valid = state
        .users
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&body.username)
        .is_some_and(|password| *password == body.password);
    if !valid {
        return error(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    }

    let token = format!("token-{}-{}", body.username, state.next_id.fetch_add(1, Ordering::SeqCst));
    state
        .tokens
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(token.clone(), body.username);

    Json(json!({ "token": token })).into_response()
}

async fn signup(State(state): State<Arc<MockState>>, Json(body): Json<Credentials>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if body.password.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Password is required");
    }

    let mut users = state.users.lock().unwrap_or_else(PoisonError::into_inner);
    if users.contains_key(&body.username) {
        return error(StatusCode::CONFLICT, USERNAME_TAKEN);
    }
    users.insert(body.username, body.password);

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    match authenticate(&state, &headers) {
        Some(username) => Json(json!({ "username": username })).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn drugs_index(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if authenticate(&state, &headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(&state.drugs).into_response()
}

async fn drug_show(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if authenticate(&state, &headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state
        .drugs
        .iter()
        .find(|drug| drug.id == DrugId::new(id))
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |drug| Json(drug).into_response(),
        )
}
