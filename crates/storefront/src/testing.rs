//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use pharmacy_core::{Drug, DrugId, Price, UserId, Username};
use reqwest::StatusCode;
use secrecy::SecretString;

use crate::api::{ApiError, Backend, Profile};

/// Build a drug; price in cents.
pub fn drug(id: i64, name: &str, form: &str, symptom: &str, cents: i64) -> Drug {
    Drug {
        id: DrugId::new(id),
        code: format!("D{id:03}"),
        name: name.to_string(),
        manufacturer: "Acme Pharma".to_string(),
        available_units: 100,
        dose: "500mg".to_string(),
        form: form.to_string(),
        price: Price::from_cents(cents).unwrap_or(Price::ZERO),
        symptom: symptom.to_string(),
    }
}

/// How every call to a [`MockBackend`] should fail.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Non-success status, optionally with a `message` body.
    Status(StatusCode, Option<&'static str>),
    /// A response that could not be decoded (stands in for transport errors).
    Garbled,
}

/// In-memory [`Backend`] that counts calls.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub drugs: Vec<Drug>,
    pub profile_name: Option<String>,
    pub failure: Option<Failure>,
    calls: AtomicUsize,
}

impl MockBackend {
    pub fn with_drugs(drugs: Vec<Drug>) -> Self {
        Self {
            drugs,
            ..Self::default()
        }
    }

    pub fn with_profile_name(name: &str) -> Self {
        Self {
            profile_name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Number of backend calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn call(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            None => Ok(()),
            Some(Failure::Status(status, message)) => Err(ApiError::Status {
                status: *status,
                message: message.map(str::to_string),
            }),
            Some(Failure::Garbled) => Err(ApiError::Parse(garbled())),
        }
    }
}

/// The decode error for an HTML error page served where JSON was expected.
#[allow(clippy::unwrap_used)]
fn garbled() -> serde_json::Error {
    serde_json::from_str::<Profile>("<html>").unwrap_err()
}

impl Backend for MockBackend {
    async fn login(
        &self,
        username: &Username,
        _password: &SecretString,
    ) -> Result<SecretString, ApiError> {
        self.call()?;
        Ok(SecretString::from(format!("token-for-{username}")))
    }

    async fn signup(
        &self,
        _username: &Username,
        _password: &SecretString,
    ) -> Result<UserId, ApiError> {
        self.call()?;
        Ok(UserId::new(1))
    }

    async fn me(&self, _token: &SecretString) -> Result<Profile, ApiError> {
        self.call()?;
        Ok(Profile {
            username: self
                .profile_name
                .clone()
                .unwrap_or_else(|| "server-name".to_string()),
        })
    }

    async fn drugs(&self, _token: &SecretString) -> Result<Vec<Drug>, ApiError> {
        self.call()?;
        Ok(self.drugs.clone())
    }

    async fn drug(&self, _token: &SecretString, id: DrugId) -> Result<Drug, ApiError> {
        self.call()?;
        self.drugs
            .iter()
            .find(|drug| drug.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: None,
            })
    }
}
