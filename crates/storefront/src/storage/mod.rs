//! Local key-value storage.
//!
//! The storefront keeps its client state (auth token, display username,
//! cart) in a small string-to-string store, the same model as browser
//! local storage. Two backends are provided:
//!
//! - [`MemoryStore`] - process-local, used by tests and throwaway sessions
//! - [`FileStore`] - a JSON object on disk, so state survives between CLI runs
//!
//! Individual `get`/`set`/`remove` calls are atomic; nothing coordinates
//! concurrent writers in different processes (last write wins).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when reading or writing the local store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage with browser local-storage semantics.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete several values in one write where the backend allows it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        keys.iter().try_for_each(|key| self.remove(key))
    }
}

/// Keys used in the local store.
pub mod keys {
    /// Bearer token returned by `POST /api/auth/login`.
    pub const TOKEN: &str = "token";

    /// Display name of the logged-in user.
    pub const USERNAME: &str = "username";

    /// JSON array of cart lines.
    pub const CART: &str = "cart";
}

/// Read and deserialize a JSON value.
///
/// Unreadable storage and unparseable values are logged and reported as
/// absent, so corrupted local state degrades to a fresh start.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read local storage");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed value in local storage");
            None
        }
    }
}

/// Serialize a value as JSON and store it.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the write fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
