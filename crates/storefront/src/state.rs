//! Application state shared by the storefront front ends.

use std::sync::Arc;

use crate::api::PharmacyClient;
use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::session::SessionStore;
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// Everything a storefront command needs, constructed once at startup.
///
/// This struct is cheaply cloneable via `Arc`. The session and cart stores
/// share one [`KeyValueStore`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    client: PharmacyClient,
    session: SessionStore,
    cart: CartStore,
}

impl AppState {
    /// Create the application state with the file-backed store from
    /// `config.storage_path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing store file cannot be read.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StorageError> {
        let store = FileStore::open(&config.storage_path)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Create the application state over an explicit store.
    #[must_use]
    pub fn with_store(config: &StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let client = PharmacyClient::new(config);
        let session = SessionStore::new(Arc::clone(&store));
        let cart = CartStore::new(store);

        Self {
            inner: Arc::new(AppStateInner {
                client,
                session,
                cart,
            }),
        }
    }

    /// Get a reference to the pharmacy API client.
    #[must_use]
    pub fn client(&self) -> &PharmacyClient {
        &self.inner.client
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
