//! Cart persisted in the local store.
//!
//! The whole cart lives under the `cart` key as a JSON array of lines.
//! Every mutation re-reads that value, applies the change with the pure
//! [`Cart`] operations and writes the full list back.

use std::sync::Arc;

use pharmacy_core::{Cart, Drug, DrugId, Price};
use tracing::debug;

use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Cart backed by a [`KeyValueStore`].
#[derive(Clone)]
pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

impl CartStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted cart. Missing or malformed data is an empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        storage::load_json(self.store.as_ref(), keys::CART).unwrap_or_default()
    }

    /// Add one unit of `drug`, appending a new line if it is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be written.
    pub fn add_or_increment(&self, drug: &Drug) -> Result<Cart, StorageError> {
        debug!(drug_id = %drug.id, "Adding to cart");
        self.update(|cart| cart.add_or_increment(drug))
    }

    /// Adjust a line's quantity by `delta`, never going below 1.
    ///
    /// Unknown ids leave the cart unchanged (it is still rewritten).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be written.
    pub fn change_quantity(&self, id: DrugId, delta: i64) -> Result<Cart, StorageError> {
        self.update(|cart| {
            if !cart.change_quantity(id, delta) {
                debug!(drug_id = %id, "Quantity change for drug not in cart");
            }
        })
    }

    /// Drop the line for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be written.
    pub fn remove(&self, id: DrugId) -> Result<Cart, StorageError> {
        self.update(|cart| {
            cart.remove(id);
        })
    }

    /// Delete the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::CART)
    }

    /// Total of the persisted cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.load().total()
    }

    /// Number of units in the persisted cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.load().item_count()
    }

    fn update(&self, mutate: impl FnOnce(&mut Cart)) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        mutate(&mut cart);
        storage::save_json(self.store.as_ref(), keys::CART, &cart)?;
        Ok(cart)
    }
}
