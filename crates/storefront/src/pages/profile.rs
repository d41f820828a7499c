//! Profile page.

use pharmacy_core::Price;
use tracing::{instrument, warn};

use crate::api::Backend;
use crate::cart::CartStore;
use crate::session::SessionStore;

/// What the profile page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    /// Stored display name; `None` when logged out.
    pub username: Option<String>,
    pub cart_items: u32,
    pub cart_total: Price,
}

/// Load the profile page.
///
/// With `refresh`, a logged-in session first re-reads its username from the
/// backend; a failed refresh is logged and leaves no username. The page is
/// not gated: a logged-out profile simply has no username.
#[instrument(skip(api, session, cart))]
pub async fn load_profile<B: Backend>(
    api: &B,
    session: &SessionStore,
    cart: &CartStore,
    refresh: bool,
) -> ProfileView {
    if refresh
        && session.is_authenticated()
        && let Err(e) = session.refresh_username(api).await
    {
        warn!(error = %e, "Profile refresh failed");
    }

    let cart_state = cart.load();
    ProfileView {
        username: session.username(),
        cart_items: cart_state.item_count(),
        cart_total: cart_state.total(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, keys};
    use crate::testing::{Failure, MockBackend, drug};

    fn stores(token: Option<&str>, username: Option<&str>) -> (SessionStore, CartStore) {
        let store = Arc::new(MemoryStore::new());
        if let Some(token) = token {
            store.set(keys::TOKEN, token).unwrap();
        }
        if let Some(username) = username {
            store.set(keys::USERNAME, username).unwrap();
        }
        (SessionStore::new(store.clone()), CartStore::new(store))
    }

    #[tokio::test]
    async fn test_logged_out_profile_has_no_username() {
        let (session, cart) = stores(None, None);
        let api = MockBackend::default();

        let view = load_profile(&api, &session, &cart, true).await;

        assert_eq!(view.username, None);
        assert_eq!(view.cart_items, 0);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_stored_username_without_refresh() {
        let (session, cart) = stores(Some("abc"), Some("alice"));
        cart.add_or_increment(&drug(1, "Paracetamol", "Tablet", "Fever", 1000))
            .unwrap();
        let api = MockBackend::default();

        let view = load_profile(&api, &session, &cart, false).await;

        assert_eq!(view.username.as_deref(), Some("alice"));
        assert_eq!(view.cart_items, 1);
        assert_eq!(view.cart_total.to_string(), "$10.00");
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_replaces_username() {
        let (session, cart) = stores(Some("abc"), Some("alice"));
        let api = MockBackend::with_profile_name("Alice Smith");

        let view = load_profile(&api, &session, &cart, true).await;
        assert_eq!(view.username.as_deref(), Some("Alice Smith"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_username() {
        let (session, cart) = stores(Some("abc"), Some("alice"));
        let api = MockBackend::failing(Failure::Status(StatusCode::UNAUTHORIZED, None));

        let view = load_profile(&api, &session, &cart, true).await;
        assert_eq!(view.username, None);
    }
}
