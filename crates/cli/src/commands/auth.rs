//! Session commands: login, signup, logout, profile.

use std::io::Write;

use pharmacy_storefront::pages;
use pharmacy_storefront::state::AppState;
use secrecy::SecretString;

use super::Result;

/// Log in and store the session.
pub async fn login(
    state: &AppState,
    username: &str,
    password: String,
    out: &mut impl Write,
) -> Result<()> {
    let password = SecretString::from(password);
    state
        .session()
        .login(state.client(), username, &password)
        .await?;

    let name = state.session().username().unwrap_or_default();
    writeln!(out, "Logged in as {name}")?;
    Ok(())
}

/// Create an account. The user logs in separately afterwards.
pub async fn signup(
    state: &AppState,
    username: &str,
    password: String,
    confirm_password: String,
    out: &mut impl Write,
) -> Result<()> {
    let password = SecretString::from(password);
    let confirm_password = SecretString::from(confirm_password);
    state
        .session()
        .signup(state.client(), username, &password, &confirm_password)
        .await?;

    writeln!(out, "Account created. Log in with `pharmacy login`.")?;
    Ok(())
}

/// Forget the session and the cart.
pub fn logout(state: &AppState, out: &mut impl Write) -> Result<()> {
    state.session().logout(state.cart())?;
    writeln!(out, "Logged out")?;
    Ok(())
}

/// Show the stored username and a cart summary.
pub async fn profile(state: &AppState, refresh: bool, out: &mut impl Write) -> Result<()> {
    let view = pages::load_profile(state.client(), state.session(), state.cart(), refresh).await;

    match view.username {
        Some(name) => writeln!(out, "Username: {name}")?,
        None => writeln!(out, "Not logged in")?,
    }
    writeln!(
        out,
        "Cart: {} item(s), total {}",
        view.cart_items, view.cart_total
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pharmacy_storefront::config::StorefrontConfig;
    use pharmacy_storefront::storage::{KeyValueStore, MemoryStore, keys};

    use super::*;

    fn state_with(store: Arc<MemoryStore>) -> AppState {
        let config = StorefrontConfig::from_vars(|_| None).unwrap();
        AppState::with_store(&config, store)
    }

    #[test]
    fn test_logout_clears_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::TOKEN, "abc").unwrap();
        store.set(keys::USERNAME, "alice").unwrap();
        store.set(keys::CART, "[]").unwrap();
        let state = state_with(store.clone());

        let mut out = Vec::new();
        logout(&state, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Logged out\n");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_profile_without_refresh_is_offline() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::TOKEN, "abc").unwrap();
        store.set(keys::USERNAME, "alice").unwrap();
        let state = state_with(store);

        let mut out = Vec::new();
        profile(&state, false, &mut out).await.unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Username: alice"));
        assert!(output.contains("Cart: 0 item(s), total $0.00"));
    }

    #[tokio::test]
    async fn test_signup_mismatch_fails_before_network() {
        let state = state_with(Arc::new(MemoryStore::new()));

        let mut out = Vec::new();
        let err = signup(&state, "bob", "one".into(), "two".into(), &mut out)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Passwords do not match");
        assert!(out.is_empty());
    }
}
