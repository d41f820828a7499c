//! Catalog, product detail and cart persistence over HTTP.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pharmacy_core::{CatalogFilter, DrugId};
use pharmacy_integration_tests::{MockPharmacy, sample_drugs};
use pharmacy_storefront::api::{ApiError, Backend};
use pharmacy_storefront::pages::{self, Page};
use pharmacy_storefront::state::AppState;
use pharmacy_storefront::storage::{FileStore, MemoryStore};
use reqwest::StatusCode;
use secrecy::SecretString;
use tempfile::TempDir;

async fn logged_in(mock: &MockPharmacy) -> AppState {
    mock.add_user("alice", "pw");
    let state = AppState::with_store(&mock.config().unwrap(), Arc::new(MemoryStore::new()));
    state
        .session()
        .login(state.client(), "alice", &SecretString::from("pw"))
        .await
        .unwrap();
    state
}

#[tokio::test]
async fn test_products_require_login() {
    let mock = MockPharmacy::start(sample_drugs()).await.unwrap();
    let state = AppState::with_store(&mock.config().unwrap(), Arc::new(MemoryStore::new()));

    let page = pages::load_products(state.client(), state.session(), CatalogFilter::all()).await;

    assert!(page.is_login_required());
    assert_eq!(mock.requests(), 0);
}

#[tokio::test]
async fn test_products_filter_and_options() {
    let mock = MockPharmacy::start(sample_drugs()).await.unwrap();
    let state = logged_in(&mock).await;

    let filter = CatalogFilter::new("tablet", "HEADACHE", " ibu ");
    let view = pages::load_products(state.client(), state.session(), filter)
        .await
        .ready()
        .unwrap();

    assert_eq!(view.drugs().len(), 4);
    assert_eq!(view.options().forms, vec!["Tablet", "Syrup", "Injection"]);
    assert_eq!(
        view.options().symptoms,
        vec!["Fever", "Headache", "Cough", "Pain", "Diabetes"]
    );

    let visible: Vec<_> = view.visible().iter().map(|d| d.id).collect();
    assert_eq!(visible, vec![DrugId::new(3)]);
}

#[tokio::test]
async fn test_prices_survive_the_wire() {
    let mock = MockPharmacy::start(sample_drugs()).await.unwrap();
    let state = logged_in(&mock).await;
    let token = state.session().token().unwrap();

    let drug = state.client().drug(&token, DrugId::new(1)).await.unwrap();
    assert_eq!(drug.price.to_string(), "$9.99");
    assert_eq!(drug.available_units, 50);
}

#[tokio::test]
async fn test_product_detail_and_not_found() {
    let mock = MockPharmacy::start(sample_drugs()).await.unwrap();
    let state = logged_in(&mock).await;

    let page = pages::load_product_detail(state.client(), state.session(), DrugId::new(4)).await;
    assert_eq!(page.ready().unwrap().name, "Insulin");

    let page = pages::load_product_detail(state.client(), state.session(), DrugId::new(99)).await;
    assert_eq!(page, Page::NotFound);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let mock = MockPharmacy::start(sample_drugs()).await.unwrap();

    let err = mock
        .client()
        .drugs(&SecretString::from("forged"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn test_cart_and_session_persist_across_restarts() {
    let mock = MockPharmacy::start(sample_drugs()).await.unwrap();
    mock.add_user("alice", "pw");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");

    {
        let state = AppState::with_store(
            &mock.config().unwrap(),
            Arc::new(FileStore::open(&path).unwrap()),
        );
        state
            .session()
            .login(state.client(), "alice", &SecretString::from("pw"))
            .await
            .unwrap();

        for id in [1, 2, 1] {
            let drug = pages::load_product_detail(state.client(), state.session(), DrugId::new(id))
                .await
                .ready()
                .unwrap();
            state.cart().add_or_increment(&drug).unwrap();
        }
    }

    // A new process opens the same file
    let state = AppState::with_store(
        &mock.config().unwrap(),
        Arc::new(FileStore::open(&path).unwrap()),
    );
    assert!(state.session().is_authenticated());
    assert_eq!(state.session().username().as_deref(), Some("alice"));

    let cart = state.cart().load();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.get(DrugId::new(1)).unwrap().quantity, 2);
    assert_eq!(cart.total().to_string(), "$25.48");

    state.session().logout(state.cart()).unwrap();

    let state = AppState::with_store(
        &mock.config().unwrap(),
        Arc::new(FileStore::open(&path).unwrap()),
    );
    assert!(!state.session().is_authenticated());
    assert!(state.cart().load().is_empty());
}
