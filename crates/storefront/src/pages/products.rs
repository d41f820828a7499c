//! Product list and product detail.

use pharmacy_core::{CatalogFilter, Drug, DrugId, FilterOptions};
use tracing::{instrument, warn};

use super::Page;
use crate::api::Backend;
use crate::error::add_breadcrumb;
use crate::session::SessionStore;

/// The loaded catalog with its filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductsView {
    drugs: Vec<Drug>,
    options: FilterOptions,
    filter: CatalogFilter,
}

impl ProductsView {
    /// Wrap a freshly loaded drug list; options are derived from it.
    #[must_use]
    pub fn new(drugs: Vec<Drug>, filter: CatalogFilter) -> Self {
        let options = FilterOptions::from_drugs(&drugs);
        Self {
            drugs,
            options,
            filter,
        }
    }

    /// Every loaded drug, in backend order.
    #[must_use]
    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    /// Drop-down values for the form and symptom selectors.
    #[must_use]
    pub const fn options(&self) -> &FilterOptions {
        &self.options
    }

    #[must_use]
    pub const fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    /// Change the selectors or search text without refetching.
    pub fn set_filter(&mut self, filter: CatalogFilter) {
        self.filter = filter;
    }

    /// Drugs passing the current filter, in backend order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Drug> {
        self.filter.apply(&self.drugs)
    }
}

/// Load the products page.
///
/// Requires a session. A failed fetch is logged and shown as an empty
/// catalog.
#[instrument(skip(api, session))]
pub async fn load_products<B: Backend>(
    api: &B,
    session: &SessionStore,
    filter: CatalogFilter,
) -> Page<ProductsView> {
    let Some(token) = session.token() else {
        return Page::LoginRequired;
    };

    let drugs = api.drugs(&token).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load drugs");
        Vec::new()
    });

    add_breadcrumb("navigation", "Viewed products page", None);
    Page::Ready(ProductsView::new(drugs, filter))
}

/// Load a single product.
///
/// Requires a session. Any failure, including a non-success status, is
/// logged and reported as [`Page::NotFound`].
#[instrument(skip(api, session, id), fields(drug_id = %id))]
pub async fn load_product_detail<B: Backend>(
    api: &B,
    session: &SessionStore,
    id: DrugId,
) -> Page<Drug> {
    let Some(token) = session.token() else {
        return Page::LoginRequired;
    };

    match api.drug(&token, id).await {
        Ok(drug) => {
            let id = id.to_string();
            add_breadcrumb(
                "navigation",
                "Viewed product page",
                Some(&[("drug_id", id.as_str())]),
            );
            Page::Ready(drug)
        }
        Err(e) => {
            warn!(error = %e, "Failed to load product");
            Page::NotFound
        }
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

    fn catalog() -> Vec<Drug> {
        vec![
            drug(1, "Paracetamol", "Tablet", "Fever, Headache", 999),
            drug(2, "Cough Syrup", "Syrup", "Cough", 550),
            drug(3, "Ibuprofen", "Tablet", "Headache, Pain", 750),
        ]
    }

    fn logged_in() -> SessionStore {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::TOKEN, "abc").unwrap();
        SessionStore::new(store)
    }

    fn logged_out() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_products_require_login() {
        let api = MockBackend::with_drugs(catalog());
        let page = load_products(&api, &logged_out(), CatalogFilter::all()).await;
        assert!(page.is_login_required());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_products_filtered_with_options() {
        let api = MockBackend::with_drugs(catalog());
        let filter = CatalogFilter::new("All", "headache", "");

        let view = load_products(&api, &logged_in(), filter)
            .await
            .ready()
            .unwrap();

        assert_eq!(view.drugs().len(), 3);
        assert_eq!(view.options().forms, vec!["Tablet", "Syrup"]);
        assert_eq!(
            view.options().symptoms,
            vec!["Fever", "Headache", "Cough", "Pain"]
        );
        let names: Vec<_> = view.visible().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol", "Ibuprofen"]);
    }

    #[tokio::test]
    async fn test_set_filter_refilters_without_fetching() {
        let api = MockBackend::with_drugs(catalog());
        let mut view = load_products(&api, &logged_in(), CatalogFilter::all())
            .await
            .ready()
            .unwrap();
        assert_eq!(view.visible().len(), 3);

        view.set_filter(CatalogFilter::new("syrup", "All", ""));
        assert_eq!(view.visible().len(), 1);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_products_failure_is_empty_catalog() {
        let api = MockBackend::failing(Failure::Status(StatusCode::INTERNAL_SERVER_ERROR, None));
        let view = load_products(&api, &logged_in(), CatalogFilter::all())
            .await
            .ready()
            .unwrap();
        assert!(view.drugs().is_empty());
        assert!(view.options().forms.is_empty());
    }

    #[tokio::test]
    async fn test_product_detail() {
        let api = MockBackend::with_drugs(catalog());
        let page = load_product_detail(&api, &logged_in(), DrugId::new(2)).await;
        assert_eq!(page.ready().unwrap().name, "Cough Syrup");
    }

    #[tokio::test]
    async fn test_product_detail_not_found() {
        let api = MockBackend::with_drugs(catalog());
        let page = load_product_detail(&api, &logged_in(), DrugId::new(42)).await;
        assert_eq!(page, Page::NotFound);

        let api = MockBackend::failing(Failure::Garbled);
        let page = load_product_detail(&api, &logged_in(), DrugId::new(1)).await;
        assert_eq!(page, Page::NotFound);
    }

    #[tokio::test]
    async fn test_product_detail_requires_login() {
        let api = MockBackend::with_drugs(catalog());
        let page = load_product_detail(&api, &logged_out(), DrugId::new(1)).await;
        assert_eq!(page, Page::LoginRequired);
        assert_eq!(api.calls(), 0);
    }
}
