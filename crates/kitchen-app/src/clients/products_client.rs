//! # Products Client
//!
//! Catalog management straight against the API. There is no replica here: every
//! listing is a fresh fetch, and the operator refreshes after each mutation.
use crate::api::{ApiError, CatalogApi, ProductQuery};
use crate::model::{Category, Product, ProductForm, ProductId};
use crate::notify::Notifier;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct ProductsClient {
    api: Arc<dyn CatalogApi>,
    notifier: Notifier,
}

impl ProductsClient {
    pub fn new(api: Arc<dyn CatalogApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    fn failed<T>(&self, title: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            warn!(error = %e, "{title}");
            self.notifier.failure(title, Some(e.to_string()));
        }
        result
    }

    /// Every product as the API lists it by default.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        debug!("Sending request");
        let result = self.api.list_products(&ProductQuery::default()).await;
        self.failed("Could not load products", result)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        let result = self.api.get_product(id).await;
        self.failed("Could not load product", result)
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let result = self.api.list_categories().await;
        self.failed("Could not load categories", result)
    }

    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create(&self, form: &ProductForm) -> Result<Product, ApiError> {
        debug!("Sending request");
        let result = self.api.create_product(form).await;
        let product = self.failed("Could not create product", result)?;
        self.notifier
            .success("Product created", Some(product.name.clone()));
        Ok(product)
    }

    /// Flips availability with a full-replacement update built from `product`.
    /// Returns the product as it now stands.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn toggle_available(&self, product: &Product) -> Result<Product, ApiError> {
        let form = product.toggled_availability();
        let result = self.api.update_product(&product.id, &form).await;
        self.failed("Could not update product", result)?;
        Ok(form.into_product(product.id.clone()))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let result = self.api.delete_product(id).await;
        self.failed("Could not delete product", result)
    }
}
