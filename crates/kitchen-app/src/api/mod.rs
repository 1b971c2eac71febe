//! # Order/Product API
//!
//! The external REST API is the system of record; everything in this crate is a
//! view over it. The API is split along the two concerns that consume it:
//!
//! - [`OrdersApi`] - used by the kitchen board and by order submission
//! - [`CatalogApi`] - used by the salon cards, search and the products surface
//!
//! Both are `async_trait` seams so actors can hold an `Arc<dyn ...>` and tests
//! can substitute the [`InMemoryApi`].
//!
//! ## Implementations
//!
//! - [`RestApi`] - `reqwest` client against a base URL
//! - [`InMemoryApi`] - process-local state, optionally publishing hub events

pub mod error;
pub mod memory;
pub mod query;
pub mod rest;

pub use error::ApiError;
pub use memory::InMemoryApi;
pub use query::{ProductQuery, SortKey};
pub use rest::RestApi;

use crate::model::{
    Category, Order, OrderCreate, OrderId, OrderStatus, Product, ProductForm, ProductId,
};
use async_trait::async_trait;

#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// `GET /api/orders`
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// `POST /api/orders`
    async fn create_order(&self, order: OrderCreate) -> Result<Order, ApiError>;

    /// `PATCH /api/orders/{id}/status`
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus)
        -> Result<(), ApiError>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /api/products` with filters.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError>;

    /// `GET /api/products/{id}`
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError>;

    /// `GET /api/products/categories`
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    /// `POST /api/products`
    async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError>;

    /// `PUT /api/products/{id}`
    async fn update_product(&self, id: &ProductId, form: &ProductForm) -> Result<(), ApiError>;

    /// `DELETE /api/products/{id}`
    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError>;
}

/// Both halves of the API behind one handle.
pub trait KitchenApi: OrdersApi + CatalogApi {}

impl<T: OrdersApi + CatalogApi> KitchenApi for T {}
