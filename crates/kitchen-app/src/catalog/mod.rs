//! # Catalog Browsing
//!
//! Toolbar state, input debouncing and the quick search used by the salon and
//! categories surfaces.

pub mod debounce;
pub mod filter;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use filter::CatalogFilter;

use crate::api::{ApiError, CatalogApi, ProductQuery};
use crate::model::Product;
use tracing::{debug, instrument};

/// Result cap for quick search.
pub const QUICK_SEARCH_TAKE: u32 = 30;

/// Macro categories offered as tiles on the categories surface.
pub const FEATURED_CATEGORIES: [&str; 7] = [
    "Saladas",
    "Carnes",
    "Acompanhamentos",
    "Guarnições",
    "Frituras",
    "Porções",
    "Especiais",
];

/// Searches by name or tag. A blank query returns nothing without a request.
#[instrument(skip(api))]
pub async fn quick_search(api: &dyn CatalogApi, q: &str) -> Result<Vec<Product>, ApiError> {
    let q = q.trim();
    if q.is_empty() {
        debug!("Blank query, skipping request");
        return Ok(Vec::new());
    }
    api.list_products(&ProductQuery::search(q, QUICK_SEARCH_TAKE))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryApi;

    #[tokio::test]
    async fn blank_query_makes_no_request() {
        let api = InMemoryApi::demo();
        api.set_offline(true);
        // Would fail with Unavailable if a request were made
        assert!(quick_search(&api, "   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn searches_by_name() {
        let api = InMemoryApi::demo();
        let found = quick_search(&api, " frita ").await.unwrap();
        assert_eq!(found.len(), 2);
    }
}
