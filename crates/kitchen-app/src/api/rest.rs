//! `reqwest`-backed client for the order/product API.

use super::{ApiError, CatalogApi, OrdersApi, ProductQuery};
use crate::model::{
    Category, Order, OrderCreate, OrderId, OrderStatus, Product, ProductForm, ProductId,
    StatusUpdate,
};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// REST client rooted at the API base URL.
///
/// Responses are never cached: every listing goes to the network so the kitchen
/// and the salon always see the current catalog.
#[derive(Debug, Clone)]
pub struct RestApi {
    http: reqwest::Client,
    base_url: String,
}

impl RestApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::BaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::BaseUrl(format!("{base_url}: expected http or https")));
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Response, ApiError> {
        debug!(context, "Sending request");
        let response = request.send().await.map_err(|e| {
            warn!(context, error = %e, "Request failed");
            ApiError::from(e)
        })?;
        match response.status() {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(context.to_string())),
            s => {
                warn!(context, status = s.as_u16(), "Unexpected status");
                Err(ApiError::Status {
                    status: s.as_u16(),
                    context: context.to_string(),
                })
            }
        }
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, context).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("{context}: {e}")))
    }
}

#[async_trait]
impl OrdersApi for RestApi {
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.json(self.http.get(self.url("/api/orders")), "list orders")
            .await
    }

    async fn create_order(&self, order: OrderCreate) -> Result<Order, ApiError> {
        let request = self.http.post(self.url("/api/orders")).json(&order);
        self.json(request, "create order").await
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .http
            .patch(self.url(&format!("/api/orders/{id}/status")))
            .json(&StatusUpdate { status });
        self.send(request, "update order status").await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for RestApi {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let pairs = query.to_pairs();
        let mut request = self.http.get(self.url("/api/products"));
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        self.json(request, "list products").await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let request = self.http.get(self.url(&format!("/api/products/{id}")));
        self.json(request, "get product").await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let request = self.http.get(self.url("/api/products/categories"));
        self.json(request, "list categories").await
    }

    async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        let request = self.http.post(self.url("/api/products")).json(form);
        self.json(request, "create product").await
    }

    async fn update_product(&self, id: &ProductId, form: &ProductForm) -> Result<(), ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/api/products/{id}")))
            .json(form);
        self.send(request, "update product").await?;
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(&format!("/api/products/{id}")));
        self.send(request, "delete product").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(RestApi::new("not a url"), Err(ApiError::BaseUrl(_))));
        assert!(matches!(
            RestApi::new("ftp://kitchen.local"),
            Err(ApiError::BaseUrl(_))
        ));
        let api = RestApi::new("http://kitchen.local:5000/").unwrap();
        assert_eq!(api.base_url(), "http://kitchen.local:5000");
        assert_eq!(api.url("/api/orders"), "http://kitchen.local:5000/api/orders");
    }
}
