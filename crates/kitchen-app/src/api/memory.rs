//! In-process stand-in for the order/product API.
//!
//! Backs `--offline` runs and the integration tests. Mutations of orders are
//! published as hub events when an event sender is attached, so a board fed by
//! this API behaves as it would against the real service.

use super::{ApiError, CatalogApi, OrdersApi, ProductQuery, SortKey};
use crate::hub::HubEvent;
use crate::model::{
    Category, DishType, Order, OrderCreate, OrderId, OrderItem, OrderStatus, Product, ProductForm,
    ProductId,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

#[derive(Default)]
struct State {
    products: Vec<Product>,
    orders: Vec<Order>,
    sold: HashMap<ProductId, u32>,
}

#[derive(Default)]
pub struct InMemoryApi {
    state: Mutex<State>,
    offline: AtomicBool,
    events: Option<broadcast::Sender<HubEvent>>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            state: Mutex::new(State {
                products,
                ..State::default()
            }),
            ..Self::default()
        }
    }

    /// Publishes every order mutation on `events`.
    pub fn with_events(mut self, events: broadcast::Sender<HubEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// A small catalog for offline runs.
    pub fn demo() -> Self {
        let product = |id: &str, name: &str, category: &str, prep: u32, dish_type: DishType| {
            ProductForm {
                name: name.into(),
                category: category.into(),
                prep_seconds: prep,
                dish_type,
                ..ProductForm::default()
            }
            .into_product(ProductId::from(id))
        };
        Self::with_products(vec![
            product("p-salada", "Salada da casa", "Saladas", 240, DishType::Dish),
            product("p-picanha", "Picanha na chapa", "Carnes", 900, DishType::Dish),
            product("p-arroz", "Arroz branco", "Acompanhamentos", 300, DishType::Portion),
            product("p-farofa", "Farofa", "Guarnições", 180, DishType::Portion),
            product("p-fritas", "Batata frita", "Frituras", 420, DishType::Portion),
            product("p-mandioca", "Mandioca frita", "Porções", 480, DishType::Portion),
            product("p-feijoada", "Feijoada", "Especiais", 1200, DishType::Dish),
        ])
    }

    /// Adds an order directly, without publishing an event.
    pub async fn seed_order(&self, order: Order) {
        self.state.lock().await.orders.push(order);
    }

    /// While offline every call fails with [`ApiError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ApiError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn publish(&self, event: HubEvent) {
        if let Some(events) = &self.events {
            debug!(event = event.target(), id = %event.order().id, "Publishing");
            // No subscribers is not an error
            let _ = events.send(event);
        }
    }
}

fn matches(product: &Product, query: &ProductQuery) -> bool {
    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        let hit = product.name.to_lowercase().contains(&needle)
            || product.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if !query.categories.is_empty() && !query.categories.contains(&product.category) {
        return false;
    }
    if query.only_available.unwrap_or(true) && !product.available {
        return false;
    }
    if query.recurring.is_some_and(|r| r != product.is_recurring) {
        return false;
    }
    if let Some(portion) = query.portion {
        if portion != (product.dish_type == DishType::Portion) {
            return false;
        }
    }
    if query.dish_type.is_some_and(|t| t != product.dish_type) {
        return false;
    }
    true
}

#[async_trait]
impl OrdersApi for InMemoryApi {
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.online()?;
        Ok(self.state.lock().await.orders.clone())
    }

    async fn create_order(&self, request: OrderCreate) -> Result<Order, ApiError> {
        self.online()?;
        let order = {
            let mut state = self.state.lock().await;
            let mut items = Vec::with_capacity(request.items.len());
            for line in &request.items {
                let product = state
                    .products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .ok_or_else(|| ApiError::NotFound(format!("product {}", line.product_id)))?;
                items.push(OrderItem {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity: line.quantity,
                    prep_seconds: product.prep_seconds,
                });
            }
            for line in &request.items {
                *state.sold.entry(line.product_id.clone()).or_default() += line.quantity;
            }
            let order = Order {
                id: OrderId(uuid::Uuid::new_v4().to_string()),
                created_at: Utc::now(),
                status: OrderStatus::Pending,
                is_urgent: request.is_urgent,
                items,
            };
            state.orders.push(order.clone());
            order
        };
        self.publish(HubEvent::OrderCreated(order.clone()));
        Ok(order)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        self.online()?;
        let updated = {
            let mut state = self.state.lock().await;
            let order = state
                .orders
                .iter_mut()
                .find(|o| &o.id == id)
                .ok_or_else(|| ApiError::NotFound(format!("order {id}")))?;
            order.status = status;
            order.clone()
        };
        self.publish(HubEvent::OrderUpdated(updated));
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for InMemoryApi {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.online()?;
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| matches(p, query))
            .cloned()
            .collect();

        let by_name = |a: &Product, b: &Product| a.name.to_lowercase().cmp(&b.name.to_lowercase());
        match query.sort.unwrap_or_default() {
            SortKey::Az => products.sort_by(by_name),
            SortKey::Sold => {
                let sold = |p: &Product| state.sold.get(&p.id).copied().unwrap_or(0);
                products.sort_by(|a, b| sold(b).cmp(&sold(a)).then_with(|| by_name(a, b)))
            }
            SortKey::Fast => products.sort_by(|a, b| {
                a.prep_seconds
                    .cmp(&b.prep_seconds)
                    .then_with(|| by_name(a, b))
            }),
        }
        if let Some(take) = query.take.filter(|t| *t > 0) {
            products.truncate(take as usize);
        }
        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.online()?;
        self.state
            .lock()
            .await
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("product {id}")))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.online()?;
        let state = self.state.lock().await;
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        for product in &state.products {
            *counts.entry(product.category.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, count)| Category {
                name: name.to_string(),
                count,
            })
            .collect())
    }

    async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        self.online()?;
        let product = form
            .clone()
            .into_product(ProductId(uuid::Uuid::new_v4().to_string()));
        self.state.lock().await.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &ProductId, form: &ProductForm) -> Result<(), ApiError> {
        self.online()?;
        let mut state = self.state.lock().await;
        let slot = state
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;
        *slot = form.clone().into_product(id.clone());
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.online()?;
        let mut state = self.state.lock().await;
        let before = state.products.len();
        state.products.retain(|p| &p.id != id);
        if state.products.len() == before {
            return Err(ApiError::NotFound(format!("product {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_and_sorts_the_catalog() {
        let api = InMemoryApi::demo();

        let portions = api
            .list_products(&ProductQuery {
                portion: Some(true),
                sort: Some(SortKey::Fast),
                ..ProductQuery::default()
            })
            .await
            .unwrap();
        let names: Vec<&str> = portions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Farofa", "Arroz branco", "Batata frita", "Mandioca frita"]);

        let found = api
            .list_products(&ProductQuery::search("FRITA", 1))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Batata frita");
    }

    #[tokio::test]
    async fn sold_sort_follows_orders() {
        let api = InMemoryApi::demo();
        api.create_order(OrderCreate::single(ProductId::from("p-farofa"), false))
            .await
            .unwrap();
        let sold = api
            .list_products(&ProductQuery {
                sort: Some(SortKey::Sold),
                take: Some(2),
                ..ProductQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(sold[0].id, ProductId::from("p-farofa"));
        assert_eq!(sold.len(), 2);
    }

    #[tokio::test]
    async fn availability_filter_defaults_on() {
        let api = InMemoryApi::demo();
        let salad = api.get_product(&ProductId::from("p-salada")).await.unwrap();
        api.update_product(&salad.id, &salad.toggled_availability())
            .await
            .unwrap();

        let visible = api.list_products(&ProductQuery::default()).await.unwrap();
        assert!(visible.iter().all(|p| p.id != salad.id));
        let all = api
            .list_products(&ProductQuery {
                only_available: Some(false),
                ..ProductQuery::default()
            })
            .await
            .unwrap();
        assert!(all.iter().any(|p| p.id == salad.id));
    }

    #[tokio::test]
    async fn order_mutations_are_published() {
        let (tx, mut rx) = broadcast::channel(8);
        let api = InMemoryApi::demo().with_events(tx);

        let order = api
            .create_order(OrderCreate::single(ProductId::from("p-arroz"), true))
            .await
            .unwrap();
        assert_eq!(order.items[0].product_name, "Arroz branco");
        assert!(matches!(rx.recv().await.unwrap(), HubEvent::OrderCreated(o) if o.id == order.id));

        api.update_order_status(&order.id, OrderStatus::Completed)
            .await
            .unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.order().status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn offline_fails_every_call() {
        let api = InMemoryApi::demo();
        api.set_offline(true);
        assert!(matches!(api.list_orders().await, Err(ApiError::Unavailable)));
        assert!(matches!(api.list_categories().await, Err(ApiError::Unavailable)));
    }

    #[tokio::test]
    async fn categories_are_counted() {
        let api = InMemoryApi::demo();
        let categories = api.list_categories().await.unwrap();
        assert_eq!(categories.len(), 7);
        assert!(categories.iter().all(|c| c.count == 1));
    }
}
