//! # Card Client
//!
//! Provides the salon screen's API over the card actor: loading cards from the
//! catalog, submitting and completing orders, and following hub updates so a card
//! notices when its orders are closed elsewhere.
use super::entity_error;
use crate::api::{CatalogApi, ProductQuery};
use crate::card_actor::{
    CardAction, CardActionResult, CardError, CardUpdate, Priority, ProductCard,
};
use crate::hub::HubEvent;
use crate::model::{Order, Product, ProductId};
use crate::notify::Notifier;
use async_trait::async_trait;
use replica_actor::{FrameworkError, ReplicaClient, ReplicaHandle, UpdateOutcome};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct CardClient {
    inner: ReplicaClient<ProductCard>,
    catalog: Arc<dyn CatalogApi>,
    notifier: Notifier,
}

#[async_trait]
impl ReplicaHandle<ProductCard> for CardClient {
    type Error = CardError;

    fn inner(&self) -> &ReplicaClient<ProductCard> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<CardError>(e) {
            Ok(own) => own,
            Err(FrameworkError::NotFound(id)) => CardError::NotFound(id),
            Err(other) => CardError::ActorCommunicationError(other.to_string()),
        }
    }
}

fn unexpected(result: CardActionResult) -> CardError {
    CardError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

fn line(order: &Order) -> Option<String> {
    order
        .items
        .first()
        .map(|item| format!("{} x{}", item.product_name, item.quantity))
}

impl CardClient {
    pub fn new(
        inner: ReplicaClient<ProductCard>,
        catalog: Arc<dyn CatalogApi>,
        notifier: Notifier,
    ) -> Self {
        Self {
            inner,
            catalog,
            notifier,
        }
    }

    /// Replaces the cards with the products matching `query`. Cards that survive
    /// keep their outstanding orders; on failure the cards are left as they were.
    #[instrument(skip(self))]
    pub async fn load(&self, query: &ProductQuery) -> Result<usize, CardError> {
        debug!("Fetching products");
        let products = match self.catalog.list_products(query).await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Product fetch failed");
                self.notifier
                    .failure("Could not load products", Some(e.to_string()));
                return Err(CardError::Api(e.to_string()));
            }
        };
        self.inner
            .load(products.into_iter().map(ProductCard::new).collect())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    async fn send(&self, id: ProductId, priority: Priority) -> Result<Order, CardError> {
        let (sent, failed) = match priority {
            Priority::Normal => ("Order sent", "Could not send order"),
            Priority::Urgent => ("Urgent order sent", "Could not send urgent order"),
        };
        let result = self
            .inner
            .perform_action(id, CardAction::Send(priority))
            .await
            .map_err(Self::map_error)
            .and_then(|r| match r {
                CardActionResult::Sent(order) => Ok(order),
                other => Err(unexpected(other)),
            });
        match result {
            Ok(order) => {
                self.notifier.success(sent, line(&order));
                Ok(order)
            }
            Err(e) => {
                self.notifier.failure(failed, Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Submits one unit as a normal order. Fails while another normal order for the
    /// same card is outstanding.
    pub async fn send_normal(&self, id: &ProductId) -> Result<Order, CardError> {
        self.send(id.clone(), Priority::Normal).await
    }

    pub async fn send_urgent(&self, id: &ProductId) -> Result<Order, CardError> {
        self.send(id.clone(), Priority::Urgent).await
    }

    /// Completes the card's outstanding urgent order, or its normal one.
    #[instrument(skip(self))]
    pub async fn complete_one(&self, id: &ProductId) -> Result<Option<Order>, CardError> {
        let result = self
            .inner
            .perform_action(id.clone(), CardAction::CompleteOne)
            .await
            .map_err(Self::map_error)
            .and_then(|r| match r {
                CardActionResult::Completed(done) => Ok(done),
                other => Err(unexpected(other)),
            });
        match result {
            Ok(Some(order)) => {
                self.notifier
                    .success("Order completed", Some(order.id.short()));
                Ok(Some(order))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.notifier
                    .failure("Could not complete order", Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Replaces one card's product in place.
    pub async fn refresh(&self, product: Product) -> Result<bool, CardError> {
        let outcome = self
            .inner
            .update(product.id.clone(), CardUpdate::Product(product))
            .await
            .map_err(Self::map_error)?;
        Ok(!matches!(outcome, UpdateOutcome::Untracked))
    }

    /// Forwards an order update to every card whose product it contains. Returns the
    /// number of cards that track the order's products.
    #[instrument(skip(self, event), fields(event = event.target(), id = %event.order().id))]
    pub async fn apply(&self, event: &HubEvent) -> Result<usize, CardError> {
        let HubEvent::OrderUpdated(order) = event else {
            return Ok(0);
        };
        let mut seen = HashSet::new();
        let mut touched = 0;
        for item in &order.items {
            if !seen.insert(&item.product_id) {
                continue;
            }
            let outcome = self
                .inner
                .update(
                    item.product_id.clone(),
                    CardUpdate::OrderChanged(order.clone()),
                )
                .await
                .map_err(Self::map_error)?;
            if !matches!(outcome, UpdateOutcome::Untracked) {
                touched += 1;
            }
        }
        Ok(touched)
    }

    /// Cards in catalog order.
    pub async fn cards(&self) -> Result<Vec<ProductCard>, CardError> {
        self.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryApi;
    use crate::model::{OrderId, OrderItem, OrderStatus};
    use chrono::Utc;
    use replica_actor::mock::{create_mock_client, expect_update};

    fn order_of(products: &[&str]) -> Order {
        Order {
            id: OrderId::from("o-1"),
            created_at: Utc::now(),
            status: OrderStatus::Completed,
            is_urgent: false,
            items: products
                .iter()
                .map(|p| OrderItem {
                    product_id: ProductId::from(*p),
                    product_name: p.to_string(),
                    quantity: 1,
                    prep_seconds: 60,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_update_is_routed_once_per_product() {
        let (inner, mut receiver) = create_mock_client::<ProductCard>(8);
        let (notifier, _notices) = Notifier::channel();
        let client = CardClient::new(inner, Arc::new(InMemoryApi::new()), notifier);

        let event = HubEvent::OrderUpdated(order_of(&["p-arroz", "p-farofa", "p-arroz"]));
        let task = tokio::spawn(async move { client.apply(&event).await });

        let (id, update, responder) = expect_update(&mut receiver).await.unwrap();
        assert_eq!(id, ProductId::from("p-arroz"));
        assert!(matches!(update, CardUpdate::OrderChanged(_)));
        responder.send(Ok(UpdateOutcome::Untracked)).unwrap();

        let (id, _, responder) = expect_update(&mut receiver).await.unwrap();
        assert_eq!(id, ProductId::from("p-farofa"));
        let card = ProductCard::new(
            crate::model::ProductForm::default().into_product(ProductId::from("p-farofa")),
        );
        responder.send(Ok(UpdateOutcome::Updated(card))).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_created_events_are_not_routed() {
        let (inner, mut receiver) = create_mock_client::<ProductCard>(8);
        let (notifier, _notices) = Notifier::channel();
        let client = CardClient::new(inner, Arc::new(InMemoryApi::new()), notifier);

        let touched = client
            .apply(&HubEvent::OrderCreated(order_of(&["p-arroz"])))
            .await
            .unwrap();
        assert_eq!(touched, 0);
        drop(client);
        assert!(receiver.recv().await.is_none());
    }
}
