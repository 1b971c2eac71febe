//! # Board Client
//!
//! Provides the kitchen board's API over the board actor: mounting from the REST
//! API, applying hub events and completing orders. Toasts are raised here, so the
//! actor stays free of presentation concerns beyond the new-order alert.
use super::entity_error;
use crate::api::OrdersApi;
use crate::board_actor::{BoardAction, BoardActionResult, BoardError};
use crate::hub::HubEvent;
use crate::model::{Order, OrderId};
use crate::notify::Notifier;
use async_trait::async_trait;
use replica_actor::{FrameworkError, ReplicaClient, ReplicaHandle, UpdateOutcome};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// What a hub event did to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardChange {
    Inserted,
    Replaced,
    Removed,
    /// The event named an order the board does not hold.
    Ignored,
}

#[derive(Clone)]
pub struct BoardClient {
    inner: ReplicaClient<Order>,
    api: Arc<dyn OrdersApi>,
    notifier: Notifier,
}

#[async_trait]
impl ReplicaHandle<Order> for BoardClient {
    type Error = BoardError;

    fn inner(&self) -> &ReplicaClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<BoardError>(e) {
            Ok(own) => own,
            Err(FrameworkError::NotFound(id)) => BoardError::NotFound(id),
            Err(other) => BoardError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl BoardClient {
    pub fn new(inner: ReplicaClient<Order>, api: Arc<dyn OrdersApi>, notifier: Notifier) -> Self {
        Self {
            inner,
            api,
            notifier,
        }
    }

    /// Replaces the board with the API's active orders.
    ///
    /// On failure the board is emptied, a toast is raised and the error returned.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> Result<usize, BoardError> {
        debug!("Fetching orders");
        match self.api.list_orders().await {
            Ok(orders) => self.inner.load(orders).await.map_err(Self::map_error),
            Err(e) => {
                warn!(error = %e, "Mount failed");
                self.notifier
                    .failure("Could not load orders", Some(e.to_string()));
                self.inner.load(Vec::new()).await.map_err(Self::map_error)?;
                Err(BoardError::Api(e.to_string()))
            }
        }
    }

    #[instrument(skip(self, event), fields(event = event.target(), id = %event.order().id))]
    pub async fn apply(&self, event: HubEvent) -> Result<BoardChange, BoardError> {
        match event {
            HubEvent::OrderCreated(order) => {
                self.inner.insert(order).await.map_err(Self::map_error)?;
                Ok(BoardChange::Inserted)
            }
            HubEvent::OrderUpdated(order) => {
                let outcome = self
                    .inner
                    .update(order.id.clone(), order)
                    .await
                    .map_err(Self::map_error)?;
                Ok(match outcome {
                    UpdateOutcome::Updated(_) => BoardChange::Replaced,
                    UpdateOutcome::Evicted(_) => BoardChange::Removed,
                    UpdateOutcome::Untracked => BoardChange::Ignored,
                })
            }
        }
    }

    /// Decodes a raw hub invocation and applies it. Payloads that do not decode
    /// are rejected and leave the board untouched.
    pub async fn apply_invocation(
        &self,
        target: &str,
        arguments: &[Value],
    ) -> Result<BoardChange, BoardError> {
        match HubEvent::from_invocation(target, arguments) {
            Ok(Some(event)) => self.apply(event).await,
            Ok(None) => Ok(BoardChange::Ignored),
            Err(e) => Err(BoardError::InvalidPayload(e.to_string())),
        }
    }

    /// Marks the order Completed. The board keeps the order if the API call fails.
    #[instrument(skip(self))]
    pub async fn complete(&self, id: OrderId) -> Result<(), BoardError> {
        debug!("Completing order");
        let result = self
            .inner
            .perform_action(id.clone(), BoardAction::Complete)
            .await
            .map_err(Self::map_error);
        match result {
            Ok(BoardActionResult::Completed(done)) => {
                self.notifier.success("Order completed", Some(done.short()));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .failure("Could not complete order", Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// The board in display order.
    pub async fn orders(&self) -> Result<Vec<Order>, BoardError> {
        self.snapshot().await
    }

    pub async fn active_count(&self) -> Result<usize, BoardError> {
        Ok(self.snapshot().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryApi;
    use crate::model::{OrderItem, OrderStatus, ProductId};
    use crate::notify::{Notice, ToastKind};
    use chrono::Utc;
    use replica_actor::mock::{create_mock_client, expect_action, expect_insert, MockClient};

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::from(id),
            created_at: Utc::now(),
            status,
            is_urgent: false,
            items: vec![OrderItem {
                product_id: ProductId::from("p-arroz"),
                product_name: "Arroz branco".into(),
                quantity: 1,
                prep_seconds: 300,
            }],
        }
    }

    fn board(
        inner: ReplicaClient<Order>,
    ) -> (BoardClient, tokio::sync::mpsc::UnboundedReceiver<Notice>) {
        let (notifier, notices) = Notifier::channel();
        (
            BoardClient::new(inner, Arc::new(InMemoryApi::new()), notifier),
            notices,
        )
    }

    #[tokio::test]
    async fn test_updated_event_maps_outcomes() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_update(OrderId::from("o-1"))
            .return_ok(UpdateOutcome::Evicted(order("o-1", OrderStatus::Completed)));
        mock.expect_update(OrderId::from("o-2"))
            .return_ok(UpdateOutcome::Untracked);
        let (client, _notices) = board(mock.client());

        let removed = client
            .apply(HubEvent::OrderUpdated(order("o-1", OrderStatus::Completed)))
            .await
            .unwrap();
        assert_eq!(removed, BoardChange::Removed);

        let ignored = client
            .apply(HubEvent::OrderUpdated(order("o-2", OrderStatus::InProgress)))
            .await
            .unwrap();
        assert_eq!(ignored, BoardChange::Ignored);
        mock.verify();
    }

    #[tokio::test]
    async fn test_undecodable_status_is_rejected() {
        let (inner, mut receiver) = create_mock_client::<Order>(4);
        let (client, _notices) = board(inner);

        let payload = serde_json::json!({
            "id": "o-1",
            "createdAt": "2024-05-01T12:00:00Z",
            "status": 9,
            "isUrgent": false,
            "items": []
        });
        let result = client.apply_invocation("order:updated", &[payload]).await;
        assert!(matches!(result, Err(BoardError::InvalidPayload(_))));

        // Nothing reached the actor
        drop(client);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_complete_success_raises_toast() {
        let (inner, mut receiver) = create_mock_client::<Order>(4);
        let (client, mut notices) = board(inner);

        let task = tokio::spawn(async move {
            client
                .complete(OrderId::from("0123456789abcdef"))
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, OrderId::from("0123456789abcdef"));
        assert_eq!(action, BoardAction::Complete);
        responder
            .send(Ok(BoardActionResult::Completed(id)))
            .unwrap();

        task.await.unwrap().unwrap();
        match notices.recv().await.unwrap() {
            Notice::Toast(toast) => {
                assert_eq!(toast.kind, ToastKind::Success);
                assert_eq!(toast.description.as_deref(), Some("#01234567"));
            }
            other => panic!("Expected toast, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_failure_returns_entity_error() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId::from("o-1"))
            .return_err(FrameworkError::EntityError(Box::new(BoardError::Api(
                "API unavailable".into(),
            ))));
        let (client, mut notices) = board(mock.client());

        let err = client.complete(OrderId::from("o-1")).await.unwrap_err();
        assert_eq!(err, BoardError::Api("API unavailable".into()));
        assert!(matches!(
            notices.recv().await,
            Some(Notice::Toast(t)) if t.kind == ToastKind::Failure
        ));
    }

    #[tokio::test]
    async fn test_created_event_is_inserted() {
        let (inner, mut receiver) = create_mock_client::<Order>(4);
        let (client, _notices) = board(inner);

        let task = tokio::spawn(async move {
            client
                .apply(HubEvent::OrderCreated(order("o-9", OrderStatus::Pending)))
                .await
        });
        let (item, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(item.id, OrderId::from("o-9"));
        responder.send(Ok(())).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), BoardChange::Inserted);
    }
}
