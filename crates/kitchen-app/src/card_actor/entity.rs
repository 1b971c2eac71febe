//! ReplicaEntity implementation for product cards.

use super::actions::{CardAction, CardActionResult, CardUpdate, Priority};
use super::error::CardError;
use crate::api::OrdersApi;
use crate::model::{Order, OrderCreate, OrderStatus, Product, ProductId};
use async_trait::async_trait;
use replica_actor::ReplicaEntity;
use std::sync::Arc;
use tracing::{debug, info};

/// A product on the salon screen and the orders it has in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub product: Product,
    pub normal: Option<Order>,
    /// The most recent urgent submission still outstanding.
    pub urgent: Option<Order>,
}

impl ProductCard {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            normal: None,
            urgent: None,
        }
    }

    pub fn can_send_normal(&self) -> bool {
        self.product.available && self.normal.is_none()
    }

    pub fn can_send_urgent(&self) -> bool {
        self.product.available
    }

    pub fn has_outstanding(&self) -> bool {
        self.normal.is_some() || self.urgent.is_some()
    }

    fn track(&mut self, order: Order) {
        let closed = order.status.is_closed();
        for slot in [&mut self.normal, &mut self.urgent] {
            if slot.as_ref().is_some_and(|held| held.id == order.id) {
                *slot = if closed { None } else { Some(order.clone()) };
            }
        }
    }
}

/// Dependencies of the card actor.
#[derive(Clone)]
pub struct CardContext {
    pub api: Arc<dyn OrdersApi>,
}

impl CardContext {
    pub fn new(api: Arc<dyn OrdersApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ReplicaEntity for ProductCard {
    type Id = ProductId;
    type Update = CardUpdate;
    type Action = CardAction;
    type ActionResult = CardActionResult;
    type Context = CardContext;
    type Error = CardError;

    fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// A catalog refresh replaces the product but keeps the outstanding orders.
    fn on_reload(&mut self, fresh: Self) {
        self.product = fresh.product;
    }

    async fn on_update(&mut self, update: CardUpdate, _ctx: &CardContext) -> Result<(), CardError> {
        match update {
            CardUpdate::Product(product) => self.product = product,
            CardUpdate::OrderChanged(order) => {
                debug!(card = %self.product.id, order = %order.id, status = %order.status, "Order changed");
                self.track(order);
            }
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CardAction,
        ctx: &CardContext,
    ) -> Result<CardActionResult, CardError> {
        match action {
            CardAction::Send(priority) => {
                if !self.product.available {
                    return Err(CardError::Unavailable(self.product.name.clone()));
                }
                if priority == Priority::Normal && self.normal.is_some() {
                    return Err(CardError::NormalOutstanding(self.product.name.clone()));
                }

                let request = OrderCreate::single(self.product.id.clone(), priority.is_urgent());
                let order = ctx
                    .api
                    .create_order(request)
                    .await
                    .map_err(|e| CardError::Api(e.to_string()))?;
                info!(card = %self.product.id, order = %order.id, ?priority, "Order sent");

                match priority {
                    Priority::Normal => self.normal = Some(order.clone()),
                    Priority::Urgent => self.urgent = Some(order.clone()),
                }
                Ok(CardActionResult::Sent(order))
            }
            CardAction::CompleteOne => {
                let Some(target) = self.urgent.clone().or_else(|| self.normal.clone()) else {
                    return Ok(CardActionResult::Completed(None));
                };
                ctx.api
                    .update_order_status(&target.id, OrderStatus::Completed)
                    .await
                    .map_err(|e| CardError::Api(e.to_string()))?;

                let mut done = target;
                done.status = OrderStatus::Completed;
                self.track(done.clone());
                Ok(CardActionResult::Completed(Some(done)))
            }
        }
    }
}
