//! ReplicaEntity implementation for orders on the kitchen board.

use super::actions::{BoardAction, BoardActionResult};
use super::error::BoardError;
use crate::api::OrdersApi;
use crate::model::{board_order, Order, OrderId, OrderStatus};
use crate::notify::{Notifier, SoundCue};
use async_trait::async_trait;
use replica_actor::ReplicaEntity;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

/// Beeps played when a new order lands on the board.
pub const NEW_ORDER_BEEPS: u32 = 3;

/// Dependencies of the board actor.
#[derive(Clone)]
pub struct BoardContext {
    pub api: Arc<dyn OrdersApi>,
    pub notifier: Notifier,
    pub sound: SoundCue,
}

impl BoardContext {
    pub fn new(api: Arc<dyn OrdersApi>, notifier: Notifier, sound: SoundCue) -> Self {
        Self {
            api,
            notifier,
            sound,
        }
    }
}

#[async_trait]
impl ReplicaEntity for Order {
    type Id = OrderId;
    type Update = Order;
    type Action = BoardAction;
    type ActionResult = BoardActionResult;
    type Context = BoardContext;
    type Error = BoardError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Completed orders never stay on the board.
    fn is_retained(&self) -> bool {
        self.status.is_active()
    }

    fn view_order(&self, other: &Self) -> Ordering {
        board_order(self, other)
    }

    /// Raises the full-screen alert and, once the operator has unlocked sound,
    /// the beeps.
    async fn on_insert(&mut self, ctx: &BoardContext) -> Result<(), BoardError> {
        ctx.notifier.alert(self.summary());
        if ctx.sound.is_enabled() {
            ctx.notifier.beep(NEW_ORDER_BEEPS);
        }
        info!(id = %self.id, urgent = self.is_urgent, "New order");
        Ok(())
    }

    async fn on_update(&mut self, update: Order, _ctx: &BoardContext) -> Result<(), BoardError> {
        debug!(id = %self.id, from = %self.status, to = %update.status, "Order changed");
        *self = update;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: BoardAction,
        ctx: &BoardContext,
    ) -> Result<BoardActionResult, BoardError> {
        match action {
            BoardAction::Complete => {
                ctx.api
                    .update_order_status(&self.id, OrderStatus::Completed)
                    .await
                    .map_err(|e| BoardError::Api(e.to_string()))?;
                self.status = OrderStatus::Completed;
                Ok(BoardActionResult::Completed(self.id.clone()))
            }
        }
    }
}
