//! # Front-of-House Lifecycle
//!
//! Wires the replicas to the API and the hub, and tears them down again.
//!
//! ## Wiring
//!
//! ```text
//!             +-------------+   list/complete   +-----------+
//! hub events  |  event pump |------------------>|  board    |--> notices
//! ----------->|             |                   |  actor    |
//!             |             |   order updates   +-----------+
//!             |             |------------------>|  card     |
//!             +-------------+                   |  actor    |
//!                                               +-----------+
//! ```
//!
//! Both actors are created first and started with their [`BoardContext`] and
//! [`CardContext`], so the API handle and the notifier are bound late. The pump
//! applies events strictly in the order the hub delivered them. A pump that falls
//! behind the broadcast re-mounts the board from the API instead of guessing
//! which events it missed.
//!
//! ## Shutdown
//!
//! 1. Abort the pump, which drops its client clones
//! 2. Drop the clients held here
//! 3. Await the actors, which exit once their channels close
//!
//! Anything else holding a client clone (an [`UrgentButton`](crate::clients::UrgentButton)
//! for instance) must be dropped before calling [`FrontOfHouse::shutdown`].

use crate::api::{CatalogApi, KitchenApi, OrdersApi};
use crate::board_actor::{self, BoardContext};
use crate::card_actor::{self, CardContext};
use crate::clients::{BoardClient, BoardChange, CardClient, ProductsClient};
use crate::hub::HubEvent;
use crate::notify::{Notifier, SoundCue};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub struct FrontOfHouse {
    pub board: BoardClient,
    pub cards: CardClient,
    pub products: ProductsClient,
    pub sound: SoundCue,
    pump: Option<JoinHandle<()>>,
    handles: Vec<JoinHandle<()>>,
}

impl FrontOfHouse {
    /// Starts the board and card actors against `api`.
    pub fn new<A: KitchenApi + 'static>(api: Arc<A>, notifier: Notifier, sound: SoundCue) -> Self {
        let orders: Arc<dyn OrdersApi> = api.clone();
        let catalog: Arc<dyn CatalogApi> = api;

        let (board_actor, board_replica) = board_actor::new();
        let (card_actor, card_replica) = card_actor::new();

        let board_handle = tokio::spawn(board_actor.run(BoardContext::new(
            orders.clone(),
            notifier.clone(),
            sound.clone(),
        )));
        let card_handle = tokio::spawn(card_actor.run(CardContext::new(orders.clone())));

        Self {
            board: BoardClient::new(board_replica, orders, notifier.clone()),
            cards: CardClient::new(card_replica, catalog.clone(), notifier.clone()),
            products: ProductsClient::new(catalog, notifier),
            sound,
            pump: None,
            handles: vec![board_handle, card_handle],
        }
    }

    /// Applies every event from `events` to the board and the cards. Replaces any
    /// earlier subscription.
    pub fn follow(&mut self, events: broadcast::Receiver<HubEvent>) {
        if let Some(previous) = self.pump.take() {
            previous.abort();
        }
        let task = pump(events, self.board.clone(), self.cards.clone());
        self.pump = Some(tokio::spawn(task));
    }

    pub fn is_following(&self) -> bool {
        self.pump.as_ref().is_some_and(|pump| !pump.is_finished())
    }

    pub async fn shutdown(mut self) -> Result<(), String> {
        info!("Shutting down front of house...");

        if let Some(pump) = self.pump.take() {
            pump.abort();
            // The pump's own result is irrelevant once aborted
            let _ = pump.await;
        }

        drop(self.board);
        drop(self.cards);
        drop(self.products);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Front of house shut down");
        Ok(())
    }
}

async fn pump(mut events: broadcast::Receiver<HubEvent>, board: BoardClient, cards: CardClient) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(missed)) => {
                warn!(missed, "Event pump lagged, re-mounting board");
                if let Err(e) = board.mount().await {
                    warn!(error = %e, "Re-mount failed");
                }
                continue;
            }
            Err(RecvError::Closed) => {
                info!("Event stream closed");
                return;
            }
        };

        match board.apply(event.clone()).await {
            Ok(BoardChange::Ignored) => debug!(event = event.target(), "Board ignored event"),
            Ok(change) => debug!(event = event.target(), ?change, "Board changed"),
            Err(e) => warn!(error = %e, "Board rejected event"),
        }
        if let Err(e) = cards.apply(&event).await {
            warn!(error = %e, "Cards rejected event");
        }
    }
}
