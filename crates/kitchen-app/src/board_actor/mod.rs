//! # Board Actor
//!
//! The kitchen board's local replica of the active orders.
//!
//! ## Overview
//!
//! The board never owns an order. It mirrors `GET /api/orders` on mount and then
//! follows the hub: `order:created` inserts at the front, `order:updated`
//! replaces in place, and anything that turns Completed is evicted by the
//! retention rule on [`Order`]. The single mutation the kitchen makes is
//! [`BoardAction::Complete`], which goes through the API first.
//!
//! ## Structure
//!
//! - [`entity`] - [`ReplicaEntity`](replica_actor::ReplicaEntity) implementation for [`Order`]
//! - [`error`] - [`BoardError`]
//! - [`actions`] - [`BoardAction`] and [`BoardActionResult`]
//! - [`new()`] - Factory function that creates the actor and its client
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kitchen_app::api::InMemoryApi;
//! use kitchen_app::board_actor::{self, BoardContext};
//! use kitchen_app::clients::BoardClient;
//! use kitchen_app::notify::{Notifier, SoundCue};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = Arc::new(InMemoryApi::demo());
//!     let (notifier, _notices) = Notifier::channel();
//!
//!     let (actor, replica) = board_actor::new();
//!     let context = BoardContext::new(api.clone(), notifier.clone(), SoundCue::default());
//!     tokio::spawn(actor.run(context));
//!
//!     let board = BoardClient::new(replica, api, notifier);
//!     let _ = board.mount().await;
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::BoardContext;
pub use error::*;

use crate::model::Order;
use replica_actor::{ReplicaActor, ReplicaClient};

/// Creates a new board actor and its client.
pub fn new() -> (ReplicaActor<Order>, ReplicaClient<Order>) {
    ReplicaActor::new(32)
}
