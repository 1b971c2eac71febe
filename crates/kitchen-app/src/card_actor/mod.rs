//! # Card Actor
//!
//! One [`ProductCard`] per product on the salon screen, each tracking the orders it
//! has outstanding.
//!
//! A card holds at most one normal order at a time; urgent orders are never
//! blocked. The slot a submission fills is released when the card completes the
//! order or when a hub update reports it closed.
//!
//! ## Structure
//!
//! - [`entity`] - [`ProductCard`] and its [`ReplicaEntity`](replica_actor::ReplicaEntity) implementation
//! - [`error`] - [`CardError`]
//! - [`actions`] - [`CardAction`], [`CardActionResult`] and [`CardUpdate`]

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::{CardContext, ProductCard};
pub use error::*;

use replica_actor::{ReplicaActor, ReplicaClient};

/// Creates a new card actor and its client.
pub fn new() -> (ReplicaActor<ProductCard>, ReplicaClient<ProductCard>) {
    ReplicaActor::new(64)
}
