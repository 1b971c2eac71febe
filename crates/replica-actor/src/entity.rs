//! # ReplicaEntity Trait
//!
//! The `ReplicaEntity` trait defines the contract that every locally mirrored record
//! (an order on the kitchen board, a product card on the salon screen, …) must
//! implement to be managed by the generic [`ReplicaActor`](crate::ReplicaActor).
//!
//! Unlike a system of record, a replica never invents identities: every entity
//! arrives with the identity the remote service gave it, either from a full fetch
//! ([`Load`](crate::ReplicaRequest::Load)) or from a push event
//! ([`Insert`](crate::ReplicaRequest::Insert) / [`Update`](crate::ReplicaRequest::Update)).
//!
//! # Retention and ordering
//! Two provided methods shape what a replica shows:
//! - [`ReplicaEntity::is_retained`] decides whether an entity stays in the replica.
//!   The actor evicts an entity as soon as a load, insert, update or action leaves
//!   it unretained, so consumers never observe one.
//! - [`ReplicaEntity::view_order`] defines the ordering of
//!   [`Snapshot`](crate::ReplicaRequest::Snapshot) responses. The sort is stable, so
//!   entities that compare equal keep their arrival order.
//!
//! # Provided Methods (Hooks)
//! - [`ReplicaEntity::on_reload`]
//! - [`ReplicaEntity::on_insert`]
//! - [`ReplicaEntity::on_remove`]
//!
//! You do **not** need to implement these methods unless you want to customize behavior.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any mirrored entity must implement to be managed by `ReplicaActor`.
///
/// # Async & Context
/// This trait is `#[async_trait]` so hooks can await other services (the REST API,
/// other actors). The `Context` type is injected into every hook through
/// [`ReplicaActor::run`](crate::ReplicaActor::run), which lets dependencies be bound
/// late, after all actors and clients have been created.
#[async_trait]
pub trait ReplicaEntity: Clone + Send + Sync + 'static {
    /// The identity assigned by the remote service.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The payload a push event carries for an existing entity.
    type Update: Send + Sync + Debug;

    /// Enum representing entity-specific operations (e.g. `Complete`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identity of this entity.
    fn id(&self) -> &Self::Id;

    /// Whether the replica keeps this entity. Defaults to always.
    fn is_retained(&self) -> bool {
        true
    }

    /// Ordering used by snapshots. Defaults to arrival order.
    fn view_order(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }

    /// Merge a freshly fetched copy into an entity already held by the replica.
    ///
    /// Called during a load for every incoming entity whose identity is already
    /// present. The default replaces the local copy wholesale; entities that carry
    /// purely local state (e.g. an outstanding submission) override it to keep that
    /// state across reloads.
    fn on_reload(&mut self, fresh: Self) {
        *self = fresh;
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after a pushed entity is placed at the front of the replica.
    async fn on_insert(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update for a tracked entity is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed on request.
    async fn on_remove(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom entity-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
