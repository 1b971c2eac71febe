//! # Replica Actor
//!
//! Building blocks for keeping a local, concurrent copy of a collection that some
//! remote service owns. Each collection lives inside one actor; every change, whether
//! it comes from a full fetch, a push event or a user command, is a message processed
//! in arrival order.
//!
//! ## Why an actor per replica?
//!
//! A front-of-house screen receives the same orders from two directions: an initial
//! REST fetch and a stream of push events. Funnelling both through one mailbox means
//! there is exactly one writer and no locks:
//!
//! - Isolated state (no shared memory)
//! - Sequential processing within each actor
//! - Readers get consistent snapshots instead of views into a mutating list
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model)
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ReplicaEntity`]) - Retention, ordering and hooks for one record type
//! 2. **Runtime Layer** ([`ReplicaActor`]) - Message processing and the replica itself
//! 3. **Interface Layer** ([`ReplicaClient`], [`ReplicaHandle`]) - Type-safe communication
//!
//! ## Example
//!
//! ```rust
//! use replica_actor::{ReplicaActor, ReplicaEntity, UpdateOutcome};
//! use async_trait::async_trait;
//! use std::cmp::Ordering;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ticket { id: u32, open: bool, urgent: bool }
//! #[derive(Debug, thiserror::Error)] #[error("ticket error")] struct TicketError;
//!
//! #[async_trait]
//! impl ReplicaEntity for Ticket {
//!     type Id = u32;
//!     type Update = bool;
//!     type Action = ();
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = TicketError;
//!
//!     fn id(&self) -> &u32 { &self.id }
//!     fn is_retained(&self) -> bool { self.open }
//!     fn view_order(&self, other: &Self) -> Ordering { other.urgent.cmp(&self.urgent) }
//!
//!     async fn on_update(&mut self, open: bool, _: &()) -> Result<(), TicketError> {
//!         self.open = open;
//!         Ok(())
//!     }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), TicketError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ReplicaActor::<Ticket>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     client.load(vec![
//!         Ticket { id: 1, open: true, urgent: false },
//!         Ticket { id: 2, open: true, urgent: true },
//!     ]).await.unwrap();
//!
//!     let view = client.snapshot().await.unwrap();
//!     assert_eq!(view[0].id, 2);
//!
//!     // Closing a ticket evicts it
//!     let outcome = client.update(2, false).await.unwrap();
//!     assert!(matches!(outcome, UpdateOutcome::Evicted(_)));
//!     assert_eq!(client.snapshot().await.unwrap().len(), 1);
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via the `run()` method, not at
//! construction time. An application can create every actor and client first, then
//! hand each actor the API handle, notifier or sibling clients it needs.
//!
//! ## Testing
//!
//! The [`mock`] module provides a **MockClient** that answers a real
//! `ReplicaClient<T>` from scripted expectations, for testing domain clients
//! without spawning any actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ReplicaActor;
pub use client::ReplicaClient;
pub use client_trait::ReplicaHandle;
pub use entity::ReplicaEntity;
pub use error::FrameworkError;
pub use message::{ReplicaRequest, Response, UpdateOutcome};
