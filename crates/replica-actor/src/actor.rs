//! # Generic Replica Actor
//!
//! This module defines the `ReplicaActor`, the component that owns a local copy of a
//! remote collection. It implements the "Server" side of the Actor Model, processing
//! messages sequentially and ensuring exclusive access to the replica.

use crate::client::ReplicaClient;
use crate::entity::ReplicaEntity;
use crate::error::FrameworkError;
use crate::message::{ReplicaRequest, UpdateOutcome};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that mirrors a collection of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the replica (`store`) and
/// the receiver end of the channel.
///
/// **Ordering Model**:
/// Messages are applied strictly in the order they arrive. A push event that lands
/// while a fetch is still in flight is applied first and may then be overwritten by
/// the fetch's `Load`; the replica does not try to reconcile the two.
///
/// The store is a `Vec` rather than a map because arrival order is part of the
/// state: inserts go to the front, loads keep the fetched order, and snapshots sort
/// stably on top of it.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ReplicaActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use replica_actor::{ReplicaActor, ReplicaEntity};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Ticket { id: u32, open: bool }
/// #[derive(Debug, thiserror::Error)] #[error("ticket error")] struct TicketError;
///
/// #[async_trait]
/// impl ReplicaEntity for Ticket {
///     type Id = u32;
///     type Update = bool;
///     type Action = ();
///     type ActionResult = ();
///     type Context = ();
///     type Error = TicketError;
///
///     fn id(&self) -> &u32 { &self.id }
///     fn is_retained(&self) -> bool { self.open }
///     async fn on_update(&mut self, open: bool, _: &()) -> Result<(), TicketError> { self.open = open; Ok(()) }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), TicketError> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ReplicaActor::<Ticket>::new(10);
///     tokio::spawn(actor.run(()));
///
///     client.load(vec![Ticket { id: 1, open: true }, Ticket { id: 2, open: false }]).await.unwrap();
///     assert_eq!(client.snapshot().await.unwrap().len(), 1);
/// }
/// ```
pub struct ReplicaActor<T: ReplicaEntity> {
    receiver: mpsc::Receiver<ReplicaRequest<T>>,
    store: Vec<T>,
}

impl<T: ReplicaEntity> ReplicaActor<T> {
    /// Creates a new `ReplicaActor` and its associated `ReplicaClient`.
    ///
    /// `buffer_size` is the capacity of the MPSC channel. If the channel is full,
    /// calls to the client wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, ReplicaClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Vec::new(),
        };
        let client = ReplicaClient::new(sender);
        (actor, client)
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.store.iter().position(|item| item.id() == id)
    }

    fn load(&mut self, items: Vec<T>) -> usize {
        let mut previous = std::mem::take(&mut self.store);
        let mut seen = HashSet::with_capacity(items.len());
        let mut next = Vec::with_capacity(items.len());

        for fresh in items {
            if !seen.insert(fresh.id().clone()) {
                continue;
            }
            let merged = match previous.iter().position(|held| held.id() == fresh.id()) {
                Some(idx) => {
                    let mut held = previous.swap_remove(idx);
                    held.on_reload(fresh);
                    held
                }
                None => fresh,
            };
            if merged.is_retained() {
                next.push(merged);
            }
        }

        self.store = next;
        self.store.len()
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook. This allows entities
    /// to reach external dependencies (the REST API, notifications) that were created
    /// *after* the actor was instantiated but *before* the loop started.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "kitchen_app::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ReplicaRequest::Load { items, respond_to } => {
                    let incoming = items.len();
                    let size = self.load(items);
                    info!(entity_type, incoming, size, "Loaded");
                    let _ = respond_to.send(Ok(size));
                }
                ReplicaRequest::Insert { item, respond_to } => {
                    let id = item.id().clone();
                    debug!(entity_type, %id, "Insert");
                    if let Some(idx) = self.position(&id) {
                        self.store.remove(idx);
                    }
                    self.store.insert(0, item);

                    // Await the async hook
                    if let Err(e) = self.store[0].on_insert(&context).await {
                        warn!(entity_type, %id, error = %e, "on_insert failed");
                    }
                    if !self.store[0].is_retained() {
                        self.store.remove(0);
                        info!(entity_type, %id, size = self.store.len(), "Inserted unretained, dropped");
                    } else {
                        info!(entity_type, %id, size = self.store.len(), "Inserted");
                    }
                    let _ = respond_to.send(Ok(()));
                }
                ReplicaRequest::Get { id, respond_to } => {
                    let item = self.position(&id).map(|idx| self.store[idx].clone());
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ReplicaRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(idx) = self.position(&id) else {
                        debug!(entity_type, %id, "Untracked");
                        let _ = respond_to.send(Ok(UpdateOutcome::Untracked));
                        continue;
                    };

                    // Await the async hook
                    if let Err(e) = self.store[idx].on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    let outcome = if self.store[idx].is_retained() {
                        info!(entity_type, %id, "Updated");
                        UpdateOutcome::Updated(self.store[idx].clone())
                    } else {
                        let evicted = self.store.remove(idx);
                        info!(entity_type, %id, size = self.store.len(), "Evicted");
                        UpdateOutcome::Evicted(evicted)
                    };
                    let _ = respond_to.send(Ok(outcome));
                }
                ReplicaRequest::Remove { id, respond_to } => {
                    debug!(entity_type, %id, "Remove");
                    let Some(idx) = self.position(&id) else {
                        let _ = respond_to.send(Ok(None));
                        continue;
                    };

                    // Await the async hook
                    if let Err(e) = self.store[idx].on_remove(&context).await {
                        warn!(entity_type, %id, error = %e, "on_remove failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    let removed = self.store.remove(idx);
                    info!(entity_type, %id, size = self.store.len(), "Removed");
                    let _ = respond_to.send(Ok(Some(removed)));
                }
                ReplicaRequest::Snapshot { respond_to } => {
                    let mut view = self.store.clone();
                    view.sort_by(|a, b| a.view_order(b));
                    debug!(entity_type, size = view.len(), "Snapshot");
                    let _ = respond_to.send(Ok(view));
                }
                ReplicaRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(idx) = self.position(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };

                    // Await the async hook
                    let result = self.store[idx]
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    if !self.store[idx].is_retained() {
                        self.store.remove(idx);
                        info!(entity_type, %id, size = self.store.len(), "Evicted");
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
