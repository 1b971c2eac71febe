//! # Generic Client
//!
//! This module defines the generic client for communicating with replica actors.

use crate::entity::ReplicaEntity;
use crate::error::FrameworkError;
use crate::message::{ReplicaRequest, UpdateOutcome};
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `ReplicaActor`.
///
/// The client forwards replica requests over a Tokio mpsc channel and awaits each
/// answer on a oneshot channel. It holds only a sender, so it is cheap to clone and
/// can be shared by the hub pump, the terminal surface and background timers alike.
#[derive(Clone)]
pub struct ReplicaClient<T: ReplicaEntity> {
    sender: mpsc::Sender<ReplicaRequest<T>>,
}

impl<T: ReplicaEntity> ReplicaClient<T> {
    pub fn new(sender: mpsc::Sender<ReplicaRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ReplicaRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Replace the replica with a fresh fetch. Returns the number of retained entities.
    pub async fn load(&self, items: Vec<T>) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ReplicaRequest::Load { items, respond_to })
            .await
    }

    pub async fn insert(&self, item: T) -> Result<(), FrameworkError> {
        self.request(|respond_to| ReplicaRequest::Insert { item, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ReplicaRequest::Get { id, respond_to })
            .await
    }

    pub async fn update(
        &self,
        id: T::Id,
        update: T::Update,
    ) -> Result<UpdateOutcome<T>, FrameworkError> {
        self.request(|respond_to| ReplicaRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn remove(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ReplicaRequest::Remove { id, respond_to })
            .await
    }

    pub async fn snapshot(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ReplicaRequest::Snapshot { respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ReplicaRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}
