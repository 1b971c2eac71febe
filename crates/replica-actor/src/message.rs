//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ReplicaClient` and `ReplicaActor`.

use crate::entity::ReplicaEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// What an [`Update`](ReplicaRequest::Update) did to the replica.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    /// The entity was updated in place and is still retained.
    Updated(T),
    /// The update left the entity unretained, so it was evicted.
    Evicted(T),
    /// The replica does not hold this identity; nothing changed.
    Untracked,
}

/// Internal message type sent to the actor to request operations.
///
/// # Replica Operations
/// A replica mirrors a collection owned by a remote service, so its vocabulary is
/// about synchronisation rather than authorship:
///
/// - **Load**: Replace the whole replica with a fresh fetch (merging via
///   [`ReplicaEntity::on_reload`]). Responds with the retained count.
/// - **Insert**: A pushed entity. Placed at the front, replacing any entity with the
///   same identity.
/// - **Get**: Fetch the current local copy by identity.
/// - **Update**: Apply a pushed change to a tracked entity.
/// - **Remove**: Drop an entity locally. Removing an unknown identity is a no-op.
/// - **Snapshot**: All retained entities in [`ReplicaEntity::view_order`].
/// - **Action**: Run a custom [`ReplicaEntity::Action`] against one entity.
#[derive(Debug)]
pub enum ReplicaRequest<T: ReplicaEntity> {
    Load {
        items: Vec<T>,
        respond_to: Response<usize>,
    },
    Insert {
        item: T,
        respond_to: Response<()>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<UpdateOutcome<T>>,
    },
    Remove {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Snapshot {
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
