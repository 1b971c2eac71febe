//! Type-safe wrappers around [`ReplicaClient`](replica_actor::ReplicaClient) and the
//! product management surface.

pub mod board_client;
pub mod card_client;
pub mod gesture;
pub mod products_client;

pub use board_client::*;
pub use card_client::*;
pub use gesture::*;
pub use products_client::*;

use replica_actor::FrameworkError;

/// Recovers the entity's own error from a framework error, if it carries one.
pub(crate) fn entity_error<E>(e: FrameworkError) -> Result<E, FrameworkError>
where
    E: std::error::Error + 'static,
{
    match e {
        FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
            Ok(own) => Ok(*own),
            Err(other) => Err(FrameworkError::EntityError(other)),
        },
        other => Err(other),
    }
}
