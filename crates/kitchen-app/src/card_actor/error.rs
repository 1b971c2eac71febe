//! Error types for the card actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CardError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("{0} is unavailable")]
    Unavailable(String),

    /// A normal order for this card is still outstanding.
    #[error("An order for {0} is already in progress")]
    NormalOutstanding(String),

    #[error("API error: {0}")]
    Api(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CardError {
    fn from(msg: String) -> Self {
        CardError::ActorCommunicationError(msg)
    }
}
