//! Error types for the board actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BoardError {
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order/product API refused or failed the call.
    #[error("API error: {0}")]
    Api(String),

    /// A hub payload that could not be decoded. It is never applied.
    #[error("Invalid order payload: {0}")]
    InvalidPayload(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for BoardError {
    fn from(msg: String) -> Self {
        BoardError::ActorCommunicationError(msg)
    }
}
