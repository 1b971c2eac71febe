//! # Framework Errors
//!
//! This module defines the common error types used throughout the replica framework.
//! Entity-specific failures travel inside [`FrameworkError::EntityError`] so that
//! every actor and client shares one transport-level error shape.

/// Errors that can occur within the replica framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}
