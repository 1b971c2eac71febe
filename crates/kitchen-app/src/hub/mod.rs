//! # Real-time Hub
//!
//! Client side of the push channel that delivers `order:created` and
//! `order:updated`. The protocol layer frames records, the connection owns the
//! socket and its reconnect loop, and [`shared`] hands out the one process-wide
//! connection.

pub mod connection;
pub mod event;
pub mod protocol;

pub use connection::{HubConnection, HubState, ReconnectPolicy};
pub use event::HubEvent;

use std::sync::{Arc, OnceLock};

/// Errors that can occur on the hub connection.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum HubError {
    #[error("Invalid hub URL: {0}")]
    Url(String),

    #[error("Hub connection failed: {0}")]
    Connect(String),

    #[error("Hub handshake failed: {0}")]
    Handshake(String),

    #[error("Hub protocol error: {0}")]
    Protocol(String),

    /// An event whose payload could not be decoded; it is not applied.
    #[error("Invalid hub payload: {0}")]
    Payload(String),

    #[error("Hub connection closed")]
    Closed,
}

static SHARED: OnceLock<Arc<HubConnection>> = OnceLock::new();

/// The process-wide connection, created on first use.
///
/// Later calls return the same connection whatever `url` they pass.
pub fn shared(url: &str) -> Result<Arc<HubConnection>, HubError> {
    if let Some(hub) = SHARED.get() {
        return Ok(hub.clone());
    }
    let hub = Arc::new(HubConnection::new(url)?);
    Ok(SHARED.get_or_init(|| hub).clone())
}
