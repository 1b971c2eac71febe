//! Transient toast stack.

use super::Toast;
use std::time::Duration;
use tokio::time::Instant;

pub const TOAST_TTL: Duration = Duration::from_millis(3500);

/// Toasts currently on screen, each expiring `ttl` after it was pushed.
#[derive(Debug)]
pub struct ToastTray {
    ttl: Duration,
    items: Vec<(Instant, Toast)>,
}

impl Default for ToastTray {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl ToastTray {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, toast: Toast, now: Instant) {
        self.items.push((now + self.ttl, toast));
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn visible(&mut self, now: Instant) -> Vec<&Toast> {
        self.items.retain(|(expires, _)| *expires > now);
        self.items.iter().map(|(_, toast)| toast).collect()
    }

    /// When the next toast expires, if any.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.items.iter().map(|(expires, _)| *expires).min()
    }
}
