//! Trailing-edge debounce for text input.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Emits only the last value pushed within `delay` of quiet.
///
/// The pending timer is cancelled when the debouncer is dropped.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    pub fn push(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Instant};

    #[tokio::test(start_paused = true)]
    async fn only_the_last_value_is_emitted() {
        let start = Instant::now();
        let (mut debouncer, mut rx) = Debouncer::new(SEARCH_DEBOUNCE);

        debouncer.push("fr");
        advance(Duration::from_millis(100)).await;
        debouncer.push("fra");
        advance(Duration::from_millis(100)).await;
        debouncer.push("frango");

        assert_eq!(rx.recv().await, Some("frango"));
        assert!(start.elapsed() >= Duration::from_millis(450));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_pending_value() {
        let (mut debouncer, mut rx) = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.push("arroz");
        drop(debouncer);

        // All senders are gone once the aborted task is dropped
        assert_eq!(rx.recv().await, None);
    }
}
