//! Tap and hold-to-trigger on a card's urgent button.
//!
//! Pressing arms a timer. If it runs out first the hold submits the urgent order;
//! if the button is released first the release counts as a tap and submits it
//! instead. Whichever side claims the gesture first wins, so one gesture never
//! submits twice.

use super::CardClient;
use crate::card_actor::CardError;
use crate::model::{Order, ProductId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

pub const HOLD_DELAY: Duration = Duration::from_millis(500);

type HoldTask = JoinHandle<Option<Result<Order, CardError>>>;

/// How a gesture ended.
#[derive(Debug, PartialEq)]
pub enum Gesture {
    /// Released before the hold delay; the release submitted the order.
    Tap(Result<Order, CardError>),
    /// The hold delay ran out and the timer submitted the order.
    Held(Result<Order, CardError>),
    /// The hold was abandoned before anything was submitted.
    Cancelled,
    /// No gesture was in progress.
    Idle,
}

pub struct UrgentButton {
    cards: CardClient,
    product: ProductId,
    hold: Duration,
    claimed: Arc<AtomicBool>,
    timer: Option<HoldTask>,
}

impl UrgentButton {
    pub fn new(cards: CardClient, product: ProductId) -> Self {
        Self::with_hold(cards, product, HOLD_DELAY)
    }

    pub fn with_hold(cards: CardClient, product: ProductId, hold: Duration) -> Self {
        Self {
            cards,
            product,
            hold,
            claimed: Arc::new(AtomicBool::new(false)),
            timer: None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.timer.is_some() && !self.claimed.load(Ordering::SeqCst)
    }

    /// Starts a gesture, abandoning any hold still armed.
    pub fn press(&mut self) {
        self.disarm();
        let claimed = Arc::new(AtomicBool::new(false));
        self.claimed = claimed.clone();

        let cards = self.cards.clone();
        let product = self.product.clone();
        let hold = self.hold;
        self.timer = Some(tokio::spawn(async move {
            sleep(hold).await;
            if claimed.swap(true, Ordering::SeqCst) {
                return None;
            }
            debug!(%product, "Hold fired");
            Some(cards.send_urgent(&product).await)
        }));
    }

    /// Ends the gesture. Before the hold delay this is a tap; after it, the result
    /// of the hold's submission.
    pub async fn release(&mut self) -> Gesture {
        let Some(timer) = self.timer.take() else {
            return Gesture::Idle;
        };
        if !self.claimed.swap(true, Ordering::SeqCst) {
            timer.abort();
            debug!(product = %self.product, "Tap");
            return Gesture::Tap(self.cards.send_urgent(&self.product).await);
        }
        match timer.await {
            Ok(Some(result)) => Gesture::Held(result),
            _ => Gesture::Cancelled,
        }
    }

    /// The pointer left the button. Cancels a hold that has not fired yet and
    /// reports whether it did.
    pub fn leave(&mut self) -> bool {
        self.disarm()
    }

    /// Aborts an armed timer that has not claimed the gesture. A hold that already
    /// fired is detached and finishes its submission.
    fn disarm(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) if !self.claimed.swap(true, Ordering::SeqCst) => {
                timer.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for UrgentButton {
    fn drop(&mut self) {
        if self.disarm() {
            debug!(product = %self.product, "Hold cancelled on teardown");
        }
    }
}
