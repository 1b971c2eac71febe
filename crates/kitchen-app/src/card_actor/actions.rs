//! Updates and custom actions for product cards.

use crate::model::{Order, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Normal,
    Urgent,
}

impl Priority {
    pub fn is_urgent(self) -> bool {
        self == Priority::Urgent
    }
}

/// Pushed changes a card reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum CardUpdate {
    /// A fresher copy of the card's product.
    Product(Product),
    /// An order touching the card's product changed on the hub.
    OrderChanged(Order),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Submits one unit of the card's product.
    Send(Priority),
    /// Completes the outstanding urgent order, or the normal one if there is none.
    CompleteOne,
}

/// Results from CardActions - variants match 1:1 with CardAction
#[derive(Debug, Clone, PartialEq)]
pub enum CardActionResult {
    Sent(Order),
    /// The order that was completed, `None` when nothing was outstanding.
    Completed(Option<Order>),
}
