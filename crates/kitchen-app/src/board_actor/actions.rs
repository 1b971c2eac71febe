//! Custom actions for the board actor.

use crate::model::OrderId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    /// Marks the order Completed through the API. The order leaves the board
    /// once the call succeeds.
    Complete,
}

/// Results from BoardActions - variants match 1:1 with BoardAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardActionResult {
    Completed(OrderId),
}
