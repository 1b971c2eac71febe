//! Order events pushed by the hub.

use super::HubError;
use crate::model::Order;
use serde_json::Value;

pub const ORDER_CREATED: &str = "order:created";
pub const ORDER_UPDATED: &str = "order:updated";

#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    OrderCreated(Order),
    OrderUpdated(Order),
}

impl HubEvent {
    /// Decodes an invocation. Targets other than the two order events yield `None`.
    pub fn from_invocation(target: &str, arguments: &[Value]) -> Result<Option<Self>, HubError> {
        let wrap: fn(Order) -> HubEvent = match target {
            ORDER_CREATED => HubEvent::OrderCreated,
            ORDER_UPDATED => HubEvent::OrderUpdated,
            _ => return Ok(None),
        };
        let payload = arguments
            .first()
            .ok_or_else(|| HubError::Payload(format!("{target}: missing argument")))?;
        let order = serde_json::from_value(payload.clone())
            .map_err(|e| HubError::Payload(format!("{target}: {e}")))?;
        Ok(Some(wrap(order)))
    }

    pub fn target(&self) -> &'static str {
        match self {
            HubEvent::OrderCreated(_) => ORDER_CREATED,
            HubEvent::OrderUpdated(_) => ORDER_UPDATED,
        }
    }

    pub fn order(&self) -> &Order {
        match self {
            HubEvent::OrderCreated(order) | HubEvent::OrderUpdated(order) => order,
        }
    }
}
