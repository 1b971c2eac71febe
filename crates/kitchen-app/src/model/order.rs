//! Orders as the kitchen sees them.
//!
//! # Replica
//! [`Order`] implements the [`ReplicaEntity`](replica_actor::ReplicaEntity) trait
//! (see [`crate::board_actor`]), so a [`ReplicaActor`](replica_actor::ReplicaActor)
//! can hold the kitchen board's copy of the remote order list.
use crate::model::{OrderStatus, ProductId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;

/// Floor used by the countdown when an order reports no preparation time at all.
pub const MIN_PREP_SECONDS: u32 = 60;

/// Type-safe identifier for Orders, as assigned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// `#` followed by the first 8 characters, as shown on tickets and toasts.
    pub fn short(&self) -> String {
        let head: String = self.0.chars().take(8).collect();
        format!("#{head}")
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub prep_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub is_urgent: bool,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Accepts RFC 3339 and offset-less ISO timestamps; the latter are taken as UTC.
fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
        })
        .map_err(|_| format!("Invalid timestamp: {raw}"))
}

impl Order {
    /// `"<name> x<qty>"` per item, joined by `" • "`.
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} x{}", item.product_name, item.quantity))
            .collect::<Vec<_>>()
            .join(" • ")
    }

    /// The slowest item's preparation time, floored at [`MIN_PREP_SECONDS`] when
    /// no item reports one.
    pub fn max_prep_seconds(&self) -> u32 {
        match self.items.iter().map(|item| item.prep_seconds).max() {
            Some(max) if max > 0 => max,
            _ => MIN_PREP_SECONDS,
        }
    }

    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product_id == product_id)
    }
}

/// Kitchen board ordering: urgent first, then status rank, then newest first.
pub fn board_order(a: &Order, b: &Order) -> Ordering {
    b.is_urgent
        .cmp(&a.is_urgent)
        .then_with(|| a.status.rank().cmp(&b.status.rank()))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderLine>,
    pub is_urgent: bool,
}

impl OrderCreate {
    /// A single unit of one product.
    pub fn single(product_id: ProductId, is_urgent: bool) -> Self {
        Self {
            items: vec![OrderLine {
                product_id,
                quantity: 1,
            }],
            is_urgent,
        }
    }
}

/// Body of `PATCH /api/orders/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}
