//! Order status and its single wire decoder.
//!
//! The API serializes status either as the variant name or as its numeric code,
//! depending on the endpoint and on whether the payload came over the hub. Every
//! payload goes through [`OrderStatus::decode`]; nothing else interprets status.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// A status value that is not one of the known variants.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StatusDecodeError {
    #[error("Unknown status code: {0}")]
    UnknownCode(u64),

    #[error("Unknown status name: {0}")]
    UnknownName(String),

    #[error("Status must be a string or an integer, got {0}")]
    InvalidType(String),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "InProgress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Numeric code used by the hub.
    pub fn code(&self) -> u64 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::InProgress => 1,
            OrderStatus::Completed => 2,
            OrderStatus::Cancelled => 3,
        }
    }

    pub fn from_code(code: u64) -> Result<Self, StatusDecodeError> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or(StatusDecodeError::UnknownCode(code))
    }

    pub fn from_name(name: &str) -> Result<Self, StatusDecodeError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| StatusDecodeError::UnknownName(name.to_string()))
    }

    /// Decodes a status from either wire form.
    pub fn decode(value: &Value) -> Result<Self, StatusDecodeError> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(code) => Self::from_code(code),
                None => Err(StatusDecodeError::InvalidType(n.to_string())),
            },
            Value::String(name) => Self::from_name(name),
            other => Err(StatusDecodeError::InvalidType(other.to_string())),
        }
    }

    /// Board ordering rank: Pending, then InProgress, then everything else.
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::InProgress => 1,
            OrderStatus::Completed | OrderStatus::Cancelled => 2,
        }
    }

    /// Active orders stay on the kitchen board.
    pub fn is_active(&self) -> bool {
        !matches!(self, OrderStatus::Completed)
    }

    /// Closed orders release an outstanding submission slot.
    pub fn is_closed(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        OrderStatus::decode(&value).map_err(serde::de::Error::custom)
    }
}
