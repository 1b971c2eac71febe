//! JSON hub protocol framing.
//!
//! Every message is a JSON object terminated by the record separator `0x1E`; one
//! WebSocket frame may carry several records. The client opens with a handshake
//! record naming the protocol and the server answers with `{}` or an error.

use super::HubError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RECORD_SEPARATOR: char = '\u{1e}';

const INVOCATION: u64 = 1;
const PING: u64 = 6;
const CLOSE: u64 = 7;

#[derive(Serialize)]
struct HandshakeRequest<'a> {
    protocol: &'a str,
    version: u32,
}

#[derive(Deserialize)]
struct HandshakeResponse {
    error: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arguments: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HubMessage {
    Invocation { target: String, arguments: Vec<Value> },
    Ping,
    Close { error: Option<String> },
    /// Any other message type; the client has no use for them.
    Other(u64),
}

fn record(json: String) -> String {
    let mut out = json;
    out.push(RECORD_SEPARATOR);
    out
}

pub fn handshake_request() -> String {
    let body = HandshakeRequest {
        protocol: "json",
        version: 1,
    };
    // Serializing two plain fields cannot fail
    record(serde_json::to_string(&body).unwrap_or_default())
}

/// Checks the server's handshake answer.
pub fn check_handshake(record: &str) -> Result<(), HubError> {
    let response: HandshakeResponse =
        serde_json::from_str(record).map_err(|e| HubError::Handshake(e.to_string()))?;
    match response.error {
        Some(error) => Err(HubError::Handshake(error)),
        None => Ok(()),
    }
}

/// Non-empty records of one frame.
pub fn split_records(frame: &str) -> impl Iterator<Item = &str> {
    frame
        .split(RECORD_SEPARATOR)
        .filter(|r| !r.trim().is_empty())
}

impl HubMessage {
    pub fn parse(record: &str) -> Result<Self, HubError> {
        let raw: RawMessage =
            serde_json::from_str(record).map_err(|e| HubError::Protocol(e.to_string()))?;
        Ok(match raw.kind {
            INVOCATION => HubMessage::Invocation {
                target: raw
                    .target
                    .ok_or_else(|| HubError::Protocol("invocation without target".into()))?,
                arguments: raw.arguments.unwrap_or_default(),
            },
            PING => HubMessage::Ping,
            CLOSE => HubMessage::Close { error: raw.error },
            other => HubMessage::Other(other),
        })
    }

    /// Encodes a message as one record.
    pub fn encode(&self) -> Result<String, HubError> {
        let raw = match self {
            HubMessage::Invocation { target, arguments } => RawMessage {
                kind: INVOCATION,
                target: Some(target.clone()),
                arguments: Some(arguments.clone()),
                error: None,
            },
            HubMessage::Ping => RawMessage {
                kind: PING,
                target: None,
                arguments: None,
                error: None,
            },
            HubMessage::Close { error } => RawMessage {
                kind: CLOSE,
                target: None,
                arguments: None,
                error: error.clone(),
            },
            HubMessage::Other(kind) => RawMessage {
                kind: *kind,
                target: None,
                arguments: None,
                error: None,
            },
        };
        serde_json::to_string(&raw)
            .map(record)
            .map_err(|e| HubError::Protocol(e.to_string()))
    }
}

/// Rewrites an `http(s)` hub URL to the matching `ws(s)` scheme.
pub fn websocket_url(url: &str) -> Result<String, HubError> {
    let mut parsed = reqwest::Url::parse(url).map_err(|e| HubError::Url(format!("{url}: {e}")))?;
    let scheme = match parsed.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(HubError::Url(format!("{url}: unsupported scheme {other}"))),
    };
    parsed
        .set_scheme(scheme)
        .map_err(|_| HubError::Url(format!("{url}: cannot use scheme {scheme}")))?;
    Ok(parsed.to_string())
}
