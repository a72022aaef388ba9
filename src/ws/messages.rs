//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp. Optional on client messages.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped now.
    #[must_use]
    pub fn new(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error reply.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u16, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }

    /// Serializes to a JSON text frame body.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send as the `payload` of a command message.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events for placements. `"*"` subscribes to all.
    Subscribe {
        /// Placement tags, e.g. `["top", "newsletter"]` or `["*"]`.
        ad_types: Vec<String>,
    },
    /// Unsubscribe from placements. `"*"` drops the wildcard.
    Unsubscribe {
        /// Placement tags.
        ad_types: Vec<String>,
    },
    /// Fetch the current state of one booking.
    GetBooking {
        /// Booking UUID.
        booking_id: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn command_payload_parses() {
        let Ok(cmd) = serde_json::from_str::<WsCommand>(
            r#"{"command":"subscribe","ad_types":["top","*"]}"#,
        ) else {
            panic!("subscribe should parse");
        };
        assert_eq!(
            cmd,
            WsCommand::Subscribe {
                ad_types: vec!["top".to_string(), "*".to_string()]
            }
        );
    }

    #[test]
    fn client_envelope_needs_no_timestamp() {
        let parsed = serde_json::from_str::<WsMessage>(
            r#"{"id":"c1","type":"command","payload":{"command":"get_booking","booking_id":"x"}}"#,
        );
        assert!(parsed.is_ok());
    }
}
