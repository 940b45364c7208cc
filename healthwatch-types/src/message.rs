//! Frames exchanged with the observation backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{HealthRecord, MessageError};

/// Acknowledgement or keepalive sent by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Reply to a ping.
    Pong,
    /// Acknowledgement of a request.
    Received,
}

impl ControlMessage {
    /// Recognize the value of a frame's `message` field.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "pong" => Some(ControlMessage::Pong),
            "Received" => Some(ControlMessage::Received),
            _ => None,
        }
    }
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Discarded by consumers.
    Control(ControlMessage),
    /// A new observation to append.
    Record(HealthRecord),
}

impl InboundMessage {
    /// Decode a text frame.
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Decode a binary frame holding UTF-8 JSON.
    pub fn parse_slice(bytes: &[u8]) -> Result<Self, MessageError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    /// Classify an already-parsed JSON value.
    ///
    /// An object whose `message` field is a recognized control tag is a
    /// control message. Every other object is decoded as a record; fields
    /// of the wrong type are left empty rather than rejecting the frame.
    pub fn from_value(value: Value) -> Result<Self, MessageError> {
        let Value::Object(ref map) = value else {
            return Err(MessageError::NotAnObject(json_kind(&value)));
        };

        if let Some(control) = map.get("message").and_then(Value::as_str).and_then(ControlMessage::from_tag)
        {
            return Ok(InboundMessage::Control(control));
        }

        serde_json::from_value(value)
            .map(InboundMessage::Record)
            .map_err(|e| MessageError::InvalidRecord(e.to_string()))
    }
}

/// Requests sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Sent once on every successful connection.
    SendInitialData,
    /// Periodic keepalive.
    Ping { message: String },
}

impl OutboundMessage {
    /// The keepalive frame `{"action":"ping","message":"ping"}`.
    pub fn ping() -> Self {
        OutboundMessage::Ping {
            message: "ping".to_string(),
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn to_json(&self) -> String {
        // Serializing a fieldless or string-only enum cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
