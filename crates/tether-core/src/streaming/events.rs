//! Bridge RPC event model
//!
//! Only `message_update` frames matter to text reconstruction; every other frame
//! type decodes into [`BridgeEvent::Other`] and is dropped by callers.

use crate::error::TetherResult;
use serde::{Deserialize, Serialize};

/// Assistant event subtype opening a text slot
pub const TEXT_START: &str = "text_start";
/// Assistant event subtype appending to a text slot
pub const TEXT_DELTA: &str = "text_delta";
/// Assistant event subtype closing a text slot
pub const TEXT_END: &str = "text_end";

/// One frame received from the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// Partial update of an assistant message
    MessageUpdate(MessageUpdateEvent),

    /// Any frame type this client does not consume
    #[serde(other)]
    Other,
}

impl BridgeEvent {
    /// Decode one JSON frame. Fails only when the frame is not valid JSON for the model.
    pub fn from_json(frame: &str) -> TetherResult<Self> {
        Ok(serde_json::from_str(frame)?)
    }

    /// The message update carried by this frame, if any
    pub fn into_message_update(self) -> Option<MessageUpdateEvent> {
        match self {
            Self::MessageUpdate(event) => Some(event),
            Self::Other => None,
        }
    }
}

/// Payload of a `message_update` frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUpdateEvent {
    /// Metadata of the message being streamed; absent while the message is still opening
    #[serde(default)]
    pub message: Option<MessageMetadata>,

    pub assistant_message_event: AssistantMessageEvent,
}

impl MessageUpdateEvent {
    pub fn new(message: Option<MessageMetadata>, event: AssistantMessageEvent) -> Self {
        Self {
            message,
            assistant_message_event: event,
        }
    }

    /// Stringified message timestamp, when the bridge attached one
    pub fn message_key(&self) -> Option<String> {
        let timestamp = self.message.as_ref()?.timestamp.as_ref()?;
        Some(match timestamp.as_i64() {
            Some(whole) => whole.to_string(),
            None => match timestamp.as_f64() {
                Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                    (value as i64).to_string()
                }
                _ => timestamp.to_string(),
            },
        })
    }
}

/// Message-level metadata. Unknown fields (role, usage, model, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Number>,
}

impl MessageMetadata {
    pub fn with_timestamp(timestamp: i64) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
        }
    }
}

/// Inner assistant event of a `message_update` frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMessageEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_index: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl AssistantMessageEvent {
    fn bare(event_type: &str, content_index: u32) -> Self {
        Self {
            event_type: event_type.to_string(),
            content_index: Some(content_index),
            delta: None,
            content: None,
        }
    }

    pub fn text_start(content_index: u32) -> Self {
        Self::bare(TEXT_START, content_index)
    }

    pub fn text_delta(content_index: u32, delta: impl Into<String>) -> Self {
        Self {
            delta: Some(delta.into()),
            ..Self::bare(TEXT_DELTA, content_index)
        }
    }

    pub fn text_end(content_index: u32, content: Option<String>) -> Self {
        Self {
            content,
            ..Self::bare(TEXT_END, content_index)
        }
    }

    /// Any other subtype, e.g. `thinking_delta`
    pub fn other(event_type: impl Into<String>, content_index: u32) -> Self {
        Self {
            event_type: event_type.into(),
            content_index: Some(content_index),
            delta: None,
            content: None,
        }
    }

    /// Content slot index; slot 0 when the bridge omitted it
    pub fn slot(&self) -> u32 {
        self.content_index.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message_update() {
        let frame = r#"{
            "type": "message_update",
            "message": {"role": "assistant", "timestamp": 1717171717000},
            "assistantMessageEvent": {
                "type": "text_delta", "contentIndex": 1, "delta": "Hi", "partial": {}
            }
        }"#;

        let event = BridgeEvent::from_json(frame)
            .unwrap()
            .into_message_update()
            .unwrap();

        assert_eq!(event.message_key().as_deref(), Some("1717171717000"));
        assert_eq!(event.assistant_message_event.event_type, TEXT_DELTA);
        assert_eq!(event.assistant_message_event.slot(), 1);
        assert_eq!(event.assistant_message_event.delta.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_decode_without_message() {
        let frame = r#"{"type": "message_update", "message": null,
            "assistantMessageEvent": {"type": "text_start"}}"#;

        let event = BridgeEvent::from_json(frame)
            .unwrap()
            .into_message_update()
            .unwrap();

        assert_eq!(event.message_key(), None);
        assert_eq!(event.assistant_message_event.slot(), 0);
    }

    #[test]
    fn test_other_frames_are_ignored() {
        let event = BridgeEvent::from_json(r#"{"type": "agent_start"}"#).unwrap();
        assert_eq!(event, BridgeEvent::Other);
        assert!(event.into_message_update().is_none());
    }

    #[test]
    fn test_float_timestamp_key() {
        let frame = r#"{"type": "message_update", "message": {"timestamp": 1700.0},
            "assistantMessageEvent": {"type": "text_delta", "delta": "x"}}"#;
        let event = BridgeEvent::from_json(frame)
            .unwrap()
            .into_message_update()
            .unwrap();
        assert_eq!(event.message_key().as_deref(), Some("1700"));
    }

    #[test]
    fn test_malformed_frame() {
        assert!(BridgeEvent::from_json("{\"type\": ").is_err());
    }
}
