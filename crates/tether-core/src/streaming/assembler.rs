//! Reconstruction of streamed assistant text
//!
//! Text arrives as `text_start` / `text_delta` / `text_end` events addressed by a
//! message key (the message timestamp) and a content slot index. Several messages
//! and several slots of one message can be open at the same time, so every
//! `(message key, slot)` pair gets its own buffer.
//!
//! Memory is bounded: once more than `max_tracked_messages` message keys are held,
//! the key that was created first is dropped with all of its slots.

use super::events::{MessageUpdateEvent, TEXT_DELTA, TEXT_END, TEXT_START};
use std::collections::{HashMap, VecDeque};

/// Key used for events whose message carries no timestamp yet
pub const ACTIVE_MESSAGE_KEY: &str = "__active__";

/// Outcome of applying one text event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUpdateResult {
    pub message_key: String,
    pub content_index: u32,
    /// Full text of the slot after the event
    pub text: String,
    pub is_final: bool,
}

#[derive(Debug, Default)]
struct SlotBuffer {
    text: String,
    is_final: bool,
}

/// Per-message, per-slot text assembler
#[derive(Debug)]
pub struct AssistantTextAssembler {
    max_tracked_messages: usize,
    messages: HashMap<String, HashMap<u32, SlotBuffer>>,
    /// Message keys in creation order, oldest first
    creation_order: VecDeque<String>,
}

impl AssistantTextAssembler {
    /// Create an assembler keeping at most `max_tracked_messages` messages (at least one)
    pub fn new(max_tracked_messages: usize) -> Self {
        Self {
            max_tracked_messages: max_tracked_messages.max(1),
            messages: HashMap::new(),
            creation_order: VecDeque::new(),
        }
    }

    /// Apply one update. Returns `None` for non-text subtypes, which leave state untouched.
    pub fn apply(&mut self, event: &MessageUpdateEvent) -> Option<TextUpdateResult> {
        let inner = &event.assistant_message_event;
        let event_type = inner.event_type.as_str();
        if !matches!(event_type, TEXT_START | TEXT_DELTA | TEXT_END) {
            return None;
        }

        let message_key = event
            .message_key()
            .unwrap_or_else(|| ACTIVE_MESSAGE_KEY.to_string());
        let content_index = inner.slot();

        let buffer = self.slot_mut(&message_key, content_index);
        match event_type {
            TEXT_START => {
                buffer.text.clear();
                buffer.is_final = false;
            }
            TEXT_DELTA => {
                if let Some(delta) = &inner.delta {
                    buffer.text.push_str(delta);
                }
                buffer.is_final = false;
            }
            _ => {
                if let Some(content) = &inner.content {
                    buffer.text.clone_from(content);
                }
                buffer.is_final = true;
            }
        }

        let result = TextUpdateResult {
            message_key,
            content_index,
            text: buffer.text.clone(),
            is_final: buffer.is_final,
        };

        self.evict_overflow();
        Some(result)
    }

    /// Current text of a slot, or `None` when it is not tracked (never seen or evicted)
    pub fn snapshot(&self, message_key: &str, content_index: u32) -> Option<String> {
        self.messages
            .get(message_key)?
            .get(&content_index)
            .map(|buffer| buffer.text.clone())
    }

    pub fn is_tracked(&self, message_key: &str) -> bool {
        self.messages.contains_key(message_key)
    }

    pub fn tracked_message_count(&self) -> usize {
        self.messages.len()
    }

    /// Drop every tracked message
    pub fn clear(&mut self) {
        self.messages.clear();
        self.creation_order.clear();
    }

    fn slot_mut(&mut self, message_key: &str, content_index: u32) -> &mut SlotBuffer {
        if !self.messages.contains_key(message_key) {
            self.creation_order.push_back(message_key.to_string());
        }
        self.messages
            .entry(message_key.to_string())
            .or_default()
            .entry(content_index)
            .or_default()
    }

    fn evict_overflow(&mut self) {
        while self.messages.len() > self.max_tracked_messages {
            let Some(oldest) = self.creation_order.pop_front() else {
                break;
            };
            self.messages.remove(&oldest);
            tracing::debug!("Evicted streamed message {}", oldest);
        }
    }
}

impl Default for AssistantTextAssembler {
    fn default() -> Self {
        Self::new(32)
    }
}
