//! Streaming assistant text
//!
//! The bridge streams assistant output as `message_update` frames carrying partial
//! text for one content slot of one message. This module rebuilds the full text of
//! each slot and paces how often the UI is told about it:
//! - `events`: wire model of the incoming bridge frames
//! - `assembler`: per-message, per-slot text reconstruction
//! - `throttle`: minimum-interval coalescing of UI updates
//! - `pipeline`: assembler and per-slot throttling wired together

pub mod assembler;
pub mod events;
pub mod pipeline;
pub mod throttle;

pub use assembler::{ACTIVE_MESSAGE_KEY, AssistantTextAssembler, TextUpdateResult};
pub use events::{AssistantMessageEvent, BridgeEvent, MessageMetadata, MessageUpdateEvent};
pub use pipeline::StreamingTextPipeline;
pub use throttle::UiUpdateThrottler;
