//! Core library for Tether
//!
//! Tether is the client side of a remote coding-assistant bridge. This crate holds
//! the pieces that do not depend on an async runtime:
//! - `error`: the shared error type
//! - `config`: layered configuration loading
//! - `streaming`: reconstruction and pacing of streamed assistant text

pub mod config;
pub mod error;
pub mod streaming;

pub use config::{AssemblerConfig, ConfigLoader, TetherConfig, ThrottleConfig};
pub use error::{TetherError, TetherResult};
pub use streaming::{
    ACTIVE_MESSAGE_KEY, AssistantMessageEvent, AssistantTextAssembler, BridgeEvent,
    MessageMetadata, MessageUpdateEvent, StreamingTextPipeline, TextUpdateResult,
    UiUpdateThrottler,
};
