//! Assembler and throttling wired together
//!
//! Each `(message key, slot)` pair gets its own throttler so a busy slot cannot
//! starve another one. Final updates bypass the window: the slot is flushed and
//! its throttler dropped.

use super::assembler::{AssistantTextAssembler, TextUpdateResult};
use super::events::MessageUpdateEvent;
use super::throttle::{Clock, UiUpdateThrottler};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

type SlotKey = (String, u32);

/// Turns bridge message updates into paced UI text updates
pub struct StreamingTextPipeline {
    assembler: AssistantTextAssembler,
    min_interval_ms: u64,
    clock: Arc<dyn Fn() -> u64 + Send + Sync>,
    throttlers: HashMap<SlotKey, UiUpdateThrottler<TextUpdateResult>>,
}

impl StreamingTextPipeline {
    pub fn new(max_tracked_messages: usize, min_interval_ms: u64) -> Self {
        let origin = Instant::now();
        Self::with_clock(
            max_tracked_messages,
            min_interval_ms,
            Arc::new(move || origin.elapsed().as_millis() as u64),
        )
    }

    pub fn with_clock(
        max_tracked_messages: usize,
        min_interval_ms: u64,
        clock: Arc<dyn Fn() -> u64 + Send + Sync>,
    ) -> Self {
        Self {
            assembler: AssistantTextAssembler::new(max_tracked_messages),
            min_interval_ms,
            clock,
            throttlers: HashMap::new(),
        }
    }

    /// Apply one event and return the updates that should be rendered now
    pub fn apply(&mut self, event: &MessageUpdateEvent) -> Vec<TextUpdateResult> {
        let Some(update) = self.assembler.apply(event) else {
            return Vec::new();
        };

        let assembler = &self.assembler;
        self.throttlers.retain(|(message_key, _), throttler| {
            throttler.has_pending() || assembler.is_tracked(message_key)
        });

        let key = (update.message_key.clone(), update.content_index);
        if update.is_final {
            // The final text supersedes anything still pending for the slot
            self.throttlers.remove(&key);
            return vec![update];
        }

        let throttler = self.throttler_for(key);
        throttler.offer(update).into_iter().collect()
    }

    /// Collect pending updates whose window has elapsed
    pub fn drain_ready(&mut self) -> Vec<TextUpdateResult> {
        self.throttlers
            .values_mut()
            .filter_map(|throttler| throttler.drain_ready())
            .collect()
    }

    /// Force out every pending update, e.g. when the stream ends
    pub fn flush_all(&mut self) -> Vec<TextUpdateResult> {
        self.throttlers
            .drain()
            .filter_map(|(_, mut throttler)| throttler.flush_pending())
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        self.throttlers.values().any(|throttler| throttler.has_pending())
    }

    pub fn assembler(&self) -> &AssistantTextAssembler {
        &self.assembler
    }

    fn throttler_for(&mut self, key: SlotKey) -> &mut UiUpdateThrottler<TextUpdateResult> {
        let min_interval_ms = self.min_interval_ms;
        let clock = Arc::clone(&self.clock);
        self.throttlers.entry(key).or_insert_with(|| {
            let boxed: Clock = Box::new(move || clock());
            UiUpdateThrottler::with_clock(min_interval_ms, boxed)
        })
    }
}
