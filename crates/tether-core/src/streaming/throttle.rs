//! Cadence limiter for UI updates
//!
//! Emits the first offered value immediately, then at most one value per
//! `min_interval_ms` window. Values offered inside a window replace each other;
//! only the latest survives until it is drained or flushed.
//!
//! The throttler never schedules anything itself. Callers poll [`UiUpdateThrottler::drain_ready`]
//! or force delivery with [`UiUpdateThrottler::flush_pending`]. Flushing is the only way
//! two emissions can be spaced closer than `min_interval_ms`.

use std::fmt;
use std::time::Instant;

/// Monotonic millisecond clock
pub type Clock = Box<dyn Fn() -> u64 + Send + Sync>;

/// Minimum-interval coalescing of values destined for the UI
pub struct UiUpdateThrottler<T> {
    min_interval_ms: u64,
    clock: Clock,
    last_emission_ms: Option<u64>,
    pending: Option<T>,
}

impl<T> UiUpdateThrottler<T> {
    /// Create a throttler driven by a monotonic clock anchored at construction
    pub fn new(min_interval_ms: u64) -> Self {
        let origin = Instant::now();
        Self::with_clock(
            min_interval_ms,
            Box::new(move || origin.elapsed().as_millis() as u64),
        )
    }

    /// Create a throttler with an injected clock
    pub fn with_clock(min_interval_ms: u64, clock: Clock) -> Self {
        Self {
            min_interval_ms,
            clock,
            last_emission_ms: None,
            pending: None,
        }
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// Record `value` as the latest update. Returns it when it may be emitted right now.
    pub fn offer(&mut self, value: T) -> Option<T> {
        self.pending = Some(value);
        let now = (self.clock)();
        if self.window_elapsed(now) {
            return self.emit(now);
        }
        None
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Emit the pending value if its window has elapsed
    pub fn drain_ready(&mut self) -> Option<T> {
        if self.pending.is_none() {
            return None;
        }
        let now = (self.clock)();
        if self.window_elapsed(now) {
            return self.emit(now);
        }
        None
    }

    /// Emit the pending value regardless of the window
    pub fn flush_pending(&mut self) -> Option<T> {
        if self.pending.is_none() {
            return None;
        }
        let now = (self.clock)();
        self.emit(now)
    }

    /// Forget the pending value and the last emission
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_emission_ms = None;
    }

    fn window_elapsed(&self, now: u64) -> bool {
        match self.last_emission_ms {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.min_interval_ms,
        }
    }

    fn emit(&mut self, now: u64) -> Option<T> {
        let value = self.pending.take()?;
        self.last_emission_ms = Some(now);
        Some(value)
    }
}

impl<T> fmt::Debug for UiUpdateThrottler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiUpdateThrottler")
            .field("min_interval_ms", &self.min_interval_ms)
            .field("last_emission_ms", &self.last_emission_ms)
            .field("has_pending", &self.pending.is_some())
            .finish()
    }
}
