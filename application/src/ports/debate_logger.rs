//! Port for structured debate logging.
//!
//! Defines the [`DebateLogger`] trait for recording debate events (rounds,
//! consensus judgments, the final outcome) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the debate
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured debate event for logging.
pub struct DebateEvent {
    /// Event type identifier (e.g., "round_completed", "consensus_evaluated").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DebateEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging debate events.
///
/// `log` is synchronous and non-fallible; write failures are dropped by the
/// implementation.
pub trait DebateLogger: Send + Sync {
    fn log(&self, event: DebateEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDebateLogger;

impl DebateLogger for NoDebateLogger {
    fn log(&self, _event: DebateEvent) {}
}
