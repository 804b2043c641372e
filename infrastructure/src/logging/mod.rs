//! Logging infrastructure for structured debate transcripts.
//!
//! Provides [`JsonlDebateLogger`], a JSONL file writer that implements
//! the [`DebateLogger`](council_application::DebateLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlDebateLogger;
