//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// level = "info"               # overridden by RUST_LOG and -v
/// dir = "~/.local/state/council/logs"
/// transcript = "debates.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Default tracing filter when neither RUST_LOG nor -v is given
    pub level: Option<String>,
    /// Directory for daily-rotated operation logs
    pub dir: Option<String>,
    /// JSONL file receiving one record per debate event
    pub transcript: Option<String>,
}
