//! Debate parameters: round-loop control.
//!
//! [`DebateParams`] groups the static limits of one debate run: iteration
//! budget, consensus threshold, stuck detection, and the three timeouts.

use council_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round-loop control parameters.
///
/// | Timeout | Bounds | Default |
/// |---------|--------|---------|
/// | `call_timeout` | one agent call | 60 min |
/// | `judge_timeout` | one coordinator call | 3 min |
/// | `debate_timeout` | the whole debate | 6 h |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateParams {
    /// Maximum completed iterations, initial proposals included.
    pub max_iterations: usize,
    /// Score (0-100) at which the debate stops early.
    pub consensus_threshold: u8,
    pub call_timeout: Duration,
    pub judge_timeout: Duration,
    pub debate_timeout: Duration,
    /// Number of recent scores inspected by stuck detection.
    pub stuck_window: usize,
    /// Spread (points) below which the window counts as stuck.
    pub stuck_band: u8,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            consensus_threshold: 90,
            call_timeout: Duration::from_secs(60 * 60),
            judge_timeout: Duration::from_secs(3 * 60),
            debate_timeout: Duration::from_secs(6 * 60 * 60),
            stuck_window: 3,
            stuck_band: 5,
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: u8) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_judge_timeout(mut self, timeout: Duration) -> Self {
        self.judge_timeout = timeout;
        self
    }

    pub fn with_debate_timeout(mut self, timeout: Duration) -> Self {
        self.debate_timeout = timeout;
        self
    }

    pub fn with_stuck_detection(mut self, window: usize, band: u8) -> Self {
        self.stuck_window = window;
        self.stuck_band = band;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_iterations == 0 {
            return Err(DomainError::InvalidParams(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.consensus_threshold > 100 {
            return Err(DomainError::InvalidParams(format!(
                "consensus_threshold must be 0-100, got {}",
                self.consensus_threshold
            )));
        }
        if self.stuck_window < 2 {
            return Err(DomainError::InvalidParams(
                "stuck_window must cover at least 2 rounds".to_string(),
            ));
        }
        if self.call_timeout.is_zero() || self.judge_timeout.is_zero() {
            return Err(DomainError::InvalidParams(
                "timeouts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
