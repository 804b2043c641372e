//! Round-loop configuration from TOML (`[debate]` section)

use council_application::DebateParams;
use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Iteration budgets past this draw a warning.
const MANY_ITERATIONS: usize = 20;

/// Raw debate configuration from TOML
///
/// # Example
///
/// ```toml
/// [debate]
/// max_iterations = 5
/// consensus_threshold = 90
/// call_timeout_mins = 60
/// judge_timeout_secs = 180
/// debate_timeout_mins = 360
/// stuck_window = 3
/// stuck_band = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub max_iterations: usize,
    pub consensus_threshold: u8,
    pub call_timeout_mins: u64,
    pub judge_timeout_secs: u64,
    pub debate_timeout_mins: u64,
    pub stuck_window: usize,
    pub stuck_band: u8,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let params = DebateParams::default();
        Self {
            max_iterations: params.max_iterations,
            consensus_threshold: params.consensus_threshold,
            call_timeout_mins: params.call_timeout.as_secs() / 60,
            judge_timeout_secs: params.judge_timeout.as_secs(),
            debate_timeout_mins: params.debate_timeout.as_secs() / 60,
            stuck_window: params.stuck_window,
            stuck_band: params.stuck_band,
        }
    }
}

impl FileDebateConfig {
    /// Convert to [`DebateParams`], collecting range issues.
    ///
    /// Out-of-range values are reported as errors and replaced by defaults
    /// so the returned params are always usable.
    pub fn to_params(&self) -> (DebateParams, Vec<ConfigIssue>) {
        let defaults = DebateParams::default();
        let mut issues = Vec::new();
        let mut out_of_range = |field: &str, value: String, expected: &str| {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: format!("debate.{}", field),
                    value: value.clone(),
                },
                format!("debate.{}: {} is out of range ({})", field, value, expected),
            ));
        };

        let max_iterations = if self.max_iterations == 0 {
            out_of_range("max_iterations", "0".into(), "at least 1");
            defaults.max_iterations
        } else {
            self.max_iterations
        };

        let consensus_threshold = if self.consensus_threshold > 100 {
            out_of_range(
                "consensus_threshold",
                self.consensus_threshold.to_string(),
                "0-100",
            );
            defaults.consensus_threshold
        } else {
            self.consensus_threshold
        };

        let call_timeout = if self.call_timeout_mins == 0 {
            out_of_range("call_timeout_mins", "0".into(), "at least 1");
            defaults.call_timeout
        } else {
            Duration::from_secs(self.call_timeout_mins * 60)
        };

        let judge_timeout = if self.judge_timeout_secs == 0 {
            out_of_range("judge_timeout_secs", "0".into(), "at least 1");
            defaults.judge_timeout
        } else {
            Duration::from_secs(self.judge_timeout_secs)
        };

        let debate_timeout = if self.debate_timeout_mins == 0 {
            out_of_range("debate_timeout_mins", "0".into(), "at least 1");
            defaults.debate_timeout
        } else {
            Duration::from_secs(self.debate_timeout_mins * 60)
        };

        let stuck_window = if self.stuck_window < 2 {
            out_of_range(
                "stuck_window",
                self.stuck_window.to_string(),
                "at least 2",
            );
            defaults.stuck_window
        } else {
            self.stuck_window
        };

        if max_iterations > MANY_ITERATIONS {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "debate.max_iterations".to_string(),
                    value: max_iterations.to_string(),
                },
                format!(
                    "debate.max_iterations: {} rounds can take a very long time",
                    max_iterations
                ),
            ));
        }

        let params = DebateParams {
            max_iterations,
            consensus_threshold,
            call_timeout,
            judge_timeout,
            debate_timeout,
            stuck_window,
            stuck_band: self.stuck_band,
        };
        (params, issues)
    }
}
