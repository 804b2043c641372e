//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod debate;
mod logging;
mod output;
mod ranking;

pub use agents::{FileAgentEntry, FileCoordinatorConfig, parse_agents};
pub use debate::FileDebateConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use ranking::{FileRankingConfig, RankingStrategy};

use crate::invoker::CliInvokerConfig;
use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round-loop limits and timeouts
    pub debate: FileDebateConfig,
    /// Debating agents; empty means the built-in roster
    pub agents: Vec<FileAgentEntry>,
    /// Consensus judge and ranker
    pub coordinator: FileCoordinatorConfig,
    /// Command line used to reach every model
    pub invoker: CliInvokerConfig,
    /// Base-answer selection
    pub ranking: FileRankingConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Operation log and debate transcript
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Debate ranges (iterations, threshold, timeouts, stuck window)
    /// 2. The agent roster (blanks, duplicates, size)
    /// 3. The invoker program name
    /// 4. Enum parse failures (ranking strategy)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.validate_roster(true)
    }

    /// Like [`validate`](Self::validate), but skips the `[[agents]]` checks
    /// when the roster comes from somewhere else (e.g. `--agent` flags).
    pub fn validate_roster(&self, check_agents: bool) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.debate.to_params().1);
        if check_agents {
            issues.extend(parse_agents(&self.agents).1);
        }

        if self.invoker.program.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyAgentField {
                    field: "invoker.program".to_string(),
                },
                "invoker.program cannot be empty",
            ));
        }

        issues.extend(self.ranking.parse_strategy().1);

        issues
    }
}
