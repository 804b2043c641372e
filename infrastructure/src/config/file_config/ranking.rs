//! Ranking configuration from TOML (`[ranking]` section)

use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// How the base of the final answer is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingStrategy {
    /// Coordinator scores each answer, overlap as fallback
    #[default]
    Moderator,
    /// Vocabulary overlap only, no model call
    Overlap,
}

/// Raw ranking configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRankingConfig {
    pub strategy: String,
}

impl Default for FileRankingConfig {
    fn default() -> Self {
        Self {
            strategy: "moderator".to_string(),
        }
    }
}

impl FileRankingConfig {
    pub fn parse_strategy(&self) -> (RankingStrategy, Vec<ConfigIssue>) {
        match self.strategy.trim().to_lowercase().as_str() {
            "moderator" | "coordinator" => (RankingStrategy::Moderator, Vec::new()),
            "overlap" => (RankingStrategy::Overlap, Vec::new()),
            _ => (
                RankingStrategy::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "ranking.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: vec!["moderator".to_string(), "overlap".to_string()],
                    },
                    format!(
                        "ranking.strategy: unknown value '{}', falling back to 'moderator'",
                        self.strategy
                    ),
                )],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        let overlap = FileRankingConfig {
            strategy: "Overlap".to_string(),
        };
        assert_eq!(overlap.parse_strategy().0, RankingStrategy::Overlap);

        let unknown = FileRankingConfig {
            strategy: "vibes".to_string(),
        };
        let (strategy, issues) = unknown.parse_strategy();
        assert_eq!(strategy, RankingStrategy::Moderator);
        assert_eq!(issues.len(), 1);
    }
}
