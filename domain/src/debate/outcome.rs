//! Debate outcome types: why the loop stopped and what it produced.

use super::consensus::ConsensusResult;
use super::memory::DebateState;
use crate::core::agent::Agent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why the round loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Threshold met on the initial consensus check
    EarlyExit,
    /// Threshold met in an iterative round
    Converged,
    /// Scores stopped moving
    Stuck,
    /// Iteration budget spent without reaching the threshold
    Exhausted,
    /// Overall debate deadline hit
    DeadlineExceeded,
    /// Cancelled by the caller
    Cancelled,
}

impl TerminationReason {
    /// Whether the threshold was reached.
    pub fn is_converged(&self) -> bool {
        matches!(self, TerminationReason::EarlyExit | TerminationReason::Converged)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::EarlyExit => "early_exit",
            TerminationReason::Converged => "converged",
            TerminationReason::Stuck => "stuck",
            TerminationReason::Exhausted => "exhausted",
            TerminationReason::DeadlineExceeded => "deadline_exceeded",
            TerminationReason::Cancelled => "cancelled",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TerminationReason::EarlyExit => "agents agreed on their initial proposals",
            TerminationReason::Converged => "agents converged during debate",
            TerminationReason::Stuck => "consensus stopped moving, debate declared stuck",
            TerminationReason::Exhausted => "iteration budget exhausted without full consensus",
            TerminationReason::DeadlineExceeded => "debate deadline exceeded",
            TerminationReason::Cancelled => "debate cancelled",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the response-ranking collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub best_agent: String,
    pub scores_by_agent: BTreeMap<String, f64>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Complete result of a debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateResult {
    pub question: String,
    pub participants: Vec<Agent>,
    /// Assembled final answer
    pub solution: String,
    /// Completed iterations, initial proposals included
    pub iterations: usize,
    pub final_consensus: u8,
    pub termination: TerminationReason,
    /// Agent whose response was used as the base answer
    pub base_agent: String,
    pub ranking: RankingResult,
    /// How consensus evolved, in prose
    pub summary: String,
    /// Judgment of the last completed iteration
    pub final_judgment: ConsensusResult,
    pub debate_history: DebateState,
}

impl DebateResult {
    pub fn consensus_trend(&self) -> &[u8] {
        &self.debate_history.consensus_trend
    }

    /// Disagreements left open by the last completed iteration.
    pub fn unresolved_disagreements(&self) -> &[String] {
        self.debate_history
            .latest()
            .map(|it| it.disagreements.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converged_reasons() {
        assert!(TerminationReason::EarlyExit.is_converged());
        assert!(TerminationReason::Converged.is_converged());
        assert!(!TerminationReason::Stuck.is_converged());
        assert!(!TerminationReason::Exhausted.is_converged());
        assert!(!TerminationReason::DeadlineExceeded.is_converged());
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        let json = serde_json::to_string(&TerminationReason::DeadlineExceeded).unwrap();
        assert_eq!(json, "\"deadline_exceeded\"");
        assert_eq!(TerminationReason::EarlyExit.to_string(), "early_exit");
    }
}
