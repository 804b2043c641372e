//! Debate memory: the append-only record of a debate.
//!
//! [`DebateMemory`] owns the ordered [`Iteration`] history and the per-agent
//! [`ModelPosition`] lists. The consensus trend is never stored separately;
//! it is read back from `history[].consensus_score`, so there is exactly one
//! place a round's score can be recorded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent name → text produced in one round.
///
/// Keyed by identity, so arrival order within a round never matters.
pub type Responses = BTreeMap<String, String>;

/// One completed round (immutable once appended)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    /// Zero-based round index; equals the iteration's position in the history
    pub round: usize,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub responses: Responses,
    /// 0..=100
    pub consensus_score: u8,
    pub disagreements: Vec<String>,
    /// Score delta against the previous round (positive = improving)
    pub convergence: f64,
}

/// What one agent said in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPosition {
    pub iteration: usize,
    pub position: String,
    pub reasoning: String,
}

/// Read-only snapshot of a debate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebateState {
    pub current_round: usize,
    pub history: Vec<Iteration>,
    pub positions: BTreeMap<String, Vec<ModelPosition>>,
    pub consensus_trend: Vec<u8>,
}

impl DebateState {
    pub fn latest(&self) -> Option<&Iteration> {
        self.history.last()
    }
}

/// Authoritative debate history.
///
/// Mutated only by the debate's own control loop, one round at a time.
#[derive(Debug, Clone, Default)]
pub struct DebateMemory {
    history: Vec<Iteration>,
    positions: BTreeMap<String, Vec<ModelPosition>>,
}

impl DebateMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of appended rounds (also the next round's index).
    pub fn current_round(&self) -> usize {
        self.history.len()
    }

    /// Append a round. Its index is the current round count and its
    /// convergence is the delta between this score and the previous one.
    pub fn add_iteration(
        &mut self,
        responses: Responses,
        consensus_score: u8,
        disagreements: Vec<String>,
    ) -> &Iteration {
        let consensus_score = consensus_score.min(100);
        let convergence = self
            .history
            .last()
            .map(|prev| f64::from(consensus_score) - f64::from(prev.consensus_score))
            .unwrap_or(0.0);

        self.history.push(Iteration {
            round: self.history.len(),
            timestamp: current_timestamp(),
            responses,
            consensus_score,
            disagreements,
            convergence,
        });

        // The push above guarantees a last element.
        &self.history[self.history.len() - 1]
    }

    /// Record what `agent` said, tagged with the current round number.
    pub fn update_model_position(
        &mut self,
        agent: &str,
        position: impl Into<String>,
        reasoning: impl Into<String>,
    ) {
        let iteration = self.current_round();
        self.positions
            .entry(agent.to_string())
            .or_default()
            .push(ModelPosition {
                iteration,
                position: position.into(),
                reasoning: reasoning.into(),
            });
    }

    /// Snapshot of everything appended so far.
    pub fn debate_state(&self) -> DebateState {
        DebateState {
            current_round: self.current_round(),
            history: self.history.clone(),
            positions: self.positions.clone(),
            consensus_trend: self.consensus_trend(),
        }
    }

    pub fn history(&self) -> &[Iteration] {
        &self.history
    }

    pub fn latest(&self) -> Option<&Iteration> {
        self.history.last()
    }

    pub fn consensus_trend(&self) -> Vec<u8> {
        self.history.iter().map(|it| it.consensus_score).collect()
    }

    pub fn positions_of(&self, agent: &str) -> &[ModelPosition] {
        self.positions.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when the last `window` scores span less than `band` points.
    ///
    /// Needs at least `window` completed rounds.
    pub fn is_stuck(&self, window: usize, band: u8) -> bool {
        if window == 0 || self.history.len() < window {
            return false;
        }
        let recent = &self.history[self.history.len() - window..];
        let max = recent.iter().map(|it| it.consensus_score).max();
        let min = recent.iter().map(|it| it.consensus_score).min();
        match (max, min) {
            (Some(max), Some(min)) => max - min < band,
            _ => false,
        }
    }
}

/// Current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
