//! Consensus judgment types
//!
//! A [`ConsensusResult`] is produced fresh for every round, either by the
//! coordinator model (parsed from its JSON reply) or by the keyword-overlap
//! heuristic. It is never mutated after creation.

use serde::{Deserialize, Serialize};

/// Score at or above which consensus counts as strong.
pub const STRONG_CONSENSUS: u8 = 90;

/// Qualitative band of a consensus score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLevel {
    /// ≥ 90
    Strong,
    /// 70–89
    Moderate,
    /// 50–69
    Weak,
    /// < 50
    None,
}

impl ConsensusLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= STRONG_CONSENSUS => ConsensusLevel::Strong,
            70..=89 => ConsensusLevel::Moderate,
            50..=69 => ConsensusLevel::Weak,
            _ => ConsensusLevel::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusLevel::Strong => "strong",
            ConsensusLevel::Moderate => "moderate",
            ConsensusLevel::Weak => "weak",
            ConsensusLevel::None => "none",
        }
    }
}

impl std::fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction the debate is moving in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvergenceTrend {
    Improving,
    #[default]
    Stable,
    Diverging,
}

impl ConvergenceTrend {
    /// Smallest score change that counts as movement.
    pub const MOVEMENT: i16 = 5;

    /// Classify `current` against the previous round's score.
    pub fn between(previous: Option<u8>, current: u8) -> Self {
        let Some(previous) = previous else {
            return ConvergenceTrend::Stable;
        };
        let delta = i16::from(current) - i16::from(previous);
        if delta >= Self::MOVEMENT {
            ConvergenceTrend::Improving
        } else if delta <= -Self::MOVEMENT {
            ConvergenceTrend::Diverging
        } else {
            ConvergenceTrend::Stable
        }
    }
}

impl std::fmt::Display for ConvergenceTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergenceTrend::Improving => write!(f, "improving"),
            ConvergenceTrend::Stable => write!(f, "stable"),
            ConvergenceTrend::Diverging => write!(f, "diverging"),
        }
    }
}

/// Which scorer produced a result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    /// Parsed from the coordinator model's reply
    #[default]
    Judge,
    /// Keyword-overlap fallback
    Heuristic,
}

/// Judgment of how much one round's responses agree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub consensus_score: u8,
    pub consensus_level: ConsensusLevel,
    pub core_agreement: String,
    pub key_disagreements: Vec<String>,
    pub continue_debate: bool,
    pub synthesis_ready: bool,
    pub convergence_trend: ConvergenceTrend,
    #[serde(default)]
    pub source: ScoreSource,
}

impl ConsensusResult {
    pub fn is_fallback(&self) -> bool {
        self.source == ScoreSource::Heuristic
    }

    pub fn meets(&self, threshold: u8) -> bool {
        self.consensus_score >= threshold
    }
}
