//! Judge reply parsing.
//!
//! The coordinator is asked for a single fenced JSON block, but models wrap
//! it in prose, emit several blocks, or skip the fence entirely. Extraction
//! order:
//!
//! 1. fenced blocks (```` ```json ```` or bare ```` ``` ````), in order of appearance
//! 2. bare `{ ... }` objects, in order of appearance
//!
//! The first candidate that deserializes into a judgment wins. Only
//! `consensus_score` is mandatory; every other field is derived from the
//! score when missing or unrecognized.

use super::consensus::{
    ConsensusLevel, ConsensusResult, ConvergenceTrend, STRONG_CONSENSUS, ScoreSource,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JudgeParseError {
    #[error("No JSON block found in judge reply")]
    NoJsonBlock,

    #[error("Judge JSON is not a consensus judgment: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct RawJudgment {
    consensus_score: f64,
    #[serde(default)]
    consensus_level: Option<String>,
    #[serde(default)]
    core_agreement: Option<String>,
    #[serde(default)]
    key_disagreements: Option<Vec<String>>,
    #[serde(default)]
    continue_debate: Option<bool>,
    #[serde(default)]
    synthesis_ready: Option<bool>,
    #[serde(default)]
    convergence_trend: Option<String>,
}

impl RawJudgment {
    fn into_result(self) -> ConsensusResult {
        let score = self.consensus_score.clamp(0.0, 100.0).round() as u8;

        let consensus_level = self
            .consensus_level
            .as_deref()
            .and_then(parse_level)
            .unwrap_or_else(|| ConsensusLevel::from_score(score));

        let convergence_trend = self
            .convergence_trend
            .as_deref()
            .and_then(parse_trend)
            .unwrap_or_default();

        ConsensusResult {
            consensus_score: score,
            consensus_level,
            core_agreement: self.core_agreement.unwrap_or_default(),
            key_disagreements: self
                .key_disagreements
                .unwrap_or_default()
                .into_iter()
                .filter(|d| !d.trim().is_empty())
                .collect(),
            continue_debate: self.continue_debate.unwrap_or(score < STRONG_CONSENSUS),
            synthesis_ready: self.synthesis_ready.unwrap_or(score >= STRONG_CONSENSUS),
            convergence_trend,
            source: ScoreSource::Judge,
        }
    }
}

fn parse_level(s: &str) -> Option<ConsensusLevel> {
    match s.trim().to_lowercase().as_str() {
        "strong" => Some(ConsensusLevel::Strong),
        "moderate" => Some(ConsensusLevel::Moderate),
        "weak" => Some(ConsensusLevel::Weak),
        "none" => Some(ConsensusLevel::None),
        _ => None,
    }
}

fn parse_trend(s: &str) -> Option<ConvergenceTrend> {
    match s.trim().to_lowercase().as_str() {
        "improving" => Some(ConvergenceTrend::Improving),
        "stable" => Some(ConvergenceTrend::Stable),
        "diverging" => Some(ConvergenceTrend::Diverging),
        _ => None,
    }
}

/// Parse the coordinator's reply into a [`ConsensusResult`].
///
/// # Examples
///
/// ```
/// use council_domain::debate::parsing::parse_consensus_judgment;
///
/// let reply = r#"Here is my analysis: {"consensus_score": 92, "core_agreement": "Vilnius"}"#;
/// let result = parse_consensus_judgment(reply).unwrap();
/// assert_eq!(result.consensus_score, 92);
/// assert!(!result.continue_debate);
/// ```
pub fn parse_consensus_judgment(reply: &str) -> Result<ConsensusResult, JudgeParseError> {
    let mut last_error = None;

    for candidate in json_candidates(reply) {
        match serde_json::from_str::<RawJudgment>(candidate.trim()) {
            Ok(raw) => return Ok(raw.into_result()),
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    Err(match last_error {
        Some(e) => JudgeParseError::Invalid(e),
        None => JudgeParseError::NoJsonBlock,
    })
}

/// Possible JSON payloads in a model reply: fenced blocks first, then bare
/// objects, each in order of appearance.
pub fn json_candidates(reply: &str) -> Vec<&str> {
    let mut candidates = fenced_blocks(reply);
    candidates.extend(bare_objects(reply));
    candidates
}

/// Contents of every ``` fenced block, skipping the info string.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("```") {
        let after_fence = &rest[open + 3..];
        let Some(body_start) = after_fence.find('\n') else {
            break;
        };
        let body = &after_fence[body_start + 1..];
        let Some(close) = body.find("```") else {
            break;
        };
        blocks.push(&body[..close]);
        rest = &body[close + 3..];
    }

    blocks
}

/// Every syntactically complete JSON object that starts at a `{`.
fn bare_objects(text: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut offset = 0;

    while let Some(pos) = text[offset..].find('{') {
        let start = offset + pos;
        let mut stream =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();
        match stream.next() {
            Some(Ok(serde_json::Value::Object(_))) => {
                let end = start + stream.byte_offset();
                objects.push(&text[start..end]);
                offset = end;
            }
            _ => offset = start + 1,
        }
    }

    objects
}
