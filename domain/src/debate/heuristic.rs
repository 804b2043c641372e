//! Keyword-overlap consensus heuristic.
//!
//! Used whenever the coordinator model cannot produce a judgment. It can say
//! *how much* the responses overlap, never *why* they differ, so the
//! disagreement list is always a fixed placeholder.
//!
//! # Algorithm
//!
//! 1. Each response is reduced to its set of lowercase words longer than
//!    three characters.
//! 2. A word is *common* when it appears in at least 70% of the responses.
//! 3. `score = round(min(100, 100 * common / unique))`, where `unique` is the
//!    size of the union of all word sets.

use super::consensus::{ConsensusLevel, ConsensusResult, ConvergenceTrend, ScoreSource};
use super::memory::Responses;
use crate::core::string::keywords;
use std::collections::{BTreeMap, BTreeSet};

/// Share of responses (in tenths) a word must appear in to count as common.
const COMMON_WORD_SHARE_TENTHS: usize = 7;

/// Shown in place of real disagreements.
pub const HEURISTIC_DISAGREEMENT: &str =
    "Specific disagreements unavailable: scored by keyword overlap only";

/// How many shared terms to quote in `core_agreement`.
const QUOTED_TERMS: usize = 12;

/// Score `responses` by keyword overlap.
///
/// `previous_score` is the last recorded round's score, if any; it only
/// feeds `convergence_trend`.
pub fn keyword_overlap_consensus(
    responses: &Responses,
    previous_score: Option<u8>,
) -> ConsensusResult {
    let word_sets: Vec<BTreeSet<String>> = responses
        .values()
        .map(|text| keywords(text).collect())
        .collect();

    let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for set in &word_sets {
        for word in set {
            *frequency.entry(word.as_str()).or_default() += 1;
        }
    }

    let total = word_sets.len();
    let common: Vec<&str> = frequency
        .iter()
        .filter(|(_, count)| **count * 10 >= total * COMMON_WORD_SHARE_TENTHS)
        .map(|(word, _)| *word)
        .collect();

    let unique = frequency.len();
    let score = if unique == 0 {
        0
    } else {
        let ratio = 100.0 * common.len() as f64 / unique as f64;
        ratio.min(100.0).round() as u8
    };

    let level = if score > 70 {
        ConsensusLevel::Moderate
    } else {
        ConsensusLevel::Weak
    };

    let core_agreement = if common.is_empty() {
        "No shared key terms across responses".to_string()
    } else {
        let quoted: Vec<&str> = common.iter().take(QUOTED_TERMS).copied().collect();
        format!(
            "{} of {} key terms shared across responses: {}",
            common.len(),
            unique,
            quoted.join(", ")
        )
    };

    ConsensusResult {
        consensus_score: score,
        consensus_level: level,
        core_agreement,
        key_disagreements: vec![HEURISTIC_DISAGREEMENT.to_string()],
        continue_debate: score < 90,
        synthesis_ready: score > 80,
        convergence_trend: ConvergenceTrend::between(previous_score, score),
        source: ScoreSource::Heuristic,
    }
}
