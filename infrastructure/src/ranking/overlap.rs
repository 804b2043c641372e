//! Local ranking by vocabulary overlap.

use async_trait::async_trait;
use council_application::ports::response_ranker::ResponseRanker;
use council_domain::core::string::keywords;
use council_domain::{RankingResult, Responses};
use std::collections::{BTreeMap, BTreeSet};

/// Ranks each response by how much of its vocabulary the others share.
///
/// Score per agent is the mean Jaccard similarity against every other
/// response, scaled to 0-10. Ties go to the alphabetically first agent.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlapResponseRanker;

impl OverlapResponseRanker {
    pub fn rank_responses(&self, responses: &Responses) -> RankingResult {
        let sets: BTreeMap<&str, BTreeSet<String>> = responses
            .iter()
            .map(|(name, text)| (name.as_str(), keywords(text).collect()))
            .collect();

        let mut scores_by_agent = BTreeMap::new();
        for (name, words) in &sets {
            let others: Vec<f64> = sets
                .iter()
                .filter(|(other, _)| *other != name)
                .map(|(_, other_words)| jaccard(words, other_words))
                .collect();
            let mean = if others.is_empty() {
                0.0
            } else {
                others.iter().sum::<f64>() / others.len() as f64
            };
            scores_by_agent.insert(name.to_string(), (mean * 100.0).round() / 10.0);
        }

        let best_agent = best_of(&scores_by_agent);
        RankingResult {
            best_agent,
            scores_by_agent,
            suggestions: Vec::new(),
        }
    }
}

#[async_trait]
impl ResponseRanker for OverlapResponseRanker {
    async fn rank(&self, _question: &str, responses: &Responses) -> RankingResult {
        self.rank_responses(responses)
    }
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Highest score, first name on ties.
pub(crate) fn best_of(scores: &BTreeMap<String, f64>) -> String {
    let mut best: Option<(&String, f64)> = None;
    for (name, score) in scores {
        match best {
            Some((_, top)) if *score <= top => {}
            _ => best = Some((name, *score)),
        }
    }
    best.map(|(name, _)| name.clone()).unwrap_or_default()
}
