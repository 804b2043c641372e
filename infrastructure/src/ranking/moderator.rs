//! Ranking by the coordinator model, with the overlap ranker as fallback.

use super::overlap::{OverlapResponseRanker, best_of};
use async_trait::async_trait;
use council_application::ports::model_invoker::{ModelInvoker, bounded_invoke};
use council_application::ports::response_ranker::ResponseRanker;
use council_domain::{Agent, DebatePromptTemplate, RankingResult, Responses, json_candidates};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct RawRanking {
    scores: BTreeMap<String, f64>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Asks the coordinator to score each final response from 1 to 10
pub struct ModeratorResponseRanker<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
    coordinator: Agent,
    timeout: Duration,
    fallback: OverlapResponseRanker,
}

impl<I: ModelInvoker + 'static> ModeratorResponseRanker<I> {
    pub fn new(invoker: Arc<I>, coordinator: Agent) -> Self {
        Self {
            invoker,
            coordinator,
            timeout: Duration::from_secs(3 * 60),
            fallback: OverlapResponseRanker,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Scores for known agents only; `None` if none of them were scored.
fn parse_ranking(reply: &str, responses: &Responses) -> Option<RankingResult> {
    json_candidates(reply).into_iter().find_map(|candidate| {
        let raw: RawRanking = serde_json::from_str(candidate.trim()).ok()?;
        let scores_by_agent: BTreeMap<String, f64> = raw
            .scores
            .into_iter()
            .filter(|(name, score)| responses.contains_key(name) && score.is_finite())
            .map(|(name, score)| (name, score.clamp(0.0, 10.0)))
            .collect();
        if scores_by_agent.is_empty() {
            return None;
        }
        Some(RankingResult {
            best_agent: best_of(&scores_by_agent),
            scores_by_agent,
            suggestions: raw.suggestions,
        })
    })
}

#[async_trait]
impl<I: ModelInvoker + 'static> ResponseRanker for ModeratorResponseRanker<I> {
    async fn rank(&self, question: &str, responses: &Responses) -> RankingResult {
        let prompt = DebatePromptTemplate::ranking(question, responses);
        let outcome =
            bounded_invoke(self.invoker.as_ref(), &self.coordinator, &prompt, self.timeout).await;

        match outcome.into_result(self.timeout) {
            Ok(reply) => match parse_ranking(&reply, responses) {
                Some(result) => {
                    debug!("Coordinator ranked {} as best", result.best_agent);
                    result
                }
                None => {
                    warn!("Coordinator ranking unusable, ranking by overlap");
                    self.fallback.rank_responses(responses)
                }
            },
            Err(e) => {
                warn!("Coordinator ranking failed ({}), ranking by overlap", e);
                self.fallback.rank_responses(responses)
            }
        }
    }
}
