//! Evaluate Consensus use case
//!
//! Scores how much one round's responses agree. The coordinator model is
//! asked first; any failure (call error, timeout, unusable reply) falls
//! back to keyword overlap so a round always gets a score.

use crate::ports::model_invoker::{InvokeError, ModelInvoker, bounded_invoke};
use async_trait::async_trait;
use council_domain::{
    Agent, ConsensusResult, DebatePromptTemplate, DebateState, JudgeParseError, Responses,
    keyword_overlap_consensus, parse_consensus_judgment,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors a scorer can report
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Coordinator call failed: {0}")]
    Invocation(#[from] InvokeError),

    #[error("Coordinator reply unusable: {0}")]
    Parse(#[from] JudgeParseError),
}

/// What a scorer looks at
#[derive(Debug, Clone, Copy)]
pub struct ScoringRequest<'a> {
    pub question: &'a str,
    pub responses: &'a Responses,
    pub history: Option<&'a DebateState>,
}

impl ScoringRequest<'_> {
    fn previous_score(&self) -> Option<u8> {
        self.history
            .and_then(|state| state.consensus_trend.last().copied())
    }
}

/// One strategy for scoring a round
#[async_trait]
pub trait ConsensusScorer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn score(&self, request: &ScoringRequest<'_>) -> Result<ConsensusResult, ScoringError>;
}

/// Asks the coordinator model for a JSON judgment
pub struct LlmConsensusScorer<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
    coordinator: Agent,
    timeout: Duration,
}

impl<I: ModelInvoker + 'static> LlmConsensusScorer<I> {
    pub fn new(invoker: Arc<I>, coordinator: Agent) -> Self {
        Self {
            invoker,
            coordinator,
            timeout: Duration::from_secs(3 * 60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<I: ModelInvoker + 'static> ConsensusScorer for LlmConsensusScorer<I> {
    fn name(&self) -> &'static str {
        "coordinator"
    }

    async fn score(&self, request: &ScoringRequest<'_>) -> Result<ConsensusResult, ScoringError> {
        let prompt =
            DebatePromptTemplate::consensus_judge(request.question, request.responses, request.history);

        let reply = bounded_invoke(self.invoker.as_ref(), &self.coordinator, &prompt, self.timeout)
            .await
            .into_result(self.timeout)?;

        debug!("Coordinator judgment reply: {} chars", reply.len());
        Ok(parse_consensus_judgment(&reply)?)
    }
}

/// Keyword-overlap scorer; never fails
pub struct HeuristicConsensusScorer;

impl HeuristicConsensusScorer {
    pub fn evaluate(&self, responses: &Responses, history: Option<&DebateState>) -> ConsensusResult {
        let previous = history.and_then(|state| state.consensus_trend.last().copied());
        keyword_overlap_consensus(responses, previous)
    }
}

#[async_trait]
impl ConsensusScorer for HeuristicConsensusScorer {
    fn name(&self) -> &'static str {
        "keyword-overlap"
    }

    async fn score(&self, request: &ScoringRequest<'_>) -> Result<ConsensusResult, ScoringError> {
        Ok(keyword_overlap_consensus(
            request.responses,
            request.previous_score(),
        ))
    }
}

/// Scores rounds with a primary scorer and the heuristic as fallback
pub struct ConsensusAnalyzer {
    primary: Option<Arc<dyn ConsensusScorer>>,
    fallback: HeuristicConsensusScorer,
}

impl ConsensusAnalyzer {
    pub fn new(primary: Arc<dyn ConsensusScorer>) -> Self {
        Self {
            primary: Some(primary),
            fallback: HeuristicConsensusScorer,
        }
    }

    /// Analyzer that only uses keyword overlap
    pub fn heuristic_only() -> Self {
        Self {
            primary: None,
            fallback: HeuristicConsensusScorer,
        }
    }

    /// Score `responses`. Always returns a result.
    pub async fn evaluate_consensus(
        &self,
        question: &str,
        responses: &Responses,
        history: Option<&DebateState>,
    ) -> ConsensusResult {
        let Some(primary) = &self.primary else {
            return self.evaluate_heuristic(responses, history);
        };

        let request = ScoringRequest {
            question,
            responses,
            history,
        };

        match primary.score(&request).await {
            Ok(result) => {
                info!(
                    "{} scored consensus at {}% ({})",
                    primary.name(),
                    result.consensus_score,
                    result.consensus_level
                );
                result
            }
            Err(e) => {
                warn!(
                    "{} scoring failed, falling back to keyword overlap: {}",
                    primary.name(),
                    e
                );
                self.evaluate_heuristic(responses, history)
            }
        }
    }

    /// Keyword-overlap score without touching any model.
    pub fn evaluate_heuristic(
        &self,
        responses: &Responses,
        history: Option<&DebateState>,
    ) -> ConsensusResult {
        let result = self.fallback.evaluate(responses, history);
        info!("Keyword overlap scored consensus at {}%", result.consensus_score);
        result
    }
}
