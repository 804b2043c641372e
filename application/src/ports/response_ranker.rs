//! Response ranking port
//!
//! After the round loop ends, a ranker picks which agent's final response
//! becomes the base of the synthesized answer.

use async_trait::async_trait;
use council_domain::{RankingResult, Responses};

/// Picks the best of the final responses
///
/// Rankers are expected to degrade rather than fail: an implementation that
/// cannot reach its model should fall back to a local ranking.
#[async_trait]
pub trait ResponseRanker: Send + Sync {
    async fn rank(&self, question: &str, responses: &Responses) -> RankingResult;
}
