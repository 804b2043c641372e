//! Response rankers used to pick the base of the final answer.

mod moderator;
mod overlap;

pub use moderator::ModeratorResponseRanker;
pub use overlap::OverlapResponseRanker;
