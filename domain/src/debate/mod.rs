//! Debate domain
//!
//! Everything about a debate that does not need I/O:
//!
//! - [`memory`]: append-only round history and per-agent positions
//! - [`consensus`]: the per-round consensus judgment
//! - [`parsing`]: extraction of a judgment from the coordinator's reply
//! - [`heuristic`]: deterministic keyword-overlap fallback scorer
//! - [`outcome`]: termination reasons, ranking output, final result
//! - [`synthesis`]: final answer and summary assembly
//!
//! # Round flow
//!
//! ```text
//! initial proposals ──▶ consensus check ──┬─ score ≥ threshold ─▶ synthesis
//!                                          │
//!                                          ▼
//!                         ┌──▶ cross-critique round ──▶ consensus check
//!                         │                                  │
//!                         └──── below threshold, moving ◀────┤
//!                                                            ├─ converged / stuck / budget ─▶ synthesis
//! ```

pub mod consensus;
pub mod heuristic;
pub mod memory;
pub mod outcome;
pub mod parsing;
pub mod synthesis;

pub use consensus::{ConsensusLevel, ConsensusResult, ConvergenceTrend, ScoreSource};
pub use heuristic::keyword_overlap_consensus;
pub use memory::{DebateMemory, DebateState, Iteration, ModelPosition, Responses};
pub use outcome::{DebateResult, RankingResult, TerminationReason};
pub use parsing::{JudgeParseError, json_candidates, parse_consensus_judgment};
