//! Domain layer for council
//!
//! This crate contains the debate's entities, value objects, and pure rules.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Several independent agents answer one [`Question`]. Each round they read
//! each other's current answers and revise their own; a coordinator scores
//! how far they agree. The record of every round lives in [`DebateMemory`].
//!
//! ## Consensus
//!
//! A [`ConsensusResult`] scores one round from 0 to 100. It comes either from
//! the coordinator's JSON reply ([`parse_consensus_judgment`]) or, when that
//! fails, from the deterministic [`keyword_overlap_consensus`] heuristic.

pub mod config;
pub mod core;
pub mod debate;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{agent::Agent, error::DomainError, question::Question, string::truncate};
pub use debate::{
    ConsensusLevel, ConsensusResult, ConvergenceTrend, DebateMemory, DebateResult, DebateState,
    Iteration, JudgeParseError, ModelPosition, RankingResult, Responses, ScoreSource,
    TerminationReason, json_candidates, keyword_overlap_consensus, parse_consensus_judgment,
};
pub use prompt::DebatePromptTemplate;
