//! Application layer for council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DebateParams;
pub use ports::{
    debate_logger::{DebateEvent, DebateLogger, NoDebateLogger},
    model_invoker::{InvocationOutcome, InvokeError, ModelInvoker, bounded_invoke},
    progress::{DebateProgressNotifier, NoProgress},
    response_ranker::ResponseRanker,
};
pub use use_cases::evaluate_consensus::{
    ConsensusAnalyzer, ConsensusScorer, HeuristicConsensusScorer, LlmConsensusScorer,
    ScoringError, ScoringRequest,
};
pub use use_cases::run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};
