//! Infrastructure layer for council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod invoker;
pub mod logging;
pub mod ranking;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAgentEntry, FileConfig, FileCoordinatorConfig, FileDebateConfig,
    FileLoggingConfig, FileOutputConfig, FileRankingConfig, RankingStrategy, parse_agents,
};
pub use invoker::{CliInvokerConfig, CliModelInvoker};
pub use logging::JsonlDebateLogger;
pub use ranking::{ModeratorResponseRanker, OverlapResponseRanker};
