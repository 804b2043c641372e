//! Application configuration
//!
//! - [`DebateParams`]: round-loop limits and timeouts

pub mod debate_params;

pub use debate_params::DebateParams;
