//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod evaluate_consensus;
pub mod run_debate;
