//! Progress notification port
//!
//! Defines the interface for reporting progress during a debate.

use council_domain::{Agent, ConsensusResult};

/// Callback for progress updates during a debate
///
/// Round numbers are 1-based. Implementations live in the presentation layer.
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when a round's fan-out starts
    fn on_round_start(&self, round: usize, total_agents: usize);

    /// Called when one agent's call in a round finishes
    fn on_agent_complete(&self, round: usize, agent: &Agent, success: bool);

    /// Called when every call of a round has finished (or the round was cut short)
    fn on_round_complete(&self, round: usize);

    /// Called after a round has been scored
    fn on_consensus(&self, _round: usize, _result: &ConsensusResult) {}

    /// Called once the loop has ended and synthesis begins
    fn on_synthesis_start(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: usize, _total_agents: usize) {}
    fn on_agent_complete(&self, _round: usize, _agent: &Agent, _success: bool) {}
    fn on_round_complete(&self, _round: usize) {}
}
