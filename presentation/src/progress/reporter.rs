//! Progress reporting for debate execution

use colored::Colorize;
use council_application::ports::progress::DebateProgressNotifier;
use council_domain::{Agent, ConsensusLevel, ConsensusResult};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a debate with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_name(round: usize) -> String {
        if round == 1 {
            "Round 1: Initial Proposals".to_string()
        } else {
            format!("Round {}: Debate", round)
        }
    }

    fn consensus_line(round: usize, result: &ConsensusResult) -> String {
        let score = format!("{}%", result.consensus_score);
        let score = match result.consensus_level {
            ConsensusLevel::Strong => score.green().bold(),
            ConsensusLevel::Moderate => score.yellow(),
            _ => score.red(),
        };
        let source = if result.is_fallback() {
            " (keyword overlap)".dimmed().to_string()
        } else {
            String::new()
        };
        format!(
            "  Round {} consensus: {} {}{}",
            round, score, result.convergence_trend, source
        )
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: usize, total_agents: usize) {
        let pb = self.multi.add(ProgressBar::new(total_agents as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(Self::round_name(round));
        pb.set_message("Waiting for agents...");

        if let Ok(mut slot) = self.round_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_agent_complete(&self, _round: usize, agent: &Agent, success: bool) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), agent.name)
            } else {
                format!("{} {}", "x".red(), agent.name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: usize) {
        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("Round {} complete", round).green().to_string());
        }
    }

    fn on_consensus(&self, round: usize, result: &ConsensusResult) {
        let _ = self.multi.println(Self::consensus_line(round, result));
    }

    fn on_synthesis_start(&self) {
        let _ = self
            .multi
            .println(format!("{} {}", "->".cyan(), "Synthesizing final answer".bold()));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: usize, total_agents: usize) {
        println!(
            "{} {} ({} agents)",
            "->".cyan(),
            ProgressReporter::round_name(round).bold(),
            total_agents
        );
    }

    fn on_agent_complete(&self, _round: usize, agent: &Agent, success: bool) {
        if success {
            println!("  {} {}", "v".green(), agent);
        } else {
            println!("  {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_round_complete(&self, _round: usize) {}

    fn on_consensus(&self, round: usize, result: &ConsensusResult) {
        println!("{}\n", ProgressReporter::consensus_line(round, result));
    }

    fn on_synthesis_start(&self) {
        println!("{} {}", "->".cyan(), "Synthesizing final answer".bold());
    }
}
