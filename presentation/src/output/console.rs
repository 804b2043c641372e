//! Console output formatter for debate results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::debate::synthesis::format_trend;
use council_domain::{ConsensusLevel, DebateResult};

/// Formats debate results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete debate result
    pub fn format(result: &DebateResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Debate"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.question
        ));

        output.push_str(&format!(
            "{} {}\n",
            "Agents:".cyan().bold(),
            result
                .participants
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        for iteration in &result.debate_history.history {
            let title = if iteration.round == 0 {
                "Round 1: Initial Proposals".to_string()
            } else {
                format!("Round {}: Debate", iteration.round + 1)
            };
            output.push_str(&Self::section_header(&title));
            output.push_str(&format!(
                "{} {}\n",
                "Consensus:".bold(),
                Self::score(iteration.consensus_score)
            ));

            for (agent, text) in &iteration.responses {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", agent).yellow().bold(),
                    text.trim()
                ));
            }

            if !iteration.disagreements.is_empty() {
                output.push_str(&format!("\n{}\n", "Disagreements:".yellow().bold()));
                for point in &iteration.disagreements {
                    output.push_str(&format!("  * {}\n", point));
                }
            }
        }

        output.push_str(&Self::section_header("Final Answer"));
        output.push_str(&format!("\n{}\n", result.solution.trim()));

        if !result.final_judgment.core_agreement.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Core agreement:".green().bold(),
                result.final_judgment.core_agreement
            ));
        }

        if !result.ranking.scores_by_agent.is_empty() {
            output.push_str(&format!("\n{}\n", "Ranking:".cyan().bold()));
            for (agent, score) in &result.ranking.scores_by_agent {
                let marker = if *agent == result.base_agent { "*" } else { " " };
                output.push_str(&format!("  {} {:<20} {:.1}\n", marker, agent, score));
            }
        }

        if !result.ranking.suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".cyan().bold()));
            for suggestion in &result.ranking.suggestions {
                output.push_str(&format!("  * {}\n", suggestion));
            }
        }

        output.push_str(&format!("\n{}\n", result.summary.dimmed()));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &DebateResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_solution_only(result: &DebateResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Council Answer ===".cyan().bold()));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), result.question));

        output.push_str(&result.solution);
        if !result.solution.ends_with('\n') {
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{} {} ({})\n",
            "Consensus trend:".dimmed(),
            format_trend(result.consensus_trend()),
            result.termination.describe()
        ));

        output
    }

    fn score(score: u8) -> String {
        let text = format!("{}% ({})", score, ConsensusLevel::from_score(score));
        match ConsensusLevel::from_score(score) {
            ConsensusLevel::Strong => text.green().bold().to_string(),
            ConsensusLevel::Moderate => text.yellow().to_string(),
            _ => text.red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &DebateResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &DebateResult) -> String {
        Self::format_json(result)
    }

    fn format_solution_only(&self, result: &DebateResult) -> String {
        Self::format_solution_only(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        Agent, ConsensusResult, ConvergenceTrend, DebateMemory, RankingResult, Responses,
        ScoreSource, TerminationReason,
    };

    fn sample() -> DebateResult {
        let mut memory = DebateMemory::new();
        let round1: Responses = [("a", "Vilnius"), ("b", "Vilnius, Lithuania")]
            .into_iter()
            .map(|(n, t)| (n.to_string(), t.to_string()))
            .collect();
        memory.add_iteration(round1, 96, vec![]);

        DebateResult {
            question: "Capital of Lithuania?".to_string(),
            participants: vec![
                Agent::new("a", "Architecture"),
                Agent::new("b", "Security"),
            ],
            solution: "Vilnius\n\n---\nConsensus: 96% after 1 iteration (trend: 96%)\n"
                .to_string(),
            iterations: 1,
            final_consensus: 96,
            termination: TerminationReason::EarlyExit,
            base_agent: "a".to_string(),
            ranking: RankingResult {
                best_agent: "a".to_string(),
                scores_by_agent: [("a".to_string(), 9.0), ("b".to_string(), 8.0)]
                    .into_iter()
                    .collect(),
                suggestions: vec![],
            },
            summary: "Consensus evolved over 1 round: 96%.".to_string(),
            final_judgment: ConsensusResult {
                consensus_score: 96,
                consensus_level: ConsensusLevel::Strong,
                core_agreement: "Vilnius".to_string(),
                key_disagreements: vec![],
                continue_debate: false,
                synthesis_ready: true,
                convergence_trend: ConvergenceTrend::Stable,
                source: ScoreSource::Judge,
            },
            debate_history: memory.debate_state(),
        }
    }

    #[test]
    fn test_full_format_lists_rounds_and_answer() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&sample());
        assert!(text.contains("Round 1: Initial Proposals"));
        assert!(text.contains("96% (strong)"));
        assert!(text.contains("── b ──"));
        assert!(text.contains("Final Answer"));
        assert!(text.contains("* a"));
    }

    #[test]
    fn test_solution_only_is_concise() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_solution_only(&sample());
        assert!(text.contains("Vilnius"));
        assert!(text.contains("Consensus trend: 96%"));
        assert!(!text.contains("── b ──"));
    }

    #[test]
    fn test_json_round_trips_key_fields() {
        let json = ConsoleFormatter::format_json(&sample());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["final_consensus"], 96);
        assert_eq!(value["termination"], "early_exit");
        assert_eq!(value["debate_history"]["consensus_trend"][0], 96);
    }
}
