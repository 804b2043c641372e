//! Synthesis assembly: turns the chosen base response and the debate record
//! into the final answer text and a summary of how consensus evolved.

use super::consensus::ScoreSource;
use super::outcome::TerminationReason;

/// Render a trend as `60% → 78% → 91%`.
pub fn format_trend(trend: &[u8]) -> String {
    if trend.is_empty() {
        return "n/a".to_string();
    }
    trend
        .iter()
        .map(|score| format!("{}%", score))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Final answer: the base response followed by a consensus footer.
pub fn assemble_solution(
    base_answer: &str,
    base_agent: &str,
    iterations: usize,
    final_consensus: u8,
    trend: &[u8],
    unresolved: &[String],
) -> String {
    let mut out = String::new();
    out.push_str(base_answer.trim());
    out.push_str("\n\n---\n");
    out.push_str(&format!(
        "Consensus: {}% after {} iteration{} (trend: {})\n",
        final_consensus,
        iterations,
        if iterations == 1 { "" } else { "s" },
        format_trend(trend)
    ));
    out.push_str(&format!("Base response: {}\n", base_agent));

    if !unresolved.is_empty() {
        out.push_str("Unresolved disagreements:\n");
        for item in unresolved {
            out.push_str(&format!("- {}\n", item));
        }
    }

    out
}

/// Human-readable account of how consensus evolved.
pub fn consensus_summary(
    trend: &[u8],
    termination: TerminationReason,
    responders: usize,
    last_source: ScoreSource,
) -> String {
    let rounds = trend.len();
    let mut summary = format!(
        "Consensus evolved over {} round{}: {}. Stopped because {}.",
        rounds,
        if rounds == 1 { "" } else { "s" },
        format_trend(trend),
        termination.describe()
    );

    if let (Some(first), Some(last)) = (trend.first(), trend.last())
        && rounds > 1
    {
        let delta = i16::from(*last) - i16::from(*first);
        summary.push_str(&format!(
            " Net change {:+} points across {} responding agents.",
            delta, responders
        ));
    } else {
        summary.push_str(&format!(" {} agents responded.", responders));
    }

    if last_source == ScoreSource::Heuristic {
        summary.push_str(" Final score came from the keyword-overlap fallback.");
    }

    summary
}
