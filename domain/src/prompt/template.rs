//! Prompt templates for each step of a debate.
//!
//! Every function here is pure: debate state and question in, prompt text
//! out. Nothing is sent anywhere from this module.

use crate::core::agent::Agent;
use crate::debate::memory::{DebateState, Responses};
use crate::debate::synthesis::format_trend;

/// Templates for generating debate prompts
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// Round 1: an independent proposal from the agent's perspective.
    pub fn initial_proposal(question: &str, agent: &Agent) -> String {
        format!(
            r#"You are the {role} expert on a panel of independent reviewers.

Question:
{question}

Analyze this question using your {role} expertise. Give a clear, direct answer first,
then the reasoning that supports it. Be concise but complete; state any assumptions."#,
            role = agent.role,
            question = question,
        )
    }

    /// Rounds 2+: cross-critique against every *other* agent's current response.
    ///
    /// The agent's own entry in `current` is skipped so it never reads its own
    /// answer back as a peer opinion.
    pub fn iterative_round(
        question: &str,
        agent: &Agent,
        own_previous: &str,
        current: &Responses,
        trend: &[u8],
    ) -> String {
        let mut prompt = format!(
            r#"You are the {role} expert on a panel that is working toward consensus.

Question:
{question}

Your previous response:
{own_previous}

Other panelists' current responses:
"#,
            role = agent.role,
            question = question,
            own_previous = own_previous.trim(),
        );

        for (name, text) in current.iter().filter(|(name, _)| *name != &agent.name) {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", name, text.trim()));
        }

        prompt.push_str(&format!(
            r#"
Consensus score so far: {trend}

Reconsider your position in light of the other responses. You may keep it, refine it,
or change it entirely if you find the other arguments stronger. Do not agree just to
agree: keep any point you can still defend, and say explicitly where and why your
view changed. Reply with your complete updated answer."#,
            trend = format_trend(trend),
        ));

        prompt
    }

    /// Coordinator prompt asking for a single fenced JSON judgment.
    pub fn consensus_judge(
        question: &str,
        responses: &Responses,
        history: Option<&DebateState>,
    ) -> String {
        let mut prompt = format!(
            r#"You are the coordinator of a panel debate. Judge how much the panelists agree.

Question:
{question}
"#,
        );

        if let Some(state) = history {
            prompt.push_str(&format!(
                "\nThis is debate round {}. Consensus scores of previous rounds: {}\n",
                state.current_round + 1,
                format_trend(&state.consensus_trend)
            ));
        }

        prompt.push_str("\nCurrent responses:\n");
        for (name, text) in responses {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", name, text.trim()));
        }

        prompt.push_str(
            r#"
Scoring rules:
- Score substantive agreement on the answer itself, not on wording or style.
- When all panelists substantively agree on a single factual claim, the score MUST be 95 or higher.
- 90-100 strong, 70-89 moderate, 50-69 weak, below 50 none.

Reply with exactly one fenced JSON block of this shape and nothing else:

```json
{
  "consensus_score": 0,
  "consensus_level": "strong | moderate | weak | none",
  "core_agreement": "what the panelists agree on",
  "key_disagreements": ["each open point of disagreement"],
  "continue_debate": true,
  "synthesis_ready": false,
  "convergence_trend": "improving | stable | diverging"
}
```"#,
        );

        prompt
    }

    /// Coordinator prompt asking for a 1-10 score per response.
    pub fn ranking(question: &str, responses: &Responses) -> String {
        let mut prompt = format!(
            r#"You are evaluating final answers from a panel debate.

Question:
{question}

Answers:
"#,
        );

        for (name, text) in responses {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", name, text.trim()));
        }

        prompt.push_str(
            r#"
Score every answer from 1 to 10 for correctness, completeness, and clarity.
Reply with one JSON object mapping each panelist name to its score, plus optional
improvement suggestions:

{"scores": {"<name>": 8}, "suggestions": ["..."]}"#,
        );

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::memory::DebateMemory;

    fn current() -> Responses {
        [
            ("architect", "Use a monolith."),
            ("security", "Microservices isolate blast radius."),
            ("performance", "A monolith avoids network hops."),
        ]
        .into_iter()
        .map(|(a, t)| (a.to_string(), t.to_string()))
        .collect()
    }

    #[test]
    fn test_initial_proposal_mentions_role_and_question() {
        let agent = Agent::new("architect", "Architecture");
        let prompt = DebatePromptTemplate::initial_proposal("Monolith or microservices?", &agent);
        assert!(prompt.contains("Architecture expertise"));
        assert!(prompt.contains("Monolith or microservices?"));
    }

    #[test]
    fn test_iterative_round_excludes_own_current_response() {
        let agent = Agent::new("architect", "Architecture");
        let prompt = DebatePromptTemplate::iterative_round(
            "Monolith or microservices?",
            &agent,
            "Use a monolith.",
            &current(),
            &[60],
        );
        assert!(!prompt.contains("--- architect ---"));
        assert!(prompt.contains("--- security ---"));
        assert!(prompt.contains("--- performance ---"));
        assert!(prompt.contains("Your previous response:\nUse a monolith."));
        assert!(prompt.contains("Consensus score so far: 60%"));
    }

    #[test]
    fn test_judge_prompt_without_history() {
        let prompt = DebatePromptTemplate::consensus_judge("Q?", &current(), None);
        assert!(!prompt.contains("This is debate round"));
        assert!(prompt.contains("MUST be 95 or higher"));
        assert!(prompt.contains("```json"));
        assert!(prompt.contains("--- security ---"));
    }

    #[test]
    fn test_judge_prompt_with_history() {
        let mut memory = DebateMemory::new();
        memory.add_iteration(current(), 60, vec![]);
        memory.add_iteration(current(), 78, vec![]);
        let state = memory.debate_state();

        let prompt = DebatePromptTemplate::consensus_judge("Q?", &current(), Some(&state));
        assert!(prompt.contains("This is debate round 3"));
        assert!(prompt.contains("60% → 78%"));
    }

    #[test]
    fn test_ranking_prompt_lists_all_answers() {
        let prompt = DebatePromptTemplate::ranking("Q?", &current());
        for name in ["architect", "security", "performance"] {
            assert!(prompt.contains(&format!("--- {} ---", name)));
        }
    }
}
