//! Run Debate use case
//!
//! Orchestrates the iterative debate: initial proposals, repeated rounds of
//! cross-critique scored by the [`ConsensusAnalyzer`], and a final synthesis
//! built on the best-ranked response.

use crate::config::DebateParams;
use crate::ports::debate_logger::{DebateEvent, DebateLogger, NoDebateLogger};
use crate::ports::model_invoker::{InvocationOutcome, ModelInvoker, bounded_invoke};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::response_ranker::ResponseRanker;
use crate::use_cases::evaluate_consensus::ConsensusAnalyzer;
use council_domain::debate::heuristic::HEURISTIC_DISAGREEMENT;
use council_domain::debate::synthesis::{assemble_solution, consensus_summary};
use council_domain::{
    Agent, ConsensusResult, DebateMemory, DebatePromptTemplate, DebateResult, DomainError,
    Question, RankingResult, Responses, TerminationReason,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Responses needed for a debate to go ahead.
const MIN_RESPONSES: usize = 2;

/// Errors that can occur during a debate
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("At least {required} agents are required, got {configured}")]
    TooFewAgents { configured: usize, required: usize },

    #[error("Not enough models responded: {responded} of {required} required")]
    NotEnoughResponses { responded: usize, required: usize },

    #[error("Invalid debate parameters: {0}")]
    InvalidParams(#[from] DomainError),
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub question: Question,
    /// Debating agents; the roster is fixed for the run
    pub agents: Vec<Agent>,
    pub params: DebateParams,
    pub cancellation: Option<CancellationToken>,
}

impl RunDebateInput {
    pub fn new(question: Question, agents: Vec<Agent>) -> Self {
        Self {
            question,
            agents,
            params: DebateParams::default(),
            cancellation: None,
        }
    }

    pub fn with_params(mut self, params: DebateParams) -> Self {
        self.params = params;
        self
    }

    /// Override the iteration budget when `max` is given.
    pub fn with_max_iterations(mut self, max: Option<usize>) -> Self {
        if let Some(max) = max {
            self.params.max_iterations = max;
        }
        self
    }

    /// Override the consensus threshold when `threshold` is given.
    pub fn with_consensus_threshold(mut self, threshold: Option<u8>) -> Self {
        if let Some(threshold) = threshold {
            self.params.consensus_threshold = threshold;
        }
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Why a fan-out or judgment stopped waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interruption {
    Deadline,
    Cancelled,
}

impl From<Interruption> for TerminationReason {
    fn from(value: Interruption) -> Self {
        match value {
            Interruption::Deadline => TerminationReason::DeadlineExceeded,
            Interruption::Cancelled => TerminationReason::Cancelled,
        }
    }
}

/// Responses gathered by one fan-out
struct RoundResponses {
    responses: Responses,
    interrupted: Option<Interruption>,
}

/// Shared per-run state threaded through the rounds
struct DebateRun<'a> {
    question: &'a str,
    params: &'a DebateParams,
    deadline: Instant,
    cancel: CancellationToken,
    progress: &'a dyn DebateProgressNotifier,
}

/// Use case for running an iterative debate
pub struct RunDebateUseCase<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
    analyzer: ConsensusAnalyzer,
    ranker: Arc<dyn ResponseRanker>,
    logger: Arc<dyn DebateLogger>,
}

impl<I: ModelInvoker + 'static> RunDebateUseCase<I> {
    pub fn new(
        invoker: Arc<I>,
        analyzer: ConsensusAnalyzer,
        ranker: Arc<dyn ResponseRanker>,
    ) -> Self {
        Self {
            invoker,
            analyzer,
            ranker,
            logger: Arc::new(NoDebateLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn DebateLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run a debate with default parameters, optionally overriding the
    /// iteration budget and consensus threshold.
    pub async fn run_debate(
        &self,
        question: Question,
        agents: Vec<Agent>,
        max_iterations: Option<usize>,
        consensus_threshold: Option<u8>,
    ) -> Result<DebateResult, RunDebateError> {
        let input = RunDebateInput::new(question, agents)
            .with_max_iterations(max_iterations)
            .with_consensus_threshold(consensus_threshold);
        self.execute(input).await
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateResult, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateResult, RunDebateError> {
        input.params.validate()?;
        if input.agents.len() < MIN_RESPONSES {
            return Err(RunDebateError::TooFewAgents {
                configured: input.agents.len(),
                required: MIN_RESPONSES,
            });
        }

        let run = DebateRun {
            question: input.question.content(),
            params: &input.params,
            deadline: Instant::now() + input.params.debate_timeout,
            cancel: input.cancellation.clone().unwrap_or_default(),
            progress,
        };

        info!(
            "Starting debate with {} agents (max {} iterations, threshold {}%)",
            input.agents.len(),
            run.params.max_iterations,
            run.params.consensus_threshold
        );
        self.logger.log(DebateEvent::new(
            "debate_started",
            json!({
                "question": run.question,
                "agents": input.agents.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
                "max_iterations": run.params.max_iterations,
                "consensus_threshold": run.params.consensus_threshold,
            }),
        ));

        let mut memory = DebateMemory::new();

        // Iteration 1: independent proposals
        let prompts = input
            .agents
            .iter()
            .map(|agent| {
                (
                    agent.clone(),
                    DebatePromptTemplate::initial_proposal(run.question, agent),
                )
            })
            .collect();
        let initial = self.fan_out(&run, 1, prompts).await;

        if initial.responses.len() < MIN_RESPONSES {
            warn!(
                "Only {} of {} agents responded to the initial round",
                initial.responses.len(),
                input.agents.len()
            );
            return Err(RunDebateError::NotEnoughResponses {
                responded: initial.responses.len(),
                required: MIN_RESPONSES,
            });
        }

        for (name, text) in &initial.responses {
            memory.update_model_position(name, text.clone(), "initial proposal");
        }
        // Agents that never answered stay out of later rounds.
        let participants: Vec<Agent> = input
            .agents
            .iter()
            .filter(|agent| initial.responses.contains_key(&agent.name))
            .cloned()
            .collect();

        let (mut judgment, interrupted) = match initial.interrupted {
            Some(reason) => {
                warn!(
                    "Initial round cut short ({:?}), scoring {} responses by keyword overlap",
                    reason,
                    initial.responses.len()
                );
                (
                    self.analyzer.evaluate_heuristic(&initial.responses, None),
                    Some(reason),
                )
            }
            None => self.judge(&run, &initial.responses, &memory).await,
        };
        self.record(&run, &mut memory, initial.responses, &judgment, 0);

        let termination = if let Some(reason) = interrupted {
            reason.into()
        } else if judgment.meets(run.params.consensus_threshold) {
            info!(
                "Consensus {}% reached on initial proposals",
                judgment.consensus_score
            );
            TerminationReason::EarlyExit
        } else {
            self.iterate(&run, &participants, &mut memory, &mut judgment)
                .await
        };

        info!(
            "Debate finished after {} iterations: {}",
            memory.current_round(),
            termination
        );

        Ok(self
            .synthesize(&run, input.agents, memory, judgment, termination)
            .await)
    }

    /// Rounds 2 and up. Returns why the loop stopped.
    async fn iterate(
        &self,
        run: &DebateRun<'_>,
        participants: &[Agent],
        memory: &mut DebateMemory,
        judgment: &mut ConsensusResult,
    ) -> TerminationReason {
        while memory.current_round() < run.params.max_iterations {
            let round = memory.current_round();
            let previous = match memory.latest() {
                Some(latest) => latest.responses.clone(),
                None => Responses::new(),
            };
            let trend = memory.consensus_trend();

            let prompts = participants
                .iter()
                .map(|agent| {
                    let own = previous.get(&agent.name).map(String::as_str).unwrap_or("");
                    (
                        agent.clone(),
                        DebatePromptTemplate::iterative_round(
                            run.question,
                            agent,
                            own,
                            &previous,
                            &trend,
                        ),
                    )
                })
                .collect();

            let RoundResponses {
                mut responses,
                interrupted,
            } = self.fan_out(run, round + 1, prompts).await;

            if let Some(reason) = interrupted {
                warn!(
                    "Round {} cut short ({:?}); discarding its partial responses",
                    round + 1,
                    reason
                );
                return reason.into();
            }

            let mut merged = Responses::new();
            let mut carried_forward = 0;
            for agent in participants {
                match responses.remove(&agent.name) {
                    Some(text) => {
                        memory.update_model_position(
                            &agent.name,
                            text.clone(),
                            format!("revised in round {}", round + 1),
                        );
                        merged.insert(agent.name.clone(), text);
                    }
                    None => {
                        let Some(text) = previous.get(&agent.name) else {
                            continue;
                        };
                        debug!("Carrying forward {}'s previous response", agent.name);
                        memory.update_model_position(
                            &agent.name,
                            text.clone(),
                            "carried forward (call failed)",
                        );
                        merged.insert(agent.name.clone(), text.clone());
                        carried_forward += 1;
                    }
                }
            }

            let (next, interrupted) = self.judge(run, &merged, memory).await;
            self.record(run, memory, merged, &next, carried_forward);
            *judgment = next;

            if let Some(reason) = interrupted {
                return reason.into();
            }
            if judgment.meets(run.params.consensus_threshold) {
                info!(
                    "Consensus {}% reached in round {}",
                    judgment.consensus_score,
                    round + 1
                );
                return TerminationReason::Converged;
            }
            if memory.is_stuck(run.params.stuck_window, run.params.stuck_band) {
                info!(
                    "Consensus stuck within {} points over the last {} rounds",
                    run.params.stuck_band, run.params.stuck_window
                );
                return TerminationReason::Stuck;
            }
        }

        TerminationReason::Exhausted
    }

    /// Query every agent in parallel, each bounded by the call timeout, and
    /// stop waiting when the debate deadline passes or the run is cancelled.
    async fn fan_out(
        &self,
        run: &DebateRun<'_>,
        round: usize,
        prompts: Vec<(Agent, String)>,
    ) -> RoundResponses {
        info!("Round {}: querying {} agents", round, prompts.len());
        run.progress.on_round_start(round, prompts.len());

        let mut join_set = JoinSet::new();
        for (agent, prompt) in prompts {
            let invoker = Arc::clone(&self.invoker);
            let timeout = run.params.call_timeout;

            join_set.spawn(async move {
                let outcome = bounded_invoke(invoker.as_ref(), &agent, &prompt, timeout).await;
                (agent, outcome)
            });
        }

        let mut responses = Responses::new();
        let interrupted = loop {
            tokio::select! {
                joined = join_set.join_next() => {
                    match joined {
                        None => break None,
                        Some(Ok((agent, InvocationOutcome::Success(text)))) => {
                            info!("{} responded in round {}", agent, round);
                            run.progress.on_agent_complete(round, &agent, true);
                            responses.insert(agent.name, text);
                        }
                        Some(Ok((agent, InvocationOutcome::Timeout))) => {
                            warn!(
                                "{} timed out after {:?} in round {}",
                                agent, run.params.call_timeout, round
                            );
                            run.progress.on_agent_complete(round, &agent, false);
                        }
                        Some(Ok((agent, InvocationOutcome::Failed(reason)))) => {
                            warn!("{} failed in round {}: {}", agent, round, reason);
                            run.progress.on_agent_complete(round, &agent, false);
                        }
                        Some(Err(e)) => {
                            warn!("Task join error: {}", e);
                        }
                    }
                }
                reason = wait_for_interruption(run.deadline, &run.cancel) => {
                    join_set.abort_all();
                    break Some(reason);
                }
            }
        };

        run.progress.on_round_complete(round);
        RoundResponses {
            responses,
            interrupted,
        }
    }

    /// Score a complete round. The analyzer's own fallback covers judge
    /// failures; an interruption while waiting on the judge scores the
    /// round by keyword overlap instead.
    async fn judge(
        &self,
        run: &DebateRun<'_>,
        responses: &Responses,
        memory: &DebateMemory,
    ) -> (ConsensusResult, Option<Interruption>) {
        let state = (memory.current_round() > 0).then(|| memory.debate_state());

        tokio::select! {
            result = self.analyzer.evaluate_consensus(run.question, responses, state.as_ref()) => {
                (result, None)
            }
            reason = wait_for_interruption(run.deadline, &run.cancel) => {
                warn!("Consensus judgment cut short ({:?})", reason);
                (self.analyzer.evaluate_heuristic(responses, state.as_ref()), Some(reason))
            }
        }
    }

    fn record(
        &self,
        run: &DebateRun<'_>,
        memory: &mut DebateMemory,
        responses: Responses,
        judgment: &ConsensusResult,
        carried_forward: usize,
    ) {
        let responders = responses.len();
        let iteration = memory.add_iteration(
            responses,
            judgment.consensus_score,
            judgment.key_disagreements.clone(),
        );
        let round = iteration.round + 1;

        self.logger.log(DebateEvent::new(
            "round_completed",
            json!({
                "round": round,
                "responders": responders,
                "responses": iteration.responses,
                "carried_forward": carried_forward,
            }),
        ));
        self.logger.log(DebateEvent::new(
            "consensus_evaluated",
            json!({
                "round": round,
                "consensus_score": judgment.consensus_score,
                "consensus_level": judgment.consensus_level,
                "convergence": iteration.convergence,
                "source": judgment.source,
                "key_disagreements": judgment.key_disagreements,
            }),
        ));

        run.progress.on_consensus(round, judgment);
    }

    async fn synthesize(
        &self,
        run: &DebateRun<'_>,
        participants: Vec<Agent>,
        memory: DebateMemory,
        final_judgment: ConsensusResult,
        termination: TerminationReason,
    ) -> DebateResult {
        info!("Synthesizing final answer");
        run.progress.on_synthesis_start();

        let state = memory.debate_state();
        let (final_responses, mut unresolved) = match memory.latest() {
            Some(latest) => (latest.responses.clone(), latest.disagreements.clone()),
            None => (Responses::new(), Vec::new()),
        };
        unresolved.retain(|item| item != HEURISTIC_DISAGREEMENT);

        // The deadline covers synthesis too: no ranker call once it has passed.
        let ranking = match termination {
            TerminationReason::DeadlineExceeded | TerminationReason::Cancelled => {
                first_responder(&final_responses)
            }
            _ => tokio::select! {
                ranking = self.ranker.rank(run.question, &final_responses) => ranking,
                reason = wait_for_interruption(run.deadline, &run.cancel) => {
                    warn!("Ranking cut short ({:?}), using the first responder", reason);
                    first_responder(&final_responses)
                }
            },
        };
        let base_agent = if final_responses.contains_key(&ranking.best_agent) {
            ranking.best_agent.clone()
        } else {
            let fallback = final_responses.keys().next().cloned().unwrap_or_default();
            warn!(
                "Ranker picked unknown agent '{}', using '{}'",
                ranking.best_agent, fallback
            );
            fallback
        };
        let base_answer = final_responses
            .get(&base_agent)
            .map(String::as_str)
            .unwrap_or("");

        let solution = assemble_solution(
            base_answer,
            &base_agent,
            state.history.len(),
            final_judgment.consensus_score,
            &state.consensus_trend,
            &unresolved,
        );
        let summary = consensus_summary(
            &state.consensus_trend,
            termination,
            final_responses.len(),
            final_judgment.source,
        );

        self.logger.log(DebateEvent::new(
            "debate_finished",
            json!({
                "iterations": state.history.len(),
                "final_consensus": final_judgment.consensus_score,
                "termination": termination,
                "base_agent": base_agent,
                "consensus_trend": state.consensus_trend,
            }),
        ));

        DebateResult {
            question: run.question.to_string(),
            participants,
            solution,
            iterations: state.history.len(),
            final_consensus: final_judgment.consensus_score,
            termination,
            base_agent,
            ranking,
            summary,
            final_judgment,
            debate_history: state,
        }
    }
}

/// Unscored ranking that picks the first responding agent.
fn first_responder(responses: &Responses) -> RankingResult {
    RankingResult {
        best_agent: responses.keys().next().cloned().unwrap_or_default(),
        scores_by_agent: Default::default(),
        suggestions: Vec::new(),
    }
}

/// Resolves once the debate deadline passes or the run is cancelled.
async fn wait_for_interruption(deadline: Instant, cancel: &CancellationToken) -> Interruption {
    tokio::select! {
        _ = tokio::time::sleep_until(deadline) => Interruption::Deadline,
        _ = cancel.cancelled() => Interruption::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_invoker::InvokeError;
    use crate::use_cases::evaluate_consensus::LlmConsensusScorer;
    use async_trait::async_trait;
    use council_domain::ScoreSource;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone)]
    enum Reply {
        Text(String),
        Fail,
        Hang,
    }

    fn text(s: &str) -> Reply {
        Reply::Text(s.to_string())
    }

    fn judgment(score: u8) -> Reply {
        Reply::Text(format!(
            "```json\n{{\"consensus_score\": {}, \"core_agreement\": \"shared core\", \
             \"key_disagreements\": [\"open point at {}\"]}}\n```",
            score, score
        ))
    }

    /// Plays back scripted replies per agent, plus a queue for the coordinator
    struct ScriptedInvoker {
        agents: Mutex<HashMap<String, VecDeque<Reply>>>,
        judge: Mutex<VecDeque<Reply>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedInvoker {
        fn new(agents: Vec<(&str, Vec<Reply>)>, judge: Vec<Reply>) -> Self {
            Self {
                agents: Mutex::new(
                    agents
                        .into_iter()
                        .map(|(name, replies)| (name.to_string(), replies.into()))
                        .collect(),
                ),
                judge: Mutex::new(judge.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls_for(&self, name: &str) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(agent, _)| agent == name)
                .map(|(_, prompt)| prompt.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ModelInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            agent: &Agent,
            prompt: &str,
            _timeout: Duration,
        ) -> Result<String, InvokeError> {
            self.calls
                .lock()
                .unwrap()
                .push((agent.name.clone(), prompt.to_string()));

            let reply = if agent.is_coordinator() {
                self.judge.lock().unwrap().pop_front()
            } else {
                self.agents
                    .lock()
                    .unwrap()
                    .get_mut(&agent.name)
                    .and_then(|queue| queue.pop_front())
            };

            match reply {
                Some(Reply::Text(text)) => Ok(text),
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                    Err(InvokeError::Failed("woke up".to_string()))
                }
                Some(Reply::Fail) | None => Err(InvokeError::Failed("scripted failure".to_string())),
            }
        }
    }

    /// Always picks the named agent
    struct FixedRanker(&'static str);

    #[async_trait]
    impl ResponseRanker for FixedRanker {
        async fn rank(&self, _question: &str, responses: &Responses) -> RankingResult {
            RankingResult {
                best_agent: self.0.to_string(),
                scores_by_agent: responses.keys().map(|k| (k.clone(), 5.0)).collect(),
                suggestions: vec![],
            }
        }
    }

    /// Takes three minutes to answer, like a slow moderator call
    #[derive(Default)]
    struct SlowRanker {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResponseRanker for SlowRanker {
        async fn rank(&self, _question: &str, responses: &Responses) -> RankingResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(3 * 60)).await;
            RankingResult {
                best_agent: responses.keys().last().cloned().unwrap_or_default(),
                scores_by_agent: Default::default(),
                suggestions: vec![],
            }
        }
    }

    fn agents(names: &[&str]) -> Vec<Agent> {
        names
            .iter()
            .map(|name| Agent::new(*name, format!("{} role", name)))
            .collect()
    }

    fn use_case(invoker: Arc<ScriptedInvoker>) -> RunDebateUseCase<ScriptedInvoker> {
        let scorer = LlmConsensusScorer::new(Arc::clone(&invoker), Agent::coordinator(None));
        RunDebateUseCase::new(
            invoker,
            ConsensusAnalyzer::new(Arc::new(scorer)),
            Arc::new(FixedRanker("a")),
        )
    }

    fn input(names: &[&str]) -> RunDebateInput {
        RunDebateInput::new(Question::new("What should we do?").unwrap(), agents(names))
    }

    #[tokio::test]
    async fn test_early_exit_on_unanimous_initial_answers() {
        let vilnius = "Vilnius is the capital of Lithuania.";
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text(vilnius)]),
                ("b", vec![text(vilnius)]),
                ("c", vec![text(vilnius)]),
                ("d", vec![text(vilnius)]),
            ],
            vec![judgment(96)],
        ));

        let result = use_case(invoker.clone())
            .execute(input(&["a", "b", "c", "d"]))
            .await
            .unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.final_consensus, 96);
        assert_eq!(result.termination, TerminationReason::EarlyExit);
        assert!(result.solution.contains("Vilnius"));
        assert_eq!(result.base_agent, "a");
        // One call per agent plus one judgment, no further rounds
        assert_eq!(invoker.calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_converges_on_third_iteration() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("a1"), text("a2"), text("a3")]),
                ("b", vec![text("b1"), text("b2"), text("b3")]),
                ("c", vec![text("c1"), text("c2"), text("c3")]),
            ],
            vec![judgment(60), judgment(78), judgment(91)],
        ));

        let result = use_case(invoker)
            .execute(input(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(result.iterations, 3);
        assert_eq!(result.termination, TerminationReason::Converged);
        assert_eq!(result.consensus_trend(), &[60, 78, 91]);
        assert_eq!(result.final_consensus, 91);
        assert!(result.solution.starts_with("a3"));
        assert!(result.solution.contains("60% → 78% → 91%"));

        let rounds: Vec<usize> = result
            .debate_history
            .history
            .iter()
            .map(|it| it.round)
            .collect();
        assert_eq!(rounds, vec![0, 1, 2]);
        assert_eq!(result.debate_history.history[1].convergence, 18.0);
    }

    #[tokio::test]
    async fn test_stops_when_stuck() {
        let replies = || vec![text("x"), text("y"), text("z"), text("w"), text("v")];
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![("a", replies()), ("b", replies())],
            vec![judgment(70), judgment(72), judgment(69), judgment(71)],
        ));

        let result = use_case(invoker)
            .execute(input(&["a", "b"]))
            .await
            .unwrap();

        assert_eq!(result.iterations, 3);
        assert_eq!(result.termination, TerminationReason::Stuck);
        assert_eq!(result.consensus_trend(), &[70, 72, 69]);
    }

    #[tokio::test]
    async fn test_exhausts_iteration_budget() {
        let replies = || vec![text("x"), text("y"), text("z"), text("w")];
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![("a", replies()), ("b", replies())],
            vec![judgment(30), judgment(50), judgment(70), judgment(95)],
        ));

        let result = use_case(invoker)
            .execute(input(&["a", "b"]).with_max_iterations(Some(3)))
            .await
            .unwrap();

        assert_eq!(result.iterations, 3);
        assert!(result.iterations <= 3);
        assert_eq!(result.termination, TerminationReason::Exhausted);
        assert_eq!(result.final_consensus, 70);
        assert_eq!(result.unresolved_disagreements(), &["open point at 70"]);
    }

    #[tokio::test]
    async fn test_failed_agent_carries_previous_response_forward() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("a1"), text("a2")]),
                ("b", vec![text("b1"), Reply::Fail]),
                ("c", vec![text("c1"), text("c2")]),
            ],
            vec![judgment(50), judgment(93)],
        ));

        let result = use_case(invoker)
            .execute(input(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(result.iterations, 2);
        let round2 = &result.debate_history.history[1].responses;
        assert_eq!(round2.len(), 3);
        assert_eq!(round2["a"], "a2");
        assert_eq!(round2["b"], "b1");
        assert_eq!(round2["c"], "c2");

        let positions = &result.debate_history.positions["b"];
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1].iteration, 1);
        assert!(positions[1].reasoning.contains("carried forward"));
    }

    #[tokio::test]
    async fn test_fails_when_only_one_agent_responds() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("only me")]),
                ("b", vec![Reply::Fail]),
                ("c", vec![Reply::Fail]),
                ("d", vec![Reply::Fail]),
            ],
            vec![judgment(99)],
        ));

        let err = use_case(invoker.clone())
            .execute(input(&["a", "b", "c", "d"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunDebateError::NotEnoughResponses {
                responded: 1,
                required: 2
            }
        ));
        assert!(err.to_string().contains("Not enough models responded"));
        // The coordinator is never consulted
        assert!(invoker.calls_for("coordinator").is_empty());
    }

    #[tokio::test]
    async fn test_rejects_single_agent_roster() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![], vec![]));
        let err = use_case(invoker).execute(input(&["a"])).await.unwrap_err();
        assert!(matches!(err, RunDebateError::TooFewAgents { .. }));
    }

    #[tokio::test]
    async fn test_rejects_invalid_params() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![], vec![]));
        let err = use_case(invoker)
            .execute(input(&["a", "b"]).with_max_iterations(Some(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, RunDebateError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_iterative_prompt_excludes_own_response() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("alpha answer"), text("a2")]),
                ("b", vec![text("bravo answer"), text("b2")]),
            ],
            vec![judgment(40), judgment(95)],
        ));

        use_case(invoker.clone())
            .execute(input(&["a", "b"]))
            .await
            .unwrap();

        let prompts = invoker.calls_for("a");
        assert_eq!(prompts.len(), 2);
        let round2 = &prompts[1];
        assert!(round2.contains("alpha answer"));
        assert!(round2.contains("--- b ---"));
        assert!(!round2.contains("--- a ---"));
        assert!(round2.contains("40%"));
    }

    #[tokio::test]
    async fn test_unparseable_judgment_falls_back_to_heuristic() {
        let same = "Vilnius is the capital of Lithuania";
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![("a", vec![text(same)]), ("b", vec![text(same)])],
            vec![text("They agree, I think.")],
        ));

        let result = use_case(invoker)
            .execute(input(&["a", "b"]))
            .await
            .unwrap();

        assert_eq!(result.final_judgment.source, ScoreSource::Heuristic);
        assert_eq!(result.final_consensus, 100);
        assert_eq!(result.termination, TerminationReason::EarlyExit);
        assert!(result.summary.contains("keyword-overlap fallback"));
        assert!(!result.solution.contains("Unresolved disagreements"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_agent_is_dropped_from_later_rounds() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("a1"), text("a2")]),
                ("b", vec![text("b1"), text("b2")]),
                ("c", vec![Reply::Hang, text("never asked")]),
            ],
            vec![judgment(50), judgment(92)],
        ));

        let result = use_case(invoker.clone())
            .execute(input(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(result.iterations, 2);
        assert_eq!(result.debate_history.history[0].responses.len(), 2);
        assert_eq!(result.debate_history.history[1].responses.len(), 2);
        assert_eq!(invoker.calls_for("c").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_discards_partial_round() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("a1"), text("a2")]),
                ("b", vec![text("b1"), Reply::Hang]),
            ],
            vec![judgment(40)],
        ));
        let params = DebateParams::default().with_debate_timeout(Duration::from_secs(10 * 60));

        let result = use_case(invoker)
            .execute(input(&["a", "b"]).with_params(params))
            .await
            .unwrap();

        assert_eq!(result.termination, TerminationReason::DeadlineExceeded);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.debate_history.history[0].responses["a"], "a1");
        assert!(result.solution.starts_with("a1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_debate() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("a1"), Reply::Hang]),
                ("b", vec![text("b1"), Reply::Hang]),
            ],
            vec![judgment(40)],
        ));
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            canceller.cancel();
        });

        let result = use_case(invoker)
            .execute(input(&["a", "b"]).with_cancellation(token))
            .await
            .unwrap();

        assert_eq!(result.termination, TerminationReason::Cancelled);
        assert_eq!(result.iterations, 1);
    }

    #[tokio::test]
    async fn test_unknown_best_agent_falls_back_to_first_responder() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![("b", vec![text("b1")]), ("c", vec![text("c1")])],
            vec![judgment(97)],
        ));

        // FixedRanker("a") names an agent that is not in the debate
        let result = use_case(invoker)
            .execute(input(&["b", "c"]))
            .await
            .unwrap();

        assert_eq!(result.base_agent, "b");
        assert!(result.solution.starts_with("b1"));
    }

    #[tokio::test]
    async fn test_run_debate_overrides() {
        let replies = || vec![text("x"), text("y")];
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![("a", replies()), ("b", replies())],
            vec![judgment(60), judgment(61)],
        ));

        let result = use_case(invoker)
            .run_debate(
                Question::new("q").unwrap(),
                agents(&["a", "b"]),
                Some(2),
                Some(99),
            )
            .await
            .unwrap();

        assert_eq!(result.iterations, 2);
        assert_eq!(result.termination, TerminationReason::Exhausted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_in_first_round_scores_by_keyword_overlap() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("Use a write-ahead log for durability")]),
                ("b", vec![text("Use a write-ahead log with periodic snapshots")]),
                ("c", vec![Reply::Hang]),
            ],
            vec![judgment(99)],
        ));
        let params = DebateParams::default().with_debate_timeout(Duration::from_secs(10 * 60));

        let result = use_case(invoker.clone())
            .execute(input(&["a", "b", "c"]).with_params(params))
            .await
            .unwrap();

        assert_eq!(result.termination, TerminationReason::DeadlineExceeded);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.debate_history.history[0].responses.len(), 2);
        assert_eq!(result.final_judgment.source, ScoreSource::Heuristic);
        assert!(invoker.calls_for("coordinator").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_while_judging_keeps_the_round() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![("a", vec![text("a1")]), ("b", vec![text("b1")])],
            vec![Reply::Hang],
        ));
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            canceller.cancel();
        });

        let result = use_case(invoker.clone())
            .execute(input(&["a", "b"]).with_cancellation(token))
            .await
            .unwrap();

        assert_eq!(result.termination, TerminationReason::Cancelled);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.debate_history.history[0].responses.len(), 2);
        assert_eq!(result.final_judgment.source, ScoreSource::Heuristic);
        assert_eq!(invoker.calls_for("coordinator").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_ranker_cannot_outlive_the_deadline() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![("a", vec![text("a1")]), ("b", vec![text("b1")])],
            vec![judgment(96)],
        ));
        let scorer = LlmConsensusScorer::new(Arc::clone(&invoker), Agent::coordinator(None));
        let ranker = Arc::new(SlowRanker::default());
        let use_case = RunDebateUseCase::new(
            invoker,
            ConsensusAnalyzer::new(Arc::new(scorer)),
            ranker.clone(),
        );
        let params = DebateParams::default().with_debate_timeout(Duration::from_secs(10));
        let started = Instant::now();

        let result = use_case
            .execute(input(&["a", "b"]).with_params(params))
            .await
            .unwrap();

        assert!(started.elapsed() <= Duration::from_secs(10));
        assert_eq!(result.termination, TerminationReason::EarlyExit);
        assert_eq!(result.base_agent, "a");
        assert!(result.ranking.scores_by_agent.is_empty());
        assert_eq!(ranker.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupted_debate_skips_the_ranker() {
        let invoker = Arc::new(ScriptedInvoker::new(
            vec![
                ("a", vec![text("a1"), Reply::Hang]),
                ("b", vec![text("b1"), Reply::Hang]),
            ],
            vec![judgment(40)],
        ));
        let scorer = LlmConsensusScorer::new(Arc::clone(&invoker), Agent::coordinator(None));
        let ranker = Arc::new(SlowRanker::default());
        let use_case = RunDebateUseCase::new(
            invoker,
            ConsensusAnalyzer::new(Arc::new(scorer)),
            ranker.clone(),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            canceller.cancel();
        });

        let result = use_case
            .execute(input(&["a", "b"]).with_cancellation(token))
            .await
            .unwrap();

        assert_eq!(result.termination, TerminationReason::Cancelled);
        assert_eq!(ranker.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.base_agent, "a");
    }
}
