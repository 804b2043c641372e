//! CLI entrypoint for council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    ConsensusAnalyzer, DebateLogger, DebateParams, DebateProgressNotifier, LlmConsensusScorer,
    NoDebateLogger, NoProgress, ResponseRanker, RunDebateInput, RunDebateUseCase,
};
use council_domain::{Agent, ConfigIssue, OutputFormat, Question, Severity};
use council_infrastructure::{
    CliModelInvoker, ConfigLoader, FileConfig, JsonlDebateLogger, ModeratorResponseRanker,
    OverlapResponseRanker, RankingStrategy, parse_agents,
};
use council_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Held until exit so buffered file logs are flushed.
    let _log_guard = init_logging(&cli, &config);

    info!("Starting council");

    // --agent replaces [[agents]] entirely, so its entries are not checked.
    report_issues(&config.validate_roster(cli.agent.is_empty()))?;

    let question = match &cli.question {
        Some(q) => Question::new(q.as_str())?,
        None => bail!("A question is required. Try: council \"Your question\""),
    };

    let agents = if cli.agent.is_empty() {
        parse_agents(&config.agents).0
    } else {
        cli.agent
            .iter()
            .map(|spec| Agent::parse_spec(spec))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --agent value")?
    };

    let params = debate_params(&cli, &config);
    let coordinator = match &cli.coordinator {
        Some(model) => Agent::coordinator(Some(model.clone())),
        None => config.coordinator.to_agent(),
    };

    // === Dependency Injection ===
    let invoker = Arc::new(
        CliModelInvoker::new(config.invoker.clone())
            .context("Model CLI is not available; set [invoker] program in council.toml")?,
    );

    let scorer = LlmConsensusScorer::new(Arc::clone(&invoker), coordinator.clone())
        .with_timeout(params.judge_timeout);
    let analyzer = ConsensusAnalyzer::new(Arc::new(scorer));

    let ranker: Arc<dyn ResponseRanker> = match config.ranking.parse_strategy().0 {
        RankingStrategy::Moderator => Arc::new(
            ModeratorResponseRanker::new(Arc::clone(&invoker), coordinator)
                .with_timeout(params.judge_timeout),
        ),
        RankingStrategy::Overlap => Arc::new(OverlapResponseRanker),
    };

    let transcript = cli
        .transcript
        .clone()
        .or_else(|| config.logging.transcript.as_ref().map(PathBuf::from));
    let transcript_logger = transcript.and_then(|path| JsonlDebateLogger::new(path));
    let logger: Arc<dyn DebateLogger> = match transcript_logger {
        Some(logger) => {
            info!("Writing debate transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoDebateLogger),
    };

    let use_case = RunDebateUseCase::new(invoker, analyzer, ranker).with_logger(logger);

    // Ctrl-C stops the debate and synthesizes from the last completed round.
    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing with the last completed round");
                token.cancel();
            }
        });
    }

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    if !config.output.color {
        colored::control::set_override(false);
    }

    let show_progress = !cli.quiet && format != OutputFormat::Json;
    if show_progress {
        println!();
        println!("+============================================================+");
        println!("|                  Council - Agent Debate                    |");
        println!("+============================================================+");
        println!();
        println!("Question: {}", question);
        println!(
            "Agents: {}",
            agents
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    let progress: Box<dyn DebateProgressNotifier> = if !show_progress {
        Box::new(NoProgress)
    } else if config.output.show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let input = RunDebateInput::new(question, agents)
        .with_params(params)
        .with_cancellation(cancellation);
    let result = use_case
        .execute_with_progress(input, progress.as_ref())
        .await?;

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Solution => ConsoleFormatter::format_solution_only(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(())
}

/// Stderr logging plus an optional daily-rotated file under `[logging] dir`.
///
/// Filter precedence: `-v` flags, then `RUST_LOG`, then `[logging] level`,
/// then `warn`.
fn init_logging(cli: &Cli, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.logging.level.as_deref().unwrap_or("warn"))
        }),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match config.logging.dir.as_deref().map(expand_home) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// File config merged with command-line overrides.
fn debate_params(cli: &Cli, config: &FileConfig) -> DebateParams {
    let mut params = config.debate.to_params().0;
    if let Some(max) = cli.max_iterations {
        params = params.with_max_iterations(max);
    }
    if let Some(threshold) = cli.threshold {
        params = params.with_consensus_threshold(threshold);
    }
    if let Some(mins) = cli.timeout_mins {
        params = params.with_call_timeout(Duration::from_secs(mins * 60));
    }
    if let Some(mins) = cli.deadline_mins {
        params = params.with_debate_timeout(Duration::from_secs(mins * 60));
    }
    params
}

/// Print every config issue; fail if any is an error.
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => eprintln!("config warning: {}", issue.message),
        }
    }
    if ConfigIssue::any_errors(issues) {
        bail!("Configuration has errors; fix them or run with --no-config");
    }
    Ok(())
}
