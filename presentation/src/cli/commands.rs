//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::OutputFormat as DomainOutputFormat;
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round's responses and scores, then the final answer
    Full,
    /// Only the final answer and consensus summary
    Solution,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Solution => DomainOutputFormat::Solution,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Iterative multi-agent debate until consensus")]
#[command(long_about = r#"
Council puts one question to a panel of agents and lets them debate until they agree.

1. Initial proposals: every agent answers independently, in parallel
2. Debate rounds: each agent reads the others' answers and revises its own;
   a coordinator scores agreement from 0 to 100 after every round
3. Synthesis: stops at the consensus threshold, when scores stop moving, or when
   the iteration budget runs out, then builds the answer on the best response

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/council/config.toml   Global config

Example:
  council "What is the capital of Lithuania?"
  council -a architect:Architecture -a security:Security:gpt-4o "Monolith or microservices?"
  council --max-iterations 3 --threshold 85 -o full "How should we version our API?"
"#)]
pub struct Cli {
    /// The question to put to the panel
    pub question: Option<String>,

    /// Agent as NAME:ROLE[:MODEL] (can be specified multiple times)
    #[arg(short, long, value_name = "NAME:ROLE[:MODEL]")]
    pub agent: Vec<String>,

    /// Model for the coordinator that judges consensus
    #[arg(long, value_name = "MODEL")]
    pub coordinator: Option<String>,

    /// Maximum number of iterations, initial proposals included
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Consensus score (0-100) at which the debate stops
    #[arg(long, value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Timeout for a single agent call, in minutes
    #[arg(long, value_name = "MINUTES")]
    pub timeout_mins: Option<u64>,

    /// Timeout for the whole debate, in minutes
    #[arg(long, value_name = "MINUTES")]
    pub deadline_mins: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Append the debate transcript as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
