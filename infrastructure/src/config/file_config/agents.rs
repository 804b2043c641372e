//! Agent roster from TOML (`[[agents]]` and `[coordinator]` sections)

use council_domain::{Agent, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rosters larger than this draw a warning.
const MANY_AGENTS: usize = 8;

/// One `[[agents]]` entry
///
/// ```toml
/// [[agents]]
/// name = "security"
/// role = "Security"
/// model = "claude-opus-4"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAgentEntry {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl From<&FileAgentEntry> for Agent {
    fn from(entry: &FileAgentEntry) -> Self {
        let agent = Agent::new(entry.name.trim(), entry.role.trim());
        match entry.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => agent.with_model(model),
            _ => agent,
        }
    }
}

/// `[coordinator]`: the model that judges consensus and ranks answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoordinatorConfig {
    pub model: Option<String>,
}

impl FileCoordinatorConfig {
    pub fn to_agent(&self) -> Agent {
        Agent::coordinator(
            self.model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        )
    }
}

/// Build the roster, collecting issues.
///
/// An empty list means the built-in roster.
pub fn parse_agents(entries: &[FileAgentEntry]) -> (Vec<Agent>, Vec<ConfigIssue>) {
    if entries.is_empty() {
        return (Agent::default_roster(), Vec::new());
    }

    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    let mut agents = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let mut valid = true;
        for (field, value) in [("name", &entry.name), ("role", &entry.role)] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyAgentField {
                        field: format!("agents[{}].{}", i, field),
                    },
                    format!("agents[{}].{} cannot be empty", i, field),
                ));
                valid = false;
            }
        }
        if !valid {
            continue;
        }

        let agent = Agent::from(entry);
        if !seen.insert(agent.name.clone()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateAgent {
                    name: agent.name.clone(),
                },
                format!("agent '{}' is defined more than once", agent.name),
            ));
            continue;
        }
        agents.push(agent);
    }

    if agents.len() < 2 {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::TooFewAgents {
                count: agents.len(),
            },
            format!(
                "a debate needs at least 2 agents, {} configured",
                agents.len()
            ),
        ));
    } else if agents.len() > MANY_AGENTS {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::TooManyAgents {
                count: agents.len(),
            },
            format!(
                "{} agents configured; every round costs one call per agent",
                agents.len()
            ),
        ));
    }

    (agents, issues)
}
