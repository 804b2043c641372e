//! Agent value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Role label given to the judge that scores consensus.
pub const COORDINATOR_ROLE: &str = "Coordinator";

/// A debate participant (Value Object)
///
/// The name is the stable key used for responses and positions; the role
/// label ("Architecture", "Security", ...) steers the agent's perspective.
/// `model` is an optional hint for the invocation adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Agent {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The identity used for judge and ranking calls.
    pub fn coordinator(model: Option<String>) -> Self {
        Self {
            name: "coordinator".to_string(),
            role: COORDINATOR_ROLE.to_string(),
            model,
        }
    }

    pub fn is_coordinator(&self) -> bool {
        self.role == COORDINATOR_ROLE
    }

    /// Four complementary perspectives used when nothing is configured.
    pub fn default_roster() -> Vec<Agent> {
        vec![
            Agent::new("architect", "Architecture"),
            Agent::new("security", "Security"),
            Agent::new("performance", "Performance"),
            Agent::new("maintainer", "Maintainability"),
        ]
    }

    /// Parse `name:role` or `name:role:model`.
    ///
    /// ```
    /// use council_domain::Agent;
    ///
    /// let agent = Agent::parse_spec("sec:Security:claude-sonnet-4.5").unwrap();
    /// assert_eq!(agent.name, "sec");
    /// assert_eq!(agent.role, "Security");
    /// assert_eq!(agent.model.as_deref(), Some("claude-sonnet-4.5"));
    /// ```
    pub fn parse_spec(spec: &str) -> Result<Self, DomainError> {
        let mut parts = spec.splitn(3, ':').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let role = parts.next().unwrap_or_default();
        if name.is_empty() || role.is_empty() {
            return Err(DomainError::InvalidAgent(format!(
                "expected NAME:ROLE[:MODEL], got '{}'",
                spec
            )));
        }
        let agent = Agent::new(name, role);
        Ok(match parts.next().filter(|m| !m.is_empty()) {
            Some(model) => agent.with_model(model),
            None => agent,
        })
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}
