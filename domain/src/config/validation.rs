//! Structured configuration issues.
//!
//! Config validation never fails fast: it collects every issue so the CLI
//! can print them all, then refuses to start only if one is an error.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The debate cannot run with this configuration.
    Error,
    /// The debate runs, but maybe not as intended.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Fewer than two agents configured.
    TooFewAgents { count: usize },
    /// More agents than a debate is designed for.
    TooManyAgents { count: usize },
    /// An agent with an empty name or role.
    EmptyAgentField { field: String },
    /// Two agents share a name.
    DuplicateAgent { name: String },
    /// A numeric setting outside its valid range.
    OutOfRange { field: String, value: String },
    /// A string setting with an unrecognized value.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// True if any issue in the list is an error.
    pub fn any_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
