//! Model invoker port
//!
//! Defines how the application layer sends one prompt to one agent's model
//! and gets one text reply back.

use async_trait::async_trait;
use council_domain::Agent;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while invoking a model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to start model process: {0}")]
    Spawn(String),

    #[error("Invocation failed: {0}")]
    Failed(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Invocation cancelled")]
    Cancelled,
}

/// Gateway to the models behind the agents
///
/// Implementations (adapters) live in the infrastructure layer. Each call is
/// independent: no conversation state is kept between invocations.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send `prompt` to the model configured for `agent`.
    ///
    /// `timeout` is advisory for the adapter (e.g. to kill a subprocess);
    /// [`bounded_invoke`] enforces it regardless.
    async fn invoke(&self, agent: &Agent, prompt: &str, timeout: Duration)
    -> Result<String, InvokeError>;
}

/// Result of one time-bounded model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Success(String),
    Timeout,
    Failed(String),
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success(_))
    }

    pub fn into_result(self, timeout: Duration) -> Result<String, InvokeError> {
        match self {
            InvocationOutcome::Success(text) => Ok(text),
            InvocationOutcome::Timeout => Err(InvokeError::Timeout(timeout)),
            InvocationOutcome::Failed(reason) => Err(InvokeError::Failed(reason)),
        }
    }
}

/// Invoke `agent` with a hard upper bound on wall-clock time.
///
/// Whitespace-only replies count as failures.
pub async fn bounded_invoke<I: ModelInvoker + ?Sized>(
    invoker: &I,
    agent: &Agent,
    prompt: &str,
    timeout: Duration,
) -> InvocationOutcome {
    match tokio::time::timeout(timeout, invoker.invoke(agent, prompt, timeout)).await {
        Ok(Ok(text)) if text.trim().is_empty() => {
            InvocationOutcome::Failed(InvokeError::EmptyResponse.to_string())
        }
        Ok(Ok(text)) => InvocationOutcome::Success(text),
        Ok(Err(InvokeError::Timeout(_))) | Err(_) => {
            debug!("{} timed out after {:?}", agent, timeout);
            InvocationOutcome::Timeout
        }
        Ok(Err(e)) => InvocationOutcome::Failed(e.to_string()),
    }
}
