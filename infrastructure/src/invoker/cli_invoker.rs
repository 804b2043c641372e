//! Subprocess model invoker.
//!
//! Runs one CLI process per call (`claude --print`, `llm`, `ollama run`, ...),
//! writes the prompt to its stdin and reads the reply from stdout.

use async_trait::async_trait;
use council_application::ports::model_invoker::{InvokeError, ModelInvoker};
use council_domain::{Agent, truncate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// How much stderr to keep in error messages.
const STDERR_EXCERPT: usize = 500;

/// Command line used to reach a model.
///
/// `{model}`, `{role}` and `{name}` in arguments are replaced per agent.
/// `model_args` are only appended when the agent has a model set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliInvokerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub model_args: Vec<String>,
}

impl Default for CliInvokerConfig {
    fn default() -> Self {
        Self {
            program: "claude".to_string(),
            args: vec!["--print".to_string()],
            model_args: vec!["--model".to_string(), "{model}".to_string()],
        }
    }
}

impl CliInvokerConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            model_args: Vec::new(),
        }
    }

    /// Expanded argument list for `agent`.
    pub fn args_for(&self, agent: &Agent) -> Vec<String> {
        let expand = |arg: &String| {
            arg.replace("{model}", agent.model.as_deref().unwrap_or(""))
                .replace("{role}", &agent.role)
                .replace("{name}", &agent.name)
        };

        let mut args: Vec<String> = self.args.iter().map(expand).collect();
        if agent.model.is_some() {
            args.extend(self.model_args.iter().map(expand));
        }
        args
    }
}

/// [`ModelInvoker`] backed by a local CLI program
pub struct CliModelInvoker {
    program: PathBuf,
    config: CliInvokerConfig,
}

impl CliModelInvoker {
    /// Resolve `config.program` on `PATH`.
    pub fn new(config: CliInvokerConfig) -> Result<Self, InvokeError> {
        let program = which::which(&config.program).map_err(|e| {
            InvokeError::Spawn(format!("'{}' not found on PATH: {}", config.program, e))
        })?;
        debug!("Using model CLI at {}", program.display());
        Ok(Self { program, config })
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

#[async_trait]
impl ModelInvoker for CliModelInvoker {
    async fn invoke(
        &self,
        agent: &Agent,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, InvokeError> {
        let args = self.config.args_for(agent);
        debug!(
            "Invoking {} for {} ({} prompt bytes)",
            self.program.display(),
            agent,
            prompt.len()
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn().map_err(|e| {
            InvokeError::Spawn(format!("{}: {}", self.program.display(), e))
        })?;

        // Stdin is fed concurrently with draining stdout.
        if let Some(mut stdin) = child.stdin.take() {
            let prompt = prompt.to_string();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    debug!("Could not write prompt to model stdin: {}", e);
                }
            });
        }

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| InvokeError::Failed(e.to_string()))?,
            Err(_) => return Err(InvokeError::Timeout(timeout)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InvokeError::Failed(format!(
                "{} exited with {}: {}",
                self.config.program,
                output.status,
                truncate(stderr.trim(), STDERR_EXCERPT)
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(InvokeError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> CliModelInvoker {
        CliModelInvoker::new(CliInvokerConfig::new(
            "sh",
            vec!["-c".to_string(), script.to_string()],
        ))
        .unwrap()
    }

    fn agent() -> Agent {
        Agent::new("architect", "Architecture")
    }

    #[test]
    fn test_args_expand_placeholders() {
        let config = CliInvokerConfig {
            program: "llm".to_string(),
            args: vec!["--system".to_string(), "You are the {role} expert".to_string()],
            model_args: vec!["-m".to_string(), "{model}".to_string()],
        };

        let plain = config.args_for(&agent());
        assert_eq!(plain, vec!["--system", "You are the Architecture expert"]);

        let with_model = config.args_for(&agent().with_model("gpt-4o"));
        assert_eq!(
            with_model,
            vec!["--system", "You are the Architecture expert", "-m", "gpt-4o"]
        );
    }

    #[test]
    fn test_missing_program_is_rejected() {
        let result = CliModelInvoker::new(CliInvokerConfig::new(
            "definitely_not_installed_xyz",
            vec![],
        ));
        assert!(matches!(result, Err(InvokeError::Spawn(_))));
    }

    #[tokio::test]
    async fn test_prompt_goes_through_stdin() {
        let invoker = shell("cat");
        let reply = invoker
            .invoke(&agent(), "Vilnius\n", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(reply, "Vilnius");
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let invoker = shell("echo 'rate limited' >&2; exit 3");
        let err = invoker
            .invoke(&agent(), "q", Duration::from_secs(10))
            .await
            .unwrap_err();
        match err {
            InvokeError::Failed(message) => assert!(message.contains("rate limited")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_output_is_empty_response() {
        let invoker = shell("cat > /dev/null; echo '   '");
        let err = invoker
            .invoke(&agent(), "q", Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(err, InvokeError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_slow_process_times_out() {
        let invoker = shell("sleep 5");
        let timeout = Duration::from_millis(100);
        let err = invoker.invoke(&agent(), "q", timeout).await.unwrap_err();
        assert_eq!(err, InvokeError::Timeout(timeout));
    }
}
