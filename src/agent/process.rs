//! Subprocess-backed agent runtime.
//!
//! Spawns the agent CLI in print mode with JSON-lines output, writes the
//! prompt to stdin and decodes stdout one event per line.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use super::binary;
use super::events::AgentEvent;
use super::runtime::{AgentError, AgentEventStream, AgentQueryOptions, AgentRuntime};
use crate::config::AgentProviderConfig;

static API_STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"API Error:\s*(\d{3})").expect("valid API status regex"));

/// Runs the agent CLI as a child process per query.
///
/// The child is killed when the returned event stream is dropped.
#[derive(Debug, Clone, Default)]
pub struct ProcessAgentRuntime {
    binary: Option<PathBuf>,
    extra_args: Vec<String>,
    env: HashMap<String, String>,
}

impl ProcessAgentRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AgentProviderConfig) -> Self {
        Self {
            binary: config.binary_path.clone(),
            extra_args: config.extra_args.clone(),
            env: config.env.clone(),
        }
    }

    /// Use this binary instead of discovering one.
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Extra CLI arguments appended after the generated ones.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Command line arguments for one query.
    pub fn build_args(&self, options: &AgentQueryOptions) -> Vec<String> {
        let mut args: Vec<String> = ["-p", "--output-format", "stream-json", "--verbose"]
            .into_iter()
            .map(String::from)
            .collect();
        if !options.model.is_empty() {
            args.push("--model".into());
            args.push(options.model.clone());
        }
        if let Some(system_prompt) = &options.system_prompt {
            args.push("--system-prompt".into());
            args.push(system_prompt.clone());
        }
        if let Some(tools) = options.allowed_tools.as_ref().filter(|t| !t.is_empty()) {
            args.push("--allowedTools".into());
            args.push(tools.join(","));
        }
        if let Some(tools) = options.disallowed_tools.as_ref().filter(|t| !t.is_empty()) {
            args.push("--disallowedTools".into());
            args.push(tools.join(","));
        }
        if let Some(max_turns) = options.max_turns {
            args.push("--max-turns".into());
            args.push(max_turns.to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl AgentRuntime for ProcessAgentRuntime {
    async fn query(
        &self,
        prompt: String,
        options: AgentQueryOptions,
    ) -> Result<AgentEventStream, AgentError> {
        let binary = binary::resolve_binary(self.binary.as_deref())?;
        let mut command = Command::new(&binary);
        command
            .args(self.build_args(&options))
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }

        tracing::debug!(binary = %binary.display(), model = %options.model, "spawning agent process");
        let mut child = command.spawn().map_err(AgentError::Spawn)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::Io(std::io::Error::other("agent stdout unavailable")))?;
        let stderr = child.stderr.take();
        // Drained before the prompt is written so a child that fills the stderr
        // pipe before reading stdin cannot stall.
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buf).await;
            }
            buf
        });

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgentError::Io(std::io::Error::other("agent stdin unavailable")))?;
        stdin.write_all(prompt.as_bytes()).await?;
        stdin.shutdown().await?;
        drop(stdin);

        let stream = async_stream::stream! {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match AgentEvent::from_json_line(line) {
                            Ok(event) => yield Ok(event),
                            Err(source) => {
                                yield Err(AgentError::Decode { line: line.to_string(), source });
                                return;
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        yield Err(AgentError::Io(err));
                        return;
                    }
                }
            }

            let status = match child.wait().await {
                Ok(status) => status,
                Err(err) => {
                    yield Err(AgentError::Io(err));
                    return;
                }
            };
            let stderr = stderr_task.await.unwrap_or_default();
            if !status.success() {
                yield Err(exit_error(status.code(), stderr));
            } else if !stderr.trim().is_empty() {
                tracing::debug!(stderr = %stderr.trim(), "agent process wrote to stderr");
            }
        };
        Ok(Box::pin(stream))
    }
}

/// Map a failed exit to an error, lifting `API Error: <status>` when the CLI
/// reported one.
pub(crate) fn exit_error(code: Option<i32>, stderr: String) -> AgentError {
    let status = API_STATUS_RE
        .captures(&stderr)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok());
    match status {
        Some(status) => AgentError::api(status, stderr.trim()),
        None => AgentError::Exit { code, stderr },
    }
}
