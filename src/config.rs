//! Provider configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::agent::AgentQueryOptions;
use crate::defaults;

/// Configuration for `AgentChatModel` and `ProcessAgentRuntime`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentProviderConfig {
    /// Model id or alias passed to the agent runtime
    pub model: String,
    /// Agent CLI path; discovered from env/`PATH` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<PathBuf>,
    /// Built-in agent tools the agent may use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<Vec<String>>,
    /// Built-in agent tools the agent must not use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallowed_tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
    /// Working directory for the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Extra CLI arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
    /// Extra environment for the agent process
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
}

impl Default for AgentProviderConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            binary_path: None,
            allowed_tools: None,
            disallowed_tools: None,
            max_turns: None,
            cwd: None,
            extra_args: Vec::new(),
            env: HashMap::new(),
        }
    }
}

impl AgentProviderConfig {
    pub fn builder() -> AgentProviderConfigBuilder {
        AgentProviderConfigBuilder::default()
    }

    /// Defaults with `SIUMAI_AGENT_MODEL` / `SIUMAI_AGENT_CLI_PATH` applied.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(model) = lookup(defaults::ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(path) = lookup(defaults::ENV_CLI_PATH).filter(|v| !v.trim().is_empty()) {
            config.binary_path = Some(PathBuf::from(path.trim()));
        }
        config
    }

    /// Options bag for one query.
    pub fn query_options(&self, system_prompt: Option<String>) -> AgentQueryOptions {
        AgentQueryOptions {
            model: self.model.clone(),
            system_prompt,
            allowed_tools: self.allowed_tools.clone(),
            disallowed_tools: self.disallowed_tools.clone(),
            max_turns: self.max_turns,
            cwd: self.cwd.clone(),
        }
    }
}

/// Builder for `AgentProviderConfig`
#[derive(Debug, Clone, Default)]
pub struct AgentProviderConfigBuilder {
    config: AgentProviderConfig,
}

impl AgentProviderConfigBuilder {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn with_binary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.binary_path = Some(path.into());
        self
    }

    pub fn with_allowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_disallowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.disallowed_tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.config.max_turns = Some(max_turns);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.config.cwd = Some(cwd.into());
        self
    }

    pub fn with_extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.env.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> AgentProviderConfig {
        self.config
    }
}
