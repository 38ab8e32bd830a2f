//! Agent-backed chat provider.
//!
//! `AgentChatModel` implements the provider contract (`ChatCapability`) on
//! top of any `AgentRuntime`: prompt conversion, one runtime query per call,
//! then either aggregation or stream adaptation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::Instrument;

use crate::aggregate::{AggregateOptions, aggregate_events};
use crate::agent::{AgentEventStream, AgentRuntime, ProcessAgentRuntime, ResultEvent};
use crate::config::AgentProviderConfig;
use crate::convert::convert_to_agent_prompt;
use crate::defaults;
use crate::error::{LlmError, classify_agent_error};
use crate::streaming::{AgentStreamAdapter, ChatStream};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, Warning};

/// Provider contract consumed by callers.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    /// Full chat request; buffers the whole answer.
    async fn chat_request(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Full streaming chat request.
    async fn chat_stream_request(&self, request: ChatRequest) -> Result<ChatStream, LlmError>;

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse, LlmError> {
        self.chat_request(ChatRequest::new(messages)).await
    }

    async fn chat_stream(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, LlmError> {
        self.chat_stream_request(ChatRequest::new(messages)).await
    }
}

/// Chat model that delegates every call to an agent runtime.
pub struct AgentChatModel<R: AgentRuntime = ProcessAgentRuntime> {
    runtime: Arc<R>,
    config: AgentProviderConfig,
}

impl<R: AgentRuntime> Clone for AgentChatModel<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R: AgentRuntime> std::fmt::Debug for AgentChatModel<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentChatModel")
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl AgentChatModel<ProcessAgentRuntime> {
    /// Model backed by the agent CLI, configured from `config`.
    pub fn from_config(config: AgentProviderConfig) -> Self {
        let runtime = ProcessAgentRuntime::from_config(&config);
        Self::new(runtime, config)
    }
}

impl<R: AgentRuntime> AgentChatModel<R> {
    pub fn new(runtime: R, config: AgentProviderConfig) -> Self {
        Self {
            runtime: Arc::new(runtime),
            config,
        }
    }

    pub fn config(&self) -> &AgentProviderConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn start(&self, request: &ChatRequest) -> Result<AgentEventStream, LlmError> {
        let prompt = convert_to_agent_prompt(&request.messages);
        let options = self.config.query_options(prompt.system_prompt);
        tracing::debug!(
            model = %options.model,
            prompt_len = prompt.prompt.len(),
            "starting agent query"
        );
        self.runtime
            .query(prompt.prompt, options)
            .await
            .map_err(classify_agent_error)
    }
}

#[async_trait]
impl<R: AgentRuntime + 'static> ChatCapability for AgentChatModel<R> {
    async fn chat_request(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let span = tracing::debug_span!(
            "agent_chat",
            provider = defaults::PROVIDER_ID,
            request_id = %uuid::Uuid::new_v4()
        );
        async move {
            let warnings = collect_warnings(&request);
            let events = self.start(&request).await?;
            let aggregated = aggregate_events(
                events,
                AggregateOptions {
                    strip_json_fences: request.wants_json(),
                },
            )
            .await?;

            let provider_metadata = result_metadata(aggregated.result.as_ref());
            Ok(ChatResponse {
                id: aggregated.result.and_then(|r| r.session_id),
                content: aggregated.content,
                finish_reason: aggregated.finish_reason,
                usage: aggregated.usage,
                warnings,
                provider_metadata,
            })
        }
        .instrument(span)
        .await
    }

    async fn chat_stream_request(&self, request: ChatRequest) -> Result<ChatStream, LlmError> {
        let span = tracing::debug_span!(
            "agent_chat_stream",
            provider = defaults::PROVIDER_ID,
            request_id = %uuid::Uuid::new_v4()
        );
        let setup_span = span.clone();
        async move {
            for warning in collect_warnings(&request) {
                tracing::warn!(?warning, "request option ignored by the agent runtime");
            }
            let events = self.start(&request).await?;
            Ok(instrument_stream(
                AgentStreamAdapter::new().into_stream(events),
                span,
            ))
        }
        .instrument(setup_span)
        .await
    }
}

/// Poll every item of `stream` inside `span`.
fn instrument_stream(mut stream: ChatStream, span: tracing::Span) -> ChatStream {
    Box::pin(async_stream::stream! {
        while let Some(item) = stream.next().instrument(span.clone()).await {
            yield item;
        }
    })
}

/// Warnings for request features the agent runtime cannot honor.
pub fn collect_warnings(request: &ChatRequest) -> Vec<Warning> {
    let params = &request.common_params;
    let unsupported = [
        ("max_tokens", params.max_tokens.is_some()),
        ("temperature", params.temperature.is_some()),
        ("top_p", params.top_p.is_some()),
        ("stop_sequences", params.stop_sequences.is_some()),
        ("seed", params.seed.is_some()),
    ];

    let mut warnings: Vec<Warning> = unsupported
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(setting, _)| Warning::unsupported_setting(setting, None::<String>))
        .collect();

    if let Some(tools) = &request.tools {
        warnings.extend(tools.iter().map(|tool| {
            Warning::unsupported_tool(
                tool.name.clone(),
                Some("the agent runs its own tool set"),
            )
        }));
    }
    warnings
}

fn result_metadata(result: Option<&ResultEvent>) -> HashMap<String, Value> {
    let mut metadata = HashMap::new();
    metadata.insert(
        "provider".to_string(),
        Value::from(defaults::PROVIDER_ID),
    );
    metadata.insert(
        "created_at".to_string(),
        Value::String(chrono::Utc::now().to_rfc3339()),
    );
    let Some(result) = result else {
        return metadata;
    };
    if let Some(session_id) = &result.session_id {
        metadata.insert("session_id".to_string(), Value::from(session_id.clone()));
    }
    if let Some(cost) = result.total_cost_usd {
        metadata.insert("total_cost_usd".to_string(), Value::from(cost));
    }
    if let Some(duration) = result.duration_ms {
        metadata.insert("duration_ms".to_string(), Value::from(duration));
    }
    if let Some(turns) = result.num_turns {
        metadata.insert("num_turns".to_string(), Value::from(turns));
    }
    metadata
}
