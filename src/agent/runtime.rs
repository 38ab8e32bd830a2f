//! The `AgentRuntime` seam.

use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::events::AgentEvent;

/// Lazily produced agent events, consumed once and in order.
pub type AgentEventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, AgentError>> + Send>>;

/// Failure raised by an agent runtime.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent binary not found: {0}")]
    BinaryNotFound(String),

    #[error("failed to start agent process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("agent I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed agent event `{line}`: {source}")]
    Decode {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("agent process exited with status {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    /// The runtime surfaced an upstream API failure.
    #[error("agent API error (status {status:?}): {message}")]
    Api {
        status: Option<u16>,
        message: String,
        /// Seconds to wait before retrying, when the upstream said so.
        retry_after: Option<u64>,
        url: Option<String>,
        request_body: Option<String>,
    },
}

impl AgentError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status),
            message: message.into(),
            retry_after: None,
            url: None,
            request_body: None,
        }
    }
}

/// Options bag handed to the runtime for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentQueryOptions {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallowed_tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

/// Runs the agent for one flattened prompt.
///
/// Implementations own process spawning, authentication and transport; the
/// provider only consumes the returned event sequence.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn query(
        &self,
        prompt: String,
        options: AgentQueryOptions,
    ) -> Result<AgentEventStream, AgentError>;
}

#[async_trait]
impl<T: AgentRuntime + ?Sized> AgentRuntime for std::sync::Arc<T> {
    async fn query(
        &self,
        prompt: String,
        options: AgentQueryOptions,
    ) -> Result<AgentEventStream, AgentError> {
        (**self).query(prompt, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentContentBlock;
    use futures::{StreamExt, stream};
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl AgentRuntime for Echo {
        async fn query(
            &self,
            prompt: String,
            options: AgentQueryOptions,
        ) -> Result<AgentEventStream, AgentError> {
            if options.model.is_empty() {
                return Err(AgentError::api(400, "model is required"));
            }
            let event = AgentEvent::assistant(
                vec![AgentContentBlock::text(prompt)],
                Some("end_turn"),
            );
            Ok(Box::pin(stream::iter(vec![Ok(event)])))
        }
    }

    #[test]
    fn shared_runtime_delegates() {
        let runtime = Arc::new(Echo);
        let options = AgentQueryOptions {
            model: "sonnet".into(),
            ..Default::default()
        };
        let events: Vec<_> = tokio_test::block_on(async {
            runtime
                .query("ping".into(), options)
                .await
                .unwrap()
                .collect()
                .await
        });
        assert_eq!(events.len(), 1);
        match &events[0] {
            Ok(AgentEvent::Assistant(turn)) => {
                assert_eq!(turn.message.content, vec![AgentContentBlock::text("ping")]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn api_error_carries_status() {
        let err = tokio_test::block_on(Arc::new(Echo).query("x".into(), AgentQueryOptions::default()))
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::Api { status: Some(400), .. }));
        assert_eq!(err.to_string(), "agent API error (status Some(400)): model is required");
    }
}
