//! Streaming event types

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::types::{FinishReason, Usage};

/// Chat streaming event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChatStreamEvent {
    /// One agent text block, passed through as-is.
    TextDelta {
        /// Per-stream, monotonically increasing delta id
        id: String,
        delta: String,
    },
    /// One agent tool invocation.
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        /// JSON-encoded tool input
        input: String,
    },
    /// Terminal event.
    Finish {
        finish_reason: FinishReason,
        usage: Usage,
    },
}

/// Chat stream
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, LlmError>> + Send>>;
