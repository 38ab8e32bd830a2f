//! Agent event sequence → `ChatStream`.
//!
//! Each text block becomes exactly one `TextDelta` (no coalescing) and each
//! tool invocation one `ToolCall` with its input JSON-encoded. The result
//! event produces the single `Finish` and closes the stream. A failure while
//! pulling the next event is classified, yielded once, and ends the stream.

use futures_util::StreamExt;

use super::events::{ChatStream, ChatStreamEvent};
use crate::agent::{AgentContentBlock, AgentError, AgentEvent, AgentEventStream, ResultEvent};
use crate::convert::convert_usage;
use crate::error::{LlmError, classify_agent_error};
use crate::types::FinishReason;

/// Lifecycle of one streamed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Running,
    Closed,
    Errored,
}

/// Per-call streaming state: lifecycle plus the delta id counter.
#[derive(Debug)]
pub struct AgentStreamAdapter {
    state: StreamState,
    next_delta_id: u64,
}

impl Default for AgentStreamAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentStreamAdapter {
    pub fn new() -> Self {
        Self {
            state: StreamState::Idle,
            next_delta_id: 0,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Convert one agent event. Events arriving after the stream closed or
    /// failed are ignored.
    pub fn convert_event(&mut self, event: AgentEvent) -> Vec<ChatStreamEvent> {
        match self.state {
            StreamState::Closed | StreamState::Errored => return Vec::new(),
            StreamState::Idle => self.state = StreamState::Running,
            StreamState::Running => {}
        }

        match event {
            AgentEvent::Assistant(turn) => turn
                .message
                .content
                .into_iter()
                .filter_map(|block| match block {
                    AgentContentBlock::Text { text } => Some(ChatStreamEvent::TextDelta {
                        id: self.take_delta_id(),
                        delta: text,
                    }),
                    AgentContentBlock::ToolUse { id, name, input } => {
                        Some(ChatStreamEvent::ToolCall {
                            tool_call_id: id,
                            tool_name: name,
                            input: input.to_string(),
                        })
                    }
                    AgentContentBlock::Unsupported => None,
                })
                .collect(),
            AgentEvent::Result(result) => {
                self.state = StreamState::Closed;
                vec![ChatStreamEvent::Finish {
                    finish_reason: stream_finish_reason(&result),
                    usage: convert_usage(result.usage.as_ref()),
                }]
            }
            AgentEvent::Other => Vec::new(),
        }
    }

    /// Classify a pull failure and mark the stream errored.
    pub fn fail(&mut self, err: AgentError) -> LlmError {
        self.state = StreamState::Errored;
        classify_agent_error(err)
    }

    /// Drive `events` one at a time, yielding converted events in order.
    pub fn into_stream(mut self, mut events: AgentEventStream) -> ChatStream {
        let stream = async_stream::stream! {
            self.state = StreamState::Running;
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        for part in self.convert_event(event) {
                            yield Ok(part);
                        }
                        if self.state == StreamState::Closed {
                            break;
                        }
                    }
                    Err(err) => {
                        yield Err(self.fail(err));
                        break;
                    }
                }
            }
            if self.state == StreamState::Running {
                tracing::warn!("agent event stream ended without a result event");
                self.state = StreamState::Closed;
            }
        };
        Box::pin(stream)
    }

    fn take_delta_id(&mut self) -> String {
        let id = format!("txt-{}", self.next_delta_id);
        self.next_delta_id += 1;
        id
    }
}

/// Finish reason for the streaming path.
///
/// Only the result's success/error flags are consulted; the stop-reason
/// table used by the non-streaming path does not apply here.
pub fn stream_finish_reason(result: &ResultEvent) -> FinishReason {
    if result.is_success() {
        FinishReason::Stop
    } else if result.is_error {
        FinishReason::Error
    } else {
        FinishReason::Stop
    }
}
