//! Non-streaming aggregation.
//!
//! Drains the agent event sequence and buffers everything; partial results
//! are never returned. Callers wanting incremental output use `streaming`.

use futures_util::StreamExt;

use crate::agent::{AgentEvent, AgentEventStream, ResultEvent};
use crate::convert::{
    convert_assistant_blocks, convert_usage, map_finish_reason, strip_markdown_code_fences,
};
use crate::error::{LlmError, classify_agent_error};
use crate::types::{ContentItem, FinishReason, Usage};

/// Aggregation switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    /// Strip markdown code fences from every text item (JSON-only output).
    pub strip_json_fences: bool,
}

/// Result of draining one agent run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResponse {
    pub content: Vec<ContentItem>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    /// Terminal result event, if the agent produced one.
    pub result: Option<ResultEvent>,
}

/// Consume `events` to exhaustion.
///
/// The last assistant turn's stop reason decides the finish reason; the last
/// result event decides usage. A failure while pulling an event is
/// classified and returned.
pub async fn aggregate_events(
    mut events: AgentEventStream,
    options: AggregateOptions,
) -> Result<AggregatedResponse, LlmError> {
    let mut content = Vec::new();
    let mut stop_reason: Option<String> = None;
    let mut result: Option<ResultEvent> = None;

    while let Some(event) = events.next().await {
        match event.map_err(classify_agent_error)? {
            AgentEvent::Assistant(turn) => {
                content.extend(convert_assistant_blocks(&turn.message.content));
                if turn.message.stop_reason.is_some() {
                    stop_reason = turn.message.stop_reason;
                }
            }
            AgentEvent::Result(event) => {
                if result.is_some() {
                    tracing::debug!("multiple result events; keeping the last one");
                }
                result = Some(event);
            }
            AgentEvent::Other => {}
        }
    }

    if options.strip_json_fences {
        for item in &mut content {
            if let ContentItem::Text { text } = item {
                *text = strip_markdown_code_fences(text);
            }
        }
    }

    let usage = convert_usage(result.as_ref().and_then(|r| r.usage.as_ref()));
    Ok(AggregatedResponse {
        content,
        finish_reason: map_finish_reason(stop_reason.as_deref()),
        usage,
        result,
    })
}
