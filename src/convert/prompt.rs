//! Prompt conversion.
//!
//! The agent takes one text prompt plus an optional system prompt, so the
//! role-tagged conversation is flattened into `User:` / `Assistant:` blocks
//! separated by blank lines.

use crate::types::{ChatMessage, ContentPart, MessageRole};

/// Flattened prompt handed to the agent runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPrompt {
    pub prompt: String,
    pub system_prompt: Option<String>,
}

/// Flatten messages and extract the system prompt.
pub fn convert_to_agent_prompt(messages: &[ChatMessage]) -> AgentPrompt {
    AgentPrompt {
        prompt: flatten_messages(messages),
        system_prompt: extract_system_prompt(messages),
    }
}

/// Join user and assistant turns in order, dropping system turns.
pub fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter_map(|message| {
            let prefix = match message.role {
                MessageRole::User => "User:",
                MessageRole::Assistant => "Assistant:",
                MessageRole::System => return None,
                MessageRole::Tool => {
                    tracing::debug!("ignoring tool message in agent prompt");
                    return None;
                }
            };
            Some(format!("{prefix} {}", turn_text(message)))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Text of the first system message. Later system messages are ignored.
pub fn extract_system_prompt(messages: &[ChatMessage]) -> Option<String> {
    let mut system = messages
        .iter()
        .filter(|message| message.role == MessageRole::System);
    let first = system.next()?;
    let ignored = system.count();
    if ignored > 0 {
        tracing::debug!(ignored, "only the first system message is used");
    }
    Some(turn_text(first))
}

/// Text parts of one turn joined with a single space.
fn turn_text(message: &ChatMessage) -> String {
    for part in &message.content {
        match part {
            ContentPart::Text { .. } => {}
            ContentPart::Image { .. }
            | ContentPart::File { .. }
            | ContentPart::ToolCall { .. }
            | ContentPart::ToolResult { .. } => {
                // Not representable in the agent prompt yet.
                tracing::debug!(kind = part.kind(), "ignoring unsupported content part");
            }
        }
    }
    message.text_parts().collect::<Vec<_>>().join(" ")
}
