//! Agent output → unified content, usage and finish reason.

use crate::agent::{AgentContentBlock, AgentUsage};
use crate::types::{ContentItem, FinishReason, Usage};

/// Convert the blocks of one assistant turn, keeping block order.
///
/// Tool input stays structured. Unknown block kinds are dropped.
pub fn convert_assistant_blocks(blocks: &[AgentContentBlock]) -> Vec<ContentItem> {
    blocks
        .iter()
        .filter_map(|block| match block {
            AgentContentBlock::Text { text } => Some(ContentItem::Text { text: text.clone() }),
            AgentContentBlock::ToolUse { id, name, input } => Some(ContentItem::ToolCall {
                tool_call_id: id.clone(),
                tool_name: name.clone(),
                input: input.clone(),
            }),
            AgentContentBlock::Unsupported => None,
        })
        .collect()
}

/// Usage from the terminal result's token counts; zeros when absent.
///
/// Cache reads are reported in `cached_input_tokens` and also counted in
/// `total_tokens`.
pub fn convert_usage(usage: Option<&AgentUsage>) -> Usage {
    let Some(usage) = usage else {
        return Usage::default();
    };
    let cache_creation = usage.cache_creation_input_tokens.unwrap_or(0);
    let cache_read = usage.cache_read_input_tokens.unwrap_or(0);
    Usage {
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
        total_tokens: usage
            .input_tokens
            .saturating_add(usage.output_tokens)
            .saturating_add(cache_creation)
            .saturating_add(cache_read),
        cached_input_tokens: usage.cache_read_input_tokens,
    }
}

/// Map the agent's stop reason to a finish reason.
pub fn map_finish_reason(stop_reason: Option<&str>) -> FinishReason {
    match stop_reason {
        Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::Length,
        Some("tool_use") => FinishReason::ToolCalls,
        _ => FinishReason::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preserves_block_order_and_text() {
        let blocks = vec![
            AgentContentBlock::text("  spaced\n"),
            AgentContentBlock::Unsupported,
            AgentContentBlock::tool_use("toolu_1", "Bash", json!({"command": "ls"})),
        ];
        let items = convert_assistant_blocks(&blocks);
        assert_eq!(
            items,
            vec![
                ContentItem::text("  spaced\n"),
                ContentItem::ToolCall {
                    tool_call_id: "toolu_1".into(),
                    tool_name: "Bash".into(),
                    input: json!({"command": "ls"}),
                },
            ]
        );
    }

    #[test]
    fn total_includes_cache_tokens() {
        let usage = convert_usage(Some(&AgentUsage {
            input_tokens: 10,
            output_tokens: 5,
            cache_creation_input_tokens: Some(2),
            cache_read_input_tokens: Some(3),
        }));
        assert_eq!(usage.total_tokens, 20);
        assert_eq!(usage.cached_input_tokens, Some(3));
        assert_eq!(usage.input_tokens, 10);
        assert_eq!(usage.output_tokens, 5);
    }

    #[test]
    fn missing_usage_is_zero() {
        assert_eq!(convert_usage(None), Usage::default());
    }

    #[test]
    fn finish_reason_table() {
        let cases = [
            (Some("end_turn"), FinishReason::Stop),
            (Some("max_tokens"), FinishReason::Length),
            (Some("tool_use"), FinishReason::ToolCalls),
            (Some("stop_sequence"), FinishReason::Stop),
            (Some("banana"), FinishReason::Unknown),
            (None, FinishReason::Unknown),
        ];
        for (input, expected) in cases {
            assert_eq!(map_finish_reason(input), expected, "{input:?}");
        }
    }
}
