//! Agent event types, as emitted one JSON object per line by the agent CLI.

use serde::{Deserialize, Serialize};

/// Event produced by the agent runtime.
///
/// Only assistant turns and the terminal result matter to the provider;
/// every other event kind (system init, echoed user turns, ...) decodes to
/// `Other` and is skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    Assistant(AssistantTurn),
    Result(ResultEvent),
    #[serde(other)]
    Other,
}

impl AgentEvent {
    /// Decode one line of agent output.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Assistant turn with the given blocks and stop reason.
    pub fn assistant(content: Vec<AgentContentBlock>, stop_reason: Option<&str>) -> Self {
        Self::Assistant(AssistantTurn {
            message: AssistantMessage {
                id: None,
                model: None,
                content,
                stop_reason: stop_reason.map(str::to_string),
            },
            session_id: None,
        })
    }
}

/// One assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantTurn {
    pub message: AssistantMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<AgentContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

/// Content block inside an assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    /// Any other block kind (thinking, server tool results, ...).
    #[serde(other)]
    Unsupported,
}

impl AgentContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// Terminal event of an agent run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResultEvent {
    /// `success`, `error_max_turns`, `error_during_execution`, ...
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<AgentUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Final text the agent reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_turns: Option<u32>,
}

impl ResultEvent {
    pub fn success(usage: Option<AgentUsage>) -> Self {
        Self {
            subtype: "success".to_string(),
            usage,
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.subtype == "success"
    }
}

/// Token counts reported by the agent runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AgentUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_assistant_line() {
        let line = r#"{"type":"assistant","message":{"id":"msg_1","model":"sonnet","content":[{"type":"text","text":"Hi"},{"type":"tool_use","id":"toolu_1","name":"Read","input":{"file_path":"a.rs"}},{"type":"thinking","thinking":"hmm"}],"stop_reason":"tool_use"},"session_id":"s-1"}"#;
        let event = AgentEvent::from_json_line(line).unwrap();
        let AgentEvent::Assistant(turn) = event else {
            panic!("expected assistant turn");
        };
        assert_eq!(turn.session_id.as_deref(), Some("s-1"));
        assert_eq!(turn.message.stop_reason.as_deref(), Some("tool_use"));
        assert_eq!(turn.message.content.len(), 3);
        assert_eq!(turn.message.content[0], AgentContentBlock::text("Hi"));
        assert_eq!(
            turn.message.content[1],
            AgentContentBlock::tool_use("toolu_1", "Read", serde_json::json!({"file_path": "a.rs"}))
        );
        assert_eq!(turn.message.content[2], AgentContentBlock::Unsupported);
    }

    #[test]
    fn decodes_result_line() {
        let line = r#"{"type":"result","subtype":"success","is_error":false,"duration_ms":1200,"num_turns":2,"result":"done","session_id":"s-1","total_cost_usd":0.01,"usage":{"input_tokens":10,"output_tokens":5,"cache_creation_input_tokens":2,"cache_read_input_tokens":3}}"#;
        let AgentEvent::Result(result) = AgentEvent::from_json_line(line).unwrap() else {
            panic!("expected result");
        };
        assert!(result.is_success());
        assert_eq!(result.num_turns, Some(2));
        let usage = result.usage.unwrap();
        assert_eq!(usage.cache_read_input_tokens, Some(3));
    }

    #[test]
    fn other_event_kinds_are_skipped() {
        let line = r#"{"type":"system","subtype":"init","tools":["Read"]}"#;
        assert_eq!(AgentEvent::from_json_line(line).unwrap(), AgentEvent::Other);
    }
}
