//! Common enums and usage types shared by the request and response shapes.

use serde::{Deserialize, Serialize};

/// Warning from the provider
///
/// Warnings indicate non-fatal issues, such as settings the agent runtime
/// cannot honor. The call proceeds despite them.
///
/// # Examples
///
/// ```rust
/// use siumai_provider_agent::types::Warning;
///
/// let warning = Warning::unsupported_setting("temperature", Some("the agent runtime picks its own sampling"));
/// let tool_warning = Warning::unsupported_tool("calculator", None::<String>);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Warning {
    /// An unsupported setting was provided
    UnsupportedSetting {
        setting: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// An unsupported tool was provided
    UnsupportedTool {
        tool_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl Warning {
    /// Create an unsupported setting warning
    pub fn unsupported_setting(
        setting: impl Into<String>,
        details: Option<impl Into<String>>,
    ) -> Self {
        Self::UnsupportedSetting {
            setting: setting.into(),
            details: details.map(|d| d.into()),
        }
    }

    /// Create an unsupported tool warning
    pub fn unsupported_tool(
        tool_name: impl Into<String>,
        details: Option<impl Into<String>>,
    ) -> Self {
        Self::UnsupportedTool {
            tool_name: tool_name.into(),
            details: details.map(|d| d.into()),
        }
    }
}

/// Reason why the agent stopped generating.
///
/// # Examples
///
/// ```rust
/// use siumai_provider_agent::types::FinishReason;
///
/// let finish_reason = FinishReason::Stop;
/// match finish_reason {
///     FinishReason::Stop => println!("Completed"),
///     FinishReason::Length => println!("Reached max tokens"),
///     FinishReason::ToolCalls => println!("Stopped to call tools"),
///     FinishReason::Error => println!("Agent reported an error"),
///     FinishReason::Unknown => println!("No recognized stop reason"),
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    /// Completed naturally or hit a stop sequence (`end_turn`, `stop_sequence`).
    Stop,
    /// Hit the token limit (`max_tokens`).
    Length,
    /// Stopped to invoke tools (`tool_use`).
    ToolCalls,
    /// The agent flagged its result as an error. Only produced while streaming.
    Error,
    /// Absent or unrecognized stop reason.
    Unknown,
}

/// Token usage for one call.
///
/// `total_tokens` is input + output + cache creation + cache read.
/// Cache reads are also reported on their own in `cached_input_tokens`;
/// they are still part of the total.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_input_tokens: Option<u32>,
}

impl Usage {
    /// Usage without any cache accounting.
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
            cached_input_tokens: None,
        }
    }
}

/// Generation settings shared by all requests.
///
/// The agent runtime does not accept any of these; they are reported back
/// as warnings when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommonParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Requested response format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Machine-readable JSON only. Text output is post-processed to drop
    /// markdown code fences.
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<serde_json::Value>,
    },
}

impl ResponseFormat {
    pub fn json() -> Self {
        Self::Json { schema: None }
    }

    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_serializes_kebab_case() {
        let json = serde_json::to_string(&FinishReason::ToolCalls).unwrap();
        assert_eq!(json, "\"tool-calls\"");
    }

    #[test]
    fn usage_default_is_zero() {
        let usage = Usage::default();
        assert_eq!(usage.total_tokens, 0);
        assert_eq!(usage.cached_input_tokens, None);
        assert_eq!(Usage::new(3, 4).total_tokens, 7);
    }

    #[test]
    fn usage_total_saturates() {
        let usage = Usage::new(u32::MAX, 1);
        assert_eq!(usage.total_tokens, u32::MAX);
        assert_eq!(usage.input_tokens, u32::MAX);
    }

    #[test]
    fn warning_is_tagged() {
        let value =
            serde_json::to_value(Warning::unsupported_setting("seed", None::<String>)).unwrap();
        assert_eq!(value["type"], "unsupported-setting");
        assert_eq!(value["setting"], "seed");
        assert!(value.get("details").is_none());
    }
}
