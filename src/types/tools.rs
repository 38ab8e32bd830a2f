//! Tool definition types

use serde::{Deserialize, Serialize};

/// Function tool offered by the caller.
///
/// The agent runtime only runs its own built-in tools, so definitions passed
/// on a request are reported back as `Warning::UnsupportedTool`. Built-in
/// tools are enabled by name through `AgentProviderConfig::allowed_tools`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Tool name
    pub name: String,
    /// Tool description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for the tool input
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl Tool {
    /// Create a new function tool
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            parameters,
        }
    }
}
