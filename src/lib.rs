//! siumai-provider-agent
//!
//! Exposes a conversational agent runtime (an agent CLI emitting typed JSON
//! events) through siumai's unified chat interface.
//!
//! The crate is a pure in-process adapter:
//! - `convert` flattens role-tagged messages into the agent's single text
//!   prompt and maps agent events back into unified content, usage and
//!   finish reasons;
//! - `aggregate` drives an event sequence to completion for `chat_request`;
//! - `streaming` turns the same sequence into a `ChatStream`;
//! - `error` classifies every agent failure into a typed `LlmError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use siumai_provider_agent::prelude::*;
//!
//! let model = AgentChatModel::from_config(AgentProviderConfig::from_env());
//! let response = model
//!     .chat(vec![ChatMessage::system("Be terse."), ChatMessage::user("Hi")])
//!     .await?;
//! println!("{}", response.text());
//! ```
#![deny(unsafe_code)]

pub mod agent;
pub mod aggregate;
pub mod config;
pub mod convert;
pub mod defaults;
pub mod error;
pub mod provider;
pub mod streaming;
pub mod types;

pub use error::LlmError;

/// Commonly used items.
pub mod prelude {
    pub use crate::agent::{
        AgentError, AgentEvent, AgentEventStream, AgentQueryOptions, AgentRuntime,
        ProcessAgentRuntime,
    };
    pub use crate::config::AgentProviderConfig;
    pub use crate::error::LlmError;
    pub use crate::provider::{AgentChatModel, ChatCapability};
    pub use crate::streaming::{ChatStream, ChatStreamEvent};
    pub use crate::types::{
        ChatMessage, ChatRequest, ChatResponse, ContentItem, ContentPart, FinishReason,
        ResponseFormat, Usage, Warning,
    };
}
