//! Error Handling Module
//!
//! - Core error type (`LlmError`, `ErrorCategory`)
//! - Failure classification for the agent runtime boundary (`classify_failure`,
//!   `classify_agent_error`)
//!
//! # Example
//!
//! ```rust,ignore
//! use siumai_provider_agent::agent::AgentError;
//! use siumai_provider_agent::error::{classify_agent_error, ErrorCategory};
//!
//! let err = classify_agent_error(AgentError::api(429, "slow down"));
//! assert_eq!(err.category(), ErrorCategory::RateLimit);
//! assert!(err.is_retryable());
//! ```

mod classify;
pub mod types;

pub use classify::*;
pub use types::*;
