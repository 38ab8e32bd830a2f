//! Conversions between the unified chat shapes and the agent interface.
//!
//! - `prompt`: messages → flattened prompt + system prompt
//! - `response`: agent blocks/usage/stop reasons → unified shapes
//! - `json`: structured-output post-processing

mod json;
mod prompt;
mod response;

pub use json::*;
pub use prompt::*;
pub use response::*;
