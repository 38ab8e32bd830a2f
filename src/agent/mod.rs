//! Agent runtime interface
//!
//! The agent runtime runs a conversational agent and reports its progress as
//! a sequence of typed events. This module holds the event shapes, the
//! `AgentRuntime` seam, and the subprocess-backed runtime that talks to an
//! agent CLI over JSON lines.

pub mod binary;
mod events;
mod process;
mod runtime;

pub use events::*;
pub use process::*;
pub use runtime::*;
