//! Streaming Module
//!
//! - Chat stream event types
//! - Adapter turning an agent event sequence into a `ChatStream`

mod adapter;
mod events;

pub use adapter::*;
pub use events::*;
