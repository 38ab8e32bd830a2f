//! Unified request/response types.

pub mod chat;
pub mod common;
pub mod tools;

pub use chat::*;
pub use common::*;
pub use tools::*;
