//! Decide SDK
//!
//! Shared data model and error types for Decide components.
//! The engine and any front end built on it depend on this crate.

/// Error types and handling
pub mod errors;

/// Session, message and transcript types
pub mod types;

// Re-export commonly used types
pub use errors::{DecideErrorExt, EngineError};
pub use types::{
    ChatMessage, ChatRole, Message, MessageKind, Session, SessionPatch, PLACEHOLDER_TITLE,
};
