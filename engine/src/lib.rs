//! Decide Engine Library
//!
//! Client-side core of the Decide decision assistant: sessions of
//! question/response messages, the controller that runs one exchange with
//! the remote inference backend, and the CLI front end built on them.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Remote inference client
pub mod inference;

/// In-memory session store
pub mod session;

/// Question/answer orchestration
pub mod conversation;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;

/// Interactive session loop
pub mod repl;
