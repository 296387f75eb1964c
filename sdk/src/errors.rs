//! Error types and handling
//!
//! This module provides the error types shared by Decide components.
//! All errors implement the `DecideErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! Validation failures (empty question, blank rename, unknown session id) are
//! not errors at all: the session store and conversation controller ignore
//! them. The variants here cover configuration and transport failures only.

use thiserror::Error;

/// Trait for Decide error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information.
pub trait DecideErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users and never echoes backend
    /// response bodies or local file paths.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or worked around. Non-recoverable
    /// errors require fixing the configuration before the engine can start.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Configuration**: invalid or missing configuration, fatal at startup
/// - **Remote call**: the inference backend failed or answered garbage
///
/// # Examples
///
/// ```
/// use sdk::errors::{DecideErrorExt, EngineError};
///
/// let error = EngineError::RemoteCall("Backend 502: bad gateway".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal_error = EngineError::BackendUrlMissing;
/// assert!(!fatal_error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend base URL is not configured (set DECIDE_BACKEND_URL or [backend].base_url)")]
    BackendUrlMissing,

    #[error("Invalid backend base URL '{url}': {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    // Remote inference errors
    #[error("Remote call failed: {0}")]
    RemoteCall(String),
}

impl DecideErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            // Configuration errors
            Self::Config(_) => "Check your config.toml file for errors",
            Self::BackendUrlMissing => {
                "Set DECIDE_BACKEND_URL or add base_url under [backend] in config.toml"
            }
            Self::InvalidBackendUrl { .. } => "The backend URL must be an http(s) address",

            // Remote inference errors
            Self::RemoteCall(_) => "The decision backend is unavailable. Try again shortly",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Non-recoverable errors
            Self::Config(_) | Self::BackendUrlMissing | Self::InvalidBackendUrl { .. } => false,

            // A later call may succeed
            Self::RemoteCall(_) => true,
        }
    }
}
