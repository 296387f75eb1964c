//! Configuration management
//!
//! This module handles loading, validation, and management of the Decide configuration.
//! Configuration is stored in TOML format at ~/.decide/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: log level
//! - **backend**: inference backend base URL and optional request timeout
//! - **sessions**: placeholder title for fresh sessions
//!
//! # Backend URL Resolution
//!
//! The backend base URL is the one required value. It is resolved in order:
//!
//! 1. `DECIDE_BACKEND_URL` environment variable at runtime
//! 2. `[backend] base_url` in config.toml
//! 3. `DECIDE_BACKEND_URL` captured at build time by `build.rs`
//!
//! If none is present, loading fails with [`EngineError::BackendUrlMissing`].
//! The engine never starts with an unset address.
//!
//! # Examples
//!
//! ```no_run
//! use decide_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Backend: {}", config.backend.base_url()?);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use sdk::types::PLACEHOLDER_TITLE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the backend base URL
pub const BACKEND_URL_ENV: &str = "DECIDE_BACKEND_URL";

/// Log levels accepted by `core.log_level` and `--log`
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Backend URL baked in at build time, if any
const BUILD_BACKEND_URL: Option<&str> = option_env!("DECIDE_BUILD_BACKEND_URL");

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Inference backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Session defaults
    #[serde(default)]
    pub sessions: SessionsConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Inference backend configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the inference service, without the `/ask` path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds; unset leaves the transport default (none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Where the resolved base URL came from
    #[serde(skip)]
    pub source: Option<UrlSource>,
}

/// Origin of the resolved backend base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    /// `DECIDE_BACKEND_URL` at runtime
    Environment,
    /// `[backend] base_url` in config.toml
    ConfigFile,
    /// `DECIDE_BACKEND_URL` captured by the build script
    BuildTime,
}

impl UrlSource {
    pub fn as_str(&self) -> &str {
        match self {
            UrlSource::Environment => "environment (DECIDE_BACKEND_URL)",
            UrlSource::ConfigFile => "config file ([backend] base_url)",
            UrlSource::BuildTime => "build-time default",
        }
    }
}

impl BackendConfig {
    /// Build a backend config pointing at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// The validated base URL
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BackendUrlMissing`] when no URL is set.
    pub fn base_url(&self) -> Result<&str, EngineError> {
        self.base_url
            .as_deref()
            .ok_or(EngineError::BackendUrlMissing)
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Resolve and validate the base URL in place
    ///
    /// `env_url` is the runtime environment override, passed in so callers
    /// and tests control it explicitly.
    pub fn resolve(&mut self, env_url: Option<String>) -> Result<(), EngineError> {
        let file_url = self.base_url.take();
        let (candidate, source) = env_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| (url, UrlSource::Environment))
            .or_else(|| {
                file_url
                    .filter(|url| !url.trim().is_empty())
                    .map(|url| (url, UrlSource::ConfigFile))
            })
            .or_else(|| BUILD_BACKEND_URL.map(|url| (url.to_string(), UrlSource::BuildTime)))
            .ok_or(EngineError::BackendUrlMissing)?;

        self.base_url = Some(normalize_base_url(&candidate)?);
        self.source = Some(source);

        if self.timeout_secs == Some(0) {
            return Err(EngineError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Title given to new sessions until their first question
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            placeholder_title: default_placeholder_title(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_placeholder_title() -> String {
    PLACEHOLDER_TITLE.to_string()
}

impl Config {
    /// Load configuration from the default location (~/.decide/config.toml)
    ///
    /// If the configuration file doesn't exist, a default one is written.
    /// The default file carries no backend URL, so loading still fails unless
    /// `DECIDE_BACKEND_URL` is set or a URL was baked in at build time.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails (no backend URL, bad log level)
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents, std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Parse and validate configuration from TOML text
    ///
    /// `env_url` overrides the file's backend URL when set.
    pub fn from_toml_str(contents: &str, env_url: Option<String>) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process(env_url)?;

        Ok(config)
    }

    /// Create default configuration and save to path
    ///
    /// The file is written before validation so the user has something to
    /// edit even when validation then fails for lack of a backend URL.
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default_config();

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Wrote default configuration to {}", path.display());

        config.validate_and_process(std::env::var(BACKEND_URL_ENV).ok())?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.decide/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".decide").join("config.toml"))
    }

    /// Create a default configuration
    fn default_config() -> Self {
        Self {
            core: CoreConfig::default(),
            backend: BackendConfig::default(),
            sessions: SessionsConfig::default(),
        }
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates the log level
    /// - Resolves the backend base URL (env > file > build-time)
    /// - Rejects blank placeholder titles
    fn validate_and_process(&mut self, env_url: Option<String>) -> Result<(), EngineError> {
        if !LOG_LEVELS.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.sessions.placeholder_title.trim().is_empty() {
            return Err(EngineError::Config(
                "placeholder_title must not be empty".to_string(),
            ));
        }

        self.backend.resolve(env_url)?;

        Ok(())
    }
}

/// Check that `url` is an absolute http(s) URL and strip trailing slashes
pub(crate) fn normalize_base_url(url: &str) -> Result<String, EngineError> {
    let trimmed = url.trim();
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| EngineError::InvalidBackendUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EngineError::InvalidBackendUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
