//! Command handlers for CLI operations
//!
//! This module implements the handlers for the CLI commands:
//! - ask: one question in a fresh session
//! - chat: interactive session loop (see [`crate::repl`])
//! - doctor: validate configuration and report the backend in use

use anyhow::{bail, Context, Result};
use sdk::errors::DecideErrorExt;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, BACKEND_URL_ENV};
use crate::conversation::{ConversationController, SubmitOutcome};
use crate::inference::HttpInferenceClient;
use crate::repl::Repl;
use crate::session::SessionStore;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Wire up the store, the HTTP client and the controller from configuration
pub fn build_controller(config: &Config) -> Result<ConversationController> {
    let client =
        HttpInferenceClient::new(&config.backend).context("Failed to create backend client")?;
    let store =
        SessionStore::with_placeholder(config.sessions.placeholder_title.clone()).into_shared();

    Ok(ConversationController::new(store, Arc::new(client)))
}

/// Result of a one-shot question
#[derive(Debug, Clone, Serialize)]
pub struct AskReport {
    pub session_id: String,
    pub title: String,
    pub question: String,
    pub response: String,
    /// "answered" or "failed"
    pub status: String,
}

/// Create a session, submit `question` to it and collect the result
pub async fn ask_once(
    controller: &ConversationController,
    question: &str,
    context: Option<&str>,
) -> Result<AskReport> {
    if question.trim().is_empty() {
        bail!("Question must not be empty");
    }

    let session_id = controller.store().lock().await.create().id.clone();
    let outcome = controller.submit(&session_id, question, context).await;

    let status = match &outcome {
        SubmitOutcome::Answered { .. } => "answered",
        SubmitOutcome::Failed { .. } => "failed",
        other => bail!("Question was not submitted: {:?}", other),
    };
    let response = outcome
        .response()
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let store = controller.store().lock().await;
    let title = store
        .get(&session_id)
        .map(|s| s.title.clone())
        .unwrap_or_default();

    Ok(AskReport {
        session_id,
        title,
        question: question.to_string(),
        response,
        status: status.to_string(),
    })
}

/// Ask a single question
pub async fn handle_ask(
    question: String,
    context: Option<String>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let controller = build_controller(config)?;
    let report = ask_once(&controller, &question, context.as_deref()).await?;

    match format {
        OutputFormat::Text => {
            println!("{}", report.title);
            println!();
            println!("{}", report.response);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Run the interactive session loop on stdin/stdout
pub async fn handle_chat(config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    let mut repl = Repl::new(controller);
    repl.run().await
}

/// Validate configuration and report the backend in use
///
/// Unlike the other commands this never writes a default config file and
/// reports configuration problems instead of failing on them.
pub async fn handle_doctor(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let mut issues = Vec::new();
    let mut checks: Vec<(&str, String)> = Vec::new();

    // Check 1: Config file
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path().unwrap_or_else(|_| PathBuf::from("config.toml")),
    };
    let exists = path.exists();
    checks.push((
        "Config file",
        if exists {
            path.display().to_string()
        } else {
            format!("{} (not found, using defaults)", path.display())
        },
    ));

    // Check 2: Environment override
    checks.push((
        "DECIDE_BACKEND_URL",
        if std::env::var(BACKEND_URL_ENV).is_ok() {
            "Set".to_string()
        } else {
            "Not set".to_string()
        },
    ));

    // Check 3: Configuration validation
    let loaded = if exists {
        Config::load_from_path(&path)
    } else {
        Config::from_toml_str("", std::env::var(BACKEND_URL_ENV).ok())
    };

    match loaded {
        Ok(config) => {
            checks.push(("Configuration", "Valid".to_string()));
            checks.push((
                "Backend URL",
                config.backend.base_url().unwrap_or_default().to_string(),
            ));
            checks.push((
                "Backend URL source",
                config
                    .backend
                    .source
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            ));
            checks.push((
                "Request timeout",
                config
                    .backend
                    .timeout_secs
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "None".to_string()),
            ));
            checks.push(("Log level", config.core.log_level.clone()));
        }
        Err(e) => {
            checks.push(("Configuration", "Invalid".to_string()));
            issues.push(format!("{} ({})", e, e.user_hint()));
        }
    }

    // Output results
    match format {
        OutputFormat::Text => {
            println!("Decide Diagnostics");
            println!("==================");
            println!();

            println!("Checks:");
            for (check, status) in &checks {
                println!("  {:<22} {}", format!("{}:", check), status);
            }

            println!();

            if issues.is_empty() {
                println!("✓ All checks passed!");
            } else {
                println!("⚠ Issues found:");
                println!();
                for (i, issue) in issues.iter().enumerate() {
                    println!("  {}. {}", i + 1, issue);
                }
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "checks": checks.iter().map(|(name, status)| {
                    json!({
                        "name": name,
                        "status": status
                    })
                }).collect::<Vec<_>>(),
                "issues": issues,
                "healthy": issues.is_empty()
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
