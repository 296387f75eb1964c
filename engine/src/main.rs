// Decide decision client
// Main entry point for the decide binary

use clap::Parser;
use decide_engine::cli::{Cli, Command};
use decide_engine::config::Config;
use decide_engine::handlers::{handle_ask, handle_chat, handle_doctor, OutputFormat};
use decide_engine::telemetry::{init_telemetry, init_telemetry_with_level};
use sdk::errors::DecideErrorExt;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Command::Doctor => {
            init_telemetry_with_level(cli.log.as_deref().unwrap_or("warn"));
            log_version();
            handle_doctor(cli.config.as_deref(), format).await
        }

        Command::Ask { question, context } => {
            let config = load_config(cli.config.as_deref(), cli.log.as_deref())?;
            tracing::info!("Asking in a new session");
            handle_ask(question, context, &config, format).await
        }

        Command::Chat => {
            let config = load_config(cli.config.as_deref(), cli.log.as_deref())?;
            tracing::info!("Starting interactive session");
            handle_chat(&config).await
        }
    }
}

/// Load configuration and start telemetry at the configured level
///
/// A missing backend URL stops the program here, before any request is built.
fn load_config(path: Option<&Path>, log_override: Option<&str>) -> anyhow::Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load_or_create(),
    };

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            init_telemetry();
            tracing::error!("Configuration error: {}", e);
            anyhow::bail!("{}\nHint: {}", e, e.user_hint());
        }
    };

    // --log wins over config; RUST_LOG wins over both
    init_telemetry_with_level(log_override.unwrap_or(&config.core.log_level));
    log_version();

    Ok(config)
}

fn log_version() {
    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("Decide v{} ({} - {})", version, commit, timestamp);
}
