//! CLI interface for Decide
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines the commands and global flags for the decision client.

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::LOG_LEVELS;

/// Decide: ask an AI decision backend and keep the answers in sessions
#[derive(Parser, Debug)]
#[command(name = "decide")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        value_parser = PossibleValuesParser::new(LOG_LEVELS)
    )]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a single question in a fresh session
    Ask {
        /// The decision question
        question: String,

        /// Supplementary context stored with the question
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Start an interactive session
    Chat,

    /// Check configuration and report the backend in use
    Doctor,
}
