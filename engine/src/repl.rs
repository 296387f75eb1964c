//! Interactive session loop
//!
//! Reads lines from stdin. Plain lines are questions for the active session
//! (one is created on demand); lines starting with `/` manage sessions.
//!
//! Parsing and execution are split so the loop can be driven from tests with
//! any `Write` sink.

use anyhow::Result;
use chrono::Utc;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::conversation::{ConversationController, SubmitOutcome};
use crate::session::{format_relative_timestamp, SessionStore, SessionSummary};

/// Starter questions offered while the active session is empty
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Should I change careers?",
    "Should I invest in stocks or real estate?",
    "Should I move to a new city?",
    "Should I start my own business?",
];

const HELP: &str = "\
Commands:
  <question>        Ask in the active session
  /new              Start a new session
  /list             List sessions
  /select <n|id>    Switch to a session
  /rename <title>   Rename the active session
  /delete [n|id]    Delete a session (default: active)
  /search <query>   Find sessions by title or message text
  /show             Show the active session
  /help             Show this help
  /quit             Exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    New,
    List,
    Select(String),
    Rename(String),
    Delete(Option<String>),
    Search(String),
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse one input line
pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Ask(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "new" => ReplCommand::New,
        "list" | "ls" => ReplCommand::List,
        "select" | "open" if !arg.is_empty() => ReplCommand::Select(arg.to_string()),
        "rename" => ReplCommand::Rename(arg.to_string()),
        "delete" | "rm" => ReplCommand::Delete((!arg.is_empty()).then(|| arg.to_string())),
        "search" => ReplCommand::Search(arg.to_string()),
        "show" => ReplCommand::Show,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    }
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive front end over a conversation controller
pub struct Repl {
    controller: ConversationController,
}

impl Repl {
    pub fn new(controller: ConversationController) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    /// Read commands from stdin until `/quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        let mut out = std::io::stdout();
        writeln!(out, "Decide: ask a decision question, or /help for commands.")?;
        self.write_suggestions(&mut out)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            if self.execute(parse_line(&line), &mut out).await? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Execute one command, writing user-facing output to `out`
    pub async fn execute<W: Write>(&mut self, command: ReplCommand, out: &mut W) -> Result<Flow> {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => return Ok(Flow::Quit),
            ReplCommand::Help => writeln!(out, "{}", HELP)?,
            ReplCommand::Unknown(line) => {
                writeln!(out, "Unknown command: {} (try /help)", line)?;
            }
            ReplCommand::Ask(question) => self.ask(&question, out).await?,
            ReplCommand::New => {
                self.controller.store().lock().await.create();
                writeln!(out, "Started a new session.")?;
                self.write_suggestions(out)?;
            }
            ReplCommand::List => {
                let store = self.controller.store().lock().await;
                if store.is_empty() {
                    writeln!(out, "No sessions yet. Ask a question to start one.")?;
                } else {
                    write_summaries(out, &store.summarize(store.sessions()))?;
                }
            }
            ReplCommand::Search(query) => {
                let store = self.controller.store().lock().await;
                let hits = store.summarize(store.search(&query));
                if hits.is_empty() {
                    writeln!(out, "No sessions found matching \"{}\"", query)?;
                } else {
                    write_summaries(out, &hits)?;
                }
            }
            ReplCommand::Select(reference) => {
                let mut store = self.controller.store().lock().await;
                match resolve_reference(&store, &reference) {
                    Some(id) => {
                        store.select(&id);
                        let title = store.active().map(|s| s.title.as_str()).unwrap_or("");
                        writeln!(out, "Switched to \"{}\".", title)?;
                    }
                    None => writeln!(out, "No session matches \"{}\".", reference)?,
                }
            }
            ReplCommand::Rename(title) => {
                let mut store = self.controller.store().lock().await;
                let Some(id) = store.active_id().map(str::to_string) else {
                    writeln!(out, "No active session.")?;
                    return Ok(Flow::Continue);
                };
                if store.rename(&id, &title) {
                    writeln!(out, "Renamed to \"{}\".", title.trim())?;
                } else {
                    writeln!(out, "Title unchanged.")?;
                }
            }
            ReplCommand::Delete(reference) => {
                let mut store = self.controller.store().lock().await;
                let target = match reference {
                    Some(r) => resolve_reference(&store, &r),
                    None => store.active_id().map(str::to_string),
                };
                let deleted = target.map(|id| store.delete(&id)).unwrap_or(false);
                if !deleted {
                    writeln!(out, "Nothing to delete.")?;
                    return Ok(Flow::Continue);
                }

                writeln!(out, "Deleted session.")?;
                match store.active() {
                    Some(active) => writeln!(out, "Active: \"{}\".", active.title)?,
                    None => writeln!(out, "No sessions left.")?,
                }
            }
            ReplCommand::Show => {
                let store = self.controller.store().lock().await;
                match store.active() {
                    Some(session) => {
                        writeln!(
                            out,
                            "{} ({} messages)",
                            session.title,
                            session.messages.len()
                        )?;
                        for message in &session.messages {
                            writeln!(out, "[{}] {}", message.kind.as_str(), message.content)?;
                        }
                    }
                    None => writeln!(out, "No active session.")?,
                }
            }
        }

        Ok(Flow::Continue)
    }

    async fn ask<W: Write>(&mut self, question: &str, out: &mut W) -> Result<()> {
        let session_id = {
            let mut store = self.controller.store().lock().await;
            match store.active_id() {
                Some(id) => id.to_string(),
                None => store.create().id.clone(),
            }
        };

        writeln!(out, "Thinking...")?;
        out.flush()?;

        match self.controller.submit(&session_id, question, None).await {
            SubmitOutcome::Answered { response } | SubmitOutcome::Failed { response } => {
                writeln!(out)?;
                writeln!(out, "{}", response.content)?;
                writeln!(out)?;
            }
            SubmitOutcome::Busy => {
                writeln!(out, "Still waiting on the previous answer in this session.")?;
            }
            SubmitOutcome::Discarded => {
                writeln!(out, "The session was deleted before the answer arrived.")?;
            }
            SubmitOutcome::Ignored => {}
        }

        Ok(())
    }

    fn write_suggestions<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Try one of:")?;
        for question in SUGGESTED_QUESTIONS {
            writeln!(out, "  - {}", question)?;
        }
        Ok(())
    }
}

/// Resolve a 1-based listing index or a session id (or unique id prefix)
fn resolve_reference(store: &SessionStore, reference: &str) -> Option<String> {
    if let Ok(index) = reference.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| store.sessions().get(i))
            .map(|s| s.id.clone());
    }

    if let Some(session) = store.get(reference) {
        return Some(session.id.clone());
    }

    let mut matches = store
        .sessions()
        .iter()
        .filter(|s| s.id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.id.clone()),
        _ => None,
    }
}

fn write_summaries<W: Write>(out: &mut W, summaries: &[SessionSummary]) -> Result<()> {
    let now = Utc::now();
    for (i, summary) in summaries.iter().enumerate() {
        writeln!(
            out,
            "{} {}. {}  ({} messages, {})",
            if summary.active { "*" } else { " " },
            i + 1,
            summary.title,
            summary.message_count,
            format_relative_timestamp(summary.timestamp, now)
        )?;
    }
    Ok(())
}
