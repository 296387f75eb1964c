//! Integration tests for the interactive loop and the one-shot ask handler
//!
//! The loop writes into a `Vec<u8>` and talks to a scripted backend.

use async_trait::async_trait;
use std::sync::Arc;

use decide_engine::conversation::{ConversationController, ERROR_FALLBACK};
use decide_engine::handlers::ask_once;
use decide_engine::inference::{InferenceClient, RemoteCallError, Result as InferenceResult};
use decide_engine::repl::{parse_line, Flow, Repl, SUGGESTED_QUESTIONS};
use decide_engine::session::SessionStore;
use sdk::types::{ChatMessage, PLACEHOLDER_TITLE};

/// Backend that echoes the last question back, or always fails
struct EchoClient {
    fail: bool,
}

#[async_trait]
impl InferenceClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    async fn ask(&self, transcript: &[ChatMessage]) -> InferenceResult<String> {
        if self.fail {
            return Err(RemoteCallError::Network("unreachable".to_string()));
        }
        let last = transcript.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(format!("echo: {} ({} messages)", last, transcript.len()))
    }
}

fn controller(fail: bool) -> ConversationController {
    ConversationController::new(
        SessionStore::new().into_shared(),
        Arc::new(EchoClient { fail }),
    )
}

async fn run(repl: &mut Repl, line: &str) -> (Flow, String) {
    let mut out = Vec::new();
    let flow = repl.execute(parse_line(line), &mut out).await.unwrap();
    (flow, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_question_without_session_starts_one() {
    let mut repl = Repl::new(controller(false));

    let (flow, output) = run(&mut repl, "Should I adopt a dog?").await;
    assert_eq!(flow, Flow::Continue);
    assert!(output.contains("Thinking..."));
    assert!(output.contains("echo: Should I adopt a dog? (1 messages)"));

    let store = repl.controller().store().lock().await;
    assert_eq!(store.len(), 1);
    assert_eq!(store.active().unwrap().title, "Adopt a dog");
    assert_eq!(store.active().unwrap().messages.len(), 2);
}

#[tokio::test]
async fn test_follow_up_goes_to_active_session() {
    let mut repl = Repl::new(controller(false));

    run(&mut repl, "Should I adopt a dog?").await;
    let (_, output) = run(&mut repl, "What breed?").await;
    assert!(output.contains("(3 messages)"));

    let store = repl.controller().store().lock().await;
    assert_eq!(store.len(), 1);
    assert_eq!(store.active().unwrap().messages.len(), 4);
}

#[tokio::test]
async fn test_backend_failure_is_shown_inline() {
    let mut repl = Repl::new(controller(true));

    let (_, output) = run(&mut repl, "Should I quit?").await;
    assert!(output.contains(ERROR_FALLBACK));
    assert!(!repl.controller().any_pending());
}

#[tokio::test]
async fn test_new_lists_suggestions() {
    let mut repl = Repl::new(controller(false));

    let (_, output) = run(&mut repl, "/new").await;
    assert!(output.contains("Started a new session."));
    for question in SUGGESTED_QUESTIONS {
        assert!(output.contains(question));
    }

    let store = repl.controller().store().lock().await;
    assert_eq!(store.active().unwrap().title, PLACEHOLDER_TITLE);
}

#[tokio::test]
async fn test_list_marks_active_session() {
    let mut repl = Repl::new(controller(false));

    let (_, output) = run(&mut repl, "/list").await;
    assert!(output.contains("No sessions yet"));

    run(&mut repl, "Should I rent?").await;
    run(&mut repl, "/new").await;

    let (_, output) = run(&mut repl, "/list").await;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("* 1. New Decision"));
    assert!(lines[1].starts_with("  2. Rent"));
    assert!(lines[1].contains("2 messages, Just now"));
}

#[tokio::test]
async fn test_select_rename_and_show() {
    let mut repl = Repl::new(controller(false));
    run(&mut repl, "Should I rent?").await;
    run(&mut repl, "/new").await;

    let (_, output) = run(&mut repl, "/select 2").await;
    assert!(output.contains("Switched to \"Rent\"."));

    let (_, output) = run(&mut repl, "/rename   Rent or buy  ").await;
    assert!(output.contains("Renamed to \"Rent or buy\"."));

    let (_, output) = run(&mut repl, "/rename    ").await;
    assert!(output.contains("Title unchanged."));

    let (_, output) = run(&mut repl, "/show").await;
    assert!(output.starts_with("Rent or buy (2 messages)"));
    assert!(output.contains("[question] Should I rent?"));
    assert!(output.contains("[response] echo: Should I rent?"));

    let (_, output) = run(&mut repl, "/select 9").await;
    assert!(output.contains("No session matches"));
}

#[tokio::test]
async fn test_delete_falls_back_to_remaining_session() {
    let mut repl = Repl::new(controller(false));
    run(&mut repl, "Should I rent?").await;
    run(&mut repl, "/new").await;

    let (_, output) = run(&mut repl, "/delete").await;
    assert!(output.contains("Deleted session."));
    assert!(output.contains("Active: \"Rent\"."));

    let (_, output) = run(&mut repl, "/delete 1").await;
    assert!(output.contains("No sessions left."));

    let (_, output) = run(&mut repl, "/delete").await;
    assert!(output.contains("Nothing to delete."));
    assert!(repl.controller().store().lock().await.is_empty());
}

#[tokio::test]
async fn test_search_matches_titles_and_messages() {
    let mut repl = Repl::new(controller(false));
    run(&mut repl, "Should I rent?").await;
    run(&mut repl, "/new").await;
    run(&mut repl, "Can I retire at fifty?").await;

    let (_, output) = run(&mut repl, "/search RETIRE").await;
    assert_eq!(output.lines().count(), 1);
    assert!(output.contains("Retire at fifty"));

    let (_, output) = run(&mut repl, "/search echo").await;
    assert_eq!(output.lines().count(), 2);

    let (_, output) = run(&mut repl, "/search lottery").await;
    assert!(output.contains("No sessions found matching \"lottery\""));
}

#[tokio::test]
async fn test_help_unknown_and_quit() {
    let mut repl = Repl::new(controller(false));

    let (_, output) = run(&mut repl, "/help").await;
    assert!(output.contains("/search <query>"));

    let (_, output) = run(&mut repl, "/frobnicate").await;
    assert!(output.contains("Unknown command: /frobnicate"));

    let (flow, output) = run(&mut repl, "   ").await;
    assert_eq!(flow, Flow::Continue);
    assert!(output.is_empty());

    let (flow, _) = run(&mut repl, "/quit").await;
    assert_eq!(flow, Flow::Quit);
}

#[tokio::test]
async fn test_ask_once_reports_result() {
    let controller = controller(false);

    let report = ask_once(&controller, "Should I learn Rust?", Some("I know Go"))
        .await
        .unwrap();
    assert_eq!(report.title, "Learn Rust");
    assert_eq!(report.status, "answered");
    assert_eq!(report.response, "echo: Should I learn Rust? (1 messages)");

    let store = controller.store().lock().await;
    let question = &store.get(&report.session_id).unwrap().messages[0];
    assert_eq!(question.context.as_deref(), Some("I know Go"));
}

#[tokio::test]
async fn test_ask_once_reports_failure() {
    let controller = controller(true);

    let report = ask_once(&controller, "Should I?", None).await.unwrap();
    assert_eq!(report.status, "failed");
    assert_eq!(report.response, ERROR_FALLBACK);
    assert_eq!(report.title, PLACEHOLDER_TITLE);
}

#[tokio::test]
async fn test_ask_once_rejects_blank_question() {
    let controller = controller(false);
    assert!(ask_once(&controller, "  ", None).await.is_err());
    assert!(controller.store().lock().await.is_empty());
}
