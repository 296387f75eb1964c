//! Conversation Controller
//!
//! Runs one question/answer exchange against a session:
//!
//! 1. Title the session from the question if it still has the placeholder
//! 2. Mark the session pending
//! 3. Send the session transcript plus the new question to the backend
//! 4. Append the question and the answer (or a fallback) to the session
//!
//! Backend failures never reach the caller as errors. They become a visible
//! response message in the session and an `error` log line.
//!
//! Submits are serialized per session: while one is in flight, further
//! submits to the same session are refused with [`SubmitOutcome::Busy`].
//! The store lock is never held across the backend call.

use sdk::types::{ChatMessage, Message, SessionPatch};
use std::sync::Arc;

use crate::inference::InferenceClient;
use crate::session::{derive_title, SharedSessionStore};

pub mod pending;

pub use pending::{PendingGuard, PendingSet};

/// Response content when the backend answers with an empty string
pub const EMPTY_ANSWER_FALLBACK: &str = "⚠️ Sorry, I couldn't find an answer.";

/// Response content when the backend call fails
pub const ERROR_FALLBACK: &str = "⚠️ There was an error processing your request.";

/// What a call to [`ConversationController::submit`] did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank question or unknown session; nothing changed
    Ignored,

    /// A submit to this session is already in flight; nothing changed
    Busy,

    /// Backend answered; the question and `response` were appended
    Answered { response: Message },

    /// Backend failed; the question and an error `response` were appended
    Failed { response: Message },

    /// Session was deleted while the backend call was in flight
    Discarded,
}

impl SubmitOutcome {
    /// Response message appended by this submit, if any
    pub fn response(&self) -> Option<&Message> {
        match self {
            Self::Answered { response } | Self::Failed { response } => Some(response),
            _ => None,
        }
    }
}

/// Orchestrates question/answer exchanges for the sessions in a store
pub struct ConversationController {
    store: SharedSessionStore,
    client: Arc<dyn InferenceClient>,
    pending: PendingSet,
}

impl ConversationController {
    pub fn new(store: SharedSessionStore, client: Arc<dyn InferenceClient>) -> Self {
        Self {
            store,
            client,
            pending: PendingSet::new(),
        }
    }

    /// Store this controller writes to
    pub fn store(&self) -> &SharedSessionStore {
        &self.store
    }

    /// Whether a submit to `session_id` is waiting on the backend
    pub fn is_pending(&self, session_id: &str) -> bool {
        self.pending.contains(session_id)
    }

    /// Whether any submit is waiting on the backend
    pub fn any_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Ask `question` in `session_id`
    ///
    /// `context` is stored on the question message when non-blank; it is not
    /// sent to the backend.
    pub async fn submit(
        &self,
        session_id: &str,
        question: &str,
        context: Option<&str>,
    ) -> SubmitOutcome {
        if question.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        let (_guard, transcript) = {
            let mut store = self.store.lock().await;
            let Some(session) = store.get(session_id) else {
                tracing::debug!("Ignoring submit to unknown session {}", session_id);
                return SubmitOutcome::Ignored;
            };

            let Some(guard) = self.pending.try_acquire(session_id) else {
                tracing::warn!("Session {} already has a question in flight", session_id);
                return SubmitOutcome::Busy;
            };

            let needs_title = session.title == store.placeholder_title();
            let mut transcript = session.transcript();
            transcript.push(ChatMessage::user(question));

            if needs_title {
                let title = derive_title(question);
                if store.rename(session_id, &title) {
                    tracing::debug!("Titled session {} as '{}'", session_id, title);
                }
            }

            (guard, transcript)
        };

        let result = self.client.ask(&transcript).await;

        let question_message = Message::question(question, context.map(str::to_string));
        let (response, failed) = match result {
            Ok(answer) if answer.trim().is_empty() => {
                (Message::response(EMPTY_ANSWER_FALLBACK), false)
            }
            Ok(answer) => (Message::response(answer), false),
            Err(err) => {
                tracing::error!(
                    "Error calling backend via {} for session {} (status {:?}): {}",
                    self.client.name(),
                    session_id,
                    err.status(),
                    err
                );
                (Message::response(ERROR_FALLBACK), true)
            }
        };

        let mut store = self.store.lock().await;
        let Some(session) = store.get(session_id) else {
            tracing::warn!(
                "Session {} was deleted before its answer arrived; dropping it",
                session_id
            );
            return SubmitOutcome::Discarded;
        };

        let mut messages = session.messages.clone();
        messages.push(question_message);
        messages.push(response.clone());
        store.update(session_id, SessionPatch::messages(messages));

        if failed {
            SubmitOutcome::Failed { response }
        } else {
            SubmitOutcome::Answered { response }
        }
    }
}
