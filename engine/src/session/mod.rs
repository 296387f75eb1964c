//! Session Store
//!
//! In-memory collection of decision sessions and the pointer to the active
//! one. The store is the only writer of session state: the conversation
//! controller appends messages through [`SessionStore::update`] and sets
//! titles through [`SessionStore::rename`].
//!
//! Sessions are kept in listing order, newest first. Nothing is persisted;
//! the store lives as long as the process.
//!
//! Invalid requests (unknown ids, blank titles) are ignored rather than
//! reported. Each mutating operation returns whether it changed anything.

use sdk::types::{Session, SessionPatch, PLACEHOLDER_TITLE};
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod listing;
pub mod title;

pub use listing::{format_relative_timestamp, SessionSummary};
pub use title::{derive_title, ELLIPSIS, MAX_TITLE_CHARS};

/// Store handle shared between the front end and the conversation controller
pub type SharedSessionStore = Arc<Mutex<SessionStore>>;

/// Owner of all sessions
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Sessions, newest first
    sessions: Vec<Session>,

    /// Id of the active session, if any
    active: Option<String>,

    /// Title given to new sessions
    placeholder_title: String,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty store using the default placeholder title
    pub fn new() -> Self {
        Self::with_placeholder(PLACEHOLDER_TITLE)
    }

    /// Create an empty store with a custom placeholder title
    pub fn with_placeholder(placeholder_title: impl Into<String>) -> Self {
        Self {
            sessions: Vec::new(),
            active: None,
            placeholder_title: placeholder_title.into(),
        }
    }

    /// Wrap the store for sharing with the conversation controller
    pub fn into_shared(self) -> SharedSessionStore {
        Arc::new(Mutex::new(self))
    }

    /// Title that marks a session as not yet named
    pub fn placeholder_title(&self) -> &str {
        &self.placeholder_title
    }

    /// Create a new empty session and make it active
    pub fn create(&mut self) -> &Session {
        let session = Session::new(self.placeholder_title.clone());
        tracing::debug!("Created session {}", session.id);

        self.active = Some(session.id.clone());
        self.sessions.insert(0, session);
        &self.sessions[0]
    }

    /// Make `id` the active session
    ///
    /// Unknown ids are ignored and leave the active session unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            tracing::debug!("Ignoring select of unknown session {}", id);
            return false;
        }
        self.active = Some(id.to_string());
        true
    }

    /// Replace the title of `id`
    ///
    /// Empty or whitespace-only titles are ignored. The stored title is trimmed.
    pub fn rename(&mut self, id: &str, new_title: &str) -> bool {
        let trimmed = new_title.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.update(id, SessionPatch::title(trimmed))
    }

    /// Remove the session `id`
    ///
    /// If it was active, the first remaining session becomes active, or no
    /// session at all when the store is now empty.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.sessions.remove(index);
        tracing::debug!("Deleted session {}", id);

        if self.active.as_deref() == Some(id) {
            self.active = self.sessions.first().map(|s| s.id.clone());
        }
        true
    }

    /// Merge `patch` into the session `id`
    ///
    /// This is the only path through which messages are appended.
    pub fn update(&mut self, id: &str, patch: SessionPatch) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                patch.apply_to(session);
                true
            }
            None => {
                tracing::debug!("Ignoring update of unknown session {}", id);
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// All sessions in listing order (newest first)
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions whose title or any message contains `query`, ignoring case
    ///
    /// A blank query matches every session.
    pub fn search(&self, query: &str) -> Vec<&Session> {
        let needle = query.trim().to_lowercase();
        self.sessions
            .iter()
            .filter(|s| needle.is_empty() || s.matches(&needle))
            .collect()
    }

    /// Listing rows for `sessions`, flagging the active one
    pub fn summarize<'a>(
        &self,
        sessions: impl IntoIterator<Item = &'a Session>,
    ) -> Vec<SessionSummary> {
        sessions
            .into_iter()
            .map(|s| SessionSummary::new(s, self.active_id()))
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }
}
