//! Per-session pending state
//!
//! A session is pending while a question submitted to it waits for the
//! backend. The flag is held by a [`PendingGuard`] and cleared when the guard
//! drops, so every exit path of a submit clears it: success, failure, early
//! return, or the submit future being dropped mid-flight.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Set of session ids with a submit in flight
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `session_id` pending
    ///
    /// Returns `None` if it already is.
    pub fn try_acquire(&self, session_id: &str) -> Option<PendingGuard> {
        if !self.lock().insert(session_id.to_string()) {
            return None;
        }
        Some(PendingGuard {
            set: self.clone(),
            session_id: session_id.to_string(),
        })
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.lock().contains(session_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The set stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Holds one session in the pending state until dropped
#[derive(Debug)]
pub struct PendingGuard {
    set: PendingSet,
    session_id: String,
}

impl PendingGuard {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.session_id);
    }
}
