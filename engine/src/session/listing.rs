//! Session listing helpers
//!
//! Summaries and relative timestamps used by the front end when it shows the
//! session list.

use chrono::{DateTime, Utc};
use sdk::types::Session;
use serde::Serialize;

/// One row of the session list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub timestamp: DateTime<Utc>,
    pub active: bool,
}

impl SessionSummary {
    pub fn new(session: &Session, active_id: Option<&str>) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            message_count: session.messages.len(),
            timestamp: session.timestamp,
            active: active_id == Some(session.id.as_str()),
        }
    }
}

/// Render `timestamp` relative to `now`
///
/// "Just now" under an hour, "Nh ago" under a day, "Yesterday" under two
/// days, otherwise the calendar date.
pub fn format_relative_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - timestamp).num_hours();

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if hours < 48 {
        "Yesterday".to_string()
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}
