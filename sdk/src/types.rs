//! Session, message and transcript types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title every new session starts with until its first question arrives
pub const PLACEHOLDER_TITLE: &str = "New Decision";

/// Kind of a stored message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Question submitted by the user
    Question,

    /// Answer (or fallback text) produced for a question
    Response,
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Question => "question",
            MessageKind::Response => "response",
        }
    }
}

/// Single entry in a session
///
/// Messages are immutable once created; sessions only ever append them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,

    pub kind: MessageKind,

    pub content: String,

    /// Supplementary text supplied alongside a question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Message {
    /// Create a question message with a fresh id
    pub fn question(content: impl Into<String>, context: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: MessageKind::Question,
            content: content.into(),
            context: context.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Create a response message with a fresh id
    pub fn response(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: MessageKind::Response,
            content: content.into(),
            context: None,
        }
    }

    /// Role this message takes when replayed to the inference backend
    pub fn role(&self) -> ChatRole {
        match self.kind {
            MessageKind::Question => ChatRole::User,
            MessageKind::Response => ChatRole::Assistant,
        }
    }

    /// Transcript form of this message
    pub fn to_chat(&self) -> ChatMessage {
        ChatMessage {
            role: self.role(),
            content: self.content.clone(),
        }
    }
}

/// One decision conversation thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,

    pub title: String,

    /// Creation time, used for listings only
    pub timestamp: DateTime<Utc>,

    pub messages: Vec<Message>,
}

impl Session {
    /// Create an empty session titled with the given placeholder
    pub fn new(placeholder_title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: placeholder_title.into(),
            timestamp: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Role-tagged transcript of everything in this session
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(Message::to_chat).collect()
    }

    /// Case-insensitive match against the title or any message content
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .messages
                .iter()
                .any(|m| m.content.to_lowercase().contains(needle))
    }
}

/// Partial update merged into a session by the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub messages: Option<Vec<Message>>,
}

impl SessionPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            messages: None,
        }
    }

    pub fn messages(messages: Vec<Message>) -> Self {
        Self {
            title: None,
            messages: Some(messages),
        }
    }

    /// Apply the set fields to `session`, leaving the rest untouched
    pub fn apply_to(self, session: &mut Session) {
        if let Some(title) = self.title {
            session.title = title;
        }
        if let Some(messages) = self.messages {
            session.messages = messages;
        }
    }
}

/// Role of a transcript entry on the wire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
            ChatRole::System => write!(f, "system"),
        }
    }
}

/// Transcript entry sent to the inference backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}
