//! Core data models used throughout the Sentinel client.
//!
//! These types represent the chat messages held in a session, the uploaded
//! document sources tracked by the backend, and the wire shapes exchanged
//! with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat message.
///
/// Messages are constructed client-side (user messages on send, assistant
/// messages on response or transport failure), are immutable once created,
/// and live only in memory for the duration of the session.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An uploaded document descriptor as reported by the backend.
///
/// The client never constructs one of these itself — the authoritative list
/// is always re-fetched after any mutation. Identity is the `path` field,
/// which is unique within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub path: String,
    pub size: u64,
}

/// Response body of `POST /chat`.
///
/// `success == false` carries an application-level failure (e.g. a rejected
/// API key) in `response`; it is surfaced as an error, not as a message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
}

/// Response body of `GET /sources`.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceList {
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let m = Message::user("hello");
        assert_eq!(m.role, Role::User);
        assert_eq!(m.content, "hello");
        assert!(!m.id.is_empty());

        let a = Message::assistant("hi");
        assert_eq!(a.role, Role::Assistant);
        assert_ne!(m.id, a.id);
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_source_identity_is_structural() {
        let a = Source {
            name: "lore.pdf".into(),
            path: "data/lore.pdf".into(),
            size: 1024,
        };
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_chat_reply_deserializes() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"success": false, "response": "bad key"}"#).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.response, "bad key");
    }
}
