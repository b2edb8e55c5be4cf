use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single chat message. Immutable once appended to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Append a message and advance `updated_at`.
    ///
    /// `updated_at` never decreases: a message carrying an older timestamp
    /// (clock skew) leaves it where it was.
    pub fn append(&mut self, message: Message) {
        if message.timestamp > self.updated_at {
            self.updated_at = message.timestamp;
        }
        self.messages.push(message);
    }
}

/// The client-held record of whether a user is logged in and as whom.
///
/// `token` is `Some` iff a login/register succeeded and has not been
/// cleared; `user` is only meaningful while `token` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl Session {
    /// Purely "token is present" — no local validity or expiry check.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // -- Mutations: the only sanctioned transitions --

    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn clear_auth(&mut self) {
        self.user = None;
        self.token = None;
    }
}
