//! Conversation-related types.

use serde::{Deserialize, Serialize};

/// The first message of every transcript.
pub const GREETING: &str = "Hallo! Ich bin Ihr KI-Berater von Hamdalla Dev.";

/// The speaker of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The visitor typing into the widget.
    User,
    /// The consultant.
    Assistant,
}

/// A finalized message in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote this message.
    pub role: Role,
    /// The display text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a message written by the visitor.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a message written by the consultant.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize() {
        let msg = ChatMessage::user("Was kostet eine Webseite?");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "role": "user", "content": "Was kostet eine Webseite?" })
        );
        let msg: ChatMessage = serde_json::from_value(
            json!({ "role": "assistant", "content": "Guten Tag!" }),
        )
        .unwrap();
        assert_eq!(msg, ChatMessage::assistant("Guten Tag!"));
    }
}
