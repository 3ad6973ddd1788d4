use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::message::lenient_timestamp;

/// Chat snapshot as returned by the backend. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(deserialize_with = "super::message::id_string")]
    pub id: String,
    #[serde(
        default,
        alias = "project_id",
        deserialize_with = "super::message::opt_id_string"
    )]
    pub project_id: Option<String>,
    /// Display name of the other party (customer or site contact).
    #[serde(default, alias = "counterpart_name", alias = "userName", alias = "user_name")]
    pub counterpart_name: String,
    #[serde(
        default,
        alias = "counterpart_avatar",
        alias = "avatarUrl",
        alias = "avatar_url"
    )]
    pub counterpart_avatar: Option<String>,
    #[serde(default, alias = "last_message")]
    pub last_message: Option<String>,
    #[serde(
        default,
        alias = "last_message_at",
        alias = "lastMessageTime",
        deserialize_with = "lenient_timestamp"
    )]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "unread_count")]
    pub unread_count: u32,
    #[serde(default = "default_active", alias = "is_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Chat {
    /// Minimal snapshot used before metadata arrives.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            counterpart_name: String::new(),
            counterpart_avatar: None,
            last_message: None,
            last_message_at: None,
            unread_count: 0,
            is_active: true,
        }
    }

    /// Title shown in chat headers and listings.
    pub fn display_title(&self) -> &str {
        if self.counterpart_name.trim().is_empty() {
            &self.id
        } else {
            &self.counterpart_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_payload() {
        let chat: Chat = serde_json::from_str(
            r#"{"id":"c1","projectId":"p1","counterpartName":"Anna","unreadCount":2,
                "lastMessage":"hi","lastMessageAt":"2024-05-01T10:00:00Z","isActive":false}"#,
        )
        .expect("chat should decode");

        assert_eq!(chat.id, "c1");
        assert_eq!(chat.project_id.as_deref(), Some("p1"));
        assert_eq!(chat.unread_count, 2);
        assert!(!chat.is_active);
        assert!(chat.last_message_at.is_some());
    }

    #[test]
    fn decodes_snake_case_payload_with_numeric_ids() {
        let chat: Chat = serde_json::from_str(
            r#"{"id":7,"project_id":3,"counterpart_name":"Oleg","unread_count":0,
                "last_message_at":null}"#,
        )
        .expect("chat should decode");

        assert_eq!(chat.id, "7");
        assert_eq!(chat.project_id.as_deref(), Some("3"));
        assert_eq!(chat.last_message_at, None);
        assert!(chat.is_active);
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let chat = Chat::placeholder("c9");

        assert_eq!(chat.display_title(), "c9");
    }
}
