use async_trait::async_trait;

use crate::domain::{chat::Chat, message::Message};

use super::contracts::SourceError;

const DEFAULT_HISTORY_LIMIT: usize = 100;
const MAX_HISTORY_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesQuery {
    pub chat_id: String,
    pub limit: usize,
}

impl LoadMessagesQuery {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    fn normalized_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_HISTORY_LIMIT,
            value if value > MAX_HISTORY_LIMIT => MAX_HISTORY_LIMIT,
            value => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesOutput {
    pub chat: Chat,
    pub messages: Vec<Message>,
}

#[async_trait]
pub trait MessagesSource: Send + Sync {
    async fn chat(&self, chat_id: &str) -> Result<Chat, SourceError>;
    async fn messages(&self, chat_id: &str, limit: usize) -> Result<Vec<Message>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMessagesError {
    Unauthorized,
    ChatNotFound,
    TemporarilyUnavailable,
    Failed(String),
}

impl LoadMessagesError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => SourceError::Unauthorized.user_message(),
            Self::ChatNotFound => "Chat not found.".to_owned(),
            Self::TemporarilyUnavailable => SourceError::Unavailable.user_message(),
            Self::Failed(text) => text.clone(),
        }
    }
}

/// Loads chat metadata and the history shown when a chat is opened.
///
/// Messages are returned in backend order; the chat view folds them through
/// its dedup merge.
pub async fn load_messages(
    source: &dyn MessagesSource,
    query: LoadMessagesQuery,
) -> Result<LoadMessagesOutput, LoadMessagesError> {
    let limit = query.normalized_limit();

    let chat = source
        .chat(&query.chat_id)
        .await
        .map_err(map_source_error)?;
    let messages = source
        .messages(&query.chat_id, limit)
        .await
        .map_err(map_source_error)?;

    Ok(LoadMessagesOutput { chat, messages })
}

fn map_source_error(error: SourceError) -> LoadMessagesError {
    match error {
        SourceError::Unauthorized => LoadMessagesError::Unauthorized,
        SourceError::NotFound(_) => LoadMessagesError::ChatNotFound,
        SourceError::Unavailable => LoadMessagesError::TemporarilyUnavailable,
        other => LoadMessagesError::Failed(other.user_message()),
    }
}
