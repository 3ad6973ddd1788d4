use async_trait::async_trait;

use crate::domain::chat::Chat;

use super::contracts::SourceError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListChatsQuery {
    /// Restricts the listing to one project's chats.
    pub project_id: Option<String>,
}

#[async_trait]
pub trait ChatsSource: Send + Sync {
    async fn list_chats(&self, project_id: Option<&str>) -> Result<Vec<Chat>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChatsError {
    Unauthorized,
    TemporarilyUnavailable,
    Failed(String),
}

impl ListChatsError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => SourceError::Unauthorized.user_message(),
            Self::TemporarilyUnavailable => SourceError::Unavailable.user_message(),
            Self::Failed(text) => text.clone(),
        }
    }
}

/// Lists chats, newest activity first. Chats without activity keep their
/// backend order at the end.
pub async fn list_chats(
    source: &dyn ChatsSource,
    query: ListChatsQuery,
) -> Result<Vec<Chat>, ListChatsError> {
    let project_id = query
        .project_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let mut chats = source
        .list_chats(project_id)
        .await
        .map_err(map_source_error)?;

    chats.sort_by(|left, right| right.last_message_at.cmp(&left.last_message_at));
    Ok(chats)
}

fn map_source_error(error: SourceError) -> ListChatsError {
    match error {
        SourceError::Unauthorized => ListChatsError::Unauthorized,
        SourceError::Unavailable => ListChatsError::TemporarilyUnavailable,
        other => ListChatsError::Failed(other.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};

    use super::*;

    struct StubSource {
        result: Result<Vec<Chat>, SourceError>,
        captured_project: Mutex<Option<Option<String>>>,
    }

    impl StubSource {
        fn with_result(result: Result<Vec<Chat>, SourceError>) -> Self {
            Self {
                result,
                captured_project: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatsSource for StubSource {
        async fn list_chats(&self, project_id: Option<&str>) -> Result<Vec<Chat>, SourceError> {
            *self.captured_project.lock().expect("project lock") = Some(project_id.map(str::to_owned));
            self.result.clone()
        }
    }

    fn chat(id: &str, hour: Option<u32>) -> Chat {
        Chat {
            last_message_at: hour.map(|h| Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap()),
            ..Chat::placeholder(id)
        }
    }

    #[tokio::test]
    async fn orders_by_latest_activity() {
        let source = StubSource::with_result(Ok(vec![
            chat("quiet", None),
            chat("old", Some(8)),
            chat("new", Some(11)),
        ]));

        let chats = list_chats(&source, ListChatsQuery::default())
            .await
            .expect("list should succeed");

        let ids: Vec<&str> = chats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "quiet"]);
    }

    #[tokio::test]
    async fn blank_project_filter_is_dropped() {
        let source = StubSource::with_result(Ok(vec![]));

        list_chats(
            &source,
            ListChatsQuery {
                project_id: Some("  ".to_owned()),
            },
        )
        .await
        .expect("list should succeed");

        assert_eq!(*source.captured_project.lock().expect("project lock"), Some(None));
    }

    #[tokio::test]
    async fn passes_project_filter() {
        let source = StubSource::with_result(Ok(vec![]));

        list_chats(
            &source,
            ListChatsQuery {
                project_id: Some("p1".to_owned()),
            },
        )
        .await
        .expect("list should succeed");

        assert_eq!(
            *source.captured_project.lock().expect("project lock"),
            Some(Some("p1".to_owned()))
        );
    }

    #[tokio::test]
    async fn maps_unavailable_error() {
        let source = StubSource::with_result(Err(SourceError::Unavailable));

        let err = list_chats(&source, ListChatsQuery::default())
            .await
            .expect_err("must fail");

        assert_eq!(err, ListChatsError::TemporarilyUnavailable);
    }

    #[tokio::test]
    async fn backend_detail_becomes_user_message() {
        let source = StubSource::with_result(Err(SourceError::Rejected("Forbidden".to_owned())));

        let err = list_chats(&source, ListChatsQuery::default())
            .await
            .expect_err("must fail");

        assert_eq!(err.user_message(), "Forbidden");
    }
}
