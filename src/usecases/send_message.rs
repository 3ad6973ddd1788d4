//! REST message sending.
//!
//! Used directly by the `send` command, and by the chat view whenever the
//! realtime channel is not connected.

use async_trait::async_trait;

use crate::domain::message::Message;

use super::contracts::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub chat_id: String,
    pub text: String,
    pub from_specialist: bool,
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Posts a message and returns it as stored by the backend.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        from_specialist: bool,
    ) -> Result<Message, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Message text is empty after trimming whitespace.
    EmptyMessage,
    Unauthorized,
    ChatNotFound,
    TemporarilyUnavailable,
    Failed(String),
}

impl SendMessageError {
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyMessage => "Message is empty.".to_owned(),
            Self::Unauthorized => SourceError::Unauthorized.user_message(),
            Self::ChatNotFound => "Chat not found.".to_owned(),
            Self::TemporarilyUnavailable => "Message not sent: server is unreachable.".to_owned(),
            Self::Failed(text) => format!("Message not sent: {text}"),
        }
    }
}

/// Trims and validates the text, then hands it to the sender.
pub async fn send_message(
    sender: &dyn MessageSender,
    command: SendMessageCommand,
) -> Result<Message, SendMessageError> {
    let text = command.text.trim();
    if text.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    sender
        .send_message(&command.chat_id, text, command.from_specialist)
        .await
        .map_err(map_source_error)
}

fn map_source_error(error: SourceError) -> SendMessageError {
    match error {
        SourceError::Unauthorized => SendMessageError::Unauthorized,
        SourceError::NotFound(_) => SendMessageError::ChatNotFound,
        SourceError::Unavailable => SendMessageError::TemporarilyUnavailable,
        other => SendMessageError::Failed(other.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct StubSender {
        result: Result<Message, SourceError>,
        captured: Mutex<Vec<(String, String, bool)>>,
    }

    impl StubSender {
        fn with_result(result: Result<Message, SourceError>) -> Self {
            Self {
                result,
                captured: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String, bool)> {
            self.captured.lock().expect("captured lock").clone()
        }
    }

    #[async_trait]
    impl MessageSender for StubSender {
        async fn send_message(
            &self,
            chat_id: &str,
            text: &str,
            from_specialist: bool,
        ) -> Result<Message, SourceError> {
            self.captured.lock().expect("captured lock").push((
                chat_id.to_owned(),
                text.to_owned(),
                from_specialist,
            ));
            self.result.clone()
        }
    }

    fn stored(text: &str) -> Message {
        Message {
            id: "m9".to_owned(),
            chat_id: Some("c1".to_owned()),
            text: text.to_owned(),
            sent_at: None,
            is_from_specialist: true,
            is_read: false,
            created_at: None,
        }
    }

    fn command(text: &str) -> SendMessageCommand {
        SendMessageCommand {
            chat_id: "c1".to_owned(),
            text: text.to_owned(),
            from_specialist: true,
        }
    }

    #[tokio::test]
    async fn rejects_whitespace_only_text() {
        let sender = StubSender::with_result(Ok(stored("x")));

        let err = send_message(&sender, command(" \n\t "))
            .await
            .expect_err("must fail");

        assert_eq!(err, SendMessageError::EmptyMessage);
        assert!(sender.calls().is_empty());
    }

    #[tokio::test]
    async fn sends_trimmed_text_with_sender_flag() {
        let sender = StubSender::with_result(Ok(stored("Hello")));

        let message = send_message(&sender, command("  Hello  "))
            .await
            .expect("send should succeed");

        assert_eq!(message.id, "m9");
        assert_eq!(
            sender.calls(),
            vec![("c1".to_owned(), "Hello".to_owned(), true)]
        );
    }

    #[tokio::test]
    async fn maps_not_found_error() {
        let sender = StubSender::with_result(Err(SourceError::NotFound(String::new())));

        let err = send_message(&sender, command("hi")).await.expect_err("must fail");

        assert_eq!(err, SendMessageError::ChatNotFound);
    }

    #[tokio::test]
    async fn backend_rejection_keeps_detail() {
        let sender = StubSender::with_result(Err(SourceError::Rejected("Chat is closed".to_owned())));

        let err = send_message(&sender, command("hi")).await.expect_err("must fail");

        assert_eq!(err.user_message(), "Message not sent: Chat is closed");
    }
}
