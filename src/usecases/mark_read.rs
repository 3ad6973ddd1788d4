use async_trait::async_trait;

use super::contracts::SourceError;

#[async_trait]
pub trait ReadReceipts: Send + Sync {
    /// Marks every counterpart message in the chat as read on the backend.
    async fn mark_as_read(&self, chat_id: &str) -> Result<(), SourceError>;
}

/// Best-effort read receipt. Failures are logged and never reach the user;
/// returns whether the backend accepted the call.
pub async fn mark_read(receipts: &dyn ReadReceipts, chat_id: &str) -> bool {
    match receipts.mark_as_read(chat_id).await {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(
                code = "CHAT_MARK_READ_FAILED",
                chat_id,
                error = ?error,
                "mark-as-read failed; continuing"
            );
            false
        }
    }
}
