//! Per-chat realtime channel contract.

use tokio::sync::mpsc;

use crate::domain::events::ChannelEvent;

/// Events of one realtime connection, in arrival order.
///
/// The stream ends after the connection is gone; a `Disconnected` event is
/// delivered before that whenever the connection was attempted.
#[derive(Debug)]
pub struct RealtimeFeed {
    events: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl RealtimeFeed {
    pub fn new(events: mpsc::UnboundedReceiver<ChannelEvent>) -> Self {
        Self { events }
    }

    /// A feed that only reports the connection as gone.
    pub fn disconnected() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(ChannelEvent::Disconnected);
        Self::new(rx)
    }

    pub async fn next(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }
}

/// One connection scoped to one chat.
///
/// Connection failures never surface as errors: they end the feed with
/// `Disconnected`. There is no automatic reconnect.
pub trait RealtimeChannel: Send {
    /// Opens the connection for `chat_id`, replacing any previous one.
    fn connect(&mut self, chat_id: &str) -> RealtimeFeed;

    /// Queues a CREATE. Returns `false` without side effects when no
    /// connection is open.
    fn send(&self, text: &str, from_specialist: bool) -> bool;

    /// Queues a READ for one message; same no-connection rule as `send`.
    fn mark_read(&self, message_id: &str) -> bool;

    /// Releases the connection. Safe to call when not connected.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;
}
