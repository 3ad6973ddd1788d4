//! Reconciles one open chat: REST history, realtime arrivals and sends.
//!
//! All mutation of the chat view goes through [`ChatScreen`], and
//! [`run_chat_screen`] is its only driver once the chat is open, so the
//! message list has a single owner.

use tokio::sync::mpsc;

use crate::domain::{
    events::ChannelEvent, open_chat_state::OpenChatState, status::ConnectionStatus,
};

use super::{
    load_messages::{load_messages, LoadMessagesQuery, MessagesSource},
    mark_read::{mark_read, ReadReceipts},
    realtime::{RealtimeChannel, RealtimeFeed},
    send_message::{send_message, MessageSender, SendMessageCommand, SendMessageError},
};

/// Everything the chat view needs from the REST side.
pub trait ChatBackend: MessagesSource + MessageSender + ReadReceipts {}

impl<T: MessagesSource + MessageSender + ReadReceipts> ChatBackend for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatOptions {
    pub from_specialist: bool,
    pub history_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatIntent {
    Send(String),
    MarkRead(String),
    Leave,
}

/// How a send left the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRoute {
    /// Written to the socket; `sending` stays on until the echo arrives.
    Realtime,
    /// Posted over REST and already merged.
    Rest,
}

pub struct ChatScreen<B, R> {
    state: OpenChatState,
    backend: B,
    realtime: R,
    options: ChatOptions,
}

impl<B: ChatBackend, R: RealtimeChannel> ChatScreen<B, R> {
    pub fn new(backend: B, realtime: R, options: ChatOptions) -> Self {
        Self {
            state: OpenChatState::default(),
            backend,
            realtime,
            options,
        }
    }

    pub fn state(&self) -> &OpenChatState {
        &self.state
    }

    /// Loads the chat and opens its realtime channel.
    ///
    /// Returns `None` when the history could not be loaded; the state then
    /// carries the error text and no channel is opened.
    pub async fn enter(&mut self, chat_id: &str) -> Option<RealtimeFeed> {
        if self.state.is_open() {
            self.leave();
        }

        self.state.set_loading(chat_id);

        let query = LoadMessagesQuery {
            chat_id: chat_id.to_owned(),
            limit: self.options.history_limit,
        };
        let loaded = match load_messages(&self.backend, query).await {
            Ok(loaded) => loaded,
            Err(error) => {
                tracing::warn!(code = "CHAT_OPEN_FAILED", chat_id, error = ?error, "chat history failed to load");
                self.state.set_error(error.user_message());
                return None;
            }
        };

        tracing::debug!(chat_id, messages = loaded.messages.len(), "chat history loaded");
        self.state.set_ready(loaded.chat, loaded.messages);

        mark_read(&self.backend, chat_id).await;

        self.state.set_connection_status(ConnectionStatus::Connecting);
        Some(self.realtime.connect(chat_id))
    }

    /// Folds one realtime event into the view.
    ///
    /// A disconnect while a realtime send is still unechoed re-posts that
    /// text over REST.
    pub async fn apply(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Connected => self.state.set_connection_status(ConnectionStatus::Connected),
            ChannelEvent::Disconnected => {
                let unconfirmed = self.state.take_unconfirmed_send();
                self.state.set_connection_status(ConnectionStatus::Disconnected);

                if let Some(text) = unconfirmed {
                    tracing::warn!(
                        code = "CHAT_REALTIME_SEND_UNCONFIRMED",
                        "socket closed before the echo arrived, resending over REST"
                    );
                    // Failures already leave a notice in the state.
                    let _ = self.send_over_rest(&text).await;
                }
            }
            ChannelEvent::Message(message) => {
                let foreign = match (message.chat_id.as_deref(), self.state.chat_id()) {
                    (Some(incoming), Some(open)) => incoming != open,
                    _ => false,
                };
                if foreign {
                    tracing::debug!(message_id = %message.id, "dropping message for another chat");
                    return;
                }

                let outcome = self.state.merge_incoming(message);
                tracing::trace!(?outcome, "realtime message merged");
            }
        }
    }

    /// Sends over the socket when connected, otherwise over REST.
    pub async fn send(&mut self, text: &str) -> Result<SendRoute, SendMessageError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        let from_specialist = self.options.from_specialist;
        if self.state.connection_status().is_connected()
            && self.realtime.send(text, from_specialist)
        {
            self.state.begin_realtime_send(from_specialist, text);
            return Ok(SendRoute::Realtime);
        }

        self.send_over_rest(text).await
    }

    async fn send_over_rest(&mut self, text: &str) -> Result<SendRoute, SendMessageError> {
        let from_specialist = self.options.from_specialist;
        let Some(chat_id) = self.state.chat_id().map(str::to_owned) else {
            return Err(SendMessageError::ChatNotFound);
        };

        self.state.begin_rest_send();
        let result = send_message(
            &self.backend,
            SendMessageCommand {
                chat_id,
                text: text.to_owned(),
                from_specialist,
            },
        )
        .await;
        self.state.finish_send();

        match result {
            Ok(message) => {
                self.state.merge_incoming(message);
                Ok(SendRoute::Rest)
            }
            Err(error) => {
                tracing::warn!(code = "CHAT_SEND_FAILED", error = ?error, "REST send failed");
                self.state.set_notice(error.user_message());
                Err(error)
            }
        }
    }

    /// Sends a READ for one message over the socket, if connected.
    pub fn mark_message_read(&self, message_id: &str) -> bool {
        self.state.connection_status().is_connected() && self.realtime.mark_read(message_id)
    }

    pub fn leave(&mut self) {
        self.realtime.disconnect();
        self.state.clear();
    }
}

/// Drives an open chat until the user leaves or the intent stream ends.
///
/// `on_change` sees the state after every realtime event and every intent.
pub async fn run_chat_screen<B, R>(
    screen: &mut ChatScreen<B, R>,
    mut feed: RealtimeFeed,
    mut intents: mpsc::UnboundedReceiver<ChatIntent>,
    mut on_change: impl FnMut(&OpenChatState),
) where
    B: ChatBackend,
    R: RealtimeChannel,
{
    let mut feed_open = true;

    loop {
        tokio::select! {
            event = feed.next(), if feed_open => match event {
                Some(event) => screen.apply(event).await,
                None => {
                    feed_open = false;
                    if screen.state().connection_status() != ConnectionStatus::Disconnected {
                        screen.apply(ChannelEvent::Disconnected).await;
                    }
                }
            },
            intent = intents.recv() => match intent {
                Some(ChatIntent::Send(text)) => {
                    if let Err(SendMessageError::EmptyMessage) = screen.send(&text).await {
                        tracing::debug!("ignoring empty message");
                    }
                }
                Some(ChatIntent::MarkRead(message_id)) => {
                    if !screen.mark_message_read(&message_id) {
                        tracing::debug!(%message_id, "read receipt skipped: not connected");
                    }
                }
                Some(ChatIntent::Leave) | None => break,
            },
        }

        on_change(screen.state());
    }

    screen.leave();
}
