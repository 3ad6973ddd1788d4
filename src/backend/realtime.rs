//! WebSocket implementation of the per-chat realtime channel.
//!
//! One spawned task owns the socket. It forwards decoded messages to the
//! feed and drains the outbound queue; dropping the queue's sender closes
//! the socket.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::{
    domain::{
        events::{ChannelEvent, ChatEnvelope},
        message::Message,
    },
    infra::{config::BackendConfig, secrets::redact_url, token_store::TokenStore},
    usecases::realtime::{RealtimeChannel, RealtimeFeed},
};

struct Connection {
    chat_id: String,
    outbound: mpsc::UnboundedSender<ChatEnvelope>,
    connected: Arc<AtomicBool>,
}

pub struct WsChatChannel {
    backend: BackendConfig,
    tokens: Arc<dyn TokenStore>,
    connection: Option<Connection>,
}

impl WsChatChannel {
    pub fn new(backend: BackendConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            connection: None,
        }
    }

    fn socket_url(&self, chat_id: &str) -> Option<String> {
        let session = match self.tokens.load() {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::warn!(code = "REALTIME_NO_SESSION", "no stored session for realtime");
                return None;
            }
            Err(error) => {
                tracing::warn!(code = "REALTIME_TOKEN_LOAD_FAILED", error = %error, "token store read failed");
                return None;
            }
        };

        Some(format!(
            "{}?token={}",
            self.backend.ws_chat_url(chat_id),
            session.access_token
        ))
    }

    fn queue(&self, envelope: ChatEnvelope) -> bool {
        let Some(connection) = self.connection.as_ref() else {
            return false;
        };
        if !connection.connected.load(Ordering::SeqCst) {
            return false;
        }

        let kind = envelope.kind();
        let queued = connection.outbound.send(envelope).is_ok();
        tracing::debug!(chat_id = %connection.chat_id, kind, queued, "realtime envelope queued");
        queued
    }
}

impl RealtimeChannel for WsChatChannel {
    fn connect(&mut self, chat_id: &str) -> RealtimeFeed {
        self.disconnect();

        let Some(url) = self.socket_url(chat_id) else {
            return RealtimeFeed::disconnected();
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));

        tokio::spawn(run_socket(url, events_tx, outbound_rx, Arc::clone(&connected)));

        self.connection = Some(Connection {
            chat_id: chat_id.to_owned(),
            outbound: outbound_tx,
            connected,
        });

        RealtimeFeed::new(events_rx)
    }

    fn send(&self, text: &str, from_specialist: bool) -> bool {
        self.queue(ChatEnvelope::Create {
            text: text.to_owned(),
            from_specialist,
        })
    }

    fn mark_read(&self, message_id: &str) -> bool {
        self.queue(ChatEnvelope::Read {
            message_id: message_id.to_owned(),
        })
    }

    fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            tracing::debug!(chat_id = %connection.chat_id, "releasing realtime connection");
        }
    }

    fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|connection| connection.connected.load(Ordering::SeqCst))
    }
}

async fn run_socket(
    url: String,
    events: mpsc::UnboundedSender<ChannelEvent>,
    mut outbound: mpsc::UnboundedReceiver<ChatEnvelope>,
    connected: Arc<AtomicBool>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(error) => {
            tracing::warn!(
                code = "REALTIME_CONNECT_FAILED",
                url = %redact_url(&url),
                error = %error,
                "realtime connection failed"
            );
            let _ = events.send(ChannelEvent::Disconnected);
            return;
        }
    };

    tracing::info!(url = %redact_url(&url), "realtime connected");
    connected.store(true, Ordering::SeqCst);
    let _ = events.send(ChannelEvent::Connected);

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            frame = source.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => match serde_json::from_str::<Message>(&text) {
                    Ok(message) => {
                        if events.send(ChannelEvent::Message(message)).is_err() {
                            break;
                        }
                    }
                    Err(error) => tracing::warn!(
                        code = "REALTIME_FRAME_DROPPED",
                        error = %error,
                        "dropping realtime frame that is not a message"
                    ),
                },
                Some(Ok(WsMessage::Ping(payload))) => {
                    if sink.send(WsMessage::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::warn!(code = "REALTIME_SOCKET_ERROR", error = %error, "realtime socket failed");
                    break;
                }
            },
            envelope = outbound.recv() => match envelope {
                Some(envelope) => match serde_json::to_string(&envelope) {
                    Ok(payload) => {
                        if let Err(error) = sink.send(WsMessage::Text(payload)).await {
                            tracing::warn!(code = "REALTIME_WRITE_FAILED", error = %error, "realtime write failed");
                            break;
                        }
                    }
                    Err(error) => tracing::warn!(
                        code = "REALTIME_ENCODE_FAILED",
                        error = %error,
                        "envelope could not be encoded"
                    ),
                },
                None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                }
            },
        }
    }

    connected.store(false, Ordering::SeqCst);
    let _ = events.send(ChannelEvent::Disconnected);
    tracing::info!("realtime disconnected");
}
