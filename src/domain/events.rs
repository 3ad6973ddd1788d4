use serde::Serialize;

use super::message::Message;

/// Outbound realtime envelope written to the chat socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ChatEnvelope {
    #[serde(rename_all = "camelCase")]
    Create { text: String, from_specialist: bool },
    #[serde(rename_all = "camelCase")]
    Read { message_id: String },
}

impl ChatEnvelope {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CREATE",
            Self::Read { .. } => "READ",
        }
    }
}

/// What the realtime channel hands to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The frame loop has been entered.
    Connected,
    Message(Message),
    /// The connection ended, failed to open, or was released.
    Disconnected,
}
