/// Realtime connection state shown next to an open chat.
///
/// `Disconnected -> Connecting` on `connect`, `Connecting -> Connected` once the
/// frame loop runs, and back to `Disconnected` on failure or teardown. There is
/// no reconnect timer; re-entering the chat starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Disconnected => "offline",
            Self::Connecting => "connecting",
            Self::Connected => "live",
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}
