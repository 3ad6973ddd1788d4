use anyhow::{Context, Result};

use crate::infra::{config::PlayerKind, contracts::MediaPlayer};

pub fn build(kind: PlayerKind) -> Box<dyn MediaPlayer> {
    match kind {
        PlayerKind::System => Box::new(SystemPlayer),
        PlayerKind::None => Box::new(NoopPlayer),
    }
}

/// Delegates to the desktop's registered handler for the stream URL.
#[derive(Debug, Clone, Default)]
pub struct SystemPlayer;

impl MediaPlayer for SystemPlayer {
    fn play(&self, stream_url: &str) -> Result<bool> {
        open::that_detached(stream_url)
            .with_context(|| format!("failed to hand {stream_url} to the system player"))?;
        tracing::info!(stream_url, "camera stream handed to system player");
        Ok(true)
    }
}

/// For headless hosts: the caller prints the URL instead.
#[derive(Debug, Clone, Default)]
pub struct NoopPlayer;

impl MediaPlayer for NoopPlayer {
    fn play(&self, _stream_url: &str) -> Result<bool> {
        Ok(false)
    }
}
