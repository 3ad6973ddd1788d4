use anyhow::Result;

use crate::infra::config::AppConfig;

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Plays a camera stream. One implementation per target, chosen at startup.
pub trait MediaPlayer {
    /// Returns `true` when playback was handed off, `false` when the player
    /// only reports the URL.
    fn play(&self, stream_url: &str) -> Result<bool>;
}
