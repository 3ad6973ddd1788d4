use std::{cell::RefCell, rc::Rc};

use anyhow::Result;

use crate::infra::{
    config::AppConfig,
    contracts::{ConfigAdapter, MediaPlayer},
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Records requested stream URLs instead of playing them.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    pub played: Rc<RefCell<Vec<String>>>,
}

impl MediaPlayer for RecordingPlayer {
    fn play(&self, stream_url: &str) -> Result<bool> {
        self.played.borrow_mut().push(stream_url.to_owned());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::media::NoopPlayer;

    #[test]
    fn stub_config_returns_defaults() {
        let adapter = StubConfigAdapter;
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn noop_player_reports_no_handoff() {
        assert!(!NoopPlayer.play("https://cams/1.m3u8").expect("noop never fails"));
    }

    #[test]
    fn recording_player_keeps_urls() {
        let player = RecordingPlayer::default();

        player.play("https://cams/1.m3u8").expect("record");

        assert_eq!(player.played.borrow().as_slice(), ["https://cams/1.m3u8"]);
    }
}
