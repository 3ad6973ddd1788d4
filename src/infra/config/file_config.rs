use serde::Deserialize;

use crate::infra::config::{
    AppConfig, BackendConfig, ChatConfig, EvictionKind, FirstLoadConfig, ImageConfig, LogConfig,
    MediaConfig, PlayerKind, StorageConfig, TokenStoreKind,
};

/// On-disk shape of `config.toml`: every key is optional and merged over defaults.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub backend: Option<FileBackendConfig>,
    pub first_load: Option<FileFirstLoadConfig>,
    pub images: Option<FileImageConfig>,
    pub media: Option<FileMediaConfig>,
    pub chat: Option<FileChatConfig>,
    pub storage: Option<FileStorageConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(backend) = self.backend {
            backend.merge_into(&mut config.backend);
        }

        if let Some(first_load) = self.first_load {
            first_load.merge_into(&mut config.first_load);
        }

        if let Some(images) = self.images {
            images.merge_into(&mut config.images);
        }

        if let Some(media) = self.media {
            media.merge_into(&mut config.media);
        }

        if let Some(chat) = self.chat {
            chat.merge_into(&mut config.chat);
        }

        if let Some(storage) = self.storage {
            storage.merge_into(&mut config.storage);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub to_file: Option<bool>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(to_file) = self.to_file {
            config.to_file = to_file;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileBackendConfig {
    pub base_url: Option<String>,
    pub api_prefix: Option<String>,
    pub ws_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl FileBackendConfig {
    fn merge_into(self, config: &mut BackendConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(api_prefix) = self.api_prefix {
            config.api_prefix = api_prefix;
        }

        if let Some(ws_url) = self.ws_url {
            config.ws_url = ws_url;
        }

        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileFirstLoadConfig {
    pub timeout_ms: Option<u64>,
    pub attempts: Option<u32>,
    pub backoff_unit_ms: Option<u64>,
}

impl FileFirstLoadConfig {
    fn merge_into(self, config: &mut FirstLoadConfig) {
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }

        if let Some(attempts) = self.attempts {
            config.attempts = attempts;
        }

        if let Some(backoff_unit_ms) = self.backoff_unit_ms {
            config.backoff_unit_ms = backoff_unit_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileImageConfig {
    pub cache_capacity: Option<usize>,
    pub eviction: Option<EvictionKind>,
}

impl FileImageConfig {
    fn merge_into(self, config: &mut ImageConfig) {
        if let Some(cache_capacity) = self.cache_capacity {
            config.cache_capacity = cache_capacity;
        }

        if let Some(eviction) = self.eviction {
            config.eviction = eviction;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileMediaConfig {
    pub player: Option<PlayerKind>,
}

impl FileMediaConfig {
    fn merge_into(self, config: &mut MediaConfig) {
        if let Some(player) = self.player {
            config.player = player;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub from_specialist: Option<bool>,
    pub history_limit: Option<usize>,
}

impl FileChatConfig {
    fn merge_into(self, config: &mut ChatConfig) {
        if let Some(from_specialist) = self.from_specialist {
            config.from_specialist = from_specialist;
        }

        if let Some(history_limit) = self.history_limit {
            config.history_limit = history_limit;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStorageConfig {
    pub token_store: Option<TokenStoreKind>,
}

impl FileStorageConfig {
    fn merge_into(self, config: &mut StorageConfig) {
        if let Some(token_store) = self.token_store {
            config.token_store = token_store;
        }
    }
}
