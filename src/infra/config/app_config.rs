use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub backend: BackendConfig,
    pub first_load: FirstLoadConfig,
    pub images: ImageConfig,
    pub media: MediaConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Write logs to a file under the cache dir instead of stderr.
    pub to_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            to_file: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    /// Versioned path prefix shared by REST and WebSocket endpoints.
    pub api_prefix: String,
    /// Origin for realtime sockets; derived from `base_url` when empty.
    pub ws_url: String,
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            api_prefix: "/api/v1".to_owned(),
            ws_url: String::new(),
            timeout_ms: 30_000,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn rest_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            normalized_prefix(&self.api_prefix),
            path
        )
    }

    pub fn ws_origin(&self) -> String {
        if !self.ws_url.trim().is_empty() {
            return self.ws_url.trim_end_matches('/').to_owned();
        }

        let base = self.base_url.trim_end_matches('/');
        if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_owned()
        }
    }

    pub fn ws_chat_url(&self, chat_id: &str) -> String {
        format!(
            "{}{}/ws/chats/{}",
            self.ws_origin(),
            normalized_prefix(&self.api_prefix),
            chat_id
        )
    }
}

fn normalized_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Policy for the project list shown right after a cold start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirstLoadConfig {
    pub timeout_ms: u64,
    pub attempts: u32,
    pub backoff_unit_ms: u64,
}

impl Default for FirstLoadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            attempts: 3,
            backoff_unit_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvictionKind {
    #[default]
    Lru,
    Fifo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageConfig {
    pub cache_capacity: usize,
    pub eviction: EvictionKind,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 64,
            eviction: EvictionKind::Lru,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Hand the stream URL to the desktop's default handler.
    #[default]
    System,
    /// Print the URL only.
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MediaConfig {
    pub player: PlayerKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    /// Outgoing messages are sent on behalf of the specialist.
    pub from_specialist: bool,
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            from_specialist: true,
            history_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StorageConfig {
    pub token_store: TokenStoreKind,
}
