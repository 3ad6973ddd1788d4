mod adapter;
mod app_config;
mod file_config;
mod loader;

pub use adapter::FileConfigAdapter;
pub use app_config::{
    AppConfig, BackendConfig, ChatConfig, EvictionKind, FirstLoadConfig, ImageConfig, LogConfig,
    MediaConfig, PlayerKind, StorageConfig, TokenStoreKind,
};
pub(crate) use loader::load;
