use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage paths: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create storage directory {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token store at {path} is unavailable: {source}")]
    TokenStoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token store at {path} is corrupted: {source}")]
    TokenStoreFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to encode session: {0}")]
    TokenStoreEncode(#[from] toml::ser::Error),
    #[error("in-memory token store lock is poisoned")]
    TokenStorePoisoned,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
