use std::{env, fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "siteadmin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub config_dir: PathBuf,
    pub session_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    /// `XDG_CONFIG_HOME` wins over the platform config dir so tests and
    /// portable installs can relocate everything.
    pub fn resolve() -> Result<Self, AppError> {
        let config_base = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve config base directory (XDG_CONFIG_HOME/HOME)".into(),
            })?;

        Ok(Self::under(config_base.join(APP_DIR_NAME)))
    }

    pub fn under(config_dir: PathBuf) -> Self {
        let session_dir = config_dir.join("session");
        let cache_dir = config_dir.join("cache");
        let log_dir = config_dir.join("logs");

        Self {
            config_dir,
            session_dir,
            cache_dir,
            log_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [
            &self.config_dir,
            &self.session_dir,
            &self.cache_dir,
            &self.log_dir,
        ] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn token_file(&self) -> PathBuf {
        self.session_dir.join("tokens.toml")
    }

    pub fn token_lock_file(&self) -> PathBuf {
        self.session_dir.join("tokens.lock")
    }
}
