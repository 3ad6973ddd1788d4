use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::infra::{
    config::{load, AppConfig},
    contracts::ConfigAdapter,
};

const BASE_URL_ENV: &str = "SITEADMIN_BASE_URL";
const WS_URL_ENV: &str = "SITEADMIN_WS_URL";

/// Loads `config.toml` and lets the environment point the client at another backend.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        let mut config = load(self.path.as_deref())?;
        apply_env_overrides(&mut config, |key| env::var(key).ok());
        Ok(config)
    }
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
        config.backend.base_url = base_url;
    }

    if let Some(ws_url) = lookup(WS_URL_ENV).filter(|value| !value.trim().is_empty()) {
        config.backend.ws_url = ws_url;
    }
}
