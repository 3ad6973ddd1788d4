//! Persistent storage for the access/refresh tokens and cached identity.
//!
//! Lifecycle: written on login (and on every refresh), read on launch,
//! cleared on logout. The implementation is picked at startup from config.

use std::{
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use fs2::FileExt;

use crate::{
    domain::session::Session,
    infra::{config::TokenStoreKind, error::AppError, storage_layout::StorageLayout},
};

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, AppError>;
    fn save(&self, session: &Session) -> Result<(), AppError>;
    /// Returns whether anything was removed.
    fn clear(&self) -> Result<bool, AppError>;
}

pub fn build(kind: TokenStoreKind, layout: &StorageLayout) -> Box<dyn TokenStore> {
    match kind {
        TokenStoreKind::File => Box::new(FileTokenStore::new(
            layout.token_file(),
            layout.token_lock_file(),
        )),
        TokenStoreKind::Memory => Box::new(MemoryTokenStore::default()),
    }
}

/// TOML file in the per-user session dir, guarded by an advisory lock so two
/// running clients never interleave a refresh write.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf, lock_path: PathBuf) -> Self {
        Self { path, lock_path }
    }

    fn lock(&self) -> Result<File, AppError> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|source| self.io_error(source))?;
        file.lock_exclusive()
            .map_err(|source| self.io_error(source))?;

        Ok(file)
    }

    fn io_error(&self, source: std::io::Error) -> AppError {
        AppError::TokenStoreIo {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Session>, AppError> {
        let lock = self.lock()?;

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        let session = toml::from_str(&raw).map_err(|source| AppError::TokenStoreFormat {
            path: self.path.clone(),
            source,
        })?;

        let _ = lock.unlock();
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        let lock = self.lock()?;
        let encoded = toml::to_string(session)?;

        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, encoded).map_err(|source| self.io_error(source))?;
        restrict_permissions(&tmp_path).map_err(|source| self.io_error(source))?;
        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))?;

        let _ = lock.unlock();
        tracing::debug!(path = %self.path.display(), "session tokens persisted");
        Ok(())
    }

    fn clear(&self) -> Result<bool, AppError> {
        let lock = self.lock()?;

        let removed = match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(source) if source.kind() == ErrorKind::NotFound => false,
            Err(source) => return Err(self.io_error(source)),
        };

        let _ = lock.unlock();
        Ok(removed)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> std::io::Result<()> {
    Ok(())
}

/// Process-local store; nothing survives exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl MemoryTokenStore {
    fn slot(&self) -> Result<MutexGuard<'_, Option<Session>>, AppError> {
        self.session.lock().map_err(|_| AppError::TokenStorePoisoned)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Session>, AppError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<bool, AppError> {
        Ok(self.slot()?.take().is_some())
    }
}
