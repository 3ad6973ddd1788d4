use crate::infra::{error::AppError, token_store::TokenStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub session_removed: bool,
}

/// Forgets the stored tokens. Idempotent: logging out twice is not an error.
pub fn logout(store: &dyn TokenStore) -> Result<LogoutOutcome, AppError> {
    let session_removed = store.clear()?;
    tracing::info!(session_removed, "logout completed");

    Ok(LogoutOutcome { session_removed })
}
