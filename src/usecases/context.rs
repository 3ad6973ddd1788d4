use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    backend::{ApiClient, ApiError, ImageLoader, WsChatChannel},
    infra::{
        config::AppConfig, contracts::MediaPlayer, storage_layout::StorageLayout,
        token_store::TokenStore,
    },
    usecases::open_chat::ChatOptions,
};

/// Everything a command needs, resolved once at startup.
pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub tokens: Arc<dyn TokenStore>,
    pub player: Box<dyn MediaPlayer>,
    log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        layout: StorageLayout,
        tokens: Arc<dyn TokenStore>,
        player: Box<dyn MediaPlayer>,
    ) -> Self {
        Self {
            config,
            layout,
            tokens,
            player,
            log_guard: None,
        }
    }

    /// Keeps the file writer flushing until the context is dropped.
    pub fn hold_log_guard(&mut self, guard: Option<WorkerGuard>) {
        self.log_guard = guard;
    }

    pub fn api_client(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(
            self.config.backend.clone(),
            self.config.first_load.clone(),
            Arc::clone(&self.tokens),
        )
    }

    pub fn image_loader(&self, api: &ApiClient) -> ImageLoader {
        ImageLoader::new(api.http().clone(), &self.config.images)
    }

    pub fn chat_channel(&self) -> WsChatChannel {
        WsChatChannel::new(self.config.backend.clone(), Arc::clone(&self.tokens))
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            from_specialist: self.config.chat.from_specialist,
            history_limit: self.config.chat.history_limit,
        }
    }
}
