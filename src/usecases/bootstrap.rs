use std::{path::Path, sync::Arc};

use crate::{
    infra::{
        self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError,
        storage_layout::StorageLayout,
    },
    usecases::context::AppContext,
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;

    let mut context = build_context(&FileConfigAdapter::new(config_path), layout)?;
    let guard = infra::logging::init(&context.config.logging, &context.layout)?;
    context.hold_log_guard(guard);

    tracing::debug!(
        base_url = %infra::secrets::redact_url(&context.config.backend.base_url),
        token_store = ?context.config.storage.token_store,
        "context ready"
    );

    Ok(context)
}

pub(crate) fn build_context(
    config_adapter: &dyn ConfigAdapter,
    layout: StorageLayout,
) -> Result<AppContext, AppError> {
    let config = config_adapter.load()?;
    let tokens = Arc::from(infra::token_store::build(config.storage.token_store, &layout));
    let player = infra::media::build(config.media.player);

    Ok(AppContext::new(config, layout, tokens, player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::session::{Session, UserIdentity},
        infra::{config::AppConfig, stubs::StubConfigAdapter},
    };

    #[test]
    fn builds_context_from_adapter_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = StorageLayout::under(dir.path().join("siteadmin"));

        let context = build_context(&StubConfigAdapter, layout.clone()).expect("context");

        assert_eq!(context.config, AppConfig::default());
        assert_eq!(context.layout, layout);
        assert_eq!(context.chat_options().history_limit, 100);
        assert!(context.chat_options().from_specialist);
    }

    #[test]
    fn default_token_store_is_file_backed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = StorageLayout::under(dir.path().join("siteadmin"));
        layout.ensure_dirs().expect("dirs");

        let context = build_context(&StubConfigAdapter, layout.clone()).expect("context");
        context
            .tokens
            .save(&Session {
                access_token: "access".to_owned(),
                refresh_token: Some("refresh".to_owned()),
                user: UserIdentity::default(),
            })
            .expect("save");

        assert!(layout.token_file().exists());
    }

    #[test]
    fn api_client_builds_from_default_backend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = StorageLayout::under(dir.path().join("siteadmin"));
        let context = build_context(&StubConfigAdapter, layout).expect("context");

        let api = context.api_client().expect("http client");

        assert_eq!(api.backend(), &context.config.backend);
    }
}
