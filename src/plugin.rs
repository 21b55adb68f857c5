//! Plugin controller
//!
//! Startup and UI message dispatch. Everything host-specific arrives through
//! [`Host`]; the translation itself is delegated to
//! [`TranslationOrchestrator`].

use std::sync::Arc;

use crate::core::credentials::{CredentialStore, API_KEY};
use crate::core::fonts::{FontLoader, FontResolver};
use crate::core::layout::SuggestionLayoutEngine;
use crate::core::orchestrator::{BatchReport, TranslationOrchestrator};
use crate::core::translator::{RapidApiBackend, TranslationBackend, TranslationClient};
use crate::scene::SceneGraph;
use crate::shared::error::{AppError, AppResult};
use crate::shared::i18n::MessageKey;
use crate::shared::messages::{HostMessage, OutboundMessage};
use crate::shared::notify::{Notifier, NotifyOptions, UiChannel};
use crate::shared::settings::PluginSettings;

/// Host services the plugin runs against.
#[derive(Clone)]
pub struct Host {
    pub graph: Arc<dyn SceneGraph>,
    pub fonts: Arc<dyn FontLoader>,
    pub storage: Arc<dyn CredentialStore>,
    pub notifier: Arc<dyn Notifier>,
    pub ui: Arc<dyn UiChannel>,
}

pub struct Plugin {
    host: Host,
    settings: PluginSettings,
    orchestrator: TranslationOrchestrator,
}

impl Plugin {
    pub fn new(host: Host, backend: Arc<dyn TranslationBackend>, settings: PluginSettings) -> Self {
        let locale = settings.ui.locale;
        let client = TranslationClient::new(
            backend,
            host.notifier.clone(),
            settings.api.normalization,
            locale,
        );
        let orchestrator = TranslationOrchestrator::new(
            host.graph.clone(),
            client,
            FontResolver::new(host.fonts.clone()),
            SuggestionLayoutEngine::new(settings.suggestion.clone()),
            host.notifier.clone(),
            locale,
        );
        Self {
            host,
            settings,
            orchestrator,
        }
    }

    /// Plugin talking to the RapidAPI endpoint from `settings`.
    pub fn with_rapidapi(host: Host, settings: PluginSettings) -> AppResult<Self> {
        let backend = Arc::new(RapidApiBackend::new(&settings.api)?);
        Ok(Self::new(host, backend, settings))
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Send the stored API key to the UI. Storage failures are only logged.
    pub async fn init(&self) {
        tracing::info!(
            "[Plugin] Starting ({}x{} UI)",
            self.settings.ui.width,
            self.settings.ui.height
        );
        match self.host.storage.get(API_KEY).await {
            Ok(key) => self.host.ui.post_message(OutboundMessage::SendApiKey(key)),
            Err(e) => tracing::error!("[Plugin] Failed to read stored API key: {}", e),
        }
    }

    /// Validate and dispatch a raw UI message.
    pub async fn handle_message(&self, raw: serde_json::Value) -> AppResult<()> {
        let message = HostMessage::from_value(raw).map_err(|e| {
            tracing::warn!("[Plugin] Dropping UI message: {}", e);
            e
        })?;
        self.dispatch(message).await
    }

    pub async fn dispatch(&self, message: HostMessage) -> AppResult<()> {
        match message {
            HostMessage::Translate { target, is_replace } => {
                self.translate(&target, is_replace).await?;
            }
            HostMessage::SetApiKey { api_key } => self.set_api_key(&api_key).await,
            HostMessage::ShowErrorNotify { message } => self.host.notifier.notify_error(&message),
        }
        Ok(())
    }

    /// Translate the current selection. Recovered conditions (nothing
    /// selected) are reported to the user and yield `Ok(None)`.
    pub async fn translate(&self, target: &str, replace: bool) -> AppResult<Option<BatchReport>> {
        let credential = self.host.storage.get(API_KEY).await.unwrap_or_else(|e| {
            tracing::error!("[Plugin] Failed to read API key: {}", e);
            String::new()
        });
        let selection = self.host.graph.selection();

        match self.orchestrator.run(&selection, target, replace, &credential).await {
            Ok(report) => Ok(Some(report)),
            Err(AppError::NoTextLayerSelected) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_api_key(&self, api_key: &str) {
        let locale = self.settings.ui.locale;
        match self.host.storage.set(API_KEY, api_key).await {
            Ok(()) => self
                .host
                .notifier
                .notify(locale.message(MessageKey::ApiKeySaved), NotifyOptions::default()),
            Err(e) => {
                let err = AppError::CredentialPersistFailed(e.to_string());
                tracing::error!("[Plugin] {}", err);
                self.host
                    .notifier
                    .notify_error(locale.message(MessageKey::ApiKeySaveFailed));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credentials::MemoryCredentialStore;
    use crate::scene::memory::MemorySceneGraph;
    use crate::scene::FontName;
    use crate::shared::i18n::Locale;
    use crate::testing::{FakeBackend, RecordingNotifier, RecordingUi};
    use async_trait::async_trait;
    use serde_json::json;

    struct BrokenStore;

    #[async_trait]
    impl CredentialStore for BrokenStore {
        async fn get(&self, _key: &str) -> AppResult<String> {
            Err(AppError::Storage("disk unavailable".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::Storage("disk full".to_string()))
        }
    }

    struct Fixture {
        graph: Arc<MemorySceneGraph>,
        storage: Arc<dyn CredentialStore>,
        notifier: Arc<RecordingNotifier>,
        ui: Arc<RecordingUi>,
        backend: Arc<FakeBackend>,
        plugin: Plugin,
    }

    fn fixture_with(storage: Arc<dyn CredentialStore>) -> Fixture {
        let graph = Arc::new(MemorySceneGraph::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let ui = Arc::new(RecordingUi::default());
        let backend = Arc::new(FakeBackend::prefixing("[en] "));
        let host = Host {
            graph: graph.clone(),
            fonts: graph.clone(),
            storage: storage.clone(),
            notifier: notifier.clone(),
            ui: ui.clone(),
        };
        let plugin = Plugin::new(host, backend.clone(), PluginSettings::default());
        Fixture {
            graph,
            storage,
            notifier,
            ui,
            backend,
            plugin,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(MemoryCredentialStore::default()))
    }

    #[tokio::test]
    async fn test_init_sends_empty_key_when_unset() {
        let fx = fixture();
        fx.plugin.init().await;
        assert_eq!(fx.ui.posted(), vec![OutboundMessage::SendApiKey(String::new())]);
    }

    #[tokio::test]
    async fn test_init_sends_stored_key() {
        let fx = fixture();
        fx.storage.set(API_KEY, "stored").await.unwrap();
        fx.plugin.init().await;
        assert_eq!(fx.ui.posted(), vec![OutboundMessage::SendApiKey("stored".to_string())]);
    }

    #[tokio::test]
    async fn test_init_storage_failure_posts_nothing() {
        let fx = fixture_with(Arc::new(BrokenStore));
        fx.plugin.init().await;
        assert!(fx.ui.posted().is_empty());
        assert!(fx.notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_set_api_key_persists_and_confirms() {
        let fx = fixture();
        fx.plugin
            .handle_message(json!({"type": "setApiKey", "apiKey": "new-key"}))
            .await
            .unwrap();

        assert_eq!(fx.storage.get(API_KEY).await.unwrap(), "new-key");
        let messages = fx.notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Locale::Ko.message(MessageKey::ApiKeySaved));
        assert!(!messages[0].1.error);
    }

    #[tokio::test]
    async fn test_set_api_key_failure_is_notified() {
        let fx = fixture_with(Arc::new(BrokenStore));
        fx.plugin
            .dispatch(HostMessage::SetApiKey {
                api_key: "k".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            fx.notifier.errors(),
            vec![Locale::Ko.message(MessageKey::ApiKeySaveFailed).to_string()]
        );
    }

    #[tokio::test]
    async fn test_error_notify_message_is_forwarded() {
        let fx = fixture();
        fx.plugin
            .handle_message(json!({"type": "showFigmaErrorNotify", "message": "UI says no"}))
            .await
            .unwrap();
        assert_eq!(fx.notifier.errors(), vec!["UI says no".to_string()]);
    }

    #[tokio::test]
    async fn test_translate_uses_selection_and_stored_key() {
        let fx = fixture();
        fx.storage.set(API_KEY, "secret").await.unwrap();
        let page = fx.graph.page();
        let text = fx
            .graph
            .add_text(&page, "T", "안녕하세요", FontName::new("Inter", "Regular"), (0.0, 0.0))
            .unwrap();
        fx.graph.select(vec![text.clone()]);

        fx.plugin
            .handle_message(json!({"type": "translate", "target": "en", "isReplace": true}))
            .await
            .unwrap();

        assert_eq!(fx.graph.characters(&text).as_deref(), Some("[en] 안녕하세요"));
        let requests = fx.backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1, "secret");
    }

    #[tokio::test]
    async fn test_translate_with_empty_selection_is_recovered() {
        let fx = fixture();
        let report = fx.plugin.translate("en", false).await.unwrap();
        assert_eq!(report, None);
        assert_eq!(
            fx.notifier.errors(),
            vec![Locale::Ko.message(MessageKey::NoTextLayerSelected).to_string()]
        );
        assert_eq!(fx.graph.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_message_is_rejected() {
        let fx = fixture();
        let err = fx
            .plugin
            .handle_message(json!({"type": "translate"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(fx.backend.requests().is_empty());
    }
}
