//! Translator client
//!
//! One POST per text layer to the RapidAPI DeepL endpoint. Failures are
//! reported to the user right here and turned into `None`, so callers only
//! have to skip the layer.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::sync::Arc;

pub mod types;

use self::types::{TextNormalization, TranslationRequest, TranslationResponse};
use crate::shared::error::{AppError, AppResult};
use crate::shared::i18n::{Locale, MessageKey};
use crate::shared::notify::Notifier;
use crate::shared::settings::ApiSettings;

const RAPIDAPI_KEY_HEADER: &str = "X-RapidAPI-Key";
const RAPIDAPI_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Transport for a single translation request.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn send(&self, request: &TranslationRequest, credential: &str) -> AppResult<TranslationResponse>;
}

pub struct RapidApiBackend {
    http: Client,
    endpoint: String,
    host: String,
}

impl RapidApiBackend {
    pub fn new(settings: &ApiSettings) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("layer-translator/translator")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            host: settings.rapidapi_host.clone(),
        })
    }
}

#[async_trait]
impl TranslationBackend for RapidApiBackend {
    async fn send(&self, request: &TranslationRequest, credential: &str) -> AppResult<TranslationResponse> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(RAPIDAPI_KEY_HEADER, credential)
            .header(RAPIDAPI_HOST_HEADER, &self.host)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::TranslationRequestFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<TranslationResponse>()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse translation response: {}", e)))
    }
}

#[derive(Clone)]
pub struct TranslationClient {
    backend: Arc<dyn TranslationBackend>,
    notifier: Arc<dyn Notifier>,
    normalization: TextNormalization,
    locale: Locale,
}

impl TranslationClient {
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        notifier: Arc<dyn Notifier>,
        normalization: TextNormalization,
        locale: Locale,
    ) -> Self {
        Self {
            backend,
            notifier,
            normalization,
            locale,
        }
    }

    /// Translate `text` into `target`.
    ///
    /// `None` means either the request failed (the user has already been
    /// notified) or the API answered without any text.
    pub async fn translate(&self, text: &str, target: &str, credential: &str) -> Option<String> {
        let request = TranslationRequest::new(self.normalization.apply(text), target);

        match self.backend.send(&request, credential).await {
            Ok(response) => match response.text {
                Some(text) if !text.is_empty() => Some(text),
                Some(_) => {
                    tracing::warn!("[Translator] Response for target '{}' had empty text", target);
                    None
                }
                None => {
                    tracing::warn!("[Translator] Response for target '{}' had no text field", target);
                    None
                }
            },
            Err(e) => {
                tracing::error!("[Translator] Request failed: {}", e);
                self.notifier
                    .notify_error(&self.locale.message_with_detail(MessageKey::ApiRequestFailed, &e));
                None
            }
        }
    }
}
