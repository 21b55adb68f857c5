//! Fakes shared by the unit tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::core::translator::types::{TranslationRequest, TranslationResponse};
use crate::core::translator::TranslationBackend;
use crate::shared::error::{AppError, AppResult};
use crate::shared::messages::OutboundMessage;
use crate::shared::notify::{Notifier, NotifyOptions, UiChannel};

type Responder = Box<dyn Fn(&TranslationRequest) -> AppResult<TranslationResponse> + Send + Sync>;

pub struct FakeBackend {
    responder: Responder,
    requests: Mutex<Vec<(TranslationRequest, String)>>,
}

impl FakeBackend {
    pub fn with(responder: impl Fn(&TranslationRequest) -> AppResult<TranslationResponse> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers `"{prefix}{text}"`.
    pub fn prefixing(prefix: &'static str) -> Self {
        Self::with(move |req| {
            Ok(TranslationResponse {
                text: Some(format!("{}{}", prefix, req.text)),
            })
        })
    }

    /// Every request fails with the given HTTP status.
    pub fn failing(status: u16, status_text: &'static str) -> Self {
        Self::with(move |_| {
            Err(AppError::TranslationRequestFailed {
                status,
                status_text: status_text.to_string(),
            })
        })
    }

    /// Success responses without a `text` field.
    pub fn empty() -> Self {
        Self::with(|_| Ok(TranslationResponse::default()))
    }

    pub fn requests(&self) -> Vec<(TranslationRequest, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationBackend for FakeBackend {
    async fn send(&self, request: &TranslationRequest, credential: &str) -> AppResult<TranslationResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), credential.to_string()));
        // Let sibling pipelines interleave like real network waits
        tokio::task::yield_now().await;
        (self.responder)(request)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, NotifyOptions)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, NotifyOptions)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(_, opts)| opts.error)
            .map(|(msg, _)| msg)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, options: NotifyOptions) {
        self.messages.lock().unwrap().push((message.to_string(), options));
    }
}

#[derive(Default)]
pub struct RecordingUi {
    posted: Mutex<Vec<OutboundMessage>>,
}

impl RecordingUi {
    pub fn posted(&self) -> Vec<OutboundMessage> {
        self.posted.lock().unwrap().clone()
    }
}

impl UiChannel for RecordingUi {
    fn post_message(&self, message: OutboundMessage) {
        self.posted.lock().unwrap().push(message);
    }
}
