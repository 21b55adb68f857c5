//! User-facing notification strings
//!
//! Every message shown through the host's notify toast lives here so the
//! orchestrator and plugin controller never hardcode text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    NoTextLayerSelected,
    ApiRequestFailed,
    ApiKeySaved,
    ApiKeySaveFailed,
    FontLoadFailed,
    ApplyFailed,
}

impl Locale {
    pub fn message(self, key: MessageKey) -> &'static str {
        match (self, key) {
            (Locale::Ko, MessageKey::NoTextLayerSelected) => {
                "선택된 텍스트 레이어가 없습니다. 번역할 텍스트 레이어를 선택하세요."
            }
            (Locale::Ko, MessageKey::ApiRequestFailed) => "API 요청에 문제가 있습니다.",
            (Locale::Ko, MessageKey::ApiKeySaved) => "API KEY가 저장되었습니다.",
            (Locale::Ko, MessageKey::ApiKeySaveFailed) => "API KEY 저장에 문제가 있습니다.",
            (Locale::Ko, MessageKey::FontLoadFailed) => "폰트를 불러오지 못했습니다.",
            (Locale::Ko, MessageKey::ApplyFailed) => "번역 결과를 적용하지 못했습니다.",

            (Locale::En, MessageKey::NoTextLayerSelected) => {
                "No text layer selected. Select the text layers to translate."
            }
            (Locale::En, MessageKey::ApiRequestFailed) => "The translation API request failed.",
            (Locale::En, MessageKey::ApiKeySaved) => "API key saved.",
            (Locale::En, MessageKey::ApiKeySaveFailed) => "Failed to save the API key.",
            (Locale::En, MessageKey::FontLoadFailed) => "Failed to load fonts.",
            (Locale::En, MessageKey::ApplyFailed) => "Failed to apply the translation.",
        }
    }

    /// Message followed by the error detail on its own line, e.g.
    /// `"API 요청에 문제가 있습니다.\n(403 Forbidden)"`.
    pub fn message_with_detail(self, key: MessageKey, detail: impl std::fmt::Display) -> String {
        format!("{}\n({})", self.message(key), detail)
    }
}
