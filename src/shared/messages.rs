use serde::{Deserialize, Serialize};

use super::error::{AppError, AppResult};

/// Messages posted by the plugin UI to the plugin core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")] // Matches the `{ type: "...", ... }` shape the UI posts
pub enum HostMessage {
    #[serde(rename = "translate")]
    Translate {
        target: String,
        #[serde(rename = "isReplace", default)]
        is_replace: bool,
    },

    #[serde(rename = "setApiKey")]
    SetApiKey {
        #[serde(rename = "apiKey")]
        api_key: String,
    },

    #[serde(rename = "showFigmaErrorNotify")]
    ShowErrorNotify { message: String },
}

impl HostMessage {
    /// Validate a raw UI payload before dispatch.
    pub fn from_value(value: serde_json::Value) -> AppResult<Self> {
        let message: HostMessage = serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("Invalid UI message: {}", e)))?;

        if let HostMessage::Translate { target, .. } = &message {
            if target.trim().is_empty() {
                return Err(AppError::Validation("Missing target language".to_string()));
            }
        }

        Ok(message)
    }
}

/// Messages posted by the plugin core to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum OutboundMessage {
    #[serde(rename = "send-apiKey")]
    SendApiKey(String),
}
