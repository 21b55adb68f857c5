use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;

use crate::core::layout::SuggestionStyle;
use crate::core::translator::types::TextNormalization;
use super::error::{AppError, AppResult};
use super::i18n::Locale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    pub api: ApiSettings,
    pub ui: UiSettings,
    pub suggestion: SuggestionStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub endpoint: String,
    pub rapidapi_host: String,
    pub normalization: TextNormalization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub width: u32,
    pub height: u32,
    pub locale: Locale,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://deepl-translator.p.rapidapi.com/translate".to_string(),
            rapidapi_host: "deepl-translator.p.rapidapi.com".to_string(),
            normalization: TextNormalization::default(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            width: 380,
            height: 492,
            locale: Locale::default(),
        }
    }
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            ui: UiSettings::default(),
            suggestion: SuggestionStyle::default(),
        }
    }
}

impl PluginSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "layer-translator")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    /// Load settings from `path`, writing the defaults there on first run.
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !fs::try_exists(path).await? {
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await
            .map_err(|e| AppError::Config(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).await
            .map_err(|e| AppError::Config(format!("Failed to write settings file: {}", e)))
    }
}
