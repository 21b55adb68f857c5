//! Font preloading
//!
//! The host refuses text edits until the edited node's font is resident, so
//! every text mutation goes through [`FontResolver::ensure_loaded`] first.

use async_trait::async_trait;
use std::sync::Arc;

use crate::scene::FontName;
use crate::shared::error::{AppError, AppResult};

/// Styles loaded for a family before any text in that family is touched.
pub const PRELOADED_STYLES: [&str; 3] = ["Regular", "Medium", "Bold"];

#[async_trait]
pub trait FontLoader: Send + Sync {
    async fn load_font(&self, font: &FontName) -> AppResult<()>;
}

#[derive(Clone)]
pub struct FontResolver {
    loader: Arc<dyn FontLoader>,
}

impl FontResolver {
    pub fn new(loader: Arc<dyn FontLoader>) -> Self {
        Self { loader }
    }

    /// Load Regular, Medium and Bold of `font`'s family, in that order.
    ///
    /// The node's own style is ignored; the three variants cover the source
    /// text and the suggestion text created in the same family.
    pub async fn ensure_loaded(&self, font: &FontName) -> AppResult<()> {
        for style in PRELOADED_STYLES {
            let variant = font.with_style(style);
            self.loader.load_font(&variant).await.map_err(|e| {
                if matches!(e, AppError::FontLoadFailed { .. }) {
                    e
                } else {
                    AppError::FontLoadFailed {
                        family: variant.family.clone(),
                        style: variant.style.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;
        }
        tracing::debug!("[Fonts] Loaded {} (Regular/Medium/Bold)", font.family);
        Ok(())
    }
}
