//! Layer translator
//!
//! Core of a design-tool plugin that translates the selected text layers
//! through an external translation API and either rewrites them in place or
//! places a translated suggestion next to each one.

pub mod core;
pub mod plugin;
pub mod scene;
pub mod shared;

#[cfg(test)]
mod testing;

pub use crate::core::orchestrator::{BatchReport, TranslationOrchestrator};
pub use crate::plugin::{Host, Plugin};
pub use crate::shared::error::{AppError, AppResult};

use std::sync::Once;

/// Install the global `tracing` subscriber, filtered by `RUST_LOG`
/// (defaults to `info`). Safe to call more than once.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
