//! Batch translation
//!
//! Expands the selection into work items, runs one pipeline per text layer
//! (translate, load fonts, then replace or insert a suggestion) and joins
//! them. A failing layer only skips itself; earlier edits stay applied.

use futures::future::join_all;
use std::sync::Arc;

use super::fonts::FontResolver;
use super::layout::SuggestionLayoutEngine;
use super::translator::TranslationClient;
use super::traversal::{SceneTraverser, WorkItem};
use crate::scene::{NodeId, SceneGraph};
use crate::shared::error::{AppError, AppResult};
use crate::shared::i18n::{Locale, MessageKey};
use crate::shared::notify::Notifier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Visible text layers found in the selection.
    pub found: usize,
    /// Layers replaced or given a suggestion.
    pub applied: usize,
    /// Layers left untouched because a step failed.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafOutcome {
    Applied,
    Skipped,
}

pub struct TranslationOrchestrator {
    graph: Arc<dyn SceneGraph>,
    client: TranslationClient,
    fonts: FontResolver,
    layout: SuggestionLayoutEngine,
    notifier: Arc<dyn Notifier>,
    locale: Locale,
}

impl TranslationOrchestrator {
    pub fn new(
        graph: Arc<dyn SceneGraph>,
        client: TranslationClient,
        fonts: FontResolver,
        layout: SuggestionLayoutEngine,
        notifier: Arc<dyn Notifier>,
        locale: Locale,
    ) -> Self {
        Self {
            graph,
            client,
            fonts,
            layout,
            notifier,
            locale,
        }
    }

    /// Translate every visible text layer under `selection` into `target`.
    ///
    /// With nothing to translate the user is notified and
    /// `Err(AppError::NoTextLayerSelected)` is returned; nothing is mutated.
    pub async fn run(
        &self,
        selection: &[NodeId],
        target: &str,
        replace: bool,
        credential: &str,
    ) -> AppResult<BatchReport> {
        let items = SceneTraverser::new(self.graph.as_ref()).collect(selection, target, replace);

        if items.is_empty() {
            tracing::info!("[Orchestrator] No text layer in a selection of {}", selection.len());
            self.notifier
                .notify_error(self.locale.message(MessageKey::NoTextLayerSelected));
            return Err(AppError::NoTextLayerSelected);
        }

        tracing::info!(
            "[Orchestrator] Translating {} text layers to '{}' (replace={})",
            items.len(),
            target,
            replace
        );

        let outcomes = join_all(items.iter().map(|item| self.process(item, credential))).await;

        let applied = outcomes.iter().filter(|o| **o == LeafOutcome::Applied).count();
        let report = BatchReport {
            found: items.len(),
            applied,
            skipped: items.len() - applied,
        };
        tracing::info!(
            "[Orchestrator] Batch done: {} applied, {} skipped",
            report.applied,
            report.skipped
        );
        Ok(report)
    }

    async fn process(&self, item: &WorkItem, credential: &str) -> LeafOutcome {
        let Some(original) = self.graph.characters(&item.node) else {
            tracing::warn!("[Orchestrator] Text node {} disappeared before translation", item.node);
            return LeafOutcome::Skipped;
        };

        let Some(translated) = self.client.translate(&original, &item.target, credential).await else {
            return LeafOutcome::Skipped;
        };

        // Re-read after the request; the host may have moved or removed the node
        let Some(node) = self.graph.node(&item.node) else {
            tracing::warn!("[Orchestrator] Text node {} disappeared during translation", item.node);
            return LeafOutcome::Skipped;
        };
        let Some(font) = node.font_name.clone() else {
            tracing::warn!("[Orchestrator] Text node {} has mixed or missing fonts; skipping", node.id);
            return LeafOutcome::Skipped;
        };

        if let Err(e) = self.fonts.ensure_loaded(&font).await {
            tracing::error!("[Orchestrator] {}", e);
            self.notifier
                .notify_error(&self.locale.message_with_detail(MessageKey::FontLoadFailed, &e));
            return LeafOutcome::Skipped;
        }

        let result = if item.replace {
            self.graph.set_characters(&node.id, &translated)
        } else {
            self.layout
                .insert_suggestion(self.graph.as_ref(), &node, &translated, &item.target)
                .map(|_| ())
        };

        match result {
            Ok(()) => {
                tracing::debug!("[Orchestrator] Applied translation to {}", node.id);
                LeafOutcome::Applied
            }
            Err(e) => {
                tracing::error!("[Orchestrator] Failed to apply translation to {}: {}", node.id, e);
                self.notifier
                    .notify_error(&self.locale.message_with_detail(MessageKey::ApplyFailed, &e));
                LeafOutcome::Skipped
            }
        }
    }
}
