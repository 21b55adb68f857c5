//! Suggestion layout
//!
//! Builds the translucent, outlined frame that holds a translated copy of a
//! text layer and parks it next to the source without covering it.

use serde::{Deserialize, Serialize};

use crate::scene::{
    FrameProps, LayoutMode, NodeId, Padding, Rgb, SceneGraph, SceneNode, SizingMode, TextAutoResize,
};
use crate::shared::error::{AppError, AppResult};

const MIN_OPACITY: f64 = 0.6;
const MAX_OPACITY: f64 = 0.8;

/// Where the suggestion goes relative to its source layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Same x, `gap` units below the source's bottom edge.
    Below { gap: f64 },
    /// Right edge `gap` units left of the source, same absolute y.
    Left { gap: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `{target}_{text}`
    TextOnly,
    /// `{target}_{layer name}_{text}`
    NameAndText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionStyle {
    pub placement: Placement,
    pub padding: f64,
    pub opacity: f64,
    pub naming: NamingStyle,
    /// Widest the frame may grow before its text wraps.
    pub max_width: f64,
    /// Frame width minus wrapped text width.
    pub text_margin: f64,
}

impl Default for SuggestionStyle {
    fn default() -> Self {
        Self {
            placement: Placement::Left { gap: 100.0 },
            padding: 10.0,
            opacity: 0.8,
            naming: NamingStyle::NameAndText,
            max_width: 500.0,
            text_margin: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionLayoutEngine {
    style: SuggestionStyle,
}

impl SuggestionLayoutEngine {
    pub fn new(style: SuggestionStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &SuggestionStyle {
        &self.style
    }

    pub fn frame_name(&self, source: &SceneNode, target: &str) -> String {
        let text = source.characters.as_deref().unwrap_or_default();
        match self.style.naming {
            NamingStyle::TextOnly => format!("{}_{}", target, text),
            NamingStyle::NameAndText => format!("{}_{}_{}", target, source.name, text),
        }
    }

    /// Create the suggestion frame + text pair for `source` and attach it to
    /// the source's parent. Fonts of the source family must already be loaded.
    pub fn insert_suggestion(
        &self,
        graph: &dyn SceneGraph,
        source: &SceneNode,
        translated: &str,
        target: &str,
    ) -> AppResult<NodeId> {
        let parent = source
            .parent
            .clone()
            .ok_or_else(|| AppError::Scene(format!("Text node {} has no parent", source.id)))?;
        let font = source
            .font_name
            .clone()
            .ok_or_else(|| AppError::Scene(format!("Text node {} has no font", source.id)))?;

        let text = graph.create_text(&font, translated)?;
        let frame = match graph.create_frame(FrameProps {
            name: self.frame_name(source, target),
            layout_mode: LayoutMode::Vertical,
            counter_axis_sizing: SizingMode::Auto,
            opacity: self.style.opacity.clamp(MIN_OPACITY, MAX_OPACITY),
            strokes: vec![Rgb::BLACK],
            padding: Padding::uniform(self.style.padding),
        }) {
            Ok(frame) => frame,
            Err(e) => {
                discard(graph, &[&text]);
                return Err(e);
            }
        };

        match self.assemble(graph, source, &parent, &frame, &text) {
            Ok((x, y)) => {
                tracing::debug!("[Layout] Placed suggestion {} for {} at ({}, {})", frame, source.id, x, y);
                Ok(frame)
            }
            Err(e) => {
                discard(graph, &[&frame, &text]);
                Err(e)
            }
        }
    }

    /// Size and place the detached frame, then attach it to `parent`.
    fn assemble(
        &self,
        graph: &dyn SceneGraph,
        source: &SceneNode,
        parent: &NodeId,
        frame: &NodeId,
        text: &NodeId,
    ) -> AppResult<(f64, f64)> {
        graph.append_child(frame, text)?;
        self.limit_width(graph, frame, text)?;

        let frame_width = graph
            .node(frame)
            .map(|n| n.width)
            .ok_or_else(|| AppError::Scene(format!("Suggestion frame {} vanished", frame)))?;
        let (x, y) = self.position(graph, source, parent, frame_width)?;

        graph.append_child(parent, frame)?;
        graph.set_position(frame, x, y)?;
        Ok((x, y))
    }

    /// Freeze an over-wide frame at `max_width` and wrap its text.
    fn limit_width(&self, graph: &dyn SceneGraph, frame: &NodeId, text: &NodeId) -> AppResult<()> {
        let Some(frame_node) = graph.node(frame) else {
            return Err(AppError::Scene(format!("Suggestion frame {} vanished", frame)));
        };
        if frame_node.width <= self.style.max_width {
            return Ok(());
        }

        graph.set_counter_axis_sizing(frame, SizingMode::Fixed)?;
        graph.resize(frame, self.style.max_width, frame_node.height)?;

        let text_height = graph.node(text).map(|n| n.height).unwrap_or_default();
        graph.resize(text, self.style.max_width - self.style.text_margin, text_height)?;
        graph.set_text_auto_resize(text, TextAutoResize::Height)?;
        Ok(())
    }

    /// Frame position in the parent's coordinate space.
    fn position(
        &self,
        graph: &dyn SceneGraph,
        source: &SceneNode,
        parent: &NodeId,
        frame_width: f64,
    ) -> AppResult<(f64, f64)> {
        match self.style.placement {
            Placement::Below { gap } => Ok((source.x, source.y + source.height + gap)),
            Placement::Left { gap } => {
                let abs = source.absolute_transform;
                let target = (abs.tx() - frame_width - gap, abs.ty());
                let parent_abs = graph
                    .node(parent)
                    .map(|n| n.absolute_transform)
                    .ok_or_else(|| AppError::Scene(format!("Parent {} does not exist", parent)))?;
                let to_parent = parent_abs
                    .invert()
                    .ok_or_else(|| AppError::Scene(format!("Parent {} has a singular transform", parent)))?;
                Ok(to_parent.apply(target.0, target.1))
            }
        }
    }
}

/// Remove half-built suggestion nodes so a failed insert leaves no trace.
fn discard(graph: &dyn SceneGraph, nodes: &[&NodeId]) {
    for id in nodes {
        if graph.node(id).is_none() {
            continue;
        }
        if let Err(e) = graph.remove(id) {
            tracing::warn!("[Layout] Failed to remove partial suggestion node {}: {}", id, e);
        }
    }
}
