//! In-memory scene graph
//!
//! A small stand-in for the host document: nodes in a map, text measured with
//! a fixed glyph width, vertical auto-layout frames sized from their children.
//! Like the real host it refuses text edits whose font has not been loaded.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{
    FontName, FrameProps, LayoutMode, NodeId, NodeKind, Padding, Rgb, SceneGraph, SceneNode, SizingMode,
    TextAutoResize, Transform,
};
use crate::core::fonts::FontLoader;
use crate::shared::error::{AppError, AppResult};

/// Advance of one character, in document units.
pub const GLYPH_WIDTH: f64 = 7.0;
pub const LINE_HEIGHT: f64 = 16.0;

#[derive(Debug, Clone)]
struct MemNode {
    kind: NodeKind,
    name: String,
    visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    characters: Option<String>,
    font_name: Option<FontName>,
    layout_mode: LayoutMode,
    counter_axis_sizing: SizingMode,
    text_auto_resize: TextAutoResize,
    padding: Padding,
    opacity: f64,
    strokes: Vec<Rgb>,
}

impl MemNode {
    fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            visible: true,
            parent: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            characters: None,
            font_name: None,
            layout_mode: LayoutMode::None,
            counter_axis_sizing: SizingMode::Fixed,
            text_auto_resize: TextAutoResize::None,
            padding: Padding::default(),
            opacity: 1.0,
            strokes: Vec::new(),
        }
    }
}

/// Style attributes of a frame, for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyle {
    pub layout_mode: LayoutMode,
    pub counter_axis_sizing: SizingMode,
    pub opacity: f64,
    pub strokes: Vec<Rgb>,
    pub padding: Padding,
}

struct Inner {
    nodes: HashMap<NodeId, MemNode>,
    page: NodeId,
    selection: Vec<NodeId>,
    loaded_fonts: HashSet<FontName>,
    unavailable_families: HashSet<String>,
    font_requests: Vec<FontName>,
    mutations: usize,
}

impl Inner {
    fn get(&self, id: &NodeId) -> AppResult<&MemNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| AppError::Scene(format!("Node {} does not exist", id)))
    }

    fn get_mut(&mut self, id: &NodeId) -> AppResult<&mut MemNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| AppError::Scene(format!("Node {} does not exist", id)))
    }

    fn insert(&mut self, node: MemNode) -> NodeId {
        let id = NodeId(Uuid::new_v4().to_string());
        self.nodes.insert(id.clone(), node);
        id
    }

    fn attach(&mut self, parent: &NodeId, child: &NodeId) -> AppResult<()> {
        if !self.get(parent)?.kind.is_container() {
            return Err(AppError::Scene(format!("Node {} cannot have children", parent)));
        }
        let old_parent = self.get(child)?.parent.clone();
        if let Some(old) = old_parent {
            if let Ok(old) = self.get_mut(&old) {
                old.children.retain(|c| c != child);
            }
        }

        let parent_node = self.get(parent)?;
        let stacked = if parent_node.layout_mode == LayoutMode::Vertical {
            let offset: f64 = parent_node
                .children
                .iter()
                .map(|c| self.measure(c).1)
                .sum();
            Some((parent_node.padding.left, parent_node.padding.top + offset))
        } else {
            None
        };

        self.get_mut(parent)?.children.push(child.clone());
        let node = self.get_mut(child)?;
        node.parent = Some(parent.clone());
        if let Some((x, y)) = stacked {
            node.x = x;
            node.y = y;
        }
        Ok(())
    }

    fn destroy(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in &node.children {
                self.destroy(child);
            }
        }
    }

    /// Rendered `(width, height)` of a node.
    fn measure(&self, id: &NodeId) -> (f64, f64) {
        let Some(node) = self.nodes.get(id) else {
            return (0.0, 0.0);
        };

        match node.kind {
            NodeKind::Text => {
                let text = node.characters.as_deref().unwrap_or_default();
                let lines: Vec<&str> = text.split('\n').collect();
                let natural = lines
                    .iter()
                    .map(|l| l.chars().count() as f64 * GLYPH_WIDTH)
                    .fold(0.0, f64::max);
                match node.text_auto_resize {
                    TextAutoResize::WidthAndHeight => (natural, lines.len() as f64 * LINE_HEIGHT),
                    TextAutoResize::Height => {
                        let wrapped: f64 = lines
                            .iter()
                            .map(|l| {
                                let w = l.chars().count() as f64 * GLYPH_WIDTH;
                                if node.width > 0.0 { (w / node.width).ceil().max(1.0) } else { 1.0 }
                            })
                            .sum();
                        (node.width, wrapped * LINE_HEIGHT)
                    }
                    TextAutoResize::None => (node.width, node.height),
                }
            }
            _ if node.layout_mode == LayoutMode::Vertical => {
                let sizes: Vec<(f64, f64)> = node.children.iter().map(|c| self.measure(c)).collect();
                let width = match node.counter_axis_sizing {
                    SizingMode::Auto => {
                        sizes.iter().map(|s| s.0).fold(0.0, f64::max) + node.padding.left + node.padding.right
                    }
                    SizingMode::Fixed => node.width,
                };
                let height = sizes.iter().map(|s| s.1).sum::<f64>() + node.padding.top + node.padding.bottom;
                (width, height)
            }
            _ => (node.width, node.height),
        }
    }

    fn absolute_transform(&self, id: &NodeId) -> Transform {
        let Some(node) = self.nodes.get(id) else {
            return Transform::identity();
        };
        let local = Transform::translation(node.x, node.y);
        match &node.parent {
            Some(parent) => self.absolute_transform(parent).then(&local),
            None => local,
        }
    }

    fn require_font(&self, font: &FontName) -> AppResult<()> {
        if self.loaded_fonts.contains(font) {
            Ok(())
        } else {
            Err(AppError::Scene(format!("Cannot write to node with unloaded font \"{}\"", font)))
        }
    }
}

pub struct MemorySceneGraph {
    inner: Mutex<Inner>,
}

impl Default for MemorySceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySceneGraph {
    /// Empty document holding a single page.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        let page = NodeId(Uuid::new_v4().to_string());
        nodes.insert(page.clone(), MemNode::new(NodeKind::Page, "Page 1"));
        Self {
            inner: Mutex::new(Inner {
                nodes,
                page,
                selection: Vec::new(),
                loaded_fonts: HashSet::new(),
                unavailable_families: HashSet::new(),
                font_requests: Vec::new(),
                mutations: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn page(&self) -> NodeId {
        self.lock().page.clone()
    }

    /// Add a container node with a fixed size.
    pub fn add_container(
        &self,
        parent: &NodeId,
        kind: NodeKind,
        name: &str,
        (x, y): (f64, f64),
        (width, height): (f64, f64),
    ) -> AppResult<NodeId> {
        if !kind.is_container() {
            return Err(AppError::Scene(format!("{:?} is not a container kind", kind)));
        }
        let mut inner = self.lock();
        let mut node = MemNode::new(kind, name);
        node.x = x;
        node.y = y;
        node.width = width;
        node.height = height;
        let id = inner.insert(node);
        inner.attach(parent, &id)?;
        Ok(id)
    }

    pub fn add_frame(&self, parent: &NodeId, name: &str, pos: (f64, f64), size: (f64, f64)) -> AppResult<NodeId> {
        self.add_container(parent, NodeKind::Frame, name, pos, size)
    }

    /// Add an auto-width text node.
    pub fn add_text(
        &self,
        parent: &NodeId,
        name: &str,
        characters: &str,
        font: FontName,
        (x, y): (f64, f64),
    ) -> AppResult<NodeId> {
        let mut inner = self.lock();
        let mut node = MemNode::new(NodeKind::Text, name);
        node.x = x;
        node.y = y;
        node.characters = Some(characters.to_string());
        node.font_name = Some(font);
        node.text_auto_resize = TextAutoResize::WidthAndHeight;
        let id = inner.insert(node);
        inner.attach(parent, &id)?;
        Ok(id)
    }

    /// Add a non-text leaf such as a rectangle.
    pub fn add_shape(&self, parent: &NodeId, kind: NodeKind, name: &str) -> AppResult<NodeId> {
        let mut inner = self.lock();
        let id = inner.insert(MemNode::new(kind, name));
        inner.attach(parent, &id)?;
        Ok(id)
    }

    pub fn set_visible(&self, id: &NodeId, visible: bool) -> AppResult<()> {
        self.lock().get_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn select(&self, ids: Vec<NodeId>) {
        self.lock().selection = ids;
    }

    /// Make every style of `family` fail to load.
    pub fn mark_font_unavailable(&self, family: &str) {
        self.lock().unavailable_families.insert(family.to_string());
    }

    /// Every font load requested so far, in request order.
    pub fn font_requests(&self) -> Vec<FontName> {
        self.lock().font_requests.clone()
    }

    /// Number of mutations made through [`SceneGraph`].
    pub fn mutation_count(&self) -> usize {
        self.lock().mutations
    }

    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn frame_style(&self, id: &NodeId) -> Option<FrameStyle> {
        let inner = self.lock();
        let node = inner.nodes.get(id)?;
        Some(FrameStyle {
            layout_mode: node.layout_mode,
            counter_axis_sizing: node.counter_axis_sizing,
            opacity: node.opacity,
            strokes: node.strokes.clone(),
            padding: node.padding,
        })
    }

    pub fn text_auto_resize(&self, id: &NodeId) -> Option<TextAutoResize> {
        self.lock().nodes.get(id).map(|n| n.text_auto_resize)
    }
}

impl SceneGraph for MemorySceneGraph {
    fn selection(&self) -> Vec<NodeId> {
        self.lock().selection.clone()
    }

    fn node(&self, id: &NodeId) -> Option<SceneNode> {
        let inner = self.lock();
        let node = inner.nodes.get(id)?;
        let (width, height) = inner.measure(id);
        Some(SceneNode {
            id: id.clone(),
            kind: node.kind,
            name: node.name.clone(),
            visible: node.visible,
            parent: node.parent.clone(),
            children: node.children.clone(),
            x: node.x,
            y: node.y,
            width,
            height,
            absolute_transform: inner.absolute_transform(id),
            characters: node.characters.clone(),
            font_name: node.font_name.clone(),
        })
    }

    fn set_characters(&self, id: &NodeId, characters: &str) -> AppResult<()> {
        let mut inner = self.lock();
        let node = inner.get(id)?;
        if !node.kind.is_text() {
            return Err(AppError::Scene(format!("Node {} is not a text node", id)));
        }
        let font = node
            .font_name
            .clone()
            .ok_or_else(|| AppError::Scene(format!("Text node {} has no font", id)))?;
        inner.require_font(&font)?;
        inner.get_mut(id)?.characters = Some(characters.to_string());
        inner.mutations += 1;
        Ok(())
    }

    fn create_frame(&self, props: FrameProps) -> AppResult<NodeId> {
        let mut inner = self.lock();
        let mut node = MemNode::new(NodeKind::Frame, props.name);
        node.layout_mode = props.layout_mode;
        node.counter_axis_sizing = props.counter_axis_sizing;
        node.opacity = props.opacity;
        node.strokes = props.strokes;
        node.padding = props.padding;
        node.width = 100.0;
        node.height = 100.0;
        inner.mutations += 1;
        Ok(inner.insert(node))
    }

    fn create_text(&self, font: &FontName, characters: &str) -> AppResult<NodeId> {
        let mut inner = self.lock();
        inner.require_font(font)?;
        let mut node = MemNode::new(NodeKind::Text, characters);
        node.characters = Some(characters.to_string());
        node.font_name = Some(font.clone());
        node.text_auto_resize = TextAutoResize::WidthAndHeight;
        inner.mutations += 1;
        Ok(inner.insert(node))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> AppResult<()> {
        let mut inner = self.lock();
        inner.attach(parent, child)?;
        inner.mutations += 1;
        Ok(())
    }

    fn set_position(&self, id: &NodeId, x: f64, y: f64) -> AppResult<()> {
        let mut inner = self.lock();
        let node = inner.get_mut(id)?;
        node.x = x;
        node.y = y;
        inner.mutations += 1;
        Ok(())
    }

    fn set_counter_axis_sizing(&self, id: &NodeId, mode: SizingMode) -> AppResult<()> {
        let mut inner = self.lock();
        let (width, _) = inner.measure(id);
        let node = inner.get_mut(id)?;
        // Freezing an auto-sized frame keeps its current rendered width
        if mode == SizingMode::Fixed && node.counter_axis_sizing == SizingMode::Auto {
            node.width = width;
        }
        node.counter_axis_sizing = mode;
        inner.mutations += 1;
        Ok(())
    }

    fn set_text_auto_resize(&self, id: &NodeId, mode: TextAutoResize) -> AppResult<()> {
        let mut inner = self.lock();
        let node = inner.get_mut(id)?;
        if !node.kind.is_text() {
            return Err(AppError::Scene(format!("Node {} is not a text node", id)));
        }
        node.text_auto_resize = mode;
        inner.mutations += 1;
        Ok(())
    }

    fn resize(&self, id: &NodeId, width: f64, height: f64) -> AppResult<()> {
        let mut inner = self.lock();
        let node = inner.get_mut(id)?;
        node.width = width;
        node.height = height;
        if node.kind.is_text() && node.text_auto_resize == TextAutoResize::WidthAndHeight {
            node.text_auto_resize = TextAutoResize::None;
        }
        inner.mutations += 1;
        Ok(())
    }

    fn remove(&self, id: &NodeId) -> AppResult<()> {
        let mut inner = self.lock();
        if *id == inner.page {
            return Err(AppError::Scene("The page cannot be removed".to_string()));
        }
        if let Some(parent) = inner.get(id)?.parent.clone() {
            if let Ok(parent) = inner.get_mut(&parent) {
                parent.children.retain(|c| c != id);
            }
        }
        inner.destroy(id);
        inner.selection.retain(|s| s != id);
        inner.mutations += 1;
        Ok(())
    }
}

#[async_trait]
impl FontLoader for MemorySceneGraph {
    async fn load_font(&self, font: &FontName) -> AppResult<()> {
        let mut inner = self.lock();
        inner.font_requests.push(font.clone());
        if inner.unavailable_families.contains(&font.family) {
            return Err(AppError::FontLoadFailed {
                family: font.family.clone(),
                style: font.style.clone(),
                reason: "font is not available".to_string(),
            });
        }
        inner.loaded_fonts.insert(font.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inter() -> FontName {
        FontName::new("Inter", "Regular")
    }

    #[test]
    fn test_text_width_follows_characters() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let text = graph.add_text(&page, "Title", "Hello", inter(), (0.0, 0.0)).unwrap();

        let node = graph.node(&text).unwrap();
        assert_eq!(node.width, 5.0 * GLYPH_WIDTH);
        assert_eq!(node.height, LINE_HEIGHT);
    }

    #[test]
    fn test_absolute_transform_accumulates_parents() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let outer = graph.add_frame(&page, "Outer", (100.0, 200.0), (400.0, 400.0)).unwrap();
        let inner = graph.add_frame(&outer, "Inner", (10.0, 20.0), (100.0, 100.0)).unwrap();
        let text = graph.add_text(&inner, "Label", "Hi", inter(), (1.0, 2.0)).unwrap();

        let abs = graph.node(&text).unwrap().absolute_transform;
        assert_eq!((abs.tx(), abs.ty()), (111.0, 222.0));
    }

    #[test]
    fn test_set_characters_requires_loaded_font() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let text = graph.add_text(&page, "Label", "Hi", inter(), (0.0, 0.0)).unwrap();

        let err = graph.set_characters(&text, "Bonjour").unwrap_err();
        assert!(matches!(err, AppError::Scene(_)));
        assert_eq!(graph.characters(&text).as_deref(), Some("Hi"));
        assert_eq!(graph.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_set_characters_after_font_load() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let text = graph.add_text(&page, "Label", "Hi", inter(), (0.0, 0.0)).unwrap();

        graph.load_font(&inter()).await.unwrap();
        graph.set_characters(&text, "Bonjour").unwrap();
        assert_eq!(graph.characters(&text).as_deref(), Some("Bonjour"));
        assert_eq!(graph.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_vertical_frame_hugs_children() {
        let graph = MemorySceneGraph::new();
        graph.load_font(&inter()).await.unwrap();
        let frame = graph
            .create_frame(FrameProps {
                name: "stack".to_string(),
                layout_mode: LayoutMode::Vertical,
                counter_axis_sizing: SizingMode::Auto,
                opacity: 1.0,
                strokes: vec![],
                padding: Padding::uniform(10.0),
            })
            .unwrap();
        let text = graph.create_text(&inter(), "abcd").unwrap();
        graph.append_child(&frame, &text).unwrap();

        let node = graph.node(&frame).unwrap();
        assert_eq!(node.width, 4.0 * GLYPH_WIDTH + 20.0);
        assert_eq!(node.height, LINE_HEIGHT + 20.0);
        let child = graph.node(&text).unwrap();
        assert_eq!((child.x, child.y), (10.0, 10.0));
    }

    #[tokio::test]
    async fn test_unavailable_family_fails_to_load() {
        let graph = MemorySceneGraph::new();
        graph.mark_font_unavailable("Inter");
        let err = graph.load_font(&inter()).await.unwrap_err();
        assert!(matches!(err, AppError::FontLoadFailed { .. }));
        assert_eq!(graph.font_requests(), vec![inter()]);
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let frame = graph.add_frame(&page, "Card", (0.0, 0.0), (100.0, 100.0)).unwrap();
        let text = graph.add_text(&frame, "Label", "Hi", inter(), (0.0, 0.0)).unwrap();
        let before = graph.node_count();

        graph.remove(&frame).unwrap();

        assert!(graph.children(&page).is_empty());
        assert!(graph.node(&text).is_none());
        assert_eq!(graph.node_count(), before - 2);
        assert!(graph.remove(&page).is_err());
    }

    #[test]
    fn test_leaf_cannot_have_children() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let rect = graph.add_shape(&page, NodeKind::Rectangle, "Box").unwrap();
        let err = graph.add_text(&rect, "Label", "x", inter(), (0.0, 0.0)).unwrap_err();
        assert!(matches!(err, AppError::Scene(_)));
    }
}
