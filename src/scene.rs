//! Scene graph abstraction
//!
//! The document tree is owned by the host. The core only talks to it through
//! [`SceneGraph`] using [`NodeId`] handles, so it can run against the live
//! host or against [`memory::MemorySceneGraph`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::error::AppResult;

pub mod memory;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Page,
    Frame,
    Group,
    Component,
    Instance,
    Section,
    Text,
    Rectangle,
    Ellipse,
    Vector,
}

impl NodeKind {
    /// Node kinds that carry a `children` list.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Page
                | NodeKind::Frame
                | NodeKind::Group
                | NodeKind::Component
                | NodeKind::Instance
                | NodeKind::Section
        )
    }

    pub fn is_text(self) -> bool {
        self == NodeKind::Text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// Same family, different style.
    pub fn with_style(&self, style: &str) -> Self {
        Self::new(self.family.clone(), style)
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// 2x3 affine transform `[[a, c, tx], [b, d, ty]]`, same layout as the host's
/// `absoluteTransform`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [[f64; 3]; 2]);

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self([[1.0, 0.0, x], [0.0, 1.0, y]])
    }

    pub fn tx(&self) -> f64 {
        self.0[0][2]
    }

    pub fn ty(&self) -> f64 {
        self.0[1][2]
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [[a, c, tx], [b, d, ty]] = self.0;
        (a * x + c * y + tx, b * x + d * y + ty)
    }

    /// `self * other`: apply `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let [[a1, c1, tx1], [b1, d1, ty1]] = self.0;
        let [[a2, c2, tx2], [b2, d2, ty2]] = other.0;
        Transform([
            [a1 * a2 + c1 * b2, a1 * c2 + c1 * d2, a1 * tx2 + c1 * ty2 + tx1],
            [b1 * a2 + d1 * b2, b1 * c2 + d1 * d2, b1 * tx2 + d1 * ty2 + ty1],
        ])
    }

    /// Inverse transform, `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Transform> {
        let [[a, c, tx], [b, d, ty]] = self.0;
        let det = a * d - b * c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;
        Some(Transform([
            [ia, ic, -(ia * tx + ic * ty)],
            [ib, id, -(ib * tx + id * ty)],
        ]))
    }
}

/// Snapshot of the node properties the translator reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub visible: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Position relative to the parent.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub absolute_transform: Transform,
    pub characters: Option<String>,
    pub font_name: Option<FontName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    None,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizingMode {
    Auto,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAutoResize {
    None,
    Height,
    WidthAndHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Properties of a frame created by the plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameProps {
    pub name: String,
    pub layout_mode: LayoutMode,
    pub counter_axis_sizing: SizingMode,
    pub opacity: f64,
    pub strokes: Vec<Rgb>,
    pub padding: Padding,
}

/// Live access to the host document.
///
/// Mutations are applied immediately; there is no transaction.
pub trait SceneGraph: Send + Sync {
    /// Current page selection, in selection order.
    fn selection(&self) -> Vec<NodeId>;

    fn node(&self, id: &NodeId) -> Option<SceneNode>;

    /// Fails when the node's font is not loaded.
    fn set_characters(&self, id: &NodeId, characters: &str) -> AppResult<()>;

    /// Creates a detached frame.
    fn create_frame(&self, props: FrameProps) -> AppResult<NodeId>;

    /// Creates a detached text node. Fails when `font` is not loaded.
    fn create_text(&self, font: &FontName, characters: &str) -> AppResult<NodeId>;

    /// Appends `child` as the last child of `parent`.
    fn append_child(&self, parent: &NodeId, child: &NodeId) -> AppResult<()>;

    /// Moves a node, in its parent's coordinate space.
    fn set_position(&self, id: &NodeId, x: f64, y: f64) -> AppResult<()>;

    fn set_counter_axis_sizing(&self, id: &NodeId, mode: SizingMode) -> AppResult<()>;

    fn set_text_auto_resize(&self, id: &NodeId, mode: TextAutoResize) -> AppResult<()>;

    fn resize(&self, id: &NodeId, width: f64, height: f64) -> AppResult<()>;

    /// Detaches a node and destroys it along with its descendants.
    fn remove(&self, id: &NodeId) -> AppResult<()>;

    fn children(&self, id: &NodeId) -> Vec<NodeId> {
        self.node(id).map(|n| n.children).unwrap_or_default()
    }

    fn characters(&self, id: &NodeId) -> Option<String> {
        self.node(id).and_then(|n| n.characters)
    }
}
