//! Resolved node payloads: identity, shape/text content, style and layout slot.

use serde::{Deserialize, Serialize};

use crate::style::NodeStyle;

/// Identifier of a node in the visual document.
pub type NodeId = String;

/// Index of a node inside a [`NodeArena`](crate::NodeArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIdx(pub(crate) u32);

impl NodeIdx {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Computed geometry of a node, relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Interpolate towards `to`; exact at both ends.
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
        }
    }
}

/// Weighted form so that `t == 0` and `t == 1` reproduce the endpoints exactly.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeCap {
    #[default]
    None,
    Round,
    Square,
}

/// Parameters of an arc (gauge, ring, pie) shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcShape {
    pub start_angle_degrees: f32,
    pub sweep_angle_degrees: f32,
    /// Inner radius as a fraction of the outer radius.
    pub inner_radius: f32,
    pub corner_radius: f32,
    pub stroke_cap: StrokeCap,
    pub is_mask: bool,
}

impl ArcShape {
    /// True when the interpolatable parameters are equal.
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.start_angle_degrees == other.start_angle_degrees
            && self.sweep_angle_degrees == other.sweep_angle_degrees
            && self.inner_radius == other.inner_radius
            && self.corner_radius == other.corner_radius
    }

    /// Interpolate the arc parameters. Stroke cap and mask flag snap to `to`.
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            start_angle_degrees: lerp(self.start_angle_degrees, to.start_angle_degrees, t),
            sweep_angle_degrees: lerp(self.sweep_angle_degrees, to.sweep_angle_degrees, t),
            inner_radius: lerp(self.inner_radius, to.inner_radius, t),
            corner_radius: lerp(self.corner_radius, to.corner_radius, t),
            stroke_cap: to.stroke_cap,
            is_mask: to.is_mask,
        }
    }
}

/// Container geometry of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        is_mask: bool,
    },
    RoundRect {
        corner_radius: [f32; 4],
        is_mask: bool,
    },
    VectorRect {
        corner_radius: [f32; 4],
        is_mask: bool,
    },
    Arc(ArcShape),
    /// Arbitrary vector path, kept as SVG path data.
    Path {
        data: String,
        is_mask: bool,
    },
}

/// Text payload; measured by the layout collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub font_size: f32,
    pub color: [f32; 4],
    pub font_family: Option<String>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            color: [0.0, 0.0, 0.0, 1.0],
            font_family: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Container { shape: Shape },
    Text { run: TextRun },
}

impl NodeKind {
    pub fn shape(&self) -> Option<&Shape> {
        match self {
            Self::Container { shape } => Some(shape),
            Self::Text { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&TextRun> {
        match self {
            Self::Container { .. } => None,
            Self::Text { run } => Some(run),
        }
    }
}

/// One visual element after customization and variant resolution.
///
/// Tree links are arena indices: one non-owning `parent`, the head of the
/// child chain and the next sibling within the parent's chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    /// Id of the specific node instance (e.g. the selected variant).
    pub id: NodeId,
    /// Stable id that survives variant swaps.
    pub unresolved_id: NodeId,
    /// Designer-facing name; used to match children across trees.
    pub name: String,
    pub kind: NodeKind,
    pub style: NodeStyle,
    /// Filled in by the layout solver.
    pub layout: Option<LayoutRect>,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) first_child: Option<NodeIdx>,
    pub(crate) next_sibling: Option<NodeIdx>,
}

impl ResolvedNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        let id = id.into();
        Self {
            unresolved_id: id.clone(),
            id,
            name: name.into(),
            kind,
            style: NodeStyle::default(),
            layout: None,
            parent: None,
            first_child: None,
            next_sibling: None,
        }
    }

    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeIdx> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<NodeIdx> {
        self.next_sibling
    }

    /// Matches either the resolved or the stable id.
    pub fn has_id(&self, id: &str) -> bool {
        self.id == id || self.unresolved_id == id
    }
}
