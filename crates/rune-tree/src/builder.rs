//! Fluent construction of resolved subtrees.
//!
//! ```
//! use rune_tree::{NodeArena, NodeBuilder, Paint};
//!
//! let mut arena = NodeArena::new();
//! let root = NodeBuilder::rect("screen", "Screen")
//!     .size(320.0, 240.0)
//!     .child(NodeBuilder::text("title", "Title", "Hello", 16.0))
//!     .child(NodeBuilder::rect("button", "Button").fill(Paint::solid([0.2, 0.4, 1.0, 1.0])))
//!     .build(&mut arena);
//! assert_eq!(arena.children(root).count(), 2);
//! ```

use crate::arena::NodeArena;
use crate::node::{ArcShape, LayoutRect, NodeIdx, NodeKind, ResolvedNode, Shape, TextRun};
use crate::style::{Align, Dimension, EdgeInsets, FlexDirection, Justify, Paint, PositionType};

#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: ResolvedNode,
    children: Vec<NodeBuilder>,
}

impl NodeBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            node: ResolvedNode::new(id, name, kind),
            children: Vec::new(),
        }
    }

    fn container(id: impl Into<String>, name: impl Into<String>, shape: Shape) -> Self {
        Self::new(id, name, NodeKind::Container { shape })
    }

    pub fn rect(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::container(id, name, Shape::Rect { is_mask: false })
    }

    pub fn round_rect(id: impl Into<String>, name: impl Into<String>, radius: f32) -> Self {
        Self::container(
            id,
            name,
            Shape::RoundRect {
                corner_radius: [radius; 4],
                is_mask: false,
            },
        )
    }

    pub fn vector_rect(id: impl Into<String>, name: impl Into<String>, radius: f32) -> Self {
        Self::container(
            id,
            name,
            Shape::VectorRect {
                corner_radius: [radius; 4],
                is_mask: false,
            },
        )
    }

    pub fn arc(id: impl Into<String>, name: impl Into<String>, arc: ArcShape) -> Self {
        Self::container(id, name, Shape::Arc(arc))
    }

    pub fn path(id: impl Into<String>, name: impl Into<String>, data: impl Into<String>) -> Self {
        Self::container(
            id,
            name,
            Shape::Path {
                data: data.into(),
                is_mask: false,
            },
        )
    }

    pub fn text(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self::new(
            id,
            name,
            NodeKind::Text {
                run: TextRun::new(text, font_size),
            },
        )
    }

    pub fn unresolved_id(mut self, id: impl Into<String>) -> Self {
        self.node.unresolved_id = id.into();
        self
    }

    pub fn fill(mut self, paint: Paint) -> Self {
        self.node.style.fills.push(paint);
        self
    }

    pub fn stroke(mut self, weight: f32, paint: Paint) -> Self {
        self.node.style.stroke.weight = weight;
        self.node.style.stroke.paints.push(paint);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.node.style.opacity = opacity;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.node.style.layout.width = Dimension::Points(width);
        self.node.style.layout.height = Dimension::Points(height);
        self
    }

    pub fn absolute(mut self, left: f32, top: f32) -> Self {
        let layout = &mut self.node.style.layout;
        layout.position = PositionType::Absolute;
        layout.left = Some(left);
        layout.top = Some(top);
        self
    }

    pub fn direction(mut self, direction: FlexDirection) -> Self {
        self.node.style.layout.flex_direction = direction;
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.node.style.layout.padding = EdgeInsets::uniform(padding);
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.node.style.layout.gap = gap;
        self
    }

    pub fn align(mut self, align: Align, justify: Justify) -> Self {
        self.node.style.layout.align_items = Some(align);
        self.node.style.layout.justify_content = Some(justify);
        self
    }

    /// Preset a computed rectangle, bypassing the layout solver.
    pub fn layout(mut self, rect: LayoutRect) -> Self {
        self.node.layout = Some(rect);
        self
    }

    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn id(&self) -> &str {
        &self.node.id
    }

    /// Allocate the subtree into `arena` and return its detached root.
    pub fn build(self, arena: &mut NodeArena) -> NodeIdx {
        let idx = arena.alloc(self.node);
        for child in self.children {
            let child_idx = child.build(arena);
            arena.link_last(idx, child_idx);
        }
        idx
    }
}
