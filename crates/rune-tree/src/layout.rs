//! Layout contract and a taffy-backed flexbox solver.
//!
//! The transition engine only needs one rectangle per node. A
//! [`LayoutSolver`] writes those rectangles into each node's layout slot;
//! coordinates are parent-relative, exactly as taffy reports `location`.

use taffy::prelude::*;
use tracing::trace;

use crate::arena::NodeArena;
use crate::cache::GenerationalCache;
use crate::error::LayoutError;
use crate::node::{LayoutRect, NodeIdx, NodeKind, TextRun};
use crate::style::{self, LayoutStyle, PositionType};

/// Space offered to the root of a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Computes a [`LayoutRect`] for every node reachable from `root`.
pub trait LayoutSolver {
    fn solve(
        &mut self,
        arena: &mut NodeArena,
        root: NodeIdx,
        viewport: Viewport,
    ) -> Result<(), LayoutError>;

    /// Called once per full resolution pass, after every tree is laid out.
    fn end_pass(&mut self) {}
}

/// Measures text runs for leaf sizing.
pub trait TextMeasure {
    /// Returns `(width, height)` of `run` wrapped to `max_width` if given.
    fn measure(&self, run: &TextRun, max_width: Option<f32>) -> (f32, f32);
}

/// Fixed-advance estimate: every character is `0.6em` wide, lines are `1.2em`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasure;

impl TextMeasure for ApproximateTextMeasure {
    fn measure(&self, run: &TextRun, max_width: Option<f32>) -> (f32, f32) {
        let advance = run.font_size * 0.6;
        let line_height = run.font_size * 1.2;
        let chars = run.text.chars().count() as f32;
        let natural = chars * advance;
        match max_width {
            Some(max) if max > 0.0 && natural > max && advance > 0.0 => {
                let per_line = (max / advance).floor().max(1.0);
                let lines = (chars / per_line).ceil();
                (per_line * advance, lines * line_height)
            }
            _ => (natural, line_height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextKey {
    text: String,
    font_size: u32,
    max_width: Option<u32>,
}

impl TextKey {
    fn new(run: &TextRun, max_width: Option<f32>) -> Self {
        Self {
            text: run.text.clone(),
            font_size: run.font_size.to_bits(),
            max_width: max_width.map(f32::to_bits),
        }
    }
}

/// Flexbox layout through taffy, with cached text measurement.
#[derive(Debug)]
pub struct FlexLayoutSolver<M = ApproximateTextMeasure> {
    measure: M,
    text_cache: GenerationalCache<TextKey, (f32, f32)>,
}

impl Default for FlexLayoutSolver<ApproximateTextMeasure> {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexLayoutSolver<ApproximateTextMeasure> {
    pub fn new() -> Self {
        Self::with_measure(ApproximateTextMeasure)
    }
}

impl<M: TextMeasure> FlexLayoutSolver<M> {
    pub fn with_measure(measure: M) -> Self {
        Self {
            measure,
            text_cache: GenerationalCache::new(),
        }
    }

    pub fn cached_measurements(&self) -> usize {
        self.text_cache.len()
    }
}

impl<M: TextMeasure> LayoutSolver for FlexLayoutSolver<M> {
    fn solve(
        &mut self,
        arena: &mut NodeArena,
        root: NodeIdx,
        viewport: Viewport,
    ) -> Result<(), LayoutError> {
        if arena.get(root).is_none() {
            return Err(LayoutError::MissingNode(root));
        }

        let mut taffy: TaffyTree<NodeIdx> = TaffyTree::new();
        let mut mapping = Vec::new();
        let taffy_root = build_node(&mut taffy, arena, root, &mut mapping)?;

        // The root fills the viewport unless it asks for a size.
        let mut root_style = taffy.style(taffy_root).map_err(solver_error)?.clone();
        if root_style.size.width == Dimension::Auto {
            root_style.size.width = Dimension::Length(viewport.width);
        }
        if root_style.size.height == Dimension::Auto {
            root_style.size.height = Dimension::Length(viewport.height);
        }
        taffy
            .set_style(taffy_root, root_style)
            .map_err(solver_error)?;

        let available = Size {
            width: AvailableSpace::Definite(viewport.width),
            height: AvailableSpace::Definite(viewport.height),
        };

        let Self {
            measure,
            text_cache,
        } = self;
        let nodes: &NodeArena = arena;
        taffy
            .compute_layout_with_measure(
                taffy_root,
                available,
                |known, available_space, _, context, _| {
                    let zero = Size {
                        width: 0.0,
                        height: 0.0,
                    };
                    let Some(idx) = context.map(|idx| *idx) else {
                        return zero;
                    };
                    if let (Some(width), Some(height)) = (known.width, known.height) {
                        return Size { width, height };
                    }
                    let Some(run) = nodes.get(idx).and_then(|node| node.kind.text()) else {
                        return zero;
                    };
                    let max_width = known.width.or(match available_space.width {
                        AvailableSpace::Definite(width) => Some(width),
                        _ => None,
                    });
                    let key = TextKey::new(run, max_width);
                    let (width, height) = match text_cache.get(&key) {
                        Some(size) => *size,
                        None => {
                            let size = measure.measure(run, max_width);
                            text_cache.insert(key, size);
                            size
                        }
                    };
                    Size {
                        width: known.width.unwrap_or(width),
                        height: known.height.unwrap_or(height),
                    }
                },
            )
            .map_err(solver_error)?;

        for (idx, taffy_node) in mapping {
            let layout = taffy.layout(taffy_node).map_err(solver_error)?;
            arena[idx].layout = Some(LayoutRect::new(
                layout.location.x,
                layout.location.y,
                layout.size.width,
                layout.size.height,
            ));
        }
        trace!(nodes = arena.walk(root).len(), "layout solved");
        Ok(())
    }

    fn end_pass(&mut self) {
        let evicted = self.text_cache.collect();
        if evicted > 0 {
            trace!(evicted, "text measurements evicted");
        }
    }
}

fn solver_error(err: impl std::fmt::Display) -> LayoutError {
    LayoutError::Solver(err.to_string())
}

fn build_node(
    taffy: &mut TaffyTree<NodeIdx>,
    arena: &NodeArena,
    idx: NodeIdx,
    mapping: &mut Vec<(NodeIdx, taffy::NodeId)>,
) -> Result<taffy::NodeId, LayoutError> {
    let node = arena.get(idx).ok_or(LayoutError::MissingNode(idx))?;
    let style = taffy_style(&node.style.layout);

    let children: Vec<NodeIdx> = arena.children(idx).collect();
    let taffy_node = if children.is_empty() {
        match node.kind {
            NodeKind::Text { .. } => taffy.new_leaf_with_context(style, idx),
            NodeKind::Container { .. } => taffy.new_leaf(style),
        }
    } else {
        let mut child_nodes = Vec::with_capacity(children.len());
        for child in children {
            child_nodes.push(build_node(taffy, arena, child, mapping)?);
        }
        taffy.new_with_children(style, &child_nodes)
    }
    .map_err(solver_error)?;

    mapping.push((idx, taffy_node));
    Ok(taffy_node)
}

fn dimension(value: style::Dimension) -> Dimension {
    match value {
        style::Dimension::Auto => Dimension::Auto,
        style::Dimension::Points(points) => Dimension::Length(points),
        style::Dimension::Percent(percent) => Dimension::Percent(percent),
    }
}

fn inset(value: Option<f32>) -> LengthPercentageAuto {
    value.map_or(LengthPercentageAuto::Auto, LengthPercentageAuto::Length)
}

fn taffy_style(layout: &LayoutStyle) -> Style {
    Style {
        display: Display::Flex,
        position: match layout.position {
            PositionType::Relative => Position::Relative,
            PositionType::Absolute => Position::Absolute,
        },
        inset: taffy::Rect {
            left: inset(layout.left),
            right: LengthPercentageAuto::Auto,
            top: inset(layout.top),
            bottom: LengthPercentageAuto::Auto,
        },
        size: Size {
            width: dimension(layout.width),
            height: dimension(layout.height),
        },
        flex_direction: match layout.flex_direction {
            style::FlexDirection::Row => FlexDirection::Row,
            style::FlexDirection::Column => FlexDirection::Column,
        },
        padding: taffy::Rect {
            left: LengthPercentage::Length(layout.padding.left),
            right: LengthPercentage::Length(layout.padding.right),
            top: LengthPercentage::Length(layout.padding.top),
            bottom: LengthPercentage::Length(layout.padding.bottom),
        },
        gap: Size {
            width: LengthPercentage::Length(layout.gap),
            height: LengthPercentage::Length(layout.gap),
        },
        align_items: layout.align_items.map(|align| match align {
            style::Align::Start => AlignItems::Start,
            style::Align::Center => AlignItems::Center,
            style::Align::End => AlignItems::End,
            style::Align::Stretch => AlignItems::Stretch,
        }),
        justify_content: layout.justify_content.map(|justify| match justify {
            style::Justify::Start => JustifyContent::Start,
            style::Justify::Center => JustifyContent::Center,
            style::Justify::End => JustifyContent::End,
            style::Justify::SpaceBetween => JustifyContent::SpaceBetween,
        }),
        flex_shrink: 0.0,
        ..Default::default()
    }
}
