//! Merging a "from" tree into a "to" tree.
//!
//! Both trees live in the same [`NodeArena`] and must already be laid out.
//! The merge matches children by name, moves the "from" nodes it needs into
//! the "to" tree and returns the mutators that animate the combined tree from
//! the old visual state to the new one. The renderer then draws the combined
//! tree like any other resolved tree.
//!
//! Matching rules:
//! - Children of a matched pair are paired by name, first match in sibling
//!   order wins.
//! - A matched pair of compatible shapes with the same paint is tweened:
//!   its children are merged recursively, its rect and arc geometry are
//!   interpolated.
//! - Any other matched pair is crossfaded; the old node is kept in the tree,
//!   just before the new one, while both travel between the two rects.
//! - A new node without a match fades in.
//! - Old nodes without a match fade out in front of the new children list.

use rune_tree::{NodeArena, NodeIdx, NodeKind, ResolvedNode, Shape};
use tracing::{debug, trace, warn};

use crate::property::AnimatedProperty;

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTransition {
    /// Root of the combined tree (the "to" root).
    pub root: NodeIdx,
    pub properties: Vec<AnimatedProperty>,
}

/// Merge the subtree at `from_start_id` (under `from_root`) into the subtree
/// at `to_start_id` (under `to_root`).
///
/// Returns `None` when either start node cannot be found, or when the start
/// nodes need a crossfade but the "to" start node has no parent to hold the
/// old one. The caller then shows the "to" tree without animation.
pub fn merge_animation(
    arena: &mut NodeArena,
    from_root: NodeIdx,
    from_start_id: &str,
    to_root: NodeIdx,
    to_start_id: &str,
) -> Option<MergedTransition> {
    let Some(from_start) = arena.find(from_root, from_start_id) else {
        debug!(from_start_id, "merge skipped: start node missing from \"from\" tree");
        return None;
    };
    let Some(to_start) = arena.find(to_root, to_start_id) else {
        debug!(to_start_id, "merge skipped: start node missing from \"to\" tree");
        return None;
    };

    let mut properties = Vec::new();
    if is_tweenable(&arena[from_start], &arena[to_start]) {
        tween_pair(arena, from_start, to_start, &mut properties);
    } else {
        let Some(to_parent) = arena[to_start].parent() else {
            debug!(to_start_id, "merge skipped: cannot crossfade a root node");
            return None;
        };
        if let Some(from_parent) = arena[from_start].parent() {
            arena.detach_child(from_parent, from_start);
        }
        crossfade_pair(arena, to_parent, from_start, to_start, &mut properties);
    }

    trace!(
        from_start_id,
        to_start_id,
        properties = properties.len(),
        "merged transition trees"
    );
    Some(MergedTransition {
        root: to_root,
        properties,
    })
}

/// Match the children of `to_parent` against the children of `from_parent`.
///
/// Consumes every child of `from_parent`: matched ones are tweened or moved
/// next to their counterpart, leftovers move to the front of `to_parent`.
pub fn merge_children(
    arena: &mut NodeArena,
    from_parent: NodeIdx,
    to_parent: NodeIdx,
    properties: &mut Vec<AnimatedProperty>,
) {
    let mut cursor = arena[to_parent].first_child();
    while let Some(to_child) = cursor {
        cursor = arena[to_child].next_sibling();

        let name = &arena[to_child].name;
        let matched = arena
            .children(from_parent)
            .find(|&candidate| arena[candidate].name == *name);

        match matched {
            Some(from_child) => {
                arena.detach_child(from_parent, from_child);
                if is_tweenable(&arena[from_child], &arena[to_child]) {
                    tween_pair(arena, from_child, to_child, properties);
                } else {
                    crossfade_pair(arena, to_parent, from_child, to_child, properties);
                }
            }
            None => properties.push(AnimatedProperty::fade_in(arena, to_child)),
        }
    }

    let leftovers = arena.take_children(from_parent);
    let mut kept = Vec::with_capacity(leftovers.len());
    for node in leftovers {
        if arena[node].layout.is_none() {
            trace!(id = %arena[node].id, "dropping unmatched node without layout");
            continue;
        }
        properties.push(AnimatedProperty::fade_out(arena, node));
        kept.push(node);
    }
    if let Err(err) = arena.prepend_children(to_parent, &kept) {
        warn!(?err, "failed to keep unmatched nodes in the transition tree");
    }
}

/// Fill or stroke changes cannot be interpolated and force a crossfade.
pub fn needs_style_tween(from: &ResolvedNode, to: &ResolvedNode) -> bool {
    from.style.fills != to.style.fills || from.style.stroke != to.style.stroke
}

/// Whether `from` can morph into `to` in place.
///
/// Rects, rounded rects, vector rects and arcs tween with their own kind.
/// Paths and text runs have no interpolation, so they only tween when
/// identical.
pub fn is_tweenable(from: &ResolvedNode, to: &ResolvedNode) -> bool {
    if needs_style_tween(from, to) {
        return false;
    }
    match (&from.kind, &to.kind) {
        (NodeKind::Container { shape: a }, NodeKind::Container { shape: b }) => match a {
            Shape::Rect { .. } => matches!(b, Shape::Rect { .. }),
            Shape::RoundRect { .. } => matches!(b, Shape::RoundRect { .. }),
            Shape::VectorRect { .. } => matches!(b, Shape::VectorRect { .. }),
            Shape::Arc(_) => matches!(b, Shape::Arc(_)),
            Shape::Path { .. } => a == b,
        },
        (NodeKind::Text { run: a }, NodeKind::Text { run: b }) => a == b,
        (NodeKind::Container { .. }, NodeKind::Text { .. })
        | (NodeKind::Text { .. }, NodeKind::Container { .. }) => false,
    }
}

fn tween_pair(
    arena: &mut NodeArena,
    from: NodeIdx,
    to: NodeIdx,
    properties: &mut Vec<AnimatedProperty>,
) {
    merge_children(arena, from, to, properties);

    if let (Some(from_rect), Some(to_rect)) = (arena[from].layout, arena[to].layout) {
        if from_rect != to_rect {
            properties.push(AnimatedProperty::LayoutInterpolate {
                target: to,
                from: from_rect,
                to: to_rect,
            });
        }
    }

    if let (Some(Shape::Arc(from_arc)), Some(Shape::Arc(to_arc))) =
        (arena[from].kind.shape(), arena[to].kind.shape())
    {
        if !from_arc.same_geometry(to_arc) {
            properties.push(AnimatedProperty::ShapeInterpolate {
                target: to,
                from: *from_arc,
                to: *to_arc,
            });
        }
    }
}

/// `from` must already be detached.
fn crossfade_pair(
    arena: &mut NodeArena,
    parent: NodeIdx,
    from: NodeIdx,
    to: NodeIdx,
    properties: &mut Vec<AnimatedProperty>,
) {
    properties.push(AnimatedProperty::fade_in(arena, to));
    properties.push(AnimatedProperty::fade_out(arena, from));

    if let (Some(from_rect), Some(to_rect)) = (arena[from].layout, arena[to].layout) {
        properties.push(AnimatedProperty::LayoutInterpolate {
            target: to,
            from: from_rect,
            to: to_rect,
        });
        properties.push(AnimatedProperty::LayoutInterpolate {
            target: from,
            from: from_rect,
            to: to_rect,
        });
    }

    if let Err(err) = arena.insert_before(parent, from, to) {
        warn!(?err, "failed to place crossfaded node in the transition tree");
    }
}
