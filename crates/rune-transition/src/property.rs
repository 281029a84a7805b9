//! Animated properties: the mutators a merge produces.
//!
//! Each mutator targets one node of the combined transition tree and writes
//! an interpolated value into it. `apply(0.0)` reproduces the "from" state
//! and `apply(1.0)` the "to" state.

use rune_tree::{ArcShape, LayoutRect, NodeArena, NodeIdx, NodeKind, Shape};

#[derive(Debug, Clone, PartialEq)]
pub enum AnimatedProperty {
    /// Fades a newly visible node in from transparent.
    FadeIn { target: NodeIdx, opacity: f32 },
    /// Fades a disappearing node out.
    FadeOut { target: NodeIdx, opacity: f32 },
    LayoutInterpolate {
        target: NodeIdx,
        from: LayoutRect,
        to: LayoutRect,
    },
    /// Arc parameters only; stroke cap and mask flag snap to `to`.
    ShapeInterpolate {
        target: NodeIdx,
        from: ArcShape,
        to: ArcShape,
    },
}

impl AnimatedProperty {
    /// Fade in towards the node's current opacity.
    pub fn fade_in(arena: &NodeArena, target: NodeIdx) -> Self {
        Self::FadeIn {
            target,
            opacity: arena[target].style.opacity,
        }
    }

    /// Fade out from the node's current opacity.
    pub fn fade_out(arena: &NodeArena, target: NodeIdx) -> Self {
        Self::FadeOut {
            target,
            opacity: arena[target].style.opacity,
        }
    }

    pub fn target(&self) -> NodeIdx {
        match *self {
            Self::FadeIn { target, .. }
            | Self::FadeOut { target, .. }
            | Self::LayoutInterpolate { target, .. }
            | Self::ShapeInterpolate { target, .. } => target,
        }
    }

    /// Write the value at `progress` into the target node.
    ///
    /// Progress outside `[0, 1]` is allowed (spring overshoot); fades clamp
    /// the resulting opacity.
    pub fn apply(&self, arena: &mut NodeArena, progress: f32) {
        let Some(node) = arena.get_mut(self.target()) else {
            return;
        };
        match self {
            Self::FadeIn { opacity, .. } => {
                node.style.opacity = (opacity * progress).max(0.0).min(*opacity);
            }
            Self::FadeOut { opacity, .. } => {
                node.style.opacity = (opacity * (1.0 - progress)).max(0.0).min(*opacity);
            }
            Self::LayoutInterpolate { from, to, .. } => {
                node.layout = Some(from.lerp(to, progress));
            }
            Self::ShapeInterpolate { from, to, .. } => {
                node.kind = NodeKind::Container {
                    shape: Shape::Arc(from.lerp(to, progress)),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rune_tree::{NodeBuilder, StrokeCap};

    #[test]
    fn test_fades_hit_both_ends() {
        let mut arena = NodeArena::new();
        let node = NodeBuilder::rect("a", "A").opacity(0.8).build(&mut arena);
        let fade_in = AnimatedProperty::fade_in(&arena, node);
        let fade_out = AnimatedProperty::fade_out(&arena, node);

        fade_in.apply(&mut arena, 0.0);
        assert_eq!(arena[node].style.opacity, 0.0);
        fade_in.apply(&mut arena, 1.0);
        assert_eq!(arena[node].style.opacity, 0.8);

        fade_out.apply(&mut arena, 0.0);
        assert_eq!(arena[node].style.opacity, 0.8);
        fade_out.apply(&mut arena, 0.25);
        assert!((arena[node].style.opacity - 0.6).abs() < 1e-6);
        fade_out.apply(&mut arena, 1.0);
        assert_eq!(arena[node].style.opacity, 0.0);
    }

    #[test]
    fn test_fade_clamps_overshoot() {
        let mut arena = NodeArena::new();
        let node = NodeBuilder::rect("a", "A").build(&mut arena);
        let fade_in = AnimatedProperty::fade_in(&arena, node);
        fade_in.apply(&mut arena, 1.2);
        assert_eq!(arena[node].style.opacity, 1.0);
    }

    #[test]
    fn test_layout_interpolation_hits_both_ends() {
        let mut arena = NodeArena::new();
        let node = NodeBuilder::rect("a", "A").build(&mut arena);
        let from = LayoutRect::new(0.0, 0.0, 10.0, 10.0);
        let to = LayoutRect::new(20.0, 5.0, 30.0, 12.0);
        let property = AnimatedProperty::LayoutInterpolate {
            target: node,
            from,
            to,
        };

        property.apply(&mut arena, 0.0);
        assert_eq!(arena[node].layout, Some(from));
        property.apply(&mut arena, 1.0);
        assert_eq!(arena[node].layout, Some(to));
        property.apply(&mut arena, 0.5);
        assert_eq!(arena[node].layout, Some(LayoutRect::new(10.0, 2.5, 20.0, 11.0)));
    }

    #[test]
    fn test_arc_interpolation_hits_both_ends() {
        let from = ArcShape {
            sweep_angle_degrees: 30.0,
            inner_radius: 0.5,
            ..Default::default()
        };
        let to = ArcShape {
            start_angle_degrees: 90.0,
            sweep_angle_degrees: 270.0,
            inner_radius: 0.8,
            corner_radius: 4.0,
            stroke_cap: StrokeCap::Round,
            is_mask: false,
        };
        let mut arena = NodeArena::new();
        let node = NodeBuilder::arc("g", "Gauge", from).build(&mut arena);
        let property = AnimatedProperty::ShapeInterpolate {
            target: node,
            from,
            to,
        };

        property.apply(&mut arena, 0.0);
        let Some(Shape::Arc(start)) = arena[node].kind.shape().cloned() else {
            panic!("not an arc");
        };
        assert!(start.same_geometry(&from));

        property.apply(&mut arena, 1.0);
        assert_eq!(arena[node].kind.shape(), Some(&Shape::Arc(to)));

        property.apply(&mut arena, 0.5);
        let Some(Shape::Arc(mid)) = arena[node].kind.shape().cloned() else {
            panic!("not an arc");
        };
        assert_eq!(mid.sweep_angle_degrees, 150.0);
        assert_eq!(mid.stroke_cap, StrokeCap::Round);
    }
}
