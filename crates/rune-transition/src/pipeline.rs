//! Two-phase render orchestration.
//!
//! A render pass resolves the document once in [`TreeBuildPhase::Base`] and,
//! only when the tracker has pending or running transitions, a second time in
//! [`TreeBuildPhase::TransitionTarget`]. Both trees share one arena, are laid
//! out, then merged per transition; the resulting combined tree is what the
//! renderer draws. Frame ticks advance the installed mutators in place.

use anyhow::{Context, Result};
use rune_tree::{LayoutSolver, NodeArena, NodeIdx, Viewport};
use tracing::{debug, trace};

use crate::controller::AnimationController;
use crate::events::TransitionEvent;
use crate::merge::merge_animation;
use crate::tracker::VariantTracker;
use crate::types::{TreeBuildPhase, VariantAnimationInfo};

/// Builds the resolved tree of the document.
///
/// Every component instance must go through [`VariantScope::select_variant`]
/// before it is resolved and report the node it produced through
/// [`VariantScope::selected_variant`].
pub trait Resolver {
    fn resolve(&mut self, arena: &mut NodeArena, scope: &mut VariantScope<'_>) -> Result<NodeIdx>;
}

/// The tracker as seen by one resolution pass.
#[derive(Debug)]
pub struct VariantScope<'a> {
    tracker: &'a mut VariantTracker,
    phase: TreeBuildPhase,
}

impl<'a> VariantScope<'a> {
    pub fn new(tracker: &'a mut VariantTracker, phase: TreeBuildPhase) -> Self {
        Self { tracker, phase }
    }

    pub fn phase(&self) -> TreeBuildPhase {
        self.phase
    }

    pub fn select_variant(&mut self, component_id: &str, requested: &str) -> String {
        self.tracker
            .select_variant(self.phase, component_id, requested)
    }

    pub fn selected_variant(&mut self, component_id: &str, component_name: &str, resolved_id: &str) {
        self.tracker
            .selected_variant(self.phase, component_id, component_name, resolved_id);
    }
}

/// Output of the latest render pass.
#[derive(Debug)]
pub struct RenderedFrame {
    pub arena: NodeArena,
    /// Root of the tree to draw.
    pub root: NodeIdx,
    /// Transitions merged into this frame.
    pub transitions: usize,
}

#[derive(Debug, Default)]
pub struct TransitionPipeline {
    tracker: VariantTracker,
    controller: AnimationController,
    frame: Option<RenderedFrame>,
}

impl TransitionPipeline {
    pub fn new(tracker: VariantTracker) -> Self {
        Self {
            tracker,
            controller: AnimationController::new(),
            frame: None,
        }
    }

    /// Resolve, lay out and merge one frame.
    pub fn render<R, L>(
        &mut self,
        resolver: &mut R,
        layout: &mut L,
        viewport: Viewport,
    ) -> Result<&RenderedFrame>
    where
        R: Resolver + ?Sized,
        L: LayoutSolver + ?Sized,
    {
        let mut arena = NodeArena::new();
        let base_root = resolver
            .resolve(
                &mut arena,
                &mut VariantScope::new(&mut self.tracker, TreeBuildPhase::Base),
            )
            .context("base resolution pass failed")?;
        layout
            .solve(&mut arena, base_root, viewport)
            .context("failed to lay out base tree")?;

        let (root, transitions) = if self.tracker.needs_transition_phase() {
            let target_root = resolver
                .resolve(
                    &mut arena,
                    &mut VariantScope::new(&mut self.tracker, TreeBuildPhase::TransitionTarget),
                )
                .context("transition target resolution pass failed")?;
            layout
                .solve(&mut arena, target_root, viewport)
                .context("failed to lay out transition target tree")?;

            let merged = self.merge_transitions(&mut arena, base_root, target_root);
            (target_root, merged)
        } else {
            (base_root, 0)
        };

        if self.tracker.after_render_phases() {
            debug!(generation = self.tracker.generation(), "variant transitions changed");
        }
        layout.end_pass();
        trace!(nodes = arena.len(), transitions, "frame rendered");

        Ok(&*self.frame.insert(RenderedFrame {
            arena,
            root,
            transitions,
        }))
    }

    fn merge_transitions(
        &mut self,
        arena: &mut NodeArena,
        base_root: NodeIdx,
        target_root: NodeIdx,
    ) -> usize {
        let infos: Vec<VariantAnimationInfo> = self.tracker.transitions().cloned().collect();
        let mut merged = 0;
        for info in &infos {
            match merge_animation(
                arena,
                base_root,
                &info.from_node_id,
                target_root,
                &info.to_node_id,
            ) {
                Some(result) => {
                    self.controller.install(info, result.properties);
                    merged += 1;
                }
                None => {
                    self.controller.cancel(info.id);
                    self.tracker.failed_animated_variant(info.id);
                }
            }
        }

        let tracker = &self.tracker;
        self.controller.retain(|id| tracker.contains(id));
        self.controller.apply_current(arena);
        merged
    }

    /// Advance running transitions to `now_ms`. Returns whether any remain.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match &mut self.frame {
            Some(frame) => self
                .controller
                .advance(now_ms, &mut frame.arena, &mut self.tracker),
            None => false,
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.controller.is_empty()
    }

    pub fn frame(&self) -> Option<&RenderedFrame> {
        self.frame.as_ref()
    }

    pub fn tracker(&self) -> &VariantTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut VariantTracker {
        &mut self.tracker
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn drain_events(&mut self) -> Vec<TransitionEvent> {
        self.tracker.drain_events()
    }
}

/// Tick `pipeline` with each timestamp from `frames` until no transition is
/// left. Returns the number of ticks performed.
pub fn drive(pipeline: &mut TransitionPipeline, frames: impl IntoIterator<Item = f64>) -> usize {
    if !pipeline.is_animating() {
        return 0;
    }
    let mut ticks = 0;
    for now_ms in frames {
        ticks += 1;
        if !pipeline.tick(now_ms) {
            break;
        }
    }
    ticks
}
