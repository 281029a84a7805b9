//! Drives the mutators of active variant transitions from frame ticks.
//!
//! Each transition's clock starts at the first tick that sees it, so a
//! dropped frame between creation and the first tick does not skip ahead.
//! A transition that interrupted another one starts from the complement of
//! the interrupted transition's last progress instead of from zero, which
//! keeps rapid toggling free of visual jumps.

use std::collections::{BTreeMap, HashMap};

use rune_tree::{NodeArena, lerp};

use crate::property::AnimatedProperty;
use crate::timing::TransitionTiming;
use crate::tracker::VariantTracker;
use crate::types::{AnimationId, VariantAnimationInfo};

#[derive(Debug, Clone)]
struct ActiveTransition {
    timing: TransitionTiming,
    interrupted_id: Option<AnimationId>,
    properties: Vec<AnimatedProperty>,
    start_ms: Option<f64>,
    /// Effective progress at raw progress zero; fixed at the first sample.
    seed: Option<f32>,
}

#[derive(Debug, Default)]
pub struct AnimationController {
    active: BTreeMap<AnimationId, ActiveTransition>,
    last_progress: HashMap<AnimationId, f32>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the mutators produced for `info` by the latest merge.
    ///
    /// Mutators target nodes of the latest render pass, so they replace the
    /// previous ones while the clock keeps running. A new transition evicts
    /// the one it interrupted; that transition's last progress is kept until
    /// the new one samples it. An evicted transition that was never ticked
    /// leaves its starting progress behind instead, so back-to-back
    /// reversals between two ticks resolve along the chain.
    pub fn install(&mut self, info: &VariantAnimationInfo, properties: Vec<AnimatedProperty>) {
        if let Some(entry) = self.active.get_mut(&info.id) {
            entry.properties = properties;
            entry.timing = info.timing;
            return;
        }
        let evicted = info
            .interrupted_id
            .and_then(|old| self.active.remove(&old).map(|entry| (old, entry)));
        if let Some((old, entry)) = evicted {
            let progress = self.current_progress(old, &entry);
            self.last_progress.insert(old, progress);
        }
        self.active.insert(
            info.id,
            ActiveTransition {
                timing: info.timing,
                interrupted_id: info.interrupted_id,
                properties,
                start_ms: None,
                seed: None,
            },
        );
    }

    /// Advance every transition to `now_ms`, write the interpolated values
    /// into `arena` and report finished transitions to `tracker`.
    ///
    /// Returns whether any transition is still running.
    pub fn advance(
        &mut self,
        now_ms: f64,
        arena: &mut NodeArena,
        tracker: &mut VariantTracker,
    ) -> bool {
        let mut finished = Vec::new();
        for (&id, entry) in self.active.iter_mut() {
            let start = *entry.start_ms.get_or_insert(now_ms);
            let elapsed = (now_ms - start).max(0.0) as f32;

            let seed = match entry.seed {
                Some(seed) => seed,
                None => {
                    let seed = match entry.interrupted_id {
                        Some(old) if !self.last_progress.contains_key(&id) => self
                            .last_progress
                            .remove(&old)
                            .map_or(0.0, |value| (1.0 - value).clamp(0.0, 1.0)),
                        _ => 0.0,
                    };
                    entry.seed = Some(seed);
                    seed
                }
            };

            let progress = lerp(seed, 1.0, entry.timing.progress_at(elapsed));
            for property in &entry.properties {
                property.apply(arena, progress);
            }
            self.last_progress.insert(id, progress);

            if entry.timing.is_finished(elapsed) {
                finished.push(id);
            }
        }

        for id in finished {
            self.active.remove(&id);
            self.last_progress.remove(&id);
            tracker.completed_animated_variant(id);
        }
        !self.active.is_empty()
    }

    /// Write each transition's current value into a freshly merged tree.
    pub fn apply_current(&self, arena: &mut NodeArena) {
        for (id, entry) in &self.active {
            let progress = self.current_progress(*id, entry);
            for property in &entry.properties {
                property.apply(arena, progress);
            }
        }
    }

    fn current_progress(&self, id: AnimationId, entry: &ActiveTransition) -> f32 {
        if let Some(&progress) = self.last_progress.get(&id) {
            return progress;
        }
        entry
            .seed
            .or_else(|| {
                entry
                    .interrupted_id
                    .and_then(|old| self.last_progress.get(&old))
                    .map(|value| (1.0 - value).clamp(0.0, 1.0))
            })
            .unwrap_or(0.0)
    }

    /// Last sampled progress of `id`.
    pub fn progress(&self, id: AnimationId) -> Option<f32> {
        self.last_progress.get(&id).copied()
    }

    /// Drop a transition without reporting it.
    pub fn cancel(&mut self, id: AnimationId) {
        self.active.remove(&id);
        self.last_progress.remove(&id);
    }

    /// Keep only the transitions for which `live` returns true, along with
    /// the samples they may still seed from.
    pub fn retain(&mut self, mut live: impl FnMut(AnimationId) -> bool) {
        self.active.retain(|id, _| live(*id));
        let active = &self.active;
        self.last_progress.retain(|id, _| {
            active.contains_key(id)
                || active
                    .values()
                    .any(|entry| entry.seed.is_none() && entry.interrupted_id == Some(*id))
        });
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
