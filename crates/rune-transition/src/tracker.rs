//! Variant change detection across resolution passes.
//!
//! The resolver asks the tracker which variant to render for every component
//! instance it meets. During the [`TreeBuildPhase::Base`] pass a changed
//! component is held on its previous variant so that a "from" tree can be
//! built; the [`TreeBuildPhase::TransitionTarget`] pass then renders the
//! requested variants and the tracker turns each observed change into a
//! [`VariantAnimationInfo`].
//!
//! # Usage
//!
//! ```
//! use rune_transition::{TreeBuildPhase, VariantTracker};
//!
//! let mut tracker = VariantTracker::new();
//!
//! // First render: nothing to animate.
//! let shown = tracker.select_variant(TreeBuildPhase::Base, "toggle", "Off");
//! assert_eq!(shown, "Off");
//! tracker.after_render_phases();
//!
//! // The app asks for "On": the base pass keeps rendering "Off".
//! let shown = tracker.select_variant(TreeBuildPhase::Base, "toggle", "On");
//! assert_eq!(shown, "Off");
//! tracker.selected_variant(TreeBuildPhase::Base, "toggle", "Toggle", "toggle#off");
//! assert!(tracker.needs_transition_phase());
//!
//! let shown = tracker.select_variant(TreeBuildPhase::TransitionTarget, "toggle", "On");
//! assert_eq!(shown, "On");
//! tracker.selected_variant(TreeBuildPhase::TransitionTarget, "toggle", "Toggle", "toggle#on");
//! assert!(tracker.after_render_phases());
//! assert_eq!(tracker.transitions().count(), 1);
//! ```

use std::collections::{BTreeMap, HashMap};

use rune_config::TransitionsConfig;
use tracing::debug;

use crate::events::{EventQueue, TransitionEvent};
use crate::timing::{
    ConfiguredSelector, TimingSelection, TransitionContext, TransitionSelector, TransitionTiming,
};
use crate::types::{AnimationId, TreeBuildPhase, VariantAnimationInfo};

/// A change observed in the base pass, waiting for its target node.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTransition {
    from_variant: String,
    to_variant: String,
    from_node_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct VariantTracker {
    last_state: HashMap<String, String>,
    next_state: HashMap<String, String>,
    transitions: BTreeMap<AnimationId, VariantAnimationInfo>,
    new_transitions: HashMap<String, PendingTransition>,
    selector: Option<Box<dyn TransitionSelector>>,
    default_timing: TransitionTiming,
    next_id: u64,
    generation: u64,
    changed: bool,
    events: EventQueue,
}

impl VariantTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selector(mut self, selector: impl TransitionSelector + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Timing used when there is no selector or it defers to the default.
    pub fn with_default_timing(mut self, timing: TransitionTiming) -> Self {
        self.default_timing = timing;
        self
    }

    pub fn from_config(config: &TransitionsConfig) -> Self {
        Self::new().with_selector(ConfiguredSelector::from_config(config))
    }

    /// Pick the variant the resolver should render for `component_id`.
    pub fn select_variant(
        &mut self,
        phase: TreeBuildPhase,
        component_id: &str,
        requested: &str,
    ) -> String {
        if phase == TreeBuildPhase::TransitionTarget {
            return requested.to_string();
        }

        self.next_state
            .insert(component_id.to_string(), requested.to_string());

        if let Some(running) = self
            .transitions
            .values()
            .find(|info| info.component_id == component_id && info.to_variant == requested)
        {
            return running.from_variant.clone();
        }

        match self.last_state.get(component_id) {
            Some(last) if last != requested => {
                let last = last.clone();
                self.new_transitions.insert(
                    component_id.to_string(),
                    PendingTransition {
                        from_variant: last.clone(),
                        to_variant: requested.to_string(),
                        from_node_id: None,
                    },
                );
                last
            }
            _ => requested.to_string(),
        }
    }

    /// Report the node a component resolved to in the current pass.
    pub fn selected_variant(
        &mut self,
        phase: TreeBuildPhase,
        component_id: &str,
        component_name: &str,
        resolved_id: &str,
    ) {
        match phase {
            TreeBuildPhase::Base => {
                if let Some(pending) = self.new_transitions.get_mut(component_id) {
                    pending.from_node_id = Some(resolved_id.to_string());
                }
            }
            TreeBuildPhase::TransitionTarget => {
                let Some(pending) = self.new_transitions.remove(component_id) else {
                    return;
                };
                let Some(from_node_id) = pending.from_node_id else {
                    debug!(component_id, "variant change without a base node; not animating");
                    return;
                };
                if from_node_id == resolved_id {
                    debug!(
                        component_id,
                        node = resolved_id,
                        "variant change resolved to the same node; not animating"
                    );
                    return;
                }
                self.start_transition(
                    component_id,
                    component_name,
                    pending.from_variant,
                    pending.to_variant,
                    from_node_id,
                    resolved_id.to_string(),
                );
            }
        }
    }

    fn start_transition(
        &mut self,
        component_id: &str,
        component_name: &str,
        from_variant: String,
        to_variant: String,
        from_node_id: String,
        to_node_id: String,
    ) {
        let context = TransitionContext {
            component_id,
            component_name,
            from_variant: &from_variant,
            to_variant: &to_variant,
        };
        let selection = self
            .selector
            .as_ref()
            .map_or(TimingSelection::UseDefault, |selector| {
                selector.select(&context)
            });
        let timing = match selection {
            TimingSelection::UseDefault => self.default_timing,
            TimingSelection::Custom(timing) => timing,
            TimingSelection::Disabled => {
                debug!(component_id, %from_variant, %to_variant, "transition disabled");
                return;
            }
        };

        self.next_id += 1;
        let id = AnimationId(self.next_id);

        let interrupted_id = self
            .transitions
            .values()
            .find(|info| info.component_id == component_id)
            .map(|info| info.id);
        if let Some(old) = interrupted_id {
            self.transitions.remove(&old);
            self.events.push(TransitionEvent::Interrupted {
                id: old,
                by: id,
                component_id: component_id.to_string(),
            });
        }

        debug!(%id, component_id, %from_variant, %to_variant, "variant transition started");
        self.events.push(TransitionEvent::Started {
            id,
            component_id: component_id.to_string(),
            from_variant: from_variant.clone(),
            to_variant: to_variant.clone(),
        });
        self.transitions.insert(
            id,
            VariantAnimationInfo {
                id,
                interrupted_id,
                component_id: component_id.to_string(),
                component_name: component_name.to_string(),
                from_variant,
                to_variant,
                from_node_id,
                to_node_id,
                timing,
            },
        );
        self.mark_changed();
    }

    /// Finish a full resolution pass. Returns true when transitions were
    /// added or removed since the previous call.
    pub fn after_render_phases(&mut self) -> bool {
        self.last_state = std::mem::take(&mut self.next_state);
        self.new_transitions.clear();
        std::mem::take(&mut self.changed)
    }

    /// Whether the orchestrator must build a transition-target tree.
    pub fn needs_transition_phase(&self) -> bool {
        !self.new_transitions.is_empty() || !self.transitions.is_empty()
    }

    /// The controller finished animating `id`.
    pub fn completed_animated_variant(&mut self, id: AnimationId) {
        if let Some(info) = self.transitions.remove(&id) {
            debug!(%id, component_id = %info.component_id, "variant transition finished");
            self.events.push(TransitionEvent::Ended {
                id,
                component_id: info.component_id,
            });
            self.mark_changed();
        }
    }

    /// The merge produced nothing to animate for `id`.
    pub fn failed_animated_variant(&mut self, id: AnimationId) {
        if let Some(info) = self.transitions.remove(&id) {
            debug!(%id, component_id = %info.component_id, "variant transition dropped");
            self.events.push(TransitionEvent::Failed {
                id,
                component_id: info.component_id,
            });
            self.mark_changed();
        }
    }

    fn mark_changed(&mut self) {
        self.changed = true;
        self.generation += 1;
    }

    /// Active transitions in creation order.
    pub fn transitions(&self) -> impl Iterator<Item = &VariantAnimationInfo> {
        self.transitions.values()
    }

    pub fn transition(&self, id: AnimationId) -> Option<&VariantAnimationInfo> {
        self.transitions.get(&id)
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.transitions.contains_key(&id)
    }

    /// Bumped whenever a transition is added or removed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<TransitionEvent> {
        self.events.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;
    use rune_config::TimingConfig;

    const BASE: TreeBuildPhase = TreeBuildPhase::Base;
    const TARGET: TreeBuildPhase = TreeBuildPhase::TransitionTarget;

    /// Run both passes for one component, returning the variant shown by the
    /// base pass.
    fn render(tracker: &mut VariantTracker, requested: &str) -> String {
        let base = tracker.select_variant(BASE, "toggle", requested);
        tracker.selected_variant(BASE, "toggle", "Toggle", &format!("toggle#{base}"));
        if tracker.needs_transition_phase() {
            let target = tracker.select_variant(TARGET, "toggle", requested);
            tracker.selected_variant(TARGET, "toggle", "Toggle", &format!("toggle#{target}"));
        }
        tracker.after_render_phases();
        base
    }

    #[test]
    fn test_first_render_never_animates() {
        let mut tracker = VariantTracker::new();
        assert_eq!(render(&mut tracker, "Off"), "Off");
        assert!(!tracker.needs_transition_phase());
        assert_eq!(tracker.transitions().count(), 0);
    }

    #[test]
    fn test_change_holds_old_variant_and_starts_transition() {
        let mut tracker = VariantTracker::new();
        render(&mut tracker, "Off");

        assert_eq!(render(&mut tracker, "On"), "Off");
        let info = tracker.transitions().next().cloned().unwrap();
        assert_eq!(info.from_variant, "Off");
        assert_eq!(info.to_variant, "On");
        assert_eq!(info.from_node_id, "toggle#Off");
        assert_eq!(info.to_node_id, "toggle#On");
        assert_eq!(info.component_name, "Toggle");
        assert_eq!(info.interrupted_id, None);
        assert_eq!(info.timing, TransitionTiming::default());

        // Still running: the base pass keeps showing the from variant.
        assert_eq!(render(&mut tracker, "On"), "Off");
        assert_eq!(tracker.transitions().count(), 1);

        tracker.completed_animated_variant(info.id);
        assert_eq!(render(&mut tracker, "On"), "On");
        assert!(!tracker.needs_transition_phase());

        let events = tracker.drain_events();
        assert!(matches!(events[0], TransitionEvent::Started { .. }));
        assert!(matches!(events[1], TransitionEvent::Ended { .. }));
    }

    #[test]
    fn test_reversal_interrupts_running_transition() {
        let mut tracker = VariantTracker::new();
        render(&mut tracker, "Off");
        render(&mut tracker, "On");
        let first = tracker.transitions().next().map(|i| i.id).unwrap();

        assert_eq!(render(&mut tracker, "Off"), "On");
        let infos: Vec<_> = tracker.transitions().cloned().collect();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].interrupted_id, Some(first));
        assert_eq!(infos[0].from_variant, "On");
        assert_eq!(infos[0].to_variant, "Off");
        assert!(!tracker.contains(first));

        let events = tracker.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            TransitionEvent::Interrupted { id, .. } if *id == first
        )));
    }

    #[test]
    fn test_same_node_is_not_animated() {
        let mut tracker = VariantTracker::new();
        tracker.select_variant(BASE, "c", "A");
        tracker.after_render_phases();

        tracker.select_variant(BASE, "c", "B");
        tracker.selected_variant(BASE, "c", "C", "shared");
        tracker.selected_variant(TARGET, "c", "C", "shared");
        assert!(!tracker.after_render_phases());
        assert!(!tracker.needs_transition_phase());
    }

    #[test]
    fn test_disabled_selection_snaps() {
        let mut config = TransitionsConfig::default();
        config
            .overrides
            .insert("Toggle".to_string(), TimingConfig::Disabled);
        let mut tracker = VariantTracker::from_config(&config);
        render(&mut tracker, "Off");
        render(&mut tracker, "On");
        assert_eq!(tracker.transitions().count(), 0);
        assert_eq!(render(&mut tracker, "On"), "On");
    }

    #[test]
    fn test_selector_and_default_timing() {
        #[derive(Debug)]
        struct OnlyOn;
        impl TransitionSelector for OnlyOn {
            fn select(&self, context: &TransitionContext<'_>) -> TimingSelection {
                if context.to_variant == "On" {
                    TimingSelection::Custom(TransitionTiming::tween(80.0, EasingFunction::Linear))
                } else {
                    TimingSelection::UseDefault
                }
            }
        }
        let fallback = TransitionTiming::tween(200.0, EasingFunction::Ease);
        let mut tracker = VariantTracker::new()
            .with_selector(OnlyOn)
            .with_default_timing(fallback);
        render(&mut tracker, "Off");
        render(&mut tracker, "On");
        let timing = tracker.transitions().next().map(|i| i.timing);
        assert_eq!(
            timing,
            Some(TransitionTiming::tween(80.0, EasingFunction::Linear))
        );

        render(&mut tracker, "Off");
        let timing = tracker.transitions().next().map(|i| i.timing);
        assert_eq!(timing, Some(fallback));
    }

    #[test]
    fn test_failure_drops_transition_and_bumps_generation() {
        let mut tracker = VariantTracker::new();
        render(&mut tracker, "Off");
        render(&mut tracker, "On");
        let generation = tracker.generation();
        let id = tracker.transitions().next().map(|i| i.id).unwrap();

        tracker.failed_animated_variant(id);
        assert!(!tracker.contains(id));
        assert_eq!(tracker.generation(), generation + 1);
        assert_eq!(render(&mut tracker, "On"), "On");
        assert!(tracker
            .drain_events()
            .iter()
            .any(|e| matches!(e, TransitionEvent::Failed { .. })));
    }
}
