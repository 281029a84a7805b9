//! Core transition types shared by the tracker, merge engine and controller.

use serde::{Deserialize, Serialize};
use std::fmt;

use rune_tree::NodeId;

use crate::timing::TransitionTiming;

/// Identifier of one variant transition, unique per tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of the two resolution passes is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeBuildPhase {
    /// Renders the "from" tree, holding changed components on their old variant.
    Base,
    /// Renders the "to" tree with the requested variants.
    TransitionTarget,
}

/// One active variant transition.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantAnimationInfo {
    pub id: AnimationId,
    /// Transition this one replaced mid-flight, if any.
    pub interrupted_id: Option<AnimationId>,
    /// Stable node id of the component instance.
    pub component_id: NodeId,
    pub component_name: String,
    pub from_variant: String,
    pub to_variant: String,
    /// Resolved id of the variant node in the "from" tree.
    pub from_node_id: NodeId,
    /// Resolved id of the variant node in the "to" tree.
    pub to_node_id: NodeId,
    pub timing: TransitionTiming,
}
