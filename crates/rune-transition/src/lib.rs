//! Variant transitions for resolved visual documents.
//!
//! When a component instance switches from one variant to another, this
//! crate builds the tree of the old variant and the tree of the new one,
//! merges them into a single combined tree and animates it between the two
//! visual states.
//!
//! # Architecture
//!
//! ```text
//! TransitionPipeline
//!   ├── VariantTracker       (variant selection per pass, transition bookkeeping)
//!   ├── Resolver             (host document → resolved tree, per phase)
//!   ├── LayoutSolver         (rune-tree)
//!   ├── merge_animation      (combined tree + AnimatedProperty list)
//!   └── AnimationController  (frame ticks → mutator progress)
//! ```
//!
//! Timing comes from [`TransitionTiming`] (tween or spring); the configured
//! [`ConfiguredSelector`] picks it per component from `rune.toml`.

pub mod controller;
pub mod easing;
pub mod events;
pub mod merge;
pub mod pipeline;
pub mod property;
pub mod spring;
pub mod timing;
pub mod tracker;
pub mod types;

pub use controller::AnimationController;
pub use easing::EasingFunction;
pub use events::{EventQueue, TransitionEvent};
pub use merge::{MergedTransition, is_tweenable, merge_animation, merge_children, needs_style_tween};
pub use pipeline::{RenderedFrame, Resolver, TransitionPipeline, VariantScope, drive};
pub use property::AnimatedProperty;
pub use spring::SpringSpec;
pub use timing::{
    ConfiguredSelector, TimingSelection, TransitionContext, TransitionSelector, TransitionTiming,
};
pub use tracker::VariantTracker;
pub use types::{AnimationId, TreeBuildPhase, VariantAnimationInfo};
