//! Resolved visual-document trees.
//!
//! A resolution pass turns the declarative document into [`ResolvedNode`]s
//! stored in a [`NodeArena`]. The arena keeps an intrusive first-child /
//! next-sibling tree so subtrees can be spliced between trees in constant
//! time, which is what the variant transition merge relies on.
//!
//! # Architecture
//!
//! ```text
//! NodeArena
//!   ├── ResolvedNode (ids, shape/text, style, layout slot, links)
//!   └── NodeBuilder  (fluent subtree construction)
//!
//! LayoutSolver
//!   └── FlexLayoutSolver (taffy + cached TextMeasure)
//! ```

pub mod arena;
pub mod builder;
pub mod cache;
pub mod error;
pub mod layout;
pub mod node;
pub mod style;

pub use arena::{Children, NodeArena};
pub use builder::NodeBuilder;
pub use cache::GenerationalCache;
pub use error::{LayoutError, TreeError};
pub use layout::{ApproximateTextMeasure, FlexLayoutSolver, LayoutSolver, TextMeasure, Viewport};
pub use node::{
    ArcShape, LayoutRect, NodeId, NodeIdx, NodeKind, ResolvedNode, Shape, StrokeCap, TextRun, lerp,
};
pub use style::{
    Align, Dimension, EdgeInsets, FlexDirection, GradientStop, Justify, LayoutStyle, NodeStyle,
    Paint, PositionType, Stroke, Transform2D,
};
