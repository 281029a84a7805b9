use thiserror::Error;

use crate::node::NodeIdx;

/// Structural errors raised by arena edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0:?} is not part of this arena")]
    UnknownNode(NodeIdx),

    #[error("node {child:?} is still attached to {parent:?}")]
    AlreadyAttached { child: NodeIdx, parent: NodeIdx },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { child: NodeIdx, parent: NodeIdx },
}

/// Errors raised while computing layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout solver failed: {0}")]
    Solver(String),

    #[error("node {0:?} is missing from the layout tree")]
    MissingNode(NodeIdx),
}
