use std::{io, result::Result as StdResult};

use thiserror::Error;

use crate::{NodeId, surface::SurfaceKey};

/// Result type for boxwood operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Everything except `Geometry` and `Internal` is a configuration error: the
/// caller asked for something the tree or a layout manager cannot do. These
/// abort the triggering call and leave the tree unchanged.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// Node does not exist in the tree.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Attaching `child` under `parent` would make a node its own ancestor.
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },

    /// Child insertion index out of range.
    #[error("invalid index {index}: must be -1 or at most {len}")]
    InvalidIndex {
        /// Requested index.
        index: isize,
        /// Number of children at the time of the call.
        len: usize,
    },

    /// A layout manager was handed a constraint it does not understand.
    #[error("cannot add to layout: unknown constraint: {0}")]
    UnknownConstraint(String),

    /// A single-target layout manager was invoked on some other node.
    #[error("{manager} bound to {expected:?} cannot lay out {actual:?}")]
    ForeignTarget {
        /// Manager name.
        manager: &'static str,
        /// The target the manager was created for.
        expected: NodeId,
        /// The node it was invoked on.
        actual: NodeId,
    },

    /// The surface is already bound to a live node.
    #[error("surface {0:?} is already bound to a node")]
    SurfaceAlreadyBound(SurfaceKey),

    /// A layout manager was re-entered while already running.
    #[error("layout manager for {0:?} is already running")]
    ReentrantLayout(NodeId),

    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(String),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}
