//! Boxwood: constraint-based box layout for a retained tree of views.
//!
//! Every node in a [`Tree`] reports minimum, preferred and maximum sizes and
//! an alignment. A [`LayoutManager`] attached to a node turns its children's
//! requirements into concrete bounds. Three managers are provided: a tiling
//! [`BoxLayout`], a row-wrapping [`FlowLayout`] and a five-region
//! [`BorderLayout`].
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Tree`] - The node arena and its structural and sizing operations
//! - [`Surface`] - The trait a visual target implements to be laid out
//! - [`LayoutManager`] - The trait implemented by all layout strategies
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Point, Size, Insets)
//! - [`requirements`] - One-axis size requirements and the arithmetic on them
//! - [`layout`] - Layout managers

#![warn(missing_docs)]

/// Debug dump of a laid-out subtree.
pub mod dump;
/// Error types.
pub mod error;
/// Node identifiers.
mod id;
/// Layout managers.
pub mod layout;
/// Node storage.
pub mod node;
/// Size requirements.
pub mod requirements;
/// Visual targets.
pub mod surface;
/// The node arena.
mod tree;

pub use error::{Error, Result};
pub use geom;
pub use id::NodeId;
pub use layout::{
    Axis, BorderLayout, BoxLayout, Constraint, DefaultLayout, FlowAlign, FlowLayout,
    LayoutManager, Region, SharedLayout, shared,
};
pub use node::Node;
pub use requirements::{Allocation, SizeRequirement};
pub use surface::{Fixed, Surface, SurfaceKey};
pub use tree::Tree;
