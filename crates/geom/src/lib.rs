//! Geometry primitives used across boxwood.
//!
//! All coordinates are `f64`. Sizes are expected to be non-negative, but the
//! types themselves do not enforce it: layout arithmetic clamps where it
//! matters, and [`Size::checked`] validates values that come from outside.

#![warn(missing_docs)]

/// Error types for geometry operations.
mod error;
/// Edge insets.
mod insets;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use error::{Error, Result};
pub use insets::Insets;
pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// The largest representable size along one axis. Size sums saturate here
/// instead of growing without bound.
pub const MAX_SIZE: f64 = i32::MAX as f64;

/// Clamp a value into `[0, MAX_SIZE]`.
pub fn clamp_size(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, MAX_SIZE) }
}

/// Add two sizes, saturating at [`MAX_SIZE`].
pub fn saturating_add(a: f64, b: f64) -> f64 {
    (a + b).min(MAX_SIZE)
}
