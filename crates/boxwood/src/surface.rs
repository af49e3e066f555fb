//! The boundary between the layout core and whatever draws a node.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geom::{Rect, Size};

/// Source of fresh surface keys.
static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a visual target. A key can be bound to at most one live
/// node at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceKey(u64);

impl SurfaceKey {
    /// Allocate a key that has never been handed out before in this process.
    pub fn fresh() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an externally managed identity.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw key value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A concrete visual target that a node is bound to.
///
/// The core asks a surface for its intrinsic size only when the node has no
/// layout manager and no explicit override. It pushes computed bounds and
/// visibility changes back down through the `apply_*` hooks.
pub trait Surface {
    /// Identity used to reject binding one target to two nodes.
    fn key(&self) -> SurfaceKey;

    /// Smallest usable size.
    fn minimum_size(&self) -> Size;

    /// Natural size.
    fn preferred_size(&self) -> Size {
        self.minimum_size()
    }

    /// Largest useful size.
    fn maximum_size(&self) -> Size {
        Size::MAX
    }

    /// Distance from the top edge to the baseline when rendered at the given
    /// size, or `None` if the surface has no meaningful baseline.
    fn baseline(&self, _width: f64, _height: f64) -> Option<f64> {
        None
    }

    /// Reflect new bounds, relative to the parent's origin.
    fn apply_bounds(&mut self, _bounds: Rect) {}

    /// Reflect a visibility change.
    fn apply_visibility(&mut self, _visible: bool) {}
}

/// A surface with fixed intrinsic sizes.
#[derive(Debug, Clone)]
pub struct Fixed {
    /// Bound identity.
    key: SurfaceKey,
    /// Minimum size.
    min: Size,
    /// Preferred size.
    pref: Size,
    /// Maximum size.
    max: Size,
    /// Baseline offset from the top edge, if any.
    baseline: Option<f64>,
    /// Last bounds pushed by the core.
    applied: Option<Rect>,
}

impl Fixed {
    /// A surface whose minimum, preferred and maximum sizes are all `size`.
    pub fn exact(size: impl Into<Size>) -> Self {
        let size = size.into();
        Self::new(size, size, size)
    }

    /// A surface that prefers `pref`, shrinks to zero and grows without bound.
    pub fn flexible(pref: impl Into<Size>) -> Self {
        Self::new(Size::zero(), pref.into(), Size::MAX)
    }

    /// A surface with explicit minimum, preferred and maximum sizes.
    pub fn new(min: Size, pref: Size, max: Size) -> Self {
        Self {
            key: SurfaceKey::fresh(),
            min,
            pref,
            max,
            baseline: None,
            applied: None,
        }
    }

    /// Report a baseline at a fixed distance from the top edge.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Use an explicit key instead of a fresh one.
    pub fn with_key(mut self, key: SurfaceKey) -> Self {
        self.key = key;
        self
    }

    /// The most recent bounds applied by the core.
    pub fn applied(&self) -> Option<Rect> {
        self.applied
    }
}

impl Surface for Fixed {
    fn key(&self) -> SurfaceKey {
        self.key
    }

    fn minimum_size(&self) -> Size {
        self.min
    }

    fn preferred_size(&self) -> Size {
        self.pref
    }

    fn maximum_size(&self) -> Size {
        self.max
    }

    fn baseline(&self, _width: f64, _height: f64) -> Option<f64> {
        self.baseline
    }

    fn apply_bounds(&mut self, bounds: Rect) {
        self.applied = Some(bounds);
    }
}
