use tracing::trace;

use super::{Cache, LayoutManager};
use crate::{
    NodeId, Tree,
    error::{Error, Result},
    geom::{Insets, Rect, Size, saturating_add},
    requirements::{
        Allocation, SizeRequirement, place_aligned, place_tiled, reduce_aligned, reduce_tiled,
    },
};

/// The axis a [`BoxLayout`] tiles its children along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Left to right.
    #[default]
    X,
    /// Top to bottom.
    Y,
    /// The direction lines of text run in: `X` for horizontal orientation,
    /// `Y` otherwise.
    Line,
    /// The direction lines of text stack in: `Y` for horizontal orientation,
    /// `X` otherwise.
    Page,
}

impl Axis {
    /// Resolve `Line` and `Page` to a concrete axis.
    pub fn resolve(self, horizontal: bool) -> Self {
        match self {
            Self::X | Self::Y => self,
            Self::Line if horizontal => Self::X,
            Self::Line => Self::Y,
            Self::Page if horizontal => Self::Y,
            Self::Page => Self::X,
        }
    }
}

/// Per-child requirements and their aggregates along both axes.
#[derive(Debug, Clone)]
struct Requests {
    /// Horizontal requirement of each child, in child order.
    x_children: Vec<SizeRequirement>,
    /// Vertical requirement of each child, in child order.
    y_children: Vec<SizeRequirement>,
    /// Horizontal aggregate.
    x_total: SizeRequirement,
    /// Vertical aggregate.
    y_total: SizeRequirement,
}

/// Tiles the children of a single target along one axis, and aligns them
/// along the other.
///
/// Each child is sized between its minimum and maximum, sharing any surplus
/// or shortfall in proportion to its flexibility. A box layout belongs to the
/// node it was created for and refuses to serve any other.
#[derive(Debug)]
pub struct BoxLayout {
    /// The only node this manager lays out.
    target: NodeId,
    /// Configured axis, possibly orientation-relative.
    axis: Axis,
    /// Direction of lines when the axis is orientation-relative.
    left_to_right: bool,
    /// Orientation used to resolve `Line` and `Page`.
    horizontal: bool,
    /// Cached child requirements.
    cache: Cache<Requests>,
}

impl BoxLayout {
    /// Construct a box layout for `target`.
    pub fn new(target: NodeId, axis: Axis) -> Self {
        Self {
            target,
            axis,
            left_to_right: true,
            horizontal: true,
            cache: Cache::Stale,
        }
    }

    /// Set the direction of lines for orientation-relative axes.
    pub fn left_to_right(mut self, ltr: bool) -> Self {
        self.left_to_right = ltr;
        self
    }

    /// Set the orientation used to resolve `Line` and `Page`.
    pub fn horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// The configured axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The node this manager lays out.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Fail unless `target` is the node this manager was built for.
    fn check_target(&self, target: NodeId) -> Result<()> {
        if target == self.target {
            Ok(())
        } else {
            Err(Error::ForeignTarget {
                manager: "BoxLayout",
                expected: self.target,
                actual: target,
            })
        }
    }

    /// Return the cached requests, gathering them from the tree if stale.
    fn requests(&mut self, tree: &Tree) -> Result<&Requests> {
        let axis = self.axis.resolve(self.horizontal);
        let target = self.target;
        self.cache.get_or_try_init(|| gather(tree, target, axis))
    }

    /// A size built from the two aggregates, with the target's insets added.
    fn total_size(
        &mut self,
        tree: &Tree,
        target: NodeId,
        pick: impl Fn(&SizeRequirement) -> f64,
    ) -> Result<Size> {
        self.check_target(target)?;
        let insets = tree.insets(target)?;
        let req = self.requests(tree)?;
        Ok(Size::new(
            saturating_add(pick(&req.x_total), insets.horizontal()),
            saturating_add(pick(&req.y_total), insets.vertical()),
        ))
    }
}

/// Collect requirements for every child of `target`. Hidden children keep
/// their alignment but ask for no space.
fn gather(tree: &Tree, target: NodeId, axis: Axis) -> Result<Requests> {
    let children = tree.children(target)?;
    let mut x_children = Vec::with_capacity(children.len());
    let mut y_children = Vec::with_capacity(children.len());
    for &child in children {
        let ax = tree.alignment_x(child)?;
        let ay = tree.alignment_y(child)?;
        if !tree.is_visible(child)? {
            x_children.push(SizeRequirement::empty(ax));
            y_children.push(SizeRequirement::empty(ay));
            continue;
        }
        let min = tree.min_size(child)?;
        let pref = tree.pref_size(child)?;
        let max = tree.max_size(child)?;
        x_children.push(SizeRequirement::new(min.w, pref.w, max.w, ax));
        y_children.push(SizeRequirement::new(min.h, pref.h, max.h, ay));
    }
    let (x_total, y_total) = if axis == Axis::X {
        (reduce_tiled(&x_children), reduce_aligned(&y_children))
    } else {
        (reduce_aligned(&x_children), reduce_tiled(&y_children))
    };
    trace!(?target, ?x_total, ?y_total, "box requests");
    Ok(Requests {
        x_children,
        y_children,
        x_total,
        y_total,
    })
}

impl LayoutManager for BoxLayout {
    fn name(&self) -> &'static str {
        "BoxLayout"
    }

    fn min_layout_size(&mut self, tree: &Tree, target: NodeId) -> Result<Size> {
        self.total_size(tree, target, |r| r.minimum)
    }

    fn pref_layout_size(&mut self, tree: &Tree, target: NodeId) -> Result<Size> {
        self.total_size(tree, target, |r| r.preferred)
    }

    fn max_layout_size(&mut self, tree: &Tree, target: NodeId) -> Result<Size> {
        self.total_size(tree, target, |r| r.maximum)
    }

    fn layout_alignment_x(&mut self, tree: &Tree, target: NodeId) -> Result<f64> {
        self.check_target(target)?;
        Ok(self.requests(tree)?.x_total.alignment)
    }

    fn layout_alignment_y(&mut self, tree: &Tree, target: NodeId) -> Result<f64> {
        self.check_target(target)?;
        Ok(self.requests(tree)?.y_total.alignment)
    }

    fn layout_child_views(&mut self, tree: &mut Tree, target: NodeId) -> Result<()> {
        self.check_target(target)?;
        let resolved = self.axis.resolve(self.horizontal);
        let ltr = resolved == self.axis || self.left_to_right;

        let insets = tree.insets(target)?;
        let area = tree.size(target)?.rect().inset(insets);
        let req = self.requests(tree)?;
        let (xs, ys) = if resolved == Axis::X {
            (
                place_tiled(area.w, &req.x_children, ltr),
                place_aligned(area.h, &req.y_children, true),
            )
        } else {
            (
                place_aligned(area.w, &req.x_children, ltr),
                place_tiled(area.h, &req.y_children, true),
            )
        };

        let children = tree.children(target)?.to_vec();
        for ((child, x), y) in children.into_iter().zip(xs).zip(ys) {
            if !tree.is_visible(child)? {
                continue;
            }
            tree.set_bounds(child, place(insets, x, y))?;
        }
        Ok(())
    }

    fn invalidate_layout(&mut self, _target: NodeId) {
        self.cache.invalidate();
    }
}

/// Combine the two axis allocations into child bounds inside the insets.
fn place(insets: Insets, x: Allocation, y: Allocation) -> Rect {
    Rect::new(
        insets.left + x.offset,
        insets.top + y.offset,
        x.span,
        y.span,
    )
}
