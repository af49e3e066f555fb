//! Layout managers and the contract they share.
//!
//! A [`LayoutManager`] decides where the children of a node go. It is
//! attached to a node through [`Tree::set_layout`](crate::Tree::set_layout)
//! as a [`SharedLayout`], so one manager value can serve several nodes.
//! Managers only read the tree while answering size queries, and only
//! write child bounds from [`LayoutManager::layout_child_views`].

use std::{cell::RefCell, fmt, rc::Rc, str::FromStr};

use crate::{
    NodeId, Tree,
    error::{Error, Result},
    geom::Size,
};

/// Border layout.
mod border;
/// Box layout.
mod box_layout;
/// Flow layout.
mod flow;

pub use border::BorderLayout;
pub use box_layout::{Axis, BoxLayout};
pub use flow::{FlowAlign, FlowLayout};

/// A layout manager attached to one or more nodes.
pub type SharedLayout = Rc<RefCell<dyn LayoutManager>>;

/// Wrap a manager so it can be attached to nodes.
pub fn shared<L: LayoutManager + 'static>(layout: L) -> SharedLayout {
    Rc::new(RefCell::new(layout))
}

/// The strategy that sizes and positions the children of a node.
///
/// Every method receives the node being laid out as `target`. The default
/// bodies make up a manager that reserves no space and places nothing.
pub trait LayoutManager {
    /// Short name shown in debug dumps.
    fn name(&self) -> &'static str;

    /// A child is about to be added to `target` with a placement hint.
    ///
    /// Returning an error aborts the insertion and leaves the tree unchanged.
    fn add_view(
        &mut self,
        _tree: &Tree,
        target: NodeId,
        _child: NodeId,
        _constraint: &Constraint,
    ) -> Result<()> {
        self.invalidate_layout(target);
        Ok(())
    }

    /// A child has been removed from `target`.
    fn remove_view(&mut self, _tree: &Tree, target: NodeId, _child: NodeId) {
        self.invalidate_layout(target);
    }

    /// The smallest size `target` can be laid out in.
    fn min_layout_size(&mut self, _tree: &Tree, _target: NodeId) -> Result<Size> {
        Ok(Size::zero())
    }

    /// The size `target` would like to be.
    fn pref_layout_size(&mut self, _tree: &Tree, _target: NodeId) -> Result<Size> {
        Ok(Size::zero())
    }

    /// The largest size `target` can usefully use.
    fn max_layout_size(&mut self, _tree: &Tree, _target: NodeId) -> Result<Size> {
        Ok(Size::MAX)
    }

    /// Horizontal alignment of `target` when it is itself a child of another
    /// managed node. 0 is the leading edge, 1 the trailing edge.
    fn layout_alignment_x(&mut self, _tree: &Tree, _target: NodeId) -> Result<f64> {
        Ok(0.0)
    }

    /// Vertical alignment of `target`, as for
    /// [`layout_alignment_x`](Self::layout_alignment_x).
    fn layout_alignment_y(&mut self, _tree: &Tree, _target: NodeId) -> Result<f64> {
        Ok(0.0)
    }

    /// Assign bounds to every visible child of `target`.
    fn layout_child_views(&mut self, _tree: &mut Tree, _target: NodeId) -> Result<()> {
        Ok(())
    }

    /// Drop any cached aggregates for `target`. Must be cheap and safe to call
    /// repeatedly.
    fn invalidate_layout(&mut self, _target: NodeId) {}
}

/// A manager that places nothing and reports no size of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLayout;

impl LayoutManager for DefaultLayout {
    fn name(&self) -> &'static str {
        "default"
    }
}

/// Per-child placement hint handed to a manager when the child is added.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Constraint {
    /// No hint.
    #[default]
    None,
    /// A border region.
    Region(Region),
    /// A name the manager parses itself, e.g. `"North"`.
    Name(String),
}

impl From<Region> for Constraint {
    fn from(r: Region) -> Self {
        Self::Region(r)
    }
}

impl From<&str> for Constraint {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

/// The slots of a [`BorderLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Top edge.
    North,
    /// Bottom edge.
    South,
    /// Right edge.
    East,
    /// Left edge.
    West,
    /// Whatever space remains.
    Center,
    /// Before the first line of content. Shadows `North`.
    PageStart,
    /// After the last line of content. Shadows `South`.
    PageEnd,
    /// Start of a line: left in left-to-right layouts, right otherwise.
    LineStart,
    /// End of a line: right in left-to-right layouts, left otherwise.
    LineEnd,
}

impl Region {
    /// All regions, primaries first.
    pub const ALL: [Self; 9] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Center,
        Self::PageStart,
        Self::PageEnd,
        Self::LineStart,
        Self::LineEnd,
    ];

    /// The conventional constraint name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Center => "Center",
            Self::PageStart => "First",
            Self::PageEnd => "Last",
            Self::LineStart => "Before",
            Self::LineEnd => "After",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::UnknownConstraint(s.to_string()))
    }
}

/// Cached aggregate state of a manager.
#[derive(Debug, Clone, Default)]
pub(crate) enum Cache<T> {
    /// Must be recomputed before use.
    #[default]
    Stale,
    /// Up to date.
    Valid(T),
}

impl<T> Cache<T> {
    /// Return true if the cache holds a value.
    #[cfg(test)]
    pub(crate) fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Mark the cache stale.
    pub(crate) fn invalidate(&mut self) {
        *self = Self::Stale;
    }

    /// Return the cached value, computing it first if stale. A failed
    /// computation leaves the cache stale.
    pub(crate) fn get_or_try_init(&mut self, f: impl FnOnce() -> Result<T>) -> Result<&T> {
        if let Self::Stale = self {
            *self = Self::Valid(f()?);
        }
        match self {
            Self::Valid(v) => Ok(v),
            Self::Stale => Err(Error::Internal("layout cache left stale".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_names() -> Result<()> {
        for r in Region::ALL {
            assert_eq!(r.as_str().parse::<Region>()?, r);
        }
        assert_eq!("First".parse::<Region>()?, Region::PageStart);
        assert!(matches!(
            "north".parse::<Region>(),
            Err(Error::UnknownConstraint(_))
        ));
        Ok(())
    }

    #[test]
    fn constraint_conversions() {
        assert_eq!(Constraint::from(Region::East), Constraint::Region(Region::East));
        assert_eq!(Constraint::from("East"), Constraint::Name("East".into()));
        assert_eq!(Constraint::default(), Constraint::None);
    }

    #[test]
    fn cache_state() -> Result<()> {
        let mut c: Cache<u32> = Cache::default();
        assert!(!c.is_valid());
        assert!(c.get_or_try_init(|| Err(Error::Internal("x".into()))).is_err());
        assert!(!c.is_valid());
        assert_eq!(*c.get_or_try_init(|| Ok(3))?, 3);
        assert_eq!(*c.get_or_try_init(|| Ok(4))?, 3);
        c.invalidate();
        assert_eq!(*c.get_or_try_init(|| Ok(4))?, 4);
        Ok(())
    }
}
