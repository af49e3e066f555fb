use std::cell::Cell;

use crate::{
    NodeId,
    geom::{Insets, Rect, Size},
    layout::SharedLayout,
    surface::Surface,
};

/// One size query's state: an explicit override that survives invalidation,
/// and a computed value that does not.
#[derive(Debug, Default)]
pub(crate) struct SizeSlot {
    /// Value set by the caller. Always wins.
    pub(crate) sticky: Option<Size>,
    /// Last computed value.
    pub(crate) cached: Cell<Option<Size>>,
}

impl SizeSlot {
    /// The override or the cached value, if either is present.
    pub(crate) fn get(&self) -> Option<Size> {
        self.sticky.or_else(|| self.cached.get())
    }

    /// Drop the computed value, keeping the override.
    pub(crate) fn clear(&self) {
        self.cached.set(None);
    }
}

/// Core node data stored in the arena.
pub struct Node {
    /// Bound visual target.
    pub(crate) surface: Box<dyn Surface>,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, in layout order.
    pub(crate) children: Vec<NodeId>,

    /// Manager that places this node's children.
    pub(crate) layout: Option<SharedLayout>,

    /// Bounds relative to the parent's origin.
    pub(crate) bounds: Rect,
    /// Space reserved around the children.
    pub(crate) insets: Insets,

    /// Minimum size query.
    pub(crate) min: SizeSlot,
    /// Preferred size query.
    pub(crate) pref: SizeSlot,
    /// Maximum size query.
    pub(crate) max: SizeSlot,
    /// Explicit horizontal alignment.
    pub(crate) alignment_x: Option<f64>,
    /// Explicit vertical alignment.
    pub(crate) alignment_y: Option<f64>,

    /// Node visibility.
    pub(crate) hidden: bool,
    /// Whether children must be laid out again.
    pub(crate) layout_needed: Cell<bool>,
}

impl Node {
    /// Construct a detached node around a surface.
    pub(crate) fn new(surface: Box<dyn Surface>) -> Self {
        Self {
            surface,
            parent: None,
            children: Vec::new(),
            layout: None,
            bounds: Rect::zero(),
            insets: Insets::zero(),
            min: SizeSlot::default(),
            pref: SizeSlot::default(),
            max: SizeSlot::default(),
            alignment_x: None,
            alignment_y: None,
            hidden: false,
            layout_needed: Cell::new(true),
        }
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the bounds relative to the parent's origin.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Return the container insets.
    pub fn insets(&self) -> Insets {
        self.insets
    }

    /// Return true if the node is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Return true if the node's children need to be laid out.
    pub fn layout_needed(&self) -> bool {
        self.layout_needed.get()
    }

    /// Return the bound surface.
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Drop every computed size, keeping overrides.
    pub(crate) fn clear_caches(&self) {
        self.min.clear();
        self.pref.clear();
        self.max.clear();
    }
}
