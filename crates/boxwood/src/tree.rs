use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    mem,
};

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    NodeId,
    error::{Error, Result},
    geom::{Insets, Point, Rect, Size},
    layout::{Constraint, LayoutManager, SharedLayout},
    node::{Node, SizeSlot},
    surface::{Surface, SurfaceKey},
};

/// Which of the three size queries is being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeQuery {
    /// Minimum size.
    Min,
    /// Preferred size.
    Pref,
    /// Maximum size.
    Max,
}

/// Which alignment is being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisQuery {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// The arena that owns every node, and the operations that keep its
/// structure, caches and bounds consistent.
pub struct Tree {
    /// Node storage.
    nodes: SlotMap<NodeId, Node>,
    /// Surfaces currently bound to a live node.
    bound: HashMap<SurfaceKey, NodeId>,
    /// Nodes whose manager was busy when an invalidation arrived.
    deferred: RefCell<Vec<NodeId>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Construct an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            bound: HashMap::new(),
            deferred: RefCell::new(Vec::new()),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return true if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return true if `id` is a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Borrow a node, failing if it does not exist.
    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Mutably borrow a node, failing if it does not exist.
    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Create a detached node bound to `surface`.
    pub fn create<S>(&mut self, surface: S) -> Result<NodeId>
    where
        S: Surface + 'static,
    {
        self.create_boxed(Box::new(surface))
    }

    /// Create a detached node bound to a boxed surface.
    pub fn create_boxed(&mut self, surface: Box<dyn Surface>) -> Result<NodeId> {
        let key = surface.key();
        if self.bound.contains_key(&key) {
            return Err(Error::SurfaceAlreadyBound(key));
        }
        let id = self.nodes.insert(Node::new(surface));
        self.bound.insert(key, id);
        debug!(?id, ?key, "create");
        Ok(id)
    }

    /// Remove a node from the arena and return its surface.
    ///
    /// The node is detached from its parent first. Its children are removed
    /// through its manager and become parentless roots; they are not
    /// destroyed.
    pub fn destroy(&mut self, id: NodeId) -> Result<Box<dyn Surface>> {
        if let Some(parent) = self.get(id)?.parent {
            self.remove_view(parent, id)?;
        }
        for child in self.get(id)?.children.clone() {
            self.remove_view(id, child)?;
        }
        let node = self.nodes.remove(id).ok_or(Error::NodeNotFound(id))?;
        self.bound.remove(&node.surface.key());
        self.deferred.borrow_mut().retain(|d| *d != id);
        debug!(?id, "destroy");
        self.debug_assert_tree_invariants();
        Ok(node.surface)
    }

    /// Attach a layout manager to a node, or remove it with `None`.
    ///
    /// Children already present are not replayed through the new manager's
    /// `add_view`.
    pub fn set_layout(&mut self, id: NodeId, layout: Option<SharedLayout>) -> Result<()> {
        self.get_mut(id)?.layout = layout;
        self.invalidate_layout(id)
    }

    /// The manager attached to a node, if any.
    pub fn layout_of(&self, id: NodeId) -> Result<Option<SharedLayout>> {
        Ok(self.get(id)?.layout.clone())
    }

    /// Set the space reserved around a node's children.
    pub fn set_insets(&mut self, id: NodeId, insets: Insets) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.insets == insets {
            return Ok(());
        }
        node.insets = insets;
        self.invalidate_layout(id)
    }

    /// The space reserved around a node's children.
    pub fn insets(&self, id: NodeId) -> Result<Insets> {
        Ok(self.get(id)?.insets)
    }

    /// Append `child` to `parent`'s children.
    pub fn add_view(
        &mut self,
        parent: NodeId,
        child: NodeId,
        constraint: impl Into<Constraint>,
    ) -> Result<()> {
        self.insert_view(parent, child, constraint, -1)
    }

    /// Insert `child` under `parent` at `index`, where `-1` means the end.
    ///
    /// A child that already has another parent is removed from it first. A
    /// child already under `parent` is moved. The parent's manager sees the
    /// child through `add_view` before the tree changes; if it rejects the
    /// constraint, nothing is modified.
    pub fn insert_view(
        &mut self,
        parent: NodeId,
        child: NodeId,
        constraint: impl Into<Constraint>,
        index: isize,
    ) -> Result<()> {
        let constraint = constraint.into();
        let len = self.get(parent)?.children.len();
        let old_parent = self.get(child)?.parent;
        if index < -1 || index > len as isize {
            return Err(Error::InvalidIndex { index, len });
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        if let Some(layout) = self.get(parent)?.layout.clone() {
            self.with_layout(parent, &layout, |m, tree| {
                m.add_view(tree, parent, child, &constraint)
            })?;
        }

        match old_parent {
            Some(p) if p == parent => {
                self.get_mut(parent)?.children.retain(|c| *c != child);
            }
            Some(p) => self.remove_view(p, child)?,
            None => {}
        }

        let node = self.get_mut(parent)?;
        let pos = usize::try_from(index)
            .map_or(node.children.len(), |i| i.min(node.children.len()));
        node.children.insert(pos, child);
        self.get_mut(child)?.parent = Some(parent);
        debug!(?parent, ?child, pos, ?constraint, "add view");

        self.invalidate_layout(parent)?;
        self.debug_assert_tree_invariants();
        Ok(())
    }

    /// Detach `child` from `parent`. Does nothing if `child` is not a child of
    /// `parent`.
    pub fn remove_view(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        if self.get(child)?.parent != Some(parent) {
            return Ok(());
        }
        if let Some(layout) = self.get(parent)?.layout.clone() {
            self.with_layout(parent, &layout, |m, tree| {
                m.remove_view(tree, parent, child);
                Ok(())
            })?;
        }
        self.get_mut(parent)?.children.retain(|c| *c != child);
        self.get_mut(child)?.parent = None;
        debug!(?parent, ?child, "remove view");

        self.invalidate_layout(parent)?;
        self.debug_assert_tree_invariants();
        Ok(())
    }

    /// Detach the child at `index` from `parent`.
    pub fn remove_view_at(&mut self, parent: NodeId, index: usize) -> Result<()> {
        let children = &self.get(parent)?.children;
        let child = children.get(index).copied().ok_or(Error::InvalidIndex {
            index: isize::try_from(index).unwrap_or(isize::MAX),
            len: children.len(),
        })?;
        self.remove_view(parent, child)
    }

    /// A node's children, in layout order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(id)?.children)
    }

    /// Number of children of a node.
    pub fn child_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.get(id)?.children.len())
    }

    /// The child at `index`, if there is one.
    pub fn child_at(&self, id: NodeId, index: usize) -> Result<Option<NodeId>> {
        Ok(self.get(id)?.children.get(index).copied())
    }

    /// Position of `child` among `parent`'s children.
    pub fn index_of_child(&self, parent: NodeId, child: NodeId) -> Result<Option<usize>> {
        Ok(self
            .get(parent)?
            .children
            .iter()
            .position(|c| *c == child))
    }

    /// A node's parent.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(id)?.parent)
    }

    /// Return true if `id` is `ancestor` or lies below it.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> Result<bool> {
        self.get(id)?;
        self.get(ancestor)?;
        Ok(self.is_ancestor(ancestor, id))
    }

    /// Return true if `ancestor` appears in the parent chain of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// The smallest size the node can take.
    pub fn min_size(&self, id: NodeId) -> Result<Size> {
        self.query_size(id, SizeQuery::Min)
    }

    /// The size the node would like to be.
    pub fn pref_size(&self, id: NodeId) -> Result<Size> {
        self.query_size(id, SizeQuery::Pref)
    }

    /// The largest size the node can usefully take.
    pub fn max_size(&self, id: NodeId) -> Result<Size> {
        self.query_size(id, SizeQuery::Max)
    }

    /// Resolve one size query: override, then cache, then manager, then the
    /// surface's intrinsic size.
    fn query_size(&self, id: NodeId, query: SizeQuery) -> Result<Size> {
        let node = self.get(id)?;
        let slot = Self::slot(node, query);
        if let Some(size) = slot.get() {
            return Ok(size);
        }
        let size = match node.layout.clone() {
            Some(layout) => self.with_layout(id, &layout, |m, tree| match query {
                SizeQuery::Min => m.min_layout_size(tree, id),
                SizeQuery::Pref => m.pref_layout_size(tree, id),
                SizeQuery::Max => m.max_layout_size(tree, id),
            })?,
            None => match query {
                SizeQuery::Min => node.surface.minimum_size(),
                SizeQuery::Pref => node.surface.preferred_size(),
                SizeQuery::Max => node.surface.maximum_size(),
            },
        };
        trace!(?id, ?query, ?size, "computed size");
        slot.cached.set(Some(size));
        Ok(size)
    }

    /// The slot backing a size query.
    fn slot(node: &Node, query: SizeQuery) -> &SizeSlot {
        match query {
            SizeQuery::Min => &node.min,
            SizeQuery::Pref => &node.pref,
            SizeQuery::Max => &node.max,
        }
    }

    /// Override the minimum size. `None` restores the computed value.
    pub fn set_min_size(&mut self, id: NodeId, size: Option<Size>) -> Result<()> {
        self.get_mut(id)?.min.sticky = size;
        self.override_changed(id)
    }

    /// Override the preferred size. `None` restores the computed value.
    pub fn set_pref_size(&mut self, id: NodeId, size: Option<Size>) -> Result<()> {
        self.get_mut(id)?.pref.sticky = size;
        self.override_changed(id)
    }

    /// Override the maximum size. `None` restores the computed value.
    pub fn set_max_size(&mut self, id: NodeId, size: Option<Size>) -> Result<()> {
        self.get_mut(id)?.max.sticky = size;
        self.override_changed(id)
    }

    /// Horizontal alignment: the explicit value, else the manager's, else 0.5.
    pub fn alignment_x(&self, id: NodeId) -> Result<f64> {
        self.query_alignment(id, AxisQuery::X)
    }

    /// Vertical alignment: the explicit value, else the manager's, else 0.5.
    pub fn alignment_y(&self, id: NodeId) -> Result<f64> {
        self.query_alignment(id, AxisQuery::Y)
    }

    /// Resolve an alignment query.
    fn query_alignment(&self, id: NodeId, axis: AxisQuery) -> Result<f64> {
        let node = self.get(id)?;
        let explicit = match axis {
            AxisQuery::X => node.alignment_x,
            AxisQuery::Y => node.alignment_y,
        };
        if let Some(a) = explicit {
            return Ok(a);
        }
        match node.layout.clone() {
            Some(layout) => self.with_layout(id, &layout, |m, tree| match axis {
                AxisQuery::X => m.layout_alignment_x(tree, id),
                AxisQuery::Y => m.layout_alignment_y(tree, id),
            }),
            None => Ok(0.5),
        }
    }

    /// Set an explicit horizontal alignment, clamped into `[0, 1]`.
    pub fn set_alignment_x(&mut self, id: NodeId, alignment: Option<f64>) -> Result<()> {
        self.get_mut(id)?.alignment_x = alignment.map(clamp_unit);
        self.override_changed(id)
    }

    /// Set an explicit vertical alignment, clamped into `[0, 1]`.
    pub fn set_alignment_y(&mut self, id: NodeId, alignment: Option<f64>) -> Result<()> {
        self.get_mut(id)?.alignment_y = alignment.map(clamp_unit);
        self.override_changed(id)
    }

    /// A sizing input of `id` changed: it and its ancestors must lay out
    /// again.
    fn override_changed(&mut self, id: NodeId) -> Result<()> {
        self.invalidate_layout(id)
    }

    /// A node's bounds, relative to its parent.
    pub fn bounds(&self, id: NodeId) -> Result<Rect> {
        Ok(self.get(id)?.bounds)
    }

    /// A node's current size.
    pub fn size(&self, id: NodeId) -> Result<Size> {
        Ok(self.get(id)?.bounds.size())
    }

    /// Move and resize a node.
    ///
    /// The surface sees every change. A change in size invalidates the node
    /// and its ancestors and marks the node for layout; a pure move does
    /// neither.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> Result<()> {
        let node = self.get_mut(id)?;
        let old = node.bounds;
        if old == bounds {
            return Ok(());
        }
        node.bounds = bounds;
        node.surface.apply_bounds(bounds);
        if old.size() != bounds.size() {
            node.layout_needed.set(true);
            trace!(?id, ?bounds, "resized");
            self.invalidate_chain(id, false)?;
        }
        Ok(())
    }

    /// Move a node without resizing it.
    pub fn set_location(&mut self, id: NodeId, location: Point) -> Result<()> {
        let bounds = self.get(id)?.bounds.at(location);
        self.set_bounds(id, bounds)
    }

    /// Resize a node in place.
    pub fn set_size(&mut self, id: NodeId, size: Size) -> Result<()> {
        let tl = self.get(id)?.bounds.tl;
        self.set_bounds(id, Rect::new(tl.x, tl.y, size.w, size.h))
    }

    /// Show or hide a node.
    ///
    /// A hidden node stays in the tree and keeps its bounds, but takes no
    /// part in its parent's sizing or placement.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.hidden != visible {
            return Ok(());
        }
        node.hidden = !visible;
        node.surface.apply_visibility(visible);
        debug!(?id, visible, "visibility");
        if let Some(parent) = node.parent {
            self.invalidate_layout(parent)?;
        }
        Ok(())
    }

    /// Return true if the node is not hidden.
    pub fn is_visible(&self, id: NodeId) -> Result<bool> {
        Ok(!self.get(id)?.hidden)
    }

    /// The baseline of a node rendered at the given size, measured from its
    /// top edge. Negative or non-finite values reported by the surface are
    /// treated as no baseline.
    pub fn baseline(&self, id: NodeId, width: f64, height: f64) -> Result<Option<f64>> {
        Ok(self
            .get(id)?
            .surface
            .baseline(width, height)
            .filter(|b| b.is_finite() && *b >= 0.0))
    }

    /// Drop cached sizes for `id` and every ancestor, tell each attached
    /// manager to do the same, and mark them all as needing layout.
    ///
    /// Managers that are in the middle of a call are invalidated when that
    /// call returns.
    pub fn invalidate_layout(&self, id: NodeId) -> Result<()> {
        self.invalidate_chain(id, true)
    }

    /// Walk from `id` to the root clearing caches. With `mark` set, every
    /// node on the way is flagged for layout as well. Bounds changes leave it
    /// unset and flag only the resized node.
    fn invalidate_chain(&self, id: NodeId, mark: bool) -> Result<()> {
        self.get(id)?;
        let mut current = Some(id);
        while let Some(n) = current {
            let Some(node) = self.nodes.get(n) else {
                break;
            };
            node.clear_caches();
            if mark {
                node.layout_needed.set(true);
            }
            if let Some(layout) = &node.layout {
                match layout.try_borrow_mut() {
                    Ok(mut m) => m.invalidate_layout(n),
                    Err(_) => self.deferred.borrow_mut().push(n),
                }
            }
            current = node.parent;
        }
        trace!(?id, "invalidate");
        Ok(())
    }

    /// Retry invalidations that arrived while their manager was busy.
    fn flush_deferred(&self) {
        let pending = mem::take(&mut *self.deferred.borrow_mut());
        for id in pending {
            let Some(layout) = self.nodes.get(id).and_then(|n| n.layout.clone()) else {
                continue;
            };
            match layout.try_borrow_mut() {
                Ok(mut m) => m.invalidate_layout(id),
                Err(_) => self.deferred.borrow_mut().push(id),
            };
        }
    }

    /// Run a query against the manager attached to `id`.
    fn with_layout<R>(
        &self,
        id: NodeId,
        layout: &SharedLayout,
        f: impl FnOnce(&mut dyn LayoutManager, &Self) -> Result<R>,
    ) -> Result<R> {
        let result = {
            let mut m = layout
                .try_borrow_mut()
                .map_err(|_| Error::ReentrantLayout(id))?;
            f(&mut *m, self)
        };
        self.flush_deferred();
        result
    }

    /// Lay out the children of a node with its manager.
    ///
    /// Nodes without a manager have nothing to do. Either way the node no
    /// longer needs layout afterwards.
    pub fn layout_child_views(&mut self, id: NodeId) -> Result<()> {
        let Some(layout) = self.get(id)?.layout.clone() else {
            self.get(id)?.layout_needed.set(false);
            return Ok(());
        };
        trace!(?id, "layout");
        let result = {
            let mut m = layout
                .try_borrow_mut()
                .map_err(|_| Error::ReentrantLayout(id))?;
            m.layout_child_views(self, id)
        };
        self.flush_deferred();
        result?;
        self.get(id)?.layout_needed.set(false);
        Ok(())
    }

    /// Lay out every visible node under `root` that needs it, parents before
    /// children.
    pub fn validate(&mut self, root: NodeId) -> Result<()> {
        self.get(root)?;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.hidden {
                continue;
            }
            if node.layout_needed.get() {
                self.layout_child_views(id)?;
            }
            stack.extend(self.get(id)?.children.iter().rev().copied());
        }
        Ok(())
    }

    /// Apply an externally imposed size to a node and lay out its subtree.
    pub fn resize(&mut self, id: NodeId, size: Size) -> Result<()> {
        let size = Size::checked(size.w, size.h)?;
        self.set_size(id, size)?;
        self.get(id)?.layout_needed.set(true);
        debug!(?id, ?size, "resize");
        self.validate(id)
    }

    /// Assert structural invariants on the node tree in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_tree_invariants(&self) {
        for (id, node) in &self.nodes {
            self.debug_assert_node_links(id, node);
            self.debug_assert_no_cycle(id);
            debug_assert!(
                self.bound.get(&node.surface.key()) == Some(&id),
                "surface of {id:?} not bound"
            );
        }
        debug_assert!(
            self.bound.len() == self.nodes.len(),
            "stale surface bindings"
        );
    }

    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_assert_tree_invariants(&self) {}

    /// Assert parent/child link invariants for a specific node in debug builds.
    #[cfg(debug_assertions)]
    fn debug_assert_node_links(&self, id: NodeId, node: &Node) {
        let mut seen = HashSet::with_capacity(node.children.len());
        for child in &node.children {
            debug_assert!(
                seen.insert(*child),
                "duplicate child {child:?} under {id:?}"
            );
            let child_node = self.nodes.get(*child);
            debug_assert!(child_node.is_some(), "child {child:?} missing");
            if let Some(child_node) = child_node {
                debug_assert!(
                    child_node.parent == Some(id),
                    "child {child:?} parent mismatch under {id:?}"
                );
            }
        }
        if let Some(parent) = node.parent {
            let parent_node = self.nodes.get(parent);
            debug_assert!(parent_node.is_some(), "parent {parent:?} missing");
            if let Some(parent_node) = parent_node {
                debug_assert!(
                    parent_node.children.contains(&id),
                    "parent {parent:?} missing child {id:?}"
                );
            }
        }
    }

    /// Assert that the parent chain for a node contains no cycles.
    #[cfg(debug_assertions)]
    fn debug_assert_no_cycle(&self, start: NodeId) {
        debug_assert!(
            !self.parent_chain_has_cycle(start),
            "cycle detected from {start:?}"
        );
    }

    /// Return true if a node's parent chain contains a cycle.
    #[cfg(debug_assertions)]
    fn parent_chain_has_cycle(&self, start: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }
}

/// Clamp an alignment into `[0, 1]`. NaN becomes 0.5.
fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
}
