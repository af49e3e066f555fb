//! Integration tests for tree structure, caching and invalidation.

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use boxwood::{
        Axis, BoxLayout, Constraint, Error, Fixed, FlowLayout, LayoutManager, NodeId, Result,
        Surface, SurfaceKey, Tree,
        geom::{Rect, Size},
        shared,
    };

    /// A surface that records every bounds and visibility change it receives.
    struct Recording {
        /// Identity.
        key: SurfaceKey,
        /// Fixed intrinsic size.
        size: Size,
        /// Shared event log.
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Recording {
        fn new(size: Size, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                key: SurfaceKey::fresh(),
                size,
                log: log.clone(),
            }
        }
    }

    impl Surface for Recording {
        fn key(&self) -> SurfaceKey {
            self.key
        }

        fn minimum_size(&self) -> Size {
            self.size
        }

        fn maximum_size(&self) -> Size {
            self.size
        }

        fn apply_bounds(&mut self, bounds: Rect) {
            self.log.borrow_mut().push(format!(
                "bounds {} {} {} {}",
                bounds.tl.x, bounds.tl.y, bounds.w, bounds.h
            ));
        }

        fn apply_visibility(&mut self, visible: bool) {
            self.log.borrow_mut().push(format!("visible {visible}"));
        }
    }

    fn build_row(tree: &mut Tree, widths: &[f64]) -> Result<(NodeId, Vec<NodeId>)> {
        let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.set_layout(root, Some(shared(BoxLayout::new(root, Axis::X))))?;
        let mut children = Vec::new();
        for w in widths {
            let c = tree.create(Fixed::exact((*w, 10.0)))?;
            tree.add_view(root, c, Constraint::None)?;
            children.push(c);
        }
        Ok((root, children))
    }

    #[test]
    fn surface_sees_bounds_and_visibility() -> Result<()> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = Tree::new();
        let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.set_layout(root, Some(shared(BoxLayout::new(root, Axis::X))))?;
        let leaf = tree.create(Recording::new(Size::new(10.0, 10.0), &log))?;
        tree.add_view(root, leaf, Constraint::None)?;
        tree.resize(root, Size::new(10.0, 10.0))?;
        tree.set_visible(leaf, false)?;
        tree.set_visible(leaf, false)?;
        assert_eq!(*log.borrow(), vec![
            "bounds 0 0 10 10".to_string(),
            "visible false".to_string(),
        ]);
        Ok(())
    }

    #[test]
    fn relayout_without_change_is_quiet() -> Result<()> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = Tree::new();
        let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.set_layout(root, Some(shared(BoxLayout::new(root, Axis::X))))?;
        let leaf = tree.create(Recording::new(Size::new(10.0, 10.0), &log))?;
        tree.add_view(root, leaf, Constraint::None)?;
        tree.resize(root, Size::new(10.0, 10.0))?;
        tree.resize(root, Size::new(10.0, 10.0))?;
        tree.validate(root)?;
        assert_eq!(log.borrow().len(), 1);
        Ok(())
    }

    #[test]
    fn invisibility_round_trip() -> Result<()> {
        let mut tree = Tree::new();
        let (root, kids) = build_row(&mut tree, &[10.0, 20.0, 30.0])?;
        tree.resize(root, Size::new(60.0, 10.0))?;
        assert_eq!(tree.bounds(kids[2])?, Rect::new(30.0, 0.0, 30.0, 10.0));

        tree.set_visible(kids[1], false)?;
        assert_eq!(tree.pref_size(root)?, Size::new(40.0, 10.0));
        tree.resize(root, Size::new(40.0, 10.0))?;
        assert_eq!(tree.bounds(kids[2])?, Rect::new(10.0, 0.0, 30.0, 10.0));
        // The hidden child keeps its last bounds.
        assert_eq!(tree.bounds(kids[1])?, Rect::new(10.0, 0.0, 20.0, 10.0));

        tree.set_visible(kids[1], true)?;
        tree.resize(root, Size::new(60.0, 10.0))?;
        assert_eq!(tree.bounds(kids[1])?, Rect::new(10.0, 0.0, 20.0, 10.0));
        assert_eq!(tree.bounds(kids[2])?, Rect::new(30.0, 0.0, 30.0, 10.0));
        assert_eq!(tree.child_count(root)?, 3);
        Ok(())
    }

    #[test]
    fn cycle_leaves_tree_unchanged() -> Result<()> {
        let mut tree = Tree::new();
        let (root, kids) = build_row(&mut tree, &[10.0, 20.0])?;
        let before: Vec<NodeId> = tree.children(root)?.to_vec();
        assert_eq!(
            tree.add_view(kids[0], root, Constraint::None),
            Err(Error::WouldCreateCycle {
                parent: kids[0],
                child: root,
            })
        );
        assert_eq!(tree.children(root)?, before.as_slice());
        assert_eq!(tree.parent(root)?, None);
        assert_eq!(tree.children(kids[0])?, &[] as &[NodeId]);
        Ok(())
    }

    #[test]
    fn reparenting_updates_both_layouts() -> Result<()> {
        let mut tree = Tree::new();
        let (left, lkids) = build_row(&mut tree, &[10.0, 20.0])?;
        let (right, _) = build_row(&mut tree, &[5.0])?;
        assert_eq!(tree.pref_size(left)?, Size::new(30.0, 10.0));
        assert_eq!(tree.pref_size(right)?, Size::new(5.0, 10.0));
        tree.insert_view(right, lkids[1], Constraint::None, 0)?;
        assert_eq!(tree.pref_size(left)?, Size::new(10.0, 10.0));
        assert_eq!(tree.pref_size(right)?, Size::new(25.0, 10.0));
        assert_eq!(tree.index_of_child(right, lkids[1])?, Some(0));
        Ok(())
    }

    #[test]
    fn destroy_orphans_children() -> Result<()> {
        let mut tree = Tree::new();
        let (root, kids) = build_row(&mut tree, &[10.0, 20.0])?;
        tree.destroy(root)?;
        for k in kids {
            assert_eq!(tree.parent(k)?, None);
            assert!(tree.contains(k));
        }
        assert_eq!(tree.len(), 2);
        Ok(())
    }

    #[test]
    fn remove_by_index() -> Result<()> {
        let mut tree = Tree::new();
        let (root, kids) = build_row(&mut tree, &[10.0, 20.0, 30.0])?;
        tree.remove_view_at(root, 1)?;
        assert_eq!(tree.children(root)?, &[kids[0], kids[2]]);
        assert_eq!(tree.pref_size(root)?, Size::new(40.0, 10.0));
        Ok(())
    }

    #[test]
    fn child_resize_invalidates_ancestors() -> Result<()> {
        let mut tree = Tree::new();
        let outer = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.set_layout(outer, Some(shared(BoxLayout::new(outer, Axis::Y))))?;
        let (inner, kids) = build_row(&mut tree, &[10.0])?;
        tree.add_view(outer, inner, Constraint::None)?;
        assert_eq!(tree.pref_size(outer)?, Size::new(10.0, 10.0));

        tree.set_pref_size(kids[0], Some(Size::new(50.0, 10.0)))?;
        tree.set_max_size(kids[0], Some(Size::new(50.0, 10.0)))?;
        assert_eq!(tree.pref_size(inner)?, Size::new(50.0, 10.0));
        assert_eq!(tree.pref_size(outer)?, Size::new(50.0, 10.0));
        Ok(())
    }

    #[test]
    fn grandchild_change_relays_out_from_root() -> Result<()> {
        let mut tree = Tree::new();
        let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.set_layout(root, Some(shared(BoxLayout::new(root, Axis::X))))?;
        let (mid, kids) = build_row(&mut tree, &[10.0])?;
        tree.add_view(root, mid, Constraint::None)?;
        let other = tree.create(Fixed::exact((10.0, 10.0)))?;
        tree.add_view(root, other, Constraint::None)?;
        tree.resize(root, Size::new(30.0, 10.0))?;
        assert_eq!(tree.bounds(mid)?, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(tree.bounds(other)?, Rect::new(10.0, 0.0, 10.0, 10.0));

        let added = tree.create(Fixed::exact((10.0, 10.0)))?;
        tree.add_view(mid, added, Constraint::None)?;
        assert!(tree.node(root).is_some_and(|n| n.layout_needed()));
        tree.validate(root)?;

        assert!(!tree.node(root).is_some_and(|n| n.layout_needed()));
        assert_eq!(tree.bounds(mid)?, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(tree.bounds(other)?, Rect::new(20.0, 0.0, 10.0, 10.0));
        assert_eq!(tree.bounds(kids[0])?, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(tree.bounds(added)?, Rect::new(10.0, 0.0, 10.0, 10.0));
        Ok(())
    }

    #[test]
    fn overrides_beat_managers() -> Result<()> {
        let mut tree = Tree::new();
        let (root, _) = build_row(&mut tree, &[10.0, 20.0])?;
        tree.set_min_size(root, Some(Size::new(1.0, 1.0)))?;
        tree.set_pref_size(root, Some(Size::new(2.0, 2.0)))?;
        tree.set_alignment_y(root, Some(0.0))?;
        tree.invalidate_layout(root)?;
        assert_eq!(tree.min_size(root)?, Size::new(1.0, 1.0));
        assert_eq!(tree.pref_size(root)?, Size::new(2.0, 2.0));
        assert_eq!(tree.max_size(root)?, Size::new(30.0, 10.0));
        assert_eq!(tree.alignment_y(root)?, 0.0);
        Ok(())
    }

    #[test]
    fn shared_manager_between_siblings() -> Result<()> {
        let mut tree = Tree::new();
        let flow = shared(FlowLayout::new());
        let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
        let a = tree.create(Fixed::flexible((0.0, 0.0)))?;
        let b = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.add_view(root, a, Constraint::None)?;
        tree.add_view(root, b, Constraint::None)?;
        tree.set_layout(a, Some(flow.clone()))?;
        tree.set_layout(b, Some(flow))?;
        let leaf = tree.create(Fixed::exact((7.0, 3.0)))?;
        tree.add_view(b, leaf, Constraint::None)?;
        assert_eq!(tree.pref_size(a)?, Size::zero());
        assert_eq!(tree.pref_size(b)?, Size::new(7.0, 3.0));
        Ok(())
    }

    #[test]
    fn shared_manager_between_nested_nodes_is_reentrant() -> Result<()> {
        let mut tree = Tree::new();
        let flow = shared(FlowLayout::new());
        let outer = tree.create(Fixed::flexible((0.0, 0.0)))?;
        let inner = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.add_view(outer, inner, Constraint::None)?;
        tree.set_layout(outer, Some(flow.clone()))?;
        tree.set_layout(inner, Some(flow))?;
        assert_eq!(tree.pref_size(outer), Err(Error::ReentrantLayout(inner)));
        Ok(())
    }

    /// Stretches every child over the whole target and counts invalidations.
    struct Stretch {
        /// Number of invalidations seen.
        invalidated: Rc<Cell<usize>>,
    }

    impl LayoutManager for Stretch {
        fn name(&self) -> &'static str {
            "stretch"
        }

        fn layout_child_views(&mut self, tree: &mut Tree, target: NodeId) -> Result<()> {
            let area = tree.size(target)?.rect();
            for child in tree.children(target)?.to_vec() {
                tree.set_bounds(child, area)?;
            }
            Ok(())
        }

        fn invalidate_layout(&mut self, _target: NodeId) {
            self.invalidated.set(self.invalidated.get() + 1);
        }
    }

    #[test]
    fn deferred_invalidation_reaches_busy_manager() -> Result<()> {
        let invalidated = Rc::new(Cell::new(0));
        let mut tree = Tree::new();
        let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.set_layout(
            root,
            Some(shared(Stretch {
                invalidated: invalidated.clone(),
            })),
        )?;
        let child = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.add_view(root, child, Constraint::None)?;
        let before = invalidated.get();

        // One invalidation for the root's own resize, and one deferred from
        // the child's resize while the manager was running.
        tree.resize(root, Size::new(10.0, 10.0))?;
        assert_eq!(tree.bounds(child)?, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(invalidated.get(), before + 2);
        Ok(())
    }

    #[test]
    fn node_not_found() -> Result<()> {
        let mut tree = Tree::new();
        let a = tree.create(Fixed::exact((1.0, 1.0)))?;
        let b = tree.create(Fixed::exact((1.0, 1.0)))?;
        tree.destroy(b)?;
        assert_eq!(
            tree.add_view(a, b, Constraint::None),
            Err(Error::NodeNotFound(b))
        );
        assert_eq!(tree.bounds(b), Err(Error::NodeNotFound(b)));
        Ok(())
    }
}
