use std::collections::HashMap;

use tracing::debug;

use super::{Constraint, LayoutManager, Region};
use crate::{
    NodeId, Tree,
    error::Result,
    geom::{Rect, Size},
};

/// Places up to five children against the edges of the target and in the
/// remaining center.
///
/// Edge children take their preferred extent across the edge and stretch
/// along it; the center child gets whatever is left. The line and page
/// regions are synonyms that shadow the primary region they correspond to.
///
/// Region assignments are kept per target, so one border layout can be
/// shared between several containers.
#[derive(Debug, Clone, Default)]
pub struct BorderLayout {
    /// Horizontal gap between regions.
    hgap: f64,
    /// Vertical gap between regions.
    vgap: f64,
    /// Whether lines run right to left, swapping `LineStart` and `LineEnd`.
    right_to_left: bool,
    /// Occupant of each region, per target.
    slots: HashMap<NodeId, HashMap<Region, NodeId>>,
}

impl BorderLayout {
    /// Construct a gapless, left-to-right border layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal gap.
    pub fn hgap(mut self, hgap: f64) -> Self {
        self.hgap = hgap;
        self
    }

    /// Set the vertical gap.
    pub fn vgap(mut self, vgap: f64) -> Self {
        self.vgap = vgap;
        self
    }

    /// Set the direction lines run in.
    pub fn left_to_right(mut self, ltr: bool) -> Self {
        self.right_to_left = !ltr;
        self
    }

    /// The region `view` was added to, if any.
    pub fn constraints_of(&self, view: NodeId) -> Option<Region> {
        self.slots.values().find_map(|regions| {
            Region::ALL
                .into_iter()
                .find(|r| regions.get(r) == Some(&view))
        })
    }

    /// The visible child of `target` that will be placed in `region`.
    ///
    /// For the four edges this applies the synonym regions and the line
    /// direction; the synonyms themselves resolve to their own occupant.
    pub fn layout_component(
        &self,
        tree: &Tree,
        target: NodeId,
        region: Region,
    ) -> Result<Option<NodeId>> {
        let ltr = !self.right_to_left;
        let regions = self.slots.get(&target);
        let slot = |r: Region| regions.and_then(|m| m.get(&r)).copied();
        let found = match region {
            Region::North => slot(Region::PageStart).or_else(|| slot(Region::North)),
            Region::South => slot(Region::PageEnd).or_else(|| slot(Region::South)),
            Region::West => {
                let item = if ltr { Region::LineStart } else { Region::LineEnd };
                slot(item).or_else(|| slot(Region::West))
            }
            Region::East => {
                let item = if ltr { Region::LineEnd } else { Region::LineStart };
                slot(item).or_else(|| slot(Region::East))
            }
            other => slot(other),
        };
        match found {
            Some(id) if tree.is_visible(id)? => Ok(Some(id)),
            _ => Ok(None),
        }
    }

    /// Combine the children's sizes as reported by `query` around the edges.
    fn summary(
        &self,
        tree: &Tree,
        target: NodeId,
        query: fn(&Tree, NodeId) -> Result<Size>,
    ) -> Result<Size> {
        let mut dim = Size::zero();
        for region in [Region::East, Region::West] {
            if let Some(c) = self.layout_component(tree, target, region)? {
                let d = query(tree, c)?;
                dim.w += d.w + self.hgap;
                dim.h = dim.h.max(d.h);
            }
        }
        if let Some(c) = self.layout_component(tree, target, Region::Center)? {
            let d = query(tree, c)?;
            dim.w += d.w;
            dim.h = dim.h.max(d.h);
        }
        for region in [Region::North, Region::South] {
            if let Some(c) = self.layout_component(tree, target, region)? {
                let d = query(tree, c)?;
                dim.w = dim.w.max(d.w);
                dim.h += d.h + self.vgap;
            }
        }
        let insets = tree.insets(target)?;
        Ok(dim.saturating_grow(insets.horizontal(), insets.vertical()))
    }
}

/// Turn a constraint into the region it names. No constraint means center.
fn region_of(constraint: &Constraint) -> Result<Region> {
    match constraint {
        Constraint::None => Ok(Region::Center),
        Constraint::Region(r) => Ok(*r),
        Constraint::Name(name) => name.parse(),
    }
}

impl LayoutManager for BorderLayout {
    fn name(&self) -> &'static str {
        "BorderLayout"
    }

    fn add_view(
        &mut self,
        _tree: &Tree,
        target: NodeId,
        child: NodeId,
        constraint: &Constraint,
    ) -> Result<()> {
        let region = region_of(constraint)?;
        let regions = self.slots.entry(target).or_default();
        regions.retain(|_, v| *v != child);
        if let Some(old) = regions.insert(region, child) {
            debug!(?target, ?region, ?old, "border region replaced");
        }
        self.invalidate_layout(target);
        Ok(())
    }

    fn remove_view(&mut self, _tree: &Tree, target: NodeId, child: NodeId) {
        if let Some(regions) = self.slots.get_mut(&target) {
            regions.retain(|_, v| *v != child);
            if regions.is_empty() {
                self.slots.remove(&target);
            }
        }
        self.invalidate_layout(target);
    }

    fn min_layout_size(&mut self, tree: &Tree, target: NodeId) -> Result<Size> {
        self.summary(tree, target, Tree::min_size)
    }

    fn pref_layout_size(&mut self, tree: &Tree, target: NodeId) -> Result<Size> {
        self.summary(tree, target, Tree::pref_size)
    }

    fn layout_alignment_x(&mut self, _tree: &Tree, _target: NodeId) -> Result<f64> {
        Ok(0.5)
    }

    fn layout_alignment_y(&mut self, _tree: &Tree, _target: NodeId) -> Result<f64> {
        Ok(0.5)
    }

    fn layout_child_views(&mut self, tree: &mut Tree, target: NodeId) -> Result<()> {
        let area = tree.size(target)?.rect().inset(tree.insets(target)?);
        let mut top = area.tl.y;
        let mut bottom = area.bottom();
        let mut left = area.tl.x;
        let mut right = area.right();
        let span = |a: f64, b: f64| (b - a).max(0.0);

        if let Some(c) = self.layout_component(tree, target, Region::North)? {
            let d = tree.pref_size(c)?;
            tree.set_bounds(c, Rect::new(left, top, span(left, right), d.h))?;
            top += d.h + self.vgap;
        }
        if let Some(c) = self.layout_component(tree, target, Region::South)? {
            let d = tree.pref_size(c)?;
            tree.set_bounds(c, Rect::new(left, bottom - d.h, span(left, right), d.h))?;
            bottom -= d.h + self.vgap;
        }
        if let Some(c) = self.layout_component(tree, target, Region::East)? {
            let d = tree.pref_size(c)?;
            tree.set_bounds(c, Rect::new(right - d.w, top, d.w, span(top, bottom)))?;
            right -= d.w + self.hgap;
        }
        if let Some(c) = self.layout_component(tree, target, Region::West)? {
            let d = tree.pref_size(c)?;
            tree.set_bounds(c, Rect::new(left, top, d.w, span(top, bottom)))?;
            left += d.w + self.hgap;
        }
        if let Some(c) = self.layout_component(tree, target, Region::Center)? {
            tree.set_bounds(
                c,
                Rect::new(left, top, span(left, right), span(top, bottom)),
            )?;
        }
        Ok(())
    }
}
