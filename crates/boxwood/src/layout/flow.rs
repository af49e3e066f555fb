use super::LayoutManager;
use crate::{
    NodeId, Tree,
    error::Result,
    geom::{Point, Size},
};

/// How a [`FlowLayout`] justifies each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowAlign {
    /// Against the left edge, whatever the direction.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Against the right edge, whatever the direction.
    Right,
    /// Against the edge rows start from.
    Leading,
    /// Against the edge rows end at.
    Trailing,
}

/// Packs children into rows like words in a paragraph.
///
/// Every visible child is given its preferred size. Rows wrap when the next
/// child would not fit, and each row is justified according to the
/// configured [`FlowAlign`]. The reported minimum and preferred sizes
/// describe a single row: content that wraps is laid out taller than the
/// size this manager asks for.
#[derive(Debug, Clone, Default)]
pub struct FlowLayout {
    /// Row justification.
    align: FlowAlign,
    /// Space between items in a row, and at both ends of the row.
    hgap: f64,
    /// Space between rows, and above and below them.
    vgap: f64,
    /// Line children up by their baselines instead of centering them.
    align_on_baseline: bool,
    /// Whether rows run right to left.
    right_to_left: bool,
}

/// A visible child and what the layout pass has learned about it.
#[derive(Debug, Clone, Copy)]
struct Item {
    /// Child node.
    id: NodeId,
    /// Size assigned to the child.
    size: Size,
    /// Baseline when aligning on baselines and the child reports one.
    ascent: Option<f64>,
}

/// A packed row waiting to be positioned.
#[derive(Debug, Clone, Copy)]
struct Row<'a> {
    /// Items in the row.
    items: &'a [Item],
    /// Top edge of the row.
    top: f64,
    /// Horizontal space left over in the row.
    slack: f64,
    /// Tallest item in the row.
    height: f64,
}

impl FlowLayout {
    /// Construct a centered, gapless, left-to-right flow layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set row justification.
    pub fn align(mut self, align: FlowAlign) -> Self {
        self.align = align;
        self
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

    /// Align children on their baselines.
    pub fn align_on_baseline(mut self, on: bool) -> Self {
        self.align_on_baseline = on;
        self
    }

    /// Set the direction rows run in.
    pub fn left_to_right(mut self, ltr: bool) -> Self {
        self.right_to_left = !ltr;
        self
    }

    /// Single-row summary of the children's sizes as reported by `query`.
    fn summary(
        &self,
        tree: &Tree,
        target: NodeId,
        query: fn(&Tree, NodeId) -> Result<Size>,
    ) -> Result<Size> {
        let mut dim = Size::zero();
        let mut first = true;
        let mut max_ascent: f64 = 0.0;
        let mut max_descent: f64 = 0.0;
        for &child in tree.children(target)? {
            if !tree.is_visible(child)? {
                continue;
            }
            let d = query(tree, child)?;
            dim.h = dim.h.max(d.h);
            if !first {
                dim.w += self.hgap;
            }
            first = false;
            dim.w += d.w;
            if self.align_on_baseline
                && let Some(b) = tree.baseline(child, d.w, d.h)?
            {
                max_ascent = max_ascent.max(b);
                max_descent = max_descent.max(d.h - b);
            }
        }
        if self.align_on_baseline {
            dim.h = dim.h.max(max_ascent + max_descent);
        }
        let insets = tree.insets(target)?;
        Ok(dim.saturating_grow(
            insets.horizontal() + self.hgap * 2.0,
            insets.vertical() + self.vgap * 2.0,
        ))
    }

    /// Position the items of one row and return the row's final height.
    fn place_row(&self, tree: &mut Tree, container: f64, left: f64, row: Row<'_>) -> Result<f64> {
        let ltr = !self.right_to_left;
        let shift = match self.align {
            FlowAlign::Left if ltr => 0.0,
            FlowAlign::Left => row.slack,
            FlowAlign::Center => row.slack / 2.0,
            FlowAlign::Right if ltr => row.slack,
            FlowAlign::Right | FlowAlign::Leading => 0.0,
            FlowAlign::Trailing => row.slack,
        };
        let mut x = left + self.hgap + shift;

        let mut height = row.height;
        let mut max_ascent: f64 = 0.0;
        let mut baseline_offset = 0.0;
        if self.align_on_baseline {
            let mut max_descent: f64 = 0.0;
            let mut unaligned: f64 = 0.0;
            for item in row.items {
                match item.ascent {
                    Some(a) => {
                        max_ascent = max_ascent.max(a);
                        max_descent = max_descent.max(item.size.h - a);
                    }
                    None => unaligned = unaligned.max(item.size.h),
                }
            }
            height = unaligned.max(max_ascent + max_descent);
            baseline_offset = (height - max_ascent - max_descent) / 2.0;
        }

        for item in row.items {
            let cy = match item.ascent {
                Some(a) => row.top + baseline_offset + max_ascent - a,
                None => row.top + (height - item.size.h) / 2.0,
            };
            let cx = if ltr {
                x
            } else {
                container - x - item.size.w
            };
            tree.set_location(item.id, Point::new(cx, cy))?;
            x += item.size.w + self.hgap;
        }
        Ok(height)
    }
}

impl LayoutManager for FlowLayout {
    fn name(&self) -> &'static str {
        "FlowLayout"
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
        let insets = tree.insets(target)?;
        let container = tree.size(target)?.w;
        let max_width = container - insets.horizontal() - self.hgap * 2.0;

        let mut items = Vec::new();
        for child in tree.children(target)?.to_vec() {
            if !tree.is_visible(child)? {
                continue;
            }
            let size = tree.pref_size(child)?;
            tree.set_size(child, size)?;
            let ascent = if self.align_on_baseline {
                tree.baseline(child, size.w, size.h)?
            } else {
                None
            };
            items.push(Item {
                id: child,
                size,
                ascent,
            });
        }

        let mut top = insets.top + self.vgap;
        let mut x = 0.0;
        let mut height: f64 = 0.0;
        let mut start = 0;
        for (i, item) in items.iter().enumerate() {
            if i == start || x + self.hgap + item.size.w <= max_width {
                if i > start {
                    x += self.hgap;
                }
                x += item.size.w;
                height = height.max(item.size.h);
            } else {
                let row = Row {
                    items: &items[start..i],
                    top,
                    slack: max_width - x,
                    height,
                };
                let placed = self.place_row(tree, container, insets.left, row)?;
                top += self.vgap + placed;
                x = item.size.w;
                height = item.size.h;
                start = i;
            }
        }
        let row = Row {
            items: &items[start..],
            top,
            slack: max_width - x,
            height,
        };
        self.place_row(tree, container, insets.left, row)?;
        Ok(())
    }
}
