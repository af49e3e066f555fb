//! Size requirements along a single axis, and the arithmetic that combines
//! them.
//!
//! A [`SizeRequirement`] describes one axis of one node: how small it can get,
//! how big it would like to be, how big it can usefully grow, and where its
//! alignment point sits. The reductions turn a list of child requirements
//! into the requirement of their container, and the placement functions turn
//! an allocated extent back into per-child offsets and spans.
//!
//! None of these functions assume `minimum <= preferred <= maximum`. Inverted
//! inputs produce odd but finite results: spans are clamped to stay
//! non-negative and no arithmetic divides by zero.

use crate::geom::{clamp_size, saturating_add};

/// The sizing contract of one node along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeRequirement {
    /// The minimum size required.
    pub minimum: f64,
    /// The preferred (natural) size.
    pub preferred: f64,
    /// The maximum size allowed.
    pub maximum: f64,
    /// Position of the alignment point as a fraction of the size. 0 is the
    /// leading edge, 1 the trailing edge.
    pub alignment: f64,
}

impl SizeRequirement {
    /// Construct a requirement. Alignment is clamped into `[0, 1]`.
    pub fn new(minimum: f64, preferred: f64, maximum: f64, alignment: f64) -> Self {
        Self {
            minimum,
            preferred,
            maximum,
            alignment: clamp_alignment(alignment),
        }
    }

    /// A zero-sized requirement that keeps only an alignment.
    pub fn empty(alignment: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, alignment)
    }
}

/// The result of placing one child: where its span starts, and how long it is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Allocation {
    /// Offset from the start of the allocated extent.
    pub offset: f64,
    /// Allocated length.
    pub span: f64,
}

/// Clamp an alignment fraction into `[0, 1]`. NaN becomes 0.
fn clamp_alignment(a: f64) -> f64 {
    if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) }
}

/// Totals of each size level across a set of children, without saturation.
#[derive(Debug, Clone, Copy, Default)]
struct Sums {
    /// Sum of minimums.
    min: f64,
    /// Sum of preferred sizes.
    pref: f64,
    /// Sum of maximums.
    max: f64,
}

impl Sums {
    /// Accumulate the three levels.
    fn of(children: &[SizeRequirement]) -> Self {
        children.iter().fold(Self::default(), |acc, r| Self {
            min: acc.min + r.minimum,
            pref: acc.pref + r.preferred,
            max: acc.max + r.maximum,
        })
    }
}

/// The total space needed to place `children` end to end.
///
/// Each level is summed independently and saturates at [`MAX_SIZE`](crate::geom::MAX_SIZE). The
/// alignment of a tiled total carries no meaning and is fixed at 0.5; an
/// empty list gives an all-zero requirement.
pub fn reduce_tiled(children: &[SizeRequirement]) -> SizeRequirement {
    if children.is_empty() {
        return SizeRequirement::default();
    }
    let mut total = SizeRequirement::new(0.0, 0.0, 0.0, 0.5);
    for req in children {
        total.minimum = saturating_add(total.minimum, req.minimum);
        total.preferred = saturating_add(total.preferred, req.preferred);
        total.maximum = saturating_add(total.maximum, req.maximum);
    }
    total
}

/// Largest ascent and descent seen at one size level.
#[derive(Debug, Clone, Copy, Default)]
struct Extent {
    /// Portion before the alignment point.
    ascent: f64,
    /// Portion after the alignment point.
    descent: f64,
}

impl Extent {
    /// Fold in a child of `size` aligned at `alignment`.
    fn include(&mut self, size: f64, alignment: f64) {
        let ascent = alignment * size;
        let descent = size - ascent;
        self.ascent = self.ascent.max(ascent);
        self.descent = self.descent.max(descent);
    }

    /// The total extent, saturating at [`MAX_SIZE`](crate::geom::MAX_SIZE).
    fn total(&self) -> f64 {
        saturating_add(self.ascent, self.descent)
    }
}

/// The total space needed to overlap `children` so that their alignment
/// points coincide.
///
/// Each level keeps the largest ascent and the largest descent of any child.
/// The aggregate alignment is the minimum-level ascent as a fraction of the
/// aggregate minimum, or 0 when that minimum is zero.
pub fn reduce_aligned(children: &[SizeRequirement]) -> SizeRequirement {
    let mut min = Extent::default();
    let mut pref = Extent::default();
    let mut max = Extent::default();
    for req in children {
        min.include(req.minimum, req.alignment);
        pref.include(req.preferred, req.alignment);
        max.include(req.maximum, req.alignment);
    }
    let minimum = min.total();
    let alignment = if minimum > 0.0 {
        min.ascent / minimum
    } else {
        0.0
    };
    SizeRequirement::new(minimum, pref.total(), max.total(), alignment)
}

/// Lay `children` out end to end inside `allocated`.
///
/// When there is at least the total preferred space, every child grows from
/// its preferred size towards its maximum by the same fraction of its own
/// headroom. Otherwise every child shrinks towards its minimum by the same
/// fraction. The fraction is shared across all children and is not clamped
/// per child.
///
/// With `forward` set, offsets increase from zero. Without it, children are
/// placed from the far end backwards, mirroring the axis: children that
/// overflow the allocation run off the leading edge with negative offsets.
pub fn place_tiled(allocated: f64, children: &[SizeRequirement], forward: bool) -> Vec<Allocation> {
    let sums = Sums::of(children);
    let spans: Vec<f64> = if allocated >= sums.pref {
        let headroom = sums.max - sums.pref;
        let play = (allocated - sums.pref).min(headroom);
        let factor = if headroom == 0.0 { 0.0 } else { play / headroom };
        children
            .iter()
            .map(|r| clamp_size(r.preferred + factor * (r.maximum - r.preferred)))
            .collect()
    } else {
        let legroom = sums.pref - sums.min;
        let play = (sums.pref - allocated).min(legroom);
        let factor = if legroom == 0.0 { 0.0 } else { play / legroom };
        children
            .iter()
            .map(|r| clamp_size(r.preferred - factor * (r.preferred - r.minimum)))
            .collect()
    };
    let mut out = Vec::with_capacity(spans.len());
    if forward {
        let mut offset = 0.0;
        for span in spans {
            out.push(Allocation { offset, span });
            offset = saturating_add(offset, span);
        }
    } else {
        let mut end = allocated;
        for span in spans {
            out.push(Allocation {
                offset: end - span,
                span,
            });
            end = (end - span).max(0.0);
        }
    }
    out
}

/// Overlap `children` inside `allocated`, each positioned by its own
/// alignment.
///
/// The container's alignment point is taken from [`reduce_aligned`] over the
/// same children. Each child extends from that point as far as its maximum
/// allows, without crossing either edge of the allocation. With `normal`
/// unset, every alignment is flipped so that 0 means the trailing edge.
pub fn place_aligned(
    allocated: f64,
    children: &[SizeRequirement],
    normal: bool,
) -> Vec<Allocation> {
    let total = reduce_aligned(children);
    let flip = |a: f64| if normal { a } else { 1.0 - a };
    let total_ascent = allocated * flip(total.alignment);
    let total_descent = allocated - total_ascent;
    children
        .iter()
        .map(|req| {
            let alignment = flip(req.alignment);
            let max_ascent = req.maximum * alignment;
            let max_descent = req.maximum - max_ascent;
            let ascent = total_ascent.min(max_ascent);
            let descent = total_descent.min(max_descent);
            Allocation {
                offset: total_ascent - ascent,
                span: clamp_size(ascent + descent),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geom::MAX_SIZE;

    /// A requirement pinned to one value.
    fn fixed(v: f64) -> SizeRequirement {
        SizeRequirement::new(v, v, v, 0.5)
    }

    /// Spans of each allocation.
    fn spans(allocations: &[Allocation]) -> Vec<f64> {
        allocations.iter().map(|a| a.span).collect()
    }

    /// Offsets of each allocation.
    fn offsets(allocations: &[Allocation]) -> Vec<f64> {
        allocations.iter().map(|a| a.offset).collect()
    }

    #[test]
    fn alignment_clamped() {
        assert_eq!(SizeRequirement::new(0.0, 0.0, 0.0, 2.0).alignment, 1.0);
        assert_eq!(SizeRequirement::new(0.0, 0.0, 0.0, -1.0).alignment, 0.0);
        assert_eq!(SizeRequirement::new(0.0, 0.0, 0.0, f64::NAN).alignment, 0.0);
    }

    #[test]
    fn empty_reductions() {
        assert_eq!(reduce_tiled(&[]), SizeRequirement::default());
        assert_eq!(reduce_aligned(&[]), SizeRequirement::default());
        assert!(place_tiled(100.0, &[], true).is_empty());
        assert!(place_aligned(100.0, &[], true).is_empty());
    }

    #[test]
    fn tiled_sums() {
        let total = reduce_tiled(&[
            SizeRequirement::new(1.0, 2.0, 3.0, 0.0),
            SizeRequirement::new(10.0, 20.0, 30.0, 1.0),
        ]);
        assert_eq!(total, SizeRequirement::new(11.0, 22.0, 33.0, 0.5));
    }

    #[test]
    fn tiled_saturates() {
        let total = reduce_tiled(&[
            SizeRequirement::new(0.0, 0.0, MAX_SIZE, 0.5),
            SizeRequirement::new(0.0, 0.0, MAX_SIZE, 0.5),
        ]);
        assert_eq!(total.maximum, MAX_SIZE);
    }

    #[test]
    fn aligned_combines_ascent_and_descent() {
        // One child hangs mostly above the alignment point, the other below.
        let total = reduce_aligned(&[
            SizeRequirement::new(10.0, 10.0, 10.0, 1.0),
            SizeRequirement::new(20.0, 20.0, 20.0, 0.0),
        ]);
        assert_eq!(total.minimum, 30.0);
        assert_eq!(total.preferred, 30.0);
        assert!((total.alignment - 10.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn aligned_zero_minimum_has_zero_alignment() {
        let total = reduce_aligned(&[SizeRequirement::new(0.0, 10.0, 20.0, 0.5)]);
        assert_eq!(total.alignment, 0.0);
        assert_eq!(total.preferred, 10.0);
        assert_eq!(total.maximum, 20.0);
    }

    #[test]
    fn tiled_at_preferred_is_exact() {
        let children = [
            SizeRequirement::new(0.0, 10.0, 100.0, 0.5),
            SizeRequirement::new(5.0, 20.0, 30.0, 0.5),
        ];
        let placed = place_tiled(30.0, &children, true);
        assert_eq!(spans(&placed), vec![10.0, 20.0]);
        assert_eq!(offsets(&placed), vec![0.0, 10.0]);
    }

    #[test]
    fn tiled_fixed_children() {
        let children = [fixed(10.0), fixed(20.0), fixed(30.0)];
        let placed = place_tiled(60.0, &children, true);
        assert_eq!(spans(&placed), vec![10.0, 20.0, 30.0]);
        assert_eq!(offsets(&placed), vec![0.0, 10.0, 30.0]);
    }

    #[test]
    fn tiled_expansion_shares_headroom() {
        let children = [
            SizeRequirement::new(0.0, 10.0, 20.0, 0.5),
            SizeRequirement::new(0.0, 10.0, 40.0, 0.5),
        ];
        // 20 units of slack over 40 units of headroom: everyone gets half.
        let placed = place_tiled(40.0, &children, true);
        assert_eq!(spans(&placed), vec![15.0, 25.0]);
    }

    #[test]
    fn tiled_expansion_stops_at_maximum() {
        let children = [SizeRequirement::new(0.0, 10.0, 20.0, 0.5)];
        let placed = place_tiled(500.0, &children, true);
        assert_eq!(spans(&placed), vec![20.0]);
    }

    #[test]
    fn tiled_compression_shares_legroom() {
        let children = [
            SizeRequirement::new(0.0, 20.0, 20.0, 0.5),
            SizeRequirement::new(10.0, 30.0, 30.0, 0.5),
        ];
        // Preferred total 50, minimum total 10, allocated 30: factor 0.5.
        let placed = place_tiled(30.0, &children, true);
        assert_eq!(spans(&placed), vec![10.0, 20.0]);
    }

    #[test]
    fn tiled_compression_stops_at_minimum() {
        let children = [fixed(10.0), fixed(20.0)];
        let placed = place_tiled(5.0, &children, true);
        assert_eq!(spans(&placed), vec![10.0, 20.0]);
    }

    #[test]
    fn tiled_reverse_mirrors() {
        let children = [fixed(10.0), fixed(20.0)];
        let placed = place_tiled(50.0, &children, false);
        assert_eq!(offsets(&placed), vec![40.0, 20.0]);
        assert_eq!(spans(&placed), vec![10.0, 20.0]);
    }

    #[test]
    fn tiled_reverse_overflow_runs_off_leading_edge() {
        let children = [fixed(10.0), fixed(20.0)];
        let placed = place_tiled(25.0, &children, false);
        assert_eq!(offsets(&placed), vec![15.0, -5.0]);
        assert_eq!(spans(&placed), vec![10.0, 20.0]);
    }

    #[test]
    fn tiled_inverted_constraints_stay_non_negative() {
        let children = [
            SizeRequirement::new(50.0, 10.0, 0.0, 0.5),
            SizeRequirement::new(0.0, 40.0, 5.0, 0.5),
        ];
        for allocated in [0.0, 10.0, 50.0, 1000.0] {
            for forward in [true, false] {
                for a in place_tiled(allocated, &children, forward) {
                    assert!(a.span >= 0.0 && a.span.is_finite());
                    assert!(a.offset.is_finite());
                    if forward {
                        assert!(a.offset >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn aligned_single_centered_child_fills() {
        let placed = place_aligned(100.0, &[fixed(100.0)], true);
        assert_eq!(placed, vec![Allocation {
            offset: 0.0,
            span: 100.0
        }]);
    }

    #[test]
    fn aligned_small_child_is_centered() {
        let children = [fixed(100.0), fixed(40.0)];
        let placed = place_aligned(100.0, &children, true);
        assert_eq!(placed[1], Allocation {
            offset: 30.0,
            span: 40.0
        });
    }

    #[test]
    fn aligned_reverse_flips() {
        let children = [
            SizeRequirement::new(100.0, 100.0, 100.0, 0.0),
            SizeRequirement::new(20.0, 20.0, 20.0, 0.0),
        ];
        let normal = place_aligned(100.0, &children, true);
        assert_eq!(normal[1].offset, 0.0);
        let flipped = place_aligned(100.0, &children, false);
        assert_eq!(flipped[1].offset, 80.0);
    }

    fn requirement() -> impl Strategy<Value = SizeRequirement> {
        (0.0..1000.0f64, 0.0..1000.0f64, 0.0..1000.0f64, 0.0..=1.0f64).prop_map(
            |(a, b, c, align)| {
                let mut v = [a, b, c];
                v.sort_by(f64::total_cmp);
                SizeRequirement::new(v[0], v[1], v[2], align)
            },
        )
    }

    proptest! {
        #[test]
        fn tiled_single_is_identity(req in requirement()) {
            let total = reduce_tiled(&[req]);
            prop_assert_eq!(total.minimum, req.minimum);
            prop_assert_eq!(total.preferred, req.preferred);
            prop_assert_eq!(total.maximum, req.maximum);
        }

        #[test]
        fn tiled_never_overshoots(
            children in prop::collection::vec(requirement(), 0..8),
            extra in 0.0..5000.0f64,
        ) {
            let min: f64 = children.iter().map(|r| r.minimum).sum();
            let allocated = min + extra;
            let placed = place_tiled(allocated, &children, true);
            let used: f64 = placed.iter().map(|a| a.span).sum();
            prop_assert!(used <= allocated + 1e-6);
            for pair in placed.windows(2) {
                prop_assert!(pair[0].offset <= pair[1].offset);
            }
        }

        #[test]
        fn tiled_at_preferred_returns_preferred(
            children in prop::collection::vec(requirement(), 1..8),
        ) {
            let pref: f64 = children.iter().map(|r| r.preferred).sum();
            let placed = place_tiled(pref, &children, true);
            for (a, r) in placed.iter().zip(&children) {
                prop_assert!((a.span - r.preferred).abs() < 1e-6);
            }
        }

        #[test]
        fn aligned_stays_inside_allocation(
            children in prop::collection::vec(requirement(), 1..8),
            allocated in 0.0..2000.0f64,
            normal in any::<bool>(),
        ) {
            for a in place_aligned(allocated, &children, normal) {
                prop_assert!(a.offset >= -1e-6);
                prop_assert!(a.offset + a.span <= allocated + 1e-6);
            }
        }
    }
}
