use super::{Insets, Point, Size};

/// A rectangle: a top-left corner plus a width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// A zero rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The size of this rectangle.
    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    /// A rectangle with the same size at a new location.
    pub fn at(&self, p: impl Into<Point>) -> Self {
        Self {
            tl: p.into(),
            w: self.w,
            h: self.h,
        }
    }

    /// The x coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.tl.x + self.w
    }

    /// The y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.tl.y + self.h
    }

    /// Shrink the rectangle by the insets. The result never has a negative
    /// size.
    pub fn inset(&self, insets: Insets) -> Self {
        Self {
            tl: Point {
                x: self.tl.x + insets.left,
                y: self.tl.y + insets.top,
            },
            w: (self.w - insets.horizontal()).max(0.0),
            h: (self.h - insets.vertical()).max(0.0),
        }
    }
}

impl From<Size> for Rect {
    fn from(s: Size) -> Self {
        s.rect()
    }
}
