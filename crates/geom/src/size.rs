use std::str::FromStr;

use super::{Error, MAX_SIZE, Point, Rect, Result, saturating_add};

/// A `Size` is a rectangle that has a width and height but no location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Size {
    /// The largest representable size in both dimensions.
    pub const MAX: Self = Self {
        w: MAX_SIZE,
        h: MAX_SIZE,
    };

    /// Construct a size.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Construct a size, rejecting negative or non-finite dimensions.
    pub fn checked(w: f64, h: f64) -> Result<Self> {
        if !w.is_finite() || !h.is_finite() {
            return Err(Error::Geometry(format!("non-finite size {w}x{h}")));
        }
        if w < 0.0 || h < 0.0 {
            return Err(Error::Geometry(format!("negative size {w}x{h}")));
        }
        Ok(Self { w, h })
    }

    /// A zero-valued size.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Return a `Rect` with the same dimensions, located at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// Grow by an amount in each dimension, saturating at [`MAX_SIZE`].
    pub fn saturating_grow(&self, dw: f64, dh: f64) -> Self {
        Self {
            w: saturating_add(self.w, dw),
            h: saturating_add(self.h, dh),
        }
    }
}

impl From<Rect> for Size {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(f64, f64)> for Size {
    fn from(v: (f64, f64)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

impl FromStr for Size {
    type Err = Error;

    /// Parse a size written as `WIDTHxHEIGHT`, e.g. `640x480`.
    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::Geometry(format!("expected WIDTHxHEIGHT, got {s:?}")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| Error::Geometry(format!("invalid dimension {v:?}: {e}")))
        };
        Self::checked(parse(w)?, parse(h)?)
    }
}
