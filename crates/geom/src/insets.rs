/// Space reserved along each edge of a container, inside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Insets {
    /// Construct insets. Argument order is left, top, right, bottom.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// No insets.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The same inset on every edge.
    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Total horizontal inset.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}
