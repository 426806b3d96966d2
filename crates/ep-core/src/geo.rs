//! Flat 2-D world geometry.
//!
//! The world is a plain rectangle in `f64` coordinates; there is no map
//! projection and no topology.  `Bounds` is used for the world box, the
//! isolation ward, the per-agent infection zone and the wander box around a
//! destination.

/// An axis-aligned rectangle `[min_x, max_x] × [min_y, max_y]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    #[inline]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Build from separate `[min, max]` pairs per axis.
    #[inline]
    pub fn from_axes(x: [f64; 2], y: [f64; 2]) -> Self {
        Self::new(x[0], y[0], x[1], y[1])
    }

    /// Build from a `[min_x, min_y, max_x, max_y]` array (the isolation-bounds
    /// layout used in configuration files).
    #[inline]
    pub fn from_corners(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Square of half-width `half` centred on `(x, y)`.
    #[inline]
    pub fn around(x: f64, y: f64, half: f64) -> Self {
        Self::new(x - half, y - half, x + half, y + half)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `true` if the rectangle has a strictly positive area.
    #[inline]
    pub fn has_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Centre point `(x, y)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.min_x + self.width() / 2.0, self.min_y + self.height() / 2.0)
    }

    /// Half-dimensions `(half_width, half_height)`: the wander half-extent of
    /// an agent routed into this rectangle.
    #[inline]
    pub fn half_extents(&self) -> (f64, f64) {
        (self.width() / 2.0, self.height() / 2.0)
    }

    /// Shrink every edge inward by `margin`.
    #[inline]
    pub fn inset(&self, margin: f64) -> Self {
        Self::new(
            self.min_x + margin,
            self.min_y + margin,
            self.max_x - margin,
            self.max_y - margin,
        )
    }

    /// Strict (open-interval) containment on both axes.
    #[inline]
    pub fn contains_strict(&self, x: f64, y: f64) -> bool {
        self.min_x < x && x < self.max_x && self.min_y < y && y < self.max_y
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}] x [{:.3}, {:.3}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}
