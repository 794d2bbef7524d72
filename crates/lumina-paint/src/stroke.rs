//! Stroke and corner-rounding descriptions.

use crate::Color32;

/// Describes the width and color of a line.
///
/// The default stroke is the same as [`Stroke::NONE`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stroke {
    /// Width in points.
    pub width: f32,
    pub color: Color32,
}

impl Stroke {
    /// Same as [`Stroke::default`].
    pub const NONE: Self = Self {
        width: 0.0,
        color: Color32::TRANSPARENT,
    };

    #[inline]
    pub fn new(width: impl Into<f32>, color: impl Into<Color32>) -> Self {
        Self {
            width: width.into(),
            color: color.into(),
        }
    }

    /// True if width is zero or color is transparent
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.color == Color32::TRANSPARENT
    }

    /// Half the width, or zero for an empty stroke.
    ///
    /// This is how far the stroke reaches outside the outline it follows.
    #[inline]
    pub fn half_width(&self) -> f32 {
        if self.is_empty() { 0.0 } else { 0.5 * self.width }
    }
}

impl<Color> From<(f32, Color)> for Stroke
where
    Color: Into<Color32>,
{
    #[inline(always)]
    fn from((width, color): (f32, Color)) -> Self {
        Self::new(width, color)
    }
}

// ----------------------------------------------------------------------------

/// How rounded the corners of a rectangle are, in points.
///
/// `nw` is the top-left corner (y points down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rounding {
    /// Radius of the rounding of the North-West (left top) corner.
    pub nw: f32,
    /// Radius of the rounding of the North-East (right top) corner.
    pub ne: f32,
    /// Radius of the rounding of the South-West (left bottom) corner.
    pub sw: f32,
    /// Radius of the rounding of the South-East (right bottom) corner.
    pub se: f32,
}

impl From<f32> for Rounding {
    #[inline]
    fn from(radius: f32) -> Self {
        Self::same(radius)
    }
}

impl Rounding {
    /// No rounding on any corner.
    pub const ZERO: Self = Self {
        nw: 0.0,
        ne: 0.0,
        sw: 0.0,
        se: 0.0,
    };

    /// Same rounding on all four corners.
    #[inline]
    pub const fn same(radius: f32) -> Self {
        Self {
            nw: radius,
            ne: radius,
            sw: radius,
            se: radius,
        }
    }

    /// Do all corners have the same rounding?
    #[inline]
    pub fn is_same(&self) -> bool {
        self.nw == self.ne && self.nw == self.sw && self.nw == self.se
    }

    /// Make sure each corner has a rounding of at least this.
    #[inline]
    pub fn at_least(&self, min: f32) -> Self {
        Self {
            nw: self.nw.max(min),
            ne: self.ne.max(min),
            sw: self.sw.max(min),
            se: self.se.max(min),
        }
    }

    /// Make sure each corner has a rounding of at most this.
    #[inline]
    pub fn at_most(&self, max: f32) -> Self {
        Self {
            nw: self.nw.min(max),
            ne: self.ne.min(max),
            sw: self.sw.min(max),
            se: self.se.min(max),
        }
    }

    /// Clamp every corner into `0.0..=max`.
    ///
    /// Used with `max = min(width, height) / 2` so opposite corners can never
    /// overlap.
    #[inline]
    pub fn clamp(&self, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            nw: self.nw.clamp(0.0, max),
            ne: self.ne.clamp(0.0, max),
            sw: self.sw.clamp(0.0, max),
            se: self.se.clamp(0.0, max),
        }
    }

    /// The largest corner radius.
    #[inline]
    pub fn max(&self) -> f32 {
        self.nw.max(self.ne).max(self.sw).max(self.se)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.max() <= 0.0
    }
}

impl std::ops::Add<f32> for Rounding {
    type Output = Self;

    /// Grow every corner by `rhs` (shrink if negative), never below zero.
    #[inline]
    fn add(self, rhs: f32) -> Self {
        Self {
            nw: (self.nw + rhs).max(0.0),
            ne: (self.ne + rhs).max(0.0),
            sw: (self.sw + rhs).max(0.0),
            se: (self.se + rhs).max(0.0),
        }
    }
}

impl std::ops::AddAssign<f32> for Rounding {
    #[inline]
    fn add_assign(&mut self, rhs: f32) {
        *self = *self + rhs;
    }
}

impl std::ops::Mul<f32> for Rounding {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self {
            nw: self.nw * rhs,
            ne: self.ne * rhs,
            sw: self.sw * rhs,
            se: self.se * rhs,
        }
    }
}
