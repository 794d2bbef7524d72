//! Axis-aligned rectangles.

use crate::math::{Vec2, vec2};

/// An axis-aligned rectangle given by its min and max corners.
///
/// A rectangle whose `min` exceeds `max` on an axis is *negative* and
/// contains nothing. Screen coordinates are assumed (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Infinite rectangle that contains every point.
    pub const EVERYTHING: Self = Self {
        min: vec2(-f32::INFINITY, -f32::INFINITY),
        max: vec2(f32::INFINITY, f32::INFINITY),
    };

    /// The inverse of [`Self::EVERYTHING`]: contains no points, and extending
    /// it with a point yields a rect around that point.
    pub const NOTHING: Self = Self {
        min: vec2(f32::INFINITY, f32::INFINITY),
        max: vec2(-f32::INFINITY, -f32::INFINITY),
    };

    pub const NAN: Self = Self {
        min: vec2(f32::NAN, f32::NAN),
        max: vec2(f32::NAN, f32::NAN),
    };

    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    #[inline(always)]
    pub const fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    #[inline]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            max: center + size * 0.5,
        }
    }

    /// Smallest rect containing both points, in any order.
    #[inline]
    pub fn from_two_pos(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Bounding rectangle of the given points.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut rect = Self::NOTHING;
        for &p in points {
            rect.extend_with(p);
        }
        rect
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn center_top(&self) -> Vec2 {
        vec2(self.center().x, self.min.y)
    }

    #[inline]
    pub fn center_bottom(&self) -> Vec2 {
        vec2(self.center().x, self.max.y)
    }

    #[inline]
    pub fn left_center(&self) -> Vec2 {
        vec2(self.min.x, self.center().y)
    }

    #[inline]
    pub fn right_center(&self) -> Vec2 {
        vec2(self.max.x, self.center().y)
    }

    #[inline]
    pub fn left_top(&self) -> Vec2 {
        self.min
    }

    #[inline]
    pub fn right_top(&self) -> Vec2 {
        vec2(self.max.x, self.min.y)
    }

    #[inline]
    pub fn left_bottom(&self) -> Vec2 {
        vec2(self.min.x, self.max.y)
    }

    #[inline]
    pub fn right_bottom(&self) -> Vec2 {
        self.max
    }

    /// Grow the rect by `amnt` on every side.
    #[must_use]
    #[inline]
    pub fn expand(self, amnt: f32) -> Self {
        self.expand2(Vec2::splat(amnt))
    }

    /// Grow the rect by `amnt.x` horizontally and `amnt.y` vertically on each side.
    #[must_use]
    #[inline]
    pub fn expand2(self, amnt: Vec2) -> Self {
        Self::from_min_max(self.min - amnt, self.max + amnt)
    }

    #[must_use]
    #[inline]
    pub fn shrink(self, amnt: f32) -> Self {
        self.expand(-amnt)
    }

    #[must_use]
    #[inline]
    pub fn translate(self, amnt: Vec2) -> Self {
        Self::from_min_max(self.min + amnt, self.max + amnt)
    }

    /// Bounding box of this rect rotated around the origin.
    #[must_use]
    pub fn rotate_bb(self, rotation: Vec2) -> Self {
        let a = rotation.rotate(self.left_top());
        let b = rotation.rotate(self.right_top());
        let c = rotation.rotate(self.left_bottom());
        let d = rotation.rotate(self.right_bottom());

        Self::from_min_max(a.min(b).min(c).min(d), a.max(b).max(c).max(d))
    }

    #[must_use]
    #[inline]
    pub fn intersect(self, other: Self) -> Self {
        Self::from_min_max(self.min.max(other.min), self.max.min(other.max))
    }

    #[must_use]
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self::from_min_max(self.min.min(other.min), self.max.max(other.max))
    }

    /// Do the two rects share any area (or touch along an edge)?
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    #[inline]
    pub fn contains_rect(&self, other: Self) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Expand to include the given point.
    #[inline]
    pub fn extend_with(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// `min < max` on both axes.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.min.x < self.max.x && self.min.y < self.max.y
    }

    /// `max < min` on either axis.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Snap all four edges to physical pixel centers.
    #[must_use]
    pub fn round_to_pixel_center(self, pixels_per_point: f32) -> Self {
        use crate::math::round_to_pixel_center;
        Self::from_min_max(
            vec2(
                round_to_pixel_center(self.min.x, pixels_per_point),
                round_to_pixel_center(self.min.y, pixels_per_point),
            ),
            vec2(
                round_to_pixel_center(self.max.x, pixels_per_point),
                round_to_pixel_center(self.max.y, pixels_per_point),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_extends_to_point() {
        let mut rect = Rect::NOTHING;
        assert!(!rect.is_positive());
        rect.extend_with(vec2(3.0, 4.0));
        assert_eq!(rect, Rect::from_min_max(vec2(3.0, 4.0), vec2(3.0, 4.0)));
    }

    #[test]
    fn test_everything_intersects_finite() {
        let rect = Rect::from_min_size(vec2(10.0, 10.0), vec2(5.0, 5.0));
        assert!(Rect::EVERYTHING.intersects(rect));
        assert!(Rect::EVERYTHING.contains(rect.center()));
    }

    #[test]
    fn test_negative_rect() {
        let rect = Rect::from_min_max(vec2(10.0, 0.0), vec2(0.0, 10.0));
        assert!(rect.is_negative());
        assert!(!rect.is_positive());
    }

    #[test]
    fn test_disjoint_rects() {
        let a = Rect::from_min_size(Vec2::ZERO, vec2(10.0, 10.0));
        let b = Rect::from_min_size(vec2(20.0, 0.0), vec2(10.0, 10.0));
        assert!(!a.intersects(b));
        assert!(a.expand(5.0).intersects(b));
    }
}
