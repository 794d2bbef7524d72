//! Math helpers on top of `glam`.
//!
//! Positions and directions are both represented by [`Vec2`]; the y-axis
//! points down, so "clockwise" below means clockwise on screen.

use std::ops::RangeInclusive;

pub use glam::{Affine2, Mat2, Vec2, vec2};

/// Linearly remap `x` from range `from` to range `to`.
///
/// The ranges may be inverted. `x` is not clamped.
#[inline]
pub fn remap(x: f32, from: RangeInclusive<f32>, to: RangeInclusive<f32>) -> f32 {
    let (from_min, from_max) = from.into_inner();
    let (to_min, to_max) = to.into_inner();
    let t = (x - from_min) / (from_max - from_min);
    to_min + t * (to_max - to_min)
}

/// Like [`remap`], but clamps `x` into the `from` range first.
#[inline]
pub fn remap_clamp(x: f32, from: RangeInclusive<f32>, to: RangeInclusive<f32>) -> f32 {
    let (from_min, from_max) = from.into_inner();
    let (to_min, to_max) = to.into_inner();
    if from_max < from_min {
        return remap_clamp(x, from_max..=from_min, to_max..=to_min);
    }
    if x <= from_min {
        to_min
    } else if from_max <= x {
        to_max
    } else {
        let t = (x - from_min) / (from_max - from_min);
        to_min + t * (to_max - to_min)
    }
}

/// Rotate a vector by 90 degrees, taking positive x to negative y.
///
/// For a clockwise (on screen) outline, `rot90(edge_direction)` is the
/// outward normal of that edge.
#[inline(always)]
pub fn rot90(v: Vec2) -> Vec2 {
    vec2(v.y, -v.x)
}

/// Round a coordinate in points to the nearest physical pixel edge.
#[inline]
pub fn round_to_pixel(point: f32, pixels_per_point: f32) -> f32 {
    (point * pixels_per_point).round() / pixels_per_point
}

/// Round a coordinate in points to the nearest physical pixel center.
#[inline]
pub fn round_to_pixel_center(point: f32, pixels_per_point: f32) -> f32 {
    ((point * pixels_per_point - 0.5).round() + 0.5) / pixels_per_point
}

/// Largest component of a vector.
#[inline]
pub fn max_elem(v: Vec2) -> f32 {
    v.x.max(v.y)
}

/// Smallest component of a vector.
#[inline]
pub fn min_elem(v: Vec2) -> f32 {
    v.x.min(v.y)
}
