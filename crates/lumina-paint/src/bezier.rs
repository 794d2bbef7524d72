//! Quadratic and cubic Bézier shapes and their flattening into polylines.
//!
//! Quadratics are flattened with the parabola arc-length approximation from
//! Raph Levien's "flattening quadratic Béziers": the curve is mapped onto a
//! segment of `y = x²`, where the number of subdivisions needed for a given
//! tolerance has a closed form, and then stepped with non-uniform `t`.
//! Cubics are approximated by a sequence of quadratics first.

use std::ops::Range;

use lumina_core::geometry::Rect;
use lumina_core::math::{Affine2, Vec2, vec2};
use lumina_core::profiling::profile_function;

use crate::{Color32, PathShape, Stroke};

/// A cubic [Bézier Curve](https://en.wikipedia.org/wiki/B%C3%A9zier_curve).
///
/// See also [`QuadraticBezierShape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezierShape {
    /// The first point is the starting point and the last one is the ending
    /// point. The middle points are the control points.
    pub points: [Vec2; 4],
    pub closed: bool,

    pub fill: Color32,
    pub stroke: Stroke,
}

impl CubicBezierShape {
    /// Creates a cubic Bézier curve based on 4 points and stroke.
    ///
    /// The first point is the starting point and the last one is the ending
    /// point. The middle points are the control points.
    pub fn from_points_stroke(
        points: [Vec2; 4],
        closed: bool,
        fill: Color32,
        stroke: impl Into<Stroke>,
    ) -> Self {
        Self {
            points,
            closed,
            fill,
            stroke: stroke.into(),
        }
    }

    /// Transform the curve with the given transform.
    pub fn transform(&self, transform: &Affine2) -> Self {
        let mut points = [Vec2::ZERO; 4];
        for (i, origin_point) in self.points.iter().enumerate() {
            points[i] = transform.transform_point2(*origin_point);
        }
        Self { points, ..*self }
    }

    /// Convert the cubic Bézier curve to one or two [`PathShape`]s.
    ///
    /// When the curve is closed and it has to intersect with the base line,
    /// it will be converted into two shapes. Otherwise, it will be converted
    /// into one shape. The `tolerance` will be used to control the max
    /// distance between the curve and the base line. The `epsilon` is used
    /// when comparing two floats.
    pub fn to_path_shapes(&self, tolerance: Option<f32>, epsilon: Option<f32>) -> Vec<PathShape> {
        self.flatten_closed(tolerance, epsilon)
            .into_iter()
            .map(|points| PathShape {
                points,
                closed: self.closed,
                fill: self.fill,
                stroke: self.stroke,
            })
            .collect()
    }

    /// The visual bounding rectangle (includes stroke width).
    pub fn visual_bounding_rect(&self) -> Rect {
        if self.fill == Color32::TRANSPARENT && self.stroke.is_empty() {
            Rect::NOTHING
        } else {
            self.logical_bounding_rect().expand(self.stroke.width / 2.0)
        }
    }

    /// Logical bounding rectangle (ignoring stroke width).
    pub fn logical_bounding_rect(&self) -> Rect {
        let mut bounds = Rect::from_two_pos(self.points[0], self.points[3]);

        // Extremes in x and y happen where the derivative of that coordinate
        // vanishes.
        let [p0, p1, p2, p3] = self.points;
        cubic_for_each_local_extremum(p0.x, p1.x, p2.x, p3.x, &mut |t| {
            bounds.extend_with(self.sample(t));
        });
        cubic_for_each_local_extremum(p0.y, p1.y, p2.y, p3.y, &mut |t| {
            bounds.extend_with(self.sample(t));
        });

        bounds
    }

    /// Split the curve at `t` using De Casteljau's algorithm.
    pub fn split(&self, t: f32) -> (Self, Self) {
        let [p0, p1, p2, p3] = self.points;

        let p01 = p0.lerp(p1, t);
        let p12 = p1.lerp(p2, t);
        let p23 = p2.lerp(p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let p0123 = p012.lerp(p123, t);

        (
            Self {
                points: [p0, p01, p012, p0123],
                ..*self
            },
            Self {
                points: [p0123, p123, p23, p3],
                ..*self
            },
        )
    }

    /// The part of the curve between `t_range.start` and `t_range.end`,
    /// itself a cubic Bézier curve.
    pub fn split_range(&self, t_range: Range<f32>) -> Self {
        assert!(
            (0.0..=1.0).contains(&t_range.start)
                && (0.0..=1.0).contains(&t_range.end)
                && t_range.start <= t_range.end,
            "range should be in [0.0,1.0], got {t_range:?}"
        );

        if t_range.end <= 0.0 {
            let p = self.points[0];
            return Self {
                points: [p; 4],
                ..*self
            };
        }

        let (head, _) = self.split(t_range.end);

        // Re-parametrize the start onto the head curve.
        let (_, piece) = head.split(t_range.start / t_range.end);
        piece
    }

    /// Number of quadratic curves needed to approximate this cubic within
    /// `tolerance`.
    ///
    /// From "Approximating cubic Bézier curves by quadratic ones",
    /// `n = ceil((d² / (432 tol²))^(1/6))` where `d = |p0 - 3 p1 + 3 p2 - p3|`.
    pub fn num_quadratics(&self, tolerance: f32) -> u32 {
        debug_assert!(tolerance > 0.0, "the tolerance should be positive");

        let [p0, p1, p2, p3] = self.points;
        let d = p0 - 3.0 * p1 + 3.0 * p2 - p3;
        let err = d.length_squared();

        (err / (432.0 * tolerance * tolerance))
            .powf(1.0 / 6.0)
            .ceil()
            .max(1.0) as u32
    }

    /// Find the `t` where the curve crosses the chord from its first to its
    /// last point, excluding the end points themselves.
    ///
    /// Substituting the curve into the chord's line equation gives
    /// `a t³ + b t² + c t = 0`. Both end points lie on the chord, so 0 and 1
    /// are always roots and the product of the roots of the remaining
    /// quadratic makes the third one `c / a`. It is returned when it lies
    /// strictly inside `(epsilon, 1 - epsilon)`.
    pub fn find_cross_t(&self, epsilon: f32) -> Option<f32> {
        let [p0, p1, p2, p3] = self.points;

        let chord = p3 - p0;
        if chord.length() < epsilon {
            return None;
        }

        let cross = |v: Vec2| v.x * chord.y - v.y * chord.x;
        let a = cross(p3 - 3.0 * p2 + 3.0 * p1 - p0);
        let c = cross(3.0 * p1 - 3.0 * p0);

        if a.abs() < epsilon {
            // At most quadratic: only the end points are on the chord.
            return None;
        }

        let t = c / a;
        (t > epsilon && t < 1.0 - epsilon).then_some(t)
    }

    /// Calculate the point (x,y) at t based on the cubic Bézier curve equation.
    pub fn sample(&self, t: f32) -> Vec2 {
        debug_assert!(
            (0.0..=1.0).contains(&t),
            "t should be in [0.0,1.0], got {t}"
        );

        let h = 1.0 - t;
        let a = t * t * t;
        let b = 3.0 * t * t * h;
        let c = 3.0 * t * h * h;
        let d = h * h * h;
        self.points[3] * a + self.points[2] * b + self.points[1] * c + self.points[0] * d
    }

    /// Find out the points on the curve which are within `tolerance` of the
    /// curve, starting with the first point.
    ///
    /// If `tolerance` is `None`, a tolerance relative to the horizontal
    /// extent is used.
    pub fn flatten(&self, tolerance: Option<f32>) -> Vec<Vec2> {
        profile_function!();
        let tolerance = tolerance.unwrap_or_else(|| self.default_tolerance());
        let mut result = vec![self.points[0]];
        self.for_each_flattened_with_t(tolerance, &mut |p, _t| {
            result.push(p);
        });
        result
    }

    /// Like [`Self::flatten`], but a closed curve that crosses its own chord
    /// is split into two polylines at the crossing, each of which can be
    /// filled as a convex-ish polygon.
    ///
    /// The crossing point ends the first polyline and starts the second.
    pub fn flatten_closed(&self, tolerance: Option<f32>, epsilon: Option<f32>) -> Vec<Vec<Vec2>> {
        profile_function!();
        let tolerance = tolerance.unwrap_or_else(|| self.default_tolerance());
        let epsilon = epsilon.unwrap_or(1.0e-5);

        let mut first_half = vec![self.points[0]];
        let mut second_half = Vec::new();

        match self.find_cross_t(epsilon).filter(|_| self.closed) {
            Some(cross) => {
                let mut flipped = false;
                self.for_each_flattened_with_t(tolerance, &mut |p, t| {
                    if t < cross {
                        first_half.push(p);
                    } else {
                        if !flipped {
                            flipped = true;
                            let cross_point = self.sample(cross);
                            first_half.push(cross_point);
                            second_half.push(cross_point);
                        }
                        second_half.push(p);
                    }
                });
            }
            None => {
                self.for_each_flattened_with_t(tolerance, &mut |p, _t| {
                    first_half.push(p);
                });
            }
        }

        let mut result = vec![first_half];
        if !second_half.is_empty() {
            result.push(second_half);
        }
        result
    }

    /// Iterates through the curve invoking a callback at each point,
    /// excluding the first one.
    pub fn for_each_flattened_with_t<F: FnMut(Vec2, f32)>(&self, tolerance: f32, callback: &mut F) {
        flatten_cubic_bezier_with_t(self, tolerance, callback);
    }

    fn default_tolerance(&self) -> f32 {
        (self.points[0].x - self.points[3].x).abs() * 0.001
    }
}

impl From<CubicBezierShape> for crate::Shape {
    #[inline(always)]
    fn from(shape: CubicBezierShape) -> Self {
        Self::CubicBezier(shape)
    }
}

// ----------------------------------------------------------------------------

/// A quadratic [Bézier Curve](https://en.wikipedia.org/wiki/B%C3%A9zier_curve).
///
/// See also [`CubicBezierShape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticBezierShape {
    /// The first point is the starting point and the last one is the ending
    /// point. The middle point is the control point.
    pub points: [Vec2; 3],
    pub closed: bool,

    pub fill: Color32,
    pub stroke: Stroke,
}

impl QuadraticBezierShape {
    /// Create a new quadratic Bézier shape based on the 3 points and stroke.
    pub fn from_points_stroke(
        points: [Vec2; 3],
        closed: bool,
        fill: Color32,
        stroke: impl Into<Stroke>,
    ) -> Self {
        Self {
            points,
            closed,
            fill,
            stroke: stroke.into(),
        }
    }

    /// Transform the curve with the given transform.
    pub fn transform(&self, transform: &Affine2) -> Self {
        let mut points = [Vec2::ZERO; 3];
        for (i, origin_point) in self.points.iter().enumerate() {
            points[i] = transform.transform_point2(*origin_point);
        }
        Self { points, ..*self }
    }

    /// Convert the quadratic Bézier curve to one [`PathShape`].
    /// The `tolerance` will be used to control the max distance between the
    /// curve and the base line.
    pub fn to_path_shape(&self, tolerance: Option<f32>) -> PathShape {
        let points = self.flatten(tolerance);
        PathShape {
            points,
            closed: self.closed,
            fill: self.fill,
            stroke: self.stroke,
        }
    }

    /// The visual bounding rectangle (includes stroke width).
    pub fn visual_bounding_rect(&self) -> Rect {
        if self.fill == Color32::TRANSPARENT && self.stroke.is_empty() {
            Rect::NOTHING
        } else {
            self.logical_bounding_rect().expand(self.stroke.width / 2.0)
        }
    }

    /// Logical bounding rectangle (ignoring stroke width).
    pub fn logical_bounding_rect(&self) -> Rect {
        let mut bounds = Rect::from_two_pos(self.points[0], self.points[2]);

        let [p0, p1, p2] = self.points;
        quadratic_for_each_local_extremum(p0.x, p1.x, p2.x, &mut |t| {
            bounds.extend_with(self.sample(t));
        });
        quadratic_for_each_local_extremum(p0.y, p1.y, p2.y, &mut |t| {
            bounds.extend_with(self.sample(t));
        });

        bounds
    }

    /// Calculate the point (x,y) at t based on the quadratic Bézier curve
    /// equation.
    pub fn sample(&self, t: f32) -> Vec2 {
        debug_assert!(
            (0.0..=1.0).contains(&t),
            "t should be in [0.0,1.0], got {t}"
        );

        let h = 1.0 - t;
        let a = t * t;
        let b = 2.0 * t * h;
        let c = h * h;
        self.points[2] * a + self.points[1] * b + self.points[0] * c
    }

    /// Find out the points on the curve which are within `tolerance` of the
    /// curve, starting with the first point.
    ///
    /// If `tolerance` is `None`, a tolerance relative to the horizontal
    /// extent is used.
    pub fn flatten(&self, tolerance: Option<f32>) -> Vec<Vec2> {
        profile_function!();
        let tolerance =
            tolerance.unwrap_or_else(|| (self.points[0].x - self.points[2].x).abs() * 0.001);
        let mut result = vec![self.points[0]];
        self.for_each_flattened_with_t(tolerance, &mut |p, _t| {
            result.push(p);
        });
        result
    }

    /// Compute a flattened approximation of the curve, invoking a callback at
    /// each step, excluding the first point.
    ///
    /// The callback takes the point and corresponding curve parameter at each
    /// step.
    pub fn for_each_flattened_with_t<F: FnMut(Vec2, f32)>(&self, tolerance: f32, callback: &mut F) {
        let params = FlatteningParameters::from_curve(self, tolerance);
        if params.is_point {
            return;
        }

        let count = params.count as u32;
        for index in 1..count {
            let t = params.t_at_iteration(index as f32);

            callback(self.sample(t), t);
        }

        callback(self.sample(1.0), 1.0);
    }
}

impl From<QuadraticBezierShape> for crate::Shape {
    #[inline(always)]
    fn from(shape: QuadraticBezierShape) -> Self {
        Self::QuadraticBezier(shape)
    }
}

// ----------------------------------------------------------------------------

struct FlatteningParameters {
    count: f32,
    integral_from: f32,
    integral_step: f32,
    inv_integral_from: f32,
    div_inv_integral_diff: f32,
    is_point: bool,
}

impl FlatteningParameters {
    fn from_curve(curve: &QuadraticBezierShape, tolerance: f32) -> Self {
        // Map the quadratic bézier segment to y = x^2 parabola.
        let [from, ctrl, to] = curve.points;
        let ddx = 2.0 * ctrl.x - from.x - to.x;
        let ddy = 2.0 * ctrl.y - from.y - to.y;
        let cross = (to.x - from.x) * ddy - (to.y - from.y) * ddx;
        let inv_cross = 1.0 / cross;
        let parabola_from = ((ctrl.x - from.x) * ddx + (ctrl.y - from.y) * ddy) * inv_cross;
        let parabola_to = ((to.x - ctrl.x) * ddx + (to.y - ctrl.y) * ddy) * inv_cross;

        // `scale` is NaN for straight lines. The NaN propagates into `count`,
        // which is caught below.
        let scale = cross.abs() / (ddx.hypot(ddy) * (parabola_to - parabola_from).abs());

        let integral_from = approx_parabola_integral(parabola_from);
        let integral_to = approx_parabola_integral(parabola_to);
        let integral_diff = integral_to - integral_from;

        let inv_integral_from = approx_parabola_inv_integral(integral_from);
        let inv_integral_to = approx_parabola_inv_integral(integral_to);
        let div_inv_integral_diff = 1.0 / (inv_integral_to - inv_integral_from);

        let mut count = (0.5 * integral_diff.abs() * (scale / tolerance).sqrt()).ceil();
        let mut is_point = false;
        // If count is NaN the curve can be approximated by a single straight
        // line or a point.
        if !count.is_finite() {
            count = 0.0;
            is_point = (to.x - from.x).hypot(to.y - from.y) < tolerance;
        }

        let integral_step = integral_diff / count;

        Self {
            count,
            integral_from,
            integral_step,
            inv_integral_from,
            div_inv_integral_diff,
            is_point,
        }
    }

    fn t_at_iteration(&self, iteration: f32) -> f32 {
        let u = approx_parabola_inv_integral(self.integral_from + self.integral_step * iteration);
        (u - self.inv_integral_from) * self.div_inv_integral_diff
    }
}

/// Compute an approximation to integral (1 + 4x^2) ^ -0.25 dx used in the
/// flattening code.
fn approx_parabola_integral(x: f32) -> f32 {
    let d: f32 = 0.67;
    let quarter = 0.25;
    x / (1.0 - d + (d.powi(4) + quarter * x * x).sqrt().sqrt())
}

/// Approximate the inverse of the function above.
fn approx_parabola_inv_integral(x: f32) -> f32 {
    let b = 0.39;
    let quarter = 0.25;
    x * (1.0 - b + (b * b + quarter * x * x).sqrt())
}

fn flatten_cubic_bezier_with_t<F: FnMut(Vec2, f32)>(
    curve: &CubicBezierShape,
    tolerance: f32,
    callback: &mut F,
) {
    let quadratics_tolerance = tolerance * 0.2;
    let flattening_tolerance = tolerance * 0.8;

    let num_quadratics = curve.num_quadratics(quadratics_tolerance);
    let step = 1.0 / num_quadratics as f32;
    let mut t0 = 0.0;
    for _ in 0..(num_quadratics - 1) {
        let t1 = t0 + step;

        let quadratic = single_curve_approximation(&curve.split_range(t0..t1));
        quadratic.for_each_flattened_with_t(flattening_tolerance, &mut |point, t_sub| {
            let t = t0 + step * t_sub;
            callback(point, t);
        });

        t0 = t1;
    }

    // Do the last step manually to make sure we finish at t = 1.0 exactly.
    let quadratic = single_curve_approximation(&curve.split_range(t0.min(1.0)..1.0));
    quadratic.for_each_flattened_with_t(flattening_tolerance, &mut |point, t_sub| {
        let t = t0 + (1.0 - t0) * t_sub;
        callback(point, t);
    });
}

/// The quadratic sharing the end points of `curve` whose control point is
/// the average of the two control points each cubic tangent suggests.
fn single_curve_approximation(curve: &CubicBezierShape) -> QuadraticBezierShape {
    let [p0, p1, p2, p3] = curve.points;
    let c1 = (p1 * 3.0 - p0) * 0.5;
    let c2 = (p2 * 3.0 - p3) * 0.5;
    let c = (c1 + c2) * 0.5;
    QuadraticBezierShape {
        points: [p0, c, p3],
        closed: curve.closed,
        fill: curve.fill,
        stroke: curve.stroke,
    }
}

fn quadratic_for_each_local_extremum<F: FnMut(f32)>(p0: f32, p1: f32, p2: f32, cb: &mut F) {
    // A quadratic Bézier curve can be derived by a linear function:
    // p(t) = p0 + t(p1 - p0) + t^2(p2 - 2p1 + p0)
    // The derivative is:
    // p'(t) = (p1 - p0) + 2(p2 - 2p1 + p0)t or:
    // f(x) = a* x + b
    let a = p2 - 2.0 * p1 + p0;
    // let b = p1 - p0;
    // no need to check for zero, since we're only interested in local extrema
    if a == 0.0 {
        return;
    }

    let t = (p0 - p1) / a;
    if t > 0.0 && t < 1.0 {
        cb(t);
    }
}

fn cubic_for_each_local_extremum<F: FnMut(f32)>(p0: f32, p1: f32, p2: f32, p3: f32, cb: &mut F) {
    // The derivative of a cubic Bézier curve is the quadratic
    // B'(t) = a * t^2 + b * t + c
    let a = 3.0 * (p3 + 3.0 * (p1 - p2) - p0);
    let b = 6.0 * (p2 - 2.0 * p1 + p0);
    let c = 3.0 * (p1 - p0);

    let in_range = |t: f32| (0.0..=1.0).contains(&t);

    // linear situation
    if a == 0.0 {
        if b != 0.0 {
            let t = -c / b;
            if in_range(t) {
                cb(t);
            }
        }
        return;
    }

    let discr = b * b - 4.0 * a * c;
    // no Real solution
    if discr < 0.0 {
        return;
    }

    if discr == 0.0 {
        let t = -b / (2.0 * a);
        if in_range(t) {
            cb(t);
        }
        return;
    }

    let discr = discr.sqrt();
    let t1 = (-b - discr) / (2.0 * a);
    let t2 = (-b + discr) / (2.0 * a);
    if in_range(t1) {
        cb(t1);
    }
    if in_range(t2) {
        cb(t2);
    }
}
