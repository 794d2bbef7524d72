//! Path primitives and the fill/stroke tessellators that consume them.
//!
//! A [`Path`] is a list of points, each carrying the direction in which the
//! outline grows when it is feathered or given a stroke width. The dispatcher
//! owns one scratch path and rebuilds it for every shape.

use std::f32::consts::TAU;

use lumina_core::geometry::Rect;
use lumina_core::math::{Vec2, rot90, vec2};

use crate::{Color32, Mesh, Rounding, Stroke, TextureId, Vertex, WHITE_UV};

/// A point on a [`Path`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathPoint {
    pub pos: Vec2,

    /// Outward direction used for feathering and, for strokes, for giving the
    /// path its thickness.
    ///
    /// Not unit length at corners: miter joins scale it so the expanded
    /// outline stays parallel to both edges.
    pub normal: Vec2,
}

/// Whether a stroke returns to its first point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathType {
    Open,
    Closed,
}

/// A connected line (without thickness or gaps) which can be tessellated
/// either to a stroke (with thickness) or a filled convex area.
///
/// Used as a scratch-pad during tessellation.
#[derive(Clone, Debug, Default)]
pub struct Path(Vec<PathPoint>);

impl Path {
    #[inline(always)]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline(always)]
    pub fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }

    #[inline(always)]
    pub fn add_point(&mut self, pos: Vec2, normal: Vec2) {
        self.0.push(PathPoint { pos, normal });
    }

    /// The points added so far.
    #[inline]
    pub fn points(&self) -> &[PathPoint] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add a full circle, clockwise, using [`circle_segments`] points.
    pub fn add_circle(&mut self, center: Vec2, radius: f32) {
        let n = circle_segments(radius);
        self.reserve(n);
        for i in 0..n {
            let angle = TAU * i as f32 / n as f32;
            let normal = Vec2::from_angle(angle);
            self.add_point(center + radius * normal, normal);
        }
    }

    pub fn add_line_segment(&mut self, points: [Vec2; 2]) {
        self.reserve(2);
        let normal = rot90((points[1] - points[0]).normalize_or_zero());
        self.add_point(points[0], normal);
        self.add_point(points[1], normal);
    }

    /// Add an open polyline.
    ///
    /// Corners sharper than a right angle are cut off with two points so the
    /// miter does not shoot far past the corner.
    ///
    /// Fewer than two points add nothing.
    pub fn add_open_points(&mut self, points: &[Vec2]) {
        let n = points.len();
        if n < 2 {
            return;
        }

        if n == 2 {
            self.add_line_segment([points[0], points[1]]);
            return;
        }

        self.reserve(n);
        let mut n0 = edge_normal(points[0], points[1]);
        self.add_point(points[0], n0);

        for i in 1..n - 1 {
            let mut n1 = edge_normal(points[i], points[i + 1]);

            // A repeated point has no edge direction; borrow the neighbor's.
            if n0 == Vec2::ZERO {
                n0 = n1;
            } else if n1 == Vec2::ZERO {
                n1 = n0;
            }

            let normal = (n0 + n1) / 2.0;
            let length_sq = normal.length_squared();
            let right_angle_length_sq = 0.5;
            let sharper_than_a_right_angle = length_sq < right_angle_length_sq;
            if sharper_than_a_right_angle {
                // cut off the sharp corner
                let center_normal = normal.normalize_or_zero();
                let n0c = (n0 + center_normal) / 2.0;
                let n1c = (n1 + center_normal) / 2.0;
                self.add_point(points[i], n0c / n0c.length_squared());
                self.add_point(points[i], n1c / n1c.length_squared());
            } else {
                // miter join
                self.add_point(points[i], normal / length_sq);
            }

            n0 = n1;
        }

        let last_normal = edge_normal(points[n - 2], points[n - 1]);
        self.add_point(
            points[n - 1],
            if last_normal == Vec2::ZERO { n0 } else { last_normal },
        );
    }

    /// Add a closed polyline. Every corner gets a miter join.
    ///
    /// Fewer than two points add nothing.
    pub fn add_line_loop(&mut self, points: &[Vec2]) {
        let n = points.len();
        if n < 2 {
            return;
        }
        self.reserve(n);

        let mut n0 = edge_normal(points[n - 1], points[0]);

        for i in 0..n {
            let next_i = if i + 1 == n { 0 } else { i + 1 };
            let mut n1 = edge_normal(points[i], points[next_i]);

            // A repeated point has no edge direction; borrow the neighbor's.
            if n0 == Vec2::ZERO {
                n0 = n1;
            } else if n1 == Vec2::ZERO {
                n1 = n0;
            }

            // Corners are never cut here: feathering moves each point both
            // inwards and outwards along its normal, and the inward half of a
            // cut corner crosses itself.
            let normal = (n0 + n1) / 2.0;
            let length_sq = normal.length_squared();
            if length_sq > 0.0 {
                self.add_point(points[i], normal / length_sq);
            } else {
                // A 180 degree turn: there is no meaningful miter.
                self.add_point(points[i], n1);
            }

            n0 = n1;
        }
    }

    /// Open-ended.
    pub fn stroke_open(&self, feathering: f32, stroke: Stroke, out: &mut Mesh) {
        stroke_path(feathering, &self.0, PathType::Open, stroke, out);
    }

    /// A closed path (returning to the first point).
    pub fn stroke_closed(&self, feathering: f32, stroke: Stroke, out: &mut Mesh) {
        stroke_path(feathering, &self.0, PathType::Closed, stroke, out);
    }

    pub fn stroke(&self, feathering: f32, path_type: PathType, stroke: Stroke, out: &mut Mesh) {
        stroke_path(feathering, &self.0, path_type, stroke, out);
    }

    /// The path is taken to be closed (i.e. returning to the start again).
    ///
    /// Calling this may reverse the vertices in the path if they are wrong
    /// winding order. The preferred winding order is clockwise.
    pub fn fill(&mut self, feathering: f32, color: Color32, out: &mut Mesh) {
        fill_closed_path(feathering, &mut self.0, color, out);
    }

    /// Like [`Self::fill`] but with texturing.
    ///
    /// The `uv_from_pos` is called for each vertex position.
    pub fn fill_with_uv(
        &mut self,
        feathering: f32,
        color: Color32,
        texture_id: TextureId,
        uv_from_pos: impl Fn(Vec2) -> Vec2,
        out: &mut Mesh,
    ) {
        fill_closed_path_with_uv(feathering, &mut self.0, color, texture_id, uv_from_pos, out);
    }
}

#[inline]
fn edge_normal(from: Vec2, to: Vec2) -> Vec2 {
    rot90((to - from).normalize_or_zero())
}

// ----------------------------------------------------------------------------
// Path construction helpers

/// One rung of the circle tessellation ladder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleStep {
    /// Radius limit in points.
    pub radius: f32,

    /// Whether a circle of exactly [`Self::radius`] uses this rung.
    pub inclusive: bool,

    /// Number of points around the full circle. Always a multiple of four.
    pub segments: usize,
}

/// How many points a circle of a given radius gets.
///
/// The first rung whose limit the radius satisfies wins.
pub const CIRCLE_LADDER: [CircleStep; 5] = [
    CircleStep {
        radius: 2.0,
        inclusive: true,
        segments: 8,
    },
    CircleStep {
        radius: 5.0,
        inclusive: true,
        segments: 16,
    },
    CircleStep {
        radius: 18.0,
        inclusive: false,
        segments: 32,
    },
    CircleStep {
        radius: 50.0,
        inclusive: false,
        segments: 64,
    },
    CircleStep {
        radius: f32::INFINITY,
        inclusive: true,
        segments: 128,
    },
];

/// Number of points used for a circle of this radius.
pub fn circle_segments(radius: f32) -> usize {
    CIRCLE_LADDER
        .iter()
        .find(|step| {
            if step.inclusive {
                radius <= step.radius
            } else {
                radius < step.radius
            }
        })
        .map_or(128, |step| step.segments)
}

/// Overwrites `points` with the outline of a rounded rectangle, clockwise.
pub fn rounded_rectangle(points: &mut Vec<Vec2>, rect: Rect, rounding: Rounding) {
    points.clear();

    let min = rect.min;
    let max = rect.max;

    let r = rounding.clamp(0.5 * rect.width().min(rect.height()));

    if r.is_zero() {
        points.reserve(4);
        points.push(vec2(min.x, min.y)); // left top
        points.push(vec2(max.x, min.y)); // right top
        points.push(vec2(max.x, max.y)); // right bottom
        points.push(vec2(min.x, max.y)); // left bottom
    } else {
        // A side made entirely of rounding would produce the same vertex
        // twice, which later shows up as a feathering artifact.
        let eps = f32::EPSILON * rect.size().max_element();

        add_circle_quadrant(points, vec2(max.x - r.se, max.y - r.se), r.se, 0.0); // south east
        if rect.width() <= r.se + r.sw + eps {
            points.pop();
        }

        add_circle_quadrant(points, vec2(min.x + r.sw, max.y - r.sw), r.sw, 1.0); // south west
        if rect.height() <= r.sw + r.nw + eps {
            points.pop();
        }

        add_circle_quadrant(points, vec2(min.x + r.nw, min.y + r.nw), r.nw, 2.0); // north west
        if rect.width() <= r.nw + r.ne + eps {
            points.pop();
        }

        add_circle_quadrant(points, vec2(max.x - r.ne, min.y + r.ne), r.ne, 3.0); // north east
        if rect.height() <= r.ne + r.se + eps {
            points.pop();
        }
    }
}

/// Add one quadrant of a circle, including both end points.
///
/// * quadrant 0: right bottom
/// * quadrant 1: left bottom
/// * quadrant 2: left top
/// * quadrant 3: right top
pub fn add_circle_quadrant(points: &mut Vec<Vec2>, center: Vec2, radius: f32, quadrant: f32) {
    if radius <= 0.0 {
        points.push(center);
        return;
    }

    let n = circle_segments(radius);
    let per_quadrant = n / 4;
    let offset = quadrant * per_quadrant as f32;
    points.reserve(per_quadrant + 1);
    for i in 0..=per_quadrant {
        let angle = TAU * (offset + i as f32) / n as f32;
        points.push(center + radius * Vec2::from_angle(angle));
    }
}

// ----------------------------------------------------------------------------
// Tessellation

/// Twice the signed area. Positive for clockwise outlines (y pointing down).
fn cw_signed_area(path: &[PathPoint]) -> f64 {
    if let Some(last) = path.last() {
        let mut previous = last.pos;
        let mut area = 0.0;
        for p in path {
            area += (previous.x * p.pos.y - p.pos.x * previous.y) as f64;
            previous = p.pos;
        }
        area
    } else {
        0.0
    }
}

/// Make the path clockwise, flipping the normals along with it.
fn ensure_clockwise(path: &mut [PathPoint]) {
    if cw_signed_area(path) < 0.0 {
        // Wrong winding order - fix:
        path.reverse();
        for point in path.iter_mut() {
            point.normal = -point.normal;
        }
    }
}

/// Tessellate the given convex area into a polygon.
///
/// Calling this may reverse the vertices in the path if they are wrong
/// winding order.
fn fill_closed_path(feathering: f32, path: &mut [PathPoint], color: Color32, out: &mut Mesh) {
    fill_closed_path_with_uv(
        feathering,
        path,
        color,
        out.texture_id,
        |_| WHITE_UV,
        out,
    );
}

fn fill_closed_path_with_uv(
    feathering: f32,
    path: &mut [PathPoint],
    color: Color32,
    texture_id: TextureId,
    uv_from_pos: impl Fn(Vec2) -> Vec2,
    out: &mut Mesh,
) {
    if color == Color32::TRANSPARENT || path.len() < 3 {
        return;
    }

    if out.is_empty() {
        out.texture_id = texture_id;
    } else {
        debug_assert_eq!(
            out.texture_id, texture_id,
            "Mixing different `texture_id` in the same mesh"
        );
    }

    let n = path.len() as u32;
    if feathering > 0.0 {
        ensure_clockwise(path);

        out.reserve_triangles(3 * n as usize);
        out.reserve_vertices(2 * n as usize);
        let color_outer = Color32::TRANSPARENT;
        let idx_inner = out.vertices.len() as u32;
        let idx_outer = idx_inner + 1;

        // The fill:
        for i in 2..n {
            out.add_triangle(idx_inner + 2 * (i - 1), idx_inner, idx_inner + 2 * i);
        }

        // The feathering:
        let mut i0 = n - 1;
        for i1 in 0..n {
            let p1 = &path[i1 as usize];
            let dm = 0.5 * feathering * p1.normal;

            let pos = p1.pos - dm;
            out.vertices.push(Vertex {
                pos,
                uv: uv_from_pos(pos),
                color,
            });

            let pos = p1.pos + dm;
            out.vertices.push(Vertex {
                pos,
                uv: uv_from_pos(pos),
                color: color_outer,
            });

            out.add_triangle(idx_inner + i1 * 2, idx_inner + i0 * 2, idx_outer + 2 * i0);
            out.add_triangle(idx_outer + i0 * 2, idx_outer + i1 * 2, idx_inner + 2 * i1);
            i0 = i1;
        }
    } else {
        out.reserve_triangles(n as usize);
        let idx = out.vertices.len() as u32;
        out.vertices.extend(path.iter().map(|p| Vertex {
            pos: p.pos,
            uv: uv_from_pos(p.pos),
            color,
        }));
        for i in 2..n {
            out.add_triangle(idx, idx + i - 1, idx + i);
        }
    }
}

/// Tessellate the given path as a stroke with thickness.
fn stroke_path(
    feathering: f32,
    path: &[PathPoint],
    path_type: PathType,
    stroke: Stroke,
    out: &mut Mesh,
) {
    let n = path.len() as u32;

    if stroke.is_empty() || n < 2 {
        return;
    }

    let idx = out.vertices.len() as u32;

    if feathering > 0.0 {
        let color_inner = stroke.color;
        let color_outer = Color32::TRANSPARENT;

        let thin_line = stroke.width <= feathering;
        if thin_line {
            // Three vertices per point: a transparent rim one feathering out on
            // each side and the stroke color on the center line. Alpha scales
            // with the width.
            let color_inner = color_inner.gamma_multiply(stroke.width / feathering);
            if color_inner == Color32::TRANSPARENT {
                return;
            }

            out.reserve_triangles(4 * n as usize);
            out.reserve_vertices(3 * n as usize);

            let mut i0 = n - 1;
            for i1 in 0..n {
                let connect_with_previous = path_type == PathType::Closed || i1 > 0;
                let p1 = &path[i1 as usize];
                let p = p1.pos;
                let n = p1.normal;
                out.colored_vertex(p + n * feathering, color_outer);
                out.colored_vertex(p, color_inner);
                out.colored_vertex(p - n * feathering, color_outer);

                if connect_with_previous {
                    out.add_triangle(idx + 3 * i0, idx + 3 * i0 + 1, idx + 3 * i1);
                    out.add_triangle(idx + 3 * i0 + 1, idx + 3 * i1, idx + 3 * i1 + 1);

                    out.add_triangle(idx + 3 * i0 + 1, idx + 3 * i0 + 2, idx + 3 * i1 + 1);
                    out.add_triangle(idx + 3 * i0 + 2, idx + 3 * i1 + 1, idx + 3 * i1 + 2);
                }
                i0 = i1;
            }
        } else {
            // Four vertices per point. The opaque core spans `inner_rad` on
            // each side and fades to transparent at `outer_rad`.
            let inner_rad = 0.5 * (stroke.width - feathering);
            let outer_rad = 0.5 * (stroke.width + feathering);

            let add_quad = |out: &mut Mesh, p: Vec2, n: Vec2, back_extrude: Vec2| {
                out.colored_vertex(p + n * outer_rad + back_extrude, color_outer);
                out.colored_vertex(p + n * inner_rad, color_inner);
                out.colored_vertex(p - n * inner_rad, color_inner);
                out.colored_vertex(p - n * outer_rad + back_extrude, color_outer);
            };

            match path_type {
                PathType::Closed => {
                    out.reserve_triangles(6 * n as usize);
                    out.reserve_vertices(4 * n as usize);

                    let mut i0 = n - 1;
                    for i1 in 0..n {
                        let p1 = &path[i1 as usize];
                        add_quad(out, p1.pos, p1.normal, Vec2::ZERO);
                        connect_thick_segment(out, idx, i0, i1);
                        i0 = i1;
                    }
                }
                PathType::Open => {
                    // The outer vertices of both end sections are pushed one
                    // feathering past the end point, and two extra triangles
                    // close each cap so the ends fade out too.
                    out.reserve_triangles(6 * n as usize + 4);
                    out.reserve_vertices(4 * n as usize);

                    {
                        let end = &path[0];
                        let back_extrude = rot90(end.normal) * feathering;
                        add_quad(out, end.pos, end.normal, back_extrude);

                        out.add_triangle(idx, idx + 1, idx + 2);
                        out.add_triangle(idx, idx + 2, idx + 3);
                    }

                    let mut i0 = 0;
                    for i1 in 1..n - 1 {
                        let point = &path[i1 as usize];
                        add_quad(out, point.pos, point.normal, Vec2::ZERO);
                        connect_thick_segment(out, idx, i0, i1);
                        i0 = i1;
                    }

                    {
                        let i1 = n - 1;
                        let end = &path[i1 as usize];
                        let back_extrude = -rot90(end.normal) * feathering;
                        add_quad(out, end.pos, end.normal, back_extrude);
                        connect_thick_segment(out, idx, i0, i1);

                        // Cap.
                        out.add_triangle(idx + 4 * i1, idx + 4 * i1 + 1, idx + 4 * i1 + 2);
                        out.add_triangle(idx + 4 * i1, idx + 4 * i1 + 2, idx + 4 * i1 + 3);
                    }
                }
            }
        }
    } else {
        // Hard edges.
        out.reserve_triangles(2 * n as usize);
        out.reserve_vertices(2 * n as usize);

        let last_index = if path_type == PathType::Closed {
            n
        } else {
            n - 1
        };
        for i in 0..last_index {
            out.add_triangle(
                idx + (2 * i) % (2 * n),
                idx + (2 * i + 1) % (2 * n),
                idx + (2 * i + 2) % (2 * n),
            );
            out.add_triangle(
                idx + (2 * i + 2) % (2 * n),
                idx + (2 * i + 1) % (2 * n),
                idx + (2 * i + 3) % (2 * n),
            );
        }

        let thin_line = stroke.width <= feathering;
        if thin_line {
            // Keep a one-feathering width and fade the color instead.
            let radius = feathering / 2.0;
            let color = stroke.color.gamma_multiply(stroke.width / feathering);
            for p in path {
                out.colored_vertex(p.pos + radius * p.normal, color);
                out.colored_vertex(p.pos - radius * p.normal, color);
            }
        } else {
            let radius = stroke.width / 2.0;
            for p in path {
                out.colored_vertex(p.pos + radius * p.normal, stroke.color);
                out.colored_vertex(p.pos - radius * p.normal, stroke.color);
            }
        }
    }
}

/// The six triangles joining the four-vertex cross-sections `i0` and `i1`.
#[inline]
fn connect_thick_segment(out: &mut Mesh, idx: u32, i0: u32, i1: u32) {
    out.add_triangle(idx + 4 * i0, idx + 4 * i0 + 1, idx + 4 * i1);
    out.add_triangle(idx + 4 * i0 + 1, idx + 4 * i1, idx + 4 * i1 + 1);

    out.add_triangle(idx + 4 * i0 + 1, idx + 4 * i0 + 2, idx + 4 * i1 + 1);
    out.add_triangle(idx + 4 * i0 + 2, idx + 4 * i1 + 1, idx + 4 * i1 + 2);

    out.add_triangle(idx + 4 * i0 + 2, idx + 4 * i0 + 3, idx + 4 * i1 + 2);
    out.add_triangle(idx + 4 * i0 + 3, idx + 4 * i1 + 2, idx + 4 * i1 + 3);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.0, 10.0),
            vec2(0.0, 10.0),
        ]
    }

    #[test]
    fn test_circle_ladder() {
        assert_eq!(circle_segments(1.0), 8);
        assert_eq!(circle_segments(2.0), 8);
        assert_eq!(circle_segments(5.0), 16);
        assert_eq!(circle_segments(17.9), 32);
        assert_eq!(circle_segments(18.0), 64);
        assert_eq!(circle_segments(50.0), 128);
        assert_eq!(circle_segments(1000.0), 128);
        for step in CIRCLE_LADDER {
            assert_eq!(step.segments % 4, 0);
        }
    }

    #[test]
    fn test_circle_is_clockwise() {
        let mut path = Path::default();
        path.add_circle(Vec2::ZERO, 10.0);
        assert_eq!(path.len(), 32);
        assert!(cw_signed_area(path.points()) > 0.0);
        for p in path.points() {
            assert!((p.pos.length() - 10.0).abs() < 1e-4);
            assert!((p.normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_line_loop_miter_normals() {
        let mut path = Path::default();
        path.add_line_loop(&square());
        assert_eq!(path.len(), 4);
        // Top-left corner: outward is up and to the left.
        let corner = path.points()[0];
        assert!((corner.normal - vec2(-1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_open_points_cut_sharp_corners() {
        let mut path = Path::default();
        // A hairpin turn
        path.add_open_points(&[vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(0.0, 1.0)]);
        assert_eq!(path.len(), 4);

        let mut path = Path::default();
        // A right angle is not cut
        path.add_open_points(&[vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 10.0)]);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_duplicate_points_reuse_neighbour_normal() {
        let mut path = Path::default();
        path.add_open_points(&[
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.0, 0.0),
            vec2(20.0, 0.0),
        ]);
        for p in path.points() {
            assert!(p.normal.is_finite());
            assert!((p.normal - vec2(0.0, -1.0)).length() < 1e-5);
        }
    }

    #[test]
    fn test_fill_without_feathering() {
        let mut path = Path::default();
        path.add_line_loop(&square());
        let mut mesh = Mesh::default();
        path.fill(0.0, Color32::RED, &mut mesh);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_fill_feathered_makes_path_clockwise() {
        let mut points = square();
        points.reverse();
        let mut path = Path::default();
        path.add_line_loop(&points);
        assert!(cw_signed_area(path.points()) < 0.0);

        let mut mesh = Mesh::default();
        path.fill(1.0, Color32::RED, &mut mesh);
        assert!(cw_signed_area(path.points()) > 0.0);
        assert_eq!(mesh.vertices.len(), 8);
        // Inner fan (2) plus two bridge triangles per edge (8)
        assert_eq!(mesh.indices.len(), 30);
        assert!(mesh.is_valid());

        // Outer ring is transparent and lies outside the square.
        for outer in mesh.vertices.iter().skip(1).step_by(2) {
            assert_eq!(outer.color, Color32::TRANSPARENT);
            assert!(outer.pos.x < 0.0 || outer.pos.x > 10.0);
        }
    }

    #[test]
    fn test_fill_degenerate() {
        let mut path = Path::default();
        path.add_line_segment([vec2(0.0, 0.0), vec2(1.0, 1.0)]);
        let mut mesh = Mesh::default();
        path.fill(1.0, Color32::RED, &mut mesh);
        assert!(mesh.is_empty());

        path.add_point(vec2(0.0, 1.0), Vec2::ZERO);
        path.fill(1.0, Color32::TRANSPARENT, &mut mesh);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_fill_with_uv() {
        let mut path = Path::default();
        path.add_line_loop(&square());
        let mut mesh = Mesh::with_texture(TextureId::User(3));
        path.fill_with_uv(
            0.0,
            Color32::WHITE,
            TextureId::User(3),
            |pos| pos / 10.0,
            &mut mesh,
        );
        assert_eq!(mesh.vertices[2].uv, vec2(1.0, 1.0));
        assert_eq!(mesh.texture_id, TextureId::User(3));
    }

    #[test]
    fn test_stroke_thick_open() {
        let mut path = Path::default();
        path.add_open_points(&[vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 10.0)]);
        let mut mesh = Mesh::default();
        path.stroke_open(1.0, Stroke::new(4.0, Color32::RED), &mut mesh);
        assert_eq!(mesh.vertices.len(), 12);
        // 6 triangles per segment plus 2 per end cap.
        assert_eq!(mesh.indices.len() / 3, 2 * 6 + 2 * 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_stroke_thick_closed() {
        let mut path = Path::default();
        path.add_line_loop(&square());
        let mut mesh = Mesh::default();
        path.stroke_closed(1.0, Stroke::new(4.0, Color32::RED), &mut mesh);
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.indices.len() / 3, 4 * 6);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_stroke_thin_fades() {
        let mut path = Path::default();
        path.add_line_segment([vec2(0.0, 0.0), vec2(10.0, 0.0)]);
        let mut mesh = Mesh::default();
        path.stroke_open(1.0, Stroke::new(0.5, Color32::WHITE), &mut mesh);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len() / 3, 4);
        assert_eq!(mesh.vertices[1].color, Color32::WHITE.gamma_multiply(0.5));
        assert_eq!(mesh.vertices[0].color, Color32::TRANSPARENT);
    }

    #[test]
    fn test_stroke_without_feathering() {
        let mut path = Path::default();
        path.add_line_segment([vec2(0.0, 0.0), vec2(10.0, 0.0)]);
        let mut mesh = Mesh::default();
        path.stroke_open(0.0, Stroke::new(2.0, Color32::WHITE), &mut mesh);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertices[0].pos, vec2(0.0, -1.0));
        assert_eq!(mesh.vertices[1].pos, vec2(0.0, 1.0));
    }

    #[test]
    fn test_stroke_degenerate() {
        let mut path = Path::default();
        path.add_point(Vec2::ZERO, Vec2::ZERO);
        let mut mesh = Mesh::default();
        path.stroke_open(1.0, Stroke::new(2.0, Color32::WHITE), &mut mesh);
        assert!(mesh.is_empty());

        path.add_point(vec2(1.0, 0.0), Vec2::ZERO);
        path.stroke_open(1.0, Stroke::NONE, &mut mesh);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_too_few_points_add_nothing() {
        let stroke = Stroke::new(2.0, Color32::WHITE);
        for points in [vec![], vec![vec2(3.0, 4.0)]] {
            let mut path = Path::default();
            path.add_open_points(&points);
            path.add_line_loop(&points);
            assert!(path.is_empty());

            let mut mesh = Mesh::default();
            path.stroke_open(1.0, stroke, &mut mesh);
            path.stroke_closed(1.0, stroke, &mut mesh);
            path.fill(1.0, Color32::WHITE, &mut mesh);
            assert!(mesh.is_empty());
        }
    }

    #[test]
    fn test_rounded_rectangle_without_rounding() {
        let mut points = vec![];
        let rect = Rect::from_min_max(vec2(0.0, 0.0), vec2(10.0, 5.0));
        rounded_rectangle(&mut points, rect, Rounding::ZERO);
        assert_eq!(points.len(), 4);
        assert_eq!(points[1], vec2(10.0, 0.0));
    }

    #[test]
    fn test_rounded_rectangle_has_no_duplicates() {
        let mut points = vec![];
        // A pill: the short sides are all rounding.
        let rect = Rect::from_min_max(vec2(0.0, 0.0), vec2(40.0, 10.0));
        rounded_rectangle(&mut points, rect, Rounding::same(100.0));
        for (i, p) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            assert!((*p - next).length() > 1e-4, "duplicate vertex at {i}");
        }
        for p in &points {
            assert!(p.x >= -1e-4 && p.x <= 40.0 + 1e-4);
            assert!(p.y >= -1e-4 && p.y <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_circle_quadrant_end_points() {
        let mut points = vec![];
        add_circle_quadrant(&mut points, Vec2::ZERO, 10.0, 0.0);
        assert_eq!(points.len(), 32 / 4 + 1);
        assert!((points[0] - vec2(10.0, 0.0)).length() < 1e-4);
        assert!((points[8] - vec2(0.0, 10.0)).length() < 1e-4);
    }
}
