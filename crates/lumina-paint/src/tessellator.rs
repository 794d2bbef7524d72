//! Converts [`Shape`]s into [`Mesh`]es batched by clip rectangle and texture.
//!
//! The [`Tessellator`] owns the scratch buffers reused between shapes. Feed it
//! a frame worth of [`ClippedShape`]s and it hands back the
//! [`ClippedPrimitive`]s a painter backend uploads and draws.

use lumina_core::geometry::Rect;
use lumina_core::math::{Vec2, remap, round_to_pixel, round_to_pixel_center, vec2};
use lumina_core::profiling::{profile_function, profile_scope};

use crate::path::rounded_rectangle;
use crate::{
    CircleShape, Color32, CubicBezierShape, EllipseShape, Mesh, PaintCallback, Path, PathShape,
    PathType, PreparedDisc, QuadraticBezierShape, RectShape, Shape, Stroke, TextShape, Vertex,
};

// ----------------------------------------------------------------------------

/// Tessellation quality and debug switches.
///
/// Everything has a sensible [`Default`]; use the `with_*` builders to
/// change individual settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationOptions {
    /// Use "feathering" to smooth out the edges of shapes as a form of
    /// anti-aliasing.
    ///
    /// Feathering works by making each edge into a thin gradient into
    /// transparency. The size of this edge is controlled by
    /// [`Self::feathering_size_in_pixels`].
    pub feathering: bool,

    /// The size of the feathering, in physical pixels.
    pub feathering_size_in_pixels: f32,

    /// If `true` (default) skip shapes whose bounds miss the clip rectangle
    /// before tessellating them.
    pub coarse_tessellation_culling: bool,

    /// If `true`, small filled circles will be painted using pre-rasterized
    /// discs from the texture atlas. Can save a lot of tessellation, but may
    /// look slightly blurry.
    pub prerasterized_discs: bool,

    /// If `true` (default) align text to the physical pixel grid.
    pub round_text_to_pixels: bool,

    /// If `true` (default), snap axis-aligned line segments to the pixel grid
    /// so a one pixel wide line covers exactly one pixel column or row.
    pub round_line_segments_to_pixels: bool,

    /// Output the outline of every text row.
    pub debug_paint_text_rects: bool,

    /// Output the clip rectangles to be painted.
    pub debug_paint_clip_rects: bool,

    /// If true, no clipping will be done.
    pub debug_ignore_clip_rects: bool,

    /// The maximum distance between the original curve and the flattened
    /// curve.
    pub bezier_tolerance: f32,

    /// Tolerance for float comparisons in curve flattening. Defaults to
    /// `1.0e-5`.
    pub epsilon: f32,

    /// Tessellate independent shapes in parallel. Has no effect without the
    /// `rayon` feature.
    pub parallel_tessellation: bool,

    /// If `true`, invalid [`Shape::Mesh`]es are logged and skipped.
    /// If `false`, they are appended as-is and trip a debug assertion when
    /// the frame is checked.
    pub validate_meshes: bool,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            feathering: true,
            feathering_size_in_pixels: 1.0,
            coarse_tessellation_culling: true,
            prerasterized_discs: true,
            round_text_to_pixels: true,
            round_line_segments_to_pixels: true,
            debug_paint_text_rects: false,
            debug_paint_clip_rects: false,
            debug_ignore_clip_rects: false,
            bezier_tolerance: 0.1,
            epsilon: 1.0e-5,
            parallel_tessellation: true,
            validate_meshes: true,
        }
    }
}

impl TessellationOptions {
    /// Turn anti-aliasing feathering on or off.
    pub fn with_feathering(mut self, feathering: bool) -> Self {
        self.feathering = feathering;
        self
    }

    /// Width of the feathered edge, in physical pixels.
    pub fn with_feathering_size_in_pixels(mut self, size: f32) -> Self {
        self.feathering_size_in_pixels = size;
        self
    }

    /// Skip shapes whose bounds miss the clip rect.
    pub fn with_coarse_tessellation_culling(mut self, culling: bool) -> Self {
        self.coarse_tessellation_culling = culling;
        self
    }

    /// Paint small filled circles from the atlas disc ladder.
    pub fn with_prerasterized_discs(mut self, prerasterized_discs: bool) -> Self {
        self.prerasterized_discs = prerasterized_discs;
        self
    }

    /// Snap glyph rows to the pixel grid.
    pub fn with_round_text_to_pixels(mut self, round: bool) -> Self {
        self.round_text_to_pixels = round;
        self
    }

    /// Snap axis-aligned line segments to the pixel grid.
    pub fn with_round_line_segments_to_pixels(mut self, round: bool) -> Self {
        self.round_line_segments_to_pixels = round;
        self
    }

    /// Outline every text shape.
    pub fn with_debug_paint_text_rects(mut self, debug: bool) -> Self {
        self.debug_paint_text_rects = debug;
        self
    }

    /// Outline every clip rect.
    pub fn with_debug_paint_clip_rects(mut self, debug: bool) -> Self {
        self.debug_paint_clip_rects = debug;
        self
    }

    /// Ignore clip rects entirely.
    pub fn with_debug_ignore_clip_rects(mut self, debug: bool) -> Self {
        self.debug_ignore_clip_rects = debug;
        self
    }

    /// Maximum distance between a curve and its flattened polyline.
    pub fn with_bezier_tolerance(mut self, tolerance: f32) -> Self {
        self.bezier_tolerance = tolerance;
        self
    }

    /// Threshold below which curve parameters count as zero.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Tessellate independent shapes on the rayon pool.
    pub fn with_parallel_tessellation(mut self, parallel: bool) -> Self {
        self.parallel_tessellation = parallel;
        self
    }

    /// Validate incoming [`Shape::Mesh`]es and skip invalid ones.
    pub fn with_validate_meshes(mut self, validate: bool) -> Self {
        self.validate_meshes = validate;
        self
    }
}

// ----------------------------------------------------------------------------

/// A [`Shape`] within a clip rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct ClippedShape {
    /// Clip / scissor rectangle.
    /// Only show the part of the [`Shape`] that falls within this.
    pub clip_rect: Rect,

    /// The shape
    pub shape: Shape,
}

impl ClippedShape {
    #[inline]
    pub fn new(clip_rect: Rect, shape: impl Into<Shape>) -> Self {
        Self {
            clip_rect,
            shape: shape.into(),
        }
    }
}

/// A [`Mesh`] or [`PaintCallback`] within a clip rectangle.
///
/// Everything is using logical points.
#[derive(Clone, Debug, PartialEq)]
pub struct ClippedPrimitive {
    /// Clip / scissor rectangle.
    /// Only show the part of the [`Primitive`] that falls within this.
    pub clip_rect: Rect,

    /// What to paint - either a [`Mesh`] or a [`PaintCallback`].
    pub primitive: Primitive,
}

/// A rendering primitive - either a [`Mesh`] or a [`PaintCallback`].
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Mesh(Mesh),
    Callback(PaintCallback),
}

impl Primitive {
    /// The mesh, if this is a mesh primitive.
    #[inline]
    pub fn mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            Self::Callback(_) => None,
        }
    }
}

// ----------------------------------------------------------------------------

/// Converts [`Shape`]s into triangles ([`Mesh`]).
///
/// For performance reasons it is smart to reuse the same [`Tessellator`].
#[derive(Clone)]
pub struct Tessellator {
    pixels_per_point: f32,
    options: TessellationOptions,
    font_tex_size: [usize; 2],

    /// See [`crate::TextureAtlas::prepared_discs`].
    prepared_discs: Vec<PreparedDisc>,

    /// size of feathering in points. normally the size of a physical pixel.
    /// 0.0 if disabled
    feathering: f32,

    /// Only used for culling
    clip_rect: Rect,

    scratchpad_points: Vec<Vec2>,
    scratchpad_path: Path,
}

impl Tessellator {
    /// Create a new [`Tessellator`].
    ///
    /// * `pixels_per_point`: number of physical pixels to each logical point
    /// * `options`: tessellation quality
    /// * `font_tex_size`: size of the atlas texture glyph UVs are given in
    /// * `prepared_discs`: what [`crate::TextureAtlas::prepared_discs`]
    ///   returns. Can safely be set to an empty vec.
    pub fn new(
        pixels_per_point: f32,
        options: TessellationOptions,
        font_tex_size: [usize; 2],
        prepared_discs: Vec<PreparedDisc>,
    ) -> Self {
        let feathering = if options.feathering {
            options.feathering_size_in_pixels / pixels_per_point
        } else {
            0.0
        };
        Self {
            pixels_per_point,
            options,
            font_tex_size,
            prepared_discs,
            feathering,
            clip_rect: Rect::EVERYTHING,
            scratchpad_points: Default::default(),
            scratchpad_path: Default::default(),
        }
    }

    #[inline]
    pub fn options(&self) -> &TessellationOptions {
        &self.options
    }

    /// Current feathering width in points; zero when anti-aliasing is off.
    #[inline]
    pub fn feathering(&self) -> f32 {
        self.feathering
    }

    /// Set the [`Rect`] to use for culling.
    pub fn set_clip_rect(&mut self, clip_rect: Rect) {
        self.clip_rect = clip_rect;
    }

    #[inline]
    fn round_to_pixel(&self, point: f32) -> f32 {
        round_to_pixel(point, self.pixels_per_point)
    }

    #[inline]
    fn round_to_pixel_center(&self, point: f32) -> f32 {
        round_to_pixel_center(point, self.pixels_per_point)
    }

    /// Tessellate a clipped shape into a list of primitives.
    ///
    /// The shape is appended to the most recently appended mesh primitive
    /// when clip rectangle and texture agree; otherwise a new primitive is
    /// started.
    pub fn tessellate_clipped_shape(
        &mut self,
        clipped_shape: ClippedShape,
        out_primitives: &mut Vec<ClippedPrimitive>,
    ) {
        let ClippedShape {
            clip_rect,
            shape: new_shape,
        } = clipped_shape;

        if !clip_rect.is_positive() {
            return; // skip empty clip rectangles
        }

        let new_shape = match new_shape {
            Shape::Vec(shapes) => {
                for shape in shapes {
                    self.tessellate_clipped_shape(ClippedShape { clip_rect, shape }, out_primitives);
                }
                return;
            }
            Shape::Callback(callback) => {
                out_primitives.push(ClippedPrimitive {
                    clip_rect,
                    primitive: Primitive::Callback(callback),
                });
                return;
            }
            Shape::Rect(rect_shape) if rect_shape.uv.is_positive() && !rect_shape.stroke.is_empty() => {
                // The outline samples the white texel, so it cannot share a
                // mesh with a textured fill.
                let fill = RectShape {
                    stroke: Stroke::NONE,
                    ..rect_shape
                };
                let outline = RectShape::stroke(rect_shape.rect, rect_shape.rounding, rect_shape.stroke)
                    .with_blur_width(rect_shape.blur_width);
                self.tessellate_clipped_shape(ClippedShape::new(clip_rect, fill), out_primitives);
                self.tessellate_clipped_shape(ClippedShape::new(clip_rect, outline), out_primitives);
                return;
            }
            shape => shape,
        };

        let texture_id = new_shape.texture_id();
        let start_new_mesh = match out_primitives.last() {
            None => true,
            Some(last) => {
                last.clip_rect != clip_rect
                    || match &last.primitive {
                        Primitive::Mesh(last_mesh) => last_mesh.texture_id != texture_id,
                        Primitive::Callback(_) => true,
                    }
            }
        };

        if start_new_mesh {
            out_primitives.push(ClippedPrimitive {
                clip_rect,
                primitive: Primitive::Mesh(Mesh::with_texture(texture_id)),
            });
        }

        if let Some(ClippedPrimitive {
            primitive: Primitive::Mesh(out_mesh),
            ..
        }) = out_primitives.last_mut()
        {
            self.clip_rect = clip_rect;
            self.tessellate_shape(new_shape, out_mesh);
        }
    }

    /// Tessellate a single [`Shape`] into a [`Mesh`].
    ///
    /// A [`Shape::Callback`] cannot be turned into triangles and trips a
    /// debug assertion here. Use [`Self::tessellate_clipped_shape`] for
    /// those.
    ///
    /// * `shape`: the shape to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_shape(&mut self, shape: Shape, out: &mut Mesh) {
        match shape {
            Shape::Noop => {}
            Shape::Vec(vec) => {
                for shape in vec {
                    self.tessellate_shape(shape, out);
                }
            }
            Shape::Circle(circle) => self.tessellate_circle(circle, out),
            Shape::Ellipse(ellipse) => self.tessellate_ellipse(ellipse, out),
            Shape::Mesh(mesh) => self.tessellate_mesh(&mesh, out),
            Shape::LineSegment { points, stroke } => self.tessellate_line(points, stroke, out),
            Shape::Path(path_shape) => self.tessellate_path(&path_shape, out),
            Shape::Rect(rect_shape) => self.tessellate_rect(&rect_shape, out),
            Shape::Text(text_shape) => self.tessellate_text(&text_shape, out),
            Shape::QuadraticBezier(quadratic_shape) => {
                self.tessellate_quadratic_bezier(&quadratic_shape, out);
            }
            Shape::CubicBezier(cubic_shape) => self.tessellate_cubic_bezier(&cubic_shape, out),
            Shape::Callback(_) => {
                debug_assert!(false, "Shape::Callback passed to Tessellator::tessellate_shape");
            }
        }
    }

    /// Tessellate a single [`CircleShape`] into a [`Mesh`].
    ///
    /// * `shape`: the circle to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_circle(&mut self, shape: CircleShape, out: &mut Mesh) {
        let CircleShape {
            center,
            radius,
            mut fill,
            stroke,
        } = shape;

        if radius <= 0.0 {
            return;
        }

        if self.options.coarse_tessellation_culling
            && !self
                .clip_rect
                .expand(radius + stroke.width)
                .contains(center)
        {
            return;
        }

        if self.options.prerasterized_discs && fill != Color32::TRANSPARENT {
            let radius_px = radius * self.pixels_per_point;
            // Balance between some circles turning out too blurry and some
            // too sharp.
            let cutoff_radius = radius_px * 2.0_f32.powf(0.25);

            if let Some(disc) = self
                .prepared_discs
                .iter()
                .find(|disc| cutoff_radius <= disc.r)
            {
                let side = radius_px * disc.w / (self.pixels_per_point * disc.r);
                let rect = Rect::from_center_size(center, Vec2::splat(side));
                out.add_rect_with_uv(rect, disc.uv, fill);

                if stroke.is_empty() {
                    return;
                }
                fill = Color32::TRANSPARENT; // already filled
            }
        }

        let path = &mut self.scratchpad_path;
        path.clear();
        path.add_circle(center, radius);
        path.fill(self.feathering, fill, out);
        path.stroke_closed(self.feathering, stroke, out);
    }

    /// Tessellate a single [`EllipseShape`] into a [`Mesh`].
    ///
    /// * `shape`: the ellipse to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_ellipse(&mut self, shape: EllipseShape, out: &mut Mesh) {
        let EllipseShape {
            center,
            radius,
            fill,
            stroke,
        } = shape;

        if radius.x <= 0.0 || radius.y <= 0.0 {
            return;
        }

        if self.options.coarse_tessellation_culling
            && !self
                .clip_rect
                .expand2(radius + Vec2::splat(stroke.width))
                .contains(center)
        {
            return;
        }

        let max_radius_px = (radius.max_element() * self.pixels_per_point) as u32;

        // At least 8 points per quarter.
        let num_points = u32::max(8, max_radius_px / 16);

        // Flat ellipses bend sharply near the ends of the long axis, so the
        // samples are eased towards there.
        let ratio = ((radius.y / radius.x) / 2.0).clamp(0.0, 1.0);

        let quarter: Vec<Vec2> = (1..num_points)
            .map(|i| {
                let percent = i as f32 / num_points as f32;
                let eased = 2.0 * (percent - percent.powi(2) / 2.0) * ratio
                    + percent.powi(2) * (1.0 - ratio);
                let t = eased * std::f32::consts::FRAC_PI_2;
                vec2(radius.x * t.cos(), radius.y * t.sin())
            })
            .collect();

        // Mirror the first quarter into the other three, clockwise from the
        // right-most point.
        let points = &mut self.scratchpad_points;
        points.clear();
        points.reserve(4 * num_points as usize);
        points.push(center + vec2(radius.x, 0.0));
        points.extend(quarter.iter().map(|p| center + *p));
        points.push(center + vec2(0.0, radius.y));
        points.extend(quarter.iter().rev().map(|p| center + vec2(-p.x, p.y)));
        points.push(center + vec2(-radius.x, 0.0));
        points.extend(quarter.iter().map(|p| center - *p));
        points.push(center + vec2(0.0, -radius.y));
        points.extend(quarter.iter().rev().map(|p| center + vec2(p.x, -p.y)));

        let path = &mut self.scratchpad_path;
        path.clear();
        path.add_line_loop(points);
        path.fill(self.feathering, fill, out);
        path.stroke_closed(self.feathering, stroke, out);
    }

    /// Append a user mesh, unless it is invalid or culled.
    pub fn tessellate_mesh(&mut self, mesh: &Mesh, out: &mut Mesh) {
        if self.options.validate_meshes {
            if let Err(err) = mesh.validate() {
                tracing::warn!("Skipping invalid mesh in Shape::Mesh: {err}");
                return;
            }
        }

        if self.options.coarse_tessellation_culling && !self.clip_rect.intersects(mesh.calc_bounds()) {
            return;
        }

        out.append_ref(mesh);
    }

    /// Tessellate a line segment between the two points with the given
    /// stroke into a [`Mesh`].
    ///
    /// * `out`: triangles are appended to this.
    pub fn tessellate_line(&mut self, mut points: [Vec2; 2], stroke: Stroke, out: &mut Mesh) {
        if stroke.is_empty() {
            return;
        }

        if self.options.coarse_tessellation_culling
            && !self
                .clip_rect
                .intersects(Rect::from_two_pos(points[0], points[1]).expand(stroke.width))
        {
            return;
        }

        if self.options.round_line_segments_to_pixels {
            // An odd number of pixels wide lines up with pixel centers, an
            // even number with pixel edges.
            let odd_width = (stroke.width * self.pixels_per_point).round() as i64 % 2 == 1;
            let [a, b] = &mut points;
            if a.x == b.x {
                let x = if odd_width {
                    self.round_to_pixel_center(a.x)
                } else {
                    self.round_to_pixel(a.x)
                };
                a.x = x;
                b.x = x;
            }
            if a.y == b.y {
                let y = if odd_width {
                    self.round_to_pixel_center(a.y)
                } else {
                    self.round_to_pixel(a.y)
                };
                a.y = y;
                b.y = y;
            }
        }

        let path = &mut self.scratchpad_path;
        path.clear();
        path.add_line_segment(points);
        path.stroke_open(self.feathering, stroke, out);
    }

    /// Tessellate a single [`PathShape`] into a [`Mesh`].
    ///
    /// * `path_shape`: the path to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_path(&mut self, path_shape: &PathShape, out: &mut Mesh) {
        if path_shape.points.len() < 2 {
            return;
        }

        if self.options.coarse_tessellation_culling
            && !path_shape.visual_bounding_rect().intersects(self.clip_rect)
        {
            return;
        }

        let PathShape {
            points,
            closed,
            fill,
            stroke,
        } = path_shape;

        self.tessellate_polyline(points, *fill, *closed, *stroke, out);
    }

    /// Tessellate a single [`RectShape`] into a [`Mesh`].
    ///
    /// * `rect_shape`: the rectangle to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_rect(&mut self, rect_shape: &RectShape, out: &mut Mesh) {
        let RectShape {
            mut rect,
            mut rounding,
            fill,
            stroke,
            mut blur_width,
            fill_texture_id,
            uv,
        } = *rect_shape;

        if self.options.coarse_tessellation_culling
            && !rect
                .expand((stroke.width + blur_width) / 2.0)
                .intersects(self.clip_rect)
        {
            return;
        }
        if rect.is_negative() {
            return;
        }

        // Accidentally infinite rectangles are common, so clamp them to
        // something the vertex math survives.
        rect.min = rect.min.max(Vec2::splat(-1e7));
        rect.max = rect.max.min(Vec2::splat(1e7));

        // Line segments sample the white texel, so a textured sliver keeps
        // its rectangle. One with no area maps nothing onto the texture.
        let textured = uv.is_positive();
        if textured && !rect.is_positive() {
            return;
        }

        let old_feathering = self.feathering;

        if old_feathering < blur_width {
            // Blur is a wide feathering. It must stay below the short side
            // or the rectangle would degrade into a line below.
            let eps = 0.1;
            blur_width = blur_width
                .min(rect.size().min_element() - eps - 2.0 * stroke.width)
                .max(0.0);

            rounding += 0.5 * blur_width;

            self.feathering = self.feathering.max(blur_width);
        }

        if !textured && rect.width() < self.feathering {
            // Very thin: approximate with a vertical line segment.
            let line = [rect.center_top(), rect.center_bottom()];
            if fill != Color32::TRANSPARENT {
                self.tessellate_line(line, Stroke::new(rect.width(), fill), out);
            }
            if !stroke.is_empty() {
                // The outline covers the segment twice, once per long side.
                self.tessellate_line(line, stroke, out);
                self.tessellate_line(line, stroke, out);
            }
        } else if !textured && rect.height() < self.feathering {
            // Very thin: approximate with a horizontal line segment.
            let line = [rect.left_center(), rect.right_center()];
            if fill != Color32::TRANSPARENT {
                self.tessellate_line(line, Stroke::new(rect.height(), fill), out);
            }
            if !stroke.is_empty() {
                self.tessellate_line(line, stroke, out);
                self.tessellate_line(line, stroke, out);
            }
        } else {
            let points = &mut self.scratchpad_points;
            rounded_rectangle(points, rect, rounding);

            let path = &mut self.scratchpad_path;
            path.clear();
            path.add_line_loop(points);

            if textured {
                let uv_from_pos = |p: Vec2| {
                    vec2(
                        remap(p.x, rect.min.x..=rect.max.x, uv.min.x..=uv.max.x),
                        remap(p.y, rect.min.y..=rect.max.y, uv.min.y..=uv.max.y),
                    )
                };
                path.fill_with_uv(self.feathering, fill, fill_texture_id, uv_from_pos, out);
            } else {
                path.fill(self.feathering, fill, out);
            }

            path.stroke_closed(self.feathering, stroke, out);
        }

        self.feathering = old_feathering;
    }

    /// Tessellate a single [`TextShape`] into a [`Mesh`].
    ///
    /// * `text_shape`: the text to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_text(&mut self, text_shape: &TextShape, out: &mut Mesh) {
        let TextShape {
            pos,
            glyphs,
            underline,
            override_text_color,
            angle,
        } = text_shape;

        if glyphs.is_empty() {
            return;
        }

        if self.options.debug_paint_text_rects {
            let rect = text_shape.visual_bounding_rect().expand(0.5);
            self.tessellate_rect(&RectShape::stroke(rect, 2.0, (0.5, Color32::GREEN)), out);
        }

        out.reserve_vertices(glyphs.num_vertices());
        out.reserve_triangles(glyphs.num_indices() / 3);

        // Glyph meshes are already on the pixel grid relative to the run, so
        // only the run position needs snapping.
        let pos = if self.options.round_text_to_pixels {
            vec2(self.round_to_pixel(pos.x), self.round_to_pixel(pos.y))
        } else {
            *pos
        };

        let uv_normalizer = vec2(
            1.0 / self.font_tex_size[0] as f32,
            1.0 / self.font_tex_size[1] as f32,
        );
        let rotation = Vec2::from_angle(*angle);
        let rotate = |v: Vec2| if *angle == 0.0 { v } else { rotation.rotate(v) };

        for row in &glyphs.rows {
            if row.mesh.is_empty() {
                continue;
            }

            let mut row_rect = row.mesh_bounds;
            if *angle != 0.0 {
                row_rect = row_rect.rotate_bb(rotation);
            }
            let row_rect = row_rect.translate(pos);

            // A single text shape can span hundreds of rows.
            if self.options.coarse_tessellation_culling && !self.clip_rect.intersects(row_rect) {
                continue;
            }

            let index_offset = out.vertices.len() as u32;
            out.indices
                .extend(row.mesh.indices.iter().map(|index| index + index_offset));
            out.vertices
                .extend(row.mesh.vertices.iter().enumerate().map(|(i, vertex)| {
                    let Vertex {
                        pos: vertex_pos,
                        uv,
                        mut color,
                    } = *vertex;

                    if let Some(override_text_color) = override_text_color {
                        if row.glyph_vertex_range.contains(&i) {
                            color = *override_text_color;
                        }
                    }

                    Vertex {
                        pos: pos + rotate(vertex_pos),
                        uv: uv * uv_normalizer,
                        color,
                    }
                }));

            if !underline.is_empty() {
                let bounds = row.mesh_bounds;
                let line = [
                    pos + rotate(bounds.left_bottom()),
                    pos + rotate(bounds.right_bottom()),
                ];
                let path = &mut self.scratchpad_path;
                path.clear();
                path.add_line_segment(line);
                path.stroke_open(self.feathering, *underline, out);
            }
        }
    }

    /// Tessellate a single [`QuadraticBezierShape`] into a [`Mesh`].
    ///
    /// * `quadratic_shape`: the shape to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_quadratic_bezier(&mut self, quadratic_shape: &QuadraticBezierShape, out: &mut Mesh) {
        if self.options.coarse_tessellation_culling
            && !quadratic_shape.visual_bounding_rect().intersects(self.clip_rect)
        {
            return;
        }

        let points = quadratic_shape.flatten(Some(self.options.bezier_tolerance));

        self.tessellate_polyline(
            &points,
            quadratic_shape.fill,
            quadratic_shape.closed,
            quadratic_shape.stroke,
            out,
        );
    }

    /// Tessellate a single [`CubicBezierShape`] into a [`Mesh`].
    ///
    /// * `cubic_shape`: the shape to tessellate.
    /// * `out`: triangles are appended to this.
    pub fn tessellate_cubic_bezier(&mut self, cubic_shape: &CubicBezierShape, out: &mut Mesh) {
        if self.options.coarse_tessellation_culling
            && !cubic_shape.visual_bounding_rect().intersects(self.clip_rect)
        {
            return;
        }

        let points_vec = cubic_shape.flatten_closed(
            Some(self.options.bezier_tolerance),
            Some(self.options.epsilon),
        );

        for points in points_vec {
            self.tessellate_polyline(&points, cubic_shape.fill, cubic_shape.closed, cubic_shape.stroke, out);
        }
    }

    fn tessellate_polyline(
        &mut self,
        points: &[Vec2],
        fill: Color32,
        closed: bool,
        stroke: Stroke,
        out: &mut Mesh,
    ) {
        if points.len() < 2 {
            return;
        }

        let path = &mut self.scratchpad_path;
        path.clear();
        if closed {
            path.add_line_loop(points);
        } else {
            path.add_open_points(points);
        }

        if fill != Color32::TRANSPARENT {
            debug_assert!(closed, "You asked to fill a path that is not closed");
            path.fill(self.feathering, fill, out);
        }

        let path_type = if closed { PathType::Closed } else { PathType::Open };
        path.stroke(self.feathering, path_type, stroke, out);
    }

    /// Turns [`Shape`]s into sets of triangles.
    ///
    /// The shapes are painted back-to-front, so the first shape ends up
    /// furthest back.
    ///
    /// * `shapes`: what to tessellate
    ///
    /// The implementation uses a [`Tessellator`].
    ///
    /// ## Returns
    /// A list of clip rectangles with matching [`Mesh`]es or callbacks.
    pub fn tessellate_shapes(&mut self, mut shapes: Vec<ClippedShape>) -> Vec<ClippedPrimitive> {
        profile_function!();

        #[cfg(feature = "rayon")]
        if self.options.parallel_tessellation {
            self.parallel_tessellation_of_large_shapes(&mut shapes);
        }

        let mut clipped_primitives: Vec<ClippedPrimitive> = Vec::default();

        {
            profile_scope!("tessellate");
            for clipped_shape in shapes {
                self.tessellate_clipped_shape(clipped_shape, &mut clipped_primitives);
            }
        }

        if self.options.debug_paint_clip_rects {
            clipped_primitives = self.add_clip_rects(clipped_primitives);
        }

        if self.options.debug_ignore_clip_rects {
            for clipped_primitive in &mut clipped_primitives {
                clipped_primitive.clip_rect = Rect::EVERYTHING;
            }
        }

        clipped_primitives.retain(|p| {
            p.clip_rect.is_positive()
                && match &p.primitive {
                    Primitive::Mesh(mesh) => !mesh.is_empty(),
                    Primitive::Callback(_) => true,
                }
        });

        for clipped_primitive in &clipped_primitives {
            if let Primitive::Mesh(mesh) = &clipped_primitive.primitive {
                debug_assert!(mesh.is_valid(), "Tessellator generated invalid Mesh");
            }
        }

        let (num_vertices, num_indices) = clipped_primitives
            .iter()
            .filter_map(|p| p.primitive.mesh())
            .fold((0, 0), |(v, i), mesh| (v + mesh.vertices.len(), i + mesh.indices.len()));
        tracing::trace!(
            "Tessellated {} primitives ({num_vertices} vertices, {num_indices} indices)",
            clipped_primitives.len()
        );

        clipped_primitives
    }

    fn add_clip_rects(&mut self, clipped_primitives: Vec<ClippedPrimitive>) -> Vec<ClippedPrimitive> {
        self.clip_rect = Rect::EVERYTHING;
        let stroke = Stroke::new(2.0, Color32::LIGHT_GREEN);

        clipped_primitives
            .into_iter()
            .flat_map(|clipped_primitive| {
                let mut clip_rect_mesh = Mesh::default();
                self.tessellate_shape(
                    Shape::rect_stroke(clipped_primitive.clip_rect, 0.0, stroke),
                    &mut clip_rect_mesh,
                );

                [
                    clipped_primitive,
                    ClippedPrimitive {
                        clip_rect: Rect::EVERYTHING,
                        primitive: Primitive::Mesh(clip_rect_mesh),
                    },
                ]
            })
            .collect()
    }

    /// Tessellate large shapes in parallel, replacing them with the
    /// resulting [`Shape::Mesh`].
    #[cfg(feature = "rayon")]
    fn parallel_tessellation_of_large_shapes(&self, shapes: &mut [ClippedShape]) {
        profile_function!();

        use rayon::prelude::*;

        // Each job allocates a fresh mesh, which only pays off for big
        // shapes.
        fn should_parallelize(shape: &Shape) -> bool {
            match shape {
                Shape::Vec(shapes) => {
                    shapes.iter().all(is_untextured_and_inline)
                        && (4 < shapes.len() || shapes.iter().any(should_parallelize))
                }
                Shape::Path(path_shape) => 32 < path_shape.points.len(),
                Shape::QuadraticBezier(_) | Shape::CubicBezier(_) | Shape::Ellipse(_) => true,
                Shape::Noop
                | Shape::Text(_)
                | Shape::Circle(_)
                | Shape::Mesh(_)
                | Shape::LineSegment { .. }
                | Shape::Rect(_)
                | Shape::Callback(_) => false,
            }
        }

        // Nested shapes end up in one mesh, so they must share its texture
        // and must not need a primitive of their own.
        fn is_untextured_and_inline(shape: &Shape) -> bool {
            match shape {
                Shape::Vec(shapes) => shapes.iter().all(is_untextured_and_inline),
                Shape::Callback(_) => false,
                Shape::Rect(rect_shape) if rect_shape.uv.is_positive() => false,
                shape => shape.texture_id() == Default::default(),
            }
        }

        let tessellated: Vec<(usize, Mesh)> = shapes
            .par_iter()
            .enumerate()
            .filter(|(_, clipped_shape)| should_parallelize(&clipped_shape.shape))
            .map(|(index, clipped_shape)| {
                profile_scope!("tessellate_big_shape");
                let mut tessellator = (*self).clone();
                tessellator.clip_rect = clipped_shape.clip_rect;
                let mut mesh = Mesh::default();
                tessellator.tessellate_shape(clipped_shape.shape.clone(), &mut mesh);
                (index, mesh)
            })
            .collect();

        profile_scope!("distribute results", tessellated.len().to_string());
        for (index, mesh) in tessellated {
            shapes[index].shape = Shape::Mesh(mesh.into());
        }
    }
}

/// Turns [`Shape`]s into sets of triangles.
///
/// The shapes are painted back-to-front, so the first shape ends up furthest
/// back.
///
/// * `pixels_per_point`: number of physical pixels to each logical point
/// * `options`: tessellation quality
/// * `font_tex_size`: size of the atlas texture glyph UVs are given in
/// * `prepared_discs`: what [`crate::TextureAtlas::prepared_discs`] returns.
///   Can safely be set to an empty vec.
/// * `shapes`: what to tessellate
///
/// ## Returns
/// A list of clip rectangles with matching [`Mesh`]es or callbacks.
pub fn tessellate_shapes(
    pixels_per_point: f32,
    options: TessellationOptions,
    font_tex_size: [usize; 2],
    prepared_discs: Vec<PreparedDisc>,
    shapes: Vec<ClippedShape>,
) -> Vec<ClippedPrimitive> {
    Tessellator::new(pixels_per_point, options, font_tex_size, prepared_discs).tessellate_shapes(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TextureAtlas, TextureId};

    fn clip() -> Rect {
        Rect::from_min_max(vec2(0.0, 0.0), vec2(100.0, 100.0))
    }

    fn no_aa() -> TessellationOptions {
        TessellationOptions::default()
            .with_feathering(false)
            .with_parallel_tessellation(false)
    }

    #[test]
    fn test_feathering_follows_pixels_per_point() {
        let tessellator = Tessellator::new(2.0, TessellationOptions::default(), [1024, 1024], vec![]);
        assert_eq!(tessellator.feathering(), 0.5);

        let tessellator = Tessellator::new(2.0, no_aa(), [1024, 1024], vec![]);
        assert_eq!(tessellator.feathering(), 0.0);
    }

    #[test]
    fn test_callback_gets_own_primitive() {
        let callback = PaintCallback::new(clip(), ());
        let shapes = vec![
            ClippedShape::new(clip(), Shape::rect_filled(clip(), 0.0, Color32::RED)),
            ClippedShape::new(clip(), Shape::Callback(callback)),
            ClippedShape::new(clip(), Shape::rect_filled(clip(), 0.0, Color32::BLUE)),
        ];
        let primitives = tessellate_shapes(1.0, no_aa(), [1024, 1024], vec![], shapes);
        assert_eq!(primitives.len(), 3);
        assert!(matches!(primitives[1].primitive, Primitive::Callback(_)));
    }

    #[test]
    fn test_texture_change_starts_new_primitive() {
        let uv = Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0));
        let shapes = vec![
            ClippedShape::new(clip(), Shape::rect_filled(clip(), 0.0, Color32::RED)),
            ClippedShape::new(
                clip(),
                RectShape::filled(clip(), 0.0, Color32::WHITE).with_texture(TextureId::User(1), uv),
            ),
        ];
        let primitives = tessellate_shapes(1.0, no_aa(), [1024, 1024], vec![], shapes);
        assert_eq!(primitives.len(), 2);
        let textured = primitives[1].primitive.mesh().expect("mesh primitive");
        assert_eq!(textured.texture_id, TextureId::User(1));
        assert_eq!(textured.vertices[2].uv, vec2(1.0, 1.0));
    }

    #[test]
    fn test_textured_rect_stroke_goes_to_default_texture() {
        let uv = Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0));
        let shape = RectShape::new(clip().shrink(10.0), 0.0, Color32::WHITE, (2.0, Color32::BLACK))
            .with_texture(TextureId::User(7), uv);
        let primitives = tessellate_shapes(1.0, no_aa(), [1024, 1024], vec![], vec![ClippedShape::new(clip(), shape)]);
        assert_eq!(primitives.len(), 2);
        assert_eq!(primitives[0].primitive.mesh().map(|m| m.texture_id), Some(TextureId::User(7)));
        assert_eq!(primitives[1].primitive.mesh().map(|m| m.texture_id), Some(TextureId::default()));
    }

    #[test]
    fn test_empty_clip_rect_is_skipped() {
        let shapes = vec![ClippedShape::new(
            Rect::NOTHING,
            Shape::rect_filled(clip(), 0.0, Color32::RED),
        )];
        assert!(tessellate_shapes(1.0, no_aa(), [1024, 1024], vec![], shapes).is_empty());
    }

    #[test]
    fn test_culled_shapes_produce_nothing() {
        let far_away = Rect::from_min_max(vec2(500.0, 500.0), vec2(510.0, 510.0));
        let shapes = vec![
            ClippedShape::new(clip(), Shape::rect_filled(far_away, 0.0, Color32::RED)),
            ClippedShape::new(clip(), Shape::circle_filled(vec2(-50.0, -50.0), 4.0, Color32::RED)),
        ];
        assert!(tessellate_shapes(1.0, no_aa(), [1024, 1024], vec![], shapes).is_empty());
    }

    #[test]
    fn test_disc_fast_path_uses_matching_disc() {
        let atlas = TextureAtlas::new([1024, 64]);
        let discs = atlas.prepared_discs();
        let mut tessellator = Tessellator::new(1.0, TessellationOptions::default(), atlas.size(), discs.clone());

        let mut mesh = Mesh::default();
        tessellator.tessellate_circle(CircleShape::filled(vec2(50.0, 50.0), 3.0, Color32::RED), &mut mesh);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);

        let disc = discs.iter().find(|disc| disc.r == 4.0).copied().expect("disc of radius 4");
        assert_eq!(mesh.vertices[0].uv, disc.uv.left_top());
        let side = 3.0 * disc.w / 4.0;
        assert!((mesh.calc_bounds().width() - side).abs() < 1e-4);
    }

    #[test]
    fn test_large_circle_is_tessellated() {
        let atlas = TextureAtlas::new([1024, 64]);
        let mut tessellator = Tessellator::new(1.0, no_aa(), atlas.size(), atlas.prepared_discs());
        let mut mesh = Mesh::default();
        tessellator.tessellate_circle(CircleShape::filled(vec2(50.0, 50.0), 20.0, Color32::RED), &mut mesh);
        assert_eq!(mesh.vertices.len(), 64);
        assert_eq!(mesh.indices.len(), 3 * 62);
    }

    #[test]
    fn test_ellipse_point_count() {
        let mut tessellator = Tessellator::new(1.0, no_aa(), [1024, 1024], vec![]);
        let mut mesh = Mesh::default();
        tessellator.tessellate_ellipse(
            EllipseShape::filled(vec2(50.0, 50.0), vec2(40.0, 10.0), Color32::RED),
            &mut mesh,
        );
        // 8 points per quarter.
        assert_eq!(mesh.vertices.len(), 32);
        assert!(mesh.is_valid());
        let bounds = mesh.calc_bounds();
        assert_eq!(bounds.min, vec2(10.0, 40.0));
        assert_eq!(bounds.max, vec2(90.0, 60.0));
    }

    #[test]
    fn test_line_rounds_to_pixel_center() {
        let mut tessellator = Tessellator::new(1.0, no_aa(), [1024, 1024], vec![]);
        let mut mesh = Mesh::default();
        tessellator.tessellate_line([vec2(10.2, 5.0), vec2(10.2, 50.0)], Stroke::new(1.0, Color32::RED), &mut mesh);
        let bounds = mesh.calc_bounds();
        assert_eq!(bounds.min.x, 10.0);
        assert_eq!(bounds.max.x, 11.0);
    }

    #[test]
    fn test_thin_rect_becomes_line() {
        let mut tessellator = Tessellator::new(1.0, TessellationOptions::default(), [1024, 1024], vec![]);
        let mut mesh = Mesh::default();
        let sliver = Rect::from_min_max(vec2(10.0, 10.0), vec2(10.5, 40.0));
        tessellator.tessellate_rect(&RectShape::filled(sliver, 0.0, Color32::RED), &mut mesh);
        // A faded thin line: three vertices at each end.
        assert_eq!(mesh.vertices.len(), 6);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_blur_restores_feathering() {
        let mut tessellator = Tessellator::new(1.0, TessellationOptions::default(), [1024, 1024], vec![]);
        let mut mesh = Mesh::default();
        let rect = Rect::from_min_max(vec2(10.0, 10.0), vec2(60.0, 40.0));
        tessellator.tessellate_rect(
            &RectShape::filled(rect, 0.0, Color32::BLACK).with_blur_width(8.0),
            &mut mesh,
        );
        assert_eq!(tessellator.feathering(), 1.0);
        // The blurred edge reaches half the blur past the rectangle.
        let bounds = mesh.calc_bounds();
        assert!((bounds.min.x - 6.0).abs() < 1e-3);
        assert!((bounds.max.y - 44.0).abs() < 1e-3);
    }

    #[test]
    fn test_infinite_rect_is_clamped() {
        let mut tessellator = Tessellator::new(1.0, no_aa(), [1024, 1024], vec![]);
        let mut mesh = Mesh::default();
        tessellator.tessellate_rect(&RectShape::filled(Rect::EVERYTHING, 0.0, Color32::RED), &mut mesh);
        assert_eq!(mesh.vertices.len(), 4);
        assert!(mesh.vertices.iter().all(|v| v.pos.is_finite()));
    }

    #[test]
    fn test_invalid_mesh_is_skipped() {
        let mut bad = Mesh::default();
        bad.colored_vertex(vec2(0.0, 0.0), Color32::RED);
        bad.add_triangle(0, 1, 2);

        let mut tessellator = Tessellator::new(1.0, no_aa(), [1024, 1024], vec![]);
        let mut out = Mesh::default();
        tessellator.tessellate_mesh(&bad, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_debug_clip_rects_add_outline_primitives() {
        let options = no_aa().with_debug_paint_clip_rects(true);
        let shapes = vec![ClippedShape::new(clip(), Shape::rect_filled(clip(), 0.0, Color32::RED))];
        let primitives = tessellate_shapes(1.0, options, [1024, 1024], vec![], shapes);
        assert_eq!(primitives.len(), 2);
        assert_eq!(primitives[1].clip_rect, Rect::EVERYTHING);
    }

    #[test]
    fn test_debug_ignore_clip_rects() {
        let options = no_aa().with_debug_ignore_clip_rects(true);
        let shapes = vec![ClippedShape::new(clip(), Shape::rect_filled(clip(), 0.0, Color32::RED))];
        let primitives = tessellate_shapes(1.0, options, [1024, 1024], vec![], shapes);
        assert_eq!(primitives[0].clip_rect, Rect::EVERYTHING);
    }
}
