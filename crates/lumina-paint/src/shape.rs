//! The different shapes that can be painted.

use std::any::Any;
use std::sync::Arc;

use lumina_core::geometry::Rect;
use lumina_core::math::Vec2;

use crate::{
    Color32, CubicBezierShape, Mesh, QuadraticBezierShape, Rounding, Stroke, TextShape, TextureId,
};

/// A paint primitive such as a circle or a piece of text.
///
/// Coordinates are all screen space points (not physical pixels).
#[must_use = "Add a Shape to a painter"]
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Paint nothing. This can be useful as a placeholder.
    Noop,

    /// Recursively nest more shapes - sometimes a convenience to be able to
    /// do.
    ///
    /// For performance reasons it is better to avoid it.
    Vec(Vec<Shape>),

    /// Circle with optional outline and fill.
    Circle(CircleShape),

    /// Ellipse with optional outline and fill.
    Ellipse(EllipseShape),

    /// A line between two points.
    LineSegment { points: [Vec2; 2], stroke: Stroke },

    /// A series of lines between points.
    /// The path can have a stroke and/or fill (if closed).
    Path(PathShape),

    /// Rectangle with optional outline and fill.
    Rect(RectShape),

    /// Pre-laid-out text.
    Text(TextShape),

    /// A general triangle mesh.
    ///
    /// Can be used to display images.
    Mesh(Arc<Mesh>),

    /// A quadratic [Bézier Curve](https://en.wikipedia.org/wiki/B%C3%A9zier_curve).
    QuadraticBezier(QuadraticBezierShape),

    /// A cubic [Bézier Curve](https://en.wikipedia.org/wiki/B%C3%A9zier_curve).
    CubicBezier(CubicBezierShape),

    /// Backend-specific painting.
    Callback(PaintCallback),
}

impl From<Vec<Self>> for Shape {
    #[inline(always)]
    fn from(shapes: Vec<Self>) -> Self {
        Self::Vec(shapes)
    }
}

impl From<Mesh> for Shape {
    #[inline(always)]
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(Arc::new(mesh))
    }
}

impl From<Arc<Mesh>> for Shape {
    #[inline(always)]
    fn from(mesh: Arc<Mesh>) -> Self {
        Self::Mesh(mesh)
    }
}

/// ## Constructors
impl Shape {
    /// A line between two points.
    /// More efficient than calling [`Self::line`].
    #[inline]
    pub fn line_segment(points: [Vec2; 2], stroke: impl Into<Stroke>) -> Self {
        Self::LineSegment {
            points,
            stroke: stroke.into(),
        }
    }

    /// A horizontal line.
    pub fn hline(x_min: f32, x_max: f32, y: f32, stroke: impl Into<Stroke>) -> Self {
        Self::line_segment([Vec2::new(x_min, y), Vec2::new(x_max, y)], stroke)
    }

    /// A vertical line.
    pub fn vline(x: f32, y_min: f32, y_max: f32, stroke: impl Into<Stroke>) -> Self {
        Self::line_segment([Vec2::new(x, y_min), Vec2::new(x, y_max)], stroke)
    }

    /// A line through many points.
    ///
    /// Use [`Self::line_segment`] instead if your line only connects two
    /// points.
    #[inline]
    pub fn line(points: Vec<Vec2>, stroke: impl Into<Stroke>) -> Self {
        Self::Path(PathShape::line(points, stroke))
    }

    /// A line that closes back to the start point again.
    #[inline]
    pub fn closed_line(points: Vec<Vec2>, stroke: impl Into<Stroke>) -> Self {
        Self::Path(PathShape::closed_line(points, stroke))
    }

    /// Turn a line into equally spaced dashes separated by gaps.
    pub fn dashed_line(
        points: &[Vec2],
        stroke: impl Into<Stroke>,
        dash_length: f32,
        gap_length: f32,
    ) -> Vec<Self> {
        let mut shapes = Vec::new();
        dashes_from_line(
            points,
            stroke.into(),
            &[dash_length],
            &[gap_length],
            &mut shapes,
            0.0,
        );
        shapes
    }

    /// Turn a line into dashes with different dash/gap lengths and a start
    /// offset.
    ///
    /// `dash_lengths` and `gap_lengths` are cycled through in lockstep.
    pub fn dashed_line_with_offset(
        points: &[Vec2],
        stroke: impl Into<Stroke>,
        dash_lengths: &[f32],
        gap_lengths: &[f32],
        dash_offset: f32,
    ) -> Vec<Self> {
        let mut shapes = Vec::new();
        dashes_from_line(
            points,
            stroke.into(),
            dash_lengths,
            gap_lengths,
            &mut shapes,
            dash_offset,
        );
        shapes
    }

    /// A convex polygon with a fill and optional stroke.
    ///
    /// The most performant winding order is clockwise.
    #[inline]
    pub fn convex_polygon(
        points: Vec<Vec2>,
        fill: impl Into<Color32>,
        stroke: impl Into<Stroke>,
    ) -> Self {
        Self::Path(PathShape::convex_polygon(points, fill, stroke))
    }

    #[inline]
    pub fn circle_filled(center: Vec2, radius: f32, fill_color: impl Into<Color32>) -> Self {
        Self::Circle(CircleShape::filled(center, radius, fill_color))
    }

    #[inline]
    pub fn circle_stroke(center: Vec2, radius: f32, stroke: impl Into<Stroke>) -> Self {
        Self::Circle(CircleShape::stroke(center, radius, stroke))
    }

    #[inline]
    pub fn ellipse_filled(center: Vec2, radius: Vec2, fill_color: impl Into<Color32>) -> Self {
        Self::Ellipse(EllipseShape::filled(center, radius, fill_color))
    }

    #[inline]
    pub fn ellipse_stroke(center: Vec2, radius: Vec2, stroke: impl Into<Stroke>) -> Self {
        Self::Ellipse(EllipseShape::stroke(center, radius, stroke))
    }

    pub fn rect_filled(
        rect: Rect,
        rounding: impl Into<Rounding>,
        fill_color: impl Into<Color32>,
    ) -> Self {
        Self::Rect(RectShape::filled(rect, rounding, fill_color))
    }

    pub fn rect_stroke(rect: Rect, rounding: impl Into<Rounding>, stroke: impl Into<Stroke>) -> Self {
        Self::Rect(RectShape::stroke(rect, rounding, stroke))
    }

    #[inline]
    pub fn mesh(mesh: impl Into<Arc<Mesh>>) -> Self {
        let mesh = mesh.into();
        debug_assert!(mesh.is_valid(), "invalid mesh: {:?}", mesh.validate());
        Self::Mesh(mesh)
    }

    /// An image at the given position.
    ///
    /// `uv` should normally be `Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0))`
    /// unless you want to crop or flip the image.
    pub fn image(texture_id: TextureId, rect: Rect, uv: Rect, tint: Color32) -> Self {
        let mut mesh = Mesh::with_texture(texture_id);
        mesh.add_rect_with_uv(rect, uv, tint);
        Self::mesh(mesh)
    }
}

/// ## Inspection and transforms
impl Shape {
    /// The visual bounding rectangle (includes stroke widths).
    pub fn visual_bounding_rect(&self) -> Rect {
        match self {
            Self::Noop => Rect::NOTHING,
            Self::Vec(shapes) => {
                let mut rect = Rect::NOTHING;
                for shape in shapes {
                    rect = rect.union(shape.visual_bounding_rect());
                }
                rect
            }
            Self::Circle(circle_shape) => circle_shape.visual_bounding_rect(),
            Self::Ellipse(ellipse_shape) => ellipse_shape.visual_bounding_rect(),
            Self::LineSegment { points, stroke } => {
                if stroke.is_empty() {
                    Rect::NOTHING
                } else {
                    Rect::from_two_pos(points[0], points[1]).expand(stroke.width / 2.0)
                }
            }
            Self::Path(path_shape) => path_shape.visual_bounding_rect(),
            Self::Rect(rect_shape) => rect_shape.visual_bounding_rect(),
            Self::Text(text_shape) => text_shape.visual_bounding_rect(),
            Self::Mesh(mesh) => mesh.calc_bounds(),
            Self::QuadraticBezier(bezier) => bezier.visual_bounding_rect(),
            Self::CubicBezier(bezier) => bezier.visual_bounding_rect(),
            Self::Callback(custom) => custom.rect,
        }
    }

    /// The texture this shape samples.
    ///
    /// Everything except meshes and textured rectangles samples the font
    /// atlas, [`TextureId::default`].
    #[inline]
    pub fn texture_id(&self) -> TextureId {
        match self {
            Self::Mesh(mesh) => mesh.texture_id,
            Self::Rect(rect_shape) if rect_shape.uv.is_positive() => rect_shape.fill_texture_id,
            _ => TextureId::default(),
        }
    }

    /// Move the shape by this many points, in-place.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Self::Noop => {}
            Self::Vec(shapes) => {
                for shape in shapes {
                    shape.translate(delta);
                }
            }
            Self::Circle(circle_shape) => {
                circle_shape.center += delta;
            }
            Self::Ellipse(ellipse_shape) => {
                ellipse_shape.center += delta;
            }
            Self::LineSegment { points, .. } => {
                for p in points {
                    *p += delta;
                }
            }
            Self::Path(path_shape) => {
                for p in &mut path_shape.points {
                    *p += delta;
                }
            }
            Self::Rect(rect_shape) => {
                rect_shape.rect = rect_shape.rect.translate(delta);
            }
            Self::Text(text_shape) => {
                text_shape.pos += delta;
            }
            Self::Mesh(mesh) => {
                Arc::make_mut(mesh).translate(delta);
            }
            Self::QuadraticBezier(bezier) => {
                for p in &mut bezier.points {
                    *p += delta;
                }
            }
            Self::CubicBezier(bezier) => {
                for p in &mut bezier.points {
                    *p += delta;
                }
            }
            Self::Callback(shape) => {
                shape.rect = shape.rect.translate(delta);
            }
        }
    }
}

/// Splits `path` into dash segments, appending them to `shapes`.
fn dashes_from_line(
    path: &[Vec2],
    stroke: Stroke,
    dash_lengths: &[f32],
    gap_lengths: &[f32],
    shapes: &mut Vec<Shape>,
    dash_offset: f32,
) {
    assert_eq!(dash_lengths.len(), gap_lengths.len());
    if dash_lengths.is_empty() {
        return;
    }

    let mut position_on_segment = dash_offset;
    let mut drawing_dash = false;
    let mut step = 0;
    let steps = dash_lengths.len();

    for window in path.windows(2) {
        let (start, end) = (window[0], window[1]);
        let vector = end - start;
        let segment_length = vector.length();

        let mut start_point = start;
        while position_on_segment < segment_length {
            let new_point = start + vector * (position_on_segment / segment_length);
            if drawing_dash {
                // This is the end point.
                shapes.push(Shape::line_segment([start_point, new_point], stroke));
                position_on_segment += gap_lengths[step];
                step = (step + 1) % steps;
            } else {
                // Start a new dash.
                start_point = new_point;
                position_on_segment += dash_lengths[step];
            }
            drawing_dash = !drawing_dash;
        }

        // If the segment ends and the dash is not finished, add the segment's
        // end point.
        if drawing_dash {
            shapes.push(Shape::line_segment([start_point, end], stroke));
        }

        position_on_segment -= segment_length;
    }
}

// ----------------------------------------------------------------------------

/// How to paint a circle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color32,
    pub stroke: Stroke,
}

impl CircleShape {
    #[inline]
    pub fn filled(center: Vec2, radius: f32, fill_color: impl Into<Color32>) -> Self {
        Self {
            center,
            radius,
            fill: fill_color.into(),
            stroke: Default::default(),
        }
    }

    #[inline]
    pub fn stroke(center: Vec2, radius: f32, stroke: impl Into<Stroke>) -> Self {
        Self {
            center,
            radius,
            fill: Default::default(),
            stroke: stroke.into(),
        }
    }

    /// The visual bounding rectangle (includes stroke width)
    pub fn visual_bounding_rect(&self) -> Rect {
        if self.fill == Color32::TRANSPARENT && self.stroke.is_empty() {
            Rect::NOTHING
        } else {
            Rect::from_center_size(
                self.center,
                Vec2::splat(self.radius * 2.0 + self.stroke.width),
            )
        }
    }
}

impl From<CircleShape> for Shape {
    #[inline(always)]
    fn from(shape: CircleShape) -> Self {
        Self::Circle(shape)
    }
}

// ----------------------------------------------------------------------------

/// How to paint an ellipse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EllipseShape {
    pub center: Vec2,

    /// Radius is the vector (a, b) where the width of the Ellipse is 2a and
    /// the height is 2b
    pub radius: Vec2,
    pub fill: Color32,
    pub stroke: Stroke,
}

impl EllipseShape {
    #[inline]
    pub fn filled(center: Vec2, radius: Vec2, fill_color: impl Into<Color32>) -> Self {
        Self {
            center,
            radius,
            fill: fill_color.into(),
            stroke: Default::default(),
        }
    }

    #[inline]
    pub fn stroke(center: Vec2, radius: Vec2, stroke: impl Into<Stroke>) -> Self {
        Self {
            center,
            radius,
            fill: Default::default(),
            stroke: stroke.into(),
        }
    }

    /// The visual bounding rectangle (includes stroke width)
    pub fn visual_bounding_rect(&self) -> Rect {
        if self.fill == Color32::TRANSPARENT && self.stroke.is_empty() {
            Rect::NOTHING
        } else {
            Rect::from_center_size(
                self.center,
                self.radius * 2.0 + Vec2::splat(self.stroke.width),
            )
        }
    }
}

impl From<EllipseShape> for Shape {
    #[inline(always)]
    fn from(shape: EllipseShape) -> Self {
        Self::Ellipse(shape)
    }
}

// ----------------------------------------------------------------------------

/// A path which can be stroked and/or filled (if closed).
#[derive(Clone, Debug, PartialEq)]
pub struct PathShape {
    /// Filled paths should prefer clockwise order.
    pub points: Vec<Vec2>,

    /// If true, connect the first and last of the points together.
    /// This is required if `fill != TRANSPARENT`.
    pub closed: bool,

    /// Fill is only supported for convex polygons.
    pub fill: Color32,

    /// Color and thickness of the line.
    pub stroke: Stroke,
}

impl PathShape {
    /// A line through many points.
    ///
    /// Use [`Shape::line_segment`] instead if your line only connects two
    /// points.
    #[inline]
    pub fn line(points: Vec<Vec2>, stroke: impl Into<Stroke>) -> Self {
        Self {
            points,
            closed: false,
            fill: Default::default(),
            stroke: stroke.into(),
        }
    }

    /// A line that closes back to the start point again.
    #[inline]
    pub fn closed_line(points: Vec<Vec2>, stroke: impl Into<Stroke>) -> Self {
        Self {
            points,
            closed: true,
            fill: Default::default(),
            stroke: stroke.into(),
        }
    }

    /// A convex polygon with a fill and optional stroke.
    ///
    /// The most performant winding order is clockwise.
    #[inline]
    pub fn convex_polygon(
        points: Vec<Vec2>,
        fill: impl Into<Color32>,
        stroke: impl Into<Stroke>,
    ) -> Self {
        Self {
            points,
            closed: true,
            fill: fill.into(),
            stroke: stroke.into(),
        }
    }

    /// The visual bounding rectangle (includes stroke width)
    #[inline]
    pub fn visual_bounding_rect(&self) -> Rect {
        if self.fill == Color32::TRANSPARENT && self.stroke.is_empty() {
            Rect::NOTHING
        } else {
            Rect::from_points(&self.points).expand(self.stroke.width / 2.0)
        }
    }
}

impl From<PathShape> for Shape {
    #[inline(always)]
    fn from(shape: PathShape) -> Self {
        Self::Path(shape)
    }
}

// ----------------------------------------------------------------------------

/// How to paint a rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectShape {
    pub rect: Rect,

    /// How rounded the corners are. Use `Rounding::ZERO` for no rounding.
    pub rounding: Rounding,

    /// How to fill the rectangle.
    pub fill: Color32,

    /// The thickness and color of the outline.
    pub stroke: Stroke,

    /// If larger than zero, the edges of the rectangle (for both fill and
    /// stroke) will be blurred.
    ///
    /// This can be used to produce shadows and glow effects.
    ///
    /// The blur is currently implemented using a simple linear blur in sRGBA
    /// gamma space.
    pub blur_width: f32,

    /// If the rect should be filled with a texture, which one?
    ///
    /// The texture is multiplied with [`Self::fill`].
    pub fill_texture_id: TextureId,

    /// What UV coordinates to use for the texture?
    ///
    /// To display a texture, set [`Self::fill_texture_id`], and set this to
    /// `Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0))`.
    ///
    /// Use [`Rect::ZERO`] to turn off texturing.
    pub uv: Rect,
}

impl RectShape {
    /// The stroke is centered on the edge of the [`Rect`].
    #[inline]
    pub fn new(
        rect: Rect,
        rounding: impl Into<Rounding>,
        fill_color: impl Into<Color32>,
        stroke: impl Into<Stroke>,
    ) -> Self {
        Self {
            rect,
            rounding: rounding.into(),
            fill: fill_color.into(),
            stroke: stroke.into(),
            blur_width: 0.0,
            fill_texture_id: Default::default(),
            uv: Rect::ZERO,
        }
    }

    #[inline]
    pub fn filled(rect: Rect, rounding: impl Into<Rounding>, fill_color: impl Into<Color32>) -> Self {
        Self::new(rect, rounding, fill_color, Stroke::NONE)
    }

    /// The stroke is centered on the edge of the [`Rect`].
    #[inline]
    pub fn stroke(rect: Rect, rounding: impl Into<Rounding>, stroke: impl Into<Stroke>) -> Self {
        Self::new(rect, rounding, Color32::TRANSPARENT, stroke)
    }

    /// If larger than zero, the edges of the rectangle (for both fill and
    /// stroke) will be blurred.
    #[inline]
    pub fn with_blur_width(mut self, blur_width: f32) -> Self {
        self.blur_width = blur_width;
        self
    }

    /// Fill the rectangle with a texture, sampled at `uv`.
    #[inline]
    pub fn with_texture(mut self, fill_texture_id: TextureId, uv: Rect) -> Self {
        self.fill_texture_id = fill_texture_id;
        self.uv = uv;
        self
    }

    /// The visual bounding rectangle (includes stroke width)
    #[inline]
    pub fn visual_bounding_rect(&self) -> Rect {
        if self.fill == Color32::TRANSPARENT && self.stroke.is_empty() {
            Rect::NOTHING
        } else {
            let Stroke { width, .. } = self.stroke;
            self.rect.expand((width + self.blur_width) / 2.0)
        }
    }
}

impl From<RectShape> for Shape {
    #[inline(always)]
    fn from(shape: RectShape) -> Self {
        Self::Rect(shape)
    }
}

// ----------------------------------------------------------------------------

/// A callback into the painting backend, forwarded untouched by the
/// tessellator as [`crate::Primitive::Callback`].
#[derive(Clone)]
pub struct PaintCallback {
    /// Where to paint.
    ///
    /// This will become the viewport for the backend, so `(0,0)` in the
    /// backend's coordinates is the top left corner of this rectangle.
    pub rect: Rect,

    /// Paint something custom (e.g. 3D stuff).
    ///
    /// The concrete value is backend-specific; the backend downcasts it.
    pub callback: Arc<dyn Any + Send + Sync>,
}

impl PaintCallback {
    pub fn new(rect: Rect, callback: impl Any + Send + Sync) -> Self {
        Self {
            rect,
            callback: Arc::new(callback),
        }
    }
}

impl std::fmt::Debug for PaintCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintCallback")
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

impl std::cmp::PartialEq for PaintCallback {
    fn eq(&self, other: &Self) -> bool {
        self.rect.eq(&other.rect) && Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl From<PaintCallback> for Shape {
    #[inline(always)]
    fn from(shape: PaintCallback) -> Self {
        Self::Callback(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_core::math::vec2;

    #[test]
    fn test_dashed_line() {
        let stroke = Stroke::new(1.0, Color32::WHITE);
        let dashes = Shape::dashed_line(&[vec2(0.0, 0.0), vec2(8.0, 0.0)], stroke, 2.0, 1.0);
        // Dashes start at 0, 3 and 6; the last one is cut at the end.
        assert_eq!(dashes.len(), 3);
        assert_eq!(
            dashes[1],
            Shape::line_segment([vec2(3.0, 0.0), vec2(5.0, 0.0)], stroke)
        );
        assert_eq!(
            dashes[2],
            Shape::line_segment([vec2(6.0, 0.0), vec2(8.0, 0.0)], stroke)
        );
    }

    #[test]
    fn test_dashed_line_across_corner() {
        let stroke = Stroke::new(1.0, Color32::WHITE);
        let dashes = Shape::dashed_line(
            &[vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(4.0, 4.0)],
            stroke,
            6.0,
            1.0,
        );
        // The first dash continues around the corner as a second segment.
        assert_eq!(
            dashes[0],
            Shape::line_segment([vec2(0.0, 0.0), vec2(4.0, 0.0)], stroke)
        );
        assert_eq!(
            dashes[1],
            Shape::line_segment([vec2(4.0, 0.0), vec2(4.0, 2.0)], stroke)
        );
    }

    #[test]
    fn test_visual_bounding_rect() {
        let circle = Shape::circle_stroke(vec2(10.0, 10.0), 5.0, (2.0, Color32::WHITE));
        let bounds = circle.visual_bounding_rect();
        assert_eq!(bounds.min, vec2(4.0, 4.0));
        assert_eq!(bounds.max, vec2(16.0, 16.0));

        let invisible = Shape::circle_filled(vec2(0.0, 0.0), 5.0, Color32::TRANSPARENT);
        assert!(!invisible.visual_bounding_rect().is_positive());

        let rect = RectShape::filled(
            Rect::from_min_max(vec2(0.0, 0.0), vec2(10.0, 10.0)),
            0.0,
            Color32::RED,
        )
        .with_blur_width(4.0);
        assert_eq!(rect.visual_bounding_rect().min, vec2(-2.0, -2.0));
    }

    #[test]
    fn test_vec_bounds_is_union() {
        let shape = Shape::Vec(vec![
            Shape::circle_filled(vec2(0.0, 0.0), 1.0, Color32::RED),
            Shape::circle_filled(vec2(10.0, 0.0), 1.0, Color32::RED),
        ]);
        let bounds = shape.visual_bounding_rect();
        assert_eq!(bounds.min, vec2(-1.0, -1.0));
        assert_eq!(bounds.max, vec2(11.0, 1.0));
    }

    #[test]
    fn test_translate() {
        let mut shape = Shape::Vec(vec![
            Shape::line_segment([vec2(0.0, 0.0), vec2(1.0, 0.0)], (1.0, Color32::RED)),
            Shape::rect_filled(
                Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0)),
                0.0,
                Color32::RED,
            ),
        ]);
        shape.translate(vec2(5.0, 5.0));
        let Shape::Vec(shapes) = &shape else {
            panic!("expected a Vec shape");
        };
        assert_eq!(
            shapes[0],
            Shape::line_segment([vec2(5.0, 5.0), vec2(6.0, 5.0)], (1.0, Color32::RED))
        );
        assert_eq!(shape.visual_bounding_rect().min, vec2(5.0, 5.0));
    }

    #[test]
    fn test_texture_id() {
        let image = Shape::image(
            TextureId::User(9),
            Rect::from_min_max(vec2(0.0, 0.0), vec2(4.0, 4.0)),
            Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0)),
            Color32::WHITE,
        );
        assert_eq!(image.texture_id(), TextureId::User(9));
        assert_eq!(
            Shape::circle_filled(Vec2::ZERO, 1.0, Color32::RED).texture_id(),
            TextureId::default()
        );
    }

    #[test]
    fn test_callback_equality_is_by_pointer() {
        let rect = Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0));
        let a = PaintCallback::new(rect, 42_u32);
        let b = PaintCallback::new(rect, 42_u32);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.callback.downcast_ref::<u32>(), Some(&42));
    }
}
