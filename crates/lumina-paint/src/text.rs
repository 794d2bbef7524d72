//! Pre-laid-out text.
//!
//! Shaping and layout happen elsewhere. What arrives here is a [`GlyphRun`]:
//! one mesh per row, positioned relative to the run and sampling the font
//! atlas in texel coordinates. The tessellator only places, culls and
//! recolors those rows.

use std::ops::Range;
use std::sync::Arc;

use lumina_core::geometry::Rect;
use lumina_core::math::Vec2;

use crate::{Color32, Mesh, Stroke};

/// One row of laid out glyphs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphRow {
    /// Positions in points relative to the top-left of the run.
    /// UVs in texels of the font atlas.
    pub mesh: Mesh,

    /// Bounds of [`Self::mesh`].
    pub mesh_bounds: Rect,

    /// The vertices in [`Self::mesh`] that belong to glyphs, as opposed to
    /// backgrounds or decorations baked into the row.
    ///
    /// Only these are recolored by [`TextShape::override_text_color`].
    pub glyph_vertex_range: Range<usize>,
}

impl GlyphRow {
    /// Wrap a glyph mesh, computing its bounds.
    ///
    /// All vertices are treated as glyph vertices.
    pub fn from_mesh(mesh: Mesh) -> Self {
        let mesh_bounds = mesh.calc_bounds();
        let glyph_vertex_range = 0..mesh.vertices.len();
        Self {
            mesh,
            mesh_bounds,
            glyph_vertex_range,
        }
    }
}

/// Text that has been shaped and laid out into rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphRun {
    pub rows: Vec<GlyphRow>,

    /// Bounding rectangle relative to the run position.
    pub rect: Rect,
}

impl GlyphRun {
    /// Builds a run from rows, with `rect` the union of the row bounds.
    pub fn from_rows(rows: Vec<GlyphRow>) -> Self {
        let rect = rows
            .iter()
            .fold(Rect::NOTHING, |rect, row| rect.union(row.mesh_bounds));
        Self { rows, rect }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.mesh.is_empty())
    }

    pub fn num_vertices(&self) -> usize {
        self.rows.iter().map(|row| row.mesh.vertices.len()).sum()
    }

    pub fn num_indices(&self) -> usize {
        self.rows.iter().map(|row| row.mesh.indices.len()).sum()
    }
}

/// How to paint some text on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    /// Top left corner of the first character.
    pub pos: Vec2,

    /// The laid out text.
    pub glyphs: Arc<GlyphRun>,

    /// Add this underline to the whole text.
    pub underline: Stroke,

    /// If set, the text color of the glyph vertices is replaced with this.
    pub override_text_color: Option<Color32>,

    /// Rotate text by this many radians clockwise.
    /// The pivot is `pos` (the upper left corner of the text).
    pub angle: f32,
}

impl TextShape {
    #[inline]
    pub fn new(pos: Vec2, glyphs: Arc<GlyphRun>) -> Self {
        Self {
            pos,
            glyphs,
            underline: Stroke::NONE,
            override_text_color: None,
            angle: 0.0,
        }
    }

    /// The visual bounding rectangle
    #[inline]
    pub fn visual_bounding_rect(&self) -> Rect {
        let rect = if self.angle == 0.0 {
            self.glyphs.rect
        } else {
            self.glyphs.rect.rotate_bb(Vec2::from_angle(self.angle))
        };
        rect.translate(self.pos)
    }

    #[inline]
    pub fn with_underline(mut self, underline: Stroke) -> Self {
        self.underline = underline;
        self
    }

    /// Use the given color for the text, regardless of what color is already
    /// in the glyph run.
    #[inline]
    pub fn with_override_text_color(mut self, override_text_color: Color32) -> Self {
        self.override_text_color = Some(override_text_color);
        self
    }

    /// Rotate text by this many radians clockwise.
    /// The pivot is `pos` (the upper left corner of the text).
    #[inline]
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }
}

impl From<TextShape> for crate::Shape {
    #[inline(always)]
    fn from(shape: TextShape) -> Self {
        Self::Text(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_core::math::vec2;

    fn glyph_quad(x: f32) -> Mesh {
        let mut mesh = Mesh::default();
        mesh.add_rect_with_uv(
            Rect::from_min_max(vec2(x, 0.0), vec2(x + 8.0, 12.0)),
            Rect::from_min_max(vec2(0.0, 0.0), vec2(8.0, 12.0)),
            Color32::WHITE,
        );
        mesh
    }

    #[test]
    fn test_run_rect_is_union_of_rows() {
        let run = GlyphRun::from_rows(vec![
            GlyphRow::from_mesh(glyph_quad(0.0)),
            GlyphRow::from_mesh(glyph_quad(20.0)),
        ]);
        assert_eq!(run.rect.min, vec2(0.0, 0.0));
        assert_eq!(run.rect.max, vec2(28.0, 12.0));
        assert_eq!(run.num_vertices(), 8);
        assert_eq!(run.num_indices(), 12);
        assert!(!run.is_empty());
    }

    #[test]
    fn test_visual_bounding_rect_follows_position_and_angle() {
        let run = Arc::new(GlyphRun::from_rows(vec![GlyphRow::from_mesh(glyph_quad(0.0))]));
        let text = TextShape::new(vec2(100.0, 50.0), run.clone());
        assert_eq!(text.visual_bounding_rect().min, vec2(100.0, 50.0));

        let rotated = TextShape::new(vec2(100.0, 50.0), run).with_angle(std::f32::consts::FRAC_PI_2);
        let bounds = rotated.visual_bounding_rect();
        // Rotating a quarter turn clockwise swings the text below-left of the pivot.
        assert!((bounds.min.x - 88.0).abs() < 1e-4);
        assert!((bounds.max.y - 58.0).abs() < 1e-4);
    }
}
