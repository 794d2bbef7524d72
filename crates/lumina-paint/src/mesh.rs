//! Triangle meshes, the output of tessellation.

use lumina_core::geometry::Rect;
use lumina_core::math::{Affine2, Vec2, vec2};

use bytemuck::{Pod, Zeroable};

use crate::{Color32, MeshError, TextureId};

/// The UV coordinate of a white texel in the font atlas texture.
///
/// Untextured geometry samples this so that the vertex color is used as-is.
pub const WHITE_UV: Vec2 = Vec2::ZERO;

/// The vertex type.
///
/// Should be friendly to send to the GPU as is.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Logical pixel coordinates (points).
    /// (0,0) is the top left corner of the screen.
    pub pos: Vec2,

    /// Normalized texture coordinates.
    /// (0, 0) is the top left corner of the texture.
    /// (1, 1) is the bottom right corner of the texture.
    pub uv: Vec2,

    /// sRGBA with premultiplied alpha
    pub color: Color32,
}

static_assertions::assert_eq_size!(Vertex, [u8; 20]);

/// Textured triangles in two dimensions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Draw as triangles (i.e. the length is always multiple of three).
    ///
    /// Triangles are not guaranteed to be wound in any particular order.
    pub indices: Vec<u32>,

    /// The vertex data indexed by `indices`.
    pub vertices: Vec<Vertex>,

    /// The texture to use when drawing these triangles.
    pub texture_id: TextureId,
}

impl Mesh {
    pub fn with_texture(texture_id: TextureId) -> Self {
        Self {
            texture_id,
            ..Default::default()
        }
    }

    /// Restore to default state, but without freeing memory.
    pub fn clear(&mut self) {
        self.indices.clear();
        self.vertices.clear();
        self.texture_id = TextureId::default();
    }

    /// Returns the amount of memory used by the vertices and indices.
    pub fn bytes_used(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.vertices.len() * std::mem::size_of::<Vertex>()
            + self.indices.len() * std::mem::size_of::<u32>()
    }

    /// Check that the index count is a multiple of three and that every
    /// index refers to an existing vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndicesNotTriangles {
                count: self.indices.len(),
            });
        }
        let vertex_count = self.vertices.len();
        match self
            .indices
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            Some(&index) => Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Are all indices within the bounds of the contained vertices?
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.vertices.is_empty()
    }

    /// Calculate a bounding rectangle.
    pub fn calc_bounds(&self) -> Rect {
        let mut bounds = Rect::NOTHING;
        for v in &self.vertices {
            bounds.extend_with(v.pos);
        }
        bounds
    }

    /// Append all the indices and vertices of `other` to `self`.
    ///
    /// Panics when `other` mesh has a different texture.
    pub fn append(&mut self, other: Self) {
        debug_assert!(other.is_valid(), "appending an invalid mesh");

        if self.is_empty() {
            *self = other;
        } else {
            self.append_ref(&other);
        }
    }

    /// Append all the indices and vertices of `other` to `self` without
    /// taking ownership.
    ///
    /// Panics when `other` mesh has a different texture.
    pub fn append_ref(&mut self, other: &Self) {
        debug_assert!(other.is_valid(), "appending an invalid mesh");

        if self.is_empty() {
            self.texture_id = other.texture_id;
        } else {
            assert_eq!(
                self.texture_id, other.texture_id,
                "Can't merge Mesh using different textures"
            );
        }

        let index_offset = self.vertices.len() as u32;
        self.indices
            .extend(other.indices.iter().map(|index| index + index_offset));
        self.vertices.extend(other.vertices.iter());
    }

    /// Add a vertex sampling the white texel.
    #[inline(always)]
    pub fn colored_vertex(&mut self, pos: Vec2, color: Color32) {
        debug_assert!(self.texture_id == TextureId::default());
        self.vertices.push(Vertex {
            pos,
            uv: WHITE_UV,
            color,
        });
    }

    /// Add a triangle.
    #[inline(always)]
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Make room for this many additional triangles (will reserve 3x as many
    /// indices).
    #[inline(always)]
    pub fn reserve_triangles(&mut self, additional_triangles: usize) {
        self.indices.reserve(3 * additional_triangles);
    }

    /// Make room for this many additional vertices.
    #[inline(always)]
    pub fn reserve_vertices(&mut self, additional: usize) {
        self.vertices.reserve(additional);
    }

    /// Rectangle with a texture and color.
    pub fn add_rect_with_uv(&mut self, rect: Rect, uv: Rect, color: Color32) {
        let idx = self.vertices.len() as u32;
        self.add_triangle(idx, idx + 1, idx + 2);
        self.add_triangle(idx + 2, idx + 1, idx + 3);

        self.vertices.push(Vertex {
            pos: rect.left_top(),
            uv: uv.left_top(),
            color,
        });
        self.vertices.push(Vertex {
            pos: rect.right_top(),
            uv: uv.right_top(),
            color,
        });
        self.vertices.push(Vertex {
            pos: rect.left_bottom(),
            uv: uv.left_bottom(),
            color,
        });
        self.vertices.push(Vertex {
            pos: rect.right_bottom(),
            uv: uv.right_bottom(),
            color,
        });
    }

    /// Uniformly colored rectangle.
    #[inline(always)]
    pub fn add_colored_rect(&mut self, rect: Rect, color: Color32) {
        debug_assert!(self.texture_id == TextureId::default());
        self.add_rect_with_uv(rect, Rect::from_two_pos(WHITE_UV, WHITE_UV), color);
    }

    /// Translate location by this much, in-place
    pub fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            v.pos += delta;
        }
    }

    /// Transform the mesh in-place with the given affine transform.
    pub fn transform(&mut self, transform: Affine2) {
        for v in &mut self.vertices {
            v.pos = transform.transform_point2(v.pos);
        }
    }

    /// Rotate by some angle about an origin, in-place.
    ///
    /// `rotation` is a unit vector, see [`Vec2::from_angle`].
    pub fn rotate(&mut self, rotation: Vec2, origin: Vec2) {
        for v in &mut self.vertices {
            v.pos = origin + rotation.rotate(v.pos - origin);
        }
    }

    /// Split a large mesh into many smaller meshes addressable with `u16`
    /// indices.
    ///
    /// The pieces keep the order of the triangles and share this mesh's
    /// texture.
    pub fn split_to_u16(&self) -> Result<Vec<Mesh16>, MeshError> {
        self.split_with_max_span(u16::MAX as u32)
    }

    fn split_with_max_span(&self, max_span: u32) -> Result<Vec<Mesh16>, MeshError> {
        self.validate()?;

        if self.vertices.len() <= max_span as usize {
            // Common-case optimization:
            return Ok(vec![Mesh16 {
                indices: self.indices.iter().map(|&i| i as u16).collect(),
                vertices: self.vertices.clone(),
                texture_id: self.texture_id,
            }]);
        }

        let mut output = vec![];
        let mut index_cursor = 0;

        while index_cursor < self.indices.len() {
            let span_start = index_cursor;
            let mut min_vindex = self.indices[index_cursor];
            let mut max_vindex = self.indices[index_cursor];

            while index_cursor < self.indices.len() {
                let triangle = &self.indices[index_cursor..index_cursor + 3];
                let new_min = triangle.iter().copied().fold(min_vindex, u32::min);
                let new_max = triangle.iter().copied().fold(max_vindex, u32::max);

                if new_max - new_min < max_span {
                    // Triangle fits
                    min_vindex = new_min;
                    max_vindex = new_max;
                    index_cursor += 3;
                } else {
                    break;
                }
            }

            if index_cursor == span_start {
                let triangle = &self.indices[span_start..span_start + 3];
                let lo = triangle.iter().copied().fold(u32::MAX, u32::min);
                let hi = triangle.iter().copied().fold(0, u32::max);
                return Err(MeshError::TriangleSpanTooLarge {
                    triangle: span_start / 3,
                    span: hi - lo + 1,
                });
            }

            output.push(Mesh16 {
                indices: self.indices[span_start..index_cursor]
                    .iter()
                    .map(|vi| (vi - min_vindex) as u16)
                    .collect(),
                vertices: self.vertices[(min_vindex as usize)..=(max_vindex as usize)].to_vec(),
                texture_id: self.texture_id,
            });
        }
        Ok(output)
    }
}

// ----------------------------------------------------------------------------

/// A version of [`Mesh`] that uses 16-bit indices.
///
/// Produced by [`Mesh::split_to_u16`] for backends that cannot draw with
/// 32-bit indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh16 {
    /// Draw as triangles (i.e. the length is always multiple of three).
    pub indices: Vec<u16>,

    /// The vertex data indexed by `indices`.
    pub vertices: Vec<Vertex>,

    /// The texture to use when drawing these triangles.
    pub texture_id: TextureId,
}

impl Mesh16 {
    /// Are all indices within the bounds of the contained vertices?
    pub fn is_valid(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(num_quads: u32) -> Mesh {
        let mut mesh = Mesh::default();
        for i in 0..num_quads {
            let x = i as f32;
            mesh.add_colored_rect(
                Rect::from_min_max(vec2(x, 0.0), vec2(x + 1.0, 1.0)),
                Color32::WHITE,
            );
        }
        mesh
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        let v = Vertex {
            pos: vec2(1.0, 2.0),
            uv: vec2(0.5, 0.25),
            color: Color32::RED,
        };
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[16..20], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_validate() {
        let mut mesh = strip(2);
        assert_eq!(mesh.validate(), Ok(()));

        mesh.indices.push(0);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndicesNotTriangles { count: 13 })
        );

        mesh.indices.extend_from_slice(&[1, 99]);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfBounds {
                index: 99,
                vertex_count: 8
            })
        );
        assert!(!mesh.is_valid());
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut a = strip(1);
        let b = strip(1);
        a.append_ref(&b);
        assert_eq!(a.vertices.len(), 8);
        assert_eq!(a.indices.len(), 12);
        assert_eq!(&a.indices[6..9], &[4, 5, 6]);
        assert!(a.is_valid());
    }

    #[test]
    fn test_append_into_empty_takes_texture() {
        let mut a = Mesh::default();
        let mut b = Mesh::with_texture(TextureId::User(7));
        b.vertices.push(Vertex::default());
        a.append(b);
        assert_eq!(a.texture_id, TextureId::User(7));
    }

    #[test]
    #[should_panic(expected = "different textures")]
    fn test_append_mismatched_texture_panics() {
        let mut a = strip(1);
        let mut b = Mesh::with_texture(TextureId::User(1));
        b.vertices.push(Vertex::default());
        a.append_ref(&b);
    }

    #[test]
    fn test_calc_bounds() {
        let mesh = strip(3);
        let bounds = mesh.calc_bounds();
        assert_eq!(bounds.min, vec2(0.0, 0.0));
        assert_eq!(bounds.max, vec2(3.0, 1.0));
    }

    #[test]
    fn test_split_small_mesh_is_single_piece() {
        let mesh = strip(4);
        let pieces = mesh.split_to_u16().unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].indices.len(), mesh.indices.len());
        assert!(pieces[0].is_valid());
    }

    #[test]
    fn test_split_preserves_triangles() {
        let mesh = strip(10);
        // Each quad uses 4 vertices; allow at most 6 vertices per piece.
        let pieces = mesh.split_with_max_span(6).unwrap();
        assert!(pieces.len() > 1);
        let triangles: usize = pieces.iter().map(|m| m.indices.len() / 3).sum();
        assert_eq!(triangles, mesh.indices.len() / 3);
        for piece in &pieces {
            assert!(piece.is_valid());
            assert!(piece.vertices.len() <= 6);
        }
    }

    #[test]
    fn test_split_triangle_too_wide() {
        let mut mesh = strip(4);
        mesh.indices.extend_from_slice(&[0, 1, 15]);
        assert_eq!(
            mesh.split_with_max_span(8),
            Err(MeshError::TriangleSpanTooLarge {
                triangle: 8,
                span: 16
            })
        );
    }

    #[test]
    fn test_rotate_and_translate() {
        let mut mesh = Mesh::default();
        mesh.colored_vertex(vec2(1.0, 0.0), Color32::WHITE);
        mesh.rotate(Vec2::from_angle(std::f32::consts::FRAC_PI_2), Vec2::ZERO);
        assert!((mesh.vertices[0].pos - vec2(0.0, 1.0)).length() < 1e-6);
        mesh.translate(vec2(2.0, 0.0));
        assert!((mesh.vertices[0].pos - vec2(2.0, 1.0)).length() < 1e-6);
    }
}
