//! Error types for lumina-paint.

use thiserror::Error;

/// Structural problems found in a [`crate::Mesh`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The index count is not a multiple of three.
    #[error("mesh has {count} indices, which is not a multiple of 3")]
    IndicesNotTriangles { count: usize },

    /// An index points past the end of the vertex buffer.
    #[error("index {index} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    /// A single triangle spans more vertices than fit in a `u16` index.
    #[error("triangle at index {triangle} spans {span} vertices, more than a u16 mesh can address")]
    TriangleSpanTooLarge { triangle: usize, span: u32 },
}
