//! Lumina Paint - 2D shape tessellation
//!
//! This crate turns a frame of declarative paint primitives into textured,
//! anti-aliased triangle meshes ready for a GPU backend:
//! - Shapes: circles, ellipses, rounded rectangles, polylines, Bézier
//!   curves, meshes, pre-laid-out text and backend callbacks
//! - Feathered fills and strokes in premultiplied gamma space
//! - A coverage atlas holding the white texel, glyphs and pre-rasterized discs
//! - Texture bookkeeping producing upload deltas for the backend
//!
//! # Example
//!
//! ```
//! use lumina_paint::*;
//! use lumina_core::geometry::Rect;
//! use lumina_core::math::vec2;
//!
//! let atlas = TextureAtlas::new([1024, 64]);
//! let screen = Rect::from_min_max(vec2(0.0, 0.0), vec2(640.0, 480.0));
//!
//! let shapes = vec![
//!     ClippedShape::new(screen, Shape::rect_filled(screen.shrink(8.0), 4.0, Color32::DARK_GRAY)),
//!     ClippedShape::new(screen, Shape::circle_filled(vec2(320.0, 240.0), 3.0, Color32::RED)),
//! ];
//!
//! let primitives = tessellate_shapes(
//!     1.0,
//!     TessellationOptions::default(),
//!     atlas.size(),
//!     atlas.prepared_discs(),
//!     shapes,
//! );
//! assert_eq!(primitives.len(), 1);
//! ```

pub mod bezier;
pub mod color;
mod error;
mod image;
mod mesh;
pub mod path;
mod shadow;
mod shape;
mod stroke;
mod tessellator;
mod text;
mod texture_atlas;
mod textures;

pub use bezier::{CubicBezierShape, QuadraticBezierShape};
pub use color::{Color32, Rgba};
pub use error::MeshError;
pub use image::{ColorImage, FontImage, ImageData, ImageDelta};
pub use mesh::{Mesh, Mesh16, Vertex, WHITE_UV};
pub use path::{Path, PathPoint, PathType};
pub use shadow::{Margin, Shadow};
pub use shape::{CircleShape, EllipseShape, PaintCallback, PathShape, RectShape, Shape};
pub use stroke::{Rounding, Stroke};
pub use tessellator::{
    ClippedPrimitive, ClippedShape, Primitive, TessellationOptions, Tessellator, tessellate_shapes,
};
pub use text::{GlyphRow, GlyphRun, TextShape};
pub use texture_atlas::{
    LARGEST_PRERASTERIZED_DISC_RADIUS, MIN_ATLAS_WIDTH, PreparedDisc, TextureAtlas,
};
pub use textures::{
    TextureFilter, TextureId, TextureManager, TextureMeta, TextureOptions, TextureWrapMode,
    TexturesDelta,
};

pub use lumina_core::geometry::Rect;
pub use lumina_core::math::{Vec2, vec2};
