//! Test utilities for lumina.
//!
//! The tessellator hands its output to a painter backend that uploads
//! textures and draws meshes. This crate abstracts that backend so frames can
//! be driven end to end in tests without a GPU.
//!
//! # Overview
//!
//! - [`PaintBackend`] - Trait abstracting the painter
//! - [`paint_frame`] - Applies a frame's texture delta and primitives in order
//! - `MockPainter` - Recording implementation (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use lumina_paint::*;
//! use lumina_test_utils::{MockPainter, paint_frame};
//!
//! let mut atlas = TextureAtlas::new([1024, 64]);
//! let screen = Rect::from_min_max(vec2(0.0, 0.0), vec2(100.0, 100.0));
//! let shapes = vec![ClippedShape::new(screen, Shape::rect_filled(screen, 0.0, Color32::RED))];
//! let primitives = tessellate_shapes(1.0, Default::default(), atlas.size(), atlas.prepared_discs(), shapes);
//!
//! let mut textures_delta = TexturesDelta::default();
//! if let Some(delta) = atlas.take_delta() {
//!     textures_delta.set.push((TextureId::default(), delta));
//! }
//!
//! let painter = MockPainter::new();
//! paint_frame(&painter, &textures_delta, &primitives);
//!
//! assert_eq!(painter.count_texture_sets(), 1);
//! assert_eq!(painter.count_paints(), 1);
//! assert_eq!(painter.count_draws_with_missing_texture(), 0);
//! # }
//! ```
//!
//! # Design
//!
//! The trait takes `&self` and is object-safe (`dyn PaintBackend`), so a
//! mock can be shared between the code under test and the assertions.
//! Implementations use interior mutability to record what they are asked to
//! do.

#[cfg(feature = "mock")]
pub mod mock_painter;
pub mod painter;

#[cfg(feature = "mock")]
pub use mock_painter::*;
pub use painter::*;
