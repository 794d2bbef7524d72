//! Lumina Core
//!
//! Shared building blocks for the lumina crates: logging and profiling setup,
//! `glam`-based math helpers and the [`geometry::Rect`] type used for clip and
//! bounding rectangles.

pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
