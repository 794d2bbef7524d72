//! Trait abstracting the painter backend.
//!
//! A backend owns the GPU textures and draws [`ClippedPrimitive`]s. The
//! tessellator never talks to it directly; the frame driver forwards the
//! texture delta and primitives with [`paint_frame`].

use lumina_paint::{ClippedPrimitive, ImageDelta, TextureId, TexturesDelta};

/// What a frame's output is handed to.
///
/// # Ordering
///
/// Within a frame, textures are set before painting and freed after it, so a
/// texture freed this frame can still be drawn this frame. [`paint_frame`]
/// applies that order.
pub trait PaintBackend: Send + Sync {
    /// Create a texture, replace it entirely, or patch a region of it.
    ///
    /// A patch ([`ImageDelta::pos`] is `Some`) always targets a texture that
    /// was set in full earlier.
    fn set_texture(&self, id: TextureId, delta: &ImageDelta);

    /// Release a texture.
    fn free_texture(&self, id: TextureId);

    /// Draw the primitives in order, back to front.
    fn paint_primitives(&self, primitives: &[ClippedPrimitive]);
}

/// Hand one frame to `backend`: upload, paint, then free.
pub fn paint_frame(
    backend: &dyn PaintBackend,
    textures_delta: &TexturesDelta,
    primitives: &[ClippedPrimitive],
) {
    for (id, image_delta) in &textures_delta.set {
        backend.set_texture(*id, image_delta);
    }

    backend.paint_primitives(primitives);

    for id in &textures_delta.free {
        backend.free_texture(*id);
    }
}
