//! Mock implementation of PaintBackend for testing.
//!
//! This module provides a painter that records what it is asked to do and
//! keeps CPU copies of the textures instead of talking to a GPU.

use ahash::AHashMap as HashMap;
use lumina_paint::{
    ClippedPrimitive, ColorImage, ImageData, ImageDelta, Primitive, TextureId,
};
use parking_lot::Mutex;

use crate::painter::PaintBackend;

/// Records a painter call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCall {
    SetTexture {
        id: TextureId,
        size: [usize; 2],
        pos: Option<[usize; 2]>,
    },
    FreeTexture {
        id: TextureId,
    },
    PaintPrimitives {
        num_meshes: usize,
        num_callbacks: usize,
        num_vertices: usize,
        num_indices: usize,
        /// Meshes referencing a texture that was never set (or already freed).
        missing_textures: usize,
    },
}

/// Mock implementation of PaintBackend for testing.
///
/// # Interior Mutability
///
/// [`PaintBackend`] methods take `&self` but the mock must record calls and
/// update its textures, so the state lives behind `parking_lot::Mutex`es.
/// A `Mutex` (unlike `RefCell`) keeps the mock `Send + Sync` as the trait
/// requires.
///
/// # Example
///
/// ```rust
/// use lumina_paint::{ColorImage, Color32, ImageDelta, TextureId, TextureOptions};
/// use lumina_test_utils::{MockPainter, PaintBackend};
///
/// let painter = MockPainter::new();
/// let image = ColorImage::new([4, 4], Color32::RED);
/// painter.set_texture(TextureId::User(1), &ImageDelta::full(image, TextureOptions::LINEAR));
///
/// assert_eq!(painter.count_texture_sets(), 1);
/// assert_eq!(painter.texture(TextureId::User(1)).map(|image| image.size), Some([4, 4]));
/// ```
pub struct MockPainter {
    /// Recorded calls for verification
    calls: Mutex<Vec<PaintCall>>,
    /// CPU copies of the live textures
    textures: Mutex<HashMap<TextureId, ColorImage>>,
}

impl MockPainter {
    /// Create a new mock painter with no textures.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            textures: Mutex::new(HashMap::default()),
        }
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<PaintCall> {
        self.calls.lock().clone()
    }

    /// Count texture uploads, whole or partial.
    pub fn count_texture_sets(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, PaintCall::SetTexture { .. }))
            .count()
    }

    /// Count partial texture uploads.
    pub fn count_partial_texture_sets(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, PaintCall::SetTexture { pos: Some(_), .. }))
            .count()
    }

    /// Count texture frees.
    pub fn count_texture_frees(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, PaintCall::FreeTexture { .. }))
            .count()
    }

    /// Count paint calls.
    pub fn count_paints(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, PaintCall::PaintPrimitives { .. }))
            .count()
    }

    /// Total meshes drawn over all paint calls.
    pub fn count_meshes(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .map(|call| match call {
                PaintCall::PaintPrimitives { num_meshes, .. } => *num_meshes,
                _ => 0,
            })
            .sum()
    }

    /// Total meshes drawn with a texture the painter did not have.
    pub fn count_draws_with_missing_texture(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .map(|call| match call {
                PaintCall::PaintPrimitives {
                    missing_textures, ..
                } => *missing_textures,
                _ => 0,
            })
            .sum()
    }

    /// The current CPU copy of a texture.
    pub fn texture(&self, id: TextureId) -> Option<ColorImage> {
        self.textures.lock().get(&id).cloned()
    }

    /// Number of live textures.
    pub fn num_textures(&self) -> usize {
        self.textures.lock().len()
    }

    /// Clear recorded calls (useful between test steps).
    ///
    /// Textures are kept, like a real backend keeps them between frames.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockPainter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_color_image(image: &ImageData) -> ColorImage {
    match image {
        ImageData::Color(image) => (**image).clone(),
        ImageData::Font(image) => image.to_color_image(None),
    }
}

impl PaintBackend for MockPainter {
    fn set_texture(&self, id: TextureId, delta: &ImageDelta) {
        let patch = to_color_image(&delta.image);

        self.calls.lock().push(PaintCall::SetTexture {
            id,
            size: patch.size,
            pos: delta.pos,
        });

        let mut textures = self.textures.lock();
        match delta.pos {
            None => {
                textures.insert(id, patch);
            }
            Some([x, y]) => {
                let Some(texture) = textures.get_mut(&id) else {
                    tracing::warn!("Partial update of unknown texture {id:?}");
                    return;
                };
                let [w, h] = patch.size;
                if x + w > texture.width() || y + h > texture.height() {
                    tracing::warn!(
                        "Partial update of {id:?} at {:?} does not fit in {:?}",
                        [x, y],
                        texture.size
                    );
                    return;
                }
                for row in 0..h {
                    let src = row * w;
                    let dst = (y + row) * texture.width() + x;
                    texture.pixels[dst..dst + w].copy_from_slice(&patch.pixels[src..src + w]);
                }
            }
        }
    }

    fn free_texture(&self, id: TextureId) {
        self.calls.lock().push(PaintCall::FreeTexture { id });
        self.textures.lock().remove(&id);
    }

    fn paint_primitives(&self, primitives: &[ClippedPrimitive]) {
        let textures = self.textures.lock();

        let mut num_meshes = 0;
        let mut num_callbacks = 0;
        let mut num_vertices = 0;
        let mut num_indices = 0;
        let mut missing_textures = 0;

        for clipped_primitive in primitives {
            match &clipped_primitive.primitive {
                Primitive::Mesh(mesh) => {
                    num_meshes += 1;
                    num_vertices += mesh.vertices.len();
                    num_indices += mesh.indices.len();
                    if !textures.contains_key(&mesh.texture_id) {
                        missing_textures += 1;
                    }
                }
                Primitive::Callback(_) => num_callbacks += 1,
            }
        }

        self.calls.lock().push(PaintCall::PaintPrimitives {
            num_meshes,
            num_callbacks,
            num_vertices,
            num_indices,
            missing_textures,
        });
    }
}
