//! Coverage atlas shared by glyphs and pre-rasterized discs.
//!
//! Space is handed out row by row from the top-left corner. The atlas never
//! frees individual allocations; when it runs out of room it starts
//! overwriting itself and reports [`TextureAtlas::has_overflowed`] so the
//! owner can build a fresh one.

use std::ops::Range;

use lumina_core::geometry::Rect;
use lumina_core::math::{remap_clamp, vec2};
use lumina_core::profiling::profile_function;

use crate::{FontImage, ImageDelta, TextureOptions};

/// Gap left between neighbouring allocations so linear sampling does not
/// bleed from one into the other.
const PADDING: usize = 1;

/// Discs larger than this are tessellated instead.
pub const LARGEST_PRERASTERIZED_DISC_RADIUS: f32 = 8.0;

/// Smallest width an atlas may be created with.
pub const MIN_ATLAS_WIDTH: usize = 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Rectu {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Rectu {
    const NOTHING: Self = Self {
        min_x: usize::MAX,
        min_y: usize::MAX,
        max_x: 0,
        max_y: 0,
    };

    const EVERYTHING: Self = Self {
        min_x: 0,
        min_y: 0,
        max_x: usize::MAX,
        max_y: usize::MAX,
    };

    fn extend_with(&mut self, x: Range<usize>, y: Range<usize>) {
        self.min_x = self.min_x.min(x.start);
        self.min_y = self.min_y.min(y.start);
        self.max_x = self.max_x.max(x.end);
        self.max_y = self.max_y.max(y.end);
    }
}

#[derive(Clone, Copy, Debug)]
struct PrerasterizedDisc {
    r: f32,
    uv: Rectu,
}

/// A pre-rasterized disc that can be drawn as a single textured quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreparedDisc {
    /// Radius of the disc in texels.
    pub r: f32,

    /// Width (and height) of the texel square holding the disc, including
    /// the feathered rim.
    pub w: f32,

    /// Where the square lives in the atlas, normalized to `[0, 1]`.
    pub uv: Rect,
}

/// A single-channel texture atlas.
///
/// The first allocation is always a fully covered 1×1 texel at (0, 0). Any
/// vertex with [`crate::WHITE_UV`] samples it, which lets untextured fills
/// share a draw call with glyphs.
#[derive(Clone)]
pub struct TextureAtlas {
    image: FontImage,

    /// What part of the image has changed since the last [`Self::take_delta`].
    dirty: Rectu,

    /// Where the next allocation goes.
    cursor: (usize, usize),

    /// Height of the tallest allocation in the current row.
    row_height: usize,

    /// Set when the atlas ran out of space and started reusing it.
    overflowed: bool,

    discs: Vec<PrerasterizedDisc>,
}

impl TextureAtlas {
    /// Create an atlas of the given initial size.
    ///
    /// The width is fixed for the lifetime of the atlas and must be at least
    /// [`MIN_ATLAS_WIDTH`]; the height doubles on demand up to the width.
    pub fn new(size: [usize; 2]) -> Self {
        assert!(
            size[0] >= MIN_ATLAS_WIDTH,
            "Tiny texture atlas (width {}, need at least {MIN_ATLAS_WIDTH})",
            size[0]
        );
        let size = [size[0], size[1].clamp(1, size[0])];

        let mut atlas = Self {
            image: FontImage::new(size),
            dirty: Rectu::EVERYTHING,
            cursor: (0, 0),
            row_height: 0,
            overflowed: false,
            discs: vec![],
        };

        let ((x, y), image) = atlas.allocate((1, 1));
        debug_assert_eq!((x, y), (0, 0));
        image[(x, y)] = 1.0;

        for i in 0.. {
            let r = 2.0_f32.powf(i as f32 / 2.0 - 1.0);
            if r > LARGEST_PRERASTERIZED_DISC_RADIUS {
                break;
            }
            atlas.rasterize_disc(r);
        }

        atlas
    }

    fn rasterize_disc(&mut self, r: f32) {
        let hw = (r + 0.5).ceil() as i32;
        let w = (2 * hw + 1) as usize;
        let ((x, y), image) = self.allocate((w, w));
        for dx in -hw..=hw {
            for dy in -hw..=hw {
                let distance_to_center = ((dx * dx + dy * dy) as f32).sqrt();
                let coverage = remap_clamp(distance_to_center, (r - 0.5)..=(r + 0.5), 1.0..=0.0);
                image[((x as i32 + hw + dx) as usize, (y as i32 + hw + dy) as usize)] = coverage;
            }
        }
        self.discs.push(PrerasterizedDisc {
            r,
            uv: Rectu {
                min_x: x,
                min_y: y,
                max_x: x + w,
                max_y: y + w,
            },
        });
    }

    #[inline]
    pub fn size(&self) -> [usize; 2] {
        self.image.size
    }

    #[inline]
    pub fn image(&self) -> &FontImage {
        &self.image
    }

    /// How the atlas should be sampled.
    #[inline]
    pub fn texture_options() -> TextureOptions {
        TextureOptions::LINEAR
    }

    /// The disc catalog, smallest first, with UVs for the current size.
    ///
    /// Recompute this whenever the atlas has grown, since the normalized
    /// coordinates change with the height.
    pub fn prepared_discs(&self) -> Vec<PreparedDisc> {
        let [width, height] = self.size();
        let inv_w = 1.0 / width as f32;
        let inv_h = 1.0 / height as f32;
        self.discs
            .iter()
            .map(|disc| {
                let r = disc.r;
                let Rectu {
                    min_x,
                    min_y,
                    max_x,
                    max_y,
                } = disc.uv;
                let w = max_x - min_x;
                let uv = Rect::from_min_max(
                    vec2(min_x as f32 * inv_w, min_y as f32 * inv_h),
                    vec2(max_x as f32 * inv_w, max_y as f32 * inv_h),
                );
                PreparedDisc { r, w: w as f32, uv }
            })
            .collect()
    }

    fn max_height(&self) -> usize {
        self.image.width()
    }

    /// Fraction of the atlas used so far, in `[0, 1]` unless overflowed.
    pub fn fill_ratio(&self) -> f32 {
        if self.overflowed {
            1.0
        } else {
            (self.cursor.1 + self.row_height) as f32 / self.max_height() as f32
        }
    }

    /// The atlas ran out of space and has started overwriting old
    /// allocations. Build a new one before the next frame.
    #[inline]
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Call to get the change to the image since the last call.
    pub fn take_delta(&mut self) -> Option<ImageDelta> {
        let texture_options = Self::texture_options();

        let dirty = std::mem::replace(&mut self.dirty, Rectu::NOTHING);
        if dirty == Rectu::NOTHING {
            None
        } else if dirty == Rectu::EVERYTHING {
            Some(ImageDelta::full(self.image.clone(), texture_options))
        } else {
            let pos = [dirty.min_x, dirty.min_y];
            let size = [dirty.max_x - dirty.min_x, dirty.max_y - dirty.min_y];
            let region = self.image.region(pos, size);
            Some(ImageDelta::partial(pos, region, texture_options))
        }
    }

    /// Reserve a `w × h` block and return its top-left corner together with
    /// the image so the caller can write coverage into it.
    ///
    /// The returned block is zeroed only if this is its first use.
    pub fn allocate(&mut self, (w, h): (usize, usize)) -> ((usize, usize), &mut FontImage) {
        profile_function!();

        assert!(
            w <= self.image.width(),
            "Tried to allocate a {w} wide region in a {} wide texture atlas",
            self.image.width()
        );
        assert!(
            h <= self.max_height(),
            "Tried to allocate a {h} tall region in a texture atlas at most {} tall",
            self.max_height()
        );

        if self.cursor.0 + w > self.image.width() {
            self.cursor.0 = 0;
            self.cursor.1 += self.row_height + PADDING;
            self.row_height = 0;
        }

        self.row_height = self.row_height.max(h);

        let required_height = self.cursor.1 + self.row_height;
        if required_height > self.max_height() {
            tracing::warn!(
                "Texture atlas overflowed at {}x{}; reusing space until it is rebuilt",
                self.image.width(),
                self.image.height()
            );
            if self.grow_to(self.max_height()) {
                self.dirty = Rectu::EVERYTHING;
            }
            // Skip the top third where the anchor texel and discs live, unless
            // the region would then run off the bottom.
            let restart_y = self.image.height() / 3;
            let restart_y = if restart_y + h <= self.image.height() {
                restart_y
            } else {
                0
            };
            self.cursor = (0, restart_y);
            self.row_height = h;
            self.overflowed = true;
        } else if self.grow_to(required_height) {
            self.dirty = Rectu::EVERYTHING;
        }

        let pos = self.cursor;
        self.cursor.0 += w + PADDING;
        self.dirty.extend_with(pos.0..pos.0 + w, pos.1..pos.1 + h);

        (pos, &mut self.image)
    }

    /// Double the height until `required_height` fits. Returns `true` if the
    /// image was resized.
    fn grow_to(&mut self, required_height: usize) -> bool {
        let old_height = self.image.height();
        if required_height <= old_height {
            return false;
        }

        let mut height = old_height;
        while height < required_height {
            height *= 2;
        }
        let height = height.min(self.max_height());

        self.image.size[1] = height;
        self.image.pixels.resize(self.image.width() * height, 0.0);
        tracing::debug!(
            "Texture atlas grew from {}x{old_height} to {}x{height}",
            self.image.width(),
            self.image.width()
        );
        true
    }
}

impl std::fmt::Debug for TextureAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAtlas")
            .field("size", &self.image.size)
            .field("cursor", &self.cursor)
            .field("row_height", &self.row_height)
            .field("overflowed", &self.overflowed)
            .field("discs", &self.discs.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_texel_is_opaque() {
        let atlas = TextureAtlas::new([1024, 64]);
        assert_eq!(atlas.image()[(0, 0)], 1.0);
    }

    #[test]
    fn test_disc_ladder() {
        let atlas = TextureAtlas::new([1024, 64]);
        let discs = atlas.prepared_discs();
        assert_eq!(discs.len(), 9);
        assert_eq!(discs[0].r, 0.5);
        assert_eq!(discs[8].r, 8.0);
        assert!(discs.windows(2).all(|pair| pair[0].r < pair[1].r));
        for disc in &discs {
            assert!(disc.w >= 2.0 * disc.r + 1.0);
            assert!(disc.uv.min.x >= 0.0 && disc.uv.max.x <= 1.0);
            assert!(disc.uv.min.y >= 0.0 && disc.uv.max.y <= 1.0);
        }
    }

    #[test]
    fn test_disc_coverage_fades_at_rim() {
        let atlas = TextureAtlas::new([1024, 64]);
        let disc = atlas.discs[8];
        let hw = (disc.uv.max_x - disc.uv.min_x) / 2;
        let center = (disc.uv.min_x + hw, disc.uv.min_y + hw);
        assert_eq!(atlas.image()[center], 1.0);
        assert_eq!(atlas.image()[(disc.uv.min_x, disc.uv.min_y)], 0.0);
    }

    #[test]
    fn test_growth_marks_everything_dirty() {
        let mut atlas = TextureAtlas::new([1024, 32]);
        assert!(atlas.take_delta().is_some_and(|delta| delta.is_whole()));
        assert!(atlas.take_delta().is_none());

        atlas.allocate((16, 100));
        assert!(atlas.size()[1] >= 100);
        assert!(atlas.take_delta().is_some_and(|delta| delta.is_whole()));
    }

    #[test]
    fn test_small_allocation_is_partial_delta() {
        let mut atlas = TextureAtlas::new([1024, 64]);
        let _ = atlas.take_delta();

        let ((x, y), _) = atlas.allocate((4, 4));
        let delta = atlas.take_delta().expect("allocation should be dirty");
        assert_eq!(delta.pos, Some([x, y]));
        assert_eq!(delta.image.size(), [4, 4]);
    }

    #[test]
    fn test_overflow_restarts_cursor() {
        let mut atlas = TextureAtlas::new([1024, 64]);
        atlas.allocate((1024, 600));
        assert!(!atlas.has_overflowed());
        assert_eq!(atlas.size()[1], 1024);

        let ((x, y), _) = atlas.allocate((1024, 600));
        assert!(atlas.has_overflowed());
        assert_eq!((x, y), (0, 1024 / 3));
        assert_eq!(atlas.fill_ratio(), 1.0);
    }

    #[test]
    fn test_overflow_region_stays_inside_image() {
        let mut atlas = TextureAtlas::new([1024, 64]);
        atlas.allocate((1024, 700));
        let _ = atlas.take_delta();

        let ((x, y), image) = atlas.allocate((1024, 700));
        let image_height = image.height();
        assert!(atlas.has_overflowed());
        assert_eq!(x, 0);
        assert!(y + 700 <= image_height);

        let delta = atlas.take_delta().expect("overflowed region should be dirty");
        assert!(delta.image.size()[1] <= atlas.size()[1]);
    }

    #[test]
    #[should_panic]
    fn test_too_tall_allocation_panics() {
        let mut atlas = TextureAtlas::new([256, 64]);
        atlas.allocate((4, 512));
    }

    #[test]
    #[should_panic]
    fn test_too_wide_allocation_panics() {
        let mut atlas = TextureAtlas::new([1024, 64]);
        atlas.allocate((2048, 1));
    }
}
