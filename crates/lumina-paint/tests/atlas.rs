//! Texture atlas and pre-rasterized disc tests.

use lumina_paint::{
    ClippedShape, Color32, ImageData, Rect, Shape, TessellationOptions, TextureAtlas, TextureId,
    tessellate_shapes, vec2,
};

#[derive(Clone, Copy, Debug)]
struct Block {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Block {
    fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

#[test]
fn test_allocations_never_overlap() {
    let mut atlas = TextureAtlas::new([1024, 64]);
    let anchor = Block { x: 0, y: 0, w: 1, h: 1 };

    let mut blocks: Vec<Block> = vec![];
    for i in 0..200 {
        let (w, h) = (5 + i % 37, 3 + i % 23);
        let ((x, y), image) = atlas.allocate((w, h));
        assert!(x + w <= image.width());
        assert!(y + h <= image.height());
        blocks.push(Block { x, y, w, h });
    }

    assert!(!atlas.has_overflowed());
    assert!(atlas.fill_ratio() < 1.0);

    for (i, a) in blocks.iter().enumerate() {
        assert!(!a.overlaps(&anchor), "{a:?} overlaps the anchor texel");
        for b in &blocks[i + 1..] {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn test_atlas_grows_and_reports_full_upload() {
    let mut atlas = TextureAtlas::new([1024, 64]);
    assert!(atlas.take_delta().is_some_and(|delta| delta.is_whole()));

    let _ = atlas.allocate((10, 10));
    let delta = atlas.take_delta().expect("allocation is dirty");
    assert!(!delta.is_whole());
    assert_eq!(delta.image.size(), [10, 10]);

    let _ = atlas.allocate((1000, 100));
    assert!(atlas.size()[1] >= 128);
    let delta = atlas.take_delta().expect("growth is dirty");
    assert!(delta.is_whole());
    assert_eq!(delta.image.size(), atlas.size());

    assert!(atlas.take_delta().is_none());
}

#[test]
fn test_delta_carries_coverage() {
    let mut atlas = TextureAtlas::new([1024, 64]);
    let delta = atlas.take_delta().expect("new atlas is dirty");
    match delta.image {
        ImageData::Font(image) => assert_eq!(image[(0, 0)], 1.0),
        ImageData::Color(_) => panic!("atlas should upload coverage"),
    }
}

#[test]
fn test_small_circle_uses_prerasterized_disc() {
    let atlas = TextureAtlas::new([1024, 64]);
    let screen = Rect::from_min_max(vec2(0.0, 0.0), vec2(100.0, 100.0));
    let shapes = vec![ClippedShape::new(
        screen,
        Shape::circle_filled(vec2(50.0, 50.0), 3.0, Color32::RED),
    )];

    let primitives = tessellate_shapes(
        1.0,
        TessellationOptions::default(),
        atlas.size(),
        atlas.prepared_discs(),
        shapes,
    );

    assert_eq!(primitives.len(), 1);
    let mesh = primitives[0].primitive.mesh().expect("mesh primitive");
    assert_eq!(mesh.texture_id, TextureId::default());
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.indices.len(), 6);
    assert!(mesh.vertices.iter().all(|v| v.color == Color32::RED));

    // The quad samples the atlas away from the anchor texel.
    let discs = atlas.prepared_discs();
    let uv = Rect::from_min_max(mesh.vertices[0].uv, mesh.vertices[3].uv);
    assert!(discs.iter().any(|disc| disc.uv == uv));
}

#[test]
fn test_large_circle_skips_discs() {
    let atlas = TextureAtlas::new([1024, 64]);
    let screen = Rect::from_min_max(vec2(0.0, 0.0), vec2(100.0, 100.0));
    let shapes = vec![ClippedShape::new(
        screen,
        Shape::circle_filled(vec2(50.0, 50.0), 20.0, Color32::RED),
    )];

    let primitives = tessellate_shapes(
        1.0,
        TessellationOptions::default(),
        atlas.size(),
        atlas.prepared_discs(),
        shapes,
    );
    let mesh = primitives[0].primitive.mesh().expect("mesh primitive");
    assert!(mesh.vertices.len() > 4);
}

#[test]
fn test_disc_uvs_follow_atlas_height() {
    let mut atlas = TextureAtlas::new([1024, 64]);
    let before = atlas.prepared_discs();
    let _ = atlas.allocate((1000, 100));
    let after = atlas.prepared_discs();

    assert_eq!(before.len(), after.len());
    for (before, after) in before.iter().zip(&after) {
        assert_eq!(before.r, after.r);
        assert_eq!(before.uv.min.x, after.uv.min.x);
        assert!(after.uv.max.y < before.uv.max.y);
    }
}
