//! Frames driven end to end through a recording painter.

use lumina_paint::{
    ClippedShape, Color32, ColorImage, ImageData, ImageDelta, Rect, RectShape, Shape,
    TessellationOptions, TextureAtlas, TextureId, TextureManager, TextureOptions,
    tessellate_shapes, vec2,
};
use lumina_test_utils::{MockPainter, PaintCall, paint_frame};

fn screen() -> Rect {
    Rect::from_min_max(vec2(0.0, 0.0), vec2(320.0, 240.0))
}

/// Owns the atlas and textures the way an integration would.
struct Frame {
    atlas: TextureAtlas,
    textures: TextureManager,
}

impl Frame {
    fn new() -> Self {
        let mut atlas = TextureAtlas::new([1024, 64]);
        let mut textures = TextureManager::default();
        let image = atlas.image().clone();
        let font_id = textures.alloc("font".to_owned(), image.into(), TextureAtlas::texture_options());
        assert_eq!(font_id, TextureId::default());
        // The allocation above already uploads the whole atlas.
        let _ = atlas.take_delta();
        Self { atlas, textures }
    }

    fn run(&mut self, painter: &MockPainter, shapes: Vec<ClippedShape>) {
        if let Some(delta) = self.atlas.take_delta() {
            self.textures.set(TextureId::default(), delta);
        }
        let primitives = tessellate_shapes(
            1.0,
            TessellationOptions::default(),
            self.atlas.size(),
            self.atlas.prepared_discs(),
            shapes,
        );
        paint_frame(painter, &self.textures.take_delta(), &primitives);
    }
}

#[test]
fn test_first_frame_uploads_atlas_then_paints() {
    let painter = MockPainter::new();
    let mut frame = Frame::new();

    frame.run(
        &painter,
        vec![ClippedShape::new(screen(), Shape::rect_filled(screen().shrink(10.0), 4.0, Color32::GRAY))],
    );

    let calls = painter.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        calls[0],
        PaintCall::SetTexture {
            id: TextureId::Managed(0),
            pos: None,
            ..
        }
    ));
    assert!(matches!(calls[1], PaintCall::PaintPrimitives { num_meshes: 1, .. }));
    assert_eq!(painter.count_draws_with_missing_texture(), 0);

    let atlas = painter.texture(TextureId::default()).expect("atlas uploaded");
    assert_eq!(atlas.size, frame.atlas.size());
    assert_eq!(atlas[(0, 0)], Color32::WHITE);
}

#[test]
fn test_new_glyphs_upload_only_the_patch() {
    let painter = MockPainter::new();
    let mut frame = Frame::new();
    frame.run(&painter, vec![]);
    painter.clear_calls();

    let ((x, y), image) = frame.atlas.allocate((4, 4));
    for dx in 0..4 {
        for dy in 0..4 {
            image[(x + dx, y + dy)] = 1.0;
        }
    }
    frame.run(&painter, vec![]);

    assert_eq!(painter.count_partial_texture_sets(), 1);
    assert_eq!(painter.calls()[0], PaintCall::SetTexture {
        id: TextureId::default(),
        size: [4, 4],
        pos: Some([x, y]),
    });
    let atlas = painter.texture(TextureId::default()).expect("atlas uploaded");
    assert_eq!(atlas[(x + 3, y + 3)], Color32::WHITE);
}

#[test]
fn test_image_textures_are_freed_after_painting() {
    let painter = MockPainter::new();
    let mut frame = Frame::new();

    let image = ColorImage::new([8, 8], Color32::BLUE);
    let image_id = frame.textures.alloc("photo".to_owned(), image.into(), TextureOptions::NEAREST);
    assert_eq!(image_id, TextureId::Managed(1));

    let photo = Shape::image(
        image_id,
        Rect::from_min_max(vec2(10.0, 10.0), vec2(42.0, 42.0)),
        Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0)),
        Color32::WHITE,
    );
    let background = Shape::rect_filled(screen(), 0.0, Color32::BLACK);

    frame.textures.free(image_id);
    frame.run(
        &painter,
        vec![ClippedShape::new(screen(), background), ClippedShape::new(screen(), photo)],
    );

    // Atlas and photo are uploaded, both meshes drawn, then the photo freed.
    let calls = painter.calls();
    assert_eq!(painter.count_texture_sets(), 2);
    assert_eq!(painter.count_meshes(), 2);
    assert_eq!(painter.count_draws_with_missing_texture(), 0);
    assert_eq!(calls.last(), Some(&PaintCall::FreeTexture { id: image_id }));
    assert_eq!(painter.num_textures(), 1);
}

#[test]
fn test_textured_rect_with_outline_draws_both() {
    let painter = MockPainter::new();
    let mut frame = Frame::new();

    let image_id = frame.textures.alloc(
        "icon".to_owned(),
        ColorImage::new([2, 2], Color32::RED).into(),
        TextureOptions::LINEAR,
    );
    let icon = RectShape::new(
        Rect::from_min_max(vec2(10.0, 10.0), vec2(42.0, 42.0)),
        2.0,
        Color32::WHITE,
        (1.0, Color32::BLACK),
    )
    .with_texture(image_id, Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0)));

    frame.run(&painter, vec![ClippedShape::new(screen(), icon)]);

    assert_eq!(painter.count_meshes(), 2);
    assert_eq!(painter.count_draws_with_missing_texture(), 0);
}

#[test]
fn test_unknown_textures_are_flagged() {
    let painter = MockPainter::new();
    let mut frame = Frame::new();

    let image = Shape::image(
        TextureId::User(42),
        Rect::from_min_max(vec2(10.0, 10.0), vec2(42.0, 42.0)),
        Rect::from_min_max(vec2(0.0, 0.0), vec2(1.0, 1.0)),
        Color32::WHITE,
    );
    frame.run(&painter, vec![ClippedShape::new(screen(), image)]);

    assert_eq!(painter.count_draws_with_missing_texture(), 1);
}

#[test]
fn test_whole_update_replaces_queued_patches() {
    let mut textures = TextureManager::default();
    let id = textures.alloc(
        "canvas".to_owned(),
        ImageData::from(ColorImage::new([4, 4], Color32::BLACK)),
        TextureOptions::LINEAR,
    );
    textures.set(
        id,
        ImageDelta::partial([0, 0], ColorImage::new([2, 2], Color32::WHITE), TextureOptions::LINEAR),
    );
    textures.set(
        id,
        ImageDelta::full(ColorImage::new([8, 8], Color32::RED), TextureOptions::LINEAR),
    );

    let delta = textures.take_delta();
    assert_eq!(delta.set.len(), 1);

    let painter = MockPainter::new();
    paint_frame(&painter, &delta, &[]);
    let canvas = painter.texture(id).expect("texture uploaded");
    assert_eq!(canvas.size, [8, 8]);
    assert_eq!(canvas[(7, 7)], Color32::RED);
}
