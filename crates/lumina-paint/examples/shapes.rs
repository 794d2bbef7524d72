//! Shapes Example - Tessellate a frame of shapes and report the output
//!
//! This example demonstrates:
//! - Building the coverage atlas and its pre-rasterized discs
//! - Mixing rects, circles, curves, shadows and text in one frame
//! - Clip rects splitting the output into several draw calls
//!
//! Run with `RUST_LOG=lumina_paint=trace` to see the tessellator's own logs.

use std::sync::Arc;

use lumina_core::logging;
use lumina_core::profiling::{ProfilingBackend, init_profiling, new_frame, profile_scope};
use lumina_paint::{
    ClippedShape, Color32, CubicBezierShape, GlyphRow, GlyphRun, Mesh, Primitive, Rect, Shadow,
    Shape, TessellationOptions, TextShape, TextureAtlas, TexturesDelta, TextureId,
    tessellate_shapes, vec2,
};

fn build_frame(atlas: &mut TextureAtlas) -> Vec<ClippedShape> {
    let screen = Rect::from_min_max(vec2(0.0, 0.0), vec2(800.0, 600.0));
    let panel = Rect::from_min_max(vec2(40.0, 40.0), vec2(380.0, 560.0));

    let shadow = Shadow {
        offset: vec2(4.0, 6.0),
        blur: 16.0,
        spread: 2.0,
        color: Color32::from_black_alpha(96),
    };

    let mut shapes = vec![
        ClippedShape::new(screen, Shape::rect_filled(screen, 0.0, Color32::from_gray(24))),
        ClippedShape::new(screen, shadow.as_shape(panel, 8.0)),
        ClippedShape::new(screen, Shape::rect_filled(panel, 8.0, Color32::DARK_GRAY)),
    ];

    // Scatter plot markers, small enough for the disc atlas.
    for i in 0..200 {
        let t = i as f32 / 200.0;
        let center = vec2(60.0 + 300.0 * t, 300.0 - 200.0 * (t * 6.0).sin() * (1.0 - t));
        shapes.push(ClippedShape::new(panel, Shape::circle_filled(center, 2.5, Color32::LIGHT_BLUE)));
    }

    shapes.push(ClippedShape::new(
        screen,
        CubicBezierShape::from_points_stroke(
            [vec2(420.0, 500.0), vec2(500.0, 100.0), vec2(680.0, 600.0), vec2(760.0, 80.0)],
            false,
            Color32::TRANSPARENT,
            (2.0, Color32::YELLOW),
        ),
    ));

    // A fake glyph: a block of coverage in the atlas, drawn as one row.
    let ((x, y), image) = atlas.allocate((6, 10));
    for dx in 0..6 {
        for dy in 0..10 {
            image[(x + dx, y + dy)] = 1.0;
        }
    }
    let mut glyph = Mesh::default();
    glyph.add_rect_with_uv(
        Rect::from_min_size(vec2(0.0, 0.0), vec2(6.0, 10.0)),
        Rect::from_min_size(vec2(x as f32, y as f32), vec2(6.0, 10.0)),
        Color32::WHITE,
    );
    let glyphs = Arc::new(GlyphRun::from_rows(vec![GlyphRow::from_mesh(glyph)]));
    shapes.push(ClippedShape::new(
        screen,
        TextShape::new(vec2(420.0, 40.0), glyphs).with_underline((1.0, Color32::WHITE).into()),
    ));

    shapes
}

fn main() {
    logging::init();
    init_profiling(ProfilingBackend::InProcess);

    let mut atlas = TextureAtlas::new([1024, 64]);
    let shapes = build_frame(&mut atlas);

    let mut textures_delta = TexturesDelta::default();
    if let Some(delta) = atlas.take_delta() {
        textures_delta.set.push((TextureId::default(), delta));
    }
    tracing::info!("Texture uploads: {textures_delta:?}");

    let primitives = {
        profile_scope!("frame");
        tessellate_shapes(
            1.5,
            TessellationOptions::default(),
            atlas.size(),
            atlas.prepared_discs(),
            shapes,
        )
    };
    new_frame();

    for (i, clipped) in primitives.iter().enumerate() {
        match &clipped.primitive {
            Primitive::Mesh(mesh) => tracing::info!(
                "#{i}: mesh with {} vertices, {} triangles, texture {:?}, clip {:?}",
                mesh.vertices.len(),
                mesh.indices.len() / 3,
                mesh.texture_id,
                clipped.clip_rect,
            ),
            Primitive::Callback(callback) => {
                tracing::info!("#{i}: callback at {:?}", callback.rect);
            }
        }
    }

    tracing::info!(
        "Atlas {}x{} is {:.1}% full",
        atlas.size()[0],
        atlas.size()[1],
        atlas.fill_ratio() * 100.0
    );
}
