//! Benchmarks for shape tessellation

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lumina_paint::{
    ClippedShape, Color32, CubicBezierShape, Mesh, Path, Rect, Shape, Stroke, TessellationOptions,
    TextureAtlas, Tessellator, tessellate_shapes, vec2,
};

fn screen() -> Rect {
    Rect::from_min_max(vec2(0.0, 0.0), vec2(1920.0, 1080.0))
}

fn circles(count: usize, radius: f32) -> Vec<ClippedShape> {
    (0..count)
        .map(|i| {
            let center = vec2((i % 64) as f32 * 30.0, (i / 64) as f32 * 30.0);
            ClippedShape::new(screen(), Shape::circle_filled(center, radius, Color32::RED))
        })
        .collect()
}

fn bench_circles(c: &mut Criterion) {
    let mut group = c.benchmark_group("circles");
    let atlas = TextureAtlas::new([1024, 64]);

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("small", count), &count, |b, &count| {
            let shapes = circles(count, 2.0);
            b.iter(|| {
                black_box(tessellate_shapes(
                    1.0,
                    TessellationOptions::default(),
                    atlas.size(),
                    atlas.prepared_discs(),
                    shapes.clone(),
                ))
            });
        });

        group.bench_with_input(BenchmarkId::new("large", count), &count, |b, &count| {
            let shapes = circles(count, 12.0);
            b.iter(|| {
                black_box(tessellate_shapes(
                    1.0,
                    TessellationOptions::default(),
                    atlas.size(),
                    atlas.prepared_discs(),
                    shapes.clone(),
                ))
            });
        });
    }

    group.finish();
}

fn bench_rects(c: &mut Criterion) {
    let mut group = c.benchmark_group("rects");

    let rects: Vec<ClippedShape> = (0..1_000)
        .map(|i| {
            let min = vec2((i % 40) as f32 * 48.0, (i / 40) as f32 * 40.0);
            let rect = Rect::from_min_size(min, vec2(40.0, 32.0));
            ClippedShape::new(
                screen(),
                Shape::rect_filled(rect, 4.0, Color32::DARK_GRAY),
            )
        })
        .collect();

    group.throughput(Throughput::Elements(rects.len() as u64));
    for feathering in [true, false] {
        let options = TessellationOptions::default().with_feathering(feathering);
        group.bench_function(BenchmarkId::new("rounded", feathering), |b| {
            b.iter(|| black_box(tessellate_shapes(1.0, options, [1024, 64], vec![], rects.clone())));
        });
    }

    group.finish();
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");

    for points in [16, 256, 4_096] {
        let line: Vec<_> = (0..points)
            .map(|i| {
                let x = i as f32 / points as f32 * 1900.0;
                vec2(x, 540.0 + 300.0 * (x * 0.01).sin())
            })
            .collect();

        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::new("stroke_open", points), &line, |b, line| {
            let mut path = Path::default();
            let mut mesh = Mesh::default();
            b.iter(|| {
                path.clear();
                mesh.clear();
                path.add_open_points(line);
                path.stroke_open(1.0, Stroke::new(2.0, Color32::WHITE), &mut mesh);
                black_box(mesh.vertices.len())
            });
        });
    }

    group.finish();
}

fn bench_bezier(c: &mut Criterion) {
    let mut group = c.benchmark_group("bezier");

    let curve = CubicBezierShape::from_points_stroke(
        [vec2(10.0, 500.0), vec2(400.0, -200.0), vec2(800.0, 1200.0), vec2(1200.0, 500.0)],
        false,
        Color32::TRANSPARENT,
        (2.0, Color32::WHITE),
    );

    for tolerance in [1.0, 0.1, 0.01] {
        let options = TessellationOptions::default().with_bezier_tolerance(tolerance);
        group.bench_with_input(BenchmarkId::new("cubic", tolerance), &options, |b, options| {
            let mut tessellator = Tessellator::new(1.0, *options, [1024, 64], vec![]);
            let mut mesh = Mesh::default();
            b.iter(|| {
                mesh.clear();
                tessellator.tessellate_cubic_bezier(&curve, &mut mesh);
                black_box(mesh.vertices.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_circles, bench_rects, bench_paths, bench_bezier);
criterion_main!(benches);
