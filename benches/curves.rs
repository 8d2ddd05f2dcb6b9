use criterion::{black_box, criterion_group, criterion_main, Criterion};
use euclid::point2 as point;
use polycurve::bezier::build_bezier;
use polycurve::catmull_rom::{build_catmull_rom, tessellate_segment, SAMPLES_PER_SEGMENT};
use polycurve::curves::{CurveEngine, CurveMode};
use polycurve::geometry_utilities::types::CanvasPoint;
use polycurve::polygon::BasePolygon;
use polycurve::subdivision::{SubdivisionLevels, K_MAX};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_polygon(n: usize) -> BasePolygon {
    let mut rng = StdRng::seed_from_u64(0);
    let points: Vec<CanvasPoint> = (0..n)
        .map(|_| point(rng.gen_range(-4.0..4.0), rng.gen_range(-3.0..3.0)))
        .collect();
    BasePolygon::new(&points).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let default_polygon = BasePolygon::default();
    let large_polygon = random_polygon(200);

    let mut levels = SubdivisionLevels::new();
    let points = default_polygon.points();
    c.bench_function("subdivide_to_max_level", |b| {
        b.iter(|| black_box(levels.refine(&points, K_MAX - 1).len()))
    });

    c.bench_function("build_bezier", |b| b.iter(|| build_bezier(black_box(&large_polygon))));
    c.bench_function("build_catmull_rom", |b| {
        b.iter(|| build_catmull_rom(black_box(&large_polygon)))
    });

    let segment = [point(0.0, 0.0), point(1.0, 3.0), point(4.0, 3.0), point(5.0, 0.0)];
    c.bench_function("tessellate_segment", |b| {
        b.iter(|| tessellate_segment(black_box(&segment), SAMPLES_PER_SEGMENT).count())
    });

    let mut engine = CurveEngine::new();
    c.bench_function("curve_engine_catmull_rom", |b| {
        b.iter(|| engine.build(black_box(&default_polygon), CurveMode::CatmullRom, 0))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
