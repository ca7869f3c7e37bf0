//! Criterion benchmarks for table geometry synthesis and UV projection.
//!
//! Run with: cargo bench -p table

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use table::config::TableParams;
use table::geometry::{mesh_positions, synthesize_footer, synthesize_top, synthesize_trunk};
use table::parts::TopShape;
use table::uv::{compute_uvs, UvProjection};

fn bench_tops(c: &mut Criterion) {
    let params = TableParams::default();
    let mut group = c.benchmark_group("synthesize_top");
    for shape in TopShape::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(shape.name()), &shape, |b, &shape| {
            b.iter(|| synthesize_top(black_box(shape), black_box(&params)))
        });
    }
    group.finish();
}

fn bench_base(c: &mut Criterion) {
    let params = TableParams::default();
    c.bench_function("synthesize_trunk", |b| {
        b.iter(|| synthesize_trunk(black_box(&params)))
    });
    c.bench_function("synthesize_footer", |b| {
        b.iter(|| synthesize_footer(black_box(&params)))
    });
}

fn bench_projection(c: &mut Criterion) {
    let mesh = synthesize_top(TopShape::Circle, &TableParams::default());
    let positions = mesh_positions(&mesh).map(<[_]>::to_vec).unwrap_or_default();

    let mut group = c.benchmark_group("compute_uvs");
    for (label, projection) in [
        ("planar", UvProjection::planar()),
        ("polar", UvProjection::polar()),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| compute_uvs(black_box(&positions), projection))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tops, bench_base, bench_projection);
criterion_main!(benches);
