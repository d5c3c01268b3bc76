//! Renderer setup benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench setup
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench setup -- shader

use bones::{ShaderProgram, Variant};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

fn bench_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload");
    for variant in Variant::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(variant), &variant, |b, v| {
            b.iter(|| v.payload());
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Shader validation
// ---------------------------------------------------------------------------

fn bench_shader(c: &mut Criterion) {
    let mut group = c.benchmark_group("shader");
    for variant in [Variant::ShaderTriangle, Variant::Cube, Variant::ArgumentTriangle] {
        let source = variant.builtin_shader();
        group.bench_with_input(BenchmarkId::from_parameter(variant), &source, |b, s| {
            b.iter(|| ShaderProgram::load(s).expect("builtin shader"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_payload, bench_shader);
criterion_main!(benches);
