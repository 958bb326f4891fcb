//! Benchmarks for the fx crates.
//!
//! Run with: `cargo bench -p fx-bench`

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use fx_core::{Bgra, TiledRegion};
use fx_curve::{apply_split_tone, generate, SplitToneGenerator};
use fx_effects::{BitmapImageSource, CpuRenderer, EffectNode, GrayscaleEffect, RenderBackend};

fn ramp(width: u32, height: u32) -> Vec<Bgra> {
    (0..width * height)
        .map(|i| {
            let v = (i % 256) as u8;
            Bgra::opaque(v, v.wrapping_mul(3), 255 - v)
        })
        .collect()
}

/// Split-tone table generation.
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_tone");

    group.bench_function("generate", |b| {
        b.iter(|| generate(black_box(30), black_box(80), black_box(210), black_box(60)))
    });

    let generator = SplitToneGenerator::new();
    group.bench_function("generate_reused", |b| {
        b.iter(|| generator.generate(black_box(30), black_box(80), black_box(210), black_box(60)))
    });

    let table = generate(30, 80, 210, 60);
    for size in [256u32, 1024] {
        let pixels = ramp(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("apply", size), &pixels, |b, px| {
            b.iter(|| px.iter().map(|&p| apply_split_tone(black_box(p), &table)).collect::<Vec<_>>())
        });
    }

    group.finish();
}

/// Grayscale CPU worker over a whole image.
fn bench_grayscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("grayscale");

    for size in [256u32, 1024, 2048] {
        let effect = GrayscaleEffect::new();
        let mut worker = match effect.create_worker(RenderBackend::Cpu).and_then(|w| w.into_cpu()) {
            Some(w) => w,
            None => continue,
        };
        let bytes = size * size * 4;
        worker.prepare(bytes, bytes).unwrap();
        worker.source_pixels_mut().copy_from_slice(&ramp(size, size));
        let region = TiledRegion::new(0, size, size, size);

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::new("serial", size), |b| {
            b.iter(|| worker.process(black_box(region)).unwrap())
        });
        group.bench_function(BenchmarkId::new("parallel", size), |b| {
            b.iter(|| worker.process_parallel(black_box(region), 64).unwrap())
        });
    }

    group.finish();
}

/// Full render through a two-node chain.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let size = 1024u32;

    let inner = Arc::new(GrayscaleEffect::new());
    inner.set_source(Some(Arc::new(BitmapImageSource::new(ramp(size, size), size, size).unwrap())));
    let outer = GrayscaleEffect::new();
    outer.set_source(Some(inner));

    group.throughput(Throughput::Elements((size * size) as u64));
    group.bench_function("chain_whole", |b| b.iter(|| CpuRenderer::new().render(black_box(&outer)).unwrap()));
    group.bench_function("chain_banded", |b| {
        b.iter(|| CpuRenderer::new().with_band_rows(64).parallel(true).render(black_box(&outer)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_grayscale, bench_render);
criterion_main!(benches);
