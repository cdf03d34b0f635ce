//! Benchmarks for the beadalize pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use beadalize::{Colour, Palette, Pattern, Placement, Platform, Raster};

/// A smooth gradient so palette lookups vary from bead to bead.
fn gradient(width: usize, height: usize) -> Raster {
    let mut pixels = Vec::with_capacity(width * height);
    for i in 0..height {
        for j in 0..width {
            pixels.push(Colour::new(
                j as f32 / width as f32,
                i as f32 / height as f32,
                0.5,
            ));
        }
    }
    Raster::new(width, height, pixels).unwrap()
}

// -- Geometry benchmarks --

fn bench_platform(c: &mut Criterion) {
    let mut group = c.benchmark_group("platform");

    let small = Platform::hexagon(5.0, 16).unwrap();
    let large = Platform::hexagon(5.0, 64).unwrap();

    group.bench_function("hexagon_16", |b| b.iter(|| black_box(&small).coordinates()));
    group.bench_function("hexagon_64", |b| b.iter(|| black_box(&large).coordinates()));

    group.finish();
}

// -- Palette benchmarks --

fn bench_palette(c: &mut Criterion) {
    let mut group = c.benchmark_group("palette");

    let hama = Palette::hama();
    let query = Colour::new(0.3, 0.6, 0.2);

    group.bench_function("nearest_hama", |b| {
        b.iter(|| hama.nearest(black_box(query)).unwrap())
    });

    group.finish();
}

// -- Sampling benchmarks --

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    let raster = gradient(256, 256);
    let platform = Platform::hexagon(5.0, 32).unwrap();

    group.bench_function("hexagon_32_raw", |b| {
        b.iter(|| {
            let mut pattern = Pattern::new(platform, None);
            pattern
                .colours_from_raster(black_box(&raster), Placement::default())
                .unwrap();
            pattern
        })
    });

    group.bench_function("hexagon_32_hama", |b| {
        b.iter(|| {
            let mut pattern = Pattern::new(platform, Some(Palette::hama().clone()));
            pattern
                .colours_from_raster(black_box(&raster), Placement::default())
                .unwrap();
            pattern
        })
    });

    let rotated = Placement {
        scale: 1.4,
        rotation: 14.0,
        ..Placement::default()
    };
    group.bench_function("hexagon_32_rotated", |b| {
        b.iter(|| {
            let mut pattern = Pattern::new(platform, Some(Palette::hama().clone()));
            pattern.colours_from_raster(black_box(&raster), rotated).unwrap();
            pattern
        })
    });

    group.finish();
}

criterion_group!(benches, bench_platform, bench_palette, bench_sampling);
criterion_main!(benches);
