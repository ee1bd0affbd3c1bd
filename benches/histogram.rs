//! Extraction pipeline benchmarks.
//!
//! Synthetic banks keep the benchmarks self-contained; the kernel
//! arithmetic dominates, so their cost profile matches trained tables
//! of the same shape.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bsif_features::{
    bank::{FilterBank, SyntheticBank},
    bsif::BsifExtractor,
    image::{blur_halve, GrayImage},
};

/// Checkerboard of 8x8 blocks, two gray levels.
fn checker_image(width: usize, height: usize) -> GrayImage {
    let pixels: Vec<u8> = (0..width * height)
        .map(|i| {
            let row = i / width;
            let col = i % width;
            if (row / 8 + col / 8) % 2 == 0 {
                30
            } else {
                220
            }
        })
        .collect();
    GrayImage::from_pixels(width, height, pixels).unwrap()
}

fn bench_histogram(c: &mut Criterion) {
    let image = checker_image(256, 256);

    for (filter_size, num_filters) in [(3usize, 8usize), (7, 8), (17, 12)] {
        let kernels = SyntheticBank::center_spike()
            .resolve(filter_size, num_filters)
            .unwrap();
        let extractor = BsifExtractor::new(kernels);
        let name = format!("histogram_256x256_{filter_size}x{filter_size}_{num_filters}bit");
        c.bench_function(&name, |b| {
            b.iter(|| extractor.histogram(black_box(&image)))
        });
    }
}

fn bench_downsample(c: &mut Criterion) {
    let image = checker_image(640, 480);
    c.bench_function("blur_halve_640x480", |b| {
        b.iter(|| blur_halve(black_box(&image)))
    });
}

criterion_group!(benches, bench_histogram, bench_downsample);
criterion_main!(benches);
