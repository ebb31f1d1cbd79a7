use criterion::{criterion_group, criterion_main, Criterion};
use edge_doubler::curvature::CurvatureOptions;
use edge_doubler::{upscale2x, Grid, RefinerKind, UpscaleConfig};

fn synthetic_input(width: usize, height: usize, channels: usize) -> Grid {
    let mut grid = Grid::new(width, height, channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let ring = ((x * x + y * y) / (16 + 8 * c)) % 2;
                grid.set(x, y, c, if ring == 0 { 0.2 } else { 0.8 });
            }
        }
    }
    grid
}

fn bench_refiners(c: &mut Criterion) {
    let (w, h) = (256, 256);
    let input = synthetic_input(w, h, 3);

    let mut group = c.benchmark_group("upscale2x_256x256_rgb");
    let base = UpscaleConfig::default();
    let variants = [
        ("fused", UpscaleConfig { refine: false, ..base }),
        ("directional", base),
        (
            "composite",
            UpscaleConfig {
                refiner: RefinerKind::DiagonalComposite,
                ..base
            },
        ),
    ];
    for (name, config) in variants {
        group.bench_function(name, |b| {
            b.iter(|| upscale2x(&input, config).unwrap());
        });
    }
    group.finish();
}

fn bench_curvature(c: &mut Criterion) {
    let input = synthetic_input(128, 128, 1);
    let config = UpscaleConfig {
        curvature: CurvatureOptions {
            iterations: 8,
            ..CurvatureOptions::default()
        },
        ..UpscaleConfig::default()
    };

    let mut group = c.benchmark_group("upscale2x_128x128_gray");
    group.sample_size(10);
    group.bench_function("directional+curvature", |b| {
        b.iter(|| upscale2x(&input, config).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_refiners, bench_curvature);
criterion_main!(benches);
