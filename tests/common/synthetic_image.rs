use edge_doubler::Grid;

/// Single-channel checkerboard alternating `low`/`high` every `cell` pixels.
pub fn checkerboard(width: usize, height: usize, cell: usize, low: f64, high: f64) -> Grid {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = Grid::new(width, height, 1);
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            img.set(x, y, 0, if sum % 2 == 0 { low } else { high });
        }
    }
    img
}

/// Deterministic samples in `[0, 1)` from a 64-bit LCG.
pub fn pseudo_random(width: usize, height: usize, channels: usize, seed: u64) -> Grid {
    let mut state = seed;
    let data = (0..width * height * channels)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as f64 / (1u64 << 31) as f64
        })
        .collect();
    Grid::from_vec(width, height, channels, data).expect("valid geometry")
}

/// Bright disc on a two-level background, in `[0, 255]`.
pub fn plateau(size: usize) -> Grid {
    let centre = (size as f64 - 1.0) / 2.0;
    let radius = size as f64 * 0.3;
    let mut img = Grid::new(size, size, 1);
    for y in 0..size {
        for x in 0..size {
            let r = (x as f64 - centre).hypot(y as f64 - centre);
            let v = if r < radius {
                255.0
            } else if x < size / 3 {
                40.0
            } else {
                120.0
            };
            img.set(x, y, 0, v);
        }
    }
    img
}

/// `high` strictly above the main diagonal (`x > y`), `low` elsewhere.
pub fn diagonal_edge(size: usize, low: f64, high: f64) -> Grid {
    let mut img = Grid::new(size, size, 1);
    for y in 0..size {
        for x in 0..size {
            img.set(x, y, 0, if x > y { high } else { low });
        }
    }
    img
}

pub fn mirror_horizontal(grid: &Grid) -> Grid {
    let mut out = Grid::new(grid.w, grid.h, grid.channels);
    for y in 0..grid.h {
        for x in 0..grid.w {
            for c in 0..grid.channels {
                out.set(grid.w - 1 - x, y, c, grid.get(x, y, c));
            }
        }
    }
    out
}

pub fn mirror_vertical(grid: &Grid) -> Grid {
    let mut out = Grid::new(grid.w, grid.h, grid.channels);
    for y in 0..grid.h {
        for x in 0..grid.w {
            for c in 0..grid.channels {
                out.set(x, grid.h - 1 - y, c, grid.get(x, y, c));
            }
        }
    }
    out
}

/// Mean of the 2×2 block of `doubled` covering source pixel `(x, y)`.
pub fn block_mean(doubled: &Grid, x: usize, y: usize, c: usize) -> f64 {
    (doubled.get(2 * x, 2 * y, c)
        + doubled.get(2 * x + 1, 2 * y, c)
        + doubled.get(2 * x, 2 * y + 1, c)
        + doubled.get(2 * x + 1, 2 * y + 1, c))
        / 4.0
}

pub fn max_abs_diff(a: &Grid, b: &Grid) -> f64 {
    assert_eq!(a.shape(), b.shape());
    a.data
        .iter()
        .zip(&b.data)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
