//! Diagonal-blur compositing refiner.
//!
//! Two copies of the fused grid are repeatedly blurred along the main and the
//! minor diagonal, each pass re-conserved against the source. The final block
//! blends the fused samples with whichever blur follows the smoother diagonal
//! of the 5×5 source neighbourhood.
use crate::conserve::conserve_grid;
use crate::doubling::guard_epsilon;
use crate::error::UpscaleError;
use crate::image::{Grid, SampleSource};

/// Orientation of a 3-tap diagonal blur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagonalBlur {
    /// Neighbours at `(x-1, y-1)` and `(x+1, y+1)`.
    Main,
    /// Neighbours at `(x+1, y-1)` and `(x-1, y+1)`.
    Minor,
}

/// `(prev + 2v + next) / 4` along the diagonal, edge-clamped.
pub fn blur_diagonal(grid: &Grid, blur: DiagonalBlur) -> Grid {
    let dx: isize = match blur {
        DiagonalBlur::Main => -1,
        DiagonalBlur::Minor => 1,
    };
    let (w, _, channels) = grid.shape();
    let mut out = Grid::new(grid.w, grid.h, channels);
    out.for_each_row_chunk(1, |y, row| {
        let y = y as isize;
        for x in 0..w {
            let xi = x as isize;
            for c in 0..channels {
                let v = grid.get(x, y as usize, c);
                let prev = grid.sample(xi + dx, y - 1, c);
                let next = grid.sample(xi - dx, y + 1, c);
                row[x * channels + c] = (prev + v + v + next) / 4.0;
            }
        }
    });
    out
}

/// Total variation of the 5×5 source window along the main and minor
/// diagonals, each raised to the fifth power.
fn diagonal_variation<S: SampleSource + ?Sized>(
    source: &S,
    x: isize,
    y: isize,
    c: usize,
    eps: f64,
) -> (f64, f64) {
    let mut window = [[0.0; 5]; 5];
    for (j, row) in window.iter_mut().enumerate() {
        for (i, v) in row.iter_mut().enumerate() {
            *v = source.sample(x + i as isize - 2, y + j as isize - 2, c);
        }
    }
    let mut main = eps;
    let mut minor = eps;
    for j in 0..4 {
        for i in 0..4 {
            main += (window[j][i] - window[j + 1][i + 1]).abs();
            minor += (window[j][i + 1] - window[j + 1][i]).abs();
        }
    }
    (main.powi(5), minor.powi(5))
}

/// Blend `fused` with `passes` rounds of conserved diagonal blurs.
///
/// The result is not conserved itself; callers run a conservation pass when
/// they need exact block means.
pub fn composite_diagonals<S: SampleSource + ?Sized>(
    source: &S,
    fused: &Grid,
    max_value: f64,
    passes: usize,
) -> Result<Grid, UpscaleError> {
    let (w, h, channels) = source.shape();
    if fused.shape() != (w * 2, h * 2, channels) {
        return Err(UpscaleError::DimensionMismatch {
            expected: (w * 2, h * 2, channels),
            got: fused.shape(),
        });
    }
    let mut main = fused.clone();
    let mut minor = fused.clone();
    for _ in 0..passes {
        main = conserve_grid(source, &blur_diagonal(&main, DiagonalBlur::Main), max_value)?;
        minor = conserve_grid(source, &blur_diagonal(&minor, DiagonalBlur::Minor), max_value)?;
    }

    let eps = guard_epsilon(max_value);
    let mut out = Grid::new(w * 2, h * 2, channels);
    let row_len = out.row_len();
    out.for_each_row_chunk(2, |y, rows| {
        let (upper, lower) = rows.split_at_mut(row_len);
        for x in 0..w {
            for c in 0..channels {
                let (anti_main, anti_minor) =
                    diagonal_variation(source, x as isize, y as isize, c, eps);
                let chosen = if anti_main < anti_minor { &main } else { &minor };
                let k = (anti_main - anti_minor).abs() / (anti_main + anti_minor);
                let blend = |fx: usize, fy: usize| {
                    (1.0 - k) * fused.get(fx, fy, c) + k * chosen.get(fx, fy, c)
                };
                let left = 2 * x * channels + c;
                let right = left + channels;
                upper[left] = blend(2 * x, 2 * y);
                upper[right] = blend(2 * x + 1, 2 * y);
                lower[left] = blend(2 * x, 2 * y + 1);
                lower[right] = blend(2 * x + 1, 2 * y + 1);
            }
        }
    });
    Ok(out)
}
