//! Block-mean conservation for 2× upscaled grids.
//!
//! After correction, each 2×2 child block averages back to its source sample.
//! Excess is removed by scaling towards zero, a deficit by scaling the
//! headroom towards `max_value`, so corrected values never leave
//! `[0, max_value]`.
use crate::error::UpscaleError;
use crate::image::{Grid, SampleSource};

/// Rescale `block` in place so its mean equals `source`.
pub fn conserve_block(block: &mut [f64], source: f64, max_value: f64) {
    let n = block.len() as f64;
    let target = n * source;
    let sum = block.iter().fold(0.0, |acc, &v| acc + v);
    if sum > target {
        let k = target / sum;
        for v in block.iter_mut() {
            *v *= k;
        }
    } else if sum < target {
        let k = (n * max_value - target) / (n * max_value - sum);
        for v in block.iter_mut() {
            *v = max_value - (max_value - *v) * k;
        }
    }
}

fn check_doubled<S: SampleSource + ?Sized>(source: &S, doubled: &Grid) -> Result<(), UpscaleError> {
    let (w, h, channels) = source.shape();
    let expected = (w * 2, h * 2, channels);
    if doubled.shape() != expected {
        return Err(UpscaleError::DimensionMismatch {
            expected,
            got: doubled.shape(),
        });
    }
    Ok(())
}

/// Return a copy of `doubled` with every 2×2 block conserved against `source`.
pub fn conserve_grid<S: SampleSource + ?Sized>(
    source: &S,
    doubled: &Grid,
    max_value: f64,
) -> Result<Grid, UpscaleError> {
    check_doubled(source, doubled)?;
    let (w, _, channels) = source.shape();
    let mut out = doubled.clone();
    let row_len = out.row_len();
    out.for_each_row_chunk(2, |y, rows| {
        let (upper, lower) = rows.split_at_mut(row_len);
        for x in 0..w {
            for c in 0..channels {
                let left = 2 * x * channels + c;
                let right = left + channels;
                let mut block = [upper[left], upper[right], lower[left], lower[right]];
                conserve_block(&mut block, source.sample(x as isize, y as isize, c), max_value);
                upper[left] = block[0];
                upper[right] = block[1];
                lower[left] = block[2];
                lower[right] = block[3];
            }
        }
    });
    Ok(out)
}

/// Largest absolute difference between a 2×2 block mean and its source sample.
///
/// Returns `f64::INFINITY` when the grids are not a source/doubled pair.
pub fn max_block_deviation<S: SampleSource + ?Sized>(source: &S, doubled: &Grid) -> f64 {
    if check_doubled(source, doubled).is_err() {
        return f64::INFINITY;
    }
    let (w, h, channels) = source.shape();
    let mut worst = 0.0f64;
    for y in 0..h {
        for x in 0..w {
            for c in 0..channels {
                let mean = (doubled.get(2 * x, 2 * y, c)
                    + doubled.get(2 * x + 1, 2 * y, c)
                    + doubled.get(2 * x, 2 * y + 1, c)
                    + doubled.get(2 * x + 1, 2 * y + 1, c))
                    * 0.25;
                worst = worst.max((mean - source.sample(x as isize, y as isize, c)).abs());
            }
        }
    }
    worst
}
