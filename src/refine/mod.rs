//! Directional refinement of a fused 2× grid.
//!
//! The `refine` module rebuilds each output 2×2 block from the fused grid:
//!
//! - [`direction`] measures eight anti-dimension energies on a 17-sample
//!   source stencil and picks the smoothest orientation.
//! - [`cascade`] turns that choice into reconstruction weights by walking the
//!   direction ring.
//! - [`composite`] is the lighter alternative that only blends two diagonal
//!   blurs of the fused grid.
//!
//! Reconstruction of a block mixes the fused samples themselves (the `none`,
//! horizontal and vertical shares) with 4-tap averages along each weighted
//! oblique direction, read from a 6×6 fused window anchored two samples above
//! and left of the block.

pub mod cascade;
pub mod composite;
pub mod direction;

pub use cascade::{resolve_weights, CascadeBranch, DirectionWeights};
pub use composite::composite_diagonals;
pub use direction::{gather_stencil, stencil_energies, Direction, DirectionEnergies};

use crate::conserve::conserve_block;
use crate::error::UpscaleError;
use crate::image::{Grid, SampleSource};
use serde::Serialize;

/// Full per-pixel decision of the directional refiner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionAnalysis {
    pub energies: DirectionEnergies,
    pub dominant: Direction,
    pub branch: CascadeBranch,
    pub weights: DirectionWeights,
}

impl DirectionAnalysis {
    /// Dominant orientation together with its weight.
    pub fn hypothesis(&self) -> DirectionHypothesis {
        DirectionHypothesis {
            direction: self.dominant,
            energy: self.energies.get(self.dominant),
            weight: self.weights.get(self.dominant),
        }
    }
}

/// One orientation with its anti-dimension energy and reconstruction weight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DirectionHypothesis {
    pub direction: Direction,
    pub energy: f64,
    pub weight: f64,
}

/// Analyse the stencil around source pixel `(x, y)` in channel `c`.
pub fn analyze_pixel<S: SampleSource + ?Sized>(
    source: &S,
    x: isize,
    y: isize,
    c: usize,
    max_value: f64,
) -> DirectionAnalysis {
    let stencil = gather_stencil(source, x, y, c);
    let energies = stencil_energies(&stencil, max_value);
    let dominant = energies.dominant();
    let (branch, weights) = resolve_weights(&energies, dominant, max_value);
    DirectionAnalysis {
        energies,
        dominant,
        branch,
        weights,
    }
}

/// Sub-sample offsets `a, b, c, d` inside an output block.
const SUBSAMPLES: [(isize, isize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Per oblique direction, four taps per sub-sample. Tap `i` addresses the
/// fused sample at `(i % 6 - 2, i / 6 - 2)` relative to the block origin.
const TAP_TABLES: [(Direction, [[usize; 4]; 4]); 6] = [
    (
        Direction::Diagonal,
        [[7, 14, 21, 28], [8, 15, 15, 22], [13, 20, 20, 27], [7, 14, 21, 28]],
    ),
    (
        Direction::AntiDiagonal,
        [[9, 14, 14, 19], [10, 15, 20, 25], [10, 15, 20, 25], [16, 21, 21, 26]],
    ),
    (
        Direction::Shallow,
        [[6, 14, 14, 22], [7, 15, 15, 23], [12, 20, 20, 28], [13, 21, 21, 29]],
    ),
    (
        Direction::Steep,
        [[1, 14, 14, 27], [2, 15, 15, 28], [7, 20, 20, 33], [8, 21, 21, 34]],
    ),
    (
        Direction::ShallowAnti,
        [[10, 14, 14, 18], [11, 15, 15, 19], [16, 20, 20, 24], [17, 21, 21, 25]],
    ),
    (
        Direction::SteepAnti,
        [[3, 14, 14, 25], [4, 15, 15, 26], [9, 20, 20, 31], [10, 21, 21, 32]],
    ),
];

#[inline]
fn window_offset(tap: usize) -> (isize, isize) {
    ((tap % 6) as isize - 2, (tap / 6) as isize - 2)
}

/// Rebuild the four sub-samples of the block at fused `(2x, 2y)`.
pub fn reconstruct_block(
    fused: &Grid,
    x: usize,
    y: usize,
    c: usize,
    weights: &DirectionWeights,
) -> [f64; 4] {
    let (bx, by) = (2 * x as isize, 2 * y as isize);
    let direct = weights.direct();
    let mut block = [0.0; 4];
    for (q, (out, &(qx, qy))) in block.iter_mut().zip(SUBSAMPLES.iter()).enumerate() {
        let mut v = direct * fused.sample(bx + qx, by + qy, c);
        for (dir, table) in TAP_TABLES.iter() {
            let w = weights.get(*dir);
            if w == 0.0 {
                continue;
            }
            let sum = table[q].iter().fold(0.0, |acc, &tap| {
                let (ox, oy) = window_offset(tap);
                acc + fused.sample(bx + ox, by + oy, c)
            });
            v += w * sum * 0.25;
        }
        *out = v;
    }
    block
}

/// Refine the fused 2× grid of `source` along locally dominant directions.
///
/// With `conserve` set, every output block is corrected to average back to its
/// source sample.
pub fn refine_directional<S: SampleSource + ?Sized>(
    source: &S,
    fused: &Grid,
    max_value: f64,
    conserve: bool,
) -> Result<Grid, UpscaleError> {
    let (w, h, channels) = source.shape();
    let expected = (w * 2, h * 2, channels);
    if fused.shape() != expected {
        return Err(UpscaleError::DimensionMismatch {
            expected,
            got: fused.shape(),
        });
    }
    let mut out = Grid::new(w * 2, h * 2, channels);
    let row_len = out.row_len();
    out.for_each_row_chunk(2, |y, rows| {
        let (upper, lower) = rows.split_at_mut(row_len);
        for x in 0..w {
            for c in 0..channels {
                let analysis = analyze_pixel(source, x as isize, y as isize, c, max_value);
                let mut block = reconstruct_block(fused, x, y, c, &analysis.weights);
                if conserve {
                    let parent = source.sample(x as isize, y as isize, c);
                    conserve_block(&mut block, parent, max_value);
                }
                let left = 2 * x * channels + c;
                let right = left + channels;
                upper[left] = block[0];
                upper[right] = block[1];
                lower[left] = block[2];
                lower[right] = block[3];
            }
        }
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doubling::fuse_orientations;

    #[test]
    fn weights_sum_to_one_on_varied_input() {
        let data: Vec<f64> = (0..49).map(|i| ((i * 37) % 11) as f64 / 10.0).collect();
        let src = Grid::from_vec(7, 7, 1, data).unwrap();
        for y in 0..7 {
            for x in 0..7 {
                let a = analyze_pixel(&src, x, y, 0, 1.0);
                assert!((a.weights.total() - 1.0).abs() < 1e-9);
                assert!(a.weights.none >= 0.0 && a.weights.none <= 1.0);
                assert!(a.weights.per_direction.iter().all(|&v| v >= 0.0));
            }
        }
    }

    #[test]
    fn flat_input_is_reproduced() {
        let src = Grid::filled(5, 4, 3, 0.6);
        let fused = fuse_orientations(&src, 1.0);
        for conserve in [false, true] {
            let out = refine_directional(&src, &fused, 1.0, conserve).unwrap();
            assert!(out.data.iter().all(|&v| (v - 0.6).abs() < 1e-12));
        }
    }

    #[test]
    fn tap_tables_stay_inside_window() {
        for (_, table) in TAP_TABLES.iter() {
            for taps in table {
                for &tap in taps {
                    let (ox, oy) = window_offset(tap);
                    assert!((-2..=3).contains(&ox) && (-2..=3).contains(&oy));
                }
            }
        }
    }

    #[test]
    fn mismatched_fused_grid_is_rejected() {
        let src = Grid::new(3, 3, 1);
        let fused = Grid::new(6, 5, 1);
        assert!(matches!(
            refine_directional(&src, &fused, 1.0, true),
            Err(UpscaleError::DimensionMismatch { .. })
        ));
    }
}
