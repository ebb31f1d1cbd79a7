//! Upscaling pipeline driving one or more 2× doublings end-to-end.
//!
//! One doubling runs, in order: orientation fusion, the curvature refiner when
//! it targets the fused grid (or refinement is off), directional or composite
//! refinement, the curvature refiner when it targets the refined grid, and a
//! final conservation pass when `conserve` is set and the last stage did not
//! already conserve.
//!
//! Typical usage:
//! ```
//! use edge_doubler::{upscale_by_power_of_two, Grid, UpscaleConfig};
//!
//! let source = Grid::filled(3, 2, 3, 0.5);
//! let big = upscale_by_power_of_two(&source, 2, UpscaleConfig::default()).unwrap();
//! assert_eq!((big.w, big.h, big.channels), (12, 8, 3));
//! ```

pub mod options;

pub use options::{CurvatureSource, RefinerKind, UpscaleConfig};

use crate::conserve::{conserve_grid, max_block_deviation};
use crate::curvature::CurvatureRefiner;
use crate::diagnostics::{InputDescriptor, LevelReport, TimingBreakdown, UpscaleReport};
use crate::doubling::fuse_orientations;
use crate::error::UpscaleError;
use crate::image::Grid;
use crate::refine::{composite_diagonals, refine_directional};
use log::debug;
use std::time::Instant;

/// Output grid of a multi-level run together with its report.
#[derive(Clone, Debug)]
pub struct UpscaleResult {
    pub grid: Grid,
    pub report: UpscaleReport,
}

/// Double `source` once.
pub fn upscale2x(source: &Grid, config: UpscaleConfig) -> Result<Grid, UpscaleError> {
    upscale2x_with_report(source, config).map(|(grid, _)| grid)
}

/// Double `source` once and describe what happened.
pub fn upscale2x_with_report(
    source: &Grid,
    config: UpscaleConfig,
) -> Result<(Grid, LevelReport), UpscaleError> {
    validate_request(source, 1, &config)?;
    double_level(source, &config, 0)
}

/// Apply `levels` successive doublings (scale `2^levels`).
pub fn upscale_by_power_of_two(
    source: &Grid,
    levels: usize,
    config: UpscaleConfig,
) -> Result<Grid, UpscaleError> {
    upscale_with_report(source, levels, config).map(|result| result.grid)
}

/// Apply `levels` successive doublings and collect a per-level report.
pub fn upscale_with_report(
    source: &Grid,
    levels: usize,
    config: UpscaleConfig,
) -> Result<UpscaleResult, UpscaleError> {
    validate_request(source, levels, &config)?;
    let start = Instant::now();
    let mut report = UpscaleReport::default();

    let (mut grid, first) = double_level(source, &config, 0)?;
    report.levels.push(first);
    for level in 1..levels {
        let (next, level_report) = double_level(&grid, &config, level)?;
        grid = next;
        report.levels.push(level_report);
    }

    report.total_ms = start.elapsed().as_secs_f64() * 1000.0;
    debug!(
        "upscale: {}x{} -> {}x{} over {} levels in {:.3} ms",
        source.w, source.h, grid.w, grid.h, levels, report.total_ms
    );
    Ok(UpscaleResult { grid, report })
}

/// Checks run before anything is allocated.
fn validate_request(source: &Grid, levels: usize, config: &UpscaleConfig) -> Result<(), UpscaleError> {
    source.validate()?;
    config.validate()?;
    if levels == 0 {
        return Err(UpscaleError::InvalidLevels(levels));
    }
    let overflow = UpscaleError::DimensionOverflow {
        width: source.w,
        height: source.h,
        levels,
    };
    let scale = u32::try_from(levels)
        .ok()
        .and_then(|l| 1usize.checked_shl(l))
        .ok_or_else(|| overflow.clone())?;
    let out_w = source.w.checked_mul(scale).ok_or_else(|| overflow.clone())?;
    let out_h = source.h.checked_mul(scale).ok_or_else(|| overflow.clone())?;
    let samples = out_w
        .checked_mul(out_h)
        .and_then(|n| n.checked_mul(source.channels))
        .ok_or_else(|| overflow.clone())?;
    // coordinates are addressed as isize during sampling
    if samples > isize::MAX as usize / std::mem::size_of::<f64>() {
        return Err(overflow);
    }
    Ok(())
}

fn describe(grid: &Grid) -> InputDescriptor {
    InputDescriptor {
        width: grid.w,
        height: grid.h,
        channels: grid.channels,
    }
}

fn double_level(
    source: &Grid,
    config: &UpscaleConfig,
    level: usize,
) -> Result<(Grid, LevelReport), UpscaleError> {
    let max_value = config.max_value;
    let curvature = CurvatureRefiner::new(config.curvature);
    let mut timings = TimingBreakdown::default();
    let mut curvature_trace = None;

    let mut current = timings.measure("fuse", || fuse_orientations(source, max_value));
    let mut conserved = false;

    if config.curvature_before_refine() {
        let (refined, trace) = timings.measure("curvature", || curvature.refine(&current, max_value));
        current = refined;
        curvature_trace = Some(trace);
    }

    if config.refine {
        current = match config.refiner {
            RefinerKind::Directional => {
                conserved = config.conserve;
                timings.measure("refine", || {
                    refine_directional(source, &current, max_value, config.conserve)
                })?
            }
            RefinerKind::DiagonalComposite => {
                timings.measure("composite", || {
                    composite_diagonals(source, &current, max_value, config.composite_passes)
                })?
            }
        };
    }

    if config.curvature_after_refine() {
        let (refined, trace) = timings.measure("curvature", || curvature.refine(&current, max_value));
        current = refined;
        curvature_trace = Some(trace);
        conserved = false;
    }

    if config.conserve && !conserved {
        current = timings.measure("conserve", || conserve_grid(source, &current, max_value))?;
    }
    timings.close();

    let conservation_error = max_block_deviation(source, &current);
    debug!(
        "upscale2x: level {} {}x{}x{} -> {}x{} in {:.3} ms (block error {:.3e})",
        level,
        source.w,
        source.h,
        source.channels,
        current.w,
        current.h,
        timings.total_ms,
        conservation_error
    );

    let report = LevelReport {
        level,
        input: describe(source),
        output: describe(&current),
        timings,
        conservation_error,
        curvature: curvature_trace,
    };
    Ok((current, report))
}
