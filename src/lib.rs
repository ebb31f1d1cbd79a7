#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod pipeline;

// Stage-level building blocks, usable on their own.
pub mod conserve;
pub mod curvature;
pub mod doubling;
pub mod kernel;
pub mod refine;

// --- High-level re-exports -------------------------------------------------

// Main entry points: one or more doublings + configuration.
pub use crate::pipeline::{
    upscale2x, upscale2x_with_report, upscale_by_power_of_two, upscale_with_report,
    CurvatureSource, RefinerKind, UpscaleConfig, UpscaleResult,
};

pub use crate::error::UpscaleError;
pub use crate::image::Grid;

// Reports returned by the `*_with_report` entry points.
pub use crate::diagnostics::{LevelReport, UpscaleReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use edge_doubler::prelude::*;
///
/// let source = Grid::filled(4, 4, 1, 0.5);
/// let config = UpscaleConfig {
///     curvature: CurvatureOptions {
///         iterations: 4,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let doubled = upscale2x(&source, config).unwrap();
/// assert_eq!(doubled.shape(), (8, 8, 1));
/// ```
pub mod prelude {
    pub use crate::curvature::CurvatureOptions;
    pub use crate::image::{Grid, SampleSource};
    pub use crate::{upscale2x, upscale_by_power_of_two, UpscaleConfig, UpscaleError};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::conserve::{conserve_block, conserve_grid, max_block_deviation};
    pub use crate::curvature::{
        fcbi_seed, CurvatureRefiner, CurvatureStage, CurvatureTrace, StageTrace,
    };
    pub use crate::doubling::{double_axis, fuse_orientations, Axis, SamplePair};
    pub use crate::refine::{
        analyze_pixel, composite_diagonals, refine_directional, Direction, DirectionAnalysis,
        DirectionWeights,
    };
}
