//! Serializable reports describing what an upscaling run did.
//!
//! Each doubling produces a [`LevelReport`] with per-stage timings, the
//! residual block-mean error and, when the curvature refiner ran, its
//! per-stage convergence trace. [`UpscaleReport`] collects the levels of a
//! multi-level run.

pub mod pipeline;
pub mod timing;

pub use pipeline::{InputDescriptor, LevelReport, UpscaleReport};
pub use timing::{StageTiming, TimingBreakdown};
