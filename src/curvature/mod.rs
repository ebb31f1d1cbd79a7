//! Iterative curvature-energy refinement (ICBI).
//!
//! Works on one channel plane at a time, expressed in 8-bit levels. Pixels of
//! a 2× grid split into three lattices: block origins (even, even) carry the
//! source samples and never move; the [`CurvatureStage::Diagonal`] stage
//! adjusts the (odd, odd) pixels and the [`CurvatureStage::Axis`] stage the
//! pixels with `x + y` odd. Within one iteration every update reads the
//! pre-iteration plane, so rows are processed independently.
//!
//! Only pixels at least [`MARGIN`] samples from every border are iterated,
//! so no energy term reads a derivative through the clamped border. With
//! [`CurvatureSeed::Fcbi`] each stage first re-interpolates its lattice
//! (see [`seed`]).

pub mod energy;
pub mod options;
pub mod seed;

pub use energy::{candidate_energies, isophote, DerivativeFields, Derivatives, StepDecision};
pub use options::{CurvatureOptions, CurvatureSeed, PotentialMode, StopCriterion};
pub use seed::{fcbi_seed, fcbi_value};

/// Distance from the border of the outermost iterated pixel. Energies read
/// derivatives one pixel away, and those reach two further.
pub const MARGIN: usize = 3;

use crate::image::Grid;
use log::{debug, warn};
use serde::Serialize;
use std::time::Instant;

/// Lattice updated by one refinement stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CurvatureStage {
    /// Block centres: odd `x` and odd `y`.
    Diagonal,
    /// Block edges: `x + y` odd.
    Axis,
}

impl CurvatureStage {
    pub const ALL: [CurvatureStage; 2] = [CurvatureStage::Diagonal, CurvatureStage::Axis];

    /// Stencil rotation `s` used by the derivative and energy formulas.
    #[inline]
    pub fn offset(self) -> isize {
        match self {
            CurvatureStage::Diagonal => 0,
            CurvatureStage::Axis => 1,
        }
    }

    #[inline]
    pub fn contains(self, x: usize, y: usize) -> bool {
        match self {
            CurvatureStage::Diagonal => x % 2 == 1 && y % 2 == 1,
            CurvatureStage::Axis => (x + y) % 2 == 1,
        }
    }

    /// Step carried into the first iteration when the schedule keeps it.
    #[inline]
    pub fn initial_step(self) -> f64 {
        4.0 / (1.0 + self.offset() as f64)
    }
}

/// Step for iteration `g` (1-based) of `n`.
///
/// The second and third quarters both use 2; the last quarter keeps whatever
/// the previous iteration used.
#[allow(clippy::if_same_then_else)]
pub fn step_size(g: usize, n: usize, current: f64) -> f64 {
    let (g, n) = (g as f64, n as f64);
    if g < n / 4.0 {
        1.0
    } else if g < n / 2.0 {
        2.0
    } else if g < 3.0 * n / 4.0 {
        2.0
    } else {
        current
    }
}

/// Per-stage convergence record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTrace {
    pub channel: usize,
    pub stage: CurvatureStage,
    /// Total absolute change of every iteration that ran.
    pub diffs: Vec<f64>,
    /// Whether the change limit ended the stage before the iteration cap.
    pub stopped_early: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvatureTrace {
    pub stages: Vec<StageTrace>,
    pub elapsed_ms: f64,
}

impl CurvatureTrace {
    pub fn total_iterations(&self) -> usize {
        self.stages.iter().map(|s| s.diffs.len()).sum()
    }
}

/// Two-stage curvature refiner.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurvatureRefiner {
    pub options: CurvatureOptions,
}

impl CurvatureRefiner {
    pub fn new(options: CurvatureOptions) -> Self {
        Self { options }
    }

    /// One iteration of `stage` with the given step. Returns the updated plane
    /// and the total change.
    pub fn iterate(&self, plane: &Grid, stage: CurvatureStage, step: f64) -> (Grid, f64) {
        let fields = DerivativeFields::compute(plane, stage);
        let (w, h) = (plane.w, plane.h);
        let mut next = plane.clone();
        if w <= 2 * MARGIN || h <= 2 * MARGIN {
            return (next, 0.0);
        }
        let options = self.options;
        let diff = next.sum_over_row_chunks(1, |y, row| {
            if y < MARGIN || y >= h - MARGIN {
                return 0.0;
            }
            let mut diff = 0.0;
            for x in MARGIN..w - MARGIN {
                if !stage.contains(x, y) {
                    continue;
                }
                let energies = candidate_energies(
                    plane,
                    &fields,
                    x as isize,
                    y as isize,
                    stage,
                    step,
                    &options,
                );
                match energies.decide() {
                    StepDecision::Increase => {
                        row[x] += step;
                        diff += step;
                    }
                    StepDecision::Decrease => {
                        row[x] -= step;
                        diff += step;
                    }
                    StepDecision::Keep => {}
                }
            }
            diff
        });
        (next, diff)
    }

    /// Run one stage to completion on a single-channel level plane.
    pub fn run_stage(&self, plane: Grid, stage: CurvatureStage, channel: usize) -> (Grid, StageTrace) {
        let n = self.options.iterations;
        let mut plane = match self.options.seed {
            CurvatureSeed::Keep => plane,
            CurvatureSeed::Fcbi => fcbi_seed(&plane, stage, self.options.max_edge_step),
        };
        let mut step = stage.initial_step();
        let mut trace = StageTrace {
            channel,
            stage,
            diffs: Vec::with_capacity(n),
            stopped_early: false,
        };
        for g in 1..=n {
            step = step_size(g, n, step);
            let (next, diff) = self.iterate(&plane, stage, step);
            plane = next;
            trace.diffs.push(diff);
            if self.options.stop == StopCriterion::ByChangeThreshold
                && diff < self.options.change_limit
            {
                trace.stopped_early = g < n;
                return (plane, trace);
            }
        }
        if self.options.stop == StopCriterion::ByChangeThreshold && n > 0 {
            warn!(
                "ICBI: {:?} stage on channel {} hit {} iterations above change limit {}",
                stage, channel, n, self.options.change_limit
            );
        }
        (plane, trace)
    }

    /// Run both stages on a single-channel plane in 8-bit levels.
    pub fn refine_plane(&self, plane: Grid, channel: usize) -> (Grid, Vec<StageTrace>) {
        let mut plane = plane;
        let mut traces = Vec::with_capacity(CurvatureStage::ALL.len());
        for stage in CurvatureStage::ALL {
            let (next, trace) = self.run_stage(plane, stage, channel);
            plane = next;
            traces.push(trace);
        }
        (plane, traces)
    }

    /// Refine every channel of a 2× grid whose samples lie in `[0, max_value]`.
    pub fn refine(&self, grid: &Grid, max_value: f64) -> (Grid, CurvatureTrace) {
        let start = Instant::now();
        let mut out = grid.clone();
        let mut trace = CurvatureTrace::default();
        if !self.options.enabled() {
            return (out, trace);
        }
        let to_levels = 255.0 / max_value;
        let from_levels = max_value / 255.0;
        for c in 0..grid.channels {
            let plane = grid.channel_plane(c, to_levels);
            let (refined, stages) = self.refine_plane(plane, c);
            out.set_channel_plane(c, &refined, from_levels, max_value);
            trace.stages.extend(stages);
        }
        trace.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "ICBI: {}x{}x{} refined with {} iterations in {:.3} ms",
            grid.w,
            grid.h,
            grid.channels,
            trace.total_iterations(),
            trace.elapsed_ms
        );
        (out, trace)
    }
}
