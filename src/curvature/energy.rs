//! Second-order derivative fields and the per-pixel energy terms.
use super::options::{CurvatureOptions, PotentialMode};
use super::CurvatureStage;
use crate::image::{Grid, SampleSource};

/// First and second derivatives at one pixel, oriented for a lattice stage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Derivatives {
    pub c1: f64,
    pub c2: f64,
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
}

const C1: usize = 0;
const C2: usize = 1;
const D1: usize = 2;
const D2: usize = 3;
const D3: usize = 4;

/// Derivative fields over a whole plane, stored as one 5-channel grid.
///
/// Built fresh from the current plane at the start of every iteration.
#[derive(Clone, Debug)]
pub struct DerivativeFields {
    fields: Grid,
}

impl DerivativeFields {
    pub fn compute(plane: &Grid, stage: CurvatureStage) -> Self {
        let s = stage.offset();
        let w = plane.w;
        let mut fields = Grid::new(plane.w, plane.h, 5);
        fields.for_each_row_chunk(1, |y, row| {
            let j = y as isize;
            for x in 0..w {
                let i = x as isize;
                let get = |dx: isize, dy: isize| plane.sample(i + dx, j + dy, 0);
                let v = get(0, 0);
                let out = &mut row[x * 5..x * 5 + 5];
                out[C1] = (get(-1 + s, -1) - get(1 - s, 1)) / 2.0;
                out[C2] = (get(1 - 2 * s, -1 + s) - get(-1 + 2 * s, 1 - s)) / 2.0;
                out[D1] = get(-1 + s, -1) + get(1 - s, 1) - 2.0 * v;
                out[D2] = get(1, -1 + s) + get(-1, 1 - s) - 2.0 * v;
                out[D3] = (get(-s, -2 + s) - get(-2 + s, s) + get(s, 2 - s) - get(2 - s, -s)) / 2.0;
            }
        });
        Self { fields }
    }

    /// Derivatives at `(x, y)` with clamped addressing.
    #[inline]
    pub fn at(&self, x: isize, y: isize) -> Derivatives {
        Derivatives {
            c1: self.fields.sample(x, y, C1),
            c2: self.fields.sample(x, y, C2),
            d1: self.fields.sample(x, y, D1),
            d2: self.fields.sample(x, y, D2),
            d3: self.fields.sample(x, y, D3),
        }
    }
}

/// Signed level-curve curvature; zero inside the `±0.2` dead zone or where
/// the gradient vanishes.
pub fn isophote(d: &Derivatives) -> f64 {
    let den = d.c1 * d.c1 + d.c2 * d.c2;
    if den <= f64::EPSILON {
        return 0.0;
    }
    let iso = (d.c1 * d.c1 * d.d2 - 2.0 * d.c1 * d.c2 * d.d3 + d.c2 * d.c2 * d.d1) / den;
    if iso.abs() < 0.2 {
        0.0
    } else {
        iso
    }
}

#[inline]
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Change chosen for one pixel in one iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDecision {
    Keep,
    Increase,
    Decrease,
}

/// Energies of keeping the pixel, raising it by `step`, and lowering it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateEnergies {
    pub keep: f64,
    pub increase: f64,
    pub decrease: f64,
}

impl CandidateEnergies {
    pub fn decide(&self) -> StepDecision {
        if self.keep > self.increase && self.decrease > self.increase {
            StepDecision::Increase
        } else if self.keep > self.decrease && self.increase > self.decrease {
            StepDecision::Decrease
        } else {
            StepDecision::Keep
        }
    }
}

/// Evaluate the candidate energies of `plane(x, y)`.
pub fn candidate_energies(
    plane: &Grid,
    fields: &DerivativeFields,
    x: isize,
    y: isize,
    stage: CurvatureStage,
    step: f64,
    options: &CurvatureOptions,
) -> CandidateEnergies {
    let s = stage.offset();
    let get = |dx: isize, dy: isize| plane.sample(x + dx, y + dy, 0);
    let v = get(0, 0);

    let neighbours = [(1 - s, 1), (-1 + s, -1), (1, -1 + s), (-1, 1 - s)];
    let gates = neighbours.map(|(dx, dy)| {
        if (get(dx, dy) - v).abs() > options.edge_continuity_threshold {
            0.0
        } else {
            1.0
        }
    });
    let here = fields.at(x, y);
    let around = neighbours.map(|(dx, dy)| fields.at(x + dx, y + dy));

    let continuity = |delta: f64| {
        let term = |centre: f64, other: f64| (centre - other - 3.0 * delta).abs();
        let mut e = 0.0;
        e += gates[0] * term(here.d1, around[0].d1) + gates[1] * term(here.d1, around[1].d1);
        e += gates[2] * term(here.d1, around[2].d1) + gates[3] * term(here.d1, around[3].d1);
        e += gates[0] * term(here.d2, around[0].d2) + gates[1] * term(here.d2, around[1].d2);
        e += gates[2] * term(here.d2, around[2].d2) + gates[3] * term(here.d2, around[3].d2);
        e
    };
    let enhancement = |delta: f64| {
        (get(-2 + 2 * s, -2) + get(2 - 2 * s, 2) - 2.0 * v - 2.0 * delta).abs()
            + (get(2, -2 + 2 * s) + get(-2, 2 - 2 * s) - 2.0 * v - 2.0 * delta).abs()
    };
    let iso_sign = sign(isophote(&here));

    let energy = |delta: f64| {
        let mut e = options.w_al * continuity(delta);
        if options.potential.uses_enhancement() {
            e += options.w_bt * enhancement(delta);
        }
        e
    };
    let mut energies = CandidateEnergies {
        keep: energy(0.0),
        increase: energy(step),
        decrease: energy(-step),
    };
    if options.potential.uses_isophote() {
        energies.increase -= options.w_gm * iso_sign;
        energies.decrease += options.w_gm * iso_sign;
    }
    energies
}
