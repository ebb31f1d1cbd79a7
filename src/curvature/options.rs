//! Parameters of the curvature-energy refinement.
//!
//! Values are expressed in 8-bit levels regardless of the grid's sample
//! range; the refiner rescales each plane to `[0, 255]` before iterating.
use serde::{Deserialize, Serialize};

/// Which energy terms drive the per-pixel decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PotentialMode {
    /// Curvature continuity plus curvature enhancement (`1`).
    #[default]
    ContinuityEnhancement,
    /// Curvature continuity plus the isophote smoothing term (`2`).
    ContinuityIsophote,
    /// All three terms (`3`).
    Full,
}

impl TryFrom<u8> for PotentialMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PotentialMode::ContinuityEnhancement),
            2 => Ok(PotentialMode::ContinuityIsophote),
            3 => Ok(PotentialMode::Full),
            other => Err(format!("potential must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<PotentialMode> for u8 {
    fn from(mode: PotentialMode) -> Self {
        match mode {
            PotentialMode::ContinuityEnhancement => 1,
            PotentialMode::ContinuityIsophote => 2,
            PotentialMode::Full => 3,
        }
    }
}

impl PotentialMode {
    #[inline]
    pub fn uses_enhancement(self) -> bool {
        matches!(self, PotentialMode::ContinuityEnhancement | PotentialMode::Full)
    }

    #[inline]
    pub fn uses_isophote(self) -> bool {
        matches!(self, PotentialMode::ContinuityIsophote | PotentialMode::Full)
    }
}

/// When a stage stops iterating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopCriterion {
    /// Stop once an iteration changes less than `change_limit` in total.
    #[default]
    ByChangeThreshold,
    /// Always run every iteration.
    ByIterationCount,
}

/// How each stage's lattice is initialised before iterating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurvatureSeed {
    /// Iterate on the incoming values.
    #[default]
    Keep,
    /// Re-interpolate the lattice from its opposing neighbour pairs (FCBI) first.
    Fcbi,
}

/// Parameters controlling the two-stage curvature refinement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurvatureOptions {
    /// Iterations per stage; zero disables the refiner.
    pub iterations: usize,
    pub potential: PotentialMode,
    pub seed: CurvatureSeed,
    /// FCBI only compares pair curvatures when both pairs, and their means,
    /// differ by less than this; otherwise it takes the flatter pair.
    pub max_edge_step: f64,
    /// Neighbours further than this from the pixel drop out of the continuity term.
    pub edge_continuity_threshold: f64,
    pub stop: StopCriterion,
    /// Total change per iteration below which [`StopCriterion::ByChangeThreshold`] stops.
    pub change_limit: f64,
    /// Curvature continuity weight
    pub w_al: f64,
    /// Curvature enhancement weight
    pub w_bt: f64,
    /// Isophote smoothing weight
    pub w_gm: f64,
}

impl Default for CurvatureOptions {
    fn default() -> Self {
        Self {
            iterations: 0,
            potential: PotentialMode::ContinuityEnhancement,
            seed: CurvatureSeed::Keep,
            max_edge_step: 100.0,
            edge_continuity_threshold: 50.0,
            stop: StopCriterion::ByChangeThreshold,
            change_limit: 100.0,
            w_al: 1.0,
            w_bt: -1.0,
            w_gm: 5.0,
        }
    }
}

impl CurvatureOptions {
    #[inline]
    pub fn enabled(&self) -> bool {
        self.iterations > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let opts: CurvatureOptions =
            serde_json::from_str(r#"{"iterations": 8, "potential": 3, "stop": "byIterationCount"}"#)
                .unwrap();
        assert_eq!(opts.iterations, 8);
        assert_eq!(opts.potential, PotentialMode::Full);
        assert_eq!(opts.stop, StopCriterion::ByIterationCount);
        assert_eq!(opts.max_edge_step, 100.0);
        assert_eq!(opts.seed, CurvatureSeed::Keep);
        assert_eq!(opts.w_bt, -1.0);
        let seeded: CurvatureOptions = serde_json::from_str(r#"{"seed": "fcbi"}"#).unwrap();
        assert_eq!(seeded.seed, CurvatureSeed::Fcbi);
    }

    #[test]
    fn rejects_unknown_potential() {
        let res: Result<CurvatureOptions, _> = serde_json::from_str(r#"{"potential": 4}"#);
        assert!(res.is_err());
    }

    #[test]
    fn potential_round_trips_through_u8() {
        for mode in [
            PotentialMode::ContinuityEnhancement,
            PotentialMode::ContinuityIsophote,
            PotentialMode::Full,
        ] {
            assert_eq!(PotentialMode::try_from(u8::from(mode)), Ok(mode));
        }
    }
}
