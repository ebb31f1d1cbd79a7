use crate::curvature::CurvatureTrace;
use crate::diagnostics::TimingBreakdown;
use serde::Serialize;

/// Geometry of a grid entering or leaving a doubling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Trace of a single 2× doubling.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    /// Zero-based doubling index within a multi-level run.
    pub level: usize,
    pub input: InputDescriptor,
    pub output: InputDescriptor,
    pub timings: TimingBreakdown,
    /// Largest |block mean - source sample| over the output.
    pub conservation_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curvature: Option<CurvatureTrace>,
}

/// Trace of a complete multi-level upscaling run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpscaleReport {
    pub levels: Vec<LevelReport>,
    pub total_ms: f64,
}

impl UpscaleReport {
    /// Worst conservation error across all levels.
    pub fn max_conservation_error(&self) -> f64 {
        self.levels
            .iter()
            .map(|l| l.conservation_error)
            .fold(0.0, f64::max)
    }
}
