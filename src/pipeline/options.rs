//! Parameter types configuring one doubling.
//!
//! A single [`UpscaleConfig`] value carries every knob; it is `Copy` and
//! passed by value into the entry points. Defaults give the full directional
//! refinement with conservation on unit-range samples and the curvature
//! refiner switched off.

use crate::curvature::CurvatureOptions;
use crate::error::UpscaleError;
use serde::{Deserialize, Serialize};

/// Refinement applied to the fused grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefinerKind {
    /// 17-sample, eight-direction reconstruction.
    #[default]
    Directional,
    /// Blend with iterated main/minor diagonal blurs.
    DiagonalComposite,
}

/// Grid the curvature refiner runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurvatureSource {
    /// The fused grid, before refinement.
    Fused,
    /// The refined grid, after refinement.
    #[default]
    Refined,
}

/// Upscaling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpscaleConfig {
    /// Run the refinement stage after fusion.
    pub refine: bool,
    pub refiner: RefinerKind,
    /// Blur passes of [`RefinerKind::DiagonalComposite`].
    pub composite_passes: usize,
    /// Make every output 2×2 block average back to its source sample.
    pub conserve: bool,
    /// Upper bound of the sample range; the lower bound is zero.
    pub max_value: f64,
    pub curvature_source: CurvatureSource,
    pub curvature: CurvatureOptions,
}

impl Default for UpscaleConfig {
    fn default() -> Self {
        Self {
            refine: true,
            refiner: RefinerKind::Directional,
            composite_passes: 4,
            conserve: true,
            max_value: 1.0,
            curvature_source: CurvatureSource::Refined,
            curvature: CurvatureOptions::default(),
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), UpscaleError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(UpscaleError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), UpscaleError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(UpscaleError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        });
    }
    Ok(())
}

impl UpscaleConfig {
    /// Reject non-finite or out-of-range values.
    pub fn validate(&self) -> Result<(), UpscaleError> {
        finite("maxValue", self.max_value)?;
        if self.max_value <= 0.0 {
            return Err(UpscaleError::InvalidParameter {
                name: "maxValue",
                value: self.max_value,
                reason: "must be positive",
            });
        }
        let c = &self.curvature;
        non_negative("curvature.maxEdgeStep", c.max_edge_step)?;
        non_negative("curvature.edgeContinuityThreshold", c.edge_continuity_threshold)?;
        non_negative("curvature.changeLimit", c.change_limit)?;
        finite("curvature.wAl", c.w_al)?;
        finite("curvature.wBt", c.w_bt)?;
        finite("curvature.wGm", c.w_gm)?;
        Ok(())
    }

    /// Whether the curvature refiner runs before refinement.
    pub(crate) fn curvature_before_refine(&self) -> bool {
        self.curvature.enabled() && (self.curvature_source == CurvatureSource::Fused || !self.refine)
    }

    /// Whether the curvature refiner runs after refinement.
    pub(crate) fn curvature_after_refine(&self) -> bool {
        self.curvature.enabled() && self.refine && self.curvature_source == CurvatureSource::Refined
    }
}
