//! Edge-aware 2× doubling along one axis and the two-order fusion built on it.
//!
//! Every source sample produces two children whose mean is exactly the parent.
//! The split is steered by a 7-tap window: strong, well-separated edges push
//! the children apart, while smooth or asymmetric neighbourhoods keep them
//! close to the parent value. Border samples clamp to the image extents.

pub mod axis;
pub mod fuse;

pub use axis::{clamp_pair, double_axis, double_sample, Axis, SamplePair};
pub use fuse::fuse_orientations;

/// Additive guard used by every energy and gradient ratio so flat input never
/// divides by zero. Scales with the sample range.
#[inline]
pub fn guard_epsilon(max_value: f64) -> f64 {
    max_value / 256.0
}
