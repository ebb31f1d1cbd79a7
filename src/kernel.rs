//! Static 1D kernels.
//!
//! The directional refiner interpolates anti-dimension energies half-way
//! between two ring neighbours with a 4-tap cubic. Kernels are symmetric, and
//! [`Kernel1D::apply_symmetric`] folds mirrored taps before multiplying so a
//! reversed input produces a bit-identical result.

/// Trait implemented by 1D kernels.
pub trait Kernel1D {
    /// Return the taps in left-to-right order.
    fn taps(&self) -> &[f64];

    /// Plain dot product of taps and samples.
    fn apply(&self, samples: &[f64]) -> f64 {
        let taps = self.taps();
        debug_assert_eq!(taps.len(), samples.len());
        taps.iter().zip(samples).map(|(t, s)| t * s).sum()
    }

    /// Dot product for a symmetric kernel, pairing samples from the outside in.
    fn apply_symmetric(&self, samples: &[f64]) -> f64 {
        let taps = self.taps();
        let n = taps.len();
        debug_assert_eq!(n, samples.len());
        let mut acc = 0.0;
        for k in 0..n / 2 {
            acc += taps[k] * (samples[k] + samples[n - 1 - k]);
        }
        if n % 2 == 1 {
            acc += taps[n / 2] * samples[n / 2];
        }
        acc
    }
}

/// Simple wrapper around a static kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticKernel {
    taps: &'static [f64],
}

impl StaticKernel {
    pub const fn new(taps: &'static [f64]) -> Self {
        Self { taps }
    }
}

impl Kernel1D for StaticKernel {
    #[inline]
    fn taps(&self) -> &[f64] {
        self.taps
    }
}

/// Half-way cubic interpolation `(-1, 9, 9, -1) / 16`.
pub const CUBIC_4TAP: StaticKernel = StaticKernel::new(&[-0.0625, 0.5625, 0.5625, -0.0625]);
