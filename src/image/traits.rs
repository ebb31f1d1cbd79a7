/// Read access to a multi-channel sample grid with edge-clamped addressing.
///
/// Every doubling stage reads its input through this trait, so any storage
/// that can answer `sample` can be upscaled without copying into a [`Grid`].
///
/// [`Grid`]: super::Grid
pub trait SampleSource: Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn channels(&self) -> usize;

    /// Sample at `(x, y, c)` with `x`/`y` clamped into the grid.
    fn sample(&self, x: isize, y: isize, c: usize) -> f64;

    fn shape(&self) -> (usize, usize, usize) {
        (self.width(), self.height(), self.channels())
    }
}

/// Write access paired with [`SampleSource`]. Out-of-bounds writes are
/// silently dropped.
pub trait SampleSink: SampleSource {
    fn store(&mut self, x: isize, y: isize, c: usize, v: f64);
}

/// Borrowed single-channel `u8` buffer (e.g. decoded 8-bit gray data) mapped
/// linearly into `[0, max_value]`.
#[derive(Clone, Debug)]
pub struct U8View<'a> {
    pub w: usize,
    pub h: usize,
    /// Bytes between consecutive rows
    pub stride: usize,
    pub data: &'a [u8],
    pub max_value: f64,
}

impl SampleSource for U8View<'_> {
    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn channels(&self) -> usize {
        1
    }
    #[inline]
    fn sample(&self, x: isize, y: isize, _c: usize) -> f64 {
        let x = super::grid::clamp_coord(x, self.w);
        let y = super::grid::clamp_coord(y, self.h);
        self.data[y * self.stride + x] as f64 * (self.max_value / 255.0)
    }
}
