//! Owned multi-channel f64 sample grid in interleaved row-major layout.
//!
//! Sample `(x, y, c)` lives at `(y * w + x) * channels + c`. Reads through
//! [`Grid::sample`] clamp to the image extents (replicate border); writes
//! through [`Grid::store`] drop anything outside the grid.
use super::traits::{SampleSink, SampleSource};
use crate::error::UpscaleError;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Grid width in samples
    pub w: usize,
    /// Grid height in samples
    pub h: usize,
    /// Interleaved channels per sample position
    pub channels: usize,
    /// Backing storage, `w * h * channels` values
    pub data: Vec<f64>,
}

impl Grid {
    /// Construct a zero-initialized grid of size `w × h × channels`.
    pub fn new(w: usize, h: usize, channels: usize) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![0.0; w * h * channels],
        }
    }

    /// Wrap an interleaved buffer, checking its geometry.
    pub fn from_vec(
        w: usize,
        h: usize,
        channels: usize,
        data: Vec<f64>,
    ) -> Result<Self, UpscaleError> {
        let grid = Self {
            w,
            h,
            channels,
            data,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Grid of the given shape with every sample set to `value`.
    pub fn filled(w: usize, h: usize, channels: usize, value: f64) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![value; w * h * channels],
        }
    }

    pub fn validate(&self) -> Result<(), UpscaleError> {
        if self.w == 0 || self.h == 0 {
            return Err(UpscaleError::EmptyGrid {
                width: self.w,
                height: self.h,
            });
        }
        if self.channels == 0 {
            return Err(UpscaleError::NoChannels);
        }
        let expected = self.w * self.h * self.channels;
        if self.data.len() != expected {
            return Err(UpscaleError::BufferSizeMismatch {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.w, self.h, self.channels)
    }

    /// Number of f64 elements in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.w * self.channels
    }

    #[inline]
    /// Convert (x, y, c) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.w + x) * self.channels + c
    }

    #[inline]
    /// Get the sample at (x, y, c). Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize, c: usize) -> f64 {
        self.data[self.idx(x, y, c)]
    }

    #[inline]
    /// Set the sample at (x, y, c). Panics when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, c: usize, v: f64) {
        let i = self.idx(x, y, c);
        self.data[i] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        let len = self.row_len();
        &self.data[y * len..(y + 1) * len]
    }

    /// Copy channel `c` into a single-channel grid, multiplying by `scale`.
    pub fn channel_plane(&self, c: usize, scale: f64) -> Grid {
        let mut plane = Grid::new(self.w, self.h, 1);
        for (dst, src) in plane
            .data
            .iter_mut()
            .zip(self.data.iter().skip(c).step_by(self.channels))
        {
            *dst = src * scale;
        }
        plane
    }

    /// Write a single-channel plane back into channel `c`, multiplying by
    /// `scale` and clamping into `[0, max_value]`.
    pub fn set_channel_plane(&mut self, c: usize, plane: &Grid, scale: f64, max_value: f64) {
        debug_assert_eq!((plane.w, plane.h, plane.channels), (self.w, self.h, 1));
        let channels = self.channels;
        for (dst, src) in self
            .data
            .iter_mut()
            .skip(c)
            .step_by(channels)
            .zip(plane.data.iter())
        {
            *dst = (src * scale).clamp(0.0, max_value);
        }
    }

    /// Smallest and largest sample value.
    pub fn value_range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Run `f(chunk_index, chunk)` over consecutive chunks of
    /// `rows_per_chunk` rows. Chunks are disjoint, so they run in parallel
    /// when the `parallel` feature is on.
    pub fn for_each_row_chunk<F>(&mut self, rows_per_chunk: usize, f: F)
    where
        F: Fn(usize, &mut [f64]) + Send + Sync,
    {
        let chunk_len = rows_per_chunk * self.row_len();
        if chunk_len == 0 {
            return;
        }
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.data
                .par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk));
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.data
                .chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk));
        }
    }

    /// Like [`Grid::for_each_row_chunk`], summing the value returned per chunk.
    pub fn sum_over_row_chunks<F>(&mut self, rows_per_chunk: usize, f: F) -> f64
    where
        F: Fn(usize, &mut [f64]) -> f64 + Send + Sync,
    {
        let chunk_len = rows_per_chunk * self.row_len();
        if chunk_len == 0 {
            return 0.0;
        }
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.data
                .par_chunks_mut(chunk_len)
                .enumerate()
                .map(|(i, chunk)| f(i, chunk))
                .sum()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.data
                .chunks_mut(chunk_len)
                .enumerate()
                .map(|(i, chunk)| f(i, chunk))
                .sum()
        }
    }
}

#[inline]
pub(crate) fn clamp_coord(v: isize, upper: usize) -> usize {
    if v <= 0 {
        0
    } else if (v as usize) >= upper {
        upper - 1
    } else {
        v as usize
    }
}

impl SampleSource for Grid {
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
        self.channels
    }
    #[inline]
    fn sample(&self, x: isize, y: isize, c: usize) -> f64 {
        self.get(clamp_coord(x, self.w), clamp_coord(y, self.h), c)
    }
}

impl SampleSink for Grid {
    #[inline]
    fn store(&mut self, x: isize, y: isize, c: usize, v: f64) {
        if x < 0 || y < 0 || c >= self.channels {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.w && y < self.h {
            self.set(x, y, c, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_clamps_to_edges() {
        let g = Grid::from_vec(2, 2, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(g.sample(-5, -1, 0), 1.0);
        assert_eq!(g.sample(7, 0, 0), 2.0);
        assert_eq!(g.sample(0, 9, 0), 3.0);
        assert_eq!(g.sample(3, 3, 0), 4.0);
    }

    #[test]
    fn store_drops_out_of_bounds_writes() {
        let mut g = Grid::new(2, 2, 2);
        g.store(-1, 0, 0, 5.0);
        g.store(2, 1, 1, 5.0);
        g.store(0, 0, 2, 5.0);
        assert!(g.data.iter().all(|&v| v == 0.0));
        g.store(1, 1, 1, 5.0);
        assert_eq!(g.get(1, 1, 1), 5.0);
    }

    #[test]
    fn from_vec_rejects_bad_geometry() {
        assert_eq!(
            Grid::from_vec(0, 3, 1, vec![]),
            Err(UpscaleError::EmptyGrid {
                width: 0,
                height: 3
            })
        );
        assert_eq!(
            Grid::from_vec(2, 2, 0, vec![]),
            Err(UpscaleError::NoChannels)
        );
        assert_eq!(
            Grid::from_vec(2, 2, 3, vec![0.0; 11]),
            Err(UpscaleError::BufferSizeMismatch {
                expected: 12,
                got: 11
            })
        );
    }

    #[test]
    fn channel_plane_round_trips_with_scale() {
        let mut g = Grid::from_vec(2, 1, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let plane = g.channel_plane(1, 255.0);
        assert_eq!(plane.shape(), (2, 1, 1));
        assert!((plane.data[1] - 0.4 * 255.0).abs() < 1e-12);
        g.set_channel_plane(1, &plane, 1.0 / 255.0, 1.0);
        assert!((g.get(0, 0, 1) - 0.2).abs() < 1e-12);
        assert_eq!(g.get(1, 0, 0), 0.3);
    }

    #[test]
    fn row_chunks_cover_every_row_once() {
        let mut g = Grid::new(3, 5, 2);
        g.for_each_row_chunk(2, |i, chunk| {
            for v in chunk.iter_mut() {
                *v += i as f64 + 1.0;
            }
        });
        assert_eq!(g.get(0, 0, 0), 1.0);
        assert_eq!(g.get(2, 3, 1), 2.0);
        assert_eq!(g.get(1, 4, 0), 3.0);
        let total = g.sum_over_row_chunks(1, |_, chunk| chunk.len() as f64);
        assert_eq!(total, 30.0);
    }
}
