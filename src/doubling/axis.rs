use crate::image::{Grid, SampleSource};
use serde::{Deserialize, Serialize};

/// Axis along which [`double_axis`] doubles the resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Unit step `(dx, dy)` along the axis.
    #[inline]
    pub fn step(self) -> (isize, isize) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }
}

/// Two children of one parent sample; `a` precedes `b` along the axis.
///
/// `b` is always derived as `2 * parent - a`, so the pair averages back to
/// the parent exactly up to one rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePair {
    pub a: f64,
    pub b: f64,
}

/// Split the centre of `window = [p3, p2, p1, c, n1, n2, n3]` into two
/// children.
pub fn double_sample(window: &[f64; 7], max_value: f64) -> SamplePair {
    let [p3, p2, p1, c, n1, n2, n3] = *window;
    let eps = super::guard_epsilon(max_value);

    let grad_a = (p3 - p2).abs() + (p2 - p1).abs() + eps;
    let grad_b = (p2 - p1).abs() + (p1 - c).abs() + eps;
    let grad_c = (p1 - c).abs() + (c - n1).abs() + eps;
    let grad_d = (c - n1).abs() + (n1 - n2).abs() + eps;
    let grad_e = (n1 - n2).abs() + (n2 - n3).abs() + eps;

    // Edge strength relative to its neighbourhood, damped when the left and
    // right gradients disagree.
    let k_edge = grad_c * grad_c / ((grad_a + grad_c) * (grad_c + grad_e));
    let k_symmetry = 1.0 - (grad_b - grad_d).abs() / (grad_b + grad_d);
    let k = k_edge * k_symmetry;

    clamp_pair(c + k * (p1 - n1) * 0.5, c, max_value)
}

/// Force the pair `(a, 2c - a)` into `[0, max_value]` while keeping its sum.
///
/// The four checks run in sequence and each one sees the result of the
/// previous: low `a`, high `a`, low `b`, high `b`.
pub fn clamp_pair(a: f64, center: f64, max_value: f64) -> SamplePair {
    let sum = 2.0 * center;
    let mut a = a;
    let mut b = sum - a;
    if a < 0.0 {
        a = 0.0;
        b = sum - a;
    }
    if a > max_value {
        a = max_value;
        b = sum - a;
    }
    if b < 0.0 {
        b = 0.0;
        a = sum - b;
    }
    if b > max_value {
        b = max_value;
        a = sum - b;
    }
    SamplePair { a, b }
}

/// Read the 7-tap window centred on `(x, y)` along `axis`.
#[inline]
fn window_at<S: SampleSource + ?Sized>(
    source: &S,
    x: isize,
    y: isize,
    c: usize,
    axis: Axis,
) -> [f64; 7] {
    let (dx, dy) = axis.step();
    let mut window = [0.0; 7];
    for (k, slot) in window.iter_mut().enumerate() {
        let t = k as isize - 3;
        *slot = source.sample(x + t * dx, y + t * dy, c);
    }
    window
}

/// Double `source` along one axis. Children of `(x, y)` land at
/// `(2x, y)`/`(2x + 1, y)` for [`Axis::Horizontal`] and at
/// `(x, 2y)`/`(x, 2y + 1)` for [`Axis::Vertical`].
pub fn double_axis<S: SampleSource + ?Sized>(source: &S, axis: Axis, max_value: f64) -> Grid {
    let (w, h, channels) = source.shape();
    match axis {
        Axis::Horizontal => {
            let mut out = Grid::new(w * 2, h, channels);
            out.for_each_row_chunk(1, |y, row| {
                for x in 0..w {
                    for c in 0..channels {
                        let window = window_at(source, x as isize, y as isize, c, axis);
                        let pair = double_sample(&window, max_value);
                        row[2 * x * channels + c] = pair.a;
                        row[(2 * x + 1) * channels + c] = pair.b;
                    }
                }
            });
            out
        }
        Axis::Vertical => {
            let mut out = Grid::new(w, h * 2, channels);
            let row_len = out.row_len();
            // One chunk holds the two output rows fed by source row `y`.
            out.for_each_row_chunk(2, |y, rows| {
                let (upper, lower) = rows.split_at_mut(row_len);
                for x in 0..w {
                    for c in 0..channels {
                        let window = window_at(source, x as isize, y as isize, c, axis);
                        let pair = double_sample(&window, max_value);
                        upper[x * channels + c] = pair.a;
                        lower[x * channels + c] = pair.b;
                    }
                }
            });
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_window_splits_into_equal_children() {
        let pair = double_sample(&[0.4; 7], 1.0);
        assert_eq!(pair, SamplePair { a: 0.4, b: 0.4 });
    }

    #[test]
    fn children_average_to_parent() {
        let windows = [
            [0.0, 0.1, 0.9, 0.5, 0.2, 0.7, 1.0],
            [10.0, 200.0, 3.0, 90.0, 255.0, 17.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 255.0, 255.0, 255.0],
        ];
        for window in windows {
            let pair = double_sample(&window, 255.0);
            assert!((pair.a + pair.b - 2.0 * window[3]).abs() < 1e-9);
            assert!((0.0..=255.0).contains(&pair.a));
            assert!((0.0..=255.0).contains(&pair.b));
        }
    }

    #[test]
    fn isolated_step_sharpens_towards_the_bright_side() {
        let pair = double_sample(&[0.0, 0.0, 0.0, 50.0, 100.0, 100.0, 100.0], 100.0);
        assert!(pair.a < 50.0);
        assert!(pair.b > 50.0);
    }

    #[test]
    fn reversed_window_swaps_children() {
        let window = [0.3, 0.8, 0.1, 0.6, 0.95, 0.2, 0.4];
        let mut reversed = window;
        reversed.reverse();
        let fwd = double_sample(&window, 1.0);
        let rev = double_sample(&reversed, 1.0);
        assert!((fwd.a - rev.b).abs() < 1e-12);
        assert!((fwd.b - rev.a).abs() < 1e-12);
    }

    #[test]
    fn clamp_pair_applies_checks_in_sequence() {
        assert_eq!(clamp_pair(-0.2, 0.1, 1.0), SamplePair { a: 0.0, b: 0.2 });
        assert_eq!(clamp_pair(1.3, 0.9, 1.0), SamplePair { a: 1.0, b: 0.8 });
        let high_b = clamp_pair(0.5, 0.9, 1.0);
        assert_eq!(high_b.b, 1.0);
        assert!((high_b.a - 0.8).abs() < 1e-12);
        // low `a` pushes `b` over the top, the later check pulls it back
        let cascade = clamp_pair(-0.1, 0.95, 1.0);
        assert_eq!(cascade.b, 1.0);
        assert!((cascade.a - 0.9).abs() < 1e-12);
    }

    #[test]
    fn double_axis_places_children_along_axis() {
        let src = Grid::from_vec(3, 2, 1, vec![0.0, 1.0, 0.5, 0.2, 0.2, 0.9]).unwrap();
        let horiz = double_axis(&src, Axis::Horizontal, 1.0);
        assert_eq!(horiz.shape(), (6, 2, 1));
        let vert = double_axis(&src, Axis::Vertical, 1.0);
        assert_eq!(vert.shape(), (3, 4, 1));
        for y in 0..2 {
            for x in 0..3 {
                let parent = src.get(x, y, 0);
                let h_sum = horiz.get(2 * x, y, 0) + horiz.get(2 * x + 1, y, 0);
                let v_sum = vert.get(x, 2 * y, 0) + vert.get(x, 2 * y + 1, 0);
                assert!((h_sum - 2.0 * parent).abs() < 1e-12);
                assert!((v_sum - 2.0 * parent).abs() < 1e-12);
            }
        }
    }
}
