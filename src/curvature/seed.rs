//! Fast curvature-based seeding (FCBI) of one lattice stage.
//!
//! Each lattice pixel is replaced by the mean of one of its two opposing
//! neighbour pairs. The pairs only ever touch other lattices, so every pixel
//! reads the incoming plane and rows are filled independently.
use super::CurvatureStage;
use crate::image::{Grid, SampleSource};

/// Seeded value of `plane(x, y)` for `stage`.
///
/// `p1` averages the `(-1, -1 + s)`/`(1, 1 - s)` neighbours and `p2` the
/// `(1 - s, -1)`/`(-1 + s, 1)` ones. When the pixel is far enough from the
/// border and both pair steps, as well as `|p1 - p2|`, stay below
/// `max_edge_step`, a twelve-sample curvature comparison picks the pair;
/// otherwise the pair with the smaller step wins.
pub fn fcbi_value(
    plane: &Grid,
    x: isize,
    y: isize,
    stage: CurvatureStage,
    max_edge_step: f64,
) -> f64 {
    let s = stage.offset();
    let get = |dx: isize, dy: isize| plane.sample(x + dx, y + dy, 0);
    let (a1, b1) = (get(-1, -1 + s), get(1, 1 - s));
    let (a2, b2) = (get(1 - s, -1), get(-1 + s, 1));
    let v1 = (a1 - b1).abs();
    let v2 = (a2 - b2).abs();
    let p1 = (a1 + b1) / 2.0;
    let p2 = (a2 + b2) / 2.0;

    let reach = 3 - s;
    let inside = x >= reach
        && y >= reach
        && x + reach < plane.w as isize
        && y + reach < plane.h as isize;
    if inside && v1 < max_edge_step && v2 < max_edge_step && (p1 - p2).abs() < max_edge_step {
        let k1 = (get(-1 - s, -3 + 2 * s)
            + get(-3 + s, -1 + 2 * s)
            + get(1 + s, 3 - 2 * s)
            + get(3 - s, 1 - 2 * s)
            + 2.0 * p2
            - 6.0 * p1)
            .abs();
        let k2 = (get(-3 + 2 * s, 1 + s)
            + get(-1 + 2 * s, 3 - s)
            + get(3 - 2 * s, -1 - s)
            + get(1 - 2 * s, -3 + s)
            + 2.0 * p1
            - 6.0 * p2)
            .abs();
        if k1 > k2 {
            p1
        } else {
            p2
        }
    } else if v1 < v2 {
        p1
    } else {
        p2
    }
}

/// Re-interpolate every `stage` pixel of a single-channel plane.
pub fn fcbi_seed(plane: &Grid, stage: CurvatureStage, max_edge_step: f64) -> Grid {
    let mut out = plane.clone();
    let w = plane.w;
    out.for_each_row_chunk(1, |y, row| {
        for (x, v) in row.iter_mut().enumerate().take(w) {
            if stage.contains(x, y) {
                *v = fcbi_value(plane, x as isize, y as isize, stage, max_edge_step);
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(w: usize, f: impl Fn(usize, usize) -> f64) -> Grid {
        let data = (0..w * w).map(|i| f(i % w, i / w)).collect();
        Grid::from_vec(w, w, 1, data).unwrap()
    }

    #[test]
    fn valley_is_filled_along_its_floor() {
        let valley = plane(8, |x, y| 10.0 * (x as f64 - y as f64).abs());
        let seeded = fcbi_seed(&valley, CurvatureStage::Diagonal, 100.0);
        // p1 runs along the valley (0), p2 across it (20)
        assert_eq!(seeded.get(3, 3, 0), 0.0);
        // too close to the border for the curvature test: equal steps fall to p2
        assert_eq!(seeded.get(1, 1, 0), 20.0);
        for y in 0..8 {
            for x in 0..8 {
                if !CurvatureStage::Diagonal.contains(x, y) {
                    assert_eq!(seeded.get(x, y, 0), valley.get(x, y, 0));
                }
            }
        }
    }

    #[test]
    fn zero_edge_step_falls_back_to_the_smaller_step_pair() {
        let valley = plane(8, |x, y| 10.0 * (x as f64 - y as f64).abs());
        let seeded = fcbi_seed(&valley, CurvatureStage::Diagonal, 0.0);
        assert_eq!(seeded.get(3, 3, 0), 20.0);
    }

    #[test]
    fn diagonal_edges_pick_the_pair_running_along_them() {
        let main = plane(10, |x, y| if x > y { 80.0 } else { 0.0 });
        let seeded = fcbi_seed(&main, CurvatureStage::Diagonal, 100.0);
        assert_eq!(seeded.get(5, 5, 0), 0.0);
        assert_eq!(seeded.get(5, 3, 0), 80.0);

        let anti = plane(10, |x, y| if x + y > 9 { 80.0 } else { 0.0 });
        let seeded = fcbi_seed(&anti, CurvatureStage::Diagonal, 100.0);
        assert_eq!(seeded.get(5, 5, 0), 80.0);
    }

    #[test]
    fn axis_stage_uses_horizontal_and_vertical_pairs() {
        // constant rows with the axis lattice overwritten
        let rows = plane(8, |x, y| {
            if (x + y) % 2 == 1 {
                255.0
            } else {
                10.0 * (y * y) as f64
            }
        });
        let seeded = fcbi_seed(&rows, CurvatureStage::Axis, 0.0);
        // horizontal pair (40, 40) beats the vertical one (10, 90)
        assert_eq!(seeded.get(3, 2, 0), 40.0);
        assert_eq!(seeded.get(2, 3, 0), 90.0);
        assert_eq!(seeded.get(2, 2, 0), 40.0);
    }
}
