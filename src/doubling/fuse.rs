use super::axis::{double_axis, Axis};
use crate::image::{Grid, SampleSource};

/// Average the row-first and column-first 2×2 doublings of `source`.
///
/// Either order alone biases edges towards the axis doubled last; their mean
/// treats both axes alike.
pub fn fuse_orientations<S: SampleSource + ?Sized>(source: &S, max_value: f64) -> Grid {
    let mut fused = double_axis(
        &double_axis(source, Axis::Vertical, max_value),
        Axis::Horizontal,
        max_value,
    );
    let other = double_axis(
        &double_axis(source, Axis::Horizontal, max_value),
        Axis::Vertical,
        max_value,
    );
    let row_len = fused.row_len();
    fused.for_each_row_chunk(1, |y, row| {
        let other_row = &other.data[y * row_len..(y + 1) * row_len];
        for (v, o) in row.iter_mut().zip(other_row) {
            *v = (*v + *o) * 0.5;
        }
    });
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_input_stays_flat() {
        let src = Grid::filled(4, 3, 2, 0.25);
        let fused = fuse_orientations(&src, 1.0);
        assert_eq!(fused.shape(), (8, 6, 2));
        assert!(fused.data.iter().all(|&v| (v - 0.25).abs() < 1e-15));
    }

    #[test]
    fn transposed_input_gives_transposed_output() {
        let data = vec![0.0, 0.7, 0.1, 0.9, 0.4, 0.3];
        let src = Grid::from_vec(3, 2, 1, data.clone()).unwrap();
        let mut transposed = Grid::new(2, 3, 1);
        for y in 0..2 {
            for x in 0..3 {
                transposed.set(y, x, 0, src.get(x, y, 0));
            }
        }
        let a = fuse_orientations(&src, 1.0);
        let b = fuse_orientations(&transposed, 1.0);
        for y in 0..a.h {
            for x in 0..a.w {
                assert!((a.get(x, y, 0) - b.get(y, x, 0)).abs() < 1e-12);
            }
        }
    }
}
