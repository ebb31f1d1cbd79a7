//! Weight resolution over the direction ring.
//!
//! Starting from the dominant direction, the energy is interpolated half-way
//! towards each ring neighbour with the cubic kernel. If one of those
//! in-between orientations is smoother than the dominant one, the weight is
//! split between the two directions it lies between. The share left to the
//! plain fused samples (`none`) is the ratio of the chosen energy to the
//! energy across it.
use super::direction::{Direction, DirectionEnergies};
use crate::kernel::{Kernel1D, CUBIC_4TAP};
use serde::Serialize;

/// Which candidate won the second-stage minimum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CascadeBranch {
    /// The dominant direction itself.
    Own,
    /// Half-way towards the previous ring neighbour.
    Previous,
    /// Half-way towards the next ring neighbour.
    Next,
}

/// Reconstruction weights; `none` plus all directions sums to one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DirectionWeights {
    pub none: f64,
    /// Indexed by [`Direction::index`].
    pub per_direction: [f64; 8],
}

impl DirectionWeights {
    #[inline]
    pub fn get(&self, dir: Direction) -> f64 {
        self.per_direction[dir.index()]
    }

    /// Weight applied to the fused sample as-is.
    #[inline]
    pub fn direct(&self) -> f64 {
        self.none + self.get(Direction::Horizontal) + self.get(Direction::Vertical)
    }

    pub fn total(&self) -> f64 {
        self.none + self.per_direction.iter().sum::<f64>()
    }
}

/// Cubic interpolation of four consecutive ring energies starting at `start`.
#[inline]
fn ring_cubic(energies: &DirectionEnergies, start: isize) -> f64 {
    let window = [
        energies.ring(start),
        energies.ring(start + 1),
        energies.ring(start + 2),
        energies.ring(start + 3),
    ];
    CUBIC_4TAP.apply_symmetric(&window)
}

/// Resolve reconstruction weights for `dominant`.
///
/// The split branches compare against `max_value` so that tiny energies do
/// not produce extreme ratios; `none` is capped at one because the cubic may
/// undershoot the opposite energy.
pub fn resolve_weights(
    energies: &DirectionEnergies,
    dominant: Direction,
    max_value: f64,
) -> (CascadeBranch, DirectionWeights) {
    let i = dominant.ring_index() as isize;
    let own = energies.ring(i);
    let prev = ring_cubic(energies, i - 2);
    let next = ring_cubic(energies, i - 1);
    let best = prev.min(own).min(next);

    let mut weights = DirectionWeights::default();
    let branch = if best == own {
        weights.none = own / energies.ring(i + 4);
        weights.per_direction[dominant.index()] = 1.0 - weights.none;
        CascadeBranch::Own
    } else if best == prev {
        let opposite = ring_cubic(energies, i + 2);
        weights.none = (prev.max(max_value) / opposite.max(max_value)).min(1.0);
        let share = (1.0 - weights.none) * 0.5;
        weights.per_direction[dominant.index()] = share;
        weights.per_direction[Direction::from_ring(i - 1).index()] = share;
        CascadeBranch::Previous
    } else {
        let opposite = ring_cubic(energies, i + 3);
        weights.none = (next.max(max_value) / opposite.max(max_value)).min(1.0);
        let share = (1.0 - weights.none) * 0.5;
        weights.per_direction[dominant.index()] = share;
        weights.per_direction[Direction::from_ring(i + 1).index()] = share;
        CascadeBranch::Next
    };
    (branch, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energies_from_ring(ring: [f64; 8]) -> DirectionEnergies {
        let mut e = [0.0; 8];
        for (i, v) in ring.into_iter().enumerate() {
            e[Direction::RING[i].index()] = v;
        }
        DirectionEnergies(e)
    }

    #[test]
    fn isolated_minimum_uses_own_branch() {
        // horizontal far below its neighbours, vertical high
        let energies = energies_from_ring([1.0, 10.0, 20.0, 30.0, 40.0, 30.0, 20.0, 10.0]);
        let (branch, w) = resolve_weights(&energies, Direction::Horizontal, 1.0);
        assert_eq!(branch, CascadeBranch::Own);
        assert!((w.none - 1.0 / 40.0).abs() < 1e-12);
        assert!((w.get(Direction::Horizontal) - 39.0 / 40.0).abs() < 1e-12);
        assert!((w.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn smooth_gap_towards_next_neighbour_splits_weight() {
        // diagonal and steep both low: the half-way orientation undercuts them
        let energies = energies_from_ring([60.0, 40.0, 5.0, 6.0, 60.0, 90.0, 100.0, 90.0]);
        let (branch, w) = resolve_weights(&energies, Direction::Diagonal, 1.0);
        assert_eq!(branch, CascadeBranch::Next);
        let share = w.get(Direction::Diagonal);
        assert!(share > 0.0);
        assert_eq!(share, w.get(Direction::Steep));
        assert!((w.total() - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&w.none));
    }

    #[test]
    fn smooth_gap_towards_previous_neighbour_splits_weight() {
        let energies = energies_from_ring([60.0, 6.0, 5.0, 40.0, 60.0, 90.0, 100.0, 90.0]);
        let (branch, w) = resolve_weights(&energies, Direction::Diagonal, 1.0);
        assert_eq!(branch, CascadeBranch::Previous);
        assert_eq!(w.get(Direction::Diagonal), w.get(Direction::Shallow));
        assert!((w.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn none_is_capped_when_opposite_interpolation_undershoots() {
        // the opposite interpolation dips below zero next to two large energies
        let energies = energies_from_ring([100.0, 20.0, 10.0, 10.5, 20.0, 100.0, 10.2, 10.2]);
        let (branch, w) = resolve_weights(&energies, Direction::Diagonal, 1.0);
        assert_eq!(branch, CascadeBranch::Next);
        assert_eq!(w.none, 1.0);
        assert!(w.per_direction.iter().all(|&v| v >= 0.0));
        assert!((w.total() - 1.0).abs() < 1e-12);
    }
}
