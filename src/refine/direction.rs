//! Orientation vocabulary and the 17-sample anti-dimension energies.
//!
//! Stencil layout around the source pixel (index 8):
//!
//! ```text
//!        0     1
//!     2  3  4  5  6
//!        7  8  9
//!    10 11 12 13 14
//!       15    16
//! ```
use crate::doubling::guard_epsilon;
use crate::image::SampleSource;
use serde::{Deserialize, Serialize};

/// One of the eight edge orientations the refiner can follow.
///
/// Declaration order is the canonical tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// 0:1
    Horizontal,
    /// 1:0
    Vertical,
    /// 1:1
    Diagonal,
    /// 1:-1
    AntiDiagonal,
    /// 1:2
    Shallow,
    /// 2:1
    Steep,
    /// 1:-2
    ShallowAnti,
    /// 2:-1
    SteepAnti,
}

impl Direction {
    pub const CANONICAL: [Direction; 8] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
        Direction::Shallow,
        Direction::Steep,
        Direction::ShallowAnti,
        Direction::SteepAnti,
    ];

    /// Directions ordered by angle; opposite entries are orthogonal.
    pub const RING: [Direction; 8] = [
        Direction::Horizontal,
        Direction::Shallow,
        Direction::Diagonal,
        Direction::Steep,
        Direction::Vertical,
        Direction::SteepAnti,
        Direction::AntiDiagonal,
        Direction::ShallowAnti,
    ];

    /// Position in [`Direction::CANONICAL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Position in [`Direction::RING`].
    pub fn ring_index(self) -> usize {
        match self {
            Direction::Horizontal => 0,
            Direction::Shallow => 1,
            Direction::Diagonal => 2,
            Direction::Steep => 3,
            Direction::Vertical => 4,
            Direction::SteepAnti => 5,
            Direction::AntiDiagonal => 6,
            Direction::ShallowAnti => 7,
        }
    }

    /// Ring lookup with wrap-around in both directions.
    #[inline]
    pub fn from_ring(i: isize) -> Direction {
        Self::RING[i.rem_euclid(8) as usize]
    }

    pub fn orthogonal(self) -> Direction {
        Self::from_ring(self.ring_index() as isize + 4)
    }

    /// Horizontal and vertical reuse the fused samples directly.
    #[inline]
    pub fn is_axis(self) -> bool {
        matches!(self, Direction::Horizontal | Direction::Vertical)
    }
}

/// Source offsets of the 17 stencil samples.
pub const STENCIL_OFFSETS: [(isize, isize); 17] = [
    (-1, -2),
    (1, -2),
    (-2, -1),
    (-1, -1),
    (0, -1),
    (1, -1),
    (2, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-2, 1),
    (-1, 1),
    (0, 1),
    (1, 1),
    (2, 1),
    (-1, 2),
    (1, 2),
];

struct EnergyPairs {
    full: &'static [(usize, usize)],
    half: &'static [(usize, usize)],
}

/// Stencil index pairs per direction, in canonical order.
const ENERGY_PAIRS: [EnergyPairs; 8] = [
    EnergyPairs {
        full: &[(7, 8), (8, 9)],
        half: &[(3, 4), (4, 5), (11, 12), (12, 13)],
    },
    EnergyPairs {
        full: &[(4, 8), (8, 12)],
        half: &[(3, 7), (7, 11), (5, 9), (9, 13)],
    },
    EnergyPairs {
        full: &[(3, 8), (8, 13), (4, 9), (7, 12)],
        half: &[],
    },
    EnergyPairs {
        full: &[(5, 8), (8, 11), (4, 7), (9, 12)],
        half: &[],
    },
    EnergyPairs {
        full: &[(2, 8), (8, 14), (3, 9), (7, 13)],
        half: &[],
    },
    EnergyPairs {
        full: &[(0, 8), (8, 16), (4, 13), (3, 12)],
        half: &[],
    },
    EnergyPairs {
        full: &[(6, 8), (8, 10), (5, 7), (9, 11)],
        half: &[],
    },
    EnergyPairs {
        full: &[(1, 8), (8, 15), (4, 11), (5, 12)],
        half: &[],
    },
];

/// Anti-dimension energy per direction: total variation measured across the
/// direction. Low energy means the neighbourhood is smooth along it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DirectionEnergies(pub [f64; 8]);

impl DirectionEnergies {
    #[inline]
    pub fn get(&self, dir: Direction) -> f64 {
        self.0[dir.index()]
    }

    /// Energy at a (wrapping) ring position.
    #[inline]
    pub fn ring(&self, i: isize) -> f64 {
        self.get(Direction::from_ring(i))
    }

    /// Direction of minimum energy; exact ties go to the canonically first.
    pub fn dominant(&self) -> Direction {
        let min = self.0.iter().copied().fold(f64::INFINITY, f64::min);
        Direction::CANONICAL
            .into_iter()
            .find(|&d| self.get(d) == min)
            .unwrap_or(Direction::Horizontal)
    }
}

/// Read the 17-sample stencil around `(x, y)` with clamped addressing.
pub fn gather_stencil<S: SampleSource + ?Sized>(
    source: &S,
    x: isize,
    y: isize,
    c: usize,
) -> [f64; 17] {
    let mut stencil = [0.0; 17];
    for (slot, &(dx, dy)) in stencil.iter_mut().zip(STENCIL_OFFSETS.iter()) {
        *slot = source.sample(x + dx, y + dy, c);
    }
    stencil
}

/// Compute the eight anti-dimension energies of one stencil.
pub fn stencil_energies(stencil: &[f64; 17], max_value: f64) -> DirectionEnergies {
    let eps = guard_epsilon(max_value);
    let variation = |pairs: &[(usize, usize)]| {
        pairs
            .iter()
            .fold(0.0, |acc, &(i, j)| acc + (stencil[i] - stencil[j]).abs())
    };
    let mut energies = [0.0; 8];
    for (e, pairs) in energies.iter_mut().zip(ENERGY_PAIRS.iter()) {
        *e = variation(pairs.full) + 0.5 * variation(pairs.half) + eps;
    }
    DirectionEnergies(energies)
}
