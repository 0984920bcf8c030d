// src/grid.rs

/// Coordinate axis of the 3D lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Index offset of the high-side neighbour along this axis.
    #[inline]
    pub fn unit(self) -> [isize; 3] {
        match self {
            Axis::X => [1, 0, 0],
            Axis::Y => [0, 1, 0],
            Axis::Z => [0, 0, 1],
        }
    }
}

/// Uniform 3D finite-difference grid over the box [prob_lo, prob_hi].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid3D {
    pub n_cell: [usize; 3],
    pub prob_lo: [f64; 3],
    pub prob_hi: [f64; 3],
    pub periodic: [bool; 3],
}

impl Grid3D {
    /// Create a grid with `n_cell` cells spanning [prob_lo, prob_hi].
    pub fn new(n_cell: [usize; 3], prob_lo: [f64; 3], prob_hi: [f64; 3], periodic: [bool; 3]) -> Self {
        let g = Self {
            n_cell,
            prob_lo,
            prob_hi,
            periodic,
        };
        debug_assert!(
            Axis::ALL.iter().all(|&a| g.spacing(a) > 0.0),
            "grid spacing must be positive (n_cell={:?}, lo={:?}, hi={:?})",
            n_cell,
            prob_lo,
            prob_hi
        );
        g
    }

    /// Uniform cell spacing along `axis`.
    #[inline]
    pub fn spacing(&self, axis: Axis) -> f64 {
        let a = axis.index();
        (self.prob_hi[a] - self.prob_lo[a]) / self.n_cell[a] as f64
    }

    /// (dx, dy, dz)
    #[inline]
    pub fn cell_size(&self) -> [f64; 3] {
        [
            self.spacing(Axis::X),
            self.spacing(Axis::Y),
            self.spacing(Axis::Z),
        ]
    }

    #[inline]
    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.periodic[axis.index()]
    }

    /// Total number of cells.
    pub fn n_cells(&self) -> usize {
        self.n_cell[0] * self.n_cell[1] * self.n_cell[2]
    }

    /// Physical cell-center coordinate for index (i, j, k).
    ///
    /// x = prob_lo + (i + 0.5) * dx; ghost indices (negative or >= n) extrapolate.
    #[inline]
    pub fn cell_center(&self, i: isize, j: isize, k: isize) -> [f64; 3] {
        let d = self.cell_size();
        [
            self.prob_lo[0] + (i as f64 + 0.5) * d[0],
            self.prob_lo[1] + (j as f64 + 0.5) * d[1],
            self.prob_lo[2] + (k as f64 + 0.5) * d[2],
        ]
    }

    /// Physical coordinate of node `i` along `axis` (x = prob_lo + i * dx).
    #[inline]
    pub fn node_coord(&self, axis: Axis, i: isize) -> f64 {
        self.prob_lo[axis.index()] + i as f64 * self.spacing(axis)
    }
}
