// src/field.rs
//
// Field containers on a Grid3D with ghost layers.
//
// Layout: x fastest, then y, then z, over the *allocated* extent (valid + ghosts),
// so one x-row of the allocation is a contiguous slice. The parallel-for backend
// relies on that to hand out disjoint rows.
//
// `boxes()` is the list of owned sub-regions (tiles of the valid box). Kernels are
// launched per box; ghost values are only consistent after `fill_boundary`.

use crate::box3::Box3i;
use crate::grid::{Axis, Grid3D};

/// Real-valued field sampled on every cell (or face) of a Grid3D.
#[derive(Debug, Clone)]
pub struct ScalarField3D {
    n: [usize; 3],
    ng: usize,
    nodal: Option<Axis>,
    pub data: Vec<f64>,
    boxes: Vec<Box3i>,
}

impl ScalarField3D {
    /// Cell-centered field with `ng` ghost layers, zero-initialised.
    pub fn cell_centered(grid: &Grid3D, ng: usize, max_grid_size: [usize; 3]) -> Self {
        Self::with_extent(grid.n_cell, ng, None, max_grid_size)
    }

    /// Face-centered field living on the faces normal to `axis`
    /// (n_cell + 1 nodes along that axis).
    pub fn face_centered(grid: &Grid3D, axis: Axis, ng: usize, max_grid_size: [usize; 3]) -> Self {
        let nodes = Box3i::from_size(grid.n_cell).surrounding_nodes(axis);
        let n = [nodes.len(Axis::X), nodes.len(Axis::Y), nodes.len(Axis::Z)];
        Self::with_extent(n, ng, Some(axis), max_grid_size)
    }

    fn with_extent(n: [usize; 3], ng: usize, nodal: Option<Axis>, max_grid_size: [usize; 3]) -> Self {
        let len = (n[0] + 2 * ng) * (n[1] + 2 * ng) * (n[2] + 2 * ng);
        let boxes = Box3i::from_size(n).chop(max_grid_size);
        Self {
            n,
            ng,
            nodal,
            data: vec![0.0; len],
            boxes,
        }
    }

    /// Valid extent per axis.
    #[inline]
    pub fn extent(&self) -> [usize; 3] {
        self.n
    }

    #[inline]
    pub fn n_ghost(&self) -> usize {
        self.ng
    }

    #[inline]
    pub fn nodal_axis(&self) -> Option<Axis> {
        self.nodal
    }

    /// Allocated row length along x (valid + 2 * ghost).
    #[inline]
    pub fn row_len(&self) -> usize {
        self.n[0] + 2 * self.ng
    }

    /// Number of allocated rows per z-plane.
    #[inline]
    pub fn rows_per_plane(&self) -> usize {
        self.n[1] + 2 * self.ng
    }

    /// Owned sub-regions (disjoint tiles of the valid box).
    #[inline]
    pub fn boxes(&self) -> &[Box3i] {
        &self.boxes
    }

    #[inline]
    pub fn valid_box(&self) -> Box3i {
        Box3i::from_size(self.n)
    }

    /// Valid box plus all ghost layers.
    #[inline]
    pub fn grown_box(&self) -> Box3i {
        self.valid_box().grow(self.ng)
    }

    /// Flat index into `data` for signed indices (ghosts are negative / >= n).
    #[inline]
    pub fn idx(&self, i: isize, j: isize, k: isize) -> usize {
        debug_assert!(
            self.grown_box().contains(i, j, k),
            "index ({}, {}, {}) outside allocated box {:?}",
            i,
            j,
            k,
            self.grown_box()
        );
        let g = self.ng as isize;
        let sx = self.row_len();
        let sy = self.rows_per_plane();
        (((k + g) as usize) * sy + (j + g) as usize) * sx + (i + g) as usize
    }

    #[inline]
    pub fn get(&self, i: isize, j: isize, k: isize) -> f64 {
        self.data[self.idx(i, j, k)]
    }

    #[inline]
    pub fn set(&mut self, i: isize, j: isize, k: isize, v: f64) {
        let id = self.idx(i, j, k);
        self.data[id] = v;
    }

    #[inline]
    pub fn get_mut(&mut self, i: isize, j: isize, k: isize) -> &mut f64 {
        let id = self.idx(i, j, k);
        &mut self.data[id]
    }

    /// Set every value, ghosts included.
    pub fn set_val(&mut self, v: f64) {
        self.data.fill(v);
    }

    /// Fill ghost cells from periodic images along every periodic axis.
    ///
    /// Axes are processed in order over the full allocated extent of the other
    /// axes, so edge and corner ghosts pick up values filled by earlier axes.
    /// Ghosts along non-periodic axes are left untouched (physical boundary
    /// conditions own them).
    pub fn fill_boundary(&mut self, grid: &Grid3D) {
        if self.ng == 0 {
            return;
        }
        let g = self.ng as isize;
        let full = self.grown_box();

        for axis in Axis::ALL {
            if !grid.is_periodic(axis) {
                continue;
            }
            let a = axis.index();
            let period = grid.n_cell[a] as isize;
            let n = self.n[a] as isize;
            debug_assert!(period >= g, "periodic axis {:?} shorter than ghost width", axis);

            let (b, c) = match axis {
                Axis::X => (1, 2),
                Axis::Y => (0, 2),
                Axis::Z => (0, 1),
            };

            for ghost in (-g..0).chain(n..n + g) {
                let src = if ghost < 0 { ghost + period } else { ghost - period };
                for q in full.lo[c]..full.hi[c] {
                    for p in full.lo[b]..full.hi[b] {
                        let mut dst = [0isize; 3];
                        dst[a] = ghost;
                        dst[b] = p;
                        dst[c] = q;
                        let mut from = dst;
                        from[a] = src;
                        let v = self.get(from[0], from[1], from[2]);
                        self.set(dst[0], dst[1], dst[2], v);
                    }
                }
            }
        }
    }

    /// Maximum absolute value over the valid region.
    pub fn max_abs_valid(&self) -> f64 {
        let b = self.valid_box();
        let mut m = 0.0f64;
        for k in b.lo[2]..b.hi[2] {
            for j in b.lo[1]..b.hi[1] {
                for i in b.lo[0]..b.hi[0] {
                    m = m.max(self.get(i, j, k).abs());
                }
            }
        }
        m
    }

    /// Sum over the valid region.
    pub fn sum_valid(&self) -> f64 {
        let b = self.valid_box();
        let mut s = 0.0;
        for k in b.lo[2]..b.hi[2] {
            for j in b.lo[1]..b.hi[1] {
                for i in b.lo[0]..b.hi[0] {
                    s += self.get(i, j, k);
                }
            }
        }
        s
    }
}

/// Three-component field (e.g. magnetisation), one ScalarField3D per component.
#[derive(Debug, Clone)]
pub struct VectorField3D {
    pub x: ScalarField3D,
    pub y: ScalarField3D,
    pub z: ScalarField3D,
}

impl VectorField3D {
    /// Cell-centered vector field, zero-initialised.
    pub fn new(grid: &Grid3D, ng: usize, max_grid_size: [usize; 3]) -> Self {
        let c = ScalarField3D::cell_centered(grid, ng, max_grid_size);
        Self {
            x: c.clone(),
            y: c.clone(),
            z: c,
        }
    }

    #[inline]
    pub fn component(&self, axis: Axis) -> &ScalarField3D {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    #[inline]
    pub fn component_mut(&mut self, axis: Axis) -> &mut ScalarField3D {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Set every cell (ghosts included) to (vx, vy, vz).
    pub fn set_uniform(&mut self, vx: f64, vy: f64, vz: f64) {
        self.x.set_val(vx);
        self.y.set_val(vy);
        self.z.set_val(vz);
    }

    pub fn fill_boundary(&mut self, grid: &Grid3D) {
        self.x.fill_boundary(grid);
        self.y.fill_boundary(grid);
        self.z.fill_boundary(grid);
    }

    /// Initialise a 180° Bloch wall along x inside cells where `ms != 0`;
    /// cells outside material get m = 0.
    ///
    /// - `x0`   : wall centre position (metres)
    /// - `width`: characteristic wall width
    ///
    /// m rotates in the x–z plane: mx in-plane, mz out-of-plane.
    pub fn init_bloch_wall(&mut self, grid: &Grid3D, ms: &ScalarField3D, x0: f64, width: f64) {
        let b = self.x.valid_box();
        for k in b.lo[2]..b.hi[2] {
            for j in b.lo[1]..b.hi[1] {
                for i in b.lo[0]..b.hi[0] {
                    if ms.get(i, j, k) == 0.0 {
                        self.x.set(i, j, k, 0.0);
                        self.y.set(i, j, k, 0.0);
                        self.z.set(i, j, k, 0.0);
                        continue;
                    }
                    let u = (grid.cell_center(i, j, k)[0] - x0) / width;

                    let mz = u.tanh();
                    let mx = 1.0 / u.cosh();
                    let norm = (mx * mx + mz * mz).sqrt();

                    self.x.set(i, j, k, mx / norm);
                    self.y.set(i, j, k, 0.0);
                    self.z.set(i, j, k, mz / norm);
                }
            }
        }
    }
}
