// src/materials.rs
//
// Spatially varying magnetic property fields.
//
// All five fields are cleared to background (0) first, then every owned cell whose
// center lies strictly inside the magnetic region gets the material value. Cells
// whose center falls exactly on a region face stay background. Ghost cells are
// synchronised at the end so that the Ms face indicators read by the masked
// Laplacian agree across tile seams and periodic edges.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field::ScalarField3D;
use crate::grid::Grid3D;
use crate::parallel::ParallelFor;

/// Axis-aligned physical box [lo, hi].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionBox {
    pub lo: [f64; 3],
    pub hi: [f64; 3],
}

impl RegionBox {
    pub fn new(lo: [f64; 3], hi: [f64; 3]) -> Self {
        debug_assert!((0..3).all(|a| lo[a] < hi[a]), "region lo must be < hi");
        Self { lo, hi }
    }

    /// lo < p < hi on all three axes.
    #[inline]
    pub fn contains_strict(&self, p: [f64; 3]) -> bool {
        (0..3).all(|a| p[a] > self.lo[a] && p[a] < self.hi[a])
    }
}

impl Default for RegionBox {
    /// 4 nm cube centered in x/y, 8–12 nm in z.
    fn default() -> Self {
        Self {
            lo: [-2.0e-9, -2.0e-9, 8.0e-9],
            hi: [2.0e-9, 2.0e-9, 12.0e-9],
        }
    }
}

/// Uniform material values of the magnetic region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticValues {
    /// Gilbert damping
    pub alpha: f64,
    /// Saturation magnetisation (A/m)
    pub ms: f64,
    /// Gyromagnetic ratio (rad/(s·T))
    pub gamma: f64,
    /// Exchange stiffness A (J/m)
    pub exchange: f64,
    /// Uniaxial anisotropy K_u (J/m^3)
    pub anisotropy: f64,
}

impl Default for MagneticValues {
    fn default() -> Self {
        Self {
            alpha: 0.02,
            ms: 8.0e5,
            gamma: 1.760_859_630_23e11,
            exchange: 1.3e-11,
            anisotropy: 5.0e4,
        }
    }
}

/// The five per-cell magnetic property fields.
#[derive(Debug, Clone)]
pub struct MagneticProperties {
    pub alpha: ScalarField3D,
    pub ms: ScalarField3D,
    pub gamma: ScalarField3D,
    pub exchange: ScalarField3D,
    pub anisotropy: ScalarField3D,
}

impl MagneticProperties {
    pub fn new(grid: &Grid3D, ng: usize, max_grid_size: [usize; 3]) -> Self {
        let f = ScalarField3D::cell_centered(grid, ng, max_grid_size);
        Self {
            alpha: f.clone(),
            ms: f.clone(),
            gamma: f.clone(),
            exchange: f.clone(),
            anisotropy: f,
        }
    }

    pub fn fields_mut(&mut self) -> [&mut ScalarField3D; 5] {
        [
            &mut self.alpha,
            &mut self.ms,
            &mut self.gamma,
            &mut self.exchange,
            &mut self.anisotropy,
        ]
    }
}

/// Fill the property fields from `values` inside `region`, background 0 elsewhere.
///
/// Returns the number of owned cells classified as material.
pub fn initialize_magnetic_properties<P: ParallelFor>(
    props: &mut MagneticProperties,
    values: &MagneticValues,
    region: &RegionBox,
    geom: &Grid3D,
    exec: &P,
) -> usize {
    let vals = [
        values.alpha,
        values.ms,
        values.gamma,
        values.exchange,
        values.anisotropy,
    ];

    for f in props.fields_mut() {
        f.set_val(0.0);
    }

    for (f, val) in props.fields_mut().into_iter().zip(vals) {
        for bx in f.boxes().to_vec() {
            exec.for_each_cell(f, bx, |i, j, k, v| {
                if region.contains_strict(geom.cell_center(i, j, k)) {
                    *v = val;
                }
            });
        }
    }

    for f in props.fields_mut() {
        f.fill_boundary(geom);
    }

    let b = props.ms.valid_box();
    let mut n_mat = 0usize;
    for k in b.lo[2]..b.hi[2] {
        for j in b.lo[1]..b.hi[1] {
            for i in b.lo[0]..b.hi[0] {
                if region.contains_strict(geom.cell_center(i, j, k)) {
                    n_mat += 1;
                }
            }
        }
    }
    debug!(
        material_cells = n_mat,
        total_cells = geom.n_cells(),
        ?region,
        "initialized magnetic properties"
    );
    n_mat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::Executor;

    #[test]
    fn region_is_strict() {
        let r = RegionBox::new([0.0; 3], [1.0; 3]);
        assert!(r.contains_strict([0.5, 0.5, 0.5]));
        assert!(!r.contains_strict([0.0, 0.5, 0.5]));
        assert!(!r.contains_strict([0.5, 1.0, 0.5]));
    }

    #[test]
    fn periodic_ghosts_see_material_across_seam() {
        let g = Grid3D::new([4, 4, 2], [0.0; 3], [4.0, 4.0, 2.0], [true, true, false]);
        let mut props = MagneticProperties::new(&g, 1, [2, 2, 2]);
        let values = MagneticValues {
            alpha: 0.02,
            ms: 8.0e5,
            gamma: 1.76e11,
            exchange: 1.3e-11,
            anisotropy: 0.0,
        };
        // Only the last x column (center x = 3.5) is magnetic.
        let region = RegionBox::new([3.0, -1.0, -1.0], [4.5, 5.0, 3.0]);
        let n = initialize_magnetic_properties(&mut props, &values, &region, &g, &Executor::Serial);
        assert_eq!(n, 4 * 2);

        // Ghost at i = -1 is the periodic image of i = 3.
        assert_eq!(props.ms.get(-1, 0, 0), 8.0e5);
        assert_eq!(props.ms.get(0, 0, 0), 0.0);
        // z is not periodic: ghosts stay background.
        assert_eq!(props.ms.get(3, 0, -1), 0.0);
        assert_eq!(props.alpha.get(3, 2, 1), 0.02);
    }
}
