// src/stencil.rs
//
// One-sided differences and the Ms-masked Laplacian used by the exchange term.
//
// All functions are pure and read neighbours without bounds handling: the caller
// guarantees that (i±1, j±1, k±1) are valid or ghost cells that have been filled
// (`ScalarField3D::fill_boundary`) before the kernel runs.
//
// Masking policy per axis, from the saturation magnetisation of the low/high
// neighbours (Ms_lo, Ms_hi):
//
//   Ms_lo != 0, Ms_hi != 0  ->  (Up - Down) / d          (3-point second difference)
//   Ms_hi == 0              ->  (0  - Down) / d          (zero flux through the high face)
//   Ms_lo == 0              ->  (Up - 0   ) / d          (zero flux through the low face)
//
// The high side is tested first, so a cell with both neighbours empty takes the
// high-edge branch.

use crate::field::ScalarField3D;
use crate::grid::{Axis, Grid3D};

#[inline]
fn upward(f: &ScalarField3D, axis: Axis, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    let [di, dj, dk] = axis.unit();
    let inv_d = 1.0 / geom.spacing(axis);
    inv_d * (f.get(i + di, j + dj, k + dk) - f.get(i, j, k))
}

#[inline]
fn downward(f: &ScalarField3D, axis: Axis, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    let [di, dj, dk] = axis.unit();
    let inv_d = 1.0 / geom.spacing(axis);
    inv_d * (f.get(i, j, k) - f.get(i - di, j - dj, k - dk))
}

/// Forward difference along x: (F(i+1,j,k) - F(i,j,k)) / dx.
#[inline]
pub fn upward_dx(f: &ScalarField3D, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    upward(f, Axis::X, i, j, k, geom)
}

/// Backward difference along x: (F(i,j,k) - F(i-1,j,k)) / dx.
#[inline]
pub fn downward_dx(f: &ScalarField3D, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    downward(f, Axis::X, i, j, k, geom)
}

/// Forward difference along y.
#[inline]
pub fn upward_dy(f: &ScalarField3D, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    upward(f, Axis::Y, i, j, k, geom)
}

/// Backward difference along y.
#[inline]
pub fn downward_dy(f: &ScalarField3D, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    downward(f, Axis::Y, i, j, k, geom)
}

/// Forward difference along z.
#[inline]
pub fn upward_dz(f: &ScalarField3D, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    upward(f, Axis::Z, i, j, k, geom)
}

/// Backward difference along z.
#[inline]
pub fn downward_dz(f: &ScalarField3D, i: isize, j: isize, k: isize, geom: &Grid3D) -> f64 {
    downward(f, Axis::Z, i, j, k, geom)
}

/// Which second-difference variant applies along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskStencil {
    /// Both neighbours magnetic.
    Centered,
    /// Low neighbour empty: only the forward difference contributes.
    LowEdge,
    /// High neighbour empty (checked first): only the backward difference contributes.
    HighEdge,
}

impl MaskStencil {
    #[inline]
    pub fn classify(ms_lo: f64, ms_hi: f64) -> Self {
        if ms_hi == 0.0 {
            MaskStencil::HighEdge
        } else if ms_lo == 0.0 {
            MaskStencil::LowEdge
        } else {
            MaskStencil::Centered
        }
    }
}

/// Masked second derivative of `f` along `axis` at (i, j, k).
#[inline]
pub fn laplacian_axis_mag(
    f: &ScalarField3D,
    axis: Axis,
    ms_lo: f64,
    ms_hi: f64,
    i: isize,
    j: isize,
    k: isize,
    geom: &Grid3D,
) -> f64 {
    let inv_d = 1.0 / geom.spacing(axis);
    match MaskStencil::classify(ms_lo, ms_hi) {
        MaskStencil::HighEdge => inv_d * (0.0 - downward(f, axis, i, j, k, geom)),
        MaskStencil::LowEdge => inv_d * (upward(f, axis, i, j, k, geom) - 0.0),
        MaskStencil::Centered => {
            inv_d * (upward(f, axis, i, j, k, geom) - downward(f, axis, i, j, k, geom))
        }
    }
}

/// Masked ∂²F/∂x².
#[inline]
pub fn laplacian_dx_mag(
    f: &ScalarField3D,
    ms_lo_x: f64,
    ms_hi_x: f64,
    i: isize,
    j: isize,
    k: isize,
    geom: &Grid3D,
) -> f64 {
    laplacian_axis_mag(f, Axis::X, ms_lo_x, ms_hi_x, i, j, k, geom)
}

/// Masked ∂²F/∂y².
#[inline]
pub fn laplacian_dy_mag(
    f: &ScalarField3D,
    ms_lo_y: f64,
    ms_hi_y: f64,
    i: isize,
    j: isize,
    k: isize,
    geom: &Grid3D,
) -> f64 {
    laplacian_axis_mag(f, Axis::Y, ms_lo_y, ms_hi_y, i, j, k, geom)
}

/// Masked ∂²F/∂z².
#[inline]
pub fn laplacian_dz_mag(
    f: &ScalarField3D,
    ms_lo_z: f64,
    ms_hi_z: f64,
    i: isize,
    j: isize,
    k: isize,
    geom: &Grid3D,
) -> f64 {
    laplacian_axis_mag(f, Axis::Z, ms_lo_z, ms_hi_z, i, j, k, geom)
}

/// Material-presence indicators of the six face neighbours of a cell.
///
/// They describe geometry, not the field, so one set is shared by all three
/// magnetisation components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MsFaces {
    pub lo: [f64; 3],
    pub hi: [f64; 3],
}

impl MsFaces {
    pub fn new(
        ms_lo_x: f64,
        ms_hi_x: f64,
        ms_lo_y: f64,
        ms_hi_y: f64,
        ms_lo_z: f64,
        ms_hi_z: f64,
    ) -> Self {
        Self {
            lo: [ms_lo_x, ms_lo_y, ms_lo_z],
            hi: [ms_hi_x, ms_hi_y, ms_hi_z],
        }
    }

    /// Gather Ms(i±1, j, k), Ms(i, j±1, k), Ms(i, j, k±1).
    #[inline]
    pub fn from_field(ms: &ScalarField3D, i: isize, j: isize, k: isize) -> Self {
        Self {
            lo: [ms.get(i - 1, j, k), ms.get(i, j - 1, k), ms.get(i, j, k - 1)],
            hi: [ms.get(i + 1, j, k), ms.get(i, j + 1, k), ms.get(i, j, k + 1)],
        }
    }
}

/// Masked Laplacian of one scalar component: sum of the three per-axis terms.
#[inline]
pub fn laplacian_mag(
    f: &ScalarField3D,
    faces: &MsFaces,
    i: isize,
    j: isize,
    k: isize,
    geom: &Grid3D,
) -> f64 {
    laplacian_dx_mag(f, faces.lo[0], faces.hi[0], i, j, k, geom)
        + laplacian_dy_mag(f, faces.lo[1], faces.hi[1], i, j, k, geom)
        + laplacian_dz_mag(f, faces.lo[2], faces.hi[2], i, j, k, geom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_x(values: &[f64], dx: f64) -> (Grid3D, ScalarField3D) {
        let n = values.len();
        let g = Grid3D::new([n, 1, 1], [0.0; 3], [n as f64 * dx, 1.0, 1.0], [false; 3]);
        let mut f = ScalarField3D::cell_centered(&g, 1, [n, 1, 1]);
        for (i, &v) in values.iter().enumerate() {
            f.set(i as isize, 0, 0, v);
        }
        (g, f)
    }

    #[test]
    fn one_sided_differences() {
        let (g, f) = line_x(&[0.0, 1.0, 4.0, 9.0], 0.5);
        assert_eq!(upward_dx(&f, 1, 0, 0, &g), 6.0);
        assert_eq!(downward_dx(&f, 1, 0, 0, &g), 2.0);
    }

    #[test]
    fn classify_prefers_high_edge() {
        assert_eq!(MaskStencil::classify(1.0, 1.0), MaskStencil::Centered);
        assert_eq!(MaskStencil::classify(0.0, 1.0), MaskStencil::LowEdge);
        assert_eq!(MaskStencil::classify(1.0, 0.0), MaskStencil::HighEdge);
        assert_eq!(MaskStencil::classify(0.0, 0.0), MaskStencil::HighEdge);
    }

    #[test]
    fn parabola_profile_matches_hand_values() {
        // F = x², dx = 1; film spans the whole line.
        let (g, f) = line_x(&[0.0, 1.0, 4.0, 9.0, 16.0], 1.0);
        let ms = 8.0e5;
        let expected = [1.0, 2.0, 2.0, 2.0, -7.0];
        for i in 0..5isize {
            let ms_lo = if i == 0 { 0.0 } else { ms };
            let ms_hi = if i == 4 { 0.0 } else { ms };
            let got = laplacian_dx_mag(&f, ms_lo, ms_hi, i, 0, 0, &g);
            assert_eq!(got, expected[i as usize], "i={}", i);
        }
    }

    #[test]
    fn high_edge_ignores_high_neighbour() {
        let (g, mut f) = line_x(&[0.3, -1.2, 2.5], 0.1);
        let before = laplacian_dx_mag(&f, 1.0, 0.0, 1, 0, 0, &g);
        f.set(2, 0, 0, 1.0e6);
        let after = laplacian_dx_mag(&f, 1.0, 0.0, 1, 0, 0, &g);
        assert_eq!(before, after);
    }

    #[test]
    fn y_and_z_use_their_own_spacing() {
        let g = Grid3D::new([1, 3, 3], [0.0; 3], [1.0, 3.0, 1.5], [false; 3]);
        let mut f = ScalarField3D::cell_centered(&g, 1, [4, 4, 4]);
        for j in 0..3isize {
            for k in 0..3isize {
                f.set(0, j, k, (j * j) as f64 + 10.0 * (k * k) as f64);
            }
        }
        // d²/dy² of j² with dy=1 -> 2; d²/dz² of 10 k² with dz=0.5 -> 20/0.25 = 80
        assert_eq!(laplacian_dy_mag(&f, 1.0, 1.0, 0, 1, 1, &g), 2.0);
        assert_eq!(laplacian_dz_mag(&f, 1.0, 1.0, 0, 1, 1, &g), 80.0);
        assert_eq!(upward_dy(&f, 0, 1, 1, &g), 3.0);
        assert_eq!(downward_dz(&f, 0, 1, 1, &g), 20.0);
        assert_eq!(upward_dz(&f, 0, 1, 1, &g), 60.0);
        assert_eq!(downward_dy(&f, 0, 1, 1, &g), 1.0);
    }
}
