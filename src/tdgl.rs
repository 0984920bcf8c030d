// src/tdgl.rs
//
// Right-hand side of the time-dependent Ginzburg–Landau equation for P_z:
//
//   dP/dt = -Γ [ αP + βP³ + γP⁵ - g44 (∂²P/∂x² + ∂²P/∂y²) - g11 ∂²P/∂z² + ∂φ/∂z ]
//
// In-plane derivatives are plain centered differences (x/y are expected to be
// periodic or ghost-filled). The z terms depend on where the cell sits:
//
// | position                    | g11 ∂²P/∂z²                       | ∂φ/∂z                               |
// |-----------------------------|-----------------------------------|-------------------------------------|
// | bottom electrode            | 0                                 | (-4φ_lo + 3φ + φ(k+1)) / (3 dz)     |
// | SC or DE                    | 0                                 | centered                            |
// | FE, above DE/FE face        | g11 · low-side BC curvature       | centered                            |
// | FE, top electrode           | g11 · high-side BC curvature      | (4φ_hi - 3φ - φ(k-1)) / (3 dz)      |
// | FE bulk                     | g11 · 3-point second difference   | centered                            |
//
// Time integration is the caller's business.

use crate::field::ScalarField3D;
use crate::grid::{Axis, Grid3D};
use crate::layers::{Layer, LayerStack, Side};
use crate::parallel::ParallelFor;
use crate::params::{FerroParams, PhiBc};

/// Fill `gl_rhs` with dP/dt evaluated from `p_old` and `phi`.
///
/// `gam` is the per-cell kinetic coefficient Γ.
pub fn calculate_tdgl_rhs<P: ParallelFor>(
    gl_rhs: &mut ScalarField3D,
    p_old: &ScalarField3D,
    phi: &ScalarField3D,
    gam: &ScalarField3D,
    stack: &LayerStack,
    ferro: &FerroParams,
    phi_bc: &PhiBc,
    geom: &Grid3D,
    exec: &P,
) {
    let [dx, dy, dz] = geom.cell_size();
    let lambda = ferro.lambda;

    for bx in gl_rhs.boxes().to_vec() {
        exec.for_each_cell(gl_rhs, bx, |i, j, k, v| {
            let pos = stack.classify(geom, k);
            let p = p_old.get(i, j, k);
            let phi_c = phi.get(i, j, k);
            let phi_centered = || (phi.get(i, j, k + 1) - phi.get(i, j, k - 1)) / (2.0 * dz);

            let (grad_term, phi_term) = if pos.bottom {
                let phi_up = phi.get(i, j, k + 1);
                (0.0, (-4.0 * phi_bc.lo + 3.0 * phi_c + phi_up) / (3.0 * dz))
            } else if pos.layer != Layer::Ferroelectric {
                (0.0, phi_centered())
            } else if pos.fe_interface {
                let p_up = p_old.get(i, j, k + 1);
                let d2p_z = ferro.p_bc_lo.face_curvature(Side::Lo, p, p_up, dz, lambda);
                (ferro.g11 * d2p_z, phi_centered())
            } else if pos.top {
                let p_dn = p_old.get(i, j, k - 1);
                let d2p_z = ferro.p_bc_hi.face_curvature(Side::Hi, p, p_dn, dz, lambda);
                let phi_dn = phi.get(i, j, k - 1);
                (
                    ferro.g11 * d2p_z,
                    (4.0 * phi_bc.hi - 3.0 * phi_c - phi_dn) / (3.0 * dz),
                )
            } else {
                let d2p_z =
                    (p_old.get(i, j, k + 1) - 2.0 * p + p_old.get(i, j, k - 1)) / (dz * dz);
                (ferro.g11 * d2p_z, phi_centered())
            };

            let d2p_x = (p_old.get(i + 1, j, k) - 2.0 * p + p_old.get(i - 1, j, k)) / (dx * dx);
            let d2p_y = (p_old.get(i, j + 1, k) - 2.0 * p + p_old.get(i, j - 1, k)) / (dy * dy);

            *v = -gam.get(i, j, k)
                * (landau_force(ferro, p) - ferro.g44 * d2p_x - ferro.g44 * d2p_y - grad_term
                    + phi_term);
        });
    }
}

/// Landau free-energy density derivative αP + βP³ + γP⁵ (the local part of the RHS).
#[inline]
pub fn landau_force(ferro: &FerroParams, p: f64) -> f64 {
    ferro.alpha * p + ferro.beta * p.powi(3) + ferro.gamma * p.powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::PolarizationBc;

    #[test]
    fn landau_force_is_odd() {
        let f = FerroParams {
            alpha: -1.0,
            beta: 2.0,
            gamma: 0.5,
            g11: 0.0,
            g44: 0.0,
            lambda: 1.0,
            mobility: 1.0,
            p_bc_lo: PolarizationBc::Free,
            p_bc_hi: PolarizationBc::Free,
        };
        assert_eq!(landau_force(&f, 0.7), -landau_force(&f, -0.7));
        assert_eq!(landau_force(&f, 1.0), 1.5);
    }
}
