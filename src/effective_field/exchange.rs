// src/effective_field/exchange.rs
//
// Exchange induction from the Ms-masked Laplacian:
//
//   B_ex = (2 A / Ms) ∇² m        (Tesla; m is the unit magnetisation)
//
// Each component of m is differentiated independently, but all three share the
// same Ms face indicators. Outside material (Ms == 0) the contribution is zero.
//
// Preconditions: `m` and `ms` ghost cells are synchronised (fill_boundary) and
// non-periodic ghosts of `ms` are zero, so domain walls act as vacuum.

use crate::field::{ScalarField3D, VectorField3D};
use crate::grid::{Axis, Grid3D};
use crate::parallel::ParallelFor;
use crate::stencil::{laplacian_mag, MsFaces};

/// Write the masked Laplacian of `f` into `out` on every owned cell where Ms != 0
/// (0 elsewhere).
pub fn laplacian_mag_field<P: ParallelFor>(
    out: &mut ScalarField3D,
    f: &ScalarField3D,
    ms: &ScalarField3D,
    geom: &Grid3D,
    exec: &P,
) {
    for bx in out.boxes().to_vec() {
        exec.for_each_cell(out, bx, |i, j, k, v| {
            *v = if ms.get(i, j, k) == 0.0 {
                0.0
            } else {
                let faces = MsFaces::from_field(ms, i, j, k);
                laplacian_mag(f, &faces, i, j, k, geom)
            };
        });
    }
}

/// Add the exchange induction to `b_eff` in place.
pub fn add_exchange_field<P: ParallelFor>(
    b_eff: &mut VectorField3D,
    m: &VectorField3D,
    ms: &ScalarField3D,
    exchange: &ScalarField3D,
    geom: &Grid3D,
    exec: &P,
) {
    for axis in Axis::ALL {
        let mc = m.component(axis);
        let out = b_eff.component_mut(axis);
        for bx in out.boxes().to_vec() {
            exec.for_each_cell(out, bx, |i, j, k, b| {
                let ms_c = ms.get(i, j, k);
                if ms_c == 0.0 {
                    return;
                }
                let faces = MsFaces::from_field(ms, i, j, k);
                let coeff = 2.0 * exchange.get(i, j, k) / ms_c;
                *b += coeff * laplacian_mag(mc, &faces, i, j, k, geom);
            });
        }
    }
}
