// src/effective_field/anisotropy.rs

use crate::field::{ScalarField3D, VectorField3D};
use crate::grid::Axis;
use crate::parallel::ParallelFor;

/// Add uniaxial anisotropy contribution to B_eff (Tesla), cell by cell.
///
/// For w_ani = K_u [1 - (m·u)^2], we get:
///   B_ani = (2 K_u / M_s) (m·u) u
///
/// K_u and M_s come from the property fields; cells with M_s == 0 are skipped.
pub fn add_uniaxial_anisotropy_field<P: ParallelFor>(
    b_eff: &mut VectorField3D,
    m: &VectorField3D,
    ms: &ScalarField3D,
    k_u: &ScalarField3D,
    easy_axis: [f64; 3],
    exec: &P,
) {
    let u = easy_axis;
    for axis in Axis::ALL {
        let ua = u[axis.index()];
        if ua == 0.0 {
            continue;
        }
        let out = b_eff.component_mut(axis);
        for bx in out.boxes().to_vec() {
            exec.for_each_cell(out, bx, |i, j, k, b| {
                let ms_c = ms.get(i, j, k);
                let k_c = k_u.get(i, j, k);
                if ms_c == 0.0 || k_c == 0.0 {
                    return;
                }
                let mdotu =
                    m.x.get(i, j, k) * u[0] + m.y.get(i, j, k) * u[1] + m.z.get(i, j, k) * u[2];
                *b += 2.0 * k_c / ms_c * mdotu * ua;
            });
        }
    }
}
