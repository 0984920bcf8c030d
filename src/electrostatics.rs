// src/electrostatics.rs
//
// Pieces of the electrostatic solve that depend on the layer stack:
//
//   - space charge in the semiconductor (Boltzmann carriers),
//   - the Poisson right-hand side, including -dP/dz with the polarization BCs
//     injected at the FE edges,
//   - E = -∇phi with one-sided z differences at the electrodes,
//   - Dirichlet electrode values written into the z ghost cells of phi,
//   - face-centered permittivity for the variable-coefficient Poisson operator.
//
// The Poisson solve itself lives outside this crate. Every kernel reads neighbours
// of its input fields, so inputs must be ghost-synced (and `set_phi_bc_z` applied to
// phi) before these are called.

use tracing::debug;

use crate::field::{ScalarField3D, VectorField3D};
use crate::grid::{Axis, Grid3D};
use crate::layers::{FaceLayer, Layer, LayerStack, Side};
use crate::parallel::ParallelFor;
use crate::params::{FerroParams, Permittivity, PhiBc, SemiconductorParams, Q_E};

/// Hole, electron and net charge density from phi in the semiconductor layer.
///
/// Outside the semiconductor all three outputs are zero.
pub fn compute_rho<P: ParallelFor>(
    phi: &ScalarField3D,
    rho: &mut ScalarField3D,
    e_den: &mut ScalarField3D,
    p_den: &mut ScalarField3D,
    stack: &LayerStack,
    semi: &SemiconductorParams,
    geom: &Grid3D,
    exec: &P,
) {
    let kt = semi.kb * semi.t;
    let in_sc = |k: isize| stack.classify(geom, k).layer == Layer::Semiconductor;

    for bx in p_den.boxes().to_vec() {
        exec.for_each_cell(p_den, bx, |i, j, k, v| {
            *v = if in_sc(k) {
                semi.nv * (-(semi.q * phi.get(i, j, k) - semi.ev * Q_E) / kt).exp()
            } else {
                0.0
            };
        });
    }
    for bx in e_den.boxes().to_vec() {
        exec.for_each_cell(e_den, bx, |i, j, k, v| {
            *v = if in_sc(k) {
                semi.nc * (-(semi.ec * Q_E - semi.q * phi.get(i, j, k)) / kt).exp()
            } else {
                0.0
            };
        });
    }

    let (holes, electrons) = (&*p_den, &*e_den);
    for bx in rho.boxes().to_vec() {
        exec.for_each_cell(rho, bx, |i, j, k, v| {
            *v = if in_sc(k) {
                semi.q * (holes.get(i, j, k) - electrons.get(i, j, k))
            } else {
                0.0
            };
        });
    }
}

/// Right-hand side of the Poisson equation.
///
/// | position              | RHS                                   |
/// |-----------------------|---------------------------------------|
/// | semiconductor         | rho                                   |
/// | dielectric            | 0                                     |
/// | FE, above DE/FE face  | -dP/dz from the low polarization BC   |
/// | FE, top electrode     | -dP/dz from the high polarization BC  |
/// | FE bulk               | -(P(k+1) - P(k-1)) / (2 dz)           |
pub fn compute_poisson_rhs<P: ParallelFor>(
    rhs: &mut ScalarField3D,
    p_old: &ScalarField3D,
    rho: &ScalarField3D,
    stack: &LayerStack,
    ferro: &FerroParams,
    geom: &Grid3D,
    exec: &P,
) {
    let dz = geom.spacing(Axis::Z);
    let lambda = ferro.lambda;

    for bx in rhs.boxes().to_vec() {
        exec.for_each_cell(rhs, bx, |i, j, k, v| {
            let pos = stack.classify(geom, k);
            *v = match pos.layer {
                Layer::Semiconductor => rho.get(i, j, k),
                Layer::Dielectric => 0.0,
                Layer::Ferroelectric => {
                    let p = p_old.get(i, j, k);
                    if pos.fe_interface {
                        let p_up = p_old.get(i, j, k + 1);
                        -ferro.p_bc_lo.face_slope(Side::Lo, p, p_up, dz, lambda)
                    } else if pos.top {
                        let p_dn = p_old.get(i, j, k - 1);
                        -ferro.p_bc_hi.face_slope(Side::Hi, p, p_dn, dz, lambda)
                    } else {
                        -(p_old.get(i, j, k + 1) - p_old.get(i, j, k - 1)) / (2.0 * dz)
                    }
                }
            };
        });
    }
}

/// E = -∇phi. x and y are centered; z is one-sided at the electrodes.
pub fn compute_e_from_phi<P: ParallelFor>(
    phi: &ScalarField3D,
    e: &mut VectorField3D,
    geom: &Grid3D,
    exec: &P,
) {
    let [dx, dy, dz] = geom.cell_size();

    for bx in e.x.boxes().to_vec() {
        exec.for_each_cell(&mut e.x, bx, |i, j, k, v| {
            *v = -(phi.get(i + 1, j, k) - phi.get(i - 1, j, k)) / (2.0 * dx);
        });
    }
    for bx in e.y.boxes().to_vec() {
        exec.for_each_cell(&mut e.y, bx, |i, j, k, v| {
            *v = -(phi.get(i, j + 1, k) - phi.get(i, j - 1, k)) / (2.0 * dy);
        });
    }
    for bx in e.z.boxes().to_vec() {
        exec.for_each_cell(&mut e.z, bx, |i, j, k, v| {
            let z_lo = geom.prob_lo[2] + (k as f64 - 0.5) * dz;
            let z_hi = geom.prob_lo[2] + (k as f64 + 1.5) * dz;
            *v = if z_lo < geom.prob_lo[2] {
                -(phi.get(i, j, k + 1) - phi.get(i, j, k)) / dz
            } else if z_hi > geom.prob_hi[2] {
                -(phi.get(i, j, k) - phi.get(i, j, k - 1)) / dz
            } else {
                -(phi.get(i, j, k + 1) - phi.get(i, j, k - 1)) / (2.0 * dz)
            };
        });
    }
}

/// Write the electrode potentials into the z ghost layer of `phi`
/// (k < 0 -> bc.lo, k >= nz -> bc.hi). Valid cells are left as they are.
pub fn set_phi_bc_z<P: ParallelFor>(phi: &mut ScalarField3D, bc: &PhiBc, exec: &P) {
    debug_assert!(phi.n_ghost() >= 1, "phi needs at least one ghost layer");
    let nz = phi.extent()[2] as isize;
    let bx = phi.valid_box().grow(1);
    exec.for_each_cell(phi, bx, |_, _, k, v| {
        if k < 0 {
            *v = bc.lo;
        } else if k >= nz {
            *v = bc.hi;
        }
    });
}

#[inline]
fn face_permittivity(layer: FaceLayer, axis: Axis, eps: &Permittivity) -> f64 {
    let rel = match layer {
        FaceLayer::Semiconductor => eps.eps_si,
        FaceLayer::ScDeInterface => 0.5 * (eps.eps_de + eps.eps_si),
        FaceLayer::Dielectric => eps.eps_de,
        FaceLayer::DeFeInterface => 0.5 * (eps.eps_de + eps.eps_z_fe),
        FaceLayer::Ferroelectric => match axis {
            Axis::X | Axis::Y => eps.eps_x_fe,
            Axis::Z => eps.eps_z_fe,
        },
    };
    rel * eps.epsilon_0
}

/// Face-centered permittivity `beta_face[a]` on the faces normal to axis `a`.
///
/// z faces sit on nodes (z = prob_lo + k dz); x and y faces are cell-centered in z
/// (z = prob_lo + (k + 1/2) dz). Sampling x/y faces at the node z instead would move
/// their layer interfaces half a cell down, so the cell-centered z is used on purpose.
pub fn initialize_permittivity<P: ParallelFor>(
    beta_face: &mut [ScalarField3D; 3],
    stack: &LayerStack,
    eps: &Permittivity,
    geom: &Grid3D,
    exec: &P,
) {
    let dz = geom.spacing(Axis::Z);
    let small = dz * 1.0e-6;

    for (axis, beta) in Axis::ALL.into_iter().zip(beta_face.iter_mut()) {
        debug_assert_eq!(beta.nodal_axis(), Some(axis));
        for bx in beta.boxes().to_vec() {
            exec.for_each_cell(beta, bx, |_, _, k, v| {
                let z = match axis {
                    Axis::Z => geom.node_coord(Axis::Z, k),
                    Axis::X | Axis::Y => geom.prob_lo[2] + (k as f64 + 0.5) * dz,
                };
                *v = face_permittivity(stack.classify_face(z, small), axis, eps);
            });
        }
        beta.fill_boundary(geom);
    }
    debug!(?eps, "initialized face permittivity");
}
