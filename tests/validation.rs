// tests/validation.rs
//
// Integration-style checks of the operators on small hand-computable grids.
// Run with: cargo test
// Or only these tests: cargo test --test validation

use approx::{assert_abs_diff_eq, assert_relative_eq};

use magfe_sim::effective_field::exchange::laplacian_mag_field;
use magfe_sim::effective_field::{build_b_eff, build_b_eff_masked, FieldMask};
use magfe_sim::electrostatics::{
    compute_e_from_phi, compute_poisson_rhs, compute_rho, initialize_permittivity, set_phi_bc_z,
};
use magfe_sim::field::{ScalarField3D, VectorField3D};
use magfe_sim::grid::{Axis, Grid3D};
use magfe_sim::layers::{LayerStack, PolarizationBc};
use magfe_sim::materials::{initialize_magnetic_properties, MagneticProperties, MagneticValues, RegionBox};
use magfe_sim::parallel::Executor;
use magfe_sim::params::{FerroParams, Permittivity, PhiBc, SemiconductorParams, K_B, Q_E};
use magfe_sim::stencil::{laplacian_dx_mag, laplacian_dy_mag, laplacian_dz_mag, laplacian_mag, MsFaces};
use magfe_sim::tdgl::calculate_tdgl_rhs;

// ---------------------------------------------------------------------------
// Masked Laplacian
// ---------------------------------------------------------------------------

/// Line of `n` cells along x; y and z are periodic single cells so their
/// second differences vanish once ghosts are filled.
fn x_line(n: usize, dx: f64) -> Grid3D {
    Grid3D::new([n, 1, 1], [0.0; 3], [n as f64 * dx, 1.0, 1.0], [false, true, true])
}

fn line_field(g: &Grid3D, values: impl Fn(isize) -> f64) -> ScalarField3D {
    let mut f = ScalarField3D::cell_centered(g, 1, g.n_cell);
    for i in 0..g.n_cell[0] as isize {
        f.set(i, 0, 0, values(i));
    }
    f.fill_boundary(g);
    f
}

#[test]
fn bulk_parabola_has_constant_second_derivative() {
    let dx = 0.5;
    let g = x_line(9, dx);
    let f = line_field(&g, |i| g.cell_center(i, 0, 0)[0].powi(2));
    let ms = line_field(&g, |_| 8.0e5);

    let mut out = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    laplacian_mag_field(&mut out, &f, &ms, &g, &Executor::Serial);

    for i in 1..8isize {
        assert_relative_eq!(out.get(i, 0, 0), 2.0, max_relative = 1e-12);
    }
}

#[test]
fn five_cell_film_matches_hand_values() {
    let g = x_line(5, 1.0);
    let f = line_field(&g, |i| (i * i) as f64);
    let ms = line_field(&g, |_| 8.0e5);

    let mut out = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    laplacian_mag_field(&mut out, &f, &ms, &g, &Executor::Rayon);

    let got: Vec<f64> = (0..5).map(|i| out.get(i, 0, 0)).collect();
    assert_eq!(got, vec![1.0, 2.0, 2.0, 2.0, -7.0]);
}

/// Film on cells 1..=5 of a 7-cell line, vacuum at i = 0 and i = 6.
fn embedded_film() -> (Grid3D, ScalarField3D) {
    let g = x_line(7, 2.0e-9);
    let ms = line_field(&g, |i| if (1..=5).contains(&i) { 1.0e6 } else { 0.0 });
    (g, ms)
}

#[test]
fn film_edges_ignore_values_outside_material() {
    let (g, ms) = embedded_film();
    let mut f = line_field(&g, |i| 0.1 * i as f64 + 0.02 * (i * i) as f64);

    let mut before = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    laplacian_mag_field(&mut before, &f, &ms, &g, &Executor::Serial);

    f.set(0, 0, 0, -123.0);
    f.set(6, 0, 0, 456.0);
    let mut after = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    laplacian_mag_field(&mut after, &f, &ms, &g, &Executor::Serial);

    assert_eq!(before.get(1, 0, 0), after.get(1, 0, 0));
    assert_eq!(before.get(5, 0, 0), after.get(5, 0, 0));
    assert_eq!(after.get(0, 0, 0), 0.0);
    assert_eq!(after.get(6, 0, 0), 0.0);
}

#[test]
fn mirror_symmetric_profile_gives_mirror_symmetric_laplacian() {
    let (g, ms) = embedded_film();
    let f = line_field(&g, |i| 0.7 * ((i - 3) as f64).powi(2) + 1.0);

    let mut out = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    laplacian_mag_field(&mut out, &f, &ms, &g, &Executor::Rayon);

    for i in 1..=2isize {
        assert_relative_eq!(out.get(i, 0, 0), out.get(6 - i, 0, 0), max_relative = 1e-14);
    }
    // one-sided at the edges, centered inside
    assert!(out.get(1, 0, 0) < 0.0);
    assert!(out.get(3, 0, 0) > 0.0);
}

#[test]
fn full_laplacian_is_sum_of_axis_terms() {
    let g = Grid3D::new([4, 4, 4], [0.0; 3], [4.0e-9, 3.0e-9, 2.0e-9], [false; 3]);
    let mut f = ScalarField3D::cell_centered(&g, 1, [4, 4, 4]);
    let bx = f.grown_box();
    for k in bx.lo[2]..bx.hi[2] {
        for j in bx.lo[1]..bx.hi[1] {
            for i in bx.lo[0]..bx.hi[0] {
                f.set(i, j, k, ((i * 7 + j * 3 - k * 5) as f64).sin());
            }
        }
    }
    let faces = MsFaces::new(1.0, 0.0, 0.0, 1.0, 1.0, 1.0);
    let (i, j, k) = (1, 2, 1);
    let sum = laplacian_dx_mag(&f, 1.0, 0.0, i, j, k, &g)
        + laplacian_dy_mag(&f, 0.0, 1.0, i, j, k, &g)
        + laplacian_dz_mag(&f, 1.0, 1.0, i, j, k, &g);
    assert_eq!(laplacian_mag(&f, &faces, i, j, k, &g), sum);
}

// ---------------------------------------------------------------------------
// Property initializer
// ---------------------------------------------------------------------------

fn permalloy() -> MagneticValues {
    MagneticValues {
        alpha: 0.01,
        ms: 8.6e5,
        gamma: 1.76e11,
        exchange: 1.3e-11,
        anisotropy: 0.0,
    }
}

#[test]
fn initializer_fills_strict_interior_only() {
    let g = Grid3D::new([4, 4, 4], [0.0; 3], [4.0; 3], [false; 3]);
    let mut props = MagneticProperties::new(&g, 1, [2, 2, 2]);

    let region = RegionBox::new([1.0; 3], [3.0; 3]);
    let n = initialize_magnetic_properties(&mut props, &permalloy(), &region, &g, &Executor::Rayon);
    assert_eq!(n, 8);
    assert_eq!(props.ms.get(1, 1, 1), 8.6e5);
    assert_eq!(props.exchange.get(2, 2, 2), 1.3e-11);
    assert_eq!(props.ms.get(0, 1, 1), 0.0);
    assert_eq!(props.alpha.get(3, 3, 3), 0.0);
}

#[test]
fn cell_center_on_region_face_stays_background() {
    let g = Grid3D::new([4, 4, 4], [0.0; 3], [4.0; 3], [false; 3]);
    let mut props = MagneticProperties::new(&g, 1, [4, 4, 4]);

    // center x = 1.5 sits exactly on lo[0]
    let region = RegionBox::new([1.5, -1.0, -1.0], [5.0, 5.0, 5.0]);
    let n = initialize_magnetic_properties(&mut props, &permalloy(), &region, &g, &Executor::Serial);
    assert_eq!(n, 2 * 4 * 4);
    assert_eq!(props.ms.get(1, 0, 0), 0.0);
    assert_eq!(props.ms.get(2, 0, 0), 8.6e5);
}

#[test]
fn reinitializing_clears_previous_region() {
    let g = Grid3D::new([4, 1, 1], [0.0; 3], [4.0, 1.0, 1.0], [false; 3]);
    let mut props = MagneticProperties::new(&g, 1, [4, 1, 1]);
    let exec = Executor::Serial;

    let left = RegionBox::new([0.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
    initialize_magnetic_properties(&mut props, &permalloy(), &left, &g, &exec);
    assert_eq!(props.ms.get(0, 0, 0), 8.6e5);

    let right = RegionBox::new([2.0, 0.0, 0.0], [4.0, 1.0, 1.0]);
    initialize_magnetic_properties(&mut props, &permalloy(), &right, &g, &exec);
    assert_eq!(props.ms.get(0, 0, 0), 0.0);
    assert_eq!(props.ms.get(3, 0, 0), 8.6e5);
}

// ---------------------------------------------------------------------------
// Effective induction
// ---------------------------------------------------------------------------

fn wall_setup() -> (Grid3D, MagneticProperties, VectorField3D) {
    let g = Grid3D::new(
        [12, 5, 6],
        [0.0; 3],
        [24.0e-9, 10.0e-9, 12.0e-9],
        [true, false, false],
    );
    let mut props = MagneticProperties::new(&g, 1, [4, 4, 4]);
    let values = MagneticValues {
        anisotropy: 5.0e4,
        ..permalloy()
    };
    let region = RegionBox::new([-1.0, 1.0e-9, 2.0e-9], [25.0e-9, 9.0e-9, 10.0e-9]);
    initialize_magnetic_properties(&mut props, &values, &region, &g, &Executor::Serial);

    let mut m = VectorField3D::new(&g, 1, [4, 4, 4]);
    m.init_bloch_wall(&g, &props.ms, 12.0e-9, 3.0e-9);
    m.fill_boundary(&g);
    (g, props, m)
}

#[test]
fn serial_and_rayon_backends_agree_bitwise() {
    let (g, props, m) = wall_setup();
    let u = [0.0, 0.0, 1.0];

    let mut b_serial = VectorField3D::new(&g, 1, [4, 4, 4]);
    let mut b_rayon = b_serial.clone();
    build_b_eff(&g, &m, &mut b_serial, &props, u, &Executor::Serial);
    build_b_eff(&g, &m, &mut b_rayon, &props, u, &Executor::Rayon);

    for axis in Axis::ALL {
        assert_eq!(b_serial.component(axis).data, b_rayon.component(axis).data);
    }
    assert!(b_serial.x.max_abs_valid() > 0.0);
}

#[test]
fn anisotropy_mask_adds_easy_axis_term_only() {
    let (g, props, m) = wall_setup();
    let u = [0.0, 0.0, 1.0];
    let exec = Executor::Rayon;

    let mut b_ex = VectorField3D::new(&g, 1, [4, 4, 4]);
    let mut b_all = b_ex.clone();
    build_b_eff_masked(&g, &m, &mut b_ex, &props, u, FieldMask::Exch, &exec);
    build_b_eff_masked(&g, &m, &mut b_all, &props, u, FieldMask::ExchAnis, &exec);

    assert_eq!(b_ex.x.data, b_all.x.data);
    assert_eq!(b_ex.y.data, b_all.y.data);

    let (i, j, k) = (3, 2, 2);
    let ms = props.ms.get(i, j, k);
    assert!(ms > 0.0);
    let expected = 2.0 * 5.0e4 / ms * m.z.get(i, j, k);
    assert_relative_eq!(
        b_all.z.get(i, j, k) - b_ex.z.get(i, j, k),
        expected,
        max_relative = 1e-12
    );
    // vacuum cells carry no induction
    assert_eq!(b_all.z.get(i, 0, k), 0.0);
}

// ---------------------------------------------------------------------------
// Stack: SC k=0..3, DE k=4..5, FE k=6..9 (dz = 1)
// ---------------------------------------------------------------------------

fn column() -> (Grid3D, LayerStack) {
    let g = Grid3D::new([1, 1, 10], [0.0; 3], [1.0, 1.0, 10.0], [true, true, false]);
    let stack = LayerStack {
        sc_lo: 0.0,
        sc_hi: 4.0,
        de_lo: 4.0,
        de_hi: 6.0,
        fe_lo: 6.0,
        fe_hi: 10.0,
    };
    (g, stack)
}

fn ferro(bc: PolarizationBc) -> FerroParams {
    FerroParams {
        alpha: 1.0,
        beta: 0.0,
        gamma: 0.0,
        g11: 1.0,
        g44: 1.0,
        lambda: 2.0,
        mobility: 1.0,
        p_bc_lo: bc,
        p_bc_hi: bc,
    }
}

/// P = 0.1 k inside the ferroelectric, 0 elsewhere.
fn ramp_polarization(g: &Grid3D) -> ScalarField3D {
    let mut p = ScalarField3D::cell_centered(g, 1, g.n_cell);
    for k in 6..10isize {
        p.set(0, 0, k, 0.1 * k as f64);
    }
    p.fill_boundary(g);
    p
}

fn poisson_column(bc: PolarizationBc) -> Vec<f64> {
    let (g, stack) = column();
    let p = ramp_polarization(&g);
    let mut rho = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    rho.set_val(3.0);
    let mut rhs = rho.clone();
    compute_poisson_rhs(&mut rhs, &p, &rho, &stack, &ferro(bc), &g, &Executor::Serial);
    (0..10).map(|k| rhs.get(0, 0, k)).collect()
}

#[test]
fn poisson_rhs_free_polarization() {
    let rhs = poisson_column(PolarizationBc::Free);
    let expected = [3.0, 3.0, 3.0, 3.0, 0.0, 0.0, -0.05, -0.1, -0.1, -0.05];
    for (&got, &want) in rhs.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(got, want, epsilon = 1e-12);
    }
}

#[test]
fn poisson_rhs_zero_and_robin_interfaces() {
    // Zero: -(3 P6 + P7) / 3
    let zero = poisson_column(PolarizationBc::Zero);
    assert_abs_diff_eq!(zero[6], -(1.8 + 0.7) / 3.0, epsilon = 1e-12);
    // top: -(-3 P9 - P8) / 3
    assert_abs_diff_eq!(zero[9], (2.7 + 0.8) / 3.0, epsilon = 1e-12);

    // Robin, lambda = 2: P_int = 0.6 / 1.25 = 0.48, dP/dz = 0.24
    let robin = poisson_column(PolarizationBc::Robin);
    assert_abs_diff_eq!(robin[6], -(0.24 - 0.6 + 0.7) / 2.0, epsilon = 1e-12);
    // top: P_int = 0.9 / 0.75 = 1.2, dP/dz = 0.6
    assert_abs_diff_eq!(robin[9], -(0.6 + 0.9 - 0.8) / 2.0, epsilon = 1e-12);
    // bulk FE is independent of the boundary condition
    assert_abs_diff_eq!(robin[7], zero[7], epsilon = 1e-15);
}

/// dP/dt on the column for the ramp polarization with phi = 0 and Γ = 1.
fn tdgl_column(bc: PolarizationBc) -> Vec<f64> {
    let (g, stack) = column();
    let p = ramp_polarization(&g);
    let mut phi = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    let phi_bc = PhiBc { lo: 0.0, hi: 0.0 };
    set_phi_bc_z(&mut phi, &phi_bc, &Executor::Serial);
    phi.fill_boundary(&g);
    let mut gam = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    gam.set_val(1.0);

    let mut rhs = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    calculate_tdgl_rhs(&mut rhs, &p, &phi, &gam, &stack, &ferro(bc), &phi_bc, &g, &Executor::Rayon);
    (0..10).map(|k| rhs.get(0, 0, k)).collect()
}

#[test]
fn tdgl_rhs_uses_boundary_curvature_at_fe_edges() {
    let rhs = tdgl_column(PolarizationBc::Free);

    for (k, &v) in rhs.iter().enumerate().take(6) {
        assert_eq!(v, 0.0, "k={k}");
    }
    // -(αP - g11 d²P/dz²), free faces: d²P/dz² = ±(P_in - P)
    assert_abs_diff_eq!(rhs[6], -(0.6 - 0.1), epsilon = 1e-12);
    assert_abs_diff_eq!(rhs[7], -0.7, epsilon = 1e-12);
    assert_abs_diff_eq!(rhs[8], -0.8, epsilon = 1e-12);
    assert_abs_diff_eq!(rhs[9], -(0.9 + 0.1), epsilon = 1e-12);
}

#[test]
fn tdgl_rhs_robin_edges() {
    let rhs = tdgl_column(PolarizationBc::Robin);
    // low face: P_int = 0.6 / 1.25 = 0.48, dP/dz = 0.24
    //   d²P/dz² = -0.24 - 0.6 + 0.7 = -0.14
    assert_abs_diff_eq!(rhs[6], -(0.6 + 0.14), epsilon = 1e-12);
    // high face: P_int = 0.9 / 0.75 = 1.2, dP/dz = 0.6
    //   d²P/dz² = 0.6 - 0.9 + 0.8 = 0.5
    assert_abs_diff_eq!(rhs[9], -(0.9 - 0.5), epsilon = 1e-12);
    // bulk is unchanged
    assert_abs_diff_eq!(rhs[7], -0.7, epsilon = 1e-12);
}

#[test]
fn tdgl_rhs_zero_edges() {
    let rhs = tdgl_column(PolarizationBc::Zero);
    // d²P/dz² = 4 (2·0 - 3P + P_in) / 3
    assert_abs_diff_eq!(rhs[6], -(0.6 - 4.0 * (-1.8 + 0.7) / 3.0), epsilon = 1e-12);
    assert_abs_diff_eq!(rhs[9], -(0.9 - 4.0 * (-2.7 + 0.8) / 3.0), epsilon = 1e-12);
}

/// phi = z (cell centers) with electrodes at 0 and 10.
fn linear_phi(g: &Grid3D) -> (ScalarField3D, PhiBc) {
    let bc = PhiBc { lo: 0.0, hi: 10.0 };
    let mut phi = ScalarField3D::cell_centered(g, 1, g.n_cell);
    for k in 0..10isize {
        phi.set(0, 0, k, k as f64 + 0.5);
    }
    set_phi_bc_z(&mut phi, &bc, &Executor::Serial);
    phi.fill_boundary(g);
    (phi, bc)
}

#[test]
fn linear_potential_gives_uniform_drive_and_field() {
    let (g, stack) = column();
    let (phi, bc) = linear_phi(&g);
    let p = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    let mut gam = p.clone();
    gam.set_val(1.0);

    let mut rhs = p.clone();
    let f = FerroParams {
        alpha: 0.0,
        ..ferro(PolarizationBc::Zero)
    };
    calculate_tdgl_rhs(&mut rhs, &p, &phi, &gam, &stack, &f, &bc, &g, &Executor::Serial);
    for k in 0..10isize {
        assert_abs_diff_eq!(rhs.get(0, 0, k), -1.0, epsilon = 1e-12);
    }

    let mut e = VectorField3D::new(&g, 1, g.n_cell);
    compute_e_from_phi(&phi, &mut e, &g, &Executor::Rayon);
    for k in 0..10isize {
        assert_abs_diff_eq!(e.z.get(0, 0, k), -1.0, epsilon = 1e-12);
        assert_eq!(e.x.get(0, 0, k), 0.0);
        assert_eq!(e.y.get(0, 0, k), 0.0);
    }
}

#[test]
fn space_charge_lives_in_semiconductor_only() {
    let (g, stack) = column();
    let phi = ScalarField3D::cell_centered(&g, 1, g.n_cell);
    let semi = SemiconductorParams {
        q: Q_E,
        ec: 0.56,
        ev: -0.56,
        kb: K_B,
        t: 300.0,
        nc: 2.8e25,
        nv: 1.04e25,
    };
    let mut rho = phi.clone();
    let mut e_den = phi.clone();
    let mut p_den = phi.clone();
    compute_rho(&phi, &mut rho, &mut e_den, &mut p_den, &stack, &semi, &g, &Executor::Serial);

    let boltz = (-0.56 * Q_E / (K_B * 300.0)).exp();
    for k in 0..4isize {
        assert_relative_eq!(p_den.get(0, 0, k), 1.04e25 * boltz, max_relative = 1e-12);
        assert_relative_eq!(e_den.get(0, 0, k), 2.8e25 * boltz, max_relative = 1e-12);
        assert_relative_eq!(
            rho.get(0, 0, k),
            Q_E * (1.04e25 - 2.8e25) * boltz,
            max_relative = 1e-12
        );
    }
    for k in 4..10isize {
        assert_eq!(rho.get(0, 0, k), 0.0);
        assert_eq!(e_den.get(0, 0, k), 0.0);
        assert_eq!(p_den.get(0, 0, k), 0.0);
    }
}

#[test]
fn face_permittivity_averages_at_interfaces() {
    let (g, stack) = column();
    let eps = Permittivity {
        epsilon_0: 1.0,
        eps_x_fe: 20.0,
        eps_z_fe: 30.0,
        eps_de: 10.0,
        eps_si: 12.0,
    };
    let mut beta = [
        ScalarField3D::face_centered(&g, Axis::X, 1, [4, 4, 4]),
        ScalarField3D::face_centered(&g, Axis::Y, 1, [4, 4, 4]),
        ScalarField3D::face_centered(&g, Axis::Z, 1, [4, 4, 4]),
    ];
    initialize_permittivity(&mut beta, &stack, &eps, &g, &Executor::Rayon);

    // z faces sit on nodes z = k
    let bz: Vec<f64> = (0..=10).map(|k| beta[2].get(0, 0, k)).collect();
    assert_eq!(
        bz,
        vec![12.0, 12.0, 12.0, 12.0, 11.0, 10.0, 20.0, 30.0, 30.0, 30.0, 30.0]
    );

    // x faces are cell-centered in z
    for i in 0..2isize {
        assert_eq!(beta[0].get(i, 0, 3), 12.0);
        assert_eq!(beta[0].get(i, 0, 4), 10.0);
        assert_eq!(beta[0].get(i, 0, 6), 20.0);
    }
    assert_eq!(beta[1].get(0, 1, 9), 20.0);
}
