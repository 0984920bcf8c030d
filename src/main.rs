// src/main.rs
//
// Single-evaluation driver: sets up the device described by a JSON config, initialises
// the property fields, and evaluates every operator once (exchange/anisotropy
// induction, space charge, Poisson RHS, E from phi, TDGL RHS, face permittivity).
// There is no time stepping here; the outer loop belongs to whoever embeds the library.
//
// Examples:
//
//   cargo run --release
//       -> default 8×8×32 SC/DE/FE stack with a magnetic block, rayon backend.
//
//   cargo run --release -- config=device.json exec=serial out=runs run=test1
//       -> load device.json, serial backend, write runs/test1/config.json.
//
//   RUST_LOG=magfe_sim=debug cargo run
//       -> per-operation debug logs.
//
// Outputs (per run directory):
//   runs/<run_id>/
//     └── config.json   (fully resolved configuration)

use std::env;
use std::error::Error;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::info;
use tracing_subscriber::EnvFilter;

use magfe_sim::config::SimConfig;
use magfe_sim::effective_field::build_b_eff;
use magfe_sim::electrostatics::{
    compute_e_from_phi, compute_poisson_rhs, compute_rho, initialize_permittivity, set_phi_bc_z,
};
use magfe_sim::field::{ScalarField3D, VectorField3D};
use magfe_sim::grid::{Axis, Grid3D};
use magfe_sim::layers::{Layer, LayerStack};
use magfe_sim::materials::{initialize_magnetic_properties, MagneticProperties};
use magfe_sim::parallel::{Executor, ParallelFor};
use magfe_sim::tdgl::calculate_tdgl_rhs;

fn print_usage() {
    eprintln!(
        r#"Usage:
  cargo run -- [config=FILE.json] [exec=serial|rayon] [out=DIR] [run=RUN_ID]

Notes:
  - Without config=, the built-in default device is used.
  - exec= overrides MAGFE_EXEC (default: rayon).
  - Log level is controlled by RUST_LOG (default: info).
"#
    );
}

fn sanitize_run_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn default_run_id(now: Duration) -> String {
    format!("{}{:03}_eval", now.as_secs(), now.subsec_millis())
}

fn unique_run_dir(out_root: &str, run_id: &str) -> PathBuf {
    let base = PathBuf::from(out_root);
    let mut dir = base.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = base.join(format!("{}_{}", run_id, k));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

/// Set `f` to `value` on cells of `layer`, 0 elsewhere, then sync ghosts.
fn fill_layer<P: ParallelFor>(
    f: &mut ScalarField3D,
    value: f64,
    layer: Layer,
    stack: &LayerStack,
    geom: &Grid3D,
    exec: &P,
) {
    f.set_val(0.0);
    for bx in f.boxes().to_vec() {
        exec.for_each_cell(f, bx, |_, _, k, v| {
            if stack.classify(geom, k).layer == layer {
                *v = value;
            }
        });
    }
    f.fill_boundary(geom);
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config_path: Option<PathBuf> = None;
    let mut exec_override: Option<Executor> = None;
    let mut out_root = "runs".to_string();
    let mut run_id_override: Option<String> = None;

    for arg in env::args().skip(1) {
        if arg == "-h" || arg == "--help" || arg == "help" {
            print_usage();
            return Ok(());
        }
        if let Some(v) = arg.strip_prefix("config=") {
            config_path = Some(PathBuf::from(v));
        } else if let Some(v) = arg.strip_prefix("exec=") {
            match v.parse::<Executor>() {
                Ok(e) => exec_override = Some(e),
                Err(e) => {
                    print_usage();
                    return Err(e.into());
                }
            }
        } else if let Some(v) = arg.strip_prefix("out=") {
            out_root = v.to_string();
        } else if let Some(v) = arg.strip_prefix("run=") {
            run_id_override = Some(sanitize_run_id(v));
        } else {
            print_usage();
            return Err(format!("unrecognised argument '{arg}'").into());
        }
    }

    let mut cfg = match &config_path {
        Some(p) => SimConfig::from_json_file(p)?,
        None => {
            let c = SimConfig::default();
            c.validate()?;
            c
        }
    };
    let exec = exec_override.unwrap_or_else(Executor::from_env);
    let started = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let run_id = run_id_override.unwrap_or_else(|| default_run_id(started));
    cfg.run.binary = env!("CARGO_BIN_NAME").to_string();
    cfg.run.run_id = run_id.clone();
    cfg.run.started_unix_s = Some(started.as_secs());

    let geom = cfg.grid();
    let ng = cfg.geometry.n_ghost;
    let mgs = cfg.geometry.max_grid_size;
    let stack = cfg.stack();
    info!(
        n_cell = ?geom.n_cell,
        cell_size = ?geom.cell_size(),
        ?exec,
        run_id = %run_id,
        "grid ready"
    );

    let t0 = Instant::now();

    // --- magnetic side ---
    let mut props = MagneticProperties::new(&geom, ng, mgs);
    let n_mag = initialize_magnetic_properties(
        &mut props,
        &cfg.magnetic_values(),
        &cfg.magnetic_region(),
        &geom,
        &exec,
    );

    let region = cfg.magnetic_region();
    let vals = cfg.magnetic_values();
    let x0 = 0.5 * (region.lo[0] + region.hi[0]);
    let width = if vals.anisotropy > 0.0 {
        (vals.exchange / vals.anisotropy).sqrt()
    } else {
        0.25 * (region.hi[0] - region.lo[0])
    };

    let mut m = VectorField3D::new(&geom, ng, mgs);
    m.init_bloch_wall(&geom, &props.ms, x0, width);
    m.fill_boundary(&geom);

    let mut b_eff = VectorField3D::new(&geom, ng, mgs);
    build_b_eff(&geom, &m, &mut b_eff, &props, cfg.magnetic.easy_axis, &exec);

    info!(
        magnetic_cells = n_mag,
        wall_width = width,
        max_bx = b_eff.component(Axis::X).max_abs_valid(),
        max_by = b_eff.component(Axis::Y).max_abs_valid(),
        max_bz = b_eff.component(Axis::Z).max_abs_valid(),
        "effective induction (exchange + anisotropy)"
    );

    // --- ferroelectric / semiconductor side ---
    let mut p_old = ScalarField3D::cell_centered(&geom, ng, mgs);
    fill_layer(&mut p_old, 0.01, Layer::Ferroelectric, &stack, &geom, &exec);

    let mut gam = ScalarField3D::cell_centered(&geom, ng, mgs);
    fill_layer(&mut gam, cfg.ferro.mobility, Layer::Ferroelectric, &stack, &geom, &exec);

    let mut phi = ScalarField3D::cell_centered(&geom, ng, mgs);
    set_phi_bc_z(&mut phi, &cfg.phi_bc, &exec);
    phi.fill_boundary(&geom);

    let mut rho = ScalarField3D::cell_centered(&geom, ng, mgs);
    let mut e_den = rho.clone();
    let mut p_den = rho.clone();
    compute_rho(
        &phi,
        &mut rho,
        &mut e_den,
        &mut p_den,
        &stack,
        &cfg.semiconductor,
        &geom,
        &exec,
    );

    let mut poisson_rhs = ScalarField3D::cell_centered(&geom, ng, mgs);
    compute_poisson_rhs(&mut poisson_rhs, &p_old, &rho, &stack, &cfg.ferro, &geom, &exec);

    let mut e_field = VectorField3D::new(&geom, ng, mgs);
    compute_e_from_phi(&phi, &mut e_field, &geom, &exec);

    let mut gl_rhs = ScalarField3D::cell_centered(&geom, ng, mgs);
    calculate_tdgl_rhs(
        &mut gl_rhs,
        &p_old,
        &phi,
        &gam,
        &stack,
        &cfg.ferro,
        &cfg.phi_bc,
        &geom,
        &exec,
    );

    let mut beta_face = [
        ScalarField3D::face_centered(&geom, Axis::X, ng, mgs),
        ScalarField3D::face_centered(&geom, Axis::Y, ng, mgs),
        ScalarField3D::face_centered(&geom, Axis::Z, ng, mgs),
    ];
    initialize_permittivity(&mut beta_face, &stack, &cfg.permittivity, &geom, &exec);

    let cell_volume: f64 = geom.cell_size().iter().product();
    info!(
        net_charge = rho.sum_valid() * cell_volume,
        max_rho = rho.max_abs_valid(),
        max_poisson_rhs = poisson_rhs.max_abs_valid(),
        max_ez = e_field.z.max_abs_valid(),
        max_dpdt = gl_rhs.max_abs_valid(),
        max_beta_z = beta_face[2].max_abs_valid(),
        "electrostatics + TDGL right-hand sides"
    );
    info!(elapsed_ms = t0.elapsed().as_secs_f64() * 1e3, "evaluation done");

    let run_dir = unique_run_dir(&out_root, &run_id);
    create_dir_all(&run_dir)?;
    cfg.write_to_dir(Path::new(&run_dir))?;
    info!(dir = %run_dir.display(), "wrote config.json");

    Ok(())
}
