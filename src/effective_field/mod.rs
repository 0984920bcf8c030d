// src/effective_field/mod.rs
/// NOTE: Despite the name build_b_eff*, the terms here are inductions B (Tesla),
/// consistent with the convention used throughout the crate.
pub mod anisotropy;
pub mod exchange;

use crate::field::VectorField3D;
use crate::grid::Grid3D;
use crate::materials::MagneticProperties;
use crate::parallel::ParallelFor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMask {
    /// Exchange only
    Exch,
    /// Exchange + uniaxial anisotropy
    ExchAnis,
}

/// Build effective induction with a mask controlling which terms are included.
///
/// `m` must have its ghost cells synchronised; `props` must come from
/// `initialize_magnetic_properties` (which synchronises the property ghosts).
pub fn build_b_eff_masked<P: ParallelFor>(
    geom: &Grid3D,
    m: &VectorField3D,
    b_eff: &mut VectorField3D,
    props: &MagneticProperties,
    easy_axis: [f64; 3],
    mask: FieldMask,
    exec: &P,
) {
    b_eff.set_uniform(0.0, 0.0, 0.0);

    exchange::add_exchange_field(b_eff, m, &props.ms, &props.exchange, geom, exec);

    if matches!(mask, FieldMask::ExchAnis) {
        anisotropy::add_uniaxial_anisotropy_field(
            b_eff,
            m,
            &props.ms,
            &props.anisotropy,
            easy_axis,
            exec,
        );
    }
}

/// Build the full B_eff (exchange + anisotropy).
pub fn build_b_eff<P: ParallelFor>(
    geom: &Grid3D,
    m: &VectorField3D,
    b_eff: &mut VectorField3D,
    props: &MagneticProperties,
    easy_axis: [f64; 3],
    exec: &P,
) {
    build_b_eff_masked(geom, m, b_eff, props, easy_axis, FieldMask::ExchAnis, exec);
}
