// src/params.rs

use serde::{Deserialize, Serialize};

use crate::layers::PolarizationBc;

/// Elementary charge (C); also the eV -> J factor for band edges.
pub const Q_E: f64 = 1.602e-19;
/// Boltzmann constant (J/K).
pub const K_B: f64 = 1.38e-23;
/// Vacuum permittivity (F/m).
pub const EPSILON_0: f64 = 8.85e-12;

/// Landau–Ginzburg–Devonshire coefficients and polarization boundary data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FerroParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Gradient coefficient along z.
    pub g11: f64,
    /// Gradient coefficient in-plane (x, y).
    pub g44: f64,
    /// Extrapolation length for the Robin condition (m).
    pub lambda: f64,
    /// Kinetic coefficient Γ inside the ferroelectric.
    pub mobility: f64,
    pub p_bc_lo: PolarizationBc,
    pub p_bc_hi: PolarizationBc,
}

/// Semiconductor carrier statistics (Boltzmann).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemiconductorParams {
    /// Carrier charge (C).
    pub q: f64,
    /// Conduction band edge (eV).
    pub ec: f64,
    /// Valence band edge (eV).
    pub ev: f64,
    pub kb: f64,
    /// Temperature (K).
    pub t: f64,
    /// Effective density of states, conduction band (1/m^3).
    pub nc: f64,
    /// Effective density of states, valence band (1/m^3).
    pub nv: f64,
}

/// Relative permittivities of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permittivity {
    pub epsilon_0: f64,
    pub eps_x_fe: f64,
    pub eps_z_fe: f64,
    pub eps_de: f64,
    pub eps_si: f64,
}

/// Electrode potentials below and above the stack (V).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhiBc {
    pub lo: f64,
    pub hi: f64,
}

impl Default for FerroParams {
    fn default() -> Self {
        Self {
            alpha: -2.5e9,
            beta: 6.0e10,
            gamma: 1.5e11,
            g11: 1.0e-9,
            g44: 1.0e-9,
            lambda: 3.0e-9,
            mobility: 100.0,
            p_bc_lo: PolarizationBc::Robin,
            p_bc_hi: PolarizationBc::Robin,
        }
    }
}

impl Default for SemiconductorParams {
    /// Silicon at room temperature.
    fn default() -> Self {
        Self {
            q: Q_E,
            ec: 0.56,
            ev: -0.56,
            kb: K_B,
            t: 300.0,
            nc: 2.8e25,
            nv: 1.04e25,
        }
    }
}

impl Default for Permittivity {
    fn default() -> Self {
        Self {
            epsilon_0: EPSILON_0,
            eps_x_fe: 24.0,
            eps_z_fe: 24.0,
            eps_de: 10.0,
            eps_si: 11.7,
        }
    }
}

impl Default for PhiBc {
    fn default() -> Self {
        Self { lo: 0.0, hi: 1.0 }
    }
}
