// src/config.rs
//
// Problem setup as JSON. Every section and every field has a default, so a config
// file only needs the values it changes. The driver writes the fully resolved config
// back into the run directory as config.json.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::grid::{Axis, Grid3D};
use crate::layers::{LayerStack, PolarizationBc};
use crate::materials::{MagneticValues, RegionBox};
use crate::params::{FerroParams, Permittivity, PhiBc, SemiconductorParams};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub geometry: GeometryConfig,
    pub magnetic: MagneticConfig,
    pub stack: LayerStack,
    pub ferro: FerroParams,
    pub semiconductor: SemiconductorParams,
    pub permittivity: Permittivity,
    pub phi_bc: PhiBc,
    pub run: RunInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub n_cell: [usize; 3],
    pub prob_lo: [f64; 3],
    pub prob_hi: [f64; 3],
    pub periodic: [bool; 3],
    /// Largest owned sub-box per axis.
    pub max_grid_size: [usize; 3],
    pub n_ghost: usize,
}

impl Default for GeometryConfig {
    /// 8 nm × 8 nm × 16 nm device, dz = 0.5 nm
    fn default() -> Self {
        Self {
            n_cell: [8, 8, 32],
            prob_lo: [-4.0e-9, -4.0e-9, 0.0],
            prob_hi: [4.0e-9, 4.0e-9, 16.0e-9],
            periodic: [true, true, false],
            max_grid_size: [8, 8, 8],
            n_ghost: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticConfig {
    pub values: MagneticValues,
    pub region: RegionBox,
    pub easy_axis: [f64; 3],
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            values: MagneticValues::default(),
            region: RegionBox::default(),
            easy_axis: [0.0, 0.0, 1.0],
        }
    }
}

/// Provenance written next to the resolved config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,
    /// Wall-clock start of the run, seconds since the Unix epoch.
    pub started_unix_s: Option<u64>,
}

impl Default for RunInfo {
    fn default() -> Self {
        Self {
            binary: "magfe_sim".to_string(),
            run_id: "default".to_string(),
            started_unix_s: None,
        }
    }
}

impl SimConfig {
    /// Load and validate a JSON config.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: SimConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|source| ConfigError::Json { path, source })?;
        Ok(())
    }

    /// Reject configurations the kernels would silently turn into garbage.
    pub fn validate(&self) -> Result<()> {
        let g = &self.geometry;
        for a in Axis::ALL {
            let i = a.index();
            if g.n_cell[i] == 0 {
                return Err(invalid(format!("n_cell[{i}] must be >= 1")));
            }
            if !(g.prob_lo[i] < g.prob_hi[i]) {
                return Err(invalid(format!(
                    "prob_lo[{i}] = {} must be < prob_hi[{i}] = {}",
                    g.prob_lo[i], g.prob_hi[i]
                )));
            }
            if g.max_grid_size[i] == 0 {
                return Err(invalid(format!("max_grid_size[{i}] must be >= 1")));
            }
            if g.periodic[i] && g.n_cell[i] < g.n_ghost {
                return Err(invalid(format!(
                    "periodic axis {i} has fewer cells than ghost layers"
                )));
            }
            let r = &self.magnetic.region;
            if !(r.lo[i] < r.hi[i]) {
                return Err(invalid(format!(
                    "magnetic region lo[{i}] = {} must be < hi[{i}] = {}",
                    r.lo[i], r.hi[i]
                )));
            }
        }
        if g.n_ghost < 1 {
            return Err(invalid("n_ghost must be >= 1 for 3-point stencils".into()));
        }
        if !self.stack.is_ordered() {
            return Err(invalid(format!("layer stack is not ordered: {:?}", self.stack)));
        }
        let uses_robin = self.ferro.p_bc_lo == PolarizationBc::Robin
            || self.ferro.p_bc_hi == PolarizationBc::Robin;
        if uses_robin {
            let dz = self.grid().spacing(Axis::Z);
            if !(self.ferro.lambda > 0.0) || self.ferro.lambda == 0.5 * dz {
                return Err(invalid(format!(
                    "Robin polarization BC needs lambda > 0 and != dz/2 (lambda = {}, dz = {})",
                    self.ferro.lambda, dz
                )));
            }
        }
        if self.magnetic.values.ms < 0.0 {
            return Err(invalid("Ms must be non-negative".into()));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid3D {
        let g = &self.geometry;
        Grid3D::new(g.n_cell, g.prob_lo, g.prob_hi, g.periodic)
    }

    pub fn magnetic_region(&self) -> RegionBox {
        self.magnetic.region
    }

    pub fn magnetic_values(&self) -> MagneticValues {
        self.magnetic.values
    }

    pub fn stack(&self) -> LayerStack {
        self.stack
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
