// src/layers.rs
//
// Position classifier for the z-stacked semiconductor / dielectric / ferroelectric
// device, and the polarization boundary stencils used at the FE edges.
//
// Stack (bottom to top):  SC [sc_lo, sc_hi]  |  DE [de_lo, de_hi]  |  FE [fe_lo, fe_hi]
//
// Every equation that needs z-dependent stencils first asks `classify` where a cell
// sits and then picks its own stencil from a small table (see electrostatics.rs and
// tdgl.rs). Keeping the comparisons here means the coordinate conventions
// (cell center, half-cell neighbours, strict vs. non-strict bounds) live in one place.

use serde::{Deserialize, Serialize};

use crate::grid::{Axis, Grid3D};

/// Material layer of a cell center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Semiconductor,
    Dielectric,
    Ferroelectric,
}

/// Where a cell sits along z, relative to the layer stack and the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZPosition {
    pub layer: Layer,
    /// The low neighbour's center lies below prob_lo (bottom electrode).
    pub bottom: bool,
    /// The high neighbour's center lies above prob_hi (top electrode).
    pub top: bool,
    /// First FE cell above the DE/FE interface: z_lo < de_hi <= z.
    pub fe_interface: bool,
}

/// Layer of a face-centered (nodal in z) coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceLayer {
    Semiconductor,
    ScDeInterface,
    Dielectric,
    DeFeInterface,
    Ferroelectric,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStack {
    pub sc_lo: f64,
    pub sc_hi: f64,
    pub de_lo: f64,
    pub de_hi: f64,
    pub fe_lo: f64,
    pub fe_hi: f64,
}

impl Default for LayerStack {
    /// 4 nm SC, 2 nm DE, 10 nm FE.
    fn default() -> Self {
        Self {
            sc_lo: 0.0,
            sc_hi: 4.0e-9,
            de_lo: 4.0e-9,
            de_hi: 6.0e-9,
            fe_lo: 6.0e-9,
            fe_hi: 16.0e-9,
        }
    }
}

impl LayerStack {
    /// Layer of a physical z coordinate.
    #[inline]
    pub fn layer_at(&self, z: f64) -> Layer {
        if z <= self.sc_hi {
            Layer::Semiconductor
        } else if z < self.de_hi {
            Layer::Dielectric
        } else {
            Layer::Ferroelectric
        }
    }

    /// Classify cell-center index `k`.
    #[inline]
    pub fn classify(&self, geom: &Grid3D, k: isize) -> ZPosition {
        let dz = geom.spacing(Axis::Z);
        let z = geom.prob_lo[2] + (k as f64 + 0.5) * dz;
        let z_hi = geom.prob_lo[2] + (k as f64 + 1.5) * dz;
        let z_lo = geom.prob_lo[2] + (k as f64 - 0.5) * dz;

        ZPosition {
            layer: self.layer_at(z),
            bottom: z_lo < geom.prob_lo[2],
            top: z_hi > geom.prob_hi[2],
            fe_interface: self.de_hi > z_lo && self.de_hi <= z,
        }
    }

    /// Classify a face coordinate; `small` is the interface half-width.
    #[inline]
    pub fn classify_face(&self, z: f64, small: f64) -> FaceLayer {
        if z < self.sc_hi - small {
            FaceLayer::Semiconductor
        } else if z < self.sc_hi + small {
            FaceLayer::ScDeInterface
        } else if z < self.de_hi - small {
            FaceLayer::Dielectric
        } else if z < self.de_hi + small {
            FaceLayer::DeFeInterface
        } else {
            FaceLayer::Ferroelectric
        }
    }

    /// sc_lo <= sc_hi <= de_lo <= de_hi <= fe_lo <= fe_hi
    pub fn is_ordered(&self) -> bool {
        let z = [
            self.sc_lo, self.sc_hi, self.de_lo, self.de_hi, self.fe_lo, self.fe_hi,
        ];
        z.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Low (bottom) or high (top) edge of the ferroelectric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lo,
    Hi,
}

/// Polarization boundary condition at an FE edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarizationBc {
    /// P = 0 on the face.
    Zero,
    /// Robin: P + λ dP/dz = 0 style blending with extrapolation length λ.
    Robin,
    /// dP/dz = 0.
    Free,
}

impl PolarizationBc {
    /// Map the legacy integer flags 0 / 1 / 2.
    pub fn from_flag(flag: i32) -> Option<Self> {
        match flag {
            0 => Some(Self::Zero),
            1 => Some(Self::Robin),
            2 => Some(Self::Free),
            _ => None,
        }
    }

    /// (P on the face, dP/dz on the face) for an edge cell holding `p`.
    #[inline]
    pub fn face_state(self, side: Side, p: f64, dz: f64, lambda: f64) -> (f64, f64) {
        match self {
            PolarizationBc::Zero => (0.0, 0.0),
            PolarizationBc::Robin => {
                let p_int = match side {
                    Side::Lo => p / (1.0 + dz / 2.0 / lambda),
                    Side::Hi => p / (1.0 - dz / 2.0 / lambda),
                };
                (p_int, p_int / lambda)
            }
            PolarizationBc::Free => (p, 0.0),
        }
    }

    /// dP/dz at an edge cell holding `p`, with `p_in` the next cell into the FE.
    #[inline]
    pub fn face_slope(self, side: Side, p: f64, p_in: f64, dz: f64, lambda: f64) -> f64 {
        let (p_int, dpdz) = self.face_state(side, p, dz, lambda);
        match (self, side) {
            (PolarizationBc::Zero, Side::Lo) => (-4.0 * p_int + 3.0 * p + p_in) / (3.0 * dz),
            (PolarizationBc::Zero, Side::Hi) => (4.0 * p_int - 3.0 * p - p_in) / (3.0 * dz),
            (_, Side::Lo) => (dz * dpdz - p + p_in) / (2.0 * dz),
            (_, Side::Hi) => (dz * dpdz + p - p_in) / (2.0 * dz),
        }
    }

    /// d²P/dz² at an edge cell holding `p`, with `p_in` the next cell into the FE.
    #[inline]
    pub fn face_curvature(self, side: Side, p: f64, p_in: f64, dz: f64, lambda: f64) -> f64 {
        let (p_int, dpdz) = self.face_state(side, p, dz, lambda);
        match (self, side) {
            (PolarizationBc::Zero, _) => 4.0 * (2.0 * p_int - 3.0 * p + p_in) / 3.0 / dz / dz,
            (_, Side::Lo) => (-dz * dpdz - p + p_in) / dz / dz,
            (_, Side::Hi) => (dz * dpdz - p + p_in) / dz / dz,
        }
    }
}
