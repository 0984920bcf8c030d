// src/lib.rs

pub mod box3;
pub mod config;
pub mod effective_field;
pub mod electrostatics;
pub mod error;
pub mod field;
pub mod grid;
pub mod layers;
pub mod materials;
pub mod parallel;
pub mod params;
pub mod stencil;
pub mod tdgl;
