//! Orbital Mechanics Library
//!
//! Simplified circular two-body propagation for conjunction screening:
//! orbital elements, mean-anomaly propagation, ECI state derivation and
//! the vector geometry the risk model is built on.
//!
//! This is a transparent demonstrator model. There is no perturbation,
//! drag, J2 or numerical integration; every orbit is treated as a circle
//! of radius `semi_major_axis_km` traversed at constant mean motion.

use thiserror::Error;

pub mod elements;
pub mod propagation;
pub mod transforms;
pub mod vector;

pub use elements::OrbitalElements;
pub use propagation::{propagate, StateVector};
pub use vector::Vec3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitalError {
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),
    #[error("Non-finite state: {0}")]
    NonFiniteState(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

/// Mean Earth radius (km), used for altitude display
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// Full revolution in degrees
pub const FULL_CIRCLE_DEG: f64 = 360.0;
