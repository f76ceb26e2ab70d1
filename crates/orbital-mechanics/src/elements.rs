//! Keplerian-like orbital elements
//!
//! Six classical parameters plus a fixed period. In this simplified model the
//! period is catalog data, never recomputed from the semi-major axis.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::{OrbitalError, Result, FULL_CIRCLE_DEG};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis (km), > 0
    pub semi_major_axis_km: f64,
    /// Eccentricity, [0, 1). Carried but not applied to the orbit shape.
    pub eccentricity: f64,
    /// Inclination (deg), [0, 180]
    pub inclination_deg: f64,
    /// Right ascension of ascending node (deg), [0, 360)
    pub raan_deg: f64,
    /// Argument of perigee (deg), [0, 360)
    pub arg_of_perigee_deg: f64,
    /// Mean anomaly (deg), [0, 360). Advanced on every propagation.
    pub mean_anomaly_deg: f64,
    /// Orbital period (minutes), > 0
    pub period_min: f64,
}

impl OrbitalElements {
    pub fn new(
        semi_major_axis_km: f64,
        eccentricity: f64,
        inclination_deg: f64,
        raan_deg: f64,
        arg_of_perigee_deg: f64,
        mean_anomaly_deg: f64,
        period_min: f64,
    ) -> Result<Self> {
        let elements = Self {
            semi_major_axis_km,
            eccentricity,
            inclination_deg,
            raan_deg,
            arg_of_perigee_deg,
            mean_anomaly_deg,
            period_min,
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Check every element against its domain.
    ///
    /// Non-finite values fail every range check below.
    pub fn validate(&self) -> Result<()> {
        if !(self.semi_major_axis_km > 0.0 && self.semi_major_axis_km.is_finite()) {
            return Err(OrbitalError::InvalidElements(format!(
                "semi-major axis must be positive, got {} km",
                self.semi_major_axis_km
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitalError::InvalidElements(format!(
                "eccentricity must be in [0, 1), got {}",
                self.eccentricity
            )));
        }
        if !(0.0..=180.0).contains(&self.inclination_deg) {
            return Err(OrbitalError::InvalidElements(format!(
                "inclination must be in [0, 180] deg, got {}",
                self.inclination_deg
            )));
        }
        for (name, value) in [
            ("RAAN", self.raan_deg),
            ("argument of perigee", self.arg_of_perigee_deg),
            ("mean anomaly", self.mean_anomaly_deg),
        ] {
            if !(0.0..FULL_CIRCLE_DEG).contains(&value) {
                return Err(OrbitalError::InvalidElements(format!(
                    "{} must be in [0, 360) deg, got {}",
                    name, value
                )));
            }
        }
        if !(self.period_min > 0.0 && self.period_min.is_finite()) {
            return Err(OrbitalError::InvalidElements(format!(
                "period must be positive, got {} min",
                self.period_min
            )));
        }
        Ok(())
    }

    /// Mean motion n = 2π / period (rad/min)
    #[inline]
    pub fn mean_motion_rad_per_min(&self) -> f64 {
        2.0 * PI / self.period_min
    }

    /// Mean motion in deg/min
    #[inline]
    pub fn mean_motion_deg_per_min(&self) -> f64 {
        FULL_CIRCLE_DEG / self.period_min
    }

    /// Circular orbital speed 2πa / T (km/s)
    #[inline]
    pub fn circular_speed_km_s(&self) -> f64 {
        self.semi_major_axis_km * self.mean_motion_rad_per_min() / 60.0
    }
}
