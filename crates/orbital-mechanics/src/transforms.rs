//! Display transforms (spherical Earth, no Earth rotation)

use serde::{Deserialize, Serialize};

use crate::vector::Vec3;
use crate::{OrbitalElements, EARTH_MEAN_RADIUS_KM};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeodeticPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

/// Nominal altitude above the mean Earth radius
#[inline]
pub fn altitude_km(elements: &OrbitalElements) -> f64 {
    elements.semi_major_axis_km - EARTH_MEAN_RADIUS_KM
}

/// Sub-point of an ECI position, treating ECI as Earth-fixed
pub fn eci_to_geodetic(position: &Vec3) -> GeodeticPosition {
    let (x, y, z) = (position.x, position.y, position.z);
    let r_xy = (x * x + y * y).sqrt();

    GeodeticPosition {
        latitude: z.atan2(r_xy).to_degrees(),
        longitude: y.atan2(x).to_degrees(),
        altitude_km: position.norm() - EARTH_MEAN_RADIUS_KM,
    }
}
