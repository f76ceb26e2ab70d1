//! Vector geometry helpers
//!
//! Pure, total functions over 3D vectors. None of them fail: degenerate
//! inputs have a defined fallback instead of an error.

use nalgebra::Vector3;

/// ECI vector (km for positions, km/s for velocities)
pub type Vec3 = Vector3<f64>;

/// Euclidean distance between two positions
#[inline]
pub fn distance(a: &Vec3, b: &Vec3) -> f64 {
    (a - b).norm()
}

/// Magnitude of the velocity difference
#[inline]
pub fn relative_speed(v1: &Vec3, v2: &Vec3) -> f64 {
    (v1 - v2).norm()
}

/// Angle between two vectors in degrees, in [0, 180].
///
/// Returns 0 when either vector has zero magnitude.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    let mag_a = a.norm();
    let mag_b = b.norm();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    // acos is undefined just outside [-1, 1] from rounding
    let cos_theta = (a.dot(b) / (mag_a * mag_b)).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}

/// Closest approach of two bodies under locally linear relative motion.
///
/// `relative_position` and `relative_velocity` are secondary minus primary.
/// Returns `(seconds_until, distance_km)` with the time clamped to
/// `[0, horizon_s]`: if the bodies are already separating, the closest
/// approach is now.
pub fn linear_closest_approach(
    relative_position: &Vec3,
    relative_velocity: &Vec3,
    horizon_s: f64,
) -> (f64, f64) {
    let speed_sq = relative_velocity.norm_squared();
    if speed_sq == 0.0 {
        return (0.0, relative_position.norm());
    }

    let t = (-relative_position.dot(relative_velocity) / speed_sq).clamp(0.0, horizon_s);
    let closest = relative_position + relative_velocity * t;
    (t, closest.norm())
}
