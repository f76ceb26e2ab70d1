//! Circular two-body propagation
//!
//! Advances the mean anomaly at constant mean motion and derives an ECI-like
//! state by placing the body on a circle of radius `a` in its orbital plane,
//! then rotating by inclination about x and by RAAN about z.
//!
//! Eccentricity and argument of perigee are carried in the elements but do
//! not shape the orbit. Velocity is the exact time derivative of the same
//! circular position, so position and velocity always describe one instant.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::vector::Vec3;
use crate::{OrbitalElements, OrbitalError, Result, FULL_CIRCLE_DEG};

/// Cartesian state at the instant of the last propagation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StateVector {
    /// Position (km)
    pub position: Vec3,
    /// Velocity (km/s)
    pub velocity: Vec3,
}

impl StateVector {
    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }

    /// Orbit normal r × v (unnormalized)
    pub fn orbit_normal(&self) -> Vec3 {
        self.position.cross(&self.velocity)
    }
}

/// Normalize an angle into [0, 360)
#[inline]
pub fn normalize_degrees(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(FULL_CIRCLE_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_CIRCLE_DEG {
        0.0
    } else {
        wrapped
    }
}

/// Mean anomaly after `elapsed_min` minutes, in [0, 360)
pub fn advance_mean_anomaly(elements: &OrbitalElements, elapsed_min: f64) -> f64 {
    assert!(
        elements.period_min > 0.0,
        "propagation requires a positive period, got {} min",
        elements.period_min
    );

    let delta_deg = (elements.mean_motion_rad_per_min() * elapsed_min).to_degrees();
    normalize_degrees(elements.mean_anomaly_deg + delta_deg)
}

/// Orbital plane → ECI rotation: inclination about x, then RAAN about z
fn plane_rotation(elements: &OrbitalElements) -> Rotation3<f64> {
    let inclination = Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination_deg.to_radians());
    let raan = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.raan_deg.to_radians());
    raan * inclination
}

/// State at the elements' current mean anomaly
pub fn state_at(elements: &OrbitalElements) -> StateVector {
    let a = elements.semi_major_axis_km;
    let ma = elements.mean_anomaly_deg.to_radians();
    let speed = elements.circular_speed_km_s();
    let rotation = plane_rotation(elements);

    let position_plane = Vec3::new(a * ma.cos(), a * ma.sin(), 0.0);
    let velocity_plane = Vec3::new(-speed * ma.sin(), speed * ma.cos(), 0.0);

    StateVector {
        position: rotation * position_plane,
        velocity: rotation * velocity_plane,
    }
}

/// Advance `elements` by `elapsed_min` simulated minutes.
///
/// Returns the updated elements (only the mean anomaly changes) and the
/// state at the new instant. Fails if the derived state is not finite.
pub fn propagate(elements: &OrbitalElements, elapsed_min: f64) -> Result<(OrbitalElements, StateVector)> {
    let mut next = *elements;
    next.mean_anomaly_deg = advance_mean_anomaly(elements, elapsed_min);

    let state = state_at(&next);
    if !state.is_finite() {
        return Err(OrbitalError::NonFiniteState(format!(
            "position {:?} velocity {:?} after {} min",
            state.position.as_slice(),
            state.velocity.as_slice(),
            elapsed_min
        )));
    }

    Ok((next, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::angle_between;
    use approx::assert_abs_diff_eq;

    fn equatorial(mean_anomaly_deg: f64) -> OrbitalElements {
        OrbitalElements::new(7000.0, 0.0, 0.0, 0.0, 0.0, mean_anomaly_deg, 100.0).unwrap()
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_abs_diff_eq!(normalize_degrees(725.0), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_degrees(-10.0), 350.0, epsilon = 1e-12);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_quarter_period_advances_ninety_degrees() {
        let el = equatorial(10.0);
        let ma = advance_mean_anomaly(&el, 25.0);
        assert_abs_diff_eq!(ma, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_elapsed_keeps_mean_anomaly() {
        let el = equatorial(123.4);
        let (next, _) = propagate(&el, 0.0).unwrap();
        assert_eq!(next.mean_anomaly_deg, 123.4);
    }

    #[test]
    fn test_only_mean_anomaly_changes() {
        let el = OrbitalElements::new(7167.0, 0.0001, 98.57, 267.89, 90.0, 45.2, 100.6).unwrap();
        let (next, _) = propagate(&el, 37.0).unwrap();
        assert_eq!(next.semi_major_axis_km, el.semi_major_axis_km);
        assert_eq!(next.eccentricity, el.eccentricity);
        assert_eq!(next.inclination_deg, el.inclination_deg);
        assert_eq!(next.raan_deg, el.raan_deg);
        assert_eq!(next.arg_of_perigee_deg, el.arg_of_perigee_deg);
        assert_eq!(next.period_min, el.period_min);
        assert_ne!(next.mean_anomaly_deg, el.mean_anomaly_deg);
    }

    #[test]
    fn test_equatorial_position() {
        let state = state_at(&equatorial(90.0));
        assert_abs_diff_eq!(state.position.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.y, 7000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inclination_then_raan_rotation() {
        // i = 90°, Ω = 90°, M = 90°: (0, a, 0) → (0, 0, a) → (0, 0, a)
        let el = OrbitalElements::new(7000.0, 0.0, 90.0, 90.0, 0.0, 90.0, 100.0).unwrap();
        let state = state_at(&el);
        assert_abs_diff_eq!(state.position.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.z, 7000.0, epsilon = 1e-9);

        // M = 0: (a, 0, 0) stays on the node line, rotated by Ω to +y
        let el = OrbitalElements::new(7000.0, 0.0, 90.0, 90.0, 0.0, 0.0, 100.0).unwrap();
        let state = state_at(&el);
        assert_abs_diff_eq!(state.position.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.y, 7000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_radius_is_semi_major_axis() {
        let el = OrbitalElements::new(7150.0, 0.012, 74.0, 265.3, 92.1, 48.9, 100.2).unwrap();
        let state = state_at(&el);
        assert_abs_diff_eq!(state.position.norm(), 7150.0, epsilon = 1e-6);
    }

    #[test]
    fn test_velocity_is_circular_and_tangential() {
        let el = OrbitalElements::new(7150.0, 0.012, 74.0, 265.3, 92.1, 48.9, 100.2).unwrap();
        let state = state_at(&el);
        assert_abs_diff_eq!(state.velocity.norm(), el.circular_speed_km_s(), epsilon = 1e-9);
        assert_abs_diff_eq!(angle_between(&state.position, &state.velocity), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let el = OrbitalElements::new(6793.0, 0.0005, 51.64, 45.23, 12.5, 234.8, 92.9).unwrap();
        let dt_min = 1e-4;
        let (_, s0) = propagate(&el, 0.0).unwrap();
        let (_, s1) = propagate(&el, dt_min).unwrap();
        let fd = (s1.position - s0.position) / (dt_min * 60.0);
        assert_abs_diff_eq!((fd - s0.velocity).norm(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_orbit_normal_follows_inclination() {
        let el = OrbitalElements::new(7000.0, 0.0, 0.0, 0.0, 0.0, 10.0, 100.0).unwrap();
        let normal = state_at(&el).orbit_normal();
        assert_abs_diff_eq!(angle_between(&normal, &Vec3::z()), 0.0, epsilon = 1e-4);

        let polar = OrbitalElements::new(7000.0, 0.0, 90.0, 0.0, 0.0, 10.0, 100.0).unwrap();
        let normal = state_at(&polar).orbit_normal();
        assert_abs_diff_eq!(angle_between(&normal, &Vec3::z()), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_full_period_preserves_separation() {
        let leader = OrbitalElements::new(7000.0, 0.0, 45.0, 30.0, 0.0, 20.0, 98.5).unwrap();
        let mut trailer = leader;
        trailer.mean_anomaly_deg = 10.0;

        let before = angle_between(&state_at(&leader).position, &state_at(&trailer).position);
        assert_abs_diff_eq!(before, 10.0, epsilon = 1e-6);

        let (l, ls) = propagate(&leader, leader.period_min).unwrap();
        let (t, ts) = propagate(&trailer, trailer.period_min).unwrap();
        assert_abs_diff_eq!(l.mean_anomaly_deg, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.mean_anomaly_deg, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_between(&ls.position, &ts.position), before, epsilon = 1e-6);
    }

    #[test]
    #[should_panic(expected = "positive period")]
    fn test_non_positive_period_fails_fast() {
        let mut el = equatorial(0.0);
        el.period_min = 0.0;
        let _ = advance_mean_anomaly(&el, 1.0);
    }

    #[test]
    fn test_non_finite_state_is_error() {
        let mut el = equatorial(0.0);
        el.semi_major_axis_km = f64::INFINITY;
        let err = propagate(&el, 1.0).unwrap_err();
        assert!(matches!(err, OrbitalError::NonFiniteState(_)));
    }
}
