//! Risk scoring implementation
//!
//! Implements the 2-factor heuristic:
//! Score = w_d·D + w_v·V, with D and V each clamped to [0, 100].
//!
//! Weights and thresholds are fixed policy, not physics.

use orbital_mechanics::vector::{angle_between, distance, linear_closest_approach, relative_speed};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::explain::{self, RiskExplanation, RiskFactor};
use crate::{RiskLevel, SpaceObject};

/// Critical band upper bound (km, exclusive)
pub const CRITICAL_DISTANCE_KM: f64 = 0.1;
/// Warning band upper bound (km, exclusive)
pub const WARNING_DISTANCE_KM: f64 = 1.0;
/// Low band upper bound (km, exclusive); at or beyond this is safe
pub const LOW_DISTANCE_KM: f64 = 5.0;

/// Score weights. Sum = 1.0
pub const W_DISTANCE: f64 = 0.65;
pub const W_VELOCITY: f64 = 0.35;

/// Distance score lost per km of miss distance
pub const DISTANCE_PENALTY_PER_KM: f64 = 20.0;
/// Velocity score gained per km/s of relative velocity
pub const VELOCITY_POINTS_PER_KM_S: f64 = 6.0;

pub const MAX_SCORE: f64 = 100.0;

/// Closing speed flagged as high-energy (km/s)
pub const HIGH_RELATIVE_VELOCITY_KM_S: f64 = 10.0;
/// Closing speed below which the encounter is slow (km/s)
pub const LOW_RELATIVE_VELOCITY_KM_S: f64 = 1.0;
/// Orbit normals closer than this are near-coplanar (deg)
pub const COPLANAR_ANGLE_DEG: f64 = 10.0;

/// Linear closest-approach search window (7 days)
pub const TCA_HORIZON_S: f64 = 7.0 * 86_400.0;

/// Derived metrics for one pair at one instant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    /// Instantaneous separation (km)
    pub miss_distance_km: f64,
    pub relative_velocity_km_s: f64,
    /// 0-100
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    /// Angle between orbit normals, if both are defined
    pub plane_angle_deg: Option<f64>,
    /// Seconds until closest approach under linear relative motion
    pub time_to_closest_approach_s: f64,
    /// Predicted separation at that closest approach (km)
    pub closest_approach_km: f64,
    pub explanation: RiskExplanation,
    pub contributing_factors: Vec<RiskFactor>,
}

#[inline]
pub fn distance_score(miss_distance_km: f64) -> f64 {
    (MAX_SCORE - miss_distance_km * DISTANCE_PENALTY_PER_KM).clamp(0.0, MAX_SCORE)
}

#[inline]
pub fn velocity_score(relative_velocity_km_s: f64) -> f64 {
    (relative_velocity_km_s * VELOCITY_POINTS_PER_KM_S).clamp(0.0, MAX_SCORE)
}

/// Weighted 0-100 score
pub fn risk_score(miss_distance_km: f64, relative_velocity_km_s: f64) -> u8 {
    let weighted = W_DISTANCE * distance_score(miss_distance_km)
        + W_VELOCITY * velocity_score(relative_velocity_km_s);
    weighted.clamp(0.0, MAX_SCORE).round() as u8
}

/// Assess a pair of objects at the instant of their last propagation.
///
/// Deterministic: identical states always produce identical output.
pub fn evaluate(primary: &SpaceObject, secondary: &SpaceObject) -> RiskAssessment {
    let (a, b) = (&primary.state, &secondary.state);

    let miss_distance_km = distance(&a.position, &b.position);
    let relative_velocity_km_s = relative_speed(&a.velocity, &b.velocity);
    let risk_level = RiskLevel::from_miss_distance(miss_distance_km);
    let risk_score = risk_score(miss_distance_km, relative_velocity_km_s);

    let (normal_a, normal_b) = (a.orbit_normal(), b.orbit_normal());
    let plane_angle_deg = (normal_a.norm() > 0.0 && normal_b.norm() > 0.0)
        .then(|| angle_between(&normal_a, &normal_b));

    let (time_to_closest_approach_s, closest_approach_km) = linear_closest_approach(
        &(b.position - a.position),
        &(b.velocity - a.velocity),
        TCA_HORIZON_S,
    );

    let context = explain::Context {
        primary,
        secondary,
        risk_level,
        risk_score,
        miss_distance_km,
        relative_velocity_km_s,
        plane_angle_deg,
        time_to_closest_approach_s,
        closest_approach_km,
    };
    let explanation = explain::explain(&context);
    let contributing_factors = explain::contributing_factors(&context);

    debug!(
        "Assessed {}/{}: {} score={} (miss={:.3} km, rel_v={:.2} km/s, plane={:?})",
        primary.id, secondary.id, risk_level, risk_score, miss_distance_km, relative_velocity_km_s, plane_angle_deg
    );

    RiskAssessment {
        miss_distance_km,
        relative_velocity_km_s,
        risk_score,
        risk_level,
        plane_angle_deg,
        time_to_closest_approach_s,
        closest_approach_km,
        explanation,
        contributing_factors,
    }
}
