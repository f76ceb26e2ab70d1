//! Human-readable risk explanations
//!
//! Every string is composed from the same inputs the score uses, so an
//! explanation never disagrees with the numbers next to it.

use serde::{Deserialize, Serialize};

use crate::risk::{
    distance_score, velocity_score, COPLANAR_ANGLE_DEG, CRITICAL_DISTANCE_KM, HIGH_RELATIVE_VELOCITY_KM_S,
    LOW_DISTANCE_KM, LOW_RELATIVE_VELOCITY_KM_S, WARNING_DISTANCE_KM, W_DISTANCE, W_VELOCITY,
};
use crate::{RiskLevel, SpaceObject};

/// Closest approach sooner than this is reported as already reached (s)
const IMMINENT_APPROACH_S: f64 = 1.0;

/// Explanation bundle shown next to an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskExplanation {
    pub summary: String,
    /// Ordered: distance, velocity, geometry, object type, timing
    pub factors: Vec<String>,
    pub recommendation: String,
}

/// One weighted input to the score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFactor {
    pub name: String,
    pub value: f64,
    /// Relative influence on the score; 0 for informational factors
    pub weight: f64,
    pub description: String,
}

pub(crate) struct Context<'a> {
    pub primary: &'a SpaceObject,
    pub secondary: &'a SpaceObject,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub miss_distance_km: f64,
    pub relative_velocity_km_s: f64,
    pub plane_angle_deg: Option<f64>,
    pub time_to_closest_approach_s: f64,
    pub closest_approach_km: f64,
}

impl Context<'_> {
    fn debris_involved(&self) -> bool {
        self.primary.is_debris() || self.secondary.is_debris()
    }
}

pub fn recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "Evaluate avoidance maneuver and prioritize tracking updates.",
        RiskLevel::Warning => "Initiate conjunction assessment and prepare mitigation options.",
        RiskLevel::Low => "Continue monitoring and refresh tracking data before the next pass.",
        RiskLevel::Safe => "No action required. Maintain routine screening.",
    }
}

fn level_title(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "Critical",
        RiskLevel::Warning => "Warning",
        RiskLevel::Low => "Low-risk",
        RiskLevel::Safe => "Safe",
    }
}

pub(crate) fn explain(ctx: &Context<'_>) -> RiskExplanation {
    let summary = format!(
        "{} conjunction between {} and {}: {:.3} km miss distance at {:.2} km/s relative velocity (score {}).",
        level_title(ctx.risk_level),
        ctx.primary.name,
        ctx.secondary.name,
        ctx.miss_distance_km,
        ctx.relative_velocity_km_s,
        ctx.risk_score,
    );

    let mut factors = Vec::with_capacity(5);

    factors.push(match ctx.risk_level {
        RiskLevel::Critical => format!("Miss distance well below critical threshold ({} km)", CRITICAL_DISTANCE_KM),
        RiskLevel::Warning => format!("Miss distance inside the {} km warning threshold", WARNING_DISTANCE_KM),
        RiskLevel::Low => format!("Miss distance inside the {} km screening volume", LOW_DISTANCE_KM),
        RiskLevel::Safe => format!("Miss distance outside the {} km screening volume", LOW_DISTANCE_KM),
    });

    factors.push(if ctx.relative_velocity_km_s >= HIGH_RELATIVE_VELOCITY_KM_S {
        "High closing velocity increases impact severity".to_string()
    } else if ctx.relative_velocity_km_s < LOW_RELATIVE_VELOCITY_KM_S {
        "Low relative velocity: slow, co-moving encounter".to_string()
    } else {
        "Moderate relative velocity".to_string()
    });

    if let Some(angle) = ctx.plane_angle_deg {
        if angle < COPLANAR_ANGLE_DEG {
            factors.push("Similar orbital planes extend conjunction duration".to_string());
        } else {
            factors.push(format!("Orbital planes cross at {:.1}°, shortening the encounter window", angle));
        }
    }

    if ctx.debris_involved() {
        factors.push("Fragmented debris object: elevated tracking uncertainty".to_string());
    }

    if ctx.time_to_closest_approach_s >= IMMINENT_APPROACH_S {
        factors.push(format!(
            "Closest approach predicted in {:.1} min at {:.3} km",
            ctx.time_to_closest_approach_s / 60.0,
            ctx.closest_approach_km
        ));
    } else {
        factors.push("Objects are at or past closest approach".to_string());
    }

    RiskExplanation {
        summary,
        factors,
        recommendation: recommendation(ctx.risk_level).to_string(),
    }
}

pub(crate) fn contributing_factors(ctx: &Context<'_>) -> Vec<RiskFactor> {
    let mut out = vec![
        RiskFactor {
            name: "Miss Distance".to_string(),
            value: ctx.miss_distance_km,
            weight: W_DISTANCE,
            description: format!(
                "Primary driver of conjunction severity (distance score {:.1})",
                distance_score(ctx.miss_distance_km)
            ),
        },
        RiskFactor {
            name: "Relative Velocity".to_string(),
            value: ctx.relative_velocity_km_s,
            weight: W_VELOCITY,
            description: format!(
                "Encounter energy (velocity score {:.1})",
                velocity_score(ctx.relative_velocity_km_s)
            ),
        },
    ];

    if let Some(angle) = ctx.plane_angle_deg {
        out.push(RiskFactor {
            name: "Orbital Geometry".to_string(),
            value: angle,
            weight: 0.0,
            description: if angle < COPLANAR_ANGLE_DEG {
                "Near-coplanar orbits".to_string()
            } else {
                "Crossing orbital planes".to_string()
            },
        });
    }

    if ctx.debris_involved() {
        out.push(RiskFactor {
            name: "Tracking Uncertainty".to_string(),
            value: 1.0,
            weight: 0.0,
            description: "Fragmented debris object".to_string(),
        });
    }

    out
}
