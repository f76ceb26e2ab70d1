//! Collision Avoidance Library
//!
//! Conjunction assessment for tracked satellites and debris. Geometry from
//! the propagated states is turned into a deterministic 0-100 risk score,
//! a discrete risk level and a human-readable explanation.
//!
//! # Risk Model
//!
//! ```text
//! distance_score = clamp(0, 100, 100 - 20 · miss_km)
//! velocity_score = clamp(0, 100, 6 · rel_v_km_s)
//! score          = round(clamp(0, 100, 0.65 · distance_score + 0.35 · velocity_score))
//! ```
//!
//! | Level    | Miss distance   |
//! |----------|-----------------|
//! | Critical | < 0.1 km        |
//! | Warning  | [0.1, 1.0) km   |
//! | Low      | [1.0, 5.0) km   |
//! | Safe     | ≥ 5.0 km        |
//!
//! The score is a transparent weighting, not a collision probability.

use chrono::{DateTime, Duration, Utc};
use orbital_mechanics::{propagation, OrbitalElements, OrbitalError, StateVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod explain;
pub mod risk;

pub use explain::{RiskExplanation, RiskFactor};
pub use risk::{evaluate, RiskAssessment};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),
    #[error("Invalid object {id}: {source}")]
    InvalidObject {
        id: String,
        #[source]
        source: OrbitalError,
    },
}

pub type Result<T> = std::result::Result<T, CollisionError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    Warning,
    Low,
    Safe,
}

impl RiskLevel {
    /// All levels, most severe first
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critical,
        RiskLevel::Warning,
        RiskLevel::Low,
        RiskLevel::Safe,
    ];

    /// Fixed distance bands. A distance equal to a threshold falls in the
    /// less severe band.
    pub fn from_miss_distance(miss_distance_km: f64) -> Self {
        if miss_distance_km < risk::CRITICAL_DISTANCE_KM {
            RiskLevel::Critical
        } else if miss_distance_km < risk::WARNING_DISTANCE_KM {
            RiskLevel::Warning
        } else if miss_distance_km < risk::LOW_DISTANCE_KM {
            RiskLevel::Low
        } else {
            RiskLevel::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Low => "low",
            Self::Safe => "safe",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Satellite,
    Debris,
}

/// Static catalog entry for one tracked object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpaceObjectSpec {
    pub id: String,
    pub name: String,
    pub norad_id: u32,
    pub object_type: ObjectType,
    pub elements: OrbitalElements,
    #[serde(default)]
    pub description: Option<String>,
}

/// A tracked body with its state at the last propagation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpaceObject {
    pub id: String,
    pub norad_id: u32,
    pub name: String,
    pub object_type: ObjectType,
    pub description: Option<String>,
    pub elements: OrbitalElements,
    /// Valid only for `last_updated`
    pub state: StateVector,
    pub last_updated: DateTime<Utc>,
}

impl SpaceObject {
    /// Validate the catalog entry and derive its state at `epoch`
    pub fn new(spec: SpaceObjectSpec, epoch: DateTime<Utc>) -> Result<Self> {
        let invalid = |source| CollisionError::InvalidObject {
            id: spec.id.clone(),
            source,
        };

        spec.elements.validate().map_err(invalid)?;
        let (elements, state) = propagation::propagate(&spec.elements, 0.0).map_err(invalid)?;

        Ok(Self {
            id: spec.id,
            norad_id: spec.norad_id,
            name: spec.name,
            object_type: spec.object_type,
            description: spec.description,
            elements,
            state,
            last_updated: epoch,
        })
    }

    /// This object advanced by `elapsed_min`, stamped at `at`.
    ///
    /// Pure: `self` is untouched, so a failed step leaves no partial update.
    pub fn propagated(&self, elapsed_min: f64, at: DateTime<Utc>) -> orbital_mechanics::Result<Self> {
        let (elements, state) = propagation::propagate(&self.elements, elapsed_min)?;
        Ok(Self {
            elements,
            state,
            last_updated: at,
            ..self.clone()
        })
    }

    pub fn is_debris(&self) -> bool {
        self.object_type == ObjectType::Debris
    }

    pub fn altitude_km(&self) -> f64 {
        orbital_mechanics::transforms::altitude_km(&self.elements)
    }
}

/// A monitored pair of objects and its latest assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConjunctionEvent {
    pub id: String,
    pub primary_object: String,
    pub secondary_object: String,
    /// Estimated time of closest approach
    pub tca: DateTime<Utc>,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
}

impl ConjunctionEvent {
    /// Assess a pair at the instant of their last propagation
    pub fn assess(primary: &SpaceObject, secondary: &SpaceObject) -> Self {
        let assessment = evaluate(primary, secondary);
        Self {
            id: format!("{}:{}", primary.id, secondary.id),
            primary_object: primary.id.clone(),
            secondary_object: secondary.id.clone(),
            tca: Self::tca_from(primary, secondary, &assessment),
            assessment,
        }
    }

    /// Replace every derived metric with a fresh assessment
    pub fn refresh(&mut self, primary: &SpaceObject, secondary: &SpaceObject) {
        let assessment = evaluate(primary, secondary);
        self.tca = Self::tca_from(primary, secondary, &assessment);
        self.assessment = assessment;
    }

    fn tca_from(primary: &SpaceObject, secondary: &SpaceObject, assessment: &RiskAssessment) -> DateTime<Utc> {
        let epoch = primary.last_updated.max(secondary.last_updated);
        let offset_ms = (assessment.time_to_closest_approach_s * 1000.0).round() as i64;
        // At the end of the representable timeline the approach is reported as now
        epoch
            .checked_add_signed(Duration::milliseconds(offset_ms))
            .unwrap_or(epoch)
    }

    pub fn involves(&self, object_id: &str) -> bool {
        self.primary_object == object_id || self.secondary_object == object_id
    }

    #[inline]
    pub fn risk_level(&self) -> RiskLevel {
        self.assessment.risk_level
    }

    #[inline]
    pub fn risk_score(&self) -> u8 {
        self.assessment.risk_score
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_miss_distance(0.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_miss_distance(0.099), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_miss_distance(0.1), RiskLevel::Warning);
        assert_eq!(RiskLevel::from_miss_distance(0.999), RiskLevel::Warning);
        assert_eq!(RiskLevel::from_miss_distance(1.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_miss_distance(4.999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_miss_distance(5.0), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_miss_distance(42_000.0), RiskLevel::Safe);
    }

    #[test]
    fn test_level_names() {
        assert_eq!(RiskLevel::Critical.to_string(), "critical");
        assert_eq!(serde_json::to_string(&RiskLevel::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&ObjectType::Debris).unwrap(), "\"debris\"");
        let level: RiskLevel = serde_json::from_str("\"safe\"").unwrap();
        assert_eq!(level, RiskLevel::Safe);
    }

    #[test]
    fn test_invalid_object_rejected() {
        let mut elements = circular(51.6, 0.0, 0.0);
        elements.period_min = 0.0;
        let err = SpaceObject::new(
            SpaceObjectSpec {
                id: "bad-001".to_string(),
                name: "BAD".to_string(),
                norad_id: 1,
                object_type: ObjectType::Debris,
                elements,
                description: None,
            },
            epoch(),
        )
        .unwrap_err();

        match err {
            CollisionError::InvalidObject { id, .. } => assert_eq!(id, "bad-001"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_object_has_derived_state() {
        let obj = object("sat-001", ObjectType::Satellite, circular(0.0, 0.0, 90.0));
        assert!((obj.state.position.y - 7000.0).abs() < 1e-9);
        assert_eq!(obj.last_updated, epoch());
        assert!((obj.altitude_km() - 629.0).abs() < 1e-9);
    }

    #[test]
    fn test_propagated_is_pure() {
        let obj = object("sat-001", ObjectType::Satellite, circular(51.6, 10.0, 0.0));
        let later = epoch() + Duration::minutes(10);
        let next = obj.propagated(24.5, later).unwrap();

        assert_eq!(obj.elements.mean_anomaly_deg, 0.0);
        assert!((next.elements.mean_anomaly_deg - 90.0).abs() < 1e-9);
        assert_eq!(next.last_updated, later);
        assert_eq!(next.id, obj.id);
    }

    #[test]
    fn test_event_identity_and_refresh() {
        let a = object("sat-001", ObjectType::Satellite, circular(51.6, 10.0, 0.0));
        let b = object("deb-001", ObjectType::Debris, circular(51.6, 10.0, 1.0));

        let mut event = ConjunctionEvent::assess(&a, &b);
        assert_eq!(event.id, "sat-001:deb-001");
        assert!(event.involves("sat-001"));
        assert!(event.involves("deb-001"));
        assert!(!event.involves("sat-002"));

        let later = epoch() + Duration::minutes(5);
        let a2 = a.propagated(5.0, later).unwrap();
        let b2 = b.propagated(5.0, later).unwrap();
        event.refresh(&a2, &b2);

        assert_eq!(event.id, "sat-001:deb-001");
        assert_eq!(event, ConjunctionEvent::assess(&a2, &b2));
    }

    #[test]
    fn test_tca_not_before_epoch() {
        let a = object("sat-001", ObjectType::Satellite, circular(51.6, 10.0, 0.0));
        let b = object("deb-001", ObjectType::Debris, circular(98.0, 10.0, 3.0));
        let event = ConjunctionEvent::assess(&a, &b);
        assert!(event.tca >= epoch());
    }

    #[test]
    fn test_tca_at_end_of_timeline() {
        // Both 5° short of the node they share, so still closing
        let mut a = object("sat-001", ObjectType::Satellite, circular(50.0, 30.0, 355.0));
        let mut b = object("deb-001", ObjectType::Debris, circular(90.0, 30.0, 355.0));

        let event = ConjunctionEvent::assess(&a, &b);
        assert!(event.assessment.time_to_closest_approach_s > 0.0);
        assert!(event.tca > epoch());

        a.last_updated = DateTime::<Utc>::MAX_UTC;
        b.last_updated = DateTime::<Utc>::MAX_UTC;
        let event = ConjunctionEvent::assess(&a, &b);
        assert_eq!(event.tca, DateTime::<Utc>::MAX_UTC);
    }
}
