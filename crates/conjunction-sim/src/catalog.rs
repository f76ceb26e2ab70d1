//! Conjunction catalog
//!
//! Owns the tracked bodies and the monitored pairs. Membership is fixed at
//! construction; only states and event metrics change afterwards.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use collision_avoidance::{CollisionError, ConjunctionEvent, ObjectType, RiskLevel, SpaceObject, SpaceObjectSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::statistics::RiskStatistics;
use crate::{Result, SimError};

/// Static catalog input: bodies plus monitored id pairs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogDefinition {
    pub objects: Vec<SpaceObjectSpec>,
    #[serde(default)]
    pub monitored_pairs: Vec<(String, String)>,
}

impl CatalogDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Event selection. Empty lists match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventFilter {
    pub risk_levels: Vec<RiskLevel>,
    pub min_risk_score: u8,
    /// Matches when either body has one of these types
    pub object_types: Vec<ObjectType>,
}

impl EventFilter {
    pub fn with_risk_levels(mut self, levels: impl IntoIterator<Item = RiskLevel>) -> Self {
        self.risk_levels = levels.into_iter().collect();
        self
    }

    pub fn with_min_risk_score(mut self, score: u8) -> Self {
        self.min_risk_score = score;
        self
    }

    pub fn with_object_types(mut self, types: impl IntoIterator<Item = ObjectType>) -> Self {
        self.object_types = types.into_iter().collect();
        self
    }

    fn matches(&self, event: &ConjunctionEvent, primary: &SpaceObject, secondary: &SpaceObject) -> bool {
        (self.risk_levels.is_empty() || self.risk_levels.contains(&event.risk_level()))
            && event.risk_score() >= self.min_risk_score
            && (self.object_types.is_empty()
                || self.object_types.contains(&primary.object_type)
                || self.object_types.contains(&secondary.object_type))
    }
}

#[derive(Debug, Clone)]
pub struct ConjunctionCatalog {
    /// Bodies exactly as constructed, for hard reset
    initial: Vec<SpaceObject>,
    bodies: Vec<SpaceObject>,
    index: HashMap<String, usize>,
    /// Parallel to `events`: (primary, secondary) body indices
    pairs: Vec<(usize, usize)>,
    events: Vec<ConjunctionEvent>,
}

impl ConjunctionCatalog {
    /// Validate every body and pair, then derive states and first assessments
    pub fn new(definition: CatalogDefinition, epoch: DateTime<Utc>) -> Result<Self> {
        let mut bodies = Vec::with_capacity(definition.objects.len());
        let mut index = HashMap::with_capacity(definition.objects.len());

        for spec in definition.objects {
            if index.contains_key(&spec.id) {
                return Err(SimError::DuplicateObject(spec.id));
            }
            let body = SpaceObject::new(spec, epoch)?;
            index.insert(body.id.clone(), bodies.len());
            bodies.push(body);
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::with_capacity(definition.monitored_pairs.len());
        for (primary, secondary) in definition.monitored_pairs {
            let lookup = |id: &str| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| CollisionError::ObjectNotFound(id.to_string()))
            };
            let (p, s) = (lookup(&primary)?, lookup(&secondary)?);

            if p == s {
                return Err(SimError::SelfConjunction(primary));
            }
            if !seen.insert((p.min(s), p.max(s))) {
                return Err(SimError::DuplicatePair(primary, secondary));
            }
            pairs.push((p, s));
        }

        let events = assess_all(&bodies, &pairs);
        debug!("Catalog built: {} bodies, {} monitored pairs", bodies.len(), pairs.len());

        Ok(Self {
            initial: bodies.clone(),
            bodies,
            index,
            pairs,
            events,
        })
    }

    /// Propagate every body by `elapsed_minutes`, then refresh every event.
    ///
    /// All-or-nothing: if any body yields a non-finite state, nothing is
    /// committed and the offending body is named in the error.
    pub fn advance(&mut self, elapsed_minutes: f64, at: DateTime<Utc>) -> Result<()> {
        let next = self
            .bodies
            .iter()
            .map(|body| {
                body.propagated(elapsed_minutes, at).map_err(|source| {
                    error!("Propagation of {} failed: {}", body.id, source);
                    SimError::ComputationFault {
                        body_id: body.id.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.bodies = next;

        for (event, &(p, s)) in self.events.iter_mut().zip(&self.pairs) {
            let previous = event.risk_level();
            event.refresh(&self.bodies[p], &self.bodies[s]);
            if event.risk_level() != previous {
                warn!(
                    "Conjunction {} changed {} -> {} (miss {:.3} km, score {})",
                    event.id,
                    previous,
                    event.risk_level(),
                    event.assessment.miss_distance_km,
                    event.risk_score()
                );
            }
        }

        Ok(())
    }

    /// Discard all propagation history: bodies return to their constructed
    /// elements, stamped at `epoch`, and events are reassessed.
    pub fn restore(&mut self, epoch: DateTime<Utc>) {
        self.bodies = self
            .initial
            .iter()
            .map(|body| SpaceObject {
                last_updated: epoch,
                ..body.clone()
            })
            .collect();
        self.events = assess_all(&self.bodies, &self.pairs);
    }

    pub fn bodies(&self) -> &[SpaceObject] {
        &self.bodies
    }

    pub fn initial_bodies(&self) -> &[SpaceObject] {
        &self.initial
    }

    pub fn body(&self, id: &str) -> collision_avoidance::Result<&SpaceObject> {
        self.index
            .get(id)
            .map(|&i| &self.bodies[i])
            .ok_or_else(|| CollisionError::ObjectNotFound(id.to_string()))
    }

    pub fn events(&self) -> &[ConjunctionEvent] {
        &self.events
    }

    pub fn events_by_risk_level(&self, level: RiskLevel) -> Vec<&ConjunctionEvent> {
        self.events.iter().filter(|e| e.risk_level() == level).collect()
    }

    pub fn events_for_object(&self, id: &str) -> Vec<&ConjunctionEvent> {
        self.events.iter().filter(|e| e.involves(id)).collect()
    }

    /// Matching events, highest risk score first (ties keep catalog order)
    pub fn filter(&self, filter: &EventFilter) -> Vec<&ConjunctionEvent> {
        let mut matched: Vec<_> = self
            .events
            .iter()
            .zip(&self.pairs)
            .filter(|(event, &(p, s))| filter.matches(event, &self.bodies[p], &self.bodies[s]))
            .map(|(event, _)| event)
            .collect();
        matched.sort_by(|a, b| b.risk_score().cmp(&a.risk_score()));
        matched
    }

    pub fn statistics(&self) -> RiskStatistics {
        RiskStatistics::from_events(&self.events)
    }
}

fn assess_all(bodies: &[SpaceObject], pairs: &[(usize, usize)]) -> Vec<ConjunctionEvent> {
    pairs
        .iter()
        .map(|&(p, s)| ConjunctionEvent::assess(&bodies[p], &bodies[s]))
        .collect()
}
