//! Built-in demonstration catalog
//!
//! Four satellites and two debris fragments with representative LEO/GEO
//! elements, and the two monitored pairs against the COSMOS 2251 fragment.
//! Simulated profiles, not live TLE data.

use collision_avoidance::{ObjectType, SpaceObjectSpec};
use orbital_mechanics::OrbitalElements;

use crate::CatalogDefinition;

struct Entry {
    id: &'static str,
    name: &'static str,
    norad_id: u32,
    object_type: ObjectType,
    /// a (km), e, i, RAAN, ω, M (deg), period (min)
    elements: [f64; 7],
    description: &'static str,
}

const ENTRIES: [Entry; 6] = [
    Entry {
        id: "sat-001",
        name: "SENTINEL-2A",
        norad_id: 40697,
        object_type: ObjectType::Satellite,
        elements: [7167.0, 0.0001, 98.57, 267.89, 90.0, 45.2, 100.6],
        description: "Earth observation satellite (simulation profile)",
    },
    Entry {
        id: "sat-002",
        name: "AQUA",
        norad_id: 27424,
        object_type: ObjectType::Satellite,
        elements: [7083.0, 0.0002, 98.21, 189.45, 95.3, 123.7, 98.8],
        description: "LEO research satellite (simulation profile)",
    },
    Entry {
        id: "sat-003",
        name: "ISS",
        norad_id: 25544,
        object_type: ObjectType::Satellite,
        elements: [6793.0, 0.0005, 51.64, 45.23, 12.5, 234.8, 92.9],
        description: "Crewed spacecraft (simulation profile)",
    },
    Entry {
        id: "sat-004",
        name: "GOES-16",
        norad_id: 41866,
        object_type: ObjectType::Satellite,
        elements: [42164.0, 0.0001, 0.05, 275.1, 0.0, 180.5, 1436.1],
        description: "Geostationary weather satellite (simulation profile)",
    },
    Entry {
        id: "deb-001",
        name: "COSMOS 2251 Fragment",
        norad_id: 34454,
        object_type: ObjectType::Debris,
        elements: [7150.0, 0.012, 74.0, 265.3, 92.1, 48.9, 100.2],
        description: "Fragmentation debris (simulation profile)",
    },
    Entry {
        id: "deb-002",
        name: "FENGYUN-1C Fragment",
        norad_id: 31141,
        object_type: ObjectType::Debris,
        elements: [7220.0, 0.008, 99.1, 178.9, 45.6, 289.3, 101.5],
        description: "High-inclination debris fragment",
    },
];

const PAIRS: [(&str, &str); 2] = [("sat-001", "deb-001"), ("sat-003", "deb-001")];

impl Entry {
    fn to_spec(&self) -> SpaceObjectSpec {
        let [a, e, i, raan, argp, m, period] = self.elements;
        SpaceObjectSpec {
            id: self.id.to_string(),
            name: self.name.to_string(),
            norad_id: self.norad_id,
            object_type: self.object_type,
            elements: OrbitalElements {
                semi_major_axis_km: a,
                eccentricity: e,
                inclination_deg: i,
                raan_deg: raan,
                arg_of_perigee_deg: argp,
                mean_anomaly_deg: m,
                period_min: period,
            },
            description: Some(self.description.to_string()),
        }
    }
}

pub fn seed_objects() -> Vec<SpaceObjectSpec> {
    ENTRIES.iter().map(Entry::to_spec).collect()
}

pub fn seed_pairs() -> Vec<(String, String)> {
    PAIRS
        .iter()
        .map(|&(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

impl CatalogDefinition {
    pub fn seed() -> Self {
        Self {
            objects: seed_objects(),
            monitored_pairs: seed_pairs(),
        }
    }
}
