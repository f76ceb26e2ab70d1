//! Conjunction Simulation
//!
//! The tick pipeline for conjunction screening: a simulated clock that turns
//! wall-clock time into elapsed orbital minutes, and a catalog of tracked
//! bodies and monitored pairs that is re-propagated and re-assessed on every
//! tick.
//!
//! ```text
//! timer ─▶ SimulationClock::tick ─▶ propagate all bodies ─▶ refresh all events
//!                                    (all-or-nothing)        (read committed bodies)
//! ```
//!
//! [`Simulation`] owns one clock and one catalog. It is a plain value so that
//! independent instances can coexist; [`SimulationHandle`] shares one behind
//! a lock for a periodic driver and any number of snapshot readers.

use collision_avoidance::CollisionError;
use orbital_mechanics::OrbitalError;
use thiserror::Error;

pub mod catalog;
pub mod clock;
pub mod config;
pub mod handle;
pub mod seed;
pub mod simulation;
pub mod statistics;

pub use catalog::{CatalogDefinition, ConjunctionCatalog, EventFilter};
pub use clock::{ClockState, SimulationClock};
pub use config::SimulationConfig;
pub use handle::SimulationHandle;
pub use simulation::{BodySnapshot, Simulation, SimulationSnapshot};
pub use statistics::{RiskStatistics, SystemStatus};

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Catalog(#[from] CollisionError),
    #[error("Duplicate object id: {0}")]
    DuplicateObject(String),
    #[error("Object {0} cannot be paired with itself")]
    SelfConjunction(String),
    #[error("Pair {0}/{1} is monitored more than once")]
    DuplicatePair(String, String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Computation fault on {body_id}: {source}")]
    ComputationFault {
        body_id: String,
        #[source]
        source: OrbitalError,
    },
}

pub type Result<T> = std::result::Result<T, SimError>;
