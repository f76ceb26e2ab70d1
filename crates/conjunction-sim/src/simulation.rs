//! Simulation container: one clock, one catalog, one tick pipeline

use chrono::{DateTime, Utc};
use collision_avoidance::{ConjunctionEvent, SpaceObject};
use orbital_mechanics::transforms::{eci_to_geodetic, GeodeticPosition};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogDefinition, ConjunctionCatalog};
use crate::clock::SimulationClock;
use crate::config::SimulationConfig;
use crate::statistics::RiskStatistics;
use crate::Result;

/// A body plus its display-only derived values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodySnapshot {
    #[serde(flatten)]
    pub object: SpaceObject,
    pub altitude_km: f64,
    pub ground_point: GeodeticPosition,
}

impl From<&SpaceObject> for BodySnapshot {
    fn from(object: &SpaceObject) -> Self {
        Self {
            altitude_km: object.altitude_km(),
            ground_point: eci_to_geodetic(&object.state.position),
            object: object.clone(),
        }
    }
}

/// Owned copy of everything a reader may see, taken between ticks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationSnapshot {
    pub simulated_time: DateTime<Utc>,
    pub running: bool,
    pub speed: u32,
    pub cumulative_minutes: f64,
    pub bodies: Vec<BodySnapshot>,
    pub events: Vec<ConjunctionEvent>,
    pub statistics: RiskStatistics,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    clock: SimulationClock,
    catalog: ConjunctionCatalog,
}

impl Simulation {
    pub fn new(config: SimulationConfig, definition: CatalogDefinition, now: DateTime<Utc>) -> Result<Self> {
        config.validate()?;
        let clock = SimulationClock::new(now, config.initial_speed);
        let catalog = ConjunctionCatalog::new(definition, clock.simulated_time())?;

        info!(
            "Simulation ready: {} bodies, {} monitored pairs, {}x speed",
            catalog.bodies().len(),
            catalog.events().len(),
            clock.speed()
        );

        Ok(Self { config, clock, catalog })
    }

    /// Built-in demonstration catalog
    pub fn with_seed_catalog(config: SimulationConfig, now: DateTime<Utc>) -> Result<Self> {
        Self::new(config, CatalogDefinition::seed(), now)
    }

    /// One step of the pipeline driven by the wall clock.
    ///
    /// `Ok(None)` while paused. On a computation fault nothing from this
    /// step is committed and the simulation pauses itself.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Option<f64>> {
        let mut clock = self.clock.clone();
        match clock.tick(now) {
            Some(elapsed) => self.commit(clock, elapsed).map(Some),
            None => Ok(None),
        }
    }

    /// One step by an explicit number of simulated minutes, for callers that
    /// schedule time themselves. Same pause and fault semantics as [`tick`].
    ///
    /// [`tick`]: Simulation::tick
    pub fn advance(&mut self, elapsed_minutes: f64) -> Result<Option<f64>> {
        if !self.clock.is_running() {
            return Ok(None);
        }
        let mut clock = self.clock.clone();
        let elapsed = clock.advance(elapsed_minutes);
        if elapsed < elapsed_minutes {
            warn!(
                "Simulated time horizon reached, advanced {:.3} of {:.3} min",
                elapsed, elapsed_minutes
            );
        }
        self.commit(clock, elapsed).map(Some)
    }

    fn commit(&mut self, clock: SimulationClock, elapsed: f64) -> Result<f64> {
        if let Err(e) = self.catalog.advance(elapsed, clock.simulated_time()) {
            error!("Tick aborted, pausing simulation: {}", e);
            self.clock.pause();
            return Err(e);
        }

        self.clock = clock;
        debug!(
            "Tick: +{:.3} min ({:.3} total), {} bodies, sim time {}",
            elapsed,
            self.clock.cumulative_minutes(),
            self.catalog.bodies().len(),
            self.clock.simulated_time()
        );
        Ok(elapsed)
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.clock.start(now) {
            info!("Simulation started");
        }
    }

    pub fn pause(&mut self) {
        if self.clock.pause() {
            info!("Simulation paused");
        }
    }

    /// Returns whether the simulation now runs
    pub fn toggle(&mut self, now: DateTime<Utc>) -> bool {
        let running = self.clock.toggle(now);
        info!("Simulation {}", if running { "started" } else { "paused" });
        running
    }

    /// Returns the speed actually applied. Real time before `now` is not
    /// credited at the new speed.
    pub fn set_speed(&mut self, requested: i64, now: DateTime<Utc>) -> u32 {
        let previous = self.clock.speed();
        let speed = self.clock.set_speed(requested, now);
        if speed == previous {
            return speed;
        }
        if speed as i64 != requested {
            info!("Speed {}x requested, clamped to {}x", requested, speed);
        } else {
            info!("Speed set to {}x", speed);
        }
        speed
    }

    /// Hard reset: clock back to its initial running state at `now`, every
    /// body back to its catalog elements.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.clock.reset(now);
        self.catalog.restore(self.clock.simulated_time());
        info!("Simulation reset at {} ({}x)", now, self.clock.speed());
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn catalog(&self) -> &ConjunctionCatalog {
        &self.catalog
    }

    pub fn bodies(&self) -> &[SpaceObject] {
        self.catalog.bodies()
    }

    pub fn events(&self) -> &[ConjunctionEvent] {
        self.catalog.events()
    }

    pub fn statistics(&self) -> RiskStatistics {
        self.catalog.statistics()
    }

    pub fn simulated_time(&self) -> DateTime<Utc> {
        self.clock.simulated_time()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn speed(&self) -> u32 {
        self.clock.speed()
    }

    pub fn cumulative_minutes(&self) -> f64 {
        self.clock.cumulative_minutes()
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            simulated_time: self.clock.simulated_time(),
            running: self.clock.is_running(),
            speed: self.clock.speed(),
            cumulative_minutes: self.clock.cumulative_minutes(),
            bodies: self.catalog.bodies().iter().map(BodySnapshot::from).collect(),
            events: self.catalog.events().to_vec(),
            statistics: self.catalog.statistics(),
        }
    }
}
