//! Shared simulation handle
//!
//! Single writer, many readers. Every mutation holds the write lock for the
//! whole step, so ticks never overlap and readers never see a half-applied
//! tick. Readers get owned copies.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use collision_avoidance::{ConjunctionEvent, SpaceObject};
use parking_lot::RwLock;

use crate::simulation::{Simulation, SimulationSnapshot};
use crate::statistics::RiskStatistics;
use crate::Result;

#[derive(Clone)]
pub struct SimulationHandle {
    inner: Arc<RwLock<Simulation>>,
}

impl SimulationHandle {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(RwLock::new(simulation)),
        }
    }

    pub fn tick(&self, now: DateTime<Utc>) -> Result<Option<f64>> {
        self.inner.write().tick(now)
    }

    pub fn advance(&self, elapsed_minutes: f64) -> Result<Option<f64>> {
        self.inner.write().advance(elapsed_minutes)
    }

    pub fn start(&self, now: DateTime<Utc>) {
        self.inner.write().start(now);
    }

    pub fn pause(&self) {
        self.inner.write().pause();
    }

    pub fn toggle(&self, now: DateTime<Utc>) -> bool {
        self.inner.write().toggle(now)
    }

    pub fn set_speed(&self, requested: i64, now: DateTime<Utc>) -> u32 {
        self.inner.write().set_speed(requested, now)
    }

    pub fn reset(&self, now: DateTime<Utc>) {
        self.inner.write().reset(now);
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.inner.read().snapshot()
    }

    pub fn bodies(&self) -> Vec<SpaceObject> {
        self.inner.read().bodies().to_vec()
    }

    pub fn events(&self) -> Vec<ConjunctionEvent> {
        self.inner.read().events().to_vec()
    }

    pub fn statistics(&self) -> RiskStatistics {
        self.inner.read().statistics()
    }

    pub fn simulated_time(&self) -> DateTime<Utc> {
        self.inner.read().simulated_time()
    }

    pub fn is_running(&self) -> bool {
        self.inner.read().is_running()
    }

    pub fn speed(&self) -> u32 {
        self.inner.read().speed()
    }

    /// Run a read-only query under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::epoch;
    use crate::SimulationConfig;
    use chrono::Duration;
    use std::thread;

    fn handle() -> SimulationHandle {
        SimulationHandle::new(Simulation::with_seed_catalog(SimulationConfig::default(), epoch()).unwrap())
    }

    #[test]
    fn test_clones_share_state() {
        let a = handle();
        let b = a.clone();

        a.tick(epoch() + Duration::seconds(2)).unwrap();
        assert_eq!(b.simulated_time(), epoch() + Duration::seconds(200));

        b.pause();
        assert!(!a.is_running());
        assert_eq!(a.set_speed(5000, epoch()), 1000);
        assert_eq!(b.speed(), 1000);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let handle = handle();
        let snapshot = handle.snapshot();
        handle.advance(45.0).unwrap();

        assert_eq!(snapshot.cumulative_minutes, 0.0);
        assert_ne!(handle.snapshot().bodies, snapshot.bodies);
    }

    #[test]
    fn test_concurrent_readers_see_whole_ticks() {
        let handle = handle();
        let writer = {
            let handle = handle.clone();
            thread::spawn(move || {
                for step in 1..=50 {
                    handle.tick(epoch() + Duration::seconds(step)).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let snapshot = handle.snapshot();
                        // Every body carries the timestamp of the same committed tick
                        assert!(snapshot.bodies.iter().all(|b| b.object.last_updated == snapshot.simulated_time));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(handle.simulated_time(), epoch() + Duration::seconds(50 * 100));
    }

    #[test]
    fn test_read_query() {
        let handle = handle();
        let critical = handle.read(|sim| sim.statistics().critical_count);
        assert_eq!(critical, handle.statistics().critical_count);
        assert_eq!(handle.events().len(), 2);
        assert_eq!(handle.bodies().len(), 6);
    }

    #[test]
    fn test_reset_through_handle() {
        let handle = handle();
        handle.advance(500.0).unwrap();
        handle.toggle(epoch());
        handle.reset(epoch());
        assert!(handle.is_running());
        assert_eq!(handle.read(|sim| sim.cumulative_minutes()), 0.0);
    }
}
