//! Simulation configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::clamp_speed;
use crate::{Result, SimError};

/// Wall-clock period between ticks (ms)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2000;
/// Simulated-to-real time multiplier at start and after reset
pub const DEFAULT_SPEED: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    pub initial_speed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            initial_speed: DEFAULT_SPEED,
        }
    }
}

impl SimulationConfig {
    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms;
        self
    }

    /// Clamped the same way as a live speed change
    pub fn with_initial_speed(mut self, speed: i64) -> Self {
        self.initial_speed = clamp_speed(speed);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(SimError::InvalidConfig("tick_interval_ms must be positive".to_string()));
        }
        Ok(())
    }
}
