//! Simulated clock
//!
//! Two states, Running and Paused. While running, every tick converts the
//! real time since the previous tick into simulated minutes at the current
//! speed multiplier. Simulated time only moves forward.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Slowest allowed multiplier (real time)
pub const MIN_SPEED: u32 = 1;
/// Fastest allowed multiplier
pub const MAX_SPEED: u32 = 1000;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Running,
    Paused,
}

/// Clamp any requested multiplier into [MIN_SPEED, MAX_SPEED]
#[inline]
pub fn clamp_speed(requested: i64) -> u32 {
    requested.clamp(MIN_SPEED as i64, MAX_SPEED as i64) as u32
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationClock {
    state: ClockState,
    start_time: DateTime<Utc>,
    simulated_time: DateTime<Utc>,
    speed: u32,
    initial_speed: u32,
    last_real_tick: DateTime<Utc>,
    cumulative_minutes: f64,
}

impl SimulationClock {
    /// A running clock whose simulated time starts at `now`
    pub fn new(now: DateTime<Utc>, initial_speed: u32) -> Self {
        let speed = clamp_speed(initial_speed as i64);
        Self {
            state: ClockState::Running,
            start_time: now,
            simulated_time: now,
            speed,
            initial_speed: speed,
            last_real_tick: now,
            cumulative_minutes: 0.0,
        }
    }

    /// Resume. Returns false if already running.
    ///
    /// Time spent paused never accrues: the next tick measures from `now`.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = ClockState::Running;
        self.last_real_tick = now;
        true
    }

    /// Returns false if already paused
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = ClockState::Paused;
        true
    }

    /// Flip between running and paused; returns whether the clock now runs
    pub fn toggle(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_running() {
            self.pause();
        } else {
            self.start(now);
        }
        self.is_running()
    }

    /// Set the multiplier, clamped into [1, 1000]. Does not advance time.
    ///
    /// The tick origin moves to `now`, so real time before the change is
    /// never credited at the new speed.
    pub fn set_speed(&mut self, requested: i64, now: DateTime<Utc>) -> u32 {
        self.speed = clamp_speed(requested);
        self.last_real_tick = now;
        self.speed
    }

    /// Back to the initial running state at `now`, with the initial speed
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now, self.initial_speed);
    }

    /// Advance by the real time since the last tick.
    ///
    /// `None` while paused. Otherwise the simulated minutes added, which is
    /// zero when `now` precedes the previous tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<f64> {
        if !self.is_running() {
            return None;
        }

        let real_elapsed_ms = (now - self.last_real_tick).num_milliseconds().max(0);
        self.last_real_tick = now;

        let elapsed_minutes = (real_elapsed_ms as f64 / MS_PER_MINUTE) * self.speed as f64;
        Some(self.advance(elapsed_minutes))
    }

    /// Advance by an explicit number of simulated minutes, ignoring the wall
    /// clock. Negative input advances nothing. Returns the minutes added,
    /// which stop short of the request once the horizon is reached.
    pub fn advance(&mut self, elapsed_minutes: f64) -> f64 {
        let headroom = self.horizon_minutes() - self.cumulative_minutes;
        let elapsed_minutes = if elapsed_minutes > 0.0 {
            elapsed_minutes.min(headroom).max(0.0)
        } else {
            0.0
        };

        self.cumulative_minutes += elapsed_minutes;
        let offset_ms = (self.cumulative_minutes * MS_PER_MINUTE).round() as i64;
        self.simulated_time = self
            .start_time
            .checked_add_signed(Duration::milliseconds(offset_ms))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        elapsed_minutes
    }

    /// Largest cumulative offset whose simulated time is still representable
    pub fn horizon_minutes(&self) -> f64 {
        (DateTime::<Utc>::MAX_UTC - self.start_time).num_minutes() as f64
    }

    #[inline]
    pub fn state(&self) -> ClockState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    #[inline]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[inline]
    pub fn initial_speed(&self) -> u32 {
        self.initial_speed
    }

    #[inline]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[inline]
    pub fn simulated_time(&self) -> DateTime<Utc> {
        self.simulated_time
    }

    #[inline]
    pub fn last_real_tick(&self) -> DateTime<Utc> {
        self.last_real_tick
    }

    #[inline]
    pub fn cumulative_minutes(&self) -> f64 {
        self.cumulative_minutes
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_support::epoch;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        // Fuzz: speed always lands in range
        #[test]
        fn fuzz_speed_clamped(requested in any::<i64>()) {
            let speed = clamp_speed(requested);
            prop_assert!((MIN_SPEED..=MAX_SPEED).contains(&speed));
        }

        // Fuzz: simulated time never moves backward, whatever the wall clock does
        #[test]
        fn fuzz_simulated_time_monotonic(
            offsets_ms in prop::collection::vec(-60_000i64..60_000, 1..50),
            speed in 1i64..=1000,
        ) {
            let mut clock = SimulationClock::new(epoch(), 100);
            clock.set_speed(speed, epoch());
            let mut wall = epoch();
            let mut previous = (clock.simulated_time(), clock.cumulative_minutes());

            for offset in offsets_ms {
                wall += Duration::milliseconds(offset);
                let elapsed = clock.tick(wall).unwrap();
                prop_assert!(elapsed >= 0.0);
                prop_assert!(clock.simulated_time() >= previous.0);
                prop_assert!(clock.cumulative_minutes() >= previous.1);
                previous = (clock.simulated_time(), clock.cumulative_minutes());
            }
        }
    }
}
