#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system that decides when the next enemy enters the path and which type it is.

use std::time::Duration;

use path_defence_core::{util, EnemyDefinition, SimulationTuning};
use rand::Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    interval_start: f64,
    interval_floor: f64,
    decay_per_1000: f64,
}

impl Config {
    /// Creates a configuration from the interval at score zero, its floor, and its decay.
    #[must_use]
    pub const fn new(interval_start: f64, interval_floor: f64, decay_per_1000: f64) -> Self {
        Self {
            interval_start,
            interval_floor,
            decay_per_1000,
        }
    }

    /// Extracts the spawn cadence from the run tuning.
    #[must_use]
    pub fn from_tuning(tuning: &SimulationTuning) -> Self {
        Self::new(
            tuning.spawn_interval_start,
            tuning.spawn_interval_floor,
            tuning.spawn_interval_decay_per_1000,
        )
    }

    /// Seconds between spawns at the provided score.
    #[must_use]
    pub fn interval_seconds(&self, score: f64) -> f64 {
        let interval = self.interval_start - score / 1000.0 * self.decay_per_1000;
        if interval.is_nan() {
            return self.interval_floor;
        }
        interval.max(self.interval_floor)
    }

    /// Time between spawns at the provided score.
    #[must_use]
    pub fn interval(&self, score: f64) -> Duration {
        Duration::try_from_secs_f64(self.interval_seconds(score)).unwrap_or(Duration::ZERO)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_tuning(&SimulationTuning::default())
    }
}

/// Accumulating spawn timer paired with a weighted enemy-type picker.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
        }
    }

    /// Advances the timer by `dt` and returns the definition to spawn, if one is due.
    ///
    /// At most one enemy spawns per call and the timer restarts from zero
    /// afterwards. Without a path or without enemy types nothing spawns but
    /// the timer keeps accumulating.
    pub fn handle<'a, R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        score: f64,
        has_path: bool,
        definitions: &'a [EnemyDefinition],
        rng: &mut R,
    ) -> Option<&'a EnemyDefinition> {
        self.accumulator = self.accumulator.saturating_add(dt);

        if self.accumulator < self.config.interval(score) {
            return None;
        }

        if !has_path || definitions.is_empty() {
            return None;
        }

        let weights: Vec<f64> = definitions
            .iter()
            .map(EnemyDefinition::spawn_weight)
            .collect();
        let index = util::random_weighted(rng, &weights)?;
        self.accumulator = Duration::ZERO;
        definitions.get(index)
    }

    /// Time accumulated since the previous spawn.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.accumulator
    }

    /// Restarts the timer, as at the start of a run.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
