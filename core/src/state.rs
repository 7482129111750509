//! Shared economy record and the tuning knobs it is reset from.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Player interaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Browsing; no tower type is armed for placement.
    #[default]
    Selecting,
    /// A tower type is armed and follows the cursor awaiting confirmation.
    Placing,
}

/// Numeric knobs controlling a run.
///
/// Every field has a default so partial TOML files are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationTuning {
    /// Gold available when a run starts.
    pub starting_gold: f64,
    /// Health (and maximum health) when a run starts.
    pub starting_health: f64,
    /// Upper bound applied to every tick's delta, in milliseconds.
    pub max_frame_time_ms: u64,
    /// Seconds between spawns at score zero.
    pub spawn_interval_start: f64,
    /// Shortest allowed spawn interval in seconds.
    pub spawn_interval_floor: f64,
    /// Seconds removed from the spawn interval per thousand points of score.
    pub spawn_interval_decay_per_1000: f64,
    /// Probability that a kill opens a power-up choice.
    pub power_up_chance: f64,
    /// Number of distinct power-ups offered per choice.
    pub power_up_choices: usize,
    /// Distance after which a projectile expires.
    pub projectile_max_distance: f32,
    /// Damage factor applied on a critical strike.
    pub crit_multiplier: f32,
    /// Fraction of a tower's cost credited to score on placement.
    pub placement_score_ratio: f64,
    /// Optional per-stat cap on tower upgrade levels.
    pub max_upgrade_level: Option<u32>,
    /// Seed for the gameplay random stream.
    pub rng_seed: u64,
}

impl SimulationTuning {
    /// Upper bound applied to every tick's delta.
    #[must_use]
    pub fn max_frame_time(&self) -> Duration {
        Duration::from_millis(self.max_frame_time_ms)
    }
}

impl Default for SimulationTuning {
    fn default() -> Self {
        Self {
            starting_gold: 500.0,
            starting_health: 100.0,
            max_frame_time_ms: 50,
            spawn_interval_start: 3.0,
            spawn_interval_floor: 0.5,
            spawn_interval_decay_per_1000: 0.5,
            power_up_chance: 0.1,
            power_up_choices: 3,
            projectile_max_distance: 1_000.0,
            crit_multiplier: 2.0,
            placement_score_ratio: 0.1,
            max_upgrade_level: None,
            rng_seed: 0x5eed_0f_d3f3_4ce,
        }
    }
}

/// Mutable economy and progress record shared by every component of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable currency.
    pub gold: f64,
    /// Remaining player health.
    pub health: f64,
    /// Cap applied by health restoration.
    pub max_health: f64,
    /// Accumulated score.
    pub score: f64,
    /// Number of enemies spawned so far.
    pub wave: u32,
    /// Number of enemies killed so far.
    pub kills: u32,
    /// Total gold earned from kills.
    pub total_gold: f64,
    /// Reward multiplier applied to bounties.
    pub multiplier: f64,
    /// Probability in `0..=1` that a shot is a critical strike.
    pub crit_chance: f64,
    /// Current interaction mode.
    pub mode: PlayMode,
    /// Set once health drops to zero; terminal for the run.
    pub game_over: bool,
}

impl GameState {
    /// Creates a record holding the defaults derived from `tuning`.
    #[must_use]
    pub fn new(tuning: &SimulationTuning) -> Self {
        Self {
            gold: tuning.starting_gold,
            health: tuning.starting_health,
            max_health: tuning.starting_health,
            score: 0.0,
            wave: 0,
            kills: 0,
            total_gold: 0.0,
            multiplier: 1.0,
            crit_chance: 0.0,
            mode: PlayMode::Selecting,
            game_over: false,
        }
    }

    /// Restores every field to the run-start defaults.
    pub fn reset(&mut self, tuning: &SimulationTuning) {
        *self = Self::new(tuning);
    }

    /// Credits a kill worth `bounty`, returning the reward after the multiplier.
    ///
    /// The reward is not rounded.
    pub fn credit_kill(&mut self, bounty: f64) -> f64 {
        let reward = bounty * self.multiplier;
        self.gold += reward;
        self.total_gold += reward;
        self.score += reward;
        self.kills = self.kills.saturating_add(1);
        reward
    }

    /// Read-only summary of the run so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            wave: self.wave,
            kills: self.kills,
            total_gold: self.total_gold,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&SimulationTuning::default())
    }
}

/// Final statistics produced when a run ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Final score.
    pub score: f64,
    /// Number of enemies spawned.
    pub wave: u32,
    /// Number of enemies killed.
    pub kills: u32,
    /// Total gold earned from kills.
    pub total_gold: f64,
}
