#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system deciding when a kill opens a power-up choice and what it offers.

use path_defence_core::{PowerUpDefinition, PowerUpKind, SimulationTuning};
use rand::{seq::SliceRandom, Rng};

/// Configuration parameters required to construct the power-up system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    chance: f64,
    choices: usize,
}

impl Config {
    /// Creates a configuration from the per-kill trigger chance and the offer size.
    #[must_use]
    pub const fn new(chance: f64, choices: usize) -> Self {
        Self { chance, choices }
    }

    /// Extracts the power-up parameters from the run tuning.
    #[must_use]
    pub fn from_tuning(tuning: &SimulationTuning) -> Self {
        Self::new(tuning.power_up_chance, tuning.power_up_choices)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_tuning(&SimulationTuning::default())
    }
}

/// Power-up offer system.
#[derive(Debug)]
pub struct PowerUps {
    config: Config,
    pool: Vec<PowerUpKind>,
}

impl PowerUps {
    /// Creates a new power-up system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: Vec::new(),
        }
    }

    /// Rolls once per kill and returns an offer on the first success.
    ///
    /// Nothing is rolled while `offer_pending` is set, and rolling stops as
    /// soon as one kill triggers. An offer is never empty; with no loaded
    /// definitions no offer is made.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        kills: usize,
        offer_pending: bool,
        definitions: &[PowerUpDefinition],
        rng: &mut R,
    ) -> Option<Vec<PowerUpKind>> {
        if offer_pending || definitions.is_empty() || !(self.config.chance > 0.0) {
            return None;
        }

        let chance = self.config.chance.min(1.0);
        let triggered = (0..kills).any(|_| rng.gen_bool(chance));
        if !triggered {
            return None;
        }

        let offer = self.draw_offer(definitions, rng);
        (!offer.is_empty()).then_some(offer)
    }

    /// Draws up to the configured number of distinct kinds, without replacement.
    pub fn draw_offer<R: Rng + ?Sized>(
        &mut self,
        definitions: &[PowerUpDefinition],
        rng: &mut R,
    ) -> Vec<PowerUpKind> {
        self.pool.clear();
        for definition in definitions {
            if !self.pool.contains(&definition.id) {
                self.pool.push(definition.id);
            }
        }

        self.pool
            .choose_multiple(rng, self.config.choices)
            .copied()
            .collect()
    }
}
