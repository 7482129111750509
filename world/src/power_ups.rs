//! Active power-up effects.
//!
//! Lasting effects never restore saved values. The manager remembers the
//! value each field held before any effect of its kind was active and
//! recomputes the field from that base and the active set whenever an
//! effect starts or ends, so overlapping effects unwind exactly.

use std::{collections::BTreeMap, time::Duration};

use path_defence_core::{
    EnemyId, GameState, PowerUpDefinition, PowerUpId, PowerUpKind, PowerUpSnapshot, PowerUpView,
    TowerId,
};
use tracing::debug;

use crate::{enemies::EnemyManager, towers::TowerManager};

/// Everything a power-up may touch while it is applied or removed.
#[derive(Debug)]
pub struct EffectTargets<'a> {
    /// Shared economy record.
    pub state: &'a mut GameState,
    /// Towers that may receive damage boosts.
    pub towers: &'a mut TowerManager,
    /// Enemies that may be slowed.
    pub enemies: &'a mut EnemyManager,
}

#[derive(Clone, Debug, PartialEq)]
enum Effect {
    DamageBoost { towers: Vec<TowerId>, levels: f32 },
    GoldFactor(f64),
    Instant,
    CritChance(f64),
    Slow { enemies: Vec<EnemyId>, factor: f32 },
}

/// A power-up effect currently in force.
#[derive(Clone, Debug)]
pub struct PowerUp {
    id: PowerUpId,
    kind: PowerUpKind,
    name: String,
    lifetime: Option<Duration>,
    activated_at: Duration,
    effect: Effect,
}

impl PowerUp {
    /// Identifier assigned at activation.
    #[must_use]
    pub fn id(&self) -> PowerUpId {
        self.id
    }

    /// Behaviour of the effect.
    #[must_use]
    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    /// Reports whether the effect outlived its duration at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        match self.lifetime {
            Some(lifetime) => now.saturating_sub(self.activated_at) > lifetime,
            None => false,
        }
    }

    /// Time left before expiry, `None` for effects lasting the whole run.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.lifetime
            .map(|lifetime| lifetime.saturating_sub(now.saturating_sub(self.activated_at)))
    }

    /// Captures an immutable snapshot of the effect.
    #[must_use]
    pub fn snapshot(&self, now: Duration) -> PowerUpSnapshot {
        PowerUpSnapshot {
            id: self.id,
            kind: self.kind,
            name: self.name.clone(),
            remaining: self.remaining(now),
        }
    }
}

/// Owns the active power-up effects in activation order.
#[derive(Debug, Default)]
pub struct PowerUpManager {
    active: Vec<PowerUp>,
    next_id: u32,
    base_multiplier: Option<f64>,
    base_crit_chance: Option<f64>,
    base_speeds: BTreeMap<EnemyId, f32>,
}

impl PowerUpManager {
    /// Creates a manager with no active effect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the effect described by `definition` and tracks it until expiry.
    pub fn activate(
        &mut self,
        definition: &PowerUpDefinition,
        now: Duration,
        targets: &mut EffectTargets<'_>,
    ) -> PowerUpId {
        let id = PowerUpId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let value = definition.magnitude();
        let effect = match definition.id {
            PowerUpKind::TowerDamageBoost => Effect::DamageBoost {
                towers: targets.towers.ids(),
                levels: if value > 0.0 { value as f32 } else { 0.0 },
            },
            PowerUpKind::GoldMultiplier => {
                let _ = self.base_multiplier.get_or_insert(targets.state.multiplier);
                Effect::GoldFactor(value)
            }
            PowerUpKind::HealthRestore => {
                let state = &mut *targets.state;
                state.health = (state.health + value).min(state.max_health);
                Effect::Instant
            }
            PowerUpKind::CriticalStrike => {
                let _ = self.base_crit_chance.get_or_insert(targets.state.crit_chance);
                Effect::CritChance(value)
            }
            PowerUpKind::SlowEnemies => {
                let enemies = targets
                    .enemies
                    .iter_mut()
                    .map(|enemy| {
                        let _ = self.base_speeds.entry(enemy.id()).or_insert(enemy.speed());
                        enemy.id()
                    })
                    .collect();
                Effect::Slow {
                    enemies,
                    factor: value as f32,
                }
            }
        };

        debug!(power_up = id.get(), kind = %definition.id, "power-up activated");
        self.active.push(PowerUp {
            id,
            kind: definition.id,
            name: definition.name.clone(),
            lifetime: definition.lifetime(),
            activated_at: now,
            effect,
        });
        self.refresh(targets);
        id
    }

    /// Drops every effect whose duration elapsed by `now` and recomputes what they touched.
    ///
    /// Expired effects are reported in activation order.
    pub fn expire(
        &mut self,
        now: Duration,
        targets: &mut EffectTargets<'_>,
        expired: &mut Vec<(PowerUpId, PowerUpKind)>,
    ) {
        let before = expired.len();
        self.active.retain(|power_up| {
            if !power_up.is_expired(now) {
                return true;
            }
            debug!(power_up = power_up.id.get(), kind = %power_up.kind, "power-up expired");
            expired.push((power_up.id, power_up.kind));
            false
        });
        if expired.len() > before {
            self.refresh(targets);
        }
    }

    /// Reverts every active effect and restarts identifier allocation.
    pub fn clear(&mut self, targets: &mut EffectTargets<'_>) {
        self.active.clear();
        self.refresh(targets);
        self.next_id = 0;
    }

    /// Recomputes every field a lasting effect may hold from its base and the active set.
    fn refresh(&mut self, targets: &mut EffectTargets<'_>) {
        let active = &self.active;

        if let Some(base) = self.base_multiplier {
            let mut factors = active.iter().filter_map(|power_up| match power_up.effect {
                Effect::GoldFactor(factor) => Some(factor),
                _ => None,
            });
            targets.state.multiplier = match factors.next() {
                Some(first) => factors.fold(base * first, |multiplier, factor| multiplier * factor),
                None => {
                    self.base_multiplier = None;
                    base
                }
            };
        }

        if let Some(base) = self.base_crit_chance {
            let latest = active.iter().rev().find_map(|power_up| match power_up.effect {
                Effect::CritChance(chance) => Some(chance),
                _ => None,
            });
            targets.state.crit_chance = match latest {
                Some(chance) => chance,
                None => {
                    self.base_crit_chance = None;
                    base
                }
            };
        }

        self.base_speeds.retain(|id, base| {
            let Some(enemy) = targets.enemies.get_mut(*id) else {
                return false;
            };
            let mut slowed = false;
            let mut speed = *base;
            for power_up in active {
                if let Effect::Slow { enemies, factor } = &power_up.effect {
                    if enemies.contains(id) {
                        slowed = true;
                        speed *= factor;
                    }
                }
            }
            enemy.set_speed(speed);
            slowed
        });

        for id in targets.towers.ids() {
            let levels: f32 = active
                .iter()
                .filter_map(|power_up| match &power_up.effect {
                    Effect::DamageBoost { towers, levels } if towers.contains(&id) => Some(*levels),
                    _ => None,
                })
                .sum();
            if let Some(tower) = targets.towers.get_mut(id) {
                tower.set_boost(levels);
            }
        }
    }

    /// Iterator over the active effects in activation order.
    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.active.iter()
    }

    /// Number of active effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Reports whether no effect is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Captures snapshots of every active effect at `now`.
    #[must_use]
    pub fn view(&self, now: Duration) -> PowerUpView {
        PowerUpView::from_snapshots(self.active.iter().map(|p| p.snapshot(now)).collect())
    }
}
