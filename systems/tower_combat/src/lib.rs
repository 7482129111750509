#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting data into fire orders for ready towers.

use path_defence_core::{
    EnemyId, ProjectileKind, TowerId, TowerSnapshot, TowerTarget, TowerView, Vector2,
};
use rand::Rng;

/// Statistic after upgrades: `base + levels × per_level`.
#[must_use]
pub fn effective_stat(base: f32, levels: u32, per_level: f32) -> f32 {
    base + levels as f32 * per_level
}

/// Critical strike parameters read from the shared game state and tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CritRoll {
    chance: f64,
    multiplier: f32,
}

impl CritRoll {
    /// Creates crit parameters; chances outside `0..=1` are clamped when rolled.
    #[must_use]
    pub const fn new(chance: f64, multiplier: f32) -> Self {
        Self { chance, multiplier }
    }

    /// Parameters that never roll a critical strike.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(0.0, 1.0)
    }

    fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        if !(self.chance > 0.0) {
            return false;
        }
        rng.gen_bool(self.chance.min(1.0))
    }
}

/// Instruction to launch one projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireOrder {
    /// Firing tower.
    pub tower: TowerId,
    /// Enemy aimed at.
    pub target: EnemyId,
    /// Launch position.
    pub origin: Vector2,
    /// Position the projectile heads towards.
    pub aim: Vector2,
    /// Damage payload, critical multiplier included.
    pub damage: f32,
    /// Whether the shot rolled a critical strike.
    pub critical: bool,
    /// Kind of projectile launched.
    pub kind: ProjectileKind,
    /// Cooldown the tower must observe before firing again.
    pub cooldown: f32,
}

/// Tower combat system that queues fire orders for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<FireOrder>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a [`FireOrder`] for every tower that has a target and no remaining cooldown.
    ///
    /// Towers whose attack speed is not a positive number never fire.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        crit: CritRoll,
        rng: &mut R,
        out: &mut Vec<FireOrder>,
    ) {
        if tower_targets.is_empty() || towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for tower in towers.iter() {
            let Some(target) = tower_targets.iter().find(|target| target.tower == tower.id) else {
                continue;
            };
            if !is_ready(tower) {
                continue;
            }

            let critical = crit.roll(rng);
            let damage = if critical {
                tower.damage * crit.multiplier
            } else {
                tower.damage
            };

            self.scratch.push(FireOrder {
                tower: tower.id,
                target: target.enemy,
                origin: tower.position,
                aim: target.enemy_position,
                damage,
                critical,
                kind: tower.projectile,
                cooldown: 1.0 / tower.attack_speed,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn is_ready(tower: &TowerSnapshot) -> bool {
    tower.cooldown <= 0.0 && tower.attack_speed > 0.0 && tower.attack_speed.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn effective_stat_adds_levels() {
        assert_eq!(effective_stat(10.0, 2, 5.0), 20.0);
        assert_eq!(effective_stat(100.0, 0, 10.0), 100.0);
    }

    #[test]
    fn disabled_crit_never_consumes_randomness() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut untouched = ChaCha8Rng::seed_from_u64(5);
        assert!(!CritRoll::disabled().roll(&mut rng));
        assert!(!CritRoll::new(f64::NAN, 2.0).roll(&mut rng));
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn certain_crit_always_rolls() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!((0..50).all(|_| CritRoll::new(3.0, 2.0).roll(&mut rng)));
    }
}
