//! Read-only snapshots handed to renderers and other observers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    EnemyId, EnemyTypeId, PowerUpId, PowerUpKind, ProjectileKind, TowerId, TowerTypeId,
    UpgradeStat, Vector2,
};

/// Lifecycle of an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Moving along the path and able to take damage.
    #[default]
    Alive,
    /// Killed; awaiting reward accounting.
    Dead,
    /// Walked off the end of the path; awaiting the health penalty.
    ReachedEnd,
}

/// Upgrade levels purchased for a single tower.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeLevels {
    /// Damage levels.
    pub damage: u32,
    /// Range levels.
    pub range: u32,
    /// Attack speed levels.
    pub speed: u32,
}

impl UpgradeLevels {
    /// Level of the given statistic.
    #[must_use]
    pub const fn get(&self, stat: UpgradeStat) -> u32 {
        match stat {
            UpgradeStat::Damage => self.damage,
            UpgradeStat::Range => self.range,
            UpgradeStat::Speed => self.speed,
        }
    }

    /// Mutable access to the level of the given statistic.
    pub fn get_mut(&mut self, stat: UpgradeStat) -> &mut u32 {
        match stat {
            UpgradeStat::Damage => &mut self.damage,
            UpgradeStat::Range => &mut self.range,
            UpgradeStat::Speed => &mut self.speed,
        }
    }
}

/// Ordered collection of snapshots captured in a single query.
///
/// Iteration order matches the owning collection's order.
#[derive(Clone, Debug, PartialEq)]
pub struct View<T> {
    snapshots: Vec<T>,
}

impl<T> View<T> {
    /// Creates a view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<T>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.snapshots
    }
}

impl<T> Default for View<T> {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }
}

/// Immutable representation of a single enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier assigned at spawn.
    pub id: EnemyId,
    /// Type the enemy was spawned from.
    pub kind: EnemyTypeId,
    /// Current position.
    pub position: Vector2,
    /// Facing in radians.
    pub rotation: f32,
    /// Collision radius.
    pub radius: f32,
    /// Current health.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Current movement speed.
    pub speed: f32,
    /// Index of the waypoint the enemy is heading to.
    pub path_index: usize,
    /// Lifecycle state.
    pub state: EnemyState,
    /// Colour from the definition.
    pub color: Option<String>,
}

/// Immutable representation of a single tower.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier assigned at placement.
    pub id: TowerId,
    /// Type of the tower.
    pub kind: TowerTypeId,
    /// Fixed position.
    pub position: Vector2,
    /// Body radius.
    pub radius: f32,
    /// Effective range.
    pub range: f32,
    /// Effective damage.
    pub damage: f32,
    /// Effective attacks per second.
    pub attack_speed: f32,
    /// Seconds until the tower may fire again.
    pub cooldown: f32,
    /// Kind of projectile fired.
    pub projectile: ProjectileKind,
    /// Purchased upgrade levels.
    pub upgrades: UpgradeLevels,
    /// Enemy acquired on the latest tick.
    pub target: Option<EnemyId>,
    /// Colour from the definition.
    pub color: Option<String>,
}

/// Enemy acquired by a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Position of the enemy when it was selected.
    pub enemy_position: Vector2,
    /// Distance between the tower and the enemy.
    pub distance: f32,
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Current position.
    pub position: Vector2,
    /// Fixed velocity.
    pub velocity: Vector2,
    /// Kind tag.
    pub kind: ProjectileKind,
    /// Collision radius.
    pub radius: f32,
}

/// Immutable representation of a cosmetic particle.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSnapshot {
    /// Current position.
    pub position: Vector2,
    /// Edge length of the square drawn for the particle.
    pub size: f32,
    /// Remaining life as a fraction of the initial life.
    pub alpha: f32,
    /// CSS-style colour.
    pub color: String,
}

/// Immutable representation of an active power-up effect.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUpSnapshot {
    /// Identifier assigned at activation.
    pub id: PowerUpId,
    /// Behaviour of the effect.
    pub kind: PowerUpKind,
    /// Display name from the definition.
    pub name: String,
    /// Time left before expiry, `None` for effects lasting the whole run.
    pub remaining: Option<Duration>,
}

/// Snapshot view over every enemy.
pub type EnemyView = View<EnemySnapshot>;
/// Snapshot view over every tower.
pub type TowerView = View<TowerSnapshot>;
/// Snapshot view over every projectile.
pub type ProjectileView = View<ProjectileSnapshot>;
/// Snapshot view over every particle.
pub type ParticleView = View<ParticleSnapshot>;
/// Snapshot view over every active power-up.
pub type PowerUpView = View<PowerUpSnapshot>;
