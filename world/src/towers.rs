//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use path_defence_core::{
    CommandError, EnemyId, ProjectileKind, TowerDefinition, TowerId, TowerSnapshot, TowerTypeId,
    TowerView, UpgradeLevels, UpgradeMultiplier, UpgradeStat, Vector2,
};
use path_defence_system_tower_combat::effective_stat;

/// Body radius of every tower.
pub const TOWER_RADIUS: f32 = 12.0;

/// A placed tower.
#[derive(Clone, Debug)]
pub struct Tower {
    id: TowerId,
    kind: TowerTypeId,
    position: Vector2,
    base_range: f32,
    base_damage: f32,
    base_attack_speed: f32,
    per_level: UpgradeMultiplier,
    projectile: ProjectileKind,
    upgrades: UpgradeLevels,
    boost_levels: f32,
    cooldown: f32,
    target: Option<EnemyId>,
    color: Option<String>,
}

impl Tower {
    /// Creates a tower of the given type at `position`.
    #[must_use]
    pub fn new(id: TowerId, definition: &TowerDefinition, position: Vector2) -> Self {
        Self {
            id,
            kind: definition.id.clone(),
            position,
            base_range: definition.range,
            base_damage: definition.damage,
            base_attack_speed: definition.attack_speed,
            per_level: definition.upgrade_multiplier,
            projectile: definition.projectile_type,
            upgrades: UpgradeLevels::default(),
            boost_levels: 0.0,
            cooldown: 0.0,
            target: None,
            color: definition.color.clone(),
        }
    }

    /// Identifier assigned at placement.
    #[must_use]
    pub fn id(&self) -> TowerId {
        self.id
    }

    /// Fixed position.
    #[must_use]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Range after upgrades.
    #[must_use]
    pub fn range(&self) -> f32 {
        effective_stat(self.base_range, self.upgrades.range, self.per_level.range)
    }

    /// Damage after upgrades and power-up boosts.
    #[must_use]
    pub fn damage(&self) -> f32 {
        effective_stat(self.base_damage, self.upgrades.damage, self.per_level.damage)
            + self.boost_levels * self.per_level.damage
    }

    /// Attacks per second after upgrades.
    #[must_use]
    pub fn attack_speed(&self) -> f32 {
        effective_stat(
            self.base_attack_speed,
            self.upgrades.speed,
            self.per_level.speed,
        )
    }

    /// Seconds until the tower may fire again.
    #[must_use]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Purchased upgrade levels.
    #[must_use]
    pub fn upgrades(&self) -> UpgradeLevels {
        self.upgrades
    }

    /// Damage levels granted by active power-ups; may be fractional.
    #[must_use]
    pub fn boost_levels(&self) -> f32 {
        self.boost_levels
    }

    /// Enemy acquired on the latest tick.
    #[must_use]
    pub fn target(&self) -> Option<EnemyId> {
        self.target
    }

    /// Raises `stat` by one level unless `cap` is reached, returning the new level.
    pub fn upgrade(&mut self, stat: UpgradeStat, cap: Option<u32>) -> Result<u32, CommandError> {
        let level = self.upgrades.get_mut(stat);
        if let Some(cap) = cap {
            if *level >= cap {
                return Err(CommandError::UpgradeCapReached {
                    tower: self.id,
                    stat,
                    cap,
                });
            }
        }
        *level = level.saturating_add(1);
        Ok(*level)
    }

    pub(crate) fn set_boost(&mut self, levels: f32) {
        self.boost_levels = levels;
    }

    fn cool_down(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    fn hold_fire(&mut self, cooldown: f32) {
        self.cooldown = if cooldown.is_finite() {
            cooldown.max(0.0)
        } else {
            0.0
        };
    }

    /// Captures an immutable snapshot of the tower.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind.clone(),
            position: self.position,
            radius: TOWER_RADIUS,
            range: self.range(),
            damage: self.damage(),
            attack_speed: self.attack_speed(),
            cooldown: self.cooldown,
            projectile: self.projectile,
            upgrades: self.upgrades,
            target: self.target,
            color: self.color.clone(),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug, Default)]
pub struct TowerManager {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: u32,
}

impl TowerManager {
    /// Creates an empty tower registry with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tower and returns its identifier.
    pub fn place(&mut self, definition: &TowerDefinition, position: Vector2) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.wrapping_add(1);
        let _ = self.entries.insert(id, Tower::new(id, definition, position));
        id
    }

    /// Tower with the given identifier.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    /// Mutable access to the tower with the given identifier.
    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Iterator over towers in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Identifiers of every tower in placement order.
    #[must_use]
    pub fn ids(&self) -> Vec<TowerId> {
        self.entries.keys().copied().collect()
    }

    /// Number of towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no tower has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reduces every cooldown by `dt` seconds, never below zero.
    pub fn cool_down(&mut self, dt: f32) {
        for tower in self.entries.values_mut() {
            tower.cool_down(dt);
        }
    }

    /// Records the target each tower acquired this tick; towers absent from `targets` lose theirs.
    pub fn assign_targets(&mut self, targets: impl IntoIterator<Item = (TowerId, EnemyId)>) {
        for tower in self.entries.values_mut() {
            tower.target = None;
        }
        for (tower, enemy) in targets {
            if let Some(tower) = self.entries.get_mut(&tower) {
                tower.target = Some(enemy);
            }
        }
    }

    /// Restarts the cooldown of a tower that just fired.
    pub fn hold_fire(&mut self, id: TowerId, cooldown: f32) {
        if let Some(tower) = self.entries.get_mut(&id) {
            tower.hold_fire(cooldown);
        }
    }

    /// Drops every tower and restarts identifier allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = 0;
    }

    /// Captures snapshots of every tower.
    #[must_use]
    pub fn view(&self) -> TowerView {
        TowerView::from_snapshots(self.entries.values().map(Tower::snapshot).collect())
    }
}
