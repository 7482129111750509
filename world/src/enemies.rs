//! Enemy entities and the collection that owns them.

use std::sync::Arc;

use path_defence_core::{
    EnemyDefinition, EnemyId, EnemySnapshot, EnemyState, EnemyTypeId, EnemyView, Vector2,
};

/// A single enemy walking the path.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyTypeId,
    position: Vector2,
    velocity: Vector2,
    rotation: f32,
    path: Arc<[Vector2]>,
    path_index: usize,
    speed: f32,
    armor: f32,
    health: f32,
    max_health: f32,
    bounty: f64,
    damage: f64,
    radius: f32,
    color: Option<String>,
    state: EnemyState,
}

impl Enemy {
    /// Creates an enemy standing on the first waypoint of `path`.
    #[must_use]
    pub fn spawn(id: EnemyId, definition: &EnemyDefinition, path: Arc<[Vector2]>) -> Self {
        let position = path.first().copied().unwrap_or(Vector2::ZERO);
        Self {
            id,
            kind: definition.id.clone(),
            position,
            velocity: Vector2::ZERO,
            rotation: 0.0,
            path,
            path_index: 0,
            speed: definition.speed,
            armor: definition.armor,
            health: definition.health,
            max_health: definition.health,
            bounty: definition.bounty,
            damage: definition.damage,
            radius: definition.radius,
            color: definition.color.clone(),
            state: EnemyState::Alive,
        }
    }

    /// Moves the enemy towards its current waypoint.
    ///
    /// The cursor advances once the enemy is closer to the waypoint than the
    /// distance it covers in `dt`; advancing past the last waypoint marks the
    /// enemy as [`EnemyState::ReachedEnd`]. Inert enemies do not move.
    pub fn advance(&mut self, dt: f32) {
        if self.state != EnemyState::Alive {
            return;
        }

        let Some(waypoint) = self.path.get(self.path_index).copied() else {
            return;
        };

        let direction = (waypoint - self.position).normalize();
        self.velocity = direction * self.speed;
        self.position = self.position + self.velocity * dt;
        self.rotation = direction.angle();

        if self.position.distance(waypoint) < self.speed * dt {
            self.path_index += 1;
            if self.path_index >= self.path.len() {
                self.state = EnemyState::ReachedEnd;
            }
        }
    }

    /// Applies a hit, returning the health actually removed.
    ///
    /// Armor reduces every hit but never below one point. Inert enemies
    /// ignore damage and report zero.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if self.state != EnemyState::Alive {
            return 0.0;
        }

        let actual = (amount - self.armor).max(1.0);
        self.health -= actual;
        if self.health <= 0.0 {
            self.state = EnemyState::Dead;
        }
        actual
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub fn id(&self) -> EnemyId {
        self.id
    }

    /// Type the enemy was spawned from.
    #[must_use]
    pub fn kind(&self) -> &EnemyTypeId {
        &self.kind
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Index of the waypoint the enemy is heading to.
    #[must_use]
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Current movement speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Overrides the movement speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Collision radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Gold awarded on death before the multiplier.
    #[must_use]
    pub fn bounty(&self) -> f64 {
        self.bounty
    }

    /// Health removed from the player when the enemy reaches the end.
    #[must_use]
    pub fn damage(&self) -> f64 {
        self.damage
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> EnemyState {
        self.state
    }

    /// Reports whether the enemy still moves and takes damage.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Alive
    }

    /// Captures an immutable snapshot of the enemy.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind.clone(),
            position: self.position,
            rotation: self.rotation,
            radius: self.radius,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            path_index: self.path_index,
            state: self.state,
            color: self.color.clone(),
        }
    }
}

/// Owns every enemy of a run in spawn order.
#[derive(Debug, Default)]
pub struct EnemyManager {
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyManager {
    /// Creates an empty manager with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a freshly spawned enemy and returns its identifier.
    pub fn spawn(&mut self, definition: &EnemyDefinition, path: Arc<[Vector2]>) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.enemies.push(Enemy::spawn(id, definition, path));
        id
    }

    /// Moves every enemy by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for enemy in &mut self.enemies {
            enemy.advance(dt);
        }
    }

    /// Removes every inert enemy and hands it over for final accounting.
    ///
    /// Each enemy is returned at most once; the remaining enemies keep their order.
    pub fn drain_departed(&mut self, out: &mut Vec<Enemy>) {
        let mut index = 0;
        while index < self.enemies.len() {
            if self.enemies[index].is_alive() {
                index += 1;
            } else {
                out.push(self.enemies.remove(index));
            }
        }
    }

    /// Enemy with the given identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    /// Mutable access to the enemy with the given identifier.
    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    /// Iterator over the enemies in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Mutable iterator over the enemies in spawn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    /// Number of enemies in the collection, inert ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Reports whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Drops every enemy and restarts identifier allocation.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.next_id = 0;
    }

    /// Captures snapshots of every enemy.
    #[must_use]
    pub fn view(&self) -> EnemyView {
        EnemyView::from_snapshots(self.enemies.iter().map(Enemy::snapshot).collect())
    }
}
