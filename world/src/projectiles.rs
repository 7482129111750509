//! Projectiles in flight and their collision against enemies.

use path_defence_core::{
    Circle, EnemyId, ProjectileKind, ProjectileSnapshot, ProjectileView, TowerId, Vector2,
};

use crate::enemies::EnemyManager;

/// A projectile travelling in a straight line.
#[derive(Clone, Debug)]
pub struct Projectile {
    source: TowerId,
    position: Vector2,
    velocity: Vector2,
    speed: f32,
    damage: f32,
    kind: ProjectileKind,
    radius: f32,
    traveled: f32,
    max_distance: f32,
    lifetime: Option<f32>,
    elapsed: f32,
    alive: bool,
}

impl Projectile {
    /// Launches a projectile from `origin` heading towards `aim`.
    ///
    /// Speed, radius and lifetime follow the projectile kind. Aiming at the
    /// launch point yields a stationary projectile that still expires once
    /// its travel budget runs out.
    #[must_use]
    pub fn launch(
        source: TowerId,
        origin: Vector2,
        aim: Vector2,
        damage: f32,
        kind: ProjectileKind,
        max_distance: f32,
    ) -> Self {
        let speed = kind.speed();
        Self {
            source,
            position: origin,
            velocity: (aim - origin).normalize() * speed,
            speed,
            damage,
            kind,
            radius: kind.radius(),
            traveled: 0.0,
            max_distance,
            lifetime: kind.lifetime(),
            elapsed: 0.0,
            alive: true,
        }
    }

    /// Advances the projectile and resolves at most one hit.
    ///
    /// Returns the enemy struck, if any. The first alive enemy in collection
    /// order whose centre lies strictly closer than the sum of radii is hit.
    pub fn advance(&mut self, dt: f32, enemies: &mut EnemyManager) -> Option<EnemyId> {
        if !self.alive {
            return None;
        }

        if let Some(lifetime) = self.lifetime {
            self.elapsed += dt;
            if self.elapsed > lifetime {
                self.alive = false;
                return None;
            }
        }

        self.position = self.position + self.velocity * dt;
        self.traveled += self.speed * dt;
        if self.traveled > self.max_distance {
            self.alive = false;
            return None;
        }

        let body = Circle::new(self.position, self.radius);
        let enemy = enemies.iter_mut().find(|enemy| {
            enemy.is_alive() && body.intersects(&Circle::new(enemy.position(), enemy.radius()))
        })?;
        let _ = enemy.take_damage(self.damage);
        self.alive = false;
        Some(enemy.id())
    }

    /// Tower that fired the projectile.
    #[must_use]
    pub fn source(&self) -> TowerId {
        self.source
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Damage payload.
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    /// Distance covered so far.
    #[must_use]
    pub fn traveled(&self) -> f32 {
        self.traveled
    }

    /// Reports whether the projectile is still in flight.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Captures an immutable snapshot of the projectile.
    #[must_use]
    pub fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.position,
            velocity: self.velocity,
            kind: self.kind,
            radius: self.radius,
        }
    }
}

/// Owns every projectile in flight.
#[derive(Debug, Default)]
pub struct ProjectileManager {
    projectiles: Vec<Projectile>,
}

impl ProjectileManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a projectile to the flight list.
    pub fn add(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Moves every projectile, applies hits, and drops spent projectiles.
    ///
    /// Enemies struck are appended to `hits` in projectile order.
    pub fn advance(&mut self, dt: f32, enemies: &mut EnemyManager, hits: &mut Vec<EnemyId>) {
        self.projectiles.retain_mut(|projectile| {
            if let Some(enemy) = projectile.advance(dt, enemies) {
                hits.push(enemy);
            }
            projectile.is_alive()
        });
    }

    /// Iterator over the projectiles in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Drops every projectile.
    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Captures snapshots of every projectile.
    #[must_use]
    pub fn view(&self) -> ProjectileView {
        ProjectileView::from_snapshots(self.projectiles.iter().map(Projectile::snapshot).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use path_defence_core::{EnemyDefinition, EnemyState, EnemyTypeId};

    fn enemies_at(positions: &[Vector2]) -> EnemyManager {
        let mut manager = EnemyManager::new();
        let definition = EnemyDefinition {
            id: EnemyTypeId::new("grunt"),
            health: 50.0,
            speed: 0.0,
            armor: 0.0,
            bounty: 10.0,
            value: 1.0,
            damage: 1.0,
            radius: 8.0,
            color: None,
        };
        for position in positions {
            let _ = manager.spawn(&definition, Arc::from(vec![*position]));
        }
        manager
    }

    fn stationary(position: Vector2, kind: ProjectileKind) -> Projectile {
        Projectile::launch(TowerId::new(0), position, position, 10.0, kind, 1_000.0)
    }

    #[test]
    fn collision_requires_strict_overlap() {
        let mut enemies = enemies_at(&[Vector2::ZERO]);

        let mut near = stationary(Vector2::new(11.9, 0.0), ProjectileKind::Normal);
        assert_eq!(near.advance(0.016, &mut enemies), Some(EnemyId::new(0)));
        assert!(!near.is_alive());

        let mut far = stationary(Vector2::new(12.1, 0.0), ProjectileKind::Normal);
        assert_eq!(far.advance(0.016, &mut enemies), None);
        assert!(far.is_alive());
    }

    #[test]
    fn first_enemy_in_collection_order_is_hit() {
        let mut enemies = enemies_at(&[Vector2::new(5.0, 0.0), Vector2::new(-1.0, 0.0)]);
        let mut projectile = stationary(Vector2::ZERO, ProjectileKind::Normal);

        assert_eq!(projectile.advance(0.016, &mut enemies), Some(EnemyId::new(0)));
        assert_eq!(enemies.get(EnemyId::new(0)).map(|e| e.health()), Some(40.0));
        assert_eq!(enemies.get(EnemyId::new(1)).map(|e| e.health()), Some(50.0));
    }

    #[test]
    fn inert_enemies_are_passed_through() {
        let mut enemies = enemies_at(&[Vector2::ZERO, Vector2::new(2.0, 0.0)]);
        let _ = enemies
            .get_mut(EnemyId::new(0))
            .map(|enemy| enemy.take_damage(500.0));
        assert_eq!(
            enemies.get(EnemyId::new(0)).map(|e| e.state()),
            Some(EnemyState::Dead)
        );

        let mut projectile = stationary(Vector2::ZERO, ProjectileKind::Normal);
        assert_eq!(projectile.advance(0.016, &mut enemies), Some(EnemyId::new(1)));
    }

    #[test]
    fn projectile_expires_past_max_distance() {
        let mut enemies = EnemyManager::new();
        let mut projectile = Projectile::launch(
            TowerId::new(0),
            Vector2::ZERO,
            Vector2::new(1.0, 0.0),
            10.0,
            ProjectileKind::Normal,
            1_000.0,
        );

        let mut ticks = 0;
        while projectile.is_alive() {
            let _ = projectile.advance(0.05, &mut enemies);
            ticks += 1;
            assert!(ticks < 100, "projectile never expired");
        }
        assert!(projectile.traveled() > 1_000.0);
        assert_eq!(ticks, 67);
    }

    #[test]
    fn laser_fades_after_lifetime_before_moving() {
        let mut enemies = EnemyManager::new();
        let mut laser = Projectile::launch(
            TowerId::new(0),
            Vector2::ZERO,
            Vector2::new(0.0, 1.0),
            5.0,
            ProjectileKind::Laser,
            1_000.0,
        );

        let _ = laser.advance(0.1, &mut enemies);
        assert!(laser.is_alive());
        let before = laser.position();
        let _ = laser.advance(0.1, &mut enemies);
        assert!(!laser.is_alive());
        assert_eq!(laser.position(), before);
    }

    #[test]
    fn manager_drops_spent_projectiles_and_reports_hits() {
        let mut enemies = enemies_at(&[Vector2::ZERO]);
        let mut manager = ProjectileManager::new();
        manager.add(stationary(Vector2::ZERO, ProjectileKind::Fire));
        manager.add(stationary(Vector2::new(300.0, 0.0), ProjectileKind::Ice));

        let mut hits = Vec::new();
        manager.advance(0.016, &mut enemies, &mut hits);

        assert_eq!(hits, vec![EnemyId::new(0)]);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.view().into_vec()[0].kind, ProjectileKind::Ice);
    }
}
