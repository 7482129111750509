#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects the nearest enemy in range for every tower.

use path_defence_core::{
    EnemyId, EnemyState, EnemyView, TowerId, TowerTarget, TowerView, Vector2,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Towers without an enemy strictly inside their range are
    /// omitted. Equidistant candidates resolve to the one found first in
    /// enemy iteration order.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            if !tower.position.is_finite() {
                continue;
            }

            let mut best: Option<BestCandidate> = None;
            for candidate in &self.enemy_workspace {
                let distance = tower.position.distance(candidate.position);
                if !(distance < tower.range) {
                    continue;
                }

                let current = BestCandidate {
                    distance,
                    enemy: candidate.id,
                    position: candidate.position,
                };
                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best.enemy,
                    enemy_position: best.position,
                    distance: best.distance,
                });
            }
        }
    }

    /// Looks up the target assigned to `tower` in a previously computed buffer.
    #[must_use]
    pub fn target_of(targets: &[TowerTarget], tower: TowerId) -> Option<&TowerTarget> {
        targets.iter().find(|target| target.tower == tower)
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            if snapshot.state != EnemyState::Alive || !snapshot.position.is_finite() {
                continue;
            }
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vector2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    enemy: EnemyId,
    position: Vector2,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_distance_keeps_earlier_candidate() {
        let first = BestCandidate {
            distance: 5.0,
            enemy: EnemyId::new(9),
            position: Vector2::ZERO,
        };
        let second = BestCandidate {
            enemy: EnemyId::new(1),
            ..first
        };
        assert!(!second.precedes(&first));
    }
}
