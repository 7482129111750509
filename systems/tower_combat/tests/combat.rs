use path_defence_core::{
    EnemyId, ProjectileKind, TowerId, TowerSnapshot, TowerTarget, TowerTypeId, TowerView,
    UpgradeLevels, Vector2,
};
use path_defence_system_tower_combat::{CritRoll, FireOrder, TowerCombat};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn tower(id: u32, cooldown: f32, attack_speed: f32) -> TowerSnapshot {
    TowerSnapshot {
        id: TowerId::new(id),
        kind: TowerTypeId::new("basic"),
        position: Vector2::new(id as f32 * 10.0, 0.0),
        radius: 12.0,
        range: 100.0,
        damage: 10.0,
        attack_speed,
        cooldown,
        projectile: ProjectileKind::Fire,
        upgrades: UpgradeLevels::default(),
        target: None,
        color: None,
    }
}

fn target(tower: u32, enemy: u32) -> TowerTarget {
    TowerTarget {
        tower: TowerId::new(tower),
        enemy: EnemyId::new(enemy),
        enemy_position: Vector2::new(50.0, 50.0),
        distance: 10.0,
    }
}

fn fire(towers: Vec<TowerSnapshot>, targets: &[TowerTarget], crit: CritRoll) -> Vec<FireOrder> {
    let mut system = TowerCombat::new();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut out = Vec::new();
    system.handle(
        &TowerView::from_snapshots(towers),
        targets,
        crit,
        &mut rng,
        &mut out,
    );
    out
}

#[test]
fn ready_tower_with_target_fires() {
    let orders = fire(vec![tower(1, 0.0, 2.0)], &[target(1, 4)], CritRoll::disabled());

    assert_eq!(
        orders,
        vec![FireOrder {
            tower: TowerId::new(1),
            target: EnemyId::new(4),
            origin: Vector2::new(10.0, 0.0),
            aim: Vector2::new(50.0, 50.0),
            damage: 10.0,
            critical: false,
            kind: ProjectileKind::Fire,
            cooldown: 0.5,
        }]
    );
}

#[test]
fn cooling_down_or_untargeted_towers_hold_fire() {
    let orders = fire(
        vec![tower(1, 0.25, 1.0), tower(2, 0.0, 1.0), tower(3, 0.0, 1.0)],
        &[target(1, 9), target(2, 8)],
        CritRoll::disabled(),
    );

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].tower, TowerId::new(2));
    assert_eq!(orders[0].target, EnemyId::new(8));
}

#[test]
fn towers_without_attack_speed_never_fire() {
    let orders = fire(
        vec![tower(1, 0.0, 0.0), tower(2, 0.0, f32::NAN)],
        &[target(1, 1), target(2, 1)],
        CritRoll::disabled(),
    );
    assert!(orders.is_empty());
}

#[test]
fn critical_strike_multiplies_damage() {
    let orders = fire(vec![tower(1, 0.0, 1.0)], &[target(1, 1)], CritRoll::new(1.0, 2.0));

    assert_eq!(orders.len(), 1);
    assert!(orders[0].critical);
    assert_eq!(orders[0].damage, 20.0);
}

#[test]
fn crit_rate_tracks_chance() {
    let mut system = TowerCombat::new();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let towers = TowerView::from_snapshots(vec![tower(1, 0.0, 1.0)]);
    let targets = [target(1, 1)];
    let mut out = Vec::new();

    for _ in 0..5_000 {
        system.handle(&towers, &targets, CritRoll::new(0.2, 2.0), &mut rng, &mut out);
    }

    let crits = out.iter().filter(|order| order.critical).count();
    assert_eq!(out.len(), 5_000);
    assert!((800..1_200).contains(&crits), "crits={crits}");
}
