mod support;

use path_defence_core::{
    Catalog, Command, CommandError, Event, PowerUpId, PowerUpKind, SimulationTuning, TowerId,
    UpgradeStat, Vector2,
};
use path_defence_world::query;
use support::{enemy, fast_spawns, power_up, tower, Session};

const LAIR: Vector2 = Vector2::new(100.0, 100.0);
const TOWER_SPOT: Vector2 = Vector2::new(100.0, 140.0);

fn fired(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count()
}

fn killed_reward(events: &[Event]) -> Option<f64> {
    events.iter().find_map(|event| match event {
        Event::EnemyKilled { reward, .. } => Some(*reward),
        _ => None,
    })
}

/// Spawns exactly one stationary enemy next to a freshly placed tower.
fn duel(catalog: Catalog, tuning: SimulationTuning) -> Session {
    let mut session = Session::started(catalog, tuning);
    session.set_path(vec![LAIR]);
    let placed = session.place("basic", TOWER_SPOT);
    assert!(placed
        .iter()
        .any(|event| matches!(event, Event::TowerPlaced { .. })));

    let first = session.tick();
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::EnemySpawned { .. })));
    session.set_path(Vec::new());
    session
}

#[test]
fn armored_enemy_dies_on_fourth_hit() {
    let catalog = Catalog::new(
        vec![tower("basic", 100.0, 20.0, 1.0)],
        vec![enemy("brute", 50.0, 0.0, 5.0, 20.0)],
        Vec::new(),
    );
    let mut session = duel(catalog, fast_spawns());

    let _ = session.tick_until(400, |event| matches!(event, Event::EnemyKilled { .. }));

    assert_eq!(fired(&session.log), 4);
    assert_eq!(killed_reward(&session.log), Some(20.0));

    let state = query::game_state(&session.world);
    assert_eq!(state.kills, 1);
    assert_eq!(state.gold, 420.0);
    assert_eq!(state.score, 30.0);
    assert!(query::enemy_view(&session.world).is_empty());
}

#[test]
fn gold_multiplier_scales_kill_reward() {
    let catalog = Catalog::new(
        vec![tower("basic", 100.0, 20.0, 1.0)],
        vec![enemy("grunt", 10.0, 0.0, 0.0, 20.0)],
        vec![power_up(PowerUpKind::GoldMultiplier, 1.5, Some(100.0))],
    );
    let tuning = SimulationTuning {
        power_up_chance: 1.0,
        ..fast_spawns()
    };
    let mut session = duel(catalog, tuning);

    let first = session.tick_until(100, |event| matches!(event, Event::EnemyKilled { .. }));
    assert_eq!(killed_reward(&first), Some(20.0));
    assert!(first.contains(&Event::PowerUpOffered {
        choices: vec![PowerUpKind::GoldMultiplier],
    }));
    assert!(query::is_paused(&session.world));

    let now = session.now;
    let chosen = session.apply(Command::ChoosePowerUp {
        kind: PowerUpKind::GoldMultiplier,
        now,
    });
    assert_eq!(
        chosen,
        vec![
            Event::PowerUpActivated {
                power_up: PowerUpId::new(0),
                kind: PowerUpKind::GoldMultiplier,
            },
            Event::PauseChanged { paused: false },
        ]
    );
    assert_eq!(query::game_state(&session.world).multiplier, 1.5);

    session.set_path(vec![LAIR]);
    let _ = session.tick();
    session.set_path(Vec::new());
    let second = session.tick_until(100, |event| matches!(event, Event::EnemyKilled { .. }));

    assert_eq!(killed_reward(&second), Some(30.0));
    let state = query::game_state(&session.world);
    assert_eq!(state.gold, 450.0);
    assert_eq!(state.total_gold, 50.0);
}

#[test]
fn upgrades_raise_stats_until_the_cap() {
    let catalog = Catalog::new(
        vec![tower("basic", 100.0, 20.0, 1.0)],
        vec![enemy("grunt", 10.0, 0.0, 0.0, 20.0)],
        Vec::new(),
    );
    let tuning = SimulationTuning {
        max_upgrade_level: Some(1),
        ..fast_spawns()
    };
    let mut session = Session::started(catalog, tuning);
    let _ = session.place("basic", TOWER_SPOT);
    let tower = TowerId::new(0);

    let upgraded = session.apply(Command::UpgradeTower {
        tower,
        stat: UpgradeStat::Damage,
    });
    assert_eq!(
        upgraded,
        vec![Event::TowerUpgraded {
            tower,
            stat: UpgradeStat::Damage,
            level: 1,
        }]
    );

    let rejected = session.apply(Command::UpgradeTower {
        tower,
        stat: UpgradeStat::Damage,
    });
    assert_eq!(
        rejected,
        vec![Event::CommandRejected {
            error: CommandError::UpgradeCapReached {
                tower,
                stat: UpgradeStat::Damage,
                cap: 1,
            },
        }]
    );

    let view = query::tower_view(&session.world).into_vec();
    assert_eq!(view[0].damage, 25.0);
    assert_eq!(view[0].range, 100.0);
}

#[test]
fn towers_are_found_under_the_cursor() {
    let catalog = Catalog::new(
        vec![tower("basic", 100.0, 20.0, 1.0)],
        vec![enemy("grunt", 10.0, 0.0, 0.0, 20.0)],
        Vec::new(),
    );
    let mut session = Session::started(catalog, fast_spawns());
    let _ = session.place("basic", TOWER_SPOT);

    assert_eq!(
        query::tower_at(&session.world, Vector2::new(105.0, 140.0)),
        Some(TowerId::new(0))
    );
    assert_eq!(query::tower_at(&session.world, Vector2::new(130.0, 140.0)), None);
    assert_eq!(query::armed_tower(&session.world), None);
}
