mod support;

use path_defence_core::{
    Catalog, Command, CommandError, EnemyDefinition, Event, GameState, PlayMode, SimulationTuning,
    TowerTypeId, Vector2,
};
use path_defence_world::query;
use support::{enemy, fast_spawns, tower, Session};

fn sprinter() -> EnemyDefinition {
    EnemyDefinition {
        damage: 100.0,
        ..enemy("sprinter", 30.0, 1_000.0, 0.0, 5.0)
    }
}

fn catalog() -> Catalog {
    Catalog::new(
        vec![tower("basic", 100.0, 10.0, 1.0)],
        vec![sprinter()],
        Vec::new(),
    )
}

#[test]
fn leaking_enemy_ends_the_run() {
    let mut session = Session::started(catalog(), fast_spawns());
    session.set_path(vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)]);

    let events = session.tick_until(10, |event| matches!(event, Event::GameOver { .. }));

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyReachedEnd { damage, .. } if *damage == 100.0)));
    let summary = events
        .iter()
        .find_map(|event| match event {
            Event::GameOver { summary } => Some(summary.clone()),
            _ => None,
        })
        .expect("game over summary");
    assert_eq!(summary.wave, 3);
    assert_eq!(summary.kills, 0);

    assert!(query::is_game_over(&session.world));
    assert!(query::is_paused(&session.world));
    assert_eq!(query::game_state(&session.world).health, 0.0);
    assert!(!query::particle_view(&session.world).is_empty());

    assert!(session.tick().is_empty(), "ended runs ignore ticks");
    assert_eq!(
        session.apply(Command::Resume),
        vec![Event::CommandRejected {
            error: CommandError::GameOver,
        }]
    );
}

#[test]
fn start_run_recovers_from_game_over() {
    let mut session = Session::started(catalog(), fast_spawns());
    session.set_path(vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)]);
    let _ = session.tick_until(10, |event| matches!(event, Event::GameOver { .. }));

    assert_eq!(session.apply(Command::StartRun), vec![Event::RunStarted]);
    assert!(!query::is_game_over(&session.world));
    assert!(!query::is_paused(&session.world));
    assert!(query::enemy_view(&session.world).is_empty());
    assert_eq!(query::game_state(&session.world).health, 100.0);
}

#[test]
fn reset_is_idempotent() {
    let tuning = fast_spawns();
    let mut session = Session::started(catalog(), tuning.clone());
    let _ = session.place("basic", Vector2::new(300.0, 300.0));
    for _ in 0..5 {
        let _ = session.tick();
    }
    assert!(!query::enemy_view(&session.world).is_empty());

    assert_eq!(session.apply(Command::ResetRun), vec![Event::RunReset]);
    let once = query::game_state(&session.world).clone();
    assert_eq!(session.apply(Command::ResetRun), vec![Event::RunReset]);

    assert_eq!(query::game_state(&session.world), &once);
    assert_eq!(&once, &GameState::new(&tuning));
    assert!(query::enemy_view(&session.world).is_empty());
    assert!(query::tower_view(&session.world).is_empty());
    assert!(query::projectile_view(&session.world).is_empty());
    assert!(query::particle_view(&session.world).is_empty());
    assert!(query::power_up_view(&session.world).is_empty());
    assert!(query::is_paused(&session.world));
    assert!(!query::is_run_active(&session.world));
    assert!(session.tick().is_empty());
}

#[test]
fn pause_and_resume_gate_ticks() {
    let mut session = Session::started(catalog(), fast_spawns());

    assert_eq!(
        session.apply(Command::Pause),
        vec![Event::PauseChanged { paused: true }]
    );
    assert!(session.apply(Command::Pause).is_empty());
    assert!(session.tick().is_empty());

    assert_eq!(
        session.apply(Command::Resume),
        vec![Event::PauseChanged { paused: false }]
    );
    let events = session.tick();
    assert!(matches!(events.first(), Some(Event::TimeAdvanced { .. })));
}

#[test]
fn oversized_frames_are_clamped() {
    let tuning = SimulationTuning {
        spawn_interval_start: 10.0,
        spawn_interval_floor: 10.0,
        ..SimulationTuning::default()
    };
    let mut session = Session::started(catalog(), tuning);

    let events = session.apply(Command::Tick {
        dt: std::time::Duration::from_secs(5),
        now: std::time::Duration::from_secs(5),
    });

    assert_eq!(
        events,
        vec![Event::TimeAdvanced {
            dt: std::time::Duration::from_millis(50),
        }]
    );
}

#[test]
fn placement_mode_round_trip() {
    let mut session = Session::started(catalog(), fast_spawns());
    let basic = TowerTypeId::new("basic");

    assert_eq!(
        session.apply(Command::SelectTowerType {
            kind: basic.clone(),
        }),
        vec![Event::PlayModeChanged {
            mode: PlayMode::Placing,
        }]
    );
    assert_eq!(query::armed_tower(&session.world), Some(&basic));
    assert!(query::can_afford(&session.world, &basic));

    assert_eq!(
        session.apply(Command::CancelPlacement),
        vec![Event::PlayModeChanged {
            mode: PlayMode::Selecting,
        }]
    );
    assert_eq!(query::armed_tower(&session.world), None);

    assert_eq!(
        session.apply(Command::SelectTowerType {
            kind: TowerTypeId::new("missing"),
        }),
        vec![Event::CommandRejected {
            error: CommandError::UnknownTowerType(TowerTypeId::new("missing")),
        }]
    );
    assert_eq!(query::play_mode(&session.world), PlayMode::Selecting);
}
