#![allow(dead_code)]

use std::time::Duration;

use path_defence_core::{
    Catalog, Command, EnemyDefinition, EnemyTypeId, Event, PowerUpDefinition, PowerUpKind,
    ProjectileKind, SimulationTuning, TowerDefinition, TowerTypeId, UpgradeMultiplier, Vector2,
};
use path_defence_world::{self as world, World};

pub const DT: Duration = Duration::from_millis(50);

pub fn tower(id: &str, cost: f64, damage: f32, attack_speed: f32) -> TowerDefinition {
    TowerDefinition {
        id: TowerTypeId::new(id),
        name: id.to_owned(),
        cost,
        range: 100.0,
        damage,
        attack_speed,
        projectile_type: ProjectileKind::Normal,
        upgrade_multiplier: UpgradeMultiplier {
            damage: 5.0,
            range: 10.0,
            speed: 0.5,
        },
        color: None,
        description: String::new(),
    }
}

pub fn enemy(id: &str, health: f32, speed: f32, armor: f32, bounty: f64) -> EnemyDefinition {
    EnemyDefinition {
        id: EnemyTypeId::new(id),
        health,
        speed,
        armor,
        bounty,
        value: 1.0,
        damage: 1.0,
        radius: 8.0,
        color: None,
    }
}

pub fn power_up(kind: PowerUpKind, value: f64, duration: Option<f64>) -> PowerUpDefinition {
    PowerUpDefinition {
        id: kind,
        name: kind.to_string(),
        description: String::new(),
        value: Some(value),
        duration,
        rarity: None,
        color: None,
    }
}

/// Tuning that spawns an enemy on every 50 ms tick and never offers power-ups.
pub fn fast_spawns() -> SimulationTuning {
    SimulationTuning {
        spawn_interval_start: 0.04,
        spawn_interval_floor: 0.04,
        power_up_chance: 0.0,
        ..SimulationTuning::default()
    }
}

/// Drives a world with a monotonic host clock and keeps every emitted event.
pub struct Session {
    pub world: World,
    pub now: Duration,
    pub log: Vec<Event>,
}

impl Session {
    pub fn new(catalog: Catalog, tuning: SimulationTuning) -> Self {
        Self {
            world: World::new(catalog, tuning),
            now: Duration::ZERO,
            log: Vec::new(),
        }
    }

    pub fn started(catalog: Catalog, tuning: SimulationTuning) -> Self {
        let mut session = Self::new(catalog, tuning);
        let events = session.apply(Command::StartRun);
        assert_eq!(events, vec![Event::RunStarted]);
        session
    }

    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.log.extend(events.iter().cloned());
        events
    }

    pub fn tick(&mut self) -> Vec<Event> {
        self.now += DT;
        self.apply(Command::Tick {
            dt: DT,
            now: self.now,
        })
    }

    pub fn place(&mut self, kind: &str, position: Vector2) -> Vec<Event> {
        let mut events = self.apply(Command::SelectTowerType {
            kind: TowerTypeId::new(kind),
        });
        events.extend(self.apply(Command::PlaceTower {
            kind: TowerTypeId::new(kind),
            position,
        }));
        events
    }

    pub fn set_path(&mut self, waypoints: Vec<Vector2>) {
        let events = self.apply(Command::SetPath { waypoints });
        assert!(events.is_empty(), "path rejected: {events:?}");
    }

    /// Ticks until `predicate` matches an emitted event, returning every event up to it.
    pub fn tick_until(&mut self, limit: usize, predicate: impl Fn(&Event) -> bool) -> Vec<Event> {
        let mut seen = Vec::new();
        for _ in 0..limit {
            let events = self.tick();
            let done = events.iter().any(&predicate);
            seen.extend(events);
            if done {
                return seen;
            }
        }
        panic!("condition not met within {limit} ticks");
    }
}
