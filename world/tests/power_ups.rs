mod support;

use path_defence_core::{
    Catalog, Command, CommandError, Event, PowerUpKind, SimulationTuning, Vector2,
};
use path_defence_world::query;
use support::{enemy, fast_spawns, power_up, tower, Session};

fn session_with(power_ups: Vec<path_defence_core::PowerUpDefinition>, choices: usize) -> Session {
    let catalog = Catalog::new(
        vec![tower("basic", 100.0, 20.0, 1.0)],
        vec![enemy("grunt", 10.0, 0.0, 0.0, 20.0)],
        power_ups,
    );
    let tuning = SimulationTuning {
        power_up_chance: 1.0,
        power_up_choices: choices,
        ..fast_spawns()
    };
    let mut session = Session::started(catalog, tuning);
    session.set_path(vec![Vector2::new(100.0, 100.0)]);
    let _ = session.place("basic", Vector2::new(100.0, 140.0));
    let _ = session.tick();
    session.set_path(Vec::new());
    session
}

fn offered(events: &[Event]) -> Vec<PowerUpKind> {
    events
        .iter()
        .find_map(|event| match event {
            Event::PowerUpOffered { choices } => Some(choices.clone()),
            _ => None,
        })
        .expect("an offer")
}

#[test]
fn kill_offers_distinct_choices_and_pauses() {
    let all = PowerUpKind::ALL
        .into_iter()
        .map(|kind| power_up(kind, kind.default_value(), Some(5.0)))
        .collect();
    let mut session = session_with(all, 3);

    let events = session.tick_until(100, |event| matches!(event, Event::PowerUpOffered { .. }));
    let mut choices = offered(&events);
    assert_eq!(choices.len(), 3);
    assert!(events.contains(&Event::PauseChanged { paused: true }));
    assert_eq!(query::pending_offer(&session.world), Some(choices.as_slice()));

    assert!(session.tick().is_empty(), "pending offers pause the simulation");
    assert_eq!(
        session.apply(Command::Resume),
        vec![Event::CommandRejected {
            error: CommandError::OfferPending,
        }]
    );

    let missing = PowerUpKind::ALL
        .into_iter()
        .find(|kind| !choices.contains(kind))
        .expect("five kinds, three offered");
    let now = session.now;
    assert_eq!(
        session.apply(Command::ChoosePowerUp { kind: missing, now }),
        vec![Event::CommandRejected {
            error: CommandError::PowerUpNotOffered(missing),
        }]
    );

    choices.sort();
    choices.dedup();
    assert_eq!(choices.len(), 3, "choices are distinct");

    let events = session.apply(Command::ChoosePowerUp {
        kind: choices[0],
        now,
    });
    assert!(matches!(
        events.first(),
        Some(Event::PowerUpActivated { kind, .. }) if *kind == choices[0]
    ));
    assert_eq!(query::pending_offer(&session.world), None);
    assert!(!query::is_paused(&session.world));
    assert_eq!(query::power_up_view(&session.world).len(), 1);
}

#[test]
fn timed_effect_expires_and_reverts() {
    let mut session = session_with(
        vec![power_up(PowerUpKind::GoldMultiplier, 2.0, Some(1.0))],
        3,
    );
    let _ = session.tick_until(100, |event| matches!(event, Event::PowerUpOffered { .. }));

    let now = session.now;
    let _ = session.apply(Command::ChoosePowerUp {
        kind: PowerUpKind::GoldMultiplier,
        now,
    });
    assert_eq!(query::game_state(&session.world).multiplier, 2.0);

    let events = session.tick_until(40, |event| matches!(event, Event::PowerUpExpired { .. }));
    assert!(session.now > now + std::time::Duration::from_secs(1));
    assert!(events.contains(&Event::PowerUpExpired {
        power_up: path_defence_core::PowerUpId::new(0),
        kind: PowerUpKind::GoldMultiplier,
    }));
    assert_eq!(query::game_state(&session.world).multiplier, 1.0);
    assert!(query::power_up_view(&session.world).is_empty());
}

#[test]
fn critical_strike_is_reverted_by_reset() {
    let mut session = session_with(
        vec![power_up(PowerUpKind::CriticalStrike, 0.4, None)],
        3,
    );
    let _ = session.tick_until(100, |event| matches!(event, Event::PowerUpOffered { .. }));
    let now = session.now;
    let _ = session.apply(Command::ChoosePowerUp {
        kind: PowerUpKind::CriticalStrike,
        now,
    });
    assert_eq!(query::game_state(&session.world).crit_chance, 0.4);

    let _ = session.apply(Command::ResetRun);
    assert_eq!(query::game_state(&session.world).crit_chance, 0.0);
    assert!(query::power_up_view(&session.world).is_empty());
}
