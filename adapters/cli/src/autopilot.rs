//! Scripted player that keeps a headless run busy.

use std::time::Duration;

use path_defence_core::{Command, Event, TowerDefinition, UpgradeStat, Vector2};
use path_defence_system_builder::{Builder, BuilderInput, PlacementPreview};
use path_defence_world::{self as world, query, World};
use tracing::debug;

const SPOT_OFFSET: f32 = 40.0;
const UPGRADE_ORDER: [UpgradeStat; 3] = [UpgradeStat::Damage, UpgradeStat::Speed, UpgradeStat::Range];

/// Places towers beside the path, buys upgrades and accepts power-ups.
///
/// Placement and upgrade requests go through the [`Builder`] system exactly
/// as cursor input would.
#[derive(Debug)]
pub(crate) struct Autopilot {
    builder: Builder,
    cadence: u64,
    spots: Vec<Vector2>,
    placed: usize,
    upgrades: usize,
    unseen: Vec<Event>,
}

impl Autopilot {
    /// Creates an autopilot acting every `cadence` ticks along `path`.
    pub(crate) fn new(path: &[Vector2], cadence: u64) -> Self {
        Self {
            builder: Builder::new(),
            cadence: cadence.max(1),
            spots: candidate_spots(path),
            placed: 0,
            upgrades: 0,
            unseen: Vec::new(),
        }
    }

    /// Remembers the events the builder reacts to until it next runs.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        self.unseen.extend(
            events
                .iter()
                .filter(|event| {
                    matches!(
                        event,
                        Event::PlayModeChanged { .. } | Event::RunStarted | Event::RunReset
                    )
                })
                .cloned(),
        );
    }

    /// Decides on the actions for tick number `tick`, applying them to `world`.
    ///
    /// Every event produced by those actions is appended to `log`.
    pub(crate) fn act(&mut self, world: &mut World, tick: u64, now: Duration, log: &mut Vec<Event>) {
        if let Some(kind) = query::pending_offer(world).and_then(|offer| offer.first().copied()) {
            debug!(%kind, "autopilot accepts power-up");
            self.apply(world, Command::ChoosePowerUp { kind, now }, log);
        }

        if tick % self.cadence != 0 || query::is_paused(world) {
            return;
        }

        if !self.try_place(world, log) {
            self.try_upgrade(world, log);
        }
    }

    fn try_place(&mut self, world: &mut World, log: &mut Vec<Event>) -> bool {
        let Some(spot) = self.next_free_spot(world) else {
            return false;
        };
        let Some(kind) = self.pick_tower(world).map(|definition| definition.id.clone()) else {
            return false;
        };

        self.apply(world, Command::SelectTowerType { kind: kind.clone() }, log);
        let preview = PlacementPreview::new(kind.clone(), spot, query::can_afford(world, &kind));
        let input = BuilderInput::new(true, false, None, Some(spot));
        let before = query::tower_view(world).len();
        self.drive_builder(world, Some(preview), input, log);

        let placed = query::tower_view(world).len() > before;
        if placed {
            self.placed += 1;
        } else {
            self.drive_builder(world, None, BuilderInput::new(false, true, None, None), log);
        }
        placed
    }

    fn try_upgrade(&mut self, world: &mut World, log: &mut Vec<Event>) {
        let towers = query::tower_view(world).into_vec();
        if towers.is_empty() {
            return;
        }
        let tower = &towers[self.upgrades % towers.len()];
        let stat = UPGRADE_ORDER[(self.upgrades / towers.len()) % UPGRADE_ORDER.len()];
        let input = BuilderInput::new(true, false, Some(stat), Some(tower.position));
        self.drive_builder(world, None, input, log);
        self.upgrades += 1;
    }

    fn drive_builder(
        &mut self,
        world: &mut World,
        preview: Option<PlacementPreview>,
        input: BuilderInput,
        log: &mut Vec<Event>,
    ) {
        let events = std::mem::take(&mut self.unseen);
        let mut commands = Vec::new();
        self.builder.handle(
            &events,
            preview,
            input,
            |position| query::tower_at(world, position),
            &mut commands,
        );
        for command in commands {
            self.apply(world, command, log);
        }
    }

    fn apply(&mut self, world: &mut World, command: Command, log: &mut Vec<Event>) {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        self.observe(&events);
        log.extend(events);
    }

    fn next_free_spot(&self, world: &World) -> Option<Vector2> {
        self.spots
            .iter()
            .skip(self.placed)
            .copied()
            .find(|spot| query::tower_at(world, *spot).is_none())
    }

    fn pick_tower<'w>(&self, world: &'w World) -> Option<&'w TowerDefinition> {
        let towers = query::catalog(world).towers();
        if towers.is_empty() {
            return None;
        }
        let preferred = &towers[self.placed % towers.len()];
        if query::can_afford(world, &preferred.id) {
            return Some(preferred);
        }
        towers
            .iter()
            .filter(|definition| query::can_afford(world, &definition.id))
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
    }
}

/// Spots beside every path segment, alternating sides.
fn candidate_spots(path: &[Vector2]) -> Vec<Vector2> {
    path.windows(2)
        .enumerate()
        .filter_map(|(index, pair)| {
            let direction = (pair[1] - pair[0]).normalize();
            if direction == Vector2::ZERO {
                return None;
            }
            let normal = Vector2::new(-direction.y, direction.x);
            let side = if index % 2 == 0 { 1.0 } else { -1.0 };
            let midpoint = (pair[0] + pair[1]) * 0.5;
            Some(midpoint + normal * (SPOT_OFFSET * side))
        })
        .filter(|spot| spot.is_finite())
        .collect()
}
