#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The [`World`] owns one manager per entity collection plus the shared
//! [`GameState`]. Every mutation goes through [`apply`]; read access goes
//! through the [`query`] module.

mod camera;
mod enemies;
mod particles;
mod power_ups;
mod projectiles;
mod towers;

use std::{sync::Arc, time::Duration};

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM};
pub use enemies::{Enemy, EnemyManager};
pub use particles::{Particle, ParticleEmitter};
pub use power_ups::{EffectTargets, PowerUp, PowerUpManager};
pub use projectiles::{Projectile, ProjectileManager};
pub use towers::{Tower, TowerManager, TOWER_RADIUS};

use path_defence_core::{
    Catalog, Command, CommandError, EnemyState, Event, GameState, PlayMode, PowerUpKind,
    SimulationTuning, TowerTarget, TowerTypeId, Vector2, WELCOME_BANNER,
};
use path_defence_system_power_ups::{self as power_up_offers, PowerUps};
use path_defence_system_spawning::{self as spawning, Spawning};
use path_defence_system_tower_combat::{CritRoll, FireOrder, TowerCombat};
use path_defence_system_tower_targeting::TowerTargeting;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
const PARTICLE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

const ESCAPE_BURST: Burst = Burst {
    count: 5,
    life: 0.3,
    color: "#ff0000",
};
const KILL_BURST: Burst = Burst {
    count: 8,
    life: 0.5,
    color: "#ffff00",
};

#[derive(Clone, Copy, Debug)]
struct Burst {
    count: usize,
    life: f32,
    color: &'static str,
}

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    catalog: Catalog,
    tuning: SimulationTuning,
    state: GameState,
    path: Arc<[Vector2]>,
    camera: Camera,
    enemies: EnemyManager,
    towers: TowerManager,
    projectiles: ProjectileManager,
    particles: ParticleEmitter,
    power_ups: PowerUpManager,
    spawning: Spawning,
    targeting: TowerTargeting,
    combat: TowerCombat,
    offers: PowerUps,
    pending_offer: Option<Vec<PowerUpKind>>,
    armed: Option<TowerTypeId>,
    run_active: bool,
    paused: bool,
    now: Duration,
    rng: ChaCha8Rng,
    particle_rng: ChaCha8Rng,
    departed: Vec<Enemy>,
    tower_targets: Vec<TowerTarget>,
    fire_orders: Vec<FireOrder>,
}

impl World {
    /// Creates a world ready to start a run with the provided definitions and tuning.
    ///
    /// The world starts paused with no run in progress and the default
    /// winding path laid out for an 800×600 viewport.
    #[must_use]
    pub fn new(catalog: Catalog, tuning: SimulationTuning) -> Self {
        let camera = Camera::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
        Self {
            banner: WELCOME_BANNER,
            state: GameState::new(&tuning),
            path: Arc::from(default_path(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)),
            camera,
            enemies: EnemyManager::new(),
            towers: TowerManager::new(),
            projectiles: ProjectileManager::new(),
            particles: ParticleEmitter::new(),
            power_ups: PowerUpManager::new(),
            spawning: Spawning::new(spawning::Config::from_tuning(&tuning)),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            offers: PowerUps::new(power_up_offers::Config::from_tuning(&tuning)),
            pending_offer: None,
            armed: None,
            run_active: false,
            paused: true,
            now: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(tuning.rng_seed),
            particle_rng: ChaCha8Rng::seed_from_u64(tuning.rng_seed ^ PARTICLE_STREAM),
            departed: Vec::new(),
            tower_targets: Vec::new(),
            fire_orders: Vec::new(),
            catalog,
            tuning,
        }
    }

    fn execute(&mut self, command: Command, out: &mut Vec<Event>) -> Result<(), CommandError> {
        match command {
            Command::ConfigureViewport { width, height } => {
                if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
                    return Err(CommandError::InvalidViewport);
                }
                self.camera = Camera::new(width, height);
                self.path = Arc::from(default_path(width, height));
            }
            Command::SetPath { waypoints } => {
                if !waypoints.iter().all(|point| point.is_finite()) {
                    return Err(CommandError::InvalidPath);
                }
                self.path = Arc::from(waypoints);
            }
            Command::StartRun => {
                self.reset_run();
                self.rng = ChaCha8Rng::seed_from_u64(self.tuning.rng_seed);
                self.particle_rng =
                    ChaCha8Rng::seed_from_u64(self.tuning.rng_seed ^ PARTICLE_STREAM);
                self.run_active = true;
                self.paused = false;
                info!(
                    gold = self.state.gold,
                    health = self.state.health,
                    "run started"
                );
                out.push(Event::RunStarted);
            }
            Command::ResetRun => {
                self.reset_run();
                self.run_active = false;
                self.paused = true;
                out.push(Event::RunReset);
            }
            Command::Pause => {
                self.ensure_playable()?;
                if !self.paused {
                    self.paused = true;
                    out.push(Event::PauseChanged { paused: true });
                }
            }
            Command::Resume => {
                self.ensure_playable()?;
                if self.pending_offer.is_some() {
                    return Err(CommandError::OfferPending);
                }
                if self.paused {
                    self.paused = false;
                    out.push(Event::PauseChanged { paused: false });
                }
            }
            Command::SelectTowerType { kind } => {
                self.ensure_playable()?;
                if self.catalog.tower(&kind).is_none() {
                    return Err(CommandError::UnknownTowerType(kind));
                }
                self.armed = Some(kind);
                self.set_mode(PlayMode::Placing, out);
            }
            Command::CancelPlacement => {
                self.ensure_playable()?;
                self.ensure_mode(PlayMode::Placing)?;
                self.armed = None;
                self.set_mode(PlayMode::Selecting, out);
            }
            Command::PlaceTower { kind, position } => self.place_tower(kind, position, out)?,
            Command::UpgradeTower { tower, stat } => {
                self.ensure_playable()?;
                let cap = self.tuning.max_upgrade_level;
                let level = self
                    .towers
                    .get_mut(tower)
                    .ok_or(CommandError::UnknownTower(tower))?
                    .upgrade(stat, cap)?;
                out.push(Event::TowerUpgraded { tower, stat, level });
            }
            Command::ChoosePowerUp { kind, now } => {
                self.ensure_playable()?;
                let offer = self
                    .pending_offer
                    .as_ref()
                    .ok_or(CommandError::NoPendingOffer)?;
                if !offer.contains(&kind) {
                    return Err(CommandError::PowerUpNotOffered(kind));
                }
                let definition = self
                    .catalog
                    .power_up(kind)
                    .ok_or_else(|| CommandError::UnknownPowerUpId(kind.to_string()))?;

                let mut targets = EffectTargets {
                    state: &mut self.state,
                    towers: &mut self.towers,
                    enemies: &mut self.enemies,
                };
                let power_up = self.power_ups.activate(definition, now, &mut targets);
                self.now = self.now.max(now);
                out.push(Event::PowerUpActivated { power_up, kind });
                self.resolve_offer(out);
            }
            Command::DeclinePowerUps => {
                self.ensure_playable()?;
                if self.pending_offer.is_none() {
                    return Err(CommandError::NoPendingOffer);
                }
                out.push(Event::PowerUpsDeclined);
                self.resolve_offer(out);
            }
            Command::PanCamera { dx, dy } => {
                if !(dx.is_finite() && dy.is_finite()) {
                    return Err(CommandError::InvalidPosition);
                }
                self.camera.pan(dx, dy);
            }
            Command::ZoomCamera { zoom } => self.camera.set_zoom(zoom),
            Command::Tick { dt, now } => {
                if self.run_active && !self.paused && !self.state.game_over {
                    self.step(dt, now, out);
                }
            }
        }
        Ok(())
    }

    fn place_tower(
        &mut self,
        kind: TowerTypeId,
        position: Vector2,
        out: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        self.ensure_playable()?;
        self.ensure_mode(PlayMode::Placing)?;
        if self.armed.as_ref() != Some(&kind) {
            return Err(CommandError::TowerNotArmed(kind));
        }
        if !position.is_finite() {
            return Err(CommandError::InvalidPosition);
        }
        let Some(definition) = self.catalog.tower(&kind) else {
            return Err(CommandError::UnknownTowerType(kind));
        };
        if self.state.gold < definition.cost {
            return Err(CommandError::InsufficientGold {
                cost: definition.cost,
                gold: self.state.gold,
            });
        }

        self.state.gold -= definition.cost;
        self.state.score += (definition.cost * self.tuning.placement_score_ratio).floor();
        let tower = self.towers.place(definition, position);
        debug!(tower = tower.get(), kind = %kind, "tower placed");
        out.push(Event::TowerPlaced {
            tower,
            kind,
            position,
        });
        self.armed = None;
        self.set_mode(PlayMode::Selecting, out);
        Ok(())
    }

    fn step(&mut self, dt: Duration, now: Duration, out: &mut Vec<Event>) {
        let dt = dt.min(self.tuning.max_frame_time());
        let seconds = dt.as_secs_f32();
        self.now = now;
        out.push(Event::TimeAdvanced { dt });

        self.step_enemies(dt, seconds, out);
        self.step_towers(seconds, out);

        let mut hits = Vec::new();
        self.projectiles
            .advance(seconds, &mut self.enemies, &mut hits);
        if !hits.is_empty() {
            trace!(hits = hits.len(), "projectiles connected");
        }

        let mut expired = Vec::new();
        self.power_ups.expire(
            now,
            &mut EffectTargets {
                state: &mut self.state,
                towers: &mut self.towers,
                enemies: &mut self.enemies,
            },
            &mut expired,
        );
        out.extend(
            expired
                .into_iter()
                .map(|(power_up, kind)| Event::PowerUpExpired { power_up, kind }),
        );

        self.particles.advance(seconds);
        self.settle_departures(out);

        if self.state.health <= 0.0 && !self.state.game_over {
            self.state.game_over = true;
            self.paused = true;
            let summary = self.state.summary();
            info!(
                score = summary.score,
                wave = summary.wave,
                kills = summary.kills,
                "game over"
            );
            out.push(Event::GameOver { summary });
        }

        let (width, height) = self.camera.viewport();
        self.camera
            .update(Vector2::new(width / 2.0, height / 2.0));
    }

    fn step_enemies(&mut self, dt: Duration, seconds: f32, out: &mut Vec<Event>) {
        self.enemies.advance(seconds);
        self.enemies.drain_departed(&mut self.departed);

        let has_path = !self.path.is_empty();
        if let Some(definition) = self.spawning.handle(
            dt,
            self.state.score,
            has_path,
            self.catalog.enemies(),
            &mut self.rng,
        ) {
            let enemy = self.enemies.spawn(definition, Arc::clone(&self.path));
            self.state.wave = self.state.wave.saturating_add(1);
            trace!(enemy = enemy.get(), kind = %definition.id, "enemy spawned");
            out.push(Event::EnemySpawned {
                enemy,
                kind: definition.id.clone(),
            });
        }
    }

    fn step_towers(&mut self, seconds: f32, out: &mut Vec<Event>) {
        self.towers.cool_down(seconds);
        if self.towers.is_empty() {
            return;
        }

        let tower_view = self.towers.view();
        let enemy_view = self.enemies.view();
        self.targeting
            .handle(&tower_view, &enemy_view, &mut self.tower_targets);
        self.towers.assign_targets(
            self.tower_targets
                .iter()
                .map(|target| (target.tower, target.enemy)),
        );

        let crit = CritRoll::new(self.state.crit_chance, self.tuning.crit_multiplier);
        self.combat.handle(
            &tower_view,
            &self.tower_targets,
            crit,
            &mut self.rng,
            &mut self.fire_orders,
        );

        for order in self.fire_orders.drain(..) {
            self.towers.hold_fire(order.tower, order.cooldown);
            self.projectiles.add(Projectile::launch(
                order.tower,
                order.origin,
                order.aim,
                order.damage,
                order.kind,
                self.tuning.projectile_max_distance,
            ));
            trace!(
                tower = order.tower.get(),
                target = order.target.get(),
                damage = order.damage,
                critical = order.critical,
                "projectile fired"
            );
            out.push(Event::ProjectileFired {
                tower: order.tower,
                target: order.target,
                damage: order.damage,
                critical: order.critical,
            });
        }
    }

    fn settle_departures(&mut self, out: &mut Vec<Event>) {
        for enemy in &self.departed {
            if enemy.state() != EnemyState::ReachedEnd {
                continue;
            }
            self.state.health -= enemy.damage();
            self.particles.burst(
                &mut self.particle_rng,
                enemy.position(),
                ESCAPE_BURST.count,
                ESCAPE_BURST.life,
                ESCAPE_BURST.color,
            );
            out.push(Event::EnemyReachedEnd {
                enemy: enemy.id(),
                damage: enemy.damage(),
            });
        }

        let mut kills = 0;
        for enemy in &self.departed {
            if enemy.state() != EnemyState::Dead {
                continue;
            }
            let reward = self.state.credit_kill(enemy.bounty());
            kills += 1;
            self.particles.burst(
                &mut self.particle_rng,
                enemy.position(),
                KILL_BURST.count,
                KILL_BURST.life,
                KILL_BURST.color,
            );
            out.push(Event::EnemyKilled {
                enemy: enemy.id(),
                reward,
            });
        }
        self.departed.clear();

        if let Some(choices) = self.offers.handle(
            kills,
            self.pending_offer.is_some(),
            self.catalog.power_ups(),
            &mut self.rng,
        ) {
            debug!(?choices, "power-up offered");
            self.pending_offer = Some(choices.clone());
            out.push(Event::PowerUpOffered { choices });
            if !self.paused {
                self.paused = true;
                out.push(Event::PauseChanged { paused: true });
            }
        }
    }

    fn resolve_offer(&mut self, out: &mut Vec<Event>) {
        self.pending_offer = None;
        if self.paused {
            self.paused = false;
            out.push(Event::PauseChanged { paused: false });
        }
    }

    fn reset_run(&mut self) {
        self.power_ups.clear(&mut EffectTargets {
            state: &mut self.state,
            towers: &mut self.towers,
            enemies: &mut self.enemies,
        });
        self.state.reset(&self.tuning);
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.spawning.reset();
        self.pending_offer = None;
        self.armed = None;
        self.departed.clear();
        self.tower_targets.clear();
        self.fire_orders.clear();
    }

    fn ensure_playable(&self) -> Result<(), CommandError> {
        if self.state.game_over {
            return Err(CommandError::GameOver);
        }
        if !self.run_active {
            return Err(CommandError::RunInactive);
        }
        Ok(())
    }

    fn ensure_mode(&self, expected: PlayMode) -> Result<(), CommandError> {
        if self.state.mode != expected {
            return Err(CommandError::InvalidMode {
                expected,
                actual: self.state.mode,
            });
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: PlayMode, out: &mut Vec<Event>) {
        if self.state.mode != mode {
            self.state.mode = mode;
            out.push(Event::PlayModeChanged { mode });
        }
    }
}

/// Winding path laid out across a viewport of the given size.
///
/// The path enters on the left edge, loops through the upper and lower
/// halves, and returns to its starting point.
#[must_use]
pub fn default_path(width: f32, height: f32) -> Vec<Vector2> {
    vec![
        Vector2::new(0.0, height / 2.0),
        Vector2::new(width / 4.0, height / 4.0),
        Vector2::new(width / 2.0, height / 10.0),
        Vector2::new(width * 3.0 / 4.0, height / 4.0),
        Vector2::new(width, height / 2.0),
        Vector2::new(width * 3.0 / 4.0, height * 3.0 / 4.0),
        Vector2::new(width / 2.0, height * 9.0 / 10.0),
        Vector2::new(width / 4.0, height * 3.0 / 4.0),
        Vector2::new(0.0, height / 2.0),
    ]
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid commands leave the world untouched and produce a single
/// [`Event::CommandRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if let Err(error) = world.execute(command, out_events) {
        debug!(%error, "command rejected");
        out_events.push(Event::CommandRejected { error });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Camera, World, TOWER_RADIUS};
    use path_defence_core::{
        Catalog, EnemyView, GameState, ParticleView, PlayMode, PowerUpKind, PowerUpView,
        ProjectileView, RunSummary, SimulationTuning, TowerId, TowerTypeId, TowerView, Vector2,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Shared economy and progress record.
    #[must_use]
    pub fn game_state(world: &World) -> &GameState {
        &world.state
    }

    /// Current interaction mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.state.mode
    }

    /// Statistics of the run so far.
    #[must_use]
    pub fn summary(world: &World) -> RunSummary {
        world.state.summary()
    }

    /// Reports whether a run has been started and not reset since.
    #[must_use]
    pub fn is_run_active(world: &World) -> bool {
        world.run_active
    }

    /// Reports whether ticks are currently skipped.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Reports whether the run has ended.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.state.game_over
    }

    /// Kinds offered by the pending power-up choice.
    #[must_use]
    pub fn pending_offer(world: &World) -> Option<&[PowerUpKind]> {
        world.pending_offer.as_deref()
    }

    /// Tower type armed for placement.
    #[must_use]
    pub fn armed_tower(world: &World) -> Option<&TowerTypeId> {
        world.armed.as_ref()
    }

    /// Reports whether the player can currently pay for a tower of `kind`.
    #[must_use]
    pub fn can_afford(world: &World, kind: &TowerTypeId) -> bool {
        world
            .catalog
            .tower(kind)
            .is_some_and(|definition| world.state.gold >= definition.cost)
    }

    /// Tower whose body covers `position`, preferring the earliest placed.
    #[must_use]
    pub fn tower_at(world: &World, position: Vector2) -> Option<TowerId> {
        world
            .towers
            .iter()
            .find(|tower| tower.position().distance(position) <= TOWER_RADIUS)
            .map(|tower| tower.id())
    }

    /// Waypoints new enemies will follow.
    #[must_use]
    pub fn path(world: &World) -> &[Vector2] {
        &world.path
    }

    /// Viewport camera.
    #[must_use]
    pub fn camera(world: &World) -> &Camera {
        &world.camera
    }

    /// Definitions the world was built from.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Tuning the world was built from.
    #[must_use]
    pub fn tuning(world: &World) -> &SimulationTuning {
        &world.tuning
    }

    /// Host timestamp of the latest tick or power-up choice.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Captures a read-only view of the enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        world.enemies.view()
    }

    /// Captures a read-only view of the towers in placement order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        world.towers.view()
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        world.projectiles.view()
    }

    /// Captures a read-only view of the live particles.
    #[must_use]
    pub fn particle_view(world: &World) -> ParticleView {
        world.particles.view()
    }

    /// Captures a read-only view of the active power-ups.
    #[must_use]
    pub fn power_up_view(world: &World) -> PowerUpView {
        world.power_ups.view(world.now)
    }
}
