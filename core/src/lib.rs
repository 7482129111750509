#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Systems are pure functions over snapshots and the explicitly
//! passed [`GameState`].

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod definitions;
mod geometry;
mod state;
pub mod util;
mod views;

pub use definitions::{
    Catalog, EnemyDefinition, EnemyTypeId, PowerUpDefinition, PowerUpKind, ProjectileKind,
    TowerDefinition, TowerTypeId, UpgradeMultiplier, UpgradeStat,
};
pub use geometry::{Circle, Rect, Vector2};
pub use state::{GameState, PlayMode, RunSummary, SimulationTuning};
pub use views::{
    EnemySnapshot, EnemyState, EnemyView, ParticleSnapshot, ParticleView, PowerUpSnapshot,
    PowerUpView, ProjectileSnapshot, ProjectileView, TowerSnapshot, TowerTarget, TowerView,
    UpgradeLevels, View,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resizes the viewport, re-centres the camera, and installs the default winding path.
    ConfigureViewport {
        /// Viewport width in world units.
        width: f32,
        /// Viewport height in world units.
        height: f32,
    },
    /// Replaces the path enemies follow.
    SetPath {
        /// Ordered waypoints; enemies spawn on the first one.
        waypoints: Vec<Vector2>,
    },
    /// Resets the game state, clears every collection, and unpauses.
    StartRun,
    /// Clears every collection and pauses without starting a new run.
    ResetRun,
    /// Suspends ticking.
    Pause,
    /// Resumes ticking.
    Resume,
    /// Arms a tower type for placement, entering [`PlayMode::Placing`].
    SelectTowerType {
        /// Tower type to arm.
        kind: TowerTypeId,
    },
    /// Disarms placement, returning to [`PlayMode::Selecting`].
    CancelPlacement,
    /// Builds a tower, deducting its cost.
    PlaceTower {
        /// Tower type to build.
        kind: TowerTypeId,
        /// World position of the tower.
        position: Vector2,
    },
    /// Raises one statistic of a tower by one level.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
        /// Statistic to raise.
        stat: UpgradeStat,
    },
    /// Resolves the pending power-up offer by activating one of its choices.
    ChoosePowerUp {
        /// Offered kind to activate.
        kind: PowerUpKind,
        /// Host wall-clock timestamp of the choice.
        now: Duration,
    },
    /// Resolves the pending power-up offer without activating anything.
    DeclinePowerUps,
    /// Moves the camera by a screen-space offset.
    PanCamera {
        /// Horizontal screen offset.
        dx: f32,
        /// Vertical screen offset.
        dy: f32,
    },
    /// Sets the camera zoom, clamped to the supported range.
    ZoomCamera {
        /// Requested zoom factor.
        zoom: f32,
    },
    /// Advances the simulation by one frame.
    Tick {
        /// Time elapsed since the previous frame; clamped by the world.
        dt: Duration,
        /// Host wall-clock timestamp used for power-up expiry.
        now: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new run started with fresh defaults.
    RunStarted,
    /// The world was cleared and paused.
    RunReset,
    /// The pause flag changed.
    PauseChanged {
        /// Whether ticking is now suspended.
        paused: bool,
    },
    /// The interaction mode changed.
    PlayModeChanged {
        /// Mode now active.
        mode: PlayMode,
    },
    /// The simulation advanced by a clamped delta.
    TimeAdvanced {
        /// Delta actually simulated.
        dt: Duration,
    },
    /// An enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Type the enemy was spawned from.
        kind: EnemyTypeId,
    },
    /// An enemy walked off the end of the path.
    EnemyReachedEnd {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Health removed from the player.
        damage: f64,
    },
    /// An enemy died and its bounty was paid out.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Gold and score credited.
        reward: f64,
    },
    /// A tower was built.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of the tower.
        kind: TowerTypeId,
        /// Position of the tower.
        position: Vector2,
    },
    /// A tower statistic was raised.
    TowerUpgraded {
        /// Upgraded tower.
        tower: TowerId,
        /// Raised statistic.
        stat: UpgradeStat,
        /// Level after the upgrade.
        level: u32,
    },
    /// A tower launched a projectile.
    ProjectileFired {
        /// Firing tower.
        tower: TowerId,
        /// Enemy aimed at.
        target: EnemyId,
        /// Damage carried by the projectile.
        damage: f32,
        /// Whether the shot rolled a critical strike.
        critical: bool,
    },
    /// A kill opened a power-up choice; the simulation is paused until it is resolved.
    PowerUpOffered {
        /// Kinds the player may choose from.
        choices: Vec<PowerUpKind>,
    },
    /// A power-up effect was applied.
    PowerUpActivated {
        /// Identifier assigned to the effect.
        power_up: PowerUpId,
        /// Behaviour of the effect.
        kind: PowerUpKind,
    },
    /// A power-up effect expired and was reverted.
    PowerUpExpired {
        /// Identifier of the effect.
        power_up: PowerUpId,
        /// Behaviour of the effect.
        kind: PowerUpKind,
    },
    /// The pending offer was declined.
    PowerUpsDeclined,
    /// A command failed validation and changed nothing.
    CommandRejected {
        /// Reason for the rejection.
        error: CommandError,
    },
    /// Health reached zero; the run is over.
    GameOver {
        /// Final statistics.
        summary: RunSummary,
    },
}

/// Reasons a command may be rejected by the world.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    /// No run is in progress.
    #[error("no run is in progress")]
    RunInactive,
    /// The run has ended.
    #[error("the run is over")]
    GameOver,
    /// The command is not valid in the current interaction mode.
    #[error("command requires {expected:?} mode but the world is in {actual:?} mode")]
    InvalidMode {
        /// Mode the command requires.
        expected: PlayMode,
        /// Mode the world is in.
        actual: PlayMode,
    },
    /// The tower type differs from the one armed for placement.
    #[error("tower type `{0}` is not the one armed for placement")]
    TowerNotArmed(TowerTypeId),
    /// The tower type is not part of the loaded catalog.
    #[error("unknown tower type `{0}`")]
    UnknownTowerType(TowerTypeId),
    /// The player cannot afford the tower.
    #[error("tower costs {cost} gold but only {gold} is available")]
    InsufficientGold {
        /// Price of the tower.
        cost: f64,
        /// Gold available.
        gold: f64,
    },
    /// No tower with the identifier exists.
    #[error("no tower with id {0}")]
    UnknownTower(TowerId),
    /// The named statistic cannot be upgraded.
    #[error("unknown upgrade stat `{0}`")]
    UnknownUpgradeStat(String),
    /// The statistic already reached the configured cap.
    #[error("{stat:?} of tower {tower} is already at the cap of {cap}")]
    UpgradeCapReached {
        /// Tower that was asked to upgrade.
        tower: TowerId,
        /// Capped statistic.
        stat: UpgradeStat,
        /// Configured cap.
        cap: u32,
    },
    /// The power-up identifier does not name a known behaviour.
    #[error("unknown power-up `{0}`")]
    UnknownPowerUpId(String),
    /// There is no power-up offer to resolve.
    #[error("no power-up offer is pending")]
    NoPendingOffer,
    /// The kind was not part of the pending offer.
    #[error("power-up `{0}` was not offered")]
    PowerUpNotOffered(PowerUpKind),
    /// Ticking cannot resume while an offer awaits a decision.
    #[error("a power-up offer must be resolved first")]
    OfferPending,
    /// The path contains a non-finite coordinate.
    #[error("path waypoints must be finite")]
    InvalidPath,
    /// The viewport dimensions are not positive finite numbers.
    #[error("viewport dimensions must be positive")]
    InvalidViewport,
    /// The placement position is not finite.
    #[error("placement position must be finite")]
    InvalidPosition,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to an activated power-up effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpId(u32);

impl PowerUpId {
    /// Creates a new power-up identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}
