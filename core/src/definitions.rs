//! Static type definitions loaded from configuration before a run starts.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::CommandError;

const DEFAULT_ENEMY_RADIUS: f32 = 8.0;
const DEFAULT_ENEMY_VALUE: f64 = 1.0;
const DEFAULT_ENEMY_DAMAGE: f64 = 1.0;

/// Identifier of a tower type as named in the configuration data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TowerTypeId(String);

impl TowerTypeId {
    /// Wraps the provided identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed textual form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TowerTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an enemy type as named in the configuration data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyTypeId(String);

impl EnemyTypeId {
    /// Wraps the provided identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed textual form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnemyTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visual and flight behaviour of a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileKind {
    /// Plain round shot.
    #[default]
    Normal,
    /// Orange round shot.
    Fire,
    /// Cyan round shot.
    Ice,
    /// Slow, wide arcing bolt.
    Lightning,
    /// Green round shot.
    Poison,
    /// Fast beam that fades after a fixed lifetime.
    Laser,
}

impl ProjectileKind {
    /// Launch speed in world units per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Laser => 500.0,
            Self::Lightning => 200.0,
            Self::Normal | Self::Fire | Self::Ice | Self::Poison => 300.0,
        }
    }

    /// Collision radius in world units.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Laser => 3.0,
            Self::Lightning => 5.0,
            Self::Normal | Self::Fire | Self::Ice | Self::Poison => 4.0,
        }
    }

    /// Hard expiry in seconds, independent of distance travelled.
    ///
    /// Only the laser beam carries one.
    #[must_use]
    pub const fn lifetime(self) -> Option<f32> {
        match self {
            Self::Laser => Some(0.15),
            _ => None,
        }
    }
}

/// Per-level increments applied by tower upgrades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeMultiplier {
    /// Damage added per damage level.
    #[serde(default)]
    pub damage: f32,
    /// Range added per range level.
    #[serde(default)]
    pub range: f32,
    /// Attacks per second added per speed level.
    #[serde(default)]
    pub speed: f32,
}

/// Tower statistic that can be upgraded one level at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeStat {
    /// Projectile damage.
    Damage,
    /// Targeting range.
    Range,
    /// Attack speed.
    Speed,
}

impl FromStr for UpgradeStat {
    type Err = CommandError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "damage" => Ok(Self::Damage),
            "range" => Ok(Self::Range),
            "speed" => Ok(Self::Speed),
            other => Err(CommandError::UnknownUpgradeStat(other.to_owned())),
        }
    }
}

/// Definition of a placeable tower type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerDefinition {
    /// Unique identifier.
    pub id: TowerTypeId,
    /// Display name.
    pub name: String,
    /// Gold deducted on placement.
    pub cost: f64,
    /// Base targeting range.
    pub range: f32,
    /// Base projectile damage.
    pub damage: f32,
    /// Base attacks per second.
    pub attack_speed: f32,
    /// Kind of projectile fired.
    #[serde(default)]
    pub projectile_type: ProjectileKind,
    /// Increments applied per upgrade level.
    #[serde(default)]
    pub upgrade_multiplier: UpgradeMultiplier,
    /// CSS-style colour used by renderers.
    #[serde(default)]
    pub color: Option<String>,
    /// Flavour text.
    #[serde(default)]
    pub description: String,
}

/// Definition of an enemy type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDefinition {
    /// Unique identifier.
    pub id: EnemyTypeId,
    /// Starting health.
    pub health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Flat reduction applied to every hit.
    #[serde(default)]
    pub armor: f32,
    /// Gold awarded on death before the multiplier.
    pub bounty: f64,
    /// Inverse spawn weight; higher values spawn less often.
    #[serde(default = "default_enemy_value")]
    pub value: f64,
    /// Health removed from the player when the enemy reaches the end.
    #[serde(default = "default_enemy_damage")]
    pub damage: f64,
    /// Collision radius.
    #[serde(default = "default_enemy_radius")]
    pub radius: f32,
    /// CSS-style colour used by renderers.
    #[serde(default)]
    pub color: Option<String>,
}

impl EnemyDefinition {
    /// Weight used by the spawner, treating non-positive values as one.
    #[must_use]
    pub fn spawn_weight(&self) -> f64 {
        if self.value > 0.0 && self.value.is_finite() {
            1.0 / self.value
        } else {
            1.0
        }
    }
}

fn default_enemy_value() -> f64 {
    DEFAULT_ENEMY_VALUE
}

fn default_enemy_damage() -> f64 {
    DEFAULT_ENEMY_DAMAGE
}

fn default_enemy_radius() -> f32 {
    DEFAULT_ENEMY_RADIUS
}

/// The five fixed power-up behaviours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Adds damage levels to every tower present at activation.
    TowerDamageBoost,
    /// Scales the reward multiplier.
    GoldMultiplier,
    /// Restores player health up to the maximum.
    HealthRestore,
    /// Sets the critical strike chance.
    CriticalStrike,
    /// Slows every enemy present at activation.
    SlowEnemies,
}

impl PowerUpKind {
    /// Every kind in declaration order.
    pub const ALL: [Self; 5] = [
        Self::TowerDamageBoost,
        Self::GoldMultiplier,
        Self::HealthRestore,
        Self::CriticalStrike,
        Self::SlowEnemies,
    ];

    /// Magnitude used when the definition leaves `value` unset.
    #[must_use]
    pub const fn default_value(self) -> f64 {
        match self {
            Self::TowerDamageBoost => 1.0,
            Self::GoldMultiplier => 1.5,
            Self::HealthRestore => 20.0,
            Self::CriticalStrike => 0.2,
            Self::SlowEnemies => 0.7,
        }
    }

    /// Identifier used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TowerDamageBoost => "tower_damage_boost",
            Self::GoldMultiplier => "gold_multiplier",
            Self::HealthRestore => "health_restore",
            Self::CriticalStrike => "critical_strike",
            Self::SlowEnemies => "slow_enemies",
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerUpKind {
    type Err = CommandError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| CommandError::UnknownPowerUpId(value.to_owned()))
    }
}

/// Definition of a power-up offered to the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerUpDefinition {
    /// Behaviour selected by this definition.
    pub id: PowerUpKind,
    /// Display name.
    pub name: String,
    /// Flavour text.
    #[serde(default)]
    pub description: String,
    /// Effect magnitude; the kind's default applies when absent or zero.
    #[serde(default)]
    pub value: Option<f64>,
    /// Lifetime in seconds; absent or non-positive means it lasts the whole run.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Rarity label shown in the offer.
    #[serde(default)]
    pub rarity: Option<String>,
    /// CSS-style colour used by renderers.
    #[serde(default)]
    pub color: Option<String>,
}

impl PowerUpDefinition {
    /// Effect magnitude, falling back to the kind default.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        match self.value {
            Some(value) if value != 0.0 && value.is_finite() => value,
            _ => self.id.default_value(),
        }
    }

    /// Finite lifetime of the effect, if any.
    #[must_use]
    pub fn lifetime(&self) -> Option<Duration> {
        self.duration
            .filter(|seconds| *seconds > 0.0 && seconds.is_finite())
            .map(Duration::from_secs_f64)
    }
}

/// Complete set of type definitions a run is built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    towers: Vec<TowerDefinition>,
    enemies: Vec<EnemyDefinition>,
    power_ups: Vec<PowerUpDefinition>,
}

impl Catalog {
    /// Bundles the provided definitions, preserving their order.
    #[must_use]
    pub fn new(
        towers: Vec<TowerDefinition>,
        enemies: Vec<EnemyDefinition>,
        power_ups: Vec<PowerUpDefinition>,
    ) -> Self {
        Self {
            towers,
            enemies,
            power_ups,
        }
    }

    /// Tower definitions in configuration order.
    #[must_use]
    pub fn towers(&self) -> &[TowerDefinition] {
        &self.towers
    }

    /// Enemy definitions in configuration order.
    #[must_use]
    pub fn enemies(&self) -> &[EnemyDefinition] {
        &self.enemies
    }

    /// Power-up definitions in configuration order.
    #[must_use]
    pub fn power_ups(&self) -> &[PowerUpDefinition] {
        &self.power_ups
    }

    /// Looks up a tower definition by identifier.
    #[must_use]
    pub fn tower(&self, id: &TowerTypeId) -> Option<&TowerDefinition> {
        self.towers.iter().find(|definition| &definition.id == id)
    }

    /// Looks up an enemy definition by identifier.
    #[must_use]
    pub fn enemy(&self, id: &EnemyTypeId) -> Option<&EnemyDefinition> {
        self.enemies.iter().find(|definition| &definition.id == id)
    }

    /// Looks up the definition of a power-up kind, if it was loaded.
    #[must_use]
    pub fn power_up(&self, kind: PowerUpKind) -> Option<&PowerUpDefinition> {
        self.power_ups.iter().find(|definition| definition.id == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_defaults_fill_optional_fields() {
        let definition: EnemyDefinition = serde_json::from_str(
            r#"{"id": "grunt", "health": 50, "speed": 40, "bounty": 10}"#,
        )
        .expect("parse enemy");

        assert_eq!(definition.armor, 0.0);
        assert_eq!(definition.value, 1.0);
        assert_eq!(definition.damage, 1.0);
        assert_eq!(definition.radius, 8.0);
        assert_eq!(definition.spawn_weight(), 1.0);
    }

    #[test]
    fn spawn_weight_is_inverse_of_value() {
        let mut definition: EnemyDefinition = serde_json::from_str(
            r#"{"id": "tank", "health": 200, "speed": 20, "bounty": 40, "value": 4}"#,
        )
        .expect("parse enemy");
        assert_eq!(definition.spawn_weight(), 0.25);

        definition.value = 0.0;
        assert_eq!(definition.spawn_weight(), 1.0);
    }

    #[test]
    fn tower_definition_reads_camel_case_keys() {
        let definition: TowerDefinition = serde_json::from_str(
            r#"{
                "id": "laser",
                "name": "Laser",
                "cost": 150,
                "range": 120,
                "damage": 8,
                "attackSpeed": 4,
                "projectileType": "laser",
                "upgradeMultiplier": {"damage": 2, "range": 10, "speed": 0.5}
            }"#,
        )
        .expect("parse tower");

        assert_eq!(definition.projectile_type, ProjectileKind::Laser);
        assert_eq!(definition.upgrade_multiplier.range, 10.0);
        assert_eq!(definition.attack_speed, 4.0);
    }

    #[test]
    fn power_up_value_and_duration_fall_back() {
        let definition: PowerUpDefinition = serde_json::from_str(
            r#"{"id": "gold_multiplier", "name": "Midas", "duration": 0}"#,
        )
        .expect("parse power-up");

        assert_eq!(definition.magnitude(), 1.5);
        assert_eq!(definition.lifetime(), None);
    }

    #[test]
    fn unknown_power_up_identifier_is_rejected() {
        let parsed = serde_json::from_str::<PowerUpDefinition>(r#"{"id": "teleport", "name": "?"}"#);
        assert!(parsed.is_err());
        assert!("teleport".parse::<PowerUpKind>().is_err());
        assert_eq!("slow_enemies".parse::<PowerUpKind>(), Ok(PowerUpKind::SlowEnemies));
    }

    #[test]
    fn upgrade_stat_parses_known_names_only() {
        assert_eq!("range".parse::<UpgradeStat>(), Ok(UpgradeStat::Range));
        assert_eq!(
            "armor".parse::<UpgradeStat>(),
            Err(CommandError::UnknownUpgradeStat("armor".to_owned()))
        );
    }

    #[test]
    fn laser_is_the_only_kind_with_a_lifetime() {
        assert_eq!(ProjectileKind::Laser.lifetime(), Some(0.15));
        assert_eq!(ProjectileKind::Fire.lifetime(), None);
        assert_eq!(ProjectileKind::Lightning.speed(), 200.0);
    }
}
