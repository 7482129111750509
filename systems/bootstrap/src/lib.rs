#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Path Defence run.
//!
//! Definitions are read from `towers.json`, `enemies.json` and
//! `powerups.json`, optionally accompanied by a `tuning.toml`. Loading is
//! all-or-nothing: any failure yields a [`ConfigError`] and no [`World`].

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use path_defence_core::{
    Catalog, EnemyDefinition, PowerUpDefinition, SimulationTuning, TowerDefinition,
};
use path_defence_world::{query, World};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// File holding the tower definitions.
pub const TOWERS_FILE: &str = "towers.json";
/// File holding the enemy definitions.
pub const ENEMIES_FILE: &str = "enemies.json";
/// File holding the power-up definitions.
pub const POWER_UPS_FILE: &str = "powerups.json";
/// Optional file overriding the simulation tuning.
pub const TUNING_FILE: &str = "tuning.toml";

/// Reasons a configuration could not be turned into a world.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A definition file is not valid JSON of the expected shape.
    #[error("failed to parse {file}")]
    Json {
        /// Name of the offending source.
        file: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The tuning file is not valid TOML of the expected shape.
    #[error("failed to parse {file}")]
    Toml {
        /// Name of the offending source.
        file: String,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// A definition collection holds no entries.
    #[error("no {collection} defined")]
    Empty {
        /// Collection that was empty.
        collection: &'static str,
    },
    /// Two entries of one collection share an identifier.
    #[error("duplicate {collection} definition `{id}`")]
    Duplicate {
        /// Collection holding the duplicate.
        collection: &'static str,
        /// Repeated identifier.
        id: String,
    },
    /// A definition holds an unusable value.
    #[error("invalid {collection} definition `{id}`: {reason}")]
    InvalidDefinition {
        /// Collection holding the definition.
        collection: &'static str,
        /// Identifier of the definition.
        id: String,
        /// Description of the offending field.
        reason: String,
    },
    /// The tuning holds an unusable value.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

#[derive(Debug, Deserialize)]
struct TowerFile {
    towers: Vec<TowerDefinition>,
}

#[derive(Debug, Deserialize)]
struct EnemyFile {
    enemies: Vec<EnemyDefinition>,
}

#[derive(Debug, Deserialize)]
struct PowerUpFile {
    powerups: Vec<PowerUpDefinition>,
}

/// Validated definitions and tuning ready to build a [`World`].
#[derive(Clone, Debug)]
pub struct Bootstrap {
    catalog: Catalog,
    tuning: SimulationTuning,
}

impl Bootstrap {
    /// Loads every definition file from `data_dir`.
    ///
    /// `tuning.toml` is read from the same directory when present.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.as_ref();
        let tuning = data_dir.join(TUNING_FILE);
        let tuning = tuning.is_file().then_some(tuning);
        Self::load_with_tuning(data_dir, tuning.as_deref())
    }

    /// Loads every definition file from `data_dir` and the tuning from `tuning_path`.
    ///
    /// Without a tuning path the defaults apply.
    pub fn load_with_tuning(
        data_dir: impl AsRef<Path>,
        tuning_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let data_dir = data_dir.as_ref();
        let towers = read(&data_dir.join(TOWERS_FILE))?;
        let enemies = read(&data_dir.join(ENEMIES_FILE))?;
        let power_ups = read(&data_dir.join(POWER_UPS_FILE))?;
        let tuning = tuning_path.map(read).transpose()?;

        let bootstrap = Self::from_sources(&towers, &enemies, &power_ups, tuning.as_deref())?;
        info!(
            data = %data_dir.display(),
            towers = bootstrap.catalog.towers().len(),
            enemies = bootstrap.catalog.enemies().len(),
            power_ups = bootstrap.catalog.power_ups().len(),
            "configuration loaded"
        );
        Ok(bootstrap)
    }

    /// Parses and validates configuration held in memory.
    pub fn from_sources(
        towers: &str,
        enemies: &str,
        power_ups: &str,
        tuning: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let towers = parse_json::<TowerFile>(TOWERS_FILE, towers)?.towers;
        let enemies = parse_json::<EnemyFile>(ENEMIES_FILE, enemies)?.enemies;
        let power_ups = parse_json::<PowerUpFile>(POWER_UPS_FILE, power_ups)?.powerups;
        let tuning = match tuning {
            Some(contents) => {
                toml::from_str(contents).map_err(|source| ConfigError::Toml {
                    file: TUNING_FILE.to_owned(),
                    source,
                })?
            }
            None => SimulationTuning::default(),
        };

        validate_towers(&towers)?;
        validate_enemies(&enemies)?;
        validate_power_ups(&power_ups)?;
        validate_tuning(&tuning)?;

        Ok(Self {
            catalog: Catalog::new(towers, enemies, power_ups),
            tuning,
        })
    }

    /// Overrides the gameplay seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.tuning.rng_seed = seed;
        self
    }

    /// Definitions that passed validation.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Tuning that passed validation.
    #[must_use]
    pub fn tuning(&self) -> &SimulationTuning {
        &self.tuning
    }

    /// Builds a world from the validated configuration.
    #[must_use]
    pub fn into_world(self) -> World {
        World::new(self.catalog, self.tuning)
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: for<'de> Deserialize<'de>>(file: &str, contents: &str) -> Result<T, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::Json {
        file: file.to_owned(),
        source,
    })
}

fn ensure_unique<'a>(
    collection: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::Duplicate {
                collection,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn check<const N: usize>(
    collection: &'static str,
    id: &str,
    rules: [(bool, &str); N],
) -> Result<(), ConfigError> {
    match rules.into_iter().find(|(valid, _)| !valid) {
        Some((_, reason)) => Err(ConfigError::InvalidDefinition {
            collection,
            id: id.to_owned(),
            reason: reason.to_owned(),
        }),
        None => Ok(()),
    }
}

fn validate_towers(towers: &[TowerDefinition]) -> Result<(), ConfigError> {
    const COLLECTION: &str = "tower";
    if towers.is_empty() {
        return Err(ConfigError::Empty {
            collection: COLLECTION,
        });
    }
    ensure_unique(COLLECTION, towers.iter().map(|tower| tower.id.as_str()))?;

    for tower in towers {
        let multiplier = tower.upgrade_multiplier;
        let rules = [
            (tower.cost.is_finite() && tower.cost >= 0.0, "cost must be non-negative"),
            (tower.range.is_finite() && tower.range > 0.0, "range must be positive"),
            (tower.damage.is_finite() && tower.damage >= 0.0, "damage must be non-negative"),
            (
                tower.attack_speed.is_finite() && tower.attack_speed >= 0.0,
                "attack speed must be non-negative",
            ),
            (
                multiplier.damage.is_finite()
                    && multiplier.range.is_finite()
                    && multiplier.speed.is_finite(),
                "upgrade multipliers must be finite",
            ),
        ];
        check(COLLECTION, tower.id.as_str(), rules)?;
    }
    Ok(())
}

fn validate_enemies(enemies: &[EnemyDefinition]) -> Result<(), ConfigError> {
    const COLLECTION: &str = "enemy";
    if enemies.is_empty() {
        return Err(ConfigError::Empty {
            collection: COLLECTION,
        });
    }
    ensure_unique(COLLECTION, enemies.iter().map(|enemy| enemy.id.as_str()))?;

    for enemy in enemies {
        let rules = [
            (enemy.health.is_finite() && enemy.health > 0.0, "health must be positive"),
            (enemy.speed.is_finite() && enemy.speed >= 0.0, "speed must be non-negative"),
            (enemy.armor.is_finite() && enemy.armor >= 0.0, "armor must be non-negative"),
            (enemy.bounty.is_finite() && enemy.bounty >= 0.0, "bounty must be non-negative"),
            (enemy.damage.is_finite() && enemy.damage >= 0.0, "damage must be non-negative"),
            (enemy.radius.is_finite() && enemy.radius > 0.0, "radius must be positive"),
        ];
        check(COLLECTION, enemy.id.as_str(), rules)?;
    }
    Ok(())
}

fn validate_power_ups(power_ups: &[PowerUpDefinition]) -> Result<(), ConfigError> {
    const COLLECTION: &str = "power-up";
    if power_ups.is_empty() {
        return Err(ConfigError::Empty {
            collection: COLLECTION,
        });
    }
    ensure_unique(COLLECTION, power_ups.iter().map(|power_up| power_up.id.as_str()))
}

fn validate_tuning(tuning: &SimulationTuning) -> Result<(), ConfigError> {
    let invalid = |reason: &str| -> Result<(), ConfigError> {
        Err(ConfigError::InvalidTuning(reason.to_owned()))
    };

    if !(tuning.starting_health > 0.0 && tuning.starting_health.is_finite()) {
        return invalid("starting_health must be positive");
    }
    if !(tuning.starting_gold >= 0.0 && tuning.starting_gold.is_finite()) {
        return invalid("starting_gold must be non-negative");
    }
    if tuning.max_frame_time_ms == 0 {
        return invalid("max_frame_time_ms must be positive");
    }
    if !(tuning.spawn_interval_floor > 0.0 && tuning.spawn_interval_floor.is_finite()) {
        return invalid("spawn_interval_floor must be positive");
    }
    if !(tuning.spawn_interval_start >= tuning.spawn_interval_floor
        && tuning.spawn_interval_start.is_finite())
    {
        return invalid("spawn_interval_start must not be below spawn_interval_floor");
    }
    if !(0.0..=1.0).contains(&tuning.power_up_chance) {
        return invalid("power_up_chance must lie in 0..=1");
    }
    if tuning.power_up_choices == 0 {
        return invalid("power_up_choices must be positive");
    }
    if !(tuning.projectile_max_distance > 0.0 && tuning.projectile_max_distance.is_finite()) {
        return invalid("projectile_max_distance must be positive");
    }
    if !(tuning.crit_multiplier >= 1.0 && tuning.crit_multiplier.is_finite()) {
        return invalid("crit_multiplier must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWERS: &str = r#"{"towers": [
        {"id": "basic", "name": "Basic", "cost": 100, "range": 100, "damage": 10, "attackSpeed": 1}
    ]}"#;
    const ENEMIES: &str = r#"{"enemies": [
        {"id": "grunt", "health": 50, "speed": 40, "bounty": 10}
    ]}"#;
    const POWER_UPS: &str = r#"{"powerups": [
        {"id": "gold_multiplier", "name": "Midas", "value": 1.5, "duration": 30}
    ]}"#;

    #[test]
    fn valid_sources_build_a_world() {
        let bootstrap =
            Bootstrap::from_sources(TOWERS, ENEMIES, POWER_UPS, None).expect("valid sources");
        assert_eq!(bootstrap.tuning(), &SimulationTuning::default());

        let world = bootstrap.clone().into_world();
        assert_eq!(bootstrap.welcome_banner(&world), "Welcome to Path Defence.");
        assert_eq!(query::catalog(&world), bootstrap.catalog());
    }

    #[test]
    fn tuning_overrides_apply() {
        let bootstrap = Bootstrap::from_sources(
            TOWERS,
            ENEMIES,
            POWER_UPS,
            Some("starting_gold = 900.0\nmax_upgrade_level = 5\n"),
        )
        .expect("valid sources")
        .with_seed(11);

        assert_eq!(bootstrap.tuning().starting_gold, 900.0);
        assert_eq!(bootstrap.tuning().max_upgrade_level, Some(5));
        assert_eq!(bootstrap.tuning().rng_seed, 11);
        assert_eq!(bootstrap.tuning().power_up_choices, 3);
    }

    #[test]
    fn empty_collection_is_rejected() {
        let error = Bootstrap::from_sources(TOWERS, r#"{"enemies": []}"#, POWER_UPS, None)
            .expect_err("no enemies");
        assert!(matches!(error, ConfigError::Empty { collection: "enemy" }));
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let towers = r#"{"towers": [
            {"id": "basic", "name": "A", "cost": 100, "range": 100, "damage": 10, "attackSpeed": 1},
            {"id": "basic", "name": "B", "cost": 120, "range": 90, "damage": 12, "attackSpeed": 1}
        ]}"#;
        let error =
            Bootstrap::from_sources(towers, ENEMIES, POWER_UPS, None).expect_err("duplicate");
        assert_eq!(error.to_string(), "duplicate tower definition `basic`");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let enemies = r#"{"enemies": [{"id": "ghost", "health": 0, "speed": 40, "bounty": 10}]}"#;
        let error =
            Bootstrap::from_sources(TOWERS, enemies, POWER_UPS, None).expect_err("zero health");
        assert!(matches!(
            error,
            ConfigError::InvalidDefinition { collection: "enemy", ref id, .. } if id == "ghost"
        ));

        let error = Bootstrap::from_sources(
            TOWERS,
            ENEMIES,
            POWER_UPS,
            Some("spawn_interval_start = 0.1\nspawn_interval_floor = 0.5\n"),
        )
        .expect_err("start below floor");
        assert!(matches!(error, ConfigError::InvalidTuning(_)));
    }

    #[test]
    fn malformed_sources_report_the_file() {
        let error = Bootstrap::from_sources("{", ENEMIES, POWER_UPS, None).expect_err("bad json");
        assert_eq!(error.to_string(), "failed to parse towers.json");

        let error = Bootstrap::from_sources(TOWERS, ENEMIES, POWER_UPS, Some("starting_gold = ["))
            .expect_err("bad toml");
        assert_eq!(error.to_string(), "failed to parse tuning.toml");

        let unknown = r#"{"powerups": [{"id": "teleport", "name": "?"}]}"#;
        assert!(matches!(
            Bootstrap::from_sources(TOWERS, ENEMIES, unknown, None),
            Err(ConfigError::Json { .. })
        ));
    }
}
