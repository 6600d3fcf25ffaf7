//! Static balance tables loaded once before a simulation starts.
//!
//! The tables are immutable during a run. Validation is fatal: a simulation
//! must never start with an incomplete enemy, tower, or rarity table.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Element, EnemyKind, Position, Rarity, Wave};

/// Errors that make a configuration table unusable.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// An enemy kind is missing from the table.
    #[error("enemy table is missing stats for {0:?}")]
    MissingEnemyKind(EnemyKind),
    /// A tower element is missing from the table.
    #[error("tower table is missing stats for {0:?}")]
    MissingTowerElement(Element),
    /// A rarity tier is missing from the table.
    #[error("rarity table is missing a multiplier for {0:?}")]
    MissingRarity(Rarity),
    /// A tower was configured with a zero fire rate.
    #[error("tower {0:?} has a zero fire rate")]
    ZeroFireRate(Element),
    /// The shared wave scaling factor is not a positive finite number.
    #[error("wave scaling factor {0} is not positive and finite")]
    InvalidScaling(f64),
    /// The run was configured with no waves at all.
    #[error("total wave count must be at least one")]
    NoWaves,
    /// Waves were configured to spawn nothing.
    #[error("base enemy quota must be at least one")]
    EmptyWaveQuota,
    /// No non-boss enemy kind carries a positive spawn weight.
    #[error("spawn weights select no enemy kind")]
    NoSpawnableEnemies,
}

/// Balance stats for a single enemy kind before wave scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Health at wave zero, before exponential scaling.
    pub base_health: f64,
    /// Movement speed in world units per second.
    pub base_speed: f32,
    /// Reward at wave one; scales linearly with the wave number.
    pub base_reward: u32,
    /// Relative weight in the wave director's spawn mix.
    pub spawn_weight: u32,
}

/// Balance stats for a single tower element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Damage before upgrade, level, and rarity multipliers.
    pub base_damage: f64,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum milliseconds between consecutive shots. Must be positive.
    pub fire_rate_ms: u64,
    /// Coin cost of placing the tower.
    pub cost: u32,
}

impl TowerStats {
    /// Fire-rate gate expressed as a [`Duration`].
    #[must_use]
    pub const fn fire_rate(&self) -> Duration {
        Duration::from_millis(self.fire_rate_ms)
    }
}

/// Wave pacing and the shared exponential difficulty constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveScaling {
    /// Exponential base shared by wave difficulty and enemy health scaling.
    pub scaling: f64,
    /// Enemy quota of the first wave.
    pub base_quota: u32,
    /// Additional enemies per subsequent wave.
    pub quota_per_wave: u32,
    /// Number of waves a run lasts.
    pub total_waves: u32,
    /// Fixed set of wave numbers that spawn a boss.
    pub boss_waves: Vec<u32>,
    /// Milliseconds between consecutive spawns within a wave.
    pub spawn_interval_ms: u64,
}

impl WaveScaling {
    /// Shared exponential difficulty scalar: `scaling^(wave / 3)`.
    ///
    /// Enemy health scaling uses this same function so the two never drift.
    #[must_use]
    pub fn difficulty_scalar(&self, wave: u32) -> f64 {
        self.scaling.powf(f64::from(wave) / 3.0)
    }

    /// Reports whether the wave number belongs to the configured boss set.
    #[must_use]
    pub fn is_boss_wave(&self, wave: u32) -> bool {
        self.boss_waves.contains(&wave)
    }

    /// Total number of enemies spawned by the given wave.
    #[must_use]
    pub fn enemy_quota(&self, wave: u32) -> u32 {
        self.base_quota
            .saturating_add(self.quota_per_wave.saturating_mul(wave.saturating_sub(1)))
    }

    /// Builds the immutable descriptor for the given wave number.
    #[must_use]
    pub fn wave(&self, number: u32) -> Wave {
        Wave {
            number,
            enemy_quota: self.enemy_quota(number),
            difficulty_scalar: self.difficulty_scalar(number),
            is_boss_wave: self.is_boss_wave(number),
        }
    }
}

/// Geometric constraints on tower placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRules {
    /// Minimum distance between two tower centres.
    pub min_tower_spacing: f32,
    /// Minimum distance between a tower centre and the enemy path.
    pub path_clearance: f32,
    /// Lower-left corner of the playable area.
    pub min_bound: Position,
    /// Upper-right corner of the playable area.
    pub max_bound: Position,
}

impl PlacementRules {
    /// Reports whether the position lies inside the playable bounds.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x() >= self.min_bound.x()
            && position.x() <= self.max_bound.x()
            && position.y() >= self.min_bound.y()
            && position.y() <= self.max_bound.y()
    }
}

/// Complete static configuration of a combat run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Per-kind enemy stats. Must cover every [`EnemyKind`].
    pub enemies: BTreeMap<EnemyKind, EnemyStats>,
    /// Per-element tower stats. Must cover every [`Element`].
    pub towers: BTreeMap<Element, TowerStats>,
    /// Per-rarity damage multipliers. Must cover every [`Rarity`].
    pub rarities: BTreeMap<Rarity, f64>,
    /// Wave pacing and shared scaling constants.
    pub waves: WaveScaling,
    /// Tower placement constraints.
    pub placement: PlacementRules,
    /// Lives the player starts with.
    pub starting_lives: u32,
    /// Coins the player starts with.
    pub starting_coins: u32,
    /// Upgrade cost at upgrade level one; scales linearly with the level.
    pub upgrade_cost_base: u32,
}

impl GameConfig {
    /// Verifies the tables are complete and internally consistent.
    ///
    /// Unknown or missing kinds are fatal at load time; the simulation must
    /// not start with an incomplete table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in EnemyKind::ALL {
            if !self.enemies.contains_key(&kind) {
                return Err(ConfigError::MissingEnemyKind(kind));
            }
        }
        for element in Element::ALL {
            let Some(stats) = self.towers.get(&element) else {
                return Err(ConfigError::MissingTowerElement(element));
            };
            if stats.fire_rate_ms == 0 {
                return Err(ConfigError::ZeroFireRate(element));
            }
        }
        for rarity in Rarity::ALL {
            if !self.rarities.contains_key(&rarity) {
                return Err(ConfigError::MissingRarity(rarity));
            }
        }
        if !self.waves.scaling.is_finite() || self.waves.scaling <= 0.0 {
            return Err(ConfigError::InvalidScaling(self.waves.scaling));
        }
        if self.waves.total_waves == 0 {
            return Err(ConfigError::NoWaves);
        }
        if self.waves.base_quota == 0 {
            return Err(ConfigError::EmptyWaveQuota);
        }
        let spawnable = self
            .enemies
            .iter()
            .any(|(kind, stats)| *kind != EnemyKind::Boss && stats.spawn_weight > 0);
        if !spawnable {
            return Err(ConfigError::NoSpawnableEnemies);
        }
        Ok(())
    }

    /// Stats for the provided enemy kind, if configured.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> Option<&EnemyStats> {
        self.enemies.get(&kind)
    }

    /// Stats for the provided tower element, if configured.
    #[must_use]
    pub fn tower(&self, element: Element) -> Option<&TowerStats> {
        self.towers.get(&element)
    }

    /// Damage multiplier for the provided rarity, if configured.
    #[must_use]
    pub fn rarity_multiplier(&self, rarity: Rarity) -> Option<f64> {
        self.rarities.get(&rarity).copied()
    }

    /// Coin cost of upgrading from the provided upgrade level.
    #[must_use]
    pub fn upgrade_cost(&self, upgrade_level: u8) -> u32 {
        self.upgrade_cost_base
            .saturating_mul(u32::from(upgrade_level))
    }

    /// Built-in balance table used when no external table is supplied.
    #[must_use]
    pub fn default_table() -> Self {
        let mut enemies = BTreeMap::new();
        let _ = enemies.insert(
            EnemyKind::Scout,
            EnemyStats {
                base_health: 60.0,
                base_speed: 60.0,
                base_reward: 4,
                spawn_weight: 3,
            },
        );
        let _ = enemies.insert(
            EnemyKind::Grunt,
            EnemyStats {
                base_health: 100.0,
                base_speed: 40.0,
                base_reward: 6,
                spawn_weight: 4,
            },
        );
        let _ = enemies.insert(
            EnemyKind::Brute,
            EnemyStats {
                base_health: 220.0,
                base_speed: 25.0,
                base_reward: 10,
                spawn_weight: 2,
            },
        );
        let _ = enemies.insert(
            EnemyKind::Boss,
            EnemyStats {
                base_health: 1500.0,
                base_speed: 18.0,
                base_reward: 100,
                spawn_weight: 0,
            },
        );

        let mut towers = BTreeMap::new();
        let _ = towers.insert(
            Element::Fire,
            TowerStats {
                base_damage: 12.0,
                range: 110.0,
                fire_rate_ms: 800,
                cost: 60,
            },
        );
        let _ = towers.insert(
            Element::Ice,
            TowerStats {
                base_damage: 8.0,
                range: 100.0,
                fire_rate_ms: 700,
                cost: 50,
            },
        );
        let _ = towers.insert(
            Element::Electric,
            TowerStats {
                base_damage: 10.0,
                range: 120.0,
                fire_rate_ms: 900,
                cost: 70,
            },
        );
        let _ = towers.insert(
            Element::Poison,
            TowerStats {
                base_damage: 9.0,
                range: 105.0,
                fire_rate_ms: 750,
                cost: 55,
            },
        );
        let _ = towers.insert(
            Element::Cosmic,
            TowerStats {
                base_damage: 15.0,
                range: 130.0,
                fire_rate_ms: 1200,
                cost: 90,
            },
        );

        let mut rarities = BTreeMap::new();
        let _ = rarities.insert(Rarity::Common, 1.0);
        let _ = rarities.insert(Rarity::Uncommon, 1.15);
        let _ = rarities.insert(Rarity::Rare, 1.35);
        let _ = rarities.insert(Rarity::Epic, 1.6);
        let _ = rarities.insert(Rarity::Legendary, 2.0);

        Self {
            enemies,
            towers,
            rarities,
            waves: WaveScaling {
                scaling: 1.25,
                base_quota: 6,
                quota_per_wave: 2,
                total_waves: 20,
                boss_waves: vec![5, 10, 15, 20],
                spawn_interval_ms: 700,
            },
            placement: PlacementRules {
                min_tower_spacing: 40.0,
                path_clearance: 28.0,
                min_bound: Position::new(0.0, 0.0),
                max_bound: Position::new(800.0, 600.0),
            },
            starting_lives: 20,
            starting_coins: 150,
            upgrade_cost_base: 40,
        }
    }
}
