#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gecko Defence combat engine.
//!
//! This crate defines the message surface that connects the authoritative
//! world, the pure combat systems, and outside adapters. Callers submit
//! [`Command`] values describing desired mutations, the world executes them
//! via its `apply` entry point, and broadcasts [`Event`] values that systems
//! and external consumers (renderer, analytics, notifications) react to
//! deterministically. Systems consume immutable snapshot views and respond
//! exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{ConfigError, EnemyStats, GameConfig, PlacementRules, TowerStats, WaveScaling};

/// Player-purchased upgrade cap for a single tower.
pub const MAX_UPGRADE_LEVEL: u8 = 5;

/// Experience required per level equals `level * LEVEL_XP_STEP`.
pub const LEVEL_XP_STEP: u32 = 100;

/// Score granted per coin of reward when an enemy dies.
pub const SCORE_PER_REWARD: u64 = 10;

/// Fraction of a fire tower's base damage dealt per second by its burn rider.
pub const BURN_DAMAGE_FRACTION: f64 = 0.20;

/// Lifetime of the burn effect applied by fire towers.
pub const BURN_DURATION: Duration = Duration::from_millis(3000);

/// Speed multiplier enforced by the slow effect applied by ice towers.
pub const SLOW_INTENSITY: f32 = 0.5;

/// Lifetime of the slow effect applied by ice towers.
pub const SLOW_DURATION: Duration = Duration::from_millis(2000);

/// Fraction of a poison tower's base damage dealt per second by its rider.
pub const POISON_DAMAGE_FRACTION: f64 = 0.10;

/// Lifetime of the poison effect applied by poison towers.
pub const POISON_DURATION: Duration = Duration::from_millis(5000);

/// Maximum number of secondary enemies struck by chain lightning.
pub const CHAIN_MAX_EXTRA_TARGETS: usize = 3;

/// Fraction of base damage dealt to each chain lightning target.
pub const CHAIN_DAMAGE_FRACTION: f64 = 0.50;

/// Delay between successive chain lightning arcs. Presentation pacing only;
/// the damage itself lands within the tick that fired the attack.
pub const CHAIN_STAGGER_MS: u32 = 100;

/// Fraction of base damage dealt to enemies caught in a cosmic burst.
pub const COSMIC_DAMAGE_FRACTION: f64 = 0.70;

/// Radius of the cosmic burst around the primary target, in world units.
pub const COSMIC_SPLASH_RADIUS: f32 = 80.0;

/// Unique identifier assigned to an enemy. Never reused within a run.
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

/// Unique identifier assigned to a tower. Never reused within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
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

/// Point in continuous world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from world-space coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to another position.
    #[must_use]
    pub fn distance_squared(&self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(&self, other: Position) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Linear interpolation toward another position by factor `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, other: Position, t: f32) -> Position {
        Position::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// Enemy archetypes recognised by the combat core.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EnemyKind {
    /// Fast, fragile runner.
    Scout,
    /// Baseline infantry enemy.
    Grunt,
    /// Slow, heavily armoured enemy.
    Brute,
    /// High-health, high-reward variant spawned on boss waves.
    Boss,
}

impl EnemyKind {
    /// Every enemy kind the configuration table must cover.
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Scout,
        EnemyKind::Grunt,
        EnemyKind::Brute,
        EnemyKind::Boss,
    ];
}

/// Elemental affinity of a tower, selecting its on-hit special.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Element {
    /// Applies a burn damage-over-time rider.
    Fire,
    /// Applies a slow rider.
    Ice,
    /// Chains lightning to nearby secondary targets.
    Electric,
    /// Applies a poison damage-over-time rider.
    Poison,
    /// Damages every enemy in a burst around the primary target.
    Cosmic,
}

impl Element {
    /// Every element the configuration table must cover.
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Ice,
        Element::Electric,
        Element::Poison,
        Element::Cosmic,
    ];
}

/// NFT rarity tiers that scale a tower's combat output.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Rarity {
    /// Baseline rarity with a neutral multiplier.
    Common,
    /// Slightly boosted multiplier.
    Uncommon,
    /// Moderately boosted multiplier.
    Rare,
    /// Strongly boosted multiplier.
    Epic,
    /// Highest multiplier tier.
    Legendary,
}

impl Rarity {
    /// Every rarity the configuration table must cover.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];
}

/// Combat-relevant traits extracted from a Gecko NFT at placement time.
///
/// The core never sees wallets, token ids, or marketplace data; this is the
/// complete parameterization a tower takes from its NFT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeckoTraits {
    /// Elemental affinity selecting the tower's on-hit special.
    pub element: Element,
    /// Rarity tier that scales the tower's damage output.
    pub rarity: Rarity,
}

impl GeckoTraits {
    /// Creates a new trait descriptor.
    #[must_use]
    pub const fn new(element: Element, rarity: Rarity) -> Self {
        Self { element, rarity }
    }
}

/// Kinds of timed status effects an enemy can carry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EffectKind {
    /// Damage over time from fire towers.
    Burn,
    /// Speed reduction from ice towers.
    Slow,
    /// Damage over time from poison towers.
    Poison,
    /// Complete stop; overrides any active slow.
    Freeze,
}

/// Timed modifier altering an enemy's speed or health over time.
///
/// At most one effect per kind is active on an entity; applying another of
/// the same kind replaces it and resets its clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusEffect {
    kind: EffectKind,
    intensity: f32,
    tick_damage: f64,
    duration: Duration,
    applied_at: Duration,
    applied_by: Option<TowerId>,
}

impl StatusEffect {
    /// Creates a burn effect dealing `tick_damage` health per second.
    #[must_use]
    pub const fn burn(
        tick_damage: f64,
        duration: Duration,
        applied_at: Duration,
        applied_by: Option<TowerId>,
    ) -> Self {
        Self {
            kind: EffectKind::Burn,
            intensity: 1.0,
            tick_damage,
            duration,
            applied_at,
            applied_by,
        }
    }

    /// Creates a slow effect multiplying speed by `intensity`.
    #[must_use]
    pub const fn slow(
        intensity: f32,
        duration: Duration,
        applied_at: Duration,
        applied_by: Option<TowerId>,
    ) -> Self {
        Self {
            kind: EffectKind::Slow,
            intensity,
            tick_damage: 0.0,
            duration,
            applied_at,
            applied_by,
        }
    }

    /// Creates a poison effect dealing `tick_damage` health per second.
    #[must_use]
    pub const fn poison(
        tick_damage: f64,
        duration: Duration,
        applied_at: Duration,
        applied_by: Option<TowerId>,
    ) -> Self {
        Self {
            kind: EffectKind::Poison,
            intensity: 1.0,
            tick_damage,
            duration,
            applied_at,
            applied_by,
        }
    }

    /// Creates a freeze effect that stops movement entirely.
    #[must_use]
    pub const fn freeze(
        duration: Duration,
        applied_at: Duration,
        applied_by: Option<TowerId>,
    ) -> Self {
        Self {
            kind: EffectKind::Freeze,
            intensity: 0.0,
            tick_damage: 0.0,
            duration,
            applied_at,
            applied_by,
        }
    }

    /// Kind of this effect.
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Speed multiplier contributed while the effect is active.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Damage dealt per second while the effect is active.
    #[must_use]
    pub const fn tick_damage(&self) -> f64 {
        self.tick_damage
    }

    /// Total lifetime of the effect.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Simulation clock value at which the effect was applied.
    #[must_use]
    pub const fn applied_at(&self) -> Duration {
        self.applied_at
    }

    /// Tower credited with kills caused by this effect, if any.
    #[must_use]
    pub const fn applied_by(&self) -> Option<TowerId> {
        self.applied_by
    }

    /// Clock value at which the effect stops contributing.
    #[must_use]
    pub fn expires_at(&self) -> Duration {
        self.applied_at.saturating_add(self.duration)
    }

    /// Reports whether the effect has expired at the provided clock value.
    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at()
    }
}

/// Wave descriptor derived deterministically from the wave number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// One-based wave number.
    pub number: u32,
    /// Total number of enemies the wave spawns.
    pub enemy_quota: u32,
    /// Exponential difficulty scalar shared with enemy health scaling.
    pub difficulty_scalar: f64,
    /// Indicates whether the wave belongs to the configured boss set.
    pub is_boss_wave: bool,
}

/// External-facing aggregate of the player's run.
///
/// Mutated only by the world's reconcile step; no system writes it directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    lives: u32,
    coins: u32,
    score: u64,
    current_wave: u32,
}

impl GameState {
    /// Creates the starting state for a run.
    #[must_use]
    pub const fn new(lives: u32, coins: u32) -> Self {
        Self {
            lives,
            coins,
            score: 0,
            current_wave: 0,
        }
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Spendable coin balance.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Wave currently in progress, zero before the first wave starts.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Removes one life, saturating at zero.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Credits a kill: coins grow by the reward, score by ten times it.
    pub fn credit_kill(&mut self, reward: u32) {
        self.coins = self.coins.saturating_add(reward);
        self.score = self
            .score
            .saturating_add(u64::from(reward).saturating_mul(SCORE_PER_REWARD));
    }

    /// Adds coins to the balance.
    pub fn credit_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Removes coins from the balance; returns false if the balance is short.
    pub fn debit_coins(&mut self, amount: u32) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }

    /// Records the wave currently in progress.
    pub fn set_wave(&mut self, wave: u32) {
        self.current_wave = wave;
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// World-space position along the path.
    pub position: Position,
    /// Normalised progress along the path in `[0, 1]`.
    pub path_progress: f32,
    /// Remaining path length to the goal in world units.
    pub distance_to_goal: f32,
    /// Current health.
    pub health: f64,
    /// Health the enemy spawned with.
    pub max_health: f64,
    /// Wave number the enemy belongs to.
    pub wave: u32,
    /// Coins granted when the enemy dies.
    pub reward: u32,
}

/// Read-only snapshot of all living enemies, ordered by id.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Elemental affinity of the tower.
    pub element: Element,
    /// Fixed world-space position.
    pub position: Position,
    /// Current targeting range in world units.
    pub range: f32,
    /// Base damage before multipliers, used to size elemental riders.
    pub base_damage: f64,
    /// Fully multiplied, floored damage dealt to the primary target.
    pub final_damage: f64,
    /// Player-purchased upgrade level.
    pub upgrade_level: u8,
    /// Experience-driven level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Enemies this tower has killed.
    pub kills: u32,
}

/// Read-only snapshot of all placed towers, ordered by id.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Cooldown state of a single tower at snapshot time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: TowerId,
    /// Remaining time until the fire-rate gate opens; zero means ready.
    pub ready_in: Duration,
}

/// Read-only view over tower cooldowns, sorted by tower id.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Looks up the cooldown for the provided tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerCooldownSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.tower)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Pairing of a tower with the enemy it should engage this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected by the targeting rules.
    pub target: EnemyId,
}

/// Elemental rider attached to an attack, stamped with the clock and the
/// firing tower when the world applies it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackEffect {
    /// Kind of status effect to apply.
    pub kind: EffectKind,
    /// Speed multiplier for slow effects; ignored otherwise.
    pub intensity: f32,
    /// Damage per second for burn and poison effects; zero otherwise.
    pub tick_damage: f64,
    /// Lifetime of the effect.
    pub duration: Duration,
}

/// Secondary hit carried by chain lightning or a cosmic burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplashHit {
    /// Enemy struck by the secondary hit.
    pub enemy: EnemyId,
    /// Damage dealt to the secondary target.
    pub damage: f64,
    /// Presentation delay for renderers; damage lands within the tick.
    pub stagger_ms: u32,
}

/// Complete description of a single tower firing, emitted by the combat
/// system and executed by the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Attack {
    /// Tower that fired.
    pub tower: TowerId,
    /// Primary target of the attack.
    pub primary: EnemyId,
    /// Damage dealt to the primary target.
    pub damage: f64,
    /// Elemental rider applied to the primary target on hit.
    pub effect: Option<AttackEffect>,
    /// Secondary hits resolved against other enemies.
    pub splash: Vec<SplashHit>,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Marks the wave as in progress and announces it.
    BeginWave {
        /// Descriptor of the wave that starts.
        wave: Wave,
    },
    /// Spawns an enemy of the given kind scaled to the given wave.
    SpawnEnemy {
        /// Archetype of the enemy to spawn.
        kind: EnemyKind,
        /// Wave number used for health and reward scaling.
        wave: u32,
    },
    /// Advances every enemy by the provided delta time.
    Advance {
        /// Simulated time elapsed since the previous advance.
        dt: Duration,
    },
    /// Executes a tower attack resolved by the combat system.
    ExecuteAttack {
        /// Attack to apply, re-validated against current liveness.
        attack: Attack,
    },
    /// Requests placement of a tower at the provided position.
    PlaceTower {
        /// Desired tower position in world space.
        position: Position,
        /// NFT traits parameterizing the tower.
        traits: GeckoTraits,
    },
    /// Requests a player-purchased upgrade of an existing tower.
    UpgradeTower {
        /// Tower targeted for upgrade.
        tower: TowerId,
    },
    /// Removes a tower, refunding part of its cost.
    SellTower {
        /// Tower targeted for sale.
        tower: TowerId,
    },
    /// Folds pending goal and kill tallies into the game state and sweeps
    /// dead entities out of the arenas.
    Reconcile,
}

/// Events broadcast by the world and the simulation after processing
/// commands. This is the complete integration surface for rendering,
/// analytics, and notification systems.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces the start of a wave.
    WaveStarted {
        /// Descriptor of the wave that began.
        wave: Wave,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: u32,
    },
    /// Reports that an enemy died. Fires exactly once per enemy, mutually
    /// exclusive with [`Event::EnemyReachedGoal`].
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Coins granted by the kill.
        reward: u32,
        /// Tower credited with the kill, if attributable.
        by: Option<TowerId>,
    },
    /// Reports that an enemy reached the goal. Fires exactly once per enemy,
    /// mutually exclusive with [`Event::EnemyKilled`].
    EnemyReachedGoal {
        /// Enemy that breached the goal.
        enemy: EnemyId,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Elemental affinity of the tower.
        element: Element,
        /// Position the tower occupies.
        position: Position,
    },
    /// Reports that a tower placement request was rejected. No state changed.
    TowerPlacementRejected {
        /// Position provided in the placement request.
        position: Position,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower fired at its primary target.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Primary target of the attack.
        target: EnemyId,
        /// Damage dealt to the primary target.
        damage: f64,
    },
    /// Reports that a tower gained an experience level.
    TowerLeveledUp {
        /// Tower that levelled.
        tower: TowerId,
        /// Level reached.
        level: u32,
    },
    /// Confirms a player-purchased tower upgrade.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Upgrade level reached.
        upgrade_level: u8,
    },
    /// Reports that an upgrade request was rejected. No state changed.
    TowerUpgradeRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Coins refunded to the player.
        refund: u32,
    },
    /// Terminal event: the player ran out of lives. Takes precedence over
    /// [`Event::Victory`] when both conditions hold in the same tick.
    GameOver {
        /// Final score.
        score: u64,
        /// Wave in progress when the run ended.
        wave: u32,
    },
    /// Terminal event: every wave was cleared with lives remaining.
    Victory {
        /// Final score.
        score: u64,
        /// Last wave cleared.
        wave: u32,
    },
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested position overlaps the enemy path.
    OnPath,
    /// The requested position violates the minimum tower spacing.
    TooCloseToTower,
    /// The requested position lies outside the playable bounds.
    OutOfBounds,
    /// The player cannot afford the tower.
    InsufficientCoins,
}

/// Reasons a tower upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    UnknownTower,
    /// The tower already sits at the upgrade cap.
    MaxUpgradeLevel,
    /// The player cannot afford the upgrade.
    InsufficientCoins,
}

#[cfg(test)]
mod tests {
    use super::{
        EnemyId, EnemySnapshot, EnemyKind, EnemyView, GameState, GeckoTraits, PlacementError,
        Position, Rarity, StatusEffect, UpgradeError,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(42));
    }

    #[test]
    fn gecko_traits_round_trip_through_bincode() {
        assert_round_trip(&GeckoTraits::new(super::Element::Electric, Rarity::Epic));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::TooCloseToTower);
    }

    #[test]
    fn upgrade_error_round_trips_through_bincode() {
        assert_round_trip(&UpgradeError::MaxUpgradeLevel);
    }

    #[test]
    fn position_distance_matches_expectation() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
        assert!((b.distance(a) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn enemy_view_orders_snapshots_by_id() {
        let snapshot = |id: u32| EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Grunt,
            position: Position::new(0.0, 0.0),
            path_progress: 0.0,
            distance_to_goal: 100.0,
            health: 10.0,
            max_health: 10.0,
            wave: 1,
            reward: 5,
        };
        let view = EnemyView::from_snapshots(vec![snapshot(9), snapshot(2), snapshot(5)]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn status_effect_expiry_boundary_is_inclusive() {
        let effect = StatusEffect::freeze(
            Duration::from_millis(500),
            Duration::from_millis(100),
            None,
        );
        assert!(!effect.is_expired(Duration::from_millis(599)));
        assert!(effect.is_expired(Duration::from_millis(600)));
    }

    #[test]
    fn game_state_kill_credit_scales_score() {
        let mut state = GameState::new(20, 100);
        state.credit_kill(7);
        assert_eq!(state.coins(), 107);
        assert_eq!(state.score(), 70);
    }

    #[test]
    fn game_state_debit_refuses_overdraft() {
        let mut state = GameState::new(20, 10);
        assert!(!state.debit_coins(11));
        assert_eq!(state.coins(), 10);
        assert!(state.debit_coins(10));
        assert_eq!(state.coins(), 0);
    }
}
