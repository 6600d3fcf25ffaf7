#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Gecko Defence combat core.
//!
//! The world owns the path, the enemy and tower arenas, and the game state
//! aggregate. All mutation flows through [`apply`], which executes
//! [`Command`] values deterministically and broadcasts [`Event`] values.
//! Goal breaches and kills are tallied while commands execute and folded
//! into the [`GameState`] only by [`Command::Reconcile`], which also sweeps
//! dead entities out of the arenas between ticks.

use std::time::Duration;

use gecko_defence_core::{
    Attack, AttackEffect, Command, ConfigError, EffectKind, EnemyId, Event, GameConfig, GameState,
    PlacementError, Position, StatusEffect, TowerId, UpgradeError,
};
use gecko_defence_system_status_effects::{self as status, DotSlice};

mod arena;
mod enemy;
pub mod path;
mod towers;

pub use path::{PathError, PathModel};

use arena::Arena;
use enemy::Enemy;
use towers::Tower;

/// Authoritative Gecko Defence world.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    path: PathModel,
    enemies: Arena<Enemy>,
    towers: Arena<Tower>,
    state: GameState,
    clock: Duration,
    pending: PendingTallies,
    dot_scratch: Vec<DotSlice>,
    expired_scratch: Vec<EffectKind>,
}

#[derive(Debug, Default)]
struct PendingTallies {
    goal_breaches: u32,
    kill_rewards: Vec<u32>,
}

impl World {
    /// Creates a world from a validated configuration and a path.
    ///
    /// Configuration errors are fatal: the simulation must not start with an
    /// incomplete table.
    pub fn new(config: GameConfig, path: PathModel) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(config.starting_lives, config.starting_coins);
        Ok(Self {
            config,
            path,
            enemies: Arena::new(),
            towers: Arena::new(),
            state,
            clock: Duration::ZERO,
            pending: PendingTallies::default(),
            dot_scratch: Vec::new(),
            expired_scratch: Vec::new(),
        })
    }

    fn validate_placement(&self, position: Position, cost: u32) -> Result<(), PlacementError> {
        if self.path.is_near(position, self.config.placement.path_clearance) {
            return Err(PlacementError::OnPath);
        }
        let spacing = self.config.placement.min_tower_spacing;
        if self
            .towers
            .iter()
            .any(|tower| tower.position().distance(position) < spacing)
        {
            return Err(PlacementError::TooCloseToTower);
        }
        if !self.config.placement.contains(position) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.state.coins() < cost {
            return Err(PlacementError::InsufficientCoins);
        }
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginWave { wave } => {
            world.state.set_wave(wave.number);
            out_events.push(Event::WaveStarted { wave });
        }
        Command::SpawnEnemy { kind, wave } => {
            let stats = *world
                .config
                .enemy(kind)
                .expect("config validated at construction");
            let scalar = world.config.waves.difficulty_scalar(wave);
            let raw = world.enemies.insert_with(|raw| {
                Enemy::new(
                    EnemyId::new(raw),
                    kind,
                    wave,
                    stats.base_health,
                    stats.base_speed,
                    stats.base_reward,
                    scalar,
                )
            });
            out_events.push(Event::EnemySpawned {
                enemy: EnemyId::new(raw),
                kind,
                wave,
            });
        }
        Command::Advance { dt } => advance(world, dt, out_events),
        Command::ExecuteAttack { attack } => execute_attack(world, attack, out_events),
        Command::PlaceTower { position, traits } => {
            let stats = *world
                .config
                .tower(traits.element)
                .expect("config validated at construction");
            let rarity_multiplier = world
                .config
                .rarity_multiplier(traits.rarity)
                .expect("config validated at construction");

            if let Err(reason) = world.validate_placement(position, stats.cost) {
                out_events.push(Event::TowerPlacementRejected { position, reason });
                return;
            }

            let debited = world.state.debit_coins(stats.cost);
            debug_assert!(debited, "placement validated the balance");
            let raw = world.towers.insert_with(|raw| {
                Tower::new(
                    TowerId::new(raw),
                    traits.element,
                    position,
                    stats.base_damage,
                    stats.range,
                    stats.fire_rate(),
                    rarity_multiplier,
                    stats.cost,
                )
            });
            out_events.push(Event::TowerPlaced {
                tower: TowerId::new(raw),
                element: traits.element,
                position,
            });
        }
        Command::UpgradeTower { tower } => {
            let Some(existing) = world.towers.get(tower.get()) else {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::UnknownTower,
                });
                return;
            };
            if existing.at_upgrade_cap() {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::MaxUpgradeLevel,
                });
                return;
            }
            let cost = world.config.upgrade_cost(existing.upgrade_level());
            if !world.state.debit_coins(cost) {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::InsufficientCoins,
                });
                return;
            }
            if let Some(existing) = world.towers.get_mut(tower.get()) {
                let upgrade_level = existing.upgrade();
                out_events.push(Event::TowerUpgraded {
                    tower,
                    upgrade_level,
                });
            }
        }
        Command::SellTower { tower } => {
            let Some(existing) = world.towers.get(tower.get()) else {
                return;
            };
            let refund = existing.sell_refund();
            world.state.credit_coins(refund);
            world.towers.remove(tower.get());
            out_events.push(Event::TowerSold { tower, refund });
        }
        Command::Reconcile => {
            for _ in 0..world.pending.goal_breaches {
                world.state.lose_life();
            }
            world.pending.goal_breaches = 0;
            for reward in world.pending.kill_rewards.drain(..) {
                world.state.credit_kill(reward);
            }
            world.enemies.sweep(Enemy::is_terminal);
            world.towers.sweep(|_| false);
        }
    }
}

/// Advances the clock and every enemy, collecting goal breaches and
/// damage-over-time kills. Movement and effect expiry resolve against the
/// window start so results are independent of enemy iteration order.
fn advance(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    let start = world.clock;
    world.clock = world.clock.saturating_add(dt);

    let World {
        enemies,
        towers,
        path,
        pending,
        dot_scratch,
        expired_scratch,
        ..
    } = world;
    let path_length = path.length();

    let mut kill_credits: Vec<(Option<TowerId>, u32)> = Vec::new();

    for enemy in enemies.iter_mut() {
        if enemy.is_terminal() {
            continue;
        }

        expired_scratch.clear();
        enemy.expire_effects(start, expired_scratch);

        if enemy.advance(dt, start, path_length) {
            pending.goal_breaches += 1;
            out_events.push(Event::EnemyReachedGoal { enemy: enemy.id() });
            continue;
        }

        dot_scratch.clear();
        status::accrue_damage(enemy.effects(), start, dt, dot_scratch);
        for slice in dot_scratch.iter() {
            if enemy.take_damage(slice.damage) {
                let reward = enemy.reward();
                pending.kill_rewards.push(reward);
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id(),
                    reward,
                    by: slice.source,
                });
                kill_credits.push((slice.source, reward));
                break;
            }
        }
    }

    credit_kills(towers, &kill_credits, out_events);
}

/// Executes a resolved attack. The target is re-validated immediately before
/// damage lands; an attack against a dead or out-of-range target is a benign
/// race and is silently dropped, with no damage and no effect applied.
fn execute_attack(world: &mut World, attack: Attack, out_events: &mut Vec<Event>) {
    let now = world.clock;

    let Some(tower) = world.towers.get(attack.tower.get()) else {
        return;
    };
    if !tower.ready_in(now).is_zero() {
        return;
    }
    let tower_position = tower.position();
    let range_squared = tower.range() * tower.range();

    let Some(primary) = world.enemies.get(attack.primary.get()) else {
        return;
    };
    if primary.is_terminal() {
        return;
    }
    let primary_position = world.path.point_at(primary.progress());
    if tower_position.distance_squared(primary_position) > range_squared {
        return;
    }

    if let Some(tower) = world.towers.get_mut(attack.tower.get()) {
        tower.record_shot(now);
    }
    out_events.push(Event::TowerFired {
        tower: attack.tower,
        target: attack.primary,
        damage: attack.damage,
    });

    let mut kill_credits: Vec<(Option<TowerId>, u32)> = Vec::new();

    if let Some(primary) = world.enemies.get_mut(attack.primary.get()) {
        if primary.take_damage(attack.damage) {
            let reward = primary.reward();
            world.pending.kill_rewards.push(reward);
            out_events.push(Event::EnemyKilled {
                enemy: attack.primary,
                reward,
                by: Some(attack.tower),
            });
            kill_credits.push((Some(attack.tower), reward));
        } else if let Some(effect) = attack.effect {
            primary.apply_effect(stamp_effect(effect, now, attack.tower));
        }
    }

    for hit in &attack.splash {
        let Some(enemy) = world.enemies.get_mut(hit.enemy.get()) else {
            continue;
        };
        if enemy.take_damage(hit.damage) {
            let reward = enemy.reward();
            world.pending.kill_rewards.push(reward);
            out_events.push(Event::EnemyKilled {
                enemy: hit.enemy,
                reward,
                by: Some(attack.tower),
            });
            kill_credits.push((Some(attack.tower), reward));
        }
    }

    credit_kills(&mut world.towers, &kill_credits, out_events);
}

fn stamp_effect(effect: AttackEffect, now: Duration, tower: TowerId) -> StatusEffect {
    let by = Some(tower);
    match effect.kind {
        EffectKind::Burn => StatusEffect::burn(effect.tick_damage, effect.duration, now, by),
        EffectKind::Slow => StatusEffect::slow(effect.intensity, effect.duration, now, by),
        EffectKind::Poison => StatusEffect::poison(effect.tick_damage, effect.duration, now, by),
        EffectKind::Freeze => StatusEffect::freeze(effect.duration, now, by),
    }
}

fn credit_kills(
    towers: &mut Arena<Tower>,
    credits: &[(Option<TowerId>, u32)],
    out_events: &mut Vec<Event>,
) {
    for (source, reward) in credits {
        let Some(tower_id) = source else {
            continue;
        };
        if let Some(tower) = towers.get_mut(tower_id.get()) {
            if let Some(level) = tower.credit_kill(*reward) {
                out_events.push(Event::TowerLeveledUp {
                    tower: *tower_id,
                    level,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use gecko_defence_core::{
        EnemyView, GameState, TowerCooldownSnapshot, TowerCooldownView, TowerView,
    };

    use super::{PathModel, World};

    /// Captures a read-only view of all living enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .filter(|enemy| !enemy.is_terminal())
            .map(|enemy| enemy.snapshot(&world.path))
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of all placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures the fire-rate gate state of every tower at the current clock.
    #[must_use]
    pub fn cooldown_view(world: &World) -> TowerCooldownView {
        let snapshots = world
            .towers
            .iter()
            .map(|tower| TowerCooldownSnapshot {
                tower: tower.id(),
                ready_in: tower.ready_in(world.clock),
            })
            .collect();
        TowerCooldownView::from_snapshots(snapshots)
    }

    /// Current lives, coins, score, and wave aggregate.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Read-only access to the path enemies travel along.
    #[must_use]
    pub fn path(world: &World) -> &PathModel {
        &world.path
    }

    /// Number of enemies that are neither dead nor through the goal.
    #[must_use]
    pub fn living_enemies(world: &World) -> usize {
        world
            .enemies
            .iter()
            .filter(|enemy| !enemy.is_terminal())
            .count()
    }

    /// Simulation clock accumulated by advance commands.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}
