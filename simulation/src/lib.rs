#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration for a single combat run.
//!
//! [`CombatSimulation`] wires the wave director, the pure combat systems,
//! and the authoritative world into a fixed per-tick pipeline. Instances are
//! explicitly constructed and owned; there is no global state, so multiple
//! simulations can run side by side. Each tick returns the events it
//! produced, which is the complete integration surface for renderers and
//! analytics.

use std::time::Duration;

use gecko_defence_core::{
    Attack, Command, ConfigError, Event, GameConfig, GameState, GeckoTraits, PlacementError,
    Position, TowerId, TowerTarget, TowerView, UpgradeError,
};
use gecko_defence_system_tower_combat as tower_combat;
use gecko_defence_system_tower_targeting as tower_targeting;
use gecko_defence_system_wave_director::WaveDirector;
use gecko_defence_world::{apply, query, PathError, PathModel, World};
use thiserror::Error;

/// Errors that prevent a simulation from being constructed.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The balance tables are incomplete or inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The waypoint list does not describe a usable path.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// A single owned combat run.
#[derive(Debug)]
pub struct CombatSimulation {
    world: World,
    director: WaveDirector,
    paused: bool,
    terminal: bool,
    pending: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    attacks: Vec<Attack>,
}

impl CombatSimulation {
    /// Builds a run from a configuration, the path waypoints, and the seed
    /// driving wave composition. Validation failures are fatal.
    pub fn new(
        config: GameConfig,
        waypoints: Vec<Position>,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        let path = PathModel::new(waypoints)?;
        let director = WaveDirector::new(&config, seed);
        let world = World::new(config, path)?;
        Ok(Self {
            world,
            director,
            paused: false,
            terminal: false,
            pending: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
            attacks: Vec::new(),
        })
    }

    /// Requests a tower placement. The confirmation or rejection event also
    /// appears in the next tick's event batch.
    pub fn place_tower(
        &mut self,
        position: Position,
        traits: GeckoTraits,
    ) -> Result<TowerId, PlacementError> {
        let start = self.pending.len();
        apply(
            &mut self.world,
            Command::PlaceTower { position, traits },
            &mut self.pending,
        );
        match self.pending.get(start) {
            Some(Event::TowerPlaced { tower, .. }) => Ok(*tower),
            Some(Event::TowerPlacementRejected { reason, .. }) => Err(*reason),
            _ => unreachable!("placement emits exactly one event"),
        }
    }

    /// Requests a player-purchased upgrade of the given tower.
    pub fn upgrade_tower(&mut self, tower: TowerId) -> Result<(), UpgradeError> {
        let start = self.pending.len();
        apply(
            &mut self.world,
            Command::UpgradeTower { tower },
            &mut self.pending,
        );
        match self.pending.get(start) {
            Some(Event::TowerUpgraded { .. }) => Ok(()),
            Some(Event::TowerUpgradeRejected { reason, .. }) => Err(*reason),
            _ => unreachable!("upgrade emits exactly one event"),
        }
    }

    /// Sells the given tower, returning the refund. `None` when no such
    /// tower exists.
    pub fn sell_tower(&mut self, tower: TowerId) -> Option<u32> {
        let start = self.pending.len();
        apply(
            &mut self.world,
            Command::SellTower { tower },
            &mut self.pending,
        );
        match self.pending.get(start) {
            Some(Event::TowerSold { refund, .. }) => Some(*refund),
            _ => None,
        }
    }

    /// Advances the run by one logical tick and returns the events produced.
    ///
    /// The per-tick order is fixed: director spawns, enemies advance (goal
    /// breaches and damage-over-time resolve), towers target and fire against
    /// the post-advance snapshot, attacks execute, tallies reconcile into the
    /// game state, and finally the terminal condition is checked. Running out
    /// of lives takes precedence over clearing the last wave. After the
    /// terminal event the loop is inert.
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = std::mem::take(&mut self.pending);
        if self.paused || self.terminal {
            return events;
        }

        self.commands.clear();
        let living = query::living_enemies(&self.world);
        self.director.handle(dt, living, &mut self.commands);
        for command in self.commands.drain(..) {
            apply(&mut self.world, command, &mut events);
        }

        apply(&mut self.world, Command::Advance { dt }, &mut events);

        let enemies = query::enemy_view(&self.world);
        let towers = query::tower_view(&self.world);
        let cooldowns = query::cooldown_view(&self.world);
        tower_targeting::handle(&towers, &cooldowns, &enemies, &mut self.targets);
        tower_combat::handle(
            &self.targets,
            &towers,
            &cooldowns,
            &enemies,
            &mut self.attacks,
        );
        for attack in self.attacks.drain(..) {
            apply(
                &mut self.world,
                Command::ExecuteAttack { attack },
                &mut events,
            );
        }

        apply(&mut self.world, Command::Reconcile, &mut events);

        let state = query::game_state(&self.world);
        if state.lives() == 0 {
            self.terminal = true;
            events.push(Event::GameOver {
                score: state.score(),
                wave: state.current_wave(),
            });
        } else if self.director.is_exhausted() && query::living_enemies(&self.world) == 0 {
            self.terminal = true;
            events.push(Event::Victory {
                score: state.score(),
                wave: state.current_wave(),
            });
        }
        events
    }

    /// Stops ticks from advancing anything until [`CombatSimulation::resume`].
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes ticking from the exact paused state.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Current lives, coins, score, and wave aggregate.
    #[must_use]
    pub fn game_state(&self) -> GameState {
        query::game_state(&self.world)
    }

    /// True once the run has emitted its terminal event.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Simulated time accumulated by ticks.
    #[must_use]
    pub fn clock(&self) -> Duration {
        query::clock(&self.world)
    }

    /// Snapshot view of all placed towers.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }
}
