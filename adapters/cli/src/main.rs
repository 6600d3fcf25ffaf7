#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter for Gecko Defence combat runs.
//!
//! Runs a seeded simulation to its terminal event with a scripted
//! auto-placement policy, printing the event stream and a final summary.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gecko_defence_core::{Element, GameConfig, GeckoTraits, Position, Rarity, TowerId};
use gecko_defence_simulation::CombatSimulation;

/// Command-line arguments for a headless combat run.
#[derive(Debug, Parser)]
#[command(name = "gecko-defence", about = "Headless Gecko Defence combat runs")]
struct Args {
    /// Number of waves to run; defaults to the configured wave count.
    #[arg(long)]
    waves: Option<u32>,

    /// Seed driving wave composition.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Logical tick length in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 100)]
    dt_ms: u64,

    /// Path to a TOML balance table; the built-in table is used otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print only the final summary.
    #[arg(long)]
    quiet: bool,
}

/// Demo path the enemies travel along, an S through the playable area.
fn waypoints() -> Vec<Position> {
    vec![
        Position::new(0.0, 120.0),
        Position::new(620.0, 120.0),
        Position::new(620.0, 320.0),
        Position::new(160.0, 320.0),
        Position::new(160.0, 520.0),
        Position::new(800.0, 520.0),
    ]
}

/// Scripted placement spots hugging the demo path, cycled through as coins
/// allow. Elements rotate so every special sees play.
const BUILD_ORDER: [(f32, f32, Element, Rarity); 8] = [
    (300.0, 180.0, Element::Fire, Rarity::Common),
    (560.0, 220.0, Element::Ice, Rarity::Common),
    (400.0, 380.0, Element::Electric, Rarity::Uncommon),
    (220.0, 420.0, Element::Poison, Rarity::Common),
    (520.0, 460.0, Element::Cosmic, Rarity::Rare),
    (120.0, 180.0, Element::Fire, Rarity::Uncommon),
    (700.0, 460.0, Element::Electric, Rarity::Common),
    (60.0, 420.0, Element::Ice, Rarity::Rare),
];

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse balance table toml contents")?
        }
        None => GameConfig::default_table(),
    };
    if let Some(waves) = args.waves {
        config.waves.total_waves = waves;
    }
    Ok(config)
}

/// Greedy build policy: place the next scripted tower whenever the balance
/// covers it, then funnel spare coins into upgrading the oldest tower.
struct Autoplay {
    next_build: usize,
    placed: Vec<TowerId>,
}

impl Autoplay {
    fn new() -> Self {
        Self {
            next_build: 0,
            placed: Vec::new(),
        }
    }

    fn act(&mut self, simulation: &mut CombatSimulation, config: &GameConfig) {
        while let Some(&(x, y, element, rarity)) = BUILD_ORDER.get(self.next_build) {
            let cost = config.tower(element).map_or(u32::MAX, |stats| stats.cost);
            if simulation.game_state().coins() < cost {
                break;
            }
            match simulation.place_tower(Position::new(x, y), GeckoTraits::new(element, rarity)) {
                Ok(tower) => self.placed.push(tower),
                // A rejected spot is skipped for good; the rejection event
                // still shows up in the stream.
                Err(_) => {}
            }
            self.next_build += 1;
        }

        if self.next_build >= BUILD_ORDER.len() {
            for tower in &self.placed {
                if simulation.upgrade_tower(*tower).is_err() {
                    break;
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.dt_ms == 0 {
        bail!("tick length must be positive");
    }
    let config = load_config(&args)?;
    config.validate().context("balance table failed validation")?;

    let dt = Duration::from_millis(args.dt_ms);
    let mut simulation = CombatSimulation::new(config.clone(), waypoints(), args.seed)
        .context("failed to construct simulation")?;
    let mut autoplay = Autoplay::new();

    // Generous ceiling so a stalled run fails loudly instead of spinning.
    let max_ticks = 10_000_000u64 / args.dt_ms;
    let mut ticks = 0u64;
    while !simulation.is_terminal() {
        autoplay.act(&mut simulation, &config);
        let events = simulation.tick(dt);
        if !args.quiet {
            let clock = simulation.clock().as_secs_f64();
            for event in &events {
                println!("[{clock:>9.3}s] {event:?}");
            }
        }
        ticks += 1;
        if ticks > max_ticks {
            bail!("simulation did not terminate within {max_ticks} ticks");
        }
    }

    let state = simulation.game_state();
    println!("run complete after {:.3}s simulated", simulation.clock().as_secs_f64());
    println!(
        "wave {} | score {} | lives {} | coins {}",
        state.current_wave(),
        state.score(),
        state.lives(),
        state.coins()
    );
    Ok(())
}
