use std::time::Duration;

use gecko_defence_core::{Element, Event, GameConfig, GeckoTraits, Position, Rarity};
use gecko_defence_simulation::CombatSimulation;

const TICK: Duration = Duration::from_millis(100);

fn waypoints() -> Vec<Position> {
    vec![
        Position::new(0.0, 100.0),
        Position::new(600.0, 100.0),
        Position::new(600.0, 400.0),
    ]
}

fn config() -> GameConfig {
    let mut config = GameConfig::default_table();
    config.waves.total_waves = 2;
    config.waves.boss_waves = vec![2];
    config
}

/// Runs a fixed scripted session: two towers placed up front, then ticks
/// until the terminal event.
fn scripted_run(seed: u64) -> (Vec<Event>, u64, Duration) {
    let mut simulation =
        CombatSimulation::new(config(), waypoints(), seed).expect("valid simulation");

    let _ = simulation
        .place_tower(
            Position::new(300.0, 160.0),
            GeckoTraits::new(Element::Electric, Rarity::Epic),
        )
        .expect("first placement succeeds");
    let _ = simulation
        .place_tower(
            Position::new(540.0, 250.0),
            GeckoTraits::new(Element::Ice, Rarity::Common),
        )
        .expect("second placement succeeds");

    let mut log = Vec::new();
    for _ in 0..50_000 {
        log.extend(simulation.tick(TICK));
        if simulation.is_terminal() {
            return (log, simulation.game_state().score(), simulation.clock());
        }
    }
    panic!("simulation did not terminate");
}

#[test]
fn identical_seeds_replay_identical_runs() {
    let (log_a, score_a, clock_a) = scripted_run(777);
    let (log_b, score_b, clock_b) = scripted_run(777);

    assert_eq!(log_a, log_b);
    assert_eq!(score_a, score_b);
    assert_eq!(clock_a, clock_b);
}

#[test]
fn different_seeds_produce_different_schedules() {
    let (log_a, ..) = scripted_run(1);
    let (log_b, ..) = scripted_run(2);

    let kinds = |log: &[Event]| -> Vec<_> {
        log.iter()
            .filter_map(|event| match event {
                Event::EnemySpawned { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    };
    // Two full waves of weighted draws; a collision would be astronomically
    // unlikely.
    assert_ne!(kinds(&log_a), kinds(&log_b));
}
