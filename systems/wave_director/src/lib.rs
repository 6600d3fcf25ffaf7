#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduling.
//!
//! The director owns the spawn schedule of a run: it decides when each wave
//! begins, which enemy kinds it spawns, and at what cadence. The composition
//! of a wave is drawn from the configured spawn-weight table with a ChaCha8
//! stream seeded by SHA-256 over the global seed and the wave number, so two
//! runs with the same seed replay the same schedule exactly. Boss waves lead
//! with the boss before the weighted mix.

use std::time::Duration;

use gecko_defence_core::{Command, EnemyKind, GameConfig, Wave, WaveScaling};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Stateful system that emits [`Command::BeginWave`] and
/// [`Command::SpawnEnemy`] batches on a deterministic schedule.
#[derive(Debug)]
pub struct WaveDirector {
    scaling: WaveScaling,
    weights: Vec<(EnemyKind, u32)>,
    global_seed: u64,
    phase: Phase,
}

#[derive(Debug)]
enum Phase {
    /// The next wave begins on the next handled tick.
    Pending { next: u32 },
    /// The wave's schedule is being drip-fed through the cadence accumulator.
    Spawning {
        wave: u32,
        schedule: Vec<EnemyKind>,
        cursor: usize,
        accumulator: Duration,
    },
    /// Every enemy is out; waiting for the field to clear.
    Draining { wave: u32 },
    /// Every configured wave has been spawned and cleared.
    Exhausted,
}

impl WaveDirector {
    /// Creates a director over the configured wave table and global seed.
    ///
    /// The spawn mix is taken from the per-kind spawn weights; the boss kind
    /// never appears in the weighted mix and is instead prepended to boss
    /// waves.
    #[must_use]
    pub fn new(config: &GameConfig, global_seed: u64) -> Self {
        let weights = config
            .enemies
            .iter()
            .filter(|(kind, stats)| **kind != EnemyKind::Boss && stats.spawn_weight > 0)
            .map(|(kind, stats)| (*kind, stats.spawn_weight))
            .collect();
        Self {
            scaling: config.waves.clone(),
            weights,
            global_seed,
            phase: Phase::Pending { next: 1 },
        }
    }

    /// Wave currently in progress, zero before the first wave begins.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        match self.phase {
            Phase::Pending { next } => next.saturating_sub(1),
            Phase::Spawning { wave, .. } | Phase::Draining { wave } => wave,
            Phase::Exhausted => self.scaling.total_waves,
        }
    }

    /// True once every configured wave has been spawned and cleared.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.phase, Phase::Exhausted)
    }

    /// Advances the schedule by `dt` and emits the due commands.
    ///
    /// `living_enemies` gates wave transitions: a new wave begins only once
    /// the field is clear. The first enemy of a wave spawns on the tick the
    /// wave begins; the rest follow the configured cadence.
    pub fn handle(&mut self, dt: Duration, living_enemies: usize, out: &mut Vec<Command>) {
        if let Phase::Draining { wave } = self.phase {
            if living_enemies == 0 {
                self.phase = if wave >= self.scaling.total_waves {
                    Phase::Exhausted
                } else {
                    Phase::Pending { next: wave + 1 }
                };
            }
        }

        if let Phase::Pending { next } = self.phase {
            let descriptor = self.scaling.wave(next);
            let schedule = self.compose(descriptor);
            out.push(Command::BeginWave { wave: descriptor });
            self.phase = Phase::Spawning {
                wave: next,
                schedule,
                cursor: 0,
                // Primed so the first spawn lands on this same tick.
                accumulator: Duration::from_millis(self.scaling.spawn_interval_ms),
            };
        }

        if let Phase::Spawning {
            wave,
            schedule,
            cursor,
            accumulator,
        } = &mut self.phase
        {
            let interval = Duration::from_millis(self.scaling.spawn_interval_ms);
            *accumulator = accumulator.saturating_add(dt);
            while *accumulator >= interval && *cursor < schedule.len() {
                *accumulator -= interval;
                out.push(Command::SpawnEnemy {
                    kind: schedule[*cursor],
                    wave: *wave,
                });
                *cursor += 1;
            }
            if *cursor == schedule.len() {
                self.phase = Phase::Draining { wave: *wave };
            }
        }
    }

    /// Composes the full spawn order of a wave up front. The order is a pure
    /// function of the global seed and the wave number.
    fn compose(&self, wave: Wave) -> Vec<EnemyKind> {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.global_seed, wave.number));
        let mut schedule = Vec::with_capacity(wave.enemy_quota as usize);
        if wave.is_boss_wave {
            schedule.push(EnemyKind::Boss);
        }
        while schedule.len() < wave.enemy_quota as usize {
            schedule.push(self.sample_kind(&mut rng));
        }
        schedule
    }

    fn sample_kind(&self, rng: &mut ChaCha8Rng) -> EnemyKind {
        let total: u32 = self.weights.iter().map(|(_, weight)| weight).sum();
        let mut roll = rng.gen_range(0..total);
        for (kind, weight) in &self.weights {
            if roll < *weight {
                return *kind;
            }
            roll -= weight;
        }
        // Unreachable while the weights sum to `total`.
        self.weights[self.weights.len() - 1].0
    }
}

fn derive_wave_seed(global_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}
