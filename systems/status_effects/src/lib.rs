#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure resolution of timed status effects into derived modifiers.
//!
//! The engine owns no entity state. Callers hold an [`ActiveEffects`]
//! collection per enemy and ask for the derived speed multiplier and
//! damage-over-time owed for a tick window. All arithmetic is a pure
//! function of the effect list and the simulation clock.

use std::time::Duration;

use gecko_defence_core::{EffectKind, StatusEffect, TowerId};

const MILLIS_PER_SECOND: f64 = 1000.0;

/// Per-entity collection of timed effects.
///
/// Enforces the one-effect-per-kind invariant: applying an effect of a kind
/// that is already active replaces the prior instance and resets its clock.
#[derive(Clone, Debug, Default)]
pub struct ActiveEffects {
    effects: Vec<StatusEffect>,
}

impl ActiveEffects {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an effect, replacing any active effect of the same kind.
    pub fn apply(&mut self, effect: StatusEffect) {
        self.effects.retain(|active| active.kind() != effect.kind());
        self.effects.push(effect);
    }

    /// Currently held effects, including any that have expired but not yet
    /// been swept by [`ActiveEffects::remove_expired`].
    #[must_use]
    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    /// Reports whether no effects are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Drops every effect whose lifetime ended at or before `now`, pushing
    /// the expired kinds into the provided buffer.
    pub fn remove_expired(&mut self, now: Duration, expired: &mut Vec<EffectKind>) {
        self.effects.retain(|effect| {
            if effect.is_expired(now) {
                expired.push(effect.kind());
                false
            } else {
                true
            }
        });
    }
}

/// Derived modifiers computed from an effect list at a single clock value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Multiplier applied to the entity's base speed. Freeze forces zero,
    /// overriding any slow; expired effects contribute nothing.
    pub speed_multiplier: f32,
    /// Summed damage per second owed by active burn and poison effects.
    pub tick_damage_per_second: f64,
}

/// Resolves the derived speed multiplier and damage rate at `now`.
///
/// Expired effects are ignored rather than removed; sweeping is the
/// caller's responsibility so resolution stays a pure read.
#[must_use]
pub fn resolve(effects: &[StatusEffect], now: Duration) -> Resolution {
    let mut speed_multiplier = 1.0_f32;
    let mut frozen = false;
    let mut tick_damage_per_second = 0.0_f64;

    for effect in effects {
        if effect.is_expired(now) {
            continue;
        }
        match effect.kind() {
            EffectKind::Freeze => frozen = true,
            EffectKind::Slow => speed_multiplier *= effect.intensity(),
            EffectKind::Burn | EffectKind::Poison => {
                tick_damage_per_second += effect.tick_damage();
            }
        }
    }

    Resolution {
        speed_multiplier: if frozen { 0.0 } else { speed_multiplier },
        tick_damage_per_second,
    }
}

/// Damage owed by a single effect over a tick window, tagged with the tower
/// to credit if the damage proves lethal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotSlice {
    /// Tower that applied the underlying effect, if attributable.
    pub source: Option<TowerId>,
    /// Damage owed for the window.
    pub damage: f64,
}

/// Computes the damage-over-time owed for the window `[now, now + dt]`.
///
/// Each slice covers exactly the overlap of the window with the effect's
/// lifetime, so the total damage an effect deals over its duration is
/// independent of tick length. One slice is pushed per contributing effect,
/// in effect-list order, so the caller can attribute a lethal slice to the
/// tower that applied it.
pub fn accrue_damage(
    effects: &[StatusEffect],
    now: Duration,
    dt: Duration,
    out: &mut Vec<DotSlice>,
) {
    let window_end = now.saturating_add(dt);
    for effect in effects {
        if effect.tick_damage() <= 0.0 {
            continue;
        }
        let start = now.max(effect.applied_at());
        let end = window_end.min(effect.expires_at());
        if end <= start {
            continue;
        }
        let active_ms = (end - start).as_secs_f64() * MILLIS_PER_SECOND;
        out.push(DotSlice {
            source: effect.applied_by(),
            damage: effect.tick_damage() / MILLIS_PER_SECOND * active_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{accrue_damage, resolve, ActiveEffects};
    use gecko_defence_core::{EffectKind, StatusEffect, TowerId};
    use std::time::Duration;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn applying_same_kind_replaces_rather_than_stacks() {
        let mut effects = ActiveEffects::new();
        effects.apply(StatusEffect::slow(0.5, MS(2000), MS(0), None));
        effects.apply(StatusEffect::slow(0.8, MS(2000), MS(300), None));

        let slows: Vec<_> = effects
            .effects()
            .iter()
            .filter(|effect| effect.kind() == EffectKind::Slow)
            .collect();
        assert_eq!(slows.len(), 1);
        assert!((slows[0].intensity() - 0.8).abs() < f32::EPSILON);
        assert_eq!(slows[0].applied_at(), MS(300));
    }

    #[test]
    fn freeze_overrides_slow_until_it_expires() {
        let mut effects = ActiveEffects::new();
        effects.apply(StatusEffect::freeze(MS(500), MS(0), None));
        effects.apply(StatusEffect::slow(0.5, MS(2000), MS(100), None));

        let during_freeze = resolve(effects.effects(), MS(250));
        assert_eq!(during_freeze.speed_multiplier, 0.0);

        let after_freeze = resolve(effects.effects(), MS(500));
        assert!((after_freeze.speed_multiplier - 0.5).abs() < f32::EPSILON);

        let after_slow = resolve(effects.effects(), MS(2100));
        assert!((after_slow.speed_multiplier - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn expiry_restores_full_speed_with_no_residual_penalty() {
        let mut effects = ActiveEffects::new();
        effects.apply(StatusEffect::slow(0.25, MS(1000), MS(0), None));

        assert!((resolve(effects.effects(), MS(999)).speed_multiplier - 0.25).abs() < 1e-6);
        assert!((resolve(effects.effects(), MS(1000)).speed_multiplier - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dot_totals_are_independent_of_tick_length() {
        let burn = StatusEffect::burn(10.0, MS(3000), MS(0), Some(TowerId::new(1)));
        let effects = [burn];

        let mut coarse = Vec::new();
        accrue_damage(&effects, MS(0), MS(4000), &mut coarse);
        let coarse_total: f64 = coarse.iter().map(|slice| slice.damage).sum();

        let mut fine_total = 0.0;
        let mut slices = Vec::new();
        let mut clock = MS(0);
        for _ in 0..250 {
            slices.clear();
            accrue_damage(&effects, clock, MS(16), &mut slices);
            fine_total += slices.iter().map(|slice| slice.damage).sum::<f64>();
            clock += MS(16);
        }

        assert!((coarse_total - 30.0).abs() < 1e-9);
        assert!((fine_total - coarse_total).abs() < 1e-6);
    }

    #[test]
    fn dot_slices_carry_their_source_tower() {
        let effects = [
            StatusEffect::burn(10.0, MS(3000), MS(0), Some(TowerId::new(7))),
            StatusEffect::poison(2.0, MS(5000), MS(0), Some(TowerId::new(9))),
        ];
        let mut slices = Vec::new();
        accrue_damage(&effects, MS(0), MS(1000), &mut slices);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].source, Some(TowerId::new(7)));
        assert!((slices[0].damage - 10.0).abs() < 1e-9);
        assert_eq!(slices[1].source, Some(TowerId::new(9)));
        assert!((slices[1].damage - 2.0).abs() < 1e-9);
    }

    #[test]
    fn remove_expired_reports_swept_kinds() {
        let mut effects = ActiveEffects::new();
        effects.apply(StatusEffect::freeze(MS(500), MS(0), None));
        effects.apply(StatusEffect::poison(1.0, MS(5000), MS(0), None));

        let mut expired = Vec::new();
        effects.remove_expired(MS(600), &mut expired);

        assert_eq!(expired, vec![EffectKind::Freeze]);
        assert_eq!(effects.effects().len(), 1);
        assert_eq!(effects.effects()[0].kind(), EffectKind::Poison);
    }
}
