//! Path-following, damageable enemy entity.

use std::time::Duration;

use gecko_defence_core::{EffectKind, EnemyId, EnemyKind, EnemySnapshot, StatusEffect};
use gecko_defence_system_status_effects::{self as status, ActiveEffects};

use crate::path::PathModel;

/// Lifecycle of an enemy. `Dying` and `ReachedGoal` are terminal and
/// mutually exclusive; exactly one of the two is ever entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnemyState {
    Spawned,
    Advancing,
    Dying,
    ReachedGoal,
}

#[derive(Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    wave: u32,
    max_health: f64,
    health: f64,
    base_speed: f32,
    reward: u32,
    progress: f32,
    state: EnemyState,
    effects: ActiveEffects,
}

impl Enemy {
    pub(crate) fn new(
        id: EnemyId,
        kind: EnemyKind,
        wave: u32,
        base_health: f64,
        base_speed: f32,
        base_reward: u32,
        difficulty_scalar: f64,
    ) -> Self {
        let max_health = base_health * difficulty_scalar;
        Self {
            id,
            kind,
            wave,
            max_health,
            health: max_health,
            base_speed,
            reward: base_reward.saturating_mul(wave),
            progress: 0.0,
            state: EnemyState::Spawned,
            effects: ActiveEffects::new(),
        }
    }

    pub(crate) const fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) const fn reward(&self) -> u32 {
        self.reward
    }

    pub(crate) const fn progress(&self) -> f32 {
        self.progress
    }

    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self.state, EnemyState::Dying | EnemyState::ReachedGoal)
    }

    pub(crate) fn effects(&self) -> &[StatusEffect] {
        self.effects.effects()
    }

    /// Advances along the path by `dt` using the speed multiplier derived
    /// from effects active at `now`. Returns true when the goal is reached
    /// by this call. Progress never decreases; the goal boundary at exactly
    /// `1.0` is inclusive, and no further updates happen afterwards.
    pub(crate) fn advance(&mut self, dt: Duration, now: Duration, path_length: f32) -> bool {
        if self.is_terminal() {
            return false;
        }
        if self.state == EnemyState::Spawned {
            self.state = EnemyState::Advancing;
        }

        let resolution = status::resolve(self.effects.effects(), now);
        let speed = self.base_speed * resolution.speed_multiplier;
        if speed > 0.0 {
            self.progress += speed * dt.as_secs_f32() / path_length;
        }

        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.state = EnemyState::ReachedGoal;
            return true;
        }
        false
    }

    /// Applies damage, clamping health at zero. Returns true when this call
    /// killed the enemy. Idempotent once terminal: a dead or exited enemy
    /// absorbs nothing and never re-fires its terminal transition.
    pub(crate) fn take_damage(&mut self, amount: f64) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.state = EnemyState::Dying;
            return true;
        }
        false
    }

    /// Applies a status effect, replacing any active effect of the same
    /// kind. Ignored once terminal.
    pub(crate) fn apply_effect(&mut self, effect: StatusEffect) {
        if self.is_terminal() {
            return;
        }
        self.effects.apply(effect);
    }

    pub(crate) fn expire_effects(&mut self, now: Duration, expired: &mut Vec<EffectKind>) {
        self.effects.remove_expired(now, expired);
    }

    pub(crate) fn snapshot(&self, path: &PathModel) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: path.point_at(self.progress),
            path_progress: self.progress,
            distance_to_goal: path.distance_to_goal(self.progress),
            health: self.health,
            max_health: self.max_health,
            wave: self.wave,
            reward: self.reward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Enemy, EnemyState};
    use gecko_defence_core::{EnemyId, EnemyKind, StatusEffect};
    use std::time::Duration;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    fn enemy() -> Enemy {
        Enemy::new(EnemyId::new(0), EnemyKind::Grunt, 1, 100.0, 50.0, 6, 1.0)
    }

    #[test]
    fn health_clamps_at_zero_and_dying_fires_once() {
        let mut enemy = enemy();
        assert!(!enemy.take_damage(60.0));
        assert!(enemy.take_damage(50.0));
        assert_eq!(enemy.state, EnemyState::Dying);

        // A second lethal hit is absorbed without re-entering the terminal state.
        assert!(!enemy.take_damage(10.0));
        assert!(enemy.health >= 0.0);
    }

    #[test]
    fn damage_is_monotone_and_never_negative() {
        let mut enemy = enemy();
        let mut previous = enemy.health;
        for _ in 0..20 {
            let _ = enemy.take_damage(9.0);
            assert!(enemy.health <= previous);
            assert!(enemy.health >= 0.0);
            previous = enemy.health;
        }
    }

    #[test]
    fn goal_boundary_is_inclusive_and_terminal() {
        let mut enemy = enemy();
        // Path of 100 units at 50 units/sec: the goal falls at exactly 2s.
        assert!(!enemy.advance(MS(1999), MS(0), 100.0));
        assert!(enemy.advance(MS(1), MS(1999), 100.0));
        assert_eq!(enemy.state, EnemyState::ReachedGoal);
        assert_eq!(enemy.progress, 1.0);

        // No movement nor damage once the goal has been reached.
        assert!(!enemy.advance(MS(1000), MS(2000), 100.0));
        assert!(!enemy.take_damage(1_000.0));
    }

    #[test]
    fn progress_is_monotonically_non_decreasing() {
        let mut enemy = enemy();
        enemy.apply_effect(StatusEffect::slow(0.5, MS(500), MS(0), None));
        let mut previous = enemy.progress;
        let mut clock = MS(0);
        for _ in 0..50 {
            let _ = enemy.advance(MS(50), clock, 1_000.0);
            assert!(enemy.progress >= previous);
            previous = enemy.progress;
            clock += MS(50);
        }
    }

    #[test]
    fn freeze_stops_movement_entirely() {
        let mut enemy = enemy();
        enemy.apply_effect(StatusEffect::freeze(MS(500), MS(0), None));
        let _ = enemy.advance(MS(400), MS(0), 100.0);
        assert_eq!(enemy.progress, 0.0);

        let _ = enemy.advance(MS(400), MS(500), 100.0);
        assert!(enemy.progress > 0.0);
    }

    #[test]
    fn health_and_reward_scale_with_wave() {
        let scalar = 1.25_f64.powf(6.0 / 3.0);
        let scaled = Enemy::new(EnemyId::new(1), EnemyKind::Grunt, 6, 100.0, 50.0, 6, scalar);
        assert!((scaled.max_health - 100.0 * scalar).abs() < 1e-9);
        assert_eq!(scaled.reward(), 36);
    }
}
