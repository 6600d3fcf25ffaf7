//! Stationary, NFT-parameterized tower entity.

use std::time::Duration;

use gecko_defence_core::{
    Element, Position, TowerId, TowerSnapshot, LEVEL_XP_STEP, MAX_UPGRADE_LEVEL,
};

const LEVEL_DAMAGE_STEP: f64 = 0.1;
const LEVEL_RANGE_MULTIPLIER: f32 = 1.05;
const UPGRADE_RANGE_MULTIPLIER: f32 = 1.1;
const UPGRADE_FIRE_RATE_MULTIPLIER: f64 = 0.9;
const SELL_REFUND_DIVISOR: u32 = 2;

#[derive(Debug)]
pub(crate) struct Tower {
    id: TowerId,
    element: Element,
    position: Position,
    base_damage: f64,
    range: f32,
    fire_rate: Duration,
    last_fired: Option<Duration>,
    upgrade_level: u8,
    level: u32,
    experience: u32,
    rarity_multiplier: f64,
    kills: u32,
    cost: u32,
}

impl Tower {
    pub(crate) fn new(
        id: TowerId,
        element: Element,
        position: Position,
        base_damage: f64,
        range: f32,
        fire_rate: Duration,
        rarity_multiplier: f64,
        cost: u32,
    ) -> Self {
        Self {
            id,
            element,
            position,
            base_damage,
            range,
            fire_rate,
            last_fired: None,
            upgrade_level: 1,
            level: 1,
            experience: 0,
            rarity_multiplier,
            kills: 0,
            cost,
        }
    }

    pub(crate) const fn id(&self) -> TowerId {
        self.id
    }

    pub(crate) const fn position(&self) -> Position {
        self.position
    }

    pub(crate) const fn range(&self) -> f32 {
        self.range
    }

    pub(crate) const fn upgrade_level(&self) -> u8 {
        self.upgrade_level
    }

    /// Damage dealt to a primary target. Pure arithmetic over the tower's
    /// current stats; identical inputs yield a bit-identical result.
    pub(crate) fn final_damage(&self) -> f64 {
        (self.base_damage
            * f64::from(self.upgrade_level)
            * (1.0 + f64::from(self.level) * LEVEL_DAMAGE_STEP)
            * self.rarity_multiplier)
            .floor()
    }

    /// Time remaining until the fire-rate gate opens; zero means ready.
    pub(crate) fn ready_in(&self, now: Duration) -> Duration {
        match self.last_fired {
            None => Duration::ZERO,
            Some(last) => last.saturating_add(self.fire_rate).saturating_sub(now),
        }
    }

    pub(crate) fn record_shot(&mut self, now: Duration) {
        self.last_fired = Some(now);
    }

    /// Grants kill experience. Returns the new level when the kill pushed
    /// the tower over the `level * 100` threshold. Leveling is unbounded
    /// and distinct from the player-purchased upgrade level.
    pub(crate) fn credit_kill(&mut self, reward: u32) -> Option<u32> {
        self.kills = self.kills.saturating_add(1);
        self.experience = self.experience.saturating_add(reward);
        if self.experience >= self.level.saturating_mul(LEVEL_XP_STEP) {
            self.level += 1;
            self.experience = 0;
            self.range *= LEVEL_RANGE_MULTIPLIER;
            return Some(self.level);
        }
        None
    }

    pub(crate) const fn at_upgrade_cap(&self) -> bool {
        self.upgrade_level >= MAX_UPGRADE_LEVEL
    }

    /// Applies a player-purchased upgrade. Damage growth flows through the
    /// `upgrade_level` factor of [`Tower::final_damage`]; range widens and
    /// the fire-rate gate tightens. Callers must check the cap first.
    pub(crate) fn upgrade(&mut self) -> u8 {
        self.upgrade_level += 1;
        self.range *= UPGRADE_RANGE_MULTIPLIER;
        self.fire_rate = self.fire_rate.mul_f64(UPGRADE_FIRE_RATE_MULTIPLIER);
        self.upgrade_level
    }

    pub(crate) const fn sell_refund(&self) -> u32 {
        self.cost / SELL_REFUND_DIVISOR
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            element: self.element,
            position: self.position,
            range: self.range,
            base_damage: self.base_damage,
            final_damage: self.final_damage(),
            upgrade_level: self.upgrade_level,
            level: self.level,
            experience: self.experience,
            kills: self.kills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tower;
    use gecko_defence_core::{Element, Position, TowerId};
    use std::time::Duration;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    fn tower(rarity_multiplier: f64) -> Tower {
        Tower::new(
            TowerId::new(0),
            Element::Fire,
            Position::new(0.0, 0.0),
            12.0,
            110.0,
            MS(1000),
            rarity_multiplier,
            60,
        )
    }

    #[test]
    fn final_damage_is_bit_identical_across_calls() {
        let tower = tower(1.35);
        let first = tower.final_damage();
        for _ in 0..100 {
            assert_eq!(tower.final_damage().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn final_damage_follows_the_formula() {
        let mut tower = tower(2.0);
        // base 12 * upgrade 1 * (1 + 1 * 0.1) * rarity 2.0 = 26.4 -> 26
        assert_eq!(tower.final_damage(), 26.0);

        let _ = tower.upgrade();
        // base 12 * upgrade 2 * 1.1 * 2.0 = 52.8 -> 52
        assert_eq!(tower.final_damage(), 52.0);
    }

    #[test]
    fn fire_rate_gate_blocks_until_elapsed() {
        let mut tower = tower(1.0);
        assert_eq!(tower.ready_in(MS(0)), Duration::ZERO);

        tower.record_shot(MS(0));
        assert_eq!(tower.ready_in(MS(500)), MS(500));
        assert_eq!(tower.ready_in(MS(1000)), Duration::ZERO);
    }

    #[test]
    fn kill_experience_levels_up_at_threshold() {
        let mut tower = tower(1.0);
        assert_eq!(tower.credit_kill(60), None);
        assert_eq!(tower.credit_kill(40), Some(2));
        assert_eq!(tower.experience, 0);

        // Next threshold is level * 100 = 200.
        assert_eq!(tower.credit_kill(199), None);
        assert_eq!(tower.credit_kill(1), Some(3));
    }

    #[test]
    fn level_up_widens_range() {
        let mut tower = tower(1.0);
        let before = tower.range();
        let _ = tower.credit_kill(100);
        assert!((tower.range() - before * 1.05).abs() < 1e-3);
    }

    #[test]
    fn upgrade_tightens_fire_rate_and_widens_range() {
        let mut tower = tower(1.0);
        let _ = tower.upgrade();
        assert_eq!(tower.fire_rate, MS(900));
        assert!((tower.range() - 110.0 * 1.1).abs() < 1e-3);
        assert!(!tower.at_upgrade_cap());

        for _ in 0..3 {
            let _ = tower.upgrade();
        }
        assert!(tower.at_upgrade_cap());
    }
}
