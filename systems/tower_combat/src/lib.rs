#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Attack synthesis for towers.
//!
//! A pure system: given acquired targets and the snapshot views they were
//! acquired against, it builds one [`Attack`] per target. The primary target
//! takes the tower's full deterministic damage; the tower's element decides
//! the rider payload and any secondary hits. Nothing here mutates state; the
//! world re-validates and executes the attacks it is handed.

use std::cmp::Ordering;

use gecko_defence_core::{
    Attack, AttackEffect, EffectKind, EnemySnapshot, EnemyView, SplashHit, TowerCooldownView,
    TowerSnapshot, TowerTarget, TowerView, BURN_DAMAGE_FRACTION, BURN_DURATION,
    CHAIN_DAMAGE_FRACTION, CHAIN_MAX_EXTRA_TARGETS, CHAIN_STAGGER_MS, COSMIC_DAMAGE_FRACTION,
    COSMIC_SPLASH_RADIUS, POISON_DAMAGE_FRACTION, POISON_DURATION, SLOW_DURATION, SLOW_INTENSITY,
};
use gecko_defence_core::{Element, EnemyId};

/// Builds an attack for every acquired target whose tower is still ready.
///
/// Clears `out` before filling it. Targets are expected in tower-id order as
/// emitted by the targeting system, which keeps the attack batch
/// deterministic for identical inputs.
pub fn handle(
    targets: &[TowerTarget],
    towers: &TowerView,
    cooldowns: &TowerCooldownView,
    enemies: &EnemyView,
    out: &mut Vec<Attack>,
) {
    out.clear();
    for target in targets {
        let ready = cooldowns
            .get(target.tower)
            .map_or(true, |gate| gate.ready_in.is_zero());
        if !ready {
            continue;
        }
        let Some(tower) = towers.iter().find(|tower| tower.id == target.tower) else {
            continue;
        };
        let Some(primary) = enemies.iter().find(|enemy| enemy.id == target.target) else {
            continue;
        };
        out.push(synthesize(tower, primary, enemies));
    }
}

fn synthesize(tower: &TowerSnapshot, primary: &EnemySnapshot, enemies: &EnemyView) -> Attack {
    let mut effect = None;
    let mut splash = Vec::new();

    match tower.element {
        Element::Fire => {
            effect = Some(AttackEffect {
                kind: EffectKind::Burn,
                intensity: 1.0,
                tick_damage: tower.base_damage * BURN_DAMAGE_FRACTION,
                duration: BURN_DURATION,
            });
        }
        Element::Ice => {
            effect = Some(AttackEffect {
                kind: EffectKind::Slow,
                intensity: SLOW_INTENSITY,
                tick_damage: 0.0,
                duration: SLOW_DURATION,
            });
        }
        Element::Poison => {
            effect = Some(AttackEffect {
                kind: EffectKind::Poison,
                intensity: 1.0,
                tick_damage: tower.base_damage * POISON_DAMAGE_FRACTION,
                duration: POISON_DURATION,
            });
        }
        Element::Electric => chain_hits(tower, primary.id, enemies, &mut splash),
        Element::Cosmic => cosmic_hits(tower, primary, enemies, &mut splash),
    }

    Attack {
        tower: tower.id,
        primary: primary.id,
        damage: tower.final_damage,
        effect,
        splash,
    }
}

/// Chain lightning arcs to up to three further enemies inside the tower's
/// own range, ranked by the targeting order. The stagger is recorded for
/// renderers; the damage lands within the firing tick.
fn chain_hits(
    tower: &TowerSnapshot,
    primary: EnemyId,
    enemies: &EnemyView,
    out: &mut Vec<SplashHit>,
) {
    let range_squared = tower.range * tower.range;
    let mut arcs: Vec<&EnemySnapshot> = enemies
        .iter()
        .filter(|enemy| enemy.id != primary)
        .filter(|enemy| tower.position.distance_squared(enemy.position) <= range_squared)
        .collect();
    arcs.sort_by(|a, b| rank(a, b));

    let damage = tower.base_damage * CHAIN_DAMAGE_FRACTION;
    for (arc, enemy) in arcs.iter().take(CHAIN_MAX_EXTRA_TARGETS).enumerate() {
        out.push(SplashHit {
            enemy: enemy.id,
            damage,
            stagger_ms: (arc as u32 + 1) * CHAIN_STAGGER_MS,
        });
    }
}

/// Cosmic bursts splash everything within a fixed radius of the primary
/// target. The primary is excluded; it already took the full damage.
fn cosmic_hits(
    tower: &TowerSnapshot,
    primary: &EnemySnapshot,
    enemies: &EnemyView,
    out: &mut Vec<SplashHit>,
) {
    let radius_squared = COSMIC_SPLASH_RADIUS * COSMIC_SPLASH_RADIUS;
    let damage = tower.base_damage * COSMIC_DAMAGE_FRACTION;
    for enemy in enemies.iter() {
        if enemy.id == primary.id {
            continue;
        }
        if primary.position.distance_squared(enemy.position) <= radius_squared {
            out.push(SplashHit {
                enemy: enemy.id,
                damage,
                stagger_ms: 0,
            });
        }
    }
}

fn rank(a: &EnemySnapshot, b: &EnemySnapshot) -> Ordering {
    a.distance_to_goal
        .total_cmp(&b.distance_to_goal)
        .then(a.health.total_cmp(&b.health))
        .then(a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::handle;
    use gecko_defence_core::{
        Element, EnemyId, EnemyKind, EnemySnapshot, EnemyView, Position, TowerCooldownSnapshot,
        TowerCooldownView, TowerId, TowerSnapshot, TowerTarget, TowerView,
    };
    use std::time::Duration;

    fn tower(element: Element) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(0),
            element,
            position: Position::new(0.0, 0.0),
            range: 120.0,
            base_damage: 10.0,
            final_damage: 11.0,
            upgrade_level: 1,
            level: 1,
            experience: 0,
            kills: 0,
        }
    }

    fn enemy(id: u32, x: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Grunt,
            position: Position::new(x, 0.0),
            path_progress: 0.5,
            distance_to_goal: 400.0 - x,
            health: 100.0,
            max_health: 100.0,
            wave: 1,
            reward: 6,
        }
    }

    fn attacks(
        element: Element,
        enemies: Vec<EnemySnapshot>,
    ) -> Vec<gecko_defence_core::Attack> {
        let towers = TowerView::from_snapshots(vec![tower(element)]);
        let cooldowns = TowerCooldownView::from_snapshots(vec![TowerCooldownSnapshot {
            tower: TowerId::new(0),
            ready_in: Duration::ZERO,
        }]);
        let targets = vec![TowerTarget {
            tower: TowerId::new(0),
            target: EnemyId::new(0),
        }];
        let enemies = EnemyView::from_snapshots(enemies);
        let mut out = Vec::new();
        handle(&targets, &towers, &cooldowns, &enemies, &mut out);
        out
    }

    #[test]
    fn fire_attaches_a_burn_rider_off_base_damage() {
        let out = attacks(Element::Fire, vec![enemy(0, 10.0)]);
        let effect = out[0].effect.expect("burn rider");
        assert_eq!(effect.tick_damage, 2.0);
        assert_eq!(effect.duration, Duration::from_millis(3000));
        assert!(out[0].splash.is_empty());
        assert_eq!(out[0].damage, 11.0);
    }

    #[test]
    fn ice_attaches_a_half_speed_slow() {
        let out = attacks(Element::Ice, vec![enemy(0, 10.0)]);
        let effect = out[0].effect.expect("slow rider");
        assert_eq!(effect.intensity, 0.5);
        assert_eq!(effect.duration, Duration::from_millis(2000));
    }

    #[test]
    fn poison_attaches_a_tenth_per_second() {
        let out = attacks(Element::Poison, vec![enemy(0, 10.0)]);
        let effect = out[0].effect.expect("poison rider");
        assert_eq!(effect.tick_damage, 1.0);
        assert_eq!(effect.duration, Duration::from_millis(5000));
    }

    #[test]
    fn chain_lightning_arcs_to_at_most_three_staggered_extras() {
        let out = attacks(
            Element::Electric,
            vec![
                enemy(0, 10.0),
                enemy(1, 20.0),
                enemy(2, 30.0),
                enemy(3, 40.0),
                enemy(4, 50.0),
            ],
        );
        let splash = &out[0].splash;
        assert_eq!(splash.len(), 3);
        // Highest path progress first (closest to the goal), never the primary.
        let hit: Vec<u32> = splash.iter().map(|hit| hit.enemy.get()).collect();
        assert_eq!(hit, vec![4, 3, 2]);
        let stagger: Vec<u32> = splash.iter().map(|hit| hit.stagger_ms).collect();
        assert_eq!(stagger, vec![100, 200, 300]);
        assert!(splash.iter().all(|hit| hit.damage == 5.0));
        assert!(out[0].effect.is_none());
    }

    #[test]
    fn chain_lightning_stays_inside_tower_range() {
        let out = attacks(
            Element::Electric,
            vec![enemy(0, 10.0), enemy(1, 115.0), enemy(2, 300.0)],
        );
        let hit: Vec<u32> = out[0].splash.iter().map(|hit| hit.enemy.get()).collect();
        assert_eq!(hit, vec![1]);
    }

    #[test]
    fn cosmic_splashes_around_the_primary_excluding_it() {
        let out = attacks(
            Element::Cosmic,
            vec![enemy(0, 10.0), enemy(1, 60.0), enemy(2, 95.0)],
        );
        let splash = &out[0].splash;
        // Enemy 1 is 50 units from the primary, enemy 2 is 85 (outside 80).
        assert_eq!(splash.len(), 1);
        assert_eq!(splash[0].enemy, EnemyId::new(1));
        assert_eq!(splash[0].damage, 7.0);
    }

    #[test]
    fn gated_targets_produce_no_attack() {
        let towers = TowerView::from_snapshots(vec![tower(Element::Fire)]);
        let cooldowns = TowerCooldownView::from_snapshots(vec![TowerCooldownSnapshot {
            tower: TowerId::new(0),
            ready_in: Duration::from_millis(250),
        }]);
        let targets = vec![TowerTarget {
            tower: TowerId::new(0),
            target: EnemyId::new(0),
        }];
        let enemies = EnemyView::from_snapshots(vec![enemy(0, 10.0)]);

        let mut out = Vec::new();
        handle(&targets, &towers, &cooldowns, &enemies, &mut out);
        assert!(out.is_empty());
    }
}
