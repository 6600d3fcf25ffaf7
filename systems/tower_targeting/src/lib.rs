#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target acquisition for towers.
//!
//! A pure system: given snapshot views of towers, their cooldown gates, and
//! living enemies, it emits one [`TowerTarget`] per tower that is ready to
//! fire and has at least one enemy in range. Candidates are ranked by
//! ascending distance to the goal, then ascending health, then ascending id,
//! so the selection is total and deterministic.

use std::cmp::Ordering;

use gecko_defence_core::{
    EnemySnapshot, EnemyView, TowerCooldownView, TowerSnapshot, TowerTarget, TowerView,
};

/// Ranks two candidate enemies for the same tower. The enemy closest to
/// breaching the goal wins; among equals the weakest wins, and the id is the
/// final backstop so the order is total.
fn rank(a: &EnemySnapshot, b: &EnemySnapshot) -> Ordering {
    a.distance_to_goal
        .total_cmp(&b.distance_to_goal)
        .then(a.health.total_cmp(&b.health))
        .then(a.id.cmp(&b.id))
}

fn in_range(tower: &TowerSnapshot, enemy: &EnemySnapshot) -> bool {
    tower.position.distance_squared(enemy.position) <= tower.range * tower.range
}

/// Acquires a target for every tower whose fire-rate gate is open.
///
/// Clears `out` before filling it. Towers are visited in id order, so the
/// emitted targets are deterministic for identical inputs.
pub fn handle(
    towers: &TowerView,
    cooldowns: &TowerCooldownView,
    enemies: &EnemyView,
    out: &mut Vec<TowerTarget>,
) {
    out.clear();
    for tower in towers.iter() {
        let ready = cooldowns
            .get(tower.id)
            .map_or(true, |gate| gate.ready_in.is_zero());
        if !ready {
            continue;
        }
        let best = enemies
            .iter()
            .filter(|enemy| in_range(tower, enemy))
            .min_by(|a, b| rank(a, b));
        if let Some(enemy) = best {
            out.push(TowerTarget {
                tower: tower.id,
                target: enemy.id,
            });
        }
    }
}
