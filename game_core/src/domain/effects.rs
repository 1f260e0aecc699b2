// Elemental status effects applied by projectile hits.
//
// Effects only touch enemies through ids and the world's enemy list, so a target that
// left the world between scheduling and firing turns the remaining work into a no-op.

use crate::domain::collision::{distance, nearest_index};
use crate::domain::entities::{Element, Enemy, EntityId, Spatial};
use crate::domain::timeline::{DeferredAction, Timeline};
use crate::domain::tuning::element::ElementTuning;
use std::collections::HashSet;

/// Skill-tree upgrades that change how effects behave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectModifiers {
    pub burn_damage_scale: f32,
    pub freeze_duration_scale: f32,
    pub extra_chain_hops: u32,
    pub implode_radius_scale: f32,
}

impl Default for EffectModifiers {
    fn default() -> Self {
        Self {
            burn_damage_scale: 1.0,
            freeze_duration_scale: 1.0,
            extra_chain_hops: 0,
            implode_radius_scale: 1.0,
        }
    }
}

/// Where the world should draw feedback for an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub color: &'static str,
}

/// Applies one element hit.
///
/// `origin` is where the hit landed; the primary target may already be gone (killed by
/// the same bullet), in which case only area effects still resolve.
pub fn apply(
    element: Element,
    target: EntityId,
    origin: (f32, f32),
    enemies: &mut [Enemy],
    timeline: &mut Timeline,
    now_ms: u64,
    tuning: &ElementTuning,
    modifiers: &EffectModifiers,
) -> Vec<Spark> {
    match element {
        Element::Fire => ignite(target, origin, timeline, now_ms, tuning, modifiers),
        Element::Ice => freeze(target, enemies, timeline, now_ms, tuning, modifiers),
        Element::Lightning => chain(target, origin, enemies, tuning, modifiers),
        Element::Void => implode(origin, enemies, tuning, modifiers),
    }
}

fn ignite(
    target: EntityId,
    origin: (f32, f32),
    timeline: &mut Timeline,
    now_ms: u64,
    tuning: &ElementTuning,
    modifiers: &EffectModifiers,
) -> Vec<Spark> {
    if tuning.burn_ticks == 0 {
        return Vec::new();
    }
    timeline.schedule(
        now_ms + tuning.burn_interval_ms,
        DeferredAction::Burn {
            target,
            remaining: tuning.burn_ticks,
            damage: tuning.burn_damage * modifiers.burn_damage_scale,
        },
    );
    vec![spark(origin, Element::Fire)]
}

/// Runs one scheduled burn tick and queues the next one.
///
/// Stops when the target is gone, dead, or the tick budget is spent.
pub fn burn_tick(
    target: EntityId,
    remaining: u8,
    damage: f32,
    due_ms: u64,
    enemies: &mut [Enemy],
    timeline: &mut Timeline,
    tuning: &ElementTuning,
) -> Option<Spark> {
    let enemy = enemies.iter_mut().find(|e| e.id == target)?;
    if !enemy.is_alive() || remaining == 0 {
        return None;
    }

    enemy.health -= damage;
    let remaining = remaining - 1;
    if remaining > 0 && enemy.is_alive() {
        timeline.schedule(
            due_ms + tuning.burn_interval_ms,
            DeferredAction::Burn {
                target,
                remaining,
                damage,
            },
        );
    }
    Some(spark(enemy.center(), Element::Fire))
}

fn freeze(
    target: EntityId,
    enemies: &mut [Enemy],
    timeline: &mut Timeline,
    now_ms: u64,
    tuning: &ElementTuning,
    modifiers: &EffectModifiers,
) -> Vec<Spark> {
    let Some(enemy) = enemies.iter_mut().find(|e| e.id == target) else {
        return Vec::new();
    };
    // Refreezing would capture the already-slowed speed as the "original".
    if enemy.frozen || !enemy.is_alive() {
        return Vec::new();
    }

    let original_speed = enemy.speed;
    enemy.speed *= tuning.freeze_factor;
    enemy.frozen = true;

    let duration = (tuning.freeze_duration_ms as f32 * modifiers.freeze_duration_scale).round() as u64;
    timeline.schedule(
        now_ms + duration,
        DeferredAction::Thaw {
            target,
            original_speed,
        },
    );
    vec![spark(enemy.center(), Element::Ice)]
}

/// Restores a frozen enemy's speed if it survived the freeze.
pub fn thaw(target: EntityId, original_speed: f32, enemies: &mut [Enemy]) -> bool {
    match enemies.iter_mut().find(|e| e.id == target) {
        Some(enemy) if enemy.is_alive() => {
            enemy.speed = original_speed;
            enemy.frozen = false;
            true
        }
        _ => false,
    }
}

fn chain(
    target: EntityId,
    origin: (f32, f32),
    enemies: &mut [Enemy],
    tuning: &ElementTuning,
    modifiers: &EffectModifiers,
) -> Vec<Spark> {
    let hops = tuning.chain_hops + modifiers.extra_chain_hops;
    let mut struck: HashSet<EntityId> = HashSet::from([target]);
    // Hops start at the struck enemy; the hit point only stands in once it is gone.
    let mut from = enemies
        .iter()
        .find(|e| e.id == target)
        .map_or(origin, |e| e.center());
    let mut sparks = Vec::new();

    for _ in 0..hops {
        let Some(next) = nearest_index(enemies, from, Some(tuning.chain_radius), |e| {
            struck.contains(&e.id) || !e.is_alive()
        }) else {
            break;
        };

        let enemy = &mut enemies[next];
        enemy.health -= tuning.chain_damage;
        struck.insert(enemy.id);
        from = enemy.center();
        sparks.push(spark(from, Element::Lightning));
    }
    sparks
}

fn implode(
    origin: (f32, f32),
    enemies: &mut [Enemy],
    tuning: &ElementTuning,
    modifiers: &EffectModifiers,
) -> Vec<Spark> {
    let radius = tuning.implode_radius * modifiers.implode_radius_scale;
    for enemy in enemies.iter_mut() {
        if enemy.is_alive() && distance(origin, enemy.center()) < radius {
            enemy.health -= tuning.implode_damage;
        }
    }
    vec![spark(origin, Element::Void)]
}

fn spark(at: (f32, f32), element: Element) -> Spark {
    Spark {
        x: at.0,
        y: at.1,
        color: element.color(),
    }
}
