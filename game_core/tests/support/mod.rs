// Shared builders for whole-frame scenarios.
#![allow(dead_code)]

use game_core::World;
use game_core::domain::tuning::Tuning;
use game_core::domain::{EntityId, WeaponKind};

pub const FRAME_MS: u64 = 16;

// World with both spawners switched off so a scenario owns every entity.
pub fn quiet_world(seed: u64) -> World {
    let mut tuning = Tuning::default();
    tuning.enemy.spawn_interval_ms = u64::MAX;
    tuning.pickup.spawn_interval_ms = u64::MAX;
    World::with_tuning(seed, tuning)
}

pub fn run_frames(world: &mut World, frames: u64) {
    for _ in 0..frames {
        world.tick(FRAME_MS);
    }
}

// Drops a laser bolt just under the enemy so it connects on the next tick.
pub fn shoot_enemy(world: &mut World, target: EntityId) -> bool {
    let Some(enemy) = world.enemies().iter().find(|e| e.id == target) else {
        return false;
    };
    let x = enemy.rect.x + enemy.rect.width / 2.0;
    let y = enemy.rect.y + enemy.rect.height;
    world.spawn_bullet(x, y, WeaponKind::Laser);
    true
}

// Shoots until the enemy is gone. Returns the ticks it took.
pub fn kill(world: &mut World, target: EntityId) -> u64 {
    let mut ticks = 0;
    while shoot_enemy(world, target) {
        world.tick(FRAME_MS);
        ticks += 1;
        assert!(ticks < 100, "enemy {target:?} refused to die");
    }
    ticks
}
