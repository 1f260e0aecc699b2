// Per-entity movement and firing rules, called by the frame scheduler.

pub mod bosses;
pub mod companions;
pub mod movement;
pub mod projectiles;
pub mod spawner;
