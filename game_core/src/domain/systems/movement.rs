use crate::domain::entities::{Particle, Player, Rect};
use crate::domain::state::InputState;
use crate::domain::tuning::Playfield;

/// Per-frame velocity added to falling particles.
pub const PARTICLE_GRAVITY: f32 = 0.1;
/// Per-frame alpha lost by particles.
pub const PARTICLE_FADE: f32 = 0.02;

/// Moves the ship from held keys and keeps it inside the playfield.
///
/// `frames` is the elapsed time in 16 ms frames.
pub fn move_player(player: &mut Player, input: &InputState, frames: f32, field: &Playfield) {
    let (dx, dy) = input.axis();
    player.rect.x += dx * player.speed * frames;
    player.rect.y += dy * player.speed * frames;
    field.clamp(&mut player.rect);
}

/// Straight downward motion used by drones and power-ups.
pub fn fall(rect: &mut Rect, speed: f32, frames: f32) {
    rect.y += speed * frames;
}

/// Drift, gravity and fade. Returns false once the particle is invisible.
pub fn advance_particle(particle: &mut Particle, frames: f32) -> bool {
    particle.rect.x += particle.vx * frames;
    particle.rect.y += particle.vy * frames;
    particle.vy += PARTICLE_GRAVITY * frames;
    particle.alpha -= PARTICLE_FADE * frames;
    particle.alpha > 0.0
}

/// Moves `rect` towards `anchor` by `pull` of the centre offset (capped at the full offset).
pub fn pull_towards(rect: &mut Rect, anchor: (f32, f32), pull: f32) {
    let pull = pull.min(1.0);
    let (cx, cy) = rect.center();
    rect.x += (anchor.0 - cx) * pull;
    rect.y += (anchor.1 - cy) * pull;
}
