use crate::domain::entities::PowerUpKind;
use rand::Rng;

/// True once strictly more than `interval_ms` has passed since `last_ms`.
pub fn interval_elapsed(now_ms: u64, last_ms: u64, interval_ms: u64) -> bool {
    now_ms.saturating_sub(last_ms) > interval_ms
}

/// A boss may join when the score sits on a positive multiple of `spawn_score` and no
/// boss is alive.
pub fn should_spawn_boss(score: u64, spawn_score: u64, boss_alive: bool) -> bool {
    spawn_score > 0 && score > 0 && score % spawn_score == 0 && !boss_alive
}

/// Left edge for an entity of `width` entering somewhere across the playfield.
pub fn random_x(rng: &mut impl Rng, field_width: f32, width: f32) -> f32 {
    let span = field_width - width;
    if span <= 0.0 {
        return 0.0;
    }
    rng.gen_range(0.0..span)
}

pub fn random_power_up(rng: &mut impl Rng) -> PowerUpKind {
    PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())]
}
