use crate::domain::entities::{Bullet, EnemyBullet, EntityId, IdAllocator, Rect, WeaponKind};
use crate::domain::tuning::projectile::WeaponStats;
use std::f32::consts::{PI, TAU};

/// Unit vector of a heading (0 rad = up / -Y, positive turns clockwise).
pub fn heading(angle: f32) -> (f32, f32) {
    (angle.sin(), -angle.cos())
}

/// Heading that points from `from` to `to`.
pub fn heading_towards(from: (f32, f32), to: (f32, f32)) -> f32 {
    (to.0 - from.0).atan2(-(to.1 - from.1))
}

/// Wraps an angle difference into `-PI..=PI`.
fn wrap_angle(mut angle: f32) -> f32 {
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Advances a player bullet, steering towards `target` when one is given.
///
/// The heading turns at most `turn_rate` radians per frame.
pub fn advance_bullet(bullet: &mut Bullet, target: Option<(f32, f32)>, turn_rate: f32, frames: f32) {
    if let Some(target) = target {
        let desired = heading_towards(bullet.rect.center(), target);
        let max_turn = turn_rate * frames;
        let turn = wrap_angle(desired - bullet.angle).clamp(-max_turn, max_turn);
        bullet.angle = wrap_angle(bullet.angle + turn);
    }

    let (dx, dy) = heading(bullet.angle);
    bullet.rect.x += dx * bullet.speed * frames;
    bullet.rect.y += dy * bullet.speed * frames;
}

pub fn advance_enemy_bullet(bullet: &mut EnemyBullet, frames: f32) {
    bullet.rect.x += bullet.vx * frames;
    bullet.rect.y += bullet.vy * frames;
}

/// Shape of one trigger pull.
#[derive(Debug, Clone, Copy)]
pub struct VolleySpec {
    pub weapon: WeaponKind,
    pub stats: WeaponStats,
    pub damage: f32,
    /// Outer bullet angle when spread shot is on.
    pub spread: Option<f32>,
    /// Barrel offset when dual shot is on.
    pub dual_offset: Option<f32>,
}

/// Bullets for one volley fired from `muzzle` (centre x, top y).
pub fn volley(ids: &mut IdAllocator, muzzle: (f32, f32), spec: &VolleySpec) -> Vec<Bullet> {
    let angles: Vec<f32> = match spec.spread {
        Some(a) => vec![0.0, -a, a],
        None => vec![0.0],
    };
    let barrels: Vec<f32> = match spec.dual_offset {
        Some(offset) => vec![-offset, offset],
        None => vec![0.0],
    };

    let mut bullets = Vec::with_capacity(angles.len() * barrels.len());
    for offset in &barrels {
        for angle in &angles {
            bullets.push(Bullet::launch(
                ids.next_id(),
                muzzle.0 + offset,
                muzzle.1,
                *angle,
                spec.weapon,
                &spec.stats,
                spec.damage,
            ));
        }
    }
    bullets
}

/// Evenly spaced ring of bullets around `center`.
pub fn radial_burst(
    ids: &mut IdAllocator,
    center: (f32, f32),
    count: usize,
    spec: &VolleySpec,
    speed_factor: f32,
) -> Vec<Bullet> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count.max(1) as f32;
            let mut bullet = Bullet::launch(
                ids.next_id(),
                center.0,
                center.1 - spec.stats.height / 2.0,
                angle,
                spec.weapon,
                &spec.stats,
                spec.damage,
            );
            bullet.speed *= speed_factor;
            bullet
        })
        .collect()
}

/// Enemy bullet centred on `at`, moving along `direction` (radians, 0 = +X) at `speed`.
pub fn enemy_bullet(
    id: EntityId,
    at: (f32, f32),
    direction: f32,
    speed: f32,
    size: f32,
    damage: f32,
) -> EnemyBullet {
    EnemyBullet {
        id,
        rect: Rect::centered(at.0, at.1, size, size),
        vx: direction.cos() * speed,
        vy: direction.sin() * speed,
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::projectile::ProjectileTuning;

    fn laser_spec() -> VolleySpec {
        let stats = ProjectileTuning::default().laser;
        VolleySpec {
            weapon: WeaponKind::Laser,
            stats,
            damage: stats.damage,
            spread: None,
            dual_offset: None,
        }
    }

    #[test]
    fn when_flying_straight_then_bullet_moves_up_by_its_speed() {
        let mut ids = IdAllocator::default();
        let mut bullet = volley(&mut ids, (100.0, 300.0), &laser_spec()).remove(0);

        advance_bullet(&mut bullet, None, 0.1, 1.0);

        assert!((bullet.rect.y - 293.0).abs() < 1e-4);
        assert!((bullet.rect.center().0 - 100.0).abs() < 1e-4);
    }

    #[test]
    fn when_target_is_sideways_then_turn_is_capped_per_frame() {
        let mut ids = IdAllocator::default();
        let mut bullet = volley(&mut ids, (100.0, 300.0), &laser_spec()).remove(0);

        advance_bullet(&mut bullet, Some((400.0, 300.0)), 0.1, 1.0);

        assert!((bullet.angle - 0.1).abs() < 1e-5);
    }

    #[test]
    fn when_target_is_behind_across_the_seam_then_turn_takes_the_short_way() {
        let mut ids = IdAllocator::default();
        let mut bullet = volley(&mut ids, (100.0, 300.0), &laser_spec()).remove(0);
        bullet.angle = PI - 0.05;

        // Target straight down and slightly left: desired heading is just past PI.
        advance_bullet(&mut bullet, Some((99.0, 600.0)), 0.1, 1.0);

        assert!(bullet.angle < -PI + 0.1 || bullet.angle > PI - 0.05);
    }

    #[test]
    fn when_spread_and_dual_are_on_then_volley_has_six_bullets() {
        let mut ids = IdAllocator::default();
        let spec = VolleySpec {
            spread: Some(0.3),
            dual_offset: Some(10.0),
            ..laser_spec()
        };

        let bullets = volley(&mut ids, (100.0, 300.0), &spec);

        assert_eq!(bullets.len(), 6);
        assert_eq!(bullets.iter().filter(|b| b.angle == 0.0).count(), 2);
    }

    #[test]
    fn when_bursting_then_bullets_are_evenly_spaced() {
        let mut ids = IdAllocator::default();
        let bullets = radial_burst(&mut ids, (0.0, 0.0), 36, &laser_spec(), 1.5);

        assert_eq!(bullets.len(), 36);
        assert!((bullets[9].angle - PI / 2.0).abs() < 1e-5);
        assert!((bullets[0].speed - 10.5).abs() < 1e-5);
    }
}
