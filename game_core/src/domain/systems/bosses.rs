// Boss movement and attack patterns.
//
// Patterns are timed in simulation milliseconds: each one runs for a fixed window, fires
// its volleys on a fixed cadence, then hands over to the next pattern in the cycle.

use crate::domain::entities::{BossPattern, BossState, Enemy, EnemyBullet, EnemyKind, IdAllocator};
use crate::domain::systems::projectiles::enemy_bullet;
use crate::domain::tuning::Playfield;
use crate::domain::tuning::enemy::BossTuning;
use crate::domain::tuning::projectile::ProjectileTuning;
use std::f32::consts::TAU;

/// Rotation added to each successive crossfire ring.
const CROSSFIRE_ROTATION: f32 = 0.1;
/// Angle step between two spiral bullets.
const SPIRAL_STEP: f32 = 0.3;

/// Moves the boss and runs its current pattern. Returns the bullets it fired.
///
/// Drones are ignored.
#[allow(clippy::too_many_arguments)]
pub fn update_boss(
    enemy: &mut Enemy,
    delta_ms: u64,
    frames: f32,
    field: &Playfield,
    player_center: (f32, f32),
    tuning: &BossTuning,
    projectiles: &ProjectileTuning,
    ids: &mut IdAllocator,
) -> Vec<EnemyBullet> {
    let Enemy {
        rect,
        speed,
        kind: EnemyKind::Boss(state),
        ..
    } = enemy
    else {
        return Vec::new();
    };

    // Descend to the hover line, then sway around the centre.
    if rect.y < tuning.hover_y {
        rect.y = (rect.y + *speed * frames).min(tuning.hover_y);
    } else {
        state.sway += tuning.sway_rate * frames;
        rect.x = field.width / 2.0 - rect.width / 2.0 + state.sway.sin() * tuning.sway_amplitude;
    }

    let origin = rect.center();
    let mut fired = Vec::new();
    state.pattern_elapsed_ms += delta_ms;

    match state.current_pattern() {
        Some(BossPattern::Crossfire) => {
            while volley_due(state, tuning.crossfire_interval_ms) {
                let offset = state.volleys as f32 * CROSSFIRE_ROTATION;
                for i in 0..tuning.crossfire_bullets {
                    let angle = TAU * i as f32 / tuning.crossfire_bullets as f32 + offset;
                    fired.push(radial(ids, origin, angle, tuning, projectiles));
                }
                state.volleys += 1;
            }
        }
        Some(BossPattern::Spiral) => {
            while volley_due(state, tuning.spiral_interval_ms) {
                let angle = state.volleys as f32 * SPIRAL_STEP;
                fired.push(radial(ids, origin, angle, tuning, projectiles));
                state.volleys += 1;
            }
        }
        Some(BossPattern::Targeted) => {
            if state.volleys == 0 && state.pattern_elapsed_ms >= tuning.targeted_delay_ms {
                let aim = (player_center.1 - origin.1).atan2(player_center.0 - origin.0);
                for spread in [-tuning.aimed_spread, 0.0, tuning.aimed_spread] {
                    fired.push(enemy_bullet(
                        ids.next_id(),
                        origin,
                        aim + spread,
                        tuning.aimed_bullet_speed,
                        projectiles.enemy_bullet_size,
                        projectiles.enemy_bullet_damage,
                    ));
                }
                state.volleys = 1;
            }
        }
        None => {}
    }

    if state.pattern_elapsed_ms >= tuning.pattern_duration_ms {
        rotate_pattern(state);
    }

    fired
}

fn volley_due(state: &BossState, interval_ms: u64) -> bool {
    interval_ms > 0 && u64::from(state.volleys + 1) * interval_ms <= state.pattern_elapsed_ms
}

fn rotate_pattern(state: &mut BossState) {
    if state.patterns.is_empty() {
        return;
    }
    state.pattern_index = (state.pattern_index + 1) % state.patterns.len();
    state.pattern_elapsed_ms = 0;
    state.volleys = 0;
}

fn radial(
    ids: &mut IdAllocator,
    origin: (f32, f32),
    angle: f32,
    tuning: &BossTuning,
    projectiles: &ProjectileTuning,
) -> EnemyBullet {
    enemy_bullet(
        ids.next_id(),
        origin,
        angle,
        tuning.radial_bullet_speed,
        projectiles.enemy_bullet_size,
        projectiles.enemy_bullet_damage,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EntityId;

    struct Rig {
        boss: Enemy,
        ids: IdAllocator,
        tuning: BossTuning,
        projectiles: ProjectileTuning,
        field: Playfield,
    }

    impl Rig {
        fn new() -> Self {
            let tuning = BossTuning::default();
            Self {
                boss: Enemy::boss(EntityId(1), 360.0, tuning.hover_y, &tuning),
                ids: IdAllocator::default(),
                tuning,
                projectiles: ProjectileTuning::default(),
                field: Playfield::default(),
            }
        }

        fn frame(&mut self) -> Vec<EnemyBullet> {
            update_boss(
                &mut self.boss,
                16,
                1.0,
                &self.field,
                (400.0, 550.0),
                &self.tuning,
                &self.projectiles,
                &mut self.ids,
            )
        }

        fn pattern(&self) -> Option<BossPattern> {
            match &self.boss.kind {
                EnemyKind::Boss(state) => state.current_pattern(),
                EnemyKind::Drone => None,
            }
        }
    }

    #[test]
    fn when_crossfire_interval_elapses_then_a_full_ring_is_fired() {
        let mut rig = Rig::new();

        let fired: usize = (0..10).map(|_| rig.frame().len()).sum();

        assert_eq!(fired, 8);
        assert_eq!(rig.pattern(), Some(BossPattern::Crossfire));
    }

    #[test]
    fn when_pattern_window_ends_then_boss_rotates_through_the_cycle() {
        let mut rig = Rig::new();

        for _ in 0..120 {
            rig.frame();
        }
        assert_eq!(rig.pattern(), Some(BossPattern::Spiral));

        for _ in 0..120 {
            rig.frame();
        }
        assert_eq!(rig.pattern(), Some(BossPattern::Targeted));

        for _ in 0..120 {
            rig.frame();
        }
        assert_eq!(rig.pattern(), Some(BossPattern::Crossfire));
    }

    #[test]
    fn when_targeting_then_one_aimed_volley_fires_per_window() {
        let mut rig = Rig::new();
        for _ in 0..240 {
            rig.frame();
        }

        let fired: Vec<EnemyBullet> = (0..120).flat_map(|_| rig.frame()).collect();

        assert_eq!(fired.len(), 3);
        // Player sits below the boss, so the middle bullet heads down.
        assert!(fired[1].vy > 0.0);
    }

    #[test]
    fn when_above_hover_line_then_boss_descends_without_sway() {
        let mut rig = Rig::new();
        rig.boss.rect.y = -80.0;
        let x = rig.boss.rect.x;

        rig.frame();

        assert_eq!(rig.boss.rect.y, -79.0);
        assert_eq!(rig.boss.rect.x, x);
    }
}
