use crate::domain::collision::{distance, nearest_index};
use crate::domain::entities::{Companion, CompanionKind, Enemy, EntityId, Player, Rect, Spatial};
use crate::domain::systems::projectiles::heading_towards;
use crate::domain::tuning::companion::CompanionTuning;
use rand::Rng;

pub fn spawn(id: EntityId, kind: CompanionKind, around: (f32, f32), phase: f32, tuning: &CompanionTuning) -> Companion {
    let mut companion = Companion {
        id,
        kind,
        rect: Rect::centered(around.0, around.1, tuning.size, tuning.size),
        angle: phase,
        distance: tuning.orbit_distance,
        last_shot_at: None,
        last_heal_at: None,
    };
    place(&mut companion, around);
    companion
}

/// Advances the orbit phase and re-centres on the owner.
pub fn orbit(companion: &mut Companion, owner_center: (f32, f32), tuning: &CompanionTuning, frames: f32) {
    companion.angle += tuning.orbit_rate * frames;
    place(companion, owner_center);
}

fn place(companion: &mut Companion, owner_center: (f32, f32)) {
    let cx = owner_center.0 + companion.angle.cos() * companion.distance;
    let cy = owner_center.1 + companion.angle.sin() * companion.distance;
    companion.rect = Rect::centered(cx, cy, companion.rect.width, companion.rect.height);
}

/// Heading of the combat drone's next shot, if it is due and something is in range.
pub fn combat_shot(
    companion: &mut Companion,
    enemies: &[Enemy],
    now_ms: u64,
    tuning: &CompanionTuning,
) -> Option<f32> {
    if companion.kind != CompanionKind::CombatDrone {
        return None;
    }
    if companion
        .last_shot_at
        .is_some_and(|at| now_ms.saturating_sub(at) < tuning.fire_interval_ms)
    {
        return None;
    }

    let origin = companion.center();
    let target = nearest_index(enemies, origin, Some(tuning.fire_range), |e| !e.is_alive())?;
    companion.last_shot_at = Some(now_ms);
    Some(heading_towards(origin, enemies[target].center()))
}

/// Healer pulse. Returns the amount actually restored.
pub fn heal(
    companion: &mut Companion,
    player: &mut Player,
    max_health: f32,
    now_ms: u64,
    tuning: &CompanionTuning,
) -> f32 {
    if companion.kind != CompanionKind::HealerDrone || player.health >= max_health {
        return 0.0;
    }
    if companion
        .last_heal_at
        .is_some_and(|at| now_ms.saturating_sub(at) < tuning.heal_interval_ms)
    {
        return 0.0;
    }

    companion.last_heal_at = Some(now_ms);
    let before = player.health;
    player.health = (player.health + tuning.heal_amount).min(max_health);
    player.health - before
}

/// Whether a shield drone swats away an enemy bullet centred at `bullet_center`.
pub fn blocks(
    companion: &Companion,
    bullet_center: (f32, f32),
    tuning: &CompanionTuning,
    rng: &mut impl Rng,
) -> bool {
    companion.kind == CompanionKind::ShieldDrone
        && distance(companion.center(), bullet_center) < tuning.block_radius
        && rng.gen_bool(tuning.block_chance.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::enemy::EnemyTuning;
    use crate::domain::tuning::player::PlayerTuning;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn when_orbiting_then_drone_stays_at_orbit_distance() {
        let tuning = CompanionTuning::default();
        let mut drone = spawn(EntityId(1), CompanionKind::CombatDrone, (200.0, 200.0), 0.0, &tuning);

        orbit(&mut drone, (300.0, 300.0), &tuning, 1.0);

        assert!((distance(drone.center(), (300.0, 300.0)) - 50.0).abs() < 1e-3);
        assert!((drone.angle - 0.02).abs() < 1e-6);
    }

    #[test]
    fn when_enemy_is_in_range_then_combat_drone_fires_at_most_every_interval() {
        let tuning = CompanionTuning::default();
        let mut drone = spawn(EntityId(1), CompanionKind::CombatDrone, (200.0, 300.0), 0.0, &tuning);
        let enemies = vec![Enemy::drone(EntityId(2), 235.0, 100.0, &EnemyTuning::default())];

        let angle = combat_shot(&mut drone, &enemies, 0, &tuning).expect("target in range");
        assert!(angle.abs() < 0.1);
        assert_eq!(combat_shot(&mut drone, &enemies, 499, &tuning), None);
        assert!(combat_shot(&mut drone, &enemies, 500, &tuning).is_some());
    }

    #[test]
    fn when_nothing_is_in_range_then_combat_drone_holds_fire() {
        let tuning = CompanionTuning::default();
        let mut drone = spawn(EntityId(1), CompanionKind::CombatDrone, (200.0, 500.0), 0.0, &tuning);
        let enemies = vec![Enemy::drone(EntityId(2), 600.0, 0.0, &EnemyTuning::default())];

        assert_eq!(combat_shot(&mut drone, &enemies, 0, &tuning), None);
        assert_eq!(drone.last_shot_at, None);
    }

    #[test]
    fn when_player_is_hurt_then_healer_pulses_on_its_interval() {
        let tuning = CompanionTuning::default();
        let player_tuning = PlayerTuning::default();
        let mut player = Player::spawn(&player_tuning, 800.0, 600.0);
        player.health = 97.0;
        let mut healer = spawn(EntityId(1), CompanionKind::HealerDrone, (0.0, 0.0), 0.0, &tuning);

        assert_eq!(heal(&mut healer, &mut player, 100.0, 0, &tuning), 3.0);
        player.health = 50.0;
        assert_eq!(heal(&mut healer, &mut player, 100.0, 2_999, &tuning), 0.0);
        assert_eq!(heal(&mut healer, &mut player, 100.0, 3_000, &tuning), 5.0);
    }

    #[test]
    fn when_block_chance_is_certain_then_nearby_bullets_are_blocked() {
        let tuning = CompanionTuning {
            block_chance: 1.0,
            ..Default::default()
        };
        let shield = spawn(EntityId(1), CompanionKind::ShieldDrone, (100.0, 100.0), 0.0, &tuning);
        let mut rng = StdRng::seed_from_u64(7);

        assert!(blocks(&shield, shield.center(), &tuning, &mut rng));
        assert!(!blocks(&shield, (400.0, 400.0), &tuning, &mut rng));
    }
}
