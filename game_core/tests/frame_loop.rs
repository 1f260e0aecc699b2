mod support;

use game_core::domain::progression::SkillError;
use game_core::domain::state::{InputState, Key};
use game_core::domain::tuning::Tuning;
use game_core::domain::{Ability, Skill, SkillCategory, WeaponKind};
use game_core::use_cases::StopReason;
use game_core::{Command, HeadlessSettings, World, WorldEvent, WorldStatus};
use std::time::Duration;
use support::{FRAME_MS, kill, quiet_world, run_frames};

#[test]
fn when_a_busy_world_runs_then_every_retained_entity_stays_in_bounds() {
    let mut world = World::new(42);
    let field = world.tuning().playfield;

    for tick in 0..2_000u64 {
        let heading = if (tick / 120) % 2 == 0 { Key::Left } else { Key::Right };
        world.set_input(InputState::with_keys([Key::Fire, heading]));
        world.tick(FRAME_MS);

        assert!(world.player().rect.is_valid());
        assert!(field.overlaps(&world.player().rect));
        for enemy in world.enemies() {
            assert!(enemy.rect.is_valid());
            assert!(field.above_bottom(&enemy.rect), "enemy {:?} below the field", enemy.id);
        }
        for bullet in world.bullets() {
            assert!(bullet.rect.is_valid());
            assert!(field.overlaps(&bullet.rect));
        }
        for bullet in world.enemy_bullets() {
            assert!(bullet.rect.is_valid());
            assert!(field.overlaps(&bullet.rect));
        }
        for power_up in world.power_ups() {
            assert!(field.above_bottom(&power_up.rect));
        }
        assert!(world.particles().iter().all(|p| p.rect.is_valid() && p.alpha > 0.0));
    }
}

#[test]
fn when_two_bullets_hit_a_fresh_drone_then_it_dies_on_the_second() {
    let mut world = quiet_world(1);
    let drone = world.spawn_drone_at(100.0, 100.0);

    let ticks = kill(&mut world, drone);

    assert_eq!(ticks, 2);
    assert_eq!(world.progression().score, 10);
    assert_eq!(world.progression().combo, 1);
}

#[test]
fn when_kills_follow_within_the_window_then_combo_multiplies_the_score() {
    let mut world = quiet_world(2);
    let first = world.spawn_drone_at(100.0, 100.0);
    let second = world.spawn_drone_at(200.0, 100.0);
    let third = world.spawn_drone_at(300.0, 100.0);

    kill(&mut world, first);
    run_frames(&mut world, 100);
    assert_eq!(world.progression().combo, 1);

    kill(&mut world, second);
    assert_eq!(world.progression().score, 20);
    assert_eq!(world.progression().combo, 2);

    kill(&mut world, third);
    assert_eq!(world.progression().score, 40);
    assert_eq!(world.progression().combo, 3);
    assert_eq!(world.progression().max_combo, 3);
}

#[test]
fn when_no_kill_lands_within_two_seconds_then_combo_resets() {
    let mut world = quiet_world(3);
    let drone = world.spawn_drone_at(100.0, 100.0);
    kill(&mut world, drone);

    run_frames(&mut world, 124);
    assert_eq!(world.progression().combo, 1);

    run_frames(&mut world, 1);
    assert_eq!(world.progression().combo, 0);
    assert_eq!(world.progression().max_combo, 1);
}

#[test]
fn when_score_crosses_the_threshold_again_then_no_second_boss_spawns() {
    let mut tuning = Tuning::default();
    tuning.enemy.spawn_interval_ms = 0;
    tuning.pickup.spawn_interval_ms = u64::MAX;
    let mut world = World::with_tuning(4, tuning);

    world.progression_mut().score = 100;
    run_frames(&mut world, 5);
    world.progression_mut().score = 200;
    run_frames(&mut world, 5);

    let bosses = world.enemies().iter().filter(|e| e.is_boss()).count();
    assert_eq!(bosses, 1);
    let announced = world
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, WorldEvent::BossSpawned { .. }))
        .count();
    assert_eq!(announced, 1);
}

#[test]
fn when_cooldown_elapses_then_the_ability_can_be_used_again() {
    let mut world = quiet_world(5);
    assert!(world.activate_ability(Ability::TimeStop));
    assert!(!world.activate_ability(Ability::TimeStop));

    // 937 frames = 14_992 ms, just short of the 15 s cooldown.
    run_frames(&mut world, 937);
    assert!(!world.abilities().is_ready(Ability::TimeStop));
    world.drain_events();

    run_frames(&mut world, 1);
    assert!(world.abilities().is_ready(Ability::TimeStop));
    assert!(
        world
            .drain_events()
            .contains(&WorldEvent::AbilityReady(Ability::TimeStop))
    );
    assert!(world.apply_command(Command::Activate(Ability::TimeStop)));
}

#[test]
fn when_a_skill_is_unlocked_twice_then_points_are_spent_once() {
    let mut world = quiet_world(6);
    world.progression_mut().skill_points = 10;

    assert!(world.apply_command(Command::UnlockSkill {
        category: SkillCategory::Weapons,
        skill: Skill::RapidFire,
    }));
    assert_eq!(
        world.unlock_skill(SkillCategory::Weapons, Skill::RapidFire),
        Err(SkillError::AlreadyUnlocked)
    );

    assert_eq!(world.progression().skill_points, 6);
    assert_eq!(world.progression().unlocked.len(), 1);
    assert!((world.player().shoot_delay_ms - 175.0).abs() < 1e-3);
}

#[test]
fn when_the_homing_target_dies_then_the_missile_flies_on_untargeted() {
    let mut world = quiet_world(7);
    let drone = world.spawn_drone_at(100.0, 100.0);
    world.apply_command(Command::SelectWeapon(WeaponKind::Missile));
    world.set_input(InputState::with_keys([Key::Fire]));
    world.tick(FRAME_MS);
    world.set_input(InputState::default());
    assert_eq!(world.bullets()[0].target, Some(drone));

    world.enemies_mut()[0].health = 0.0;
    run_frames(&mut world, 2);

    assert!(world.enemies().is_empty());
    assert_eq!(world.bullets().len(), 1);
    assert_eq!(world.bullets()[0].target, None);
}

#[test]
fn when_two_worlds_share_a_seed_and_input_then_they_stay_identical() {
    let mut a = World::new(99);
    let mut b = World::new(99);
    let input = InputState::with_keys([Key::Fire, Key::Right]);
    a.set_input(input.clone());
    b.set_input(input);

    for _ in 0..600 {
        a.tick(FRAME_MS);
        b.tick(FRAME_MS);
    }

    assert_eq!(a.hud(), b.hud());
    assert_eq!(a.views(), b.views());
}

#[test]
fn when_the_player_dies_then_only_restart_brings_the_world_back() {
    let mut world = quiet_world(8);
    world.player_mut().health = 5.0;
    let (x, y) = (world.player().rect.x, world.player().rect.y);
    world.spawn_drone_at(x, y - 10.0);
    world.tick(FRAME_MS);
    assert_eq!(world.status(), WorldStatus::GameOver);

    assert!(!world.apply_command(Command::TogglePause));
    assert!(!world.apply_command(Command::ActivateUltimate));
    assert!(world.apply_command(Command::Restart));

    assert_eq!(world.status(), WorldStatus::Running);
    assert_eq!(world.player().health, 100.0);
}

#[tokio::test(start_paused = true)]
async fn when_the_headless_runner_finishes_then_it_reports_a_played_session() {
    let summary = game_core::run_headless(HeadlessSettings {
        seed: 11,
        tick_interval: Duration::from_millis(16),
        run_duration: Duration::from_secs(3),
    })
    .await
    .expect("headless run");

    assert!(summary.ticks > 0);
    assert!(summary.world.now_ms() > 0);
    assert!(matches!(
        summary.reason,
        StopReason::Shutdown | StopReason::GameOver
    ));
    assert!(!summary.world.companions().is_empty());
}
