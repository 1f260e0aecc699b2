// The frame scheduler: one `World` owns every entity, registry and timer and advances
// them in a fixed order on each tick.

use super::types::{Command, WorldEvent, WorldStatus};
use crate::domain::abilities::{Ability, AbilityRegistry};
use crate::domain::collision::{collides, distance, nearest_index};
use crate::domain::effects::{self, EffectModifiers};
use crate::domain::entities::{
    Bullet, Companion, CompanionKind, Element, Enemy, EnemyBullet, EntityId, IdAllocator,
    Particle, Player, PowerUp, PowerUpKind, Rect, Spatial, WeaponKind,
};
use crate::domain::progression::{Progression, Skill, SkillCategory, SkillError};
use crate::domain::state::{AbilityHud, AudioCue, EntityView, HudState, InputState, Key, RenderKind};
use crate::domain::systems::projectiles::{self, VolleySpec};
use crate::domain::systems::{bosses, companions, movement, spawner};
use crate::domain::timeline::{DeferredAction, Timeline};
use crate::domain::tuning::{FRAME_MS, Tuning};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

const PARTICLE_SIZE: f32 = 3.0;
const PARTICLE_SPEED: f32 = 3.0;
const HIT_PARTICLES: usize = 5;
const BLOCK_PARTICLES: usize = 4;
const BLACK_HOLE_SIZE: f32 = 40.0;

const PLAYER_COLORS: [&str; 2] = ["#00ff00", "#ffaa00"];
const DRONE_COLORS: [&str; 2] = ["#ff0000", "#ffaa00"];
const BOSS_COLORS: [&str; 2] = ["#ff00ff", "#ffffff"];
const HIT_COLORS: [&str; 2] = ["#ffffff", "#ffff00"];

/// HUD fields whose change triggers a `HudChanged` event.
#[derive(Debug, PartialEq)]
struct HudSignature {
    score: u64,
    health: f32,
    combo: u32,
    level: u32,
    skill_points: u32,
    ultimate_charge: f32,
    weapon: WeaponKind,
    element: Option<Element>,
    status: WorldStatus,
    abilities: [(bool, bool); 3],
}

pub struct World {
    tuning: Tuning,
    rng: StdRng,
    ids: IdAllocator,
    now_ms: u64,
    status: WorldStatus,

    player: Player,
    companions: Vec<Companion>,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    enemy_bullets: Vec<EnemyBullet>,
    particles: Vec<Particle>,
    power_ups: Vec<PowerUp>,

    abilities: AbilityRegistry,
    /// Anchor of the active black hole.
    black_hole: Option<(f32, f32)>,
    timeline: Timeline,
    progression: Progression,

    ultimate_charge: f32,
    ultimate_active: bool,

    last_enemy_spawn_at: u64,
    last_power_up_at: u64,

    input: InputState,
    events: Vec<WorldEvent>,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::build(tuning, StdRng::seed_from_u64(seed))
    }

    fn build(tuning: Tuning, rng: StdRng) -> Self {
        let field = tuning.playfield;
        Self {
            player: Player::spawn(&tuning.player, field.width, field.height),
            abilities: AbilityRegistry::new(tuning.ability),
            progression: Progression::new(tuning.progression),
            tuning,
            rng,
            ids: IdAllocator::default(),
            now_ms: 0,
            status: WorldStatus::Running,
            companions: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            black_hole: None,
            timeline: Timeline::new(),
            ultimate_charge: 0.0,
            ultimate_active: false,
            last_enemy_spawn_at: 0,
            last_power_up_at: 0,
            input: InputState::default(),
            events: Vec::new(),
        }
    }

    /// Advances the simulation by `delta_ms`. No-op unless the world is running.
    pub fn tick(&mut self, delta_ms: u64) {
        if self.status != WorldStatus::Running {
            return;
        }
        let before = self.hud_signature();
        let frames = delta_ms as f32 / FRAME_MS;

        self.now_ms += delta_ms;
        self.run_due_actions();
        self.age_abilities();
        self.pull_into_black_hole(frames);
        self.progression.decay_combo(delta_ms);
        self.charge_ultimate(frames);
        self.spawn_power_up();
        self.update_power_ups(frames);
        self.spawn_enemy();
        self.update_player(frames);
        self.update_companions(frames);
        self.update_bullets(frames);
        self.update_enemy_bullets(frames);
        self.update_enemies(delta_ms, frames);
        self.particles
            .retain_mut(|particle| movement::advance_particle(particle, frames));

        if self.hud_signature() != before {
            let hud = self.hud();
            self.events.push(WorldEvent::HudChanged(hud));
        }
    }

    /// Applies a discrete command. Returns false when it was rejected.
    ///
    /// Gameplay commands only apply while running; pause, restart and skill unlocks are
    /// accepted in any state.
    pub fn apply_command(&mut self, command: Command) -> bool {
        let before = self.hud_signature();
        let accepted = match command {
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => {
                self.restart();
                true
            }
            Command::UnlockSkill { category, skill } => self.unlock_skill(category, skill).is_ok(),
            _ if self.status != WorldStatus::Running => {
                debug!(?command, status = ?self.status, "command ignored");
                false
            }
            Command::SelectWeapon(weapon) => {
                self.player.weapon = weapon;
                true
            }
            Command::CycleElement => {
                self.player.element = Some(Element::cycle(self.player.element));
                true
            }
            Command::Activate(ability) => self.activate_ability(ability),
            Command::ActivateUltimate => self.activate_ultimate(),
            Command::AddCompanion(kind) => {
                self.add_companion(kind);
                true
            }
        };

        if self.hud_signature() != before {
            let hud = self.hud();
            self.events.push(WorldEvent::HudChanged(hud));
        }
        accepted
    }

    /// Starts an ability and schedules both its end and its cooldown.
    pub fn activate_ability(&mut self, ability: Ability) -> bool {
        if self.status != WorldStatus::Running {
            return false;
        }
        let duration_scale = if ability == Ability::TimeStop && self.progression.has(Skill::TimeMaster) {
            self.tuning.ability.time_master_factor
        } else {
            1.0
        };

        let Some(activation) = self.abilities.activate(ability, self.now_ms, duration_scale) else {
            debug!(?ability, "ability not ready");
            return false;
        };
        self.timeline
            .schedule(activation.ends_at, DeferredAction::AbilityEnded(ability));
        self.timeline
            .schedule(activation.ready_at, DeferredAction::AbilityReady(ability));

        match ability {
            Ability::Shield => self.player.shield_active = true,
            Ability::BlackHole => self.black_hole = Some(self.input.pointer),
            Ability::TimeStop => {}
        }
        debug!(?ability, ends_at = activation.ends_at, ready_at = activation.ready_at, "ability activated");
        self.events.push(WorldEvent::AbilityActivated(ability));
        true
    }

    /// Fires the ultimate when fully charged.
    pub fn activate_ultimate(&mut self) -> bool {
        if self.status != WorldStatus::Running
            || self.ultimate_active
            || self.ultimate_charge < self.tuning.ability.ultimate_max
        {
            debug!(charge = self.ultimate_charge, "ultimate not ready");
            return false;
        }

        self.ultimate_charge = 0.0;
        self.ultimate_active = true;
        self.timeline.schedule(
            self.now_ms + self.tuning.ability.ultimate_duration_ms,
            DeferredAction::UltimateEnded,
        );

        let spec = self.volley_spec(self.player.weapon);
        let mut burst = projectiles::radial_burst(
            &mut self.ids,
            self.player.center(),
            self.tuning.ability.ultimate_projectiles,
            &spec,
            self.tuning.ability.ultimate_speed_factor,
        );
        for bullet in &mut burst {
            bullet.element = self.player.element;
        }
        self.bullets.extend(burst);
        self.events.push(WorldEvent::Audio(AudioCue::Shoot));
        info!("ultimate unleashed");
        self.record_achievements();
        true
    }

    /// Spends skill points and applies the permanent effect.
    pub fn unlock_skill(&mut self, category: SkillCategory, skill: Skill) -> Result<(), SkillError> {
        if let Err(e) = self.progression.unlock_skill(category, skill) {
            debug!(skill = skill.name(), error = ?e, "skill unlock rejected");
            return Err(e);
        }

        match skill {
            Skill::DualShot => self.player.dual_shot = true,
            Skill::RapidFire => self.player.shoot_delay_ms *= self.tuning.player.rapid_fire_factor,
            // Everything else is read from the unlocked set when it matters.
            _ => {}
        }
        info!(skill = skill.name(), skill_points = self.progression.skill_points, "skill unlocked");
        Ok(())
    }

    pub fn add_companion(&mut self, kind: CompanionKind) -> EntityId {
        let id = self.ids.next_id();
        // Spread drones evenly around the orbit.
        let phase = self.companions.len() as f32 * std::f32::consts::FRAC_PI_2;
        let companion = companions::spawn(id, kind, self.player.center(), phase, &self.tuning.companion);
        self.companions.push(companion);
        debug!(companion_id = id.0, ?kind, "companion added");
        id
    }

    fn toggle_pause(&mut self) -> bool {
        self.status = match self.status {
            WorldStatus::Running => WorldStatus::Paused,
            WorldStatus::Paused => WorldStatus::Running,
            WorldStatus::GameOver => return false,
        };
        info!(status = ?self.status, "pause toggled");
        true
    }

    fn restart(&mut self) {
        let rng = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0));
        *self = Self::build(self.tuning.clone(), rng);
        info!("world restarted");
    }

    // Step 0: deferred actions due at or before now, in due order.
    fn run_due_actions(&mut self) {
        while let Some((due_ms, action)) = self.timeline.pop_due(self.now_ms) {
            match action {
                DeferredAction::AbilityEnded(ability) => {
                    if self.abilities.end(ability) {
                        match ability {
                            Ability::Shield => self.player.shield_active = false,
                            Ability::BlackHole => self.black_hole = None,
                            Ability::TimeStop => {}
                        }
                        debug!(?ability, "ability ended");
                        self.events.push(WorldEvent::AbilityEnded(ability));
                    }
                }
                DeferredAction::AbilityReady(_) => self.age_abilities(),
                DeferredAction::Burn {
                    target,
                    remaining,
                    damage,
                } => {
                    if let Some(spark) = effects::burn_tick(
                        target,
                        remaining,
                        damage,
                        due_ms,
                        &mut self.enemies,
                        &mut self.timeline,
                        &self.tuning.element,
                    ) {
                        self.burst((spark.x, spark.y), 2, &[spark.color]);
                    }
                }
                DeferredAction::Thaw {
                    target,
                    original_speed,
                } => {
                    effects::thaw(target, original_speed, &mut self.enemies);
                }
                DeferredAction::SpeedBoostEnded => {
                    if self.player.speed_boost_until == Some(due_ms) {
                        self.player.speed_boost_until = None;
                        self.player.speed = self.tuning.player.base_speed;
                    }
                }
                DeferredAction::SpreadShotEnded => {
                    if self.player.spread_shot_until == Some(due_ms) {
                        self.player.spread_shot_until = None;
                        self.player.spread_shot = false;
                    }
                }
                DeferredAction::UltimateEnded => self.ultimate_active = false,
            }
        }
    }

    // Step 1.
    fn age_abilities(&mut self) {
        for ability in self.abilities.age(self.now_ms) {
            debug!(?ability, "ability ready");
            self.events.push(WorldEvent::AbilityReady(ability));
        }
    }

    // Step 2.
    fn pull_into_black_hole(&mut self, frames: f32) {
        if !self.abilities.is_active(Ability::BlackHole) {
            return;
        }
        let Some(hole) = self.black_hole else {
            return;
        };

        let mut radius = self.tuning.ability.black_hole_radius;
        if self.progression.has(Skill::GravityWell) {
            radius *= self.tuning.ability.gravity_well_factor;
        }
        let pull = self.tuning.ability.black_hole_pull * frames;
        for enemy in &mut self.enemies {
            if distance(enemy.center(), hole) < radius {
                movement::pull_towards(&mut enemy.rect, hole, pull);
            }
        }
    }

    // Step 4.
    fn charge_ultimate(&mut self, frames: f32) {
        let max = self.tuning.ability.ultimate_max;
        if self.ultimate_active || self.ultimate_charge >= max {
            return;
        }
        let mut rate = self.tuning.ability.ultimate_charge_rate;
        if self.progression.has(Skill::UltimatePower) {
            rate *= self.tuning.ability.ultimate_power_factor;
        }
        self.ultimate_charge = (self.ultimate_charge + rate * frames).min(max);
    }

    // Step 5.
    fn spawn_power_up(&mut self) {
        let pickup = self.tuning.pickup;
        if !spawner::interval_elapsed(self.now_ms, self.last_power_up_at, pickup.spawn_interval_ms) {
            return;
        }
        self.last_power_up_at = self.now_ms;
        let kind = spawner::random_power_up(&mut self.rng);
        let x = spawner::random_x(&mut self.rng, self.tuning.playfield.width, pickup.size);
        self.spawn_power_up_at(kind, x, -pickup.size);
    }

    // Step 6.
    fn update_power_ups(&mut self, frames: f32) {
        let fall_speed = self.tuning.pickup.fall_speed;
        let power_ups = std::mem::take(&mut self.power_ups);
        let mut kept = Vec::with_capacity(power_ups.len());
        for mut power_up in power_ups {
            movement::fall(&mut power_up.rect, fall_speed, frames);
            if collides(&power_up, &self.player) {
                self.collect(power_up.kind, power_up.center());
            } else if self.tuning.playfield.above_bottom(&power_up.rect) {
                kept.push(power_up);
            }
        }
        self.power_ups = kept;
    }

    fn collect(&mut self, kind: PowerUpKind, at: (f32, f32)) {
        let pickup = self.tuning.pickup;
        let until = self.now_ms + pickup.buff_duration_ms;
        match kind {
            PowerUpKind::Health => {
                self.player.health = (self.player.health + pickup.heal_amount).min(self.tuning.player.max_health);
            }
            PowerUpKind::Speed => {
                self.player.speed = self.tuning.player.boosted_speed;
                self.player.speed_boost_until = Some(until);
                self.timeline.schedule(until, DeferredAction::SpeedBoostEnded);
            }
            PowerUpKind::Spread => {
                self.player.spread_shot = true;
                self.player.spread_shot_until = Some(until);
                self.timeline.schedule(until, DeferredAction::SpreadShotEnded);
            }
        }
        debug!(?kind, "power-up collected");
        self.events.push(WorldEvent::Audio(AudioCue::PowerUp));
        self.burst(at, pickup.particles, &kind.colors());
    }

    // Step 7.
    fn spawn_enemy(&mut self) {
        let enemy = self.tuning.enemy;
        if !spawner::interval_elapsed(self.now_ms, self.last_enemy_spawn_at, enemy.spawn_interval_ms) {
            return;
        }
        self.last_enemy_spawn_at = self.now_ms;

        let boss = self.tuning.boss;
        let boss_alive = self.enemies.iter().any(Enemy::is_boss);
        if spawner::should_spawn_boss(self.progression.score, boss.spawn_score, boss_alive) {
            let x = self.tuning.playfield.width / 2.0 - boss.size / 2.0;
            let id = self.spawn_boss_at(x, -boss.size);
            info!(boss_id = id.0, score = self.progression.score, "boss spawned");
            self.events.push(WorldEvent::BossSpawned { boss_id: id.0 });
        } else {
            let x = spawner::random_x(&mut self.rng, self.tuning.playfield.width, enemy.width);
            self.spawn_drone_at(x, -enemy.height);
        }
    }

    // Step 8, first half.
    fn update_player(&mut self, frames: f32) {
        movement::move_player(&mut self.player, &self.input, frames, &self.tuning.playfield);

        let now_ms = self.now_ms;
        let delay = self.player.shoot_delay_ms;
        let cooled = self
            .player
            .last_shot_at
            .is_none_or(|at| now_ms.saturating_sub(at) as f32 > delay);
        if self.input.is_down(Key::Fire) && cooled {
            self.fire();
        }
    }

    fn fire(&mut self) {
        let spec = self.volley_spec(self.player.weapon);
        let muzzle = (self.player.center().0, self.player.rect.y);
        let mut volley = projectiles::volley(&mut self.ids, muzzle, &spec);
        for bullet in &mut volley {
            self.arm(bullet, spec.stats.tracking);
        }
        self.bullets.extend(volley);
        self.player.last_shot_at = Some(self.now_ms);
        self.events.push(WorldEvent::Audio(AudioCue::Shoot));
    }

    fn volley_spec(&self, weapon: WeaponKind) -> VolleySpec {
        let player = &self.tuning.player;
        VolleySpec {
            weapon,
            stats: self.tuning.projectile.weapon(weapon),
            damage: self.weapon_damage(weapon),
            spread: self.player.spread_shot.then_some(player.spread_angle),
            dual_offset: self.player.dual_shot.then_some(player.dual_shot_offset),
        }
    }

    /// Base damage times the weapon's mastery multiplier.
    pub fn weapon_damage(&self, weapon: WeaponKind) -> f32 {
        let mastery = match weapon {
            WeaponKind::Laser => Skill::LaserMastery,
            WeaponKind::Plasma => Skill::PlasmaMastery,
            WeaponKind::Missile => Skill::MissileMastery,
        };
        let base = self.tuning.projectile.weapon(weapon).damage;
        if self.progression.has(mastery) {
            base * self.tuning.projectile.mastery_factor
        } else {
            base
        }
    }

    /// Copies the ship's element onto a fresh bullet and locks a homing target.
    fn arm(&self, bullet: &mut Bullet, tracking: bool) {
        bullet.element = self.player.element;
        if self.progression.has(Skill::ElementalHarmony) {
            bullet.secondary_element = self.player.element.map(Element::next);
        }
        if tracking {
            bullet.target = nearest_index(&self.enemies, bullet.center(), None, |e| !e.is_alive())
                .map(|i| self.enemies[i].id);
        }
    }

    // Step 8, second half.
    fn update_companions(&mut self, frames: f32) {
        let owner = self.player.center();
        let mut shots = Vec::new();
        for companion in &mut self.companions {
            companions::orbit(companion, owner, &self.tuning.companion, frames);
            if let Some(angle) =
                companions::combat_shot(companion, &self.enemies, self.now_ms, &self.tuning.companion)
            {
                shots.push((companion.center(), angle));
            }
            companions::heal(
                companion,
                &mut self.player,
                self.tuning.player.max_health,
                self.now_ms,
                &self.tuning.companion,
            );
        }

        let stats = self.tuning.projectile.laser;
        let damage = self.weapon_damage(WeaponKind::Laser);
        for (at, angle) in shots {
            let bullet = Bullet::launch(
                self.ids.next_id(),
                at.0,
                at.1 - stats.height / 2.0,
                angle,
                WeaponKind::Laser,
                &stats,
                damage,
            );
            self.bullets.push(bullet);
        }
    }

    // Step 9.
    fn update_bullets(&mut self, frames: f32) {
        let homing = !self.abilities.is_active(Ability::TimeStop);
        let turn_rate = self.tuning.projectile.homing_turn_rate;
        let field = self.tuning.playfield;
        let enemies = &self.enemies;

        self.bullets.retain_mut(|bullet| {
            let target = bullet
                .target
                .and_then(|id| enemies.iter().find(|e| e.id == id && e.is_alive()));
            if bullet.target.is_some() && target.is_none() {
                bullet.target = None;
            }
            let aim = if homing { target.map(|e| e.center()) } else { None };
            projectiles::advance_bullet(bullet, aim, turn_rate, frames);
            field.overlaps(&bullet.rect)
        });
    }

    // Step 9b.
    fn update_enemy_bullets(&mut self, frames: f32) {
        let time_stopped = self.abilities.is_active(Ability::TimeStop);
        let bullets = std::mem::take(&mut self.enemy_bullets);
        let mut kept = Vec::with_capacity(bullets.len());

        for mut bullet in bullets {
            if !time_stopped {
                projectiles::advance_enemy_bullet(&mut bullet, frames);
            }
            let center = bullet.center();

            let tuning = &self.tuning.companion;
            let rng = &mut self.rng;
            if self
                .companions
                .iter()
                .any(|c| companions::blocks(c, center, tuning, &mut *rng))
            {
                self.burst(center, BLOCK_PARTICLES, &[CompanionKind::ShieldDrone.color()]);
                continue;
            }

            if collides(&bullet, &self.player) {
                if !self.player.shield_active {
                    self.damage_player(bullet.damage);
                    self.burst(center, self.tuning.enemy.explosion_particles / 2, &PLAYER_COLORS);
                    self.events.push(WorldEvent::Audio(AudioCue::Explosion));
                } else if self.progression.has(Skill::ShieldMaster) {
                    self.reflect(&bullet);
                }
                continue;
            }

            if self.tuning.playfield.overlaps(&bullet.rect) {
                kept.push(bullet);
            }
        }
        self.enemy_bullets = kept;
    }

    /// Turns an absorbed enemy bullet around as a player bullet.
    fn reflect(&mut self, bullet: &EnemyBullet) {
        let stats = self.tuning.projectile.laser;
        let (x, y) = bullet.center();
        let mut reflected = Bullet::launch(
            self.ids.next_id(),
            x,
            y - stats.height / 2.0,
            (-bullet.vx).atan2(bullet.vy),
            WeaponKind::Laser,
            &stats,
            bullet.damage,
        );
        reflected.speed = bullet.vx.hypot(bullet.vy);
        self.bullets.push(reflected);
    }

    // Step 10.
    fn update_enemies(&mut self, delta_ms: u64, frames: f32) {
        let time_stopped = self.abilities.is_active(Ability::TimeStop);
        let player_center = self.player.center();
        let enemies = std::mem::take(&mut self.enemies);
        let mut survivors = Vec::with_capacity(enemies.len());
        let mut triggered: Vec<(Element, EntityId, (f32, f32))> = Vec::new();

        for mut enemy in enemies {
            if !time_stopped {
                if enemy.is_boss() {
                    let fired = bosses::update_boss(
                        &mut enemy,
                        delta_ms,
                        frames,
                        &self.tuning.playfield,
                        player_center,
                        &self.tuning.boss,
                        &self.tuning.projectile,
                        &mut self.ids,
                    );
                    // Volleys fired while the boss is still entering start off screen.
                    let field = self.tuning.playfield;
                    self.enemy_bullets
                        .extend(fired.into_iter().filter(|b| field.overlaps(&b.rect)));
                } else {
                    movement::fall(&mut enemy.rect, enemy.speed, frames);
                }
            }

            for (elements, at) in self.strike(&mut enemy) {
                self.burst(at, HIT_PARTICLES, &HIT_COLORS);
                triggered.extend(elements.into_iter().flatten().map(|element| (element, enemy.id, at)));
            }

            if !enemy.is_alive() {
                self.kill(&enemy);
                continue;
            }

            if collides(&enemy, &self.player) {
                if !self.player.shield_active {
                    self.damage_player(self.tuning.player.contact_damage);
                }
                self.burst(enemy.center(), self.tuning.enemy.explosion_particles, &PLAYER_COLORS);
                self.events.push(WorldEvent::Audio(AudioCue::Explosion));
                continue;
            }

            if self.tuning.playfield.above_bottom(&enemy.rect) {
                survivors.push(enemy);
            }
        }
        self.enemies = survivors;

        // Effects run after the pass so they see every survivor.
        let modifiers = self.effect_modifiers();
        for (element, target, origin) in triggered {
            let sparks = effects::apply(
                element,
                target,
                origin,
                &mut self.enemies,
                &mut self.timeline,
                self.now_ms,
                &self.tuning.element,
                &modifiers,
            );
            for spark in sparks {
                self.burst((spark.x, spark.y), self.tuning.element.particles, &[spark.color]);
            }
        }
        self.reap_dead();
    }

    /// Consumes every live bullet overlapping `enemy` until it dies.
    ///
    /// Returns the elements each hit carried and where it landed.
    fn strike(&mut self, enemy: &mut Enemy) -> Vec<([Option<Element>; 2], (f32, f32))> {
        let mut hits = Vec::new();
        self.bullets.retain(|bullet| {
            if !enemy.is_alive() || !collides(bullet, &*enemy) {
                return true;
            }
            enemy.health -= bullet.damage;
            hits.push(([bullet.element, bullet.secondary_element], bullet.center()));
            false
        });
        hits
    }

    fn reap_dead(&mut self) {
        let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
            std::mem::take(&mut self.enemies).into_iter().partition(|e| !e.is_alive());
        self.enemies = alive;
        for enemy in &dead {
            self.kill(enemy);
        }
    }

    fn kill(&mut self, enemy: &Enemy) {
        let (score, experience, colors) = if enemy.is_boss() {
            (self.tuning.boss.score, self.tuning.boss.experience, BOSS_COLORS)
        } else {
            (self.tuning.enemy.score, self.tuning.enemy.experience, DRONE_COLORS)
        };

        let awarded = self.progression.register_kill(score);
        if enemy.is_boss() {
            self.progression.bosses_killed += 1;
            info!(boss_id = enemy.id.0, awarded, "boss defeated");
        }
        debug!(
            enemy_id = enemy.id.0,
            awarded,
            combo = self.progression.combo,
            "enemy destroyed"
        );

        if self.progression.gain_experience(experience) > 0 {
            let level = self.progression.level;
            let skill_points = self.progression.skill_points;
            info!(level, skill_points, "level up");
            self.events.push(WorldEvent::LevelUp {
                level,
                skill_points,
            });
        }

        self.burst(enemy.center(), self.tuning.enemy.explosion_particles, &colors);
        self.events.push(WorldEvent::Audio(AudioCue::Explosion));
        self.record_achievements();
    }

    fn record_achievements(&mut self) {
        for achievement in self.progression.check_achievements(self.ultimate_active) {
            info!(achievement = achievement.title(), "achievement unlocked");
            self.events.push(WorldEvent::AchievementUnlocked(achievement));
        }
    }

    fn damage_player(&mut self, amount: f32) {
        self.player.health = (self.player.health - amount).max(0.0);
        if !self.player.is_alive() && self.status != WorldStatus::GameOver {
            self.status = WorldStatus::GameOver;
            let score = self.progression.score;
            info!(
                score,
                level = self.progression.level,
                max_combo = self.progression.max_combo,
                "game over"
            );
            self.events.push(WorldEvent::GameOver { score });
        }
    }

    fn effect_modifiers(&self) -> EffectModifiers {
        let element = &self.tuning.element;
        let scale = |skill: Skill, factor: f32| if self.progression.has(skill) { factor } else { 1.0 };
        EffectModifiers {
            burn_damage_scale: scale(Skill::FireMastery, element.fire_mastery_factor),
            freeze_duration_scale: scale(Skill::IceMastery, element.ice_mastery_factor),
            extra_chain_hops: u32::from(self.progression.has(Skill::LightningMastery)),
            implode_radius_scale: scale(Skill::VoidMastery, element.void_mastery_factor),
        }
    }

    fn burst(&mut self, at: (f32, f32), count: usize, colors: &[&'static str]) {
        if colors.is_empty() {
            return;
        }
        for i in 0..count {
            let particle = Particle {
                rect: Rect::centered(at.0, at.1, PARTICLE_SIZE, PARTICLE_SIZE),
                vx: self.rng.gen_range(-PARTICLE_SPEED..PARTICLE_SPEED),
                vy: self.rng.gen_range(-PARTICLE_SPEED..PARTICLE_SPEED),
                alpha: 1.0,
                color: colors[i % colors.len()],
            };
            self.particles.push(particle);
        }
    }

    fn hud_signature(&self) -> HudSignature {
        HudSignature {
            score: self.progression.score,
            health: self.player.health,
            combo: self.progression.combo,
            level: self.progression.level,
            skill_points: self.progression.skill_points,
            ultimate_charge: self.ultimate_charge,
            weapon: self.player.weapon,
            element: self.player.element,
            status: self.status,
            abilities: Ability::ALL.map(|a| (self.abilities.is_ready(a), self.abilities.is_active(a))),
        }
    }

    pub fn hud(&self) -> HudState {
        HudState {
            score: self.progression.score,
            health: self.player.health,
            combo: self.progression.combo,
            level: self.progression.level,
            experience: self.progression.experience,
            experience_to_next_level: self.progression.experience_to_next_level,
            skill_points: self.progression.skill_points,
            ultimate_charge: self.ultimate_charge,
            weapon: self.player.weapon,
            element: self.player.element,
            abilities: Ability::ALL
                .iter()
                .map(|&ability| {
                    let state = self.abilities.state(ability);
                    AbilityHud {
                        ability,
                        ready: state.ready,
                        active: state.active,
                        cooldown: self.abilities.cooldown_progress(ability, self.now_ms),
                    }
                })
                .collect(),
            paused: self.status == WorldStatus::Paused,
            game_over: self.status == WorldStatus::GameOver,
        }
    }

    /// Draw list for every live entity, back to front.
    pub fn views(&self) -> Vec<EntityView> {
        let view = |kind, rect, color| EntityView {
            kind,
            rect,
            alpha: 1.0,
            color,
        };

        let mut views = Vec::with_capacity(
            1 + self.companions.len()
                + self.enemies.len()
                + self.bullets.len()
                + self.enemy_bullets.len()
                + self.power_ups.len()
                + self.particles.len(),
        );

        if let Some((x, y)) = self.black_hole {
            views.push(view(
                RenderKind::BlackHole,
                Rect::centered(x, y, BLACK_HOLE_SIZE, BLACK_HOLE_SIZE),
                "#440088",
            ));
        }
        for p in &self.power_ups {
            views.push(view(RenderKind::PowerUp, p.rect, p.kind.colors()[0]));
        }
        for e in &self.enemies {
            let (kind, color) = if e.is_boss() {
                (RenderKind::Boss, BOSS_COLORS[0])
            } else {
                (RenderKind::Enemy, DRONE_COLORS[0])
            };
            let color = if e.frozen { Element::Ice.color() } else { color };
            views.push(view(kind, e.rect, color));
        }
        for b in &self.bullets {
            let color = b.element.map_or("#ffff00", Element::color);
            views.push(view(RenderKind::Bullet, b.rect, color));
        }
        for b in &self.enemy_bullets {
            views.push(view(RenderKind::EnemyBullet, b.rect, "#ff4444"));
        }
        for c in &self.companions {
            views.push(view(RenderKind::Companion, c.rect, c.kind.color()));
        }
        let ship = if self.player.shield_active { "#00ffff" } else { PLAYER_COLORS[0] };
        views.push(view(RenderKind::Player, self.player.rect, ship));
        for p in &self.particles {
            views.push(EntityView {
                kind: RenderKind::Particle,
                rect: p.rect,
                alpha: p.alpha,
                color: p.color,
            });
        }
        views
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    /// Places a drone with its top-left corner at `(x, y)`.
    pub fn spawn_drone_at(&mut self, x: f32, y: f32) -> EntityId {
        let id = self.ids.next_id();
        self.enemies.push(Enemy::drone(id, x, y, &self.tuning.enemy));
        id
    }

    pub fn spawn_boss_at(&mut self, x: f32, y: f32) -> EntityId {
        let id = self.ids.next_id();
        self.enemies.push(Enemy::boss(id, x, y, &self.tuning.boss));
        id
    }

    /// Places a straight-flying player bullet centred horizontally on `x`.
    pub fn spawn_bullet(&mut self, x: f32, y: f32, weapon: WeaponKind) -> EntityId {
        let id = self.ids.next_id();
        let stats = self.tuning.projectile.weapon(weapon);
        let damage = self.weapon_damage(weapon);
        self.bullets
            .push(Bullet::launch(id, x, y, 0.0, weapon, &stats, damage));
        id
    }

    pub fn spawn_power_up_at(&mut self, kind: PowerUpKind, x: f32, y: f32) -> EntityId {
        let id = self.ids.next_id();
        let size = self.tuning.pickup.size;
        self.power_ups.push(PowerUp {
            id,
            rect: Rect::new(x, y, size, size),
            kind,
        });
        id
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn status(&self) -> WorldStatus {
        self.status
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn companions(&self) -> &[Companion] {
        &self.companions
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &[EnemyBullet] {
        &self.enemy_bullets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn abilities(&self) -> &AbilityRegistry {
        &self.abilities
    }

    pub fn black_hole(&self) -> Option<(f32, f32)> {
        self.black_hole
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    pub fn ultimate_charge(&self) -> f32 {
        self.ultimate_charge
    }

    pub fn is_ultimate_active(&self) -> bool {
        self.ultimate_active
    }
}
