// Domain-level simulation entities owned by the world.

use crate::domain::tuning::enemy::{BossTuning, EnemyTuning};
use crate::domain::tuning::player::PlayerTuning;
use crate::domain::tuning::projectile::WeaponStats;
use serde::Serialize;

/// World-unique handle used for back references (homing targets, status effects).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u64);

/// Hands out monotonically increasing entity ids for one world.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        self.next = self.next.wrapping_add(1);
        EntityId(self.next)
    }
}

/// Axis-aligned bounding box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of the given size centred on a point.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Positive size and a finite position.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.x.is_finite() && self.y.is_finite()
    }
}

/// Anything with a bounding box the collision resolver can test.
pub trait Spatial {
    fn rect(&self) -> Rect;

    fn center(&self) -> (f32, f32) {
        self.rect().center()
    }
}

impl Spatial for Rect {
    fn rect(&self) -> Rect {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeaponKind {
    Laser,
    Plasma,
    Missile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Element {
    Fire,
    Ice,
    Lightning,
    Void,
}

impl Element {
    /// Next element in the selection cycle (wraps from Void back to Fire).
    pub fn next(self) -> Self {
        match self {
            Element::Fire => Element::Ice,
            Element::Ice => Element::Lightning,
            Element::Lightning => Element::Void,
            Element::Void => Element::Fire,
        }
    }

    /// Selection order starting from "no element".
    pub fn cycle(current: Option<Element>) -> Element {
        current.map_or(Element::Fire, Element::next)
    }

    /// Particle colour used for elemental sparks.
    pub fn color(self) -> &'static str {
        match self {
            Element::Fire => "#ff4400",
            Element::Ice => "#00ffff",
            Element::Lightning => "#ffff00",
            Element::Void => "#ff00ff",
        }
    }
}

pub struct Player {
    pub rect: Rect,
    pub health: f32,
    pub speed: f32,
    pub weapon: WeaponKind,
    pub element: Option<Element>,

    // Buff flags.
    pub shield_active: bool,
    pub spread_shot: bool,
    pub dual_shot: bool,

    // Firing gate.
    pub last_shot_at: Option<u64>,
    pub shoot_delay_ms: f32,

    // Buff expiry; a stale deferred end never cancels a refreshed buff.
    pub speed_boost_until: Option<u64>,
    pub spread_shot_until: Option<u64>,
}

impl Player {
    /// Fresh ship centred horizontally near the bottom edge.
    pub fn spawn(tuning: &PlayerTuning, field_width: f32, field_height: f32) -> Self {
        Self {
            rect: Rect::new(
                field_width / 2.0 - tuning.width / 2.0,
                field_height - tuning.spawn_margin,
                tuning.width,
                tuning.height,
            ),
            health: tuning.max_health,
            speed: tuning.base_speed,
            weapon: WeaponKind::Laser,
            element: None,
            shield_active: false,
            spread_shot: false,
            dual_shot: false,
            last_shot_at: None,
            shoot_delay_ms: tuning.shoot_delay_ms,
            speed_boost_until: None,
            spread_shot_until: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

impl Spatial for Player {
    fn rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BossPattern {
    /// Rotating ring of radial bullets.
    Crossfire,
    /// Single bullets walking around a circle.
    Spiral,
    /// One aimed three-bullet volley per rotation.
    Targeted,
}

#[derive(Debug, Clone)]
pub struct BossState {
    pub patterns: Vec<BossPattern>,
    pub pattern_index: usize,
    /// Time spent in the current pattern.
    pub pattern_elapsed_ms: u64,
    /// Volleys fired in the current pattern.
    pub volleys: u32,
    /// Horizontal sway phase (radians).
    pub sway: f32,
}

impl BossState {
    pub fn new(patterns: Vec<BossPattern>) -> Self {
        Self {
            patterns,
            pattern_index: 0,
            pattern_elapsed_ms: 0,
            volleys: 0,
            sway: 0.0,
        }
    }

    pub fn current_pattern(&self) -> Option<BossPattern> {
        self.patterns.get(self.pattern_index).copied()
    }
}

#[derive(Debug, Clone)]
pub enum EnemyKind {
    Drone,
    Boss(BossState),
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub rect: Rect,
    pub health: f32,
    pub max_health: f32,
    /// Pixels per frame.
    pub speed: f32,
    /// Set while a freeze effect holds the speed down.
    pub frozen: bool,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn drone(id: EntityId, x: f32, y: f32, tuning: &EnemyTuning) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, tuning.width, tuning.height),
            health: tuning.health,
            max_health: tuning.health,
            speed: tuning.speed,
            frozen: false,
            kind: EnemyKind::Drone,
        }
    }

    pub fn boss(id: EntityId, x: f32, y: f32, tuning: &BossTuning) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, tuning.size, tuning.size),
            health: tuning.health,
            max_health: tuning.health,
            speed: tuning.speed,
            frozen: false,
            kind: EnemyKind::Boss(BossState::new(vec![
                BossPattern::Crossfire,
                BossPattern::Spiral,
                BossPattern::Targeted,
            ])),
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

impl Spatial for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Player-owned projectile.
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: EntityId,
    pub rect: Rect,
    /// Heading in radians; 0 points straight up.
    pub angle: f32,
    /// Pixels per frame.
    pub speed: f32,
    pub damage: f32,
    pub weapon: WeaponKind,
    pub element: Option<Element>,
    /// Extra element carried when Elemental Harmony is unlocked.
    pub secondary_element: Option<Element>,
    /// Homing target; resolved every tick, missing means straight flight.
    pub target: Option<EntityId>,
}

impl Bullet {
    /// Launches a projectile centred horizontally on `(x, y)`.
    pub fn launch(
        id: EntityId,
        x: f32,
        y: f32,
        angle: f32,
        weapon: WeaponKind,
        stats: &WeaponStats,
        damage: f32,
    ) -> Self {
        Self {
            id,
            rect: Rect::new(x - stats.width / 2.0, y, stats.width, stats.height),
            angle,
            speed: stats.speed,
            damage,
            weapon,
            element: None,
            secondary_element: None,
            target: None,
        }
    }
}

impl Spatial for Bullet {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Enemy-owned projectile with an explicit velocity.
#[derive(Debug, Clone)]
pub struct EnemyBullet {
    pub id: EntityId,
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub damage: f32,
}

impl Spatial for EnemyBullet {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Cosmetic spark; lives until its alpha fades out.
#[derive(Debug, Clone)]
pub struct Particle {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
    pub color: &'static str,
}

impl Spatial for Particle {
    fn rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PowerUpKind {
    Health,
    Speed,
    Spread,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Health, PowerUpKind::Speed, PowerUpKind::Spread];

    /// Two-tone palette for the pickup burst.
    pub fn colors(self) -> [&'static str; 2] {
        match self {
            PowerUpKind::Health => ["#00ff00", "#ffffff"],
            PowerUpKind::Speed => ["#00ffff", "#0099ff"],
            PowerUpKind::Spread => ["#ff00ff", "#ff99ff"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: PowerUpKind,
}

impl Spatial for PowerUp {
    fn rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompanionKind {
    CombatDrone,
    ShieldDrone,
    HealerDrone,
}

impl CompanionKind {
    pub fn color(self) -> &'static str {
        match self {
            CompanionKind::CombatDrone => "#ff8800",
            CompanionKind::ShieldDrone => "#00ccff",
            CompanionKind::HealerDrone => "#00ff88",
        }
    }
}

/// Drone orbiting the player. Its owner is implicit: the world's single player.
#[derive(Debug, Clone)]
pub struct Companion {
    pub id: EntityId,
    pub kind: CompanionKind,
    pub rect: Rect,
    /// Orbit phase in radians.
    pub angle: f32,
    pub distance: f32,
    pub last_shot_at: Option<u64>,
    pub last_heal_at: Option<u64>,
}

impl Spatial for Companion {
    fn rect(&self) -> Rect {
        self.rect
    }
}
