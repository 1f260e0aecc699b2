// Gameplay tuning for projectiles.
use crate::domain::entities::WeaponKind;

/// Per-weapon projectile stats.
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    pub damage: f32,
    /// Pixels per frame.
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    /// Homing projectiles lock the nearest enemy at launch.
    pub tracking: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    pub laser: WeaponStats,
    pub plasma: WeaponStats,
    pub missile: WeaponStats,

    /// Damage multiplier granted by a weapon's mastery skill.
    pub mastery_factor: f32,

    /// Max heading change per frame for homing projectiles (radians).
    pub homing_turn_rate: f32,

    /// Enemy bullet box edge in pixels.
    pub enemy_bullet_size: f32,

    /// Damage an enemy bullet deals to the player.
    pub enemy_bullet_damage: f32,
}

impl ProjectileTuning {
    pub fn weapon(&self, kind: WeaponKind) -> WeaponStats {
        match kind {
            WeaponKind::Laser => self.laser,
            WeaponKind::Plasma => self.plasma,
            WeaponKind::Missile => self.missile,
        }
    }
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            laser: WeaponStats {
                damage: 25.0,
                speed: 7.0,
                width: 5.0,
                height: 10.0,
                tracking: false,
            },
            plasma: WeaponStats {
                damage: 40.0,
                speed: 5.0,
                width: 8.0,
                height: 8.0,
                tracking: false,
            },
            missile: WeaponStats {
                damage: 60.0,
                speed: 4.0,
                width: 6.0,
                height: 12.0,
                tracking: true,
            },
            mastery_factor: 1.5,
            homing_turn_rate: 0.1,
            enemy_bullet_size: 6.0,
            enemy_bullet_damage: 10.0,
        }
    }
}
