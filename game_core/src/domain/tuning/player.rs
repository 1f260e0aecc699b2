/// Gameplay tuning for the player ship.
///
/// Keep this separate from runtime configuration (tick rates, seeds, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Ship bounding box in pixels.
    pub width: f32,
    pub height: f32,

    /// Health cap; healing never goes past this.
    pub max_health: f32,

    /// Movement speed in pixels per frame.
    pub base_speed: f32,

    /// Movement speed while a speed power-up is active.
    pub boosted_speed: f32,

    /// Minimum time between two volleys.
    pub shoot_delay_ms: f32,

    /// Shoot delay multiplier granted by Rapid Fire.
    pub rapid_fire_factor: f32,

    /// Angle offset (radians) of the outer spread-shot bullets.
    pub spread_angle: f32,

    /// Horizontal barrel offset for dual shot.
    pub dual_shot_offset: f32,

    /// Damage taken when an enemy rams the ship.
    pub contact_damage: f32,

    /// Distance from the bottom edge where the ship spawns.
    pub spawn_margin: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
            max_health: 100.0,
            base_speed: 5.0,
            boosted_speed: 8.0,
            shoot_delay_ms: 250.0,
            rapid_fire_factor: 0.7,
            spread_angle: 0.3,
            dual_shot_offset: 10.0,
            contact_damage: 20.0,
            spawn_margin: 50.0,
        }
    }
}
