/// Gameplay tuning for drones orbiting the player.

#[derive(Debug, Clone, Copy)]
pub struct CompanionTuning {
    pub size: f32,
    pub orbit_distance: f32,
    /// Orbit phase advance per frame (radians).
    pub orbit_rate: f32,

    pub fire_interval_ms: u64,
    pub fire_range: f32,

    pub block_radius: f32,
    pub block_chance: f64,

    pub heal_interval_ms: u64,
    pub heal_amount: f32,
}

impl Default for CompanionTuning {
    fn default() -> Self {
        Self {
            size: 20.0,
            orbit_distance: 50.0,
            orbit_rate: 0.02,
            fire_interval_ms: 500,
            fire_range: 300.0,
            block_radius: 60.0,
            block_chance: 0.5,
            heal_interval_ms: 3000,
            heal_amount: 5.0,
        }
    }
}
