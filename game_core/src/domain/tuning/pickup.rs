/// Gameplay tuning for falling power-ups.

#[derive(Debug, Clone, Copy)]
pub struct PickupTuning {
    pub size: f32,
    /// Pixels per frame.
    pub fall_speed: f32,
    pub spawn_interval_ms: u64,
    pub heal_amount: f32,
    /// How long speed and spread buffs last.
    pub buff_duration_ms: u64,
    pub particles: usize,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            size: 20.0,
            fall_speed: 2.0,
            spawn_interval_ms: 10_000,
            heal_amount: 30.0,
            buff_duration_ms: 5000,
            particles: 15,
        }
    }
}
