/// Gameplay tuning for elemental status effects.

#[derive(Debug, Clone, Copy)]
pub struct ElementTuning {
    pub burn_ticks: u8,
    pub burn_interval_ms: u64,
    pub burn_damage: f32,

    pub freeze_factor: f32,
    pub freeze_duration_ms: u64,

    pub chain_hops: u32,
    pub chain_radius: f32,
    pub chain_damage: f32,

    pub implode_radius: f32,
    pub implode_damage: f32,

    /// Multipliers unlocked through the element branch of the skill tree.
    pub fire_mastery_factor: f32,
    pub ice_mastery_factor: f32,
    pub void_mastery_factor: f32,

    /// Sparks emitted per elemental hit.
    pub particles: usize,
}

impl Default for ElementTuning {
    fn default() -> Self {
        Self {
            burn_ticks: 5,
            burn_interval_ms: 500,
            burn_damage: 5.0,
            freeze_factor: 0.3,
            freeze_duration_ms: 2000,
            chain_hops: 3,
            chain_radius: 100.0,
            chain_damage: 15.0,
            implode_radius: 50.0,
            implode_damage: 30.0,
            fire_mastery_factor: 1.3,
            ice_mastery_factor: 1.5,
            void_mastery_factor: 1.3,
            particles: 8,
        }
    }
}
