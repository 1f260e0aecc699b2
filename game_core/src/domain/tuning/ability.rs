// Gameplay tuning for special abilities and the ultimate.
use crate::domain::abilities::Ability;

#[derive(Debug, Clone, Copy)]
pub struct AbilityTiming {
    pub duration_ms: u64,
    pub cooldown_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct AbilityTuning {
    pub time_stop: AbilityTiming,
    pub black_hole: AbilityTiming,
    pub shield: AbilityTiming,

    /// Pull radius around the black hole.
    pub black_hole_radius: f32,
    /// Fraction of the offset to the hole closed each frame.
    pub black_hole_pull: f32,

    /// Duration multiplier granted by Time Master.
    pub time_master_factor: f32,
    /// Radius multiplier granted by Gravity Well.
    pub gravity_well_factor: f32,

    /// Ultimate charge gained per frame.
    pub ultimate_charge_rate: f32,
    pub ultimate_max: f32,
    /// Charge rate multiplier granted by Ultimate Power.
    pub ultimate_power_factor: f32,
    pub ultimate_duration_ms: u64,
    pub ultimate_projectiles: usize,
    pub ultimate_speed_factor: f32,
}

impl AbilityTuning {
    pub fn timing(&self, ability: Ability) -> AbilityTiming {
        match ability {
            Ability::TimeStop => self.time_stop,
            Ability::BlackHole => self.black_hole,
            Ability::Shield => self.shield,
        }
    }
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            time_stop: AbilityTiming {
                duration_ms: 3000,
                cooldown_ms: 15000,
            },
            black_hole: AbilityTiming {
                duration_ms: 5000,
                cooldown_ms: 20000,
            },
            shield: AbilityTiming {
                duration_ms: 4000,
                cooldown_ms: 12000,
            },
            black_hole_radius: 200.0,
            black_hole_pull: 0.1,
            time_master_factor: 1.5,
            gravity_well_factor: 1.5,
            ultimate_charge_rate: 0.5,
            ultimate_max: 100.0,
            ultimate_power_factor: 1.5,
            ultimate_duration_ms: 1000,
            ultimate_projectiles: 36,
            ultimate_speed_factor: 1.5,
        }
    }
}
