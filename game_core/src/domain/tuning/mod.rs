// Gameplay tuning tables. Runtime knobs (seed, tick rate) live in `frameworks::config`.

pub mod ability;
pub mod companion;
pub mod element;
pub mod enemy;
pub mod pickup;
pub mod player;
pub mod progression;
pub mod projectile;

use ability::AbilityTuning;
use companion::CompanionTuning;
use element::ElementTuning;
use enemy::{BossTuning, EnemyTuning};
use pickup::PickupTuning;
use player::PlayerTuning;
use progression::ProgressionTuning;
use projectile::ProjectileTuning;

/// Length of one simulation frame. Per-frame speeds are scaled by `delta_ms / FRAME_MS`.
pub const FRAME_MS: f32 = 16.0;

/// Size of the visible play area in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Every gameplay table the world needs, bundled so tests can tweak one knob.
#[derive(Debug, Clone, Default)]
pub struct Tuning {
    pub playfield: Playfield,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub projectile: ProjectileTuning,
    pub ability: AbilityTuning,
    pub element: ElementTuning,
    pub pickup: PickupTuning,
    pub companion: CompanionTuning,
    pub progression: ProgressionTuning,
}
