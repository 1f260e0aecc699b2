// Domain layer: simulation entities, rules and the ports they talk through.

pub mod abilities;
pub mod collision;
pub mod effects;
pub mod entities;
pub mod ports;
pub mod progression;
pub mod state;
pub mod systems;
pub mod timeline;
pub mod tuning;

pub use abilities::{Ability, AbilityRegistry, AbilityState};
pub use entities::{
    Bullet, CompanionKind, Element, Enemy, EnemyKind, EntityId, PowerUpKind, Rect, Spatial,
    WeaponKind,
};
pub use progression::{Achievement, Skill, SkillCategory, SkillError};
pub use state::{AudioCue, EntityView, HudState, InputState, Key, RenderKind};
