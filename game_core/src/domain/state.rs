// Plain data exchanged with the outside world: input snapshots, HUD numbers, render views.

use crate::domain::abilities::Ability;
use crate::domain::entities::{Element, Rect, WeaponKind};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

/// Held keys plus the pointer position, sampled once per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub keys: HashSet<Key>,
    pub pointer: (f32, f32),
}

impl InputState {
    pub fn with_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            pointer: (0.0, 0.0),
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Horizontal and vertical direction in `-1.0..=1.0`.
    pub fn axis(&self) -> (f32, f32) {
        let axis = |negative: Key, positive: Key| match (self.is_down(negative), self.is_down(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        (axis(Key::Left, Key::Right), axis(Key::Up, Key::Down))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbilityHud {
    pub ability: Ability,
    pub ready: bool,
    pub active: bool,
    /// `0.0..=1.0`; 1.0 when ready.
    pub cooldown: f32,
}

/// Everything the HUD shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudState {
    pub score: u64,
    pub health: f32,
    pub combo: u32,
    pub level: u32,
    pub experience: f64,
    pub experience_to_next_level: f64,
    pub skill_points: u32,
    pub ultimate_charge: f32,
    pub weapon: WeaponKind,
    pub element: Option<Element>,
    pub abilities: Vec<AbilityHud>,
    pub paused: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderKind {
    Player,
    Companion,
    Enemy,
    Boss,
    Bullet,
    EnemyBullet,
    PowerUp,
    Particle,
    BlackHole,
}

/// Draw instruction for one live entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub kind: RenderKind,
    pub rect: Rect,
    pub alpha: f32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AudioCue {
    Shoot,
    Explosion,
    PowerUp,
}

impl AudioCue {
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::Shoot => "shoot",
            AudioCue::Explosion => "explosion",
            AudioCue::PowerUp => "powerup",
        }
    }
}
