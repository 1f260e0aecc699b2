use crate::domain::abilities::Ability;
use crate::domain::entities::{CompanionKind, WeaponKind};
use crate::domain::progression::{Achievement, Skill, SkillCategory};
use crate::domain::state::{AudioCue, HudState};
use serde::Serialize;

/// Discrete player actions, applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectWeapon(WeaponKind),
    CycleElement,
    Activate(Ability),
    ActivateUltimate,
    UnlockSkill {
        category: SkillCategory,
        skill: Skill,
    },
    AddCompanion(CompanionKind),
    TogglePause,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorldStatus {
    Running,
    Paused,
    GameOver,
}

/// Notifications queued by the world and drained by the session driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorldEvent {
    Audio(AudioCue),
    HudChanged(HudState),
    LevelUp { level: u32, skill_points: u32 },
    AchievementUnlocked(Achievement),
    BossSpawned { boss_id: u64 },
    AbilityActivated(Ability),
    AbilityEnded(Ability),
    AbilityReady(Ability),
    GameOver { score: u64 },
}
