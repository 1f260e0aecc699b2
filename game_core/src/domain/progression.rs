// Score, experience, skill tree, combo and achievements.

use crate::domain::tuning::progression::ProgressionTuning;
use serde::Serialize;
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkillCategory {
    Weapons,
    Elements,
    Abilities,
}

impl FromStr for SkillCategory {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weapons" => Ok(SkillCategory::Weapons),
            "elements" => Ok(SkillCategory::Elements),
            "abilities" => Ok(SkillCategory::Abilities),
            _ => Err(SkillError::UnknownSkill),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Skill {
    LaserMastery,
    PlasmaMastery,
    MissileMastery,
    DualShot,
    RapidFire,
    FireMastery,
    IceMastery,
    LightningMastery,
    VoidMastery,
    ElementalHarmony,
    TimeMaster,
    GravityWell,
    ShieldMaster,
    UltimatePower,
}

impl Skill {
    pub const ALL: [Skill; 14] = [
        Skill::LaserMastery,
        Skill::PlasmaMastery,
        Skill::MissileMastery,
        Skill::DualShot,
        Skill::RapidFire,
        Skill::FireMastery,
        Skill::IceMastery,
        Skill::LightningMastery,
        Skill::VoidMastery,
        Skill::ElementalHarmony,
        Skill::TimeMaster,
        Skill::GravityWell,
        Skill::ShieldMaster,
        Skill::UltimatePower,
    ];

    pub fn category(self) -> SkillCategory {
        use Skill::*;
        match self {
            LaserMastery | PlasmaMastery | MissileMastery | DualShot | RapidFire => {
                SkillCategory::Weapons
            }
            FireMastery | IceMastery | LightningMastery | VoidMastery | ElementalHarmony => {
                SkillCategory::Elements
            }
            TimeMaster | GravityWell | ShieldMaster | UltimatePower => SkillCategory::Abilities,
        }
    }

    /// Skill points needed to unlock.
    pub fn cost(self) -> u32 {
        use Skill::*;
        match self {
            LaserMastery | PlasmaMastery | MissileMastery => 3,
            FireMastery | IceMastery | LightningMastery | VoidMastery => 3,
            RapidFire | TimeMaster | GravityWell | ShieldMaster => 4,
            DualShot | ElementalHarmony | UltimatePower => 5,
        }
    }

    /// Wire name, e.g. `LASER_MASTERY`.
    pub fn name(self) -> &'static str {
        use Skill::*;
        match self {
            LaserMastery => "LASER_MASTERY",
            PlasmaMastery => "PLASMA_MASTERY",
            MissileMastery => "MISSILE_MASTERY",
            DualShot => "DUAL_SHOT",
            RapidFire => "RAPID_FIRE",
            FireMastery => "FIRE_MASTERY",
            IceMastery => "ICE_MASTERY",
            LightningMastery => "LIGHTNING_MASTERY",
            VoidMastery => "VOID_MASTERY",
            ElementalHarmony => "ELEMENTAL_HARMONY",
            TimeMaster => "TIME_MASTER",
            GravityWell => "GRAVITY_WELL",
            ShieldMaster => "SHIELD_MASTER",
            UltimatePower => "ULTIMATE_POWER",
        }
    }
}

impl FromStr for Skill {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(s))
            .ok_or(SkillError::UnknownSkill)
    }
}

/// Reasons an unlock request is refused. State is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillError {
    WrongCategory,
    AlreadyUnlocked,
    InsufficientPoints { cost: u32, available: u32 },
    UnknownSkill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Achievement {
    FirstBlood,
    ComboMaster,
    BossSlayer,
    UltimatePower,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::FirstBlood,
        Achievement::ComboMaster,
        Achievement::BossSlayer,
        Achievement::UltimatePower,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Achievement::FirstBlood => "First Blood",
            Achievement::ComboMaster => "Combo Master",
            Achievement::BossSlayer => "Boss Slayer",
            Achievement::UltimatePower => "Ultimate Power",
        }
    }

    pub fn is_met(self, ctx: &AchievementContext, tuning: &ProgressionTuning) -> bool {
        match self {
            Achievement::FirstBlood => ctx.score >= tuning.first_blood_score,
            Achievement::ComboMaster => ctx.combo >= tuning.combo_achievement,
            Achievement::BossSlayer => ctx.bosses_killed > 0,
            Achievement::UltimatePower => ctx.ultimate_active,
        }
    }
}

/// Snapshot the achievement predicates read.
#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementContext {
    pub score: u64,
    pub combo: u32,
    pub bosses_killed: u32,
    pub ultimate_active: bool,
}

#[derive(Debug, Clone)]
pub struct Progression {
    tuning: ProgressionTuning,
    pub score: u64,
    pub level: u32,
    pub experience: f64,
    pub experience_to_next_level: f64,
    pub skill_points: u32,
    pub unlocked: HashSet<Skill>,
    pub combo: u32,
    pub combo_timer_ms: i64,
    pub max_combo: u32,
    pub earned: Vec<Achievement>,
    pub bosses_killed: u32,
}

impl Progression {
    pub fn new(tuning: ProgressionTuning) -> Self {
        Self {
            tuning,
            score: 0,
            level: 1,
            experience: 0.0,
            experience_to_next_level: tuning.first_level_threshold,
            skill_points: 0,
            unlocked: HashSet::new(),
            combo: 0,
            combo_timer_ms: 0,
            max_combo: 0,
            earned: Vec::new(),
            bosses_killed: 0,
        }
    }

    pub fn has(&self, skill: Skill) -> bool {
        self.unlocked.contains(&skill)
    }

    /// Adds experience and applies every level-up it pays for.
    ///
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: f64) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level {
            self.experience -= self.experience_to_next_level;
            self.experience_to_next_level *= self.tuning.threshold_growth;
            self.level += 1;
            self.skill_points += self.tuning.skill_points_per_level;
            gained += 1;
        }
        gained
    }

    pub fn unlock_skill(&mut self, category: SkillCategory, skill: Skill) -> Result<(), SkillError> {
        if skill.category() != category {
            return Err(SkillError::WrongCategory);
        }
        if self.has(skill) {
            return Err(SkillError::AlreadyUnlocked);
        }
        let cost = skill.cost();
        if self.skill_points < cost {
            return Err(SkillError::InsufficientPoints {
                cost,
                available: self.skill_points,
            });
        }

        self.skill_points -= cost;
        self.unlocked.insert(skill);
        Ok(())
    }

    /// Scores a kill at the current combo multiplier, then extends the combo.
    ///
    /// Returns the points awarded.
    pub fn register_kill(&mut self, base_score: u64) -> u64 {
        let awarded = base_score * u64::from(self.combo.max(1));
        self.score += awarded;
        self.combo += 1;
        self.combo_timer_ms = self.tuning.combo_window_ms;
        self.max_combo = self.max_combo.max(self.combo);
        awarded
    }

    /// Runs the combo window down. Returns true when the combo was just lost.
    pub fn decay_combo(&mut self, delta_ms: u64) -> bool {
        if self.combo_timer_ms <= 0 {
            return false;
        }
        self.combo_timer_ms -= i64::try_from(delta_ms).unwrap_or(i64::MAX);
        if self.combo_timer_ms <= 0 {
            self.combo_timer_ms = 0;
            let lost = self.combo > 0;
            self.combo = 0;
            return lost;
        }
        false
    }

    /// Records every newly met achievement and returns them.
    pub fn check_achievements(&mut self, ultimate_active: bool) -> Vec<Achievement> {
        let ctx = AchievementContext {
            score: self.score,
            combo: self.combo,
            bosses_killed: self.bosses_killed,
            ultimate_active,
        };
        let fresh: Vec<Achievement> = Achievement::ALL
            .into_iter()
            .filter(|a| !self.earned.contains(a) && a.is_met(&ctx, &self.tuning))
            .collect();
        self.earned.extend(fresh.iter().copied());
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progression() -> Progression {
        Progression::new(ProgressionTuning::default())
    }

    #[test]
    fn when_gaining_250_from_level_one_then_two_levels_compound() {
        let mut p = progression();

        assert_eq!(p.gain_experience(250.0), 2);

        assert_eq!(p.level, 3);
        assert_eq!(p.experience, 0.0);
        assert_eq!(p.experience_to_next_level, 225.0);
        assert_eq!(p.skill_points, 4);
    }

    #[test]
    fn when_experience_falls_short_then_level_is_unchanged() {
        let mut p = progression();
        assert_eq!(p.gain_experience(99.0), 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.experience, 99.0);
    }

    #[test]
    fn when_unlocking_twice_then_points_are_spent_once() {
        let mut p = progression();
        p.skill_points = 10;

        assert_eq!(p.unlock_skill(SkillCategory::Weapons, Skill::DualShot), Ok(()));
        assert_eq!(
            p.unlock_skill(SkillCategory::Weapons, Skill::DualShot),
            Err(SkillError::AlreadyUnlocked)
        );

        assert_eq!(p.skill_points, 5);
        assert_eq!(p.unlocked.len(), 1);
    }

    #[test]
    fn when_category_does_not_match_then_unlock_is_refused() {
        let mut p = progression();
        p.skill_points = 10;
        assert_eq!(
            p.unlock_skill(SkillCategory::Elements, Skill::RapidFire),
            Err(SkillError::WrongCategory)
        );
        assert_eq!(p.skill_points, 10);
    }

    #[test]
    fn when_points_are_short_then_unlock_reports_cost() {
        let mut p = progression();
        p.skill_points = 4;
        assert_eq!(
            p.unlock_skill(SkillCategory::Abilities, Skill::UltimatePower),
            Err(SkillError::InsufficientPoints {
                cost: 5,
                available: 4
            })
        );
        assert!(p.unlocked.is_empty());
    }

    #[test]
    fn when_parsing_wire_names_then_case_is_ignored() {
        assert_eq!("LASER_MASTERY".parse::<Skill>(), Ok(Skill::LaserMastery));
        assert_eq!("elemental_harmony".parse::<Skill>(), Ok(Skill::ElementalHarmony));
        assert_eq!("Abilities".parse::<SkillCategory>(), Ok(SkillCategory::Abilities));
        assert_eq!("NOPE".parse::<Skill>(), Err(SkillError::UnknownSkill));
    }

    #[test]
    fn when_killing_in_a_combo_then_score_is_multiplied() {
        let mut p = progression();

        assert_eq!(p.register_kill(10), 10);
        assert_eq!(p.combo, 1);
        assert_eq!(p.register_kill(10), 10);
        assert_eq!(p.register_kill(10), 20);
        assert_eq!(p.score, 40);
        assert_eq!(p.max_combo, 3);
    }

    #[test]
    fn when_window_expires_then_combo_resets() {
        let mut p = progression();
        p.register_kill(10);

        assert!(!p.decay_combo(1_999));
        assert_eq!(p.combo, 1);
        assert!(p.decay_combo(1));
        assert_eq!(p.combo, 0);
        assert!(!p.decay_combo(16));
    }

    #[test]
    fn when_achievement_is_met_then_it_is_reported_once() {
        let mut p = progression();
        p.register_kill(10);

        assert_eq!(p.check_achievements(false), vec![Achievement::FirstBlood]);
        assert!(p.check_achievements(false).is_empty());
        assert_eq!(p.check_achievements(true), vec![Achievement::UltimatePower]);
    }
}
