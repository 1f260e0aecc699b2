/// Gameplay tuning for experience, combos and skill points.

#[derive(Debug, Clone, Copy)]
pub struct ProgressionTuning {
    pub first_level_threshold: f64,
    /// Each level multiplies the next threshold by this.
    pub threshold_growth: f64,
    pub skill_points_per_level: u32,
    /// A kill must follow the previous one within this window to extend the combo.
    pub combo_window_ms: i64,
    pub combo_achievement: u32,
    pub first_blood_score: u64,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            first_level_threshold: 100.0,
            threshold_growth: 1.5,
            skill_points_per_level: 2,
            combo_window_ms: 2000,
            combo_achievement: 10,
            first_blood_score: 10,
        }
    }
}
