/// Gameplay tuning for regular enemies and the spawner.

#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    pub width: f32,
    pub height: f32,
    pub health: f32,
    /// Pixels per frame, straight down.
    pub speed: f32,
    pub score: u64,
    pub experience: f64,
    /// Time between two spawns.
    pub spawn_interval_ms: u64,
    /// Particles emitted by a hit or kill.
    pub explosion_particles: usize,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 30.0,
            health: 50.0,
            speed: 2.0,
            score: 10,
            experience: 10.0,
            spawn_interval_ms: 2000,
            explosion_particles: 20,
        }
    }
}

/// Gameplay tuning for the boss and its attack patterns.
#[derive(Debug, Clone, Copy)]
pub struct BossTuning {
    pub size: f32,
    pub health: f32,
    pub speed: f32,
    /// The boss stops descending once its top edge reaches this line.
    pub hover_y: f32,
    /// Horizontal sway amplitude around the playfield centre.
    pub sway_amplitude: f32,
    /// Sway phase advance per frame (radians).
    pub sway_rate: f32,
    /// Worth 5x a regular enemy.
    pub score: u64,
    pub experience: f64,
    /// A boss may spawn when the score is a positive multiple of this.
    pub spawn_score: u64,
    /// How long each pattern runs before the boss rotates to the next.
    pub pattern_duration_ms: u64,
    pub crossfire_interval_ms: u64,
    pub crossfire_bullets: usize,
    pub spiral_interval_ms: u64,
    /// Delay into the pattern before the aimed volley fires.
    pub targeted_delay_ms: u64,
    pub radial_bullet_speed: f32,
    pub aimed_bullet_speed: f32,
    pub aimed_spread: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            size: 80.0,
            health: 200.0,
            speed: 1.0,
            hover_y: 100.0,
            sway_amplitude: 100.0,
            sway_rate: 0.02,
            score: 50,
            experience: 50.0,
            spawn_score: 100,
            pattern_duration_ms: 1920,
            crossfire_interval_ms: 160,
            crossfire_bullets: 8,
            spiral_interval_ms: 80,
            targeted_delay_ms: 960,
            radial_bullet_speed: 3.0,
            aimed_bullet_speed: 4.0,
            aimed_spread: 0.2,
        }
    }
}
