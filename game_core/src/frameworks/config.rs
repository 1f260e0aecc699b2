use std::{env, time::Duration};

// Runtime constants (not gameplay tuning).

pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Polls the autopilot spends strafing one way.
pub const AUTOPILOT_SWEEP: u64 = 90;

/// Seed for the world's RNG. Random when `GAME_SEED` is unset or unparsable.
pub fn game_seed() -> u64 {
    env::var("GAME_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(rand::random)
}

pub fn tick_interval() -> Duration {
    let millis = env::var("GAME_TICK_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|&ms| ms > 0)
        .unwrap_or(16);
    Duration::from_millis(millis)
}

/// How long the headless runner plays before shutting the session down.
pub fn run_duration() -> Duration {
    let secs = env::var("GAME_RUN_SECONDS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(60);
    Duration::from_secs(secs)
}
