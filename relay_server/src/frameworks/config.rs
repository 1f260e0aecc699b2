use std::{env, time::Duration};

// Runtime/server constants for the relay.

pub fn http_port() -> u16 {
    env::var("RELAY_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

/// How long a player may stay silent before the sweep evicts it.
pub fn stale_after() -> Duration {
    millis_from_env("RELAY_STALE_AFTER_MS", 10_000)
}

/// How often the sweep looks for stale players.
pub fn sweep_interval() -> Duration {
    millis_from_env("RELAY_SWEEP_INTERVAL_MS", 60_000)
}

fn millis_from_env(key: &str, default: u64) -> Duration {
    let millis = env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default);
    Duration::from_millis(millis)
}

pub const BROADCAST_CAPACITY: usize = 256;
