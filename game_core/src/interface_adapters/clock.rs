use crate::domain::ports::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;

// Milliseconds since the clock was created. Follows tokio's clock, so paused test time
// drives it too.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(AtomicU64::new(start_ms))
    }

    pub fn advance(&self, delta_ms: u64) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn when_tokio_time_advances_then_monotonic_clock_follows() {
        let clock = MonotonicClock::new();
        tokio::time::advance(Duration::from_millis(48)).await;
        assert_eq!(clock.now_ms(), 48);
    }

    #[test]
    fn when_manual_clock_is_advanced_then_reading_moves_by_delta() {
        let clock = ManualClock::new(100);
        clock.advance(16);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 132);
    }
}
