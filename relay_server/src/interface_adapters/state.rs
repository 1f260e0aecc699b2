use crate::domain::Clock;
use crate::use_cases::RelayHub;
use axum::extract::ws::Utf8Bytes;
use std::{sync::Arc, time::Instant};
use tokio::sync::broadcast;

/// A relay event already serialized for the wire.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    // The player that caused the event; its own socket drops the frame.
    pub skip: Option<u64>,
    pub bytes: Utf8Bytes,
}

#[derive(Clone)]
pub struct AppState {
    // Registry and event fan-out shared by every connection.
    pub hub: Arc<RelayHub>,
    // Serialized relay events, shared across all connections.
    pub frames_tx: broadcast::Sender<OutboundFrame>,
}

/// Milliseconds since the relay started.
#[derive(Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
