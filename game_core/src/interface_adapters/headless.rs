// Adapters for running the simulation without a screen: scripted input plus sinks that
// only log or count.

use crate::domain::ports::{AudioSink, InputSource, RenderSink, UiSink};
use crate::domain::state::{AudioCue, EntityView, HudState, InputState, Key};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, debug, enabled, trace, warn};

/// Keeps the trigger held and strafes left and right.
#[derive(Debug, Clone)]
pub struct Autopilot {
    polls: u64,
    /// Polls spent moving in one direction before turning around.
    sweep: u64,
    pointer: (f32, f32),
}

impl Autopilot {
    pub fn new(sweep: u64, pointer: (f32, f32)) -> Self {
        Self {
            polls: 0,
            sweep: sweep.max(1),
            pointer,
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self) -> InputState {
        let heading = if (self.polls / self.sweep) % 2 == 0 {
            Key::Left
        } else {
            Key::Right
        };
        self.polls += 1;

        let mut input = InputState::with_keys([Key::Fire, heading]);
        input.pointer = self.pointer;
        input
    }
}

/// Logs HUD changes at debug level.
#[derive(Debug, Default)]
pub struct TracingUi;

impl UiSink for TracingUi {
    fn notify(&mut self, hud: &HudState) {
        if enabled!(Level::DEBUG) {
            debug!(score = hud.score, hud = %hud_json(hud), "hud");
        }
    }
}

/// The HUD as a JSON object, the shape a browser overlay would consume.
pub fn hud_json(hud: &HudState) -> String {
    serde_json::to_string(hud).unwrap_or_else(|e| {
        warn!(error = %e, "failed to serialize hud");
        String::from("{}")
    })
}

#[derive(Debug, Default)]
pub struct TracingAudio;

impl AudioSink for TracingAudio {
    fn play(&mut self, cue: AudioCue) {
        trace!(cue = cue.name(), "audio");
    }
}

/// Counts draw calls; clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct FrameCounter {
    draws: Arc<AtomicU64>,
    last_frame_ms: Arc<AtomicU64>,
}

impl FrameCounter {
    pub fn draws(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }

    pub fn last_frame_ms(&self) -> u64 {
        self.last_frame_ms.load(Ordering::Relaxed)
    }
}

impl RenderSink for FrameCounter {
    fn draw(&mut self, _view: &EntityView, frame_time_ms: u64) {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.last_frame_ms.store(frame_time_ms, Ordering::Relaxed);
    }
}
