// Ports the simulation talks through. Drawing, UI and audio live behind these traits.

use crate::domain::state::{AudioCue, EntityView, HudState, InputState};

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

pub trait InputSource: Send {
    fn poll(&mut self) -> InputState;
}

pub trait RenderSink: Send {
    /// Called once per live entity after each tick.
    fn draw(&mut self, view: &EntityView, frame_time_ms: u64);
}

pub trait UiSink: Send {
    fn notify(&mut self, hud: &HudState);
}

// Fire-and-forget; implementations must not block the frame.
pub trait AudioSink: Send {
    fn play(&mut self, cue: AudioCue);
}
