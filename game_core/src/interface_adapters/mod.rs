// Interface adapters: concrete clocks and the sinks used by the headless runner.

pub mod clock;
pub mod headless;

pub use clock::{ManualClock, MonotonicClock};
pub use headless::{Autopilot, FrameCounter, TracingAudio, TracingUi, hud_json};
