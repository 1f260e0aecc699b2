// Use cases layer: the frame scheduler and the session that drives it.

pub mod session;
pub mod types;
pub mod world;

pub use session::{SessionOptions, SessionPorts, SessionSummary, StopReason, run_session};
pub use types::{Command, WorldEvent, WorldStatus};
pub use world::World;
