// Use cases layer: application workflows for the relay.

pub mod relay;
pub mod types;

pub use relay::{RelayHub, RelaySettings, sweep_task};
pub use types::{Broadcast, RelayEvent};
