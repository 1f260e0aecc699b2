// Domain layer: the relay's view of who is connected and what they last reported.

pub mod players;
pub mod ports;

pub use players::{PlayerRecord, PlayerRegistry, PlayerState};
pub use ports::Clock;
