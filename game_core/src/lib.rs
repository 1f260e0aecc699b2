pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::runtime::{HeadlessSettings, run_headless, run_with_config};
pub use use_cases::{Command, World, WorldEvent, WorldStatus};
