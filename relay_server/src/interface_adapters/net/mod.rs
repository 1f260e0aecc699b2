// Network adapter for the player-facing WebSocket.

pub mod client;

pub use client::{relay_serializer, ws_handler};
