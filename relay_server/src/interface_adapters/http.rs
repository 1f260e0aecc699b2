// Plain HTTP routes served next to the WebSocket endpoint.

use crate::interface_adapters::state::AppState;
use axum::{Json, extract::State};
use std::sync::Arc;

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    // Currently registered players.
    pub players: usize,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        players: state.hub.player_count().await,
    })
}
