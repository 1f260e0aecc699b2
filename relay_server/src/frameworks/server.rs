// Framework bootstrap for the relay runtime.

use crate::frameworks::config;
use crate::interface_adapters::http::health_handler;
use crate::interface_adapters::net::{relay_serializer, ws_handler};
use crate::interface_adapters::state::{AppState, OutboundFrame, SystemClock};
use crate::use_cases::{RelayHub, RelaySettings, sweep_task};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{Notify, broadcast};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();

    // Stale players are evicted for as long as the server runs.
    let shutdown = Arc::new(Notify::new());
    let sweep_every = config::sweep_interval();
    tokio::spawn(sweep_task(state.hub.clone(), sweep_every, shutdown.clone()));

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    tracing::info!(
        %address,
        sweep_every_ms = sweep_every.as_millis() as u64,
        "listening"
    );

    // Serve app and report errors rather than panicking
    let served = axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    });
    shutdown.notify_one();
    served
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    let settings = RelaySettings {
        broadcast_capacity: config::BROADCAST_CAPACITY,
        stale_after: config::stale_after(),
    };
    tracing::debug!(
        stale_after_ms = settings.stale_after.as_millis() as u64,
        "relay configured"
    );
    let hub = Arc::new(RelayHub::new(settings, Arc::new(SystemClock::new())));

    // Serialize each relay event once; every connection shares the bytes.
    let (frames_tx, _frames_rx) = broadcast::channel::<OutboundFrame>(config::BROADCAST_CAPACITY);
    tokio::spawn(relay_serializer(hub.subscribe(), frames_tx.clone()));

    Arc::new(AppState { hub, frames_tx })
}
