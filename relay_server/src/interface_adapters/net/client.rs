use crate::interface_adapters::protocol::{ClientMessage, ServerMessage, shot_fields};
use crate::interface_adapters::state::{AppState, OutboundFrame};
use crate::interface_adapters::utils::rng::next_id;
use crate::use_cases::{Broadcast, RelayHub};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::broadcast;
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    FramesClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

/// Serializes each relay event once and hands the shared bytes to every connection.
pub async fn relay_serializer(
    mut events_rx: broadcast::Receiver<Broadcast>,
    frames_tx: broadcast::Sender<OutboundFrame>,
) {
    loop {
        match events_rx.recv().await {
            Ok(Broadcast { skip, event }) => {
                let msg = ServerMessage::from(event);
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize relay event");
                        continue;
                    }
                };
                let _ = frames_tx.send(OutboundFrame {
                    skip,
                    bytes: Utf8Bytes::from(txt),
                });
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                // Relay events are deltas; dropped ones cannot be rebuilt.
                warn!(missed = n, "relay serializer lagged; events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("relay events channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    // Subscribe before the upgrade so nothing published meanwhile is missed.
    let frames_rx = state.frames_tx.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, hub, frames_rx))
}

async fn handle_socket(
    socket: WebSocket,
    hub: Arc<RelayHub>,
    frames_rx: broadcast::Receiver<OutboundFrame>,
) {
    // Separate connection id so transport logs correlate even if the player never joins.
    let conn_id = next_id();
    let player_id = next_id();
    let span = info_span!("conn", conn_id, player_id);

    serve_connection(socket, player_id, hub, frames_rx)
        .instrument(span)
        .await;
}

async fn serve_connection(
    mut socket: WebSocket,
    player_id: u64,
    hub: Arc<RelayHub>,
    frames_rx: broadcast::Receiver<OutboundFrame>,
) {
    // Tell the client "This is who you are".
    let identity = ServerMessage::Identity {
        player_id: player_id.to_string(),
    };
    let bytes_out = match send_message(&mut socket, &identity).await {
        Ok(bytes) => bytes as u64,
        Err(e) => {
            warn!(error = ?e, "failed to send identity");
            let _ = socket.close().await;
            return;
        }
    };
    info!(player_id, "client connected");

    let now = Instant::now() - LOG_THROTTLE;
    let mut ctx = ConnCtx {
        player_id,
        hub,
        frames_rx,
        msgs_in: 0,
        msgs_out: 1,
        bytes_in: 0,
        bytes_out,
        invalid_json: 0,
        skipped_own: 0,
        last_frames_lag_log: now,
        last_invalid_log: now,
        last_ignored_log: now,
        close_frame: None,
    };

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    pub player_id: u64,
    pub hub: Arc<RelayHub>,
    pub frames_rx: broadcast::Receiver<OutboundFrame>,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub invalid_json: u32,
    // Frames this connection caused itself and therefore did not receive.
    pub skipped_own: u64,

    pub last_frames_lag_log: Instant,
    pub last_invalid_log: Instant,
    pub last_ignored_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(socket, incoming, ctx).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            frame = ctx.frames_rx.recv() => {
                match frame {
                    Ok(frame) if frame.skip == Some(ctx.player_id) => {
                        ctx.skipped_own += 1;
                        false
                    }
                    Ok(frame) => match forward_frame(frame.bytes, socket, ctx).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(&mut ctx.last_frames_lag_log) {
                            warn!(player_id = ctx.player_id, missed = n, "relay frames lagged; events dropped");
                        }
                        false
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::FramesClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    disconnect_cleanup(ctx).await;

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    let player_id = ctx.player_id;
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::PlayerJoin(join)) => {
                        let existing = ctx.hub.join(player_id, join.into()).await;
                        match send_message(socket, &ServerMessage::ExistingPlayers(existing)).await {
                            Ok(bytes) => {
                                ctx.msgs_out += 1;
                                ctx.bytes_out += bytes as u64;
                                Ok(LoopControl::Continue)
                            }
                            Err(err) => {
                                warn!(error = ?err, "failed to send existing players");
                                Ok(LoopControl::Disconnect)
                            }
                        }
                    }
                    Ok(ClientMessage::PlayerUpdate(patch)) => {
                        if !ctx.hub.update(player_id, patch).await
                            && should_log(&mut ctx.last_ignored_log)
                        {
                            warn!(player_id, "update before join ignored");
                        }
                        Ok(LoopControl::Continue)
                    }
                    Ok(ClientMessage::ShootEvent(data)) => {
                        ctx.hub.shoot(player_id, shot_fields(data));
                        Ok(LoopControl::Continue)
                    }
                    Err(parse_err) => {
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_log) {
                            warn!(
                                player_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if ctx.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_frame(bytes: Utf8Bytes, socket: &mut WebSocket, ctx: &mut ConnCtx) -> LoopControl {
    let bytes_len = bytes.len();
    match socket.send(Message::Text(bytes)).await.map_err(NetError::Ws) {
        Ok(()) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Disconnect follows immediately.
            warn!(error = ?err, "failed to send relay frame");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &ConnCtx) {
    let player_id = ctx.player_id;
    // Announces the departure only if the player had joined.
    let was_joined = ctx.hub.leave(player_id).await;

    debug!(
        player_id,
        was_joined,
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        skipped_own = ctx.skipped_own,
        "connection stats"
    );
    info!(player_id, "client disconnected");
}
