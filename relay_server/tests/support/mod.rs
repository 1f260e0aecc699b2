// Shared relay bootstrap and WebSocket helpers for integration tests.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Every test in a binary talks to the same relay, so assertions must filter by player id.
static SERVER_ADDR: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Starts the relay once per test binary and returns its `host:port`.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published = Arc::new(OnceLock::<String>::new());
        let published_thread = Arc::clone(&published);
        // Own thread and runtime so the server outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_thread.set(addr.to_string());
                relay_server::run(listener).await.expect("server failed");
            });
        });
        wait_until_accepting(published);
    });

    SERVER_ADDR
        .get()
        .expect("server address should be initialized")
        .as_str()
}

fn wait_until_accepting(published: Arc<OnceLock<String>>) {
    let addr = loop {
        if let Some(addr) = published.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_ADDR.set(addr.clone());

    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("server did not become ready in time");
}

/// Opens a socket and consumes the Identity greeting. Returns the assigned player id.
pub async fn connect() -> (Ws, String) {
    let url = format!("ws://{}/ws", ensure_server());
    let (mut ws, _response) = connect_async(url).await.expect("ws connect");

    let identity = next_json(&mut ws).await;
    assert_eq!(identity["type"], "Identity");
    let player_id = identity["data"]["player_id"]
        .as_str()
        .expect("player id is a string")
        .to_string();
    (ws, player_id)
}

pub async fn send_json(ws: &mut Ws, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("send text");
}

pub async fn join(ws: &mut Ws, x: f64, y: f64) {
    send_json(
        ws,
        serde_json::json!({"type": "PlayerJoin", "data": {"x": x, "y": y, "health": 100}}),
    )
    .await;
}

/// Next text frame as JSON. Panics on timeout or on any non-text frame.
pub async fn next_json(ws: &mut Ws) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("socket closed")
            .expect("socket error");
        match frame {
            Message::Text(text) => return serde_json::from_str(&text).expect("server sends JSON"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

/// Skips unrelated traffic until a message matches `pred`.
pub async fn expect_message(ws: &mut Ws, pred: impl Fn(&Value) -> bool) -> Value {
    loop {
        let msg = next_json(ws).await;
        if pred(&msg) {
            return msg;
        }
    }
}

/// Asserts nothing matching `pred` arrives within `window`.
pub async fn expect_silence(ws: &mut Ws, window: Duration, pred: impl Fn(&Value) -> bool) {
    let deadline = tokio::time::Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return;
        }
        match tokio::time::timeout(remaining, ws.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Message::Text(text)))) => {
                let msg: Value = serde_json::from_str(&text).expect("server sends JSON");
                assert!(!pred(&msg), "unexpected message {msg}");
            }
            Ok(Some(Ok(_))) => {}
            Ok(other) => panic!("socket ended early: {other:?}"),
        }
    }
}

/// Waits for the server's close frame and returns its code and reason.
pub async fn expect_close(ws: &mut Ws) -> (u16, String) {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for close");
        match frame {
            Some(Ok(Message::Close(Some(close)))) => {
                return (u16::from(close.code), close.reason.as_str().to_string());
            }
            Some(Ok(Message::Close(None))) | None => panic!("closed without a reason"),
            Some(Ok(_)) => continue,
            Some(Err(e)) => panic!("socket error before close: {e}"),
        }
    }
}

pub fn is_type(msg: &Value, kind: &str) -> bool {
    msg["type"] == kind
}

pub fn from_player(msg: &Value, kind: &str, player_id: &str) -> bool {
    is_type(msg, kind) && msg["data"]["id"] == player_id
}
