// WebSocket handler and stream logic

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::RuntimeDataResponse;
use crate::poller::FeedState;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_feed(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rx = state.feed_rx.clone();
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_feed(socket, rx).await {
            tracing::info!("Feed stream error: {}", e);
        }
    })
}

/// Pushes the held payload on connect, then again each time the poller
/// accepts a changed one. Loading and error flips wake the watch too;
/// those do not resend an unchanged payload.
async fn stream_feed(
    mut socket: WebSocket,
    mut rx: watch::Receiver<FeedState>,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to feed stream");

    let mut last_sent: Option<Arc<RuntimeDataResponse>> = None;
    let initial = rx.borrow_and_update().data.clone();
    if let Some(payload) = initial {
        let json = serde_json::to_string(payload.as_ref())?;
        let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
        if r.is_err() || r.unwrap_or(Ok(())).is_err() {
            return Ok(());
        }
        last_sent = Some(payload);
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(payload) = rx.borrow_and_update().data.clone() else {
                    continue;
                };
                if let Some(prev) = &last_sent
                    && Arc::ptr_eq(prev, &payload)
                {
                    continue;
                }
                let json = serde_json::to_string(payload.as_ref())?;
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
                last_sent = Some(payload);
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
