// Background poller: owns the repeating fetch timer and the single
// in-memory payload slot. Publishes through a watch channel; a publish
// happens only when the state actually changed, so an identical payload
// from a poll tick wakes nobody downstream.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

use crate::client::RuntimeClient;
use crate::models::RuntimeDataResponse;
use crate::transform;

/// Poll period used when the caller does not pick one.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Published feed state: the held payload plus the flags the dashboard
/// renders (loading indicator, inline error, polling badge).
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub data: Option<Arc<RuntimeDataResponse>>,
    pub loading: bool,
    pub error: Option<String>,
    pub is_polling: bool,
}

impl FeedState {
    pub fn status(&self) -> FeedStatus {
        FeedStatus {
            loading: self.loading,
            error: self.error.clone(),
            is_polling: self.is_polling,
            has_data: self.data.is_some(),
        }
    }
}

/// Wire form of the feed flags (GET /api/state), without the payload body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    pub loading: bool,
    pub error: Option<String>,
    pub is_polling: bool,
    pub has_data: bool,
}

/// Client, channels, and shutdown for the poller.
pub struct PollerDeps {
    pub client: Arc<RuntimeClient>,
    pub feed_tx: watch::Sender<FeedState>,
    pub refetch_rx: mpsc::Receiver<()>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Poller timing config. Callers pass these in; they are deliberately not
/// read from global config here.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub poll_enabled: bool,
    /// Must be > 0 for polling to activate.
    pub poll_interval_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_enabled: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollerConfig {
    pub fn poll_active(&self) -> bool {
        self.poll_enabled && self.poll_interval_ms > 0
    }
}

/// Spawns the poll loop. One visible fetch runs immediately; afterwards the
/// loop serves poll ticks (silent) and manual refetch commands (visible)
/// until shutdown fires or every refetch sender is dropped. Fetches are
/// serialized by the loop itself, so responses cannot resolve out of order.
pub fn spawn(deps: PollerDeps, config: PollerConfig) -> tokio::task::JoinHandle<()> {
    let PollerDeps {
        client,
        feed_tx,
        mut refetch_rx,
        mut shutdown_rx,
    } = deps;
    let poll_active = config.poll_active();

    tokio::spawn(async move {
        feed_tx.send_modify(|state| state.is_polling = poll_active);

        // Initial load is visible; the first poll tick comes one full
        // period later.
        fetch_visible(&client, &feed_tx).await;

        let period = Duration::from_millis(config.poll_interval_ms.max(1));
        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick(), if poll_active => {
                    fetch_silent(&client, &feed_tx).await;
                }
                cmd = refetch_rx.recv() => {
                    match cmd {
                        Some(()) => fetch_visible(&client, &feed_tx).await,
                        None => break,
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Poller shutting down");
                    break;
                }
            }
        }
    })
}

/// Visible fetch (initial load, manual refetch): toggles the loading flag
/// and surfaces a failure in `FeedState::error`. Held data stays put either
/// way.
async fn fetch_visible(client: &RuntimeClient, feed_tx: &watch::Sender<FeedState>) {
    feed_tx.send_modify(|state| {
        state.loading = true;
        state.error = None;
    });
    match client.fetch(true).await {
        Ok(payload) => accept_payload(feed_tx, payload),
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "fetch_visible",
                "runtime-data fetch failed"
            );
            feed_tx.send_modify(|state| {
                state.loading = false;
                state.error = Some(e.to_string());
            });
        }
    }
}

/// Silent fetch (poll tick): no loading flag; a failure is logged and
/// otherwise swallowed, leaving the held state untouched.
async fn fetch_silent(client: &RuntimeClient, feed_tx: &watch::Sender<FeedState>) {
    match client.fetch(true).await {
        Ok(payload) => accept_payload(feed_tx, payload),
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "fetch_silent",
                "poll fetch failed; keeping last data"
            );
        }
    }
}

/// Store a fetched payload. The held payload is replaced only when
/// structurally different; watchers are notified only when some field
/// actually changed.
fn accept_payload(feed_tx: &watch::Sender<FeedState>, payload: Arc<RuntimeDataResponse>) {
    feed_tx.send_if_modified(|state| {
        let mut modified = false;
        if state.loading {
            state.loading = false;
            modified = true;
        }
        if state.error.take().is_some() {
            modified = true;
        }
        let replace = match &state.data {
            Some(held) => **held != *payload,
            None => true,
        };
        if replace {
            if let Some(m) = transform::find_slot_mismatch(&payload) {
                tracing::warn!(
                    date = %m.date,
                    expected = m.expected,
                    actual = m.actual,
                    "per-date slot counts differ; time axis follows the first date"
                );
            }
            tracing::debug!(
                dates = payload.data.len(),
                points = payload.point_count(),
                "payload accepted"
            );
            state.data = Some(payload);
            modified = true;
        }
        modified
    });
}
