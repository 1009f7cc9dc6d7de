// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::{mpsc, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::poller::FeedState;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) feed_rx: watch::Receiver<FeedState>,
    pub(crate) refetch_tx: mpsc::Sender<()>,
}

pub fn app(feed_rx: watch::Receiver<FeedState>, refetch_tx: mpsc::Sender<()>) -> Router {
    let state = AppState {
        feed_rx,
        refetch_tx,
    };
    Router::new()
        .route("/", get(|| async { "heatboard: runtime-source heatmap feed" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/state", get(http::state_handler)) // GET /api/state
        .route("/api/data", get(http::data_handler)) // GET /api/data
        .route("/api/sources", get(http::sources_handler)) // GET /api/sources
        .route("/api/dates", get(http::dates_handler)) // GET /api/dates
        .route("/api/heatmap", get(http::heatmap_handler)) // GET /api/heatmap?start&end
        .route("/api/export.csv", get(http::export_csv_handler)) // GET /api/export.csv?start&end
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .route("/ws/feed", get(ws::ws_feed)) // WS /ws/feed
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
