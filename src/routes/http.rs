// GET/POST handlers: version, feed state, chart shapes, CSV export, refresh

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc::error::TrySendError;

use super::AppState;
use crate::models::{DateRange, HeatmapGrid};
use crate::version::{NAME, VERSION};
use crate::{export, transform};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/state — the feed flags without the payload body.
pub(super) async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.feed_rx.borrow().status();
    axum::Json(status)
}

/// GET /api/data — the currently held upstream payload.
pub(super) async fn data_handler(State(state): State<AppState>) -> Response {
    let data = state.feed_rx.borrow().data.clone();
    match data {
        Some(payload) => axum::Json(payload.as_ref().clone()).into_response(),
        None => no_data_response(),
    }
}

/// GET /api/sources — legend entries; empty before the first successful fetch.
pub(super) async fn sources_handler(State(state): State<AppState>) -> impl IntoResponse {
    let sources = match &state.feed_rx.borrow().data {
        Some(payload) => payload.meta.sources.clone(),
        None => Vec::new(),
    };
    axum::Json(sources)
}

/// GET /api/dates — all payload dates, ascending.
pub(super) async fn dates_handler(State(state): State<AppState>) -> impl IntoResponse {
    let dates = match &state.feed_rx.borrow().data {
        Some(payload) => transform::extract_dates(payload),
        None => Vec::new(),
    };
    axum::Json(dates)
}

/// GET /api/heatmap?start&end — chart-ready grid for the inclusive range.
/// Unset bounds mean nothing is selected: the time axis and legend are
/// still populated, the date axis and cells are empty.
pub(super) async fn heatmap_handler(
    Query(range): Query<DateRange>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let data = state.feed_rx.borrow().data.clone();
    let grid = match data {
        Some(payload) => {
            let all_dates = transform::extract_dates(&payload);
            let times = transform::extract_time_slots(&payload, &all_dates);
            let dates = transform::filter_dates_by_range(&all_dates, &range.start, &range.end);
            let points = transform::heatmap_points(&payload, &dates);
            HeatmapGrid {
                dates,
                times,
                sources: payload.meta.sources.clone(),
                points,
            }
        }
        None => HeatmapGrid::empty(),
    };
    axum::Json(grid)
}

/// GET /api/export.csv?start&end — CSV download for the filtered range.
pub(super) async fn export_csv_handler(
    Query(range): Query<DateRange>,
    State(state): State<AppState>,
) -> Response {
    let data = state.feed_rx.borrow().data.clone();
    let Some(payload) = data else {
        return no_data_response();
    };

    let all_dates = transform::extract_dates(&payload);
    let dates = transform::filter_dates_by_range(&all_dates, &range.start, &range.end);
    let csv = match export::to_csv(&payload, &dates) {
        Ok(csv) => csv,
        Err(e) => {
            tracing::warn!(error = %e, operation = "export_csv", "CSV export failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let filename = if range.is_unset() || !filename_safe(&range.start) || !filename_safe(&range.end)
    {
        "runtime-data.csv".to_string()
    } else {
        format!("runtime-data_{}_{}.csv", range.start, range.end)
    };
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response()
}

/// POST /api/refresh — queue a visible refetch; the poller runs it in turn.
/// A refresh already waiting is not queued twice.
pub(super) async fn refresh_handler(State(state): State<AppState>) -> Response {
    match state.refetch_tx.try_send(()) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            axum::Json(serde_json::json!({ "status": "refresh scheduled" })),
        )
            .into_response(),
        Err(TrySendError::Full(())) => (
            StatusCode::ACCEPTED,
            axum::Json(serde_json::json!({ "status": "refresh already pending" })),
        )
            .into_response(),
        Err(TrySendError::Closed(())) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

fn no_data_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        axum::Json(serde_json::json!({ "error": "no runtime data fetched yet" })),
    )
        .into_response()
}

/// Range bounds are expected to be ISO dates; anything else stays out of
/// the Content-Disposition header.
fn filename_safe(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
