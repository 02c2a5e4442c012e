use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use cz_core::analysis::{build_analysis, AnalysisResponse};
use cz_core::chart::{build_chart, ChartResponse};
use cz_core::month::{month_label, MonthRange};
use cz_core::options::{selector_options, SelectorOptions};
use cz_core::request::DashboardState;
use cz_core::title::{dashboard_title, Title};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::error::HubError;
use crate::state::AppState;

// ── Query params / bodies ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DateLabelsQuery {
    start: i32,
    end: i32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DateLabels {
    start: String,
    end: String,
}

// ── Route definitions ────────────────────────────────────────────────────

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/options", get(api_options))
        .route("/api/date-labels", get(api_date_labels))
        .route("/api/title", post(api_title))
        .route("/api/chart", post(api_chart))
        .route("/api/analysis", post(api_analysis))
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// GET /api/options: selector vocabularies and slider bounds.
async fn api_options(State(state): State<Arc<AppState>>) -> Json<SelectorOptions> {
    Json(selector_options(&state.dataset, &state.names))
}

/// GET /api/date-labels?start=&end=: `"Jan 2024"` labels for slider indices.
async fn api_date_labels(
    q: Result<Query<DateLabelsQuery>, QueryRejection>,
) -> Result<Json<DateLabels>, HubError> {
    let Query(q) = q?;
    let range = MonthRange::new(q.start, q.end);
    let label = |idx: i32| {
        month_label(idx).ok_or_else(|| HubError::BadRequest(format!("month index out of range: {idx}")))
    };
    Ok(Json(DateLabels {
        start: label(range.start)?,
        end: label(range.end)?,
    }))
}

/// POST /api/title
async fn api_title(body: Result<Json<DashboardState>, JsonRejection>) -> Result<Json<Title>, HubError> {
    let Json(req) = body?;
    Ok(Json(dashboard_title(&req)))
}

/// POST /api/chart: panels and series for the current selection.
pub(crate) async fn api_chart(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DashboardState>, JsonRejection>,
) -> Result<Json<ChartResponse>, HubError> {
    let Json(req) = body?;
    Ok(Json(chart_for(state, req).await?))
}

pub(crate) async fn chart_for(
    state: Arc<AppState>,
    req: DashboardState,
) -> Result<ChartResponse, HubError> {
    let started = Instant::now();
    let chart = tokio::task::spawn_blocking(move || {
        build_chart(&state.dataset, &req, &state.names)
    })
    .await
    .map_err(|e| HubError::Internal(format!("chart task failed: {e}")))?;

    let panels = match &chart {
        ChartResponse::Figure(fig) => fig.panels.len(),
        ChartResponse::Empty { .. } => 0,
    };
    tracing::debug!(
        panels,
        elapsed_us = started.elapsed().as_micros() as u64,
        "chart built"
    );
    Ok(chart)
}

/// POST /api/analysis: latest-month levels with MoM / YoY changes.
async fn api_analysis(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DashboardState>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, HubError> {
    let Json(req) = body?;
    let result = tokio::task::spawn_blocking(move || build_analysis(&state.dataset, &req))
        .await
        .map_err(|e| HubError::Internal(format!("analysis task failed: {e}")))?;

    Ok(Json(AnalysisResponse::from_result(result)?))
}
