use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use cz_core::chart::ChartResponse;
use cz_core::request::SimpleState;
use std::sync::Arc;

use crate::error::HubError;
use crate::routes::dashboard::chart_for;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/simple/chart", post(api_simple_chart))
}

/// POST /api/simple/chart: AEs vs EMDEs, stablecoins vs unbacked, stacked bars.
async fn api_simple_chart(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimpleState>, JsonRejection>,
) -> Result<Json<ChartResponse>, HubError> {
    let Json(simple) = body?;
    Ok(Json(chart_for(state, simple.to_dashboard()).await?))
}
