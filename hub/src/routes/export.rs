use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use cz_core::export::{export_rows, format_timestamp, ContactForm, EXPORT_FILENAME};
use cz_core::request::DashboardState;
use cz_data::export_bytes;
use serde::Deserialize;
use std::sync::Arc;

use crate::download_log::LogOutcome;
use crate::error::HubError;
use crate::state::AppState;

/// Current dashboard filters plus the requester's contact details.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    state: DashboardState,
    #[serde(flatten)]
    contact: ContactForm,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/export", post(api_export))
}

/// POST /api/export: filtered rows as a CSV attachment.
///
/// The remote download log is appended in a detached task; its failure never
/// affects the response.
async fn api_export(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HubError> {
    let Json(req) = body?;
    let who = req.contact.validate()?;
    let at = Utc::now();

    let dataset = Arc::clone(&state.dataset);
    let view = req.state;
    let (rows, bytes) = tokio::task::spawn_blocking(move || {
        let rows = export_rows(&dataset, &view);
        export_bytes(&rows).map(|b| (rows.len(), b))
    })
    .await
    .map_err(|e| HubError::Internal(format!("export task failed: {e}")))??;

    tracing::info!(
        timestamp = %format_timestamp(at),
        name = %who.name,
        institution = %who.institution,
        email = %who.email,
        rows,
        "download"
    );

    let log = Arc::clone(&state.download_log);
    let target = state.config.download_log_path.clone();
    tokio::spawn(async move {
        match log.record(&who, at).await {
            Ok(LogOutcome::Written) => tracing::info!(path = %target, "download log updated"),
            Ok(LogOutcome::Skipped) => {
                tracing::warn!(path = %target, "GITHUB_TOKEN not set; remote download log skipped")
            }
            Err(e) => tracing::warn!(path = %target, "download log failed: {e:#}"),
        }
    });

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::{failing_log_state, test_state};
    use axum::http::StatusCode;

    fn request(name: &str) -> ExportRequest {
        serde_json::from_value(serde_json::json!({
            "cryptos": ["btc"],
            "name": name,
            "institution": "BIS",
            "email": "ana@bis.org",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn incomplete_form_is_422() {
        let err = api_export(State(test_state()), Ok(Json(request("  "))))
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn csv_attachment() {
        let resp = api_export(State(test_state()), Ok(Json(request("Ana"))))
            .await
            .unwrap()
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains(EXPORT_FILENAME));
    }

    #[tokio::test]
    async fn failing_remote_log_still_serves_csv() {
        let state = failing_log_state();
        assert!(state.download_log.is_enabled());

        let resp = api_export(State(state), Ok(Json(request("Ana"))))
            .await
            .unwrap()
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "text/csv; charset=utf-8"
        );
        let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains(EXPORT_FILENAME));
    }

    #[test]
    fn request_splits_state_and_contact() {
        let req = request("Ana");
        assert_eq!(req.state.selection.cryptos, vec!["btc".to_string()]);
        assert_eq!(req.contact.name, "Ana");
    }
}
