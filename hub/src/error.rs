use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cz_core::CoreError;
use cz_data::DataError;
use serde_json::json;

/// Unified error type for hub API responses.
#[derive(Debug)]
pub enum HubError {
    BadRequest(String),
    /// Well-formed request the dashboard refuses (incomplete export form).
    Validation(String),
    Data(String),
    Internal(String),
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::Data(msg) => write!(f, "data_error: {msg}"),
            Self::Internal(msg) => write!(f, "internal_error: {msg}"),
        }
    }
}

impl std::error::Error for HubError {}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let (status, error_str) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::Data(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("data_error:{msg}")),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!("{self}");
        }

        let body = json!({ "error": error_str });
        (status, axum::Json(body)).into_response()
    }
}

/// `EmptyResult` never reaches here: handlers turn it into an empty 200 body.
impl From<CoreError> for HubError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::EmptyResult => Self::Internal(e.to_string()),
        }
    }
}

impl From<DataError> for HubError {
    fn from(e: DataError) -> Self {
        Self::Data(e.to_string())
    }
}

impl From<JsonRejection> for HubError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for HubError {
    fn from(e: QueryRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}
