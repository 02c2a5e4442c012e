pub mod dashboard;
pub mod export;
pub mod simple;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Assemble the API router.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(dashboard::routes())
        .merge(export::routes())
        .merge(simple::routes())
}
