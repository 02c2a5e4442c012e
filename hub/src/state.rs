use cz_core::record::Dataset;
use cz_data::ReferenceNames;
use std::sync::Arc;

use crate::config::HubConfig;
use crate::download_log::DownloadLog;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
///
/// The dataset is loaded once before the server starts and never mutated.
pub struct AppState {
    pub config: HubConfig,
    pub dataset: Arc<Dataset>,
    pub names: ReferenceNames,
    pub download_log: Arc<DownloadLog>,
}

impl AppState {
    pub fn new(
        config: HubConfig,
        dataset: Dataset,
        names: ReferenceNames,
        download_log: DownloadLog,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            dataset: Arc::new(dataset),
            names,
            download_log: Arc::new(download_log),
        })
    }
}
