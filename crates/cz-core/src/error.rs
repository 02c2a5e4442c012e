use thiserror::Error;

/// Per-request failures of the dashboard pipeline. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The selection filtered every row away.
    #[error("no data for selection")]
    EmptyResult,
    /// Export form incomplete; carries the user-facing message.
    #[error("{0}")]
    Validation(String),
}
