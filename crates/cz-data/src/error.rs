use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid month {value:?}")]
    InvalidMonth { row: u64, value: String },
    #[error("row {row}: invalid {column} {value:?}")]
    InvalidNumber {
        row: u64,
        column: &'static str,
        value: String,
    },
}
