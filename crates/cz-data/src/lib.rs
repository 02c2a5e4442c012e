//! File I/O for the dashboard: dataset loading, reference names and CSV export.

pub mod csv_export;
pub mod csv_loader;
pub mod error;
pub mod reference;

pub use csv_export::{export_bytes, write_export};
pub use csv_loader::{load_dataset, read_dataset};
pub use error::DataError;
pub use reference::ReferenceNames;
