//! Dashboard logic for crypto trading statistics: selection resolution,
//! filtering, aggregation and the derived tables. Pure and synchronous.

pub mod aggregate;
pub mod analysis;
pub mod chart;
pub mod error;
pub mod export;
pub mod filter;
pub mod month;
pub mod names;
pub mod options;
pub mod record;
pub mod request;
pub mod selection;
pub mod title;

pub use error::CoreError;
pub use record::{CryptoType, Dataset, Metric, Region, TradeRecord};
