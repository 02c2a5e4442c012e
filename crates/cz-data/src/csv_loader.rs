use chrono::{NaiveDate, NaiveDateTime};
use cz_core::month::first_of_month;
use cz_core::record::{CryptoType, Dataset, Region, TradeRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::DataError;

/// One row of `full_data.csv` as stored. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    month: String,
    exchange: String,
    base_asset: String,
    quote_asset: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    crypto_type: String,
    #[serde(default)]
    volume_usd: String,
    #[serde(default)]
    number_of_trades: String,
}

/// Load the base dataset from a CSV file with a header row.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, DataError> {
    let path = path.as_ref();
    let start = Instant::now();
    let file = File::open(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_dataset(BufReader::new(file))?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        exchanges = dataset.exchanges().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parse CSV from any reader. Blank `region` / `crypto_type` cells are
/// classified from the asset codes.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut relabelled: u64 = 0;

    for (i, row) in csv_reader.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let line = i as u64 + 2;
        let row = row?;

        let month = parse_month(&row.month).ok_or_else(|| DataError::InvalidMonth {
            row: line,
            value: row.month.clone(),
        })?;

        let region = match row.region.as_str() {
            "" => Region::classify(&row.quote_asset),
            cell => Region::parse(cell).unwrap_or_else(|| {
                relabelled += 1;
                Region::classify(&row.quote_asset)
            }),
        };
        let crypto_type = match row.crypto_type.as_str() {
            "" => CryptoType::classify(&row.base_asset),
            cell => CryptoType::parse(cell).unwrap_or_else(|| {
                relabelled += 1;
                CryptoType::classify(&row.base_asset)
            }),
        };

        records.push(TradeRecord {
            month,
            volume_usd: parse_number(&row.volume_usd, line, "volume_usd")?,
            number_of_trades: parse_number(&row.number_of_trades, line, "number_of_trades")?
                .round()
                .max(0.0) as u64,
            exchange: row.exchange,
            base_asset: row.base_asset,
            quote_asset: row.quote_asset,
            region,
            crypto_type,
        });
    }

    if relabelled > 0 {
        warn!(cells = relabelled, "unrecognised region/crypto_type labels reclassified");
    }

    Ok(Dataset::new(records))
}

/// Accepts `2024-01-01`, `2024-01`, or a full timestamp; returns the first
/// day of that month.
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(first_of_month(d));
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(d);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| first_of_month(dt.date()))
}

/// Blank cells count as zero.
fn parse_number(s: &str, row: u64, column: &'static str) -> Result<f64, DataError> {
    if s.is_empty() {
        return Ok(0.0);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::InvalidNumber {
            row,
            column,
            value: s.to_string(),
        })
}
