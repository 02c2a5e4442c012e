use cz_core::export::EXPORT_COLUMNS;
use cz_core::record::TradeRecord;
use std::io::Write;

use crate::error::DataError;

/// Write rows in the fixed export column order, header first.
pub fn write_export<W: Write>(writer: W, rows: &[&TradeRecord]) -> Result<(), DataError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(EXPORT_COLUMNS)?;
    for r in rows {
        w.write_record([
            r.month.format("%Y-%m-%d").to_string(),
            r.exchange.clone(),
            r.base_asset.clone(),
            r.quote_asset.clone(),
            r.region.as_str().to_string(),
            r.crypto_type.as_str().to_string(),
            r.volume_usd.to_string(),
            r.number_of_trades.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// In-memory export, for HTTP bodies.
pub fn export_bytes(rows: &[&TradeRecord]) -> Result<Vec<u8>, DataError> {
    let mut buf = Vec::new();
    write_export(&mut buf, rows)?;
    Ok(buf)
}
