//! Shared row filter used by the chart, the analysis table and the export.

use crate::month::MonthRange;
use crate::record::{CryptoType, Dataset, Region, TradeRecord};
use crate::selection::{CryptoSpecial, FiatSpecial, Mode, Selection};

pub const FSB_USDT: &str = "USDT";
pub const FSB_BTC: &str = "BTC";
pub const FSB_OTHER_STABLES: &str = "Other Stables";
pub const FSB_OTHER_UNBACKED: &str = "Other Unbacked";

/// Labels produced by the four-category split, in display order.
pub const FSB_LABELS: &[&str] = &[FSB_USDT, FSB_OTHER_STABLES, FSB_BTC, FSB_OTHER_UNBACKED];

/// Filtered view over the base dataset. Rows are borrowed, never modified.
pub fn filter_rows<'a>(
    dataset: &'a Dataset,
    selection: &Selection,
    range: Option<MonthRange>,
) -> Vec<&'a TradeRecord> {
    dataset
        .records()
        .iter()
        .filter(|r| range.map_or(true, |rg| rg.contains(r.month)))
        .filter(|r| !is_excluded(selection, r))
        .filter(|r| matches_inclusion(selection, r))
        .collect()
}

/// Exclusions run first and unconditionally.
fn is_excluded(sel: &Selection, r: &TradeRecord) -> bool {
    sel.exchange.is_excluded(&r.exchange)
        || sel.fiat.is_excluded(&r.quote_asset)
        || sel.crypto.is_excluded(&r.base_asset)
}

fn matches_inclusion(sel: &Selection, r: &TradeRecord) -> bool {
    let exchange_ok = match &sel.exchange.mode {
        Mode::Literal(values) => values.contains(&r.exchange),
        Mode::All | Mode::Special(_) => true,
    };

    let fiat_ok = match &sel.fiat.mode {
        Mode::All => true,
        Mode::Literal(values) => values.contains(&r.quote_asset),
        Mode::Special(FiatSpecial::AeVsEmde) => matches!(r.region, Region::Aes | Region::Emdes),
        Mode::Special(FiatSpecial::AeOnly) => r.region == Region::Aes,
        Mode::Special(FiatSpecial::EmdeOnly) => r.region == Region::Emdes,
    };

    let crypto_ok = match &sel.crypto.mode {
        Mode::All => true,
        Mode::Literal(values) => values.contains(&r.base_asset),
        Mode::Special(CryptoSpecial::Stablecoins) => r.crypto_type == CryptoType::Stablecoins,
        Mode::Special(CryptoSpecial::Unbacked) => r.crypto_type == CryptoType::Unbacked,
        Mode::Special(CryptoSpecial::Fsb4Cat | CryptoSpecial::StableVsUnbacked) => true,
    };

    exchange_ok && fiat_ok && crypto_ok
}

// ---------------------------------------------------------------------------
// Series remapping
// ---------------------------------------------------------------------------

/// How a row's base asset maps onto a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesGrouping {
    Asset,
    CryptoType,
    Fsb4Cat,
}

impl SeriesGrouping {
    pub fn for_selection(sel: &Selection) -> Self {
        match sel.crypto.special() {
            Some(CryptoSpecial::Fsb4Cat) => Self::Fsb4Cat,
            Some(CryptoSpecial::StableVsUnbacked) => Self::CryptoType,
            _ => Self::Asset,
        }
    }

    /// Series key for a row. Remapping happens here, before any grouping.
    pub fn key<'a>(self, r: &'a TradeRecord) -> &'a str {
        match self {
            Self::Asset => &r.base_asset,
            Self::CryptoType => r.crypto_type.as_str(),
            Self::Fsb4Cat => fsb_category(r),
        }
    }

    pub fn is_composite(self) -> bool {
        !matches!(self, Self::Asset)
    }
}

fn fsb_category(r: &TradeRecord) -> &'static str {
    match r.base_asset.as_str() {
        "usdt" => FSB_USDT,
        "btc" => FSB_BTC,
        _ if r.crypto_type == CryptoType::Stablecoins => FSB_OTHER_STABLES,
        _ => FSB_OTHER_UNBACKED,
    }
}

// ---------------------------------------------------------------------------
// Panel splitting
// ---------------------------------------------------------------------------

/// Side-by-side panel layout, with caller-supplied panel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelSplit {
    Single,
    Region(Vec<Region>),
    Fiat(Vec<String>),
}

impl PanelSplit {
    /// Region panels for the AEs-vs-EMDEs comparison, one panel per fiat when
    /// more than one fiat is picked individually.
    pub fn for_selection(sel: &Selection) -> Self {
        match &sel.fiat.mode {
            Mode::Special(FiatSpecial::AeVsEmde) => Self::Region(vec![Region::Aes, Region::Emdes]),
            Mode::Literal(_) => {
                let fiats: Vec<String> = sel.fiat.named_literals().cloned().collect();
                if fiats.len() > 1 {
                    Self::Fiat(fiats)
                } else {
                    Self::Single
                }
            }
            _ => Self::Single,
        }
    }

    /// Panel keys in display order; empty for a single panel.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::Single => Vec::new(),
            Self::Region(regions) => regions.iter().map(|r| r.as_str().to_string()).collect(),
            Self::Fiat(fiats) => fiats.clone(),
        }
    }

    pub fn key<'a>(&self, r: &'a TradeRecord) -> Option<&'a str> {
        match self {
            Self::Single => None,
            Self::Region(_) => Some(r.region.as_str()),
            Self::Fiat(_) => Some(&r.quote_asset),
        }
    }
}
