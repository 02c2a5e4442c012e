//! Trade record model and the immutable base dataset handle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::month::first_of_month;

// ---------------------------------------------------------------------------
// Classification tables
// ---------------------------------------------------------------------------

/// Advanced-economy currencies (upper-case ISO codes).
pub const AE_CURRENCIES: &[&str] = &[
    "AUD", "CAD", "CHF", "CZK", "EUR", "GBP", "JPY", "KRW", "SGD", "USD",
];

/// Emerging-market and developing-economy currencies (upper-case ISO codes).
pub const EMDE_CURRENCIES: &[&str] = &[
    "AED", "ARS", "BRL", "COP", "ERN", "IDR", "INR", "MNT", "MXN", "NGN", "PLN", "RON", "RUB",
    "SCR", "THB", "TRY", "UAH", "ZAR",
];

/// Fiat-backed stablecoin symbols (lower-case).
pub const STABLECOINS: &[&str] = &[
    "usdt", "usdc", "busd", "dai", "tusd", "usdp", "gusd", "frax", "lusd", "usdd", "eurs", "eurt",
    "pyusd", "fdusd", "usde",
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "AEs")]
    Aes,
    #[serde(rename = "EMDEs")]
    Emdes,
    #[serde(rename = "other")]
    Other,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aes => "AEs",
            Self::Emdes => "EMDEs",
            Self::Other => "other",
        }
    }

    /// Classify a quote currency code, case-insensitively.
    pub fn classify(quote_asset: &str) -> Self {
        let code = quote_asset.trim().to_ascii_uppercase();
        if AE_CURRENCIES.contains(&code.as_str()) {
            Self::Aes
        } else if EMDE_CURRENCIES.contains(&code.as_str()) {
            Self::Emdes
        } else {
            Self::Other
        }
    }

    /// Parse a region cell. Returns `None` for blank or unknown labels.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "AEs" | "AE" => Some(Self::Aes),
            "EMDEs" | "EMDE" => Some(Self::Emdes),
            "other" | "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CryptoType {
    Stablecoins,
    Unbacked,
}

impl CryptoType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stablecoins => "Stablecoins",
            Self::Unbacked => "Unbacked",
        }
    }

    pub fn classify(base_asset: &str) -> Self {
        let sym = base_asset.trim().to_ascii_lowercase();
        if STABLECOINS.contains(&sym.as_str()) {
            Self::Stablecoins
        } else {
            Self::Unbacked
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Stablecoins" | "stablecoins" => Some(Self::Stablecoins),
            "Unbacked" | "unbacked" => Some(Self::Unbacked),
            _ => None,
        }
    }
}

impl fmt::Display for CryptoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column summed by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    VolumeUsd,
    NumberOfTrades,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VolumeUsd => "volume_usd",
            Self::NumberOfTrades => "number_of_trades",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VolumeUsd => "Volume (USD)",
            Self::NumberOfTrades => "Trades",
        }
    }

    #[inline]
    pub fn value(self, rec: &TradeRecord) -> f64 {
        match self {
            Self::VolumeUsd => rec.volume_usd,
            Self::NumberOfTrades => rec.number_of_trades as f64,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the monthly base dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    /// First day of the month.
    pub month: NaiveDate,
    pub exchange: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub region: Region,
    pub crypto_type: CryptoType,
    pub volume_usd: f64,
    pub number_of_trades: u64,
}

/// Read-only base dataset, built once and shared between requests.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<TradeRecord>,
    min_month: Option<NaiveDate>,
    max_month: Option<NaiveDate>,
    exchanges: Vec<String>,
    fiats: Vec<String>,
    cryptos: Vec<String>,
}

impl Dataset {
    /// Months are normalised to the first day on the way in.
    pub fn new(mut records: Vec<TradeRecord>) -> Self {
        for r in &mut records {
            r.month = first_of_month(r.month);
        }
        let min_month = records.iter().map(|r| r.month).min();
        let max_month = records.iter().map(|r| r.month).max();

        let mut exchanges = BTreeSet::new();
        let mut fiats = BTreeSet::new();
        let mut cryptos = BTreeSet::new();
        for r in &records {
            exchanges.insert(r.exchange.clone());
            fiats.insert(r.quote_asset.clone());
            cryptos.insert(r.base_asset.clone());
        }

        Self {
            records,
            min_month,
            max_month,
            exchanges: exchanges.into_iter().collect(),
            fiats: fiats.into_iter().collect(),
            cryptos: cryptos.into_iter().collect(),
        }
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_month(&self) -> Option<NaiveDate> {
        self.min_month
    }

    pub fn max_month(&self) -> Option<NaiveDate> {
        self.max_month
    }

    /// Distinct exchanges, sorted.
    pub fn exchanges(&self) -> &[String] {
        &self.exchanges
    }

    /// Distinct quote assets, sorted.
    pub fn fiats(&self) -> &[String] {
        &self.fiats
    }

    /// Distinct base assets, sorted.
    pub fn cryptos(&self) -> &[String] {
        &self.cryptos
    }
}
