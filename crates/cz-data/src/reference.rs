use cz_core::names::NameLookup;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::DataError;

/// Country or area behind each quote currency.
const FIAT_COUNTRIES: &[(&str, &str)] = &[
    // Latin America
    ("ars", "Argentina"),
    ("brl", "Brazil"),
    ("mxn", "Mexico"),
    ("clp", "Chile"),
    ("cop", "Colombia"),
    ("pen", "Peru"),
    // North America
    ("usd", "USA"),
    ("cad", "Canada"),
    // Europe
    ("eur", "Eurozone"),
    ("gbp", "UK"),
    ("chf", "Switzerland"),
    ("pln", "Poland"),
    ("czk", "Czech"),
    ("sek", "Sweden"),
    ("nok", "Norway"),
    ("dkk", "Denmark"),
    ("ron", "Romania"),
    ("bgn", "Bulgaria"),
    ("hrk", "Croatia"),
    // Asia-Pacific
    ("jpy", "Japan"),
    ("krw", "Korea"),
    ("cny", "China"),
    ("hkd", "Hong Kong"),
    ("sgd", "Singapore"),
    ("inr", "India"),
    ("aud", "Australia"),
    ("nzd", "New Zealand"),
    ("thb", "Thailand"),
    ("php", "Philippines"),
    ("idr", "Indonesia"),
    ("myr", "Malaysia"),
    ("vnd", "Vietnam"),
    ("pkr", "Pakistan"),
    ("bdt", "Bangladesh"),
    ("lkr", "Sri Lanka"),
    // Middle East and Africa
    ("try", "Turkey"),
    ("sar", "Saudi Arabia"),
    ("aed", "UAE"),
    ("ils", "Israel"),
    ("zar", "South Africa"),
    ("egp", "Egypt"),
    ("ngn", "Nigeria"),
    ("kwd", "Kuwait"),
    ("bhd", "Bahrain"),
    ("omr", "Oman"),
    ("qar", "Qatar"),
    ("jod", "Jordan"),
    // Eastern Europe and Central Asia
    ("rub", "Russia"),
    ("uah", "Ukraine"),
    ("kzt", "Kazakhstan"),
    ("scr", "Seychelles"),
    ("ern", "Eritrea"),
    ("mnt", "Mongolia"),
];

/// Used when no asset metadata file is available.
const FALLBACK_CRYPTO_NAMES: &[(&str, &str)] = &[
    ("btc", "Bitcoin"),
    ("eth", "Ethereum"),
    ("usdt", "Tether"),
    ("usdc", "USD Coin"),
    ("xrp", "Ripple"),
    ("bnb", "Binance Coin"),
    ("ada", "Cardano"),
    ("doge", "Dogecoin"),
];

#[derive(Debug, Deserialize)]
struct MetadataRow {
    codigo: String,
    nombre: String,
}

/// Reference names for fiat and crypto codes, keyed by lower-case code.
#[derive(Debug, Clone)]
pub struct ReferenceNames {
    fiats: FxHashMap<String, String>,
    cryptos: FxHashMap<String, String>,
}

impl Default for ReferenceNames {
    fn default() -> Self {
        Self {
            fiats: to_map(FIAT_COUNTRIES),
            cryptos: to_map(FALLBACK_CRYPTO_NAMES),
        }
    }
}

impl ReferenceNames {
    /// Crypto names from the asset metadata CSV (`codigo`, `nombre` columns).
    /// A missing file falls back to the built-in names; a malformed one is an error.
    pub fn load(metadata_path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = metadata_path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "asset metadata not found; using built-in crypto names");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(DataError::Open {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let names = Self::from_metadata(BufReader::new(file))?;
        debug!(path = %path.display(), cryptos = names.cryptos.len(), "asset metadata loaded");
        Ok(names)
    }

    pub fn from_metadata<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut cryptos = FxHashMap::default();
        for row in csv_reader.deserialize::<MetadataRow>() {
            let row = row?;
            if row.codigo.is_empty() || row.nombre.is_empty() {
                continue;
            }
            cryptos.insert(row.codigo.to_lowercase(), row.nombre);
        }
        Ok(Self {
            fiats: to_map(FIAT_COUNTRIES),
            cryptos,
        })
    }
}

impl NameLookup for ReferenceNames {
    fn fiat_country(&self, code: &str) -> Option<&str> {
        self.fiats.get(&code.to_lowercase()).map(String::as_str)
    }

    fn crypto_name(&self, code: &str) -> Option<&str> {
        self.cryptos.get(&code.to_lowercase()).map(String::as_str)
    }
}

fn to_map(pairs: &[(&str, &str)]) -> FxHashMap<String, String> {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
