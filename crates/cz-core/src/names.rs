//! Display-name lookups and the chart palette.

use crate::filter::{FSB_BTC, FSB_LABELS, FSB_OTHER_STABLES, FSB_OTHER_UNBACKED, FSB_USDT};

/// Reference names for codes. Implementations fall back to `None`; callers
/// decide how to render the raw code.
pub trait NameLookup {
    /// Country or area behind a fiat code (`"usd"` → `"USA"`).
    fn fiat_country(&self, code: &str) -> Option<&str>;

    /// Long name of a crypto symbol (`"btc"` → `"Bitcoin"`).
    fn crypto_name(&self, code: &str) -> Option<&str>;

    /// Panel title for a fiat panel: country name, else the upper-cased code.
    fn fiat_title(&self, code: &str) -> String {
        self.fiat_country(code)
            .map(str::to_string)
            .unwrap_or_else(|| code.to_uppercase())
    }
}

const ORANGE: &str = "#E59400";
const ORANGE_50: &str = "rgba(229, 148, 0, 0.5)";
const GREEN: &str = "#4A7C59";
const GREEN_50: &str = "rgba(74, 124, 89, 0.5)";
const GREY: &str = "#999999";
const FALLBACK: &str = "#999";

/// Series colour: BTC and USDT at full opacity, the rest of their family at 50%.
pub fn series_color(key: &str) -> &'static str {
    match key {
        "btc" | FSB_BTC | "AEs" => ORANGE,
        "Unbacked" | "eth" | "other unbacked" | FSB_OTHER_UNBACKED => ORANGE_50,
        "usdt" | FSB_USDT | "EMDEs" => GREEN,
        "Stablecoins" | "usdc" | "usdc + other" | FSB_OTHER_STABLES => GREEN_50,
        "otros" => GREY,
        _ => {
            let lower = key.to_lowercase();
            if lower != key {
                series_color(&lower)
            } else {
                FALLBACK
            }
        }
    }
}

/// Legend label: FSB categories verbatim, everything else upper-cased.
pub fn series_label(key: &str) -> String {
    if FSB_LABELS.contains(&key) {
        key.to_string()
    } else {
        key.to_uppercase()
    }
}
