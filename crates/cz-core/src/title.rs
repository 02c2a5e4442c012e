//! Headline text above the chart.

use serde::Serialize;

use crate::request::DashboardState;
use crate::selection::{CryptoSpecial, FiatSpecial, Mode};

/// Literal codes named before collapsing the rest into `+N`.
const MAX_LISTED: usize = 3;

/// Shown for a facet whose selection names nothing recognisable.
pub const NO_MATCH_DESC: &str = "No Matching Selection";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    pub title: String,
    pub subtitle: String,
}

pub fn dashboard_title(state: &DashboardState) -> Title {
    let selection = state.selection.resolve();

    let fiat_desc = match &selection.fiat.mode {
        Mode::All => "All Regions".to_string(),
        Mode::Special(FiatSpecial::AeVsEmde) => "AEs vs EMDEs".to_string(),
        Mode::Special(FiatSpecial::AeOnly) => "Advanced Economies".to_string(),
        Mode::Special(FiatSpecial::EmdeOnly) => "Emerging Markets".to_string(),
        Mode::Literal(_) => list_desc(selection.fiat.named_literals()),
    };

    let crypto_desc = match &selection.crypto.mode {
        Mode::All => "All Cryptos".to_string(),
        Mode::Special(CryptoSpecial::StableVsUnbacked) => "Stablecoins vs Unbacked".to_string(),
        Mode::Special(CryptoSpecial::Fsb4Cat) => "USDT+Stables vs BTC+Unbacked".to_string(),
        Mode::Special(CryptoSpecial::Stablecoins) => "Stablecoins".to_string(),
        Mode::Special(CryptoSpecial::Unbacked) => "Unbacked Crypto".to_string(),
        Mode::Literal(_) => list_desc(selection.crypto.named_literals()),
    };

    Title {
        title: format!(
            "{crypto_desc} Trading {} — {fiat_desc}",
            state.metric.label()
        ),
        subtitle: format!(
            "{} view, {} data",
            state.view.label(),
            state.frequency.label()
        ),
    }
}

/// `"USD, EUR, GBP +2"`, or [`NO_MATCH_DESC`] when only unknown specials
/// were picked.
fn list_desc<'a>(codes: impl Iterator<Item = &'a String>) -> String {
    let shown: Vec<&String> = codes.collect();
    if shown.is_empty() {
        return NO_MATCH_DESC.to_string();
    }
    let mut desc = shown
        .iter()
        .take(MAX_LISTED)
        .map(|c| c.to_uppercase())
        .collect::<Vec<_>>()
        .join(", ");
    if shown.len() > MAX_LISTED {
        desc.push_str(&format!(" +{}", shown.len() - MAX_LISTED));
    }
    desc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metric;
    use crate::request::{Frequency, View};
    use crate::selection::RawSelection;

    fn state(fiats: &[&str], cryptos: &[&str]) -> DashboardState {
        DashboardState {
            selection: RawSelection {
                exchanges: Vec::new(),
                fiats: fiats.iter().map(|s| s.to_string()).collect(),
                cryptos: cryptos.iter().map(|s| s.to_string()).collect(),
            },
            ..DashboardState::default()
        }
    }

    #[test]
    fn defaults() {
        let t = dashboard_title(&DashboardState::default());
        assert_eq!(t.title, "All Cryptos Trading Volume (USD) — All Regions");
        assert_eq!(t.subtitle, "Evolution view, Monthly data");
    }

    #[test]
    fn specials_and_lists() {
        let mut s = state(
            &["SPECIAL:AE_VS_EMDE"],
            &["btc", "eth", "usdt", "sol", "ada"],
        );
        s.metric = Metric::NumberOfTrades;
        s.view = View::Ranking;
        s.frequency = Frequency::Daily;
        let t = dashboard_title(&s);
        assert_eq!(t.title, "BTC, ETH, USDT +2 Trading Trades — AEs vs EMDEs");
        assert_eq!(t.subtitle, "Ranking view, Daily data");

        let t = dashboard_title(&state(&["usd", "EXCL:eur"], &["SPECIAL:UNBACKED"]));
        assert_eq!(t.title, "Unbacked Crypto Trading Volume (USD) — USD");
    }
    #[test]
    fn unknown_specials_are_hidden_with_fallback() {
        let t = dashboard_title(&state(&["SPECIAL:NOPE", "usd"], &[]));
        assert_eq!(t.title, "All Cryptos Trading Volume (USD) — USD");

        let t = dashboard_title(&state(&["SPECIAL:NOPE"], &["SPECIAL:WHAT"]));
        assert_eq!(
            t.title,
            format!("{NO_MATCH_DESC} Trading Volume (USD) — {NO_MATCH_DESC}")
        );
    }
}
