//! Dashboard control state as posted by the client.

use serde::{Deserialize, Serialize};

use crate::aggregate::Stacking;
use crate::month::MonthRange;
use crate::record::{Dataset, Metric};
use crate::selection::{CryptoSpecial, FiatSpecial, RawSelection, SpecialVocabulary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Evolution,
    Ranking,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            Self::Evolution => "Evolution",
            Self::Ranking => "Ranking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    #[serde(rename = "M")]
    Monthly,
    #[serde(rename = "D")]
    Daily,
}

impl Frequency {
    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Daily => "Daily",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
}

/// Every control on the full dashboard. Missing fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardState {
    #[serde(flatten)]
    pub selection: RawSelection,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub stacking: Stacking,
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub chart_type: ChartType,
    /// `[start, end]` month indices; the trailing 24 months when absent.
    #[serde(default)]
    pub date_range: Option<[i32; 2]>,
}

impl DashboardState {
    /// Effective month range. `None` only for an empty dataset.
    pub fn range(&self, dataset: &Dataset) -> Option<MonthRange> {
        match self.date_range {
            Some(pair) => Some(MonthRange::from_pair(pair)),
            None => default_range(dataset),
        }
    }
}

pub fn default_range(dataset: &Dataset) -> Option<MonthRange> {
    Some(MonthRange::default_for(dataset.min_month()?, dataset.max_month()?))
}

/// Controls of the simplified dashboard: two toggles and an optional range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleState {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub stacking: Stacking,
    #[serde(default)]
    pub date_range: Option<[i32; 2]>,
}

impl SimpleState {
    /// Equivalent full-dashboard state: AEs vs EMDEs panels, stablecoins vs
    /// unbacked series, stacked bars.
    pub fn to_dashboard(&self) -> DashboardState {
        DashboardState {
            selection: RawSelection {
                exchanges: Vec::new(),
                fiats: vec![FiatSpecial::AeVsEmde.token()],
                cryptos: vec![CryptoSpecial::StableVsUnbacked.token()],
            },
            stacking: self.stacking,
            metric: self.metric,
            chart_type: ChartType::Bar,
            date_range: self.date_range,
            ..DashboardState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_deserializes_with_defaults() {
        let state: DashboardState = serde_json::from_str(
            r#"{"fiats": ["SPECIAL:AE"], "metric": "number_of_trades", "frequency": "D"}"#,
        )
        .unwrap();
        assert_eq!(state.selection.fiats, vec!["SPECIAL:AE".to_string()]);
        assert!(state.selection.exchanges.is_empty());
        assert_eq!(state.metric, Metric::NumberOfTrades);
        assert_eq!(state.frequency, Frequency::Daily);
        assert_eq!(state.stacking, Stacking::Absolute);
        assert_eq!(state.chart_type, ChartType::Bar);
        assert_eq!(state.date_range, None);
    }

    #[test]
    fn simple_state_maps_to_comparison_selection() {
        let simple = SimpleState {
            metric: Metric::VolumeUsd,
            stacking: Stacking::Percent,
            date_range: Some([10, 20]),
        };
        let full = simple.to_dashboard();
        let sel = full.selection.resolve();
        assert_eq!(sel.fiat.special(), Some(FiatSpecial::AeVsEmde));
        assert_eq!(sel.crypto.special(), Some(CryptoSpecial::StableVsUnbacked));
        assert_eq!(full.stacking, Stacking::Percent);
        assert_eq!(full.date_range, Some([10, 20]));
    }
}
