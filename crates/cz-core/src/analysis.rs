//! Period-over-period analysis table.
//!
//! Works on the same filtered rows as the chart so that on-screen totals
//! agree. Levels are raw sums (never display-scaled). A change against a
//! zero or missing reference period is `None`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::chart::NO_DATA_MESSAGE;
use crate::error::CoreError;
use crate::filter::filter_rows;
use crate::month::shift_months;
use crate::record::{CryptoType, Dataset, Metric, Region, TradeRecord};
use crate::request::DashboardState;
use crate::selection::{CryptoSpecial, FiatSpecial, Selection};

pub const UNAVAILABLE: &str = "—";
pub const TOTAL_LABEL: &str = "Total";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub label: String,
    /// Raw metric sum for the latest month.
    pub level: f64,
    pub level_display: String,
    pub mom_pct: Option<f64>,
    pub yoy_pct: Option<f64>,
    pub mom_display: String,
    pub yoy_display: String,
    pub is_total: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisTable {
    pub metric: Metric,
    pub latest_month: NaiveDate,
    pub rows: Vec<AnalysisRow>,
}

/// Analysis body, or the explicit no-data variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResponse {
    Empty { message: String },
    Table(AnalysisTable),
}

impl AnalysisResponse {
    /// `EmptyResult` becomes the no-data variant; anything else propagates.
    pub fn from_result(result: Result<AnalysisTable, CoreError>) -> Result<Self, CoreError> {
        match result {
            Ok(table) => Ok(Self::Table(table)),
            Err(CoreError::EmptyResult) => Ok(Self::Empty {
                message: NO_DATA_MESSAGE.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

/// Filter with the dashboard state, then compare periods.
pub fn build_analysis(dataset: &Dataset, state: &DashboardState) -> Result<AnalysisTable, CoreError> {
    let selection = state.selection.resolve();
    let rows = filter_rows(dataset, &selection, state.range(dataset));
    period_analysis(&rows, &selection, state.metric)
}

pub fn period_analysis(
    rows: &[&TradeRecord],
    selection: &Selection,
    metric: Metric,
) -> Result<AnalysisTable, CoreError> {
    let latest = rows
        .iter()
        .map(|r| r.month)
        .max()
        .ok_or(CoreError::EmptyResult)?;
    let periods = Periods {
        latest,
        prev: shift_months(latest, -1),
        year_ago: shift_months(latest, -12),
    };

    let mut out = Vec::new();

    if selection.crypto.special() == Some(CryptoSpecial::StableVsUnbacked) {
        for ty in [CryptoType::Stablecoins, CryptoType::Unbacked] {
            out.push(periods.row(ty.as_str(), rows, metric, false, |r| r.crypto_type == ty));
        }
    }

    if selection.fiat.special() == Some(FiatSpecial::AeVsEmde) {
        for region in [Region::Aes, Region::Emdes] {
            out.push(periods.row(region.as_str(), rows, metric, false, |r| r.region == region));
        }
    }

    out.push(periods.row(TOTAL_LABEL, rows, metric, true, |_| true));

    Ok(AnalysisTable {
        metric,
        latest_month: latest,
        rows: out,
    })
}

struct Periods {
    latest: NaiveDate,
    prev: Option<NaiveDate>,
    year_ago: Option<NaiveDate>,
}

impl Periods {
    fn row(
        &self,
        label: &str,
        rows: &[&TradeRecord],
        metric: Metric,
        is_total: bool,
        keep: impl Fn(&TradeRecord) -> bool,
    ) -> AnalysisRow {
        let sum_at = |month: Option<NaiveDate>| -> f64 {
            let Some(month) = month else {
                return 0.0;
            };
            rows.iter()
                .filter(|r| r.month == month && keep(r))
                .map(|r| metric.value(r))
                .sum()
        };

        let current = sum_at(Some(self.latest));
        let mom = pct_change(current, sum_at(self.prev));
        let yoy = pct_change(current, sum_at(self.year_ago));

        AnalysisRow {
            label: label.to_string(),
            level: current,
            level_display: format_level(current, metric),
            mom_pct: mom,
            yoy_pct: yoy,
            mom_display: format_pct(mom),
            yoy_display: format_pct(yoy),
            is_total,
        }
    }
}

/// `(current / reference - 1) * 100`, unavailable when the reference is not positive.
pub fn pct_change(current: f64, reference: f64) -> Option<f64> {
    (reference > 0.0).then(|| (current / reference - 1.0) * 100.0)
}

pub fn format_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:+.1}%"),
        None => UNAVAILABLE.to_string(),
    }
}

/// Compact level: `1.2B`, `3.4M`, `56K`, or a bare count for small trade numbers.
pub fn format_level(v: f64, metric: Metric) -> String {
    match metric {
        Metric::VolumeUsd if v >= 1e9 => format!("{:.1}B", v / 1e9),
        Metric::VolumeUsd if v >= 1e6 => format!("{:.1}M", v / 1e6),
        Metric::VolumeUsd => format!("{:.0}K", v / 1e3),
        Metric::NumberOfTrades if v >= 1e6 => format!("{:.1}M", v / 1e6),
        Metric::NumberOfTrades if v >= 1e3 => format!("{:.0}K", v / 1e3),
        Metric::NumberOfTrades => format!("{v:.0}"),
    }
}
