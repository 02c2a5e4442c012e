//! Aggregator: filtered rows → per-panel, per-series monthly values.
//!
//! Grouping is by (panel key, series key, month) with the chosen metric
//! summed. Percent stacking divides each value by its (panel, month) total;
//! a zero total yields `None` rather than zero. Absolute volume is scaled to
//! billions for display only.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::filter::{PanelSplit, SeriesGrouping};
use crate::record::{Metric, TradeRecord};

/// Display multiplier for absolute USD volume (shown in billions).
pub const VOLUME_DISPLAY_SCALE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stacking {
    #[default]
    Absolute,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub month: NaiveDate,
    /// `None` when undefined (percent of a zero total).
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// Region or fiat code; `None` for the single-panel layout.
    pub key: Option<String>,
    /// Sorted by key, ascending.
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSet {
    pub metric: Metric,
    pub stacking: Stacking,
    pub panels: Vec<Panel>,
}

impl SeriesSet {
    pub fn panel(&self, key: Option<&str>) -> Option<&Panel> {
        self.panels.iter().find(|p| p.key.as_deref() == key)
    }
}

type SeriesSums<'a> = BTreeMap<&'a str, BTreeMap<NaiveDate, f64>>;

pub fn aggregate(
    rows: &[&TradeRecord],
    grouping: SeriesGrouping,
    split: &PanelSplit,
    metric: Metric,
    stacking: Stacking,
) -> Result<SeriesSet, CoreError> {
    if rows.is_empty() {
        return Err(CoreError::EmptyResult);
    }

    let panel_keys: Vec<Option<String>> = match split {
        PanelSplit::Single => vec![None],
        _ => split.keys().into_iter().map(Some).collect(),
    };

    // The single point where rows become per-bucket scalars.
    let mut sums: FxHashMap<Option<&str>, SeriesSums<'_>> = FxHashMap::default();
    let mut totals: FxHashMap<(Option<&str>, NaiveDate), f64> = FxHashMap::default();
    for &r in rows {
        let panel = split.key(r);
        let v = metric.value(r);
        *sums
            .entry(panel)
            .or_default()
            .entry(grouping.key(r))
            .or_default()
            .entry(r.month)
            .or_insert(0.0) += v;
        *totals.entry((panel, r.month)).or_insert(0.0) += v;
    }

    let panels = panel_keys
        .into_iter()
        .map(|key| {
            let series = sums
                .get(&key.as_deref())
                .map(|by_series| {
                    by_series
                        .iter()
                        .map(|(&series_key, by_month)| Series {
                            key: series_key.to_string(),
                            points: by_month
                                .iter()
                                .map(|(&month, &sum)| Point {
                                    month,
                                    value: display_value(
                                        sum,
                                        totals.get(&(key.as_deref(), month)).copied(),
                                        metric,
                                        stacking,
                                    ),
                                })
                                .collect(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            Panel { key, series }
        })
        .collect();

    Ok(SeriesSet {
        metric,
        stacking,
        panels,
    })
}

fn display_value(sum: f64, total: Option<f64>, metric: Metric, stacking: Stacking) -> Option<f64> {
    match stacking {
        Stacking::Percent => share_pct(sum, total.unwrap_or(0.0)),
        Stacking::Absolute => match metric {
            Metric::VolumeUsd => Some(sum * VOLUME_DISPLAY_SCALE),
            Metric::NumberOfTrades => Some(sum),
        },
    }
}

/// `part / total * 100`, undefined for a non-positive total.
pub fn share_pct(part: f64, total: f64) -> Option<f64> {
    (total > 0.0).then(|| part / total * 100.0)
}
