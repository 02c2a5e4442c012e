//! Chart response assembly: resolve → filter → aggregate → presentation hints.

use serde::Serialize;

use crate::aggregate::{aggregate, Point, Stacking};
use crate::filter::{filter_rows, PanelSplit, SeriesGrouping};
use crate::names::{series_color, series_label, NameLookup};
use crate::record::{Dataset, Metric};
use crate::request::{ChartType, DashboardState};

pub const NO_DATA_MESSAGE: &str = "No data for selection";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartResponse {
    /// Nothing survived the filters; the renderer shows a no-data state.
    Empty { message: String },
    Figure(Figure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub chart_type: ChartType,
    /// `"stack"` for bar charts.
    pub barmode: Option<&'static str>,
    pub y_axis_title: &'static str,
    pub y_range: Option<[f64; 2]>,
    pub panels: Vec<FigurePanel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigurePanel {
    pub key: Option<String>,
    pub title: Option<String>,
    pub series: Vec<FigureSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSeries {
    pub key: String,
    pub label: String,
    pub color: &'static str,
    pub points: Vec<Point>,
}

pub fn build_chart(
    dataset: &Dataset,
    state: &DashboardState,
    names: &dyn NameLookup,
) -> ChartResponse {
    let selection = state.selection.resolve();
    let rows = filter_rows(dataset, &selection, state.range(dataset));
    let grouping = SeriesGrouping::for_selection(&selection);
    let split = PanelSplit::for_selection(&selection);

    let set = match aggregate(&rows, grouping, &split, state.metric, state.stacking) {
        Ok(set) => set,
        Err(_) => {
            return ChartResponse::Empty {
                message: NO_DATA_MESSAGE.to_string(),
            }
        }
    };

    let panels = set
        .panels
        .into_iter()
        .map(|panel| {
            let title = panel.key.as_deref().map(|k| match &split {
                PanelSplit::Fiat(_) => names.fiat_title(k),
                _ => k.to_string(),
            });
            let series = panel
                .series
                .into_iter()
                .map(|s| FigureSeries {
                    label: series_label(&s.key),
                    color: series_color(&s.key),
                    key: s.key,
                    points: s.points,
                })
                .collect();
            FigurePanel {
                key: panel.key,
                title,
                series,
            }
        })
        .collect();

    ChartResponse::Figure(Figure {
        chart_type: state.chart_type,
        barmode: (state.chart_type == ChartType::Bar).then_some("stack"),
        y_axis_title: y_axis_title(state.metric, state.stacking),
        y_range: (state.stacking == Stacking::Percent).then_some([0.0, 100.0]),
        panels,
    })
}

pub fn y_axis_title(metric: Metric, stacking: Stacking) -> &'static str {
    match (stacking, metric) {
        (Stacking::Percent, _) => "Share (%)",
        (Stacking::Absolute, Metric::VolumeUsd) => "Volume (USD B)",
        (Stacking::Absolute, Metric::NumberOfTrades) => "Trades",
    }
}
