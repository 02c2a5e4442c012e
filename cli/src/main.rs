//! Offline front end for the trading-stats dashboard.
//!
//! Subcommands:
//!   - `chart`: Panels and series for a selection, as JSON
//!   - `analysis`: Latest-month levels with MoM / YoY changes, as JSON
//!   - `options`: Selector vocabularies and slider bounds, as JSON
//!   - `export`: Filtered rows as CSV, after the same contact-form check as
//!     the web export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cz_core::aggregate::Stacking;
use cz_core::analysis::{build_analysis, AnalysisResponse};
use cz_core::chart::build_chart;
use cz_core::export::{export_rows, ContactForm, Requester};
use cz_core::month::month_index;
use cz_core::options::selector_options;
use cz_core::record::{Dataset, Metric};
use cz_core::request::{ChartType, DashboardState};
use cz_core::selection::RawSelection;
use cz_data::csv_loader::parse_month;
use cz_data::{load_dataset, write_export, ReferenceNames};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI argument structs
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "cz-cli",
    version,
    about = "Crypto trading statistics by exchange, fiat and asset",
    propagate_version = true
)]
struct Cli {
    /// Path to the base dataset CSV
    #[arg(long, global = true, default_value = "data/full_data.csv")]
    data: PathBuf,

    /// Asset metadata CSV with `codigo` / `nombre` columns
    #[arg(long, global = true, default_value = "data/reference/asset-metadata.csv")]
    metadata: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the chart series for a selection
    Chart(ChartArgs),
    /// Period-over-period table for the latest month
    Analysis(SelectionArgs),
    /// List selector options and slider bounds
    Options(OutputArgs),
    /// Write the filtered rows as CSV (name, institution and email required)
    Export(ExportArgs),
}

#[derive(Args)]
struct OutputArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SelectionArgs {
    /// Exchange selector values, comma separated (`all`, `EXCL:x`, names)
    #[arg(long, value_delimiter = ',')]
    exchanges: Vec<String>,

    /// Fiat selector values (`SPECIAL:AE_VS_EMDE`, `EXCL:usd`, codes)
    #[arg(long, value_delimiter = ',')]
    fiats: Vec<String>,

    /// Crypto selector values (`SPECIAL:FSB_4CAT`, `EXCL:btc`, symbols)
    #[arg(long, value_delimiter = ',')]
    cryptos: Vec<String>,

    #[arg(long, value_enum, default_value_t = MetricArg::Volume)]
    metric: MetricArg,

    /// First month, `YYYY-MM` (defaults to the trailing 24 months)
    #[arg(long)]
    start: Option<String>,

    /// Last month, `YYYY-MM`
    #[arg(long)]
    end: Option<String>,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args)]
struct ChartArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    #[arg(long, value_enum, default_value_t = StackingArg::Absolute)]
    stacking: StackingArg,

    /// Render as lines instead of stacked bars
    #[arg(long, default_value_t = false)]
    line: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Requester name
    #[arg(long, default_value = "")]
    name: String,

    /// Requester institution
    #[arg(long, default_value = "")]
    institution: String,

    /// Requester email
    #[arg(long, default_value = "")]
    email: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Volume,
    Trades,
}

#[derive(Clone, Copy, ValueEnum)]
enum StackingArg {
    Absolute,
    Percent,
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

impl SelectionArgs {
    fn to_state(&self, dataset: &Dataset) -> Result<DashboardState> {
        let date_range = match (&self.start, &self.end) {
            (None, None) => None,
            (start, end) => {
                let lo = match start {
                    Some(s) => month_arg(s)?,
                    None => dataset.min_month().map(month_index).unwrap_or(0),
                };
                let hi = match end {
                    Some(s) => month_arg(s)?,
                    None => dataset.max_month().map(month_index).unwrap_or(lo),
                };
                Some([lo, hi])
            }
        };

        Ok(DashboardState {
            selection: RawSelection {
                exchanges: self.exchanges.clone(),
                fiats: self.fiats.clone(),
                cryptos: self.cryptos.clone(),
            },
            metric: match self.metric {
                MetricArg::Volume => Metric::VolumeUsd,
                MetricArg::Trades => Metric::NumberOfTrades,
            },
            date_range,
            ..DashboardState::default()
        })
    }
}

impl ExportArgs {
    fn requester(&self) -> Result<Requester> {
        let form = ContactForm {
            name: self.name.clone(),
            institution: self.institution.clone(),
            email: self.email.clone(),
        };
        Ok(form.validate()?)
    }
}

fn run_analysis(dataset: &Dataset, args: &SelectionArgs) -> Result<AnalysisResponse> {
    let state = args.to_state(dataset)?;
    Ok(AnalysisResponse::from_result(build_analysis(dataset, &state))?)
}

fn month_arg(s: &str) -> Result<i32> {
    parse_month(s)
        .map(month_index)
        .ok_or_else(|| anyhow!("invalid month {s:?}, expected YYYY-MM"))
}

fn open_output(out: &OutputArgs) -> Result<Box<dyn Write>> {
    Ok(match &out.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn write_json<T: serde::Serialize>(out: &OutputArgs, value: &T) -> Result<()> {
    let mut w = open_output(out)?;
    serde_json::to_writer_pretty(&mut w, value)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let dataset = load_dataset(&cli.data)
        .with_context(|| format!("loading dataset from {}", cli.data.display()))?;
    if dataset.is_empty() {
        bail!("dataset {} has no rows", cli.data.display());
    }

    match cli.command {
        Commands::Chart(args) => {
            let names = ReferenceNames::load(&cli.metadata)?;
            let mut state = args.selection.to_state(&dataset)?;
            state.stacking = match args.stacking {
                StackingArg::Absolute => Stacking::Absolute,
                StackingArg::Percent => Stacking::Percent,
            };
            state.chart_type = if args.line { ChartType::Line } else { ChartType::Bar };
            write_json(&args.selection.out, &build_chart(&dataset, &state, &names))
        }
        Commands::Analysis(args) => write_json(&args.out, &run_analysis(&dataset, &args)?),
        Commands::Options(out) => {
            let names = ReferenceNames::load(&cli.metadata)?;
            write_json(&out, &selector_options(&dataset, &names))
        }
        Commands::Export(args) => {
            let who = args.requester()?;
            let state = args.selection.to_state(&dataset)?;
            let rows = export_rows(&dataset, &state);
            tracing::info!(
                name = %who.name,
                institution = %who.institution,
                email = %who.email,
                rows = rows.len(),
                "exporting"
            );
            let w = open_output(&args.selection.out)?;
            write_export(w, &rows)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cz_core::export::INCOMPLETE_FORM_MESSAGE;

    #[test]
    fn cli_parses_selection_lists() {
        let cli = Cli::try_parse_from([
            "cz-cli",
            "chart",
            "--fiats",
            "SPECIAL:AE_VS_EMDE",
            "--cryptos",
            "btc,EXCL:eth",
            "--stacking",
            "percent",
            "--start",
            "2023-01",
        ])
        .unwrap();
        let Commands::Chart(args) = cli.command else {
            panic!("expected chart");
        };
        assert_eq!(args.selection.cryptos, vec!["btc", "EXCL:eth"]);
        assert!(matches!(args.stacking, StackingArg::Percent));

        let state = args.selection.to_state(&Dataset::default()).unwrap();
        assert_eq!(state.date_range, Some([2023 * 12, 2023 * 12]));
    }

    #[test]
    fn analysis_without_rows_is_the_empty_variant() {
        let cli = Cli::try_parse_from(["cz-cli", "analysis", "--cryptos", "doge"]).unwrap();
        let Commands::Analysis(args) = cli.command else {
            panic!("expected analysis");
        };
        let got = run_analysis(&Dataset::default(), &args).unwrap();
        assert!(matches!(got, AnalysisResponse::Empty { .. }));
    }

    #[test]
    fn export_requires_the_contact_fields() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["cz-cli", "export"];
            argv.extend_from_slice(extra);
            let Commands::Export(args) = Cli::try_parse_from(argv).unwrap().command else {
                panic!("expected export");
            };
            args
        };

        let err = parse(&["--name", "Ana", "--email", "ana@bis.org"])
            .requester()
            .unwrap_err();
        assert_eq!(err.to_string(), INCOMPLETE_FORM_MESSAGE);

        let who = parse(&["--name", " Ana ", "--institution", "BIS", "--email", "ana@bis.org"])
            .requester()
            .unwrap();
        assert_eq!(who.name, "Ana");
    }

    #[test]
    fn bad_month_is_rejected() {
        assert!(month_arg("January").is_err());
        assert_eq!(month_arg("2024-03").unwrap(), 2024 * 12 + 2);
    }
}
