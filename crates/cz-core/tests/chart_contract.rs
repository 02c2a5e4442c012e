use chrono::{Datelike, NaiveDate};
use cz_core::aggregate::{aggregate, Stacking, VOLUME_DISPLAY_SCALE};
use cz_core::export::ContactForm;
use cz_core::filter::{filter_rows, PanelSplit, SeriesGrouping};
use cz_core::month::{first_of_month, index_to_date, month_index, MonthRange};
use cz_core::record::{CryptoType, Dataset, Metric, Region, TradeRecord};
use cz_core::selection::{RawSelection, Selection};
use cz_core::CoreError;
use proptest::prelude::*;
use rustc_hash::FxHashMap;

const EXCHANGES: &[&str] = &["binance", "kraken", "bitso"];
const BASES: &[&str] = &["btc", "eth", "usdt", "usdc", "dai", "sol"];
const QUOTES: &[&str] = &["usd", "eur", "ars", "brl", "ngn", "vnd", "hkd"];

const FIAT_TOKENS: &[&str] = &[
    "SPECIAL:AE_VS_EMDE",
    "SPECIAL:AE",
    "SPECIAL:EMDE",
    "usd",
    "eur",
    "ars",
    "vnd",
];
const CRYPTO_TOKENS: &[&str] = &[
    "SPECIAL:FSB_4CAT",
    "SPECIAL:STABLE_VS_UNBACKED",
    "SPECIAL:STABLECOINS",
    "SPECIAL:UNBACKED",
    "btc",
    "usdt",
    "dai",
];

/// Ways of saying "no filter" on a facet.
const ALL_SELECTIONS: &[&[&str]] = &[&[], &["all"], &["SEP"], &["all", "SEP_EXCL"]];

fn rec(y: i32, m: u32, exchange: &str, base: &str, quote: &str, vol: f64, trades: u64) -> TradeRecord {
    TradeRecord {
        month: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
        exchange: exchange.to_string(),
        base_asset: base.to_string(),
        quote_asset: quote.to_string(),
        region: Region::classify(quote),
        crypto_type: CryptoType::classify(base),
        volume_usd: vol,
        number_of_trades: trades,
    }
}

fn record() -> impl Strategy<Value = TradeRecord> {
    (
        2023i32..=2024,
        1u32..=12,
        prop::sample::select(EXCHANGES),
        prop::sample::select(BASES),
        prop::sample::select(QUOTES),
        1.0f64..1e12,
        0u64..10_000,
    )
        .prop_map(|(y, m, ex, base, quote, vol, trades)| rec(y, m, ex, base, quote, vol, trades))
}

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(record(), 1..200).prop_map(Dataset::new)
}

fn vocabulary(facet: usize) -> &'static [&'static str] {
    match facet {
        0 => EXCHANGES,
        1 => QUOTES,
        _ => BASES,
    }
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn select(exchanges: &[&str], fiats: &[&str], cryptos: &[&str]) -> Selection {
    RawSelection {
        exchanges: strings(exchanges),
        fiats: strings(fiats),
        cryptos: strings(cryptos),
    }
    .resolve()
}

/// Selection with `tokens` on one facet and nothing on the others.
fn select_facet(facet: usize, tokens: &[String]) -> Selection {
    let mut raw = RawSelection::default();
    match facet {
        0 => raw.exchanges = tokens.to_vec(),
        1 => raw.fiats = tokens.to_vec(),
        _ => raw.cryptos = tokens.to_vec(),
    }
    raw.resolve()
}

fn sorted_keys(rows: &[&TradeRecord]) -> Vec<(String, String, String, NaiveDate)> {
    let mut keys: Vec<_> = rows
        .iter()
        .map(|r| {
            (
                r.exchange.clone(),
                r.base_asset.clone(),
                r.quote_asset.clone(),
                r.month,
            )
        })
        .collect();
    keys.sort();
    keys
}

/// Per-asset trade counts rolled up under `grouping`, compared with the
/// grouping's own aggregation.
fn assert_rollup_matches(rows: &[&TradeRecord], grouping: SeriesGrouping) {
    let coarse = aggregate(
        rows,
        grouping,
        &PanelSplit::Single,
        Metric::NumberOfTrades,
        Stacking::Absolute,
    )
    .unwrap();
    let fine = aggregate(
        rows,
        SeriesGrouping::Asset,
        &PanelSplit::Single,
        Metric::NumberOfTrades,
        Stacking::Absolute,
    )
    .unwrap();

    let mut rolled: FxHashMap<(String, NaiveDate), f64> = FxHashMap::default();
    for s in &fine.panels[0].series {
        let sample = rows.iter().find(|r| r.base_asset == s.key).unwrap();
        let label = grouping.key(sample).to_string();
        for p in &s.points {
            *rolled.entry((label.clone(), p.month)).or_insert(0.0) += p.value.unwrap();
        }
    }

    let mut count = 0;
    for s in &coarse.panels[0].series {
        for p in &s.points {
            assert_eq!(rolled[&(s.key.clone(), p.month)], p.value.unwrap());
            count += 1;
        }
    }
    assert_eq!(count, rolled.len());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn unfiltered_sums_match_direct_group_by(
        ds in dataset(),
        ex in prop::sample::select(ALL_SELECTIONS),
        fiat in prop::sample::select(ALL_SELECTIONS),
        crypto in prop::sample::select(ALL_SELECTIONS),
    ) {
        let sel = select(ex, fiat, crypto);
        let rows = filter_rows(&ds, &sel, None);
        prop_assert_eq!(rows.len(), ds.len());

        for metric in [Metric::VolumeUsd, Metric::NumberOfTrades] {
            let set = aggregate(
                &rows,
                SeriesGrouping::Asset,
                &PanelSplit::Single,
                metric,
                Stacking::Absolute,
            )
            .unwrap();

            let mut direct: FxHashMap<(&str, NaiveDate), f64> = FxHashMap::default();
            for r in ds.records() {
                *direct.entry((r.base_asset.as_str(), r.month)).or_insert(0.0) += metric.value(r);
            }

            let scale = match metric {
                Metric::VolumeUsd => VOLUME_DISPLAY_SCALE,
                Metric::NumberOfTrades => 1.0,
            };
            let mut seen = 0;
            for s in &set.panels[0].series {
                for p in &s.points {
                    let want = direct[&(s.key.as_str(), p.month)] * scale;
                    prop_assert!((p.value.unwrap() - want).abs() <= want.abs() * 1e-9);
                    seen += 1;
                }
            }
            prop_assert_eq!(seen, direct.len());
        }
    }

    #[test]
    fn exclusion_dominates_inclusion(
        ds in dataset(),
        (facet, others, v) in (0usize..3).prop_flat_map(|f| (
            Just(f),
            prop::collection::vec(prop::sample::select(vocabulary(f)), 0..4),
            prop::sample::select(vocabulary(f)),
        )),
    ) {
        let excl = format!("EXCL:{v}");
        let mut both = strings(&others);
        both.push(v.to_string());
        both.push(excl.clone());
        let mut exclude_only: Vec<String> = others
            .iter()
            .filter(|o| **o != v)
            .map(|o| o.to_string())
            .collect();
        exclude_only.push(excl);

        let a = filter_rows(&ds, &select_facet(facet, &both), None);
        let b = filter_rows(&ds, &select_facet(facet, &exclude_only), None);
        prop_assert_eq!(sorted_keys(&a), sorted_keys(&b));

        let value_of = |r: &TradeRecord| match facet {
            0 => r.exchange.clone(),
            1 => r.quote_asset.clone(),
            _ => r.base_asset.clone(),
        };
        prop_assert!(a.iter().all(|r| value_of(r) != v));
    }

    #[test]
    fn percent_buckets_sum_to_one_hundred(
        ds in dataset(),
        fiats in prop::sample::subsequence(FIAT_TOKENS, 0..=3),
        cryptos in prop::sample::subsequence(CRYPTO_TOKENS, 0..=3),
    ) {
        let sel = select(&[], &fiats, &cryptos);
        let rows = filter_rows(&ds, &sel, None);
        prop_assume!(!rows.is_empty());

        let set = aggregate(
            &rows,
            SeriesGrouping::for_selection(&sel),
            &PanelSplit::for_selection(&sel),
            Metric::VolumeUsd,
            Stacking::Percent,
        )
        .unwrap();
        for panel in &set.panels {
            let mut by_month: FxHashMap<NaiveDate, f64> = FxHashMap::default();
            for s in &panel.series {
                for p in &s.points {
                    *by_month.entry(p.month).or_insert(0.0) += p.value.unwrap();
                }
            }
            for total in by_month.values() {
                prop_assert!((total - 100.0).abs() < 1e-9, "bucket sums to {}", total);
            }
        }
    }

    #[test]
    fn fsb_remap_is_idempotent(ds in dataset()) {
        let sel = select(&[], &[], &["SPECIAL:FSB_4CAT"]);
        let rows = filter_rows(&ds, &sel, None);
        prop_assert_eq!(SeriesGrouping::for_selection(&sel), SeriesGrouping::Fsb4Cat);
        assert_rollup_matches(&rows, SeriesGrouping::Fsb4Cat);
    }

    #[test]
    fn stable_vs_unbacked_remap_is_idempotent(ds in dataset()) {
        let sel = select(&[], &[], &["SPECIAL:STABLE_VS_UNBACKED"]);
        let rows = filter_rows(&ds, &sel, None);
        prop_assert_eq!(SeriesGrouping::for_selection(&sel), SeriesGrouping::CryptoType);
        assert_rollup_matches(&rows, SeriesGrouping::CryptoType);
    }

    #[test]
    fn month_index_round_trips(i in (-262_000i32 * 12)..(262_000i32 * 12)) {
        let date = index_to_date(i);
        prop_assert!(date.is_some());
        prop_assert_eq!(month_index(date.unwrap()), i);
    }

    #[test]
    fn dates_map_to_their_first_of_month(y in -262_000i32..262_000, ordinal in 1u32..=365) {
        let date = NaiveDate::from_yo_opt(y, ordinal).unwrap();
        prop_assert_eq!(index_to_date(month_index(date)), Some(first_of_month(date)));
        prop_assert_eq!(first_of_month(date).day(), 1);
    }
}

/// Small fixed dataset for the worked scenarios.
fn fixture() -> Dataset {
    Dataset::new(vec![
        rec(2024, 1, "binance", "btc", "usd", 100.0, 10),
        rec(2024, 1, "kraken", "eth", "eur", 80.0, 8),
        rec(2024, 1, "binance", "usdt", "ars", 60.0, 6),
        rec(2024, 2, "bitso", "sol", "brl", 40.0, 4),
        rec(2024, 2, "kraken", "dai", "ngn", 20.0, 2),
        rec(2024, 2, "binance", "btc", "vnd", 10.0, 1),
    ])
}

#[test]
fn zero_bucket_total_is_unavailable_not_zero() {
    let ds = Dataset::new(vec![
        rec(2024, 1, "binance", "btc", "usd", 0.0, 0),
        rec(2024, 1, "binance", "usdt", "usd", 0.0, 0),
        rec(2024, 2, "binance", "btc", "usd", 5.0, 1),
    ]);
    let sel = Selection::default();
    let rows = filter_rows(&ds, &sel, None);
    let set = aggregate(
        &rows,
        SeriesGrouping::Asset,
        &PanelSplit::Single,
        Metric::VolumeUsd,
        Stacking::Percent,
    )
    .unwrap();
    let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for s in &set.panels[0].series {
        for p in s.points.iter().filter(|p| p.month == jan) {
            assert_eq!(p.value, None);
        }
    }
}

#[test]
fn export_rejects_any_blank_field() {
    let filled = ["Ana", "BIS", "ana@bis.org"];
    let blanks = ["", "   ", "\t\n"];
    for missing in 0..3 {
        for blank in blanks {
            let mut fields = filled;
            fields[missing] = blank;
            let form = ContactForm {
                name: fields[0].to_string(),
                institution: fields[1].to_string(),
                email: fields[2].to_string(),
            };
            assert!(matches!(form.validate(), Err(CoreError::Validation(_))));
        }
    }
}

#[test]
fn two_asset_percent_scenario() {
    let ds = Dataset::new(vec![
        rec(2024, 1, "binance", "btc", "usd", 100.0, 1),
        rec(2024, 2, "binance", "btc", "usd", 300.0, 1),
        rec(2024, 1, "binance", "usdt", "usd", 50.0, 1),
        rec(2024, 2, "binance", "usdt", "usd", 150.0, 1),
    ]);
    let sel = Selection::default();
    let rows = filter_rows(&ds, &sel, Some(MonthRange::new(0, i32::MAX)));
    let set = aggregate(
        &rows,
        SeriesGrouping::Asset,
        &PanelSplit::Single,
        Metric::VolumeUsd,
        Stacking::Percent,
    )
    .unwrap();
    let series = &set.panels[0].series;
    assert_eq!(series[0].key, "btc");
    assert_eq!(series[1].key, "usdt");
    for p in &series[0].points {
        assert!((p.value.unwrap() - 66.7).abs() < 0.05);
    }
    for p in &series[1].points {
        assert!((p.value.unwrap() - 33.3).abs() < 0.05);
    }
}

#[test]
fn excluded_asset_leaves_unbacked_group() {
    let ds = fixture();
    let sel = select(&[], &[], &["EXCL:btc", "SPECIAL:UNBACKED"]);
    let rows = filter_rows(&ds, &sel, None);
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r.base_asset != "btc"));
    assert!(rows.iter().all(|r| r.crypto_type == CryptoType::Unbacked));

    let mut assets: Vec<_> = rows.iter().map(|r| r.base_asset.as_str()).collect();
    assets.sort_unstable();
    assets.dedup();
    assert_eq!(assets, vec!["eth", "sol"]);
}

#[test]
fn everything_filtered_is_empty_result() {
    let ds = fixture();
    let sel = select(&[], &[], &["SPECIAL:NOT_A_GROUP"]);
    let rows = filter_rows(&ds, &sel, None);
    assert!(rows.is_empty());
    let got = aggregate(
        &rows,
        SeriesGrouping::Asset,
        &PanelSplit::Single,
        Metric::VolumeUsd,
        Stacking::Absolute,
    );
    assert_eq!(got, Err(CoreError::EmptyResult));
}
