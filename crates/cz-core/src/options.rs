//! Selector vocabularies and slider bounds built from the loaded dataset.

use serde::Serialize;

use crate::month::{month_index, year_marks, MonthRange, YearMark};
use crate::names::NameLookup;
use crate::record::Dataset;
use crate::selection::{
    CryptoSpecial, FiatSpecial, SpecialVocabulary, ALL_TOKEN, EXCLUDE_PREFIX, SEPARATOR_PREFIX,
};

pub const SEPARATOR_LABEL: &str = "─────────────";
pub const EXCLUDE_SEPARATOR_VALUE: &str = "SEP_EXCL";
pub const EXCLUDE_SEPARATOR_LABEL: &str = "───── EXCLUDE ─────";

/// Order the specials appear in the dropdowns (not their precedence).
const FIAT_SPECIAL_ORDER: [FiatSpecial; 3] =
    [FiatSpecial::AeOnly, FiatSpecial::EmdeOnly, FiatSpecial::AeVsEmde];
const CRYPTO_SPECIAL_ORDER: [CryptoSpecial; 4] = [
    CryptoSpecial::StableVsUnbacked,
    CryptoSpecial::Fsb4Cat,
    CryptoSpecial::Stablecoins,
    CryptoSpecial::Unbacked,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl SelectOption {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    fn separator(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            disabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderBounds {
    pub min: i32,
    pub max: i32,
    pub marks: Vec<YearMark>,
    pub default_range: MonthRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    pub exchanges: Vec<SelectOption>,
    pub fiats: Vec<SelectOption>,
    pub cryptos: Vec<SelectOption>,
    /// `None` for an empty dataset.
    pub slider: Option<SliderBounds>,
}

pub fn selector_options(dataset: &Dataset, names: &dyn NameLookup) -> SelectorOptions {
    let exchanges = {
        let mut out = vec![SelectOption::new("🌐 All Exchanges", ALL_TOKEN)];
        out.extend(
            dataset
                .exchanges()
                .iter()
                .map(|e| SelectOption::new(title_case(e), e.as_str())),
        );
        push_excludes(&mut out, dataset.exchanges(), |e| title_case(e));
        out
    };

    let fiat_label = |code: &str| match names.fiat_country(code) {
        Some(country) => format!("{} ({country})", code.to_uppercase()),
        None => code.to_uppercase(),
    };
    let fiats = facet_options(&FIAT_SPECIAL_ORDER, dataset.fiats(), fiat_label);

    let crypto_label = |code: &str| match names.crypto_name(code) {
        Some(name) => format!("{} ({name})", code.to_uppercase()),
        None => code.to_uppercase(),
    };
    let cryptos = facet_options(&CRYPTO_SPECIAL_ORDER, dataset.cryptos(), crypto_label);

    let slider = match (dataset.min_month(), dataset.max_month()) {
        (Some(min), Some(max)) => Some(SliderBounds {
            min: month_index(min),
            max: month_index(max),
            marks: year_marks(min, max),
            default_range: MonthRange::default_for(min, max),
        }),
        _ => None,
    };

    SelectorOptions {
        exchanges,
        fiats,
        cryptos,
        slider,
    }
}

fn facet_options<S: SpecialVocabulary>(
    specials: &[S],
    values: &[String],
    label: impl Fn(&str) -> String,
) -> Vec<SelectOption> {
    let mut out: Vec<SelectOption> = specials
        .iter()
        .map(|s| SelectOption::new(format!("⭐ {}", s.label()), s.token()))
        .collect();
    out.push(SelectOption::separator(SEPARATOR_LABEL, SEPARATOR_PREFIX));
    out.extend(values.iter().map(|v| SelectOption::new(label(v), v.as_str())));
    push_excludes(&mut out, values, label);
    out
}

fn push_excludes(out: &mut Vec<SelectOption>, values: &[String], label: impl Fn(&str) -> String) {
    out.push(SelectOption::separator(
        EXCLUDE_SEPARATOR_LABEL,
        EXCLUDE_SEPARATOR_VALUE,
    ));
    out.extend(
        values
            .iter()
            .map(|v| SelectOption::new(format!("❌ {}", label(v)), format!("{EXCLUDE_PREFIX}{v}"))),
    );
}

/// Upper-case the first letter of each alphabetic run: `"crypto.com"` → `"Crypto.Com"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}
