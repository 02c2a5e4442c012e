//! Selection Resolver: turns raw multi-select values into typed facet filters.
//!
//! The selector widgets hand back flat string lists mixing literal values,
//! `EXCL:` exclusion entries, `SPECIAL:` composite groupings and `SEP`
//! separators. Each list is parsed once into [`Token`]s and resolved into a
//! [`FacetSelection`]; nothing downstream looks at the raw strings again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;

pub const ALL_TOKEN: &str = "all";
pub const EXCLUDE_PREFIX: &str = "EXCL:";
pub const SPECIAL_PREFIX: &str = "SPECIAL:";
pub const SEPARATOR_PREFIX: &str = "SEP";

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    All,
    Literal(String),
    Exclude(String),
    /// Name after the `SPECIAL:` prefix; may still be unknown to the facet.
    Special(String),
    Separator,
}

impl Token {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_TOKEN {
            Self::All
        } else if let Some(v) = raw.strip_prefix(EXCLUDE_PREFIX) {
            Self::Exclude(v.to_string())
        } else if let Some(name) = raw.strip_prefix(SPECIAL_PREFIX) {
            Self::Special(name.to_string())
        } else if raw.starts_with(SEPARATOR_PREFIX) {
            Self::Separator
        } else {
            Self::Literal(raw.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Special vocabularies
// ---------------------------------------------------------------------------

/// Named composite groupings a facet understands, in precedence order.
pub trait SpecialVocabulary: Copy + Eq + Debug + 'static {
    /// Checked in order; the first one present in a selection wins.
    const PRECEDENCE: &'static [Self];

    fn name(self) -> &'static str;

    fn label(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::PRECEDENCE.iter().copied().find(|s| s.name() == name)
    }

    /// Wire value as sent by the selector (`SPECIAL:<NAME>`).
    fn token(self) -> String {
        format!("{SPECIAL_PREFIX}{}", self.name())
    }
}

/// Exchanges have no composite groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSpecial {}

impl SpecialVocabulary for NoSpecial {
    const PRECEDENCE: &'static [Self] = &[];

    fn name(self) -> &'static str {
        match self {}
    }

    fn label(self) -> &'static str {
        match self {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FiatSpecial {
    AeVsEmde,
    AeOnly,
    EmdeOnly,
}

impl SpecialVocabulary for FiatSpecial {
    const PRECEDENCE: &'static [Self] = &[Self::AeVsEmde, Self::AeOnly, Self::EmdeOnly];

    fn name(self) -> &'static str {
        match self {
            Self::AeVsEmde => "AE_VS_EMDE",
            Self::AeOnly => "AE",
            Self::EmdeOnly => "EMDE",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::AeVsEmde => "AEs vs EMDEs",
            Self::AeOnly => "AEs only",
            Self::EmdeOnly => "EMDEs only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CryptoSpecial {
    /// USDT / other stables / BTC / other unbacked.
    Fsb4Cat,
    StableVsUnbacked,
    Stablecoins,
    Unbacked,
}

impl SpecialVocabulary for CryptoSpecial {
    const PRECEDENCE: &'static [Self] = &[
        Self::Fsb4Cat,
        Self::StableVsUnbacked,
        Self::Stablecoins,
        Self::Unbacked,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Fsb4Cat => "FSB_4CAT",
            Self::StableVsUnbacked => "STABLE_VS_UNBACKED",
            Self::Stablecoins => "STABLECOINS",
            Self::Unbacked => "UNBACKED",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Fsb4Cat => "USDT+Stables vs BTC+Unbacked (4 series)",
            Self::StableVsUnbacked => "Stablecoins vs Unbacked",
            Self::Stablecoins => "All Stablecoins",
            Self::Unbacked => "All Unbacked",
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved selections
// ---------------------------------------------------------------------------

/// Inclusion mode of one facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode<S> {
    All,
    /// Literal values in selection order, without duplicates.
    Literal(Vec<String>),
    Special(S),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSelection<S> {
    /// Applied before the inclusion mode, regardless of it.
    pub exclude: BTreeSet<String>,
    pub mode: Mode<S>,
}

impl<S> Default for FacetSelection<S> {
    fn default() -> Self {
        Self {
            exclude: BTreeSet::new(),
            mode: Mode::All,
        }
    }
}

impl<S: SpecialVocabulary> FacetSelection<S> {
    /// Resolve one facet's raw multi-select values.
    ///
    /// Specials beat literals; `all` beats literals; unknown specials are kept
    /// as literal strings and therefore match nothing. A literal that is also
    /// excluded is dropped, so `[v, EXCL:v]` resolves like `[EXCL:v]`.
    pub fn resolve<T: AsRef<str>>(raw: &[T]) -> Self {
        let mut exclude = BTreeSet::new();
        let mut specials: Vec<S> = Vec::new();
        let mut literals: Vec<String> = Vec::new();
        let mut saw_all = false;

        for value in raw {
            match Token::parse(value.as_ref()) {
                Token::All => saw_all = true,
                Token::Separator => {}
                Token::Exclude(v) => {
                    exclude.insert(v);
                }
                Token::Special(name) => match S::from_name(&name) {
                    Some(s) => specials.push(s),
                    None => push_unique(&mut literals, format!("{SPECIAL_PREFIX}{name}")),
                },
                Token::Literal(v) => push_unique(&mut literals, v),
            }
        }

        literals.retain(|v| !exclude.contains(v));

        let mode = match S::PRECEDENCE.iter().find(|s| specials.contains(*s)) {
            Some(&s) => Mode::Special(s),
            None if saw_all || literals.is_empty() => Mode::All,
            None => Mode::Literal(literals),
        };

        Self { exclude, mode }
    }

    #[inline]
    pub fn is_excluded(&self, value: &str) -> bool {
        self.exclude.contains(value)
    }

    pub fn special(&self) -> Option<S> {
        match self.mode {
            Mode::Special(s) => Some(s),
            _ => None,
        }
    }

    pub fn literals(&self) -> &[String] {
        match &self.mode {
            Mode::Literal(v) => v,
            _ => &[],
        }
    }

    /// Literals the user actually picked, skipping unknown `SPECIAL:` names.
    /// These drive panel layout and titles; row matching uses all literals.
    pub fn named_literals(&self) -> impl Iterator<Item = &String> {
        self.literals()
            .iter()
            .filter(|v| !v.starts_with(SPECIAL_PREFIX))
    }
}

fn push_unique(values: &mut Vec<String>, v: String) {
    if !values.contains(&v) {
        values.push(v);
    }
}

/// Raw selector state as received from the client.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSelection {
    #[serde(default)]
    pub exchanges: Vec<String>,
    #[serde(default)]
    pub fiats: Vec<String>,
    #[serde(default)]
    pub cryptos: Vec<String>,
}

impl RawSelection {
    pub fn resolve(&self) -> Selection {
        Selection {
            exchange: FacetSelection::resolve(&self.exchanges),
            fiat: FacetSelection::resolve(&self.fiats),
            crypto: FacetSelection::resolve(&self.cryptos),
        }
    }
}

/// The three resolved facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub exchange: FacetSelection<NoSpecial>,
    pub fiat: FacetSelection<FiatSpecial>,
    pub crypto: FacetSelection<CryptoSpecial>,
}
