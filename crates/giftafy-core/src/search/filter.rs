//! Client-side re-filtering and re-sorting of a result set.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use giftafy_types::gift::GiftRecord;

/// Price bucket offered by the results view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBucket {
    #[default]
    #[serde(rename = "all")]
    All,
    /// Strictly below $50.
    #[serde(rename = "under50")]
    Under50,
    /// $50 to $100 inclusive.
    #[serde(rename = "50to100")]
    From50To100,
    /// $100 to $250 inclusive.
    #[serde(rename = "100to250")]
    From100To250,
    /// Strictly above $250.
    #[serde(rename = "over250")]
    Over250,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 5] = [
        PriceBucket::All,
        PriceBucket::Under50,
        PriceBucket::From50To100,
        PriceBucket::From100To250,
        PriceBucket::Over250,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBucket::All => "all",
            PriceBucket::Under50 => "under50",
            PriceBucket::From50To100 => "50to100",
            PriceBucket::From100To250 => "100to250",
            PriceBucket::Over250 => "over250",
        }
    }

    /// Whether a record with this price belongs in the bucket. Records
    /// without a numeric price only belong in `All`.
    pub fn admits(&self, price: Option<f64>) -> bool {
        let Some(p) = price else {
            return *self == PriceBucket::All;
        };
        match self {
            PriceBucket::All => true,
            PriceBucket::Under50 => p < 50.0,
            PriceBucket::From50To100 => (50.0..=100.0).contains(&p),
            PriceBucket::From100To250 => (100.0..=250.0).contains(&p),
            PriceBucket::Over250 => p > 250.0,
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceBucket::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid price bucket: '{s}'"))
    }
}

/// Sort order offered by the results view.
///
/// Unknown keys parse to `Unsorted`, which keeps the incoming order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "match")]
    Match,
    #[serde(rename = "priceAsc")]
    PriceAsc,
    #[serde(rename = "priceDesc")]
    PriceDesc,
    #[serde(rename = "popularity")]
    Popularity,
    #[serde(untagged)]
    Unsorted(String),
}

impl SortKey {
    /// Lenient parse: anything unrecognized becomes `Unsorted`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "match" => SortKey::Match,
            "priceAsc" | "price-asc" | "price_asc" => SortKey::PriceAsc,
            "priceDesc" | "price-desc" | "price_desc" => SortKey::PriceDesc,
            "popularity" => SortKey::Popularity,
            other => SortKey::Unsorted(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Match => "match",
            SortKey::PriceAsc => "priceAsc",
            SortKey::PriceDesc => "priceDesc",
            SortKey::Popularity => "popularity",
            SortKey::Unsorted(other) => other,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`filter_and_sort`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Case-insensitive substring of the title. Empty or absent passes all.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "price")]
    pub price_bucket: PriceBucket,
    #[serde(default, rename = "sort")]
    pub sort_key: SortKey,
}

/// Produce a filtered, sorted copy of `results`. The input is untouched.
///
/// Sorting is stable, so ties keep their incoming order. Records whose price
/// cannot be parsed sort as 0.
pub fn filter_and_sort(results: &[GiftRecord], opts: &FilterOptions) -> Vec<GiftRecord> {
    let needle = opts
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let mut out: Vec<GiftRecord> = results
        .iter()
        .filter(|r| {
            needle
                .as_deref()
                .is_none_or(|n| r.title.to_lowercase().contains(n))
        })
        .filter(|r| opts.price_bucket.admits(r.price_value()))
        .cloned()
        .collect();

    let price = |r: &GiftRecord| r.price_value().unwrap_or(0.0);
    match &opts.sort_key {
        SortKey::Match => out.sort_by(|a, b| b.match_score.cmp(&a.match_score)),
        SortKey::PriceAsc => out.sort_by(|a, b| total(price(a), price(b))),
        SortKey::PriceDesc => out.sort_by(|a, b| total(price(b), price(a))),
        SortKey::Popularity => out.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
        SortKey::Unsorted(_) => {}
    }
    out
}

fn total(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
