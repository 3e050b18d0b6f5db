//! Query parameter extractors.

use serde::Deserialize;

use giftafy_core::search::filter::{FilterOptions, PriceBucket, SortKey};

/// Projection parameters for the gift finder: `?text=&price=&sort=`.
#[derive(Debug, Deserialize, Default)]
pub struct FinderQuery {
    /// Case-insensitive title substring.
    pub text: Option<String>,
    /// Price bucket (all, under50, 50to100, 100to250, over250).
    pub price: Option<String>,
    /// Sort key (match, priceAsc, priceDesc, popularity). Unknown keys keep
    /// the incoming order.
    pub sort: Option<String>,
}

impl FinderQuery {
    pub fn filter_options(&self) -> Result<FilterOptions, String> {
        let price_bucket = match self.price.as_deref().map(str::trim) {
            None | Some("") => PriceBucket::All,
            Some(p) => p.parse::<PriceBucket>()?,
        };
        let sort_key = self
            .sort
            .as_deref()
            .map(SortKey::parse)
            .unwrap_or_default();

        Ok(FilterOptions {
            text: self.text.clone(),
            price_bucket,
            sort_key,
        })
    }
}

/// Query parameters for the search history endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Maximum entries (capped at the dashboard limit).
    pub limit: Option<u32>,
}
