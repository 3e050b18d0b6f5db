use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::account::UserId;

/// Highest match score a record may carry.
pub const MAX_MATCH_SCORE: u8 = 99;

/// Placeholder image used when a source offers no pictures.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400/333/FFF?text=No+Image";

/// A candidate gift as returned by search and consumed by display and
/// persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftRecord {
    pub title: String,
    /// Formatted currency string, e.g. "$59.99".
    pub price: String,
    /// Present only when the item is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    pub images: Vec<String>,
    /// Star rating in [0, 5].
    pub rating: f64,
    pub reviews: u32,
    pub retailer: String,
    pub url: String,
    pub ai_recommendation: String,
    /// Relevance heuristic in [0, 99]; not a probability.
    pub match_score: u8,
    pub is_trending: bool,
    pub sales: u32,
}

impl GiftRecord {
    /// Numeric value of the `price` string, if it has one.
    pub fn price_value(&self) -> Option<f64> {
        parse_price(&self.price)
    }
}

/// Parse a formatted price ("$1,299.99") into a number by dropping everything
/// that is not a digit or a decimal point.
///
/// Returns `None` for strings without a number ("Price not available").
pub fn parse_price(price: &str) -> Option<f64> {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a numeric price as US dollars with two decimals.
pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

/// Unique identifier for a saved gift (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SavedGiftId(pub Uuid);

impl SavedGiftId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SavedGiftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SavedGiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SavedGiftId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A gift snapshot persisted to an account.
///
/// Owned exclusively by the account that saved it. The snapshot is never
/// refreshed from the source; only `is_favorite` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGift {
    pub id: SavedGiftId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub gift: GiftRecord,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// One recorded search. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub search_terms: String,
    pub created_at: DateTime<Utc>,
}
