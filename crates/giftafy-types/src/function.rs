//! Wire contract of the hosted `search-gifts` and `save-gift` functions.
//!
//! Both the axum server and the reqwest client speak these shapes, so they
//! live here rather than in either side.

use serde::{Deserialize, Serialize};

use crate::gift::{GiftRecord, SavedGift};
use crate::query::BudgetRange;

/// Body of `POST /functions/v1/search-gifts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchGiftsRequest {
    pub search_terms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl SearchGiftsRequest {
    pub fn new(search_terms: impl Into<String>, budget: BudgetRange) -> Self {
        Self {
            search_terms: search_terms.into(),
            min_price: budget.min.map(f64::from),
            max_price: budget.max.map(f64::from),
        }
    }

    /// Whether `price` satisfies the requested bounds (inclusive).
    pub fn within_budget(&self, price: f64) -> bool {
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }
}

/// Successful `search-gifts` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchGiftsResponse {
    pub gifts: Vec<GiftRecord>,
}

/// Body of `POST /functions/v1/save-gift`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGiftRequest {
    pub gift: GiftRecord,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Successful `save-gift` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGiftResponse {
    pub success: bool,
    pub gift: SavedGift,
}

/// Error body shared by both functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_exceeded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl FunctionErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }

    pub fn is_limit_exceeded(&self) -> bool {
        self.limit_exceeded.unwrap_or(false)
    }

    pub fn is_upgrade_required(&self) -> bool {
        self.upgrade_required.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_omits_missing_bounds() {
        let req = SearchGiftsRequest::new("Birthday gift for Friend", BudgetRange { min: None, max: Some(25) });
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["searchTerms"], "Birthday gift for Friend");
        assert_eq!(json["maxPrice"], 25.0);
        assert!(json.get("minPrice").is_none());
    }

    #[test]
    fn test_search_request_within_budget() {
        let req = SearchGiftsRequest::new("x", BudgetRange { min: Some(50), max: Some(100) });
        assert!(req.within_budget(50.0));
        assert!(req.within_budget(100.0));
        assert!(!req.within_budget(100.5));

        let open = SearchGiftsRequest::new("x", BudgetRange::unbounded());
        assert!(open.within_budget(1_000_000.0));
    }

    #[test]
    fn test_error_body_flags() {
        let body: FunctionErrorBody =
            serde_json::from_str(r#"{"error":"Daily search limit exceeded","limitExceeded":true}"#).unwrap();
        assert!(body.is_limit_exceeded());
        assert!(!body.is_upgrade_required());

        let plain = FunctionErrorBody::new("Unauthorized");
        let json = serde_json::to_string(&plain).unwrap();
        assert_eq!(json, r#"{"error":"Unauthorized"}"#);
    }

    #[test]
    fn test_save_request_defaults_is_favorite() {
        let json = r#"{"gift":{"title":"Journal","price":"$39.99","images":["a"],"rating":4.6,"reviews":520,"retailer":"Etsy","url":"https://etsy.com","aiRecommendation":"Nice","matchScore":85,"isTrending":false,"sales":2100}}"#;
        let req: SaveGiftRequest = serde_json::from_str(json).unwrap();
        assert!(!req.is_favorite);
        assert_eq!(req.gift.title, "Journal");
    }
}
