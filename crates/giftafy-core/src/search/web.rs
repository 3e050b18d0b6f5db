//! Google Custom Search results as gift records.
//!
//! A web result carries a title, link and snippet but none of the shop
//! metadata a gift record needs, so price is scraped from the text and the
//! rating, sales, score and trending flag are synthesized.

use once_cell::sync::Lazy;
use rand_core::RngCore;
use regex::Regex;
use serde::{Deserialize, Serialize};

use giftafy_types::gift::{GiftRecord, PLACEHOLDER_IMAGE, format_price};

/// Shown when a result's text carries no dollar amount.
pub const PRICE_NOT_AVAILABLE: &str = "Price not available";

/// Custom Search JSON API response (only the fields we read).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSearchResponse {
    #[serde(default)]
    pub items: Vec<WebSearchItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub display_link: Option<String>,
    #[serde(default)]
    pub pagemap: Option<PageMap>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMap {
    #[serde(default)]
    pub cse_image: Vec<PageMapImage>,
    #[serde(default)]
    pub cse_thumbnail: Vec<PageMapImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMapImage {
    pub src: String,
}

/// A dollar amount: `$`, optional whitespace, digits, up to two decimals.
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s?([0-9]+(?:\.[0-9]{1,2})?)").expect("Invalid regex"));

/// Find the first `$NN` or `$NN.NN` amount in `text`.
pub fn extract_price(text: &str) -> Option<f64> {
    PRICE_RE
        .captures_iter(text)
        .find_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
}

/// Turn one web result into a gift record.
///
/// Price comes from the snippet (or the title when there is no snippet);
/// images from the page map, falling back to a placeholder.
pub fn gift_from_web_item<R: RngCore + ?Sized>(item: &WebSearchItem, rng: &mut R) -> GiftRecord {
    let price_text = item
        .snippet
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&item.title);
    let price = extract_price(price_text)
        .map(format_price)
        .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string());

    let mut images: Vec<String> = item
        .pagemap
        .as_ref()
        .map(|p| {
            let source = if p.cse_image.is_empty() {
                &p.cse_thumbnail
            } else {
                &p.cse_image
            };
            source.iter().map(|img| img.src.clone()).collect()
        })
        .unwrap_or_default();
    if images.is_empty() {
        images.push(PLACEHOLDER_IMAGE.to_string());
    }

    let rating = ((3.0 + unit(rng) * 2.0) * 10.0).round() / 10.0;
    let sales = 10 + (rng.next_u32() % 990);
    let match_score = 50 + (rng.next_u32() % 50) as u8;
    let is_trending = unit(rng) < 0.3;

    GiftRecord {
        title: item.title.clone(),
        price,
        original_price: None,
        images,
        rating,
        reviews: sales / 4,
        retailer: item
            .display_link
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "Unknown retailer".to_string()),
        url: item.link.clone(),
        ai_recommendation: insight_for(&item.title, rng),
        match_score,
        is_trending,
        sales,
    }
}

/// One of a handful of canned one-line recommendations for `title`.
pub fn insight_for<R: RngCore + ?Sized>(title: &str, rng: &mut R) -> String {
    match rng.next_u32() % 5 {
        0 => format!(
            "This {title} would be perfect for someone who appreciates quality and thoughtfulness."
        ),
        1 => format!(
            "A great choice! This {title} has been trending among gift-givers this season."
        ),
        2 => format!(
            "The {title} offers excellent value and is sure to bring joy to the recipient."
        ),
        3 => format!(
            "Highly recommended - the {title} has been consistently well-reviewed by customers."
        ),
        _ => format!("This {title} stands out as a personalized and meaningful gift option."),
    }
}

/// Uniform float in [0, 1).
fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}
