//! Best-effort parsing of free-form LLM output into gift records.
//!
//! This is a lossy boundary. The model is asked for a numbered list, but
//! nothing enforces the shape, so the parser takes what it can recognize:
//!
//! - a numbered line ("1.", "2)", "#3") starts a record, as does a bulleted
//!   line ("-", "*", "•") that is not a field line;
//! - `Price:`, `Retailer:`/`Store:`, `URL:`/`Link:` (or a bare link) and
//!   `Why:`/`Reason:`/`Recommendation:` lines fill fields of the current record;
//! - any other text is appended to the current record's rationale;
//! - records that end up without a title are dropped.

use giftafy_types::gift::{GiftRecord, PLACEHOLDER_IMAGE, format_price, parse_price};

use super::web::{PRICE_NOT_AVAILABLE, extract_price};

const TOP_SCORE: u8 = 95;
const SCORE_STEP: u8 = 3;
const FLOOR_SCORE: u8 = 50;

#[derive(Debug, Default)]
struct Draft {
    title: String,
    price: Option<f64>,
    retailer: Option<String>,
    url: Option<String>,
    rationale: Vec<String>,
}

impl Draft {
    fn into_record(self, rank: usize) -> Option<GiftRecord> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return None;
        }
        let step = u8::try_from(rank).unwrap_or(u8::MAX).saturating_mul(SCORE_STEP);
        Some(GiftRecord {
            title,
            price: self
                .price
                .map(format_price)
                .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string()),
            original_price: None,
            images: vec![PLACEHOLDER_IMAGE.to_string()],
            rating: 0.0,
            reviews: 0,
            retailer: self.retailer.unwrap_or_else(|| "Unknown retailer".to_string()),
            url: self.url.unwrap_or_default(),
            ai_recommendation: self.rationale.join(" "),
            match_score: TOP_SCORE.saturating_sub(step).max(FLOOR_SCORE),
            is_trending: false,
            sales: 0,
        })
    }
}

enum Field {
    Price(String),
    Retailer(String),
    Url(String),
    Reason(String),
}

/// Parse an LLM answer into gift records, in the order they appear.
pub fn parse_gift_text(text: &str) -> Vec<GiftRecord> {
    let mut drafts: Vec<Draft> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = strip_number(line) {
            drafts.push(heading(rest));
            continue;
        }

        let unbulleted = strip_bullet(line);
        let field = parse_field(unbulleted.unwrap_or(line));

        match (field, unbulleted, drafts.last_mut()) {
            (Some(field), _, Some(current)) => apply(current, field),
            (Some(_), _, None) => {}
            (None, Some(rest), _) => drafts.push(heading(rest)),
            (None, None, Some(current)) => current.rationale.push(strip_emphasis(line)),
            (None, None, None) => {}
        }
    }

    let total = drafts.len();
    let records: Vec<GiftRecord> = drafts
        .into_iter()
        .filter(|d| !d.title.trim().is_empty())
        .enumerate()
        .filter_map(|(rank, d)| d.into_record(rank))
        .collect();

    if records.len() < total {
        tracing::debug!(
            dropped = total - records.len(),
            kept = records.len(),
            "dropped untitled fragments from LLM answer"
        );
    }
    records
}

/// A record heading, possibly with an inline price ("Pasta Maker - $79.99").
fn heading(rest: &str) -> Draft {
    let text = strip_emphasis(rest);
    let price = extract_price(&text);
    let title = match text.find(" - $").or_else(|| text.find(" ($")) {
        Some(idx) => text[..idx].to_string(),
        None => text.trim_end_matches(':').to_string(),
    };
    Draft {
        title: strip_emphasis(&title),
        price,
        ..Draft::default()
    }
}

fn apply(draft: &mut Draft, field: Field) {
    match field {
        Field::Price(value) => {
            draft.price = extract_price(&value).or_else(|| parse_price(&value));
        }
        Field::Retailer(value) => draft.retailer = Some(value),
        Field::Url(value) => draft.url = Some(value),
        Field::Reason(value) => draft.rationale.push(value),
    }
}

fn parse_field(line: &str) -> Option<Field> {
    let line = strip_emphasis(line);
    if line.starts_with("http://") || line.starts_with("https://") {
        return Some(Field::Url(line));
    }

    let (label, value) = line.split_once(':')?;
    let value = value.trim().to_string();
    match label.trim().to_lowercase().as_str() {
        "price" | "cost" => Some(Field::Price(value)),
        "retailer" | "store" | "where to buy" => Some(Field::Retailer(value)),
        "url" | "link" => Some(Field::Url(value)),
        "why" | "reason" | "recommendation" | "description" => Some(Field::Reason(value)),
        _ => None,
    }
}

/// "1. Foo", "2) Foo", "#3 Foo" -> "Foo". A bare "4." yields an empty heading.
fn strip_number(line: &str) -> Option<&str> {
    let body = line.strip_prefix('#').unwrap_or(line);
    let digits = body.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &body[digits..];
    let rest = rest
        .strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .or_else(|| line.starts_with('#').then_some(rest))?;
    Some(rest.trim_start())
}

fn strip_bullet(line: &str) -> Option<&str> {
    ["- ", "* ", "• "]
        .iter()
        .find_map(|b| line.strip_prefix(b))
        .map(str::trim_start)
}

/// Remove markdown bold/italic markers and surrounding whitespace.
fn strip_emphasis(s: &str) -> String {
    s.replace("**", "").replace("__", "").trim().to_string()
}
