//! Turning questionnaire answers into a search phrase and a budget range.

use giftafy_types::query::{BudgetRange, GiftQuery};

/// Build the free-text search phrase for a query.
///
/// Parts in order: occasion, interests, "gift for {relationship}", age
/// descriptor. Empty parts are skipped and the rest joined by single spaces.
/// Nothing is escaped and case is preserved.
pub fn build_search_phrase(query: &GiftQuery) -> String {
    let relationship = format!("gift for {}", query.relationship.label());
    let parts = [
        query.occasion.label(),
        query.interests.trim(),
        relationship.as_str(),
        query.age_range.descriptor(),
    ];

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a budget label into numeric bounds.
///
/// Exactly one shape applies, checked in order:
/// 1. a hyphenated range ("$50-$100") gives both bounds,
/// 2. a trailing plus ("$500+") gives a lower bound,
/// 3. a leading "under" ("Under $25") gives an upper bound,
/// 4. anything else is unbounded.
///
/// A side with no digits contributes no bound. Never fails.
pub fn parse_budget(label: &str) -> BudgetRange {
    if label.contains('-') {
        let mut parts = label.split('-');
        return BudgetRange {
            min: parts.next().and_then(digits_of),
            max: parts.next().and_then(digits_of),
        };
    }

    if label.contains('+') {
        return BudgetRange {
            min: digits_of(label),
            max: None,
        };
    }

    if label.to_lowercase().contains("under") {
        return BudgetRange {
            min: None,
            max: digits_of(label),
        };
    }

    BudgetRange::unbounded()
}

fn digits_of(s: &str) -> Option<u32> {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
