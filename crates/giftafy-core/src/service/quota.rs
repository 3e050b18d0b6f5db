//! Daily search quota.
//!
//! Each account has a counter and the instant it was last reset. The counter
//! resets lazily: when a search arrives on a later UTC day than the stored
//! reset, it counts as zero.

use chrono::{DateTime, Utc};

use giftafy_types::account::{SearchUsage, User};

/// Searches already used today.
pub fn searches_today(user: &User, now: DateTime<Utc>) -> u32 {
    if is_new_day(user.last_search_reset, now) {
        0
    } else {
        user.search_count
    }
}

/// The usage after admitting one more search, or `None` when the daily
/// limit is already reached.
///
/// Repositories must apply this as a single atomic step against the stored
/// counter, never against a previously loaded snapshot.
pub fn charge(current: SearchUsage, daily_limit: u32, now: DateTime<Utc>) -> Option<SearchUsage> {
    let reset = is_new_day(current.last_search_reset, now);
    let used = if reset { 0 } else { current.search_count };
    if used >= daily_limit {
        return None;
    }

    Some(SearchUsage {
        search_count: used + 1,
        last_search_reset: if reset { now } else { current.last_search_reset },
    })
}

fn is_new_day(last_search_reset: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    last_search_reset.date_naive() != now.date_naive()
}
