//! Span and event field names shared by the search and account paths.
//!
//! Usable as field names in `tracing::info_span!` and friends, and as
//! OpenTelemetry attribute keys once the OTel layer is on.

/// Search phrase built from the questionnaire.
pub const GIFTAFY_SEARCH_PHRASE: &str = "giftafy.search.phrase";

/// Generation number of a search request.
pub const GIFTAFY_SEARCH_GENERATION: &str = "giftafy.search.generation";

/// Where results came from: "remote" or "catalog".
pub const GIFTAFY_SEARCH_SOURCE: &str = "giftafy.search.source";

/// Number of gift records returned.
pub const GIFTAFY_SEARCH_RESULT_COUNT: &str = "giftafy.search.result_count";

/// Upstream source name behind the hosted search function.
pub const GIFTAFY_UPSTREAM_NAME: &str = "giftafy.upstream.name";

/// Account id (never the email).
pub const GIFTAFY_USER_ID: &str = "giftafy.user.id";

/// Subscription tier of the account.
pub const GIFTAFY_USER_TIER: &str = "giftafy.user.tier";

/// Hosted function name ("search-gifts", "save-gift").
pub const GIFTAFY_FUNCTION_NAME: &str = "giftafy.function.name";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_are_namespaced() {
        for name in [
            GIFTAFY_SEARCH_PHRASE,
            GIFTAFY_SEARCH_GENERATION,
            GIFTAFY_SEARCH_SOURCE,
            GIFTAFY_SEARCH_RESULT_COUNT,
            GIFTAFY_UPSTREAM_NAME,
            GIFTAFY_USER_ID,
            GIFTAFY_USER_TIER,
            GIFTAFY_FUNCTION_NAME,
        ] {
            assert!(name.starts_with("giftafy."), "{name} is not namespaced");
        }
    }
}
