//! The results view: the accepted result set plus the user's filter/sort
//! choices and which gifts have been saved.

use std::collections::HashSet;
use std::sync::Arc;

use giftafy_types::error::SaveError;
use giftafy_types::function::SaveGiftRequest;
use giftafy_types::gift::{GiftRecord, SavedGift};

use super::filter::{FilterOptions, PriceBucket, SortKey, filter_and_sort};
use super::generation::SearchGeneration;
use super::remote::GiftSaver;
use super::service::{ResultSource, SearchOutcome};

/// Holds the latest accepted search outcome.
///
/// Outcomes from superseded generations are rejected, so a slow response
/// never overwrites a newer one.
#[derive(Debug)]
pub struct ResultsView {
    generations: Arc<SearchGeneration>,
    shown: Option<SearchOutcome>,
    options: FilterOptions,
    saved: HashSet<String>,
}

impl ResultsView {
    pub fn new(generations: Arc<SearchGeneration>) -> Self {
        Self {
            generations,
            shown: None,
            options: FilterOptions::default(),
            saved: HashSet::new(),
        }
    }

    /// Show `outcome` if it belongs to the latest generation. Returns whether
    /// it was accepted.
    pub fn accept(&mut self, outcome: SearchOutcome) -> bool {
        if !self.generations.is_current(outcome.generation) {
            tracing::debug!(
                generation = outcome.generation,
                latest = self.generations.latest(),
                "discarding stale search outcome"
            );
            return false;
        }
        self.shown = Some(outcome);
        self.saved.clear();
        true
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.shown.as_ref()
    }

    pub fn source(&self) -> Option<ResultSource> {
        self.shown.as_ref().map(|o| o.source)
    }

    pub fn warning(&self) -> Option<&str> {
        self.shown.as_ref().and_then(|o| o.warning.as_deref())
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.options.text = text;
    }

    pub fn set_price_bucket(&mut self, bucket: PriceBucket) {
        self.options.price_bucket = bucket;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.options.sort_key = key;
    }

    /// The accepted results after the current filter and sort.
    pub fn visible(&self) -> Vec<GiftRecord> {
        match &self.shown {
            Some(outcome) => filter_and_sort(&outcome.gifts, &self.options),
            None => Vec::new(),
        }
    }

    pub fn is_saved(&self, gift: &GiftRecord) -> bool {
        self.saved.contains(&save_key(gift))
    }

    /// Save a gift through the hosted function. The gift is only marked
    /// saved once the call succeeds.
    pub async fn save<S: GiftSaver>(
        &mut self,
        saver: &S,
        gift: &GiftRecord,
        is_favorite: bool,
    ) -> Result<SavedGift, SaveError> {
        let request = SaveGiftRequest {
            gift: gift.clone(),
            is_favorite,
        };
        let saved = saver.save_gift(&request).await?;
        self.saved.insert(save_key(gift));
        Ok(saved)
    }
}

fn save_key(gift: &GiftRecord) -> String {
    format!("{}\u{1f}{}", gift.title, gift.url)
}
