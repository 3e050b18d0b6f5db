//! Keyword matching over a small fixed gift catalog.
//!
//! The catalog is a baseline list plus keyword-triggered bonus groups. It is
//! built once at startup (built in, or loaded from a catalog file by the
//! infra layer) and only ever read afterwards.

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use giftafy_types::error::CatalogError;
use giftafy_types::gift::{GiftRecord, MAX_MATCH_SCORE};
use giftafy_types::query::BudgetRange;

/// Score bonus per phrase token found in a record's title or rationale.
pub const KEYWORD_BONUS: u8 = 3;

/// Phrase tokens this short or shorter never earn a bonus.
const MIN_BONUS_TOKEN_LEN: usize = 4;

/// A catalog entry: the record shown to users plus its numeric price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(flatten)]
    pub record: GiftRecord,
    /// Used for budget filtering. Parsed from `record.price` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_value: Option<f64>,
}

impl CatalogItem {
    pub fn price(&self) -> Option<f64> {
        self.price_value.or_else(|| self.record.price_value())
    }
}

/// Items appended when any of the group's keywords occurs in the phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusGroup {
    pub name: String,
    pub keywords: Vec<String>,
    pub items: Vec<CatalogItem>,
}

impl BonusGroup {
    /// Case-insensitive containment of any keyword in `phrase_lower`.
    fn triggered_by(&self, phrase_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| phrase_lower.contains(&k.to_lowercase()))
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub baseline: Vec<CatalogItem>,
    #[serde(default)]
    pub bonus_groups: Vec<BonusGroup>,
}

/// The immutable gift catalog.
#[derive(Debug, Clone)]
pub struct GiftCatalog {
    baseline: Vec<CatalogItem>,
    bonus_groups: Vec<BonusGroup>,
}

impl GiftCatalog {
    /// Build a catalog, rejecting entries that would break record invariants
    /// (empty title, no images, unparseable price, out-of-range rating or
    /// match score).
    pub fn new(document: CatalogDocument) -> Result<Self, CatalogError> {
        let all_items = document
            .baseline
            .iter()
            .chain(document.bonus_groups.iter().flat_map(|g| g.items.iter()));
        for item in all_items {
            validate_item(item)?;
        }

        Ok(Self {
            baseline: document.baseline,
            bonus_groups: document.bonus_groups,
        })
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            baseline: BASELINE.iter().map(Seed::to_item).collect(),
            bonus_groups: BONUS_GROUPS
                .iter()
                .map(|(name, keywords, seed)| BonusGroup {
                    name: (*name).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                    items: vec![seed.to_item()],
                })
                .collect(),
        }
    }

    pub fn baseline(&self) -> &[CatalogItem] {
        &self.baseline
    }

    pub fn bonus_groups(&self) -> &[BonusGroup] {
        &self.bonus_groups
    }

    /// Every item in the catalog, baseline first.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.baseline
            .iter()
            .chain(self.bonus_groups.iter().flat_map(|g| g.items.iter()))
    }

    /// Match a search phrase against the catalog, shuffled with the OS RNG.
    pub fn match_catalog(&self, phrase: &str, budget: &BudgetRange) -> Vec<GiftRecord> {
        self.match_catalog_with_rng(phrase, budget, &mut OsRng)
    }

    /// Match a search phrase against the catalog.
    ///
    /// Baseline plus triggered bonus groups, filtered to the budget, scored
    /// +3 per phrase token longer than three characters found in the title
    /// or rationale (capped at 99), then shuffled. Never truncated.
    pub fn match_catalog_with_rng<R: RngCore + ?Sized>(
        &self,
        phrase: &str,
        budget: &BudgetRange,
        rng: &mut R,
    ) -> Vec<GiftRecord> {
        let phrase_lower = phrase.to_lowercase();
        let tokens: Vec<&str> = phrase_lower
            .split_whitespace()
            .filter(|t| t.chars().count() >= MIN_BONUS_TOKEN_LEN)
            .collect();

        let bonus = self
            .bonus_groups
            .iter()
            .filter(|g| g.triggered_by(&phrase_lower))
            .flat_map(|g| g.items.iter());

        let mut matched: Vec<GiftRecord> = self
            .baseline
            .iter()
            .chain(bonus)
            .filter(|item| item.price().is_some_and(|p| budget.contains(p)))
            .map(|item| {
                let mut record = item.record.clone();
                record.match_score = boosted_score(&record, &tokens);
                record
            })
            .collect();

        shuffle(&mut matched, rng);

        tracing::debug!(
            phrase,
            min = ?budget.min,
            max = ?budget.max,
            count = matched.len(),
            "catalog matched"
        );
        matched
    }
}

impl Default for GiftCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn boosted_score(record: &GiftRecord, tokens: &[&str]) -> u8 {
    let haystack = format!("{}{}", record.title, record.ai_recommendation).to_lowercase();
    let hits = tokens.iter().filter(|t| haystack.contains(**t)).count();
    let boosted = usize::from(record.match_score) + hits * usize::from(KEYWORD_BONUS);
    boosted.min(usize::from(MAX_MATCH_SCORE)) as u8
}

/// Uniform Fisher-Yates shuffle.
pub fn shuffle<T, R: RngCore + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

fn validate_item(item: &CatalogItem) -> Result<(), CatalogError> {
    let record = &item.record;
    let invalid = |reason: &str| CatalogError::InvalidEntry(record.title.clone(), reason.into());

    if record.title.trim().is_empty() {
        return Err(CatalogError::InvalidEntry(
            "<untitled>".to_string(),
            "title is empty".to_string(),
        ));
    }
    if record.images.is_empty() {
        return Err(invalid("at least one image is required"));
    }
    if item.price().is_none() {
        return Err(invalid("price has no numeric value"));
    }
    if !(0.0..=5.0).contains(&record.rating) {
        return Err(invalid("rating must be between 0 and 5"));
    }
    if record.match_score > MAX_MATCH_SCORE {
        return Err(invalid("match score must not exceed 99"));
    }
    Ok(())
}

/// Compact literal for the built-in catalog.
struct Seed {
    title: &'static str,
    price: f64,
    images: &'static [&'static str],
    rating: f64,
    reviews: u32,
    recommendation: &'static str,
    match_score: u8,
    is_trending: bool,
    sales: u32,
}

impl Seed {
    fn to_item(&self) -> CatalogItem {
        CatalogItem {
            record: GiftRecord {
                title: self.title.to_string(),
                price: giftafy_types::gift::format_price(self.price),
                original_price: None,
                images: self
                    .images
                    .iter()
                    .map(|tag| format!("https://placehold.co/600x400/333/FFF?text={tag}"))
                    .collect(),
                rating: self.rating,
                reviews: self.reviews,
                retailer: "Etsy".to_string(),
                url: "https://etsy.com".to_string(),
                ai_recommendation: self.recommendation.to_string(),
                match_score: self.match_score,
                is_trending: self.is_trending,
                sales: self.sales,
            },
            price_value: Some(self.price),
        }
    }
}

const BASELINE: &[Seed] = &[
    Seed {
        title: "Personalized Star Map - Night Sky Print",
        price: 59.99,
        images: &["Star+Map+1", "Star+Map+2"],
        rating: 4.9,
        reviews: 876,
        recommendation: "A thoughtful, personalized gift showing the night sky exactly as it appeared on a special date. Perfect for commemorating birthdays or anniversaries.",
        match_score: 92,
        is_trending: true,
        sales: 3200,
    },
    Seed {
        title: "Custom Portrait from Photo",
        price: 129.99,
        images: &["Portrait+1", "Portrait+2"],
        rating: 4.8,
        reviews: 210,
        recommendation: "A hand-painted custom portrait created from a favorite photo. A truly personal gift that will be treasured for years to come.",
        match_score: 90,
        is_trending: false,
        sales: 800,
    },
    Seed {
        title: "Handcrafted Wooden Music Box",
        price: 89.99,
        images: &["Music+Box"],
        rating: 4.7,
        reviews: 342,
        recommendation: "This beautiful handcrafted wooden music box plays a custom tune. A unique keepsake that will be cherished for years.",
        match_score: 87,
        is_trending: true,
        sales: 1200,
    },
    Seed {
        title: "Personalized Name Necklace",
        price: 45.99,
        images: &["Necklace"],
        rating: 4.9,
        reviews: 1200,
        recommendation: "A beautiful personalized necklace with the recipient's name. A timeless piece of jewelry they'll wear every day.",
        match_score: 88,
        is_trending: true,
        sales: 5000,
    },
    Seed {
        title: "Leather Bound Journal",
        price: 39.99,
        images: &["Journal"],
        rating: 4.6,
        reviews: 520,
        recommendation: "A high-quality leather journal with personalized engraving. Perfect for writers, travelers, or anyone who appreciates a thoughtful gift.",
        match_score: 85,
        is_trending: false,
        sales: 2100,
    },
    Seed {
        title: "Custom Pet Portrait",
        price: 79.99,
        images: &["Pet+Portrait"],
        rating: 4.9,
        reviews: 890,
        recommendation: "A custom portrait of the recipient's beloved pet. A heartwarming gift for any animal lover.",
        match_score: 94,
        is_trending: true,
        sales: 3400,
    },
    Seed {
        title: "Engraved Whiskey Glasses Set",
        price: 65.99,
        images: &["Whiskey+Glasses"],
        rating: 4.8,
        reviews: 430,
        recommendation: "A set of high-quality whiskey glasses with personalized engraving. Perfect for the whiskey enthusiast.",
        match_score: 89,
        is_trending: false,
        sales: 1800,
    },
    Seed {
        title: "Custom Family Recipe Cutting Board",
        price: 49.99,
        images: &["Cutting+Board"],
        rating: 4.7,
        reviews: 610,
        recommendation: "A beautiful cutting board engraved with a treasured family recipe. A meaningful gift for anyone who loves cooking.",
        match_score: 91,
        is_trending: true,
        sales: 2700,
    },
];

const BONUS_GROUPS: &[(&str, &[&str], Seed)] = &[
    (
        "birthday",
        &["birthday"],
        Seed {
            title: "Birthday Countdown Calendar",
            price: 54.99,
            images: &["Birthday+Calendar"],
            rating: 4.8,
            reviews: 325,
            recommendation: "A fun countdown calendar to build excitement for their big day. Each day reveals a small gift or message.",
            match_score: 93,
            is_trending: false,
            sales: 950,
        },
    ),
    (
        "wedding",
        &["wedding", "anniversary"],
        Seed {
            title: "Custom Wedding Vows Art Print",
            price: 69.99,
            images: &["Vows+Print"],
            rating: 5.0,
            reviews: 189,
            recommendation: "Turn wedding vows or a special quote into a beautiful art piece. A romantic reminder of their special day.",
            match_score: 96,
            is_trending: true,
            sales: 780,
        },
    ),
    (
        "children",
        &["child", "under 18"],
        Seed {
            title: "Personalized Children's Storybook",
            price: 39.99,
            images: &["Storybook"],
            rating: 4.9,
            reviews: 752,
            recommendation: "A custom storybook where the child becomes the main character. A magical gift they'll love reading over and over.",
            match_score: 98,
            is_trending: true,
            sales: 4200,
        },
    ),
    (
        "reading",
        &["reading", "book"],
        Seed {
            title: "Personalized Bookmarks Set",
            price: 24.99,
            images: &["Bookmarks"],
            rating: 4.7,
            reviews: 520,
            recommendation: "A set of beautifully crafted personalized bookmarks. Perfect for the avid reader.",
            match_score: 95,
            is_trending: false,
            sales: 2250,
        },
    ),
    (
        "cooking",
        &["cooking", "chef", "kitchen"],
        Seed {
            title: "Personalized Chef's Apron",
            price: 59.99,
            images: &["Chef+Apron"],
            rating: 4.8,
            reviews: 310,
            recommendation: "A high-quality personalized apron for the cooking enthusiast. A practical and thoughtful gift.",
            match_score: 97,
            is_trending: true,
            sales: 1890,
        },
    ),
    (
        "music",
        &["music", "musician"],
        Seed {
            title: "Custom Sound Wave Art Print",
            price: 45.99,
            images: &["Sound+Wave+Art"],
            rating: 4.9,
            reviews: 275,
            recommendation: "A beautiful art print of a sound wave from their favorite song. A unique gift for music lovers.",
            match_score: 96,
            is_trending: true,
            sales: 980,
        },
    ),
    (
        "travel",
        &["travel"],
        Seed {
            title: "Personalized Travel Map",
            price: 69.99,
            images: &["Travel+Map"],
            rating: 4.8,
            reviews: 345,
            recommendation: "A beautiful map where they can track their travels. Perfect for the adventure seeker.",
            match_score: 94,
            is_trending: false,
            sales: 1560,
        },
    ),
];

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Deterministic RNG: a fixed-increment counter.
    pub(crate) struct StepRng(pub u64);

    impl RngCore for StepRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn titles(records: &[GiftRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    fn budget(min: Option<u32>, max: Option<u32>) -> BudgetRange {
        BudgetRange { min, max }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = GiftCatalog::builtin();
        let document = CatalogDocument {
            baseline: builtin.baseline().to_vec(),
            bonus_groups: builtin.bonus_groups().to_vec(),
        };
        assert!(GiftCatalog::new(document).is_ok());
        assert_eq!(builtin.baseline().len(), 8);
        assert_eq!(builtin.bonus_groups().len(), 7);
    }

    #[test]
    fn test_birthday_cooking_scenario() {
        let catalog = GiftCatalog::builtin();
        let results = catalog.match_catalog_with_rng(
            "Birthday cooking gift for Friend 26-35",
            &budget(Some(50), Some(100)),
            &mut StepRng(7),
        );
        let names = titles(&results);

        assert!(names.contains(&"Birthday Countdown Calendar"));
        assert!(names.contains(&"Personalized Chef's Apron"));
        assert!(names.contains(&"Personalized Star Map - Night Sky Print"));
        assert!(!names.contains(&"Custom Portrait from Photo"));
        assert!(!names.contains(&"Leather Bound Journal"));
        assert!(!names.contains(&"Custom Family Recipe Cutting Board"));
        assert!(!names.contains(&"Personalized Travel Map"));

        for record in &results {
            let price = record.price_value().unwrap();
            assert!((50.0..=100.0).contains(&price), "{} at {price}", record.title);
            assert!(record.match_score <= MAX_MATCH_SCORE);
        }
    }

    #[test]
    fn test_keyword_bonus_and_cap() {
        let catalog = GiftCatalog::builtin();
        let results = catalog.match_catalog_with_rng(
            "cooking family recipe",
            &BudgetRange::unbounded(),
            &mut StepRng(1),
        );

        let board = results
            .iter()
            .find(|r| r.title == "Custom Family Recipe Cutting Board")
            .unwrap();
        // 91 + cooking + family + recipe = 100, capped.
        assert_eq!(board.match_score, 99);

        let journal = results
            .iter()
            .find(|r| r.title == "Leather Bound Journal")
            .unwrap();
        assert_eq!(journal.match_score, 85);
    }

    #[test]
    fn test_short_tokens_never_score() {
        let catalog = GiftCatalog::builtin();
        let results =
            catalog.match_catalog_with_rng("a pet for you", &BudgetRange::unbounded(), &mut StepRng(3));
        let pet = results
            .iter()
            .find(|r| r.title == "Custom Pet Portrait")
            .unwrap();
        assert_eq!(pet.match_score, 94);
    }

    #[test]
    fn test_bonus_groups_are_case_insensitive() {
        let catalog = GiftCatalog::builtin();
        let results = catalog.match_catalog_with_rng(
            "TRAVEL gift for Child",
            &BudgetRange::unbounded(),
            &mut StepRng(5),
        );
        let names = titles(&results);
        assert!(names.contains(&"Personalized Travel Map"));
        assert!(names.contains(&"Personalized Children's Storybook"));
        assert!(!names.contains(&"Birthday Countdown Calendar"));
        assert_eq!(results.len(), 10);
    }

    #[test]
    fn test_open_bounds() {
        let catalog = GiftCatalog::builtin();
        let under = catalog.match_catalog_with_rng("x", &budget(None, Some(45)), &mut StepRng(2));
        assert!(under.iter().all(|r| r.price_value().unwrap() <= 45.0));
        assert_eq!(titles(&under), vec!["Leather Bound Journal"]);

        let over = catalog.match_catalog_with_rng("x", &budget(Some(100), None), &mut StepRng(2));
        assert_eq!(titles(&over), vec!["Custom Portrait from Photo"]);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items, &mut StepRng(42));
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_rejects_invalid_entries() {
        let mut item = GiftCatalog::builtin().baseline()[0].clone();
        item.record.images.clear();
        let err = GiftCatalog::new(CatalogDocument {
            baseline: vec![item],
            bonus_groups: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntry(_, _)));

        let mut item = GiftCatalog::builtin().baseline()[0].clone();
        item.record.price = "call us".to_string();
        item.price_value = None;
        assert!(
            GiftCatalog::new(CatalogDocument {
                baseline: vec![item],
                bonus_groups: vec![],
            })
            .is_err()
        );
    }

    #[test]
    fn test_catalog_document_json_shape() {
        let json = r#"{
            "baseline": [{
                "title": "Mug",
                "price": "$12.00",
                "images": ["https://example.com/mug.png"],
                "rating": 4.2,
                "reviews": 10,
                "retailer": "Shop",
                "url": "https://example.com/mug",
                "aiRecommendation": "Everyone needs a mug.",
                "matchScore": 70,
                "isTrending": false,
                "sales": 40
            }],
            "bonusGroups": []
        }"#;
        let document: CatalogDocument = serde_json::from_str(json).unwrap();
        let catalog = GiftCatalog::new(document).unwrap();
        assert_eq!(catalog.baseline()[0].price(), Some(12.0));
    }
}
