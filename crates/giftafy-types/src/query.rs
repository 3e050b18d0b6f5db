//! Questionnaire answers and the budget range derived from them.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Budget labels offered by the questionnaire, cheapest first.
pub const BUDGET_OPTIONS: [&str; 6] = [
    "Under $25",
    "$25-$50",
    "$50-$100",
    "$100-$250",
    "$250-$500",
    "$500+",
];

/// Who the gift is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    Friend,
    #[serde(rename = "Family Member")]
    FamilyMember,
    Partner,
    Colleague,
    Child,
    Other,
}

impl Relationship {
    pub const ALL: [Relationship; 6] = [
        Relationship::Friend,
        Relationship::FamilyMember,
        Relationship::Partner,
        Relationship::Colleague,
        Relationship::Child,
        Relationship::Other,
    ];

    /// Display label used in the questionnaire and the search phrase.
    pub fn label(&self) -> &'static str {
        match self {
            Relationship::Friend => "Friend",
            Relationship::FamilyMember => "Family Member",
            Relationship::Partner => "Partner",
            Relationship::Colleague => "Colleague",
            Relationship::Child => "Child",
            Relationship::Other => "Other",
        }
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Relationship::Friend
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relationship::ALL
            .into_iter()
            .find(|r| loose_eq(r.label(), s))
            .ok_or_else(|| format!("invalid relationship: '{s}'"))
    }
}

/// Age bracket of the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "Under 18")]
    Under18,
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46-60")]
    From46To60,
    #[serde(rename = "60+")]
    Over60,
}

impl AgeRange {
    pub const ALL: [AgeRange; 6] = [
        AgeRange::Under18,
        AgeRange::From18To25,
        AgeRange::From26To35,
        AgeRange::From36To45,
        AgeRange::From46To60,
        AgeRange::Over60,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeRange::Under18 => "Under 18",
            AgeRange::From18To25 => "18-25",
            AgeRange::From26To35 => "26-35",
            AgeRange::From36To45 => "36-45",
            AgeRange::From46To60 => "46-60",
            AgeRange::Over60 => "60+",
        }
    }

    /// The age descriptor placed in the search phrase. The top bracket reads
    /// better to search engines as "senior".
    pub fn descriptor(&self) -> &'static str {
        match self {
            AgeRange::Over60 => "senior",
            other => other.label(),
        }
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        AgeRange::From26To35
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeRange::ALL
            .into_iter()
            .find(|a| loose_eq(a.label(), s))
            .ok_or_else(|| format!("invalid age range: '{s}'"))
    }
}

/// The occasion the gift is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occasion {
    Birthday,
    Anniversary,
    Wedding,
    Christmas,
    Graduation,
    #[serde(rename = "Just Because")]
    JustBecause,
    Other,
}

impl Occasion {
    pub const ALL: [Occasion; 7] = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::Wedding,
        Occasion::Christmas,
        Occasion::Graduation,
        Occasion::JustBecause,
        Occasion::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Occasion::Birthday => "Birthday",
            Occasion::Anniversary => "Anniversary",
            Occasion::Wedding => "Wedding",
            Occasion::Christmas => "Christmas",
            Occasion::Graduation => "Graduation",
            Occasion::JustBecause => "Just Because",
            Occasion::Other => "Other",
        }
    }
}

impl Default for Occasion {
    fn default() -> Self {
        Occasion::Birthday
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Occasion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Occasion::ALL
            .into_iter()
            .find(|o| loose_eq(o.label(), s))
            .ok_or_else(|| format!("invalid occasion: '{s}'"))
    }
}

/// Compare a label against user input, ignoring case, spaces, hyphens and
/// underscores ("family-member" matches "Family Member").
fn loose_eq(label: &str, input: &str) -> bool {
    let normalize = |s: &str| -> String {
        s.chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect()
    };
    normalize(label) == normalize(input)
}

/// The answers collected by the questionnaire for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftQuery {
    pub relationship: Relationship,
    #[serde(alias = "age")]
    pub age_range: AgeRange,
    pub occasion: Occasion,
    /// Free text, comma separated. Passed through to the search phrase as-is.
    #[serde(default)]
    pub interests: String,
    /// One of [`BUDGET_OPTIONS`] in practice, but any label is accepted.
    #[serde(alias = "budget")]
    pub budget_label: String,
}

impl Default for GiftQuery {
    fn default() -> Self {
        Self {
            relationship: Relationship::default(),
            age_range: AgeRange::default(),
            occasion: Occasion::default(),
            interests: String::new(),
            budget_label: "$50-$100".to_string(),
        }
    }
}

/// Inclusive price bounds. `None` on a side means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl BudgetRange {
    /// An unbounded range (what unrecognized budget labels degrade to).
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `price` lies within the range, inclusive at both present bounds.
    pub fn contains(&self, price: f64) -> bool {
        if let Some(min) = self.min {
            if price < f64::from(min) {
                return false;
            }
        }
        if let Some(max) = self.max {
            if price > f64::from(max) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_parse_is_lenient() {
        assert_eq!("family member".parse::<Relationship>().unwrap(), Relationship::FamilyMember);
        assert_eq!("Family-Member".parse::<Relationship>().unwrap(), Relationship::FamilyMember);
        assert_eq!("CHILD".parse::<Relationship>().unwrap(), Relationship::Child);
        assert!("stranger".parse::<Relationship>().is_err());
    }

    #[test]
    fn test_age_range_descriptor() {
        assert_eq!(AgeRange::Over60.descriptor(), "senior");
        assert_eq!(AgeRange::From26To35.descriptor(), "26-35");
        assert_eq!(AgeRange::Under18.descriptor(), "Under 18");
    }

    #[test]
    fn test_age_range_parse() {
        assert_eq!("60+".parse::<AgeRange>().unwrap(), AgeRange::Over60);
        assert_eq!("under 18".parse::<AgeRange>().unwrap(), AgeRange::Under18);
        assert_eq!("36-45".parse::<AgeRange>().unwrap(), AgeRange::From36To45);
    }

    #[test]
    fn test_occasion_labels_roundtrip() {
        for occasion in Occasion::ALL {
            let parsed: Occasion = occasion.to_string().parse().unwrap();
            assert_eq!(parsed, occasion);
        }
    }

    #[test]
    fn test_gift_query_json_uses_labels() {
        let query = GiftQuery {
            relationship: Relationship::FamilyMember,
            age_range: AgeRange::Over60,
            occasion: Occasion::JustBecause,
            interests: "gardening".to_string(),
            budget_label: "$500+".to_string(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["relationship"], "Family Member");
        assert_eq!(json["ageRange"], "60+");
        assert_eq!(json["occasion"], "Just Because");
        assert_eq!(json["budgetLabel"], "$500+");
    }

    #[test]
    fn test_gift_query_accepts_form_field_names() {
        let json = r#"{"relationship":"Friend","age":"18-25","occasion":"Birthday","budget":"Under $25"}"#;
        let query: GiftQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.age_range, AgeRange::From18To25);
        assert_eq!(query.budget_label, "Under $25");
        assert!(query.interests.is_empty());
    }

    #[test]
    fn test_budget_range_contains_is_inclusive() {
        let range = BudgetRange { min: Some(50), max: Some(100) };
        assert!(range.contains(50.0));
        assert!(range.contains(100.0));
        assert!(!range.contains(49.99));
        assert!(!range.contains(100.01));
        assert!(BudgetRange::unbounded().contains(10_000.0));
    }

    #[test]
    fn test_default_query_matches_initial_form() {
        let query = GiftQuery::default();
        assert_eq!(query.relationship, Relationship::Friend);
        assert_eq!(query.age_range, AgeRange::From26To35);
        assert_eq!(query.occasion, Occasion::Birthday);
        assert_eq!(query.budget_label, "$50-$100");
    }
}
