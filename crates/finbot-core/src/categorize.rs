//! Keyword categorization of transaction descriptions
//!
//! Rules are an ordered list of (category, keywords) pairs. The description is
//! lowercased and the first category with any keyword occurring as a substring
//! wins, so rule order decides ambiguous descriptions ("market cafe" is
//! Groceries because Groceries is declared before Dining). Anything unmatched
//! falls through to `Category::Miscellaneous`.

use std::sync::OnceLock;

use crate::models::Category;

/// Default rule table, in match order
const DEFAULT_RULES: &[(Category, &[&str])] = &[
    (
        Category::Groceries,
        &[
            "whole foods",
            "trader joe",
            "kroger",
            "safeway",
            "costco",
            "walmart",
            "aldi",
            "publix",
            "sprouts",
            "market",
            "grocery",
            "supermarket",
        ],
    ),
    (
        Category::Dining,
        &[
            "restaurant",
            "pizza",
            "sushi",
            "burger",
            "mcdonald",
            "chipotle",
            "starbucks",
            "coffee",
            "domino",
            "taco",
            "thai",
            "italian",
            "dinner",
            "lunch",
            "cafe",
            "bistro",
            "diner",
        ],
    ),
    (
        Category::Transport,
        &[
            "uber",
            "lyft",
            "gas station",
            "shell",
            "bp",
            "chevron",
            "exxon",
            "fuel",
            "parking",
            "transit",
            "metro",
            "taxi",
            "rideshare",
        ],
    ),
    (
        Category::Utilities,
        &[
            "electric",
            "electricity",
            "gas bill",
            "water bill",
            "internet",
            "phone bill",
            "utility",
            "power",
            "energy",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "netflix",
            "spotify",
            "hulu",
            "disney",
            "cinema",
            "movie",
            "concert",
            "game",
            "apple store",
            "steam",
            "amazon prime",
            "subscription",
        ],
    ),
    (
        Category::HealthFitness,
        &[
            "gym",
            "fitness",
            "planet fitness",
            "pharmacy",
            "cvs",
            "walgreens",
            "medical",
            "doctor",
            "health",
            "supplement",
            "hospital",
            "dental",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "target", "clothing", "store", "online", "ebay", "mall", "shop", "retail",
        ],
    ),
    (Category::Housing, &["rent", "mortgage", "hoa", "lease"]),
    (
        Category::Education,
        &[
            "course", "udemy", "coursera", "book", "school", "tuition", "training",
        ],
    ),
    (
        Category::Income,
        &[
            "salary",
            "deposit",
            "freelance",
            "payroll",
            "income",
            "bonus",
            "dividend",
        ],
    ),
];

/// A single keyword rule
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    /// Lowercase substrings, checked in order
    pub keywords: Vec<String>,
}

/// Ordered keyword matcher
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    /// Build a categorizer from custom rules. Keywords are lowercased; rules
    /// for the catch-all category are ignored.
    pub fn from_rules(rules: impl IntoIterator<Item = (Category, Vec<String>)>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|(category, _)| *category != Category::Miscellaneous)
            .map(|(category, keywords)| CategoryRule {
                category,
                keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classify a description. Total: unmatched text is Miscellaneous.
    pub fn categorize(&self, description: &str) -> Category {
        let desc_lower = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| desc_lower.contains(kw.as_str())))
            .map(|rule| rule.category)
            .unwrap_or(Category::Miscellaneous)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::from_rules(DEFAULT_RULES.iter().map(|(category, keywords)| {
            (*category, keywords.iter().map(|k| k.to_string()).collect())
        }))
    }
}

/// Classify a description with the default rule table
pub fn categorize(description: &str) -> Category {
    static DEFAULT: OnceLock<Categorizer> = OnceLock::new();
    DEFAULT.get_or_init(Categorizer::default).categorize(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category_keywords() {
        assert_eq!(categorize("WHOLE FOODS #123"), Category::Groceries);
        assert_eq!(categorize("Kroger"), Category::Groceries);
        assert_eq!(categorize("Chipotle Mexican Grill"), Category::Dining);
        assert_eq!(categorize("Uber trip"), Category::Transport);
        assert_eq!(categorize("City Water Bill"), Category::Utilities);
        assert_eq!(categorize("Netflix.com"), Category::Entertainment);
        assert_eq!(categorize("CVS/pharmacy"), Category::HealthFitness);
        assert_eq!(categorize("eBay purchase"), Category::Shopping);
        assert_eq!(categorize("Monthly Mortgage"), Category::Housing);
        assert_eq!(categorize("Coursera"), Category::Education);
        assert_eq!(categorize("ACME Payroll"), Category::Income);
    }

    #[test]
    fn test_unmatched_is_miscellaneous() {
        assert_eq!(categorize("Zelle to Alex"), Category::Miscellaneous);
        assert_eq!(categorize(""), Category::Miscellaneous);
    }

    #[test]
    fn test_earlier_category_wins() {
        // "market" (Groceries) before "cafe" (Dining)
        assert_eq!(categorize("Farmers Market Cafe"), Category::Groceries);
        // "coffee" (Dining) before "shop" (Shopping)
        assert_eq!(categorize("Coffee Shop"), Category::Dining);
        // "amazon prime" (Entertainment) before "amazon" (Shopping)
        assert_eq!(categorize("Amazon Prime Video"), Category::Entertainment);
        // "online" (Shopping) before "course" (Education)
        assert_eq!(categorize("Udemy online course"), Category::Shopping);
        // "gas bill" is Utilities, "gas station" is Transport
        assert_eq!(categorize("Gas Bill - PG&E"), Category::Utilities);
        assert_eq!(categorize("Gas Station 42"), Category::Transport);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(categorize("STARBUCKS STORE 1234"), Category::Dining);
        assert_eq!(categorize("starbucks store 1234"), Category::Dining);
    }

    #[test]
    fn test_default_rule_order_is_pinned() {
        let categorizer = Categorizer::default();
        let order: Vec<Category> = categorizer.rules().iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Groceries,
                Category::Dining,
                Category::Transport,
                Category::Utilities,
                Category::Entertainment,
                Category::HealthFitness,
                Category::Shopping,
                Category::Housing,
                Category::Education,
                Category::Income,
            ]
        );
        assert_eq!(categorizer.rules()[7].keywords, vec!["rent", "mortgage", "hoa", "lease"]);
    }

    #[test]
    fn test_custom_rules() {
        let categorizer = Categorizer::from_rules(vec![
            (Category::Dining, vec!["CAFE".to_string()]),
            (Category::Groceries, vec!["market".to_string()]),
            (Category::Miscellaneous, vec!["ignored".to_string()]),
        ]);
        assert_eq!(categorizer.rules().len(), 2);
        assert_eq!(categorizer.categorize("Market Cafe"), Category::Dining);
        assert_eq!(categorizer.categorize("ignored"), Category::Miscellaneous);
    }
}
