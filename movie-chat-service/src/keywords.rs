//! Keyword rules shared by the query classifier, the fallback generator and
//! the suggestion generator. Matching is case-insensitive substring search.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Horror,
    Comedy,
    Action,
}

/// Ordered by priority: the first rule with a matching keyword wins
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Horror, &["horror", "scary"]),
    (Category::Comedy, &["comedy", "funny"]),
    (Category::Action, &["action"]),
];

/// Words and phrases that mark a message as a catalog query
pub const CATALOG_TRIGGERS: &[&str] = &[
    "movie",
    "film",
    "show",
    "suggest",
    "recommend",
    "best",
    "top",
    "rated",
    "tell me about",
    "what about",
];

pub fn detect_category(text: &str) -> Option<Category> {
    let lower = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(category, _)| *category)
}

pub fn is_catalog_query(text: &str) -> bool {
    let lower = text.to_lowercase();
    CATALOG_TRIGGERS.iter().any(|trigger| lower.contains(trigger))
}
