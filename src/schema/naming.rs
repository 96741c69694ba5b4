//! Conventional table and key names derived from model names.
//!
//! `CustomerContact` lives in `customer_contacts`; a has-many from
//! `Customer` is keyed by `customer_id`.

use inflector::Inflector;

/// Irregular plurals that show up in model names.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
];

/// Pluralize a word, handling irregulars first then falling back to inflector.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *singular || lower == *plural {
            return plural.to_string();
        }
    }

    word.to_plural()
}

/// Default table for a model: snake case with the last word pluralized.
pub fn default_table(model: &str) -> String {
    let snake = model.to_snake_case();
    match snake.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, pluralize(last)),
        None => pluralize(&snake),
    }
}

/// Default foreign key: `<snake name>_<key>`.
pub fn default_foreign_key(name: &str, key: &str) -> String {
    format!("{}_{}", name.to_snake_case(), key)
}
