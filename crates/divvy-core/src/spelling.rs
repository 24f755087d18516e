//! Typo normalization for chat input
//!
//! Chat messages get a cheap cleanup pass before hitting the extractor:
//! lowercase the whole message, then fix a fixed table of common expense
//! typos on word boundaries. This keeps small local models from whiffing
//! on "dinr 30".

use std::sync::OnceLock;

use regex::Regex;

/// Common misspellings seen in quick expense entries
const CORRECTIONS: &[(&str, &str)] = &[
    ("dinr", "dinner"),
    ("dinnr", "dinner"),
    ("luch", "lunch"),
    ("brekfast", "breakfast"),
    ("breakfst", "breakfast"),
    ("coffe", "coffee"),
    ("cofee", "coffee"),
    ("resturant", "restaurant"),
    ("restraunt", "restaurant"),
    ("grocry", "grocery"),
    ("groceries", "grocery"),
    ("gass", "gas"),
    ("feul", "fuel"),
    ("entertaiment", "entertainment"),
    ("moive", "movie"),
];

fn compiled() -> &'static [(Regex, &'static str)] {
    static CELL: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    CELL.get_or_init(|| {
        CORRECTIONS
            .iter()
            .filter_map(|(typo, fix)| {
                Regex::new(&format!(r"\b{}\b", typo))
                    .ok()
                    .map(|re| (re, *fix))
            })
            .collect()
    })
}

/// Lowercase a message and fix known typos on word boundaries
///
/// Substrings are left alone: "dinrplate" stays as-is.
pub fn normalize(text: &str) -> String {
    let mut result = text.to_lowercase();
    for (re, fix) in compiled() {
        result = re.replace_all(&result, *fix).into_owned();
    }
    result
}
