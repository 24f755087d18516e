//! Deterministic keyword rule engine
//!
//! Default extraction backend: no model, no network, fully predictable.
//! An amount is the first numeric token in the message; the category is
//! chosen by keyword match against the message. The longest matching
//! keyword wins; on equal length the category listed first wins, so the
//! outcome never depends on anything but the input and the category list.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::Category;

use super::{ExtractedExpense, ExtractorBackend};

/// Keyword-based extractor
#[derive(Debug, Clone, Default)]
pub struct RuleExtractor;

impl RuleExtractor {
    pub fn new() -> Self {
        Self
    }
}

fn parse_amount_token(token: &str) -> Option<f64> {
    let cleaned = token
        .trim_start_matches('$')
        .trim_end_matches(|c: char| !c.is_ascii_digit());
    let amount: f64 = cleaned.parse().ok()?;
    if amount.is_finite() && amount > 0.0 {
        Some(amount)
    } else {
        None
    }
}

fn word_set(message: &str) -> Vec<&str> {
    message
        .split(|c: char| !c.is_alphanumeric() && c != '.')
        .filter(|w| !w.is_empty())
        .collect()
}

fn keyword_matches(keyword: &str, message: &str, words: &[&str]) -> bool {
    if keyword.contains(' ') {
        message.contains(keyword)
    } else {
        words.iter().any(|w| *w == keyword)
    }
}

#[async_trait]
impl ExtractorBackend for RuleExtractor {
    async fn extract(&self, message: &str, categories: &[Category]) -> Result<ExtractedExpense> {
        let message = message.to_lowercase();
        let tokens: Vec<&str> = message.split_whitespace().collect();

        let (amount_idx, amount) = tokens
            .iter()
            .enumerate()
            .find_map(|(i, t)| parse_amount_token(t).map(|a| (i, a)))
            .ok_or_else(|| Error::Resolution("no amount found in message".to_string()))?;

        let words = word_set(&message);
        let mut best: Option<(usize, &Category)> = None; // (keyword length, category)
        for category in categories {
            let name_lower = category.name.to_lowercase();
            let candidates = category
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .chain(std::iter::once(name_lower));
            for keyword in candidates {
                if keyword.is_empty() || !keyword_matches(&keyword, &message, &words) {
                    continue;
                }
                // Strictly-greater keeps the first-listed category on ties
                let beats = match best {
                    Some((len, _)) => keyword.len() > len,
                    None => true,
                };
                if beats {
                    best = Some((keyword.len(), category));
                }
            }
        }

        let (_, category) = best.ok_or_else(|| {
            Error::Resolution("could not match the message to a category".to_string())
        })?;

        let note: String = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != amount_idx)
            .map(|(_, t)| *t)
            .collect::<Vec<_>>()
            .join(" ");

        Ok(ExtractedExpense {
            amount,
            category_name: category.name.clone(),
            note: if note.is_empty() { None } else { Some(note) },
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "rules"
    }
}
