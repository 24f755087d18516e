//! JSON parsing helpers for extractor responses
//!
//! Model responses often wrap the JSON payload in extra prose; these
//! helpers locate the payload and enforce the extraction contract.

use serde::Deserialize;

use crate::error::{Error, Result};

use super::ExtractedExpense;

/// Raw wire shape: either an extraction or an error refusal
#[derive(Debug, Deserialize)]
struct WireResponse {
    error: Option<String>,
    amount: Option<f64>,
    category_name: Option<String>,
    note: Option<String>,
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() > max {
        format!("{}...", &s[..max])
    } else {
        s.to_string()
    }
}

/// Parse an extraction from a raw model response
///
/// Finds the outermost `{...}` span, then applies the contract: an
/// `error` field is a refusal (`Error::Resolution`), otherwise `amount`
/// and `category_name` are required and the amount must be positive.
pub fn parse_extraction(response: &str) -> Result<ExtractedExpense> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    let json_str = match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        _ => {
            return Err(Error::InvalidData(format!(
                "No JSON found in extractor response | Raw: {}",
                truncate(response, 200)
            )))
        }
    };

    let wire: WireResponse = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from extractor: {} | Raw: {}",
            e,
            truncate(json_str, 200)
        ))
    })?;

    if let Some(reason) = wire.error {
        return Err(Error::Resolution(reason));
    }

    let amount = wire
        .amount
        .ok_or_else(|| Error::InvalidData("extractor response missing amount".into()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(format!(
            "extractor returned invalid amount: {}",
            amount
        )));
    }
    let category_name = wire
        .category_name
        .ok_or_else(|| Error::InvalidData("extractor response missing category_name".into()))?;

    Ok(ExtractedExpense {
        amount,
        category_name,
        note: wire.note.filter(|n| !n.trim().is_empty()),
    })
}
