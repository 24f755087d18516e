//! Prompt construction for LLM-backed extraction
//!
//! The prompt carries the full category list (name, umbrella, keywords) so
//! the model can only answer with a name we already know. The JSON contract
//! mirrors `ExtractedExpense`, plus an `{"error": ...}` escape hatch for
//! messages that are not expenses.

use crate::models::Category;

/// Build the extraction prompt for one chat message
pub fn build_extraction_prompt(message: &str, categories: &[Category]) -> String {
    let mut prompt = String::from(
        "You are an expense tracking assistant. Parse this user message into an expense.\n\n",
    );

    prompt.push_str("Available categories:\n");
    for category in categories {
        let keywords = if category.keywords.is_empty() {
            "none".to_string()
        } else {
            category.keywords.join(", ")
        };
        prompt.push_str(&format!(
            "Category: \"{}\" (umbrella: {}, keywords: {})\n",
            category.name, category.umbrella_category, keywords
        ));
    }

    prompt.push_str(&format!("\nUser message: \"{}\"\n\n", message));
    prompt.push_str(
        "Respond with JSON only: \
         {\"amount\": <number>, \"category_name\": \"<exact category name from the list>\", \
         \"note\": \"<short description>\"}\n\
         If the message is not an expense, respond: {\"error\": \"<reason>\"}",
    );

    prompt
}
