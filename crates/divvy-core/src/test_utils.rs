//! Test utilities for divvy-core
//!
//! Provides a mock Ollama server implementing just enough of the generate
//! API for extraction integration tests: it reads the category list and
//! user message out of the prompt and answers with the contract JSON.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock Ollama server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[allow(dead_code)]
    #[serde(default)]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// Ollama generate endpoint
///
/// Parses the extraction prompt the way a cooperative model would: reads
/// the quoted user message, matches it against the offered categories by
/// keyword, and answers with contract JSON.
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let message = extract_quoted(&request.prompt, "User message: \"").unwrap_or_default();
    let categories = parse_category_lines(&request.prompt);

    let amount = message
        .split_whitespace()
        .find_map(|t| t.trim_start_matches('$').parse::<f64>().ok());

    let matched = categories.iter().find(|(name, keywords)| {
        let lower = message.to_lowercase();
        keywords.iter().any(|k| lower.contains(k.as_str())) || lower.contains(&name.to_lowercase())
    });

    let response = match (amount, matched) {
        (Some(amount), Some((name, _))) => format!(
            r#"{{"amount": {}, "category_name": "{}", "note": "{}"}}"#,
            amount, name, message
        ),
        _ => r#"{"error": "could not parse an expense from the message"}"#.to_string(),
    };

    Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    })
}

/// Pull the quoted value following a marker out of the prompt
fn extract_quoted(prompt: &str, marker: &str) -> Option<String> {
    let start = prompt.find(marker)? + marker.len();
    let rest = &prompt[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Parse `Category: "Name" (umbrella: ..., keywords: a, b)` prompt lines
fn parse_category_lines(prompt: &str) -> Vec<(String, Vec<String>)> {
    prompt
        .lines()
        .filter_map(|line| {
            let line = line.strip_prefix("Category: \"")?;
            let name_end = line.find('"')?;
            let name = line[..name_end].to_string();
            let keywords = line
                .find("keywords: ")
                .map(|i| {
                    line[i + "keywords: ".len()..]
                        .trim_end_matches(')')
                        .split(", ")
                        .filter(|k| !k.is_empty() && *k != "none")
                        .map(|k| k.to_lowercase())
                        .collect()
                })
                .unwrap_or_default();
            Some((name, keywords))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_lines() {
        let prompt = "Available categories:\n\
                      Category: \"Food\" (umbrella: daily_living, keywords: dinner, lunch)\n\
                      Category: \"Rent\" (umbrella: housing, keywords: none)\n";
        let cats = parse_category_lines(prompt);
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].0, "Food");
        assert_eq!(cats[0].1, vec!["dinner", "lunch"]);
        assert!(cats[1].1.is_empty());
    }

    #[test]
    fn test_extract_quoted_message() {
        let prompt = "stuff\n\nUser message: \"dinner 45\"\n\nRespond";
        assert_eq!(
            extract_quoted(prompt, "User message: \"").as_deref(),
            Some("dinner 45")
        );
    }
}
