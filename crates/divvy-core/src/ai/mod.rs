//! Pluggable expense extraction backends
//!
//! Turning "dinr 30" into a structured expense is delegated to a backend
//! behind a narrow interface, so the rest of the pipeline never knows
//! whether a local LLM or a keyword matcher did the work.
//!
//! # Architecture
//!
//! - `ExtractorBackend` trait: defines the extraction interface
//! - `ExtractorClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaExtractor`, `RuleExtractor`, `MockExtractor`
//!
//! # Configuration
//!
//! Environment variables (and the `[extractor]` config section):
//! - `AI_BACKEND`: Backend to use (ollama, rules, mock). Default: rules
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)
//!
//! Every backend returns the same contract: an amount, the EXACT name of
//! one of the caller's categories, and an optional note. The caller
//! re-validates the category name and fails closed on anything else.

mod mock;
mod ollama;
pub mod parsing;
pub mod prompt;
mod rules;

pub use mock::{MockExtractor, MockReply};
pub use ollama::OllamaExtractor;
pub use rules::RuleExtractor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::models::Category;

/// Structured result of parsing a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedExpense {
    pub amount: f64,
    /// Must exactly equal the `name` of one of the offered categories
    pub category_name: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Trait defining the interface for all extraction backends
#[async_trait]
pub trait ExtractorBackend: Send + Sync {
    /// Parse a normalized chat message into an expense
    ///
    /// `categories` is the full category list in the caller's scope; the
    /// backend must pick `category_name` from it verbatim. A message that
    /// is not an expense yields `Error::Resolution`.
    async fn extract(&self, message: &str, categories: &[Category]) -> Result<ExtractedExpense>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Backend label for logging and `divvy status`
    fn name(&self) -> &str;
}

/// Concrete extractor client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ExtractorClient {
    /// Ollama backend (HTTP API, local LLM)
    Ollama(OllamaExtractor),
    /// Deterministic keyword rule engine, no external dependency
    Rules(RuleExtractor),
    /// Mock backend for testing
    Mock(MockExtractor),
}

impl ExtractorClient {
    /// Create an extractor from resolved configuration
    ///
    /// - `ollama`: uses the configured host/model (host required)
    /// - `rules` (default): the built-in keyword engine
    /// - `mock`: scripted backend for testing
    ///
    /// An unknown backend name falls back to rules so a typo in config
    /// degrades to deterministic behavior instead of failing every log.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let backend = config.backend.as_deref().unwrap_or("rules");
        match backend.to_lowercase().as_str() {
            "ollama" => match config.ollama_host.as_deref() {
                Some(host) => {
                    let model = config.ollama_model.as_deref().unwrap_or("llama3.2");
                    ExtractorClient::Ollama(OllamaExtractor::new(host, model))
                }
                None => {
                    tracing::warn!("ollama backend selected but no host configured, using rules");
                    ExtractorClient::Rules(RuleExtractor::new())
                }
            },
            "rules" => ExtractorClient::Rules(RuleExtractor::new()),
            "mock" => ExtractorClient::Mock(MockExtractor::new()),
            other => {
                tracing::warn!(backend = %other, "Unknown AI_BACKEND, falling back to rules");
                ExtractorClient::Rules(RuleExtractor::new())
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        ExtractorClient::Ollama(OllamaExtractor::new(host, model))
    }

    /// Create the rule engine directly
    pub fn rules() -> Self {
        ExtractorClient::Rules(RuleExtractor::new())
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        ExtractorClient::Mock(MockExtractor::new())
    }
}

#[async_trait]
impl ExtractorBackend for ExtractorClient {
    async fn extract(&self, message: &str, categories: &[Category]) -> Result<ExtractedExpense> {
        match self {
            ExtractorClient::Ollama(b) => b.extract(message, categories).await,
            ExtractorClient::Rules(b) => b.extract(message, categories).await,
            ExtractorClient::Mock(b) => b.extract(message, categories).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ExtractorClient::Ollama(b) => b.health_check().await,
            ExtractorClient::Rules(b) => b.health_check().await,
            ExtractorClient::Mock(b) => b.health_check().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            ExtractorClient::Ollama(b) => b.name(),
            ExtractorClient::Rules(b) => b.name(),
            ExtractorClient::Mock(b) => b.name(),
        }
    }
}
