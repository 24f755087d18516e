//! Configuration loading
//!
//! Settings come from `~/.config/divvy/config.toml` with environment
//! variables taking precedence:
//!
//! - `DIVVY_STORE_URL`: base URL of the hosted entity store
//! - `DIVVY_EMAIL`: session identity when the store host does not provide one
//! - `AI_BACKEND`: extractor backend (ollama, rules, mock)
//! - `OLLAMA_HOST` / `OLLAMA_MODEL`: Ollama connection settings
//!
//! ```toml
//! store_url = "https://store.example.com/api"
//! email = "amit@example.com"
//!
//! [extractor]
//! backend = "ollama"
//! ollama_host = "http://localhost:11434"
//! ollama_model = "llama3.2"
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Extractor section of the config file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExtractorConfig {
    pub backend: Option<String>,
    pub ollama_host: Option<String>,
    pub ollama_model: Option<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    pub store_url: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Default config file path (`~/.config/divvy/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("divvy").join("config.toml"))
    }

    /// Load the config file if present, then apply environment overrides
    ///
    /// A missing file is not an error; a file that fails to parse is.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                toml::from_str(&contents)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
            }
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DIVVY_STORE_URL") {
            self.store_url = Some(url);
        }
        if let Ok(email) = std::env::var("DIVVY_EMAIL") {
            self.email = Some(email);
        }
        if let Ok(backend) = std::env::var("AI_BACKEND") {
            self.extractor.backend = Some(backend);
        }
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            self.extractor.ollama_host = Some(host);
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            self.extractor.ollama_model = Some(model);
        }
    }

    /// Store URL, required for every command that touches data
    pub fn require_store_url(&self) -> Result<&str> {
        self.store_url.as_deref().ok_or_else(|| {
            Error::Config("store_url not set (config file or DIVVY_STORE_URL)".into())
        })
    }
}
