//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `log` - Chat logging commands (log, undo, edit)
//! - `expenses` - Expense listing and deletion
//! - `categories` - Category management commands
//! - `recurring` - Recurring template commands and due posting
//! - `household` - Household and membership commands
//! - `reports` - Dashboard, monthly report, and trend commands
//! - `status` - Configuration and backend health

pub mod categories;
pub mod expenses;
pub mod household;
pub mod log;
pub mod recurring;
pub mod reports;
pub mod status;

// Re-export command functions for main.rs
pub use categories::*;
pub use expenses::*;
pub use household::*;
pub use log::*;
pub use recurring::*;
pub use reports::*;
pub use status::*;

use anyhow::Result;
use divvy_core::{Config, ExtractorClient, ScopeSnapshot, StoreClient};
use tracing::debug;

/// Everything a command needs: store, extractor, and a coherent snapshot
pub struct AppContext {
    pub store: StoreClient,
    pub extractor: ExtractorClient,
    pub snapshot: ScopeSnapshot,
}

/// Load config, connect the store, and take a scope snapshot
pub async fn open_context(store_override: Option<&str>) -> Result<AppContext> {
    let config = load_config(store_override)?;
    let url = config.require_store_url()?;
    debug!(store = %url, "connecting to entity store");
    let store = StoreClient::http(url, config.email.as_deref());
    let extractor = ExtractorClient::from_config(&config.extractor);
    let snapshot = ScopeSnapshot::load(&store).await?;
    debug!(
        scope = ?snapshot.scope,
        categories = snapshot.categories.len(),
        "scope snapshot loaded"
    );
    Ok(AppContext {
        store,
        extractor,
        snapshot,
    })
}

/// Resolved configuration with the CLI override applied
pub fn load_config(store_override: Option<&str>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = store_override {
        config.store_url = Some(url.to_string());
    }
    Ok(config)
}

/// Truncate a string to a maximum byte length, adding "..." if truncated
///
/// The cut backs up to a char boundary so multibyte text never splits
/// mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max.saturating_sub(3);
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}
