//! Status command implementation

use anyhow::Result;
use divvy_core::{Config, EntityStore, ExtractorBackend, ExtractorClient, Scope, StoreClient};

pub async fn cmd_status(config: &Config) -> Result<()> {
    println!();
    println!("⚙️  Divvy Status");
    println!("   ──────────────────────────────");

    match config.store_url.as_deref() {
        Some(url) => {
            println!("   Store:     {}", url);
            let store = StoreClient::http(url, config.email.as_deref());
            match store.me().await {
                Ok(user) => {
                    println!("   Signed in: {}", user.email);
                    match divvy_core::household::resolve_scope(&store, &user.email).await {
                        Ok(Scope::Household(id)) => println!("   Scope:     household {}", id),
                        Ok(Scope::Personal(_)) => println!("   Scope:     personal"),
                        Err(e) => println!("   Scope:     ⚠️  {}", e),
                    }
                }
                Err(e) => println!("   Signed in: ❌ store unreachable ({})", e),
            }
        }
        None => {
            println!("   Store:     ❌ not configured");
            println!("              Set store_url in the config file or DIVVY_STORE_URL.");
        }
    }

    let extractor = ExtractorClient::from_config(&config.extractor);
    println!("   Extractor: {}", extractor.name());
    if extractor.health_check().await {
        println!("   Health:    ✅ available");
    } else {
        println!("   Health:    ❌ unavailable");
    }

    if let Some(path) = Config::default_path() {
        let marker = if path.exists() { "" } else { " (not present)" };
        println!("   Config:    {}{}", path.display(), marker);
    }
    Ok(())
}
