//! Category command implementations

use anyhow::{anyhow, Result};
use divvy_core::{Category, EntityStore, NewCategory, UmbrellaCategory};

use super::{truncate, AppContext};

fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn find_category<'a>(ctx: &'a AppContext, name: &str) -> Result<&'a Category> {
    ctx.snapshot
        .category_by_name(name)
        .ok_or_else(|| anyhow!("Category not found: {}", name))
}

pub async fn cmd_categories_list(ctx: &AppContext, umbrella: Option<&str>) -> Result<()> {
    let filter: Option<UmbrellaCategory> = umbrella
        .map(|u| u.parse().map_err(|e: String| anyhow!(e)))
        .transpose()?;
    let categories: Vec<&Category> = ctx
        .snapshot
        .categories
        .iter()
        .filter(|c| filter.map_or(true, |u| c.umbrella_category == u))
        .collect();

    if categories.is_empty() {
        if ctx.snapshot.categories.is_empty() {
            println!("No categories yet. Add one:");
            println!(
                "  divvy categories add Food --umbrella daily_living --keywords dinner,lunch"
            );
        } else {
            println!("No categories in that umbrella group.");
        }
        return Ok(());
    }

    println!();
    println!("🗂️  Categories");
    println!("   ─────────────────────────────────────────────────────────────");
    for category in categories {
        let icon = category.icon.as_deref().unwrap_or("📁");
        let budget = category
            .monthly_budget
            .filter(|b| *b > 0.0)
            .map(|b| format!("${:.0}/mo", b))
            .unwrap_or_else(|| "no budget".to_string());
        let keywords = if category.keywords.is_empty() {
            "-".to_string()
        } else {
            category.keywords.join(", ")
        };
        println!(
            "   {} {:18} │ {:14} │ {:>10} │ {}",
            icon,
            truncate(&category.name, 18),
            category.umbrella_category.label(),
            budget,
            truncate(&keywords, 30)
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_categories_add(
    ctx: &AppContext,
    name: &str,
    umbrella: &str,
    keywords: Option<&str>,
    budget: Option<f64>,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    if ctx.snapshot.category_by_name(name).is_some() {
        anyhow::bail!("Category already exists: {}", name);
    }
    let umbrella: UmbrellaCategory = umbrella.parse().map_err(|e: String| anyhow!(e))?;

    let new = NewCategory {
        name: name.to_string(),
        icon: icon.map(String::from),
        color: color.map(String::from),
        umbrella_category: umbrella,
        keywords: parse_keywords(keywords),
        monthly_budget: budget.filter(|b| *b > 0.0),
        household_id: ctx.snapshot.scope.household_id(),
    };
    let category = ctx
        .store
        .create_category(&new, &ctx.snapshot.user.email)
        .await?;
    println!(
        "✅ Added category {} ({})",
        category.name,
        category.umbrella_category.label()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_categories_edit(
    ctx: &AppContext,
    name: &str,
    rename: Option<&str>,
    umbrella: Option<&str>,
    keywords: Option<&str>,
    budget: Option<f64>,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let existing = find_category(ctx, name)?;
    let umbrella_category = match umbrella {
        Some(u) => u.parse().map_err(|e: String| anyhow!(e))?,
        None => existing.umbrella_category,
    };

    let new = NewCategory {
        name: rename.unwrap_or(name).to_string(),
        icon: icon.map(String::from).or_else(|| existing.icon.clone()),
        color: color.map(String::from).or_else(|| existing.color.clone()),
        umbrella_category,
        keywords: match keywords {
            Some(k) => parse_keywords(Some(k)),
            None => existing.keywords.clone(),
        },
        // An explicit 0 clears the budget
        monthly_budget: match budget {
            Some(b) if b > 0.0 => Some(b),
            Some(_) => None,
            None => existing.monthly_budget,
        },
        household_id: existing.household_id.clone(),
    };
    let updated = ctx.store.update_category(&existing.id, &new).await?;
    println!("✏️  Updated category {}", updated.name);
    Ok(())
}

pub async fn cmd_categories_delete(ctx: &AppContext, name: &str) -> Result<()> {
    let category = find_category(ctx, name)?;
    ctx.store.delete_category(&category.id).await?;
    println!("🗑️  Deleted category {}", name);
    println!("   Existing expenses keep the name for display.");
    Ok(())
}
