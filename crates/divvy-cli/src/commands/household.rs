//! Household command implementations

use anyhow::Result;
use divvy_core::household;

use super::AppContext;

pub async fn cmd_household_show(ctx: &AppContext) -> Result<()> {
    match &ctx.snapshot.household {
        Some(h) => {
            println!();
            println!("🏠 {}", h.name);
            println!("   ──────────────────────────────");
            for email in &h.member_emails {
                let marker = if *email == h.created_by {
                    " (owner)"
                } else {
                    ""
                };
                println!("   👤 {}{}", email, marker);
            }
        }
        None => {
            println!("You are not in a household; expenses are personal.");
            println!("  divvy household create \"The Flat\"");
        }
    }
    Ok(())
}

pub async fn cmd_household_create(ctx: &AppContext, name: &str) -> Result<()> {
    let household =
        household::create_household(&ctx.store, name, &ctx.snapshot.user.email).await?;
    println!("🏠 Created household {}", household.name);
    println!("   You are the owner. Add members:");
    println!("   divvy household add-member sam@example.com");
    Ok(())
}

pub async fn cmd_household_add_member(ctx: &AppContext, email: &str) -> Result<()> {
    let household = ctx
        .snapshot
        .household
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("You are not in a household"))?;
    let updated = household::add_member(&ctx.store, household, email).await?;
    println!(
        "✅ Added {} to {} ({} members)",
        email,
        updated.name,
        updated.member_emails.len()
    );
    Ok(())
}

pub async fn cmd_household_remove_member(ctx: &AppContext, email: &str) -> Result<()> {
    let household = ctx
        .snapshot
        .household
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("You are not in a household"))?;
    let updated = household::remove_member(&ctx.store, household, email).await?;
    println!(
        "✅ Removed {} from {} ({} members)",
        email,
        updated.name,
        updated.member_emails.len()
    );
    Ok(())
}

pub async fn cmd_household_bootstrap_index(ctx: &AppContext) -> Result<()> {
    let created = household::bootstrap_membership_index(&ctx.store).await?;
    if created == 0 {
        println!("Membership index is already complete.");
    } else {
        println!("✅ Created {} membership index record(s)", created);
    }
    Ok(())
}
