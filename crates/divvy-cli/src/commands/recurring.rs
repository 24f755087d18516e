//! Recurring template command implementations

use anyhow::{anyhow, Result};
use chrono::Utc;
use divvy_core::{recurring, EntityStore, NewRecurringExpense, RecurringExpense};

use super::{truncate, AppContext};

async fn find_template(ctx: &AppContext, name: &str) -> Result<RecurringExpense> {
    let templates = ctx.store.filter_recurring(&ctx.snapshot.scope).await?;
    templates
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| anyhow!("Recurring template not found: {}", name))
}

fn as_new(template: &RecurringExpense) -> NewRecurringExpense {
    NewRecurringExpense {
        name: template.name.clone(),
        amount: template.amount,
        category_id: template.category_id.clone(),
        category_name: template.category_name.clone(),
        day_of_month: template.day_of_month,
        is_active: template.is_active,
        household_id: template.household_id.clone(),
    }
}

pub async fn cmd_recurring_list(ctx: &AppContext) -> Result<()> {
    let templates = ctx.store.filter_recurring(&ctx.snapshot.scope).await?;

    if templates.is_empty() {
        println!("No recurring templates yet. Add one:");
        println!("  divvy recurring add Rent --amount 900 --category Housing --day 1");
        return Ok(());
    }

    println!();
    println!("🔁 Recurring Expenses");
    println!("   ─────────────────────────────────────────────────────────────");
    for template in &templates {
        let status = if template.is_active { "✅" } else { "⏸️" };
        println!(
            "   {} {:20} │ {:>9} │ day {:2} │ {}",
            status,
            truncate(&template.name, 20),
            format!("${:.2}", template.amount),
            template.day_of_month,
            truncate(&template.category_name, 16)
        );
    }
    println!(
        "   Active monthly total: ${:.2}",
        recurring::active_monthly_total(&templates)
    );
    Ok(())
}

pub async fn cmd_recurring_add(
    ctx: &AppContext,
    name: &str,
    amount: f64,
    category_name: &str,
    day: u32,
) -> Result<()> {
    recurring::validate_day(day)?;
    if !amount.is_finite() || amount <= 0.0 {
        anyhow::bail!("amount must be positive, got {}", amount);
    }
    let category = ctx
        .snapshot
        .category_by_name(category_name)
        .ok_or_else(|| anyhow!("Category not found: {}", category_name))?;

    let new = NewRecurringExpense {
        name: name.to_string(),
        amount,
        category_id: category.id.clone(),
        category_name: category.name.clone(),
        day_of_month: day,
        is_active: true,
        household_id: ctx.snapshot.scope.household_id(),
    };
    ctx.store
        .create_recurring(&new, &ctx.snapshot.user.email)
        .await?;
    println!(
        "✅ Added recurring {} (${:.2} on day {} → {})",
        name, amount, day, category.name
    );
    Ok(())
}

pub async fn cmd_recurring_set_active(ctx: &AppContext, name: &str, active: bool) -> Result<()> {
    let template = find_template(ctx, name).await?;
    let mut new = as_new(&template);
    new.is_active = active;
    ctx.store.update_recurring(&template.id, &new).await?;
    if active {
        println!("▶️  Resumed {}", name);
    } else {
        println!("⏸️  Paused {} (kept, but never posted)", name);
    }
    Ok(())
}

pub async fn cmd_recurring_delete(ctx: &AppContext, name: &str) -> Result<()> {
    let template = find_template(ctx, name).await?;
    ctx.store.delete_recurring(&template.id).await?;
    println!("🗑️  Deleted recurring {}", name);
    Ok(())
}

pub async fn cmd_recurring_post_due(ctx: &AppContext) -> Result<()> {
    let posted = recurring::post_due(
        &ctx.store,
        &ctx.snapshot.scope,
        &ctx.snapshot.user.email,
        Utc::now(),
    )
    .await?;

    if posted.is_empty() {
        println!("Nothing due. All recurring charges for this month are posted.");
        return Ok(());
    }
    for expense in &posted {
        println!(
            "🔁 Posted ${:.2} to {} ({})",
            expense.amount,
            expense.category_name,
            expense.note.as_deref().unwrap_or("-")
        );
    }
    println!("   {} expense(s) posted.", posted.len());
    Ok(())
}
