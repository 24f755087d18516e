//! Chat logging command implementations

use anyhow::Result;
use divvy_core::ExpenseLogger;
use tracing::debug;

use super::AppContext;

pub async fn cmd_log(ctx: &AppContext, message: &str) -> Result<()> {
    debug!(message = %message, "logging expense from message");
    let logger = ExpenseLogger::new(ctx.store.clone(), ctx.extractor.clone());
    let expense = logger.log(&ctx.snapshot, message).await?;

    let icon = ctx
        .snapshot
        .category_by_id(&expense.category_id)
        .and_then(|c| c.icon.as_deref())
        .unwrap_or("💸");
    println!(
        "{} Logged ${:.2} to {}",
        icon, expense.amount, expense.category_name
    );
    if let Some(note) = &expense.note {
        println!("   Note: {}", note);
    }
    Ok(())
}

pub async fn cmd_undo(ctx: &AppContext) -> Result<()> {
    let logger = ExpenseLogger::new(ctx.store.clone(), ctx.extractor.clone());
    let undone = logger.undo_last(&ctx.snapshot.scope).await?;
    println!(
        "↩️  Removed ${:.2} from {} ({})",
        undone.amount,
        undone.category_name,
        undone.date.format("%Y-%m-%d")
    );
    Ok(())
}

pub async fn cmd_edit(
    ctx: &AppContext,
    amount: Option<f64>,
    category: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    if amount.is_none() && category.is_none() && note.is_none() {
        anyhow::bail!("nothing to change; pass --amount, --category, or --note");
    }
    let logger = ExpenseLogger::new(ctx.store.clone(), ctx.extractor.clone());
    let edited = logger
        .edit_last(&ctx.snapshot, amount, category, note)
        .await?;
    println!(
        "✏️  Updated last expense: ${:.2} in {}",
        edited.amount, edited.category_name
    );
    Ok(())
}
