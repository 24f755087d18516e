//! Expense command implementations

use anyhow::Result;
use divvy_core::{aggregate, EntityStore, Expense};

use super::{truncate, AppContext};

fn print_rows(expenses: &[&Expense]) {
    for expense in expenses {
        let note = expense.note.as_deref().unwrap_or("");
        println!(
            "   {} │ {:>9} │ {:16} │ {:24} │ {}",
            expense.date.format("%Y-%m-%d"),
            format!("${:.2}", expense.amount),
            truncate(&expense.category_name, 16),
            truncate(note, 24),
            expense.id
        );
    }
}

pub async fn cmd_expenses_list(ctx: &AppContext, limit: usize) -> Result<()> {
    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, Some(limit))
        .await?;

    if expenses.is_empty() {
        println!("No expenses yet. Log one:");
        println!("  divvy log \"dinner 45\"");
        return Ok(());
    }

    println!();
    println!("🧾 Recent Expenses");
    println!("   ─────────────────────────────────────────────────────────────");
    let rows: Vec<&Expense> = expenses.iter().collect();
    print_rows(&rows);
    Ok(())
}

pub async fn cmd_expenses_search(ctx: &AppContext, query: &str) -> Result<()> {
    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, None)
        .await?;
    let matches = aggregate::search(&expenses, query);

    if matches.is_empty() {
        println!("No expenses match \"{}\"", query);
        return Ok(());
    }

    println!();
    println!("🔍 {} match(es) for \"{}\"", matches.len(), query);
    println!("   ─────────────────────────────────────────────────────────────");
    print_rows(&matches);
    Ok(())
}

pub async fn cmd_expenses_delete(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.store.delete_expense(id).await?;
    println!("🗑️  Deleted expense {}", id);
    Ok(())
}
