//! Report command implementations

use anyhow::{anyhow, Result};
use chrono::{Datelike, Utc};
use divvy_core::{aggregate, budget, BudgetTier, EntityStore};

use super::{truncate, AppContext};

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid --month format (use YYYY-MM)"))?;
    let year: i32 = year.parse()?;
    let month: u32 = month.parse()?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("month must be between 1 and 12, got {}", month);
    }
    Ok((year, month))
}

fn change_arrow(pct: f64) -> &'static str {
    if pct > 0.0 {
        "↑"
    } else if pct < 0.0 {
        "↓"
    } else {
        "→"
    }
}

pub async fn cmd_dashboard(ctx: &AppContext) -> Result<()> {
    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, None)
        .await?;
    let stats = aggregate::dashboard_stats(&expenses, &ctx.snapshot.categories, Utc::now());

    println!();
    println!("📊 This Month");
    println!("   ──────────────────────────────");
    println!(
        "   Spent:    ${:.2}  ({} {:.1}% vs last month)",
        stats.month_total,
        change_arrow(stats.percent_change),
        stats.percent_change.abs()
    );
    if let Some(pct) = stats.budget_used_pct {
        println!(
            "   Budget:   ${:.2} of ${:.2} ({:.0}%)",
            stats.month_total, stats.total_budget, pct
        );
    }

    if !stats.by_category.is_empty() {
        println!();
        println!("   By category:");
        for spend in &stats.by_category {
            let status = budget::status_for(spend);
            let tier = match status.tier {
                BudgetTier::Over => " 🔴",
                BudgetTier::Warning => " 🟡",
                _ => "",
            };
            println!(
                "   {:20} {:>10}{}",
                truncate(&spend.name, 20),
                format!("${:.2}", spend.spending),
                tier
            );
        }
    }

    if !stats.over_budget.is_empty() {
        println!();
        println!("   ⚠️  Over budget:");
        for spend in &stats.over_budget {
            println!(
                "   {:20} ${:.2} over",
                truncate(&spend.name, 20),
                spend.spending - spend.budget
            );
        }
    }
    Ok(())
}

pub async fn cmd_report(ctx: &AppContext, month: Option<&str>) -> Result<()> {
    let now = Utc::now();
    let (year, month) = match month {
        Some(raw) => parse_month(raw)?,
        None => (now.year(), now.month()),
    };

    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, None)
        .await?;
    let summary = aggregate::month_summary(&expenses, year, month);

    println!();
    println!("📅 {}", summary.month);
    println!("   ──────────────────────────────");
    println!("   Total:         ${:.2}", summary.total);
    println!("   Expenses:      {}", summary.expense_count);
    println!(
        "   vs last month: {} {:.1}%",
        change_arrow(summary.percent_change),
        summary.percent_change.abs()
    );
    println!("   Daily average: ${:.2}", summary.daily_average);

    let month_expenses = aggregate::month_expenses(&expenses, year, month);
    let spends = aggregate::by_category(&month_expenses, &ctx.snapshot.categories);
    if !spends.is_empty() {
        println!();
        println!("   By category:");
        for spend in &spends {
            let status = budget::status_for(spend);
            let detail = match (status.tier, status.delta) {
                (BudgetTier::Over, Some(over)) => format!(" │ ${:.2} over budget", over),
                (BudgetTier::Warning, Some(left)) => format!(" │ ${:.2} left ⚠️", left),
                (BudgetTier::Normal, Some(left)) => format!(" │ ${:.2} left", left),
                _ => String::new(),
            };
            let share = if summary.total > 0.0 {
                spend.spending / summary.total * 100.0
            } else {
                0.0
            };
            println!(
                "   {:20} {:>10} {:>5.1}%{}",
                truncate(&spend.name, 20),
                format!("${:.2}", spend.spending),
                share,
                detail
            );
        }
    }
    Ok(())
}

pub async fn cmd_trend(ctx: &AppContext, months: u32) -> Result<()> {
    if months == 0 {
        anyhow::bail!("--months must be at least 1");
    }
    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, None)
        .await?;
    let points = aggregate::trend(&expenses, months, Utc::now());

    let max = points.iter().map(|p| p.total).fold(0.0_f64, f64::max);
    println!();
    println!("📈 Spending Trend");
    println!("   ──────────────────────────────");
    for point in &points {
        let width = if max > 0.0 {
            ((point.total / max) * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "   {:9} {:>10} {}",
            point.month,
            format!("${:.2}", point.total),
            "█".repeat(width)
        );
    }
    Ok(())
}
