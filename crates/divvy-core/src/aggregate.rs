//! Spending aggregation and report math
//!
//! Pure functions over already-fetched expenses. The hosted store only
//! filters on equality, so month windows, per-category rollups, and trend
//! series are all computed here.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::models::{Category, CategorySpend, DashboardStats, Expense, MonthSummary, TrendPoint};

/// Half-open window of a calendar month: its start and the next month's
/// start. Every instant belongs to exactly one month, down to the
/// nanosecond.
pub fn month_range(year: i32, month: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_start = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .unwrap_or(start);
    (start, next_start)
}

/// Year and month immediately before the given one
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Number of days in a calendar month (28-31)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    chrono::NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

/// Sum of amounts with dates in `[start, end]`, both ends inclusive
pub fn sum_in_range(expenses: &[Expense], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    expenses
        .iter()
        .filter(|e| e.date >= start && e.date <= end)
        .map(|e| e.amount)
        .sum()
}

/// Expenses dated within one calendar month
pub fn month_expenses<'a>(expenses: &'a [Expense], year: i32, month: u32) -> Vec<&'a Expense> {
    let (start, next_start) = month_range(year, month);
    expenses
        .iter()
        .filter(|e| e.date >= start && e.date < next_start)
        .collect()
}

/// Total spend within one calendar month
pub fn month_total(expenses: &[Expense], year: i32, month: u32) -> f64 {
    month_expenses(expenses, year, month)
        .iter()
        .map(|e| e.amount)
        .sum()
}

/// Case-insensitive substring search over category name and note
pub fn search<'a>(expenses: &'a [Expense], query: &str) -> Vec<&'a Expense> {
    let query = query.to_lowercase();
    expenses
        .iter()
        .filter(|e| {
            e.category_name.to_lowercase().contains(&query)
                || e.note
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(&query))
                    .unwrap_or(false)
        })
        .collect()
}

/// Month-over-month change as a percentage
///
/// A previous month with no spend reads as 0 rather than infinite growth.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Per-category spend for a set of expenses
///
/// Categories with no spend are dropped; the rest sort by spend descending.
pub fn by_category(expenses: &[&Expense], categories: &[Category]) -> Vec<CategorySpend> {
    let mut spends: Vec<CategorySpend> = categories
        .iter()
        .map(|category| {
            let spending = expenses
                .iter()
                .filter(|e| e.category_id == category.id)
                .map(|e| e.amount)
                .sum();
            CategorySpend {
                category_id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                spending,
                budget: category.monthly_budget.unwrap_or(0.0),
            }
        })
        .filter(|c| c.spending > 0.0)
        .collect();
    spends.sort_by(|a, b| {
        b.spending
            .partial_cmp(&a.spending)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    spends
}

/// Categories whose spend exceeds a nonzero budget
pub fn over_budget(spends: &[CategorySpend]) -> Vec<CategorySpend> {
    spends
        .iter()
        .filter(|c| c.budget > 0.0 && c.spending > c.budget)
        .cloned()
        .collect()
}

/// Sum of all category budgets
pub fn total_budget(categories: &[Category]) -> f64 {
    categories.iter().filter_map(|c| c.monthly_budget).sum()
}

/// Headline dashboard figures for the month containing `now`
pub fn dashboard_stats(
    expenses: &[Expense],
    categories: &[Category],
    now: DateTime<Utc>,
) -> DashboardStats {
    let (prev_year, prev_month) = previous_month(now.year(), now.month());
    let previous_month_total = month_total(expenses, prev_year, prev_month);

    let current = month_expenses(expenses, now.year(), now.month());
    let month_total: f64 = current.iter().map(|e| e.amount).sum();

    let by_category = by_category(&current, categories);
    let over = over_budget(&by_category);
    let total_budget = total_budget(categories);
    let budget_used_pct = if total_budget > 0.0 {
        Some((month_total / total_budget * 100.0).min(100.0))
    } else {
        None
    };

    DashboardStats {
        month_total,
        previous_month_total,
        percent_change: percent_change(month_total, previous_month_total),
        total_budget,
        budget_used_pct,
        by_category,
        over_budget: over,
    }
}

/// Summary figures for one calendar month
pub fn month_summary(expenses: &[Expense], year: i32, month: u32) -> MonthSummary {
    let (start, _) = month_range(year, month);
    let in_month = month_expenses(expenses, year, month);
    let total: f64 = in_month.iter().map(|e| e.amount).sum();

    let (prev_year, prev_month) = previous_month(year, month);
    let previous_total = month_total(expenses, prev_year, prev_month);

    MonthSummary {
        month: start.format("%B %Y").to_string(),
        total,
        expense_count: in_month.len(),
        percent_change: percent_change(total, previous_total),
        daily_average: total / days_in_month(year, month) as f64,
    }
}

/// Monthly totals for the trailing `months` months ending at `now`,
/// oldest first
pub fn trend(expenses: &[Expense], months: u32, now: DateTime<Utc>) -> Vec<TrendPoint> {
    let mut points = Vec::with_capacity(months as usize);
    let (mut year, mut month) = (now.year(), now.month());
    for _ in 0..months {
        let (start, _) = month_range(year, month);
        points.push(TrendPoint {
            month: start.format("%b %Y").to_string(),
            total: month_total(expenses, year, month),
        });
        let (py, pm) = previous_month(year, month);
        year = py;
        month = pm;
    }
    points.reverse();
    points
}
