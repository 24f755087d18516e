//! Recurring expense templates and due posting
//!
//! Templates describe a fixed monthly charge; posting turns due templates
//! into real ledger entries. Posting is idempotent within a month: each
//! posted expense carries the template's ID, and a template that already
//! has a tagged expense this month is skipped. Running the posting pass
//! twice, or from two machines, never double-books a charge.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use tracing::info;

use crate::aggregate::month_range;
use crate::error::{Error, Result};
use crate::household::Scope;
use crate::models::{Expense, NewExpense, RecurringExpense};
use crate::store::{EntityStore, StoreClient};

/// Highest allowed `day_of_month`; capped so every template is valid in
/// February too
pub const MAX_DAY_OF_MONTH: u32 = 28;

/// Validate a template's day of month (1 through 28)
pub fn validate_day(day: u32) -> Result<()> {
    if (1..=MAX_DAY_OF_MONTH).contains(&day) {
        Ok(())
    } else {
        Err(Error::InvalidData(format!(
            "day_of_month must be between 1 and {}, got {}",
            MAX_DAY_OF_MONTH, day
        )))
    }
}

/// Sum of active template amounts (the fixed monthly commitment)
pub fn active_monthly_total(templates: &[RecurringExpense]) -> f64 {
    templates
        .iter()
        .filter(|t| t.is_active)
        .map(|t| t.amount)
        .sum()
}

/// Post ledger entries for every active template due by `now`
///
/// A template is due when its `day_of_month` has passed in the current
/// month. Already-posted templates (an expense this month tagged with the
/// template ID) are skipped. Returns the expenses created by this pass.
pub async fn post_due(
    store: &StoreClient,
    scope: &Scope,
    created_by: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Expense>> {
    let templates = store.filter_recurring(scope).await?;
    let (month_start, next_month_start) = month_range(now.year(), now.month());
    let expenses = store.filter_expenses(scope, None).await?;

    let mut posted = Vec::new();
    for template in templates.iter().filter(|t| t.is_active) {
        if template.day_of_month > now.day() {
            continue;
        }
        let already_posted = expenses.iter().any(|e| {
            e.recurring_id.as_deref() == Some(template.id.as_str())
                && e.date >= month_start
                && e.date < next_month_start
        });
        if already_posted {
            continue;
        }

        let date = Utc
            .with_ymd_and_hms(now.year(), now.month(), template.day_of_month, 12, 0, 0)
            .single()
            .unwrap_or(now);
        let new = NewExpense {
            amount: template.amount,
            category_id: template.category_id.clone(),
            category_name: template.category_name.clone(),
            note: Some(template.name.clone()),
            date,
            household_id: scope.household_id(),
            recurring_id: Some(template.id.clone()),
        };
        let expense = store.create_expense(&new, created_by).await?;
        info!(template = %template.id, amount = template.amount, "posted recurring expense");
        posted.push(expense);
    }
    Ok(posted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRecurringExpense;

    fn template(name: &str, amount: f64, day: u32, active: bool) -> NewRecurringExpense {
        NewRecurringExpense {
            name: name.to_string(),
            amount,
            category_id: "cat-1".to_string(),
            category_name: "Housing".to_string(),
            day_of_month: day,
            is_active: active,
            household_id: None,
        }
    }

    #[test]
    fn test_validate_day_bounds() {
        assert!(validate_day(1).is_ok());
        assert!(validate_day(28).is_ok());
        assert!(validate_day(0).is_err());
        assert!(validate_day(29).is_err());
    }

    #[test]
    fn test_active_total_skips_paused() {
        let templates = vec![
            RecurringExpense {
                id: "r1".into(),
                name: "Rent".into(),
                amount: 900.0,
                category_id: "cat-1".into(),
                category_name: "Housing".into(),
                day_of_month: 1,
                is_active: true,
                household_id: None,
                created_by: "amit@example.com".into(),
            },
            RecurringExpense {
                id: "r2".into(),
                name: "Gym".into(),
                amount: 40.0,
                category_id: "cat-2".into(),
                category_name: "Health".into(),
                day_of_month: 5,
                is_active: false,
                household_id: None,
                created_by: "amit@example.com".into(),
            },
        ];
        assert_eq!(active_monthly_total(&templates), 900.0);
    }

    #[tokio::test]
    async fn test_post_due_creates_and_skips() {
        let store = StoreClient::mock("amit@example.com");
        let scope = Scope::Personal("amit@example.com".to_string());
        store
            .create_recurring(&template("Rent", 900.0, 1, true), "amit@example.com")
            .await
            .unwrap();
        store
            .create_recurring(&template("Internet", 50.0, 25, true), "amit@example.com")
            .await
            .unwrap();
        store
            .create_recurring(&template("Gym", 40.0, 5, false), "amit@example.com")
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let posted = post_due(&store, &scope, "amit@example.com", now)
            .await
            .unwrap();
        // Rent is due, Internet's day has not arrived, Gym is paused
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].amount, 900.0);
        assert_eq!(posted[0].note.as_deref(), Some("Rent"));
        assert_eq!(posted[0].date.day(), 1);
    }

    #[tokio::test]
    async fn test_post_due_is_idempotent() {
        let store = StoreClient::mock("amit@example.com");
        let scope = Scope::Personal("amit@example.com".to_string());
        store
            .create_recurring(&template("Rent", 900.0, 1, true), "amit@example.com")
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let first = post_due(&store, &scope, "amit@example.com", now)
            .await
            .unwrap();
        assert_eq!(first.len(), 1);

        let second = post_due(&store, &scope, "amit@example.com", now)
            .await
            .unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_post_due_new_month_posts_again() {
        let store = StoreClient::mock("amit@example.com");
        let scope = Scope::Personal("amit@example.com".to_string());
        store
            .create_recurring(&template("Rent", 900.0, 1, true), "amit@example.com")
            .await
            .unwrap();

        let march = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2026, 4, 10, 9, 0, 0).unwrap();
        assert_eq!(
            post_due(&store, &scope, "amit@example.com", march)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            post_due(&store, &scope, "amit@example.com", april)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
