//! Chat-style expense logging
//!
//! The pipeline behind "dinr 30": normalize the message, hand it to the
//! extractor with the snapshot's categories, then re-validate the result
//! before anything is written. The extractor's category answer must match
//! a known category name exactly; anything else fails closed rather than
//! guessing, so a hallucinated category can never reach the ledger.

use chrono::Utc;
use tracing::info;

use crate::ai::{ExtractorBackend, ExtractorClient};
use crate::error::{Error, Result};
use crate::household::Scope;
use crate::models::{Expense, ExpenseUpdate, NewExpense};
use crate::snapshot::ScopeSnapshot;
use crate::spelling;
use crate::store::{EntityStore, StoreClient};

/// Orchestrates message-to-expense logging and last-expense fixes
#[derive(Clone)]
pub struct ExpenseLogger {
    store: StoreClient,
    extractor: ExtractorClient,
}

impl ExpenseLogger {
    pub fn new(store: StoreClient, extractor: ExtractorClient) -> Self {
        Self { store, extractor }
    }

    /// Log an expense from a free-form chat message
    pub async fn log(&self, snapshot: &ScopeSnapshot, message: &str) -> Result<Expense> {
        if snapshot.categories.is_empty() {
            return Err(Error::Resolution(
                "no categories defined yet; add one before logging".to_string(),
            ));
        }

        let normalized = spelling::normalize(message);
        let extracted = self
            .extractor
            .extract(&normalized, &snapshot.categories)
            .await?;

        if !extracted.amount.is_finite() || extracted.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "extracted amount must be positive, got {}",
                extracted.amount
            )));
        }
        let category = snapshot
            .category_by_name(&extracted.category_name)
            .ok_or_else(|| {
                Error::Resolution(format!(
                    "extractor answered with unknown category \"{}\"",
                    extracted.category_name
                ))
            })?;

        let new = NewExpense {
            amount: extracted.amount,
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            note: extracted.note,
            date: Utc::now(),
            household_id: snapshot.scope.household_id(),
            recurring_id: None,
        };
        let expense = self.store.create_expense(&new, &snapshot.user.email).await?;
        info!(
            amount = expense.amount,
            category = %expense.category_name,
            "logged expense from chat"
        );
        Ok(expense)
    }

    /// Most recently dated expense in scope, if any
    pub async fn last(&self, scope: &Scope) -> Result<Option<Expense>> {
        let mut expenses = self.store.filter_expenses(scope, Some(1)).await?;
        Ok(expenses.pop())
    }

    /// Delete the most recent expense; returns what was removed
    pub async fn undo_last(&self, scope: &Scope) -> Result<Expense> {
        let last = self
            .last(scope)
            .await?
            .ok_or_else(|| Error::NotFound("no expense to undo".to_string()))?;
        self.store.delete_expense(&last.id).await?;
        info!(amount = last.amount, category = %last.category_name, "undid last expense");
        Ok(last)
    }

    /// Amend the most recent expense's amount and/or note
    ///
    /// Re-categorizing goes through the category name so the denormalized
    /// name and ID stay consistent.
    pub async fn edit_last(
        &self,
        snapshot: &ScopeSnapshot,
        amount: Option<f64>,
        category_name: Option<&str>,
        note: Option<&str>,
    ) -> Result<Expense> {
        let last = self
            .last(&snapshot.scope)
            .await?
            .ok_or_else(|| Error::NotFound("no expense to edit".to_string()))?;

        if let Some(amount) = amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::InvalidData(format!(
                    "amount must be positive, got {}",
                    amount
                )));
            }
        }
        let (category_id, resolved_name) = match category_name {
            Some(name) => {
                let category = snapshot
                    .category_by_name(name)
                    .ok_or_else(|| Error::NotFound(format!("category \"{}\"", name)))?;
                (category.id.clone(), category.name.clone())
            }
            None => (last.category_id.clone(), last.category_name.clone()),
        };

        let update = ExpenseUpdate {
            amount: amount.unwrap_or(last.amount),
            category_id,
            category_name: resolved_name,
            note: note.map(String::from).or(last.note),
        };
        self.store.update_expense(&last.id, &update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCategory, UmbrellaCategory};

    async fn setup() -> (StoreClient, ScopeSnapshot) {
        let store = StoreClient::mock("amit@example.com");
        store
            .create_category(
                &NewCategory {
                    name: "Food".to_string(),
                    icon: None,
                    color: None,
                    umbrella_category: UmbrellaCategory::DailyLiving,
                    keywords: vec!["dinner".to_string(), "lunch".to_string()],
                    monthly_budget: Some(500.0),
                    household_id: None,
                },
                "amit@example.com",
            )
            .await
            .unwrap();
        let snapshot = ScopeSnapshot::load(&store).await.unwrap();
        (store, snapshot)
    }

    #[tokio::test]
    async fn test_log_with_rules_backend() {
        let (store, snapshot) = setup().await;
        let logger = ExpenseLogger::new(store, ExtractorClient::rules());
        let expense = logger.log(&snapshot, "Dinr 45").await.unwrap();
        assert_eq!(expense.amount, 45.0);
        assert_eq!(expense.category_name, "Food");
    }

    #[tokio::test]
    async fn test_unknown_category_from_extractor_fails_closed() {
        let (store, snapshot) = setup().await;
        let extractor = ExtractorClient::mock();
        if let ExtractorClient::Mock(mock) = &extractor {
            mock.push_expense(45.0, "Fod", Some("dinner"));
        }
        let logger = ExpenseLogger::new(store.clone(), extractor);
        let err = logger.log(&snapshot, "dinner 45").await.unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
        if let StoreClient::Mock(mock) = &store {
            assert_eq!(mock.expense_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_log_without_categories_refuses() {
        let store = StoreClient::mock("amit@example.com");
        let snapshot = ScopeSnapshot::load(&store).await.unwrap();
        let logger = ExpenseLogger::new(store, ExtractorClient::rules());
        let err = logger.log(&snapshot, "dinner 45").await.unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }

    #[tokio::test]
    async fn test_undo_last_deletes_newest() {
        let (store, snapshot) = setup().await;
        let logger = ExpenseLogger::new(store.clone(), ExtractorClient::rules());
        logger.log(&snapshot, "lunch 12").await.unwrap();
        logger.log(&snapshot, "dinner 45").await.unwrap();

        let undone = logger.undo_last(&snapshot.scope).await.unwrap();
        assert_eq!(undone.amount, 45.0);

        let remaining = logger.last(&snapshot.scope).await.unwrap().unwrap();
        assert_eq!(remaining.amount, 12.0);
    }

    #[tokio::test]
    async fn test_undo_with_no_expenses() {
        let (store, snapshot) = setup().await;
        let logger = ExpenseLogger::new(store, ExtractorClient::rules());
        let err = logger.undo_last(&snapshot.scope).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_last_amount_and_note() {
        let (store, snapshot) = setup().await;
        let logger = ExpenseLogger::new(store, ExtractorClient::rules());
        logger.log(&snapshot, "dinner 45").await.unwrap();

        let edited = logger
            .edit_last(&snapshot, Some(48.5), None, Some("dinner with sam"))
            .await
            .unwrap();
        assert_eq!(edited.amount, 48.5);
        assert_eq!(edited.note.as_deref(), Some("dinner with sam"));
        assert_eq!(edited.category_name, "Food");
    }

    #[tokio::test]
    async fn test_edit_last_rejects_unknown_category() {
        let (store, snapshot) = setup().await;
        let logger = ExpenseLogger::new(store, ExtractorClient::rules());
        logger.log(&snapshot, "dinner 45").await.unwrap();
        let err = logger
            .edit_last(&snapshot, None, Some("Travel"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
