//! In-memory store backend for tests and offline development
//!
//! Implements the same equality-filter semantics as the hosted store:
//! scope fields must match exactly, expense reads sort by date descending.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::household::Scope;
use crate::models::{
    Category, Expense, ExpenseUpdate, Household, Membership, NewCategory, NewExpense,
    NewRecurringExpense, RecurringExpense, User,
};
use crate::store::EntityStore;

#[derive(Default)]
struct Inner {
    next_id: u64,
    households: Vec<Household>,
    memberships: Vec<Membership>,
    categories: Vec<Category>,
    expenses: Vec<Expense>,
    recurring: Vec<RecurringExpense>,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// In-memory entity store
#[derive(Clone)]
pub struct MockStore {
    user_email: String,
    inner: Arc<Mutex<Inner>>,
}

fn in_scope(scope: &Scope, household_id: &Option<String>, created_by: &str) -> bool {
    match scope {
        Scope::Household(id) => household_id.as_deref() == Some(id.as_str()),
        Scope::Personal(email) => created_by == email && household_id.is_none(),
    }
}

impl MockStore {
    pub fn new(user_email: &str) -> Self {
        Self {
            user_email: user_email.to_string(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a test panicked mid-write
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a category directly, bypassing the create workflow (test setup)
    pub fn seed_category(&self, category: Category) {
        self.lock().categories.push(category);
    }

    /// Seed an expense directly (test setup)
    pub fn seed_expense(&self, expense: Expense) {
        self.lock().expenses.push(expense);
    }

    /// Number of expenses currently stored, regardless of scope
    pub fn expense_count(&self) -> usize {
        self.lock().expenses.len()
    }
}

#[async_trait]
impl EntityStore for MockStore {
    async fn me(&self) -> Result<User> {
        Ok(User {
            email: self.user_email.clone(),
            full_name: None,
        })
    }

    async fn list_households(&self) -> Result<Vec<Household>> {
        Ok(self.lock().households.clone())
    }

    async fn create_household(&self, name: &str, creator_email: &str) -> Result<Household> {
        let mut inner = self.lock();
        let household = Household {
            id: inner.next_id("hh"),
            name: name.to_string(),
            member_emails: vec![creator_email.to_string()],
            created_by: creator_email.to_string(),
        };
        inner.households.push(household.clone());
        Ok(household)
    }

    async fn update_household_members(
        &self,
        id: &str,
        member_emails: &[String],
    ) -> Result<Household> {
        let mut inner = self.lock();
        let household = inner
            .households
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| Error::NotFound(format!("Household {}", id)))?;
        household.member_emails = member_emails.to_vec();
        Ok(household.clone())
    }

    async fn memberships_for(&self, email: &str) -> Result<Vec<Membership>> {
        Ok(self
            .lock()
            .memberships
            .iter()
            .filter(|m| m.email == email)
            .cloned()
            .collect())
    }

    async fn create_membership(&self, email: &str, household_id: &str) -> Result<Membership> {
        let mut inner = self.lock();
        let membership = Membership {
            id: inner.next_id("mem"),
            email: email.to_string(),
            household_id: household_id.to_string(),
        };
        inner.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn delete_membership(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.memberships.len();
        inner.memberships.retain(|m| m.id != id);
        if inner.memberships.len() == before {
            return Err(Error::NotFound(format!("Membership {}", id)));
        }
        Ok(())
    }

    async fn filter_categories(&self, scope: &Scope) -> Result<Vec<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .filter(|c| in_scope(scope, &c.household_id, &c.created_by))
            .cloned()
            .collect())
    }

    async fn create_category(&self, new: &NewCategory, created_by: &str) -> Result<Category> {
        let mut inner = self.lock();
        let category = Category {
            id: inner.next_id("cat"),
            name: new.name.clone(),
            icon: new.icon.clone(),
            color: new.color.clone(),
            umbrella_category: new.umbrella_category,
            keywords: new.keywords.clone(),
            monthly_budget: new.monthly_budget,
            household_id: new.household_id.clone(),
            created_by: created_by.to_string(),
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: &str, new: &NewCategory) -> Result<Category> {
        let mut inner = self.lock();
        let category = inner
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("Category {}", id)))?;
        category.name = new.name.clone();
        category.icon = new.icon.clone();
        category.color = new.color.clone();
        category.umbrella_category = new.umbrella_category;
        category.keywords = new.keywords.clone();
        category.monthly_budget = new.monthly_budget;
        category.household_id = new.household_id.clone();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id != id);
        if inner.categories.len() == before {
            return Err(Error::NotFound(format!("Category {}", id)));
        }
        Ok(())
    }

    async fn filter_expenses(&self, scope: &Scope, limit: Option<usize>) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .lock()
            .expenses
            .iter()
            .filter(|e| in_scope(scope, &e.household_id, &e.created_by))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = limit {
            expenses.truncate(limit);
        }
        Ok(expenses)
    }

    async fn create_expense(&self, new: &NewExpense, created_by: &str) -> Result<Expense> {
        let mut inner = self.lock();
        let expense = Expense {
            id: inner.next_id("exp"),
            amount: new.amount,
            category_id: new.category_id.clone(),
            category_name: new.category_name.clone(),
            note: new.note.clone(),
            date: new.date,
            created_by: created_by.to_string(),
            household_id: new.household_id.clone(),
            recurring_id: new.recurring_id.clone(),
        };
        inner.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn update_expense(&self, id: &str, update: &ExpenseUpdate) -> Result<Expense> {
        let mut inner = self.lock();
        let expense = inner
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))?;
        expense.amount = update.amount;
        expense.category_id = update.category_id.clone();
        expense.category_name = update.category_name.clone();
        expense.note = update.note.clone();
        Ok(expense.clone())
    }

    async fn delete_expense(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.expenses.len();
        inner.expenses.retain(|e| e.id != id);
        if inner.expenses.len() == before {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        Ok(())
    }

    async fn filter_recurring(&self, scope: &Scope) -> Result<Vec<RecurringExpense>> {
        Ok(self
            .lock()
            .recurring
            .iter()
            .filter(|r| in_scope(scope, &r.household_id, &r.created_by))
            .cloned()
            .collect())
    }

    async fn create_recurring(
        &self,
        new: &NewRecurringExpense,
        created_by: &str,
    ) -> Result<RecurringExpense> {
        let mut inner = self.lock();
        let recurring = RecurringExpense {
            id: inner.next_id("rec"),
            name: new.name.clone(),
            amount: new.amount,
            category_id: new.category_id.clone(),
            category_name: new.category_name.clone(),
            day_of_month: new.day_of_month,
            is_active: new.is_active,
            household_id: new.household_id.clone(),
            created_by: created_by.to_string(),
        };
        inner.recurring.push(recurring.clone());
        Ok(recurring)
    }

    async fn update_recurring(
        &self,
        id: &str,
        new: &NewRecurringExpense,
    ) -> Result<RecurringExpense> {
        let mut inner = self.lock();
        let recurring = inner
            .recurring
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Recurring expense {}", id)))?;
        recurring.name = new.name.clone();
        recurring.amount = new.amount;
        recurring.category_id = new.category_id.clone();
        recurring.category_name = new.category_name.clone();
        recurring.day_of_month = new.day_of_month;
        recurring.is_active = new.is_active;
        recurring.household_id = new.household_id.clone();
        Ok(recurring.clone())
    }

    async fn delete_recurring(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.recurring.len();
        inner.recurring.retain(|r| r.id != id);
        if inner.recurring.len() == before {
            return Err(Error::NotFound(format!("Recurring expense {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_expense(amount: f64, day: u32) -> NewExpense {
        NewExpense {
            amount,
            category_id: "cat-1".to_string(),
            category_name: "Food".to_string(),
            note: None,
            date: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
            household_id: None,
            recurring_id: None,
        }
    }

    #[tokio::test]
    async fn test_expenses_sorted_newest_first() {
        let store = MockStore::new("amit@example.com");
        store
            .create_expense(&new_expense(10.0, 5), "amit@example.com")
            .await
            .unwrap();
        store
            .create_expense(&new_expense(20.0, 12), "amit@example.com")
            .await
            .unwrap();
        store
            .create_expense(&new_expense(30.0, 8), "amit@example.com")
            .await
            .unwrap();

        let scope = Scope::Personal("amit@example.com".to_string());
        let expenses = store.filter_expenses(&scope, None).await.unwrap();
        let amounts: Vec<f64> = expenses.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![20.0, 30.0, 10.0]);
    }

    #[tokio::test]
    async fn test_personal_scope_excludes_other_users() {
        let store = MockStore::new("amit@example.com");
        store
            .create_expense(&new_expense(10.0, 5), "amit@example.com")
            .await
            .unwrap();
        store
            .create_expense(&new_expense(99.0, 6), "sam@example.com")
            .await
            .unwrap();

        let scope = Scope::Personal("amit@example.com".to_string());
        let expenses = store.filter_expenses(&scope, None).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 10.0);
    }

    #[tokio::test]
    async fn test_household_scope_matches_id() {
        let store = MockStore::new("amit@example.com");
        let mut e = new_expense(42.0, 10);
        e.household_id = Some("hh-1".to_string());
        store.create_expense(&e, "amit@example.com").await.unwrap();
        store
            .create_expense(&new_expense(7.0, 11), "amit@example.com")
            .await
            .unwrap();

        let scope = Scope::Household("hh-1".to_string());
        let expenses = store.filter_expenses(&scope, None).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 42.0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MockStore::new("amit@example.com");
        let err = store.delete_expense("nope").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
