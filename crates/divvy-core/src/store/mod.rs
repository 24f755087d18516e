//! Entity store abstraction
//!
//! All persistence lives in an external hosted entity store exposing
//! per-entity CRUD (create, update, delete, filter, list) plus a session
//! endpoint. This module provides a backend-agnostic interface over it.
//!
//! # Architecture
//!
//! - `EntityStore` trait: defines the interface for all store operations
//! - `StoreClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HttpStore`, `MockStore`
//!
//! `filter` on the hosted store performs equality matching on the given
//! fields only; date-range filtering happens client-side in the aggregator.

mod http;
mod mock;

pub use http::HttpStore;
pub use mock::MockStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::household::Scope;
use crate::models::{
    Category, Expense, ExpenseUpdate, Household, Membership, NewCategory, NewExpense,
    NewRecurringExpense, RecurringExpense, User,
};

/// Trait defining the interface for all store backends
///
/// Filtered reads return records matching the scope's equality fields;
/// expense reads are sorted by date descending.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Current user from the session service
    async fn me(&self) -> Result<User>;

    // ----- Households -----

    async fn list_households(&self) -> Result<Vec<Household>>;
    async fn create_household(&self, name: &str, creator_email: &str) -> Result<Household>;
    async fn update_household_members(
        &self,
        id: &str,
        member_emails: &[String],
    ) -> Result<Household>;

    // ----- Membership index -----

    /// All index records for an email (at most one in a consistent store)
    async fn memberships_for(&self, email: &str) -> Result<Vec<Membership>>;
    async fn create_membership(&self, email: &str, household_id: &str) -> Result<Membership>;
    async fn delete_membership(&self, id: &str) -> Result<()>;

    // ----- Categories -----

    async fn filter_categories(&self, scope: &Scope) -> Result<Vec<Category>>;
    async fn create_category(&self, new: &NewCategory, created_by: &str) -> Result<Category>;
    async fn update_category(&self, id: &str, new: &NewCategory) -> Result<Category>;
    async fn delete_category(&self, id: &str) -> Result<()>;

    // ----- Expenses -----

    /// Expenses in scope, sorted by date descending, optionally limited
    async fn filter_expenses(&self, scope: &Scope, limit: Option<usize>) -> Result<Vec<Expense>>;
    async fn create_expense(&self, new: &NewExpense, created_by: &str) -> Result<Expense>;
    async fn update_expense(&self, id: &str, update: &ExpenseUpdate) -> Result<Expense>;
    async fn delete_expense(&self, id: &str) -> Result<()>;

    // ----- Recurring templates -----

    async fn filter_recurring(&self, scope: &Scope) -> Result<Vec<RecurringExpense>>;
    async fn create_recurring(
        &self,
        new: &NewRecurringExpense,
        created_by: &str,
    ) -> Result<RecurringExpense>;
    async fn update_recurring(
        &self,
        id: &str,
        new: &NewRecurringExpense,
    ) -> Result<RecurringExpense>;
    async fn delete_recurring(&self, id: &str) -> Result<()>;
}

/// Concrete store client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum StoreClient {
    /// Hosted entity store over HTTP
    Http(HttpStore),
    /// In-memory store for tests and development
    Mock(MockStore),
}

impl StoreClient {
    /// Create an HTTP store client for a hosted store
    pub fn http(base_url: &str, session_email: Option<&str>) -> Self {
        StoreClient::Http(HttpStore::new(base_url, session_email))
    }

    /// Create an in-memory mock store
    pub fn mock(user_email: &str) -> Self {
        StoreClient::Mock(MockStore::new(user_email))
    }
}

macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            StoreClient::Http(s) => s.$method($($arg),*).await,
            StoreClient::Mock(s) => s.$method($($arg),*).await,
        }
    };
}

#[async_trait]
impl EntityStore for StoreClient {
    async fn me(&self) -> Result<User> {
        delegate!(self, me)
    }

    async fn list_households(&self) -> Result<Vec<Household>> {
        delegate!(self, list_households)
    }

    async fn create_household(&self, name: &str, creator_email: &str) -> Result<Household> {
        delegate!(self, create_household, name, creator_email)
    }

    async fn update_household_members(
        &self,
        id: &str,
        member_emails: &[String],
    ) -> Result<Household> {
        delegate!(self, update_household_members, id, member_emails)
    }

    async fn memberships_for(&self, email: &str) -> Result<Vec<Membership>> {
        delegate!(self, memberships_for, email)
    }

    async fn create_membership(&self, email: &str, household_id: &str) -> Result<Membership> {
        delegate!(self, create_membership, email, household_id)
    }

    async fn delete_membership(&self, id: &str) -> Result<()> {
        delegate!(self, delete_membership, id)
    }

    async fn filter_categories(&self, scope: &Scope) -> Result<Vec<Category>> {
        delegate!(self, filter_categories, scope)
    }

    async fn create_category(&self, new: &NewCategory, created_by: &str) -> Result<Category> {
        delegate!(self, create_category, new, created_by)
    }

    async fn update_category(&self, id: &str, new: &NewCategory) -> Result<Category> {
        delegate!(self, update_category, id, new)
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        delegate!(self, delete_category, id)
    }

    async fn filter_expenses(&self, scope: &Scope, limit: Option<usize>) -> Result<Vec<Expense>> {
        delegate!(self, filter_expenses, scope, limit)
    }

    async fn create_expense(&self, new: &NewExpense, created_by: &str) -> Result<Expense> {
        delegate!(self, create_expense, new, created_by)
    }

    async fn update_expense(&self, id: &str, update: &ExpenseUpdate) -> Result<Expense> {
        delegate!(self, update_expense, id, update)
    }

    async fn delete_expense(&self, id: &str) -> Result<()> {
        delegate!(self, delete_expense, id)
    }

    async fn filter_recurring(&self, scope: &Scope) -> Result<Vec<RecurringExpense>> {
        delegate!(self, filter_recurring, scope)
    }

    async fn create_recurring(
        &self,
        new: &NewRecurringExpense,
        created_by: &str,
    ) -> Result<RecurringExpense> {
        delegate!(self, create_recurring, new, created_by)
    }

    async fn update_recurring(
        &self,
        id: &str,
        new: &NewRecurringExpense,
    ) -> Result<RecurringExpense> {
        delegate!(self, update_recurring, id, new)
    }

    async fn delete_recurring(&self, id: &str) -> Result<()> {
        delegate!(self, delete_recurring, id)
    }
}
