//! Divvy Core Library
//!
//! Shared functionality for the Divvy household expense tracker:
//! - Entity store client (hosted HTTP store or in-memory mock)
//! - Chat-style expense logging with typo normalization
//! - Pluggable extraction backends (Ollama, keyword rules, mock)
//! - Household membership, scoping, and the membership index
//! - Budget tiers, recurring templates, and monthly report math

pub mod aggregate;
pub mod ai;
pub mod budget;
pub mod chat;
pub mod config;
pub mod error;
pub mod household;
pub mod models;
pub mod recurring;
pub mod snapshot;
pub mod spelling;
pub mod store;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    ExtractedExpense, ExtractorBackend, ExtractorClient, MockExtractor, MockReply,
    OllamaExtractor, RuleExtractor,
};
pub use budget::{BudgetStatus, BudgetTier};
pub use chat::ExpenseLogger;
pub use config::{Config, ExtractorConfig};
pub use error::{Error, Result};
pub use household::Scope;
pub use models::{
    Category, CategorySpend, DashboardStats, Expense, ExpenseUpdate, Household, Membership,
    MonthSummary, NewCategory, NewExpense, NewRecurringExpense, RecurringExpense, TrendPoint,
    UmbrellaCategory, User,
};
pub use snapshot::{ScopeSnapshot, SnapshotCell};
pub use store::{EntityStore, HttpStore, MockStore, StoreClient};
