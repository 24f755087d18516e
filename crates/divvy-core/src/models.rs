//! Domain models for Divvy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed top-level grouping a category belongs to, used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UmbrellaCategory {
    Housing,
    Transportation,
    DailyLiving,
    Entertainment,
    Health,
    Savings,
    #[default]
    Other,
}

impl UmbrellaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Transportation => "transportation",
            Self::DailyLiving => "daily_living",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Savings => "savings",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Transportation => "Transportation",
            Self::DailyLiving => "Daily Living",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Savings => "Savings",
            Self::Other => "Other",
        }
    }

    pub fn all() -> &'static [UmbrellaCategory] {
        &[
            Self::Housing,
            Self::Transportation,
            Self::DailyLiving,
            Self::Entertainment,
            Self::Health,
            Self::Savings,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for UmbrellaCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "housing" => Ok(Self::Housing),
            "transportation" | "transport" => Ok(Self::Transportation),
            "daily_living" | "daily-living" | "daily" => Ok(Self::DailyLiving),
            "entertainment" => Ok(Self::Entertainment),
            "health" => Ok(Self::Health),
            "savings" => Ok(Self::Savings),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown umbrella category: {}", s)),
        }
    }
}

impl std::fmt::Display for UmbrellaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense category with keywords for extraction and an optional budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Opaque ID assigned by the entity store
    pub id: String,
    pub name: String,
    /// Emoji shown next to the category (falls back to a default when absent)
    pub icon: Option<String>,
    /// Hex color for charts (e.g. "#6366f1")
    pub color: Option<String>,
    pub umbrella_category: UmbrellaCategory,
    /// Hints for the extractor (e.g. "dinner", "lunch" for Food)
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Monthly budget; None or 0 means no budget tracking
    pub monthly_budget: Option<f64>,
    /// Household scope; None = personal, keyed by created_by
    pub household_id: Option<String>,
    pub created_by: String,
}

/// A new category to be created in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub umbrella_category: UmbrellaCategory,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub monthly_budget: Option<f64>,
    pub household_id: Option<String>,
}

/// A single ledger entry
///
/// `category_name` is a denormalized copy kept consistent with `category_id`
/// by the workflows that edit expenses. If the category is later deleted the
/// name persists for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// Non-negative amount in the household currency
    pub amount: f64,
    pub category_id: String,
    pub category_name: String,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub created_by: String,
    pub household_id: Option<String>,
    /// Set when this expense was posted from a recurring template;
    /// used to make recurring posting idempotent within a month
    #[serde(default)]
    pub recurring_id: Option<String>,
}

/// A new expense to be created in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category_id: String,
    pub category_name: String,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub household_id: Option<String>,
    #[serde(default)]
    pub recurring_id: Option<String>,
}

/// Fields that can change on an existing expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub amount: f64,
    pub category_id: String,
    pub category_name: String,
    pub note: Option<String>,
}

/// A template for a monthly charge; not itself a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub category_id: String,
    pub category_name: String,
    /// Day the charge lands, constrained to [1, 28] so it is valid in
    /// every month
    pub day_of_month: u32,
    pub is_active: bool,
    pub household_id: Option<String>,
    pub created_by: String,
}

/// A new recurring template to be created in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecurringExpense {
    pub name: String,
    pub amount: f64,
    pub category_id: String,
    pub category_name: String,
    pub day_of_month: u32,
    pub is_active: bool,
    pub household_id: Option<String>,
}

/// A named group of users sharing one expense/category/budget scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub member_emails: Vec<String>,
    /// Owner; cannot be removed from the household
    pub created_by: String,
}

/// Explicit membership index record: one per (email, household)
///
/// Maintained alongside `Household::member_emails` so scope resolution is a
/// single indexed lookup instead of a scan over every household. An email
/// appearing in more than one record is a data error surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: String,
    pub email: String,
    pub household_id: String,
}

/// The current user as reported by the session service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub full_name: Option<String>,
}

// ========== Report Models ==========

/// Per-category spend within a period (for charts and breakdowns)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category_id: String,
    pub name: String,
    pub color: Option<String>,
    pub spending: f64,
    /// Category budget at the time of the report; 0 when unset
    pub budget: f64,
}

/// Summary figures for one viewed month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    /// e.g. "March 2026"
    pub month: String,
    pub total: f64,
    pub expense_count: usize,
    /// Change vs the previous month; 0 when the previous month had no spend
    pub percent_change: f64,
    /// Total divided by the actual number of days in this month (28-31)
    pub daily_average: f64,
}

/// One bar in a trailing-months trend chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    /// e.g. "Mar 2026"
    pub month: String,
    pub total: f64,
}

/// Dashboard headline figures for the current month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub month_total: f64,
    pub previous_month_total: f64,
    pub percent_change: f64,
    /// Sum of all category budgets in scope
    pub total_budget: f64,
    /// Overall utilization of the total budget, clamped for display
    pub budget_used_pct: Option<f64>,
    pub by_category: Vec<CategorySpend>,
    /// Categories whose spend exceeds their budget this month
    pub over_budget: Vec<CategorySpend>,
}
