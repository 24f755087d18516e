//! Budget utilization tiers
//!
//! Tier boundaries: at or past 100% of budget is over (100% exactly counts
//! as over, with zero overage), 80% and up is a warning, below that is
//! normal. Categories without a budget are untracked.

use crate::models::CategorySpend;

/// Utilization tier for one category's month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    /// No budget set; nothing to compare against
    Untracked,
    /// Below 80% of budget
    Normal,
    /// 80% up to (not including) 100%
    Warning,
    /// At or past 100%
    Over,
}

impl BudgetTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Untracked => "untracked",
            Self::Normal => "on track",
            Self::Warning => "warning",
            Self::Over => "over budget",
        }
    }
}

/// Resolved budget position for one category
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub tier: BudgetTier,
    /// Raw utilization percentage; None when untracked
    pub used_pct: Option<f64>,
    /// Utilization clamped to 100 for progress display
    pub display_pct: Option<f64>,
    /// Amount left (Normal/Warning) or overspent (Over); None when untracked
    pub delta: Option<f64>,
}

/// Classify spending against a budget
pub fn status(spending: f64, budget: Option<f64>) -> BudgetStatus {
    let budget = match budget {
        Some(b) if b > 0.0 => b,
        _ => {
            return BudgetStatus {
                tier: BudgetTier::Untracked,
                used_pct: None,
                display_pct: None,
                delta: None,
            }
        }
    };

    let pct = spending / budget * 100.0;
    let tier = if pct >= 100.0 {
        BudgetTier::Over
    } else if pct >= 80.0 {
        BudgetTier::Warning
    } else {
        BudgetTier::Normal
    };
    let delta = match tier {
        BudgetTier::Over => spending - budget,
        _ => budget - spending,
    };

    BudgetStatus {
        tier,
        used_pct: Some(pct),
        display_pct: Some(pct.min(100.0)),
        delta: Some(delta),
    }
}

/// Status for a category spend row
pub fn status_for(spend: &CategorySpend) -> BudgetStatus {
    let budget = if spend.budget > 0.0 {
        Some(spend.budget)
    } else {
        None
    };
    status(spend.spending, budget)
}
