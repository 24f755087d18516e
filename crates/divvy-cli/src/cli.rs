//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

/// Divvy - Shared household expense tracking
#[derive(Parser)]
#[command(name = "divvy")]
#[command(about = "Chat-style expense tracker for shared households", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Entity store URL (overrides config file and DIVVY_STORE_URL)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log an expense from a chat message, e.g. `divvy log "dinner 45"`
    Log {
        /// Free-form message: a description and an amount
        message: String,
    },

    /// Delete the most recently logged expense
    Undo,

    /// Amend the most recently logged expense
    Edit {
        /// New amount
        #[arg(short, long)]
        amount: Option<f64>,

        /// New category (by exact name)
        #[arg(short, long)]
        category: Option<String>,

        /// New note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List expenses in your scope
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage recurring expense templates
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Manage your household
    Household {
        #[command(subcommand)]
        action: Option<HouseholdAction>,
    },

    /// Show the current month's dashboard
    Dashboard,

    /// Monthly report with per-category breakdown
    Report {
        /// Month to report on, YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Spending trend over recent months
    Trend {
        /// Number of trailing months to include
        #[arg(short, long, default_value = "6")]
        months: u32,
    },

    /// Show configuration and backend health
    Status,
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List recent expenses
    List {
        /// Maximum number to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Search expenses by category name or note
    Search {
        /// Case-insensitive substring to look for
        query: String,
    },

    /// Delete an expense by ID
    Delete {
        /// Expense ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories in your scope
    List {
        /// Only show one umbrella group
        #[arg(short, long)]
        umbrella: Option<String>,
    },

    /// Add a category
    Add {
        /// Category name (extraction matches against it)
        name: String,

        /// Umbrella group: housing, transportation, daily_living,
        /// entertainment, health, savings, other
        #[arg(short, long, default_value = "other")]
        umbrella: String,

        /// Comma-separated extraction keywords, e.g. "dinner,lunch"
        #[arg(short, long)]
        keywords: Option<String>,

        /// Monthly budget
        #[arg(short, long)]
        budget: Option<f64>,

        /// Emoji icon
        #[arg(long)]
        icon: Option<String>,

        /// Hex color for charts, e.g. "#6366f1"
        #[arg(long)]
        color: Option<String>,
    },

    /// Edit a category (unset options keep their current value)
    Edit {
        /// Current category name
        name: String,

        /// Rename to
        #[arg(long)]
        rename: Option<String>,

        /// New umbrella group
        #[arg(short, long)]
        umbrella: Option<String>,

        /// New comma-separated keywords (replaces the old list)
        #[arg(short, long)]
        keywords: Option<String>,

        /// New monthly budget (0 clears it)
        #[arg(short, long)]
        budget: Option<f64>,

        /// New emoji icon
        #[arg(long)]
        icon: Option<String>,

        /// New hex color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category by name
    Delete {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List recurring templates
    List,

    /// Add a recurring template
    Add {
        /// Template name, e.g. "Rent"
        name: String,

        /// Monthly amount
        #[arg(short, long)]
        amount: f64,

        /// Category name
        #[arg(short, long)]
        category: String,

        /// Day of month the charge lands (1-28)
        #[arg(short, long)]
        day: u32,
    },

    /// Pause a template (kept, but never posted)
    Pause {
        /// Template name
        name: String,
    },

    /// Resume a paused template
    Resume {
        /// Template name
        name: String,
    },

    /// Delete a template by name
    Delete {
        /// Template name
        name: String,
    },

    /// Post ledger entries for templates due this month
    ///
    /// Safe to run repeatedly; a template posts at most once per month.
    PostDue,
}

#[derive(Subcommand)]
pub enum HouseholdAction {
    /// Show your household and its members
    Show,

    /// Create a household with yourself as owner
    Create {
        /// Household name
        name: String,
    },

    /// Add a member by email
    AddMember {
        /// Member email
        email: String,
    },

    /// Remove a member by email (the owner cannot be removed)
    RemoveMember {
        /// Member email
        email: String,
    },

    /// Backfill the membership index from household member lists
    BootstrapIndex,
}
