//! Divvy CLI - Shared household expense tracker
//!
//! Usage:
//!   divvy log "dinner 45"        Log an expense from a chat message
//!   divvy dashboard              Current month at a glance
//!   divvy recurring post-due     Post due recurring charges
//!   divvy household create NAME  Start sharing expenses

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let store = cli.store.as_deref();

    // Status reads config only; everything else needs a live context
    if let Commands::Status = cli.command {
        let config = commands::load_config(store)?;
        return commands::cmd_status(&config).await;
    }

    let ctx = commands::open_context(store).await?;

    match cli.command {
        Commands::Log { message } => commands::cmd_log(&ctx, &message).await,
        Commands::Undo => commands::cmd_undo(&ctx).await,
        Commands::Edit {
            amount,
            category,
            note,
        } => commands::cmd_edit(&ctx, amount, category.as_deref(), note.as_deref()).await,
        Commands::Expenses { action } => match action {
            None => commands::cmd_expenses_list(&ctx, 20).await,
            Some(ExpensesAction::List { limit }) => commands::cmd_expenses_list(&ctx, limit).await,
            Some(ExpensesAction::Search { query }) => {
                commands::cmd_expenses_search(&ctx, &query).await
            }
            Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(&ctx, &id).await,
        },
        Commands::Categories { action } => match action {
            None => commands::cmd_categories_list(&ctx, None).await,
            Some(CategoriesAction::List { umbrella }) => {
                commands::cmd_categories_list(&ctx, umbrella.as_deref()).await
            }
            Some(CategoriesAction::Add {
                name,
                umbrella,
                keywords,
                budget,
                icon,
                color,
            }) => {
                commands::cmd_categories_add(
                    &ctx,
                    &name,
                    &umbrella,
                    keywords.as_deref(),
                    budget,
                    icon.as_deref(),
                    color.as_deref(),
                )
                .await
            }
            Some(CategoriesAction::Edit {
                name,
                rename,
                umbrella,
                keywords,
                budget,
                icon,
                color,
            }) => {
                commands::cmd_categories_edit(
                    &ctx,
                    &name,
                    rename.as_deref(),
                    umbrella.as_deref(),
                    keywords.as_deref(),
                    budget,
                    icon.as_deref(),
                    color.as_deref(),
                )
                .await
            }
            Some(CategoriesAction::Delete { name }) => {
                commands::cmd_categories_delete(&ctx, &name).await
            }
        },
        Commands::Recurring { action } => match action {
            None | Some(RecurringAction::List) => commands::cmd_recurring_list(&ctx).await,
            Some(RecurringAction::Add {
                name,
                amount,
                category,
                day,
            }) => commands::cmd_recurring_add(&ctx, &name, amount, &category, day).await,
            Some(RecurringAction::Pause { name }) => {
                commands::cmd_recurring_set_active(&ctx, &name, false).await
            }
            Some(RecurringAction::Resume { name }) => {
                commands::cmd_recurring_set_active(&ctx, &name, true).await
            }
            Some(RecurringAction::Delete { name }) => {
                commands::cmd_recurring_delete(&ctx, &name).await
            }
            Some(RecurringAction::PostDue) => commands::cmd_recurring_post_due(&ctx).await,
        },
        Commands::Household { action } => match action {
            None | Some(HouseholdAction::Show) => commands::cmd_household_show(&ctx).await,
            Some(HouseholdAction::Create { name }) => {
                commands::cmd_household_create(&ctx, &name).await
            }
            Some(HouseholdAction::AddMember { email }) => {
                commands::cmd_household_add_member(&ctx, &email).await
            }
            Some(HouseholdAction::RemoveMember { email }) => {
                commands::cmd_household_remove_member(&ctx, &email).await
            }
            Some(HouseholdAction::BootstrapIndex) => {
                commands::cmd_household_bootstrap_index(&ctx).await
            }
        },
        Commands::Dashboard => commands::cmd_dashboard(&ctx).await,
        Commands::Report { month } => commands::cmd_report(&ctx, month.as_deref()).await,
        Commands::Trend { months } => commands::cmd_trend(&ctx, months).await,
        Commands::Status => unreachable!("handled before context setup"),
    }
}
