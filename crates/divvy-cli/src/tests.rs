//! CLI command tests
//!
//! Commands run against the in-memory store backend with the
//! deterministic rules extractor, so every test is hermetic.

use divvy_core::{
    EntityStore, ExtractorClient, NewCategory, ScopeSnapshot, StoreClient, UmbrellaCategory,
};

use crate::commands::{self, truncate, AppContext};

async fn setup_context() -> AppContext {
    let store = StoreClient::mock("amit@example.com");
    store
        .create_category(
            &NewCategory {
                name: "Food".to_string(),
                icon: Some("🍕".to_string()),
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
    refresh(store).await
}

/// Rebuild the context so the snapshot sees the latest store state
async fn refresh(store: StoreClient) -> AppContext {
    let snapshot = ScopeSnapshot::load(&store).await.unwrap();
    AppContext {
        store,
        extractor: ExtractorClient::rules(),
        snapshot,
    }
}

// ========== Helpers ==========

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
}

#[test]
fn test_truncate_multibyte_lands_on_char_boundary() {
    assert_eq!(truncate("ééééééééé", 8), "éé...");
    assert_eq!(truncate("日本語のメモです", 8), "日...");
}

// ========== Log Commands ==========

#[tokio::test]
async fn test_cmd_log_creates_expense() {
    let ctx = setup_context().await;
    commands::cmd_log(&ctx, "dinr 45").await.unwrap();

    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, None)
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, 45.0);
    assert_eq!(expenses[0].category_name, "Food");
}

#[tokio::test]
async fn test_cmd_log_unmatched_message_fails() {
    let ctx = setup_context().await;
    assert!(commands::cmd_log(&ctx, "skydiving 200").await.is_err());
}

#[tokio::test]
async fn test_cmd_undo_without_expenses_fails() {
    let ctx = setup_context().await;
    assert!(commands::cmd_undo(&ctx).await.is_err());
}

#[tokio::test]
async fn test_cmd_undo_removes_last() {
    let ctx = setup_context().await;
    commands::cmd_log(&ctx, "lunch 12").await.unwrap();
    commands::cmd_undo(&ctx).await.unwrap();

    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, None)
        .await
        .unwrap();
    assert!(expenses.is_empty());
}

#[tokio::test]
async fn test_cmd_edit_requires_a_change() {
    let ctx = setup_context().await;
    commands::cmd_log(&ctx, "lunch 12").await.unwrap();
    assert!(commands::cmd_edit(&ctx, None, None, None).await.is_err());
    assert!(commands::cmd_edit(&ctx, Some(15.0), None, None)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_cmd_expenses_search() {
    let ctx = setup_context().await;
    commands::cmd_log(&ctx, "dinner 45").await.unwrap();
    commands::cmd_expenses_search(&ctx, "dinner").await.unwrap();
    commands::cmd_expenses_search(&ctx, "no-such-thing")
        .await
        .unwrap();
}

// ========== Category Commands ==========

#[tokio::test]
async fn test_cmd_categories_add_and_list() {
    let ctx = setup_context().await;
    commands::cmd_categories_add(
        &ctx,
        "Transport",
        "transportation",
        Some("gas,fuel"),
        Some(200.0),
        None,
        None,
    )
    .await
    .unwrap();

    let categories = ctx
        .store
        .filter_categories(&ctx.snapshot.scope)
        .await
        .unwrap();
    assert_eq!(categories.len(), 2);
    let transport = categories.iter().find(|c| c.name == "Transport").unwrap();
    assert_eq!(transport.keywords, vec!["gas", "fuel"]);
    assert_eq!(transport.monthly_budget, Some(200.0));
}

#[tokio::test]
async fn test_cmd_categories_add_duplicate_fails() {
    let ctx = setup_context().await;
    let result =
        commands::cmd_categories_add(&ctx, "Food", "daily_living", None, None, None, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_categories_add_bad_umbrella_fails() {
    let ctx = setup_context().await;
    let result =
        commands::cmd_categories_add(&ctx, "Mystery", "unknown", None, None, None, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_categories_edit_zero_clears_budget() {
    let ctx = setup_context().await;
    commands::cmd_categories_edit(&ctx, "Food", None, None, None, Some(0.0), None, None)
        .await
        .unwrap();

    let categories = ctx
        .store
        .filter_categories(&ctx.snapshot.scope)
        .await
        .unwrap();
    assert_eq!(categories[0].monthly_budget, None);
}

#[tokio::test]
async fn test_cmd_categories_delete_unknown_fails() {
    let ctx = setup_context().await;
    assert!(commands::cmd_categories_delete(&ctx, "Travel").await.is_err());
}

#[tokio::test]
async fn test_cmd_categories_list_umbrella_filter() {
    let ctx = setup_context().await;
    assert!(commands::cmd_categories_list(&ctx, Some("daily_living"))
        .await
        .is_ok());
    assert!(commands::cmd_categories_list(&ctx, Some("not-a-group"))
        .await
        .is_err());
}

// ========== Recurring Commands ==========

#[tokio::test]
async fn test_cmd_recurring_add_validates_day() {
    let ctx = setup_context().await;
    assert!(commands::cmd_recurring_add(&ctx, "Rent", 900.0, "Food", 29)
        .await
        .is_err());
    assert!(commands::cmd_recurring_add(&ctx, "Rent", 900.0, "Food", 28)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_cmd_recurring_add_rejects_nonfinite_amount() {
    let ctx = setup_context().await;
    assert!(
        commands::cmd_recurring_add(&ctx, "Rent", f64::NAN, "Food", 1)
            .await
            .is_err()
    );
    assert!(
        commands::cmd_recurring_add(&ctx, "Rent", f64::INFINITY, "Food", 1)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_cmd_recurring_add_unknown_category_fails() {
    let ctx = setup_context().await;
    assert!(
        commands::cmd_recurring_add(&ctx, "Rent", 900.0, "Housing", 1)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_cmd_recurring_post_due_is_idempotent() {
    let ctx = setup_context().await;
    commands::cmd_recurring_add(&ctx, "Rent", 900.0, "Food", 1)
        .await
        .unwrap();

    commands::cmd_recurring_post_due(&ctx).await.unwrap();
    commands::cmd_recurring_post_due(&ctx).await.unwrap();

    let expenses = ctx
        .store
        .filter_expenses(&ctx.snapshot.scope, None)
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, 900.0);
}

#[tokio::test]
async fn test_cmd_recurring_pause_and_delete() {
    let ctx = setup_context().await;
    commands::cmd_recurring_add(&ctx, "Gym", 40.0, "Food", 5)
        .await
        .unwrap();
    commands::cmd_recurring_set_active(&ctx, "Gym", false)
        .await
        .unwrap();

    let templates = ctx
        .store
        .filter_recurring(&ctx.snapshot.scope)
        .await
        .unwrap();
    assert!(!templates[0].is_active);

    commands::cmd_recurring_delete(&ctx, "Gym").await.unwrap();
    assert!(commands::cmd_recurring_delete(&ctx, "Gym").await.is_err());
}

// ========== Household Commands ==========

#[tokio::test]
async fn test_cmd_household_create_and_add_member() {
    let ctx = setup_context().await;
    commands::cmd_household_create(&ctx, "The Flat")
        .await
        .unwrap();

    // Re-load so the snapshot sees the new household scope
    let ctx = refresh(ctx.store).await;
    assert!(ctx.snapshot.household.is_some());

    commands::cmd_household_add_member(&ctx, "sam@example.com")
        .await
        .unwrap();

    let ctx = refresh(ctx.store).await;
    let household = ctx.snapshot.household.as_ref().unwrap();
    assert_eq!(household.member_emails.len(), 2);
}

#[tokio::test]
async fn test_cmd_household_add_member_without_household_fails() {
    let ctx = setup_context().await;
    assert!(commands::cmd_household_add_member(&ctx, "sam@example.com")
        .await
        .is_err());
}

#[tokio::test]
async fn test_cmd_household_owner_cannot_be_removed() {
    let ctx = setup_context().await;
    commands::cmd_household_create(&ctx, "The Flat")
        .await
        .unwrap();
    let ctx = refresh(ctx.store).await;
    assert!(
        commands::cmd_household_remove_member(&ctx, "amit@example.com")
            .await
            .is_err()
    );
}

// ========== Report Commands ==========

#[tokio::test]
async fn test_cmd_dashboard_and_report() {
    let ctx = setup_context().await;
    commands::cmd_log(&ctx, "dinner 45").await.unwrap();
    commands::cmd_dashboard(&ctx).await.unwrap();
    commands::cmd_report(&ctx, None).await.unwrap();
    commands::cmd_trend(&ctx, 3).await.unwrap();
}

#[tokio::test]
async fn test_cmd_report_rejects_bad_month() {
    let ctx = setup_context().await;
    assert!(commands::cmd_report(&ctx, Some("March")).await.is_err());
    assert!(commands::cmd_report(&ctx, Some("2026-13")).await.is_err());
    assert!(commands::cmd_report(&ctx, Some("2026-03")).await.is_ok());
}

#[tokio::test]
async fn test_cmd_trend_rejects_zero_months() {
    let ctx = setup_context().await;
    assert!(commands::cmd_trend(&ctx, 0).await.is_err());
}
