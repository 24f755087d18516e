//! Integration tests for divvy-core
//!
//! These tests exercise the full log → scope → report workflow against the
//! in-memory store, with the deterministic rules extractor standing in for
//! a live model.

use chrono::{Datelike, TimeZone, Utc};

use divvy_core::{
    aggregate, household, recurring, EntityStore, Error, ExpenseLogger, ExtractorClient,
    NewCategory, NewRecurringExpense, Scope, ScopeSnapshot, SnapshotCell, StoreClient,
    UmbrellaCategory,
};

fn food_category() -> NewCategory {
    NewCategory {
        name: "Food".to_string(),
        icon: Some("🍕".to_string()),
        color: Some("#f59e0b".to_string()),
        umbrella_category: UmbrellaCategory::DailyLiving,
        keywords: vec!["dinner".to_string(), "lunch".to_string()],
        monthly_budget: Some(500.0),
        household_id: None,
    }
}

#[tokio::test]
async fn test_chat_logging_end_to_end() {
    let store = StoreClient::mock("amit@example.com");
    store
        .create_category(&food_category(), "amit@example.com")
        .await
        .unwrap();

    let snapshot = ScopeSnapshot::load(&store).await.unwrap();
    let logger = ExpenseLogger::new(store.clone(), ExtractorClient::rules());

    // Typo in the message; normalization fixes it before extraction
    let expense = logger.log(&snapshot, "dinr 45").await.unwrap();
    assert_eq!(expense.amount, 45.0);
    assert_eq!(expense.category_name, "Food");

    let scope = Scope::Personal("amit@example.com".to_string());
    let stored = store.filter_expenses(&scope, None).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].amount, 45.0);
}

#[tokio::test]
async fn test_unmatchable_message_writes_nothing() {
    let store = StoreClient::mock("amit@example.com");
    store
        .create_category(&food_category(), "amit@example.com")
        .await
        .unwrap();

    let snapshot = ScopeSnapshot::load(&store).await.unwrap();
    let logger = ExpenseLogger::new(store.clone(), ExtractorClient::rules());

    let err = logger.log(&snapshot, "hello how are you").await.unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));

    let scope = Scope::Personal("amit@example.com".to_string());
    assert!(store.filter_expenses(&scope, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_household_scoping_end_to_end() {
    let store = StoreClient::mock("amit@example.com");

    // Personal category and expense before joining a household
    store
        .create_category(&food_category(), "amit@example.com")
        .await
        .unwrap();
    let personal_snapshot = ScopeSnapshot::load(&store).await.unwrap();
    let logger = ExpenseLogger::new(store.clone(), ExtractorClient::rules());
    logger.log(&personal_snapshot, "lunch 12").await.unwrap();

    // Join a household; shared data is a separate world
    let household = household::create_household(&store, "The Flat", "amit@example.com")
        .await
        .unwrap();
    let mut shared_category = food_category();
    shared_category.household_id = Some(household.id.clone());
    store
        .create_category(&shared_category, "amit@example.com")
        .await
        .unwrap();

    let cell = SnapshotCell::new(personal_snapshot);
    let shared_snapshot = cell.reload(&store).await.unwrap();
    assert_eq!(shared_snapshot.scope, Scope::Household(household.id.clone()));

    logger.log(&shared_snapshot, "dinner 45").await.unwrap();

    let shared = store
        .filter_expenses(&Scope::Household(household.id.clone()), None)
        .await
        .unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].amount, 45.0);

    // The personal expense stayed in the personal scope
    let personal = store
        .filter_expenses(&Scope::Personal("amit@example.com".to_string()), None)
        .await
        .unwrap();
    assert_eq!(personal.len(), 1);
    assert_eq!(personal[0].amount, 12.0);
}

#[tokio::test]
async fn test_recurring_posts_show_up_in_reports() {
    let store = StoreClient::mock("amit@example.com");
    let scope = Scope::Personal("amit@example.com".to_string());
    let category = store
        .create_category(
            &NewCategory {
                name: "Housing".to_string(),
                icon: None,
                color: None,
                umbrella_category: UmbrellaCategory::Housing,
                keywords: vec![],
                monthly_budget: Some(1000.0),
                household_id: None,
            },
            "amit@example.com",
        )
        .await
        .unwrap();

    store
        .create_recurring(
            &NewRecurringExpense {
                name: "Rent".to_string(),
                amount: 900.0,
                category_id: category.id.clone(),
                category_name: category.name.clone(),
                day_of_month: 1,
                is_active: true,
                household_id: None,
            },
            "amit@example.com",
        )
        .await
        .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap();
    let posted = recurring::post_due(&store, &scope, "amit@example.com", now)
        .await
        .unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].date.month(), 3);

    // A second pass in the same month posts nothing
    assert!(recurring::post_due(&store, &scope, "amit@example.com", now)
        .await
        .unwrap()
        .is_empty());

    let expenses = store.filter_expenses(&scope, None).await.unwrap();
    let categories = store.filter_categories(&scope).await.unwrap();
    let stats = aggregate::dashboard_stats(&expenses, &categories, now);
    assert_eq!(stats.month_total, 900.0);
    assert_eq!(stats.by_category.len(), 1);
    assert_eq!(stats.by_category[0].name, "Housing");
    // 900 of 1000 budget used: warning territory, not over
    assert!(stats.over_budget.is_empty());
    assert_eq!(stats.budget_used_pct, Some(90.0));
}

#[tokio::test]
async fn test_undo_and_edit_round_trip() {
    let store = StoreClient::mock("amit@example.com");
    store
        .create_category(&food_category(), "amit@example.com")
        .await
        .unwrap();
    let snapshot = ScopeSnapshot::load(&store).await.unwrap();
    let logger = ExpenseLogger::new(store.clone(), ExtractorClient::rules());

    logger.log(&snapshot, "lunch 12").await.unwrap();
    logger.log(&snapshot, "dinner 45").await.unwrap();

    let edited = logger
        .edit_last(&snapshot, Some(48.5), None, Some("dinner with sam"))
        .await
        .unwrap();
    assert_eq!(edited.amount, 48.5);

    let undone = logger.undo_last(&snapshot.scope).await.unwrap();
    assert_eq!(undone.amount, 48.5);

    let remaining = store
        .filter_expenses(&snapshot.scope, None)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].amount, 12.0);
}
