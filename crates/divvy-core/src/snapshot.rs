//! Coherent view of a user's scope and categories
//!
//! Scope, household, and category list are loaded together into one
//! immutable snapshot. Workflows read from a snapshot, never from the
//! store piecemeal, so a membership change mid-operation cannot mix one
//! scope's categories with another scope's expenses. Long-running callers
//! hold a `SnapshotCell` and swap in a fresh snapshot atomically.

use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::household::{self, Scope};
use crate::models::{Category, Household, User};
use crate::store::{EntityStore, StoreClient};

/// One coherent load of identity, scope, and categories
#[derive(Debug, Clone)]
pub struct ScopeSnapshot {
    pub user: User,
    pub scope: Scope,
    pub household: Option<Household>,
    pub categories: Vec<Category>,
}

impl ScopeSnapshot {
    /// Load a fresh snapshot for the current user
    pub async fn load(store: &StoreClient) -> Result<Self> {
        let user = store.me().await?;
        Self::load_for(store, &user).await
    }

    /// Load a fresh snapshot for a known user
    pub async fn load_for(store: &StoreClient, user: &User) -> Result<Self> {
        let household = household::household_for(store, &user.email).await?;
        let scope = match &household {
            Some(h) => Scope::Household(h.id.clone()),
            None => Scope::Personal(user.email.clone()),
        };
        let categories = store.filter_categories(&scope).await?;
        Ok(Self {
            user: user.clone(),
            scope,
            household,
            categories,
        })
    }

    /// Find a category by exact name
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Find a category by ID
    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// Shared slot holding the current snapshot
///
/// Readers get an `Arc` to whatever snapshot was current when they asked;
/// `reload` swaps the slot in one step so no reader ever observes a
/// half-updated view.
#[derive(Clone)]
pub struct SnapshotCell {
    inner: Arc<RwLock<Arc<ScopeSnapshot>>>,
}

impl SnapshotCell {
    pub fn new(snapshot: ScopeSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The snapshot current at this instant
    pub fn current(&self) -> Arc<ScopeSnapshot> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Load a fresh snapshot and swap it in
    pub async fn reload(&self, store: &StoreClient) -> Result<Arc<ScopeSnapshot>> {
        let fresh = Arc::new(ScopeSnapshot::load(store).await?);
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = fresh.clone();
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::create_household;
    use crate::models::{NewCategory, UmbrellaCategory};

    fn new_category(name: &str, household_id: Option<&str>) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            icon: None,
            color: None,
            umbrella_category: UmbrellaCategory::DailyLiving,
            keywords: vec![],
            monthly_budget: None,
            household_id: household_id.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_snapshot_personal_scope() {
        let store = StoreClient::mock("amit@example.com");
        store
            .create_category(&new_category("Food", None), "amit@example.com")
            .await
            .unwrap();

        let snapshot = ScopeSnapshot::load(&store).await.unwrap();
        assert_eq!(
            snapshot.scope,
            Scope::Personal("amit@example.com".to_string())
        );
        assert!(snapshot.household.is_none());
        assert!(snapshot.category_by_name("Food").is_some());
        assert!(snapshot.category_by_name("food").is_none());
    }

    #[tokio::test]
    async fn test_reload_picks_up_scope_change() {
        let store = StoreClient::mock("amit@example.com");
        let cell = SnapshotCell::new(ScopeSnapshot::load(&store).await.unwrap());
        assert!(matches!(cell.current().scope, Scope::Personal(_)));

        let household = create_household(&store, "The Flat", "amit@example.com")
            .await
            .unwrap();
        store
            .create_category(
                &new_category("Shared Food", Some(&household.id)),
                "amit@example.com",
            )
            .await
            .unwrap();

        let before = cell.current();
        cell.reload(&store).await.unwrap();
        let after = cell.current();

        // The old handle still sees the old coherent view
        assert!(matches!(before.scope, Scope::Personal(_)));
        assert!(before.categories.is_empty());
        assert_eq!(after.scope, Scope::Household(household.id));
        assert!(after.category_by_name("Shared Food").is_some());
    }
}
